//! detox - Track time spent away from your phone.
//!
//! A session starts when you put the phone down and ends when you come back
//! and decide you are done. History is kept in a single JSON record from which
//! today's total, the weekly total and the day streak are derived.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod i18n;
pub mod storage;

pub use config::Config;
pub use error::{Error, Result};
