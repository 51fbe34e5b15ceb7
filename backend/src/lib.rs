//! # EduPortal core
//!
//! Client-side logic for an education portal: a Ramadan countdown banner
//! and a searchable university / textbook directory.
//!
//! ## Features
//!
//! - **Phase engine**: locate "now" within a day-by-day window calendar in
//!   a fixed UTC offset and pick the next boundary to count down to
//! - **Countdown banner**: `HH:MM:SS` formatting, a once-per-second ticker
//!   and a 24-hour dismissal persisted in a key-value store
//! - **Directory engine**: facet derivation, search/region/type filters,
//!   reset-to-first-page pagination and a compact page-link list
//! - **Parsing**: tolerant JSON readers for calendars and directory exports
//!
//! ## Architecture
//!
//! - [`models`]: schedule windows, directory records, fixed-offset time
//! - [`services`]: phase resolution, banner, ticker, filters, pagination
//! - [`parsing`]: candidate-key JSON parsers
//! - [`io`]: record sources with retry
//! - [`db`]: key-value stores for the dismissal timestamp
//! - [`config`]: `portal.toml` settings
//!
//! Nothing in the phase and directory engines fails: malformed input
//! degrades to a suppressed banner or an empty page.

// PortalError carries an ErrorContext for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod error;
pub mod io;
pub mod models;
pub mod parsing;
pub mod services;

pub use config::PortalConfig;
pub use error::{ErrorContext, PortalError, PortalResult};
