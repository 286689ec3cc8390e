//! Core domain concepts shared across all subdomains.
//!
//! - [`error::DispatchError`]: the error taxonomy surfaced to callers
//! - [`string`]: output preview helpers used for audit records

pub mod error;
pub mod string;
