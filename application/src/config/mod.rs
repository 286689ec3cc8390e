//! Application-level configuration.
//!
//! - [`ExecutorParams`]: admission control, timeout and allow-list for the
//!   process executor
//! - [`DispatchSettings`]: everything the dispatch use case needs besides
//!   its adapters

pub mod dispatch_settings;
pub mod executor_params;

pub use dispatch_settings::DispatchSettings;
pub use executor_params::ExecutorParams;
