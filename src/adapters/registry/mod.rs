//! Registry Adapters
//!
//! Config-backed implementations of the team and division registry
//! ports, plus the built-in league display-name table.

pub mod leagues;
pub mod static_registry;

pub use static_registry::StaticRegistry;
