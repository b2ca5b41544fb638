//! Infrastructure layer - external integrations
//!
//! The wallet provider seam and environment-backed configuration.

pub mod config;
pub mod provider;

// Re-export infrastructure components
pub use config::*;
pub use provider::*;
