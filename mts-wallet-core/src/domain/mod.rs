//! Domain layer
//!
//! Networks, token requests and results, and the wallet session.

pub mod entities;

// Re-export domain components
pub use entities::*;
