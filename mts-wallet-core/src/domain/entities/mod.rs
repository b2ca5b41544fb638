//! Domain entities and value objects
//!
//! This module contains the core domain entities and value objects
//! that represent the business concepts in the wallet core.

pub mod network;
pub mod token;
pub mod wallet;

// Re-export entities
pub use network::*;
pub use token::*;
pub use wallet::*;
