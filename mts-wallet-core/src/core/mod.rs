//! Core wallet functionality
//!
//! This module contains the session, the two user-triggered flows, and the
//! contract, fee and transaction plumbing they share.

pub mod contracts;
pub mod fees;
pub mod status;
pub mod token_creation;
pub mod transactions;
pub mod wallet;
pub mod wrap;
