//! MTS contract verification server
//!
//! Wraps `hardhat verify` behind `POST /verify` so a browser client can request source verification
//! of a freshly deployed token.

pub mod api;
pub mod app;
pub mod domain;
pub mod infrastructure;

pub use app::{ProcessRunner, VerificationRequest, VerificationRunner};
pub use domain::VerifyError;
pub use infrastructure::VerifyConfig;
