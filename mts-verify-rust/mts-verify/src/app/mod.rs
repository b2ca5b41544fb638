pub mod verification_service;

pub use verification_service::{ProcessRunner, VerificationOutput, VerificationRequest, VerificationRunner};
