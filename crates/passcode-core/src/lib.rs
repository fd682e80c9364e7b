//! Shared plumbing for Passcode services: request ids and tracing setup.

pub mod middleware;
pub mod tracing;
