//! Support for talking to the chat completions endpoint.
//!
//! - [`retry`]: transient error classification and exponential backoff.
//!
//! The client itself lives at the crate root ([`crate::OpenRouterClient`]).

pub mod retry;

pub use retry::RetryConfig;
