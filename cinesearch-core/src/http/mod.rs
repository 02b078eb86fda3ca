//! Authenticated transport.

pub mod authenticated;

pub use authenticated::{AuthenticatedFetch, FetchOptions, RetryPolicy};
