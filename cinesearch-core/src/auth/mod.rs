//! Catalog bearer token lifecycle.

pub mod token;

pub use token::{
    CredentialStore, DEFAULT_EXPIRY_BUFFER,
    DEFAULT_TOKEN_LIFETIME, TokenManager, TokenPolicy,
};
