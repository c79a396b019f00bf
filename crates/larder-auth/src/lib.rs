//! Larder Auth: bearer credential verification and tenant context
//! resolution.
//!
//! Callers authenticate with an EdDSA-signed JWT. The tenant a request
//! acts for is read from the token's claims, never from the request
//! body, and handed to the rest of the system as a
//! [`TenantContext`](larder_core::TenantContext).

pub mod config;
pub mod context;
pub mod error;
pub mod token;

pub use config::AuthConfig;
pub use context::TenantResolver;
pub use error::AuthError;
pub use token::{AccessTokenClaims, TokenVerifier, issue_access_token};
