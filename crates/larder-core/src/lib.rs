//! Larder Core: domain models, error taxonomy, and the pure logic shared
//! by every other crate.
//!
//! Nothing in this crate performs I/O. Persistence lives behind the
//! traits in [`repository`]; the lifecycle engine in [`lifecycle`] and
//! the codec in [`allergen`] are pure functions.

pub mod allergen;
pub mod error;
pub mod lifecycle;
pub mod models;
pub mod repository;
pub mod tenancy;

pub use error::{LarderError, LarderResult};
pub use tenancy::{TenantContext, TenantId};
