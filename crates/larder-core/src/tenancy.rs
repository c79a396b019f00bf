//! Tenant isolation guard.
//!
//! Every entity in Larder is owned by exactly one tenant. The tenant is
//! never taken from a request body: it is derived from the caller's
//! credential into a [`TenantContext`] and passed explicitly into every
//! repository and service call.
//!
//! Two mechanisms keep data from crossing tenants:
//!
//! - [`TenantScoped`] wraps list queries. It can only be built through
//!   [`scope_query`], so a repository list method cannot be called
//!   without a tenant.
//! - [`assert_owned`] checks a loaded entity against the caller's tenant
//!   and reports a mismatch as `NotFound`, so another tenant's records
//!   are not observable through the error taxonomy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{LarderError, LarderResult};

/// Opaque tenant identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TenantId(Uuid);

impl TenantId {
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TenantId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TenantId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// The authenticated caller's tenant scope for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TenantContext {
    tenant_id: TenantId,
    /// Credential subject, kept for log correlation only.
    subject: Option<String>,
}

impl TenantContext {
    pub fn new(tenant_id: TenantId) -> Self {
        Self {
            tenant_id,
            subject: None,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }
}

/// An entity owned by a single tenant.
pub trait TenantOwned {
    /// Entity name used in `NotFound` errors (e.g. `"shop"`).
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;
    fn tenant_id(&self) -> TenantId;
}

/// A query that has been bound to a tenant.
#[derive(Debug, Clone)]
pub struct TenantScoped<Q> {
    tenant_id: TenantId,
    query: Q,
}

impl<Q> TenantScoped<Q> {
    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn query(&self) -> &Q {
        &self.query
    }

    pub fn into_parts(self) -> (TenantId, Q) {
        (self.tenant_id, self.query)
    }
}

/// Bind `query` to the caller's tenant.
pub fn scope_query<Q>(ctx: &TenantContext, query: Q) -> TenantScoped<Q> {
    TenantScoped {
        tenant_id: ctx.tenant_id(),
        query,
    }
}

/// Reject `entity` unless it belongs to the caller's tenant.
///
/// A foreign entity yields the same `NotFound` a missing one would.
pub fn assert_owned<E: TenantOwned>(ctx: &TenantContext, entity: &E) -> LarderResult<()> {
    assert_owned_by(ctx.tenant_id(), entity)
}

/// Same check as [`assert_owned`], against a bare tenant id.
pub fn assert_owned_by<E: TenantOwned>(tenant_id: TenantId, entity: &E) -> LarderResult<()> {
    if entity.tenant_id() == tenant_id {
        Ok(())
    } else {
        Err(LarderError::not_found(E::ENTITY, entity.id()))
    }
}
