//! Tenant context resolution from request credentials.

use larder_core::{TenantContext, TenantId};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::token::TokenVerifier;

/// Turns request headers into a [`TenantContext`].
#[derive(Clone)]
pub struct TenantResolver {
    verifier: TokenVerifier,
    allow_tenant_header: bool,
}

impl TenantResolver {
    pub fn new(config: &AuthConfig) -> Result<Self, AuthError> {
        Ok(Self {
            verifier: TokenVerifier::new(config)?,
            allow_tenant_header: config.allow_tenant_header,
        })
    }

    /// Resolve the caller's tenant.
    ///
    /// `authorization` is the raw `Authorization` header value and
    /// `tenant_header` the raw `X-Tenant-ID` value. The header is only
    /// consulted when the verified token has no tenant claim and
    /// `allow_tenant_header` is set.
    pub fn resolve(
        &self,
        authorization: Option<&str>,
        tenant_header: Option<&str>,
    ) -> Result<TenantContext, AuthError> {
        let token = bearer_token(authorization)?;
        let claims = self.verifier.verify(token).inspect_err(|e| {
            warn!(error = %e, "rejected bearer token");
        })?;

        let tenant_id = match claims.tenant() {
            Some(tenant_id) => tenant_id,
            None => self.header_tenant(tenant_header, &claims.sub)?,
        };

        debug!(tenant_id = %tenant_id, subject = %claims.sub, "resolved tenant context");
        Ok(TenantContext::new(tenant_id).with_subject(claims.sub))
    }

    fn header_tenant(&self, header: Option<&str>, subject: &str) -> Result<TenantId, AuthError> {
        if !self.allow_tenant_header {
            warn!(subject, "token carries no tenant claim");
            return Err(AuthError::MissingTenant);
        }
        let raw = header.ok_or(AuthError::MissingTenant)?;
        raw.trim()
            .parse()
            .map_err(|_| AuthError::InvalidTenant(raw.to_string()))
    }
}

/// Extract the token from `Bearer <token>`. The scheme is case-insensitive.
fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or(AuthError::MissingCredential)?;
    let (scheme, token) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}
