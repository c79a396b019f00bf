//! Authentication configuration.

/// Configuration for bearer token verification.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// PEM-encoded Ed25519 public key for JWT verification.
    pub jwt_public_key_pem: String,
    /// PEM-encoded Ed25519 private key. Only needed to issue tokens
    /// (development and tests); the server never signs.
    pub jwt_private_key_pem: Option<String>,
    /// Expected JWT issuer (`iss` claim).
    pub jwt_issuer: String,
    /// Lifetime of tokens issued by [`issue_access_token`](crate::issue_access_token),
    /// in seconds (default: 900 = 15 minutes).
    pub access_token_lifetime_secs: u64,
    /// Accept the `X-Tenant-ID` header when the token carries no tenant
    /// claim. Development only.
    pub allow_tenant_header: bool,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_public_key_pem: String::new(),
            jwt_private_key_pem: None,
            jwt_issuer: "larder".into(),
            access_token_lifetime_secs: 900,
            allow_tenant_header: false,
        }
    }
}
