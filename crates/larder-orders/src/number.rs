//! Human-readable order numbers.
//!
//! Format: `ORD-{TENANT}-{YYYYMMDD}-{RANDOM}` where `TENANT` is the first
//! eight hex digits of the tenant id and `RANDOM` eight random hex
//! digits, both upper case.

use chrono::{DateTime, Utc};
use larder_core::TenantId;
use uuid::Uuid;

pub fn generate(tenant_id: TenantId, now: DateTime<Utc>) -> String {
    let tenant = tenant_id.as_uuid().simple().to_string();
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "ORD-{}-{}-{}",
        tenant[..8].to_ascii_uppercase(),
        now.format("%Y%m%d"),
        random[..8].to_ascii_uppercase()
    )
}
