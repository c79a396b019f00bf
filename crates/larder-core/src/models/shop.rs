//! Shop domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MAX_TEXT_LEN, check_len, require_text};
use crate::error::LarderResult;
use crate::tenancy::{TenantId, TenantOwned};

/// A physical or virtual outlet that takes orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: Uuid,
    pub tenant_id: TenantId,
    /// Unique within the tenant.
    pub name: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Shop {
    const ENTITY: &'static str = "shop";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShop {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

impl CreateShop {
    pub fn validate(&self) -> LarderResult<()> {
        require_text("name", &self.name, MAX_TEXT_LEN)?;
        check_len("address", &self.address, MAX_TEXT_LEN)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShop {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl UpdateShop {
    pub fn validate(&self) -> LarderResult<()> {
        if let Some(name) = &self.name {
            require_text("name", name, MAX_TEXT_LEN)?;
        }
        if let Some(address) = &self.address {
            check_len("address", address, MAX_TEXT_LEN)?;
        }
        Ok(())
    }
}
