//! Customer domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    MAX_LONG_TEXT_LEN, MAX_TEXT_LEN, check_email, check_len, double_option, require_text,
};
use crate::allergen::AllergenMask;
use crate::error::LarderResult;
use crate::tenancy::{TenantId, TenantOwned};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub tenant_id: TenantId,
    pub name: String,
    /// Unique within the tenant.
    pub email: String,
    pub phone: Option<String>,
    /// Allergens the customer must avoid. Same encoding as
    /// [`Product::allergen_mask`](super::product::Product::allergen_mask).
    pub allergen_restrictions: AllergenMask,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Customer {
    const ENTITY: &'static str = "customer";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub allergen_restrictions: AllergenMask,
    pub notes: Option<String>,
}

impl CreateCustomer {
    pub fn validate(&self) -> LarderResult<()> {
        require_text("name", &self.name, MAX_TEXT_LEN)?;
        check_email("email", &self.email)?;
        if let Some(phone) = &self.phone {
            check_len("phone", phone, 50)?;
        }
        if let Some(notes) = &self.notes {
            check_len("notes", notes, MAX_LONG_TEXT_LEN)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub email: Option<String>,
    /// `Some(None)` clears the stored phone number.
    #[serde(default, with = "double_option")]
    pub phone: Option<Option<String>>,
    pub allergen_restrictions: Option<AllergenMask>,
    #[serde(default, with = "double_option")]
    pub notes: Option<Option<String>>,
}

impl UpdateCustomer {
    pub fn validate(&self) -> LarderResult<()> {
        if let Some(name) = &self.name {
            require_text("name", name, MAX_TEXT_LEN)?;
        }
        if let Some(email) = &self.email {
            check_email("email", email)?;
        }
        if let Some(Some(phone)) = &self.phone {
            check_len("phone", phone, 50)?;
        }
        if let Some(Some(notes)) = &self.notes {
            check_len("notes", notes, MAX_LONG_TEXT_LEN)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_distinguishes_absent_from_null() {
        let absent: UpdateCustomer = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.phone, None);
        assert_eq!(absent.notes, None);

        let cleared: UpdateCustomer =
            serde_json::from_str(r#"{"phone":null,"notes":null}"#).unwrap();
        assert_eq!(cleared.phone, Some(None));
        assert_eq!(cleared.notes, Some(None));
        assert!(cleared.validate().is_ok());

        let set: UpdateCustomer = serde_json::from_str(r#"{"phone":"07000 000000"}"#).unwrap();
        assert_eq!(set.phone, Some(Some("07000 000000".to_string())));
    }

    #[test]
    fn overlong_phone_is_rejected_on_update() {
        let input = UpdateCustomer {
            phone: Some(Some("0".repeat(51))),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }
}
