//! Product domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{MAX_LONG_TEXT_LEN, MAX_TEXT_LEN, check_len, double_option, require_text};
use crate::allergen::AllergenMask;
use crate::error::{LarderError, LarderResult};
use crate::tenancy::{TenantId, TenantOwned};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub tenant_id: TenantId,
    /// Stock-keeping unit, unique within the tenant.
    pub sku: String,
    pub title: String,
    pub ingredients_text: String,
    /// Allergens the product contains.
    pub allergen_mask: AllergenMask,
    /// `None` means the product is not yet sellable.
    pub price_pennies: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TenantOwned for Product {
    const ENTITY: &'static str = "product";

    fn id(&self) -> Uuid {
        self.id
    }

    fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub sku: String,
    pub title: String,
    #[serde(default)]
    pub ingredients_text: String,
    #[serde(default)]
    pub allergen_mask: AllergenMask,
    pub price_pennies: Option<i64>,
}

impl CreateProduct {
    pub fn validate(&self) -> LarderResult<()> {
        require_text("sku", &self.sku, MAX_TEXT_LEN)?;
        require_text("title", &self.title, MAX_TEXT_LEN)?;
        check_len("ingredientsText", &self.ingredients_text, MAX_LONG_TEXT_LEN)?;
        check_price(self.price_pennies)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub sku: Option<String>,
    pub title: Option<String>,
    pub ingredients_text: Option<String>,
    pub allergen_mask: Option<AllergenMask>,
    /// `Some(Some(p))` = set, `Some(None)` = clear, `None` = no change.
    #[serde(default, with = "double_option")]
    pub price_pennies: Option<Option<i64>>,
}

impl UpdateProduct {
    pub fn validate(&self) -> LarderResult<()> {
        if let Some(sku) = &self.sku {
            require_text("sku", sku, MAX_TEXT_LEN)?;
        }
        if let Some(title) = &self.title {
            require_text("title", title, MAX_TEXT_LEN)?;
        }
        if let Some(text) = &self.ingredients_text {
            check_len("ingredientsText", text, MAX_LONG_TEXT_LEN)?;
        }
        if let Some(price) = self.price_pennies {
            check_price(price)?;
        }
        Ok(())
    }
}

fn check_price(price: Option<i64>) -> LarderResult<()> {
    match price {
        Some(p) if p < 0 => Err(LarderError::validation(
            "pricePennies must not be negative",
        )),
        _ => Ok(()),
    }
}
