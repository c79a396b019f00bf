//! Domain models for Larder.
//!
//! Every entity carries the [`TenantId`](crate::tenancy::TenantId) of its
//! owner. `Create*` inputs never carry a tenant; the repository takes it
//! from the caller's context.

pub mod customer;
pub mod order;
pub mod product;
pub mod shop;

use crate::error::{LarderError, LarderResult};

/// Longest free-text field accepted from callers.
pub const MAX_TEXT_LEN: usize = 255;

/// Longest long-form field (ingredients, notes).
pub const MAX_LONG_TEXT_LEN: usize = 4000;

/// Require a non-blank value no longer than `max_len` characters.
pub(crate) fn require_text(field: &str, value: &str, max_len: usize) -> LarderResult<()> {
    if value.trim().is_empty() {
        return Err(LarderError::validation(format!("{field} must not be blank")));
    }
    check_len(field, value, max_len)
}

pub(crate) fn check_len(field: &str, value: &str, max_len: usize) -> LarderResult<()> {
    if value.chars().count() > max_len {
        return Err(LarderError::validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(())
}

/// Minimal shape check: one `@` with text on both sides, no whitespace.
pub fn check_email(field: &str, value: &str) -> LarderResult<()> {
    require_text(field, value, MAX_TEXT_LEN)?;
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !value.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(LarderError::validation(format!(
            "{field} must be a valid email address"
        )))
    }
}

/// Distinguishes an absent field from an explicit `null`.
pub(crate) mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<Option<T>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        assert!(require_text("name", "  ", 10).is_err());
        assert!(require_text("name", "ok", 10).is_ok());
        assert!(require_text("name", "toolongvalue", 5).is_err());
    }

    #[test]
    fn email_shape() {
        assert!(check_email("email", "a@b.example").is_ok());
        assert!(check_email("email", "no-at-sign").is_err());
        assert!(check_email("email", "@b.example").is_err());
        assert!(check_email("email", "a@").is_err());
        assert!(check_email("email", "a b@c.example").is_err());
        assert!(check_email("email", "a@b@c").is_err());
    }
}
