//! Allergen bitmask codec.
//!
//! Fourteen allergens are encoded as bits 0..=13 of an integer. The same
//! encoding backs a product's `allergen_mask` ("contains") and a
//! customer's `allergen_restrictions` ("must avoid"). Bits 14 and above
//! are never read or written.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{LarderError, LarderResult};

/// Number of allergen positions.
pub const ALLERGEN_COUNT: u8 = 14;

/// Mask with every valid allergen bit set.
pub const ALL_ALLERGENS_MASK: u16 = (1 << ALLERGEN_COUNT) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Allergen {
    Gluten,
    Crustaceans,
    Eggs,
    Fish,
    Peanuts,
    Soybeans,
    Milk,
    Nuts,
    Celery,
    Mustard,
    Sesame,
    Sulphites,
    Lupin,
    Molluscs,
}

impl Allergen {
    /// All allergens in bit order.
    pub const ALL: [Allergen; ALLERGEN_COUNT as usize] = [
        Allergen::Gluten,
        Allergen::Crustaceans,
        Allergen::Eggs,
        Allergen::Fish,
        Allergen::Peanuts,
        Allergen::Soybeans,
        Allergen::Milk,
        Allergen::Nuts,
        Allergen::Celery,
        Allergen::Mustard,
        Allergen::Sesame,
        Allergen::Sulphites,
        Allergen::Lupin,
        Allergen::Molluscs,
    ];

    pub fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.get(usize::from(bit)).copied()
    }

    pub fn bit(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Allergen::Gluten => "Gluten",
            Allergen::Crustaceans => "Crustaceans",
            Allergen::Eggs => "Eggs",
            Allergen::Fish => "Fish",
            Allergen::Peanuts => "Peanuts",
            Allergen::Soybeans => "Soybeans",
            Allergen::Milk => "Milk",
            Allergen::Nuts => "Nuts",
            Allergen::Celery => "Celery",
            Allergen::Mustard => "Mustard",
            Allergen::Sesame => "Sesame",
            Allergen::Sulphites => "Sulphites",
            Allergen::Lupin => "Lupin",
            Allergen::Molluscs => "Molluscs",
        }
    }

    fn flag(self) -> u16 {
        1 << self.bit()
    }
}

impl fmt::Display for Allergen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A set of allergens, serialized as a plain non-negative integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct AllergenMask(u16);

impl AllergenMask {
    pub const EMPTY: AllergenMask = AllergenMask(0);

    pub fn bits(self) -> u16 {
        self.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, allergen: Allergen) -> bool {
        self.0 & allergen.flag() != 0
    }

    pub fn with(self, allergen: Allergen) -> Self {
        Self(self.0 | allergen.flag())
    }

    pub fn without(self, allergen: Allergen) -> Self {
        Self(self.0 & !allergen.flag())
    }

    pub fn toggled(self, allergen: Allergen) -> Self {
        Self(self.0 ^ allergen.flag())
    }

    /// Allergens present in the mask, in bit order.
    pub fn allergens(self) -> impl Iterator<Item = Allergen> {
        Allergen::ALL.into_iter().filter(move |a| self.contains(*a))
    }

    pub fn names(self) -> Vec<&'static str> {
        self.allergens().map(Allergen::name).collect()
    }
}

impl TryFrom<u32> for AllergenMask {
    type Error = LarderError;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        if raw > u32::from(ALL_ALLERGENS_MASK) {
            return Err(LarderError::validation(format!(
                "allergen mask {raw} sets bits outside 0..{ALLERGEN_COUNT}"
            )));
        }
        // Checked above: raw fits in 14 bits.
        Ok(Self(raw as u16))
    }
}

impl From<AllergenMask> for u32 {
    fn from(mask: AllergenMask) -> Self {
        u32::from(mask.0)
    }
}

impl FromIterator<Allergen> for AllergenMask {
    fn from_iter<I: IntoIterator<Item = Allergen>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

/// True iff `bit` is a valid allergen position and is set in `mask`.
pub fn has_allergen(mask: u32, bit: u8) -> bool {
    bit < ALLERGEN_COUNT && mask & (1 << bit) != 0
}

/// Flip exactly `bit` in `mask`.
///
/// Positions outside 0..=13 are rejected rather than written.
pub fn toggle_allergen(mask: u32, bit: u8) -> LarderResult<u32> {
    if bit >= ALLERGEN_COUNT {
        return Err(LarderError::validation(format!(
            "allergen bit {bit} is outside 0..{ALLERGEN_COUNT}"
        )));
    }
    Ok(mask ^ (1 << bit))
}

/// Names of the allergens set in `mask`, in enumeration order.
pub fn names_of(mask: u32) -> Vec<&'static str> {
    Allergen::ALL
        .into_iter()
        .filter(|a| has_allergen(mask, a.bit()))
        .map(Allergen::name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mask_has_no_names() {
        assert!(names_of(0).is_empty());
        assert!(AllergenMask::EMPTY.names().is_empty());
    }

    #[test]
    fn full_mask_lists_every_allergen_once_in_order() {
        let names = names_of(u32::from(ALL_ALLERGENS_MASK));
        assert_eq!(names.len(), 14);
        assert_eq!(names.first(), Some(&"Gluten"));
        assert_eq!(names.last(), Some(&"Molluscs"));
        let expected: Vec<_> = Allergen::ALL.iter().map(|a| a.name()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        for mask in [0u32, 1, 0b101_0101, 0x1234, u32::from(ALL_ALLERGENS_MASK)] {
            for bit in 0..ALLERGEN_COUNT {
                let once = toggle_allergen(mask, bit).unwrap();
                assert_ne!(once, mask);
                assert_eq!(toggle_allergen(once, bit).unwrap(), mask);
            }
        }
    }

    #[test]
    fn toggle_touches_only_the_given_bit() {
        let mask = (1 << 0) | (1 << 2) | (1 << 6);
        assert_eq!(toggle_allergen(mask, 4).unwrap(), mask | (1 << 4));
        assert_eq!(toggle_allergen(mask, 2).unwrap(), (1 << 0) | (1 << 6));
    }

    #[test]
    fn out_of_range_bits_are_never_read_or_written() {
        let high = 1u32 << 14;
        assert!(!has_allergen(high, 14));
        assert!(names_of(high).is_empty());
        assert!(toggle_allergen(0, 14).is_err());
        assert!(toggle_allergen(0, 31).is_err());
    }

    #[test]
    fn names_follow_enumeration_order() {
        let mask = (1 << 6) | (1 << 0) | (1 << 2);
        assert_eq!(names_of(mask), vec!["Gluten", "Eggs", "Milk"]);
    }

    #[test]
    fn mask_rejects_bits_above_thirteen() {
        assert!(AllergenMask::try_from(u32::from(ALL_ALLERGENS_MASK)).is_ok());
        assert!(AllergenMask::try_from(1 << 14).is_err());
    }

    #[test]
    fn typed_mask_operations() {
        let mask: AllergenMask = [Allergen::Milk, Allergen::Gluten].into_iter().collect();
        assert!(mask.contains(Allergen::Milk));
        assert!(!mask.contains(Allergen::Fish));
        assert_eq!(mask.names(), vec!["Gluten", "Milk"]);
        assert!(mask.without(Allergen::Milk).without(Allergen::Gluten).is_empty());
        assert_eq!(mask.toggled(Allergen::Fish).toggled(Allergen::Fish), mask);
        assert_eq!(Allergen::from_bit(13), Some(Allergen::Molluscs));
        assert_eq!(Allergen::from_bit(14), None);
    }

    #[test]
    fn mask_serializes_as_integer() {
        let mask = AllergenMask::try_from(5).unwrap();
        assert_eq!(serde_json::to_string(&mask).unwrap(), "5");
        let back: AllergenMask = serde_json::from_str("5").unwrap();
        assert_eq!(back, mask);
        assert!(serde_json::from_str::<AllergenMask>("16384").is_err());
        assert!(serde_json::from_str::<AllergenMask>("-1").is_err());
    }
}
