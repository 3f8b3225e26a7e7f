//! Items Data

use crate::domain::items::errors::ItemValidationError;

/// Item payload for both creation and replacement.
///
/// Amounts are signed minor units as received from callers; [`ItemData::validate`]
/// rejects the values that cannot be stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemData {
    pub name: String,
    pub picture: Option<String>,
    pub price: i64,
    pub sale_price: Option<i64>,
    pub description: Option<String>,
    pub shippable: bool,
    pub quantity: i64,

    /// Price lookup key at the payment processor. Only honoured on creation;
    /// a fresh key is generated when absent.
    pub lookup_key: Option<String>,
}

impl ItemData {
    /// Check the payload against the catalog rules.
    ///
    /// # Errors
    ///
    /// Returns the first rule the payload breaks, checked in field order.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::NameBlank);
        }

        if self.price < 0 {
            return Err(ItemValidationError::PriceNegative);
        }

        if let Some(sale_price) = self.sale_price {
            if sale_price < 0 {
                return Err(ItemValidationError::SalePriceNegative);
            }

            if sale_price > self.price {
                return Err(ItemValidationError::SalePriceGreaterThanPrice);
            }
        }

        if self.quantity <= 0 {
            return Err(ItemValidationError::QuantityZeroOrNegative);
        }

        Ok(())
    }

    pub(crate) fn into_validated(self) -> Result<ValidatedItem, ItemValidationError> {
        self.validate()?;

        let price =
            u64::try_from(self.price).map_err(|_negative| ItemValidationError::PriceNegative)?;

        let sale_price = self
            .sale_price
            .map(u64::try_from)
            .transpose()
            .map_err(|_negative| ItemValidationError::SalePriceNegative)?;

        let quantity = u64::try_from(self.quantity)
            .map_err(|_negative| ItemValidationError::QuantityZeroOrNegative)?;

        Ok(ValidatedItem {
            name: self.name,
            picture: self.picture,
            price,
            sale_price,
            description: self.description,
            shippable: self.shippable,
            quantity,
            lookup_key: self.lookup_key.filter(|key| !key.trim().is_empty()),
        })
    }
}

/// Item payload that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidatedItem {
    pub name: String,
    pub picture: Option<String>,
    pub price: u64,
    pub sale_price: Option<u64>,
    pub description: Option<String>,
    pub shippable: bool,
    pub quantity: u64,
    pub lookup_key: Option<String>,
}

impl ValidatedItem {
    /// Sale price when set, list price otherwise.
    pub(crate) fn effective_price(&self) -> u64 {
        self.sale_price.unwrap_or(self.price)
    }
}
