//! Shipping contact form.
//!
//! Fields are written verbatim as the shopper types. Nothing is validated on
//! write; the form is only checked for required fields when an order is
//! submitted.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when naming a form field.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The name does not match any shipping field.
    #[error("unknown shipping field: {0}")]
    Unknown(String),
}

/// The five shipping fields, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShippingField {
    Name,
    Email,
    Address,
    City,
    Zip,
}

impl ShippingField {
    /// Every field in form order.
    pub const ALL: [Self; 5] = [Self::Name, Self::Email, Self::Address, Self::City, Self::Zip];

    /// The form input name for this field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Address => "address",
            Self::City => "city",
            Self::Zip => "zip",
        }
    }
}

impl fmt::Display for ShippingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShippingField {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FieldError::Unknown(s.to_owned()))
    }
}

/// Where the order is shipped and who to contact about it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingInfo {
    pub name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub zip: String,
}

impl ShippingInfo {
    /// Overwrite one field.
    pub fn set_field(&mut self, field: ShippingField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    /// Current value of one field.
    #[must_use]
    pub fn field(&self, field: ShippingField) -> &str {
        match field {
            ShippingField::Name => &self.name,
            ShippingField::Email => &self.email,
            ShippingField::Address => &self.address,
            ShippingField::City => &self.city,
            ShippingField::Zip => &self.zip,
        }
    }

    /// True when every field holds a non-empty string.
    ///
    /// Whitespace counts as content; only `""` is missing.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        ShippingField::ALL
            .into_iter()
            .all(|field| !self.field(field).is_empty())
    }

    /// Fields that are still empty, in form order.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<ShippingField> {
        ShippingField::ALL
            .into_iter()
            .filter(|&field| self.field(field).is_empty())
            .collect()
    }

    /// Empty every field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    const fn field_mut(&mut self, field: ShippingField) -> &mut String {
        match field {
            ShippingField::Name => &mut self.name,
            ShippingField::Email => &mut self.email,
            ShippingField::Address => &mut self.address,
            ShippingField::City => &mut self.city,
            ShippingField::Zip => &mut self.zip,
        }
    }
}
