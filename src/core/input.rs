//! Input boundary - turning raw text fields into item attributes

use miette::Diagnostic;
use thiserror::Error;

use crate::core::entity::ProductInfo;

/// Errors raised while validating user-supplied fields
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum InputError {
    #[error("{field} must not be empty")]
    #[diagnostic(code(whs::input::empty_field), help("fill in all required fields"))]
    EmptyField { field: &'static str },

    #[error("invalid {field}: '{value}' is not a number")]
    #[diagnostic(code(whs::input::invalid_number))]
    InvalidNumericInput { field: &'static str, value: String },
}

/// Trim a required text field, rejecting blank input
pub fn require_text(field: &'static str, value: &str) -> Result<String, InputError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(InputError::EmptyField { field })
    } else {
        Ok(trimmed.to_string())
    }
}

pub fn parse_year(value: &str) -> Result<i32, InputError> {
    value
        .trim()
        .parse()
        .map_err(|_| InputError::InvalidNumericInput {
            field: "year",
            value: value.to_string(),
        })
}

/// Parse a price; NaN and infinities are rejected
pub fn parse_price(value: &str) -> Result<f64, InputError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite())
        .ok_or_else(|| InputError::InvalidNumericInput {
            field: "price",
            value: value.to_string(),
        })
}

/// Raw text as entered for a new item
///
/// Blank numeric fields fall back to the caller-supplied defaults; anything
/// else that fails to parse is an error.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub name: String,
    pub manufacturer: String,
    pub year: String,
    pub price: String,
}

impl ProductForm {
    pub fn into_info(self, default_year: i32, default_price: f64) -> Result<ProductInfo, InputError> {
        let name = require_text("name", &self.name)?;
        let manufacturer = require_text("manufacturer", &self.manufacturer)?;
        let year = if self.year.trim().is_empty() {
            default_year
        } else {
            parse_year(&self.year)?
        };
        let price = if self.price.trim().is_empty() {
            default_price
        } else {
            parse_price(&self.price)?
        };
        Ok(ProductInfo::new(name, manufacturer, year, price))
    }
}
