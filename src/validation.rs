//! Client-side checks mirroring the API's own shipment rules.

use crate::models::{Address, Currency, PackageType, Shipment};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Longest `person` value the API accepts.
pub const MAX_PERSON_LEN: usize = 40;

/// EU member states whose destinations need a postal code. Ireland is left
/// out: many Irish addresses have none.
const POSTAL_CODE_COUNTRIES: &[&str] = &[
    "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU", "IT",
    "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
];

/// Countries where the house number must be given separately.
const HOUSE_NUMBER_COUNTRIES: &[&str] = &["NL", "BE"];

static DUTCH_POSTAL_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[1-9][0-9]{3}\s?[A-Za-z]{2}$").expect("postal code pattern"));

/// A shipment the API would reject.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: country code must be two uppercase letters, got {value:?}")]
    InvalidCountryCode { field: &'static str, value: String },

    #[error("{field}: required field {name} is empty")]
    MissingField {
        field: &'static str,
        name: &'static str,
    },

    #[error("{field}: person is {len} characters, at most {max} allowed", max = MAX_PERSON_LEN)]
    PersonTooLong { field: &'static str, len: usize },

    #[error("{field}: postal code {value:?} is not a valid Dutch postal code")]
    InvalidPostalCode { field: &'static str, value: String },

    #[error("delivery_type requires delivery_date")]
    DeliveryTypeWithoutDate,

    #[error("delivery_date requires delivery_type")]
    DeliveryDateWithoutType,

    #[error("package type {package_type:?} does not support options: {options:?}")]
    OptionsNotAllowed {
        package_type: PackageType,
        options: Vec<&'static str>,
    },

    #[error("insurance amount must be greater than zero")]
    ZeroInsurance,

    #[error("insurance currency {0} is not accepted")]
    UnsupportedCurrency(String),
}

impl Shipment {
    /// Check the shipment against the rules the API enforces.
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_address("recipient", &self.recipient)?;
        if let Some(sender) = &self.sender {
            validate_address("sender", sender)?;
        }

        let options = &self.options;
        match (options.delivery_type.is_some(), options.delivery_date.is_zero()) {
            (true, true) => return Err(ValidationError::DeliveryTypeWithoutDate),
            (false, false) => return Err(ValidationError::DeliveryDateWithoutType),
            _ => {}
        }

        if !options.package_type.allows_additional_options() {
            let paid = options.paid_options();
            if !paid.is_empty() {
                return Err(ValidationError::OptionsNotAllowed {
                    package_type: options.package_type,
                    options: paid,
                });
            }
        }

        if let Some(insurance) = &options.insurance {
            if insurance.amount == 0 {
                return Err(ValidationError::ZeroInsurance);
            }
            if let Currency::Other(code) = &insurance.currency {
                return Err(ValidationError::UnsupportedCurrency(code.clone()));
            }
        }

        Ok(())
    }
}

fn validate_address(field: &'static str, address: &Address) -> Result<(), ValidationError> {
    let cc = address.cc.as_str();
    if cc.len() != 2 || !cc.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidCountryCode {
            field,
            value: address.cc.clone(),
        });
    }

    for (name, value) in [
        ("city", &address.city),
        ("street", &address.street),
        ("person", &address.person),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField { field, name });
        }
    }

    let len = address.person.chars().count();
    if len > MAX_PERSON_LEN {
        return Err(ValidationError::PersonTooLong { field, len });
    }

    if HOUSE_NUMBER_COUNTRIES.contains(&cc) && is_blank(address.number.as_deref()) {
        return Err(ValidationError::MissingField {
            field,
            name: "number",
        });
    }

    if POSTAL_CODE_COUNTRIES.contains(&cc) {
        match address.postal_code.as_deref() {
            Some(code) if !code.trim().is_empty() => {
                if cc == "NL" && !DUTCH_POSTAL_CODE.is_match(code.trim()) {
                    return Err(ValidationError::InvalidPostalCode {
                        field,
                        value: code.to_string(),
                    });
                }
            }
            _ => {
                return Err(ValidationError::MissingField {
                    field,
                    name: "postal_code",
                });
            }
        }
    }

    Ok(())
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
