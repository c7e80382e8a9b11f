//! Data contracts for phone-address bindings.
//!
//! Lengths are counted in characters, not bytes, so a Cyrillic address of
//! 1024 letters is accepted even though it is twice as long in UTF-8.

use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const PHONE_MIN_LEN: usize = 3;
pub const PHONE_MAX_LEN: usize = 64;
pub const ADDRESS_MIN_LEN: usize = 1;
pub const ADDRESS_MAX_LEN: usize = 1024;

/// A stored binding, as returned by reads and successful writes.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneAddress {
    pub phone: String,
    pub address: String,
}

impl PhoneAddress {
    pub fn new(phone: impl Into<String>, address: impl Into<String>) -> Self {
        Self { phone: phone.into(), address: address.into() }
    }
}

/// Body of a create request. The phone string is used verbatim as the key.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneAddressCreate {
    pub phone: String,
    pub address: String,
}

impl PhoneAddressCreate {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_len("phone", &self.phone, PHONE_MIN_LEN, PHONE_MAX_LEN)?;
        check_len("address", &self.address, ADDRESS_MIN_LEN, ADDRESS_MAX_LEN)
    }
}

impl From<PhoneAddressCreate> for PhoneAddress {
    fn from(input: PhoneAddressCreate) -> Self {
        Self { phone: input.phone, address: input.address }
    }
}

/// Body of an update request; only the address can change.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PhoneAddressUpdate {
    pub address: String,
}

impl PhoneAddressUpdate {
    pub fn validate(&self) -> Result<(), ModelError> {
        check_len("address", &self.address, ADDRESS_MIN_LEN, ADDRESS_MAX_LEN)
    }
}

/// Error body shared by every non-2xx response.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub detail: String,
}

fn check_len(field: &str, value: &str, min: usize, max: usize) -> Result<(), ModelError> {
    let len = value.chars().count();
    if len < min {
        return Err(ModelError::Validation(format!(
            "{field} must be at least {min} characters long"
        )));
    }
    if len > max {
        return Err(ModelError::Validation(format!(
            "{field} must be at most {max} characters long"
        )));
    }
    Ok(())
}
