//! Service layer for phone-address bindings.
//! - `storage` defines the key-value capability set and its backends.
//! - `phone_address` maps bindings onto namespaced keys in that store.
//! - Store failures surface as [`errors::StoreError`]; business outcomes are plain values.

pub mod errors;
pub mod phone_address;
pub mod storage;
