//! Shared building blocks for the phone address workspace:
//! wire types used by more than one crate, logging setup and small helpers.

pub mod types;
pub mod utils;
