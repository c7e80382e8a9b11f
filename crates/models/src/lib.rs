pub mod errors;
pub mod phone_address;
