pub mod service;

pub use service::{make_key, PhoneAddressService, KEY_PREFIX};
