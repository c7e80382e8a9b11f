pub mod logging;
pub mod phone;
