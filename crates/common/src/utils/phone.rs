//! Phone string helpers.
//!
//! Storage keys are built from phone strings verbatim; nothing in the binding
//! service calls into this module. Callers that want "+7 (999) 123-45-67" and
//! "79991234567" to address the same record normalize before calling the API.

use once_cell::sync::Lazy;
use regex::Regex;

static NON_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D+").expect("static pattern"));

/// Keep only the decimal digits of `phone`, in any script.
pub fn normalize_phone(phone: &str) -> String {
    NON_DIGITS.replace_all(phone, "").into_owned()
}
