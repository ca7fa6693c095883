use crate::core::mask::only_digits;
use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

pub fn validate_email_format(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 10 digits for a landline, 11 for a mobile.
pub fn validate_phone_format(phone: &str) -> bool {
    matches!(only_digits(phone).len(), 10 | 11)
}

pub fn validate_cep_format(cep: &str) -> bool {
    only_digits(cep).len() == 8
}
