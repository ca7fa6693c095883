//! CPF and CNPJ validation.
//!
//! Numeric identifiers are checked with the two weighted-sum mod 11 check
//! digits. Alphanumeric CNPJs only get a format check for now.

use crate::core::mask::{format_cnpj, format_cpf, only_digits};
use crate::domain::model::{
    DocumentValidation, PersonType, TaxIdKind, TaxIdRejection, TaxIdValidation,
};

const CPF_LEN: usize = 11;
const CNPJ_LEN: usize = 14;

fn to_digits(value: &str) -> Vec<u32> {
    value.chars().filter_map(|c| c.to_digit(10)).collect()
}

fn all_equal(digits: &[u32]) -> bool {
    digits.windows(2).all(|w| w[0] == w[1])
}

/// Weights run from `len + 1` down to 2; `sum * 10 mod 11` with 10 mapped to 0.
fn cpf_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();
    let rest = (sum * 10) % 11;
    if rest >= 10 {
        0
    } else {
        rest
    }
}

/// Weights cycle 2..=9 starting from the rightmost digit.
fn cnpj_digit(digits: &[u32]) -> u32 {
    let sum: u32 = digits
        .iter()
        .rev()
        .zip((2..=9).cycle())
        .map(|(d, w)| d * w)
        .sum();
    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        11 - rest
    }
}

/// Check a CPF, masked or raw, and say why it is invalid.
pub fn check_cpf(value: &str) -> Result<(), TaxIdRejection> {
    let digits = to_digits(value);
    if digits.len() != CPF_LEN {
        return Err(TaxIdRejection::WrongLength {
            expected: CPF_LEN,
            found: digits.len(),
        });
    }
    if all_equal(&digits) {
        return Err(TaxIdRejection::RepeatedDigits);
    }

    let first = cpf_digit(&digits[..9]);
    if first != digits[9] {
        return Err(TaxIdRejection::CheckDigitMismatch);
    }
    let second = cpf_digit(&digits[..10]);
    if second != digits[10] {
        return Err(TaxIdRejection::CheckDigitMismatch);
    }
    Ok(())
}

pub fn validate_cpf(value: &str) -> bool {
    check_cpf(value).is_ok()
}

/// Validate a CNPJ and report whether the check digits were actually verified.
///
/// Only `.`, `-` and `/` are stripped, so letters survive and decide between
/// the numeric path (checksum) and the alphanumeric path (format only).
/// Whitespace is not stripped and counts towards the length.
pub fn validate_cnpj_detailed(value: &str) -> TaxIdValidation {
    let chars: Vec<char> = value
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | '/'))
        .collect();

    if chars.len() != CNPJ_LEN {
        return TaxIdValidation::Rejected(TaxIdRejection::WrongLength {
            expected: CNPJ_LEN,
            found: chars.len(),
        });
    }

    if chars.iter().all(char::is_ascii_digit) {
        let digits: Vec<u32> = chars.iter().filter_map(|c| c.to_digit(10)).collect();
        if all_equal(&digits) {
            return TaxIdValidation::Rejected(TaxIdRejection::RepeatedDigits);
        }
        let first = cnpj_digit(&digits[..12]);
        let second = cnpj_digit(&digits[..13]);
        return if first == digits[12] && second == digits[13] {
            TaxIdValidation::Verified
        } else {
            TaxIdValidation::Rejected(TaxIdRejection::CheckDigitMismatch)
        };
    }

    let (base, check) = chars.split_at(12);
    let base_ok = base
        .iter()
        .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase());
    let check_ok = check.iter().all(char::is_ascii_digit);
    if base_ok && check_ok {
        tracing::debug!("Alphanumeric CNPJ accepted on format only");
        TaxIdValidation::FormatOnly
    } else {
        TaxIdValidation::Rejected(TaxIdRejection::InvalidCharacters)
    }
}

pub fn validate_cnpj(value: &str) -> bool {
    validate_cnpj_detailed(value).is_accepted()
}

fn cpf_outcome(value: &str) -> TaxIdValidation {
    match check_cpf(value) {
        Ok(()) => TaxIdValidation::Verified,
        Err(reason) => TaxIdValidation::Rejected(reason),
    }
}

/// Validate a value typed into a "CPF ou CNPJ" field.
///
/// With a person type the identifier is fixed; without one it is detected from
/// the length (11 for CPF, 14 for CNPJ) or from the presence of letters.
pub fn validate_document(value: &str, person_type: Option<PersonType>) -> DocumentValidation {
    let kind = match person_type {
        Some(pt) => Some(pt.tax_id_kind()),
        None => {
            let cleaned: Vec<char> = value.chars().filter(char::is_ascii_alphanumeric).collect();
            if cleaned.iter().any(char::is_ascii_alphabetic) {
                Some(TaxIdKind::Cnpj)
            } else {
                match cleaned.len() {
                    CPF_LEN => Some(TaxIdKind::Cpf),
                    CNPJ_LEN => Some(TaxIdKind::Cnpj),
                    _ => None,
                }
            }
        }
    };

    let outcome = match kind {
        Some(TaxIdKind::Cpf) => cpf_outcome(value),
        Some(TaxIdKind::Cnpj) => validate_cnpj_detailed(value),
        None => TaxIdValidation::Rejected(TaxIdRejection::UnrecognizedLength {
            found: only_digits(value).len(),
        }),
    };

    DocumentValidation { kind, outcome }
}

/// Compute the two check digits for a 9-digit CPF base.
pub fn cpf_check_digits(base: &str) -> Result<[u32; 2], TaxIdRejection> {
    let mut digits = to_digits(base);
    if digits.len() != 9 {
        return Err(TaxIdRejection::WrongLength {
            expected: 9,
            found: digits.len(),
        });
    }
    let first = cpf_digit(&digits);
    digits.push(first);
    let second = cpf_digit(&digits);
    Ok([first, second])
}

/// Compute the two check digits for a 12-digit numeric CNPJ base.
pub fn cnpj_check_digits(base: &str) -> Result<[u32; 2], TaxIdRejection> {
    let mut digits = to_digits(base);
    if digits.len() != 12 {
        return Err(TaxIdRejection::WrongLength {
            expected: 12,
            found: digits.len(),
        });
    }
    let first = cnpj_digit(&digits);
    digits.push(first);
    let second = cnpj_digit(&digits);
    Ok([first, second])
}

/// Append the check digits to a CPF base and return it masked.
pub fn complete_cpf(base: &str) -> Result<String, TaxIdRejection> {
    let [first, second] = cpf_check_digits(base)?;
    Ok(format_cpf(&format!("{}{}{}", only_digits(base), first, second)))
}

/// Append the check digits to a CNPJ base and return it masked.
pub fn complete_cnpj(base: &str) -> Result<String, TaxIdRejection> {
    let [first, second] = cnpj_check_digits(base)?;
    Ok(format_cnpj(&format!("{}{}{}", only_digits(base), first, second)))
}
