// File: redactum-core/src/validators.rs
//! Programmatic checks applied to regex matches before they become spans.
//!
//! A regex alone over-matches for structured identifiers; these checks drop
//! candidates that cannot be real (failed checksum, reserved ranges).
//!
//! License: MIT OR APACHE 2.0

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// The validator a rule is bound to, selected from the rule name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    Luhn,
    UsSsn,
    UkNino,
}

impl Validator {
    pub fn for_rule(rule_name: &str) -> Option<Self> {
        match rule_name {
            "credit_card" | "visa_card" | "mastercard_card" | "amex_card" | "discover_card" => {
                Some(Validator::Luhn)
            }
            "us_ssn" => Some(Validator::UsSsn),
            "uk_nino" => Some(Validator::UkNino),
            _ => None,
        }
    }

    pub fn check(self, candidate: &str) -> bool {
        match self {
            Validator::Luhn => is_valid_credit_card(candidate),
            Validator::UsSsn => is_valid_ssn(candidate),
            Validator::UkNino => is_valid_uk_nino(candidate),
        }
    }
}

/// Validates a US SSN in `AAA-GG-SSSS` form against the reserved ranges.
pub fn is_valid_ssn(ssn: &str) -> bool {
    let parts: Vec<&str> = ssn.split('-').collect();
    let [area, group, serial] = parts.as_slice() else {
        return false;
    };
    if area.len() != 3 || group.len() != 2 || serial.len() != 4 {
        return false;
    }
    let (Ok(area), Ok(group), Ok(serial)) = (area.parse::<u16>(), group.parse::<u8>(), serial.parse::<u16>()) else {
        return false;
    };

    area != 0 && area != 666 && area < 900 && group != 0 && serial != 0
}

static INVALID_NINO_PREFIXES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    ["BG", "GB", "KN", "NK", "NT", "TN", "ZZ"].into_iter().collect()
});

/// Validates a UK National Insurance Number (`AA999999A`, spaces allowed).
pub fn is_valid_uk_nino(nino: &str) -> bool {
    let compact: String = nino
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();
    let chars: Vec<char> = compact.chars().collect();
    if chars.len() != 9 {
        return false;
    }

    let (first, second) = (chars[0], chars[1]);
    if !first.is_ascii_alphabetic() || !second.is_ascii_alphabetic() {
        return false;
    }
    if "DFIQUV".contains(first) || "DFIQUVO".contains(second) {
        return false;
    }
    if INVALID_NINO_PREFIXES.contains(&compact[0..2]) {
        return false;
    }

    chars[2..8].iter().all(|c| c.is_ascii_digit()) && matches!(chars[8], 'A'..='D')
}

/// Mod-10 checksum over a string of ASCII digits.
pub fn is_valid_luhn(digits: &str) -> bool {
    let mut sum = 0;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

/// Strips separators and applies the Luhn check to a 13-19 digit number.
pub fn is_valid_credit_card(candidate: &str) -> bool {
    let digits: String = candidate.chars().filter(|c| c.is_ascii_digit()).collect();
    (13..=19).contains(&digits.len()) && is_valid_luhn(&digits)
}
