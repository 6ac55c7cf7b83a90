//! Numeric ordering prefixes in file names.
//!
//! `01_intro.md` sorts before `02_setup.md` and is listed as `intro`. The
//! prefix may contain digits, `_` and `-` (`2024-01-05_release.md`); only its
//! digits form the order key.

use std::sync::LazyLock;

use regex::Regex;

static PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([\d_-]+)_(.*)$").unwrap());

/// Split a base name into display name and order key.
///
/// Names without a prefix keep their text and get key 0. A prefix that would
/// leave an empty name, or that contains no digits, is not treated as a prefix.
#[must_use]
pub fn strip_order_prefix(name: &str) -> (&str, u64) {
    let Some(caps) = PREFIX.captures(name) else {
        return (name, 0);
    };
    let (Some(prefix), Some(rest)) = (caps.get(1), caps.get(2)) else {
        return (name, 0);
    };
    if rest.as_str().is_empty() {
        return (name, 0);
    }

    let digits: String = prefix.as_str().chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return (name, 0);
    }
    let trimmed = digits.trim_start_matches('0');
    let key = if trimmed.is_empty() {
        0
    } else {
        trimmed.parse().unwrap_or(u64::MAX)
    };
    (rest.as_str(), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_prefix() {
        assert_eq!(strip_order_prefix("01_intro"), ("intro", 1));
        assert_eq!(strip_order_prefix("10_setup-guide"), ("setup-guide", 10));
    }

    #[test]
    fn test_date_prefix_uses_digits_only() {
        assert_eq!(strip_order_prefix("2024-01-05_release"), ("release", 20_240_105));
    }

    #[test]
    fn test_underscore_runs_in_prefix() {
        assert_eq!(strip_order_prefix("01_02_intro"), ("intro", 102));
    }

    #[test]
    fn test_no_prefix() {
        assert_eq!(strip_order_prefix("intro"), ("intro", 0));
        assert_eq!(strip_order_prefix("my_page"), ("my_page", 0));
        assert_eq!(strip_order_prefix("v2_notes"), ("v2_notes", 0));
    }

    #[test]
    fn test_prefix_without_name_kept_verbatim() {
        assert_eq!(strip_order_prefix("01_"), ("01_", 0));
    }

    #[test]
    fn test_zero_and_dash_only() {
        assert_eq!(strip_order_prefix("000_zero"), ("zero", 0));
        assert_eq!(strip_order_prefix("--_x"), ("--_x", 0));
    }

    #[test]
    fn test_overflow_saturates() {
        assert_eq!(
            strip_order_prefix("99999999999999999999999_big"),
            ("big", u64::MAX)
        );
    }
}
