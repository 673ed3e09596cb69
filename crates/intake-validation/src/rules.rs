//! Field rules
//!
//! Pure functions with no side effects. Every rule trims its input first and
//! reports the first violation it finds for that field.

use chrono::{DateTime, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

/// Longest email address accepted
pub const EMAIL_MAX_LEN: usize = 254;
/// Name length bounds, in characters
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
/// Address length bounds, in characters
pub const ADDRESS_MIN_LEN: usize = 10;
pub const ADDRESS_MAX_LEN: usize = 500;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern is valid")
});

static PHONE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?[1-9][0-9]{0,15}$|^\+?\(?[0-9\s\-()]{10,20}$")
        .expect("phone pattern is valid")
});

/// Why a field value was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    /// Empty or whitespace only
    Missing,
    /// Shorter than the rule allows
    TooShort { min: usize },
    /// Longer than the rule allows
    TooLong { max: usize },
    /// Characters or shape not accepted
    InvalidFormat,
    /// Date before today
    InPast,
}

/// Length bounds for free-text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBounds {
    pub min: usize,
    pub max: usize,
}

impl TextBounds {
    #[inline]
    #[must_use]
    pub const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }
}

impl Default for TextBounds {
    fn default() -> Self {
        Self::new(0, 500)
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Non-empty after trim
pub fn validate_required(input: &str) -> Result<(), Violation> {
    if input.trim().is_empty() {
        Err(Violation::Missing)
    } else {
        Ok(())
    }
}

/// Email address check
///
/// Rejects blank input before any pattern match, then anything longer than
/// [`EMAIL_MAX_LEN`], then anything not shaped `local@label(.label)*` with
/// hostname labels of at most 63 characters.
pub fn validate_email(input: &str) -> Result<(), Violation> {
    let email = input.trim();
    if email.is_empty() {
        return Err(Violation::Missing);
    }
    if char_len(email) > EMAIL_MAX_LEN {
        return Err(Violation::InvalidFormat);
    }
    if !EMAIL_PATTERN.is_match(email) {
        return Err(Violation::InvalidFormat);
    }
    Ok(())
}

#[inline]
#[must_use]
pub fn is_valid_email(input: &str) -> bool {
    validate_email(input).is_ok()
}

fn is_name_letter(c: char) -> bool {
    c.is_ascii_alphabetic()
        || matches!(
            c,
            '\u{00C0}'..='\u{00D6}'
                | '\u{00D8}'..='\u{00F6}'
                | '\u{00F8}'..='\u{024F}'
                | '\u{1E00}'..='\u{1EFF}'
        )
}

fn is_name_punct(c: char) -> bool {
    matches!(c, '-' | '\'' | '.')
}

/// Personal name check
pub fn validate_name(input: &str) -> Result<(), Violation> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Violation::Missing);
    }
    let len = char_len(name);
    if len < NAME_MIN_LEN {
        return Err(Violation::TooShort { min: NAME_MIN_LEN });
    }
    if len > NAME_MAX_LEN {
        return Err(Violation::TooLong { max: NAME_MAX_LEN });
    }
    if !name
        .chars()
        .all(|c| is_name_letter(c) || is_name_punct(c) || c == ' ')
    {
        return Err(Violation::InvalidFormat);
    }

    let chars: Vec<char> = name.chars().collect();
    // "  " and runs like "--" or ".'" read as typos, not names
    let has_bad_run = chars.windows(2).any(|pair| {
        (pair[0] == ' ' && pair[1] == ' ') || (is_name_punct(pair[0]) && is_name_punct(pair[1]))
    });
    if has_bad_run {
        return Err(Violation::InvalidFormat);
    }

    let starts_or_ends_with_punct = chars.first().copied().is_some_and(is_name_punct)
        || chars.last().copied().is_some_and(is_name_punct);
    if starts_or_ends_with_punct {
        return Err(Violation::InvalidFormat);
    }

    Ok(())
}

#[inline]
#[must_use]
pub fn is_valid_name(input: &str) -> bool {
    validate_name(input).is_ok()
}

/// Phone number check
///
/// Whitespace, dashes and parentheses are formatting; the remaining digits
/// (with an optional leading `+`) decide validity.
pub fn validate_phone(input: &str) -> Result<(), Violation> {
    let phone = input.trim();
    if phone.is_empty() {
        return Err(Violation::Missing);
    }
    let stripped: String = phone
        .chars()
        .filter(|c| !(c.is_whitespace() || matches!(c, '-' | '(' | ')')))
        .collect();
    if PHONE_PATTERN.is_match(&stripped) {
        Ok(())
    } else {
        Err(Violation::InvalidFormat)
    }
}

#[inline]
#[must_use]
pub fn is_valid_phone(input: &str) -> bool {
    validate_phone(input).is_ok()
}

/// Street address check
pub fn validate_address(input: &str) -> Result<(), Violation> {
    let address = input.trim();
    if address.is_empty() {
        return Err(Violation::Missing);
    }
    let len = char_len(address);
    if len < ADDRESS_MIN_LEN {
        return Err(Violation::TooShort {
            min: ADDRESS_MIN_LEN,
        });
    }
    if len > ADDRESS_MAX_LEN {
        return Err(Violation::TooLong {
            max: ADDRESS_MAX_LEN,
        });
    }
    Ok(())
}

/// Bounded free text check
pub fn validate_text(input: &str, bounds: TextBounds) -> Result<(), Violation> {
    let text = input.trim();
    if text.is_empty() {
        return Err(Violation::Missing);
    }
    let len = char_len(text);
    if len < bounds.min {
        return Err(Violation::TooShort { min: bounds.min });
    }
    if len > bounds.max {
        return Err(Violation::TooLong { max: bounds.max });
    }
    Ok(())
}

/// Parse a date input: `YYYY-MM-DD`, or the date part of an RFC 3339 timestamp
#[must_use]
pub fn parse_service_date(input: &str) -> Option<NaiveDate> {
    let raw = input.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Service date check; `today` is included
pub fn validate_service_date(input: &str, today: NaiveDate) -> Result<(), Violation> {
    if input.trim().is_empty() {
        return Err(Violation::Missing);
    }
    let date = parse_service_date(input).ok_or(Violation::InvalidFormat)?;
    if date < today {
        return Err(Violation::InPast);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn email_accepts_common_shapes() {
        assert!(is_valid_email("ann@example.com"));
        assert!(is_valid_email("first.last+tag@mail.example.co.ke"));
        assert!(is_valid_email("  padded@example.com  "));
    }

    #[test]
    fn email_rejects_blank_before_pattern() {
        assert_eq!(validate_email(""), Err(Violation::Missing));
        assert_eq!(validate_email("   "), Err(Violation::Missing));
    }

    #[test]
    fn email_rejects_bad_shapes() {
        for bad in ["ann", "ann@", "@example.com", "ann@-example.com", "ann@example-.com", "a b@example.com", "ann@exa_mple.com"] {
            assert_eq!(validate_email(bad), Err(Violation::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn email_rejects_long_labels() {
        let label = "a".repeat(64);
        assert!(!is_valid_email(&format!("ann@{label}.com")));
        let label = "a".repeat(63);
        assert!(is_valid_email(&format!("ann@{label}.com")));
    }

    #[test]
    fn email_length_limit() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(long.len() > EMAIL_MAX_LEN);
        assert_eq!(validate_email(&long), Err(Violation::InvalidFormat));

        let at_limit = format!("{}@example.com", "a".repeat(EMAIL_MAX_LEN - 12));
        assert_eq!(at_limit.len(), EMAIL_MAX_LEN);
        assert!(is_valid_email(&at_limit));
    }

    #[test]
    fn name_accepts_real_names() {
        for ok in ["Ann", "Lee", "Mary-Jane", "O'Neil", "J. R. Smith", "Zoë", "Łukasz", "José Álvarez", "Nguyễn"] {
            assert!(is_valid_name(ok), "{ok}");
        }
    }

    #[test]
    fn name_length_bounds() {
        assert_eq!(validate_name("A"), Err(Violation::TooShort { min: 2 }));
        assert_eq!(validate_name(&"a".repeat(51)), Err(Violation::TooLong { max: 50 }));
        assert!(is_valid_name(&"a".repeat(50)));
        assert_eq!(validate_name("  "), Err(Violation::Missing));
    }

    #[test]
    fn name_rejects_digits_symbols_and_runs() {
        for bad in ["Ann2", "Ann_Lee", "Ann×Lee", "Ann  Lee", "Ann--Lee", "Ann.-Lee", "-Ann", "Ann.", "'Ann", "Ann\tLee"] {
            assert_eq!(validate_name(bad), Err(Violation::InvalidFormat), "{bad}");
        }
    }

    #[test]
    fn phone_accepts_formatted_and_international() {
        for ok in ["0712345678", "+254 712 345 678", "(020) 123-4567", "+1 (555) 010-9999", "5"] {
            assert!(is_valid_phone(ok), "{ok}");
        }
    }

    #[test]
    fn phone_rejects_letters_and_overlong() {
        assert_eq!(validate_phone(""), Err(Violation::Missing));
        assert!(!is_valid_phone("call me"));
        assert!(!is_valid_phone("12345abc"));
        assert!(!is_valid_phone(&"9".repeat(21)));
        assert!(!is_valid_phone("++254712345678"));
    }

    #[test]
    fn address_bounds() {
        assert_eq!(validate_address(""), Err(Violation::Missing));
        assert_eq!(validate_address("Short st"), Err(Violation::TooShort { min: 10 }));
        assert!(validate_address("12 Ngong Road, Nairobi").is_ok());
        assert_eq!(validate_address(&"x".repeat(501)), Err(Violation::TooLong { max: 500 }));
    }

    #[test]
    fn text_bounds() {
        let bounds = TextBounds::new(10, 1000);
        assert_eq!(validate_text("hi", bounds), Err(Violation::TooShort { min: 10 }));
        assert!(validate_text("Need a quote", bounds).is_ok());
        assert_eq!(validate_text("   ", TextBounds::default()), Err(Violation::Missing));
        assert_eq!(validate_text(&"x".repeat(501), TextBounds::default()), Err(Violation::TooLong { max: 500 }));
    }

    #[test]
    fn service_date_today_is_accepted() {
        let today = day(2026, 3, 14);
        assert!(validate_service_date("2026-03-14", today).is_ok());
        assert!(validate_service_date("2026-03-15", today).is_ok());
        assert_eq!(validate_service_date("2026-03-13", today), Err(Violation::InPast));
    }

    #[test]
    fn service_date_formats() {
        let today = day(2026, 3, 14);
        assert_eq!(validate_service_date("", today), Err(Violation::Missing));
        assert_eq!(validate_service_date("next tuesday", today), Err(Violation::InvalidFormat));
        assert_eq!(parse_service_date("2026-03-20T09:00:00+03:00"), Some(day(2026, 3, 20)));
    }
}
