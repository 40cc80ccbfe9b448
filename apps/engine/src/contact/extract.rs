//! First-match extraction of contact fields from resume text.
//! First occurrence wins; absence of a field is not an error — that
//! field is simply left out of the contact signal.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap()
});

// US-formatted numbers only: optional +1/1 prefix, then 3-3-4 digit groups
// separated by spaces, dots, dashes or parentheses.
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\+?1?[-.\s]?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});

pub fn first_email(text: &str) -> Option<&str> {
    EMAIL_RE.find(text).map(|m| m.as_str())
}

pub fn first_phone(text: &str) -> Option<&str> {
    PHONE_RE.find(text).map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_email_wins() {
        let text = "Contact: a@one.com or b@two.com";
        assert_eq!(first_email(text), Some("a@one.com"));
    }

    #[test]
    fn test_email_absent() {
        assert_eq!(first_email("John Smith, Portland OR"), None);
    }

    #[test]
    fn test_phone_formats() {
        assert_eq!(first_phone("Call (555) 123-4567 today"), Some("(555) 123-4567"));
        assert_eq!(first_phone("tel: 555.123.4567"), Some("555.123.4567"));
        assert_eq!(first_phone("+1 555 123 4567"), Some("+1 555 123 4567"));
    }

    #[test]
    fn test_phone_absent() {
        assert_eq!(first_phone("no digits here"), None);
    }

    #[test]
    fn test_both_fields_in_resume_header() {
        let text = "John Smith john@tempmail.com (555) 123-4567";
        assert_eq!(first_email(text), Some("john@tempmail.com"));
        assert_eq!(first_phone(text), Some("(555) 123-4567"));
    }
}
