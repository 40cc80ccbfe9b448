//! Offline contact validators. Deterministic, no I/O: malformed input
//! yields `valid = false`, never an error. These back the cascade's
//! fallback path and are the only verdict when no API key is configured.

/// Syntax-level email check: one `@`, a sane local part, and a dotted
/// domain ending in an alphabetic TLD of at least two characters.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if domain.contains('@') {
        return false; // more than one @
    }

    if local.is_empty()
        || local.len() > 64
        || local.starts_with('.')
        || local.ends_with('.')
        || local.contains("..")
    {
        return false;
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
    {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    for label in &labels {
        if label.is_empty()
            || label.starts_with('-')
            || label.ends_with('-')
            || !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        {
            return false;
        }
    }
    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Result of the offline North American numbering-plan check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPhoneCheck {
    pub valid: bool,
    pub country: Option<String>,
}

/// NANP check for US-formatted numbers: ten digits after stripping
/// punctuation and an optional leading `1` / `+1`, with an area code
/// starting in 2-9.
pub fn check_phone(phone: &str) -> LocalPhoneCheck {
    let mut digits = String::new();
    for c in phone.chars() {
        if c.is_ascii_digit() {
            digits.push(c);
        } else if !matches!(c, ' ' | '-' | '.' | '(' | ')' | '+') {
            return LocalPhoneCheck {
                valid: false,
                country: None,
            };
        }
    }

    let national = match digits.len() {
        11 if digits.starts_with('1') => &digits[1..],
        10 => digits.as_str(),
        _ => {
            return LocalPhoneCheck {
                valid: false,
                country: None,
            }
        }
    };

    let valid = (b'2'..=b'9').contains(&national.as_bytes()[0]);

    LocalPhoneCheck {
        valid,
        country: valid.then(|| "US".to_string()),
    }
}
