//! Syntactic checks for signup input.

use crate::error::AuthError;

const MAX_EMAIL_LEN: usize = 254;
const MAX_LOCAL_LEN: usize = 64;
const MAX_LABEL_LEN: usize = 63;

/// Printable characters allowed in an unquoted local part besides
/// alphanumerics and dots.
const LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-";

/// Require a name with at least one non-whitespace character.
pub fn validate_name(name: &str) -> Result<(), AuthError> {
    if name.trim().is_empty() {
        return Err(AuthError::validation("name", "must not be empty"));
    }
    Ok(())
}

/// Check that `email` is a syntactically valid address.
///
/// The address is not normalized; it is checked exactly as given.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let invalid = |reason: &str| Err(AuthError::validation("email", reason));

    if email.is_empty() {
        return invalid("must not be empty");
    }
    if email.len() > MAX_EMAIL_LEN {
        return invalid("too long");
    }
    if email.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return invalid("must not contain whitespace");
    }

    let Some((local, domain)) = email.split_once('@') else {
        return invalid("missing '@'");
    };
    if domain.contains('@') {
        return invalid("must contain exactly one '@'");
    }

    if local.is_empty() || local.len() > MAX_LOCAL_LEN {
        return invalid("invalid local part");
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return invalid("invalid local part");
    }
    if !local
        .chars()
        .all(|c| c.is_alphanumeric() || c == '.' || LOCAL_SPECIALS.contains(c))
    {
        return invalid("invalid character in local part");
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return invalid("domain must contain a '.'");
    }
    for label in &labels {
        let valid = !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-');
        if !valid {
            return invalid("invalid domain");
        }
    }

    let tld = labels[labels.len() - 1];
    if tld.chars().count() < 2 || !tld.chars().all(char::is_alphabetic) {
        return invalid("invalid top-level domain");
    }

    Ok(())
}
