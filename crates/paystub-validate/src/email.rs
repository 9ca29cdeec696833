//! Email address syntax checking.
//!
//! Pragmatic RFC 5322 subset: one `@`, a dot-atom local part, and a dotted
//! domain of letter/digit/hyphen labels. Each violation carries a distinct
//! reason so batch rejections can say *why* an address was refused.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static LOCAL_ATOM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+$").expect("valid pattern"));

static DOMAIN_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]*[A-Za-z0-9])?$").expect("valid pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailSyntaxError {
    #[error("address is empty")]
    Empty,
    #[error("address contains whitespace")]
    Whitespace,
    #[error("missing '@' separator")]
    MissingAt,
    #[error("more than one '@' separator")]
    MultipleAt,
    #[error("empty part before '@'")]
    EmptyLocal,
    #[error("invalid characters in part before '@'")]
    InvalidLocal,
    #[error("empty domain after '@'")]
    EmptyDomain,
    #[error("domain has no dot")]
    DomainWithoutDot,
    #[error("invalid domain label '{0}'")]
    InvalidDomainLabel(String),
}

/// Check one address, returning the first violation found.
pub fn check_email(raw: &str) -> Result<(), EmailSyntaxError> {
    if raw.is_empty() {
        return Err(EmailSyntaxError::Empty);
    }
    if raw.chars().any(char::is_whitespace) {
        return Err(EmailSyntaxError::Whitespace);
    }

    let mut parts = raw.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let Some(domain) = parts.next() else {
        return Err(EmailSyntaxError::MissingAt);
    };
    if domain.contains('@') {
        return Err(EmailSyntaxError::MultipleAt);
    }

    if local.is_empty() {
        return Err(EmailSyntaxError::EmptyLocal);
    }
    for atom in local.split('.') {
        // An empty atom means a leading, trailing, or doubled dot.
        if atom.is_empty() || !LOCAL_ATOM.is_match(atom) {
            return Err(EmailSyntaxError::InvalidLocal);
        }
    }

    if domain.is_empty() {
        return Err(EmailSyntaxError::EmptyDomain);
    }
    if !domain.contains('.') {
        return Err(EmailSyntaxError::DomainWithoutDot);
    }
    for label in domain.split('.') {
        if !DOMAIN_LABEL.is_match(label) {
            return Err(EmailSyntaxError::InvalidDomainLabel(label.to_string()));
        }
    }

    Ok(())
}
