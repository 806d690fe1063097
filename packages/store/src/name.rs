//! Validation for collection and resource names.
//!
//! A name maps to exactly one path component under the store root, so anything that would be
//! interpreted as a separator or a relative hop is refused.

use lazy_static::lazy_static;
use regex::Regex;

use crate::{Error, Result};

// Leaves room for the extension and temp suffix within a 255-byte file name.
pub const MAX_NAME_BYTES: usize = 240;

/// Which half of an address a name belongs to. Only used for error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Collection,
    Resource,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameKind::Collection => write!(f, "collection"),
            NameKind::Resource => write!(f, "resource"),
        }
    }
}

pub fn validate_name(kind: NameKind, name: &str) -> Result<()> {
    lazy_static! {
        static ref SINGLE_COMPONENT: Regex = Regex::new(r"^[^/\\\x00]+$").unwrap();
    }

    if name.is_empty() {
        return Err(Error::invalid_argument(format!("Missing {} name", kind)));
    }

    if name.len() > MAX_NAME_BYTES {
        return Err(Error::invalid_argument(format!(
            "The {} name exceeds the max of {} bytes",
            kind, MAX_NAME_BYTES
        )));
    }

    if name == "." || name == ".." || !SINGLE_COMPONENT.is_match(name) {
        return Err(Error::invalid_argument(format!(
            "The {} name {:?} must be a single path component",
            kind, name
        )));
    }

    Ok(())
}

#[cfg(test)]
mod name_tests {
    use super::*;

    #[test]
    fn plain_names_are_accepted() {
        for name in ["users", "alice", "Folake", "order-2024.01", "美麗的", "_private"] {
            assert!(validate_name(NameKind::Resource, name).is_ok(), "{}", name);
        }
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = validate_name(NameKind::Collection, "").unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(format!("{}", err).contains("Missing collection name"));
    }

    #[test]
    fn names_that_leave_their_directory_are_rejected() {
        for name in ["..", ".", "a/b", "../etc", "a\\b", "nul\0byte", "/abs"] {
            let err = validate_name(NameKind::Resource, name).unwrap_err();
            assert!(err.is_invalid_argument(), "{:?}", name);
        }
    }

    #[test]
    fn overlong_names_are_rejected() {
        let name = "x".repeat(MAX_NAME_BYTES + 1);
        assert!(validate_name(NameKind::Resource, &name)
            .unwrap_err()
            .is_invalid_argument());
        assert!(validate_name(NameKind::Resource, &name[1..]).is_ok());
    }
}
