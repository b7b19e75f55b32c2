//! WRN parsing and validation.
//!
//! Grammar: `wrn://<authority>[/<path>]`. The authority is a single
//! DNS-label-like token from `[a-z0-9_-]+`; the path is an arbitrary
//! suffix and may be empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::RegistryError;

const SCHEME: &str = "wrn://";

/// A parsed World Resource Name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Wrn {
    pub authority: String,
    pub path: String,
}

impl Wrn {
    pub fn new(authority: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            authority: authority.into(),
            path: path.into(),
        }
    }
}

/// Whether `name` is a well-formed top-level authority label.
pub fn is_valid_authority_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}

impl FromStr for Wrn {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s
            .strip_prefix(SCHEME)
            .ok_or_else(|| RegistryError::InvalidRequest(format!("invalid wrn: {s}")))?;
        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, path),
            None => (rest, ""),
        };
        if !is_valid_authority_name(authority) {
            return Err(RegistryError::InvalidRequest(format!(
                "invalid authority in wrn: {s}"
            )));
        }
        Ok(Wrn::new(authority, path))
    }
}

impl fmt::Display for Wrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{SCHEME}{}", self.authority)
        } else {
            write!(f, "{SCHEME}{}/{}", self.authority, self.path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_with_path() {
        let wrn: Wrn = "wrn://example/sub/path".parse().unwrap();
        assert_eq!(wrn.authority, "example");
        assert_eq!(wrn.path, "sub/path");
        assert_eq!(wrn.to_string(), "wrn://example/sub/path");
    }

    #[test]
    fn test_parse_authority_only() {
        let wrn: Wrn = "wrn://example".parse().unwrap();
        assert_eq!(wrn.authority, "example");
        assert_eq!(wrn.path, "");
        assert_eq!(wrn.to_string(), "wrn://example");
    }

    #[test]
    fn test_rejects_bad_scheme() {
        assert!("http://example".parse::<Wrn>().is_err());
        assert!("example/path".parse::<Wrn>().is_err());
    }

    #[test]
    fn test_rejects_bad_authority() {
        assert!("wrn://".parse::<Wrn>().is_err());
        assert!("wrn://Upper".parse::<Wrn>().is_err());
        assert!("wrn://with.dot/x".parse::<Wrn>().is_err());
    }

    #[test]
    fn test_valid_authority_charset() {
        assert!(is_valid_authority_name("abc-123_x"));
        assert!(!is_valid_authority_name(""));
        assert!(!is_valid_authority_name("a.b"));
        assert!(!is_valid_authority_name("A"));
    }
}
