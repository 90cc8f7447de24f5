// Copyright (c) 2025 - Cowboy AI, Inc.
//! Domain Name and Site Domain Value Objects
//!
//! [`DomainName`] carries the DNS validation invariants; [`SiteDomain`] is the
//! canonical identity derived from an optional sub-domain and a domain name.
//! The site domain names the content bucket, the logging bucket, the
//! certificate, the distribution alias and the DNS record.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Domain name validation error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainNameError {
    #[error("Domain name is empty")]
    Empty,

    #[error("Domain name exceeds maximum length of 253 characters: {0}")]
    TooLong(usize),

    #[error("Label exceeds maximum length of 63 characters: {0}")]
    LabelTooLong(String),

    #[error("Invalid character in domain name: {0}")]
    InvalidCharacter(char),

    #[error("Label cannot start or end with hyphen: {0}")]
    InvalidLabelFormat(String),

    #[error("Top-level label cannot be all numeric: {0}")]
    NumericTopLevel(String),
}

/// DNS domain name value object
///
/// Invariants (RFC 1123):
/// - Total length ≤ 253 characters
/// - Each label ≤ 63 characters, non-empty
/// - Labels contain only ASCII alphanumerics and hyphens
/// - Labels cannot start or end with hyphens
/// - The top-level label cannot be all numeric
///
/// Stored lower-cased so that bucket and record names are stable.
///
/// # Examples
///
/// ```rust
/// use static_site_infrastructure::domain::DomainName;
///
/// let domain = DomainName::new("Example.COM").unwrap();
/// assert_eq!(domain.as_str(), "example.com");
///
/// assert!(DomainName::new("").is_err());
/// assert!(DomainName::new("-bad.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Maximum total length (RFC 1123)
    pub const MAX_LENGTH: usize = 253;

    /// Maximum length of a single label (RFC 1123)
    pub const MAX_LABEL_LENGTH: usize = 63;

    /// Create a validated, lower-cased domain name
    pub fn new(name: impl AsRef<str>) -> Result<Self, DomainNameError> {
        let name = name.as_ref().trim().to_ascii_lowercase();

        if name.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(DomainNameError::TooLong(name.len()));
        }

        for label in name.split('.') {
            Self::validate_label(label)?;
        }

        if let Some(tld) = name.rsplit('.').next() {
            if name.contains('.') && tld.chars().all(|c| c.is_ascii_digit()) {
                return Err(DomainNameError::NumericTopLevel(tld.to_string()));
            }
        }

        Ok(Self(name))
    }

    fn validate_label(label: &str) -> Result<(), DomainNameError> {
        if label.is_empty() {
            return Err(DomainNameError::Empty);
        }

        if label.len() > Self::MAX_LABEL_LENGTH {
            return Err(DomainNameError::LabelTooLong(label.to_string()));
        }

        if let Some(ch) = label
            .chars()
            .find(|ch| !ch.is_ascii_alphanumeric() && *ch != '-')
        {
            return Err(DomainNameError::InvalidCharacter(ch));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(DomainNameError::InvalidLabelFormat(label.to_string()));
        }

        Ok(())
    }

    /// Get the domain name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Labels from left to right
    pub fn labels(&self) -> Vec<&str> {
        self.0.split('.').collect()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for DomainName {
    type Error = DomainNameError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

/// Canonical site identity: `join('.', [sub_domain, domain_name])` with empty
/// parts dropped
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteDomain(DomainName);

impl SiteDomain {
    /// Derive the site domain from a domain and an optional sub-domain
    ///
    /// A missing sub-domain, an empty one and a whitespace-only one all yield
    /// the bare domain name.
    pub fn derive(domain_name: &DomainName, sub_domain: Option<&str>) -> Result<Self, DomainNameError> {
        let joined = [sub_domain.map(str::trim).unwrap_or(""), domain_name.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(".");

        DomainName::new(joined).map(Self)
    }

    /// Get the site domain as a string slice
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Name of the access-log bucket for this site
    pub fn logging_bucket_name(&self) -> String {
        format!("{}-logging", self.0)
    }

    pub fn domain_name(&self) -> &DomainName {
        &self.0
    }
}

impl fmt::Display for SiteDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl AsRef<str> for SiteDomain {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}
