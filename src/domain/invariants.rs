// Copyright (c) 2025 - Cowboy AI, Inc.
//! Pure Validation Functions - Configuration Invariants
//!
//! Flag combinations that make a resource dependency unsatisfiable are
//! rejected here, before any provisioning call. All functions are pure and
//! are evaluated in a fixed precedence: the first violated rule wins.

use super::site_configuration::SiteConfiguration;
use super::site_domain::DomainNameError;

/// Validation result with detailed error information
pub type ValidationResult<T = ()> = Result<T, ValidationError>;

/// Configuration is internally inconsistent
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// TLS requested but no hosted zone can be created or looked up
    #[error("SSL certificate requested but no hosted zone is created or looked up")]
    MissingZoneForCertificate,

    /// CDN requested without an issued or external certificate
    #[error("CDN distribution requested but no certificate is issued or supplied")]
    MissingCertificateForCdn,

    /// Required environment value is empty after defaults are applied
    #[error("Environment variable {0} is not defined")]
    MissingVariable(String),

    /// Domain or sub-domain is not a valid DNS name
    #[error("Invalid domain: {0}")]
    InvalidDomain(#[from] DomainNameError),

    /// Boolean flag could not be parsed
    #[error("Invalid value {value:?} for flag {name}")]
    InvalidFlag { name: String, value: String },
}

/// Whether a hosted zone can be established for the site
///
/// A zone exists when it is created, or when DNS hosting asks for a lookup of
/// an existing one. Issuing a certificate alone does not make a lookup
/// possible.
pub fn zone_obtainable(config: &SiteConfiguration) -> bool {
    config.create_hosted_zone() || config.enable_route53()
}

/// Whether a certificate is available for a CDN distribution
pub fn certificate_available(config: &SiteConfiguration) -> bool {
    config.enable_ssl_cert() || config.external_certificate_arn().is_some()
}

/// Rule 1: a certificate needs a hosted zone for DNS validation
pub fn validate_certificate_zone(config: &SiteConfiguration) -> ValidationResult {
    if config.enable_ssl_cert() && !zone_obtainable(config) {
        return Err(ValidationError::MissingZoneForCertificate);
    }
    Ok(())
}

/// Rule 2: a CDN distribution needs a certificate for its alias
pub fn validate_distribution_certificate(config: &SiteConfiguration) -> ValidationResult {
    if config.enable_cloudfront_distribution() && !certificate_available(config) {
        return Err(ValidationError::MissingCertificateForCdn);
    }
    Ok(())
}

/// Composite validation in rule precedence order
pub fn validate_site_configuration(config: &SiteConfiguration) -> ValidationResult {
    validate_certificate_zone(config)?;
    validate_distribution_certificate(config)?;
    Ok(())
}

/// Parse a boolean flag value
///
/// Accepts `true/false`, `1/0`, `yes/no` (case-insensitive); an empty value
/// is `false`.
pub fn parse_flag(name: &str, value: &str) -> ValidationResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "false" | "0" | "no" => Ok(false),
        "true" | "1" | "yes" => Ok(true),
        _ => Err(ValidationError::InvalidFlag {
            name: name.to_string(),
            value: value.to_string(),
        }),
    }
}
