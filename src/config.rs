// Copyright (c) 2025 - Cowboy AI, Inc.
//! Environment Configuration
//!
//! Named string values the deployment reads from the process environment.
//! Empty values fall back to their defaults; [`EnvironmentConfig::validate`]
//! then rejects anything still empty, once, before any resource is composed.

use serde::Serialize;

use crate::domain::invariants::parse_flag;
use crate::domain::{SiteConfiguration, ValidationError, ValidationResult};

pub const REGION: &str = "REGION";
pub const WEBSITE_NAME: &str = "WEBSITE_NAME";
pub const BUCKET_NAME: &str = "BUCKET_NAME";
pub const DOMAIN_NAME: &str = "DOMAIN_NAME";
pub const SUB_DOMAIN_NAME: &str = "SUB_DOMAIN_NAME";
pub const REPO_OWNER: &str = "REPO_OWNER";
pub const REPO_NAME: &str = "REPO_NAME";
pub const BUILD_BRANCH_NAME: &str = "BUILD_BRANCH_NAME";
pub const BUILD_BRANCH: &str = "BUILD_BRANCH";

pub const ENABLE_LOGGING_ACCESS: &str = "ENABLE_LOGGING_ACCESS";
pub const CREATE_HOSTED_ZONE: &str = "CREATE_HOSTED_ZONE";
pub const ENABLE_ROUTE53: &str = "ENABLE_ROUTE53";
pub const ENABLE_SSL_CERT: &str = "ENABLE_SSL_CERT";
pub const ENABLE_CLOUDFRONT_DIST: &str = "ENABLE_CLOUDFRONT_DIST";
pub const SSL_CERT_ARN: &str = "SSL_CERT_ARN";
pub const HOSTED_ZONE_ID: &str = "HOSTED_ZONE_ID";

/// Feature flags controlling the optional resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub enable_logging_access: bool,
    pub create_hosted_zone: bool,
    pub enable_route53: bool,
    pub enable_ssl_cert: bool,
    pub enable_cloudfront_distribution: bool,
}

/// Values loaded from the environment, defaults applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentConfig {
    pub region: String,
    pub website_name: String,
    /// Validated for presence only; bucket names derive from the site domain
    pub bucket_name: String,
    pub domain_name: String,
    pub sub_domain_name: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub build_branch_name: String,
    /// Head ref pattern that triggers builds
    pub build_branch: String,
    pub flags: FeatureFlags,
    pub ssl_cert_arn: Option<String>,
    /// Zone id to resolve `domain_name` lookups against
    pub hosted_zone_id: Option<String>,
}

impl EnvironmentConfig {
    /// Load from the process environment
    pub fn from_env() -> ValidationResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through `lookup`, applying defaults to missing or empty values
    ///
    /// # Errors
    /// - `ValidationError::InvalidFlag` for an unparseable feature flag
    pub fn from_lookup<F>(lookup: F) -> ValidationResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());
        let or_default = |name: &str, default: &str| {
            non_empty(name).unwrap_or_else(|| default.to_string())
        };
        let flag = |name: &str| match lookup(name) {
            Some(value) => parse_flag(name, &value),
            None => Ok(false),
        };

        Ok(Self {
            region: or_default(REGION, "us-east-1"),
            website_name: or_default(WEBSITE_NAME, ""),
            bucket_name: or_default(BUCKET_NAME, "temp-static-8784"),
            domain_name: or_default(DOMAIN_NAME, "blitz.tyro.cloud"),
            sub_domain_name: or_default(SUB_DOMAIN_NAME, "cdk"),
            repo_owner: or_default(REPO_OWNER, "engmoustafa"),
            repo_name: or_default(REPO_NAME, "learn-e2e-web"),
            build_branch_name: or_default(BUILD_BRANCH_NAME, "main"),
            build_branch: or_default(BUILD_BRANCH, "^refs/heads/main$"),
            flags: FeatureFlags {
                enable_logging_access: flag(ENABLE_LOGGING_ACCESS)?,
                create_hosted_zone: flag(CREATE_HOSTED_ZONE)?,
                enable_route53: flag(ENABLE_ROUTE53)?,
                enable_ssl_cert: flag(ENABLE_SSL_CERT)?,
                enable_cloudfront_distribution: flag(ENABLE_CLOUDFRONT_DIST)?,
            },
            ssl_cert_arn: non_empty(SSL_CERT_ARN),
            hosted_zone_id: non_empty(HOSTED_ZONE_ID),
        })
    }

    /// Named values in declaration order
    pub fn variables(&self) -> [(&'static str, &str); 9] {
        [
            (REGION, self.region.as_str()),
            (WEBSITE_NAME, self.website_name.as_str()),
            (BUCKET_NAME, self.bucket_name.as_str()),
            (DOMAIN_NAME, self.domain_name.as_str()),
            (SUB_DOMAIN_NAME, self.sub_domain_name.as_str()),
            (REPO_OWNER, self.repo_owner.as_str()),
            (REPO_NAME, self.repo_name.as_str()),
            (BUILD_BRANCH_NAME, self.build_branch_name.as_str()),
            (BUILD_BRANCH, self.build_branch.as_str()),
        ]
    }

    /// Fail on the first value still empty after defaults
    pub fn validate(&self) -> ValidationResult {
        match self
            .variables()
            .iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            Some((name, _)) => Err(ValidationError::MissingVariable(name.to_string())),
            None => Ok(()),
        }
    }

    /// Site configuration for the domain, sub-domain and flags
    pub fn site_configuration(&self) -> ValidationResult<SiteConfiguration> {
        let mut builder = SiteConfiguration::builder(self.domain_name.clone())
            .sub_domain(self.sub_domain_name.clone())
            .enable_logging_access(self.flags.enable_logging_access)
            .create_hosted_zone(self.flags.create_hosted_zone)
            .enable_route53(self.flags.enable_route53)
            .enable_ssl_cert(self.flags.enable_ssl_cert)
            .enable_cloudfront_distribution(self.flags.enable_cloudfront_distribution);
        if let Some(arn) = &self.ssl_cert_arn {
            builder = builder.external_certificate_arn(arn.clone());
        }
        builder.build()
    }
}
