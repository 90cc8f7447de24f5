// Copyright (c) 2025 - Cowboy AI, Inc.
//! Site Configuration
//!
//! Immutable feature-flag configuration for one static-site deployment. The
//! site domain is derived once at construction and reused everywhere.

use serde::Serialize;

use super::invariants::ValidationResult;
use super::site_domain::{DomainName, SiteDomain};

/// Feature flags and names controlling which optional resources exist
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteConfiguration {
    domain_name: DomainName,
    sub_domain: Option<String>,
    enable_logging_access: bool,
    create_hosted_zone: bool,
    enable_route53: bool,
    enable_ssl_cert: bool,
    enable_cloudfront_distribution: bool,
    external_certificate_arn: Option<String>,
    site_domain: SiteDomain,
}

impl SiteConfiguration {
    /// Start building a configuration for `domain_name`
    pub fn builder(domain_name: impl Into<String>) -> SiteConfigurationBuilder {
        SiteConfigurationBuilder::new(domain_name)
    }

    pub fn domain_name(&self) -> &DomainName {
        &self.domain_name
    }

    pub fn sub_domain(&self) -> Option<&str> {
        self.sub_domain.as_deref()
    }

    /// Canonical site identity
    pub fn site_domain(&self) -> &SiteDomain {
        &self.site_domain
    }

    pub fn enable_logging_access(&self) -> bool {
        self.enable_logging_access
    }

    pub fn create_hosted_zone(&self) -> bool {
        self.create_hosted_zone
    }

    pub fn enable_route53(&self) -> bool {
        self.enable_route53
    }

    pub fn enable_ssl_cert(&self) -> bool {
        self.enable_ssl_cert
    }

    pub fn enable_cloudfront_distribution(&self) -> bool {
        self.enable_cloudfront_distribution
    }

    /// External certificate, if a non-empty ARN was supplied
    pub fn external_certificate_arn(&self) -> Option<&str> {
        self.external_certificate_arn
            .as_deref()
            .filter(|arn| !arn.trim().is_empty())
    }
}

/// Builder for [`SiteConfiguration`]
#[derive(Debug, Clone, Default)]
pub struct SiteConfigurationBuilder {
    domain_name: String,
    sub_domain: Option<String>,
    enable_logging_access: bool,
    create_hosted_zone: bool,
    enable_route53: bool,
    enable_ssl_cert: bool,
    enable_cloudfront_distribution: bool,
    external_certificate_arn: Option<String>,
}

impl SiteConfigurationBuilder {
    pub fn new(domain_name: impl Into<String>) -> Self {
        Self {
            domain_name: domain_name.into(),
            ..Default::default()
        }
    }

    pub fn sub_domain(mut self, sub_domain: impl Into<String>) -> Self {
        self.sub_domain = Some(sub_domain.into());
        self
    }

    pub fn enable_logging_access(mut self, enabled: bool) -> Self {
        self.enable_logging_access = enabled;
        self
    }

    pub fn create_hosted_zone(mut self, enabled: bool) -> Self {
        self.create_hosted_zone = enabled;
        self
    }

    pub fn enable_route53(mut self, enabled: bool) -> Self {
        self.enable_route53 = enabled;
        self
    }

    pub fn enable_ssl_cert(mut self, enabled: bool) -> Self {
        self.enable_ssl_cert = enabled;
        self
    }

    pub fn enable_cloudfront_distribution(mut self, enabled: bool) -> Self {
        self.enable_cloudfront_distribution = enabled;
        self
    }

    pub fn external_certificate_arn(mut self, arn: impl Into<String>) -> Self {
        self.external_certificate_arn = Some(arn.into());
        self
    }

    /// Validate the names and derive the site domain
    ///
    /// Flag consistency is checked by the resolver, not here.
    pub fn build(self) -> ValidationResult<SiteConfiguration> {
        let domain_name = DomainName::new(&self.domain_name)?;
        let site_domain = SiteDomain::derive(&domain_name, self.sub_domain.as_deref())?;

        Ok(SiteConfiguration {
            domain_name,
            sub_domain: self.sub_domain,
            enable_logging_access: self.enable_logging_access,
            create_hosted_zone: self.create_hosted_zone,
            enable_route53: self.enable_route53,
            enable_ssl_cert: self.enable_ssl_cert,
            enable_cloudfront_distribution: self.enable_cloudfront_distribution,
            external_certificate_arn: self.external_certificate_arn,
            site_domain,
        })
    }
}
