// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for static-site-infrastructure
//!
//! Deterministic configurations and engines shared by the integration tests.
//!
//! # Design Principles
//! - Fixtures never read the process environment
//! - Every scenario configuration is built here, tests only consume it
#![allow(dead_code)]

use std::collections::HashMap;

use static_site_infrastructure::config::EnvironmentConfig;
use static_site_infrastructure::domain::SiteConfiguration;
use static_site_infrastructure::engine::InMemoryEngine;

pub const DOMAIN: &str = "example.com";
pub const REGION: &str = "us-east-1";
pub const EXISTING_ZONE_ID: &str = "Z0EXISTINGZONE";
pub const EXTERNAL_CERTIFICATE_ARN: &str =
    "arn:aws:acm:us-east-1:111111111111:certificate/0b1e7f3a-external";

/// Feature flag combination, in `SiteConfiguration` field order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Flags {
    pub logging: bool,
    pub create_zone: bool,
    pub route53: bool,
    pub ssl: bool,
    pub cdn: bool,
    pub external_certificate: bool,
}

pub fn site(sub_domain: &str, flags: Flags) -> SiteConfiguration {
    let mut builder = SiteConfiguration::builder(DOMAIN)
        .sub_domain(sub_domain)
        .enable_logging_access(flags.logging)
        .create_hosted_zone(flags.create_zone)
        .enable_route53(flags.route53)
        .enable_ssl_cert(flags.ssl)
        .enable_cloudfront_distribution(flags.cdn);
    if flags.external_certificate {
        builder = builder.external_certificate_arn(EXTERNAL_CERTIFICATE_ARN);
    }
    builder.build().expect("Invalid fixture configuration")
}

/// Everything enabled, zone created
pub fn scenario_a() -> SiteConfiguration {
    site(
        "www",
        Flags {
            logging: true,
            create_zone: true,
            route53: true,
            ssl: true,
            cdn: true,
            external_certificate: false,
        },
    )
}

/// DNS only, zone looked up, record aliases the bucket
pub fn scenario_b() -> SiteConfiguration {
    site(
        "",
        Flags {
            route53: true,
            ..Flags::default()
        },
    )
}

/// Certificate requested with no way to obtain a zone
pub fn scenario_c() -> SiteConfiguration {
    site(
        "www",
        Flags {
            ssl: true,
            ..Flags::default()
        },
    )
}

/// CDN fronted by an externally issued certificate, no DNS
pub fn external_certificate_site() -> SiteConfiguration {
    site(
        "cdn",
        Flags {
            cdn: true,
            external_certificate: true,
            ..Flags::default()
        },
    )
}

/// Engine whose registry already holds the public zone for [`DOMAIN`]
pub fn engine_with_zone() -> InMemoryEngine {
    engine_with_zone_in(REGION)
}

pub fn engine_with_zone_in(region: &str) -> InMemoryEngine {
    InMemoryEngine::new(region).with_existing_zone(DOMAIN, EXISTING_ZONE_ID)
}

/// Environment built from explicit pairs on top of a valid website name
pub fn environment(pairs: &[(&str, &str)]) -> EnvironmentConfig {
    let mut vars: HashMap<String, String> =
        HashMap::from([("WEBSITE_NAME".to_string(), "learn-e2e".to_string())]);
    for (name, value) in pairs {
        vars.insert(name.to_string(), value.to_string());
    }
    EnvironmentConfig::from_lookup(|name| vars.get(name).cloned())
        .expect("Invalid fixture environment")
}
