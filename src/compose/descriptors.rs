// Copyright (c) 2025 - Cowboy AI, Inc.
//! Descriptor builders, one per plan step
//!
//! Names and logical ids are pure functions of the site domain so repeated
//! passes for the same configuration update rather than duplicate resources.

use crate::domain::{
    attributes, AccessLogging, AliasRecordProperties, AliasTargetEndpoint, BucketProperties,
    CertificateProperties, DistributionProperties, DomainName, ErrorResponse,
    HostedZoneProperties, RemovalPolicy, ResourceDescriptor, ResourceHandle, ResourceKind,
    ResourceProperties, SiteDomain, WebsiteConfiguration,
};
use crate::engine::endpoints::CLOUDFRONT_HOSTED_ZONE_ID;
use crate::errors::ProvisioningResult;

pub const INDEX_DOCUMENT: &str = "index.html";
pub const ACCESS_LOG_PREFIX: &str = "logs/";
/// Default CDN cache TTL: 60 days
pub const DEFAULT_TTL_SECONDS: u64 = 60 * 24 * 60 * 60;
pub const RECORD_TTL_SECONDS: u64 = 60;
/// CDN certificates must be issued here whatever the deployment region
pub const CERTIFICATE_REGION: &str = "us-east-1";
pub const SSL_SUPPORT_METHOD: &str = "sni-only";
pub const MINIMUM_PROTOCOL_VERSION: &str = "TLSv1.1_2016";
pub const ORIGIN_ID: &str = "SiteBucketOrigin";
pub const NOT_FOUND_CACHING_TTL_SECONDS: u64 = 300;

/// Stable logical id of the resource created for `kind`
pub fn logical_id(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::LoggingBucket => "SiteLoggingBucket",
        ResourceKind::ContentBucket => "SiteBucket",
        ResourceKind::HostedZone => "HostedZone",
        ResourceKind::Certificate => "SslCertificate",
        ResourceKind::CdnDistribution => "CloudfrontDistribution",
        ResourceKind::DnsRecord => "DnsARecord",
    }
}

pub fn logging_bucket(site: &SiteDomain) -> ResourceDescriptor {
    ResourceDescriptor::new(
        logical_id(ResourceKind::LoggingBucket),
        ResourceProperties::Bucket(BucketProperties {
            bucket_name: site.logging_bucket_name(),
            website: None,
            public_read: false,
            access_logging: None,
            auto_delete_objects: true,
        }),
        RemovalPolicy::Destroy,
    )
}

pub fn content_bucket(site: &SiteDomain, logging: Option<&ResourceHandle>) -> ResourceDescriptor {
    ResourceDescriptor::new(
        logical_id(ResourceKind::ContentBucket),
        ResourceProperties::Bucket(BucketProperties {
            bucket_name: site.as_str().to_string(),
            website: Some(WebsiteConfiguration {
                index_document: INDEX_DOCUMENT.to_string(),
                error_document: INDEX_DOCUMENT.to_string(),
            }),
            public_read: true,
            access_logging: logging.map(|bucket| AccessLogging {
                destination_bucket: bucket.physical_id.clone(),
                prefix: ACCESS_LOG_PREFIX.to_string(),
            }),
            auto_delete_objects: false,
        }),
        RemovalPolicy::Destroy,
    )
}

pub fn hosted_zone(domain_name: &DomainName) -> ResourceDescriptor {
    ResourceDescriptor::new(
        logical_id(ResourceKind::HostedZone),
        ResourceProperties::HostedZone(HostedZoneProperties {
            zone_name: domain_name.as_str().to_string(),
        }),
        RemovalPolicy::Destroy,
    )
}

pub fn certificate(site: &SiteDomain, zone: &ResourceHandle) -> ResourceDescriptor {
    ResourceDescriptor::new(
        logical_id(ResourceKind::Certificate),
        ResourceProperties::Certificate(CertificateProperties {
            domain_name: site.as_str().to_string(),
            validation_zone_id: zone.physical_id.clone(),
            region: CERTIFICATE_REGION.to_string(),
        }),
        RemovalPolicy::Destroy,
    )
}

/// Distribution fronting the content bucket
///
/// # Errors
/// - `InvalidDescriptor` if the bucket handle lacks its regional endpoint
pub fn distribution(
    site: &SiteDomain,
    bucket: &ResourceHandle,
    certificate_arn: &str,
) -> ProvisioningResult<ResourceDescriptor> {
    let origin_domain_name = bucket.attribute(attributes::REGIONAL_DOMAIN_NAME)?;

    Ok(ResourceDescriptor::new(
        logical_id(ResourceKind::CdnDistribution),
        ResourceProperties::Distribution(DistributionProperties {
            aliases: vec![site.as_str().to_string()],
            certificate_arn: certificate_arn.to_string(),
            ssl_support_method: SSL_SUPPORT_METHOD.to_string(),
            minimum_protocol_version: MINIMUM_PROTOCOL_VERSION.to_string(),
            origin_id: ORIGIN_ID.to_string(),
            origin_domain_name: origin_domain_name.to_string(),
            default_ttl_seconds: DEFAULT_TTL_SECONDS,
            default_root_object: INDEX_DOCUMENT.to_string(),
            error_responses: vec![ErrorResponse {
                error_code: 404,
                response_code: 200,
                response_page_path: format!("/{}", INDEX_DOCUMENT),
                error_caching_min_ttl_seconds: NOT_FOUND_CACHING_TTL_SECONDS,
            }],
        }),
        RemovalPolicy::Destroy,
    ))
}

pub fn distribution_alias_target(
    distribution: &ResourceHandle,
) -> ProvisioningResult<AliasTargetEndpoint> {
    Ok(AliasTargetEndpoint {
        dns_name: distribution.attribute(attributes::DOMAIN_NAME)?.to_string(),
        hosted_zone_id: CLOUDFRONT_HOSTED_ZONE_ID.to_string(),
    })
}

pub fn bucket_alias_target(bucket: &ResourceHandle) -> ProvisioningResult<AliasTargetEndpoint> {
    Ok(AliasTargetEndpoint {
        dns_name: bucket.attribute(attributes::WEBSITE_DOMAIN)?.to_string(),
        hosted_zone_id: bucket
            .attribute(attributes::WEBSITE_HOSTED_ZONE_ID)?
            .to_string(),
    })
}

pub fn alias_record(
    site: &SiteDomain,
    zone: &ResourceHandle,
    target: AliasTargetEndpoint,
) -> ResourceDescriptor {
    ResourceDescriptor::new(
        logical_id(ResourceKind::DnsRecord),
        ResourceProperties::RecordSet(AliasRecordProperties {
            hosted_zone_id: zone.physical_id.clone(),
            record_name: site.as_str().to_string(),
            record_type: "A".to_string(),
            ttl_seconds: RECORD_TTL_SECONDS,
            alias_target: target,
        }),
        RemovalPolicy::Destroy,
    )
}
