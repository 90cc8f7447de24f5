// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Descriptor Model
//!
//! A [`ResourceDescriptor`] declares a named cloud resource and its typed
//! properties. Once an engine has created it, the engine returns a
//! [`ResourceHandle`] exposing the identifiers later resources reference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::resource_kind::ResourceType;
use crate::errors::{ProvisioningError, ProvisioningResult};

/// Handle attribute names shared between engines and the composer
pub mod attributes {
    /// Bucket website endpoint host (`<bucket>.s3-website-<region>.amazonaws.com`)
    pub const WEBSITE_DOMAIN: &str = "WebsiteDomain";
    /// Hosted zone of the bucket website endpoint, used for alias records
    pub const WEBSITE_HOSTED_ZONE_ID: &str = "WebsiteHostedZoneId";
    /// Regional bucket endpoint, used as a CDN origin
    pub const REGIONAL_DOMAIN_NAME: &str = "RegionalDomainName";
    /// Generated distribution domain (`dxxxx.cloudfront.net`)
    pub const DOMAIN_NAME: &str = "DomainName";
    /// Name servers delegated to a hosted zone
    pub const NAME_SERVERS: &str = "NameServers";
}

/// What happens to a resource when the site is torn down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Leave the resource in the account
    Retain,
    /// Delete the resource
    Destroy,
}

/// Whether this deployment created the resource or merely looked it up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    Owned,
    Imported,
}

/// Static website hosting settings for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteConfiguration {
    pub index_document: String,
    pub error_document: String,
}

/// Server access logging target for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessLogging {
    pub destination_bucket: String,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketProperties {
    pub bucket_name: String,
    pub website: Option<WebsiteConfiguration>,
    /// Grants `s3:GetObject` to every principal
    pub public_read: bool,
    pub access_logging: Option<AccessLogging>,
    /// Empty the bucket before deleting it on teardown
    pub auto_delete_objects: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZoneProperties {
    pub zone_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateProperties {
    pub domain_name: String,
    /// Zone holding the DNS validation records
    pub validation_zone_id: String,
    /// Issuing region, independent of the deployment region
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: u16,
    pub response_code: u16,
    pub response_page_path: String,
    pub error_caching_min_ttl_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionProperties {
    pub aliases: Vec<String>,
    pub certificate_arn: String,
    pub ssl_support_method: String,
    pub minimum_protocol_version: String,
    pub origin_id: String,
    pub origin_domain_name: String,
    pub default_ttl_seconds: u64,
    pub default_root_object: String,
    pub error_responses: Vec<ErrorResponse>,
}

/// Endpoint an alias record resolves to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTargetEndpoint {
    pub dns_name: String,
    pub hosted_zone_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecordProperties {
    pub hosted_zone_id: String,
    pub record_name: String,
    pub record_type: String,
    pub ttl_seconds: u64,
    pub alias_target: AliasTargetEndpoint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookFilterGroup {
    pub events: Vec<String>,
    pub head_ref: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRepository {
    pub owner: String,
    pub repo: String,
    pub webhook: bool,
    pub report_build_status: bool,
    pub filter_groups: Vec<WebhookFilterGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyStatement {
    pub effect: String,
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildProjectProperties {
    pub project_name: String,
    pub source: SourceRepository,
    pub buildspec: String,
    pub build_image: String,
    pub compute_type: String,
    pub environment_variables: BTreeMap<String, String>,
    pub policy_statements: Vec<PolicyStatement>,
}

/// Typed properties, one variant per cloud resource type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResourceProperties {
    Bucket(BucketProperties),
    HostedZone(HostedZoneProperties),
    Certificate(CertificateProperties),
    Distribution(DistributionProperties),
    RecordSet(AliasRecordProperties),
    BuildProject(BuildProjectProperties),
}

impl ResourceProperties {
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::Bucket(_) => ResourceType::Bucket,
            Self::HostedZone(_) => ResourceType::HostedZone,
            Self::Certificate(_) => ResourceType::Certificate,
            Self::Distribution(_) => ResourceType::Distribution,
            Self::RecordSet(_) => ResourceType::RecordSet,
            Self::BuildProject(_) => ResourceType::BuildProject,
        }
    }
}

/// Declared cloud resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceDescriptor {
    /// Stable identifier within the deployment
    pub logical_id: String,
    pub properties: ResourceProperties,
    pub removal_policy: RemovalPolicy,
}

impl ResourceDescriptor {
    pub fn new(
        logical_id: impl Into<String>,
        properties: ResourceProperties,
        removal_policy: RemovalPolicy,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            properties,
            removal_policy,
        }
    }

    pub fn resource_type(&self) -> ResourceType {
        self.properties.resource_type()
    }

    /// Deterministic physical name, when the resource type has one
    ///
    /// Distributions and certificates are named by the provider.
    pub fn physical_name(&self) -> Option<&str> {
        match &self.properties {
            ResourceProperties::Bucket(p) => Some(&p.bucket_name),
            ResourceProperties::HostedZone(p) => Some(&p.zone_name),
            ResourceProperties::RecordSet(p) => Some(&p.record_name),
            ResourceProperties::BuildProject(p) => Some(&p.project_name),
            ResourceProperties::Certificate(_) | ResourceProperties::Distribution(_) => None,
        }
    }
}

/// Identifiers a created resource exposes to later resources
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub resource_type: ResourceType,
    pub logical_id: String,
    /// Provider identifier (bucket name, zone id, distribution id, ...)
    pub physical_id: String,
    pub arn: String,
    pub attributes: BTreeMap<String, String>,
    pub removal_policy: RemovalPolicy,
    pub ownership: Ownership,
}

impl ResourceHandle {
    /// Look up a required attribute
    pub fn attribute(&self, name: &str) -> ProvisioningResult<&str> {
        self.attributes.get(name).map(String::as_str).ok_or_else(|| {
            ProvisioningError::InvalidDescriptor(format!(
                "{} has no attribute {}",
                self.logical_id, name
            ))
        })
    }

    pub fn is_imported(&self) -> bool {
        self.ownership == Ownership::Imported
    }
}

/// Named value the deployment exports for operators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackOutput {
    pub name: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StackOutput {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
