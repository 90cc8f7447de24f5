// Copyright (c) 2025 - Cowboy AI, Inc.
//! Template Synthesis Engine
//!
//! Instead of calling the provider, records every created resource as an
//! entry of a CloudFormation-style JSON template. Identifiers that only exist
//! after deployment are handed out as `${LogicalId}` / `${LogicalId.Attr}`
//! tokens; any rendered string containing a token is wrapped in `Fn::Sub`.
//!
//! # Companion resources
//!
//! - Public-read buckets get a `<LogicalId>Policy` bucket policy
//! - Build projects get a `<LogicalId>Role` service role carrying the
//!   descriptor's policy statements
//!
//! Certificates can only be declared when the template targets the region
//! the certificate must be issued in; anything else is `InvalidDescriptor`.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tokio::sync::Mutex;
use tracing::debug;

use super::endpoints::{
    s3_bucket_arn, s3_regional_domain, s3_website_domain, s3_website_hosted_zone_id,
};
use super::{ProvisioningEngine, TeardownOutcome};
use crate::domain::{
    attributes, BucketProperties, BuildProjectProperties, DomainName, Ownership, RemovalPolicy,
    ResourceDescriptor, ResourceHandle, ResourceProperties, ResourceType, StackOutput,
};
use crate::errors::{ProvisioningError, ProvisioningResult};

/// Tag marking buckets that are emptied before deletion
pub const AUTO_DELETE_OBJECTS_TAG: &str = "aws-cdk:auto-delete-objects";

const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";

fn token(logical_id: &str, attribute: Option<&str>) -> String {
    match attribute {
        Some(attribute) => format!("${{{}.{}}}", logical_id, attribute),
        None => format!("${{{}}}", logical_id),
    }
}

/// Wrap every token-bearing string in `Fn::Sub`
fn substitute(value: Value) -> Value {
    match value {
        Value::String(s) if s.contains("${") => json!({ "Fn::Sub": s }),
        Value::Array(items) => Value::Array(items.into_iter().map(substitute).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, substitute(value)))
                .collect(),
        ),
        other => other,
    }
}

fn deletion_policy(policy: RemovalPolicy) -> &'static str {
    match policy {
        RemovalPolicy::Retain => "Retain",
        RemovalPolicy::Destroy => "Delete",
    }
}

#[derive(Debug, Default)]
struct TemplateState {
    /// Logical id → (descriptor, rendered resources incl. companions)
    resources: BTreeMap<String, (ResourceDescriptor, Map<String, Value>)>,
    /// Zone name → zone id available to lookups
    known_zones: BTreeMap<String, String>,
}

/// Engine that synthesizes a deployable template
#[derive(Debug)]
pub struct TemplateEngine {
    region: String,
    state: Mutex<TemplateState>,
}

impl TemplateEngine {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Mutex::new(TemplateState::default()),
        }
    }

    /// Make an existing zone resolvable by lookup
    pub fn with_known_zone(mut self, zone_name: &str, zone_id: &str) -> Self {
        self.state
            .get_mut()
            .known_zones
            .insert(zone_name.to_ascii_lowercase(), zone_id.to_string());
        self
    }

    /// Render the full template with the given stack outputs
    pub async fn render(&self, outputs: &[StackOutput]) -> Value {
        let state = self.state.lock().await;

        let resources: Map<String, Value> = state
            .resources
            .values()
            .flat_map(|(_, rendered)| rendered.clone())
            .collect();

        let outputs: Map<String, Value> = outputs
            .iter()
            .map(|output| {
                let mut entry = Map::new();
                entry.insert("Value".to_string(), substitute(json!(output.value)));
                if let Some(description) = &output.description {
                    entry.insert("Description".to_string(), json!(description));
                }
                (output.name.clone(), Value::Object(entry))
            })
            .collect();

        json!({
            "AWSTemplateFormatVersion": TEMPLATE_FORMAT_VERSION,
            "Resources": resources,
            "Outputs": outputs,
        })
    }

    /// Logical ids of the primary resources currently in the template
    pub async fn logical_ids(&self) -> Vec<String> {
        self.state.lock().await.resources.keys().cloned().collect()
    }

    fn handle_for(&self, descriptor: &ResourceDescriptor) -> ProvisioningResult<ResourceHandle> {
        let logical_id = descriptor.logical_id.as_str();
        let mut attrs = BTreeMap::new();

        let (physical_id, arn) = match &descriptor.properties {
            ResourceProperties::Bucket(bucket) => {
                attrs.insert(
                    attributes::WEBSITE_DOMAIN.to_string(),
                    s3_website_domain(&bucket.bucket_name, &self.region),
                );
                if let Some(zone) = s3_website_hosted_zone_id(&self.region) {
                    attrs.insert(attributes::WEBSITE_HOSTED_ZONE_ID.to_string(), zone.to_string());
                }
                attrs.insert(
                    attributes::REGIONAL_DOMAIN_NAME.to_string(),
                    s3_regional_domain(&bucket.bucket_name, &self.region),
                );
                (bucket.bucket_name.clone(), s3_bucket_arn(&bucket.bucket_name))
            }
            ResourceProperties::HostedZone(_) => {
                attrs.insert(
                    attributes::NAME_SERVERS.to_string(),
                    token(logical_id, Some("NameServers")),
                );
                (
                    token(logical_id, None),
                    format!("arn:aws:route53:::hostedzone/{}", token(logical_id, None)),
                )
            }
            // A template resource is issued in the stack's own region
            ResourceProperties::Certificate(cert) => {
                if cert.region != self.region {
                    return Err(ProvisioningError::InvalidDescriptor(format!(
                        "certificate {} must be issued in {} but the template deploys to {}",
                        cert.domain_name, cert.region, self.region
                    )));
                }
                (token(logical_id, None), token(logical_id, None))
            }
            ResourceProperties::Distribution(_) => {
                attrs.insert(
                    attributes::DOMAIN_NAME.to_string(),
                    token(logical_id, Some("DomainName")),
                );
                (
                    token(logical_id, None),
                    format!(
                        "arn:aws:cloudfront::${{AWS::AccountId}}:distribution/{}",
                        token(logical_id, None)
                    ),
                )
            }
            ResourceProperties::RecordSet(record) => (
                record.record_name.clone(),
                format!(
                    "arn:aws:route53:::hostedzone/{}/recordset/{}/{}",
                    record.hosted_zone_id, record.record_name, record.record_type
                ),
            ),
            ResourceProperties::BuildProject(project) => (
                project.project_name.clone(),
                token(logical_id, Some("Arn")),
            ),
        };

        Ok(ResourceHandle {
            resource_type: descriptor.resource_type(),
            logical_id: logical_id.to_string(),
            physical_id,
            arn,
            attributes: attrs,
            removal_policy: descriptor.removal_policy,
            ownership: Ownership::Owned,
        })
    }
}

fn bucket_properties(bucket: &BucketProperties) -> Value {
    let mut properties = Map::new();
    properties.insert("BucketName".to_string(), json!(bucket.bucket_name));
    if let Some(website) = &bucket.website {
        properties.insert(
            "WebsiteConfiguration".to_string(),
            json!({
                "IndexDocument": website.index_document,
                "ErrorDocument": website.error_document,
            }),
        );
    }
    if let Some(logging) = &bucket.access_logging {
        properties.insert(
            "LoggingConfiguration".to_string(),
            json!({
                "DestinationBucketName": logging.destination_bucket,
                "LogFilePrefix": logging.prefix,
            }),
        );
    }
    if bucket.auto_delete_objects {
        properties.insert(
            "Tags".to_string(),
            json!([{ "Key": AUTO_DELETE_OBJECTS_TAG, "Value": "true" }]),
        );
    }
    Value::Object(properties)
}

fn build_project_properties(logical_id: &str, project: &BuildProjectProperties) -> Value {
    let source = &project.source;
    let filter_groups: Vec<Value> = source
        .filter_groups
        .iter()
        .map(|group| {
            json!([
                { "Type": "EVENT", "Pattern": group.events.join(", ") },
                { "Type": "HEAD_REF", "Pattern": group.head_ref },
            ])
        })
        .collect();
    let environment_variables: Vec<Value> = project
        .environment_variables
        .iter()
        .map(|(name, value)| json!({ "Name": name, "Type": "PLAINTEXT", "Value": value }))
        .collect();

    json!({
        "Name": project.project_name,
        "Source": {
            "Type": "GITHUB",
            "Location": format!("https://github.com/{}/{}.git", source.owner, source.repo),
            "BuildSpec": project.buildspec,
            "ReportBuildStatus": source.report_build_status,
        },
        "Triggers": {
            "Webhook": source.webhook,
            "FilterGroups": filter_groups,
        },
        "Environment": {
            "Type": "LINUX_CONTAINER",
            "Image": project.build_image,
            "ComputeType": project.compute_type,
            "EnvironmentVariables": environment_variables,
        },
        "Artifacts": { "Type": "NO_ARTIFACTS" },
        "ServiceRole": token(&format!("{}Role", logical_id), Some("Arn")),
    })
}

/// Render a descriptor and its companions as template entries
fn render_descriptor(descriptor: &ResourceDescriptor) -> Map<String, Value> {
    let logical_id = descriptor.logical_id.as_str();
    let policy = deletion_policy(descriptor.removal_policy);
    let mut rendered = Map::new();

    let properties = match &descriptor.properties {
        ResourceProperties::Bucket(bucket) => {
            if bucket.public_read {
                rendered.insert(
                    format!("{}Policy", logical_id),
                    json!({
                        "Type": "AWS::S3::BucketPolicy",
                        "Properties": {
                            "Bucket": bucket.bucket_name,
                            "PolicyDocument": {
                                "Version": "2012-10-17",
                                "Statement": [{
                                    "Effect": "Allow",
                                    "Principal": { "AWS": "*" },
                                    "Action": "s3:GetObject",
                                    "Resource": format!("{}/*", s3_bucket_arn(&bucket.bucket_name)),
                                }],
                            },
                        },
                    }),
                );
            }
            bucket_properties(bucket)
        }
        ResourceProperties::HostedZone(zone) => json!({ "Name": zone.zone_name }),
        ResourceProperties::Certificate(cert) => json!({
            "DomainName": cert.domain_name,
            "ValidationMethod": "DNS",
            "DomainValidationOptions": [{
                "DomainName": cert.domain_name,
                "HostedZoneId": cert.validation_zone_id,
            }],
        }),
        ResourceProperties::Distribution(dist) => {
            let error_responses: Vec<Value> = dist
                .error_responses
                .iter()
                .map(|response| {
                    json!({
                        "ErrorCode": response.error_code,
                        "ResponseCode": response.response_code,
                        "ResponsePagePath": response.response_page_path,
                        "ErrorCachingMinTTL": response.error_caching_min_ttl_seconds,
                    })
                })
                .collect();
            json!({
                "DistributionConfig": {
                    "Enabled": true,
                    "Aliases": dist.aliases,
                    "DefaultRootObject": dist.default_root_object,
                    "Origins": [{
                        "Id": dist.origin_id,
                        "DomainName": dist.origin_domain_name,
                        "S3OriginConfig": {},
                    }],
                    "DefaultCacheBehavior": {
                        "TargetOriginId": dist.origin_id,
                        "ViewerProtocolPolicy": "redirect-to-https",
                        "DefaultTTL": dist.default_ttl_seconds,
                        "ForwardedValues": { "QueryString": false },
                    },
                    "ViewerCertificate": {
                        "AcmCertificateArn": dist.certificate_arn,
                        "SslSupportMethod": dist.ssl_support_method,
                        "MinimumProtocolVersion": dist.minimum_protocol_version,
                    },
                    "CustomErrorResponses": error_responses,
                },
            })
        }
        // Alias records carry no TTL of their own
        ResourceProperties::RecordSet(record) => json!({
            "HostedZoneId": record.hosted_zone_id,
            "Name": record.record_name,
            "Type": record.record_type,
            "AliasTarget": {
                "DNSName": record.alias_target.dns_name,
                "HostedZoneId": record.alias_target.hosted_zone_id,
            },
        }),
        ResourceProperties::BuildProject(project) => {
            let statements: Vec<Value> = project
                .policy_statements
                .iter()
                .map(|statement| {
                    json!({
                        "Effect": statement.effect,
                        "Action": statement.actions,
                        "Resource": statement.resources,
                    })
                })
                .collect();
            rendered.insert(
                format!("{}Role", logical_id),
                json!({
                    "Type": "AWS::IAM::Role",
                    "DeletionPolicy": policy,
                    "Properties": {
                        "AssumeRolePolicyDocument": {
                            "Version": "2012-10-17",
                            "Statement": [{
                                "Effect": "Allow",
                                "Principal": { "Service": "codebuild.amazonaws.com" },
                                "Action": "sts:AssumeRole",
                            }],
                        },
                        "Policies": [{
                            "PolicyName": format!("{}Policy", logical_id),
                            "PolicyDocument": {
                                "Version": "2012-10-17",
                                "Statement": statements,
                            },
                        }],
                    },
                }),
            );
            build_project_properties(logical_id, project)
        }
    };

    let resource = json!({
        "Type": descriptor.resource_type().cfn_type(),
        "DeletionPolicy": policy,
        "Properties": properties,
    });
    rendered.insert(logical_id.to_string(), resource);

    rendered
        .into_iter()
        .map(|(key, value)| (key, substitute(value)))
        .collect()
}

#[async_trait]
impl ProvisioningEngine for TemplateEngine {
    fn region(&self) -> &str {
        &self.region
    }

    async fn create(&self, descriptor: ResourceDescriptor) -> ProvisioningResult<ResourceHandle> {
        let mut state = self.state.lock().await;

        if let Some(name) = descriptor.physical_name() {
            let clash = state.resources.iter().find(|(logical_id, (existing, _))| {
                **logical_id != descriptor.logical_id
                    && existing.resource_type() == descriptor.resource_type()
                    && existing.physical_name() == Some(name)
            });
            if let Some((other, _)) = clash {
                return Err(ProvisioningError::Conflict(format!(
                    "{} {} is already declared by {}",
                    descriptor.resource_type(),
                    name,
                    other
                )));
            }
        }

        let handle = self.handle_for(&descriptor)?;
        let rendered = render_descriptor(&descriptor);
        debug!(
            logical_id = %descriptor.logical_id,
            entries = rendered.len(),
            "Synthesized template resource"
        );
        state
            .resources
            .insert(descriptor.logical_id.clone(), (descriptor, rendered));
        Ok(handle)
    }

    async fn lookup_hosted_zone(&self, domain_name: &DomainName) -> ProvisioningResult<ResourceHandle> {
        let state = self.state.lock().await;
        let zone_id = state
            .known_zones
            .get(domain_name.as_str())
            .ok_or_else(|| ProvisioningError::NotFound(format!("hosted zone {}", domain_name)))?;

        Ok(ResourceHandle {
            resource_type: ResourceType::HostedZone,
            logical_id: format!("Imported{}", zone_id),
            physical_id: zone_id.clone(),
            arn: format!("arn:aws:route53:::hostedzone/{}", zone_id),
            attributes: BTreeMap::new(),
            removal_policy: RemovalPolicy::Retain,
            ownership: Ownership::Imported,
        })
    }

    async fn destroy(&self, handle: &ResourceHandle) -> ProvisioningResult<TeardownOutcome> {
        if handle.is_imported() || handle.removal_policy == RemovalPolicy::Retain {
            return Ok(TeardownOutcome::Retained);
        }

        let mut state = self.state.lock().await;
        state
            .resources
            .remove(&handle.logical_id)
            .map(|_| TeardownOutcome::Destroyed)
            .ok_or_else(|| ProvisioningError::NotFound(handle.logical_id.clone()))
    }
}
