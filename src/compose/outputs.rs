// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment outputs
//!
//! [`OutputsAccumulator`] collects handles strictly in plan order during one
//! composition pass; [`DeploymentOutputs`] is the frozen result.
//!
//! # Invariants
//!
//! - Each kind is recorded at most once per pass
//! - A recorded handle has the resource type its kind creates
//! - Finished outputs always hold a content bucket

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::{ResourceHandle, ResourceKind, SiteDomain, StackOutput};
use crate::errors::LogicError;

pub const BUCKET_OUTPUT: &str = "s3-bucket-info";
pub const CERTIFICATE_OUTPUT: &str = "Certificate";
pub const DISTRIBUTION_OUTPUT: &str = "DistributionId";

/// Write-once handle collector for a single pass
#[derive(Debug, Clone)]
pub struct OutputsAccumulator {
    site_domain: SiteDomain,
    handles: BTreeMap<ResourceKind, ResourceHandle>,
    order: Vec<ResourceKind>,
}

impl OutputsAccumulator {
    pub fn new(site_domain: SiteDomain) -> Self {
        Self {
            site_domain,
            handles: BTreeMap::new(),
            order: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: ResourceKind, handle: ResourceHandle) -> Result<(), LogicError> {
        if self.handles.contains_key(&kind) {
            return Err(LogicError::OutputAlreadyRecorded(kind));
        }
        if handle.resource_type != kind.resource_type() {
            return Err(LogicError::UnexpectedResourceType {
                kind,
                expected: kind.resource_type(),
                actual: handle.resource_type,
            });
        }
        self.handles.insert(kind, handle);
        self.order.push(kind);
        Ok(())
    }

    pub fn contains(&self, kind: ResourceKind) -> bool {
        self.handles.contains_key(&kind)
    }

    /// Handle of `dependency`, needed while executing `kind`
    pub fn require(
        &self,
        kind: ResourceKind,
        dependency: ResourceKind,
    ) -> Result<&ResourceHandle, LogicError> {
        self.handles
            .get(&dependency)
            .ok_or(LogicError::UnresolvedDependency {
                kind,
                missing: dependency,
            })
    }

    /// Resources this pass created, in creation order (lookups excluded)
    pub fn created(&self) -> Vec<ResourceHandle> {
        self.order
            .iter()
            .filter_map(|kind| self.handles.get(kind))
            .filter(|handle| !handle.is_imported())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Freeze the collected handles
    pub fn finish(mut self, deployment_id: Uuid) -> Result<DeploymentOutputs, LogicError> {
        let bucket = self
            .handles
            .remove(&ResourceKind::ContentBucket)
            .ok_or(LogicError::MissingContentBucket)?;

        Ok(DeploymentOutputs {
            deployment_id,
            site_domain: self.site_domain,
            bucket,
            logging_bucket: self.handles.remove(&ResourceKind::LoggingBucket),
            hosted_zone: self.handles.remove(&ResourceKind::HostedZone),
            certificate: self.handles.remove(&ResourceKind::Certificate),
            distribution: self.handles.remove(&ResourceKind::CdnDistribution),
            dns_record: self.handles.remove(&ResourceKind::DnsRecord),
            provisioning_order: self.order,
            completed_at: Utc::now(),
        })
    }
}

/// Observable result of a successful composition pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOutputs {
    deployment_id: Uuid,
    site_domain: SiteDomain,
    bucket: ResourceHandle,
    logging_bucket: Option<ResourceHandle>,
    hosted_zone: Option<ResourceHandle>,
    certificate: Option<ResourceHandle>,
    distribution: Option<ResourceHandle>,
    dns_record: Option<ResourceHandle>,
    provisioning_order: Vec<ResourceKind>,
    completed_at: DateTime<Utc>,
}

impl DeploymentOutputs {
    pub fn deployment_id(&self) -> Uuid {
        self.deployment_id
    }

    pub fn site_domain(&self) -> &SiteDomain {
        &self.site_domain
    }

    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    pub fn bucket(&self) -> &ResourceHandle {
        &self.bucket
    }

    pub fn bucket_name(&self) -> &str {
        &self.bucket.physical_id
    }

    pub fn bucket_arn(&self) -> &str {
        &self.bucket.arn
    }

    pub fn logging_bucket(&self) -> Option<&ResourceHandle> {
        self.logging_bucket.as_ref()
    }

    pub fn hosted_zone(&self) -> Option<&ResourceHandle> {
        self.hosted_zone.as_ref()
    }

    pub fn hosted_zone_id(&self) -> Option<&str> {
        self.hosted_zone.as_ref().map(|zone| zone.physical_id.as_str())
    }

    /// ARN of the certificate issued by this deployment
    pub fn certificate_arn(&self) -> Option<&str> {
        self.certificate.as_ref().map(|cert| cert.arn.as_str())
    }

    pub fn distribution_id(&self) -> Option<&str> {
        self.distribution
            .as_ref()
            .map(|dist| dist.physical_id.as_str())
    }

    pub fn dns_record_name(&self) -> Option<&str> {
        self.dns_record
            .as_ref()
            .map(|record| record.physical_id.as_str())
    }

    pub fn handle(&self, kind: ResourceKind) -> Option<&ResourceHandle> {
        match kind {
            ResourceKind::ContentBucket => Some(&self.bucket),
            ResourceKind::LoggingBucket => self.logging_bucket.as_ref(),
            ResourceKind::HostedZone => self.hosted_zone.as_ref(),
            ResourceKind::Certificate => self.certificate.as_ref(),
            ResourceKind::CdnDistribution => self.distribution.as_ref(),
            ResourceKind::DnsRecord => self.dns_record.as_ref(),
        }
    }

    /// Handles in the order they were provisioned
    pub fn provisioned(&self) -> Vec<(ResourceKind, &ResourceHandle)> {
        self.provisioning_order
            .iter()
            .filter_map(|kind| self.handle(*kind).map(|handle| (*kind, handle)))
            .collect()
    }

    /// Named values exported for operators
    pub fn stack_outputs(&self) -> Vec<StackOutput> {
        let mut outputs = vec![StackOutput::new(BUCKET_OUTPUT, self.bucket_arn())
            .with_description("created public Bucket")];
        if let Some(arn) = self.certificate_arn() {
            outputs.push(StackOutput::new(CERTIFICATE_OUTPUT, arn));
        }
        if let Some(id) = self.distribution_id() {
            outputs.push(StackOutput::new(DISTRIBUTION_OUTPUT, id));
        }
        outputs
    }
}
