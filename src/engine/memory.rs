// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-Memory Provisioning Engine
//!
//! Deterministic simulation of the cloud provider. Every resource is tracked
//! through the [`ResourceState`] lifecycle with a timestamped history, and the
//! engine enforces the provider rules the composer relies on:
//!
//! - Physical names are unique per resource type (`Conflict` otherwise)
//! - Re-creating a logical id with the same name updates it in place
//! - Certificates, records and access-log targets must reference live
//!   resources (`InvalidDescriptor` otherwise)
//! - Hosted zone lookups only see registered or created zones
//! - Buckets refuse deletion while they hold objects unless their descriptor
//!   enables object auto-deletion
//!
//! Faults can be injected per resource type to exercise partial-failure
//! paths.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::endpoints::{
    s3_bucket_arn, s3_regional_domain, s3_website_domain, s3_website_hosted_zone_id,
};
use super::{ProvisioningEngine, TeardownOutcome};
use crate::domain::{
    attributes, DomainName, Ownership, RemovalPolicy, ResourceDescriptor, ResourceHandle,
    ResourceProperties, ResourceType,
};
use crate::errors::{ProvisioningError, ProvisioningResult};
use crate::state_machine::{
    LifecycleCommand, ResourceState, StateMachine, StateMachineWithHistory, TransitionError,
};

/// Account id used in simulated ARNs
pub const SIMULATED_ACCOUNT_ID: &str = "000000000000";

/// One call made against the engine, in submission order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCall {
    Create {
        resource_type: ResourceType,
        logical_id: String,
    },
    LookupHostedZone(String),
    Destroy(String),
}

/// A tracked resource
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub descriptor: ResourceDescriptor,
    pub handle: Option<ResourceHandle>,
    pub lifecycle: StateMachineWithHistory<ResourceState>,
    /// States entered through transitions that changed or lost real cloud state
    pub critical_states: Vec<ResourceState>,
}

#[derive(Debug, Default)]
struct EngineState {
    resources: BTreeMap<String, ResourceRecord>,
    /// Physical name claims: (type, name) → logical id
    names: BTreeMap<(ResourceType, String), String>,
    /// Names owned outside this deployment
    foreign_names: BTreeSet<(ResourceType, String)>,
    /// Zone registry visible to lookups: zone name → handle
    zones: BTreeMap<String, ResourceHandle>,
    objects: BTreeMap<String, BTreeSet<String>>,
    faults: BTreeMap<ResourceType, ProvisioningError>,
    calls: Vec<EngineCall>,
    sequence: u64,
}

impl EngineState {
    fn next_id(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    fn live_zone_ids(&self) -> BTreeSet<&str> {
        self.zones
            .values()
            .map(|handle| handle.physical_id.as_str())
            .collect()
    }

    fn is_live_bucket(&self, name: &str) -> bool {
        self.names
            .get(&(ResourceType::Bucket, name.to_string()))
            .and_then(|logical_id| self.resources.get(logical_id))
            .is_some_and(|record| *record.lifecycle.current_state() == ResourceState::Active)
    }
}

/// In-memory provisioning engine
#[derive(Debug)]
pub struct InMemoryEngine {
    region: String,
    state: Mutex<EngineState>,
}

impl InMemoryEngine {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            state: Mutex::new(EngineState::default()),
        }
    }

    /// Register a pre-existing public zone that lookups can find
    pub fn with_existing_zone(mut self, zone_name: &str, zone_id: &str) -> Self {
        let handle = ResourceHandle {
            resource_type: ResourceType::HostedZone,
            logical_id: format!("Imported{}", zone_id),
            physical_id: zone_id.to_string(),
            arn: format!("arn:aws:route53:::hostedzone/{}", zone_id),
            attributes: BTreeMap::new(),
            removal_policy: RemovalPolicy::Retain,
            ownership: Ownership::Imported,
        };
        self.state
            .get_mut()
            .zones
            .insert(zone_name.to_ascii_lowercase(), handle);
        self
    }

    /// Claim a physical name on behalf of another owner
    pub fn with_foreign_name(mut self, resource_type: ResourceType, name: &str) -> Self {
        self.state
            .get_mut()
            .foreign_names
            .insert((resource_type, name.to_string()));
        self
    }

    /// Fail every create of `resource_type` with `error`
    pub fn with_fault(mut self, resource_type: ResourceType, error: ProvisioningError) -> Self {
        self.state.get_mut().faults.insert(resource_type, error);
        self
    }

    /// Store an object in a live bucket
    pub async fn put_object(&self, bucket: &str, key: &str) -> ProvisioningResult<()> {
        let mut state = self.state.lock().await;
        if !state.is_live_bucket(bucket) {
            return Err(ProvisioningError::NotFound(format!("bucket {}", bucket)));
        }
        state
            .objects
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string());
        Ok(())
    }

    pub async fn object_count(&self, bucket: &str) -> usize {
        let state = self.state.lock().await;
        state.objects.get(bucket).map_or(0, BTreeSet::len)
    }

    /// Calls made so far, in order
    pub async fn calls(&self) -> Vec<EngineCall> {
        self.state.lock().await.calls.clone()
    }

    /// Number of successful create calls (updates included)
    pub async fn create_count(&self) -> usize {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter(|call| matches!(call, EngineCall::Create { .. }))
            .count()
    }

    pub async fn record(&self, logical_id: &str) -> Option<ResourceRecord> {
        self.state.lock().await.resources.get(logical_id).cloned()
    }

    pub async fn resource_state(&self, logical_id: &str) -> Option<ResourceState> {
        self.record(logical_id)
            .await
            .map(|record| *record.lifecycle.current_state())
    }

    /// Logical ids of resources currently in the `Active` state
    pub async fn active_resources(&self) -> Vec<String> {
        self.state
            .lock()
            .await
            .resources
            .iter()
            .filter(|(_, record)| *record.lifecycle.current_state() == ResourceState::Active)
            .map(|(logical_id, _)| logical_id.clone())
            .collect()
    }

    fn build_handle(
        &self,
        state: &mut EngineState,
        descriptor: &ResourceDescriptor,
    ) -> ProvisioningResult<ResourceHandle> {
        let id = state.next_id();
        let mut attrs = BTreeMap::new();

        let (physical_id, arn) = match &descriptor.properties {
            ResourceProperties::Bucket(bucket) => {
                if let Some(logging) = &bucket.access_logging {
                    if !state.is_live_bucket(&logging.destination_bucket) {
                        return Err(ProvisioningError::InvalidDescriptor(format!(
                            "access log bucket {} does not exist",
                            logging.destination_bucket
                        )));
                    }
                }
                attrs.insert(
                    attributes::WEBSITE_DOMAIN.to_string(),
                    s3_website_domain(&bucket.bucket_name, &self.region),
                );
                match s3_website_hosted_zone_id(&self.region) {
                    Some(zone) => {
                        attrs.insert(
                            attributes::WEBSITE_HOSTED_ZONE_ID.to_string(),
                            zone.to_string(),
                        );
                    }
                    None => warn!(
                        region = %self.region,
                        bucket = %bucket.bucket_name,
                        "No website hosted zone known for region; bucket cannot be an alias target"
                    ),
                }
                attrs.insert(
                    attributes::REGIONAL_DOMAIN_NAME.to_string(),
                    s3_regional_domain(&bucket.bucket_name, &self.region),
                );
                (bucket.bucket_name.clone(), s3_bucket_arn(&bucket.bucket_name))
            }
            ResourceProperties::HostedZone(_) => {
                let zone_id = format!("Z{:020}", id);
                attrs.insert(
                    attributes::NAME_SERVERS.to_string(),
                    (1..=4)
                        .map(|n| format!("ns-{}.awsdns-{:02}.net", id * 10 + n, n))
                        .collect::<Vec<_>>()
                        .join(","),
                );
                let arn = format!("arn:aws:route53:::hostedzone/{}", zone_id);
                (zone_id, arn)
            }
            ResourceProperties::Certificate(cert) => {
                if !state.live_zone_ids().contains(cert.validation_zone_id.as_str()) {
                    return Err(ProvisioningError::InvalidDescriptor(format!(
                        "validation zone {} does not exist",
                        cert.validation_zone_id
                    )));
                }
                let arn = format!(
                    "arn:aws:acm:{}:{}:certificate/{:08x}-0000-4000-8000-{:012x}",
                    cert.region, SIMULATED_ACCOUNT_ID, id, id
                );
                (arn.clone(), arn)
            }
            ResourceProperties::Distribution(_) => {
                let distribution_id = format!("E{:013}", id);
                attrs.insert(
                    attributes::DOMAIN_NAME.to_string(),
                    format!("d{:013}.cloudfront.net", id),
                );
                let arn = format!(
                    "arn:aws:cloudfront::{}:distribution/{}",
                    SIMULATED_ACCOUNT_ID, distribution_id
                );
                (distribution_id, arn)
            }
            ResourceProperties::RecordSet(record) => {
                if !state.live_zone_ids().contains(record.hosted_zone_id.as_str()) {
                    return Err(ProvisioningError::InvalidDescriptor(format!(
                        "hosted zone {} does not exist",
                        record.hosted_zone_id
                    )));
                }
                let arn = format!(
                    "arn:aws:route53:::hostedzone/{}/recordset/{}/{}",
                    record.hosted_zone_id, record.record_name, record.record_type
                );
                (record.record_name.clone(), arn)
            }
            ResourceProperties::BuildProject(project) => {
                let arn = format!(
                    "arn:aws:codebuild:{}:{}:project/{}",
                    self.region, SIMULATED_ACCOUNT_ID, project.project_name
                );
                (project.project_name.clone(), arn)
            }
        };

        Ok(ResourceHandle {
            resource_type: descriptor.resource_type(),
            logical_id: descriptor.logical_id.clone(),
            physical_id,
            arn,
            attributes: attrs,
            removal_policy: descriptor.removal_policy,
            ownership: Ownership::Owned,
        })
    }
}

fn transition(
    record: &mut ResourceRecord,
    command: LifecycleCommand,
) -> ProvisioningResult<()> {
    let output = record
        .lifecycle
        .transition_with_history(command, Utc::now())
        .map_err(|e: TransitionError| ProvisioningError::Engine(e.to_string()))?;
    for warning in output.warnings {
        warn!(logical_id = %record.descriptor.logical_id, "{}", warning);
    }
    if output.is_critical {
        let state = *record.lifecycle.current_state();
        info!(
            logical_id = %record.descriptor.logical_id,
            resource_type = %record.descriptor.resource_type(),
            state = %state,
            "Critical lifecycle transition"
        );
        record.critical_states.push(state);
    }
    Ok(())
}

#[async_trait]
impl ProvisioningEngine for InMemoryEngine {
    fn region(&self) -> &str {
        &self.region
    }

    async fn create(&self, descriptor: ResourceDescriptor) -> ProvisioningResult<ResourceHandle> {
        let mut state = self.state.lock().await;
        let resource_type = descriptor.resource_type();
        let logical_id = descriptor.logical_id.clone();
        state.calls.push(EngineCall::Create {
            resource_type,
            logical_id: logical_id.clone(),
        });

        let name_key = descriptor
            .physical_name()
            .map(|name| (resource_type, name.to_string()));

        // Reapplication of an existing resource
        if let Some(record) = state.resources.get_mut(&logical_id) {
            if *record.lifecycle.current_state() == ResourceState::Active {
                if record.descriptor.physical_name() != descriptor.physical_name() {
                    return Err(ProvisioningError::Conflict(format!(
                        "{} cannot be renamed in place",
                        logical_id
                    )));
                }
                transition(record, LifecycleCommand::Update)?;
                let handle = record.handle.as_mut().ok_or_else(|| {
                    ProvisioningError::Engine(format!("{} has no handle", logical_id))
                })?;
                handle.removal_policy = descriptor.removal_policy;
                let handle = handle.clone();
                record.descriptor = descriptor;
                debug!(logical_id = %logical_id, "Updated resource in place");
                return Ok(handle);
            }
        }

        if let Some(key) = &name_key {
            let claimed_elsewhere = state
                .names
                .get(key)
                .is_some_and(|owner| *owner != logical_id);
            if claimed_elsewhere || state.foreign_names.contains(key) {
                return Err(ProvisioningError::Conflict(format!(
                    "{} {} already exists",
                    resource_type, key.1
                )));
            }
        }

        let mut record = ResourceRecord {
            descriptor: descriptor.clone(),
            handle: None,
            lifecycle: StateMachineWithHistory::new(ResourceState::Creating),
            critical_states: Vec::new(),
        };

        let built = match state.faults.get(&resource_type).cloned() {
            Some(fault) => Err(fault),
            None => self.build_handle(&mut state, &descriptor),
        };

        match built {
            Ok(handle) => {
                transition(&mut record, LifecycleCommand::Complete)?;
                record.handle = Some(handle.clone());
                if let Some(key) = name_key {
                    state.names.insert(key, logical_id.clone());
                }
                if let ResourceProperties::HostedZone(zone) = &descriptor.properties {
                    state.zones.insert(zone.zone_name.clone(), handle.clone());
                }
                state.resources.insert(logical_id, record);
                Ok(handle)
            }
            Err(err) => {
                transition(&mut record, LifecycleCommand::Fail(err.to_string()))?;
                state.resources.insert(logical_id, record);
                Err(err)
            }
        }
    }

    async fn lookup_hosted_zone(&self, domain_name: &DomainName) -> ProvisioningResult<ResourceHandle> {
        let mut state = self.state.lock().await;
        state
            .calls
            .push(EngineCall::LookupHostedZone(domain_name.to_string()));

        state
            .zones
            .get(domain_name.as_str())
            .map(|handle| ResourceHandle {
                ownership: Ownership::Imported,
                removal_policy: RemovalPolicy::Retain,
                ..handle.clone()
            })
            .ok_or_else(|| ProvisioningError::NotFound(format!("hosted zone {}", domain_name)))
    }

    async fn destroy(&self, handle: &ResourceHandle) -> ProvisioningResult<TeardownOutcome> {
        let mut state = self.state.lock().await;
        state.calls.push(EngineCall::Destroy(handle.logical_id.clone()));

        if handle.is_imported() {
            return Ok(TeardownOutcome::Retained);
        }

        let state = &mut *state;
        let record = state
            .resources
            .get_mut(&handle.logical_id)
            .ok_or_else(|| ProvisioningError::NotFound(handle.logical_id.clone()))?;

        let current = *record.lifecycle.current_state();
        if current.is_terminal() {
            debug!(logical_id = %handle.logical_id, state = %current, "Destroy of settled resource");
            return match current {
                ResourceState::Retained => Ok(TeardownOutcome::Retained),
                _ => Err(ProvisioningError::NotFound(format!(
                    "{} was already deleted",
                    handle.logical_id
                ))),
            };
        }

        if record.descriptor.removal_policy == RemovalPolicy::Retain {
            transition(record, LifecycleCommand::Retain)?;
            return Ok(TeardownOutcome::Retained);
        }

        transition(record, LifecycleCommand::BeginDelete)?;

        if let ResourceProperties::Bucket(bucket) = &record.descriptor.properties {
            let holds_objects = state
                .objects
                .get(&bucket.bucket_name)
                .is_some_and(|objects| !objects.is_empty());
            if holds_objects {
                if bucket.auto_delete_objects {
                    state.objects.remove(&bucket.bucket_name);
                } else {
                    let err = ProvisioningError::BucketNotEmpty(bucket.bucket_name.clone());
                    transition(record, LifecycleCommand::Fail(err.to_string()))?;
                    return Err(err);
                }
            }
        }

        transition(record, LifecycleCommand::FinishDelete)?;

        if let Some(name) = record.descriptor.physical_name() {
            state
                .names
                .remove(&(record.descriptor.resource_type(), name.to_string()));
        }
        if let ResourceProperties::HostedZone(zone) = &record.descriptor.properties {
            state.zones.remove(&zone.zone_name);
        }

        Ok(TeardownOutcome::Destroyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BucketProperties, HostedZoneProperties};

    fn bucket(logical_id: &str, name: &str, auto_delete: bool) -> ResourceDescriptor {
        ResourceDescriptor::new(
            logical_id,
            ResourceProperties::Bucket(BucketProperties {
                bucket_name: name.to_string(),
                website: None,
                public_read: false,
                access_logging: None,
                auto_delete_objects: auto_delete,
            }),
            RemovalPolicy::Destroy,
        )
    }

    #[tokio::test]
    async fn test_create_bucket_handle() {
        let engine = InMemoryEngine::new("us-east-1");
        let handle = engine
            .create(bucket("SiteBucket", "example.com", false))
            .await
            .unwrap();

        assert_eq!(handle.physical_id, "example.com");
        assert_eq!(handle.arn, "arn:aws:s3:::example.com");
        assert_eq!(
            handle.attribute(attributes::WEBSITE_DOMAIN).unwrap(),
            "example.com.s3-website-us-east-1.amazonaws.com"
        );
        assert_eq!(
            engine.resource_state("SiteBucket").await,
            Some(ResourceState::Active)
        );
    }

    #[tokio::test]
    async fn test_reapply_updates_in_place() {
        let engine = InMemoryEngine::new("us-east-1");
        let first = engine
            .create(bucket("SiteBucket", "example.com", false))
            .await
            .unwrap();
        let second = engine
            .create(bucket("SiteBucket", "example.com", false))
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(engine.active_resources().await, vec!["SiteBucket".to_string()]);
        let record = engine.record("SiteBucket").await.unwrap();
        assert_eq!(record.lifecycle.history().len(), 2);
    }

    #[tokio::test]
    async fn test_name_conflict() {
        let engine = InMemoryEngine::new("us-east-1")
            .with_foreign_name(ResourceType::Bucket, "taken.com");
        let result = engine.create(bucket("SiteBucket", "taken.com", false)).await;
        assert!(matches!(result, Err(ProvisioningError::Conflict(_))));

        let engine = InMemoryEngine::new("us-east-1");
        engine.create(bucket("A", "same.com", false)).await.unwrap();
        let result = engine.create(bucket("B", "same.com", false)).await;
        assert!(matches!(result, Err(ProvisioningError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_fault_marks_resource_failed() {
        let engine = InMemoryEngine::new("us-east-1").with_fault(
            ResourceType::Bucket,
            ProvisioningError::PermissionDenied("s3:CreateBucket".to_string()),
        );
        let result = engine.create(bucket("SiteBucket", "example.com", false)).await;

        assert!(matches!(result, Err(ProvisioningError::PermissionDenied(_))));
        assert_eq!(
            engine.resource_state("SiteBucket").await,
            Some(ResourceState::Failed)
        );
        let record = engine.record("SiteBucket").await.unwrap();
        assert_eq!(record.critical_states, vec![ResourceState::Failed]);
    }

    #[tokio::test]
    async fn test_lookup_sees_registered_and_created_zones() {
        let engine = InMemoryEngine::new("us-east-1").with_existing_zone("example.com", "ZEXISTING");
        let found = engine
            .lookup_hosted_zone(&DomainName::new("example.com").unwrap())
            .await
            .unwrap();
        assert_eq!(found.physical_id, "ZEXISTING");
        assert!(found.is_imported());

        let missing = engine
            .lookup_hosted_zone(&DomainName::new("other.org").unwrap())
            .await;
        assert!(matches!(missing, Err(ProvisioningError::NotFound(_))));

        engine
            .create(ResourceDescriptor::new(
                "HostedZone",
                ResourceProperties::HostedZone(HostedZoneProperties {
                    zone_name: "other.org".to_string(),
                }),
                RemovalPolicy::Destroy,
            ))
            .await
            .unwrap();
        assert!(engine
            .lookup_hosted_zone(&DomainName::new("other.org").unwrap())
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_destroy_non_empty_bucket() {
        let engine = InMemoryEngine::new("us-east-1");
        let plain = engine.create(bucket("Plain", "plain.com", false)).await.unwrap();
        let auto = engine.create(bucket("Auto", "auto.com", true)).await.unwrap();
        engine.put_object("plain.com", "index.html").await.unwrap();
        engine.put_object("auto.com", "logs/1").await.unwrap();

        let refused = engine.destroy(&plain).await;
        assert!(matches!(refused, Err(ProvisioningError::BucketNotEmpty(_))));
        assert_eq!(engine.resource_state("Plain").await, Some(ResourceState::Active));

        assert_eq!(engine.destroy(&auto).await, Ok(TeardownOutcome::Destroyed));
        assert_eq!(engine.resource_state("Auto").await, Some(ResourceState::Deleted));
        assert_eq!(engine.object_count("auto.com").await, 0);
    }

    #[tokio::test]
    async fn test_destroy_settled_resources() {
        let engine = InMemoryEngine::new("us-east-1");
        let deleted = engine.create(bucket("Gone", "gone.com", false)).await.unwrap();
        let mut kept = bucket("Kept", "kept.com", false);
        kept.removal_policy = RemovalPolicy::Retain;
        let kept = engine.create(kept).await.unwrap();

        assert_eq!(engine.destroy(&deleted).await, Ok(TeardownOutcome::Destroyed));
        assert_eq!(engine.destroy(&kept).await, Ok(TeardownOutcome::Retained));

        // Second pass leaves the lifecycle untouched
        assert!(matches!(
            engine.destroy(&deleted).await,
            Err(ProvisioningError::NotFound(_))
        ));
        assert_eq!(engine.destroy(&kept).await, Ok(TeardownOutcome::Retained));

        let gone = engine.record("Gone").await.unwrap();
        assert_eq!(gone.lifecycle.history().len(), 3);
        assert_eq!(gone.critical_states, vec![ResourceState::Deleted]);
        let kept = engine.record("Kept").await.unwrap();
        assert_eq!(*kept.lifecycle.current_state(), ResourceState::Retained);
        assert!(kept.critical_states.is_empty());
    }

    #[tokio::test]
    async fn test_put_object_requires_live_bucket() {
        let engine = InMemoryEngine::new("us-east-1");
        assert!(matches!(
            engine.put_object("missing.com", "a").await,
            Err(ProvisioningError::NotFound(_))
        ));
    }
}
