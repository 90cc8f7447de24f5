// Copyright (c) 2025 - Cowboy AI, Inc.
//! Site Composer
//!
//! Executes a resolved [`ResourcePlan`] against a [`ProvisioningEngine`],
//! one node at a time in plan order, and freezes the collected handles into
//! [`DeploymentOutputs`].
//!
//! # Failure semantics
//!
//! Provisioning calls are not rolled back. When node *k* fails, the handles
//! of nodes *1..k-1* stay in the account and are carried by the returned
//! [`CompositionError`] so an operator can clean them up. No call is retried.
//!
//! # Teardown
//!
//! [`SiteComposer::teardown`] walks the outputs in reverse provisioning
//! order. Imported zones and `Retain` resources are left in place; buckets
//! only disappear if they are empty or allow object auto-deletion.

pub mod descriptors;
pub mod outputs;

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::domain::{DomainName, ResourceHandle, ResourceKind, SiteConfiguration, SiteDomain};
use crate::engine::{ProvisioningEngine, TeardownOutcome};
use crate::errors::{LogicError, ProvisioningError};
use crate::plan::{AliasTarget, CertificateSource, PlanStep, ResourcePlan, ZoneMode};

pub use outputs::{DeploymentOutputs, OutputsAccumulator};

/// Errors raised while executing or tearing down a plan
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    /// Lookup-mode zone does not exist; never retried
    #[error("Hosted zone for {domain_name} not found while deploying {site_domain}: {source}")]
    ZoneNotFound {
        domain_name: DomainName,
        site_domain: SiteDomain,
        source: ProvisioningError,
        created: Vec<ResourceHandle>,
    },

    /// An engine call failed
    #[error("Provisioning {kind} for {site_domain} failed: {source}")]
    Provisioning {
        kind: ResourceKind,
        site_domain: SiteDomain,
        source: ProvisioningError,
        created: Vec<ResourceHandle>,
    },

    /// Internal invariant violated during execution
    #[error("Logic error: {source}")]
    Logic {
        source: LogicError,
        created: Vec<ResourceHandle>,
    },
}

impl CompositionError {
    /// Handles left in the account when the error was raised
    pub fn created(&self) -> &[ResourceHandle] {
        match self {
            Self::ZoneNotFound { created, .. }
            | Self::Provisioning { created, .. }
            | Self::Logic { created, .. } => created,
        }
    }

    /// Kind of the node that failed, when known
    pub fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::ZoneNotFound { .. } => Some(ResourceKind::HostedZone),
            Self::Provisioning { kind, .. } => Some(*kind),
            Self::Logic { source, .. } => match source {
                LogicError::UnresolvedDependency { kind, .. }
                | LogicError::OutputAlreadyRecorded(kind)
                | LogicError::UnexpectedResourceType { kind, .. } => Some(*kind),
                _ => None,
            },
        }
    }
}

/// Result type for composition operations
pub type CompositionResult<T> = Result<T, CompositionError>;

/// Kinds removed and kinds left behind by a teardown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeardownReport {
    pub destroyed: Vec<ResourceKind>,
    pub retained: Vec<ResourceKind>,
}

/// Failure of a single step, before partial progress is attached
enum StepFailure {
    ZoneNotFound(ProvisioningError),
    Provisioning(ProvisioningError),
    Logic(LogicError),
}

impl From<ProvisioningError> for StepFailure {
    fn from(err: ProvisioningError) -> Self {
        StepFailure::Provisioning(err)
    }
}

impl From<LogicError> for StepFailure {
    fn from(err: LogicError) -> Self {
        StepFailure::Logic(err)
    }
}

/// Orchestrates plan execution against an engine
pub struct SiteComposer<E> {
    engine: E,
}

impl<E: ProvisioningEngine> SiteComposer<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Execute `plan` for `config`
    ///
    /// # Errors
    /// - `ZoneNotFound` when a lookup-mode zone is missing
    /// - `Provisioning` for any other failed engine call
    /// - `Logic` if a node runs before its dependencies
    #[instrument(skip(self, plan, config), fields(site_domain = %config.site_domain()))]
    pub async fn compose(
        &self,
        plan: &ResourcePlan,
        config: &SiteConfiguration,
    ) -> CompositionResult<DeploymentOutputs> {
        let site_domain = config.site_domain();
        let mut acc = OutputsAccumulator::new(site_domain.clone());

        for node in plan.active() {
            if let Some(missing) = node.depends_on.iter().find(|dep| !acc.contains(**dep)) {
                return Err(CompositionError::Logic {
                    source: LogicError::UnresolvedDependency {
                        kind: node.kind,
                        missing: *missing,
                    },
                    created: acc.created(),
                });
            }
            let Some(step) = &node.step else {
                continue;
            };

            let handle = match self.execute(step, config, &acc).await {
                Ok(handle) => handle,
                Err(failure) => {
                    let created = acc.created();
                    error!(
                        kind = %node.kind,
                        created = created.len(),
                        "Plan aborted; earlier resources remain provisioned"
                    );
                    return Err(match failure {
                        StepFailure::ZoneNotFound(source) => CompositionError::ZoneNotFound {
                            domain_name: config.domain_name().clone(),
                            site_domain: site_domain.clone(),
                            source,
                            created,
                        },
                        StepFailure::Provisioning(source) => CompositionError::Provisioning {
                            kind: node.kind,
                            site_domain: site_domain.clone(),
                            source,
                            created,
                        },
                        StepFailure::Logic(source) => CompositionError::Logic { source, created },
                    });
                }
            };

            info!(
                kind = %node.kind,
                logical_id = %handle.logical_id,
                physical_id = %handle.physical_id,
                "Resource provisioned"
            );

            acc.record(node.kind, handle)
                .map_err(|source| CompositionError::Logic {
                    source,
                    created: acc.created(),
                })?;
        }

        let created = acc.created();
        let outputs = acc
            .finish(Uuid::now_v7())
            .map_err(|source| CompositionError::Logic { source, created })?;

        info!(
            deployment_id = %outputs.deployment_id(),
            resources = outputs.provisioned().len(),
            "Composition complete"
        );
        Ok(outputs)
    }

    async fn execute(
        &self,
        step: &PlanStep,
        config: &SiteConfiguration,
        acc: &OutputsAccumulator,
    ) -> Result<ResourceHandle, StepFailure> {
        use ResourceKind::*;

        let site = config.site_domain();
        let kind = step.kind();

        let descriptor = match step {
            PlanStep::LoggingBucket => descriptors::logging_bucket(site),
            PlanStep::ContentBucket { access_logs } => {
                let logging = if *access_logs {
                    Some(acc.require(kind, LoggingBucket)?)
                } else {
                    None
                };
                descriptors::content_bucket(site, logging)
            }
            PlanStep::HostedZone {
                mode: ZoneMode::Create,
            } => descriptors::hosted_zone(config.domain_name()),
            PlanStep::HostedZone {
                mode: ZoneMode::Lookup,
            } => {
                info!(domain_name = %config.domain_name(), "Looking up hosted zone");
                return match self.engine.lookup_hosted_zone(config.domain_name()).await {
                    Ok(zone) => Ok(zone),
                    Err(err @ ProvisioningError::NotFound(_)) => Err(StepFailure::ZoneNotFound(err)),
                    Err(err) => Err(err.into()),
                };
            }
            PlanStep::Certificate => {
                descriptors::certificate(site, acc.require(kind, HostedZone)?)
            }
            PlanStep::CdnDistribution { certificate } => {
                let bucket = acc.require(kind, ContentBucket)?;
                let certificate_arn = match certificate {
                    CertificateSource::Issued => acc.require(kind, Certificate)?.arn.as_str(),
                    CertificateSource::External(arn) => arn.as_str(),
                };
                descriptors::distribution(site, bucket, certificate_arn)?
            }
            PlanStep::DnsRecord { target } => {
                let zone = acc.require(kind, HostedZone)?;
                let endpoint = match target {
                    AliasTarget::Distribution => {
                        descriptors::distribution_alias_target(acc.require(kind, CdnDistribution)?)?
                    }
                    AliasTarget::Bucket => {
                        descriptors::bucket_alias_target(acc.require(kind, ContentBucket)?)?
                    }
                };
                descriptors::alias_record(site, zone, endpoint)
            }
        };

        info!(
            kind = %kind,
            logical_id = %descriptor.logical_id,
            resource_type = %descriptor.resource_type(),
            "Provisioning resource"
        );
        Ok(self.engine.create(descriptor).await?)
    }

    /// Remove everything a pass provisioned, newest first
    ///
    /// Stops at the first failure; the error lists the handles still in place.
    #[instrument(skip(self, outputs), fields(site_domain = %outputs.site_domain()))]
    pub async fn teardown(&self, outputs: &DeploymentOutputs) -> CompositionResult<TeardownReport> {
        let provisioned = outputs.provisioned();
        let mut report = TeardownReport::default();

        for (index, (kind, handle)) in provisioned.iter().enumerate().rev() {
            match self.engine.destroy(handle).await {
                Ok(TeardownOutcome::Destroyed) => {
                    info!(kind = %kind, logical_id = %handle.logical_id, "Resource destroyed");
                    report.destroyed.push(*kind);
                }
                Ok(TeardownOutcome::Retained) => {
                    warn!(kind = %kind, logical_id = %handle.logical_id, "Resource retained");
                    report.retained.push(*kind);
                }
                Err(source) => {
                    error!(kind = %kind, error = %source, "Teardown stopped");
                    return Err(CompositionError::Provisioning {
                        kind: *kind,
                        site_domain: outputs.site_domain().clone(),
                        source,
                        created: provisioned[..=index]
                            .iter()
                            .map(|(_, handle)| (*handle).clone())
                            .filter(|handle| !handle.is_imported())
                            .collect(),
                    });
                }
            }
        }

        Ok(report)
    }
}
