// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provisioning Engine Abstraction
//!
//! The external collaborator that turns resource descriptors into real (or
//! synthesized) cloud resources. Reconciliation against existing cloud state,
//! retries of transient provider errors and duplicate-name protection are the
//! engine's concern, not the composer's.
//!
//! # Architecture
//!
//! ```text
//! SiteComposer ──create(descriptor)──> ProvisioningEngine ──> ResourceHandle
//!              ──lookup_hosted_zone──>
//!              ──destroy(handle)────> TeardownOutcome
//! ```
//!
//! # Implementations
//!
//! - [`InMemoryEngine`] - deterministic simulation with lifecycle tracking,
//!   name-conflict detection and fault injection
//! - [`TemplateEngine`] - synthesizes a CloudFormation-style JSON template

use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::{DomainName, ResourceDescriptor, ResourceHandle};
use crate::errors::ProvisioningResult;

pub mod endpoints;
pub mod memory;
pub mod template;

pub use memory::{EngineCall, InMemoryEngine};
pub use template::TemplateEngine;

/// Result of asking the engine to remove a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TeardownOutcome {
    Destroyed,
    Retained,
}

/// Provisioning engine trait
///
/// Every call is a single external operation. Calls are not transactional:
/// a failure leaves earlier calls' resources in place.
#[async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Region the deployment targets
    fn region(&self) -> &str;

    /// Create the described resource, or update it in place when the same
    /// logical id was already created with the same physical name
    async fn create(&self, descriptor: ResourceDescriptor) -> ProvisioningResult<ResourceHandle>;

    /// Resolve an existing public hosted zone by domain name
    ///
    /// # Errors
    /// - `ProvisioningError::NotFound` when the registry has no such zone
    async fn lookup_hosted_zone(&self, domain_name: &DomainName) -> ProvisioningResult<ResourceHandle>;

    /// Remove a resource according to its removal policy and ownership
    async fn destroy(&self, handle: &ResourceHandle) -> ProvisioningResult<TeardownOutcome>;
}

#[async_trait]
impl<E: ProvisioningEngine + ?Sized> ProvisioningEngine for Arc<E> {
    fn region(&self) -> &str {
        (**self).region()
    }

    async fn create(&self, descriptor: ResourceDescriptor) -> ProvisioningResult<ResourceHandle> {
        (**self).create(descriptor).await
    }

    async fn lookup_hosted_zone(&self, domain_name: &DomainName) -> ProvisioningResult<ResourceHandle> {
        (**self).lookup_hosted_zone(domain_name).await
    }

    async fn destroy(&self, handle: &ResourceHandle) -> ProvisioningResult<TeardownOutcome> {
        (**self).destroy(handle).await
    }
}
