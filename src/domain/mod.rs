// Copyright (c) 2025 - Cowboy AI, Inc.
//! Static Site Domain Models
//!
//! Core domain concepts for static-site provisioning: validated names, the
//! feature-flag configuration, the resource taxonomy and the generic resource
//! descriptor model.
//!
//! # Value Objects with Invariants
//!
//! - [`DomainName`] - DNS-validated domain names (RFC 1123)
//! - [`SiteDomain`] - canonical `sub.domain` identity, derived exactly once
//! - [`ResourceKind`] - roles a resource plays in the deployment
//!
//! # Configuration
//!
//! - [`SiteConfiguration`] - immutable feature flags, validated by the pure
//!   functions in [`invariants`]

pub mod invariants;
pub mod resource;
pub mod resource_kind;
pub mod site_configuration;
pub mod site_domain;

pub use invariants::{ValidationError, ValidationResult};
pub use resource::{
    attributes, AccessLogging, AliasRecordProperties, AliasTargetEndpoint, BucketProperties,
    BuildProjectProperties, CertificateProperties, DistributionProperties, ErrorResponse,
    HostedZoneProperties, Ownership, PolicyStatement, RemovalPolicy, ResourceDescriptor,
    ResourceHandle, ResourceProperties, SourceRepository, StackOutput, WebhookFilterGroup,
    WebsiteConfiguration,
};
pub use resource_kind::{ResourceKind, ResourceType};
pub use site_configuration::{SiteConfiguration, SiteConfigurationBuilder};
pub use site_domain::{DomainName, DomainNameError, SiteDomain};
