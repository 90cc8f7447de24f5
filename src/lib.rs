//! Static site infrastructure provisioning
//!
//! Resolves a static website's feature flags into an ordered resource plan
//! (content bucket, access logging, hosted zone, certificate, CDN, DNS alias)
//! and executes it against a provisioning engine, then wires the build
//! pipeline that publishes into the content bucket.

pub mod compose;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod pipeline;
pub mod plan;
pub mod service;
pub mod state_machine;

// Re-export commonly used types
pub use compose::{CompositionError, CompositionResult, DeploymentOutputs, SiteComposer};
pub use config::EnvironmentConfig;
pub use domain::{ResourceKind, SiteConfiguration, SiteDomain, ValidationError};
pub use engine::{InMemoryEngine, ProvisioningEngine, TemplateEngine};
pub use errors::{DeploymentError, DeploymentResult, LogicError, ProvisioningError};
pub use plan::{resolve, ResourcePlan, ResourcePlanNode};
pub use service::{DeploymentReport, DeploymentService, SiteDeploymentService};
