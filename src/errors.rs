//! Error types for provisioning and deployment operations

use thiserror::Error;

use crate::compose::CompositionError;
use crate::domain::{ResourceKind, ResourceType, ValidationError};
use crate::plan::ResolveError;

/// Errors reported by a provisioning engine for a single external call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProvisioningError {
    /// The requested resource does not exist in the provider's registry
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// A resource with the same physical name is already owned by someone else
    #[error("Naming conflict: {0}")]
    Conflict(String),

    /// The caller lacks permission for the operation
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Account or service quota exhausted
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// Bucket still holds objects and its policy does not allow emptying it
    #[error("Bucket {0} is not empty")]
    BucketNotEmpty(String),

    /// Descriptor is malformed for the engine (missing attribute, bad reference)
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    /// Generic engine error
    #[error("Provisioning engine error: {0}")]
    Engine(String),
}

/// Result type for provisioning operations
pub type ProvisioningResult<T> = Result<T, ProvisioningError>;

/// Internal invariant violated; a defect, never a user-facing condition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogicError {
    /// A node reached execution before one of its dependencies
    #[error("{kind} depends on {missing}, which was not resolved first")]
    UnresolvedDependency {
        kind: ResourceKind,
        missing: ResourceKind,
    },

    /// The dependency graph cannot be ordered
    #[error("Dependency cycle among {0:?}")]
    DependencyCycle(Vec<ResourceKind>),

    /// The same plan kind appears twice
    #[error("Plan declares {0} more than once")]
    DuplicateNode(ResourceKind),

    /// A deployment output was written twice in one pass
    #[error("Output for {0} was already recorded")]
    OutputAlreadyRecorded(ResourceKind),

    /// An engine returned a handle of the wrong resource type for a kind
    #[error("{kind} expects a {expected} handle, got {actual}")]
    UnexpectedResourceType {
        kind: ResourceKind,
        expected: ResourceType,
        actual: ResourceType,
    },

    /// The plan finished without creating the content bucket
    #[error("Composition finished without a content bucket")]
    MissingContentBucket,
}

/// Top-level error for a whole deployment pass
#[derive(Debug, Error)]
pub enum DeploymentError {
    /// Configuration is internally inconsistent; nothing was provisioned
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A provisioning call failed part-way through composition
    #[error("Composition error: {0}")]
    Composition(#[from] CompositionError),

    /// Internal invariant violated
    #[error("Logic error: {0}")]
    Logic(#[from] LogicError),

    /// Build pipeline wiring failed after the site was composed
    #[error("Pipeline wiring error: {0}")]
    Pipeline(#[source] ProvisioningError),
}

/// Result type for deployment operations
pub type DeploymentResult<T> = Result<T, DeploymentError>;

impl From<ResolveError> for DeploymentError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Validation(err) => DeploymentError::Validation(err),
            ResolveError::Logic(err) => DeploymentError::Logic(err),
        }
    }
}

impl From<serde_json::Error> for ProvisioningError {
    fn from(err: serde_json::Error) -> Self {
        ProvisioningError::InvalidDescriptor(err.to_string())
    }
}
