// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Plan
//!
//! Declarative dependency graph for one deployment pass. Each
//! [`ResourcePlanNode`] carries a tagged [`PlanStep`] describing how the
//! resource is established, the kinds it depends on, and whether the flag
//! combination elides it.
//!
//! # Graph
//!
//! ```text
//! LoggingBucket ──> ContentBucket ──> CdnDistribution ──> DnsRecord
//! HostedZone ─────> Certificate ────> CdnDistribution
//! HostedZone ─────> DnsRecord
//! ContentBucket ──> DnsRecord          (only when no CdnDistribution)
//! ```
//!
//! The resolver ([`resolve`]) validates the configuration, declares all six
//! nodes and orders them topologically with the fixed tie-break
//! `LoggingBucket, HostedZone, Certificate, ContentBucket, CdnDistribution,
//! DnsRecord`.

pub mod resolver;

use serde::Serialize;
use std::collections::BTreeSet;

use crate::domain::{ResourceKind, ValidationError};
use crate::errors::LogicError;

pub use resolver::{resolve, topological_sort};

/// How the hosted zone is established
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneMode {
    /// Create a new public zone for the domain
    Create,
    /// Resolve an existing zone from the provider's registry
    Lookup,
}

/// Which certificate a distribution presents
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CertificateSource {
    /// The certificate issued by this deployment
    Issued,
    /// A certificate that already exists, by ARN
    External(String),
}

/// What the DNS alias record points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasTarget {
    Distribution,
    Bucket,
}

/// Tagged description of how a planned resource is established
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum PlanStep {
    LoggingBucket,
    ContentBucket { access_logs: bool },
    HostedZone { mode: ZoneMode },
    Certificate,
    CdnDistribution { certificate: CertificateSource },
    DnsRecord { target: AliasTarget },
}

impl PlanStep {
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::LoggingBucket => ResourceKind::LoggingBucket,
            Self::ContentBucket { .. } => ResourceKind::ContentBucket,
            Self::HostedZone { .. } => ResourceKind::HostedZone,
            Self::Certificate => ResourceKind::Certificate,
            Self::CdnDistribution { .. } => ResourceKind::CdnDistribution,
            Self::DnsRecord { .. } => ResourceKind::DnsRecord,
        }
    }
}

/// One entry of the resolved plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourcePlanNode {
    pub kind: ResourceKind,
    /// `None` when the flag combination elides the resource
    pub step: Option<PlanStep>,
    pub depends_on: BTreeSet<ResourceKind>,
}

impl ResourcePlanNode {
    /// A node that will be provisioned
    pub fn planned(step: PlanStep, depends_on: impl IntoIterator<Item = ResourceKind>) -> Self {
        Self {
            kind: step.kind(),
            step: Some(step),
            depends_on: depends_on.into_iter().collect(),
        }
    }

    /// A node elided by the configuration
    pub fn skipped(kind: ResourceKind) -> Self {
        Self {
            kind,
            step: None,
            depends_on: BTreeSet::new(),
        }
    }

    pub fn skip(&self) -> bool {
        self.step.is_none()
    }
}

/// Ordered, dependency-satisfying list of plan nodes
///
/// Holds every kind exactly once; skipped nodes keep their tie-break position
/// so the plan can be reported in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourcePlan {
    nodes: Vec<ResourcePlanNode>,
}

impl ResourcePlan {
    /// Wrap nodes that are already in execution order
    ///
    /// No ordering check is made here; the composer re-checks dependencies as
    /// it executes.
    pub fn from_ordered(nodes: Vec<ResourcePlanNode>) -> Self {
        Self { nodes }
    }

    /// All nodes, skipped ones included
    pub fn nodes(&self) -> &[ResourcePlanNode] {
        &self.nodes
    }

    /// Nodes that will be provisioned, in order
    pub fn active(&self) -> impl Iterator<Item = &ResourcePlanNode> {
        self.nodes.iter().filter(|node| !node.skip())
    }

    /// Kinds that will be provisioned, in order
    pub fn active_kinds(&self) -> Vec<ResourceKind> {
        self.active().map(|node| node.kind).collect()
    }

    pub fn node(&self, kind: ResourceKind) -> Option<&ResourcePlanNode> {
        self.nodes.iter().find(|node| node.kind == kind)
    }

    /// Step of an active node
    pub fn step(&self, kind: ResourceKind) -> Option<&PlanStep> {
        self.node(kind).and_then(|node| node.step.as_ref())
    }

    pub fn is_planned(&self, kind: ResourceKind) -> bool {
        self.step(kind).is_some()
    }

    /// Execution position of an active node
    pub fn position(&self, kind: ResourceKind) -> Option<usize> {
        self.active().position(|node| node.kind == kind)
    }
}

/// Errors produced while resolving a plan
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// Flag combination is unsatisfiable
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The declared graph is malformed
    #[error(transparent)]
    Logic(#[from] LogicError),
}

/// Result type for plan resolution
pub type ResolveResult<T> = Result<T, ResolveError>;
