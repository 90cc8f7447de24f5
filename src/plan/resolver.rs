// Copyright (c) 2025 - Cowboy AI, Inc.
//! Dependency Resolver
//!
//! Pure function from a [`SiteConfiguration`] to an ordered
//! [`ResourcePlan`]. No provisioning call is made here; invalid flag
//! combinations surface as [`ValidationError`]s before anything executes.
//!
//! # Rules
//!
//! 1. Certificate without an obtainable zone → `MissingZoneForCertificate`
//! 2. Distribution without a certificate → `MissingCertificateForCdn`
//! 3. Zone: create if requested, else lookup when DNS or TLS needs it
//! 4. Certificate iff TLS; depends on the zone
//! 5. Distribution iff CDN; depends on the bucket and the certificate
//! 6. Record iff DNS; depends on the zone and the distribution, or on the
//!    bucket when there is no distribution
//! 7. Logging bucket iff access logging; precedes the content bucket
//! 8. Content bucket always; depends on the logging bucket when planned

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use super::{
    AliasTarget, CertificateSource, PlanStep, ResolveResult, ResourcePlan, ResourcePlanNode,
    ZoneMode,
};
use crate::domain::invariants::validate_site_configuration;
use crate::domain::{ResourceKind, SiteConfiguration};
use crate::errors::LogicError;

/// Resolve the ordered resource plan for a configuration
///
/// # Errors
/// - [`ValidationError`](crate::domain::ValidationError) for unsatisfiable
///   flag combinations (rules 1 and 2, first violated wins)
/// - [`LogicError`] if the declared graph cannot be ordered
pub fn resolve(config: &SiteConfiguration) -> ResolveResult<ResourcePlan> {
    validate_site_configuration(config)?;

    let ordered = topological_sort(declare_nodes(config))?;

    for node in &ordered {
        debug!(
            site_domain = %config.site_domain(),
            kind = %node.kind,
            skip = node.skip(),
            depends_on = ?node.depends_on,
            "Resolved plan node"
        );
    }

    Ok(ResourcePlan::from_ordered(ordered))
}

fn zone_mode(config: &SiteConfiguration) -> Option<ZoneMode> {
    if config.create_hosted_zone() {
        Some(ZoneMode::Create)
    } else if config.enable_route53() || config.enable_ssl_cert() {
        Some(ZoneMode::Lookup)
    } else {
        None
    }
}

fn certificate_source(config: &SiteConfiguration) -> Option<CertificateSource> {
    if config.enable_ssl_cert() {
        Some(CertificateSource::Issued)
    } else {
        config
            .external_certificate_arn()
            .map(|arn| CertificateSource::External(arn.to_string()))
    }
}

/// Declare one node per kind, skipped or planned, with its dependencies
fn declare_nodes(config: &SiteConfiguration) -> Vec<ResourcePlanNode> {
    use ResourceKind::*;

    let logging = config.enable_logging_access();
    let certificate = config.enable_ssl_cert();

    let logging_node = if logging {
        ResourcePlanNode::planned(PlanStep::LoggingBucket, [])
    } else {
        ResourcePlanNode::skipped(LoggingBucket)
    };

    let bucket_node = ResourcePlanNode::planned(
        PlanStep::ContentBucket {
            access_logs: logging,
        },
        logging.then_some(LoggingBucket),
    );

    let zone_node = match zone_mode(config) {
        Some(mode) => ResourcePlanNode::planned(PlanStep::HostedZone { mode }, []),
        None => ResourcePlanNode::skipped(HostedZone),
    };

    let certificate_node = if certificate {
        ResourcePlanNode::planned(PlanStep::Certificate, [HostedZone])
    } else {
        ResourcePlanNode::skipped(Certificate)
    };

    let distribution_node = match certificate_source(config) {
        Some(source) if config.enable_cloudfront_distribution() => {
            let mut depends_on = vec![ContentBucket];
            if source == CertificateSource::Issued {
                depends_on.push(Certificate);
            }
            ResourcePlanNode::planned(
                PlanStep::CdnDistribution {
                    certificate: source,
                },
                depends_on,
            )
        }
        _ => ResourcePlanNode::skipped(CdnDistribution),
    };

    let record_node = if config.enable_route53() {
        let (target, front) = if distribution_node.skip() {
            (AliasTarget::Bucket, ContentBucket)
        } else {
            (AliasTarget::Distribution, CdnDistribution)
        };
        ResourcePlanNode::planned(PlanStep::DnsRecord { target }, [HostedZone, front])
    } else {
        ResourcePlanNode::skipped(DnsRecord)
    };

    vec![
        logging_node,
        bucket_node,
        zone_node,
        certificate_node,
        distribution_node,
        record_node,
    ]
}

/// Order nodes so every dependency precedes its dependents
///
/// Kahn's algorithm; among ready nodes the lowest [`ResourceKind::rank`] goes
/// first, which fixes the order between independent nodes.
///
/// # Errors
/// - [`LogicError::DuplicateNode`] if a kind is declared twice
/// - [`LogicError::UnresolvedDependency`] if an active node depends on a kind
///   that is skipped or absent
/// - [`LogicError::DependencyCycle`] if no ready node remains
pub fn topological_sort(nodes: Vec<ResourcePlanNode>) -> Result<Vec<ResourcePlanNode>, LogicError> {
    let mut pending: BTreeMap<usize, ResourcePlanNode> = BTreeMap::new();
    for node in nodes {
        let kind = node.kind;
        if pending.insert(kind.rank(), node).is_some() {
            return Err(LogicError::DuplicateNode(kind));
        }
    }

    let active: BTreeSet<ResourceKind> = pending
        .values()
        .filter(|node| !node.skip())
        .map(|node| node.kind)
        .collect();

    for node in pending.values() {
        if let Some(missing) = node.depends_on.iter().find(|dep| !active.contains(dep)) {
            return Err(LogicError::UnresolvedDependency {
                kind: node.kind,
                missing: *missing,
            });
        }
    }

    let mut placed = BTreeSet::new();
    let mut ordered = Vec::with_capacity(pending.len());

    while !pending.is_empty() {
        let ready = pending
            .iter()
            .find(|(_, node)| node.depends_on.iter().all(|dep| placed.contains(dep)))
            .map(|(rank, _)| *rank);

        let Some(node) = ready.and_then(|rank| pending.remove(&rank)) else {
            return Err(LogicError::DependencyCycle(
                pending.values().map(|node| node.kind).collect(),
            ));
        };

        placed.insert(node.kind);
        ordered.push(node);
    }

    Ok(ordered)
}
