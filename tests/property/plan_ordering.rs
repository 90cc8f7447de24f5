// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Plan Resolution
//!
//! Every one of the 64 flag combinations either fails validation with the
//! first violated rule, or yields a plan whose order satisfies every
//! declared dependency and that composes without a logic error.

use proptest::prelude::*;
use std::collections::BTreeSet;

use crate::fixtures::{engine_with_zone, site, Flags};
use static_site_infrastructure::compose::{CompositionError, SiteComposer};
use static_site_infrastructure::domain::{DomainName, ResourceKind, SiteDomain, ValidationError};
use static_site_infrastructure::plan::{resolve, AliasTarget, PlanStep, ResolveError};

// ============================================================================
// Property Test Strategies
// ============================================================================

/// Generate any feature flag combination
fn flags() -> impl Strategy<Value = Flags> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(logging, create_zone, route53, ssl, cdn, external_certificate)| Flags {
                logging,
                create_zone,
                route53,
                ssl,
                cdn,
                external_certificate,
            },
        )
}

/// Generate a valid sub-domain, possibly empty or blank
fn sub_domain() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("   ".to_string()),
        "[a-z][a-z0-9]{0,10}",
    ]
}

/// Validation outcome the rules predict for `flags`
fn expected_error(flags: Flags) -> Option<ValidationError> {
    if flags.ssl && !(flags.create_zone || flags.route53) {
        Some(ValidationError::MissingZoneForCertificate)
    } else if flags.cdn && !(flags.ssl || flags.external_certificate) {
        Some(ValidationError::MissingCertificateForCdn)
    } else {
        None
    }
}

fn valid_flags() -> impl Strategy<Value = Flags> {
    flags().prop_filter("flag combination must validate", |f| expected_error(*f).is_none())
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: Validation follows rule precedence
    ///
    /// Invalid combinations fail with the first violated rule; valid ones
    /// always resolve.
    #[test]
    fn prop_validation_precedence(flags in flags(), sub in sub_domain()) {
        let result = resolve(&site(&sub, flags));

        match expected_error(flags) {
            Some(expected) => prop_assert_eq!(result, Err(ResolveError::Validation(expected))),
            None => prop_assert!(result.is_ok(), "valid flags failed: {:?}", result),
        }
    }

    /// Property: Every kind appears exactly once
    #[test]
    fn prop_plan_is_complete(flags in valid_flags()) {
        let plan = resolve(&site("www", flags)).unwrap();
        let kinds: BTreeSet<ResourceKind> = plan.nodes().iter().map(|node| node.kind).collect();

        prop_assert_eq!(plan.nodes().len(), 6);
        prop_assert_eq!(kinds.len(), 6);
        prop_assert!(plan.is_planned(ResourceKind::ContentBucket));
    }

    /// Property: Dependencies are planned and precede their dependents
    #[test]
    fn prop_dependencies_precede_dependents(flags in valid_flags()) {
        let plan = resolve(&site("www", flags)).unwrap();

        for node in plan.active() {
            let position = plan.position(node.kind).unwrap();
            for dependency in &node.depends_on {
                let dep_position = plan.position(*dependency);
                prop_assert!(
                    dep_position.is_some_and(|p| p < position),
                    "{} runs before its dependency {}",
                    node.kind,
                    dependency
                );
            }
        }
    }

    /// Property: Fixed precedence pairs hold whenever both sides are planned
    #[test]
    fn prop_fixed_precedence(flags in valid_flags()) {
        let plan = resolve(&site("www", flags)).unwrap();
        let pairs = [
            (ResourceKind::LoggingBucket, ResourceKind::ContentBucket),
            (ResourceKind::HostedZone, ResourceKind::Certificate),
            (ResourceKind::Certificate, ResourceKind::CdnDistribution),
        ];

        for (before, after) in pairs {
            if let (Some(a), Some(b)) = (plan.position(before), plan.position(after)) {
                prop_assert!(a < b, "{} must precede {}", before, after);
            }
        }
    }

    /// Property: Without a distribution the record aliases the bucket
    #[test]
    fn prop_record_target_follows_distribution(flags in valid_flags()) {
        let plan = resolve(&site("www", flags)).unwrap();

        if let Some(PlanStep::DnsRecord { target }) = plan.step(ResourceKind::DnsRecord) {
            let node = plan.node(ResourceKind::DnsRecord).unwrap();
            if plan.is_planned(ResourceKind::CdnDistribution) {
                prop_assert_eq!(*target, AliasTarget::Distribution);
                prop_assert!(node.depends_on.contains(&ResourceKind::CdnDistribution));
            } else {
                prop_assert_eq!(*target, AliasTarget::Bucket);
                prop_assert!(node.depends_on.contains(&ResourceKind::ContentBucket));
                prop_assert!(!node.depends_on.contains(&ResourceKind::CdnDistribution));
            }
        }
    }

    /// Property: Planned kinds follow their flags
    #[test]
    fn prop_planned_kinds_follow_flags(flags in valid_flags()) {
        let plan = resolve(&site("www", flags)).unwrap();

        prop_assert_eq!(plan.is_planned(ResourceKind::LoggingBucket), flags.logging);
        prop_assert_eq!(plan.is_planned(ResourceKind::Certificate), flags.ssl);
        prop_assert_eq!(plan.is_planned(ResourceKind::CdnDistribution), flags.cdn);
        prop_assert_eq!(plan.is_planned(ResourceKind::DnsRecord), flags.route53);
        prop_assert_eq!(
            plan.is_planned(ResourceKind::HostedZone),
            flags.create_zone || flags.route53 || flags.ssl
        );
    }

    /// Property: Resolved plans never trip a logic error during composition
    #[test]
    fn prop_composition_has_no_logic_error(flags in valid_flags()) {
        let config = site("www", flags);
        let plan = resolve(&config).unwrap();
        let composer = SiteComposer::new(engine_with_zone());

        let result = tokio_test::block_on(composer.compose(&plan, &config));

        prop_assert!(
            !matches!(result, Err(CompositionError::Logic { .. })),
            "logic error for {:?}: {:?}",
            flags,
            result
        );
        let outputs = result.unwrap();
        let provisioned: Vec<ResourceKind> =
            outputs.provisioned().iter().map(|(kind, _)| *kind).collect();
        prop_assert_eq!(provisioned, plan.active_kinds());
    }

    /// Property: Empty and absent sub-domains derive the same site domain
    #[test]
    fn prop_site_domain_join_is_idempotent(blank in "[ \t]{0,4}") {
        let domain = DomainName::new("example.com").unwrap();
        let absent = SiteDomain::derive(&domain, None).unwrap();
        let empty = SiteDomain::derive(&domain, Some(blank.as_str())).unwrap();

        prop_assert_eq!(absent.as_str(), "example.com");
        prop_assert_eq!(absent, empty);
    }
}
