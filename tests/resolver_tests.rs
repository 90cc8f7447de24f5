// Copyright (c) 2025 - Cowboy AI, Inc.
//! Integration tests for dependency resolution
//!
//! Covers the documented scenarios and the validation precedence table.

mod fixtures;

use pretty_assertions::assert_eq;
use test_case::test_case;

use fixtures::{scenario_a, scenario_b, scenario_c, site, Flags};
use static_site_infrastructure::domain::{ResourceKind, ValidationError};
use static_site_infrastructure::plan::{
    resolve, AliasTarget, CertificateSource, PlanStep, ResolveError, ZoneMode,
};

use ResourceKind::*;

#[test]
fn test_scenario_a_full_stack() {
    let config = scenario_a();
    let plan = resolve(&config).unwrap();

    assert_eq!(config.site_domain().as_str(), "www.example.com");
    assert_eq!(
        plan.active_kinds(),
        vec![
            LoggingBucket,
            HostedZone,
            Certificate,
            ContentBucket,
            CdnDistribution,
            DnsRecord
        ]
    );
    assert_eq!(
        plan.step(HostedZone),
        Some(&PlanStep::HostedZone {
            mode: ZoneMode::Create
        })
    );
    assert_eq!(
        plan.step(CdnDistribution),
        Some(&PlanStep::CdnDistribution {
            certificate: CertificateSource::Issued
        })
    );
    assert_eq!(
        plan.step(DnsRecord),
        Some(&PlanStep::DnsRecord {
            target: AliasTarget::Distribution
        })
    );
    assert!(plan
        .node(DnsRecord)
        .unwrap()
        .depends_on
        .contains(&CdnDistribution));
}

#[test]
fn test_scenario_b_bucket_alias() {
    let config = scenario_b();
    let plan = resolve(&config).unwrap();

    assert_eq!(config.site_domain().as_str(), "example.com");
    assert_eq!(plan.active_kinds(), vec![HostedZone, ContentBucket, DnsRecord]);
    assert_eq!(
        plan.step(HostedZone),
        Some(&PlanStep::HostedZone {
            mode: ZoneMode::Lookup
        })
    );

    let record = plan.node(DnsRecord).unwrap();
    assert_eq!(
        record.step,
        Some(PlanStep::DnsRecord {
            target: AliasTarget::Bucket
        })
    );
    assert!(record.depends_on.contains(&ContentBucket));
    assert!(!record.depends_on.contains(&CdnDistribution));
}

#[test]
fn test_scenario_c_rejected() {
    assert_eq!(
        resolve(&scenario_c()),
        Err(ResolveError::Validation(
            ValidationError::MissingZoneForCertificate
        ))
    );
}

#[test]
fn test_plan_lists_skipped_nodes() {
    let plan = resolve(&scenario_b()).unwrap();

    assert_eq!(plan.nodes().len(), 6);
    let skipped: Vec<ResourceKind> = plan
        .nodes()
        .iter()
        .filter(|node| node.skip())
        .map(|node| node.kind)
        .collect();
    assert_eq!(skipped, vec![LoggingBucket, Certificate, CdnDistribution]);
    assert!(plan
        .nodes()
        .iter()
        .filter(|node| node.skip())
        .all(|node| node.depends_on.is_empty()));
}

#[test]
fn test_external_certificate_fronts_distribution() {
    let plan = resolve(&fixtures::external_certificate_site()).unwrap();

    assert_eq!(plan.active_kinds(), vec![ContentBucket, CdnDistribution]);
    let node = plan.node(CdnDistribution).unwrap();
    assert!(!node.depends_on.contains(&Certificate));
    assert!(matches!(
        node.step,
        Some(PlanStep::CdnDistribution {
            certificate: CertificateSource::External(_)
        })
    ));
}

#[test]
fn test_issued_certificate_wins_over_external() {
    let config = site(
        "www",
        Flags {
            create_zone: true,
            ssl: true,
            cdn: true,
            external_certificate: true,
            ..Flags::default()
        },
    );
    let plan = resolve(&config).unwrap();
    assert_eq!(
        plan.step(CdnDistribution),
        Some(&PlanStep::CdnDistribution {
            certificate: CertificateSource::Issued
        })
    );
}

// (logging, create_zone, route53, ssl, cdn, external certificate)
#[test_case(false, false, false, true, false, false, ValidationError::MissingZoneForCertificate ; "ssl without zone")]
#[test_case(true, false, false, true, true, true, ValidationError::MissingZoneForCertificate ; "zone rule wins over cdn rule")]
#[test_case(false, false, false, false, true, false, ValidationError::MissingCertificateForCdn ; "cdn without certificate")]
#[test_case(false, true, true, false, true, false, ValidationError::MissingCertificateForCdn ; "cdn with zone but no certificate")]
fn test_invalid_flag_combinations(
    logging: bool,
    create_zone: bool,
    route53: bool,
    ssl: bool,
    cdn: bool,
    external_certificate: bool,
    expected: ValidationError,
) {
    let config = site(
        "www",
        Flags {
            logging,
            create_zone,
            route53,
            ssl,
            cdn,
            external_certificate,
        },
    );
    assert_eq!(resolve(&config), Err(ResolveError::Validation(expected)));
}

#[test_case(Flags::default(), vec![ContentBucket] ; "bucket only")]
#[test_case(Flags { logging: true, ..Flags::default() }, vec![LoggingBucket, ContentBucket] ; "with access logs")]
#[test_case(Flags { route53: true, ssl: true, ..Flags::default() }, vec![HostedZone, Certificate, ContentBucket, DnsRecord] ; "looked up zone with certificate")]
#[test_case(Flags { create_zone: true, ..Flags::default() }, vec![HostedZone, ContentBucket] ; "zone without record")]
#[test_case(Flags { route53: true, cdn: true, external_certificate: true, ..Flags::default() }, vec![HostedZone, ContentBucket, CdnDistribution, DnsRecord] ; "external certificate with dns")]
fn test_active_kinds(flags: Flags, expected: Vec<ResourceKind>) {
    let plan = resolve(&site("www", flags)).unwrap();
    assert_eq!(plan.active_kinds(), expected);
}

#[test]
fn test_site_domain_ignores_empty_sub_domain() {
    let empty = site("", Flags::default());
    let blank = site("   ", Flags::default());
    assert_eq!(empty.site_domain(), blank.site_domain());
    assert_eq!(empty.site_domain().as_str(), "example.com");
}
