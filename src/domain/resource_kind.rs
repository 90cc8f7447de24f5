// Copyright (c) 2025 - Cowboy AI, Inc.
//! Resource Kind and Resource Type Taxonomy
//!
//! [`ResourceKind`] names the role a resource plays in a static-site
//! deployment and is what the resolver plans over. [`ResourceType`] is the
//! cloud resource type a descriptor declares.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a resource in the static-site deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Bucket receiving server access logs
    LoggingBucket,
    /// Bucket holding the site content
    ContentBucket,
    /// DNS namespace for the domain
    HostedZone,
    /// TLS certificate for the site domain
    Certificate,
    /// CDN distribution fronting the content bucket
    CdnDistribution,
    /// Alias record pointing at the active front end
    DnsRecord,
}

impl ResourceKind {
    /// All kinds in tie-break order
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::LoggingBucket,
        ResourceKind::HostedZone,
        ResourceKind::Certificate,
        ResourceKind::ContentBucket,
        ResourceKind::CdnDistribution,
        ResourceKind::DnsRecord,
    ];

    /// Position in the fixed tie-break order used by the topological sort
    pub fn rank(&self) -> usize {
        match self {
            Self::LoggingBucket => 0,
            Self::HostedZone => 1,
            Self::Certificate => 2,
            Self::ContentBucket => 3,
            Self::CdnDistribution => 4,
            Self::DnsRecord => 5,
        }
    }

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoggingBucket => "logging_bucket",
            Self::ContentBucket => "content_bucket",
            Self::HostedZone => "hosted_zone",
            Self::Certificate => "certificate",
            Self::CdnDistribution => "cdn_distribution",
            Self::DnsRecord => "dns_record",
        }
    }

    /// Cloud resource type created for this kind
    pub fn resource_type(&self) -> ResourceType {
        match self {
            Self::LoggingBucket | Self::ContentBucket => ResourceType::Bucket,
            Self::HostedZone => ResourceType::HostedZone,
            Self::Certificate => ResourceType::Certificate,
            Self::CdnDistribution => ResourceType::Distribution,
            Self::DnsRecord => ResourceType::RecordSet,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cloud resource type declared by a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    Bucket,
    HostedZone,
    Certificate,
    Distribution,
    RecordSet,
    BuildProject,
}

impl ResourceType {
    /// CloudFormation resource type name
    pub fn cfn_type(&self) -> &'static str {
        match self {
            Self::Bucket => "AWS::S3::Bucket",
            Self::HostedZone => "AWS::Route53::HostedZone",
            Self::Certificate => "AWS::CertificateManager::Certificate",
            Self::Distribution => "AWS::CloudFront::Distribution",
            Self::RecordSet => "AWS::Route53::RecordSet",
            Self::BuildProject => "AWS::CodeBuild::Project",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cfn_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_matches_all_order() {
        for (index, kind) in ResourceKind::ALL.iter().enumerate() {
            assert_eq!(kind.rank(), index);
        }
    }

    #[test]
    fn test_buckets_share_resource_type() {
        assert_eq!(ResourceKind::LoggingBucket.resource_type(), ResourceType::Bucket);
        assert_eq!(ResourceKind::ContentBucket.resource_type(), ResourceType::Bucket);
        assert_eq!(ResourceKind::DnsRecord.resource_type(), ResourceType::RecordSet);
    }

    #[test]
    fn test_serde_roundtrip() {
        let json = serde_json::to_string(&ResourceKind::CdnDistribution).unwrap();
        assert_eq!(json, "\"cdn_distribution\"");
    }
}
