// Copyright (c) 2025 - Cowboy AI, Inc.
//! Provider endpoint constants used to build alias targets

/// Hosted zone of every CloudFront distribution domain
pub const CLOUDFRONT_HOSTED_ZONE_ID: &str = "Z2FDTNDATAQYW2";

/// Regions whose website endpoint uses the legacy `s3-website-<region>` form
const DASH_WEBSITE_REGIONS: [&str; 9] = [
    "us-east-1",
    "us-west-1",
    "us-west-2",
    "eu-west-1",
    "ap-southeast-1",
    "ap-southeast-2",
    "ap-northeast-1",
    "sa-east-1",
    "us-gov-west-1",
];

/// Hosted zone id of the S3 website endpoint in `region`
///
/// `None` for regions missing from the table. Buckets there still provision;
/// they only lack the attribute a DNS alias needs.
pub fn s3_website_hosted_zone_id(region: &str) -> Option<&'static str> {
    let zone = match region {
        "us-east-1" => "Z3AQBSTGFYJSTF",
        "us-east-2" => "Z2O1EMRO9K5GLX",
        "us-west-1" => "Z2F56UZL2M1ACD",
        "us-west-2" => "Z3BJ6K6RIION7M",
        "ca-central-1" => "Z1QDHH18159H29",
        "eu-west-1" => "Z1BKCTXD74EZPE",
        "eu-west-2" => "Z3GKZC51ZF0DB4",
        "eu-west-3" => "Z3R1K369G5AVDG",
        "eu-central-1" => "Z21DNDUVLTQW6Q",
        "eu-north-1" => "Z3BAZG2TWCNX0D",
        "ap-south-1" => "Z11RGJOFQNVJUP",
        "ap-southeast-1" => "Z3O0J2DXBE1FTB",
        "ap-southeast-2" => "Z1WCIGYICN2BYD",
        "ap-northeast-1" => "Z2M4EHUR26P7ZW",
        "ap-northeast-2" => "Z3W03O7B5YMIYP",
        "sa-east-1" => "Z7KQH4QJS55SO",
        "us-gov-west-1" => "Z31GFT0UA1I2HV",
        "us-gov-east-1" => "Z2NIFVYYW2VKV1",
        "af-south-1" => "Z83WF9RJE8B12",
        "ap-east-1" => "ZNB98KWMFR0R6",
        "ap-northeast-3" => "Z2YQB5RD63NC85",
        "eu-south-1" => "Z30OZKI7KPW7MI",
        "me-south-1" => "Z1MPMWCPA7YB62",
        _ => return None,
    };
    Some(zone)
}

/// Website endpoint host of `bucket` in `region`
pub fn s3_website_domain(bucket: &str, region: &str) -> String {
    if DASH_WEBSITE_REGIONS.contains(&region) {
        format!("{}.s3-website-{}.amazonaws.com", bucket, region)
    } else {
        format!("{}.s3-website.{}.amazonaws.com", bucket, region)
    }
}

/// Regional REST endpoint host of `bucket`, used as a CDN origin
pub fn s3_regional_domain(bucket: &str, region: &str) -> String {
    format!("{}.s3.{}.amazonaws.com", bucket, region)
}

pub fn s3_bucket_arn(bucket: &str) -> String {
    format!("arn:aws:s3:::{}", bucket)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_domain_forms() {
        assert_eq!(
            s3_website_domain("example.com", "us-east-1"),
            "example.com.s3-website-us-east-1.amazonaws.com"
        );
        assert_eq!(
            s3_website_domain("example.com", "eu-central-1"),
            "example.com.s3-website.eu-central-1.amazonaws.com"
        );
    }

    #[test]
    fn test_unknown_region_has_no_website_zone() {
        assert_eq!(s3_website_hosted_zone_id("us-east-1"), Some("Z3AQBSTGFYJSTF"));
        assert_eq!(s3_website_hosted_zone_id("eu-south-1"), Some("Z30OZKI7KPW7MI"));
        assert_eq!(s3_website_hosted_zone_id("af-south-1"), Some("Z83WF9RJE8B12"));
        assert_eq!(s3_website_hosted_zone_id("mars-north-1"), None);
    }
}
