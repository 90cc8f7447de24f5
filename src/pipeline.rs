// Copyright (c) 2025 - Cowboy AI, Inc.
//! Build Pipeline Wiring
//!
//! Creates the continuous-build project that watches the site repository
//! and deploys its output into the content bucket. The only input taken from
//! composition is the bucket's name and ARN.

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

use crate::compose::DeploymentOutputs;
use crate::config::EnvironmentConfig;
use crate::domain::{
    BuildProjectProperties, PolicyStatement, RemovalPolicy, ResourceDescriptor, ResourceHandle,
    ResourceProperties, SourceRepository, WebhookFilterGroup,
};
use crate::engine::ProvisioningEngine;
use crate::errors::ProvisioningResult;

pub const BUILD_PROJECT_LOGICAL_ID: &str = "SiteBuildProject";
pub const BUILDSPEC: &str = "buildspec.yml";
pub const BUILD_IMAGE: &str = "aws/codebuild/standard:3.0";
pub const COMPUTE_TYPE: &str = "BUILD_GENERAL1_SMALL";
pub const BUCKET_ENV_VAR: &str = "S3_BUCKET";

/// Actions the build job needs on the content bucket
pub const BUCKET_WRITE_ACTIONS: [&str; 5] = [
    "s3:GetBucket*",
    "s3:List*",
    "s3:GetObject*",
    "s3:DeleteObject",
    "s3:PutObject*",
];

const TRIGGER_EVENTS: [&str; 2] = ["PUSH", "PULL_REQUEST_MERGED"];

/// Build project settings taken from the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildProjectSettings {
    pub project_name: String,
    pub repo_owner: String,
    pub repo_name: String,
    pub head_ref: String,
}

impl BuildProjectSettings {
    pub fn from_environment(env: &EnvironmentConfig) -> Self {
        Self {
            project_name: format!("{}-build", env.website_name),
            repo_owner: env.repo_owner.clone(),
            repo_name: env.repo_name.clone(),
            head_ref: env.build_branch.clone(),
        }
    }

    /// Descriptor of the build project writing into `outputs`' bucket
    pub fn descriptor(&self, outputs: &DeploymentOutputs) -> ResourceDescriptor {
        let bucket_arn = outputs.bucket_arn();
        let environment_variables = BTreeMap::from([(
            BUCKET_ENV_VAR.to_string(),
            outputs.bucket_name().to_string(),
        )]);

        ResourceDescriptor::new(
            BUILD_PROJECT_LOGICAL_ID,
            ResourceProperties::BuildProject(BuildProjectProperties {
                project_name: self.project_name.clone(),
                source: SourceRepository {
                    owner: self.repo_owner.clone(),
                    repo: self.repo_name.clone(),
                    webhook: true,
                    report_build_status: true,
                    filter_groups: vec![WebhookFilterGroup {
                        events: TRIGGER_EVENTS.iter().map(|e| e.to_string()).collect(),
                        head_ref: self.head_ref.clone(),
                    }],
                },
                buildspec: BUILDSPEC.to_string(),
                build_image: BUILD_IMAGE.to_string(),
                compute_type: COMPUTE_TYPE.to_string(),
                environment_variables,
                policy_statements: vec![PolicyStatement {
                    effect: "Allow".to_string(),
                    actions: BUCKET_WRITE_ACTIONS.iter().map(|a| a.to_string()).collect(),
                    resources: vec![bucket_arn.to_string(), format!("{}/*", bucket_arn)],
                }],
            }),
            RemovalPolicy::Destroy,
        )
    }
}

/// Create the build project against the composed site
pub async fn wire_pipeline<E: ProvisioningEngine + ?Sized>(
    engine: &E,
    settings: &BuildProjectSettings,
    outputs: &DeploymentOutputs,
) -> ProvisioningResult<ResourceHandle> {
    info!(
        project_name = %settings.project_name,
        bucket = %outputs.bucket_name(),
        "Wiring build pipeline"
    );
    engine.create(settings.descriptor(outputs)).await
}
