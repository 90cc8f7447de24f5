// Copyright (c) 2025 - Cowboy AI, Inc.
//! Site Deployment Service
//!
//! Runs one complete "declare desired state" pass:
//!
//! ```text
//! EnvironmentConfig ─validate─> SiteConfiguration ─resolve─> ResourcePlan
//!                                                               ↓
//!            DeploymentReport <─wire_pipeline─ DeploymentOutputs <─compose
//! ```
//!
//! # Transaction Semantics
//!
//! Validation and resolution are pure; if either fails no engine call is
//! made. From composition on, every step is a real external call and earlier
//! steps are never undone.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument};

use crate::compose::{DeploymentOutputs, SiteComposer, TeardownReport};
use crate::config::EnvironmentConfig;
use crate::domain::{ResourceHandle, SiteConfiguration};
use crate::engine::{ProvisioningEngine, TeardownOutcome};
use crate::errors::{DeploymentError, DeploymentResult};
use crate::pipeline::{wire_pipeline, BuildProjectSettings};
use crate::plan::{resolve, ResourcePlan};

/// Everything a successful pass produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub plan: ResourcePlan,
    pub outputs: DeploymentOutputs,
    pub build_project: ResourceHandle,
}

/// Deployment service trait
#[async_trait]
pub trait DeploymentService: Send + Sync {
    /// Validate, resolve, compose and wire the build pipeline
    ///
    /// # Errors
    /// - `DeploymentError::Validation` before any engine call
    /// - `DeploymentError::Composition` with partial progress
    /// - `DeploymentError::Pipeline` if the build project cannot be created
    async fn deploy(
        &self,
        env: &EnvironmentConfig,
        site: &SiteConfiguration,
    ) -> DeploymentResult<DeploymentReport>;

    /// Remove the build project, then the site resources newest first
    async fn teardown(&self, report: &DeploymentReport) -> DeploymentResult<TeardownReport>;
}

/// Deployment service over a provisioning engine
pub struct SiteDeploymentService<E> {
    composer: SiteComposer<E>,
}

impl<E: ProvisioningEngine> SiteDeploymentService<E> {
    pub fn new(engine: E) -> Self {
        Self {
            composer: SiteComposer::new(engine),
        }
    }

    pub fn engine(&self) -> &E {
        self.composer.engine()
    }
}

#[async_trait]
impl<E: ProvisioningEngine> DeploymentService for SiteDeploymentService<E> {
    #[instrument(skip(self, env, site), fields(site_domain = %site.site_domain()))]
    async fn deploy(
        &self,
        env: &EnvironmentConfig,
        site: &SiteConfiguration,
    ) -> DeploymentResult<DeploymentReport> {
        env.validate()?;
        let plan = resolve(site)?;
        info!(
            region = %self.engine().region(),
            planned = ?plan.active_kinds(),
            "Plan resolved"
        );

        let outputs = self.composer.compose(&plan, site).await?;

        let settings = BuildProjectSettings::from_environment(env);
        let build_project = wire_pipeline(self.engine(), &settings, &outputs)
            .await
            .map_err(DeploymentError::Pipeline)?;

        info!(
            deployment_id = %outputs.deployment_id(),
            build_project = %build_project.physical_id,
            "Deployment complete"
        );

        Ok(DeploymentReport {
            plan,
            outputs,
            build_project,
        })
    }

    #[instrument(skip(self, report), fields(site_domain = %report.outputs.site_domain()))]
    async fn teardown(&self, report: &DeploymentReport) -> DeploymentResult<TeardownReport> {
        match self
            .engine()
            .destroy(&report.build_project)
            .await
            .map_err(DeploymentError::Pipeline)?
        {
            TeardownOutcome::Destroyed => info!("Build project destroyed"),
            TeardownOutcome::Retained => info!("Build project retained"),
        }

        Ok(self.composer.teardown(&report.outputs).await?)
    }
}
