// Copyright (c) 2025 - Cowboy AI, Inc.
//! Static Site Deployer
//!
//! Reads the deployment configuration from the environment, resolves and
//! composes the site against the template engine, and prints the plan, the
//! stack outputs and the synthesized template as JSON.
//!
//! Run with: cargo run --bin site-deployer
//!
//! Required environment:
//! 1. WEBSITE_NAME (names the build project)
//!
//! Optional: DOMAIN_NAME, SUB_DOMAIN_NAME, REGION, REPO_OWNER, REPO_NAME,
//! BUILD_BRANCH, the ENABLE_* / CREATE_HOSTED_ZONE flags, SSL_CERT_ARN and
//! HOSTED_ZONE_ID.

use anyhow::{Context, Result};
use serde_json::json;
use static_site_infrastructure::{
    DeploymentService, EnvironmentConfig, SiteDeploymentService, TemplateEngine,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let env = EnvironmentConfig::from_env().context("Failed to load environment")?;
    env.validate().context("Invalid environment")?;
    let site = env
        .site_configuration()
        .context("Invalid site configuration")?;

    info!(
        site_domain = %site.site_domain(),
        region = %env.region,
        "Configuration loaded"
    );

    let mut engine = TemplateEngine::new(&env.region);
    if let Some(zone_id) = &env.hosted_zone_id {
        engine = engine.with_known_zone(&env.domain_name, zone_id);
    }

    let service = SiteDeploymentService::new(engine);
    let report = service
        .deploy(&env, &site)
        .await
        .with_context(|| format!("Deployment of {} failed", site.site_domain()))?;

    let stack_outputs = report.outputs.stack_outputs();
    let template = service.engine().render(&stack_outputs).await;

    let document = json!({
        "plan": report.plan,
        "outputs": stack_outputs,
        "template": template,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&document).context("Failed to render output")?
    );

    info!(
        deployment_id = %report.outputs.deployment_id(),
        "Synthesis complete"
    );
    Ok(())
}
