// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Static Site Deployment
//!
//! The application service that strings the pure and effectful layers
//! together for one deployment pass.
//!
//! # Architecture
//!
//! ```text
//! Caller (binary, tests)
//!     ↓
//! Service Layer (this module)
//!     ↓
//! Environment validation → Dependency resolver (pure)
//!     ↓
//! Site composer → Provisioning engine
//!     ↓
//! Pipeline wiring
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use static_site_infrastructure::config::EnvironmentConfig;
//! use static_site_infrastructure::engine::InMemoryEngine;
//! use static_site_infrastructure::service::{DeploymentService, SiteDeploymentService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let env = EnvironmentConfig::from_env()?;
//!     let site = env.site_configuration()?;
//!
//!     let service = SiteDeploymentService::new(InMemoryEngine::new(&env.region));
//!     let report = service.deploy(&env, &site).await?;
//!     println!("{}", report.outputs.bucket_arn());
//!
//!     Ok(())
//! }
//! ```

pub mod site_deployment;

pub use site_deployment::{DeploymentReport, DeploymentService, SiteDeploymentService};
