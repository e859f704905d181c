//! Facade over the Jenkins remote API.
//!
//! [`JenkinsServiceImpl`] holds the server URL and basic-auth credentials and
//! exposes job, build, workspace and credential operations through the
//! [`JenkinsService`] trait. Every operation opens its own HTTP client, issues
//! one or two remote calls and reports failures as [`JenkinsError`].

pub mod auth;
pub mod config;
pub mod error;
pub mod jenkins;

pub use auth::Password;
pub use error::{ClientError, JenkinsError, Result};
pub use jenkins::{
    BuildDetails, BuildResult, CredentialScope, JenkinsService, JenkinsServiceImpl,
    UsernamePasswordCredential,
};
