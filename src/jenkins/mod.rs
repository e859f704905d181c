mod client;
mod credentials;
mod service;
mod types;


pub use client::JenkinsClient;
pub use credentials::{CredentialScope, UsernamePasswordCredential};
pub use service::{JenkinsService, JenkinsServiceImpl};
pub use types::{BuildDetails, BuildRef, BuildResult, JobDetails, JobSummary};
