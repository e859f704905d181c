use std::path::Path;

use log::{debug, info};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::auth::Password;
use crate::config::JenkinsConfig;
use crate::error::{ClientError, ClientResult, JenkinsError, Result};

use super::client::{encode_path, encode_segment, job_path, JenkinsClient};
use super::credentials::{UsernamePasswordCredential, STORE_PATH};
use super::types::{BuildDetails, JobDetails, JobList};

/// Operations offered on top of a Jenkins server.
///
/// Every failure coming back from the server is reported as
/// [`JenkinsError::Jenkins`]; build-number arguments are validated first and
/// rejected with [`JenkinsError::InvalidBuildNumber`].
#[allow(async_fn_in_trait)]
pub trait JenkinsService {
    /// Whether a job with exactly this name is listed on the server.
    async fn job_exists(&self, job_name: &str) -> Result<bool>;

    /// Fetches the job's `config.xml`.
    async fn get_job_xml(&self, job_name: &str) -> Result<String>;

    async fn create_job(&self, job_name: &str, job_xml: &str) -> Result<()>;

    async fn delete_job(&self, job_name: &str) -> Result<()>;

    async fn update_job(&self, job_name: &str, job_xml: &str) -> Result<()>;

    /// Triggers a build and returns the number it is expected to get.
    async fn build_job(&self, job_name: &str) -> Result<i64>;

    async fn cancel_build(&self, job_name: &str, build_num: i64) -> Result<()>;

    /// Console output of a build, empty when the build does not exist.
    async fn get_build_log(&self, job_name: &str, build_num: i64) -> Result<String>;

    async fn is_building(&self, job_name: &str, build_num: i64) -> Result<bool>;

    async fn is_finished(&self, job_name: &str, build_num: i64) -> Result<bool>;

    /// Fails when the build does not exist.
    async fn is_successful(&self, job_name: &str, build_num: i64) -> Result<bool>;

    /// Downloads `relative_path` from the job's workspace into `dest_path`.
    async fn download_file(
        &self,
        job_name: &str,
        relative_path: &str,
        dest_path: &Path,
    ) -> Result<()>;

    /// Stores a credential using the JSON form.
    async fn create_credentials(&self, credential: &UsernamePasswordCredential) -> Result<()>;

    async fn create_credentials_by_json(
        &self,
        credential: &UsernamePasswordCredential,
    ) -> Result<()>;

    async fn create_credentials_by_xml(
        &self,
        credential: &UsernamePasswordCredential,
    ) -> Result<()>;

    async fn delete_credentials(&self, id: &str) -> Result<()>;
}

/// [`JenkinsService`] backed by the Jenkins HTTP API.
///
/// Holds only the connection parameters. A fresh [`JenkinsClient`] is built
/// for every call.
#[derive(Debug, Clone, Default)]
pub struct JenkinsServiceImpl {
    url: String,
    username: String,
    password: Password,
}

impl JenkinsServiceImpl {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<Password>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn from_config(config: &JenkinsConfig) -> Self {
        Self::new(
            config.url.clone(),
            config.username.clone().unwrap_or_default(),
            config.password.clone().unwrap_or_default(),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn password(&self) -> &Password {
        &self.password
    }

    pub fn set_password(&mut self, password: impl Into<Password>) {
        self.password = password.into();
    }

    fn connect(&self) -> ClientResult<JenkinsClient> {
        if self.url.is_empty() {
            return Err(ClientError::Config("Jenkins URL is not set".to_string()));
        }
        JenkinsClient::new(&self.url, &self.username, &self.password)
    }

    /// Build details, `None` when the job has no such build.
    pub async fn get_build(&self, job_name: &str, build_num: i64) -> Result<Option<BuildDetails>> {
        validate_build_number(build_num)?;
        let client = self.connect()?;
        Ok(fetch_build(&client, job_name, build_num).await?)
    }
}

fn validate_build_number(build_num: i64) -> Result<()> {
    if build_num <= 0 {
        return Err(JenkinsError::InvalidBuildNumber(build_num));
    }
    Ok(())
}

async fn fetch_job(client: &JenkinsClient, job_name: &str) -> ClientResult<JobDetails> {
    let path = format!("{}api/json", job_path(job_name)?);
    match client.get_optional(&path).await? {
        Some(response) => Ok(serde_json::from_str(&response.text().await?)?),
        None => Err(ClientError::JobNotFound(job_name.to_string())),
    }
}

async fn fetch_build(
    client: &JenkinsClient,
    job_name: &str,
    build_num: i64,
) -> ClientResult<Option<BuildDetails>> {
    fetch_job(client, job_name).await?;

    let path = format!("{}{build_num}/api/json", job_path(job_name)?);
    match client.get_optional(&path).await? {
        Some(response) => Ok(Some(serde_json::from_str(&response.text().await?)?)),
        None => {
            debug!("Build #{build_num} of {job_name} does not exist");
            Ok(None)
        }
    }
}

impl JenkinsService for JenkinsServiceImpl {
    async fn job_exists(&self, job_name: &str) -> Result<bool> {
        let client = self.connect()?;
        let path = job_path(job_name)?;
        if job_name.trim_matches('/').contains('/') {
            // folder members are not in the top-level listing
            let details = client.get_optional(&format!("{path}api/json")).await?;
            return Ok(details.is_some());
        }
        let list: JobList = client.get_json("api/json").await?;
        Ok(list.jobs.iter().any(|job| job.name == job_name))
    }

    async fn get_job_xml(&self, job_name: &str) -> Result<String> {
        let client = self.connect()?;
        let path = format!("{}config.xml", job_path(job_name)?);
        Ok(client.get_text(&path).await?)
    }

    async fn create_job(&self, job_name: &str, job_xml: &str) -> Result<()> {
        let client = self.connect()?;
        let path = format!("createItem?name={}", urlencoding::encode(job_name));
        client.post_xml(&path, job_xml.to_owned(), true).await?;
        info!("Created job {job_name}");
        Ok(())
    }

    async fn delete_job(&self, job_name: &str) -> Result<()> {
        let client = self.connect()?;
        let path = format!("{}doDelete", job_path(job_name)?);
        client.post(&path, true).await?;
        info!("Deleted job {job_name}");
        Ok(())
    }

    async fn update_job(&self, job_name: &str, job_xml: &str) -> Result<()> {
        let client = self.connect()?;
        let path = format!("{}config.xml", job_path(job_name)?);
        client.post_xml(&path, job_xml.to_owned(), true).await?;
        info!("Updated job {job_name}");
        Ok(())
    }

    async fn build_job(&self, job_name: &str) -> Result<i64> {
        let client = self.connect()?;
        let job = fetch_job(&client, job_name).await?;
        let build_num = job.next_build_number;

        let path = format!("{}build", job_path(job_name)?);
        client.post(&path, true).await?;
        info!("Triggered build #{build_num} of {job_name}");
        Ok(build_num)
    }

    async fn cancel_build(&self, job_name: &str, build_num: i64) -> Result<()> {
        validate_build_number(build_num)?;
        let client = self.connect()?;
        let path = format!("{}{build_num}/stop", job_path(job_name)?);
        client.post(&path, true).await?;
        info!("Requested stop of build #{build_num} of {job_name}");
        Ok(())
    }

    async fn get_build_log(&self, job_name: &str, build_num: i64) -> Result<String> {
        validate_build_number(build_num)?;
        let client = self.connect()?;
        if fetch_build(&client, job_name, build_num).await?.is_none() {
            return Ok(String::new());
        }

        let path = format!("{}{build_num}/consoleText", job_path(job_name)?);
        Ok(client.get_text(&path).await?)
    }

    async fn is_building(&self, job_name: &str, build_num: i64) -> Result<bool> {
        validate_build_number(build_num)?;
        let client = self.connect()?;
        let build = fetch_build(&client, job_name, build_num).await?;
        Ok(build.is_some_and(|build| build.building))
    }

    async fn is_finished(&self, job_name: &str, build_num: i64) -> Result<bool> {
        validate_build_number(build_num)?;
        let client = self.connect()?;
        let build = fetch_build(&client, job_name, build_num).await?;
        Ok(build.is_some_and(|build| !build.building))
    }

    async fn is_successful(&self, job_name: &str, build_num: i64) -> Result<bool> {
        validate_build_number(build_num)?;
        let client = self.connect()?;
        let build = fetch_build(&client, job_name, build_num)
            .await?
            .ok_or_else(|| ClientError::BuildNotFound {
                job: job_name.to_string(),
                number: build_num,
            })?;
        Ok(build.is_success())
    }

    async fn download_file(
        &self,
        job_name: &str,
        relative_path: &str,
        dest_path: &Path,
    ) -> Result<()> {
        let path = format!("{}ws/{}", job_path(job_name)?, encode_path(relative_path)?);
        let client = self.connect()?;
        fetch_job(&client, job_name).await?;

        let mut response = client.get(&path).await?;

        let mut file = File::create(dest_path).await?;
        let mut written = 0usize;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        info!(
            "Downloaded {relative_path} from {job_name} ({written} bytes) to {}",
            dest_path.display()
        );
        Ok(())
    }

    async fn create_credentials(&self, credential: &UsernamePasswordCredential) -> Result<()> {
        self.create_credentials_by_json(credential).await
    }

    async fn create_credentials_by_json(
        &self,
        credential: &UsernamePasswordCredential,
    ) -> Result<()> {
        let client = self.connect()?;
        let path = format!("{STORE_PATH}createCredentials");
        let payload = credential.to_json_payload();
        client
            .post_form(&path, &[("json", payload.as_str())], true)
            .await?;
        info!("Created credentials {}", credential.id);
        Ok(())
    }

    async fn create_credentials_by_xml(
        &self,
        credential: &UsernamePasswordCredential,
    ) -> Result<()> {
        let client = self.connect()?;
        let path = format!("{STORE_PATH}createCredentials");
        client
            .post_xml(&path, credential.to_xml_payload(), true)
            .await?;
        info!("Created credentials {}", credential.id);
        Ok(())
    }

    async fn delete_credentials(&self, id: &str) -> Result<()> {
        let client = self.connect()?;
        let path = format!("{STORE_PATH}credential/{}/doDelete", encode_segment(id)?);
        client.post(&path, true).await?;
        info!("Deleted credentials {id}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors_and_setters() {
        let mut service = JenkinsServiceImpl::default();
        assert_eq!(service.url(), "");

        service.set_url("http://localhost:8080");
        service.set_username("admin");
        service.set_password("admin");

        assert_eq!(service.url(), "http://localhost:8080");
        assert_eq!(service.username(), "admin");
        assert_eq!(service.password().as_str(), "admin");
    }

    #[test]
    fn test_from_config() {
        let config = JenkinsConfig {
            url: "http://ci.example.com".to_string(),
            username: Some("bot".to_string()),
            password: Some(Password::from("token")),
        };

        let service = JenkinsServiceImpl::from_config(&config);
        assert_eq!(service.url(), "http://ci.example.com");
        assert_eq!(service.username(), "bot");
        assert_eq!(service.password().as_str(), "token");
    }

    #[tokio::test]
    async fn test_missing_url_is_reported_as_jenkins_error() {
        let service = JenkinsServiceImpl::default();
        let err = service.job_exists("myJob").await.unwrap_err();

        assert!(matches!(
            err,
            JenkinsError::Jenkins(ClientError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_non_positive_build_numbers_rejected_before_connecting() {
        // Unroutable URL: any network attempt would surface as Jenkins(Network)
        let service = JenkinsServiceImpl::new("http://127.0.0.1:9", "admin", "admin");

        for build_num in [0, -1] {
            assert!(matches!(
                service.get_build_log("myJob", build_num).await,
                Err(JenkinsError::InvalidBuildNumber(n)) if n == build_num
            ));
            assert!(matches!(
                service.is_building("myJob", build_num).await,
                Err(JenkinsError::InvalidBuildNumber(_))
            ));
            assert!(matches!(
                service.is_finished("myJob", build_num).await,
                Err(JenkinsError::InvalidBuildNumber(_))
            ));
            assert!(matches!(
                service.is_successful("myJob", build_num).await,
                Err(JenkinsError::InvalidBuildNumber(_))
            ));
            assert!(matches!(
                service.cancel_build("myJob", build_num).await,
                Err(JenkinsError::InvalidBuildNumber(_))
            ));
            assert!(matches!(
                service.get_build("myJob", build_num).await,
                Err(JenkinsError::InvalidBuildNumber(_))
            ));
        }
    }
}
