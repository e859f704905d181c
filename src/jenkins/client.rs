use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Password;
use crate::error::{ClientError, ClientResult};

use super::types::Crumb;

const USER_AGENT: &str = concat!("jenkins-service/", env!("CARGO_PKG_VERSION"));
const CRUMB_PATH: &str = "crumbIssuer/api/json";

/// Minimal HTTP client for the Jenkins remote API.
///
/// One instance is built per service operation and dropped afterwards.
pub struct JenkinsClient {
    client: Client,
    base_url: Url,
    username: String,
    password: Password,
}

impl JenkinsClient {
    pub fn new(base_url: &str, username: &str, password: &Password) -> ClientResult<Self> {
        // Jenkins answers most POSTs with a 302; callers treat that as success
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(Policy::none())
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base_url = Url::parse(base_url)
            .map_err(|e| ClientError::Config(format!("Invalid base URL: {e}")))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            username: username.to_owned(),
            password: password.clone(),
        })
    }

    /// Resolves a server-relative path against the base URL.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::Config(format!("Invalid endpoint {path}: {e}")))
    }

    fn auth_request(&self, request: RequestBuilder) -> RequestBuilder {
        if self.username.is_empty() {
            request
        } else {
            request.basic_auth(&self.username, Some(self.password.as_str()))
        }
    }

    /// GET a path and fail on any non-2xx status.
    pub async fn get(&self, path: &str) -> ClientResult<Response> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");

        let response = self.auth_request(self.client.get(url)).send().await?;
        check_status(response, false).await
    }

    /// Like [`Self::get`], but maps a 404 to `None`.
    pub async fn get_optional(&self, path: &str) -> ClientResult<Option<Response>> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");

        let response = self.auth_request(self.client.get(url)).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        check_status(response, false).await.map(Some)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let body = self.get(path).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    pub async fn get_text(&self, path: &str) -> ClientResult<String> {
        Ok(self.get(path).await?.text().await?)
    }

    /// POST with an empty body.
    pub async fn post(&self, path: &str, crumb_flag: bool) -> ClientResult<()> {
        let request = self.post_request(path, crumb_flag).await?;
        let response = request.send().await?;
        check_status(response, true).await.map(drop)
    }

    /// POST a raw text body with the given content type.
    pub async fn post_text(
        &self,
        path: &str,
        body: String,
        content_type: &str,
        crumb_flag: bool,
    ) -> ClientResult<()> {
        let request = self
            .post_request(path, crumb_flag)
            .await?
            .header(CONTENT_TYPE, content_type)
            .body(body);
        let response = request.send().await?;
        check_status(response, true).await.map(drop)
    }

    /// POST an XML document.
    pub async fn post_xml(&self, path: &str, xml: String, crumb_flag: bool) -> ClientResult<()> {
        self.post_text(path, xml, "application/xml", crumb_flag).await
    }

    /// POST `application/x-www-form-urlencoded` fields.
    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        crumb_flag: bool,
    ) -> ClientResult<()> {
        let request = self.post_request(path, crumb_flag).await?.form(fields);
        let response = request.send().await?;
        check_status(response, true).await.map(drop)
    }

    async fn post_request(&self, path: &str, crumb_flag: bool) -> ClientResult<RequestBuilder> {
        let url = self.endpoint(path)?;
        debug!("POST {url}");

        let mut request = self.auth_request(self.client.post(url));
        if crumb_flag {
            if let Some(crumb) = self.crumb().await? {
                request = request.header(crumb.crumb_request_field.as_str(), crumb.crumb);
            }
        }
        Ok(request)
    }

    /// Fetches a CSRF crumb. `None` when the server has CSRF protection off.
    async fn crumb(&self) -> ClientResult<Option<Crumb>> {
        match self.get_optional(CRUMB_PATH).await? {
            Some(response) => {
                let body = response.text().await?;
                Ok(Some(serde_json::from_str(&body)?))
            }
            None => {
                debug!("No crumb issuer, posting without CSRF crumb");
                Ok(None)
            }
        }
    }
}

async fn check_status(response: Response, allow_redirect: bool) -> ClientResult<Response> {
    let status = response.status();
    if status.is_success() || (allow_redirect && status.is_redirection()) {
        return Ok(response);
    }

    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    let message = if message.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        message
    };

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Percent-encodes one path segment. Empty, `.` and `..` segments are
/// rejected so caller input cannot leave the addressed job or workspace.
pub fn encode_segment(segment: &str) -> ClientResult<String> {
    match segment {
        "" | "." | ".." => Err(ClientError::Config(format!(
            "Invalid path segment {segment:?}"
        ))),
        _ => Ok(urlencoding::encode(segment).into_owned()),
    }
}

/// Path prefix for a job, `job/a/job/b/` for a job `b` inside folder `a`.
pub fn job_path(job_name: &str) -> ClientResult<String> {
    let segments: Vec<&str> = job_name.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        return Err(ClientError::Config("Job name is empty".to_string()));
    }
    segments
        .into_iter()
        .map(|segment| encode_segment(segment).map(|encoded| format!("job/{encoded}/")))
        .collect()
}

/// Percent-encodes each segment of a slash separated relative path.
pub fn encode_path(relative_path: &str) -> ClientResult<String> {
    let segments = relative_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(encode_segment)
        .collect::<ClientResult<Vec<_>>>()?;
    if segments.is_empty() {
        return Err(ClientError::Config("Relative path is empty".to_string()));
    }
    Ok(segments.join("/"))
}
