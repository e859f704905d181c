use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::auth::Password;

pub(crate) const STORE_PATH: &str = "credentials/store/system/domain/_/";
const CREDENTIALS_CLASS: &str = "com.cloudbees.plugins.credentials.impl.UsernamePasswordCredentialsImpl";

/// Visibility of a credential in the Jenkins credentials store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CredentialScope {
    #[default]
    Global,
    System,
}

impl CredentialScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialScope::Global => "GLOBAL",
            CredentialScope::System => "SYSTEM",
        }
    }
}

/// A username/password credential to store on the server.
#[derive(Debug, Clone)]
pub struct UsernamePasswordCredential {
    pub id: String,
    pub username: String,
    pub password: Password,
    pub description: String,
    pub scope: CredentialScope,
}

impl UsernamePasswordCredential {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<Password>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            password: password.into(),
            description: description.into(),
            scope: CredentialScope::default(),
        }
    }

    #[must_use]
    pub fn with_scope(mut self, scope: CredentialScope) -> Self {
        self.scope = scope;
        self
    }

    /// Value of the `json` form field accepted by `createCredentials`.
    pub fn to_json_payload(&self) -> String {
        json!({
            "": "0",
            "credentials": {
                "scope": self.scope.as_str(),
                "username": self.username,
                "password": self.password.as_str(),
                "id": self.id,
                "description": self.description,
                "$class": CREDENTIALS_CLASS,
            }
        })
        .to_string()
    }

    /// XML document accepted by `createCredentials` with `application/xml`.
    pub fn to_xml_payload(&self) -> String {
        format!(
            "<{class}>\n  <scope>{scope}</scope>\n  <id>{id}</id>\n  <description>{description}</description>\n  <username>{username}</username>\n  <password>{password}</password>\n</{class}>",
            class = CREDENTIALS_CLASS,
            scope = self.scope.as_str(),
            id = escape_xml(&self.id),
            description = escape_xml(&self.description),
            username = escape_xml(&self.username),
            password = escape_xml(self.password.as_str()),
        )
    }
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
