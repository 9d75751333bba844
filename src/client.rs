//! HTTP collaborators: the report endpoint and the two-step login.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, WebtrackError};
use crate::report::{reports_from_value, Report};
use crate::session::Session;

pub const DEFAULT_REPORTS_URL: &str = "http://localhost:9090/api/reports/fetch/all";
pub const DEFAULT_USERS_URL: &str = "http://localhost:8081/api/users/fetch/username";
pub const DEFAULT_LOGIN_URL: &str = "http://localhost:8080/api/auth/login";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub reports_url: String,
    pub users_url: String,
    pub login_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            reports_url: DEFAULT_REPORTS_URL.to_string(),
            users_url: DEFAULT_USERS_URL.to_string(),
            login_url: DEFAULT_LOGIN_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct UserDetails {
    role: Option<String>,
}

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
    role: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct LoginResponse {
    token: Option<String>,
    message: Option<String>,
}

pub struct ApiClient {
    agent: ureq::Agent,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> Self {
        Self {
            agent: build_agent(timeout),
            endpoints,
        }
    }

    /// Fetch the whole report document. No filtering happens server-side.
    pub fn fetch_reports(&self, session: Option<&Session>) -> Result<Vec<Report>> {
        let url = self.endpoints.reports_url.as_str();
        let mut request = self.agent.get(url);
        if let Some(session) = session {
            request = request.set("Authorization", &session.bearer());
        }

        let response = request.call().map_err(|err| http_error(url, err))?;
        let value: serde_json::Value = response
            .into_json()
            .map_err(|err| WebtrackError::Http(format!("Invalid report JSON from {url}: {err}")))?;
        let reports = reports_from_value(value)?;
        tracing::info!(url, reports = reports.len(), "fetched reports");
        Ok(reports)
    }

    /// Look up the role the login endpoint expects for `username`.
    pub fn fetch_role(&self, username: &str) -> Result<String> {
        let url = user_url(&self.endpoints.users_url, username)?;
        let response = self.agent.get(url.as_str()).call().map_err(|err| {
            tracing::error!(url = %url, error = %err, "user lookup failed");
            WebtrackError::Auth("Failed to fetch user details.".to_string())
        })?;
        let details: UserDetails = response.into_json().map_err(|err| {
            tracing::error!(url = %url, error = %err, "invalid user details");
            WebtrackError::Auth("Failed to fetch user details.".to_string())
        })?;
        details
            .role
            .filter(|r| !r.trim().is_empty())
            .ok_or_else(|| WebtrackError::Auth("Failed to fetch user details.".to_string()))
    }

    /// Role lookup followed by the credential check. Success requires a token.
    pub fn login(&self, credentials: &Credentials) -> Result<Session> {
        let role = self.fetch_role(&credentials.username)?;
        let body = LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
            role: &role,
        };

        let url = self.endpoints.login_url.as_str();
        let data = match self.agent.post(url).send_json(&body) {
            Ok(response) => response.into_json::<LoginResponse>().unwrap_or_else(|err| {
                tracing::warn!(url, error = %err, "undecodable login response");
                LoginResponse::default()
            }),
            Err(ureq::Error::Status(code, response)) => {
                let message = response
                    .into_json::<LoginResponse>()
                    .ok()
                    .and_then(|r| r.message)
                    .filter(|m| !m.trim().is_empty());
                tracing::warn!(status = code, message = ?message, "login rejected");
                return Err(WebtrackError::Auth(
                    message.unwrap_or_else(|| "Invalid username or password".to_string()),
                ));
            }
            Err(err) => {
                tracing::error!(url, error = %err, "login request failed");
                return Err(WebtrackError::Auth(
                    "Failed to login. Please try again later.".to_string(),
                ));
            }
        };

        match data.token.filter(|t| !t.is_empty()) {
            Some(token) => {
                tracing::info!(username = %credentials.username, role = %role, "logged in");
                Ok(Session {
                    username: credentials.username.clone(),
                    role,
                    token,
                })
            }
            None => Err(WebtrackError::Auth(
                "Login failed. Token not received.".to_string(),
            )),
        }
    }
}

fn build_agent(timeout: Option<Duration>) -> ureq::Agent {
    let mut builder = ureq::AgentBuilder::new();
    if let Some(timeout) = timeout {
        builder = builder.timeout_connect(timeout).timeout_read(timeout);
    }
    builder.build()
}

fn user_url(base: &str, username: &str) -> Result<Url> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| WebtrackError::InvalidArgs(format!("Users URL cannot take a path: {base}")))?
        .pop_if_empty()
        .push(username);
    Ok(url)
}

fn http_error(url: &str, err: ureq::Error) -> WebtrackError {
    match err {
        ureq::Error::Status(code, response) => WebtrackError::Http(format!(
            "{url} returned status {code}: {}",
            response.status_text()
        )),
        ureq::Error::Transport(err) => WebtrackError::Http(format!("Failed to fetch {url}: {err}")),
    }
}
