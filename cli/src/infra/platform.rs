//! Infrastructure implementation of the platform ports over the REST API.
//!
//! `PlatformClient` is the production implementation. It uses a blocking
//! `ureq` agent; the session is the `JSESSIONID` cookie returned by login and
//! is sent on every later request.

use std::time::Duration;

use quarantine_common::{
    ActionApiDto, ActionQuery, GroupApiDto, MemberApiDto, StaticGroupSpec, TargetApiDto,
    TargetSpec,
};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{
    ActionHistorySource, Credentials, GroupDirectory, SessionClient, TargetDirectory,
};
use crate::domain::{ActionAttemptRecord, Outcome, PlatformError};

/// Timeout applied to every platform request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SESSION_COOKIE: &str = "JSESSIONID";

/// Blocking REST client for the platform API (`/api/v3`).
pub struct PlatformClient {
    host: String,
    base_url: String,
    agent: ureq::Agent,
    session: Option<String>,
}

impl PlatformClient {
    /// Client for `host` (`name[:port]`), over HTTPS when `ssl` is set.
    #[must_use]
    pub fn new(host: &str, ssl: bool) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self {
            host: host.to_string(),
            base_url: base_url(host, ssl),
            agent,
            session: None,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn cookie(&self, endpoint: &str) -> Result<String, PlatformError> {
        self.session
            .as_ref()
            .map(|id| format!("{SESSION_COOKIE}={id}"))
            .ok_or_else(|| PlatformError::NoSession(endpoint.to_string()))
    }

    fn request(&self, method: &str, path: &str) -> Result<ureq::Request, PlatformError> {
        let cookie = self.cookie(path)?;
        Ok(self
            .agent
            .request(method, &self.url(path))
            .set("Accept", "application/json")
            .set("Cookie", &cookie))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PlatformError> {
        let mut req = self.request("GET", path)?;
        for (k, v) in query {
            req = req.query(k, v);
        }
        let response = req.call().map_err(|e| classify(path, e))?;
        read_json(path, response)
    }

    fn send_json<B: Serialize>(
        &self,
        method: &str,
        path: &str,
        body: &B,
    ) -> Result<ureq::Response, PlatformError> {
        let payload = serde_json::to_string(body).map_err(|e| PlatformError::Decode {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })?;
        self.request(method, path)?
            .set("Content-Type", "application/json")
            .send_string(&payload)
            .map_err(|e| classify(path, e))
    }
}

fn base_url(host: &str, ssl: bool) -> String {
    let scheme = if ssl { "https" } else { "http" };
    format!("{scheme}://{host}/api/v3")
}

/// Maps a ureq failure to the error taxonomy.
fn classify(endpoint: &str, err: ureq::Error) -> PlatformError {
    match err {
        ureq::Error::Status(status, _) => PlatformError::Status {
            endpoint: endpoint.to_string(),
            status,
        },
        ureq::Error::Transport(t) => PlatformError::Network {
            endpoint: endpoint.to_string(),
            reason: t.to_string(),
        },
    }
}

fn read_json<T: DeserializeOwned>(endpoint: &str, response: ureq::Response) -> Result<T, PlatformError> {
    let decode = |reason: String| PlatformError::Decode {
        endpoint: endpoint.to_string(),
        reason,
    };
    let body = response.into_string().map_err(|e| decode(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| decode(e.to_string()))
}

/// Extracts the session id from `Set-Cookie` header values.
fn session_id<'a>(set_cookies: impl IntoIterator<Item = &'a str>) -> Option<String> {
    set_cookies.into_iter().find_map(|header| {
        let pair = header.split(';').next()?.trim();
        let (name, value) = pair.split_once('=')?;
        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
    })
}

/// Converts history DTOs into records. Entries without a timestamp or with a
/// non-terminal state are skipped.
fn to_records(entity_id: &str, dtos: Vec<ActionApiDto>) -> Vec<ActionAttemptRecord> {
    dtos.into_iter()
        .filter_map(|dto| {
            let outcome = dto.action_state.as_deref().and_then(Outcome::from_action_state);
            match (dto.create_time, outcome) {
                (Some(timestamp), Some(outcome)) => Some(ActionAttemptRecord {
                    entity_id: entity_id.to_string(),
                    action_type: dto.action_type,
                    timestamp,
                    outcome,
                }),
                _ => {
                    tracing::debug!(action = %dto.uuid, state = ?dto.action_state, "skipping incomplete history entry");
                    None
                }
            }
        })
        .collect()
}

impl SessionClient for PlatformClient {
    fn login(&mut self, credentials: &Credentials) -> Result<(), PlatformError> {
        self.logout();
        let response = self
            .agent
            .post(&self.url("login"))
            .send_form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .map_err(|e| match e {
                ureq::Error::Status(status @ (401 | 403), _) => PlatformError::Auth {
                    host: self.host.clone(),
                    status,
                },
                other => classify("login", other),
            })?;
        let id = session_id(response.all("set-cookie")).ok_or_else(|| PlatformError::Decode {
            endpoint: "login".into(),
            reason: format!("no {SESSION_COOKIE} cookie in response"),
        })?;
        tracing::debug!(host = %self.host, user = %credentials.username, "platform session established");
        self.session = Some(id);
        Ok(())
    }

    fn logout(&mut self) {
        let Some(id) = self.session.take() else {
            return;
        };
        let result = self
            .agent
            .post(&self.url("logout"))
            .set("Cookie", &format!("{SESSION_COOKIE}={id}"))
            .call();
        if let Err(e) = result {
            tracing::debug!(host = %self.host, error = %e, "platform logout failed; session dropped locally");
        }
    }
}

impl TargetDirectory for PlatformClient {
    fn list_targets(&self) -> Result<Vec<TargetApiDto>, PlatformError> {
        self.get_json("targets", &[])
    }

    fn create_target(&self, spec: &TargetSpec) -> Result<(), PlatformError> {
        self.send_json("POST", "targets", spec).map(drop)
    }
}

impl ActionHistorySource for PlatformClient {
    fn completed_actions(
        &self,
        entity_id: &str,
        action_type: &str,
        lookback_hours: u32,
    ) -> Result<Vec<ActionAttemptRecord>, PlatformError> {
        let path = format!("entities/{entity_id}/actions");
        let query = ActionQuery::completed(action_type, lookback_hours);
        let response = self.send_json("POST", &path, &query)?;
        let dtos: Vec<ActionApiDto> = read_json(&path, response)?;
        tracing::debug!(entity_id, action_type, lookback_hours, count = dtos.len(), "fetched action history");
        Ok(to_records(entity_id, dtos))
    }
}

impl GroupDirectory for PlatformClient {
    fn find_group(&self, name: &str) -> Result<Option<GroupApiDto>, PlatformError> {
        let found: Vec<GroupApiDto> = self.get_json("search", &[("types", "Group"), ("q", name)])?;
        Ok(found.into_iter().find(|g| g.display_name == name))
    }

    fn create_static_group(
        &self,
        name: &str,
        group_type: &str,
    ) -> Result<GroupApiDto, PlatformError> {
        let spec = StaticGroupSpec {
            display_name: name.to_string(),
            group_type: group_type.to_string(),
            is_static: true,
            member_uuid_list: Vec::new(),
        };
        let response = self.send_json("POST", "groups", &spec)?;
        read_json("groups", response)
    }

    fn group_members(&self, group_uuid: &str) -> Result<Vec<String>, PlatformError> {
        let members: Vec<MemberApiDto> =
            self.get_json(&format!("groups/{group_uuid}/members"), &[])?;
        Ok(members.into_iter().map(|m| m.uuid).collect())
    }

    fn update_static_group(
        &self,
        group_uuid: &str,
        spec: &StaticGroupSpec,
    ) -> Result<(), PlatformError> {
        self.send_json("PUT", &format!("groups/{group_uuid}"), spec)
            .map(drop)
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
