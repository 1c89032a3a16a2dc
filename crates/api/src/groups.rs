// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! User group operations of the v3 API.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use ugsync::GroupDirectory;
use ugsync_domain::{GroupId, UserGroup, UserId};

use crate::config::{ClientConfig, Platform};
use crate::error::{ApiError, ApiResult};
use crate::paging::{CallData, CallEngine, Paged};
use crate::transport::{Outcome, Payload, QueryParams, Transport};

/// Page size used when listing groups.
pub const GROUPS_PAGE_SIZE: u64 = 100;

/// Body of a create or edit request.
///
/// An edit replaces all three fields, so an edit request must carry the
/// complete desired state of the group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRequest {
    /// Group name. Required by the API.
    pub name: String,
    /// Description; empty by default.
    pub description: String,
    /// Members; empty by default.
    pub user_ids: Vec<UserId>,
}

impl GroupRequest {
    /// A request with the given name, no description and no members.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            user_ids: Vec::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sets the members.
    #[must_use]
    pub fn with_user_ids(mut self, user_ids: Vec<UserId>) -> Self {
        self.user_ids = user_ids;
        self
    }

    /// Builds a request holding a group's current state.
    #[must_use]
    pub fn from_group(group: &UserGroup) -> Self {
        Self {
            name: group.name.clone(),
            description: group.description.clone().unwrap_or_default(),
            user_ids: group.member_ids(),
        }
    }
}

/// Returns true if a response says the addressed group does not exist.
///
/// The platform signals this with a 404 or with "not found" somewhere in
/// the body, depending on the endpoint.
#[must_use]
pub fn is_group_not_found(outcome: &Outcome) -> bool {
    match outcome {
        Outcome::Failure { status, body } => {
            *status == StatusCode::NOT_FOUND || body.to_lowercase().contains("not found")
        }
        Outcome::Text(body) => body.to_lowercase().contains("not found"),
        Outcome::Json(_) => false,
    }
}

/// Client for the `/user-groups` endpoints.
#[derive(Debug, Clone)]
pub struct UserGroupClient {
    engine: CallEngine,
    platform: Platform,
}

impl UserGroupClient {
    /// Detects the platform from the configured URL and opens a checked session.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is malformed or the connectivity check fails.
    pub async fn connect(config: &ClientConfig) -> ApiResult<Self> {
        let platform: Platform = Platform::detect(&config.base_url)?;
        let check_url: String = format!("{}/tags", platform.api_url());
        let transport: Transport = Transport::connect(config, &check_url).await?;
        Ok(Self::new(transport, platform))
    }

    /// Creates a client over an already checked session.
    #[must_use]
    pub fn new(transport: Transport, platform: Platform) -> Self {
        let engine: CallEngine = CallEngine::new(transport, &platform.api_url());
        Self { engine, platform }
    }

    /// The detected platform variant.
    #[must_use]
    pub const fn platform(&self) -> &Platform {
        &self.platform
    }

    /// The session used by this client.
    #[must_use]
    pub const fn transport(&self) -> &Transport {
        self.engine.transport()
    }

    /// Lists every user group.
    ///
    /// # Errors
    ///
    /// Returns an error if a request gets no response or a group record
    /// cannot be decoded. A failing page yields `Paged::Partial`.
    pub async fn list_groups(&self) -> ApiResult<Paged<UserGroup>> {
        let mut params: QueryParams = QueryParams::new();
        params.insert(String::from("page"), Value::from(1_u64));
        params.insert(String::from("pagesize"), Value::from(GROUPS_PAGE_SIZE));

        match self
            .engine
            .call(Method::GET, "/user-groups", Payload::Query(params))
            .await?
        {
            CallData::Collection(paged) => Ok(paged.try_map(serde_json::from_value::<UserGroup>)?),
            CallData::Single(outcome) => Err(unexpected(
                self.engine.endpoint_url("/user-groups"),
                outcome,
            )),
        }
    }

    /// Creates a user group.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for a non-success status and
    /// `ApiError::UnexpectedBody` if the response is not a group record.
    pub async fn create_group(&self, request: &GroupRequest) -> ApiResult<UserGroup> {
        let data: CallData = self
            .engine
            .call(Method::POST, "/user-groups", Payload::Json(serde_json::to_value(request)?))
            .await?;
        into_group(self.engine.endpoint_url("/user-groups"), data)
    }

    /// Replaces a group's name, description and members.
    ///
    /// Fields left empty in `request` are cleared on the server.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for a non-success status and
    /// `ApiError::UnexpectedBody` if the response is not a group record.
    pub async fn edit_group(&self, group_id: GroupId, request: &GroupRequest) -> ApiResult<UserGroup> {
        let endpoint: String = format!("/user-groups/{group_id}");
        let data: CallData = self
            .engine
            .call(Method::PUT, &endpoint, Payload::Json(serde_json::to_value(request)?))
            .await?;
        into_group(self.engine.endpoint_url(&endpoint), data)
    }

    /// Adds users to a group.
    ///
    /// Returns `Ok(None)` when the platform reports that the group does not
    /// exist; the caller is expected to skip that group.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` for other non-success statuses and
    /// `ApiError::UnexpectedBody` if the response is not a group record.
    pub async fn add_members(
        &self,
        group_id: GroupId,
        user_ids: &[UserId],
    ) -> ApiResult<Option<UserGroup>> {
        let endpoint: String = format!("/user-groups/{group_id}/members");
        let data: CallData = self
            .engine
            .call(Method::POST, &endpoint, Payload::Json(serde_json::to_value(user_ids)?))
            .await?;

        if let CallData::Single(outcome) = &data
            && is_group_not_found(outcome)
        {
            warn!("User group with ID {group_id} not found. Skipping...");
            return Ok(None);
        }

        into_group(self.engine.endpoint_url(&endpoint), data).map(Some)
    }
}

impl GroupDirectory for UserGroupClient {
    type Error = ApiError;

    async fn append_members(
        &self,
        group_id: GroupId,
        user_ids: &[UserId],
    ) -> ApiResult<Option<UserGroup>> {
        self.add_members(group_id, user_ids).await
    }

    async fn create_with_members(&self, name: &str, user_ids: &[UserId]) -> ApiResult<UserGroup> {
        let request: GroupRequest = GroupRequest::new(name).with_user_ids(user_ids.to_vec());
        self.create_group(&request).await
    }

    fn group_url(&self, group_id: GroupId) -> String {
        self.platform.group_url(group_id)
    }
}

fn into_group(url: String, data: CallData) -> ApiResult<UserGroup> {
    match data {
        CallData::Single(Outcome::Json(value)) => {
            UserGroup::deserialize(&value).map_err(|_| ApiError::UnexpectedBody {
                url,
                body: value.to_string(),
            })
        }
        CallData::Single(outcome) => Err(unexpected(url, outcome)),
        CallData::Collection(_) => Err(ApiError::UnexpectedBody {
            url,
            body: String::from("paginated collection"),
        }),
    }
}

fn unexpected(url: String, outcome: Outcome) -> ApiError {
    match outcome {
        Outcome::Failure { status, body } => ApiError::Rejected { url, status, body },
        Outcome::Text(body) => ApiError::UnexpectedBody { url, body },
        Outcome::Json(value) => ApiError::UnexpectedBody {
            url,
            body: value.to_string(),
        },
    }
}
