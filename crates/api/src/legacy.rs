// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only client for the legacy v2 API.
//!
//! The v3 API does not expose user email addresses. On Enterprise
//! instances the v2 users endpoint does, provided the request uses a
//! response filter that includes `user.email`.

use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};
use ugsync_domain::{PlatformUser, UserId};

use crate::config::{ClientConfig, Platform};
use crate::error::{ApiError, ApiResult};
use crate::transport::{Outcome, Payload, QueryParams, Transport};

/// Page size used when listing users.
pub const USERS_PAGE_SIZE: u64 = 100;

/// Response fields added by the email filter.
const EMAIL_FILTER_FIELDS: &[&str] = &["user.email"];

/// Highest user ID held by community and system accounts. The community
/// account is listed with a negative ID.
const LAST_SYSTEM_USER_ID: i64 = 1;

/// The v2 response envelope.
#[derive(Debug, Deserialize)]
struct Wrapper<T> {
    items: Vec<T>,
    #[serde(default)]
    has_more: bool,
}

#[derive(Debug, Deserialize)]
struct FilterItem {
    filter: String,
}

#[derive(Debug, Deserialize)]
struct UserItem {
    user_id: i64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

impl UserItem {
    /// Converts a real account; system accounts yield `None`.
    fn into_platform_user(self) -> Option<PlatformUser> {
        if self.user_id <= LAST_SYSTEM_USER_ID {
            return None;
        }
        let user_id: u64 = u64::try_from(self.user_id).ok()?;
        Some(PlatformUser {
            user_id: UserId::new(user_id),
            email: self.email,
            display_name: self.display_name,
        })
    }
}

/// Client for the v2 `/users` and `/filters` endpoints.
#[derive(Debug, Clone)]
pub struct LegacyUserClient {
    transport: Transport,
    api_url: String,
    key: String,
    token: String,
}

impl LegacyUserClient {
    /// Creates a client that reuses an already checked session.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The platform is a hosted instance, which has no v2 email access
    /// - No API key was configured
    pub fn new(transport: Transport, platform: &Platform, config: &ClientConfig) -> ApiResult<Self> {
        let api_url: String = platform.legacy_api_url().ok_or_else(|| {
            ApiError::UnsupportedPlatform(String::from(
                "Business and Basic instances are not supported yet; \
                 user email addresses are only available on Enterprise",
            ))
        })?;
        let key: String = config
            .key
            .clone()
            .ok_or(ApiError::MissingConfiguration("Please provide an API key."))?;

        Ok(Self {
            transport,
            api_url,
            key,
            token: config.token.clone(),
        })
    }

    /// Creates a response filter that adds `include` fields to the default set.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response carries no filter.
    pub async fn create_filter(&self, include: &[&str]) -> ApiResult<String> {
        let mut params: QueryParams = self.auth_params();
        params.insert(String::from("include"), Value::from(include.join(";")));
        params.insert(String::from("unsafe"), Value::from("false"));

        let url: String = format!("{}/filters/create", self.api_url);
        let body: Value = self.get(&url, params).await?;
        let wrapper: Wrapper<FilterItem> = Wrapper::deserialize(&body)?;

        let filter: String = wrapper
            .items
            .into_iter()
            .next()
            .map(|item| item.filter)
            .ok_or_else(|| ApiError::UnexpectedBody {
                url,
                body: body.to_string(),
            })?;
        debug!("Created API filter {filter}");
        Ok(filter)
    }

    /// Lists every real user, page by page, until the API reports no more.
    ///
    /// Community and system accounts (IDs of 1 and below) are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if any page fails or cannot be decoded.
    pub async fn list_users(&self, filter: &str) -> ApiResult<Vec<PlatformUser>> {
        let url: String = format!("{}/users", self.api_url);
        let mut users: Vec<PlatformUser> = Vec::new();
        let mut page: u64 = 1;

        loop {
            let mut params: QueryParams = self.auth_params();
            params.insert(String::from("page"), Value::from(page));
            params.insert(String::from("pagesize"), Value::from(USERS_PAGE_SIZE));
            params.insert(String::from("filter"), Value::from(filter));

            let body: Value = self.get(&url, params).await?;
            let wrapper: Wrapper<UserItem> = Wrapper::deserialize(&body)?;
            info!("Received page {page} from {url}");

            users.extend(
                wrapper
                    .items
                    .into_iter()
                    .filter_map(UserItem::into_platform_user),
            );
            if !wrapper.has_more {
                return Ok(users);
            }
            page += 1;
        }
    }

    /// Lists real users with their email addresses.
    ///
    /// # Errors
    ///
    /// Returns an error if the filter cannot be created or the listing fails.
    pub async fn users_with_email(&self) -> ApiResult<Vec<PlatformUser>> {
        let filter: String = self.create_filter(EMAIL_FILTER_FIELDS).await?;
        self.list_users(&filter).await
    }

    fn auth_params(&self) -> QueryParams {
        let mut params: QueryParams = QueryParams::new();
        params.insert(String::from("key"), Value::from(self.key.as_str()));
        params.insert(String::from("access_token"), Value::from(self.token.as_str()));
        params
    }

    async fn get(&self, url: &str, params: QueryParams) -> ApiResult<Value> {
        match self
            .transport
            .request(Method::GET, url, &Payload::Query(params))
            .await?
        {
            Outcome::Json(body) => Ok(body),
            Outcome::Text(body) => Err(ApiError::UnexpectedBody {
                url: url.to_string(),
                body,
            }),
            Outcome::Failure { status, body } => Err(ApiError::Rejected {
                url: url.to_string(),
                status,
                body,
            }),
        }
    }
}
