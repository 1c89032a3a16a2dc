// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client configuration and platform detection.

use ugsync_domain::GroupId;

use crate::error::{ApiError, ApiResult};

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Substring that marks a hosted (Business/Basic) instance URL.
const HOSTED_MARKER: &str = "stackoverflowteams.com";

/// Prefix that precedes the team slug in a hosted instance URL.
const HOSTED_SITE_PREFIX: &str = "https://stackoverflowteams.com/c/";

/// Root of the hosted v3 API; the team slug is appended.
const HOSTED_API_ROOT: &str = "https://api.stackoverflowteams.com/v3/teams";

/// Settings needed to talk to a platform instance.
#[derive(Clone)]
pub struct ClientConfig {
    /// Instance URL as given by the user, without a trailing slash.
    pub base_url: String,
    /// Bearer token for the v3 API.
    pub token: String,
    /// API key for the legacy v2 API (enterprise only).
    pub key: Option<String>,
    /// User agent header value.
    pub user_agent: String,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("token", &"[REDACTED]")
            .field("key", &self.key.as_ref().map(|_| "[REDACTED]"))
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ClientConfig {
    /// Validates raw settings into a configuration.
    ///
    /// Empty strings count as missing.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::MissingConfiguration` if the URL or token is absent.
    pub fn new(url: Option<String>, token: Option<String>, key: Option<String>) -> ApiResult<Self> {
        let base_url: String = non_empty(url)
            .ok_or(ApiError::MissingConfiguration("Please provide a URL."))?
            .trim_end_matches('/')
            .to_string();
        let token: String =
            non_empty(token).ok_or(ApiError::MissingConfiguration("Please provide an API token."))?;

        Ok(Self {
            base_url,
            token,
            key: non_empty(key),
            user_agent: String::from(USER_AGENT),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Which flavor of the platform an instance URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Platform {
    /// Hosted Business/Basic instance, addressed by team slug.
    Hosted {
        /// The instance URL.
        site_url: String,
        /// The team slug taken from the URL.
        team_slug: String,
    },
    /// Self-hosted Enterprise instance.
    Enterprise {
        /// The instance URL.
        site_url: String,
    },
}

impl Platform {
    /// Detects the platform variant from an instance URL.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` for a hosted URL without a team slug.
    pub fn detect(url: &str) -> ApiResult<Self> {
        let site_url: String = url.trim_end_matches('/').to_string();

        if !site_url.contains(HOSTED_MARKER) {
            return Ok(Self::Enterprise { site_url });
        }

        let team_slug: String = site_url
            .split_once(HOSTED_SITE_PREFIX)
            .map(|(_, rest)| rest.trim_matches('/').to_string())
            .filter(|slug| !slug.is_empty())
            .ok_or_else(|| ApiError::InvalidUrl {
                url: url.to_string(),
                reason: format!("expected {HOSTED_SITE_PREFIX}<team-slug>"),
            })?;

        Ok(Self::Hosted {
            site_url,
            team_slug,
        })
    }

    /// Root URL of the v3 API for this instance.
    #[must_use]
    pub fn api_url(&self) -> String {
        match self {
            Self::Hosted { team_slug, .. } => format!("{HOSTED_API_ROOT}/{team_slug}"),
            Self::Enterprise { site_url } => format!("{site_url}/api/v3"),
        }
    }

    /// Root URL of the legacy v2 API. Only enterprise instances expose it.
    #[must_use]
    pub fn legacy_api_url(&self) -> Option<String> {
        match self {
            Self::Hosted { .. } => None,
            Self::Enterprise { site_url } => Some(format!("{site_url}/api/2.3")),
        }
    }

    /// Browser URL of a user group's page.
    #[must_use]
    pub fn group_url(&self, group_id: GroupId) -> String {
        match self {
            Self::Hosted { site_url, .. } => format!("{site_url}/users/groups/-{group_id}"),
            Self::Enterprise { site_url } => {
                format!("{site_url}/enterprise/user-groups/-{group_id}")
            }
        }
    }
}
