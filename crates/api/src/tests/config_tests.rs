// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use ugsync_domain::GroupId;

use crate::{ApiError, ClientConfig, Platform, USER_AGENT};

#[test]
fn test_config_requires_url() {
    let result = ClientConfig::new(None, Some(String::from("token")), None);

    match result {
        Err(ApiError::MissingConfiguration(message)) => assert_eq!(message, "Please provide a URL."),
        other => panic!("Expected MissingConfiguration, got {other:?}"),
    }
}

#[test]
fn test_config_requires_token() {
    let result = ClientConfig::new(Some(String::from("https://so.example.com")), None, None);

    match result {
        Err(ApiError::MissingConfiguration(message)) => {
            assert_eq!(message, "Please provide an API token.");
        }
        other => panic!("Expected MissingConfiguration, got {other:?}"),
    }
}

#[test]
fn test_config_treats_empty_values_as_missing() {
    assert!(
        ClientConfig::new(Some(String::from("  ")), Some(String::from("token")), None).is_err()
    );

    let config: ClientConfig = ClientConfig::new(
        Some(String::from("https://so.example.com")),
        Some(String::from("token")),
        Some(String::new()),
    )
    .unwrap();
    assert_eq!(config.key, None);
}

#[test]
fn test_config_trims_trailing_slash_and_sets_user_agent() {
    let config: ClientConfig = ClientConfig::new(
        Some(String::from("https://so.example.com/")),
        Some(String::from("token")),
        Some(String::from("key")),
    )
    .unwrap();

    assert_eq!(config.base_url, "https://so.example.com");
    assert_eq!(config.user_agent, USER_AGENT);
    assert!(USER_AGENT.starts_with("ugsync-api/"));
}

#[test]
fn test_config_debug_redacts_secrets() {
    let config: ClientConfig = ClientConfig::new(
        Some(String::from("https://so.example.com")),
        Some(String::from("super-secret-token")),
        Some(String::from("super-secret-key")),
    )
    .unwrap();

    let shown: String = format!("{config:?}");

    assert!(!shown.contains("super-secret-token"));
    assert!(!shown.contains("super-secret-key"));
    assert!(shown.contains("https://so.example.com"));
}

#[test]
fn test_detect_enterprise() {
    let platform: Platform = Platform::detect("https://so.example.com/").unwrap();

    assert_eq!(
        platform,
        Platform::Enterprise {
            site_url: String::from("https://so.example.com"),
        }
    );
    assert_eq!(platform.api_url(), "https://so.example.com/api/v3");
    assert_eq!(
        platform.legacy_api_url().as_deref(),
        Some("https://so.example.com/api/2.3")
    );
    assert_eq!(
        platform.group_url(GroupId::new(12)),
        "https://so.example.com/enterprise/user-groups/-12"
    );
}

#[test]
fn test_detect_hosted() {
    let platform: Platform = Platform::detect("https://stackoverflowteams.com/c/acme").unwrap();

    assert_eq!(
        platform,
        Platform::Hosted {
            site_url: String::from("https://stackoverflowteams.com/c/acme"),
            team_slug: String::from("acme"),
        }
    );
    assert_eq!(
        platform.api_url(),
        "https://api.stackoverflowteams.com/v3/teams/acme"
    );
    assert_eq!(platform.legacy_api_url(), None);
    assert_eq!(
        platform.group_url(GroupId::new(12)),
        "https://stackoverflowteams.com/c/acme/users/groups/-12"
    );
}

#[test]
fn test_detect_hosted_without_slug_is_invalid() {
    let result = Platform::detect("https://stackoverflowteams.com/");

    assert!(matches!(result, Err(ApiError::InvalidUrl { .. })));
}
