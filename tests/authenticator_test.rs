#![allow(clippy::unwrap_used, clippy::expect_used)]
// ABOUTME: Integration tests for admin login against a mock upstream
// ABOUTME: Covers cache reuse, concurrent misses, cookie fallback, declared lifetimes, failure branches
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

mod common;

use chrono::{Duration, Utc};
use common::{LoginBehavior, MockUpstream, RegisterBehavior};
use palmr_gateway::errors::AuthError;
use std::collections::HashSet;
use std::time::{Duration as StdDuration, Instant};

#[tokio::test]
async fn test_cached_token_reused_without_login() {
    let upstream = MockUpstream::start().await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    // Six minutes out is beyond the default five-minute margin
    resources
        .token_cache
        .set("cached", Utc::now() + Duration::minutes(6))
        .await;

    let token = resources.authenticator.authenticate().await.unwrap();
    assert_eq!(token.value(), "cached");
    assert_eq!(upstream.login_calls(), 0);
}

#[tokio::test]
async fn test_token_inside_margin_triggers_one_login() {
    let upstream = MockUpstream::start().await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    resources
        .token_cache
        .set("stale", Utc::now() + Duration::minutes(4))
        .await;

    let token = resources.authenticator.authenticate().await.unwrap();
    assert_eq!(token.value(), "T1");
    assert_eq!(upstream.login_calls(), 1);
    assert_eq!(resources.token_cache.get().await.unwrap().value(), "T1");

    // Freshly cached token serves the next caller
    let again = resources.authenticator.authenticate().await.unwrap();
    assert_eq!(again.value(), "T1");
    assert_eq!(upstream.login_calls(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_misses_log_in_without_serializing() {
    let delay = StdDuration::from_millis(200);
    let upstream =
        MockUpstream::start_with(LoginBehavior::Delay(delay), RegisterBehavior::Status(201)).await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let callers = 8;
    let started = Instant::now();
    let handles: Vec<_> = (0..callers)
        .map(|_| {
            let resources = resources.clone();
            tokio::spawn(async move { resources.authenticator.authenticate().await })
        })
        .collect();

    let mut issued = HashSet::new();
    for handle in handles {
        let token = handle.await.unwrap().unwrap();
        issued.insert(token.value().to_owned());
    }
    let elapsed = started.elapsed();

    // Serialized logins would take callers * delay
    assert!(elapsed < delay * 4, "took {elapsed:?}");
    let logins = upstream.login_calls();
    assert!((1..=callers).contains(&logins));

    let cached = resources.token_cache.get().await.unwrap();
    assert!(issued.contains(cached.value()));
    assert!(cached.expires_at() > Utc::now() + Duration::minutes(50));

    // The winner serves later callers without another login
    let next = resources.authenticator.authenticate().await.unwrap();
    assert_eq!(next.value(), cached.value());
    assert_eq!(upstream.login_calls(), logins);
}

#[tokio::test]
async fn test_login_sends_decrypted_credentials() {
    let upstream = MockUpstream::start().await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    resources.authenticator.authenticate().await.unwrap();

    let body = upstream.last_login_body().unwrap();
    assert_eq!(body["emailOrUsername"], common::ADMIN_USERNAME);
    assert_eq!(body["password"], common::ADMIN_PASSWORD);
}

#[tokio::test]
async fn test_assumed_lifetime_when_none_declared() {
    let upstream = MockUpstream::start().await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let before = Utc::now();
    let token = resources.authenticator.authenticate().await.unwrap();
    let after = Utc::now();

    assert!(token.expires_at() >= before + Duration::hours(1));
    assert!(token.expires_at() <= after + Duration::hours(1));
}

#[tokio::test]
async fn test_expires_in_is_honoured() {
    let upstream = MockUpstream::start_with(
        LoginBehavior::JsonToken {
            expires_in: Some(900),
        },
        RegisterBehavior::Status(201),
    )
    .await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let before = Utc::now();
    let token = resources.authenticator.authenticate().await.unwrap();
    assert!(token.expires_at() >= before + Duration::seconds(900));
    assert!(token.expires_at() < before + Duration::seconds(960));
}

#[tokio::test]
async fn test_token_from_set_cookie() {
    let upstream = MockUpstream::start_with(
        LoginBehavior::Cookie("token=abc123; Path=/; HttpOnly".to_owned()),
        RegisterBehavior::Status(201),
    )
    .await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let token = resources.authenticator.authenticate().await.unwrap();
    assert_eq!(token.value(), "abc123");
    assert_eq!(resources.token_cache.get().await.unwrap().value(), "abc123");
}

#[tokio::test]
async fn test_cookie_max_age_sets_expiry() {
    let upstream = MockUpstream::start_with(
        LoginBehavior::Cookie("token=abc123; Max-Age=1200; Path=/; HttpOnly".to_owned()),
        RegisterBehavior::Status(201),
    )
    .await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let before = Utc::now();
    let token = resources.authenticator.authenticate().await.unwrap();
    assert!(token.expires_at() >= before + Duration::seconds(1200));
    assert!(token.expires_at() < before + Duration::seconds(1260));
}

#[tokio::test]
async fn test_missing_token_is_malformed_and_cache_untouched() {
    let upstream = MockUpstream::start_with(LoginBehavior::NoToken, RegisterBehavior::Status(201)).await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let previous = Utc::now() + Duration::minutes(2);
    resources.token_cache.set("old", previous).await;

    let result = resources.authenticator.authenticate().await;
    assert_eq!(result.unwrap_err(), AuthError::MalformedResponse);

    let cached = resources.token_cache.get().await.unwrap();
    assert_eq!(cached.value(), "old");
    assert_eq!(cached.expires_at(), previous);
}

#[tokio::test]
async fn test_rejected_login_status() {
    let upstream = MockUpstream::start_with(LoginBehavior::Status(401), RegisterBehavior::Status(201)).await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let result = resources.authenticator.authenticate().await;
    assert_eq!(result.unwrap_err(), AuthError::UpstreamRejected(401));
    assert!(resources.token_cache.get().await.is_none());

    upstream.set_login(LoginBehavior::Status(500));
    let result = resources.authenticator.authenticate().await;
    assert_eq!(result.unwrap_err(), AuthError::UpstreamRejected(500));
}

#[tokio::test]
async fn test_login_timeout() {
    let upstream = MockUpstream::start_with(
        LoginBehavior::Delay(StdDuration::from_secs(3)),
        RegisterBehavior::Status(201),
    )
    .await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let result = resources.authenticator.authenticate().await;
    assert_eq!(result.unwrap_err(), AuthError::Timeout);
    assert!(resources.token_cache.get().await.is_none());
}

#[tokio::test]
async fn test_connection_refused() {
    let base_url = common::unreachable_base_url().await;
    let resources = common::create_test_resources(common::test_config(&base_url)).await;

    let result = resources.authenticator.authenticate().await;
    assert!(matches!(result, Err(AuthError::ConnectionFailed(_))));
}

#[tokio::test]
async fn test_wrong_vault_key_sends_nothing() {
    let upstream = MockUpstream::start().await;
    let credentials = common::sealed_credentials(&common::foreign_vault());
    let resources = common::create_resources_with_credentials(
        common::test_config(&upstream.base_url),
        credentials,
    )
    .await;

    let result = resources.authenticator.authenticate().await;
    assert!(matches!(result, Err(AuthError::CredentialUnavailable(_))));
    assert_eq!(upstream.login_calls(), 0);
}

#[tokio::test]
async fn test_invalidate_only_evicts_matching_token() {
    let upstream = MockUpstream::start().await;
    let resources = common::create_test_resources(common::test_config(&upstream.base_url)).await;

    let first = resources.authenticator.authenticate().await.unwrap();
    resources.token_cache.invalidate().await;
    let second = resources.authenticator.authenticate().await.unwrap();
    assert_eq!(second.value(), "T2");

    // A stale rejection must not discard the newer token
    assert!(!resources.authenticator.invalidate(&first).await);
    assert_eq!(resources.token_cache.get().await.unwrap().value(), "T2");

    assert!(resources.authenticator.invalidate(&second).await);
    assert!(resources.token_cache.get().await.is_none());
}
