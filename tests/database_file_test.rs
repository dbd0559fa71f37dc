#![allow(clippy::unwrap_used, clippy::expect_used)]
// ABOUTME: File-backed store and startup wiring tests
// ABOUTME: Records survive reopening, concurrent writers all land, from_config checks vault settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Palmr Gateway Contributors

mod common;

use common::MockUpstream;
use palmr_gateway::config::{DatabaseUrl, VaultConfig};
use palmr_gateway::crypto::AesGcmVault;
use palmr_gateway::database::{Database, DatabaseError, UserRepository};
use palmr_gateway::models::NewUser;
use palmr_gateway::registration::{RegistrationOutcome, RegistrationRequest};
use palmr_gateway::resources::ServerResources;
use std::sync::Arc;
use tempfile::TempDir;

fn ann() -> NewUser {
    NewUser {
        name: "Ann Lee".to_owned(),
        username: "ann".to_owned(),
        email: "ann@x.com".to_owned(),
        password_hash: String::new(),
    }
}

#[tokio::test]
async fn test_records_survive_reopen() {
    common::init_test_logging();
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("nested/gateway.db").display());

    let id = {
        let db = Database::new(&url).await.unwrap();
        let user = db.create(&ann()).await.unwrap();
        db.mark_upstream_synced(user.id).await.unwrap();
        db.close().await;
        user.id
    };

    let db = Database::new(&url).await.unwrap();
    let user = db.get(id).await.unwrap().unwrap();
    assert_eq!(user.username, "ann");
    assert!(user.upstream_synced);
    assert!(db.create(&ann()).await.is_err());
}

fn member(n: usize) -> NewUser {
    NewUser {
        name: format!("Member {n}"),
        username: format!("member{n}"),
        email: format!("member{n}@x.com"),
        password_hash: String::new(),
    }
}

async fn file_database(dir: &TempDir) -> Arc<Database> {
    common::init_test_logging();
    let url = format!("sqlite:{}", dir.path().join("gateway.db").display());
    Arc::new(Database::new(&url).await.unwrap())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_distinct_inserts_all_succeed() {
    let dir = TempDir::new().unwrap();
    let db = file_database(&dir).await;

    let handles: Vec<_> = (0..32)
        .map(|n| {
            let db = db.clone();
            tokio::spawn(async move { db.create(&member(n)).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(db.list_all().await.unwrap().len(), 32);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_same_username_yields_one_record() {
    let dir = TempDir::new().unwrap();
    let db = file_database(&dir).await;

    let handles: Vec<_> = (0..8)
        .map(|n| {
            let db = db.clone();
            let mut user = member(n);
            user.username = "taken".to_owned();
            tokio::spawn(async move { db.create(&user).await })
        })
        .collect();

    let mut created = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(e) => assert!(
                matches!(e, DatabaseError::Conflict { field: "username" }),
                "unexpected error: {e}"
            ),
        }
    }
    assert_eq!(created, 1);
    assert_eq!(db.list_all().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registrations_on_file_store() {
    let upstream = MockUpstream::start().await;
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("gateway.db").display());
    let database = Database::new(&url).await.unwrap();
    let vault = common::test_vault();
    let credentials = common::sealed_credentials(&vault);
    let resources = Arc::new(
        ServerResources::new(
            common::test_config(&upstream.base_url),
            database,
            Arc::new(vault),
            credentials,
        )
        .unwrap(),
    );

    let handles: Vec<_> = (0..16)
        .map(|n| {
            let resources = resources.clone();
            tokio::spawn(async move {
                resources
                    .orchestrator
                    .register(RegistrationRequest {
                        name: Some(format!("Member {n}")),
                        username: Some(format!("member{n}")),
                        email: Some(format!("member{n}@x.com")),
                        password: Some("secret1".to_owned()),
                        image: None,
                    })
                    .await
            })
        })
        .collect();

    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(
            matches!(outcome, RegistrationOutcome::Created(_)),
            "expected Created, got {outcome:?}"
        );
    }
    assert_eq!(resources.users.list_all().await.unwrap().len(), 16);
    assert_eq!(upstream.register_calls(), 16);
}

fn vault_config(sealed_with: &AesGcmVault) -> VaultConfig {
    let credentials = common::sealed_credentials(sealed_with);
    VaultConfig {
        key: Some(common::test_vault_key_base64()),
        admin_username_encrypted: Some(credentials.username_ciphertext().to_owned()),
        admin_password_encrypted: Some(credentials.password_ciphertext().to_owned()),
    }
}

#[tokio::test]
async fn test_from_config_opens_store_and_vault() {
    let dir = TempDir::new().unwrap();
    let mut config = common::test_config("http://127.0.0.1:1");
    config.database.url = DatabaseUrl::SQLite {
        path: dir.path().join("gateway.db"),
    };
    config.vault = vault_config(&common::test_vault());

    let resources = ServerResources::from_config(config).await.unwrap();
    resources.database.ping().await.unwrap();
    assert!(resources.token_cache.get().await.is_none());
}

#[tokio::test]
async fn test_from_config_rejects_foreign_ciphertexts() {
    let mut config = common::test_config("http://127.0.0.1:1");
    config.vault = vault_config(&common::foreign_vault());

    let error = ServerResources::from_config(config).await.err().unwrap();
    assert!(error.to_string().contains("do not decrypt"));
}

#[tokio::test]
async fn test_from_config_requires_vault_key() {
    let config = common::test_config("http://127.0.0.1:1");
    let error = ServerResources::from_config(config).await.err().unwrap();
    assert!(error.to_string().contains("GATEWAY_VAULT_KEY"));
}
