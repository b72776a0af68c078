//! Component tests for the users resource against a live deployment.
//!
//! Each test skips with a printed reason when the environment is not
//! configured (see the harness crate docs); store assertions skip
//! independently when the verification channel is absent.

#![allow(clippy::unwrap_used, clippy::print_stderr)]

use dualprobe_client::ApiError;
use dualprobe_integration_tests::{
    CreatedUsers, TestContext, generate_israeli_id, generate_phone_number,
};
use serde_json::json;

fn user_payload(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Test User",
        "phone": generate_phone_number(),
        "address": "Test Street 1",
    })
}

#[tokio::test]
async fn test_health_check_is_public() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let response = ctx.anonymous.health_check().await.unwrap();
    assert_eq!(response.status, 200);
    assert!(response.parsed.unwrap().is_ok());
}

#[tokio::test]
async fn test_users_require_authentication() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let response = ctx.anonymous.list_users().await.unwrap();
    assert_eq!(response.status, 401);
    assert!(response.parsed.is_none());
}

#[tokio::test]
async fn test_create_then_verify_on_both_channels() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let mut created = CreatedUsers::new();

    let id = generate_israeli_id();
    let payload = user_payload(&id);
    created.track(id.clone());

    let response = ctx.client.create_user(&payload).await.unwrap();
    assert_eq!(response.status, 201, "body: {}", response.raw);
    let api_user = response.parsed.unwrap();
    assert_eq!(api_user.id, id);
    assert_eq!(api_user.name, payload["name"]);

    // API read-back.
    let fetched = ctx.client.get_user(&id).await.unwrap();
    assert_eq!(fetched.status, 200);
    assert_eq!(fetched.parsed.unwrap(), api_user);

    // Out-of-band persistence check.
    if let Some(store) = ctx.store() {
        let record = store.get_user_by_id(&id).await.unwrap();
        let record = record.expect("user should exist in the store after creation");
        assert_eq!(record, api_user);
        assert!(store.users_exist(&[id.clone()]).await.unwrap());
    }

    created.cleanup(&ctx.client).await;
}

#[tokio::test]
async fn test_create_invalid_id_rejected_and_not_persisted() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let payload = user_payload("123789456"); // bad checksum
    let response = ctx.client.create_user(&payload).await.unwrap();
    assert_eq!(response.status, 400);
    assert!(response.parsed.is_none());

    if let Some(store) = ctx.store() {
        assert!(store.get_user_by_id("123789456").await.unwrap().is_none());
    }
}

#[tokio::test]
async fn test_update_reflects_path_id() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let mut created = CreatedUsers::new();

    let id = generate_israeli_id();
    created.track(id.clone());
    let create = ctx.client.create_user(&user_payload(&id)).await.unwrap();
    assert_eq!(create.status, 201, "body: {}", create.raw);

    // Full update without an id field: the path id is injected.
    let update = ctx
        .client
        .update_user(
            &id,
            &json!({
                "name": "Renamed User",
                "phone": generate_phone_number(),
                "address": "Other Street 2",
            }),
        )
        .await
        .unwrap();
    assert_eq!(update.status, 200, "body: {}", update.raw);
    let updated = update.parsed.unwrap();
    assert_eq!(updated.id, id, "id must survive a full update unchanged");
    assert_eq!(updated.name, "Renamed User");

    // Echoing the matching id back is equally fine.
    let echo = ctx
        .client
        .update_user(
            &id,
            &json!({
                "id": id,
                "name": "Renamed User",
                "phone": updated.phone,
                "address": updated.address,
            }),
        )
        .await
        .unwrap();
    assert_eq!(echo.status, 200, "body: {}", echo.raw);

    // A different id is rejected client-side; nothing reaches the service.
    let err = ctx
        .client
        .update_user(&id, &json!({"id": generate_israeli_id(), "name": "X"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Contract(_)));

    created.cleanup(&ctx.client).await;
}

#[tokio::test]
async fn test_partial_update_changes_only_named_fields() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let mut created = CreatedUsers::new();

    let id = generate_israeli_id();
    created.track(id.clone());
    let create = ctx.client.create_user(&user_payload(&id)).await.unwrap();
    assert_eq!(create.status, 201, "body: {}", create.raw);
    let before = create.parsed.unwrap();

    let patch = ctx
        .client
        .partial_update_user(&id, &json!({"address": "Patched Street 3"}))
        .await
        .unwrap();
    assert_eq!(patch.status, 200, "body: {}", patch.raw);
    let after = patch.parsed.unwrap();
    assert_eq!(after.address, "Patched Street 3");
    assert_eq!(after.name, before.name);
    assert_eq!(after.phone, before.phone);

    // An id in a PATCH body never leaves the client.
    let err = ctx
        .client
        .partial_update_user(&id, &json!({"id": id, "address": "X"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Contract(_)));

    created.cleanup(&ctx.client).await;
}

#[tokio::test]
async fn test_delete_via_api_and_idempotent_store_cleanup() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };

    let id = generate_israeli_id();
    let create = ctx.client.create_user(&user_payload(&id)).await.unwrap();
    assert_eq!(create.status, 201, "body: {}", create.raw);

    let delete = ctx.client.delete_user(&id).await.unwrap();
    assert_eq!(delete.status, 204);

    if let Some(store) = ctx.store() {
        assert!(store.get_user_by_id(&id).await.unwrap().is_none());

        // Deleting an already-absent id twice is not an error.
        let ids = vec![id.clone()];
        assert_eq!(store.delete_users_by_ids(&ids).await.unwrap(), 0);
        assert_eq!(store.delete_users_by_ids(&ids).await.unwrap(), 0);
    }
}

#[tokio::test]
async fn test_list_contains_created_user() {
    let Some(ctx) = TestContext::new().await else {
        return;
    };
    let mut created = CreatedUsers::new();

    let id = generate_israeli_id();
    created.track(id.clone());
    let create = ctx.client.create_user(&user_payload(&id)).await.unwrap();
    assert_eq!(create.status, 201, "body: {}", create.raw);

    let list = ctx.client.list_users().await.unwrap();
    assert_eq!(list.status, 200);
    assert!(
        list.parsed.unwrap().iter().any(|user| user.id == id),
        "created user missing from list"
    );

    let ids = ctx.client.users.list_ids().await.unwrap();
    assert_eq!(ids.status, 200);
    assert!(ids.parsed.unwrap().contains(&id));

    created.cleanup(&ctx.client).await;
}
