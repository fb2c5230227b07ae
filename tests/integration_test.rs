// Integration tests for admin-console: stores driven through a scripted transport.

mod common;

use std::sync::Arc;

use admin_console::api::ApiResponse;
use admin_console::api::auth::TokenSlot;
use admin_console::context::AppContext;
use admin_console::error::{ErrorKind, StoreError};
use admin_console::model::{Admin, Role};
use admin_console::store::ResourceStore;
use admin_console::store::counts::{CountKind, CountsStore};
use common::{ID_A, ID_B, ID_C, ScriptedTransport, list, role};
use serde_json::json;

fn ids(store: &ResourceStore<Role>) -> Vec<String> {
    store.items().into_iter().map(|r| r.id).collect()
}

async fn seeded_roles(t: &Arc<ScriptedTransport>) -> ResourceStore<Role> {
    let store = ResourceStore::<Role>::new(t.clone());
    t.reply(200, list(json!([role(ID_A, "x"), role(ID_B, "y"), role(ID_C, "z")])));
    store.fetch_all().await;
    store
}

// 1) Listing replaces the collection and leaves it untouched on failure
#[tokio::test]
async fn fetch_all_replaces_collection() {
    let t = ScriptedTransport::new();
    let store = seeded_roles(&t).await;
    assert_eq!(ids(&store), [ID_A, ID_B, ID_C]);
    assert_eq!(store.error(), None);
    assert!(!store.loading());
    assert_eq!(t.request_lines(), ["GET /roles/"]);
}

#[tokio::test]
async fn fetch_all_application_error_keeps_items() {
    let t = ScriptedTransport::new();
    let store = seeded_roles(&t).await;

    t.reply(200, json!({ "success": false, "message": "DB down" }));
    store.fetch_all().await;
    assert_eq!(ids(&store), [ID_A, ID_B, ID_C]);
    assert_eq!(store.error().as_deref(), Some("DB down"));
    assert!(!store.loading());
}

#[tokio::test]
async fn fetch_all_transport_errors_use_server_message_or_fallback() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());

    t.fail();
    store.fetch_all().await;
    assert_eq!(store.error().as_deref(), Some("Error: Failed to load roles."));

    t.reply(500, json!({ "message": "Internal meltdown" }));
    store.fetch_all().await;
    assert_eq!(store.error().as_deref(), Some("Internal meltdown"));

    // A fresh fetch clears the slot before it starts.
    t.reply(200, list(json!([])));
    store.fetch_all().await;
    assert_eq!(store.error(), None);
    assert!(store.items().is_empty());
}

// 2) Only the latest list request may land
#[tokio::test]
async fn stale_list_response_is_dropped() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());

    let gate = t.gate();
    t.reply(200, list(json!([role(ID_B, "fresh")])));

    let slow = tokio::spawn({
        let store = store.clone();
        async move { store.fetch_all().await }
    });
    t.wait_for_requests(1).await;
    assert!(store.loading());

    store.fetch_all().await;
    assert_eq!(ids(&store), [ID_B]);

    gate.send(ApiResponse::new(200, Some(list(json!([role(ID_A, "stale")])))))
        .unwrap();
    slow.await.unwrap();

    assert_eq!(ids(&store), [ID_B]);
    assert!(!store.loading());
}

// 3) Detail reads
#[tokio::test]
async fn fetch_one_rejects_malformed_ids_without_a_request() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Admin>::new(t.clone());
    store.fetch_one("not-an-id").await;
    assert_eq!(store.error().as_deref(), Some("Invalid Admin ID."));
    assert_eq!(store.selected(), None);
    assert!(t.requests().is_empty());
}

#[tokio::test]
async fn fetch_one_sets_selection_or_reports_not_found() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());

    t.reply(200, json!({ "success": true, "data": role(ID_A, "Auditor") }));
    store.fetch_one(ID_A).await;
    assert_eq!(store.selected().map(|r| r.name), Some("Auditor".to_string()));
    assert_eq!(t.request_lines(), [format!("GET /roles/{ID_A}")]);

    t.reply(200, json!({ "success": false }));
    store.fetch_one(ID_B).await;
    assert_eq!(store.selected(), None);
    assert_eq!(store.error().as_deref(), Some("Role not found."));

    t.fail();
    store.fetch_one(ID_C).await;
    assert_eq!(store.error().as_deref(), Some("Failed to load role details."));
}

// 4) Create validates locally, then posts and reloads
#[tokio::test]
async fn create_with_empty_form_sends_nothing() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());

    let err = store.create().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(err.message(), "Role name, Role Code ID, Department Designation are required.");
    assert_eq!(store.validation_errors().get("codeId").map(String::as_str), Some("Code ID is required."));
    assert!(t.requests().is_empty());
}

#[tokio::test]
async fn create_flags_malformed_email() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Admin>::new(t.clone());
    store.set_field("name", "Ann");
    store.set_field("email", "ann-at-corp");
    store.set_field("password", "hunter22");

    let err = store.create().await.unwrap_err();
    assert_eq!(err.message(), "Role is required. Invalid email format.");
    assert_eq!(store.validation_errors().get("email").map(String::as_str), Some("Invalid email format."));
    assert!(t.requests().is_empty());
}

#[tokio::test]
async fn create_201_resets_form_and_refetches_once() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());
    store.set_field("name", "Auditor");
    store.set_field("codeId", "AUD");
    store.set_field("departmentDesignation", "Finance");

    t.reply(201, json!({ "success": true, "data": role(ID_A, "Auditor") }));
    t.reply(200, list(json!([role(ID_A, "Auditor")])));
    let created = store.create().await.unwrap();

    assert_eq!(created.map(|r| r.id), Some(ID_A.to_string()));
    assert!(store.form().is_empty());
    assert_eq!(ids(&store), [ID_A]);
    assert_eq!(t.request_lines(), ["POST /roles/", "GET /roles/"]);
    let body = t.requests()[0].body.clone().unwrap();
    assert_eq!(body, json!({ "name": "Auditor", "codeId": "AUD", "departmentDesignation": "Finance" }));
}

#[tokio::test]
async fn create_non_201_is_an_application_error() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());
    store.set_field("name", "Auditor");
    store.set_field("codeId", "AUD");
    store.set_field("departmentDesignation", "Finance");

    t.reply(200, json!({ "success": false }));
    let err = store.create().await.unwrap_err();
    assert_eq!(err, StoreError::Application("Failed to create role. Please try again.".into()));
    // Form is kept so the user can retry.
    assert_eq!(store.form().get("name"), Some("Auditor"));

    t.reply(409, json!({ "success": false, "message": "Code ID already exists" }));
    let err = store.create().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.message(), "Code ID already exists");

    t.fail();
    let err = store.create().await.unwrap_err();
    assert_eq!(err.message(), "A network or server error occurred.");
    assert!(!store.loading());
}

// 5) Update reloads the record it changed
#[tokio::test]
async fn update_success_reloads_selection() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());

    t.reply(200, json!({ "success": true }));
    t.reply(200, json!({ "success": true, "data": role(ID_A, "Renamed") }));
    store.update(ID_A, json!({ "name": "Renamed" })).await.unwrap();

    assert_eq!(t.request_lines(), [format!("PUT /roles/{ID_A}"), format!("GET /roles/{ID_A}")]);
    assert_eq!(store.selected().map(|r| r.name), Some("Renamed".to_string()));
}

#[tokio::test]
async fn update_failures_carry_messages() {
    let t = ScriptedTransport::new();
    let store = ResourceStore::<Role>::new(t.clone());

    t.reply(200, json!({ "success": false }));
    let err = store.update(ID_A, json!({})).await.unwrap_err();
    assert_eq!(err.message(), "Unknown error occurred.");

    t.fail();
    let err = store.update(ID_A, json!({})).await.unwrap_err();
    assert_eq!(err.message(), "Failed to update role.");
    assert_eq!(t.requests().len(), 2);
}

// 6) Delete removes optimistically and rolls back on failure
#[tokio::test]
async fn delete_failure_restores_item_in_place() {
    let t = ScriptedTransport::new();
    let store = seeded_roles(&t).await;

    t.fail();
    let err = store.delete(ID_B).await.unwrap_err();
    assert_eq!(err.message(), "Error: Failed to delete role.");
    assert_eq!(ids(&store), [ID_A, ID_B, ID_C]);
    assert_eq!(store.error().as_deref(), Some("Error: Failed to delete role."));

    t.reply(404, json!({ "success": false, "message": "Role not found" }));
    let err = store.delete(ID_C).await.unwrap_err();
    assert_eq!(err.message(), "Role not found");
    assert_eq!(ids(&store), [ID_A, ID_B, ID_C]);
}

#[tokio::test]
async fn delete_hides_item_while_in_flight() {
    let t = ScriptedTransport::new();
    let store = seeded_roles(&t).await;

    let gate = t.gate();
    t.reply(200, list(json!([role(ID_A, "x"), role(ID_C, "z")])));
    let pending = tokio::spawn({
        let store = store.clone();
        async move { store.delete(ID_B).await }
    });
    t.wait_for_requests(2).await;
    assert_eq!(ids(&store), [ID_A, ID_C]);
    assert!(store.loading());

    gate.send(ApiResponse::new(200, Some(json!({ "success": true })))).unwrap();
    pending.await.unwrap().unwrap();
    assert_eq!(ids(&store), [ID_A, ID_C]);
    assert!(!store.loading());
}

async fn overlapping_failed_deletes(b_answers_first: bool) -> Vec<String> {
    let t = ScriptedTransport::new();
    let store = seeded_roles(&t).await;

    let gate_b = t.gate();
    let gate_a = t.gate();
    let del_b = tokio::spawn({
        let store = store.clone();
        async move { store.delete(ID_B).await }
    });
    t.wait_for_requests(2).await;
    let del_a = tokio::spawn({
        let store = store.clone();
        async move { store.delete(ID_A).await }
    });
    t.wait_for_requests(3).await;
    assert_eq!(ids(&store), [ID_C]);

    let boom = || ApiResponse::new(500, Some(json!({ "message": "boom" })));
    if b_answers_first {
        gate_b.send(boom()).unwrap();
        assert!(del_b.await.unwrap().is_err());
        gate_a.send(boom()).unwrap();
        assert!(del_a.await.unwrap().is_err());
    } else {
        gate_a.send(boom()).unwrap();
        assert!(del_a.await.unwrap().is_err());
        gate_b.send(boom()).unwrap();
        assert!(del_b.await.unwrap().is_err());
    }
    assert!(!store.loading());
    ids(&store)
}

#[tokio::test]
async fn overlapping_failed_deletes_keep_list_order() {
    assert_eq!(overlapping_failed_deletes(true).await, [ID_A, ID_B, ID_C]);
    assert_eq!(overlapping_failed_deletes(false).await, [ID_A, ID_B, ID_C]);
}

#[tokio::test]
async fn delete_then_stale_refetch_shows_item_again() {
    let t = ScriptedTransport::new();
    let store = seeded_roles(&t).await;

    t.reply(200, json!({ "success": true }));
    // The read side has not caught up with the delete yet.
    t.reply(200, list(json!([role(ID_A, "x"), role(ID_B, "y"), role(ID_C, "z")])));
    store.delete(ID_A).await.unwrap();

    assert_eq!(ids(&store), [ID_A, ID_B, ID_C]);
    assert_eq!(store.error(), None);
    assert_eq!(t.request_lines()[1..], [format!("DELETE /roles/{ID_A}"), "GET /roles/".to_string()]);
}

// 7) Dashboard counts
#[tokio::test]
async fn counts_read_numbers_and_reject_garbage() {
    let t = ScriptedTransport::new();
    let counts = CountsStore::new(t.clone());

    t.reply(200, json!({ "success": true, "count": 7 }));
    counts.count(CountKind::DepartmentAdmins).await;
    assert_eq!(counts.snapshot().get(CountKind::DepartmentAdmins), Some(7));
    assert_eq!(t.request_lines(), ["GET /department-admins/count"]);

    t.reply(200, json!({ "success": true, "count": "seven" }));
    counts.count(CountKind::Roles).await;
    let snap = counts.snapshot();
    assert_eq!(snap.get(CountKind::Roles), None);
    assert_eq!(snap.error.as_deref(), Some("Invalid response format."));

    t.fail();
    counts.count(CountKind::Departments).await;
    assert_eq!(counts.snapshot().error.as_deref(), Some("Failed to count departments."));
    assert!(!counts.snapshot().loading());
}

// 8) Session and context wiring
#[tokio::test]
async fn rejected_token_logs_out() {
    let t = ScriptedTransport::new();
    let ctx = AppContext::new(t.clone(), TokenSlot::new(Some("stale-token".into())));

    t.reply(401, json!({ "message": "jwt expired" }));
    ctx.auth.fetch_user().await;
    assert_eq!(ctx.auth.token().get(), None);
    assert_eq!(ctx.auth.user(), None);
    assert_eq!(t.request_lines(), ["GET /admins/"]);
}

#[tokio::test]
async fn accepted_token_caches_profile() {
    let t = ScriptedTransport::new();
    let ctx = AppContext::new(t.clone(), TokenSlot::default());

    ctx.auth.fetch_user().await;
    assert!(t.requests().is_empty());

    ctx.auth.set_token("fresh-token").unwrap();
    t.reply(200, json!({ "success": true, "data": [{ "name": "Ann", "email": "ann@corp.io" }] }));
    ctx.auth.fetch_user().await;
    assert_eq!(ctx.auth.display_name().as_deref(), Some("Ann"));
    assert_eq!(ctx.auth.token().get().as_deref(), Some("fresh-token"));
}

#[tokio::test]
async fn profile_name_falls_back_to_email_or_top_level() {
    let t = ScriptedTransport::new();
    let ctx = AppContext::new(t.clone(), TokenSlot::new(Some("tok".into())));

    t.reply(200, json!({ "success": true, "data": { "email": "bo@corp.io" } }));
    ctx.auth.fetch_user().await;
    assert_eq!(ctx.auth.display_name().as_deref(), Some("bo@corp.io"));

    t.reply(200, json!({ "name": "Cy" }));
    ctx.auth.fetch_user().await;
    assert_eq!(ctx.auth.display_name().as_deref(), Some("Cy"));

    t.reply(200, json!({ "success": true, "data": [] }));
    ctx.auth.fetch_user().await;
    assert_eq!(ctx.auth.display_name(), None);
    assert!(ctx.auth.token().get().is_some());
}

#[tokio::test]
async fn refresh_everything_loads_each_collection() {
    let t = ScriptedTransport::new();
    let ctx = AppContext::new(t.clone(), TokenSlot::new(None));

    for _ in 0..4 {
        t.reply(200, list(json!([])));
    }
    for n in [3, 5, 2] {
        t.reply(200, json!({ "success": true, "count": n }));
    }
    ctx.refresh_everything().await;

    let mut lines = t.request_lines();
    lines.sort();
    assert_eq!(
        lines,
        [
            "GET /admins/",
            "GET /department-admins/count",
            "GET /departmentAdmins/",
            "GET /departments/",
            "GET /departments/count",
            "GET /roles/",
            "GET /roles/count",
        ]
    );
    assert_eq!(t.remaining(), 0);
    assert!(ctx.counts.snapshot().error.is_none());
    assert!(ctx.admins.error().is_none());
}
