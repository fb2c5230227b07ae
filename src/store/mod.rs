//! Resource stores: the in-memory side of each REST collection.
//!
//! A [`ResourceStore`] owns the fetched collection, the record selected for
//! viewing, the error slot, the edit form and its validation errors. Every
//! operation talks to the API through [`Transport`] and reconciles local state
//! afterwards. Failures never escape as panics: reads put a message in the
//! error slot, writes return a [`StoreError`].
//!
//! State sits behind a mutex that is only held between awaits, so calls may
//! overlap. The list and the selected record each have a [`Generation`]; a
//! response is applied only if it belongs to the latest request for its slot.
pub mod counts;
pub mod form;
pub mod generation;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::api::{ApiRequest, ApiResponse, Transport};
use crate::error::{StoreError, TransportError};
use crate::model::Resource;
use form::{FieldErrors, FormState, Validation};
use generation::Generation;

pub const NETWORK_ERROR: &str = "A network or server error occurred.";
pub const UNKNOWN_ERROR: &str = "Unknown error occurred.";

/// True for 24-character hexadecimal ids (MongoDB ObjectId form).
pub fn is_object_id(id: &str) -> bool {
    id.len() == 24 && id.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Map a transport result to a 2xx response, or to a transport-tier error
/// carrying the server's message when one came back.
pub(crate) fn classify(
    result: Result<ApiResponse, TransportError>,
    fallback: &str,
    path: &str,
) -> Result<ApiResponse, StoreError> {
    match result {
        Ok(resp) if resp.is_success() => Ok(resp),
        Ok(resp) => {
            warn!(path, status = resp.status, "request failed");
            Err(StoreError::Transport(resp.message().unwrap_or_else(|| fallback.to_string())))
        }
        Err(e) => {
            warn!(path, error = %e, "request did not complete");
            Err(StoreError::Transport(fallback.to_string()))
        }
    }
}

/// An optimistic removal waiting for the server to confirm the delete.
#[derive(Clone, Debug)]
struct StagedRemoval<R> {
    id: String,
    item: R,
    /// List version the removal was applied to.
    version: u64,
}

#[derive(Debug)]
pub struct StoreState<R: Resource> {
    items: Vec<R>,
    selected: Option<R>,
    error: Option<String>,
    form: FormState,
    validation_errors: FieldErrors,
    list: Generation,
    detail: Generation,
    mutations: usize,
    list_version: u64,
    /// Ids in the order the last fetch returned them.
    fetched_order: Vec<String>,
    staged: Vec<StagedRemoval<R>>,
}

impl<R: Resource> StoreState<R> {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            error: None,
            form: FormState::new(R::FORM),
            validation_errors: form::empty_errors(R::FORM),
            list: Generation::default(),
            detail: Generation::default(),
            mutations: 0,
            list_version: 0,
            fetched_order: Vec::new(),
            staged: Vec::new(),
        }
    }

    pub fn items(&self) -> &[R] {
        &self.items
    }

    pub fn selected(&self) -> Option<&R> {
        self.selected.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn validation_errors(&self) -> &FieldErrors {
        &self.validation_errors
    }

    /// True while the latest list or detail request, or any write, is outstanding.
    pub fn loading(&self) -> bool {
        self.list.pending() || self.detail.pending() || self.mutations > 0
    }

    /// Bumped every time the collection is replaced by a fetch.
    pub fn list_version(&self) -> u64 {
        self.list_version
    }

    fn replace_items(&mut self, items: Vec<R>) {
        self.fetched_order = items.iter().map(|r| r.id().to_string()).collect();
        self.items = items;
        self.list_version += 1;
    }

    fn stage_removal(&mut self, id: &str) {
        if let Some(index) = self.items.iter().position(|r| r.id() == id) {
            let item = self.items.remove(index);
            self.staged.push(StagedRemoval {
                id: id.to_string(),
                item,
                version: self.list_version,
            });
        }
    }

    /// Undo a staged removal unless a fetch has replaced the list since.
    ///
    /// The item goes back at its place in the fetched order, so overlapping
    /// removals can be undone in any order.
    fn rollback(&mut self, id: &str) {
        let Some(pos) = self.staged.iter().position(|s| s.id == id) else { return };
        let staged = self.staged.remove(pos);
        if staged.version != self.list_version {
            return;
        }
        let rank: HashMap<&str, usize> =
            self.fetched_order.iter().enumerate().map(|(i, id)| (id.as_str(), i)).collect();
        let own = rank.get(id).copied().unwrap_or(usize::MAX);
        let at = self
            .items
            .iter()
            .filter(|r| rank.get(r.id()).is_some_and(|&i| i < own))
            .count();
        self.items.insert(at, staged.item);
    }

    fn drop_staged(&mut self, id: &str) {
        self.staged.retain(|s| s.id != id);
    }
}

fn lock<R: Resource>(state: &Mutex<StoreState<R>>) -> MutexGuard<'_, StoreState<R>> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Keeps `mutations` raised for the lifetime of a write, whatever the exit path.
struct MutationGuard<R: Resource> {
    state: Arc<Mutex<StoreState<R>>>,
}

impl<R: Resource> Drop for MutationGuard<R> {
    fn drop(&mut self) {
        let mut s = lock(&self.state);
        s.mutations = s.mutations.saturating_sub(1);
    }
}

pub struct ResourceStore<R: Resource> {
    transport: Arc<dyn Transport>,
    state: Arc<Mutex<StoreState<R>>>,
}

impl<R: Resource> Clone for ResourceStore<R> {
    fn clone(&self) -> Self {
        Self { transport: Arc::clone(&self.transport), state: Arc::clone(&self.state) }
    }
}

impl<R: Resource> ResourceStore<R> {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport, state: Arc::new(Mutex::new(StoreState::new())) }
    }

    /// Run `f` against a consistent snapshot of the state.
    pub fn read<T>(&self, f: impl FnOnce(&StoreState<R>) -> T) -> T {
        f(&lock(&self.state))
    }

    fn write<T>(&self, f: impl FnOnce(&mut StoreState<R>) -> T) -> T {
        f(&mut lock(&self.state))
    }

    pub fn items(&self) -> Vec<R> {
        self.read(|s| s.items.clone())
    }

    pub fn selected(&self) -> Option<R> {
        self.read(|s| s.selected.clone())
    }

    pub fn error(&self) -> Option<String> {
        self.read(|s| s.error.clone())
    }

    pub fn loading(&self) -> bool {
        self.read(StoreState::<R>::loading)
    }

    pub fn find(&self, id: &str) -> Option<R> {
        self.read(|s| s.items.iter().find(|r| r.id() == id).cloned())
    }

    pub fn clear_error(&self) {
        self.write(|s| s.error = None);
    }

    fn begin_mutation(&self) -> MutationGuard<R> {
        self.write(|s| s.mutations += 1);
        MutationGuard { state: Arc::clone(&self.state) }
    }

    /// Replace the collection with the server's list.
    pub async fn fetch_all(&self) {
        let ticket = self.write(|s| {
            s.error = None;
            s.list.begin()
        });
        let outcome = self.load_list().await;
        self.write(|s| {
            if !s.list.settle(ticket) {
                debug!(resource = R::PATH, ticket = ticket.value(), "dropping stale list response");
                return;
            }
            match outcome {
                Ok(items) => {
                    debug!(resource = R::PATH, count = items.len(), "list refreshed");
                    s.replace_items(items);
                }
                Err(e) => s.error = Some(e.to_string()),
            }
        });
    }

    async fn load_list(&self) -> Result<Vec<R>, StoreError> {
        let fallback = format!("Error: Failed to load {}.", R::PLURAL);
        let result = self.transport.send(ApiRequest::get(R::collection_path())).await;
        let resp = classify(result, &fallback, R::PATH)?;
        let env = resp.envelope::<Vec<R>>().map_err(|e| {
            warn!(resource = R::PATH, error = %e, "unusable list envelope");
            StoreError::Transport(fallback.clone())
        })?;
        if env.success {
            Ok(env.data.unwrap_or_default())
        } else {
            Err(StoreError::Application(env.message_or(&fallback)))
        }
    }

    /// Load one record into the selected slot. Malformed ids are rejected
    /// without a request.
    pub async fn fetch_one(&self, id: &str) {
        let ticket = self.write(|s| {
            s.error = None;
            s.selected = None;
            s.detail.begin()
        });
        let outcome = if is_object_id(id) {
            self.load_one(id).await
        } else {
            Err(StoreError::Validation(format!("Invalid {} ID.", R::TITLE)))
        };
        self.write(|s| {
            if !s.detail.settle(ticket) {
                debug!(resource = R::PATH, id, "dropping stale detail response");
                return;
            }
            match outcome {
                Ok(record) => s.selected = Some(record),
                Err(e) => s.error = Some(e.to_string()),
            }
        });
    }

    async fn load_one(&self, id: &str) -> Result<R, StoreError> {
        let fallback = format!("Failed to load {} details.", R::NOUN);
        let not_found = format!("{} not found.", R::TITLE);
        let result = self.transport.send(ApiRequest::get(R::item_path(id))).await;
        let resp = classify(result, &fallback, R::PATH)?;
        let env = resp.envelope::<Value>().map_err(|e| {
            warn!(resource = R::PATH, error = %e, "unusable detail envelope");
            StoreError::Transport(fallback.clone())
        })?;
        if !env.success {
            return Err(StoreError::Application(env.message_or(&not_found)));
        }
        env.data
            .and_then(|d| serde_json::from_value::<R>(d).ok())
            .ok_or(StoreError::Application(not_found))
    }

    pub fn form(&self) -> FormState {
        self.read(|s| s.form.clone())
    }

    pub fn validation_errors(&self) -> FieldErrors {
        self.read(|s| s.validation_errors.clone())
    }

    /// Set one form field; `false` if the resource has no such field.
    pub fn set_field(&self, key: &str, value: impl Into<String>) -> bool {
        let value = value.into();
        self.write(|s| s.form.set(key, value))
    }

    pub fn set_field_at(&self, index: usize, value: impl Into<String>) {
        let value = value.into();
        self.write(|s| {
            if let Some(slot) = s.form.value_at_mut(index) {
                *slot = value;
            }
        });
    }

    pub fn reset_form(&self) {
        self.write(|s| s.form.reset());
    }

    pub fn clear_validation_errors(&self) {
        self.write(|s| s.validation_errors = form::empty_errors(R::FORM));
    }

    /// Prefill the form from `record` for editing.
    pub fn load_form_from(&self, record: &R) {
        self.write(|s| s.form.fill_from(record));
    }

    /// Non-blank form fields, as an update body.
    pub fn form_patch(&self) -> Value {
        self.read(|s| s.form.to_patch())
    }

    pub fn validate_form(&self) -> Validation {
        self.write(|s| form::validate(&s.form, &mut s.validation_errors))
    }

    /// Validate and submit the form. On `201` the form is reset and the list
    /// is re-fetched; the created record is returned when the server sent one.
    pub async fn create(&self) -> Result<Option<R>, StoreError> {
        let (validation, body) = self.write(|s| {
            let v = form::validate(&s.form, &mut s.validation_errors);
            (v, s.form.to_json())
        });
        if !validation.is_valid {
            debug!(resource = R::PATH, message = %validation.message, "form rejected");
            return Err(StoreError::Validation(validation.message));
        }

        let _guard = self.begin_mutation();
        let result = self.transport.send(ApiRequest::post(R::collection_path(), body)).await;
        let resp = classify(result, NETWORK_ERROR, R::PATH)?;
        let env = resp.envelope::<Value>().map_err(|e| {
            warn!(resource = R::PATH, error = %e, "unusable create envelope");
            StoreError::Transport(NETWORK_ERROR.to_string())
        })?;

        if resp.status == 201 && env.success {
            let created = env.data.and_then(|d| serde_json::from_value::<R>(d).ok());
            info!(resource = R::PATH, id = ?created.as_ref().map(|r| r.id()), "created");
            self.reset_form();
            self.fetch_all().await;
            Ok(created)
        } else {
            let fallback = format!("Failed to create {}. Please try again.", R::NOUN);
            Err(StoreError::Application(env.message_or(&fallback)))
        }
    }

    /// Send `patch` for record `id`; on success the selected record is reloaded.
    pub async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError> {
        let _guard = self.begin_mutation();
        let fallback = format!("Failed to update {}.", R::NOUN);
        let result = self.transport.send(ApiRequest::put(R::item_path(id), patch)).await;
        let resp = classify(result, &fallback, R::PATH)?;
        let env = resp.envelope::<Value>().map_err(|e| {
            warn!(resource = R::PATH, error = %e, "unusable update envelope");
            StoreError::Transport(fallback.clone())
        })?;

        if resp.status == 200 && env.success {
            info!(resource = R::PATH, id, "updated");
            self.fetch_one(id).await;
            Ok(())
        } else {
            Err(StoreError::Application(env.message_or(UNKNOWN_ERROR)))
        }
    }

    /// Remove `id` locally, delete it on the server and re-fetch the list.
    ///
    /// The local removal is rolled back if the delete fails. Once the delete
    /// succeeds the re-fetched list replaces local state as-is, so a lagging
    /// read path on the server can bring the record back.
    pub async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let _guard = self.begin_mutation();
        self.write(|s| s.stage_removal(id));

        let fallback = format!("Error: Failed to delete {}.", R::NOUN);
        let result = self.transport.send(ApiRequest::delete(R::item_path(id))).await;
        match classify(result, &fallback, R::PATH) {
            Ok(_) => {
                info!(resource = R::PATH, id, "deleted");
                self.fetch_all().await;
                self.write(|s| s.drop_staged(id));
                Ok(())
            }
            Err(err) => {
                self.write(|s| {
                    s.rollback(id);
                    s.error = Some(err.to_string());
                });
                Err(err)
            }
        }
    }
}
