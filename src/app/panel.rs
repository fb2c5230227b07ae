//! Type-erased view of a [`ResourceStore`] so the UI can drive every tab
//! through the same code.

use serde_json::Value;

use crate::context::AppContext;
use crate::error::StoreError;
use crate::model::Resource;
use crate::search::ListFilter;
use crate::store::ResourceStore;
use crate::store::form::{FieldErrors, FieldSpec, FormState, Validation};

use super::ActiveTab;

/// One table row: record id plus display cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    pub id: String,
    pub cells: Vec<String>,
}

#[async_trait::async_trait]
pub trait Panel: Send + Sync {
    fn noun(&self) -> &'static str;
    fn columns(&self) -> &'static [&'static str];
    fn search_fields(&self) -> &'static [&'static str];
    fn form_schema(&self) -> &'static [FieldSpec];

    /// Rows of the records that pass `filter`, in collection order.
    fn filtered_rows(&self, filter: &ListFilter) -> Vec<Row>;
    fn selected_details(&self) -> Option<Vec<(&'static str, String)>>;
    fn loading(&self) -> bool;
    fn error(&self) -> Option<String>;
    fn clear_error(&self);

    fn form(&self) -> FormState;
    fn validation_errors(&self) -> FieldErrors;
    fn set_form_value(&self, index: usize, value: String);
    fn reset_form(&self);
    fn validate_form(&self) -> Validation;
    /// Prefill the form from record `id`; `false` if it is not loaded.
    fn prefill_form(&self, id: &str) -> bool;
    fn form_patch(&self) -> Value;

    async fn refresh(&self);
    async fn open(&self, id: &str);
    async fn create(&self) -> Result<(), StoreError>;
    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait::async_trait]
impl<R: Resource> Panel for ResourceStore<R> {
    fn noun(&self) -> &'static str {
        R::NOUN
    }

    fn columns(&self) -> &'static [&'static str] {
        R::COLUMNS
    }

    fn search_fields(&self) -> &'static [&'static str] {
        R::SEARCH_FIELDS
    }

    fn form_schema(&self) -> &'static [FieldSpec] {
        R::FORM
    }

    fn filtered_rows(&self, filter: &ListFilter) -> Vec<Row> {
        self.read(|s| {
            filter
                .apply(s.items())
                .into_iter()
                .map(|r| Row { id: r.id().to_string(), cells: r.row() })
                .collect()
        })
    }

    fn selected_details(&self) -> Option<Vec<(&'static str, String)>> {
        self.read(|s| s.selected().map(R::details))
    }

    fn loading(&self) -> bool {
        ResourceStore::loading(self)
    }

    fn error(&self) -> Option<String> {
        ResourceStore::error(self)
    }

    fn clear_error(&self) {
        ResourceStore::clear_error(self)
    }

    fn form(&self) -> FormState {
        ResourceStore::form(self)
    }

    fn validation_errors(&self) -> FieldErrors {
        ResourceStore::validation_errors(self)
    }

    fn set_form_value(&self, index: usize, value: String) {
        self.set_field_at(index, value);
    }

    fn reset_form(&self) {
        ResourceStore::reset_form(self);
        self.clear_validation_errors();
    }

    fn validate_form(&self) -> Validation {
        ResourceStore::validate_form(self)
    }

    fn prefill_form(&self, id: &str) -> bool {
        match self.find(id) {
            Some(record) => {
                self.clear_validation_errors();
                self.load_form_from(&record);
                true
            }
            None => false,
        }
    }

    fn form_patch(&self) -> Value {
        ResourceStore::form_patch(self)
    }

    async fn refresh(&self) {
        self.fetch_all().await;
    }

    async fn open(&self, id: &str) {
        self.fetch_one(id).await;
    }

    async fn create(&self) -> Result<(), StoreError> {
        ResourceStore::create(self).await.map(|_| ())
    }

    async fn update(&self, id: &str, patch: Value) -> Result<(), StoreError> {
        ResourceStore::update(self, id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        ResourceStore::delete(self, id).await
    }
}

/// The store behind `tab`.
pub fn panel_for(ctx: &AppContext, tab: ActiveTab) -> &dyn Panel {
    match tab {
        ActiveTab::Admins => &ctx.admins,
        ActiveTab::DepartmentAdmins => &ctx.department_admins,
        ActiveTab::Departments => &ctx.departments,
        ActiveTab::Roles => &ctx.roles,
    }
}
