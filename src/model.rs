//! Records managed by the console and the static metadata each one needs:
//! endpoint, wording for messages, searchable fields, table columns and the
//! editable form schema.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::search::Searchable;
use crate::store::form::FieldSpec;

/// A CRUD-manageable entity type.
pub trait Resource: Clone + std::fmt::Debug + DeserializeOwned + Searchable + Send + Sync + 'static {
    /// Collection path segment, e.g. `departmentAdmins`.
    const PATH: &'static str;
    /// Lower-case singular, e.g. `department admin`.
    const NOUN: &'static str;
    /// Lower-case plural, e.g. `department admins`.
    const PLURAL: &'static str;
    /// Capitalized singular used in "Invalid {TITLE} ID.".
    const TITLE: &'static str;
    const SEARCH_FIELDS: &'static [&'static str];
    const COLUMNS: &'static [&'static str];
    const FORM: &'static [FieldSpec];

    fn id(&self) -> &str;

    /// Cells for [`Resource::COLUMNS`], same order.
    fn row(&self) -> Vec<String>;

    /// Label/value pairs for the details view.
    fn details(&self) -> Vec<(&'static str, String)>;

    fn collection_path() -> String {
        format!("/{}/", Self::PATH)
    }

    fn item_path(id: &str) -> String {
        format!("/{}/{}", Self::PATH, id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: String,
}

impl Searchable for Admin {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "_id" => Some(&self.id),
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "type" => Some(&self.role),
            _ => None,
        }
    }
}

const ADMIN_FORM: &[FieldSpec] = &[
    FieldSpec::text("name", "Name", "Name is required."),
    FieldSpec::email("email", "Email", "Email is required."),
    FieldSpec::secret("password", "Password", "Password is required."),
    FieldSpec::text("type", "Role", "Role selection is required."),
];

impl Resource for Admin {
    const PATH: &'static str = "admins";
    const NOUN: &'static str = "admin";
    const PLURAL: &'static str = "admins";
    const TITLE: &'static str = "Admin";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "type"];
    const COLUMNS: &'static [&'static str] = &["NAME", "EMAIL", "ROLE"];
    const FORM: &'static [FieldSpec] = ADMIN_FORM;

    fn id(&self) -> &str {
        &self.id
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.email.clone(), self.role.clone()]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Email", self.email.clone()),
            ("Role", self.role.clone()),
        ]
    }
}

/// Admin scoped to one department.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepartmentAdmin {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(rename = "type")]
    pub role: String,
}

impl Searchable for DepartmentAdmin {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "_id" => Some(&self.id),
            "name" => Some(&self.name),
            "email" => Some(&self.email),
            "type" => Some(&self.role),
            _ => None,
        }
    }
}

impl Resource for DepartmentAdmin {
    const PATH: &'static str = "departmentAdmins";
    const NOUN: &'static str = "department admin";
    const PLURAL: &'static str = "department admins";
    const TITLE: &'static str = "Department Admin";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "email", "type"];
    const COLUMNS: &'static [&'static str] = &["NAME", "EMAIL", "ROLE"];
    const FORM: &'static [FieldSpec] = ADMIN_FORM;

    fn id(&self) -> &str {
        &self.id
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.email.clone(), self.role.clone()]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Email", self.email.clone()),
            ("Role", self.role.clone()),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Department {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub code_id: String,
    pub time_in: String,
    pub time_out: String,
    pub overtime: String,
}

impl Searchable for Department {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "_id" => Some(&self.id),
            "name" => Some(&self.name),
            "codeId" => Some(&self.code_id),
            "timeIn" => Some(&self.time_in),
            "timeOut" => Some(&self.time_out),
            "overtime" => Some(&self.overtime),
            _ => None,
        }
    }
}

impl Resource for Department {
    const PATH: &'static str = "departments";
    const NOUN: &'static str = "department";
    const PLURAL: &'static str = "departments";
    const TITLE: &'static str = "Department";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "codeId"];
    const COLUMNS: &'static [&'static str] = &["NAME", "CODE", "TIME IN", "TIME OUT", "OVERTIME"];
    const FORM: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Department name", "Department name is required."),
        FieldSpec::text("codeId", "Department Code ID", "Code ID is required."),
        FieldSpec::text("timeIn", "Time In", "Time In is required."),
        FieldSpec::text("timeOut", "Time Out", "Time Out is required."),
        FieldSpec::text("overtime", "Over Time", "Overtime is required."),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.name.clone(),
            self.code_id.clone(),
            self.time_in.clone(),
            self.time_out.clone(),
            self.overtime.clone(),
        ]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Code ID", self.code_id.clone()),
            ("Time in", self.time_in.clone()),
            ("Time out", self.time_out.clone()),
            ("Overtime", self.overtime.clone()),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Role {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub code_id: String,
    pub department_designation: String,
}

impl Searchable for Role {
    fn field(&self, name: &str) -> Option<&str> {
        match name {
            "_id" => Some(&self.id),
            "name" => Some(&self.name),
            "codeId" => Some(&self.code_id),
            "departmentDesignation" => Some(&self.department_designation),
            _ => None,
        }
    }
}

impl Resource for Role {
    const PATH: &'static str = "roles";
    const NOUN: &'static str = "role";
    const PLURAL: &'static str = "roles";
    const TITLE: &'static str = "Role";
    const SEARCH_FIELDS: &'static [&'static str] = &["name", "codeId", "departmentDesignation"];
    const COLUMNS: &'static [&'static str] = &["NAME", "CODE", "DEPARTMENT"];
    const FORM: &'static [FieldSpec] = &[
        FieldSpec::text("name", "Role name", "Role name is required."),
        FieldSpec::text("codeId", "Role Code ID", "Code ID is required."),
        FieldSpec::text(
            "departmentDesignation",
            "Department Designation",
            "Department designation is required.",
        ),
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.code_id.clone(), self.department_designation.clone()]
    }

    fn details(&self) -> Vec<(&'static str, String)> {
        vec![
            ("ID", self.id.clone()),
            ("Name", self.name.clone()),
            ("Code ID", self.code_id.clone()),
            ("Department", self.department_designation.clone()),
        ]
    }
}
