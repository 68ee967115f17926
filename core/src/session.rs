//! Explicit caller context.
//!
//! RULE: Nothing in the desk reads a "current user" from ambient state.
//! Every lifecycle and query call receives the Actor it acts for.

use crate::{config::UserRecord, types::DepartmentName};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Super-admin: sees every department, edits none.
    MainAdmin,
    /// Department staff: sees and edits one department.
    SubAdmin,
}

/// The authenticated caller of a desk operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Actor {
    pub user_id: String,
    pub name: String,
    pub role: Role,
    pub department: Option<DepartmentName>,
}

/// Which complaints an actor may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope<'a> {
    All,
    Department(&'a str),
    /// A sub-admin without a department reads nothing.
    Nothing,
}

impl Scope<'_> {
    pub fn admits(&self, department: &str) -> bool {
        match self {
            Scope::All => true,
            Scope::Department(dept) => *dept == department,
            Scope::Nothing => false,
        }
    }
}

/// Authorization to transition complaints belonging to one department.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EditCapability {
    pub can_edit_department: DepartmentName,
}

impl EditCapability {
    pub fn permits(&self, department: &str) -> bool {
        self.can_edit_department == department
    }
}

impl Actor {
    pub fn main_admin(user_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: Role::MainAdmin,
            department: None,
        }
    }

    pub fn sub_admin(
        user_id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<DepartmentName>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            role: Role::SubAdmin,
            department: Some(department.into()),
        }
    }

    /// Read scope. Keyed on role and department together so that a
    /// sub-admin missing its department never widens to everything.
    pub fn scope(&self) -> Scope<'_> {
        match (self.role, self.department.as_deref()) {
            (Role::MainAdmin, _) => Scope::All,
            (Role::SubAdmin, Some(dept)) => Scope::Department(dept),
            (Role::SubAdmin, None) => Scope::Nothing,
        }
    }

    /// Only department staff may move a complaint through its lifecycle.
    pub fn edit_capability(&self) -> Option<EditCapability> {
        match (self.role, &self.department) {
            (Role::SubAdmin, Some(dept)) => Some(EditCapability {
                can_edit_department: dept.clone(),
            }),
            _ => None,
        }
    }
}

impl From<&UserRecord> for Actor {
    fn from(user: &UserRecord) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
            department: user.department.clone(),
        }
    }
}

/// Opaque login capability. The desk only consumes the Actor it yields.
pub trait Authenticator {
    fn authenticate(&self, username: &str, secret: &str) -> Option<Actor>;
}

/// Demo authenticator over the configured user list.
/// Compares plain shared secrets; it is not a credential store.
pub struct UserDirectory {
    users: Vec<UserRecord>,
}

impl UserDirectory {
    pub fn new(users: Vec<UserRecord>) -> Self {
        Self { users }
    }
}

impl Authenticator for UserDirectory {
    fn authenticate(&self, username: &str, secret: &str) -> Option<Actor> {
        let user = self.users.iter().find(|u| u.username == username)?;
        if user.secret != secret {
            log::warn!("Rejected login for '{username}'");
            return None;
        }
        Some(Actor::from(user))
    }
}
