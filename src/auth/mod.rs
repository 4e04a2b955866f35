//! Capability checks for protected cohorts.
//!
//! The option loader asks a [`CapabilityPolicy`] before fetching data that only
//! some advisors may see. [`UserPrivileges`] derives answers from the signed-in
//! user's department memberships.

use serde::{Deserialize, Serialize};

use crate::models::CurrentUser;

/// Department code of the athletic study center.
pub const ASC_DEPT_CODE: &str = "UWASC";
/// Department code of the college of engineering.
pub const COE_DEPT_CODE: &str = "COENG";

/// A protected cohort a user may or may not view.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Athletic study center students and team groups
    Asc,
    /// College of engineering students and advisors
    Coe,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Asc => "ASC",
            Capability::Coe => "COE",
        }
    }

    /// Department whose members hold this capability.
    pub fn dept_code(&self) -> &'static str {
        match self {
            Capability::Asc => ASC_DEPT_CODE,
            Capability::Coe => COE_DEPT_CODE,
        }
    }
}

/// Answers whether the current user may view a protected cohort.
pub trait CapabilityPolicy: Send + Sync {
    fn can_view(&self, capability: Capability) -> bool;
}

impl<F> CapabilityPolicy for F
where
    F: Fn(Capability) -> bool + Send + Sync,
{
    fn can_view(&self, capability: Capability) -> bool {
        self(capability)
    }
}

/// Privileges of the signed-in user.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserPrivileges {
    pub is_admin: bool,
    pub dept_codes: Vec<String>,
}

impl UserPrivileges {
    pub fn new(is_admin: bool, dept_codes: Vec<String>) -> Self {
        Self {
            is_admin,
            dept_codes,
        }
    }

    pub fn admin() -> Self {
        Self::new(true, Vec::new())
    }

    pub fn from_current_user(user: &CurrentUser) -> Self {
        Self::new(
            user.is_admin,
            user.departments.iter().map(|d| d.code.clone()).collect(),
        )
    }

    pub fn is_member_of(&self, dept_code: &str) -> bool {
        self.dept_codes.iter().any(|code| code == dept_code)
    }
}

impl CapabilityPolicy for UserPrivileges {
    fn can_view(&self, capability: Capability) -> bool {
        self.is_admin || self.is_member_of(capability.dept_code())
    }
}
