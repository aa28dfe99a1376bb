//! Role-based access control.
//!
//! Roles come from the backend profile (`GET /me`) first and from the identity
//! provider's role claim second. A view is gated by an allow-list; the gate is
//! a pure function of the identity state, the profile state and that list, so
//! it re-evaluates whenever either input changes and never caches a decision.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// User role for authorization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::Viewer];

    /// Human readable label for dashboards.
    pub fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Viewer => "Viewer",
        }
    }

    pub fn can(self, permission: Permission) -> bool {
        permission.allow_list().contains(&self)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Manager => write!(f, "manager"),
            Role::Viewer => write!(f, "viewer"),
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "viewer" => Ok(Role::Viewer),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// Who can list and view catalogs.
pub const CAN_LIST_CATALOGS: &[Role] = &[Role::Admin, Role::Manager, Role::Viewer];
/// Who can upload catalogs.
pub const CAN_UPLOAD_CATALOGS: &[Role] = &[Role::Admin, Role::Manager];
/// Who can delete catalogs. The backend enforces this too.
pub const CAN_DELETE_CATALOGS: &[Role] = &[Role::Admin, Role::Manager];

/// Gated capabilities of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ListCatalogs,
    UploadCatalogs,
    DeleteCatalogs,
}

impl Permission {
    pub fn allow_list(self) -> &'static [Role] {
        match self {
            Permission::ListCatalogs => CAN_LIST_CATALOGS,
            Permission::UploadCatalogs => CAN_UPLOAD_CATALOGS,
            Permission::DeleteCatalogs => CAN_DELETE_CATALOGS,
        }
    }
}

/// Identity provider session as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityState {
    /// Session not loaded yet.
    Loading,
    /// Loaded, nobody signed in.
    SignedOut,
    /// Signed in; `role_claim` is the role embedded in the provider metadata, if any.
    SignedIn { role_claim: Option<Role> },
}

/// Backend profile fetch as seen by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileState {
    Loading,
    /// Fetch finished. `None` means no profile could be resolved.
    Resolved(Option<Role>),
}

/// Observable states of a role gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    Loading,
    Denied,
    Allowed,
}

impl AccessState {
    pub fn is_allowed(self) -> bool {
        matches!(self, AccessState::Allowed)
    }
}

/// Effective role: the backend profile role wins over the identity claim.
pub fn resolve_role(profile_role: Option<Role>, claim_role: Option<Role>) -> Option<Role> {
    profile_role.or(claim_role)
}

/// Decide whether a view guarded by `allow_list` may render.
pub fn resolve_access(
    identity: IdentityState,
    profile: ProfileState,
    allow_list: &[Role],
) -> AccessState {
    let (role_claim, profile_role) = match (identity, profile) {
        (IdentityState::Loading, _) | (_, ProfileState::Loading) => return AccessState::Loading,
        (IdentityState::SignedOut, _) => return AccessState::Denied,
        (IdentityState::SignedIn { role_claim }, ProfileState::Resolved(profile_role)) => {
            (role_claim, profile_role)
        }
    };

    match resolve_role(profile_role, role_claim) {
        Some(role) if allow_list.contains(&role) => AccessState::Allowed,
        _ => AccessState::Denied,
    }
}
