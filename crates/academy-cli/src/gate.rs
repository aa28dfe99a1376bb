//! Role gate for CLI commands.
//!
//! A command runs only once the session is resolved and the effective role is
//! in the command's allow-list. The backend profile role wins over the role
//! claim in the token; with neither, access is denied.

use academy_api_client::{CatalogQueries, IdentityClaims};
use academy_core::models::UserProfile;
use academy_core::{
    resolve_access, resolve_role, AccessState, IdentityState, Permission, ProfileState, Role,
};

pub const ACCESS_DENIED: &str = "Access denied. Your role does not allow this action.";
pub const SESSION_LOADING: &str = "Session is still loading. Try again.";

/// Resolved identity and profile for the current invocation.
#[derive(Debug, Clone)]
pub struct Session {
    identity: IdentityState,
    profile: ProfileState,
    user: Option<UserProfile>,
}

impl Session {
    pub fn new(identity: IdentityState, user: Option<UserProfile>) -> Self {
        Self {
            identity,
            profile: ProfileState::Resolved(user.as_ref().map(|u| u.role)),
            user,
        }
    }

    /// Resolve the session from the client's token and the cached profile.
    /// Signed-out sessions skip the profile request.
    pub async fn resolve(queries: &CatalogQueries) -> Self {
        let token = queries.client().current_token().await;
        let identity = IdentityClaims::identity_state(token.as_deref());
        let user = match identity {
            IdentityState::SignedIn { .. } => queries.profile().await,
            IdentityState::SignedOut | IdentityState::Loading => None,
        };
        tracing::debug!(identity = ?identity, has_profile = user.is_some(), "Session resolved");
        Self::new(identity, user)
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn role(&self) -> Option<Role> {
        let claim = match self.identity {
            IdentityState::SignedIn { role_claim } => role_claim,
            _ => None,
        };
        resolve_role(self.user.as_ref().map(|u| u.role), claim)
    }

    pub fn access(&self, permission: Permission) -> AccessState {
        resolve_access(self.identity, self.profile, permission.allow_list())
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.access(permission).is_allowed()
    }

    /// Whether the backend profile role alone grants `permission`. Used for
    /// per-item affordances, which ignore the token's role claim.
    pub fn profile_allows(&self, permission: Permission) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.role.can(permission))
    }

    /// `Ok` when allowed, otherwise the message to show instead of the view.
    pub fn require(&self, permission: Permission) -> anyhow::Result<()> {
        match self.access(permission) {
            AccessState::Allowed => Ok(()),
            AccessState::Loading => anyhow::bail!(SESSION_LOADING),
            AccessState::Denied => {
                tracing::debug!(permission = ?permission, role = ?self.role(), "Access denied");
                anyhow::bail!(ACCESS_DENIED)
            }
        }
    }
}
