use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::access::Role;

/// Current principal's profile as resolved by the backend (`GET /me`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub role: Role,
    pub tenant_id: Uuid,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
}

impl UserProfile {
    /// Tenant display name, falling back to the tenant id.
    pub fn tenant_label(&self) -> String {
        self.tenant_name
            .clone()
            .unwrap_or_else(|| self.tenant_id.to_string())
    }
}
