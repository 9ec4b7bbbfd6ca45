// ── User profile domain types ──
//
// The profile row in the `users` relation, keyed to the auth provider's
// user by `auth_id`. Role gates which mutations the backend permits;
// enforcement happens server-side, the client only carries the value.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    SafetyOfficer,
    FacilityManager,
    Approver,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub auth_id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub profile_picture_url: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn role_wire_format() {
        assert_eq!(
            serde_json::to_string(&UserRole::SafetyOfficer).unwrap(),
            "\"safety_officer\""
        );
        let parsed: UserRole = "facility_manager".parse().unwrap();
        assert_eq!(parsed, UserRole::FacilityManager);
    }
}
