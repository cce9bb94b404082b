use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Staff and patient roles supported by the clinic.
///
/// Every variant has a registered profile collection; a user created without
/// a role simply has no profile document.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, utoipa::ToSchema)]
pub enum Role {
    Patient,
    Doctor,
    Pharmacist,
    Administrator,
    InventoryManager,
    LabSupervisor,
    LabStaff,
    Technician,
}

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Patient,
        Role::Doctor,
        Role::Pharmacist,
        Role::Administrator,
        Role::InventoryManager,
        Role::LabSupervisor,
        Role::LabStaff,
        Role::Technician,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Pharmacist => "Pharmacist",
            Role::Administrator => "Administrator",
            Role::InventoryManager => "InventoryManager",
            Role::LabSupervisor => "LabSupervisor",
            Role::LabStaff => "LabStaff",
            Role::Technician => "Technician",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Identity record. Lifecycle writes go through the cascade service only;
// everything else reads it.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,
    pub user_id: String,  // display identifier, USR-####
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dob: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,  // bcrypt hash; never exposed through the API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default = "default_is_active")]
    pub is_active: bool,
    pub last_login: Option<BsonDateTime>,
    pub lock_until: Option<BsonDateTime>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

fn default_is_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_serde() {
        for role in Role::ALL {
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
            let back: Role = serde_json::from_str(&json).unwrap();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_user_without_role_deserializes() {
        let user: User = serde_json::from_str(
            r#"{"user_id":"USR-0001","name":"Jane","email":"jane@clinic.local",
                "last_login":null,"lock_until":null,"created_at":null,"updated_at":null}"#,
        )
        .unwrap();
        assert!(user.role.is_none());
        assert!(user.is_active);
    }
}
