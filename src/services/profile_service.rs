// ==================== ROLE PROFILES ====================
// Builds and writes the role-specific profile documents that live in
// lockstep with their owning user. All writes here run on the caller's
// session; the cascade service owns the transaction.

use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime, Document};
use mongodb::ClientSession;

use crate::database::MongoDB;
use crate::models::{
    Administrator, Doctor, InventoryManager, LabStaff, LabSupervisor, Patient, Pharmacist, Role,
    Technician, User,
};
use crate::services::role_registry;
use crate::utils::error::AppError;

/// Role profile document, tagged by role so every write site dispatches
/// exhaustively.
#[derive(Debug, Clone)]
pub enum RoleProfile {
    Patient(Patient),
    Doctor(Doctor),
    Pharmacist(Pharmacist),
    Administrator(Administrator),
    InventoryManager(InventoryManager),
    LabSupervisor(LabSupervisor),
    LabStaff(LabStaff),
    Technician(Technician),
}

impl RoleProfile {
    pub fn role(&self) -> Role {
        match self {
            RoleProfile::Patient(_) => Role::Patient,
            RoleProfile::Doctor(_) => Role::Doctor,
            RoleProfile::Pharmacist(_) => Role::Pharmacist,
            RoleProfile::Administrator(_) => Role::Administrator,
            RoleProfile::InventoryManager(_) => Role::InventoryManager,
            RoleProfile::LabSupervisor(_) => Role::LabSupervisor,
            RoleProfile::LabStaff(_) => Role::LabStaff,
            RoleProfile::Technician(_) => Role::Technician,
        }
    }

    pub fn display_id(&self) -> &str {
        match self {
            RoleProfile::Patient(p) => &p.patient_id,
            RoleProfile::Doctor(d) => &d.doctor_id,
            RoleProfile::Pharmacist(p) => &p.pharmacist_id,
            RoleProfile::Administrator(a) => &a.admin_id,
            RoleProfile::InventoryManager(m) => &m.manager_id,
            RoleProfile::LabSupervisor(s) => &s.supervisor_id,
            RoleProfile::LabStaff(s) => &s.staff_id,
            RoleProfile::Technician(t) => &t.technician_id,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        let result = match self {
            RoleProfile::Patient(p) => serde_json::to_value(p),
            RoleProfile::Doctor(d) => serde_json::to_value(d),
            RoleProfile::Pharmacist(p) => serde_json::to_value(p),
            RoleProfile::Administrator(a) => serde_json::to_value(a),
            RoleProfile::InventoryManager(m) => serde_json::to_value(m),
            RoleProfile::LabSupervisor(s) => serde_json::to_value(s),
            RoleProfile::LabStaff(s) => serde_json::to_value(s),
            RoleProfile::Technician(t) => serde_json::to_value(t),
        };
        result.unwrap_or(serde_json::Value::Null)
    }
}

/// Builds the initial profile for a freshly created user. Pure: no database
/// access, no side effects, no validation beyond what the document types
/// enforce.
pub fn build_defaults(user: &User, generated_id: &str) -> Result<RoleProfile, AppError> {
    let role = user
        .role
        .ok_or_else(|| AppError::InvalidRequest("user has no role".to_string()))?;
    let user_ref = user
        ._id
        .ok_or_else(|| AppError::InvalidRequest("user has no _id".to_string()))?;

    let now = BsonDateTime::now();
    let id = generated_id.to_string();

    let profile = match role {
        Role::Patient => RoleProfile::Patient(Patient {
            _id: None,
            patient_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            address: user.address.clone(),
            age: user.age,
            gender: user.gender.clone(),
            dob: user.dob.clone(),
            emergency_contact: None,
            medical_history: Vec::new(),
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
        Role::Doctor => RoleProfile::Doctor(Doctor {
            _id: None,
            doctor_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            specialty: "General Medicine".to_string(),
            qualifications: Vec::new(),
            is_accepting_new_patients: true,
            consultation_fee: None,
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
        Role::Pharmacist => RoleProfile::Pharmacist(Pharmacist {
            _id: None,
            pharmacist_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            license_number: None,
            shift: "morning".to_string(),
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
        Role::Administrator => RoleProfile::Administrator(Administrator {
            _id: None,
            admin_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            department: "Administration".to_string(),
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
        Role::InventoryManager => RoleProfile::InventoryManager(InventoryManager {
            _id: None,
            manager_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            department: "Inventory".to_string(),
            managed_categories: Vec::new(),
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
        Role::LabSupervisor => RoleProfile::LabSupervisor(LabSupervisor {
            _id: None,
            supervisor_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            department: "Laboratory".to_string(),
            certifications: Vec::new(),
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
        Role::LabStaff => RoleProfile::LabStaff(LabStaff {
            _id: None,
            staff_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            department: "Laboratory".to_string(),
            shift: "morning".to_string(),
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
        Role::Technician => RoleProfile::Technician(Technician {
            _id: None,
            technician_id: id,
            user: user_ref,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            specialization: None,
            shift: "morning".to_string(),
            is_active: true,
            join_date: now,
            created_at: Some(now),
            updated_at: Some(now),
        }),
    };

    Ok(profile)
}

/// Inserts the profile into its role collection on the caller's session.
pub async fn insert_profile(
    db: &MongoDB,
    session: &mut ClientSession,
    profile: &RoleProfile,
) -> Result<(), AppError> {
    let collection_name = role_registry::descriptor(profile.role()).collection;

    match profile {
        RoleProfile::Patient(p) => {
            db.collection::<Patient>(collection_name)
                .insert_one(p)
                .session(&mut *session)
                .await
        }
        RoleProfile::Doctor(d) => {
            db.collection::<Doctor>(collection_name)
                .insert_one(d)
                .session(&mut *session)
                .await
        }
        RoleProfile::Pharmacist(p) => {
            db.collection::<Pharmacist>(collection_name)
                .insert_one(p)
                .session(&mut *session)
                .await
        }
        RoleProfile::Administrator(a) => {
            db.collection::<Administrator>(collection_name)
                .insert_one(a)
                .session(&mut *session)
                .await
        }
        RoleProfile::InventoryManager(m) => {
            db.collection::<InventoryManager>(collection_name)
                .insert_one(m)
                .session(&mut *session)
                .await
        }
        RoleProfile::LabSupervisor(s) => {
            db.collection::<LabSupervisor>(collection_name)
                .insert_one(s)
                .session(&mut *session)
                .await
        }
        RoleProfile::LabStaff(s) => {
            db.collection::<LabStaff>(collection_name)
                .insert_one(s)
                .session(&mut *session)
                .await
        }
        RoleProfile::Technician(t) => {
            db.collection::<Technician>(collection_name)
                .insert_one(t)
                .session(&mut *session)
                .await
        }
    }
    .map_err(AppError::from_mongo)?;

    Ok(())
}

/// Propagates the narrow shared field set (name, email, phone) from the user
/// onto its profile, matched by the `user` back-reference. Role-specific
/// fields are never touched by this path.
pub async fn update_shared_fields(
    db: &MongoDB,
    session: &mut ClientSession,
    role: Role,
    user_ref: ObjectId,
    user: &User,
) -> Result<(), AppError> {
    let desc = role_registry::descriptor(role);
    let collection = db.collection::<Document>(desc.collection);

    let mut set = doc! {
        "name": &user.name,
        "email": &user.email,
        "updated_at": BsonDateTime::now(),
    };
    if let Some(phone) = &user.phone {
        set.insert("phone", phone);
    }

    collection
        .update_one(doc! { "user": user_ref }, doc! { "$set": set })
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?;

    Ok(())
}

/// Deletes the profile matched by the `user` back-reference. Returns how
/// many documents went away (0 when the user never had one).
pub async fn delete_profile(
    db: &MongoDB,
    session: &mut ClientSession,
    role: Role,
    user_ref: ObjectId,
) -> Result<u64, AppError> {
    let desc = role_registry::descriptor(role);
    let collection = db.collection::<Document>(desc.collection);

    let result = collection
        .delete_one(doc! { "user": user_ref })
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?;

    Ok(result.deleted_count)
}

/// Plain (non-transactional) profile read used for response shaping.
pub async fn find_profile(
    db: &MongoDB,
    role: Role,
    user_ref: ObjectId,
) -> Result<Option<serde_json::Value>, AppError> {
    let desc = role_registry::descriptor(role);
    let collection = db.collection::<Document>(desc.collection);

    let profile = collection
        .find_one(doc! { "user": user_ref })
        .await
        .map_err(AppError::from_mongo)?;

    Ok(profile.map(|document| serde_json::to_value(&document).unwrap_or(serde_json::Value::Null)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::role_registry::{descriptor, pattern};

    fn sample_user(role: Role) -> User {
        User {
            _id: Some(ObjectId::new()),
            user_id: "USR-0001".to_string(),
            name: "Dr. Test".to_string(),
            email: "t@x.com".to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
            age: Some(40),
            gender: None,
            dob: None,
            password: None,
            role: Some(role),
            is_active: true,
            last_login: None,
            lock_until: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_build_defaults_copies_shared_fields() {
        for role in Role::ALL {
            let user = sample_user(role);
            let id = role_registry::format_identifier(descriptor(role), 1);
            let profile = build_defaults(&user, &id).unwrap();

            assert_eq!(profile.role(), role);
            assert_eq!(profile.display_id(), id);

            let json = profile.to_json();
            assert_eq!(json["name"], "Dr. Test");
            assert_eq!(json["email"], "t@x.com");
            assert_eq!(json["is_active"], true);
        }
    }

    #[test]
    fn test_build_defaults_doctor_presets() {
        let user = sample_user(Role::Doctor);
        let profile = build_defaults(&user, "DOC-0001").unwrap();
        match profile {
            RoleProfile::Doctor(doctor) => {
                assert_eq!(doctor.specialty, "General Medicine");
                assert!(doctor.is_accepting_new_patients);
                assert_eq!(doctor.user, user._id.unwrap());
            }
            other => panic!("expected doctor profile, got {:?}", other.role()),
        }
    }

    #[test]
    fn test_build_defaults_lab_staff_shift() {
        let user = sample_user(Role::LabStaff);
        match build_defaults(&user, "LSTF-0001").unwrap() {
            RoleProfile::LabStaff(staff) => {
                assert_eq!(staff.shift, "morning");
                assert_eq!(staff.department, "Laboratory");
            }
            other => panic!("expected lab staff profile, got {:?}", other.role()),
        }
    }

    #[test]
    fn test_build_defaults_requires_role_and_id() {
        let mut user = sample_user(Role::Patient);
        user.role = None;
        assert!(build_defaults(&user, "PAT-0001").is_err());

        let mut user = sample_user(Role::Patient);
        user._id = None;
        assert!(build_defaults(&user, "PAT-0001").is_err());
    }

    #[test]
    fn test_default_identifiers_match_role_patterns() {
        for role in Role::ALL {
            let user = sample_user(role);
            let id = role_registry::format_identifier(descriptor(role), 12);
            let profile = build_defaults(&user, &id).unwrap();
            assert!(pattern(role).is_match(profile.display_id()));
        }
    }
}
