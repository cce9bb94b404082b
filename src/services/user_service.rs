// ==================== USER LIFECYCLE CASCADE ====================
// Create/update/delete of a user together with its role profile, each as a
// single multi-document MongoDB transaction. This module is the only writer
// of the users collection.

use bcrypt::{hash, DEFAULT_COST};
use futures::stream::StreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::options::ReturnDocument;
use mongodb::ClientSession;
use serde::{Deserialize, Serialize};

use crate::database::MongoDB;
use crate::models::{Role, User};
use crate::services::{counter_service, identifier_service, profile_service};
use crate::services::profile_service::RoleProfile;
use crate::utils::error::AppError;

pub const USERS_COLLECTION: &str = "users";

// ==================== REQUEST/RESPONSE MODELS ====================

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub dob: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub is_active: Option<bool>,
}

/// User fields exposed through the API. The stored password hash never
/// leaves the service layer.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub user_id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub is_active: bool,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            user_id: user.user_id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserWithRoleResponse {
    pub success: bool,
    pub user: UserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_data: Option<serde_json::Value>,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ListUsersResponse {
    pub success: bool,
    pub users: Vec<UserInfo>,
    pub count: usize,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

// ==================== CASCADE OPERATIONS ====================

/// Creates a user and, when the role is present, its profile document —
/// both or neither.
pub async fn create_user_with_role(
    db: &MongoDB,
    request: CreateUserRequest,
) -> Result<UserWithRoleResponse, AppError> {
    validate_create(&request)?;
    log::info!("👤 Creating user {} (role: {:?})", request.email, request.role);

    let mut session = db.client().start_session().await.map_err(AppError::from_mongo)?;
    session
        .start_transaction()
        .await
        .map_err(AppError::from_mongo)?;

    match create_in_transaction(db, &mut session, request).await {
        Ok((user, profile)) => {
            session
                .commit_transaction()
                .await
                .map_err(|e| operation_failure("create", AppError::from_mongo(e)))?;

            log::info!(
                "✅ Created user {} ({}){}",
                user.user_id,
                user.email,
                profile
                    .as_ref()
                    .map(|p| format!(" with profile {}", p.display_id()))
                    .unwrap_or_default()
            );

            Ok(UserWithRoleResponse {
                success: true,
                user: UserInfo::from(&user),
                role_data: profile.as_ref().map(RoleProfile::to_json),
                message: "User created successfully".to_string(),
            })
        }
        Err(e) => {
            session.abort_transaction().await.ok();
            log::warn!("❌ Create user aborted: {}", e);
            Err(operation_failure("create", e))
        }
    }
}

/// Applies the update to the user and propagates name/email/phone onto its
/// profile in the same transaction.
pub async fn update_user_with_role(
    db: &MongoDB,
    user_id: &str,
    request: UpdateUserRequest,
) -> Result<UserWithRoleResponse, AppError> {
    log::info!("🔧 Updating user {}", user_id);

    let mut session = db.client().start_session().await.map_err(AppError::from_mongo)?;
    session
        .start_transaction()
        .await
        .map_err(AppError::from_mongo)?;

    match update_in_transaction(db, &mut session, user_id, request).await {
        Ok(user) => {
            session
                .commit_transaction()
                .await
                .map_err(|e| operation_failure("update", AppError::from_mongo(e)))?;

            let role_data = match (user.role, user._id) {
                (Some(role), Some(user_ref)) => {
                    profile_service::find_profile(db, role, user_ref).await?
                }
                _ => None,
            };

            log::info!("✅ Updated user {}", user.user_id);
            Ok(UserWithRoleResponse {
                success: true,
                user: UserInfo::from(&user),
                role_data,
                message: "User updated successfully".to_string(),
            })
        }
        Err(e) => {
            session.abort_transaction().await.ok();
            log::warn!("❌ Update user {} aborted: {}", user_id, e);
            Err(operation_failure("update", e))
        }
    }
}

/// Deletes the user and its profile — both or neither, profile first so an
/// abort can never leave an orphan.
pub async fn delete_user_with_role(
    db: &MongoDB,
    user_id: &str,
) -> Result<DeleteUserResponse, AppError> {
    log::info!("🗑️  Deleting user {}", user_id);

    let mut session = db.client().start_session().await.map_err(AppError::from_mongo)?;
    session
        .start_transaction()
        .await
        .map_err(AppError::from_mongo)?;

    match delete_in_transaction(db, &mut session, user_id).await {
        Ok(()) => {
            session
                .commit_transaction()
                .await
                .map_err(|e| operation_failure("delete", AppError::from_mongo(e)))?;

            log::info!("✅ Deleted user {}", user_id);
            Ok(DeleteUserResponse {
                success: true,
                message: "User deleted successfully".to_string(),
            })
        }
        Err(e) => {
            session.abort_transaction().await.ok();
            log::warn!("❌ Delete user {} aborted: {}", user_id, e);
            Err(operation_failure("delete", e))
        }
    }
}

// ==================== READ PATHS ====================

/// Fetches one user and its profile by display id.
pub async fn get_user_with_role(
    db: &MongoDB,
    user_id: &str,
) -> Result<UserWithRoleResponse, AppError> {
    let users = db.collection::<User>(USERS_COLLECTION);

    let user = users
        .find_one(doc! { "user_id": user_id })
        .await
        .map_err(AppError::from_mongo)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    let role_data = match (user.role, user._id) {
        (Some(role), Some(user_ref)) => profile_service::find_profile(db, role, user_ref).await?,
        _ => None,
    };

    Ok(UserWithRoleResponse {
        success: true,
        user: UserInfo::from(&user),
        role_data,
        message: "User fetched successfully".to_string(),
    })
}

/// Lists all users, newest first, without password hashes.
pub async fn list_users(db: &MongoDB) -> Result<ListUsersResponse, AppError> {
    let users = db.collection::<User>(USERS_COLLECTION);

    let mut cursor = users
        .find(doc! {})
        .sort(doc! { "created_at": -1 })
        .await
        .map_err(AppError::from_mongo)?;

    let mut result = Vec::new();
    while let Some(user) = cursor.next().await {
        let user = user.map_err(AppError::from_mongo)?;
        result.push(UserInfo::from(&user));
    }

    let count = result.len();
    Ok(ListUsersResponse {
        success: true,
        users: result,
        count,
    })
}

// ==================== TRANSACTION BODIES ====================

async fn create_in_transaction(
    db: &MongoDB,
    session: &mut ClientSession,
    request: CreateUserRequest,
) -> Result<(User, Option<RoleProfile>), AppError> {
    let users = db.collection::<User>(USERS_COLLECTION);

    // Mint the display id from the durable sequence.
    let seq =
        counter_service::increment_and_get(db, session, counter_service::USER_ID_SEQUENCE).await?;
    let mut user_id = format_user_id(seq);

    // Defensive re-check. The sequence makes a collision impossible in
    // normal operation; a manually inserted user could still occupy the slot.
    let taken = users
        .find_one(doc! { "user_id": &user_id })
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?;
    if taken.is_some() {
        log::warn!("⚠️  user_id {} already taken — re-minting", user_id);
        let seq =
            counter_service::increment_and_get(db, session, counter_service::USER_ID_SEQUENCE)
                .await?;
        user_id = format_user_id(seq);
    }

    let password = match &request.password {
        Some(plain) => Some(
            hash(plain, DEFAULT_COST)
                .map_err(|e| AppError::TransactionFailed(format!("Failed to hash password: {}", e)))?,
        ),
        None => None,
    };

    let now = BsonDateTime::now();
    let user = User {
        _id: Some(ObjectId::new()),
        user_id,
        name: request.name,
        email: request.email,
        phone: request.phone,
        address: request.address,
        age: request.age,
        gender: request.gender,
        dob: request.dob,
        password,
        role: request.role,
        is_active: true,
        last_login: None,
        lock_until: None,
        created_at: Some(now),
        updated_at: Some(now),
    };

    // Duplicate email hits the unique index here and surfaces as
    // AppError::DuplicateKey.
    users
        .insert_one(&user)
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?;

    let profile = match user.role {
        Some(role) => {
            let display_id = identifier_service::generate_id(db, session, role).await?;
            let profile = profile_service::build_defaults(&user, &display_id)?;
            profile_service::insert_profile(db, session, &profile).await?;
            Some(profile)
        }
        None => None,
    };

    Ok((user, profile))
}

async fn update_in_transaction(
    db: &MongoDB,
    session: &mut ClientSession,
    user_id: &str,
    request: UpdateUserRequest,
) -> Result<User, AppError> {
    let users = db.collection::<User>(USERS_COLLECTION);

    let mut set = doc! { "updated_at": BsonDateTime::now() };
    if let Some(name) = &request.name {
        set.insert("name", name);
    }
    if let Some(email) = &request.email {
        set.insert("email", email);
    }
    if let Some(phone) = &request.phone {
        set.insert("phone", phone);
    }
    if let Some(address) = &request.address {
        set.insert("address", address);
    }
    if let Some(age) = request.age {
        set.insert("age", age);
    }
    if let Some(gender) = &request.gender {
        set.insert("gender", gender);
    }
    if let Some(is_active) = request.is_active {
        set.insert("is_active", is_active);
    }

    let user = users
        .find_one_and_update(doc! { "user_id": user_id }, doc! { "$set": set })
        .return_document(ReturnDocument::After)
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    // Shared fields travel to the profile; role-specific fields never do.
    if let (Some(role), Some(user_ref)) = (user.role, user._id) {
        profile_service::update_shared_fields(db, session, role, user_ref, &user).await?;
    }

    Ok(user)
}

async fn delete_in_transaction(
    db: &MongoDB,
    session: &mut ClientSession,
    user_id: &str,
) -> Result<(), AppError> {
    let users = db.collection::<User>(USERS_COLLECTION);

    let user = users
        .find_one(doc! { "user_id": user_id })
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))?;

    if let (Some(role), Some(user_ref)) = (user.role, user._id) {
        let deleted = profile_service::delete_profile(db, session, role, user_ref).await?;
        if deleted == 0 {
            log::warn!("⚠️  User {} had role {} but no profile document", user_id, role);
        }
    }

    users
        .delete_one(doc! { "user_id": user_id })
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?;

    Ok(())
}

// ==================== HELPERS ====================

pub fn format_user_id(seq: i64) -> String {
    format!("USR-{:04}", seq)
}

fn validate_create(request: &CreateUserRequest) -> Result<(), AppError> {
    if request.name.trim().is_empty() {
        return Err(AppError::InvalidRequest("Name is required".to_string()));
    }
    if request.email.trim().is_empty() || !request.email.contains('@') {
        return Err(AppError::InvalidRequest("A valid email is required".to_string()));
    }
    Ok(())
}

/// Wraps internal failures with an operation-specific message. Not-found,
/// duplicate-key and validation errors keep their kind so the HTTP layer can
/// map them to distinct status codes.
fn operation_failure(operation: &str, error: AppError) -> AppError {
    match error {
        AppError::NotFound(_) | AppError::DuplicateKey(_) | AppError::InvalidRequest(_) => error,
        other => AppError::TransactionFailed(format!(
            "Failed to {} user with role: {}",
            operation, other
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_user_id() {
        assert_eq!(format_user_id(1), "USR-0001");
        assert_eq!(format_user_id(123), "USR-0123");
        assert_eq!(format_user_id(10000), "USR-10000"); // width grows past 4 digits
    }

    #[test]
    fn test_validate_create_rejects_bad_input() {
        let request = CreateUserRequest {
            name: "  ".to_string(),
            email: "t@x.com".to_string(),
            phone: None,
            address: None,
            age: None,
            gender: None,
            dob: None,
            role: None,
            password: None,
        };
        assert!(matches!(
            validate_create(&request),
            Err(AppError::InvalidRequest(_))
        ));

        let request = CreateUserRequest {
            name: "Jane".to_string(),
            email: "not-an-email".to_string(),
            phone: None,
            address: None,
            age: None,
            gender: None,
            dob: None,
            role: None,
            password: None,
        };
        assert!(matches!(
            validate_create(&request),
            Err(AppError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_operation_failure_preserves_distinct_kinds() {
        let not_found = operation_failure("update", AppError::NotFound("User USR-0009".into()));
        assert!(matches!(not_found, AppError::NotFound(_)));

        let duplicate = operation_failure("create", AppError::DuplicateKey("email".into()));
        assert!(matches!(duplicate, AppError::DuplicateKey(_)));

        let generic = operation_failure("create", AppError::DatabaseError("boom".into()));
        match generic {
            AppError::TransactionFailed(msg) => {
                assert!(msg.starts_with("Failed to create user with role:"), "{}", msg);
            }
            other => panic!("expected TransactionFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_user_info_hides_password() {
        let user = User {
            _id: Some(ObjectId::new()),
            user_id: "USR-0001".to_string(),
            name: "Jane".to_string(),
            email: "jane@clinic.local".to_string(),
            phone: None,
            address: None,
            age: None,
            gender: None,
            dob: None,
            password: Some("$2b$12$secret".to_string()),
            role: Some(Role::Doctor),
            is_active: true,
            last_login: None,
            lock_until: None,
            created_at: None,
            updated_at: None,
        };

        let json = serde_json::to_value(UserInfo::from(&user)).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["user_id"], "USR-0001");
        assert_eq!(json["role"], "Doctor");
    }

    // ==================== MONGODB INTEGRATION ====================
    // These exercise the cascade against a real replica set (transactions
    // are unavailable on standalone mongod). DATABASE_URL must point at it.

    use crate::database::MongoDB as Db;
    use crate::services::role_registry;

    async fn test_db() -> Db {
        dotenv::dotenv().ok();
        let uri = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017/clinic_test".to_string());
        Db::new(&uri).await.expect("test MongoDB connection")
    }

    fn doctor_request(email: &str) -> CreateUserRequest {
        CreateUserRequest {
            name: "Dr. Test".to_string(),
            email: email.to_string(),
            phone: Some("555-0100".to_string()),
            address: None,
            age: None,
            gender: None,
            dob: None,
            role: Some(Role::Doctor),
            password: None,
        }
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB replica set to be running
    async fn test_create_doctor_cascade() {
        let db = test_db().await;

        let email = format!("doc-{}@clinic.test", ObjectId::new().to_hex());
        let response = create_user_with_role(&db, doctor_request(&email))
            .await
            .unwrap();

        assert!(response.success);
        assert!(role_registry::pattern(Role::Doctor)
            .is_match(response.role_data.as_ref().unwrap()["doctor_id"].as_str().unwrap()));

        // cleanup through the cascade itself
        delete_user_with_role(&db, &response.user.user_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB replica set to be running
    async fn test_duplicate_email_is_a_distinct_error() {
        let db = test_db().await;

        let email = format!("dup-{}@clinic.test", ObjectId::new().to_hex());
        let first = create_user_with_role(&db, doctor_request(&email)).await.unwrap();

        let second = create_user_with_role(&db, doctor_request(&email)).await;
        assert!(matches!(second, Err(AppError::DuplicateKey(_))));

        delete_user_with_role(&db, &first.user.user_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB replica set to be running
    async fn test_sequential_doctors_get_consecutive_identifiers() {
        let db = test_db().await;

        let first_email = format!("seq1-{}@clinic.test", ObjectId::new().to_hex());
        let second_email = format!("seq2-{}@clinic.test", ObjectId::new().to_hex());

        let first = create_user_with_role(&db, doctor_request(&first_email)).await.unwrap();
        let second = create_user_with_role(&db, doctor_request(&second_email)).await.unwrap();

        let desc = role_registry::descriptor(Role::Doctor);
        let first_seq = role_registry::parse_identifier(
            desc,
            first.role_data.as_ref().unwrap()["doctor_id"].as_str().unwrap(),
        )
        .unwrap();
        let second_seq = role_registry::parse_identifier(
            desc,
            second.role_data.as_ref().unwrap()["doctor_id"].as_str().unwrap(),
        )
        .unwrap();
        assert_eq!(second_seq, first_seq + 1);

        delete_user_with_role(&db, &first.user.user_id).await.unwrap();
        delete_user_with_role(&db, &second.user.user_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB replica set to be running
    async fn test_cascade_delete_removes_both_documents() {
        let db = test_db().await;

        let email = format!("del-{}@clinic.test", ObjectId::new().to_hex());
        let created = create_user_with_role(&db, doctor_request(&email)).await.unwrap();
        let user_id = created.user.user_id.clone();

        delete_user_with_role(&db, &user_id).await.unwrap();

        let after = get_user_with_role(&db, &user_id).await;
        assert!(matches!(after, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB replica set to be running
    async fn test_update_propagates_shared_fields_only() {
        let db = test_db().await;

        let email = format!("upd-{}@clinic.test", ObjectId::new().to_hex());
        let created = create_user_with_role(&db, doctor_request(&email)).await.unwrap();
        let user_id = created.user.user_id.clone();

        let new_email = format!("upd2-{}@clinic.test", ObjectId::new().to_hex());
        let updated = update_user_with_role(
            &db,
            &user_id,
            UpdateUserRequest {
                name: Some("Dr. Renamed".to_string()),
                email: Some(new_email.clone()),
                phone: None,
                address: None,
                age: None,
                gender: None,
                is_active: None,
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.user.name, "Dr. Renamed");
        let profile = updated.role_data.unwrap();
        assert_eq!(profile["name"], "Dr. Renamed");
        assert_eq!(profile["email"], new_email.as_str());
        // role-specific fields are untouched
        assert_eq!(profile["specialty"], "General Medicine");

        delete_user_with_role(&db, &user_id).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires MongoDB replica set to be running
    async fn test_update_missing_user_is_not_found() {
        let db = test_db().await;

        let result = update_user_with_role(
            &db,
            "USR-9999",
            UpdateUserRequest {
                name: Some("Nobody".to_string()),
                email: None,
                phone: None,
                address: None,
                age: None,
                gender: None,
                is_active: None,
            },
        )
        .await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
