use mongodb::bson::doc;

use crate::database::MongoDB;
use crate::models::{Role, User};
use crate::services::user_service::{self, CreateUserRequest, USERS_COLLECTION};

const ADMIN_EMAIL: &str = "admin@clinic.local";

/// Seeds the bootstrap administrator on an empty users collection.
/// Runs through the regular cascade so the admin gets a user_id and an
/// administrators profile like any other user.
pub async fn seed_default_admin(db: &MongoDB) {
    let users = db.collection::<User>(USERS_COLLECTION);

    let count = users.count_documents(doc! {}).await.unwrap_or(0);
    if count > 0 {
        log::info!("🌱 Admin seed: {} users already in DB — skipping", count);
        return;
    }

    let password = match std::env::var("ADMIN_SEED_PASSWORD") {
        Ok(p) if !p.is_empty() => p,
        _ => {
            log::warn!("🌱 Admin seed: ADMIN_SEED_PASSWORD not set — skipping bootstrap admin");
            return;
        }
    };

    log::info!("🌱 Admin seed: creating bootstrap administrator {}", ADMIN_EMAIL);

    let request = CreateUserRequest {
        name: "System Administrator".to_string(),
        email: ADMIN_EMAIL.to_string(),
        phone: None,
        address: None,
        age: None,
        gender: None,
        dob: None,
        role: Some(Role::Administrator),
        password: Some(password),
    };

    match user_service::create_user_with_role(db, request).await {
        Ok(response) => {
            log::info!("   ✅ Bootstrap administrator created: {}", response.user.user_id);
        }
        Err(e) => {
            log::error!("   ❌ Failed to seed bootstrap administrator: {}", e);
        }
    }
}
