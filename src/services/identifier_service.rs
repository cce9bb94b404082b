// ==================== IDENTIFIER GENERATOR ====================
// Mints the next role display identifier (DOC-0001, T001, ...) by scanning
// the identifiers already present in the role's collection.

use mongodb::bson::{doc, Document};
use mongodb::ClientSession;

use crate::database::MongoDB;
use crate::models::Role;
use crate::services::role_registry;
use crate::utils::error::AppError;

/// Computes the next display identifier for a role.
///
/// Must run inside the caller's transaction so the scan observes a
/// consistent snapshot. Two concurrent creations for the same role can still
/// compute the same next value under non-serializable isolation; the unique
/// index on the id field turns that race into an abort rather than a
/// duplicate (see DESIGN.md).
pub async fn generate_id(
    db: &MongoDB,
    session: &mut ClientSession,
    role: Role,
) -> Result<String, AppError> {
    let desc = role_registry::descriptor(role);
    let collection = db.collection::<Document>(desc.collection);

    let mut cursor = collection
        .find(doc! {})
        .projection(doc! { desc.id_field: 1 })
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?;

    // Identifiers that fail the role pattern (legacy or hand-edited rows)
    // are skipped rather than treated as errors.
    let mut max_seen: i64 = 0;
    while let Some(profile) = cursor.next(&mut *session).await {
        let profile = profile.map_err(AppError::from_mongo)?;
        if let Ok(existing) = profile.get_str(desc.id_field) {
            if let Some(value) = role_registry::parse_identifier(desc, existing) {
                max_seen = max_seen.max(value);
            }
        }
    }

    let next = role_registry::format_identifier(desc, max_seen + 1);
    log::debug!("🔢 Next {} identifier: {}", role, next);
    Ok(next)
}
