// ==================== SEQUENCE COUNTER ====================
// Durable named counters backing unique display identifiers. The increment
// is a single atomic upsert, never read-modify-write.

use mongodb::bson::doc;
use mongodb::options::ReturnDocument;
use mongodb::ClientSession;

use crate::database::MongoDB;
use crate::models::SequenceCounter;
use crate::utils::error::AppError;

pub const COUNTERS_COLLECTION: &str = "counters";
pub const USER_ID_SEQUENCE: &str = "user_id";

/// Atomically increments the named sequence and returns the new value.
///
/// Runs on the caller's session: when the surrounding transaction aborts the
/// increment rolls back with it, so the only gaps are the normal ones.
pub async fn increment_and_get(
    db: &MongoDB,
    session: &mut ClientSession,
    name: &str,
) -> Result<i64, AppError> {
    let counters = db.collection::<SequenceCounter>(COUNTERS_COLLECTION);

    let counter = counters
        .find_one_and_update(doc! { "_id": name }, doc! { "$inc": { "seq": 1i64 } })
        .upsert(true)
        .return_document(ReturnDocument::After)
        .session(&mut *session)
        .await
        .map_err(AppError::from_mongo)?
        .ok_or_else(|| {
            AppError::DatabaseError(format!("counter '{}' missing after upsert", name))
        })?;

    Ok(counter.seq)
}
