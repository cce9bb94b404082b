use serde::{Deserialize, Serialize};

/// Durable sequence document, one per sequence name.
/// `seq` holds the last issued value; gaps after aborted transactions are
/// tolerated.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SequenceCounter {
    #[serde(rename = "_id")]
    pub name: String,
    pub seq: i64,
}
