//! Database models

use serde::{Deserialize, Serialize};

use crate::rating::RatingRecord;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredProfile {
    pub id: i64,
    pub name: String,
    pub record: RatingRecord,
    pub created_at: u64,
    pub updated_at: u64,
}

impl StoredProfile {
    pub fn games_rated(&self) -> usize {
        self.record.games_rated()
    }
}
