//! Rating persistence: the store interface plus SQLite and in-memory backends

mod db;
mod models;

use std::collections::HashMap;

pub use db::Database;
pub use models::*;

use crate::error::Result;
use crate::rating::RatingRecord;

/// Load/save of rating records keyed by profile name.
pub trait RatingStore {
    fn load(&self, profile: &str) -> Result<Option<RatingRecord>>;
    fn save(&mut self, profile: &str, record: &RatingRecord) -> Result<()>;
    /// Profile to log back into on startup.
    fn last_profile(&self) -> Result<Option<String>>;
    fn set_last_profile(&mut self, profile: Option<&str>) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, RatingRecord>,
    last: Option<String>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RatingStore for MemoryStore {
    fn load(&self, profile: &str) -> Result<Option<RatingRecord>> {
        Ok(self.records.get(profile).cloned())
    }

    fn save(&mut self, profile: &str, record: &RatingRecord) -> Result<()> {
        self.records.insert(profile.to_string(), record.clone());
        Ok(())
    }

    fn last_profile(&self) -> Result<Option<String>> {
        Ok(self.last.clone())
    }

    fn set_last_profile(&mut self, profile: Option<&str>) -> Result<()> {
        self.last = profile.map(str::to_string);
        Ok(())
    }
}
