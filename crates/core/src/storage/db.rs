//! SQLite rating store

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::models::StoredProfile;
use super::RatingStore;
use crate::error::Result;
use crate::rating::{EloSnapshot, RatingRecord};

const LAST_PROFILE_KEY: &str = "last_profile";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init_schema()?;
        Ok(db)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS profiles (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL,
                white_elo INTEGER NOT NULL,
                black_elo INTEGER NOT NULL,
                elo_history TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );

            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_profiles_updated_at ON profiles(updated_at);
            "#,
        )?;
        Ok(())
    }

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    pub fn list_profiles(&self) -> Result<Vec<StoredProfile>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, white_elo, black_elo, elo_history, created_at, updated_at
             FROM profiles ORDER BY updated_at DESC, name",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i32>(2)?,
                    row.get::<_, i32>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, u64>(5)?,
                    row.get::<_, u64>(6)?,
                ))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(id, name, white_elo, black_elo, history, created_at, updated_at)| -> Result<StoredProfile> {
                let elo_history: Vec<EloSnapshot> = serde_json::from_str(&history)?;
                Ok(StoredProfile {
                    id,
                    name,
                    record: RatingRecord {
                        white_elo,
                        black_elo,
                        elo_history,
                    },
                    created_at,
                    updated_at,
                })
            })
            .collect()
    }
}

impl RatingStore for Database {
    fn load(&self, profile: &str) -> Result<Option<RatingRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT white_elo, black_elo, elo_history FROM profiles WHERE name = ?1",
                params![profile],
                |row| {
                    Ok((
                        row.get::<_, i32>(0)?,
                        row.get::<_, i32>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((white_elo, black_elo, history)) => Ok(Some(RatingRecord {
                white_elo,
                black_elo,
                elo_history: serde_json::from_str(&history)?,
            })),
            None => Ok(None),
        }
    }

    fn save(&mut self, profile: &str, record: &RatingRecord) -> Result<()> {
        let history = serde_json::to_string(&record.elo_history)?;
        let now = Self::now();
        self.conn.execute(
            r#"
            INSERT INTO profiles (name, white_elo, black_elo, elo_history, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            ON CONFLICT(name) DO UPDATE SET
                white_elo = ?2, black_elo = ?3, elo_history = ?4, updated_at = ?5
            "#,
            params![profile, record.white_elo, record.black_elo, history, now],
        )?;
        Ok(())
    }

    fn last_profile(&self) -> Result<Option<String>> {
        let name = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![LAST_PROFILE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(name)
    }

    fn set_last_profile(&mut self, profile: Option<&str>) -> Result<()> {
        match profile {
            Some(name) => {
                self.conn.execute(
                    r#"
                    INSERT INTO settings (key, value) VALUES (?1, ?2)
                    ON CONFLICT(key) DO UPDATE SET value = ?2
                    "#,
                    params![LAST_PROFILE_KEY, name],
                )?;
            }
            None => {
                self.conn.execute(
                    "DELETE FROM settings WHERE key = ?1",
                    params![LAST_PROFILE_KEY],
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Winner;

    #[test]
    fn test_save_and_load_round_trip() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(db.load("erin").unwrap().is_none());

        let mut record = RatingRecord::default();
        record.apply(Winner::Black);
        db.save("erin", &record).unwrap();
        assert_eq!(db.load("erin").unwrap(), Some(record.clone()));

        record.apply(Winner::Draw);
        db.save("erin", &record).unwrap();
        assert_eq!(db.load("erin").unwrap().unwrap().elo_history.len(), 3);
        assert_eq!(db.list_profiles().unwrap().len(), 1);
    }

    #[test]
    fn test_last_profile() {
        let mut db = Database::open_in_memory().unwrap();
        assert!(db.last_profile().unwrap().is_none());
        db.set_last_profile(Some("frank")).unwrap();
        db.set_last_profile(Some("gina")).unwrap();
        assert_eq!(db.last_profile().unwrap().as_deref(), Some("gina"));
        db.set_last_profile(None).unwrap();
        assert!(db.last_profile().unwrap().is_none());
    }

    #[test]
    fn test_list_profiles() {
        let mut db = Database::open_in_memory().unwrap();
        db.save("hal", &RatingRecord::default()).unwrap();
        let mut record = RatingRecord::default();
        record.apply(Winner::White);
        db.save("ivy", &record).unwrap();

        let profiles = db.list_profiles().unwrap();
        assert_eq!(profiles.len(), 2);
        let ivy = profiles.iter().find(|p| p.name == "ivy").unwrap();
        assert_eq!(ivy.games_rated(), 1);
        assert_eq!(ivy.record.white_elo, 1216);
    }
}
