//! Profile session: who is logged in and their current ratings
//!
//! The host owns one of these and hands it the store; nothing here is global.

use tracing::{debug, info};

use super::{EloChange, RatingRecord};
use crate::error::Result;
use crate::game::{GameEvent, Winner};
use crate::storage::RatingStore;

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    profile: Option<String>,
    record: RatingRecord,
    last_change: Option<EloChange>,
}

impl SessionContext {
    /// Anonymous session with default ratings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs back into the last used profile, if the store remembers one.
    pub fn restore<S: RatingStore + ?Sized>(store: &mut S) -> Result<Self> {
        let mut session = Self::new();
        if let Some(name) = store.last_profile()? {
            session.login(&name, store)?;
        }
        Ok(session)
    }

    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    pub fn record(&self) -> &RatingRecord {
        &self.record
    }

    /// Deltas from the most recent rated game, cleared on login and logout.
    pub fn last_change(&self) -> Option<EloChange> {
        self.last_change
    }

    pub fn clear_last_change(&mut self) {
        self.last_change = None;
    }

    /// Loads `name`, creating it with default ratings if unknown. Blank
    /// names are ignored and return false.
    pub fn login<S: RatingStore + ?Sized>(&mut self, name: &str, store: &mut S) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(false);
        }

        let record = match store.load(name)? {
            Some(record) => record,
            None => {
                let record = RatingRecord::default();
                store.save(name, &record)?;
                info!(profile = name, "created profile");
                record
            }
        };
        store.set_last_profile(Some(name))?;

        self.profile = Some(name.to_string());
        self.record = record;
        self.last_change = None;
        debug!(profile = name, white = self.record.white_elo, black = self.record.black_elo, "logged in");
        Ok(true)
    }

    pub fn logout<S: RatingStore + ?Sized>(&mut self, store: &mut S) -> Result<()> {
        store.set_last_profile(None)?;
        *self = Self::new();
        Ok(())
    }

    /// Rating update for a finished game. Unranked games leave everything
    /// untouched. The record is persisted when a profile is logged in.
    pub fn record_result<S: RatingStore + ?Sized>(
        &mut self,
        winner: Winner,
        ranked: bool,
        store: &mut S,
    ) -> Result<Option<EloChange>> {
        if !ranked {
            return Ok(None);
        }

        let change = self.record.apply(winner);
        self.last_change = Some(change);
        info!(
            %winner,
            white = self.record.white_elo,
            black = self.record.black_elo,
            white_delta = change.white,
            black_delta = change.black,
            "ratings updated"
        );

        if let Some(profile) = &self.profile {
            store.save(profile, &self.record)?;
        }
        Ok(Some(change))
    }

    /// Feeds drained game events through; fires on `GameEnded` only.
    pub fn handle_events<S: RatingStore + ?Sized>(
        &mut self,
        events: &[GameEvent],
        ranked: bool,
        store: &mut S,
    ) -> Result<Option<EloChange>> {
        let mut change = None;
        for event in events {
            if let GameEvent::GameEnded { winner } = event {
                change = self.record_result(*winner, ranked, store)?;
            }
        }
        Ok(change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Color;
    use crate::storage::MemoryStore;

    #[test]
    fn test_login_creates_default_profile() {
        let mut store = MemoryStore::default();
        let mut session = SessionContext::new();
        assert!(session.login("  alice ", &mut store).unwrap());
        assert_eq!(session.profile(), Some("alice"));
        assert_eq!(session.record(), &RatingRecord::default());
        assert_eq!(store.load("alice").unwrap(), Some(RatingRecord::default()));
        assert_eq!(store.last_profile().unwrap().as_deref(), Some("alice"));
    }

    #[test]
    fn test_blank_login_ignored() {
        let mut store = MemoryStore::default();
        let mut session = SessionContext::new();
        assert!(!session.login("   ", &mut store).unwrap());
        assert!(session.profile().is_none());
    }

    #[test]
    fn test_ranked_result_persists() {
        let mut store = MemoryStore::default();
        let mut session = SessionContext::new();
        session.login("bob", &mut store).unwrap();

        let change = session.record_result(Winner::White, true, &mut store).unwrap();
        assert_eq!(change, Some(EloChange { white: 16, black: -16 }));
        let saved = store.load("bob").unwrap().unwrap();
        assert_eq!(saved.white_elo, 1216);
        assert_eq!(saved.elo_history.len(), 2);

        // a fresh session picks the same profile back up
        let restored = SessionContext::restore(&mut store).unwrap();
        assert_eq!(restored.profile(), Some("bob"));
        assert_eq!(restored.record().black_elo, 1184);
    }

    #[test]
    fn test_unranked_result_is_ignored() {
        let mut store = MemoryStore::default();
        let mut session = SessionContext::new();
        session.login("carol", &mut store).unwrap();
        assert!(session.record_result(Winner::Black, false, &mut store).unwrap().is_none());
        assert_eq!(session.record(), &RatingRecord::default());
        assert_eq!(store.load("carol").unwrap(), Some(RatingRecord::default()));
    }

    #[test]
    fn test_anonymous_session_updates_in_memory_only() {
        let mut store = MemoryStore::default();
        let mut session = SessionContext::new();
        session.record_result(Winner::Draw, true, &mut store).unwrap();
        assert_eq!(session.record().elo_history.len(), 2);
        assert!(store.is_empty());
    }

    #[test]
    fn test_logout_resets() {
        let mut store = MemoryStore::default();
        let mut session = SessionContext::new();
        session.login("dave", &mut store).unwrap();
        session.record_result(Winner::White, true, &mut store).unwrap();
        session.logout(&mut store).unwrap();
        assert!(session.profile().is_none());
        assert_eq!(session.record(), &RatingRecord::default());
        assert!(store.last_profile().unwrap().is_none());
    }

    #[test]
    fn test_handle_events_fires_on_game_end() {
        let mut store = MemoryStore::default();
        let mut session = SessionContext::new();
        let events = vec![
            GameEvent::TurnChanged { to_move: Color::Black },
            GameEvent::GameEnded { winner: Winner::White },
        ];
        let change = session.handle_events(&events, true, &mut store).unwrap();
        assert_eq!(change, Some(EloChange { white: 16, black: -16 }));

        let quiet = [GameEvent::TurnChanged { to_move: Color::White }];
        assert!(session.handle_events(&quiet, true, &mut store).unwrap().is_none());
    }
}
