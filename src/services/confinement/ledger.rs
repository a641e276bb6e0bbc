use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serenity::all::{ChannelId, GuildId, RoleId, UserId};
use thiserror::Error;

/// Snapshot of a member's state, taken at confinement time
#[derive(Debug, Clone)]
pub struct ConfinementRecord {
    pub guild_id: GuildId,
    pub user_id: UserId,
    /// Roles held before confinement, excluding @everyone
    pub original_role_ids: Vec<RoleId>,
    /// Voice channel occupied at confinement time, if any
    pub original_voice_channel_id: Option<ChannelId>,
    pub confined_at: DateTime<Utc>,
    pub duration_minutes: u32,
}

impl ConfinementRecord {
    pub fn release_at(&self) -> DateTime<Utc> {
        self.confined_at + chrono::Duration::minutes(i64::from(self.duration_minutes))
    }
}

/// Rejected confinement: the member already has an active record
#[derive(Debug, Error, PartialEq, Eq)]
#[error("member is already confined")]
pub struct AlreadyConfined;

/// In-memory store of active confinements, keyed per guild and member.
/// Owned by `Data` for the lifetime of the process; nothing survives a
/// restart.
#[derive(Debug, Default)]
pub struct ConfinementLedger {
    records: DashMap<(GuildId, UserId), ConfinementRecord>,
}

impl ConfinementLedger {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
        }
    }

    /// Store a new record. The entry API keeps the at-most-one-per-member
    /// invariant under concurrent requests: a racing duplicate loses here
    /// before any role has been touched.
    pub fn begin(&self, record: ConfinementRecord) -> Result<(), AlreadyConfined> {
        match self.records.entry((record.guild_id, record.user_id)) {
            Entry::Occupied(_) => Err(AlreadyConfined),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    pub fn is_confined(&self, guild_id: GuildId, user_id: UserId) -> bool {
        self.records.contains_key(&(guild_id, user_id))
    }

    /// Atomically remove and return the record. This is the only removal
    /// path, so whichever release runs first gets the record and the loser
    /// observes absence.
    pub fn take(&self, guild_id: GuildId, user_id: UserId) -> Option<ConfinementRecord> {
        self.records
            .remove(&(guild_id, user_id))
            .map(|(_, record)| record)
    }

    pub fn active_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(guild: u64, user: u64) -> ConfinementRecord {
        ConfinementRecord {
            guild_id: GuildId::new(guild),
            user_id: UserId::new(user),
            original_role_ids: vec![RoleId::new(10), RoleId::new(11)],
            original_voice_channel_id: Some(ChannelId::new(20)),
            confined_at: Utc::now(),
            duration_minutes: 30,
        }
    }

    #[test]
    fn test_double_begin_rejected() {
        let ledger = ConfinementLedger::new();
        assert!(ledger.begin(record(1, 2)).is_ok());
        assert_eq!(ledger.begin(record(1, 2)), Err(AlreadyConfined));

        // The first record is untouched by the rejected attempt
        let kept = ledger
            .take(GuildId::new(1), UserId::new(2))
            .expect("first record still present");
        assert_eq!(kept.original_role_ids, vec![RoleId::new(10), RoleId::new(11)]);
    }

    #[test]
    fn test_take_is_exactly_once() {
        let ledger = ConfinementLedger::new();
        ledger.begin(record(1, 2)).unwrap();
        assert!(ledger.is_confined(GuildId::new(1), UserId::new(2)));

        assert!(ledger.take(GuildId::new(1), UserId::new(2)).is_some());
        assert!(ledger.take(GuildId::new(1), UserId::new(2)).is_none());
        assert!(!ledger.is_confined(GuildId::new(1), UserId::new(2)));
    }

    #[test]
    fn test_records_are_guild_scoped() {
        let ledger = ConfinementLedger::new();
        ledger.begin(record(1, 2)).unwrap();
        ledger.begin(record(3, 2)).unwrap();
        assert_eq!(ledger.active_count(), 2);

        // Releasing in one guild leaves the other untouched
        assert!(ledger.take(GuildId::new(1), UserId::new(2)).is_some());
        assert!(ledger.is_confined(GuildId::new(3), UserId::new(2)));
    }

    #[test]
    fn test_release_at() {
        let rec = record(1, 2);
        assert_eq!(rec.release_at() - rec.confined_at, chrono::Duration::minutes(30));
    }
}
