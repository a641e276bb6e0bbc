use std::fmt;
use std::sync::Arc;

use crate::config::Settings;
use crate::services::confinement::ledger::ConfinementLedger;
use crate::services::confinement::scheduler::ReleaseScheduler;

/// Shared data available to all commands and handlers
pub struct Data {
    pub settings: Settings,
    /// Active confinements and their pre-confinement snapshots
    pub ledger: ConfinementLedger,
    /// Pending automatic releases, one timer per active confinement
    pub scheduler: ReleaseScheduler,
}

impl Data {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ledger: ConfinementLedger::new(),
            scheduler: ReleaseScheduler::new(),
        }
    }
}

impl fmt::Debug for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Data")
            .field("active_confinements", &self.ledger.active_count())
            .field("pending_releases", &self.scheduler.pending_count())
            .finish_non_exhaustive()
    }
}

pub type Context<'a> = poise::Context<'a, Arc<Data>, crate::bot::error::Error>;
