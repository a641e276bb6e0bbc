use std::sync::Arc;

use serenity::all::VoiceState;
use tracing::debug;

use crate::bot::data::Data;

/// Voice moves are logged at debug level to make confinement relocations
/// and releases auditable against what the gateway actually saw.
pub fn log_transition(data: &Arc<Data>, old: Option<&VoiceState>, new: &VoiceState) {
    let Some(guild_id) = new.guild_id else {
        return;
    };

    let old_channel = old.and_then(|state| state.channel_id);
    let new_channel = new.channel_id;

    // Mute/deafen toggles arrive as updates too; only channel moves matter
    if old_channel == new_channel {
        return;
    }

    debug!(
        "Voice move in guild {}: user {} {:?} -> {:?}",
        guild_id, new.user_id, old_channel, new_channel
    );

    // A confined member who disconnects will not be moved back on release
    if new_channel.is_none() && data.ledger.is_confined(guild_id, new.user_id) {
        debug!(
            "Confined user {} disconnected from voice in guild {}",
            new.user_id, guild_id
        );
    }
}
