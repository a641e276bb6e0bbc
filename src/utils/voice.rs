use serenity::all::{Cache, ChannelId, GuildId, UserId};

/// Voice channel a user is currently connected to, if any.
/// Voice states only exist in the gateway cache.
pub fn current_voice_channel(cache: &Cache, guild_id: GuildId, user_id: UserId) -> Option<ChannelId> {
    cache
        .guild(guild_id)
        .and_then(|guild| {
            guild
                .voice_states
                .get(&user_id)
                .and_then(|state| state.channel_id)
        })
}

/// Whether a channel still exists in the guild
pub fn channel_exists(cache: &Cache, guild_id: GuildId, channel_id: ChannelId) -> bool {
    cache
        .guild(guild_id)
        .map(|guild| guild.channels.contains_key(&channel_id))
        .unwrap_or(false)
}
