use serenity::all::{ChannelId, Context, GuildId, Role};

/// Check whether the bot's highest role sits above the given role.
/// Discord rejects grants of roles at or above the granter's top role,
/// so this has to pass before a confinement role can be assigned.
pub async fn bot_outranks_role(ctx: &Context, guild_id: GuildId, role: &Role) -> bool {
    let bot_id = ctx.cache.current_user().id;
    let Ok(member) = guild_id.member(ctx, bot_id).await else {
        return false;
    };
    let Some(guild) = ctx.cache.guild(guild_id) else {
        return false;
    };
    let top_position = member
        .roles
        .iter()
        .filter_map(|id| guild.roles.get(id))
        .map(|r| r.position)
        .max()
        .unwrap_or(0);
    top_position > role.position
}

/// Check whether the bot holds Connect and Move Members in a voice channel
pub async fn bot_can_connect_and_move(
    ctx: &Context,
    guild_id: GuildId,
    channel_id: ChannelId,
) -> bool {
    let bot_id = ctx.cache.current_user().id;
    let Ok(member) = guild_id.member(ctx, bot_id).await else {
        return false;
    };
    let Some(guild) = ctx.cache.guild(guild_id) else {
        return false;
    };
    let Some(channel) = guild.channels.get(&channel_id) else {
        return false;
    };
    let perms = guild.user_permissions_in(channel, &member);
    perms.connect() && perms.move_members()
}
