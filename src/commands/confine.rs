use std::time::Duration;

use chrono::Utc;
use poise::serenity_prelude::{Channel, Role, User};
use serenity::all::{CreateEmbedFooter, EditMember, Member, RoleId, Timestamp};
use tracing::{error, warn};

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::services::confinement::ledger::ConfinementRecord;
use crate::services::confinement::reconciler;
use crate::utils::{formatting, permissions, voice};

/// Temporarily strip a member's roles and assign a confinement role
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES",
    default_member_permissions = "MANAGE_ROLES"
)]
pub async fn confine(
    ctx: Context<'_>,
    #[description = "Member to confine"] user: User,
    #[description = "Confinement role to assign"] role: Role,
    #[description = "Duration in minutes (max 24 hours)"]
    #[min = 1]
    #[max = 1440]
    duration: u32,
    #[description = "Voice channel to move the member to"]
    #[channel_types("Voice")]
    channel: Option<Channel>,
) -> Result<(), Error> {
    ctx.defer().await?;

    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;
    let serenity_ctx = ctx.serenity_context();
    let data = ctx.data();

    // Fresh fetch over HTTP: the cached member can lag behind recent role
    // changes, and the snapshot below must not
    let member = match serenity_ctx.http.get_member(guild_id, user.id).await {
        Ok(member) => member,
        Err(_) => {
            let embed = embeds::error_embed()
                .title("Member not found")
                .description(format!("{} is not in this server.", user.tag()));
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
            return Ok(());
        }
    };

    if data.ledger.is_confined(guild_id, user.id) {
        let embed = embeds::warning_embed()
            .title("Already confined")
            .description(format!("<@{}> is already confined.", user.id));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    // Discord rejects grants of roles at or above the bot's top role, so
    // fail before touching anything
    if !permissions::bot_outranks_role(serenity_ctx, guild_id, &role).await {
        let embed = embeds::error_embed()
            .title("Role hierarchy problem")
            .description(format!(
                "I cannot assign <@&{}> because it is at or above my highest role.",
                role.id
            ));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    // A capability shortfall in the target channel degrades to a role-only
    // confinement rather than aborting
    let cell_channel_id = channel.as_ref().map(|c| c.id());
    let can_relocate = match cell_channel_id {
        Some(channel_id) => {
            permissions::bot_can_connect_and_move(serenity_ctx, guild_id, channel_id).await
        }
        None => false,
    };

    let original_roles = member.roles.clone();
    let original_voice = voice::current_voice_channel(&serenity_ctx.cache, guild_id, user.id);

    let record = ConfinementRecord {
        guild_id,
        user_id: user.id,
        original_role_ids: original_roles.clone(),
        original_voice_channel_id: original_voice,
        confined_at: Utc::now(),
        duration_minutes: duration,
    };

    // Reserve the ledger slot before mutating roles so a concurrent
    // duplicate request is rejected instead of double-stripping
    if data.ledger.begin(record.clone()).is_err() {
        let embed = embeds::warning_embed()
            .title("Already confined")
            .description(format!("<@{}> is already confined.", user.id));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    if let Err(e) = swap_roles(serenity_ctx, &member, &original_roles, role.id).await {
        // The attempt failed; the slot goes back so no partial record is
        // left behind
        data.ledger.take(guild_id, user.id);
        error!(
            "Confinement role swap failed for user {} in guild {}: {:?}",
            user.id, guild_id, e
        );
        let embed = embeds::error_embed()
            .title("Confinement failed")
            .description(format!("Could not confine <@{}>: {}", user.id, e));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        return Ok(());
    }

    let voice_note = match (cell_channel_id, original_voice) {
        (Some(channel_id), Some(_)) if can_relocate => {
            let edit = EditMember::new().voice_channel(channel_id);
            match guild_id.edit_member(&serenity_ctx.http, user.id, edit).await {
                Ok(_) => format!("Moved to <#{}>", channel_id),
                Err(e) => {
                    warn!(
                        "Could not move user {} to confinement channel {}: {:?}",
                        user.id, channel_id, e
                    );
                    format!("Could not move to <#{}>; confinement stands", channel_id)
                }
            }
        }
        (Some(channel_id), Some(_)) => format!(
            "Missing Connect/Move Members in <#{}>; confined without relocation",
            channel_id
        ),
        (Some(channel_id), None) => {
            format!("Not connected to voice; no move to <#{}> attempted", channel_id)
        }
        (None, Some(current)) => format!("Currently connected to <#{}>", current),
        (None, None) => "Not connected to voice".to_string(),
    };

    // Arm the automatic release. The timer re-checks the ledger when it
    // fires, so a manual release in the meantime makes it a no-op.
    let release_ctx = serenity_ctx.clone();
    let release_data = data.clone();
    let notify_channel = ctx.channel_id();
    data.scheduler.schedule(
        guild_id,
        user.id,
        Duration::from_secs(u64::from(duration) * 60),
        reconciler::run_scheduled_release(release_ctx, release_data, guild_id, user.id, notify_channel),
    );

    let embed = embeds::warning_embed()
        .title("Member confined")
        .description(format!(
            "**Member:** {} (<@{}>)\n\
             **Confinement role:** <@&{}>\n\
             **Duration:** {}\n\
             **Automatic release:** {}\n\
             {}",
            user.tag(),
            user.id,
            role.id,
            formatting::format_minutes(duration),
            formatting::relative_timestamp(record.release_at()),
            voice_note
        ))
        .thumbnail(user.face())
        .timestamp(Timestamp::now())
        .footer(
            CreateEmbedFooter::new(format!("Confined by {}", ctx.author().tag()))
                .icon_url(ctx.author().face()),
        );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Replace the member's roles with the confinement role. Any failure here
/// aborts the confinement; the caller takes back the ledger entry.
async fn swap_roles(
    ctx: &serenity::all::Context,
    member: &Member,
    original: &[RoleId],
    confinement_role: RoleId,
) -> Result<(), Error> {
    if !original.is_empty() {
        member.remove_roles(&ctx.http, original).await?;
    }
    member.add_role(&ctx.http, confinement_role).await?;
    Ok(())
}
