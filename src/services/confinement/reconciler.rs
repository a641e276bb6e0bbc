use std::collections::HashSet;
use std::sync::Arc;

use serenity::all::{ChannelId, Context, CreateMessage, EditMember, GuildId, RoleId, UserId};
use tracing::{debug, error, info, warn};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::utils::{permissions, voice};

/// What happened to the voice placement during a release
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceRestore {
    /// Member was moved back to their original channel
    Moved(ChannelId),
    /// No voice channel was recorded at confinement time
    NotRequested,
    /// Member is no longer connected to voice, so no move was attempted
    NotConnected,
    /// The original channel was deleted in the interim
    ChannelGone(ChannelId),
    /// Bot lacks Connect/Move Members in the original channel
    MissingPermissions(ChannelId),
    /// The move call itself failed; roles were already restored
    MoveFailed(ChannelId),
}

#[derive(Debug, Clone)]
pub struct ReleaseSummary {
    pub restored_roles: usize,
    pub dropped_roles: usize,
    pub voice: VoiceRestore,
}

#[derive(Debug, Clone)]
pub enum ReleaseOutcome {
    Released(ReleaseSummary),
    /// Normal no-op: the member was already released, or never confined
    NotConfined,
    /// The member left the guild while confined; the record is discarded
    MemberGone,
}

/// Restore a member's pre-confinement state. Single code path for both the
/// automatic timer and the manual `/release` command; the ledger take makes
/// whichever runs first win and the other a no-op.
pub async fn release_member(
    ctx: &Context,
    data: &Arc<Data>,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<ReleaseOutcome, Error> {
    let Some(record) = data.ledger.take(guild_id, user_id) else {
        debug!(
            "No active confinement for user {} in guild {}",
            user_id, guild_id
        );
        return Ok(ReleaseOutcome::NotConfined);
    };

    // The automatic timer is now pointless; dropping it keeps the pending
    // map in step with the ledger. A timer that fires anyway observes the
    // empty ledger above and no-ops.
    data.scheduler.cancel(guild_id, user_id);

    let member = match guild_id.member(ctx, user_id).await {
        Ok(member) => member,
        Err(e) => {
            warn!(
                "Member {} not found in guild {} at release time: {:?}",
                user_id, guild_id, e
            );
            return Ok(ReleaseOutcome::MemberGone);
        }
    };

    // Strip whatever the member holds now: the confinement role, plus
    // anything granted since. @everyone is not part of Member::roles.
    let held = member.roles.clone();
    if !held.is_empty() {
        member.remove_roles(&ctx.http, &held).await?;
    }

    // Roles stored in the record may have been deleted while the member
    // was confined; those are dropped, never an error.
    let live = live_role_ids(ctx, guild_id).await?;
    let (restorable, dropped) = partition_restorable(&record.original_role_ids, &live);
    if !restorable.is_empty() {
        member.add_roles(&ctx.http, &restorable).await?;
    }
    if dropped > 0 {
        info!(
            "Dropped {} stale role(s) while releasing user {} in guild {}",
            dropped, user_id, guild_id
        );
    }

    let voice = restore_voice(ctx, guild_id, user_id, record.original_voice_channel_id).await;

    info!(
        "Released user {} in guild {} ({} role(s) restored)",
        user_id,
        guild_id,
        restorable.len()
    );

    Ok(ReleaseOutcome::Released(ReleaseSummary {
        restored_roles: restorable.len(),
        dropped_roles: dropped,
        voice,
    }))
}

/// Timer payload: release non-interactively, then notify the channel the
/// confinement was requested from. Notification failure is swallowed, the
/// release itself already succeeded.
pub async fn run_scheduled_release(
    ctx: Context,
    data: Arc<Data>,
    guild_id: GuildId,
    user_id: UserId,
    notify_channel: ChannelId,
) {
    let outcome = match release_member(&ctx, &data, guild_id, user_id).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(
                "Automatic release failed for user {} in guild {}: {:?}",
                user_id, guild_id, e
            );
            return;
        }
    };

    let embed = match outcome {
        ReleaseOutcome::Released(summary) => embeds::success_embed()
            .title("Automatic release")
            .description(format!(
                "<@{}> has served their time.\n{}",
                user_id,
                summary_lines(&summary)
            )),
        ReleaseOutcome::NotConfined => {
            // Manual release won the race
            debug!("Timer fired after user {} was already released", user_id);
            return;
        }
        ReleaseOutcome::MemberGone => embeds::info_embed().title("Automatic release").description(
            format!(
                "<@{}>'s confinement expired, but they are no longer in the server.",
                user_id
            ),
        ),
    };

    let message = CreateMessage::new().embed(embed);
    if let Err(e) = notify_channel.send_message(&ctx.http, message).await {
        debug!(
            "Could not send release notification to channel {}: {:?}",
            notify_channel, e
        );
    }
}

/// Human-readable lines describing what a release restored
pub fn summary_lines(summary: &ReleaseSummary) -> String {
    let mut lines = Vec::new();

    lines.push(match summary.dropped_roles {
        0 => format!("Restored {} role(s)", summary.restored_roles),
        n => format!(
            "Restored {} role(s); {} no longer exist and were skipped",
            summary.restored_roles, n
        ),
    });

    match &summary.voice {
        VoiceRestore::Moved(id) => lines.push(format!("Moved back to <#{}>", id)),
        VoiceRestore::NotRequested => {}
        VoiceRestore::NotConnected => {
            lines.push("Not connected to voice, no move attempted".to_string())
        }
        VoiceRestore::ChannelGone(_) => {
            lines.push("Original voice channel no longer exists".to_string())
        }
        VoiceRestore::MissingPermissions(id) => {
            lines.push(format!("Missing permissions to move back to <#{}>", id))
        }
        VoiceRestore::MoveFailed(id) => lines.push(format!("Could not move back to <#{}>", id)),
    }

    lines.join("\n")
}

fn partition_restorable(original: &[RoleId], live: &HashSet<RoleId>) -> (Vec<RoleId>, usize) {
    let restorable: Vec<RoleId> = original
        .iter()
        .copied()
        .filter(|id| live.contains(id))
        .collect();
    let dropped = original.len() - restorable.len();
    (restorable, dropped)
}

async fn live_role_ids(ctx: &Context, guild_id: GuildId) -> Result<HashSet<RoleId>, Error> {
    if let Some(guild) = ctx.cache.guild(guild_id) {
        return Ok(guild.roles.keys().copied().collect());
    }
    let roles = ctx.http.get_guild_roles(guild_id).await?;
    Ok(roles.into_iter().map(|r| r.id).collect())
}

/// Voice restoration is strictly best-effort: every failure mode maps to a
/// qualifier on an otherwise-successful release.
async fn restore_voice(
    ctx: &Context,
    guild_id: GuildId,
    user_id: UserId,
    original: Option<ChannelId>,
) -> VoiceRestore {
    let Some(channel_id) = original else {
        return VoiceRestore::NotRequested;
    };

    if voice::current_voice_channel(&ctx.cache, guild_id, user_id).is_none() {
        return VoiceRestore::NotConnected;
    }
    if !voice::channel_exists(&ctx.cache, guild_id, channel_id) {
        return VoiceRestore::ChannelGone(channel_id);
    }
    if !permissions::bot_can_connect_and_move(ctx, guild_id, channel_id).await {
        return VoiceRestore::MissingPermissions(channel_id);
    }

    let edit = EditMember::new().voice_channel(channel_id);
    match guild_id.edit_member(&ctx.http, user_id, edit).await {
        Ok(_) => VoiceRestore::Moved(channel_id),
        Err(e) => {
            error!(
                "Failed to move user {} back to channel {}: {:?}",
                user_id, channel_id, e
            );
            VoiceRestore::MoveFailed(channel_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_restorable_drops_stale_roles() {
        let original = vec![RoleId::new(1), RoleId::new(2), RoleId::new(3)];
        let live: HashSet<RoleId> = [RoleId::new(1), RoleId::new(3), RoleId::new(9)]
            .into_iter()
            .collect();

        let (restorable, dropped) = partition_restorable(&original, &live);
        assert_eq!(restorable, vec![RoleId::new(1), RoleId::new(3)]);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_partition_restorable_all_live() {
        let original = vec![RoleId::new(1), RoleId::new(2)];
        let live: HashSet<RoleId> = original.iter().copied().collect();

        let (restorable, dropped) = partition_restorable(&original, &live);
        assert_eq!(restorable, original);
        assert_eq!(dropped, 0);
    }

    #[test]
    fn test_summary_lines_distinct_outcomes() {
        let base = ReleaseSummary {
            restored_roles: 2,
            dropped_roles: 0,
            voice: VoiceRestore::NotRequested,
        };
        assert_eq!(summary_lines(&base), "Restored 2 role(s)");

        let with_drops = ReleaseSummary {
            dropped_roles: 1,
            ..base.clone()
        };
        assert!(summary_lines(&with_drops).contains("no longer exist"));

        let moved = ReleaseSummary {
            voice: VoiceRestore::Moved(ChannelId::new(7)),
            ..base.clone()
        };
        assert!(summary_lines(&moved).contains("<#7>"));

        let offline = ReleaseSummary {
            voice: VoiceRestore::NotConnected,
            ..base
        };
        assert!(summary_lines(&offline).contains("Not connected"));
    }
}
