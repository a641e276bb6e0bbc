use poise::serenity_prelude::User;
use serenity::all::{CreateEmbedFooter, Timestamp};

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::services::confinement::reconciler::{self, ReleaseOutcome};

/// Release a confined member early and restore their original roles
#[poise::command(
    slash_command,
    guild_only,
    required_permissions = "MANAGE_ROLES",
    default_member_permissions = "MANAGE_ROLES"
)]
pub async fn release(
    ctx: Context<'_>,
    #[description = "Member to release"] user: User,
) -> Result<(), Error> {
    ctx.defer().await?;

    let guild_id = ctx.guild_id().ok_or(Error::custom("Not in a guild"))?;

    let outcome =
        reconciler::release_member(ctx.serenity_context(), ctx.data(), guild_id, user.id).await?;

    let embed = match outcome {
        ReleaseOutcome::Released(summary) => embeds::success_embed()
            .title("Member released")
            .description(format!(
                "<@{}> has been released.\n{}",
                user.id,
                reconciler::summary_lines(&summary)
            ))
            .thumbnail(user.face()),
        ReleaseOutcome::NotConfined => embeds::warning_embed()
            .title("Not confined")
            .description(format!("<@{}> is not currently confined.", user.id)),
        ReleaseOutcome::MemberGone => embeds::info_embed()
            .title("Member gone")
            .description(format!(
                "<@{}> is no longer in this server; their confinement record was discarded.",
                user.id
            )),
    };

    let embed = embed.timestamp(Timestamp::now()).footer(
        CreateEmbedFooter::new(format!("Released by {}", ctx.author().tag()))
            .icon_url(ctx.author().face()),
    );
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
