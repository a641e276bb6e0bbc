use serenity::all::Timestamp;

use crate::bot::data::Context;
use crate::bot::error::Error;
use crate::constants::durations::{MAX_CONFINEMENT_MINUTES, MIN_CONFINEMENT_MINUTES};
use crate::constants::embeds;

/// Show help for the confinement commands
#[poise::command(slash_command)]
pub async fn confinehelp(ctx: Context<'_>) -> Result<(), Error> {
    let bot_face = ctx.serenity_context().cache.current_user().face();

    let duration_note = format!(
        "Duration between {} and {} minutes (24 hours)",
        MIN_CONFINEMENT_MINUTES, MAX_CONFINEMENT_MINUTES
    );
    let notes = embeds::bullet_list(&[
        "The bot's highest role must sit above every role it manages",
        "One confinement per member at a time",
        duration_note.as_str(),
        "Voice relocation only happens when the member is connected to voice",
        "State lives in memory; a restart forgets active confinements",
    ]);

    let embed = embeds::standard_embed()
        .title("Confinement system")
        .description("Temporarily strip a member's roles and restore them later.")
        .field(
            "/confine",
            "`/confine user role duration [channel]`\n\
             Removes all of a member's roles, assigns the confinement role, and \
             optionally moves them to a voice channel. Everything is restored \
             automatically when the duration ends.",
            false,
        )
        .field(
            "/release",
            "`/release user`\nReleases a member early and restores their original roles.",
            false,
        )
        .field("/confinehelp", "Shows this help.", false)
        .field(
            "Required permissions",
            "You need **Manage Roles** to use `/confine` and `/release`.",
            false,
        )
        .field("Notes", notes, false)
        .thumbnail(bot_face)
        .timestamp(Timestamp::now());

    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}
