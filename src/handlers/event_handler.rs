use std::sync::Arc;

use poise::serenity_prelude::{self as serenity, FullEvent};
use tracing::{debug, info};

use crate::bot::data::Data;
use crate::bot::error::Error;
use crate::constants::embeds;
use crate::handlers::voice_state;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &FullEvent,
    _framework: poise::FrameworkContext<'_, Arc<Data>, Error>,
    data: &Arc<Data>,
) -> Result<(), Error> {
    match event {
        FullEvent::Ready { data_about_bot, .. } => {
            info!("Bot ready as {}", data_about_bot.user.name);
        }

        FullEvent::VoiceStateUpdate { old, new } => {
            voice_state::log_transition(data, old.as_ref(), new);
        }

        FullEvent::Message { new_message } => {
            // The old text commands were replaced by slash commands; point
            // people the right way instead of silently ignoring them
            if !new_message.author.bot && is_legacy_command(&new_message.content) {
                legacy_redirect(ctx, new_message).await;
            }
        }

        _ => {}
    }

    Ok(())
}

fn is_legacy_command(content: &str) -> bool {
    ["!confine", "!release", "!confinehelp"]
        .iter()
        .any(|prefix| content.starts_with(prefix))
}

async fn legacy_redirect(ctx: &serenity::Context, msg: &serenity::Message) {
    let embed = embeds::standard_embed()
        .title("Slash commands only")
        .description(
            "This bot uses slash commands now. Type `/` and look for:\n\
             • `/confine`\n\
             • `/release`\n\
             • `/confinehelp`",
        );

    let builder = serenity::CreateMessage::new()
        .embed(embed)
        .reference_message(msg);
    if let Err(e) = msg.channel_id.send_message(&ctx.http, builder).await {
        debug!("Could not send legacy-command redirect: {:?}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_legacy_command() {
        assert!(is_legacy_command("!confine @user"));
        assert!(is_legacy_command("!release @user"));
        assert!(is_legacy_command("!confinehelp"));
        assert!(!is_legacy_command("/confine"));
        assert!(!is_legacy_command("hello there"));
    }
}
