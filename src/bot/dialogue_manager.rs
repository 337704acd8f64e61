//! Dialogue Manager module for handling dialogue state transitions

use anyhow::Result;
use sqlx::SqlitePool;
use teloxide::prelude::*;
use teloxide::types::MessageId;
use tracing::{debug, error};

use crate::catalog::SizeCatalog;
use crate::db::save_completed_session;
use crate::dialogue::{parse_measurement_entry, validate_product_url, SizeDialogue, SizeDialogueState};
use crate::wizard::{WizardAction, WizardError, WizardSession};

use super::ui_builder::{panel_keyboard, panel_text};

/// Redraw the wizard panel, editing it in place when one exists
///
/// Returns the panel message id to carry in the dialogue state. Edit
/// failures are logged and swallowed; Telegram rejects edits that change
/// nothing, and a stale panel is not worth breaking the conversation over.
pub async fn refresh_panel(
    bot: &Bot,
    chat_id: ChatId,
    panel_message_id: Option<i32>,
    session: &WizardSession,
    catalog: &SizeCatalog,
) -> Result<Option<i32>> {
    let text = panel_text(session, catalog);
    let keyboard = panel_keyboard(session, catalog);

    if let Some(msg_id) = panel_message_id {
        match bot
            .edit_message_text(chat_id, MessageId(msg_id), text)
            .reply_markup(keyboard)
            .await
        {
            Ok(_) => (),
            Err(e) => error!(user_id = %chat_id, error = %e, "Failed to edit wizard panel"),
        }
        Ok(Some(msg_id))
    } else {
        let sent = bot.send_message(chat_id, text).reply_markup(keyboard).await?;
        Ok(Some(sent.id.0 as i32))
    }
}

/// Handle product URL input during dialogue
#[allow(clippy::too_many_arguments)]
pub async fn handle_product_url_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SizeDialogue,
    catalog: &SizeCatalog,
    url_input: &str,
    session: WizardSession,
    panel_message_id: Option<i32>,
) -> Result<()> {
    // Validate product URL
    let validated_url = match validate_product_url(url_input) {
        Ok(url) => url,
        Err("too_long") => {
            bot.send_message(msg.chat.id, "That link is too long. Please send a shorter URL.")
                .await?;
            // Keep dialogue active, user can try again
            return Ok(());
        }
        Err(_) => {
            bot.send_message(msg.chat.id, "Please enter a product URL.").await?;
            // Keep dialogue active, user can try again
            return Ok(());
        }
    };

    let with_url = match session.apply(WizardAction::SetProductUrl(validated_url), &catalog.chart) {
        Ok(next) => next,
        Err(e) => {
            bot.send_message(msg.chat.id, e.to_string()).await?;
            return Ok(());
        }
    };

    match with_url.apply(WizardAction::Advance, &catalog.chart) {
        Ok(next) => {
            let panel_message_id =
                refresh_panel(bot, msg.chat.id, panel_message_id, &next, catalog).await?;
            dialogue
                .update(SizeDialogueState::Active {
                    session: next,
                    panel_message_id,
                })
                .await?;
        }
        Err(WizardError::Classification(e)) => {
            debug!(user_id = %msg.chat.id, error = %e, "Product URL could not be classified");
            bot.send_message(msg.chat.id, e.to_string()).await?;
            // Keep the typed link around so the shopper can compare and resend
            dialogue
                .update(SizeDialogueState::Active {
                    session: with_url,
                    panel_message_id,
                })
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, e.to_string()).await?;
            // Keep dialogue active, user can try again
        }
    }

    Ok(())
}

/// Handle the value reply after a dimension button was pressed
#[allow(clippy::too_many_arguments)]
pub async fn handle_measurement_value_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SizeDialogue,
    catalog: &SizeCatalog,
    value_input: &str,
    session: WizardSession,
    panel_message_id: Option<i32>,
    dimension: String,
) -> Result<()> {
    let action = WizardAction::SetMeasurement {
        dimension,
        value: value_input.to_string(),
    };

    match session.apply(action, &catalog.chart) {
        Ok(next) => {
            let panel_message_id =
                refresh_panel(bot, msg.chat.id, panel_message_id, &next, catalog).await?;
            dialogue
                .update(SizeDialogueState::Active {
                    session: next,
                    panel_message_id,
                })
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, e.to_string()).await?;
            // Drop back to the panel without the pending dimension
            dialogue
                .update(SizeDialogueState::Active {
                    session,
                    panel_message_id,
                })
                .await?;
        }
    }

    Ok(())
}

/// Handle "dimension value" text typed directly on the measurements screen
#[allow(clippy::too_many_arguments)]
pub async fn handle_quick_entry_input(
    bot: &Bot,
    msg: &Message,
    dialogue: SizeDialogue,
    catalog: &SizeCatalog,
    text: &str,
    session: WizardSession,
    panel_message_id: Option<i32>,
) -> Result<()> {
    let (dimension, value) = match parse_measurement_entry(text) {
        Some(pair) => pair,
        None => {
            bot.send_message(
                msg.chat.id,
                "Tap a dimension button, or type a value like: waist 76",
            )
            .await?;
            return Ok(());
        }
    };

    if !session.dimensions().contains(&dimension.as_str()) {
        let expected = session.dimensions().join(", ");
        let reply = if expected.is_empty() {
            format!("'{dimension}' is not a dimension I can use here.")
        } else {
            format!(
                "'{dimension}' is not one of the dimensions for this product. Expected: {expected}."
            )
        };
        bot.send_message(msg.chat.id, reply).await?;
        return Ok(());
    }

    let action = WizardAction::SetMeasurement { dimension, value };
    match session.apply(action, &catalog.chart) {
        Ok(next) => {
            let panel_message_id =
                refresh_panel(bot, msg.chat.id, panel_message_id, &next, catalog).await?;
            dialogue
                .update(SizeDialogueState::Active {
                    session: next,
                    panel_message_id,
                })
                .await?;
        }
        Err(e) => {
            bot.send_message(msg.chat.id, e.to_string()).await?;
            // Keep dialogue active, user can try again
        }
    }

    Ok(())
}

/// Store a finished walk, logging instead of failing the conversation
pub async fn persist_result(pool: &SqlitePool, chat_id: ChatId, session: &WizardSession) {
    match save_completed_session(pool, chat_id.0, session).await {
        Ok(session_id) => {
            debug!(user_id = %chat_id, session_id = session_id, "Stored completed session");
        }
        Err(e) => {
            error!(user_id = %chat_id, error = %e, "Failed to store completed session");
        }
    }
}
