//! Message Handler module for processing incoming Telegram messages

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{debug, error};

use crate::catalog::SizeCatalog;
use crate::db::recent_sessions;
use crate::dialogue::{SizeDialogue, SizeDialogueState};
use crate::wizard::{WizardAction, WizardSession, WizardStep};

use super::dialogue_manager::{
    handle_measurement_value_input, handle_product_url_input, handle_quick_entry_input,
    refresh_panel,
};
use super::ui_builder::format_history;

/// How many past results the history command shows
const HISTORY_LIMIT: i64 = 5;

fn help_text() -> String {
    [
        "ℹ️ **How it works**",
        "1. Send /start and tap Get started",
        "2. Paste the product page link",
        "3. Enter your measurements in cm or inch",
        "4. Tap Find my size",
        "Commands:\n/start - begin or restart the wizard\n/help - this message\n/history - your recent results",
    ]
    .join("\n\n")
}

async fn handle_command(
    bot: &Bot,
    msg: &Message,
    text: &str,
    pool: &SqlitePool,
    catalog: &SizeCatalog,
    dialogue: SizeDialogue,
) -> Result<()> {
    match text {
        "/start" => {
            // Restarting an existing walk keeps the chosen unit
            let session = match dialogue.get().await? {
                Some(SizeDialogueState::Active { session, .. })
                | Some(SizeDialogueState::AwaitingMeasurement { session, .. }) => session
                    .apply(WizardAction::StartOver, &catalog.chart)
                    .unwrap_or_else(|_| WizardSession::new()),
                _ => WizardSession::new(),
            };

            // A fresh walk gets a fresh panel message
            let panel_message_id = refresh_panel(bot, msg.chat.id, None, &session, catalog).await?;
            dialogue
                .update(SizeDialogueState::Active {
                    session,
                    panel_message_id,
                })
                .await?;
        }
        "/help" => {
            bot.send_message(msg.chat.id, help_text()).await?;
        }
        "/history" => match recent_sessions(pool, msg.chat.id.0, HISTORY_LIMIT).await {
            Ok(records) => {
                bot.send_message(msg.chat.id, format_history(&records)).await?;
            }
            Err(e) => {
                error!(user_id = %msg.chat.id, error = %e, "Failed to load session history");
                bot.send_message(msg.chat.id, "Could not load your history right now.")
                    .await?;
            }
        },
        _ => {
            bot.send_message(msg.chat.id, "Unknown command. Send /help to see what I understand.")
                .await?;
        }
    }

    Ok(())
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    pool: &SqlitePool,
    catalog: &SizeCatalog,
    dialogue: SizeDialogue,
) -> Result<()> {
    if let Some(text) = msg.text() {
        debug!(user_id = %msg.chat.id, message_length = text.len(), "Received text message from user");

        // Commands always win over dialogue input, so /start works mid-walk
        if text.starts_with('/') {
            return handle_command(bot, msg, text, pool, catalog, dialogue).await;
        }

        // Check dialogue state first
        let dialogue_state = dialogue.get().await?;
        match dialogue_state {
            Some(SizeDialogueState::AwaitingMeasurement {
                session,
                panel_message_id,
                dimension,
            }) => {
                return handle_measurement_value_input(
                    bot,
                    msg,
                    dialogue,
                    catalog,
                    text,
                    session,
                    panel_message_id,
                    dimension,
                )
                .await;
            }
            Some(SizeDialogueState::Active {
                session,
                panel_message_id,
            }) => {
                return match session.step {
                    WizardStep::UrlInput => {
                        handle_product_url_input(
                            bot,
                            msg,
                            dialogue,
                            catalog,
                            text,
                            session,
                            panel_message_id,
                        )
                        .await
                    }
                    WizardStep::Measurements => {
                        handle_quick_entry_input(
                            bot,
                            msg,
                            dialogue,
                            catalog,
                            text,
                            session,
                            panel_message_id,
                        )
                        .await
                    }
                    _ => {
                        bot.send_message(
                            msg.chat.id,
                            "Use the buttons on the wizard panel, or send /start to restart.",
                        )
                        .await?;
                        Ok(())
                    }
                };
            }
            Some(SizeDialogueState::Idle) | None => {
                bot.send_message(
                    msg.chat.id,
                    "Send /start to find your size, or /help for an overview.",
                )
                .await?;
            }
        }
    }

    Ok(())
}

async fn handle_unsupported_message(bot: &Bot, msg: &Message) -> Result<()> {
    debug!(user_id = %msg.chat.id, "Received unsupported message type from user");

    bot.send_message(
        msg.chat.id,
        "I can only work with text messages. Send /start to launch the size wizard.",
    )
    .await?;

    Ok(())
}

pub async fn message_handler(
    bot: Bot,
    msg: Message,
    pool: Arc<SqlitePool>,
    catalog: Arc<SizeCatalog>,
    dialogue: SizeDialogue,
) -> Result<()> {
    if msg.text().is_some() {
        handle_text_message(&bot, &msg, &pool, &catalog, dialogue).await?;
    } else {
        handle_unsupported_message(&bot, &msg).await?;
    }

    Ok(())
}
