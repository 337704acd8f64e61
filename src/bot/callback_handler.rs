//! Callback Handler module for processing inline keyboard callback queries

use anyhow::Result;
use sqlx::SqlitePool;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::debug;

use crate::catalog::SizeCatalog;
use crate::dialogue::{SizeDialogue, SizeDialogueState};
use crate::matching::MeasurementUnit;
use crate::wizard::{WizardAction, WizardSession, WizardStep};

use super::dialogue_manager::{persist_result, refresh_panel};

const STALE_BUTTON_NOTICE: &str = "That button belongs to an older screen.";

/// Handle callback queries from inline keyboards
pub async fn callback_handler(
    bot: Bot,
    q: teloxide::types::CallbackQuery,
    pool: Arc<SqlitePool>,
    catalog: Arc<SizeCatalog>,
    dialogue: SizeDialogue,
) -> Result<()> {
    debug!(user_id = %q.from.id, "Received callback query from user");

    // `awaiting` carries the pending dimension entry, so pressing the unit
    // or help buttons in between does not cancel it.
    let (session, panel_message_id, awaiting) = match dialogue.get().await? {
        Some(SizeDialogueState::Active {
            session,
            panel_message_id,
        }) => (session, panel_message_id, None),
        Some(SizeDialogueState::AwaitingMeasurement {
            session,
            panel_message_id,
            dimension,
        }) => (session, panel_message_id, Some(dimension)),
        Some(SizeDialogueState::Idle) | None => {
            bot.answer_callback_query(q.id)
                .text("This panel is no longer active. Send /start to begin again.")
                .await?;
            return Ok(());
        }
    };

    let data = q.data.as_deref().unwrap_or("");
    let mut notice: Option<String> = None;

    if let Some(msg) = &q.message {
        let chat_id = msg.chat().id;

        if let Some(dimension) = data.strip_prefix("dim:") {
            if session.step != WizardStep::Measurements {
                notice = Some(STALE_BUTTON_NOTICE.to_string());
            } else {
                let title = dimension_title(&catalog, dimension);
                let prompt = format!("📏 Send your {} measurement in {}", title, session.unit);
                bot.send_message(chat_id, prompt).await?;

                dialogue
                    .update(SizeDialogueState::AwaitingMeasurement {
                        session,
                        panel_message_id,
                        dimension: dimension.to_string(),
                    })
                    .await?;
            }
        } else if let Some(name) = data.strip_prefix("help:") {
            apply_and_refresh(
                &bot,
                chat_id,
                &dialogue,
                &catalog,
                session,
                panel_message_id,
                awaiting,
                WizardAction::ToggleHelp(name.to_string()),
                &mut notice,
            )
            .await?;
        } else if let Some(unit_name) = data.strip_prefix("unit:") {
            match parse_unit(unit_name) {
                Some(unit) => {
                    apply_and_refresh(
                        &bot,
                        chat_id,
                        &dialogue,
                        &catalog,
                        session,
                        panel_message_id,
                        awaiting,
                        WizardAction::SetUnit(unit),
                        &mut notice,
                    )
                    .await?;
                }
                None => {
                    debug!(user_id = %q.from.id, data = %data, "Unknown unit in callback data");
                }
            }
        } else {
            match data {
                "begin" => {
                    if session.step != WizardStep::Intro {
                        notice = Some(STALE_BUTTON_NOTICE.to_string());
                    } else {
                        apply_and_refresh(
                            &bot,
                            chat_id,
                            &dialogue,
                            &catalog,
                            session,
                            panel_message_id,
                            None,
                            WizardAction::Advance,
                            &mut notice,
                        )
                        .await?;
                    }
                }
                "find" => {
                    if session.step != WizardStep::Measurements {
                        notice = Some(STALE_BUTTON_NOTICE.to_string());
                    } else {
                        match session.apply(WizardAction::Advance, &catalog.chart) {
                            Ok(next) => {
                                persist_result(&pool, chat_id, &next).await;
                                let panel_message_id =
                                    refresh_panel(&bot, chat_id, panel_message_id, &next, &catalog)
                                        .await?;
                                dialogue
                                    .update(SizeDialogueState::Active {
                                        session: next,
                                        panel_message_id,
                                    })
                                    .await?;
                            }
                            Err(e) => notice = Some(e.to_string()),
                        }
                    }
                }
                "back" => {
                    apply_and_refresh(
                        &bot,
                        chat_id,
                        &dialogue,
                        &catalog,
                        session,
                        panel_message_id,
                        None,
                        WizardAction::GoBack,
                        &mut notice,
                    )
                    .await?;
                }
                "restart" => {
                    apply_and_refresh(
                        &bot,
                        chat_id,
                        &dialogue,
                        &catalog,
                        session,
                        panel_message_id,
                        None,
                        WizardAction::StartOver,
                        &mut notice,
                    )
                    .await?;
                }
                _ => {
                    debug!(user_id = %q.from.id, data = %data, "Ignoring unknown callback data");
                }
            }
        }
    }

    // Answer the callback query to remove the loading state
    let mut answer = bot.answer_callback_query(q.id);
    if let Some(text) = notice {
        answer = answer.text(text);
    }
    answer.await?;

    Ok(())
}

/// Apply one wizard action and redraw the panel
///
/// A declined action only sets the toast notice; the dialogue keeps the
/// session it already holds.
#[allow(clippy::too_many_arguments)]
async fn apply_and_refresh(
    bot: &Bot,
    chat_id: ChatId,
    dialogue: &SizeDialogue,
    catalog: &SizeCatalog,
    session: WizardSession,
    panel_message_id: Option<i32>,
    awaiting: Option<String>,
    action: WizardAction,
    notice: &mut Option<String>,
) -> Result<()> {
    match session.apply(action, &catalog.chart) {
        Ok(next) => {
            let panel_message_id = refresh_panel(bot, chat_id, panel_message_id, &next, catalog).await?;
            let state = match awaiting {
                Some(dimension) => SizeDialogueState::AwaitingMeasurement {
                    session: next,
                    panel_message_id,
                    dimension,
                },
                None => SizeDialogueState::Active {
                    session: next,
                    panel_message_id,
                },
            };
            dialogue.update(state).await?;
        }
        Err(e) => *notice = Some(e.to_string()),
    }

    Ok(())
}

fn dimension_title<'a>(catalog: &'a SizeCatalog, dimension: &'a str) -> &'a str {
    catalog
        .guide(dimension)
        .map(|g| g.title.as_str())
        .unwrap_or(dimension)
}

fn parse_unit(name: &str) -> Option<MeasurementUnit> {
    match name {
        "cm" => Some(MeasurementUnit::Cm),
        "inch" => Some(MeasurementUnit::Inch),
        _ => None,
    }
}
