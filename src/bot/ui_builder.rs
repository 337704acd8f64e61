//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::catalog::{Gender, SizeCatalog};
use crate::db::SessionRecord;
use crate::matching::{MeasurementUnit, SIZE_NOT_FOUND};
use crate::wizard::{WizardSession, WizardStep};

/// Render the wizard panel text for the session's current step
pub fn panel_text(session: &WizardSession, catalog: &SizeCatalog) -> String {
    let step_line = format!("Step {} of 4", session.step.index() + 1);

    match session.step {
        WizardStep::Intro => format!(
            "📏 **Size Finder**\n\nPaste a product link from the shop and I will match \
             your measurements against its size chart.\n\n{step_line}"
        ),
        WizardStep::UrlInput => {
            let mut text = format!(
                "🔗 **Product Link**\n\nSend me the product page URL. I will detect the \
                 gender and category from it.\n\n{step_line}"
            );
            if !session.product_url.is_empty() {
                text.push_str(&format!("\nCurrent link: {}", session.product_url));
            }
            text
        }
        WizardStep::Measurements => measurements_text(session, catalog, &step_line),
        WizardStep::Results => results_text(session, &step_line),
    }
}

fn measurements_text(session: &WizardSession, catalog: &SizeCatalog, step_line: &str) -> String {
    let headline = pair_headline(session).unwrap_or_else(|| "your product".to_string());
    let mut text = format!(
        "📐 **Measurements** ({headline})\n\nUnit: {}\n",
        session.unit
    );

    let dims = session.dimensions();
    if dims.is_empty() {
        text.push_str("\nNo size table covers this combination. Go back and try another link.\n");
    } else {
        for name in dims.iter().copied() {
            let title = dimension_title(catalog, name);
            match session.measurements.get(name) {
                Some(value) => {
                    text.push_str(&format!("• {title}: {value} {}\n", session.unit));
                }
                None => text.push_str(&format!("• {title}: (not set)\n")),
            }
        }
    }

    if let Some(open) = &session.active_help_dimension {
        if let Some(guide) = catalog.guide(open) {
            text.push_str(&format!("\nℹ️ **{}**: {}\n", guide.title, guide.description));
        }
    }

    text.push_str("\nTap a dimension and send its value, or type for example: waist 76\n\n");
    text.push_str(step_line);
    text
}

fn results_text(session: &WizardSession, step_line: &str) -> String {
    let size = session.recommended_size.as_deref().unwrap_or(SIZE_NOT_FOUND);

    if size == SIZE_NOT_FOUND {
        format!(
            "😕 **Size not found**\n\nNone of the chart sizes matched the values you \
             entered. Check your measurements and try again.\n\n{step_line}"
        )
    } else {
        let about = pair_headline(session)
            .map(|h| format!(" for {h}"))
            .unwrap_or_default();
        format!(
            "🎯 **Recommended size: {size}**\n\nBased on your measurements{about}.\n{}\n\n{step_line}",
            session.product_url
        )
    }
}

/// Build the inline keyboard for the session's current step
pub fn panel_keyboard(session: &WizardSession, catalog: &SizeCatalog) -> InlineKeyboardMarkup {
    let mut buttons: Vec<Vec<InlineKeyboardButton>> = Vec::new();

    match session.step {
        WizardStep::Intro => {
            buttons.push(vec![InlineKeyboardButton::callback("🚀 Get started", "begin")]);
        }
        WizardStep::UrlInput => {
            buttons.push(vec![InlineKeyboardButton::callback("⬅️ Back", "back")]);
        }
        WizardStep::Measurements => {
            // One row per dimension: the value button plus a help toggle
            for name in session.dimensions().iter().copied() {
                let title = dimension_title(catalog, name);
                let label = match session.measurements.get(name) {
                    Some(value) => truncate_button_label(format!("📐 {title}: {value}")),
                    None => format!("📐 {title}"),
                };
                buttons.push(vec![
                    InlineKeyboardButton::callback(label, format!("dim:{name}")),
                    InlineKeyboardButton::callback("❓".to_string(), format!("help:{name}")),
                ]);
            }

            buttons.push(vec![
                InlineKeyboardButton::callback(unit_label(MeasurementUnit::Cm, session.unit), "unit:cm"),
                InlineKeyboardButton::callback(
                    unit_label(MeasurementUnit::Inch, session.unit),
                    "unit:inch",
                ),
            ]);
            buttons.push(vec![
                InlineKeyboardButton::callback("⬅️ Back", "back"),
                InlineKeyboardButton::callback("✅ Find my size", "find"),
            ]);
        }
        WizardStep::Results => {
            buttons.push(vec![
                InlineKeyboardButton::callback("⬅️ Back", "back"),
                InlineKeyboardButton::callback("🔄 Start over", "restart"),
            ]);
        }
    }

    InlineKeyboardMarkup::new(buttons)
}

/// Format past results as a simple numbered list
pub fn format_history(records: &[SessionRecord]) -> String {
    if records.is_empty() {
        return "You have no saved results yet. Send /start to find your size.".to_string();
    }

    let mut result = String::from("🕘 **Your recent sizes**\n\n");

    for (i, record) in records.iter().enumerate() {
        result.push_str(&format!(
            "{}. **{}** → {} {}\n    {} ({})\n",
            i + 1,
            record.recommended_size,
            record.gender,
            record.category,
            record.product_url,
            record.created_at.format("%Y-%m-%d")
        ));
    }

    result
}

fn dimension_title<'a>(catalog: &'a SizeCatalog, dimension: &'a str) -> &'a str {
    catalog
        .guide(dimension)
        .map(|g| g.title.as_str())
        .unwrap_or(dimension)
}

fn pair_headline(session: &WizardSession) -> Option<String> {
    match (session.gender, session.category) {
        (Some(gender), Some(category)) => {
            Some(format!("{} {}", gender_label(gender), category.as_str()))
        }
        _ => None,
    }
}

fn gender_label(gender: Gender) -> &'static str {
    match gender {
        Gender::Men => "Men's",
        Gender::Women => "Women's",
    }
}

fn unit_label(unit: MeasurementUnit, active: MeasurementUnit) -> String {
    if unit == active {
        format!("✅ {unit}")
    } else {
        unit.to_string()
    }
}

fn truncate_button_label(label: String) -> String {
    // Keep button text short enough to render; counted in characters so a
    // multi-byte value never splits mid-character.
    if label.chars().count() > 24 {
        let truncated: String = label.chars().take(21).collect();
        format!("{truncated}...")
    } else {
        label
    }
}
