//! Dialogue state for the size finder conversation.

use crate::wizard::WizardSession;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Conversation state wrapped around the wizard session
///
/// `panel_message_id` is the wizard panel message the bot keeps editing in
/// place; it is `None` until the first panel has been sent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub enum SizeDialogueState {
    #[default]
    Idle,
    /// A wizard walk is in progress
    Active {
        session: WizardSession,
        panel_message_id: Option<i32>,
    },
    /// A dimension button was pressed; the next text message is its value
    AwaitingMeasurement {
        session: WizardSession,
        panel_message_id: Option<i32>,
        dimension: String,
    },
}

/// Type alias for our size finder dialogue
pub type SizeDialogue = Dialogue<SizeDialogueState, InMemStorage<SizeDialogueState>>;

/// Validates a product URL input
pub fn validate_product_url(url: &str) -> Result<String, &'static str> {
    let trimmed = url.trim();

    if trimmed.is_empty() {
        return Err("empty");
    }

    if trimmed.len() > 2048 {
        return Err("too_long");
    }

    Ok(trimmed.to_string())
}

lazy_static! {
    /// "waist 76", "waist: 76" and "waist:76" forms of quick entry
    static ref QUICK_ENTRY_REGEX: Regex =
        Regex::new(r"^\s*([A-Za-z]+)(?:\s+|\s*:\s*)(.+?)\s*$").expect("Invalid quick entry regex");
}

/// Parses a "dimension value" quick entry line
///
/// Lets the shopper type `waist 76` on the measurements screen without
/// pressing the dimension button first. The dimension name is lowercased to
/// match the catalog keys; the value is kept raw.
pub fn parse_measurement_entry(text: &str) -> Option<(String, String)> {
    let captures = QUICK_ENTRY_REGEX.captures(text)?;
    let dimension = captures.get(1)?.as_str().to_lowercase();
    let value = captures.get(2)?.as_str().to_string();
    Some((dimension, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_url_validation() {
        // Valid URLs
        assert!(validate_product_url("https://shop.example.com/men/tops/tee-1").is_ok());
        assert!(validate_product_url("  https://shop.example.com/women/dresses/d-2  ").is_ok());

        // Invalid URLs
        assert!(validate_product_url("").is_err());
        assert!(validate_product_url("   ").is_err());
        assert!(validate_product_url(&"a".repeat(2049)).is_err());
    }

    #[test]
    fn test_product_url_trimming() {
        let result = validate_product_url("  https://shop.example.com/men/tops/tee-1  ");
        assert_eq!(result.unwrap(), "https://shop.example.com/men/tops/tee-1");
    }

    #[test]
    fn test_quick_entry_forms() {
        assert_eq!(
            parse_measurement_entry("waist 76"),
            Some(("waist".to_string(), "76".to_string()))
        );
        assert_eq!(
            parse_measurement_entry("Waist: 76.5"),
            Some(("waist".to_string(), "76.5".to_string()))
        );
        assert_eq!(
            parse_measurement_entry("inseam:81"),
            Some(("inseam".to_string(), "81".to_string()))
        );
    }

    #[test]
    fn test_quick_entry_keeps_value_raw() {
        // Whatever follows the dimension is the raw value; parsing it is
        // the matcher's job.
        assert_eq!(
            parse_measurement_entry("waist 56,5"),
            Some(("waist".to_string(), "56,5".to_string()))
        );
    }

    #[test]
    fn test_quick_entry_rejects_bare_values() {
        assert_eq!(parse_measurement_entry("76"), None);
        assert_eq!(parse_measurement_entry(""), None);
        assert_eq!(parse_measurement_entry("waist76"), None);
    }
}
