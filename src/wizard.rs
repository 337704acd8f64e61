//! # Size Wizard State Machine
//!
//! The guided flow a shopper walks through: paste a product link, enter
//! measurements, get a size. All transition rules live here, with no
//! Telegram types in sight, so the whole flow is testable as plain values.
//!
//! ## Core Concepts
//!
//! - **WizardStep**: the four screens, in order: intro, link entry,
//!   measurements, results
//! - **WizardSession**: everything gathered so far; cheap to clone and
//!   serializable for storage
//! - **WizardAction**: one shopper interaction (button press or text entry)
//! - **apply**: takes a session by reference and returns the *next* session,
//!   or an error explaining why the action was declined. A declined action
//!   never leaves a half-updated session behind; the caller simply keeps the
//!   one it already has.
//!
//! ## Usage
//!
//! ```rust
//! use size_finder::catalog::default_catalog;
//! use size_finder::wizard::{WizardAction, WizardSession, WizardStep};
//!
//! let catalog = default_catalog();
//! let url = "https://shop.example.com/women/dresses/floral-42";
//!
//! let session = WizardSession::new()
//!     .apply(WizardAction::Advance, &catalog.chart)
//!     .unwrap()
//!     .apply(WizardAction::SetProductUrl(url.to_string()), &catalog.chart)
//!     .unwrap()
//!     .apply(WizardAction::Advance, &catalog.chart)
//!     .unwrap();
//!
//! assert_eq!(session.step, WizardStep::Measurements);
//! assert_eq!(session.dimensions(), &["bust", "waist", "hips", "length"][..]);
//! ```

use crate::catalog::{dimensions_for, Category, Gender, SizeChart};
use crate::matching::{recommend, MeasurementUnit, UserMeasurements, SIZE_NOT_FOUND};
use crate::url_classifier::{classify_product_url, ClassificationError};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// The four wizard screens, in walk order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Intro,
    UrlInput,
    Measurements,
    Results,
}

impl WizardStep {
    /// Zero-based position in the walk order
    pub fn index(&self) -> usize {
        match self {
            WizardStep::Intro => 0,
            WizardStep::UrlInput => 1,
            WizardStep::Measurements => 2,
            WizardStep::Results => 3,
        }
    }

    fn previous(&self) -> WizardStep {
        match self {
            WizardStep::Intro | WizardStep::UrlInput => WizardStep::Intro,
            WizardStep::Measurements => WizardStep::UrlInput,
            WizardStep::Results => WizardStep::Measurements,
        }
    }
}

/// One shopper interaction with the wizard
#[derive(Debug, Clone, PartialEq)]
pub enum WizardAction {
    /// Store the product link as typed
    SetProductUrl(String),
    /// Move to the next step, running the checks that step requires
    Advance,
    /// Move one step back (stays put on the intro screen)
    GoBack,
    /// Switch the unit measurements are entered in
    SetUnit(MeasurementUnit),
    /// Store one raw measurement value; an empty value clears the dimension
    SetMeasurement { dimension: String, value: String },
    /// Show the how-to-measure guide for a dimension, or hide it again
    ToggleHelp(String),
    /// Reset the whole session, keeping only the chosen unit
    StartOver,
}

/// Why an action was declined
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    /// Tried to leave the link screen without a link
    MissingProductUrl,
    /// The link had no usable gender or category keywords
    Classification(ClassificationError),
    /// Tried to ask for a size with every measurement still blank
    NoMeasurementsProvided,
    /// The session reached the measurements step without a classified link
    NotClassified,
    /// The action does not exist on the current step
    Unavailable,
}

impl fmt::Display for WizardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardError::MissingProductUrl => write!(f, "Please enter a product URL first."),
            WizardError::Classification(e) => write!(f, "{e}"),
            WizardError::NoMeasurementsProvided => {
                write!(f, "Please enter at least one measurement.")
            }
            WizardError::NotClassified => {
                write!(f, "No product type detected yet. Go back and enter the product link again.")
            }
            WizardError::Unavailable => write!(f, "That action is not available right now."),
        }
    }
}

impl std::error::Error for WizardError {}

impl From<ClassificationError> for WizardError {
    fn from(e: ClassificationError) -> Self {
        WizardError::Classification(e)
    }
}

/// Everything gathered during one wizard walk
///
/// Measurement values stay the raw strings the shopper typed; they are only
/// parsed when a size is computed. Switching units therefore never rewrites
/// them, which matches what the input fields show on screen.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WizardSession {
    pub step: WizardStep,
    pub product_url: String,
    pub gender: Option<Gender>,
    pub category: Option<Category>,
    pub unit: MeasurementUnit,
    pub measurements: UserMeasurements,
    /// Dimension whose how-to-measure guide is currently open
    pub active_help_dimension: Option<String>,
    /// Outcome of the last size computation, either a label or
    /// [`SIZE_NOT_FOUND`]
    pub recommended_size: Option<String>,
}

impl WizardSession {
    /// A fresh session on the intro screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action, producing the next session state
    ///
    /// On `Err` the session the caller holds is still the current one; no
    /// action leaves partial changes behind.
    pub fn apply(&self, action: WizardAction, chart: &SizeChart) -> Result<WizardSession, WizardError> {
        match action {
            WizardAction::SetProductUrl(url) => self.set_product_url(url),
            WizardAction::Advance => self.advance(chart),
            WizardAction::GoBack => Ok(self.go_back()),
            WizardAction::SetUnit(unit) => self.set_unit(unit),
            WizardAction::SetMeasurement { dimension, value } => {
                self.set_measurement(dimension, value)
            }
            WizardAction::ToggleHelp(dimension) => self.toggle_help(dimension),
            WizardAction::StartOver => Ok(self.start_over()),
        }
    }

    /// The dimensions collected for this session's classified pair
    ///
    /// Empty until the link is classified, and empty for pairs the chart
    /// does not cover.
    pub fn dimensions(&self) -> &'static [&'static str] {
        match (self.gender, self.category) {
            (Some(gender), Some(category)) => dimensions_for(gender, category),
            _ => &[],
        }
    }

    fn set_product_url(&self, url: String) -> Result<WizardSession, WizardError> {
        if self.step != WizardStep::UrlInput {
            return Err(WizardError::Unavailable);
        }
        let mut next = self.clone();
        next.product_url = url;
        Ok(next)
    }

    fn advance(&self, chart: &SizeChart) -> Result<WizardSession, WizardError> {
        match self.step {
            WizardStep::Intro => {
                let mut next = self.clone();
                next.step = WizardStep::UrlInput;
                Ok(next)
            }
            WizardStep::UrlInput => {
                if self.product_url.is_empty() {
                    return Err(WizardError::MissingProductUrl);
                }
                let classification = classify_product_url(&self.product_url)?;
                debug!(
                    gender = %classification.gender,
                    category = %classification.category,
                    "Classified product URL"
                );
                let mut next = self.clone();
                next.gender = Some(classification.gender);
                next.category = Some(classification.category);
                next.step = WizardStep::Measurements;
                Ok(next)
            }
            WizardStep::Measurements => {
                let (gender, category) = match (self.gender, self.category) {
                    (Some(g), Some(c)) => (g, c),
                    _ => return Err(WizardError::NotClassified),
                };
                if !self.has_measurement() {
                    return Err(WizardError::NoMeasurementsProvided);
                }

                // A supplied value that fails to parse still counts as
                // "entered", so the walk proceeds and lands on the
                // not-found result instead of blocking.
                let size = recommend(chart, gender, category, &self.measurements, self.unit)
                    .unwrap_or_else(|| SIZE_NOT_FOUND.to_string());
                debug!(gender = %gender, category = %category, size = %size, "Computed size recommendation");

                let mut next = self.clone();
                next.recommended_size = Some(size);
                next.step = WizardStep::Results;
                Ok(next)
            }
            WizardStep::Results => Err(WizardError::Unavailable),
        }
    }

    fn go_back(&self) -> WizardSession {
        // Only the step moves; everything gathered so far stays, including
        // a stale recommendation when stepping back from the results.
        let mut next = self.clone();
        next.step = self.step.previous();
        next
    }

    fn set_unit(&self, unit: MeasurementUnit) -> Result<WizardSession, WizardError> {
        if self.step != WizardStep::Measurements {
            return Err(WizardError::Unavailable);
        }
        // Raw measurement strings are deliberately left alone: the shopper
        // sees exactly what they typed and re-enters values if the unit was
        // wrong.
        let mut next = self.clone();
        next.unit = unit;
        Ok(next)
    }

    fn set_measurement(&self, dimension: String, value: String) -> Result<WizardSession, WizardError> {
        if self.step != WizardStep::Measurements {
            return Err(WizardError::Unavailable);
        }
        let mut next = self.clone();
        if value.trim().is_empty() {
            next.measurements.remove(&dimension);
        } else {
            next.measurements.insert(dimension, value);
        }
        Ok(next)
    }

    fn toggle_help(&self, dimension: String) -> Result<WizardSession, WizardError> {
        if self.step != WizardStep::Measurements {
            return Err(WizardError::Unavailable);
        }
        let mut next = self.clone();
        next.active_help_dimension = match &self.active_help_dimension {
            Some(open) if *open == dimension => None,
            _ => Some(dimension),
        };
        Ok(next)
    }

    fn start_over(&self) -> WizardSession {
        // The unit survives a restart; everything else resets.
        WizardSession {
            unit: self.unit,
            ..WizardSession::default()
        }
    }

    fn has_measurement(&self) -> bool {
        self.measurements.values().any(|v| !v.trim().is_empty())
    }
}
