//! Two-screen presentation controller
//!
//! `Shell` tracks which screen is shown and the detection input, and turns a
//! check into the messages the user sees. It knows nothing about HTML or the
//! terminal; the server and the `check` command both render its outcomes.

use spamscan_classifiers::PredictionService;
use spamscan_core::{EmailText, PredictionResult, Result};
use std::fmt;

/// Warning shown when the Check button is pressed with blank input
pub const EMPTY_INPUT_WARNING: &str = "Please enter the email content first.";

/// Anything that can classify one email
pub trait Predictor: Send + Sync {
    fn predict(&self, raw: &str) -> Result<PredictionResult>;
}

impl Predictor for PredictionService {
    fn predict(&self, raw: &str) -> Result<PredictionResult> {
        PredictionService::predict(self, raw)
    }
}

/// Screens selectable from the sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Landing,
    Detection,
}

impl Screen {
    /// Sidebar order
    pub const ALL: [Screen; 2] = [Screen::Landing, Screen::Detection];

    /// Sidebar label
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Landing => "Home",
            Screen::Detection => "Spam Detection",
        }
    }

    /// Route serving this screen
    pub fn path(&self) -> &'static str {
        match self {
            Screen::Landing => "/",
            Screen::Detection => "/detect",
        }
    }
}

/// Severity of a rendered message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Success,
    Info,
    Warning,
    Error,
}

impl MessageLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageLevel::Success => "success",
            MessageLevel::Info => "info",
            MessageLevel::Warning => "warning",
            MessageLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Result of pressing Check
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Input was blank; nothing was classified
    Warning(String),
    /// The email was classified
    Verdict(PredictionResult),
    /// The prediction failed; no result is shown
    Failed(String),
}

impl CheckOutcome {
    /// Messages to display, in order
    pub fn messages(&self) -> Vec<Message> {
        match self {
            CheckOutcome::Warning(text) => vec![Message {
                level: MessageLevel::Warning,
                text: text.clone(),
            }],
            CheckOutcome::Verdict(result) => vec![
                Message {
                    level: MessageLevel::Success,
                    text: format!("Prediction result: {}", result.label.display_name()),
                },
                Message {
                    level: MessageLevel::Info,
                    text: format!(
                        "Detection confidence for this input: {}",
                        result.confidence_percent()
                    ),
                },
            ],
            CheckOutcome::Failed(reason) => vec![Message {
                level: MessageLevel::Error,
                text: format!("Prediction failed: {}", reason),
            }],
        }
    }
}

/// UI state: the current screen and the detection text area
#[derive(Debug, Clone, Default)]
pub struct Shell {
    screen: Screen,
    input: String,
}

impl Shell {
    /// Start on the landing screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Navigate to the detection screen with `text` in the input area
    pub fn detecting(text: impl Into<String>) -> Self {
        let mut shell = Self::new();
        shell.navigate(Screen::Detection);
        shell.set_input(text);
        shell
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Switch screens. Returns false when `screen` is already shown.
    pub fn navigate(&mut self, screen: Screen) -> bool {
        if self.screen == screen {
            return false;
        }
        self.screen = screen;
        true
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Classify the current input.
    ///
    /// Blank input yields the warning without calling `predictor`.
    pub fn check(&self, predictor: &dyn Predictor) -> CheckOutcome {
        let text = match EmailText::parse(&self.input) {
            Ok(text) => text,
            Err(_) => return CheckOutcome::Warning(EMPTY_INPUT_WARNING.to_string()),
        };

        match predictor.predict(text.as_str()) {
            Ok(result) => CheckOutcome::Verdict(result),
            Err(e) => CheckOutcome::Failed(e.to_string()),
        }
    }
}
