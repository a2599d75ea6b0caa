//! User-facing notifications
//!
//! Jobs report their outcome through a [`Messenger`] instead of returning
//! strings, so the CLI and tests can each decide how messages are shown.

use std::fmt;
use std::sync::Mutex;

/// Severity of a user message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Status,
    Warning,
    Error,
}

impl fmt::Display for MessageLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageLevel::Status => write!(f, "status"),
            MessageLevel::Warning => write!(f, "warning"),
            MessageLevel::Error => write!(f, "error"),
        }
    }
}

/// A message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

/// Sink for user-facing messages
pub trait Messenger: Send + Sync {
    /// Record a message
    fn add_message(&self, level: MessageLevel, text: &str);

    fn add_status(&self, text: &str) {
        self.add_message(MessageLevel::Status, text);
    }

    fn add_warning(&self, text: &str) {
        self.add_message(MessageLevel::Warning, text);
    }

    fn add_error(&self, text: &str) {
        self.add_message(MessageLevel::Error, text);
    }
}

/// Prints messages to the terminal and mirrors them into the log
#[derive(Debug, Default)]
pub struct ConsoleMessenger;

impl Messenger for ConsoleMessenger {
    fn add_message(&self, level: MessageLevel, text: &str) {
        match level {
            MessageLevel::Status => {
                tracing::info!(message_level = %level, "{text}");
                println!("✅ {text}");
            }
            MessageLevel::Warning => {
                tracing::warn!(message_level = %level, "{text}");
                println!("⚠️  {text}");
            }
            MessageLevel::Error => {
                tracing::error!(message_level = %level, "{text}");
                eprintln!("❌ {text}");
            }
        }
    }
}

/// Keeps messages in memory for later inspection
#[derive(Debug, Default)]
pub struct MemoryMessenger {
    messages: Mutex<Vec<Message>>,
}

impl MemoryMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages in the order they were added
    pub fn messages(&self) -> Vec<Message> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn statuses(&self) -> Vec<String> {
        self.texts(MessageLevel::Status)
    }

    pub fn warnings(&self) -> Vec<String> {
        self.texts(MessageLevel::Warning)
    }

    pub fn errors(&self) -> Vec<String> {
        self.texts(MessageLevel::Error)
    }

    fn texts(&self, level: MessageLevel) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|m| m.level == level)
            .map(|m| m.text)
            .collect()
    }
}

impl Messenger for MemoryMessenger {
    fn add_message(&self, level: MessageLevel, text: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Message {
                level,
                text: text.to_string(),
            });
    }
}
