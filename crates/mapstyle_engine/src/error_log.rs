//! Error message container
//!
//! Layers collect the errors of style reads and writes here instead of
//! aborting the operation that caused them. The log keeps every message in
//! the order it was added; the first one is usually the root cause.

use std::fmt::Write;

/// Create an `ErrorMessage` that remembers where it was raised.
#[macro_export]
macro_rules! error_message {
    ($message:expr, $tag:expr) => {
        $crate::ErrorMessage::new($message, $tag).at(file!(), line!(), module_path!())
    };
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MessageFormat {
    #[default]
    Text,
    Html,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorMessage {
    message: String,
    /// Short description of the source, e.g. "Style"
    tag: String,
    file: String,
    line: u32,
    module: String,
}

impl ErrorMessage {
    pub fn new(message: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Attach the source location
    pub fn at(mut self, file: &str, line: u32, module: &str) -> Self {
        self.file = file.to_string();
        self.line = line;
        self.module = module.to_string();
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn module(&self) -> &str {
        &self.module
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorLog {
    messages: Vec<ErrorMessage>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message(message: impl Into<String>, tag: impl Into<String>) -> Self {
        let mut log = Self::new();
        log.append(message, tag);
        log
    }

    pub fn append(&mut self, message: impl Into<String>, tag: impl Into<String>) {
        self.messages.push(ErrorMessage::new(message, tag));
    }

    pub fn push(&mut self, message: ErrorMessage) {
        self.messages.push(message);
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn messages(&self) -> &[ErrorMessage] {
        &self.messages
    }

    /// Full error text, oldest message first
    pub fn message(&self, format: MessageFormat) -> String {
        let mut result = String::new();
        for msg in &self.messages {
            match format {
                MessageFormat::Text => {
                    if !result.is_empty() {
                        result.push('\n');
                    }
                    if msg.tag.is_empty() {
                        result.push_str(&msg.message);
                    } else {
                        let _ = write!(result, "{}: {}", msg.tag, msg.message);
                    }
                }
                MessageFormat::Html => {
                    let _ = write!(result, "<p><b>{}</b> {}", escape_html(&msg.tag), escape_html(&msg.message));
                    if cfg!(debug_assertions) && !msg.file.is_empty() {
                        let _ = write!(result, "<br>({}:{} {})", escape_html(&msg.file), msg.line, escape_html(&msg.module));
                    }
                    result.push_str("</p>");
                }
            }
        }
        result
    }

    /// Short description: the first message, which is the real error
    pub fn summary(&self) -> String {
        self.messages.first().map(|msg| msg.message.clone()).unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
