pub mod json;
pub mod text;

use serde::Serialize;

use crate::error::AppResult;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum OutputMode {
    Text,
    Json,
}

/// Command results go to stdout as plain lines or as one JSON document.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    mode: OutputMode,
}

impl Output {
    pub fn new(json: bool) -> Self {
        let mode = if json {
            OutputMode::Json
        } else {
            OutputMode::Text
        };
        Self { mode }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn emit<T: Serialize>(&self, text_line: &str, json_value: &T) -> AppResult<()> {
        self.emit_lines(&[text_line], json_value)
    }

    pub fn emit_lines<S, T>(&self, text_lines: &[S], json_value: &T) -> AppResult<()>
    where
        S: AsRef<str>,
        T: Serialize,
    {
        match self.mode {
            OutputMode::Text => text::print_lines(text_lines),
            OutputMode::Json => json::print(json_value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct CountView {
        subject: Option<String>,
        count: usize,
    }

    #[test]
    fn json_flag_selects_json_mode() {
        assert_eq!(Output::new(true).mode(), OutputMode::Json);
        assert_eq!(Output::new(false).mode(), OutputMode::Text);
    }

    #[test]
    fn renders_pretty_json() {
        let rendered = json::render(&CountView {
            subject: None,
            count: 3,
        })
        .expect("render");
        assert!(rendered.contains("\"count\": 3"));
        assert!(rendered.contains("\"subject\": null"));
    }
}
