use std::fmt;

/// Search filter for message listing. No subject matches the whole mailbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    subject: Option<String>,
}

impl SearchQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// Blank subjects fall back to matching everything; any other value is
    /// kept exactly as given.
    pub fn with_subject(subject: impl Into<String>) -> Self {
        let subject = subject.into();
        Self {
            subject: (!subject.trim().is_empty()).then_some(subject),
        }
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Renders the filter in the provider's search grammar.
    pub fn to_provider_query(&self) -> Option<String> {
        self.subject
            .as_ref()
            .map(|subject| format!("subject:{subject}"))
    }
}

impl fmt::Display for SearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subject {
            Some(subject) => write!(f, "subject:{subject}"),
            None => f.write_str("(all messages)"),
        }
    }
}
