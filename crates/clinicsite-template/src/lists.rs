//! HTML list fragments.

/// Builds `<li>` fragments from a sequence of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListBuilder {
    /// Output used when the sequence is absent or empty
    empty: String,
}

impl ListBuilder {
    /// A builder whose empty result is the empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// A builder returning `empty` for absent or empty input.
    pub fn with_empty(empty: impl Into<String>) -> Self {
        Self {
            empty: empty.into(),
        }
    }

    pub fn empty_fragment(&self) -> &str {
        &self.empty
    }

    /// One `<li>` per item, in input order, separated by newlines.
    pub fn build(&self, items: Option<&[String]>) -> String {
        match items {
            Some(items) if !items.is_empty() => items
                .iter()
                .map(|item| format!("<li>{}</li>", item))
                .collect::<Vec<_>>()
                .join("\n"),
            _ => self.empty.clone(),
        }
    }
}
