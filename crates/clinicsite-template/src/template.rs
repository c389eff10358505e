//! Token template parsing and rendering.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([A-Z][A-Z0-9_]*)\]").expect("Invalid token regex"));

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output unchanged
    Literal(String),
    /// Token name without brackets
    Token(String),
}

/// A template parsed into literal and token segments.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Template {
    segments: Vec<Segment>,
}

/// Values to substitute, keyed by token name without brackets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenMap {
    values: HashMap<String, String>,
}

impl TokenMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a token value, replacing any previous one.
    pub fn insert(&mut self, token: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(token.into(), value.into());
        self
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.values.get(token).map(String::as_str)
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.contains_key(token)
    }

    /// Copy every value of `other` into this map.
    pub fn extend(&mut self, other: &TokenMap) -> &mut Self {
        for (k, v) in &other.values {
            self.values.insert(k.clone(), v.clone());
        }
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Output of rendering a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Rendered text
    pub html: String,

    /// Tokens with no value, left verbatim in `html` (first-seen order, no duplicates)
    pub unresolved: Vec<String>,
}

impl Template {
    /// Parse template text into segments.
    pub fn parse(source: &str) -> Self {
        let mut segments = Vec::new();
        let mut last = 0;

        for caps in TOKEN_RE.captures_iter(source) {
            let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
                continue;
            };

            if whole.start() > last {
                segments.push(Segment::Literal(source[last..whole.start()].to_string()));
            }
            segments.push(Segment::Token(name.as_str().to_string()));
            last = whole.end();
        }

        if last < source.len() {
            segments.push(Segment::Literal(source[last..].to_string()));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct token names in order of first appearance.
    pub fn tokens(&self) -> Vec<&str> {
        let mut seen = Vec::new();
        for segment in &self.segments {
            if let Segment::Token(name) = segment {
                if !seen.contains(&name.as_str()) {
                    seen.push(name.as_str());
                }
            }
        }
        seen
    }

    /// Transform every literal segment, leaving tokens untouched.
    pub fn map_literals<F>(self, mut f: F) -> Self
    where
        F: FnMut(&str) -> String,
    {
        let segments = self
            .segments
            .into_iter()
            .map(|segment| match segment {
                Segment::Literal(text) => Segment::Literal(f(&text)),
                token => token,
            })
            .collect();

        Self { segments }
    }

    /// Substitute every token with its value in a single pass.
    ///
    /// Values are inserted as-is and never scanned for further tokens. Tokens
    /// missing from `values` stay in the output in their bracketed form.
    pub fn render(&self, values: &TokenMap) -> Rendered {
        let mut html = String::new();
        let mut unresolved: Vec<String> = Vec::new();

        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => html.push_str(text),
                Segment::Token(name) => match values.get(name) {
                    Some(value) => html.push_str(value),
                    None => {
                        html.push('[');
                        html.push_str(name);
                        html.push(']');
                        if !unresolved.contains(name) {
                            unresolved.push(name.clone());
                        }
                    }
                },
            }
        }

        Rendered { html, unresolved }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_literals_and_tokens() {
        let template = Template::parse("<h1>[LOCATION_NAME]</h1>[LOCATION_CITY]");

        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("<h1>".to_string()),
                Segment::Token("LOCATION_NAME".to_string()),
                Segment::Literal("</h1>".to_string()),
                Segment::Token("LOCATION_CITY".to_string()),
            ]
        );
    }

    #[test]
    fn replaces_every_occurrence() {
        let template =
            Template::parse("<title>[LOCATION_NAME]</title><h1>[LOCATION_NAME]</h1>");
        let mut values = TokenMap::new();
        values.insert("LOCATION_NAME", "Sunrise Detox at Atlanta");

        let rendered = template.render(&values);

        assert_eq!(
            rendered.html,
            "<title>Sunrise Detox at Atlanta</title><h1>Sunrise Detox at Atlanta</h1>"
        );
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn leaves_unknown_tokens_verbatim() {
        let template = Template::parse("[LOCATION_NAME] [MYSTERY] [MYSTERY]");
        let mut values = TokenMap::new();
        values.insert("LOCATION_NAME", "Alpha");

        let rendered = template.render(&values);

        assert_eq!(rendered.html, "Alpha [MYSTERY] [MYSTERY]");
        assert_eq!(rendered.unresolved, vec!["MYSTERY".to_string()]);
    }

    #[test]
    fn values_are_not_rescanned() {
        let template = Template::parse("[A_TOKEN]|[B_TOKEN]");
        let mut values = TokenMap::new();
        values.insert("A_TOKEN", "[B_TOKEN]").insert("B_TOKEN", "b");

        let rendered = template.render(&values);

        assert_eq!(rendered.html, "[B_TOKEN]|b");
    }

    #[test]
    fn ignores_lowercase_brackets() {
        let template = Template::parse("a[data-x] b[0] c[i]");

        assert!(template.tokens().is_empty());
        assert_eq!(template.render(&TokenMap::new()).html, "a[data-x] b[0] c[i]");
    }

    #[test]
    fn lists_distinct_tokens_in_order() {
        let template = Template::parse("[B_ONE][A_TWO][B_ONE]");
        assert_eq!(template.tokens(), vec!["B_ONE", "A_TWO"]);
    }

    #[test]
    fn maps_only_literal_segments() {
        let template = Template::parse("images/[LOCATION_IMAGE_URL] images/")
            .map_literals(|text| text.replace("images/", "../../images/"));
        let mut values = TokenMap::new();
        values.insert("LOCATION_IMAGE_URL", "images/a.jpg");

        assert_eq!(
            template.render(&values).html,
            "../../images/images/a.jpg ../../images/"
        );
    }
}
