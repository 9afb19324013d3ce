//! Calendar date formats.

use chrono::NaiveDate;
use fmtmap_model::{FormatError, Result, Value, ordinal_to_date};

use crate::definition::FormatDefinition;

/// Date format backed by a chrono pattern.
///
/// Numbers are accepted on render as SAS date ordinals (days since 1960-01-01).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
    name: String,
    pattern: String,
    uppercase: bool,
}

impl DateFormat {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            uppercase: false,
        }
    }

    /// Upper-case month names on render (`05JAN2024`).
    #[must_use]
    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn render_date(&self, date: NaiveDate) -> String {
        let text = date.format(&self.pattern).to_string();
        if self.uppercase {
            text.to_uppercase()
        } else {
            text
        }
    }

    pub fn parse_date(&self, text: &str) -> Result<NaiveDate> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FormatError::unparsable(text, &self.name, "empty text"));
        }
        NaiveDate::parse_from_str(trimmed, &self.pattern)
            .map_err(|error| FormatError::unparsable(text, &self.name, error.to_string()))
    }
}

impl FormatDefinition for DateFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, value: &Value) -> Result<String> {
        match value {
            Value::Date(date) => Ok(self.render_date(*date)),
            Value::Number(n) if n.is_finite() && n.fract() == 0.0 => ordinal_to_date(*n as i64)
                .map(|date| self.render_date(date))
                .ok_or_else(|| FormatError::unrenderable(n, &self.name, "date out of range")),
            other => Err(FormatError::unrenderable(
                other,
                &self.name,
                format!("expected a date or day ordinal, got {}", other.kind()),
            )),
        }
    }

    fn parse(&self, text: &str) -> Result<Value> {
        self.parse_date(text).map(Value::Date)
    }
}
