use fmtmap_model::{FormatError, Result, Value};

use crate::definition::{FormatDefinition, Lossiness};

/// Character format; text passes through, optionally upper-cased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFormat {
    name: String,
    uppercase: bool,
}

impl TextFormat {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uppercase: false,
        }
    }

    #[must_use]
    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    fn apply(&self, text: &str) -> String {
        if self.uppercase {
            text.to_uppercase()
        } else {
            text.to_string()
        }
    }
}

impl FormatDefinition for TextFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, value: &Value) -> Result<String> {
        match value {
            Value::Text(text) => Ok(self.apply(text)),
            other => Err(FormatError::unrenderable(
                other,
                &self.name,
                format!("expected text, got {}", other.kind()),
            )),
        }
    }

    fn parse(&self, text: &str) -> Result<Value> {
        Ok(Value::Text(self.apply(text)))
    }

    fn lossiness(&self) -> Lossiness {
        if self.uppercase {
            Lossiness::Lossy("folds to upper case".to_string())
        } else {
            Lossiness::Exact
        }
    }
}
