//! The capability interface every named format implements.

use std::fmt;
use std::sync::Arc;

use fmtmap_model::{Result, Value};

/// A named, reusable rule that renders values to text and parses them back.
///
/// Implementations must satisfy `parse(render(v)) == v` for every `v` they
/// can render, unless [`FormatDefinition::lossiness`] says otherwise.
pub trait FormatDefinition: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn render(&self, value: &Value) -> Result<String>;

    fn parse(&self, text: &str) -> Result<Value>;

    fn lossiness(&self) -> Lossiness {
        Lossiness::Exact
    }
}

/// Whether rendering discards information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lossiness {
    Exact,
    Lossy(String),
}

impl Lossiness {
    pub fn is_exact(&self) -> bool {
        matches!(self, Lossiness::Exact)
    }
}

impl fmt::Display for Lossiness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lossiness::Exact => f.write_str("exact"),
            Lossiness::Lossy(reason) => write!(f, "lossy: {reason}"),
        }
    }
}

pub type RenderFn = Arc<dyn Fn(&Value) -> Result<String> + Send + Sync>;
pub type ParseFn = Arc<dyn Fn(&str) -> Result<Value> + Send + Sync>;

/// Format assembled from a pair of closures.
#[derive(Clone)]
pub struct FnFormat {
    name: String,
    render: RenderFn,
    parse: ParseFn,
    lossiness: Lossiness,
}

impl FnFormat {
    pub fn new<R, P>(name: impl Into<String>, render: R, parse: P) -> Self
    where
        R: Fn(&Value) -> Result<String> + Send + Sync + 'static,
        P: Fn(&str) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            render: Arc::new(render),
            parse: Arc::new(parse),
            lossiness: Lossiness::Exact,
        }
    }

    /// Declare that `parse(render(v))` may differ from `v`, and why.
    #[must_use]
    pub fn with_lossiness(mut self, reason: impl Into<String>) -> Self {
        self.lossiness = Lossiness::Lossy(reason.into());
        self
    }
}

impl fmt::Debug for FnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFormat")
            .field("name", &self.name)
            .field("lossiness", &self.lossiness)
            .finish_non_exhaustive()
    }
}

impl FormatDefinition for FnFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, value: &Value) -> Result<String> {
        (self.render)(value)
    }

    fn parse(&self, text: &str) -> Result<Value> {
        (self.parse)(text)
    }

    fn lossiness(&self) -> Lossiness {
        self.lossiness.clone()
    }
}
