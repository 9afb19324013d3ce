//! Display masks: raw values that carry their format through computation.
//!
//! A [`MaskedValue`] never changes its raw value when displayed. Arithmetic
//! runs on the raw value and the result keeps the format, so the square of a
//! masked percentage still displays as a percentage.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::sync::Arc;

use fmtmap_model::{Result, Value};
use serde::{Serialize, Serializer};
use tracing::warn;

use crate::definition::FormatDefinition;

/// A raw value paired with the format used to display it.
///
/// [`MaskedValue::render`] and `Serialize` always go through the format and
/// report its errors. `Display` cannot fail with a reason, so when the format
/// rejects the raw value (for example an infinite result of a division by
/// zero) it logs a warning and prints the raw value instead.
#[derive(Clone)]
pub struct MaskedValue<T = f64> {
    raw: T,
    format: Arc<dyn FormatDefinition>,
}

impl<T> MaskedValue<T>
where
    T: Clone + Into<Value>,
{
    /// Wraps `raw`, checking that `format` can render it.
    pub fn new(raw: T, format: Arc<dyn FormatDefinition>) -> Result<Self> {
        format.render(&raw.clone().into())?;
        Ok(Self { raw, format })
    }

    pub fn render(&self) -> Result<String> {
        self.format.render(&self.raw.clone().into())
    }
}

impl<T> MaskedValue<T> {
    pub fn raw(&self) -> &T {
        &self.raw
    }

    /// Drops the mask and returns the raw value.
    pub fn unwrap(self) -> T {
        self.raw
    }

    pub fn format(&self) -> &Arc<dyn FormatDefinition> {
        &self.format
    }

    pub fn format_name(&self) -> &str {
        self.format.name()
    }

    /// Applies `f` to the raw value and keeps the format.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MaskedValue<U> {
        MaskedValue {
            raw: f(self.raw),
            format: self.format,
        }
    }
}

impl MaskedValue<f64> {
    #[must_use]
    pub fn powi(self, n: i32) -> Self {
        self.map(|raw| raw.powi(n))
    }

    #[must_use]
    pub fn powf(self, n: f64) -> Self {
        self.map(|raw| raw.powf(n))
    }

    #[must_use]
    pub fn abs(self) -> Self {
        self.map(f64::abs)
    }
}

/// Falls back to the raw value when the format cannot render it.
impl<T> fmt::Display for MaskedValue<T>
where
    T: Clone + Into<Value>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(error) => {
                let raw: Value = self.raw.clone().into();
                warn!(%error, format = self.format.name(), "displaying raw value");
                write!(f, "{raw}")
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MaskedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedValue")
            .field("raw", &self.raw)
            .field("format", &self.format.name())
            .finish()
    }
}

impl<T: PartialEq> PartialEq for MaskedValue<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw && self.format.name() == other.format.name()
    }
}

/// Serializes the rendered text, never the raw value.
impl<T> Serialize for MaskedValue<T>
where
    T: Clone + Into<Value>,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let text = self.render().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }
}

// Binary operators keep the left operand's format; a plain `f64` on the left
// adopts the format of the masked right operand.
macro_rules! masked_binop {
    ($op_trait:ident, $method:ident, $op:tt) => {
        impl $op_trait for MaskedValue<f64> {
            type Output = MaskedValue<f64>;

            fn $method(self, rhs: MaskedValue<f64>) -> Self::Output {
                MaskedValue {
                    raw: self.raw $op rhs.raw,
                    format: self.format,
                }
            }
        }

        impl $op_trait<f64> for MaskedValue<f64> {
            type Output = MaskedValue<f64>;

            fn $method(self, rhs: f64) -> Self::Output {
                self.map(|raw| raw $op rhs)
            }
        }

        impl $op_trait<MaskedValue<f64>> for f64 {
            type Output = MaskedValue<f64>;

            fn $method(self, rhs: MaskedValue<f64>) -> Self::Output {
                rhs.map(|raw| self $op raw)
            }
        }
    };
}

masked_binop!(Add, add, +);
masked_binop!(Sub, sub, -);
masked_binop!(Mul, mul, *);
masked_binop!(Div, div, /);

impl Neg for MaskedValue<f64> {
    type Output = MaskedValue<f64>;

    fn neg(self) -> Self::Output {
        self.map(|raw| -raw)
    }
}
