//! Built-in format definitions.
//!
//! Names follow the SAS formats they imitate where one exists:
//!
//! - **numeric**: `best`, `comma`, `commax`, `dollar`, `currency`, `accounting`,
//!   `percent`, `accounting-percent`
//! - **date**: `date9`, `yymmdd10`, `mmddyy10`, `ddmmyy10`
//! - **text**: `$char`, `$upcase`

pub mod date;
pub mod numeric;
pub mod text;

use std::sync::Arc;

pub use date::DateFormat;
pub use numeric::{CURRENCY_SYMBOLS, CurrencyRule, NegativeStyle, NumericFormat, NumericStyle};
pub use text::TextFormat;

use crate::definition::FormatDefinition;

/// Every built-in definition, in registration order.
pub fn builtin_formats() -> Vec<Arc<dyn FormatDefinition>> {
    let comma = NumericStyle::default()
        .with_grouping(',')
        .with_accept_parentheses(true);
    let money = comma.clone().with_decimals(2);

    vec![
        Arc::new(NumericFormat::new(
            "best",
            NumericStyle::default()
                .with_currency(CurrencyRule::Tolerated)
                .with_accept_parentheses(true),
        )),
        Arc::new(NumericFormat::new(
            "comma",
            comma.clone().with_currency(CurrencyRule::Tolerated),
        )),
        Arc::new(NumericFormat::new(
            "commax",
            NumericStyle::default()
                .with_grouping('.')
                .with_decimal_mark(',')
                .with_currency(CurrencyRule::Tolerated)
                .with_accept_parentheses(true),
        )),
        Arc::new(NumericFormat::new(
            "dollar",
            money.clone().with_currency(CurrencyRule::Only('$')),
        )),
        Arc::new(NumericFormat::new(
            "currency",
            money.clone().with_currency(CurrencyRule::Any('$')),
        )),
        Arc::new(NumericFormat::new(
            "accounting",
            money
                .with_currency(CurrencyRule::Any('$'))
                .with_accounting_negatives(),
        )),
        Arc::new(NumericFormat::new(
            "percent",
            NumericStyle::default()
                .with_percent(true)
                .with_accept_parentheses(true),
        )),
        Arc::new(NumericFormat::new(
            "accounting-percent",
            comma
                .with_percent(true)
                .with_decimals(1)
                .with_accounting_negatives(),
        )),
        Arc::new(DateFormat::new("date9", "%d%b%Y").uppercase()),
        Arc::new(DateFormat::new("yymmdd10", "%Y-%m-%d")),
        Arc::new(DateFormat::new("mmddyy10", "%m/%d/%Y")),
        Arc::new(DateFormat::new("ddmmyy10", "%d/%m/%Y")),
        Arc::new(TextFormat::new("$char")),
        Arc::new(TextFormat::new("$upcase").uppercase()),
    ]
}
