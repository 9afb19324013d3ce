//! Numeric formats: grouping, currency, percent and accounting negatives.
//!
//! Parsing splits the input into three parts around its digits:
//!
//! - a leading decoration (signs, currency symbol, opening parenthesis, words)
//! - the numeric core (digits, grouping separators, one decimal mark)
//! - a trailing decoration (percent sign, closing parenthesis, words)
//!
//! Decorations are stripped, but every symbol that changes the meaning of the
//! number is counted and checked against the style. Anything ambiguous is an
//! [`FormatError::UnparsableValue`].

use fmtmap_model::{FormatError, Result, Value};

use crate::definition::{FormatDefinition, Lossiness};

/// Currency symbols recognised inside decorations.
pub const CURRENCY_SYMBOLS: [char; 4] = ['$', '£', '€', '¥'];

/// Fraction digits kept by percent formats without fixed decimals.
pub const PERCENT_FRACTION_DIGITS: usize = 10;

/// How a format treats currency symbols.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencyRule {
    /// Any symbol in the input is an error.
    Forbidden,
    /// One symbol is stripped on parse; nothing is rendered.
    Tolerated,
    /// One of [`CURRENCY_SYMBOLS`] is accepted; renders the given symbol.
    Any(char),
    /// Only the given symbol is accepted and rendered.
    Only(char),
}

impl CurrencyRule {
    fn render_symbol(self) -> Option<char> {
        match self {
            CurrencyRule::Any(symbol) | CurrencyRule::Only(symbol) => Some(symbol),
            CurrencyRule::Forbidden | CurrencyRule::Tolerated => None,
        }
    }
}

/// How negative numbers are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegativeStyle {
    Minus,
    Parentheses,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericStyle {
    pub grouping: Option<char>,
    pub decimal_mark: char,
    pub currency: CurrencyRule,
    /// Renders `value * 100` with a `%` suffix; parse requires the suffix.
    pub percent: bool,
    pub negative: NegativeStyle,
    /// Accept `(x)` as `-x` when parsing.
    pub accept_parentheses: bool,
    /// Fixed fraction digits. `None` renders the shortest exact form, or for
    /// percent formats at most [`PERCENT_FRACTION_DIGITS`] with trailing zeros
    /// trimmed.
    pub decimals: Option<usize>,
}

impl Default for NumericStyle {
    fn default() -> Self {
        Self {
            grouping: None,
            decimal_mark: '.',
            currency: CurrencyRule::Forbidden,
            percent: false,
            negative: NegativeStyle::Minus,
            accept_parentheses: false,
            decimals: None,
        }
    }
}

impl NumericStyle {
    #[must_use]
    pub fn with_grouping(mut self, grouping: char) -> Self {
        self.grouping = Some(grouping);
        self
    }

    #[must_use]
    pub fn with_decimal_mark(mut self, mark: char) -> Self {
        self.decimal_mark = mark;
        self
    }

    #[must_use]
    pub fn with_currency(mut self, currency: CurrencyRule) -> Self {
        self.currency = currency;
        self
    }

    #[must_use]
    pub fn with_percent(mut self, enable: bool) -> Self {
        self.percent = enable;
        self
    }

    /// Render negatives in parentheses and accept them when parsing.
    #[must_use]
    pub fn with_accounting_negatives(mut self) -> Self {
        self.negative = NegativeStyle::Parentheses;
        self.accept_parentheses = true;
        self
    }

    #[must_use]
    pub fn with_accept_parentheses(mut self, enable: bool) -> Self {
        self.accept_parentheses = enable;
        self
    }

    #[must_use]
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.decimals = Some(decimals);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericFormat {
    name: String,
    style: NumericStyle,
}

impl NumericFormat {
    pub fn new(name: impl Into<String>, style: NumericStyle) -> Self {
        Self {
            name: name.into(),
            style,
        }
    }

    pub fn style(&self) -> &NumericStyle {
        &self.style
    }

    pub fn parse_number(&self, text: &str) -> Result<f64> {
        let fail = |reason: &str| FormatError::unparsable(text, &self.name, reason);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(fail("empty text"));
        }
        let Some(first_digit) = trimmed.find(|c: char| c.is_ascii_digit()) else {
            return Err(fail("no digits"));
        };
        let end = trimmed
            .rfind(|c: char| c.is_ascii_digit())
            .map_or(first_digit + 1, |pos| pos + 1);
        let mark = self.style.decimal_mark;
        let start = if trimmed[..first_digit].ends_with(mark) {
            first_digit - mark.len_utf8()
        } else {
            first_digit
        };

        let leading = &trimmed[..start];
        let trailing = &trimmed[end..];
        if let Some(reason) = stray_separator(leading.chars().next_back(), &self.style)
            .or_else(|| stray_separator(trailing.chars().next(), &self.style))
        {
            return Err(fail(reason));
        }

        let mut decoration = Decoration::default();
        decoration.scan(leading, Side::Leading);
        decoration.scan(trailing, Side::Trailing);
        let negative = decoration
            .check(&self.style)
            .map_err(|reason| fail(reason.as_str()))?;

        let normalized = normalize_core(&trimmed[start..end], &self.style)
            .map_err(|reason| fail(reason.as_str()))?;
        let magnitude: f64 = normalized
            .parse()
            .map_err(|_| fail("not a valid number"))?;
        if !magnitude.is_finite() {
            return Err(fail("magnitude out of range"));
        }
        let signed = if negative { -magnitude } else { magnitude };
        Ok(if self.style.percent {
            signed / 100.0
        } else {
            signed
        })
    }

    pub fn render_number(&self, value: f64) -> Result<String> {
        if !value.is_finite() {
            return Err(FormatError::unrenderable(
                value,
                &self.name,
                "not a finite number",
            ));
        }
        let style = &self.style;
        let scaled = if style.percent { value * 100.0 } else { value };
        let magnitude = scaled.abs();
        let digits = match style.decimals {
            Some(decimals) => format!("{magnitude:.decimals$}"),
            None if style.percent => {
                let fixed = format!("{magnitude:.PERCENT_FRACTION_DIGITS$}");
                fixed.trim_end_matches('0').trim_end_matches('.').to_string()
            }
            None => format!("{magnitude}"),
        };
        let (int_digits, frac_digits) = digits
            .split_once('.')
            .unwrap_or((digits.as_str(), ""));

        let mut body = String::new();
        if let Some(symbol) = style.currency.render_symbol() {
            body.push(symbol);
        }
        body.push_str(&group_digits(int_digits, style.grouping));
        if !frac_digits.is_empty() {
            body.push(style.decimal_mark);
            body.push_str(frac_digits);
        }
        if style.percent {
            body.push('%');
        }

        let is_zero = digits.chars().all(|c| c == '0' || c == '.');
        if scaled < 0.0 && !is_zero {
            Ok(match style.negative {
                NegativeStyle::Minus => format!("-{body}"),
                NegativeStyle::Parentheses => format!("({body})"),
            })
        } else {
            Ok(body)
        }
    }
}

impl FormatDefinition for NumericFormat {
    fn name(&self) -> &str {
        &self.name
    }

    fn render(&self, value: &Value) -> Result<String> {
        match value {
            Value::Number(n) => self.render_number(*n),
            other => Err(FormatError::unrenderable(
                other,
                &self.name,
                format!("expected a number, got {}", other.kind()),
            )),
        }
    }

    fn parse(&self, text: &str) -> Result<Value> {
        self.parse_number(text).map(Value::Number)
    }

    fn lossiness(&self) -> Lossiness {
        let mut reasons = Vec::new();
        match self.style.decimals {
            Some(decimals) => {
                let unit = if decimals == 1 { "place" } else { "places" };
                reasons.push(format!("rounds to {decimals} decimal {unit}"));
            }
            None if self.style.percent => {
                reasons.push(format!(
                    "keeps at most {PERCENT_FRACTION_DIGITS} fraction digits"
                ));
            }
            None => {}
        }
        if self.style.percent {
            reasons.push("scales by 100 in binary floating point".to_string());
        }
        if reasons.is_empty() {
            Lossiness::Exact
        } else {
            Lossiness::Lossy(reasons.join("; "))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Leading,
    Trailing,
}

/// Symbols counted while stripping decoration.
#[derive(Debug, Default)]
struct Decoration {
    minus: usize,
    plus: usize,
    open: usize,
    close: usize,
    misplaced_paren: bool,
    /// A sign cut off from the number by words.
    detached_sign: bool,
    percent: usize,
    currency: Vec<char>,
}

impl Decoration {
    fn scan(&mut self, text: &str, side: Side) {
        let chars: Vec<char> = text.chars().collect();
        let attached = match side {
            Side::Leading => chars.iter().rev().take_while(|c| is_attached(**c)).count(),
            Side::Trailing => chars.iter().take_while(|c| is_attached(**c)).count(),
        };
        for (idx, &ch) in chars.iter().enumerate() {
            let next_to_core = match side {
                Side::Leading => idx >= chars.len() - attached,
                Side::Trailing => idx < attached,
            };
            match ch {
                // Hyphens inside words ("pre-tax") are prose, not signs.
                '-' | '+' if !next_to_core => {
                    if !glued_to_word(&chars, idx) {
                        self.detached_sign = true;
                    }
                }
                '-' => self.minus += 1,
                '+' => self.plus += 1,
                '(' if side == Side::Leading => self.open += 1,
                ')' if side == Side::Trailing => self.close += 1,
                '(' | ')' => self.misplaced_paren = true,
                '%' => self.percent += 1,
                c if CURRENCY_SYMBOLS.contains(&c) => self.currency.push(c),
                _ => {}
            }
        }
    }

    /// Validates the decoration against `style`; returns whether the value is negative.
    fn check(&self, style: &NumericStyle) -> std::result::Result<bool, String> {
        match (self.currency.as_slice(), style.currency) {
            ([], _) => {}
            ([_, _, ..], _) => return Err("multiple currency symbols".to_string()),
            ([_], CurrencyRule::Forbidden) => {
                return Err("currency symbol not accepted".to_string());
            }
            ([found], CurrencyRule::Only(expected)) if *found != expected => {
                return Err(format!("expected currency symbol {expected}, found {found}"));
            }
            ([_], _) => {}
        }

        if self.percent > 1 {
            return Err("multiple percent signs".to_string());
        }
        if style.percent && self.percent == 0 {
            return Err("missing percent sign".to_string());
        }
        if !style.percent && self.percent == 1 {
            return Err("percent sign not accepted".to_string());
        }

        if self.misplaced_paren || self.open != self.close || self.open > 1 {
            return Err("unbalanced parentheses".to_string());
        }
        let parenthesised = self.open == 1;
        if parenthesised && !style.accept_parentheses {
            return Err("parentheses not accepted".to_string());
        }
        if self.detached_sign {
            return Err("sign separated from the number".to_string());
        }
        let signs = self.minus + self.plus;
        if signs > 1 {
            return Err("conflicting signs".to_string());
        }
        if parenthesised && signs > 0 {
            return Err("parentheses combined with a sign".to_string());
        }
        Ok(parenthesised || self.minus == 1)
    }
}

/// Characters that may sit between a sign and the digits.
fn is_attached(ch: char) -> bool {
    ch.is_whitespace()
        || matches!(ch, '-' | '+' | '(' | ')' | '%')
        || CURRENCY_SYMBOLS.contains(&ch)
}

fn glued_to_word(chars: &[char], idx: usize) -> bool {
    let before = idx.checked_sub(1).and_then(|i| chars.get(i));
    let after = chars.get(idx + 1);
    [before, after]
        .into_iter()
        .flatten()
        .any(|c| c.is_alphanumeric())
}

/// A separator touching the core without belonging to it.
fn stray_separator(ch: Option<char>, style: &NumericStyle) -> Option<&'static str> {
    let ch = ch?;
    if ch == style.decimal_mark {
        Some("stray decimal mark")
    } else if style.grouping == Some(ch) {
        Some("stray grouping separator")
    } else {
        None
    }
}

/// Turns the numeric core into a string `str::parse::<f64>` accepts.
fn normalize_core(core: &str, style: &NumericStyle) -> std::result::Result<String, String> {
    let mut parts = core.split(style.decimal_mark);
    let int_raw = parts.next().unwrap_or_default();
    let frac_raw = parts.next();
    if parts.next().is_some() {
        return Err("multiple decimal marks".to_string());
    }

    let mut normalized = String::with_capacity(core.len() + 1);
    match style.grouping {
        Some(sep) if int_raw.contains(sep) => {
            for (idx, group) in int_raw.split(sep).enumerate() {
                let valid_len = if idx == 0 {
                    (1..=3).contains(&group.len())
                } else {
                    group.len() == 3
                };
                if !valid_len || !group.chars().all(|c| c.is_ascii_digit()) {
                    return Err("misplaced grouping separator".to_string());
                }
                normalized.push_str(group);
            }
        }
        _ => {
            if let Some(bad) = int_raw.chars().find(|c| !c.is_ascii_digit()) {
                return Err(format!("unexpected character {bad:?}"));
            }
            normalized.push_str(int_raw);
        }
    }
    if normalized.is_empty() {
        normalized.push('0');
    }

    if let Some(frac) = frac_raw {
        if style.grouping.is_some_and(|sep| frac.contains(sep)) {
            return Err("grouping separator in fraction".to_string());
        }
        if let Some(bad) = frac.chars().find(|c| !c.is_ascii_digit()) {
            return Err(format!("unexpected character {bad:?}"));
        }
        if !frac.is_empty() {
            normalized.push('.');
            normalized.push_str(frac);
        }
    }
    Ok(normalized)
}

fn group_digits(digits: &str, grouping: Option<char>) -> String {
    let Some(sep) = grouping else {
        return digits.to_string();
    };
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comma() -> NumericFormat {
        NumericFormat::new(
            "comma",
            NumericStyle::default()
                .with_grouping(',')
                .with_currency(CurrencyRule::Tolerated)
                .with_accept_parentheses(true),
        )
    }

    fn reason(error: FormatError) -> String {
        match error {
            FormatError::UnparsableValue { reason, .. } => reason,
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn groups_integer_digits() {
        assert_eq!(group_digits("1234567", Some(',')), "1,234,567");
        assert_eq!(group_digits("123", Some(',')), "123");
        assert_eq!(group_digits("1234", None), "1234");
    }

    #[test]
    fn strips_words_around_the_number() {
        let format = comma();
        assert_eq!(format.parse_number("approx. 1,250 units").unwrap(), 1250.0);
        assert_eq!(format.parse_number("  -42 ").unwrap(), -42.0);
        assert_eq!(format.parse_number(".5").unwrap(), 0.5);
        assert_eq!(format.parse_number("(3.25)").unwrap(), -3.25);
    }

    #[test]
    fn rejects_ambiguous_decoration() {
        let format = comma();
        let cases = [
            ("$$5", "multiple currency symbols"),
            ("$5€", "multiple currency symbols"),
            ("(5", "unbalanced parentheses"),
            ("5)", "unbalanced parentheses"),
            ("-(5)", "parentheses combined with a sign"),
            ("--5", "conflicting signs"),
            ("5%", "percent sign not accepted"),
            ("1,00,0", "misplaced grouping separator"),
            ("1.5.2", "multiple decimal marks"),
            ("12 apples 34", "unexpected character ' '"),
            ("", "empty text"),
            ("n/a", "no digits"),
            (",5", "stray grouping separator"),
            ("..5", "stray decimal mark"),
            ("1,234,", "stray grouping separator"),
            ("- see note 5", "sign separated from the number"),
        ];
        for (text, expected) in cases {
            let error = format.parse_number(text).unwrap_err();
            assert_eq!(reason(error), expected, "input {text:?}");
        }
    }

    #[test]
    fn hyphenated_words_are_not_signs() {
        assert_eq!(comma().parse_number("pre-tax 500").unwrap(), 500.0);
        assert_eq!(comma().parse_number("-500 post-tax").unwrap(), -500.0);
        let currency = NumericFormat::new(
            "currency",
            NumericStyle::default()
                .with_grouping(',')
                .with_currency(CurrencyRule::Any('$')),
        );
        assert_eq!(
            currency.parse_number("year-end total $1,200.00").unwrap(),
            1200.0
        );
        assert_eq!(currency.parse_number("total -$5").unwrap(), -5.0);
    }

    #[test]
    fn trailing_decimal_mark_is_rejected() {
        let best = NumericFormat::new("best", NumericStyle::default());
        assert_eq!(
            reason(best.parse_number("1.5.").unwrap_err()),
            "stray decimal mark"
        );
    }

    #[test]
    fn overflowing_digits_are_rejected() {
        let best = NumericFormat::new("best", NumericStyle::default());
        let digits = "9".repeat(400);
        assert_eq!(
            reason(best.parse_number(&digits).unwrap_err()),
            "magnitude out of range"
        );
    }

    #[test]
    fn percent_display_hides_binary_noise() {
        let format = NumericFormat::new("percent", NumericStyle::default().with_percent(true));
        let seven = format.parse_number("7%").unwrap();
        assert_eq!(format.render_number(seven).unwrap(), "7%");
        assert_eq!(format.render_number(0.29).unwrap(), "29%");
        assert_eq!(format.render_number(0.57).unwrap(), "57%");
        assert_eq!(format.render_number(0.123456).unwrap(), "12.3456%");
        assert_eq!(format.render_number(-1e-15).unwrap(), "0%");
    }

    #[test]
    fn percent_requires_suffix() {
        let format = NumericFormat::new("percent", NumericStyle::default().with_percent(true));
        assert_eq!(format.parse_number("50%").unwrap(), 0.5);
        assert_eq!(
            reason(format.parse_number("50").unwrap_err()),
            "missing percent sign"
        );
        assert_eq!(
            reason(format.parse_number("50%%").unwrap_err()),
            "multiple percent signs"
        );
    }

    #[test]
    fn only_rule_rejects_other_symbols() {
        let format = NumericFormat::new(
            "dollar",
            NumericStyle::default().with_currency(CurrencyRule::Only('$')),
        );
        assert_eq!(format.parse_number("$12").unwrap(), 12.0);
        assert!(format.parse_number("£12").is_err());
    }

    #[test]
    fn renders_negative_zero_without_sign() {
        let format = NumericFormat::new(
            "acct",
            NumericStyle::default()
                .with_decimals(2)
                .with_accounting_negatives(),
        );
        assert_eq!(format.render_number(-0.001).unwrap(), "0.00");
        assert_eq!(format.render_number(-12.5).unwrap(), "(12.50)");
    }

    #[test]
    fn european_marks_round_trip() {
        let format = NumericFormat::new(
            "commax",
            NumericStyle::default()
                .with_grouping('.')
                .with_decimal_mark(','),
        );
        assert_eq!(format.render_number(1234.5).unwrap(), "1.234,5");
        assert_eq!(format.parse_number("1.234,5").unwrap(), 1234.5);
        assert_eq!(format.parse_number(",25").unwrap(), 0.25);
    }

    #[test]
    fn rejects_non_finite_render() {
        let error = comma().render_number(f64::NAN).unwrap_err();
        assert!(matches!(error, FormatError::UnrenderableValue { .. }));
    }
}
