//! Money and date rendering for the shell.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use spendbook_config::Config;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(pub String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("INR")
    }
}

/// How digits left of the decimal point are grouped.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GroupingStyle {
    /// `1,234,567`
    Western,
    /// Lakh/crore grouping: `12,34,567`
    Indian,
}

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    pub grouping: GroupingStyle,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: ',',
            grouping: GroupingStyle::Western,
        }
    }
}

impl LocaleConfig {
    /// Separators for a BCP 47 tag. Unknown tags fall back to `en-US` rules.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim();
        let region = tag
            .rsplit(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        let language = tag
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        let mut locale = LocaleConfig {
            language_tag: tag.to_string(),
            ..LocaleConfig::default()
        };
        if region == "IN" {
            locale.grouping = GroupingStyle::Indian;
            return locale;
        }
        match language.as_str() {
            "de" | "es" | "it" | "nl" | "pt" => {
                locale.decimal_separator = ',';
                locale.grouping_separator = '.';
            }
            "fr" => {
                locale.decimal_separator = ',';
                locale.grouping_separator = ' ';
            }
            _ => {}
        }
        locale
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum NegativeStyle {
    #[default]
    Sign,
    Parentheses,
}

pub fn symbol_for(code: &str) -> String {
    match code {
        "INR" => "₹".into(),
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "AUD" => "A$".into(),
        "CAD" => "CA$".into(),
        other => format!("{other} "),
    }
}

pub fn minor_units_for(code: &str) -> u8 {
    match code {
        "JPY" | "KRW" => 0,
        "KWD" | "BHD" => 3,
        _ => 2,
    }
}

pub fn format_number(locale: &LocaleConfig, value: f64, precision: u8) -> String {
    let fixed = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (fixed.as_str(), None),
    };
    let mut body = match locale.grouping {
        GroupingStyle::Western => group_western(int_part, locale.grouping_separator),
        GroupingStyle::Indian => group_indian(int_part, locale.grouping_separator),
    };
    if let Some(frac) = frac_part {
        body.push(locale.decimal_separator);
        body.push_str(frac);
    }
    if value < 0.0 && !is_zero_text(&body) {
        body.insert(0, '-');
    }
    body
}

fn is_zero_text(body: &str) -> bool {
    body.chars().all(|c| !c.is_ascii_digit() || c == '0')
}

fn group_western(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

fn group_indian(digits: &str, separator: char) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut grouped = String::new();
    for (count, ch) in head.chars().rev().enumerate() {
        if count != 0 && count % 2 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped.push(separator);
    grouped.push_str(tail);
    grouped
}

pub fn format_currency_value(
    amount: f64,
    code: &CurrencyCode,
    locale: &LocaleConfig,
    negative_style: NegativeStyle,
) -> String {
    let precision = minor_units_for(code.as_str());
    let body = format_number(locale, amount.abs(), precision);
    let symbol = symbol_for(code.as_str());
    let negative = amount < 0.0 && !is_zero_text(&body);
    match (negative, negative_style) {
        (false, _) => format!("{symbol}{body}"),
        (true, NegativeStyle::Sign) => format!("-{symbol}{body}"),
        (true, NegativeStyle::Parentheses) => format!("({symbol}{body})"),
    }
}

/// `Jan 5, 2024`
pub fn format_date(date: NaiveDate) -> String {
    format!("{} {}, {}", month_label(date.month()), date.day(), date.year())
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

/// Currency and locale bundled for repeated formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct MoneyFormatter {
    pub code: CurrencyCode,
    pub locale: LocaleConfig,
    pub negative_style: NegativeStyle,
}

impl Default for MoneyFormatter {
    fn default() -> Self {
        Self::new("INR", "en-IN")
    }
}

impl MoneyFormatter {
    pub fn new(code: &str, locale_tag: &str) -> Self {
        Self {
            code: CurrencyCode::new(code),
            locale: LocaleConfig::from_tag(locale_tag),
            negative_style: NegativeStyle::Sign,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.currency, &config.locale)
    }

    pub fn format(&self, amount: f64) -> String {
        format_currency_value(amount, &self.code, &self.locale, self.negative_style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indian_grouping_uses_lakh_boundaries() {
        assert_eq!(group_indian("1234567", ','), "12,34,567");
        assert_eq!(group_indian("123456789", ','), "12,34,56,789");
        assert_eq!(group_indian("1000", ','), "1,000");
        assert_eq!(group_indian("999", ','), "999");
    }

    #[test]
    fn western_grouping_uses_thousands() {
        assert_eq!(group_western("1234567", ','), "1,234,567");
        assert_eq!(group_western("12", ','), "12");
    }

    #[test]
    fn locale_tags_pick_separators() {
        assert_eq!(LocaleConfig::from_tag("en-IN").grouping, GroupingStyle::Indian);
        assert_eq!(LocaleConfig::from_tag("hi_IN").grouping, GroupingStyle::Indian);
        let german = LocaleConfig::from_tag("de-DE");
        assert_eq!(german.decimal_separator, ',');
        assert_eq!(german.grouping_separator, '.');
        assert_eq!(LocaleConfig::from_tag("xx"), LocaleConfig {
            language_tag: "xx".into(),
            ..LocaleConfig::default()
        });
    }
}
