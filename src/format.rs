use chrono::{Datelike, NaiveDate};
use serde_json::Value;

use crate::record::cell_text;

/// Field name fragments that mark a numeric column as money.
pub const CURRENCY_KEYWORDS: [&str; 8] = [
    "salary", "price", "cost", "amount", "fee", "revenue", "profit", "budget",
];

/// How the cells of a column are turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Renderer {
    Date,
    Currency,
    Number,
    YesNo,
}

impl Renderer {
    /// Render a value. Values that do not fit the renderer are shown raw.
    pub fn render(&self, value: &Value) -> String {
        match (self, value) {
            (_, Value::Null) => String::new(),
            (Renderer::Date, Value::String(s)) => format_date(s).unwrap_or_else(|| s.clone()),
            (Renderer::Currency, Value::Number(n)) => match n.as_f64() {
                Some(v) => format_currency(v),
                None => n.to_string(),
            },
            (Renderer::Number, Value::Number(n)) => match n.as_f64() {
                Some(v) if v <= 5.0 && v.fract() != 0.0 => format!("{v:.1}"),
                Some(v) => format_grouped(v),
                None => n.to_string(),
            },
            (Renderer::YesNo, Value::Bool(b)) => (if *b { "Yes" } else { "No" }).to_string(),
            (_, other) => cell_text(other),
        }
    }
}

pub fn is_currency_field(field: &str) -> bool {
    let lower = field.to_lowercase();
    CURRENCY_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// `2023-01-15` -> `1/15/2023`
pub fn format_date(s: &str) -> Option<String> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()?;
    Some(format!("{}/{}/{}", date.month(), date.day(), date.year()))
}

/// Dollar amount with thousands separators. Cents are only shown when present.
pub fn format_currency(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let abs = v.abs();
    if abs.fract() == 0.0 {
        format!("{sign}${}", group_digits(&format!("{abs:.0}")))
    } else {
        let fixed = format!("{abs:.2}");
        let (int, frac) = fixed.split_once('.').unwrap_or((&fixed, "00"));
        format!("{sign}${}.{frac}", group_digits(int))
    }
}

/// Thousands separators, at most three fraction digits, trailing zeros dropped.
pub fn format_grouped(v: f64) -> String {
    let sign = if v < 0.0 { "-" } else { "" };
    let fixed = format!("{:.3}", v.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        format!("{sign}{}", group_digits(int))
    } else {
        format!("{sign}{}.{frac}", group_digits(int))
    }
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, chr) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(chr);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn currency() {
        assert_eq!(format_currency(75000.0), "$75,000");
        assert_eq!(format_currency(50000.0), "$50,000");
        assert_eq!(format_currency(999.0), "$999");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(-1200.0), "-$1,200");
    }

    #[test]
    fn grouping() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(12345.0), "12,345");
        assert_eq!(format_grouped(1234567.0), "1,234,567");
        assert_eq!(format_grouped(1234.5678), "1,234.568");
        assert_eq!(format_grouped(-98765.0), "-98,765");
    }

    #[test]
    fn number_renderer_uses_rating_style_for_small_fractions() {
        assert_eq!(Renderer::Number.render(&json!(4.6)), "4.6");
        assert_eq!(Renderer::Number.render(&json!(3.27)), "3.3");
        assert_eq!(Renderer::Number.render(&json!(4)), "4");
        assert_eq!(Renderer::Number.render(&json!(18)), "18");
        assert_eq!(Renderer::Number.render(&json!(7.5)), "7.5");
        assert_eq!(Renderer::Number.render(&json!(12345)), "12,345");
    }

    #[test]
    fn dates() {
        assert_eq!(Renderer::Date.render(&json!("2023-01-15")), "1/15/2023");
        assert_eq!(Renderer::Date.render(&json!("2019-12-03")), "12/3/2019");
        // Not a calendar date, shown as is.
        assert_eq!(Renderer::Date.render(&json!("2023-02-30")), "2023-02-30");
        assert_eq!(Renderer::Date.render(&json!("soon")), "soon");
    }

    #[test]
    fn booleans() {
        assert_eq!(Renderer::YesNo.render(&json!(true)), "Yes");
        assert_eq!(Renderer::YesNo.render(&json!(false)), "No");
    }

    #[test]
    fn mismatched_values_render_raw() {
        assert_eq!(Renderer::Currency.render(&json!("n/a")), "n/a");
        assert_eq!(Renderer::YesNo.render(&json!(1)), "1");
        assert_eq!(Renderer::Number.render(&json!(null)), "");
    }

    #[test]
    fn currency_keywords() {
        assert!(is_currency_field("salary"));
        assert!(is_currency_field("baseSalary"));
        assert!(is_currency_field("ANNUAL_BUDGET"));
        assert!(is_currency_field("unitPrice"));
        assert!(!is_currency_field("age"));
        assert!(!is_currency_field("performanceRating"));
    }
}
