#![forbid(unsafe_code)]

use regex::Regex;
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::config::CurrencyConfig;
use crate::core::registry::PropertyKind;
use crate::core::resource::ResourceDirectory;
use crate::core::value::{ConstraintType, EstimateKind, RiskLevel, Role, TimeUnit, Value};

/// Constraint instants read and write this exact shape, e.g.
/// `2011-08-01T10:00:00`.
const DATE_TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Failure modes of `parse`. `UnknownResource` is kept apart from plain
/// grammar errors so the caller can surface it under its own error variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    Parse(String),
    UnknownResource(String),
}

/// Shared state the codecs need: the currency locale and the known
/// resource set.
#[derive(Debug, Clone, Copy)]
pub struct CodecContext<'a> {
    pub currency: &'a CurrencyConfig,
    pub resources: &'a ResourceDirectory,
}

/// Parses user-facing text into the canonical value for `kind`.
pub fn parse(kind: PropertyKind, input: &str, ctx: CodecContext<'_>) -> Result<Value, CodecError> {
    match kind {
        PropertyKind::Text => Ok(Value::Text(input.to_owned())),
        PropertyKind::Duration => parse_duration(input).map_err(CodecError::Parse),
        PropertyKind::DateTime => {
            let dt = PrimitiveDateTime::parse(input.trim(), DATE_TIME_FORMAT).map_err(|e| {
                CodecError::Parse(format!("expected a date like 2011-08-01T10:00:00: {e}"))
            })?;
            Ok(Value::DateTime(dt))
        }
        PropertyKind::Constraint => ConstraintType::from_label(input)
            .map(Value::Constraint)
            .ok_or_else(|| CodecError::Parse(label_error(input, &ConstraintType::ALL.map(ConstraintType::label)))),
        PropertyKind::EstimateKind => EstimateKind::from_label(input)
            .map(Value::EstimateKind)
            .ok_or_else(|| CodecError::Parse(label_error(input, &EstimateKind::ALL.map(EstimateKind::label)))),
        PropertyKind::Risk => RiskLevel::from_label(input)
            .map(Value::Risk)
            .ok_or_else(|| CodecError::Parse(label_error(input, &RiskLevel::ALL.map(RiskLevel::label)))),
        PropertyKind::Percent => {
            let n: i32 = input.trim().parse().map_err(|_| {
                CodecError::Parse(format!("expected an integer percentage, got '{input}'"))
            })?;
            Ok(Value::Percent(n))
        }
        PropertyKind::Money => parse_money(input, ctx.currency)
            .map(Value::Money)
            .map_err(CodecError::Parse),
        PropertyKind::Resource => {
            let name = input.trim();
            if name.is_empty() {
                return Ok(Value::Resource(None));
            }
            match ctx.resources.resolve(name) {
                Some(id) => Ok(Value::Resource(Some(id))),
                None => Err(CodecError::UnknownResource(name.to_owned())),
            }
        }
    }
}

/// Formats a canonical value under a role. `Raw` is the canonical value
/// itself, `Edit` the typed program-usable form (enum labels surface as
/// text), `Display` a human string.
#[must_use]
pub fn format(value: &Value, role: Role, ctx: CodecContext<'_>) -> Value {
    match role {
        Role::Raw => value.clone(),
        Role::Edit => match value {
            Value::Constraint(c) => Value::Text(c.label().to_owned()),
            Value::EstimateKind(k) => Value::Text(k.label().to_owned()),
            Value::Risk(r) => Value::Text(r.label().to_owned()),
            other => other.clone(),
        },
        Role::Display => Value::Text(display_text(value, ctx)),
    }
}

/// Human-readable rendering, the DisplayRole string.
#[must_use]
pub fn display_text(value: &Value, ctx: CodecContext<'_>) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Duration { amount, unit } => format!("{amount:.1}{}", unit.suffix()),
        Value::DateTime(dt) => format_date_time(*dt),
        Value::Constraint(c) => c.label().to_owned(),
        Value::EstimateKind(k) => k.label().to_owned(),
        Value::Risk(r) => r.label().to_owned(),
        Value::Percent(n) => format!("{n}%"),
        Value::Money(minor) => format_money_display(*minor, ctx.currency),
        Value::Resource(Some(id)) => ctx.resources.name_of(id).unwrap_or_default().to_owned(),
        Value::Resource(None) => String::new(),
    }
}

/// Plain-text rendering of the typed Edit form: bare integers for
/// percentages, bare decimal amounts for money, no locale dressing.
#[must_use]
pub fn edit_text(value: &Value, ctx: CodecContext<'_>) -> String {
    match value {
        Value::Percent(n) => n.to_string(),
        Value::Money(minor) => format_money_plain(*minor, ctx.currency.decimals, "", "."),
        other => display_text(other, ctx),
    }
}

pub fn parse_duration(input: &str) -> Result<Value, String> {
    let s = input.trim();
    let last = s
        .chars()
        .next_back()
        .ok_or_else(|| "expected a duration like '3.0h' or '1.0d'".to_owned())?;
    let unit = TimeUnit::from_suffix(last)
        .ok_or_else(|| format!("expected unit suffix 'h' or 'd', got '{input}'"))?;
    let magnitude = &s[..s.len() - last.len_utf8()];
    let amount: f64 = magnitude
        .trim()
        .parse()
        .map_err(|_| format!("expected a numeric magnitude, got '{input}'"))?;
    Ok(Value::Duration { amount, unit })
}

fn format_date_time(dt: PrimitiveDateTime) -> String {
    dt.format(DATE_TIME_FORMAT).unwrap_or_default()
}

fn label_error(input: &str, allowed: &[&str]) -> String {
    format!("'{input}' must be one of: {}", allowed.join(", "))
}

/// Accepts a bare decimal amount (`1000`, `1000.00`) or the configured
/// locale's currency form (`$ 1,000.00`). Returns minor units.
fn parse_money(input: &str, cur: &CurrencyConfig) -> Result<i64, String> {
    let mut s = input.trim().to_owned();
    if !cur.symbol.is_empty()
        && let Some(rest) = s.strip_prefix(&cur.symbol)
    {
        s = rest.trim_start().to_owned();
    }
    if !cur.group_separator.is_empty() {
        s = s.replace(&cur.group_separator, "");
    }
    if cur.decimal_point != "." {
        s = s.replace(&cur.decimal_point, ".");
    }

    let re = Regex::new(r"^-?\d+(?:\.\d+)?$").map_err(|e| e.to_string())?;
    if !re.is_match(&s) {
        return Err(format!("expected an amount like '1000.00', got '{input}'"));
    }

    let negative = s.starts_with('-');
    let unsigned = s.trim_start_matches('-');
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, f),
        None => (unsigned, ""),
    };
    let decimals = usize::from(cur.decimals);
    if frac_part.len() > decimals {
        return Err(format!(
            "at most {decimals} decimal places are allowed, got '{input}'"
        ));
    }

    let scale = 10_i64.pow(cur.decimals.into());
    let int: i64 = int_part
        .parse()
        .map_err(|_| format!("amount out of range: '{input}'"))?;
    let mut frac: i64 = if frac_part.is_empty() {
        0
    } else {
        frac_part
            .parse()
            .map_err(|_| format!("amount out of range: '{input}'"))?
    };
    for _ in frac_part.len()..decimals {
        frac *= 10;
    }

    let minor = int
        .checked_mul(scale)
        .and_then(|v| v.checked_add(frac))
        .ok_or_else(|| format!("amount out of range: '{input}'"))?;
    Ok(if negative { -minor } else { minor })
}

fn format_money_display(minor: i64, cur: &CurrencyConfig) -> String {
    let txt = format_money_plain(minor, cur.decimals, &cur.group_separator, &cur.decimal_point);
    if cur.symbol.is_empty() {
        txt
    } else {
        format!("{} {txt}", cur.symbol)
    }
}

fn format_money_plain(minor: i64, decimals: u8, group_separator: &str, decimal_point: &str) -> String {
    let scale = 10_i64.pow(decimals.into());
    let negative = minor < 0;
    let abs = minor.unsigned_abs();
    let int = abs / scale.unsigned_abs();
    let frac = abs % scale.unsigned_abs();

    let digits = int.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push_str(group_separator);
        }
        grouped.push(c);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if decimals > 0 {
        out.push_str(decimal_point);
        out.push_str(&format!("{frac:0width$}", width = usize::from(decimals)));
    }
    out
}
