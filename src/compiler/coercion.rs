//! Value coercion
//!
//! Converts raw document operands into values of an attribute's host type.
//! Integer literals are narrowed with range checks, numeric text is parsed,
//! temporal text is parsed as ISO-8601 with optional seconds. Opaque types
//! pass the raw value through untouched.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use regex::Regex;
use serde_json::{Number, Value};
use uuid::Uuid;

use super::errors::{CompileError, CompileResult};
use crate::expression::{HijrahDate, Temporal};
use crate::schema::HostType;

/// A coerced operand
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Text(String),
    Uuid(Uuid),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Instant(DateTime<Utc>),
    OffsetDateTime(DateTime<FixedOffset>),
    /// Offset date-time with an optional region id, e.g. `[Asia/Riyadh]`
    Zoned {
        at: DateTime<FixedOffset>,
        zone: Option<String>,
    },
    Hijrah(HijrahDate),
    Enum { ordinal: usize, name: String },
    /// Passed through for opaque types
    Raw(Value),
}

impl TypedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, TypedValue::Null)
    }

    /// Lower-cases text values; other values are returned unchanged
    pub fn to_lowercase(&self) -> TypedValue {
        match self {
            TypedValue::Text(s) => TypedValue::Text(s.to_lowercase()),
            other => other.clone(),
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Null => f.write_str("null"),
            TypedValue::Bool(v) => write!(f, "{}", v),
            TypedValue::Byte(v) => write!(f, "{}", v),
            TypedValue::Short(v) => write!(f, "{}", v),
            TypedValue::Int(v) => write!(f, "{}", v),
            TypedValue::Long(v) => write!(f, "{}", v),
            TypedValue::Float(v) => write!(f, "{:?}", v),
            TypedValue::Double(v) => write!(f, "{:?}", v),
            TypedValue::Text(s) => f.write_str(s),
            TypedValue::Uuid(u) => write!(f, "{}", u),
            TypedValue::Date(d) => f.write_str(&d.canonical_text()),
            TypedValue::DateTime(d) => f.write_str(&d.canonical_text()),
            TypedValue::Instant(d) => f.write_str(&d.canonical_text()),
            TypedValue::OffsetDateTime(d) => f.write_str(&d.canonical_text()),
            TypedValue::Zoned { at, zone } => {
                f.write_str(&at.to_rfc3339_opts(SecondsFormat::AutoSi, false))?;
                match zone {
                    Some(zone) => write!(f, "[{}]", zone),
                    None => Ok(()),
                }
            }
            TypedValue::Hijrah(d) => write!(f, "{}", d),
            TypedValue::Enum { name, .. } => f.write_str(name),
            TypedValue::Raw(Value::String(s)) => f.write_str(s),
            TypedValue::Raw(v) => write!(f, "{}", v),
        }
    }
}

/// Converts one raw operand to `target`.
///
/// Null coerces to `TypedValue::Null` for every type.
pub fn coerce(raw: &Value, target: &HostType, field: &str) -> CompileResult<TypedValue> {
    if raw.is_null() {
        return Ok(TypedValue::Null);
    }
    let fail = || CompileError::value_conversion(field, target.type_name(), raw);

    let value = match target {
        HostType::Text => match raw {
            Value::String(s) => TypedValue::Text(s.clone()),
            Value::Number(n) => TypedValue::Text(n.to_string()),
            Value::Bool(b) => TypedValue::Text(b.to_string()),
            _ => return Err(fail()),
        },
        HostType::Bool => match raw {
            Value::Bool(b) => TypedValue::Bool(*b),
            Value::String(s) => TypedValue::Bool(s.parse().map_err(|_| fail())?),
            _ => return Err(fail()),
        },
        HostType::Byte => TypedValue::Byte(integer(raw).and_then(|i| i8::try_from(i).ok()).ok_or_else(fail)?),
        HostType::Short => TypedValue::Short(integer(raw).and_then(|i| i16::try_from(i).ok()).ok_or_else(fail)?),
        HostType::Int => TypedValue::Int(integer(raw).and_then(|i| i32::try_from(i).ok()).ok_or_else(fail)?),
        HostType::Long => TypedValue::Long(integer(raw).ok_or_else(fail)?),
        HostType::Float => {
            let v = float(raw).ok_or_else(fail)?;
            let narrowed = v as f32;
            if !narrowed.is_finite() {
                return Err(fail());
            }
            TypedValue::Float(narrowed)
        }
        HostType::Double => TypedValue::Double(float(raw).ok_or_else(fail)?),
        HostType::Uuid => TypedValue::Uuid(text(raw).and_then(|s| Uuid::parse_str(s).ok()).ok_or_else(fail)?),
        HostType::Date => TypedValue::Date(
            text(raw)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
                .ok_or_else(fail)?,
        ),
        HostType::DateTime => TypedValue::DateTime(
            text(raw).and_then(parse_local).ok_or_else(fail)?,
        ),
        HostType::Instant => TypedValue::Instant(
            text(raw)
                .and_then(parse_offset)
                .map(|d| d.with_timezone(&Utc))
                .ok_or_else(fail)?,
        ),
        HostType::OffsetDateTime => TypedValue::OffsetDateTime(
            text(raw).and_then(parse_offset).ok_or_else(fail)?,
        ),
        HostType::ZonedDateTime => text(raw).and_then(parse_zoned).ok_or_else(fail)?,
        HostType::HijrahDate => TypedValue::Hijrah(text(raw).and_then(HijrahDate::parse).ok_or_else(fail)?),
        HostType::Enum { constants, .. } => {
            let ordinal = match raw {
                Value::Number(n) => n
                    .as_u64()
                    .and_then(|i| usize::try_from(i).ok())
                    .filter(|&i| i < constants.len()),
                Value::String(s) => constants.iter().position(|c| c == s),
                _ => None,
            }
            .ok_or_else(fail)?;
            TypedValue::Enum {
                ordinal,
                name: constants[ordinal].clone(),
            }
        }
        HostType::Opaque(_) => TypedValue::Raw(raw.clone()),
    };
    Ok(value)
}

/// Converts every operand of a list, element by element
pub fn coerce_list(raw: &[Value], target: &HostType, field: &str) -> CompileResult<Vec<TypedValue>> {
    raw.iter().map(|v| coerce(v, target, field)).collect()
}

fn text(raw: &Value) -> Option<&str> {
    raw.as_str()
}

/// Integral value of a number or numeric text. `30.0` is integral, `30.5` is not.
fn integer(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => integral(n),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn integral(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    let f = n.as_f64()?;
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn float(raw: &Value) -> Option<f64> {
    match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn parse_zoned(s: &str) -> Option<TypedValue> {
    let (stamp, zone) = match s.find('[') {
        Some(open) => {
            let zone = s[open + 1..].strip_suffix(']')?;
            if !zone_id_pattern().is_match(zone) {
                return None;
            }
            (&s[..open], Some(zone.to_string()))
        }
        None => (s, None),
    };
    let at = parse_offset(stamp)?;
    Some(TypedValue::Zoned { at, zone })
}

/// ISO local date-time; seconds and fraction are optional
fn parse_local(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .ok()
}

/// ISO offset date-time; seconds are optional and `Z` means UTC
fn parse_offset(s: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(s) {
        return Some(at);
    }
    let normalized = match s.strip_suffix('Z').or_else(|| s.strip_suffix('z')) {
        Some(stamp) => format!("{}+00:00", stamp),
        None => s.to_string(),
    };
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M%:z").ok()
}

/// Region id shape (`Area/Location`, `UTC`, `Etc/GMT+3`). Only the shape
/// is checked; there is no zone database.
fn zone_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9_+\-]*(/[A-Za-z0-9_+\-]+)*$").expect("static zone pattern")
    })
}
