//! Lenient attribute casting.
//!
//! Casting never fails: input that cannot be represented in the target type
//! becomes `null`, the same way ActiveModel attribute types behave.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &[
	"%Y-%m-%dT%H:%M:%S",
	"%Y-%m-%d %H:%M:%S",
	"%Y-%m-%dT%H:%M",
	"%Y-%m-%d %H:%M",
];

/// Type of an attribute value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
	/// Stored as given.
	#[default]
	Value,
	String,
	Integer,
	Float,
	Boolean,
	Date,
	DateTime,
}

impl AttributeType {
	/// Cast `value` to this type.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_form_objects_core::AttributeType;
	/// use serde_json::{Value, json};
	///
	/// assert_eq!(AttributeType::Boolean.cast(json!("0")), json!(false));
	/// assert_eq!(AttributeType::Integer.cast(json!("42")), json!(42));
	/// assert_eq!(AttributeType::Integer.cast(json!("forty-two")), Value::Null);
	/// assert_eq!(AttributeType::Date.cast(json!("01/15/2025")), json!("2025-01-15"));
	/// ```
	pub fn cast(self, value: Value) -> Value {
		if value.is_null() {
			return Value::Null;
		}
		match self {
			Self::Value => value,
			Self::String => cast_string(value),
			Self::Integer => cast_integer(&value),
			Self::Float => cast_float(&value),
			Self::Boolean => cast_boolean(&value),
			Self::Date => cast_date(&value),
			Self::DateTime => cast_datetime(&value),
		}
	}
}

fn cast_string(value: Value) -> Value {
	match value {
		Value::String(_) => value,
		Value::Bool(b) => Value::String(if b { "t" } else { "f" }.to_string()),
		Value::Number(n) => Value::String(n.to_string()),
		other => Value::String(other.to_string()),
	}
}

fn cast_integer(value: &Value) -> Value {
	match value {
		Value::Number(n) => n
			.as_i64()
			.or_else(|| n.as_f64().map(|f| f.trunc() as i64))
			.map(Value::from)
			.unwrap_or(Value::Null),
		Value::String(s) => {
			let trimmed = s.trim();
			trimmed
				.parse::<i64>()
				.ok()
				.or_else(|| trimmed.parse::<f64>().ok().map(|f| f.trunc() as i64))
				.map(Value::from)
				.unwrap_or(Value::Null)
		}
		Value::Bool(b) => Value::from(i64::from(*b)),
		_ => Value::Null,
	}
}

fn cast_float(value: &Value) -> Value {
	let parsed = match value {
		Value::Number(n) => n.as_f64(),
		Value::String(s) => s.trim().parse::<f64>().ok(),
		_ => None,
	};
	parsed
		.and_then(Number::from_f64)
		.map(Value::Number)
		.unwrap_or(Value::Null)
}

fn cast_boolean(value: &Value) -> Value {
	match value {
		Value::Bool(_) => value.clone(),
		Value::Number(n) => Value::Bool(n.as_f64() != Some(0.0)),
		Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
			"" => Value::Null,
			"0" | "f" | "false" | "off" | "n" | "no" => Value::Bool(false),
			_ => Value::Bool(true),
		},
		_ => Value::Null,
	}
}

fn cast_date(value: &Value) -> Value {
	let Some(s) = value.as_str().map(str::trim) else {
		return Value::Null;
	};
	DATE_FORMATS
		.iter()
		.find_map(|format| NaiveDate::parse_from_str(s, format).ok())
		.or_else(|| parse_datetime(s).map(|dt| dt.date()))
		.map(|date| Value::String(date.format("%Y-%m-%d").to_string()))
		.unwrap_or(Value::Null)
}

fn cast_datetime(value: &Value) -> Value {
	value
		.as_str()
		.and_then(|s| parse_datetime(s.trim()))
		.map(|dt| Value::String(dt.format("%Y-%m-%dT%H:%M:%S").to_string()))
		.unwrap_or(Value::Null)
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
	DATETIME_FORMATS
		.iter()
		.find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(true), json!(true))]
	#[case(json!("false"), json!(false))]
	#[case(json!("off"), json!(false))]
	#[case(json!("1"), json!(true))]
	#[case(json!(""), Value::Null)]
	#[case(json!(0), json!(false))]
	fn test_boolean_cast(#[case] input: Value, #[case] expected: Value) {
		assert_eq!(AttributeType::Boolean.cast(input), expected);
	}

	#[rstest]
	#[case(json!(12.9), json!(12))]
	#[case(json!(" 7 "), json!(7))]
	#[case(json!("3.5"), json!(3))]
	#[case(json!([1]), Value::Null)]
	fn test_integer_cast(#[case] input: Value, #[case] expected: Value) {
		assert_eq!(AttributeType::Integer.cast(input), expected);
	}

	#[rstest]
	fn test_string_cast_keeps_strings_and_formats_scalars() {
		assert_eq!(AttributeType::String.cast(json!("abc")), json!("abc"));
		assert_eq!(AttributeType::String.cast(json!(10)), json!("10"));
	}

	#[rstest]
	fn test_datetime_cast_normalizes_separator() {
		assert_eq!(
			AttributeType::DateTime.cast(json!("2024-02-29 08:30")),
			json!("2024-02-29T08:30:00")
		);
		assert_eq!(AttributeType::DateTime.cast(json!("yesterday")), Value::Null);
	}

	#[rstest]
	fn test_null_stays_null_for_every_type() {
		for ty in [
			AttributeType::Value,
			AttributeType::String,
			AttributeType::Integer,
			AttributeType::Boolean,
			AttributeType::Date,
		] {
			assert_eq!(ty.cast(Value::Null), Value::Null);
		}
	}
}
