//! Multiparameter attribute assembly.
//!
//! HTML date selects submit one key per component, such as `born_on(1i)`,
//! `born_on(2i)` and `born_on(3i)`. Parts are grouped by attribute, cast by
//! their suffix (`i` integer, `f` float, `s` or none string) and assembled into
//! a single value:
//!
//! - positions 1-3 only: a date, `YYYY-MM-DD`
//! - positions 1-5 or 1-6: a datetime, `YYYY-MM-DDTHH:MM:SS`
//! - positions 4-5 or 4-6 only: a time, `HH:MM:SS`
//! - anything else: an array of the parts in position order
//!
//! All parts blank yields `null`, as does a date missing its year, month or
//! day.

use crate::error::{FormObjectError, FormObjectResult};
use chrono::{NaiveDate, NaiveTime};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Number, Value};
use std::collections::BTreeMap;
use std::sync::LazyLock;

static PART_KEY: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^(?P<name>[^()]+)\((?P<position>\d+)(?P<kind>[ifs])?\)$")
		.expect("valid multiparameter key regex")
});

type Parts = BTreeMap<usize, Option<Value>>;

/// Group and assemble multiparameter pairs into `attribute -> value`.
///
/// # Examples
///
/// ```
/// use indexmap::IndexMap;
/// use reinhardt_form_objects_core::multiparameter::assemble;
/// use serde_json::json;
///
/// let mut parts = IndexMap::new();
/// parts.insert("born_on(1i)".to_string(), json!("1990"));
/// parts.insert("born_on(2i)".to_string(), json!("7"));
/// parts.insert("born_on(3i)".to_string(), json!("4"));
///
/// let assembled = assemble(parts).unwrap();
/// assert_eq!(assembled["born_on"], json!("1990-07-04"));
/// ```
pub fn assemble(pairs: IndexMap<String, Value>) -> FormObjectResult<IndexMap<String, Value>> {
	let mut grouped: IndexMap<String, Parts> = IndexMap::new();
	for (key, value) in pairs {
		let captures = PART_KEY.captures(&key).ok_or_else(|| FormObjectError::Multiparameter {
			attribute: key.clone(),
			message: "malformed multiparameter key".to_string(),
		})?;
		let name = captures["name"].to_string();
		let position: usize = captures["position"].parse().map_err(|_| FormObjectError::Multiparameter {
			attribute: name.clone(),
			message: format!("invalid position in `{key}`"),
		})?;
		let kind = captures.name("kind").map(|m| m.as_str());
		let part = cast_part(&name, kind, value)?;
		grouped.entry(name).or_default().insert(position, part);
	}

	let mut assembled = IndexMap::with_capacity(grouped.len());
	for (name, parts) in grouped {
		let value = assemble_parts(&name, &parts)?;
		tracing::trace!(attribute = name.as_str(), %value, "assembled multiparameter attribute");
		assembled.insert(name, value);
	}
	Ok(assembled)
}

fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::String(s) => s.trim().is_empty(),
		_ => false,
	}
}

fn cast_part(name: &str, kind: Option<&str>, value: Value) -> FormObjectResult<Option<Value>> {
	if is_blank(&value) {
		return Ok(None);
	}
	let invalid = |expected: &str| FormObjectError::Multiparameter {
		attribute: name.to_string(),
		message: format!("`{value}` is not a valid {expected}"),
	};
	let cast = match kind {
		Some("i") => Value::from(as_integer(&value).ok_or_else(|| invalid("integer"))?),
		Some("f") => {
			let float = match &value {
				Value::Number(n) => n.as_f64(),
				Value::String(s) => s.trim().parse::<f64>().ok(),
				_ => None,
			};
			float
				.and_then(Number::from_f64)
				.map(Value::Number)
				.ok_or_else(|| invalid("float"))?
		}
		_ => match &value {
			Value::String(_) => value.clone(),
			other => Value::String(other.to_string()),
		},
	};
	Ok(Some(cast))
}

fn as_integer(value: &Value) -> Option<i64> {
	match value {
		Value::Number(n) => n.as_i64(),
		Value::String(s) => s.trim().parse().ok(),
		_ => None,
	}
}

fn assemble_parts(name: &str, parts: &Parts) -> FormObjectResult<Value> {
	if parts.values().all(Option::is_none) {
		return Ok(Value::Null);
	}

	let temporal = parts.keys().all(|p| (1..=6).contains(p));
	let has = |positions: std::ops::RangeInclusive<usize>| positions.into_iter().all(|p| parts.contains_key(&p));
	let any_date_position = parts.keys().any(|p| *p <= 3);
	let any_time_position = parts.keys().any(|p| *p >= 4);

	if temporal && has(1..=3) && !any_time_position {
		return date(name, parts).map(|date| {
			date.map(|d| Value::String(d.format("%Y-%m-%d").to_string()))
				.unwrap_or(Value::Null)
		});
	}
	if temporal && has(1..=5) {
		let Some(date) = date(name, parts)? else {
			return Ok(Value::Null);
		};
		let time = time(name, parts)?;
		return Ok(Value::String(
			date.and_time(time).format("%Y-%m-%dT%H:%M:%S").to_string(),
		));
	}
	if temporal && has(4..=5) && !any_date_position {
		let time = time(name, parts)?;
		return Ok(Value::String(time.format("%H:%M:%S").to_string()));
	}

	Ok(Value::Array(
		parts
			.values()
			.map(|part| part.clone().unwrap_or(Value::Null))
			.collect(),
	))
}

fn component(name: &str, parts: &Parts, position: usize) -> FormObjectResult<Option<i64>> {
	match parts.get(&position).and_then(Option::as_ref) {
		None => Ok(None),
		Some(value) => as_integer(value).map(Some).ok_or_else(|| FormObjectError::Multiparameter {
			attribute: name.to_string(),
			message: format!("`{value}` is not a valid integer at position {position}"),
		}),
	}
}

fn out_of_range(name: &str, what: &str) -> FormObjectError {
	FormObjectError::Multiparameter {
		attribute: name.to_string(),
		message: format!("invalid {what}"),
	}
}

fn date(name: &str, parts: &Parts) -> FormObjectResult<Option<NaiveDate>> {
	let (Some(year), Some(month), Some(day)) = (
		component(name, parts, 1)?,
		component(name, parts, 2)?,
		component(name, parts, 3)?,
	) else {
		return Ok(None);
	};
	let year = i32::try_from(year).map_err(|_| out_of_range(name, "date"))?;
	let month = u32::try_from(month).map_err(|_| out_of_range(name, "date"))?;
	let day = u32::try_from(day).map_err(|_| out_of_range(name, "date"))?;
	NaiveDate::from_ymd_opt(year, month, day)
		.map(Some)
		.ok_or_else(|| out_of_range(name, "date"))
}

fn time(name: &str, parts: &Parts) -> FormObjectResult<NaiveTime> {
	let mut hms = [0u32; 3];
	for (slot, position) in hms.iter_mut().zip(4..=6) {
		if let Some(value) = component(name, parts, position)? {
			*slot = u32::try_from(value).map_err(|_| out_of_range(name, "time"))?;
		}
	}
	NaiveTime::from_hms_opt(hms[0], hms[1], hms[2]).ok_or_else(|| out_of_range(name, "time"))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	fn parts(pairs: &[(&str, Value)]) -> IndexMap<String, Value> {
		pairs
			.iter()
			.map(|(key, value)| (key.to_string(), value.clone()))
			.collect()
	}

	#[rstest]
	fn test_datetime_from_five_parts() {
		let assembled = assemble(parts(&[
			("starts_at(1i)", json!("2024")),
			("starts_at(2i)", json!("2")),
			("starts_at(3i)", json!("29")),
			("starts_at(4i)", json!("13")),
			("starts_at(5i)", json!("05")),
		]))
		.unwrap();

		assert_eq!(assembled["starts_at"], json!("2024-02-29T13:05:00"));
	}

	#[rstest]
	fn test_time_only() {
		let assembled = assemble(parts(&[
			("opens_at(4i)", json!(9)),
			("opens_at(5i)", json!(30)),
		]))
		.unwrap();

		assert_eq!(assembled["opens_at"], json!("09:30:00"));
	}

	#[rstest]
	#[case(parts(&[("born_on(1i)", json!("")), ("born_on(2i)", json!("")), ("born_on(3i)", json!(""))]))]
	#[case(parts(&[("born_on(1i)", json!("")), ("born_on(2i)", json!("3")), ("born_on(3i)", json!("1"))]))]
	fn test_blank_dates_become_null(#[case] input: IndexMap<String, Value>) {
		assert_eq!(assemble(input).unwrap()["born_on"], Value::Null);
	}

	#[rstest]
	fn test_other_layouts_become_arrays() {
		let assembled = assemble(parts(&[
			("dimensions(1f)", json!("2.5")),
			("dimensions(2s)", json!(3)),
			("dimensions(7)", json!("x")),
		]))
		.unwrap();

		assert_eq!(assembled["dimensions"], json!([2.5, "3", "x"]));
	}

	#[rstest]
	fn test_impossible_date_is_an_error() {
		let error = assemble(parts(&[
			("born_on(1i)", json!("2023")),
			("born_on(2i)", json!("2")),
			("born_on(3i)", json!("30")),
		]))
		.unwrap_err();

		assert!(matches!(
			error,
			FormObjectError::Multiparameter { ref attribute, .. } if attribute == "born_on"
		));
	}

	#[rstest]
	#[case("born_on(1x)")]
	#[case("(1i)")]
	#[case("born_on(i)")]
	fn test_malformed_keys(#[case] key: &str) {
		let error = assemble(parts(&[(key, json!("1"))])).unwrap_err();
		assert!(error.to_string().contains("malformed multiparameter key"));
	}
}
