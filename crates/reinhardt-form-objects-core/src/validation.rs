//! Built-in form-level validation rules.
//!
//! Rules are attached to exposed attributes with
//! [`FormSchemaBuilder::validates`](crate::FormSchemaBuilder::validates) and
//! run against the value the form currently exposes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Check performed by a [`Validation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rule {
	Presence,
	Length {
		minimum: Option<usize>,
		maximum: Option<usize>,
		is: Option<usize>,
	},
	Inclusion {
		within: Vec<Value>,
	},
}

/// A rule with an optional custom message.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::Validation;
/// use serde_json::json;
///
/// let rule = Validation::length().maximum(10);
/// assert_eq!(rule.check(&json!("short")), None);
/// assert_eq!(
///     rule.check(&json!("a very long name")).as_deref(),
///     Some("is too long (maximum is 10 characters)")
/// );
///
/// let rule = Validation::presence().with_message("is required");
/// assert_eq!(rule.check(&json!("  ")).as_deref(), Some("is required"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Validation {
	pub rule: Rule,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
}

impl Validation {
	pub fn presence() -> Self {
		Self::from(Rule::Presence)
	}

	/// A length rule without bounds; add them with [`minimum`](Self::minimum),
	/// [`maximum`](Self::maximum) or [`is`](Self::is).
	pub fn length() -> Self {
		Self::from(Rule::Length {
			minimum: None,
			maximum: None,
			is: None,
		})
	}

	pub fn inclusion<I, V>(within: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<Value>,
	{
		Self::from(Rule::Inclusion {
			within: within.into_iter().map(Into::into).collect(),
		})
	}

	pub fn minimum(mut self, bound: usize) -> Self {
		if let Rule::Length { minimum, .. } = &mut self.rule {
			*minimum = Some(bound);
		}
		self
	}

	pub fn maximum(mut self, bound: usize) -> Self {
		if let Rule::Length { maximum, .. } = &mut self.rule {
			*maximum = Some(bound);
		}
		self
	}

	pub fn is(mut self, exact: usize) -> Self {
		if let Rule::Length { is, .. } = &mut self.rule {
			*is = Some(exact);
		}
		self
	}

	/// Replace the default failure message.
	pub fn with_message(mut self, message: impl Into<String>) -> Self {
		self.message = Some(message.into());
		self
	}

	/// The failure message for `value`, or `None` when it passes.
	pub fn check(&self, value: &Value) -> Option<String> {
		let default = match &self.rule {
			Rule::Presence => is_blank(value).then(|| "can't be blank".to_string()),
			Rule::Length {
				minimum,
				maximum,
				is,
			} => {
				let length = length_of(value);
				if let Some(exact) = is.filter(|exact| length != *exact) {
					Some(format!(
						"is the wrong length (should be {})",
						characters(exact)
					))
				} else if let Some(min) = minimum.filter(|min| length < *min) {
					Some(format!("is too short (minimum is {})", characters(min)))
				} else {
					maximum
						.filter(|max| length > *max)
						.map(|max| format!("is too long (maximum is {})", characters(max)))
				}
			}
			Rule::Inclusion { within } => (!within.contains(value))
				.then(|| "is not included in the list".to_string()),
		}?;
		Some(self.message.clone().unwrap_or(default))
	}
}

impl From<Rule> for Validation {
	fn from(rule: Rule) -> Self {
		Self {
			rule,
			message: None,
		}
	}
}

/// `null`, `false`, whitespace-only strings, and empty arrays or objects.
pub fn is_blank(value: &Value) -> bool {
	match value {
		Value::Null => true,
		Value::Bool(b) => !b,
		Value::String(s) => s.trim().is_empty(),
		Value::Array(items) => items.is_empty(),
		Value::Object(map) => map.is_empty(),
		Value::Number(_) => false,
	}
}

fn length_of(value: &Value) -> usize {
	match value {
		Value::Null => 0,
		Value::String(s) => s.chars().count(),
		Value::Array(items) => items.len(),
		Value::Object(map) => map.len(),
		other => other.to_string().chars().count(),
	}
}

fn characters(count: usize) -> String {
	if count == 1 {
		"1 character".to_string()
	} else {
		format!("{count} characters")
	}
}
