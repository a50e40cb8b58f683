//! Errors as seen through a form object.
//!
//! Backing records report errors under their own attribute names. The
//! [`ErrorTranslator`] rewrites those keys into the names the form exposes so
//! callers never see backing names for exposed attributes.

use crate::error::FormObjectResult;
use crate::form::FormObject;
use crate::schema::BackingModel;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Index;

/// Key for errors that are not tied to any attribute.
pub const BASE: &str = "base";

/// Error messages keyed by exposed attribute name, `base`, or a dotted nested
/// path such as `line_items.qty`.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::ExposedErrors;
///
/// let mut errors = ExposedErrors::new();
/// errors.add("line_items.qty", "must be greater than 0");
/// errors.add("base", "Order is locked");
///
/// assert_eq!(errors["line_items.qty"], ["must be greater than 0".to_string()]);
/// assert!(errors["email"].is_empty());
/// assert_eq!(
///     errors.full_messages(),
///     vec!["Line items qty must be greater than 0", "Order is locked"]
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExposedErrors {
	messages: IndexMap<String, Vec<String>>,
}

impl ExposedErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
		self.messages
			.entry(key.into())
			.or_default()
			.push(message.into());
	}

	/// Messages for `key`; empty when there are none.
	pub fn get(&self, key: &str) -> &[String] {
		self.messages.get(key).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn base(&self) -> &[String] {
		self.get(BASE)
	}

	pub fn contains_key(&self, key: &str) -> bool {
		!self.get(key).is_empty()
	}

	pub fn is_empty(&self) -> bool {
		self.messages.values().all(Vec::is_empty)
	}

	/// Total number of messages.
	pub fn len(&self) -> usize {
		self.messages.values().map(Vec::len).sum()
	}

	pub fn clear(&mut self) {
		self.messages.clear();
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.messages
			.iter()
			.filter(|(_, messages)| !messages.is_empty())
			.map(|(key, _)| key.as_str())
	}

	/// `(key, message)` pairs in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.messages.iter().flat_map(|(key, messages)| {
			messages
				.iter()
				.map(move |message| (key.as_str(), message.as_str()))
		})
	}

	/// Append every message of `other`, keeping its order.
	pub fn merge(&mut self, other: ExposedErrors) {
		for (key, messages) in other.messages {
			self.messages.entry(key).or_default().extend(messages);
		}
	}

	/// Human readable messages. Base messages are rendered as is; others are
	/// prefixed with the humanized key.
	pub fn full_messages(&self) -> Vec<String> {
		self.iter()
			.map(|(key, message)| {
				if key == BASE {
					message.to_string()
				} else {
					format!("{} {}", humanize(key), message)
				}
			})
			.collect()
	}
}

impl Index<&str> for ExposedErrors {
	type Output = [String];

	fn index(&self, key: &str) -> &Self::Output {
		self.get(key)
	}
}

fn humanize(key: &str) -> String {
	let spaced = key.replace(['.', '_'], " ");
	let mut chars = spaced.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// Progress of error collection on one form instance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslatorState {
	/// Errors were reset and nothing has been collected since.
	#[default]
	Idle,
	Collecting,
	Populated,
}

/// Rewrites backing record errors into exposed names.
///
/// For each backing model, in declaration order, the forward table is the
/// model's exposure mapping plus `base -> base`, plus for each collection on
/// that model `exposed -> association` and, once a child form is loaded,
/// `exposed.child -> association.child_backing` for every child exposure. The
/// table is inverted with the first exposed name winning when two exposed
/// names share a backing key. Keys absent from the reverse table pass through
/// unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorTranslator;

impl ErrorTranslator {
	/// Clear the form's exposed errors.
	pub fn reset<F: FormObject>(form: &mut F) {
		let state = form.form_state_mut();
		state.errors.clear();
		state.translator = TranslatorState::Idle;
	}

	/// Append every backing model's errors to the form's exposed errors.
	///
	/// Failures reading a record's errors propagate unchanged.
	pub fn collect<F: FormObject>(form: &mut F) -> FormObjectResult<()> {
		let schema = F::schema();
		form.form_state_mut().translator = TranslatorState::Collecting;

		for model in schema.backing_models() {
			let lookup = Self::reverse_lookup(form, model);
			let raw = model.record(form).errors()?;
			let errors = &mut form.form_state_mut().errors;
			for (key, message) in raw.iter() {
				let exposed = match lookup.get(key) {
					Some(exposed) => exposed.as_str(),
					None => {
						tracing::trace!(
							form = schema.form_name(),
							model = model.name(),
							key,
							"passing through unmapped error key"
						);
						key
					}
				};
				errors.add(exposed, message);
			}
		}

		form.form_state_mut().translator = TranslatorState::Populated;
		Ok(())
	}

	/// Backing key to exposed name for one backing model of `form`.
	pub fn reverse_lookup<F: FormObject>(
		form: &F,
		model: &BackingModel<F>,
	) -> HashMap<String, String> {
		let mut forward: Vec<(String, String)> = model
			.attributes()
			.iter()
			.map(|(exposed, backing)| (exposed.clone(), backing.clone()))
			.collect();
		forward.push((BASE.to_string(), BASE.to_string()));

		for spec in F::schema().collections_on(model.name()) {
			forward.push((
				spec.exposed_name().to_string(),
				spec.association().to_string(),
			));
			for (child_exposed, child_backing) in spec.collection(form).child_mappings() {
				forward.push((
					format!("{}.{}", spec.exposed_name(), child_exposed),
					format!("{}.{}", spec.association(), child_backing),
				));
			}
		}

		let mut reverse = HashMap::with_capacity(forward.len());
		for (exposed, backing) in forward {
			reverse.entry(backing).or_insert(exposed);
		}
		reverse
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("email", "Email")]
	#[case("phone_number", "Phone number")]
	#[case("line_items.qty", "Line items qty")]
	#[case("", "")]
	fn test_humanize(#[case] key: &str, #[case] expected: &str) {
		assert_eq!(humanize(key), expected);
	}

	#[rstest]
	fn test_merge_appends_in_order() {
		let mut errors = ExposedErrors::new();
		errors.add("name", "is too long (maximum is 10 characters)");
		let mut other = ExposedErrors::new();
		other.add("email", "can't be blank");
		other.add("name", "is invalid");

		errors.merge(other);

		assert_eq!(errors.len(), 3);
		assert_eq!(errors.keys().collect::<Vec<_>>(), vec!["name", "email"]);
		assert_eq!(
			errors.get("name"),
			[
				"is too long (maximum is 10 characters)".to_string(),
				"is invalid".to_string()
			]
		);
	}

	#[rstest]
	fn test_clear_and_base() {
		let mut errors = ExposedErrors::new();
		errors.add(BASE, "Customer needs to be friendly");
		assert_eq!(errors.base(), ["Customer needs to be friendly".to_string()]);
		assert!(errors.contains_key(BASE));

		errors.clear();

		assert!(errors.is_empty());
		assert!(!errors.contains_key(BASE));
	}

	#[rstest]
	fn test_serializes_as_plain_map() {
		let mut errors = ExposedErrors::new();
		errors.add("email", "can't be blank");

		let json = serde_json::to_value(&errors).unwrap();

		assert_eq!(json, serde_json::json!({"email": ["can't be blank"]}));
	}
}
