//! The backing record contract.
//!
//! Backing records own the data, run their own validations and persist
//! themselves. Form objects only delegate to them through [`BackingRecord`].

use crate::options::SaveOptions;
use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Result type for backing record operations.
///
/// Failures are opaque to form objects and propagate to the caller verbatim.
pub type RecordResult<T> = anyhow::Result<T>;

/// Shared handle to a record that is reachable both from its owner (for
/// example a has-many association) and from the child form wrapping it.
pub type SharedRecord = Arc<Mutex<dyn BackingRecord + Send>>;

/// Wrap a record into a [`SharedRecord`] handle.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::record::{BackingRecord, RecordErrors, RecordResult, share};
/// use reinhardt_form_objects_core::SaveOptions;
/// use serde_json::{Value, json};
///
/// struct Item(Value);
///
/// impl BackingRecord for Item {
///     fn read_attribute(&self, _name: &str) -> RecordResult<Value> { Ok(self.0.clone()) }
///     fn write_attribute(&mut self, _name: &str, value: Value) -> RecordResult<()> {
///         self.0 = value;
///         Ok(())
///     }
///     fn validate(&mut self) -> RecordResult<bool> { Ok(true) }
///     fn save(&mut self, _options: &SaveOptions) -> RecordResult<bool> { Ok(true) }
///     fn errors(&self) -> RecordResult<RecordErrors> { Ok(RecordErrors::new()) }
/// }
///
/// let item = share(Item(json!(1)));
/// assert_eq!(item.read_attribute("quantity").unwrap(), json!(1));
/// ```
pub fn share<R: BackingRecord + Send + 'static>(record: R) -> SharedRecord {
	Arc::new(Mutex::new(record))
}

/// A record whose attributes a form object exposes.
pub trait BackingRecord {
	/// Read a backing attribute.
	fn read_attribute(&self, name: &str) -> RecordResult<Value>;

	/// Write a backing attribute. Writers may normalize the value.
	fn write_attribute(&mut self, name: &str, value: Value) -> RecordResult<()>;

	/// Run the record's validations, replacing its errors.
	fn validate(&mut self) -> RecordResult<bool>;

	/// Persist the record. Returns `false` when validation prevented the save.
	fn save(&mut self, options: &SaveOptions) -> RecordResult<bool>;

	/// Errors recorded by the most recent validation.
	fn errors(&self) -> RecordResult<RecordErrors>;

	/// Elements of a has-many association.
	fn association(&self, name: &str) -> RecordResult<Vec<SharedRecord>> {
		Err(anyhow::anyhow!("`{name}` is not an association of this record"))
	}
}

impl<T> BackingRecord for Arc<Mutex<T>>
where
	T: BackingRecord + ?Sized,
{
	fn read_attribute(&self, name: &str) -> RecordResult<Value> {
		self.lock().read_attribute(name)
	}

	fn write_attribute(&mut self, name: &str, value: Value) -> RecordResult<()> {
		self.lock().write_attribute(name, value)
	}

	fn validate(&mut self) -> RecordResult<bool> {
		self.lock().validate()
	}

	fn save(&mut self, options: &SaveOptions) -> RecordResult<bool> {
		self.lock().save(options)
	}

	fn errors(&self) -> RecordResult<RecordErrors> {
		self.lock().errors()
	}

	fn association(&self, name: &str) -> RecordResult<Vec<SharedRecord>> {
		self.lock().association(name)
	}
}

/// Raw validation errors of a backing record, keyed by backing attribute
/// name, `base`, or a dotted association path such as `items.quantity`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordErrors {
	messages: IndexMap<String, Vec<String>>,
}

impl RecordErrors {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, key: impl Into<String>, message: impl Into<String>) {
		self.messages
			.entry(key.into())
			.or_default()
			.push(message.into());
	}

	pub fn on(&self, key: &str) -> &[String] {
		self.messages.get(key).map(Vec::as_slice).unwrap_or(&[])
	}

	pub fn is_empty(&self) -> bool {
		self.messages.values().all(Vec::is_empty)
	}

	pub fn clear(&mut self) {
		self.messages.clear();
	}

	/// `(key, message)` pairs in the order they were recorded.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.messages.iter().flat_map(|(key, messages)| {
			messages
				.iter()
				.map(move |message| (key.as_str(), message.as_str()))
		})
	}
}

impl<K, M> FromIterator<(K, M)> for RecordErrors
where
	K: Into<String>,
	M: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, M)>>(iter: I) -> Self {
		let mut errors = Self::new();
		for (key, message) in iter {
			errors.add(key, message);
		}
		errors
	}
}
