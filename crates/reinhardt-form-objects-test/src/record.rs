//! In-memory backing records for exercising form objects.

use anyhow::anyhow;
use indexmap::IndexMap;
use reinhardt_form_objects_core::{
	AttributeType, BackingRecord, RecordErrors, RecordResult, SaveOptions, SharedRecord,
	validation::is_blank,
};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Validation hook of a [`MemoryRecord`].
pub type RecordRule = Arc<dyn Fn(&MemoryRecord, &mut RecordErrors) + Send + Sync>;

/// A backing record that keeps its attributes in memory.
///
/// Attributes are declared up front; reading or writing anything else fails
/// like a missing column would. Saving snapshots the attributes so tests can
/// tell persisted state apart from pending writes.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::{BackingRecord, SaveOptions};
/// use reinhardt_form_objects_test::record::MemoryRecord;
/// use serde_json::json;
///
/// let mut record = MemoryRecord::new("customer")
///     .with_attribute("email", json!("ann@example.com"))
///     .validates_presence_of("email");
///
/// record.write_attribute("email", json!("")).unwrap();
/// assert!(!record.save(&SaveOptions::default()).unwrap());
/// assert_eq!(record.errors().unwrap().on("email"), ["can't be blank".to_string()]);
///
/// assert!(record.save(&SaveOptions::skip_validation()).unwrap());
/// assert_eq!(record.save_count(), 1);
/// ```
#[derive(Clone)]
pub struct MemoryRecord {
	model: String,
	attributes: IndexMap<String, Value>,
	types: IndexMap<String, AttributeType>,
	rules: Vec<RecordRule>,
	associations: IndexMap<String, Vec<SharedRecord>>,
	errors: RecordErrors,
	persisted: Option<IndexMap<String, Value>>,
	save_count: usize,
	errors_failure: Option<String>,
	save_failure: Option<String>,
	silent_rejection: bool,
}

impl MemoryRecord {
	pub fn new(model: impl Into<String>) -> Self {
		Self {
			model: model.into(),
			attributes: IndexMap::new(),
			types: IndexMap::new(),
			rules: Vec::new(),
			associations: IndexMap::new(),
			errors: RecordErrors::new(),
			persisted: None,
			save_count: 0,
			errors_failure: None,
			save_failure: None,
			silent_rejection: false,
		}
	}

	pub fn with_attribute(self, name: impl Into<String>, value: Value) -> Self {
		self.with_typed_attribute(name, AttributeType::Value, value)
	}

	/// Declare an attribute whose writes are cast to `ty`.
	pub fn with_typed_attribute(
		mut self,
		name: impl Into<String>,
		ty: AttributeType,
		value: Value,
	) -> Self {
		let name = name.into();
		self.attributes.insert(name.clone(), ty.cast(value));
		self.types.insert(name, ty);
		self
	}

	pub fn validates_presence_of(self, attribute: impl Into<String>) -> Self {
		let attribute = attribute.into();
		self.validates_with(move |record, errors| {
			if is_blank(&record.attribute(&attribute)) {
				errors.add(attribute.clone(), "can't be blank");
			}
		})
	}

	pub fn validates_with<R>(mut self, rule: R) -> Self
	where
		R: Fn(&MemoryRecord, &mut RecordErrors) + Send + Sync + 'static,
	{
		self.rules.push(Arc::new(rule));
		self
	}

	/// Attach a has-many association. Child errors are reported under
	/// `association.attribute`.
	pub fn has_many<I>(mut self, association: impl Into<String>, children: I) -> Self
	where
		I: IntoIterator<Item = SharedRecord>,
	{
		self.associations
			.insert(association.into(), children.into_iter().collect());
		self
	}

	/// Make every call to `errors()` fail with `message`.
	pub fn failing_errors(mut self, message: impl Into<String>) -> Self {
		self.errors_failure = Some(message.into());
		self
	}

	/// Make every save fail with `message` after validation passed.
	pub fn failing_save(mut self, message: impl Into<String>) -> Self {
		self.save_failure = Some(message.into());
		self
	}

	/// Make validation fail without reporting any message.
	pub fn rejecting_silently(mut self) -> Self {
		self.silent_rejection = true;
		self
	}

	pub fn model(&self) -> &str {
		&self.model
	}

	/// Current value of `name`, or `null` when undeclared.
	pub fn attribute(&self, name: &str) -> Value {
		self.attributes.get(name).cloned().unwrap_or(Value::Null)
	}

	/// Attribute values as of the last successful save.
	pub fn persisted(&self) -> Option<&IndexMap<String, Value>> {
		self.persisted.as_ref()
	}

	pub fn persisted_attribute(&self, name: &str) -> Option<Value> {
		self.persisted.as_ref()?.get(name).cloned()
	}

	pub fn is_persisted(&self) -> bool {
		self.persisted.is_some()
	}

	pub fn save_count(&self) -> usize {
		self.save_count
	}

	pub fn children(&self, association: &str) -> &[SharedRecord] {
		self.associations
			.get(association)
			.map(Vec::as_slice)
			.unwrap_or_default()
	}
}

impl BackingRecord for MemoryRecord {
	fn read_attribute(&self, name: &str) -> RecordResult<Value> {
		self.attributes
			.get(name)
			.cloned()
			.ok_or_else(|| anyhow!("unknown attribute `{name}` for {}", self.model))
	}

	fn write_attribute(&mut self, name: &str, value: Value) -> RecordResult<()> {
		let ty = *self
			.types
			.get(name)
			.ok_or_else(|| anyhow!("unknown attribute `{name}` for {}", self.model))?;
		self.attributes.insert(name.to_string(), ty.cast(value));
		Ok(())
	}

	fn validate(&mut self) -> RecordResult<bool> {
		let mut errors = RecordErrors::new();
		for rule in &self.rules {
			rule(&*self, &mut errors);
		}
		for (association, children) in &self.associations {
			for child in children {
				let mut child = child.lock();
				if !child.validate()? {
					for (key, message) in child.errors()?.iter() {
						errors.add(format!("{association}.{key}"), message);
					}
				}
			}
		}
		tracing::trace!(model = %self.model, errors = ?errors, "validated memory record");
		self.errors = errors;
		Ok(self.errors.is_empty() && !self.silent_rejection)
	}

	fn save(&mut self, options: &SaveOptions) -> RecordResult<bool> {
		if options.validate && !self.validate()? {
			return Ok(false);
		}
		if let Some(message) = &self.save_failure {
			return Err(anyhow!("{message}"));
		}
		for children in self.associations.values() {
			for child in children {
				child.lock().save(&SaveOptions::skip_validation())?;
			}
		}
		self.persisted = Some(self.attributes.clone());
		self.save_count += 1;
		Ok(true)
	}

	fn errors(&self) -> RecordResult<RecordErrors> {
		match &self.errors_failure {
			Some(message) => Err(anyhow!("{message}")),
			None => Ok(self.errors.clone()),
		}
	}

	fn association(&self, name: &str) -> RecordResult<Vec<SharedRecord>> {
		self.associations
			.get(name)
			.cloned()
			.ok_or_else(|| anyhow!("`{name}` is not an association of {}", self.model))
	}
}

impl fmt::Debug for MemoryRecord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("MemoryRecord")
			.field("model", &self.model)
			.field("attributes", &self.attributes)
			.field("errors", &self.errors)
			.field("associations", &self.associations.keys().collect::<Vec<_>>())
			.field("save_count", &self.save_count)
			.finish_non_exhaustive()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_form_objects_core::share;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_typed_attributes_cast_on_write() {
		let mut record = MemoryRecord::new("line_item").with_typed_attribute(
			"quantity",
			AttributeType::Integer,
			json!("2"),
		);
		assert_eq!(record.attribute("quantity"), json!(2));

		record.write_attribute("quantity", json!("5")).unwrap();

		assert_eq!(record.read_attribute("quantity").unwrap(), json!(5));
	}

	#[rstest]
	fn test_unknown_attribute_is_an_error() {
		let mut record = MemoryRecord::new("customer");

		assert!(record.read_attribute("nickname").is_err());
		let error = record.write_attribute("nickname", json!("x")).unwrap_err();
		assert_eq!(error.to_string(), "unknown attribute `nickname` for customer");
	}

	#[rstest]
	fn test_child_errors_are_prefixed_with_association() {
		let child = share(
			MemoryRecord::new("line_item")
				.with_attribute("quantity", Value::Null)
				.validates_presence_of("quantity"),
		);
		let mut order = MemoryRecord::new("order").has_many("items", [child]);

		assert!(!order.validate().unwrap());
		assert_eq!(
			order.errors().unwrap().on("items.quantity"),
			["can't be blank".to_string()]
		);
	}

	#[rstest]
	fn test_save_snapshots_attributes() {
		let mut record = MemoryRecord::new("customer").with_attribute("name", json!("Ann"));

		assert!(record.save(&SaveOptions::default()).unwrap());
		record.write_attribute("name", json!("Bea")).unwrap();

		assert_eq!(record.persisted_attribute("name"), Some(json!("Ann")));
		assert_eq!(record.attribute("name"), json!("Bea"));
	}

	#[rstest]
	fn test_failure_switches() {
		let record = MemoryRecord::new("customer").failing_errors("errors unavailable");
		assert_eq!(record.errors().unwrap_err().to_string(), "errors unavailable");

		let mut record = MemoryRecord::new("customer").failing_save("disk full");
		assert_eq!(
			record.save(&SaveOptions::default()).unwrap_err().to_string(),
			"disk full"
		);
		assert!(!record.is_persisted());

		let mut record = MemoryRecord::new("customer").rejecting_silently();
		assert!(!record.validate().unwrap());
		assert!(record.errors().unwrap().is_empty());
	}
}
