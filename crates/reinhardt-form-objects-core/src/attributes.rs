//! Attribute proxy: routes reads and writes of exposed names to backing
//! records, introduced attributes, or nested collections.

use crate::error::{FormObjectError, FormObjectResult};
use crate::form::FormObject;
use crate::multiparameter;
use crate::schema::{CollectionSpec, Resolution};
use indexmap::IndexMap;
use serde_json::{Map, Value};

fn not_exposed<F: FormObject>(name: &str) -> FormObjectError {
	FormObjectError::AttributeNotExposed {
		form: F::schema().form_name(),
		attribute: name.to_string(),
	}
}

/// Load the collection if it is not loaded yet.
pub(crate) fn ensure_loaded<F: FormObject>(
	form: &F,
	spec: &CollectionSpec<F>,
) -> FormObjectResult<()> {
	let collection = spec.collection(form);
	if collection.is_loaded() {
		return Ok(());
	}
	let schema = F::schema();
	let model = schema.backing_model(spec.model()).ok_or_else(|| {
		FormObjectError::UnknownBackingModel {
			form: schema.form_name(),
			model: spec.model().to_string(),
		}
	})?;
	collection.load(model.record(form), spec.association())
}

pub(crate) fn read<F: FormObject>(form: &F, name: &str) -> FormObjectResult<Value> {
	let schema = F::schema();
	match schema.resolve(name) {
		Some(Resolution::Backed { model, backing }) => {
			let record = schema.backing_models()[*model].record(form);
			Ok(record.read_attribute(backing)?)
		}
		Some(Resolution::Introduced(index)) => {
			let attribute = &schema.introduced_attributes()[*index];
			Ok(schema
				.introduced_state(*index, form)
				.introduced
				.get(&attribute.name)
				.cloned()
				.unwrap_or_else(|| attribute.default.clone()))
		}
		Some(Resolution::Collection(index)) => {
			let spec = &schema.collections()[*index];
			ensure_loaded(form, spec)?;
			spec.collection(form).read()
		}
		None => Err(not_exposed::<F>(name)),
	}
}

pub(crate) fn write<F: FormObject>(form: &mut F, name: &str, value: Value) -> FormObjectResult<()> {
	let schema = F::schema();
	match schema.resolve(name) {
		Some(Resolution::Backed { model, backing }) => {
			tracing::trace!(
				form = schema.form_name(),
				attribute = name,
				backing = backing.as_str(),
				"writing exposed attribute"
			);
			let record = schema.backing_models()[*model].record_mut(form);
			Ok(record.write_attribute(backing, value)?)
		}
		Some(Resolution::Introduced(index)) => {
			let attribute = &schema.introduced_attributes()[*index];
			let value = attribute.ty.cast(value);
			schema
				.introduced_state_mut(*index, form)
				.introduced
				.insert(attribute.name.clone(), value);
			Ok(())
		}
		Some(Resolution::Collection(index)) => {
			let spec = &schema.collections()[*index];
			ensure_loaded(form, spec)?;
			spec.collection_mut(form).write(value)
		}
		None => Err(not_exposed::<F>(name)),
	}
}

pub(crate) fn read_all<F: FormObject>(form: &F) -> FormObjectResult<Map<String, Value>> {
	let mut attributes = Map::new();
	for name in F::schema().attribute_names() {
		let value = read(form, &name)?;
		attributes.insert(name, value);
	}
	Ok(attributes)
}

/// Bulk assignment. Keys containing `(` are multiparameter parts and are
/// assigned after every plain key.
pub(crate) fn write_all<F: FormObject>(form: &mut F, attributes: Value) -> FormObjectResult<()> {
	let Value::Object(attributes) = attributes else {
		return Err(FormObjectError::non_mapping_assignment());
	};

	let mut multiparameter = IndexMap::new();
	for (key, value) in attributes {
		if key.contains('(') {
			multiparameter.insert(key, value);
		} else {
			write(form, &key, value)?;
		}
	}

	if !multiparameter.is_empty() {
		for (name, value) in multiparameter::assemble(multiparameter)? {
			write(form, &name, value)?;
		}
	}
	Ok(())
}
