//! Nested collections of child forms.
//!
//! A [`CollectionWrapper`] lazily wraps each record of a has-many association
//! into a child form. Loading happens on first read or write of the exposed
//! collection (or through [`FormObject::load_collection`]); until then no
//! child form exists, which also decides whether nested error paths can be
//! translated (see [`ErrorTranslator`](crate::ErrorTranslator)).

use crate::error::{FormObjectError, FormObjectResult};
use crate::form::FormObject;
use crate::record::{BackingRecord, SharedRecord};
use serde_json::Value;
use std::cell::OnceCell;
use std::fmt;

/// A form that can wrap one element of a has-many association.
pub trait NestedForm: FormObject {
	fn wrap(record: SharedRecord) -> Self;
}

/// Type-erased view of a [`CollectionWrapper`] used by the attribute proxy and
/// the error translator.
pub trait NestedCollection {
	fn is_loaded(&self) -> bool;

	/// Number of materialized child forms. Never triggers loading.
	fn loaded_len(&self) -> usize;

	/// Wrap every element of `association` on `parent`. No-op once loaded.
	fn load(&self, parent: &dyn BackingRecord, association: &str) -> FormObjectResult<()>;

	/// Attributes of every loaded child form, as an array of objects.
	fn read(&self) -> FormObjectResult<Value>;

	/// Assign an array of attribute objects to the loaded child forms, by
	/// position.
	fn write(&mut self, value: Value) -> FormObjectResult<()>;

	/// `(exposed, backing)` pairs of the child form type, or nothing when no
	/// child form has been materialized.
	fn child_mappings(&self) -> Vec<(String, String)>;
}

/// Typed access from a form instance to one of its collections.
pub trait CollectionAccessor<F>: Send + Sync {
	fn collection<'a>(&self, form: &'a F) -> &'a dyn NestedCollection;
	fn collection_mut<'a>(&self, form: &'a mut F) -> &'a mut dyn NestedCollection;
}

pub(crate) struct WrapperAccessor<F, C> {
	pub(crate) get: fn(&F) -> &CollectionWrapper<C>,
	pub(crate) get_mut: fn(&mut F) -> &mut CollectionWrapper<C>,
}

impl<F, C> CollectionAccessor<F> for WrapperAccessor<F, C>
where
	C: NestedForm,
{
	fn collection<'a>(&self, form: &'a F) -> &'a dyn NestedCollection {
		(self.get)(form)
	}

	fn collection_mut<'a>(&self, form: &'a mut F) -> &'a mut dyn NestedCollection {
		(self.get_mut)(form)
	}
}

/// Lazily materialized child forms of one association.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::CollectionWrapper;
/// # use reinhardt_form_objects_core::{FormObject, FormSchema, FormState, NestedForm, SharedRecord};
/// # use std::sync::LazyLock;
/// # struct LineItemForm { state: FormState }
/// # impl FormObject for LineItemForm {
/// #     fn schema() -> &'static FormSchema<Self> {
/// #         static SCHEMA: LazyLock<FormSchema<LineItemForm>> =
/// #             LazyLock::new(|| FormSchema::builder().build().expect("LineItemForm schema"));
/// #         &SCHEMA
/// #     }
/// #     fn form_state(&self) -> &FormState { &self.state }
/// #     fn form_state_mut(&mut self) -> &mut FormState { &mut self.state }
/// # }
/// # impl NestedForm for LineItemForm {
/// #     fn wrap(_record: SharedRecord) -> Self { Self { state: FormState::new() } }
/// # }
///
/// let line_items: CollectionWrapper<LineItemForm> = CollectionWrapper::new();
/// assert!(!line_items.is_loaded());
/// assert!(line_items.loaded_forms().is_empty());
/// ```
pub struct CollectionWrapper<C> {
	forms: OnceCell<Vec<C>>,
}

impl<C> CollectionWrapper<C> {
	pub fn new() -> Self {
		Self {
			forms: OnceCell::new(),
		}
	}

	pub fn is_loaded(&self) -> bool {
		self.forms.get().is_some()
	}

	/// Child forms materialized so far. Empty until the collection is loaded.
	pub fn loaded_forms(&self) -> &[C] {
		self.forms.get().map(Vec::as_slice).unwrap_or_default()
	}

	pub fn loaded_forms_mut(&mut self) -> &mut [C] {
		self.forms
			.get_mut()
			.map(Vec::as_mut_slice)
			.unwrap_or_default()
	}
}

impl<C: NestedForm> CollectionWrapper<C> {
	/// Wrap the elements of `association` on `parent`, or return the forms
	/// loaded earlier.
	pub fn load_from(&self, parent: &dyn BackingRecord, association: &str) -> FormObjectResult<&[C]> {
		if let Some(forms) = self.forms.get() {
			return Ok(forms);
		}
		let records = parent.association(association)?;
		tracing::debug!(
			form = C::schema().form_name(),
			association,
			count = records.len(),
			"wrapping association records"
		);
		let forms = records.into_iter().map(C::wrap).collect();
		Ok(self.forms.get_or_init(|| forms))
	}
}

impl<C> Default for CollectionWrapper<C> {
	fn default() -> Self {
		Self::new()
	}
}

impl<C> fmt::Debug for CollectionWrapper<C> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CollectionWrapper")
			.field("loaded", &self.forms.get().map(Vec::len))
			.finish()
	}
}

impl<C: NestedForm> NestedCollection for CollectionWrapper<C> {
	fn is_loaded(&self) -> bool {
		CollectionWrapper::is_loaded(self)
	}

	fn loaded_len(&self) -> usize {
		self.loaded_forms().len()
	}

	fn load(&self, parent: &dyn BackingRecord, association: &str) -> FormObjectResult<()> {
		self.load_from(parent, association).map(|_| ())
	}

	fn read(&self) -> FormObjectResult<Value> {
		self.loaded_forms()
			.iter()
			.map(|form| form.attributes().map(Value::Object))
			.collect::<FormObjectResult<Vec<_>>>()
			.map(Value::Array)
	}

	fn write(&mut self, value: Value) -> FormObjectResult<()> {
		let Value::Array(entries) = value else {
			return Err(FormObjectError::InvalidArgument(format!(
				"nested attributes for {} must be an array of hashes",
				C::schema().form_name()
			)));
		};
		let forms = self.loaded_forms_mut();
		let loaded = forms.len();
		for (index, attributes) in entries.into_iter().enumerate() {
			let form = forms.get_mut(index).ok_or_else(|| {
				FormObjectError::InvalidArgument(format!(
					"no nested form at index {index} ({loaded} loaded)"
				))
			})?;
			form.set_attributes(attributes)?;
		}
		Ok(())
	}

	fn child_mappings(&self) -> Vec<(String, String)> {
		if self.loaded_forms().is_empty() {
			Vec::new()
		} else {
			C::schema().exposed_pairs()
		}
	}
}
