//! Class-level exposure tables.
//!
//! A [`FormSchema`] is built once per form type, usually inside a
//! `static LazyLock`, and never changes afterwards. It records which backing
//! models a form delegates to (in declaration order), which attributes each of
//! them exposes and under what name, the attributes introduced on the form
//! itself, nested collections, and form-level validations.

use crate::collection::{CollectionAccessor, CollectionWrapper, NestedForm, WrapperAccessor};
use crate::error::{FormObjectError, FormObjectResult};
use crate::errors::ExposedErrors;
use crate::form::{FormObject, FormState};
use crate::options::ExposeOptions;
use crate::record::BackingRecord;
use crate::types::AttributeType;
use crate::validation::Validation;
use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Form-level validation: inspects the form and records messages under
/// exposed names.
pub type FormValidator<F> =
	Arc<dyn Fn(&F, &mut ExposedErrors) -> FormObjectResult<()> + Send + Sync>;

/// Typed access from a form instance to one of its backing records.
pub trait RecordAccessor<F>: Send + Sync {
	fn record<'a>(&self, form: &'a F) -> &'a dyn BackingRecord;
	fn record_mut<'a>(&self, form: &'a mut F) -> &'a mut dyn BackingRecord;
}

struct FieldAccessor<F, R> {
	get: fn(&F) -> &R,
	get_mut: fn(&mut F) -> &mut R,
}

impl<F, R> RecordAccessor<F> for FieldAccessor<F, R>
where
	R: BackingRecord + 'static,
{
	fn record<'a>(&self, form: &'a F) -> &'a dyn BackingRecord {
		(self.get)(form)
	}

	fn record_mut<'a>(&self, form: &'a mut F) -> &'a mut dyn BackingRecord {
		(self.get_mut)(form)
	}
}

/// Reaches a parent form's backing record through the parent embedded in a
/// derived form.
struct InheritedAccessor<F, P: 'static> {
	parent: &'static BackingModel<P>,
	up: fn(&F) -> &P,
	up_mut: fn(&mut F) -> &mut P,
}

impl<F, P> RecordAccessor<F> for InheritedAccessor<F, P> {
	fn record<'a>(&self, form: &'a F) -> &'a dyn BackingRecord {
		self.parent.record((self.up)(form))
	}

	fn record_mut<'a>(&self, form: &'a mut F) -> &'a mut dyn BackingRecord {
		self.parent.record_mut((self.up_mut)(form))
	}
}

struct InheritedCollection<F, P: 'static> {
	parent: &'static CollectionSpec<P>,
	up: fn(&F) -> &P,
	up_mut: fn(&mut F) -> &mut P,
}

impl<F, P> CollectionAccessor<F> for InheritedCollection<F, P> {
	fn collection<'a>(&self, form: &'a F) -> &'a dyn crate::collection::NestedCollection {
		self.parent.collection((self.up)(form))
	}

	fn collection_mut<'a>(
		&self,
		form: &'a mut F,
	) -> &'a mut dyn crate::collection::NestedCollection {
		self.parent.collection_mut((self.up_mut)(form))
	}
}

/// Where an introduced attribute keeps its value.
trait StateAccessor<F>: Send + Sync {
	fn state<'a>(&self, form: &'a F) -> &'a FormState;
	fn state_mut<'a>(&self, form: &'a mut F) -> &'a mut FormState;
}

struct OwnState;

impl<F: FormObject> StateAccessor<F> for OwnState {
	fn state<'a>(&self, form: &'a F) -> &'a FormState {
		form.form_state()
	}

	fn state_mut<'a>(&self, form: &'a mut F) -> &'a mut FormState {
		form.form_state_mut()
	}
}

/// Keeps an inherited introduced attribute in the embedded parent's state, so
/// the parent's validations see what the derived form assigned.
struct InheritedState<F, P: 'static> {
	parent: &'static FormSchema<P>,
	index: usize,
	up: fn(&F) -> &P,
	up_mut: fn(&mut F) -> &mut P,
}

impl<F, P> StateAccessor<F> for InheritedState<F, P> {
	fn state<'a>(&self, form: &'a F) -> &'a FormState {
		self.parent.introduced_state(self.index, (self.up)(form))
	}

	fn state_mut<'a>(&self, form: &'a mut F) -> &'a mut FormState {
		self.parent
			.introduced_state_mut(self.index, (self.up_mut)(form))
	}
}

/// A named backing record and the attributes exposed from it.
pub struct BackingModel<F> {
	name: String,
	/// exposed name -> backing name
	attributes: IndexMap<String, String>,
	accessor: Box<dyn RecordAccessor<F>>,
}

impl<F> BackingModel<F> {
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Exposed name to backing name, in declaration order.
	pub fn attributes(&self) -> &IndexMap<String, String> {
		&self.attributes
	}

	pub fn record<'a>(&self, form: &'a F) -> &'a dyn BackingRecord {
		self.accessor.record(form)
	}

	pub fn record_mut<'a>(&self, form: &'a mut F) -> &'a mut dyn BackingRecord {
		self.accessor.record_mut(form)
	}
}

impl<F> fmt::Debug for BackingModel<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BackingModel")
			.field("name", &self.name)
			.field("attributes", &self.attributes)
			.finish_non_exhaustive()
	}
}

/// An attribute stored on the form itself rather than on a backing record.
#[derive(Debug, Clone, PartialEq)]
pub struct IntroducedAttribute {
	pub name: String,
	pub ty: AttributeType,
	pub default: Value,
}

/// Class-level description of a nested collection.
pub struct CollectionSpec<F> {
	exposed_name: String,
	model: String,
	association: String,
	accessor: Box<dyn CollectionAccessor<F>>,
}

impl<F> CollectionSpec<F> {
	pub fn exposed_name(&self) -> &str {
		&self.exposed_name
	}

	/// Backing model owning the association.
	pub fn model(&self) -> &str {
		&self.model
	}

	pub fn association(&self) -> &str {
		&self.association
	}

	pub fn collection<'a>(&self, form: &'a F) -> &'a dyn crate::collection::NestedCollection {
		self.accessor.collection(form)
	}

	pub fn collection_mut<'a>(
		&self,
		form: &'a mut F,
	) -> &'a mut dyn crate::collection::NestedCollection {
		self.accessor.collection_mut(form)
	}
}

impl<F> fmt::Debug for CollectionSpec<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("CollectionSpec")
			.field("exposed_name", &self.exposed_name)
			.field("model", &self.model)
			.field("association", &self.association)
			.finish_non_exhaustive()
	}
}

/// What an exposed name refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	Backed { model: usize, backing: String },
	Introduced(usize),
	Collection(usize),
}

/// Exposure tables of one form type.
pub struct FormSchema<F> {
	form_name: &'static str,
	models: Vec<BackingModel<F>>,
	introduced: Vec<IntroducedAttribute>,
	introduced_state: Vec<Box<dyn StateAccessor<F>>>,
	collections: Vec<CollectionSpec<F>>,
	validators: Vec<FormValidator<F>>,
	resolutions: HashMap<String, Resolution>,
}

impl<F: FormObject> FormSchema<F> {
	pub fn builder() -> FormSchemaBuilder<F> {
		FormSchemaBuilder::new()
	}
}

impl<F> FormSchema<F> {
	pub fn form_name(&self) -> &'static str {
		self.form_name
	}

	/// Backing models in declaration order.
	pub fn backing_models(&self) -> &[BackingModel<F>] {
		&self.models
	}

	pub fn backing_model(&self, name: &str) -> Option<&BackingModel<F>> {
		self.models.iter().find(|model| model.name == name)
	}

	pub fn introduced_attributes(&self) -> &[IntroducedAttribute] {
		&self.introduced
	}

	/// State holding the value of introduced attribute `index`.
	pub(crate) fn introduced_state<'a>(&self, index: usize, form: &'a F) -> &'a FormState {
		self.introduced_state[index].state(form)
	}

	pub(crate) fn introduced_state_mut<'a>(
		&self,
		index: usize,
		form: &'a mut F,
	) -> &'a mut FormState {
		self.introduced_state[index].state_mut(form)
	}

	pub fn collections(&self) -> &[CollectionSpec<F>] {
		&self.collections
	}

	/// Collections whose association lives on `model`.
	pub fn collections_on<'a>(
		&'a self,
		model: &'a str,
	) -> impl Iterator<Item = &'a CollectionSpec<F>> + 'a {
		self.collections.iter().filter(move |spec| spec.model == model)
	}

	pub fn validators(&self) -> &[FormValidator<F>] {
		&self.validators
	}

	/// Resolve an exposed name. When two backing models expose the same name
	/// the first declared model wins.
	pub fn resolve(&self, name: &str) -> Option<&Resolution> {
		self.resolutions.get(name)
	}

	/// Exposed and introduced attribute names, without duplicates.
	pub fn attribute_names(&self) -> Vec<String> {
		let mut names: IndexSet<String> = self
			.models
			.iter()
			.flat_map(|model| model.attributes.keys().cloned())
			.collect();
		names.extend(self.introduced.iter().map(|attr| attr.name.clone()));
		names.into_iter().collect()
	}

	/// `(exposed, backing)` pairs across every backing model.
	pub fn exposed_pairs(&self) -> Vec<(String, String)> {
		self.models
			.iter()
			.flat_map(|model| {
				model
					.attributes
					.iter()
					.map(|(exposed, backing)| (exposed.clone(), backing.clone()))
			})
			.collect()
	}
}

impl<F> fmt::Debug for FormSchema<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FormSchema")
			.field("form_name", &self.form_name)
			.field("models", &self.models)
			.field("introduced", &self.introduced)
			.field("collections", &self.collections)
			.field("validators", &self.validators.len())
			.finish()
	}
}

/// Builder for [`FormSchema`].
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::{
///     BackingRecord, FormObject, FormSchema, FormState, RecordErrors, RecordResult, SaveOptions,
/// };
/// use serde_json::{Value, json};
/// use std::sync::LazyLock;
///
/// struct Customer { name: Value }
///
/// impl BackingRecord for Customer {
///     fn read_attribute(&self, _name: &str) -> RecordResult<Value> { Ok(self.name.clone()) }
///     fn write_attribute(&mut self, _name: &str, value: Value) -> RecordResult<()> {
///         self.name = value;
///         Ok(())
///     }
///     fn validate(&mut self) -> RecordResult<bool> { Ok(true) }
///     fn save(&mut self, _options: &SaveOptions) -> RecordResult<bool> { Ok(true) }
///     fn errors(&self) -> RecordResult<RecordErrors> { Ok(RecordErrors::new()) }
/// }
///
/// struct NameForm { customer: Customer, state: FormState }
///
/// impl FormObject for NameForm {
///     fn schema() -> &'static FormSchema<Self> {
///         static SCHEMA: LazyLock<FormSchema<NameForm>> = LazyLock::new(|| {
///             FormSchema::builder()
///                 .backing_model(
///                     "customer",
///                     |form: &NameForm| &form.customer,
///                     |form: &mut NameForm| &mut form.customer,
///                 )
///                 .expose("customer", ["name"])
///                 .build()
///                 .expect("NameForm schema")
///         });
///         &SCHEMA
///     }
///     fn form_state(&self) -> &FormState { &self.state }
///     fn form_state_mut(&mut self) -> &mut FormState { &mut self.state }
/// }
///
/// let mut form = NameForm { customer: Customer { name: json!("Ann") }, state: FormState::new() };
/// form.set("name", "Bea").unwrap();
/// assert_eq!(form.customer.name, json!("Bea"));
/// assert_eq!(form.attribute_names(), vec!["name".to_string()]);
/// ```
pub struct FormSchemaBuilder<F> {
	models: Vec<BackingModel<F>>,
	introduced: IndexMap<String, (IntroducedAttribute, Box<dyn StateAccessor<F>>)>,
	collections: Vec<CollectionSpec<F>>,
	validators: Vec<FormValidator<F>>,
	errors: Vec<FormObjectError>,
}

impl<F: FormObject> FormSchemaBuilder<F> {
	pub fn new() -> Self {
		Self {
			models: Vec::new(),
			introduced: IndexMap::new(),
			collections: Vec::new(),
			validators: Vec::new(),
			errors: Vec::new(),
		}
	}

	/// Declare a backing model. Redeclaring a name replaces its accessor and
	/// keeps the attributes already exposed on it.
	pub fn backing_model<R>(
		mut self,
		name: impl Into<String>,
		get: fn(&F) -> &R,
		get_mut: fn(&mut F) -> &mut R,
	) -> Self
	where
		R: BackingRecord + 'static,
	{
		let name = name.into();
		let accessor: Box<dyn RecordAccessor<F>> = Box::new(FieldAccessor { get, get_mut });
		match self.models.iter_mut().find(|model| model.name == name) {
			Some(model) => model.accessor = accessor,
			None => self.models.push(BackingModel {
				name,
				attributes: IndexMap::new(),
				accessor,
			}),
		}
		self
	}

	/// Expose backing attributes under their own names.
	pub fn expose<I, S>(self, model: &str, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.expose_with(model, names, ExposeOptions::default())
	}

	/// Expose backing attributes, renaming and affixing as `options` says.
	/// Exposing an already exposed name again replaces its backing name.
	pub fn expose_with<I, S>(mut self, model: &str, names: I, options: ExposeOptions) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let form_name = std::any::type_name::<F>();
		let Some(target) = self.models.iter_mut().find(|m| m.name == model) else {
			self.errors.push(FormObjectError::UnknownBackingModel {
				form: form_name,
				model: model.to_string(),
			});
			return self;
		};
		for backing in names {
			let backing = backing.into();
			target
				.attributes
				.insert(options.exposed_name(&backing), backing);
		}
		self
	}

	/// Introduce an attribute stored on the form itself, defaulting to `null`.
	pub fn attribute(self, name: impl Into<String>, ty: AttributeType) -> Self {
		self.attribute_with_default(name, ty, Value::Null)
	}

	pub fn attribute_with_default(
		mut self,
		name: impl Into<String>,
		ty: AttributeType,
		default: Value,
	) -> Self {
		let name = name.into();
		let default = ty.cast(default);
		let state: Box<dyn StateAccessor<F>> = Box::new(OwnState);
		self.introduced
			.insert(name.clone(), (IntroducedAttribute { name, ty, default }, state));
		self
	}

	/// Declare a nested collection exposed as `exposed_name`, backed by the
	/// `association` of backing model `model`.
	pub fn collection<C>(
		mut self,
		exposed_name: impl Into<String>,
		model: &str,
		association: impl Into<String>,
		get: fn(&F) -> &CollectionWrapper<C>,
		get_mut: fn(&mut F) -> &mut CollectionWrapper<C>,
	) -> Self
	where
		C: NestedForm,
	{
		if self.models.iter().all(|m| m.name != model) {
			self.errors.push(FormObjectError::UnknownBackingModel {
				form: std::any::type_name::<F>(),
				model: model.to_string(),
			});
			return self;
		}
		let spec = CollectionSpec {
			exposed_name: exposed_name.into(),
			model: model.to_string(),
			association: association.into(),
			accessor: Box::new(WrapperAccessor { get, get_mut }),
		};
		self.collections
			.retain(|existing| existing.exposed_name != spec.exposed_name);
		self.collections.push(spec);
		self
	}

	/// Register a form-level validation.
	pub fn validate<V>(mut self, validator: V) -> Self
	where
		V: Fn(&F, &mut ExposedErrors) -> FormObjectResult<()> + Send + Sync + 'static,
	{
		self.validators.push(Arc::new(validator));
		self
	}

	/// Register a built-in validation rule for one exposed attribute.
	pub fn validates(self, attribute: impl Into<String>, rule: Validation) -> Self {
		let attribute = attribute.into();
		self.validate(move |form: &F, errors: &mut ExposedErrors| {
			let value = form.get(&attribute)?;
			if let Some(message) = rule.check(&value) {
				errors.add(attribute.clone(), message);
			}
			Ok(())
		})
	}

	/// Start from the tables of `parent`, a form type embedded in `F`.
	///
	/// The parent's schema is copied; anything added afterwards only affects
	/// the derived schema.
	pub fn inherit<P>(
		mut self,
		parent: &'static FormSchema<P>,
		up: fn(&F) -> &P,
		up_mut: fn(&mut F) -> &mut P,
	) -> Self
	where
		P: FormObject,
	{
		for parent_model in &parent.models {
			let accessor: Box<dyn RecordAccessor<F>> = Box::new(InheritedAccessor {
				parent: parent_model,
				up,
				up_mut,
			});
			match self.models.iter_mut().find(|m| m.name == parent_model.name) {
				Some(model) => {
					model.accessor = accessor;
					for (exposed, backing) in &parent_model.attributes {
						model
							.attributes
							.entry(exposed.clone())
							.or_insert_with(|| backing.clone());
					}
				}
				None => self.models.push(BackingModel {
					name: parent_model.name.clone(),
					attributes: parent_model.attributes.clone(),
					accessor,
				}),
			}
		}
		for (index, attr) in parent.introduced.iter().enumerate() {
			self.introduced
				.entry(attr.name.clone())
				.or_insert_with(|| {
					let state: Box<dyn StateAccessor<F>> = Box::new(InheritedState {
						parent,
						index,
						up,
						up_mut,
					});
					(attr.clone(), state)
				});
		}
		for parent_spec in &parent.collections {
			self.collections
				.retain(|existing| existing.exposed_name != parent_spec.exposed_name);
			self.collections.push(CollectionSpec {
				exposed_name: parent_spec.exposed_name.clone(),
				model: parent_spec.model.clone(),
				association: parent_spec.association.clone(),
				accessor: Box::new(InheritedCollection {
					parent: parent_spec,
					up,
					up_mut,
				}),
			});
		}
		for validator in &parent.validators {
			let validator = Arc::clone(validator);
			self.validators.push(Arc::new(
				move |form: &F, errors: &mut ExposedErrors| validator(up(form), errors),
			));
		}
		self
	}

	pub fn build(mut self) -> FormObjectResult<FormSchema<F>> {
		if !self.errors.is_empty() {
			return Err(self.errors.remove(0));
		}

		let mut resolutions = HashMap::new();
		for (index, model) in self.models.iter().enumerate() {
			for (exposed, backing) in &model.attributes {
				resolutions
					.entry(exposed.clone())
					.or_insert_with(|| Resolution::Backed {
						model: index,
						backing: backing.clone(),
					});
			}
		}
		for (index, name) in self.introduced.keys().enumerate() {
			resolutions
				.entry(name.clone())
				.or_insert(Resolution::Introduced(index));
		}
		for (index, spec) in self.collections.iter().enumerate() {
			resolutions
				.entry(spec.exposed_name.clone())
				.or_insert(Resolution::Collection(index));
		}

		let (introduced, introduced_state) = self.introduced.into_values().unzip();
		let schema = FormSchema {
			form_name: std::any::type_name::<F>(),
			models: self.models,
			introduced,
			introduced_state,
			collections: self.collections,
			validators: self.validators,
			resolutions,
		};
		tracing::debug!(
			form = schema.form_name,
			models = schema.models.len(),
			collections = schema.collections.len(),
			"built form schema"
		);
		Ok(schema)
	}
}

impl<F: FormObject> Default for FormSchemaBuilder<F> {
	fn default() -> Self {
		Self::new()
	}
}
