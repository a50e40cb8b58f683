//! The form object contract and its lifecycle.

use crate::attributes;
use crate::error::{FormObjectError, FormObjectResult};
use crate::errors::{ErrorTranslator, ExposedErrors, TranslatorState};
use crate::options::SaveOptions;
use crate::schema::{FormSchema, Resolution};
use indexmap::IndexMap;
use serde_json::{Map, Value};

/// Per-instance state owned by every form object.
#[derive(Debug, Clone, Default)]
pub struct FormState {
	pub(crate) errors: ExposedErrors,
	pub(crate) translator: TranslatorState,
	pub(crate) introduced: IndexMap<String, Value>,
}

impl FormState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn errors(&self) -> &ExposedErrors {
		&self.errors
	}

	pub fn translator_state(&self) -> TranslatorState {
		self.translator
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Validity {
	Valid,
	FormInvalid,
	RecordInvalid,
}

/// A facade over one or more backing records.
///
/// Implementors provide the class-level [`FormSchema`] and access to their
/// [`FormState`]; everything else has a provided implementation.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::{
///     AttributeType, BackingRecord, FormObject, FormSchema, FormState, RecordErrors,
///     RecordResult, SaveOptions, Validation,
/// };
/// use serde_json::{Value, json};
/// use std::sync::LazyLock;
///
/// #[derive(Default)]
/// struct Account { email: Value, saved: bool }
///
/// impl BackingRecord for Account {
///     fn read_attribute(&self, _name: &str) -> RecordResult<Value> { Ok(self.email.clone()) }
///     fn write_attribute(&mut self, _name: &str, value: Value) -> RecordResult<()> {
///         self.email = value;
///         Ok(())
///     }
///     fn validate(&mut self) -> RecordResult<bool> { Ok(true) }
///     fn save(&mut self, _options: &SaveOptions) -> RecordResult<bool> {
///         self.saved = true;
///         Ok(true)
///     }
///     fn errors(&self) -> RecordResult<RecordErrors> { Ok(RecordErrors::new()) }
/// }
///
/// #[derive(Default)]
/// struct SignupForm { account: Account, state: FormState }
///
/// impl FormObject for SignupForm {
///     fn schema() -> &'static FormSchema<Self> {
///         static SCHEMA: LazyLock<FormSchema<SignupForm>> = LazyLock::new(|| {
///             FormSchema::builder()
///                 .backing_model(
///                     "account",
///                     |form: &SignupForm| &form.account,
///                     |form: &mut SignupForm| &mut form.account,
///                 )
///                 .expose("account", ["email"])
///                 .attribute("terms_accepted", AttributeType::Boolean)
///                 .validates("terms_accepted", Validation::presence().with_message("must be accepted"))
///                 .build()
///                 .expect("SignupForm schema")
///         });
///         &SCHEMA
///     }
///     fn form_state(&self) -> &FormState { &self.state }
///     fn form_state_mut(&mut self) -> &mut FormState { &mut self.state }
/// }
///
/// let mut form = SignupForm::default();
/// form.set_attributes(json!({"email": "ann@example.com", "terms_accepted": "0"})).unwrap();
///
/// assert!(!form.save(SaveOptions::default()).unwrap());
/// assert_eq!(form.errors()["terms_accepted"], ["must be accepted".to_string()]);
/// assert!(!form.account.saved);
///
/// assert!(form.update(json!({"terms_accepted": "1"}), SaveOptions::default()).unwrap());
/// assert!(form.account.saved);
/// ```
pub trait FormObject: Sized + 'static {
	fn schema() -> &'static FormSchema<Self>;

	fn form_state(&self) -> &FormState;

	fn form_state_mut(&mut self) -> &mut FormState;

	/// Read an exposed, introduced or collection attribute.
	fn get(&self, name: &str) -> FormObjectResult<Value> {
		attributes::read(self, name)
	}

	/// Write an exposed, introduced or collection attribute.
	fn set(&mut self, name: &str, value: impl Into<Value>) -> FormObjectResult<()> {
		attributes::write(self, name, value.into())
	}

	fn read_attribute(&self, name: &str) -> FormObjectResult<Value> {
		self.get(name)
	}

	fn write_attribute(&mut self, name: &str, value: impl Into<Value>) -> FormObjectResult<()> {
		self.set(name, value)
	}

	/// Exposed and introduced attribute names, in declaration order.
	fn attribute_names(&self) -> Vec<String> {
		Self::schema().attribute_names()
	}

	fn attributes(&self) -> FormObjectResult<Map<String, Value>> {
		attributes::read_all(self)
	}

	/// Assign every pair of a JSON object. Anything but an object is rejected.
	fn set_attributes(&mut self, attributes: Value) -> FormObjectResult<()> {
		attributes::write_all(self, attributes)
	}

	/// Materialize the child forms of a collection without reading it.
	fn load_collection(&self, name: &str) -> FormObjectResult<()> {
		let schema = Self::schema();
		match schema.resolve(name) {
			Some(Resolution::Collection(index)) => {
				attributes::ensure_loaded(self, &schema.collections()[*index])
			}
			_ => Err(FormObjectError::AttributeNotExposed {
				form: schema.form_name(),
				attribute: name.to_string(),
			}),
		}
	}

	/// Errors from the most recent validation or save.
	fn errors(&self) -> &ExposedErrors {
		&self.form_state().errors
	}

	/// Run form and backing validations, replacing the exposed errors.
	fn is_valid(&mut self) -> FormObjectResult<bool> {
		Ok(run_validations(self)? == Validity::Valid)
	}

	/// Validate (unless disabled) and persist every backing record.
	///
	/// Validation failures yield `Ok(false)`; other failures propagate.
	fn save(&mut self, options: SaveOptions) -> FormObjectResult<bool> {
		match persist(self, options) {
			Ok(()) => Ok(true),
			Err(error) if error.is_validation_failure() => Ok(false),
			Err(error) => Err(error),
		}
	}

	/// Like [`save`](Self::save) but validation failures are errors:
	/// [`FormObjectError::FormInvalid`] when a form-level validation failed,
	/// otherwise [`FormObjectError::RecordInvalid`].
	fn save_strict(&mut self, options: SaveOptions) -> FormObjectResult<()> {
		persist(self, options)
	}

	fn update(&mut self, attributes: Value, options: SaveOptions) -> FormObjectResult<bool> {
		self.set_attributes(attributes)?;
		self.save(options)
	}

	fn update_strict(&mut self, attributes: Value, options: SaveOptions) -> FormObjectResult<()> {
		self.set_attributes(attributes)?;
		self.save_strict(options)
	}
}

fn run_validations<F: FormObject>(form: &mut F) -> FormObjectResult<Validity> {
	let schema = F::schema();
	ErrorTranslator::reset(form);

	let mut form_errors = ExposedErrors::new();
	for validator in schema.validators() {
		validator(&*form, &mut form_errors)?;
	}
	let form_failed = !form_errors.is_empty();
	form.form_state_mut().errors.merge(form_errors);

	// A record may refuse without reporting a message.
	let mut records_valid = true;
	for model in schema.backing_models() {
		records_valid &= model.record_mut(form).validate()?;
	}
	ErrorTranslator::collect(form)?;

	let validity = if form_failed {
		Validity::FormInvalid
	} else if records_valid && form.errors().is_empty() {
		Validity::Valid
	} else {
		Validity::RecordInvalid
	};
	tracing::debug!(
		form = schema.form_name(),
		?validity,
		errors = form.errors().len(),
		"validated form"
	);
	Ok(validity)
}

fn persist<F: FormObject>(form: &mut F, options: SaveOptions) -> FormObjectResult<()> {
	let schema = F::schema();
	if options.validate {
		match run_validations(form)? {
			Validity::Valid => {}
			Validity::FormInvalid => {
				return Err(FormObjectError::FormInvalid(form.errors().clone()));
			}
			Validity::RecordInvalid => {
				return Err(FormObjectError::RecordInvalid(form.errors().clone()));
			}
		}
	} else {
		ErrorTranslator::reset(form);
	}

	for model in schema.backing_models() {
		tracing::debug!(
			form = schema.form_name(),
			model = model.name(),
			validate = options.validate,
			"saving backing record"
		);
		if !model.record_mut(form).save(&options)? {
			tracing::warn!(
				form = schema.form_name(),
				model = model.name(),
				"backing record refused to save"
			);
			ErrorTranslator::collect(form)?;
			return Err(FormObjectError::RecordInvalid(form.errors().clone()));
		}
	}
	Ok(())
}
