use crate::errors::ExposedErrors;

/// Errors raised by form objects.
///
/// Validation failures only surface as errors from the strict entry points
/// ([`FormObject::save_strict`](crate::FormObject::save_strict) and
/// [`FormObject::update_strict`](crate::FormObject::update_strict)); the
/// non-strict variants report them as `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum FormObjectError {
	#[error("undefined attribute `{attribute}` for {form}")]
	AttributeNotExposed {
		form: &'static str,
		attribute: String,
	},
	#[error("{0}")]
	InvalidArgument(String),
	/// A backing record failed its own validations.
	#[error("Validation failed: {}", .0.full_messages().join(", "))]
	RecordInvalid(ExposedErrors),
	/// A validation declared on the form itself failed.
	#[error("Validation failed: {}", .0.full_messages().join(", "))]
	FormInvalid(ExposedErrors),
	#[error("error assigning multiparameter attribute `{attribute}`: {message}")]
	Multiparameter { attribute: String, message: String },
	#[error("backing model `{model}` is not declared on {form}")]
	UnknownBackingModel { form: &'static str, model: String },
	/// Failure reported by a backing record collaborator, passed through untouched.
	#[error(transparent)]
	Record(#[from] anyhow::Error),
}

pub type FormObjectResult<T> = Result<T, FormObjectError>;

impl FormObjectError {
	/// Whether this error represents a failed validation run.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_form_objects_core::{ExposedErrors, FormObjectError};
	///
	/// let error = FormObjectError::RecordInvalid(ExposedErrors::new());
	/// assert!(error.is_validation_failure());
	///
	/// let error = FormObjectError::InvalidArgument("bad".to_string());
	/// assert!(!error.is_validation_failure());
	/// ```
	pub fn is_validation_failure(&self) -> bool {
		matches!(self, Self::RecordInvalid(_) | Self::FormInvalid(_))
	}

	/// The exposed errors carried by a validation failure.
	pub fn validation_errors(&self) -> Option<&ExposedErrors> {
		match self {
			Self::RecordInvalid(errors) | Self::FormInvalid(errors) => Some(errors),
			_ => None,
		}
	}

	pub(crate) fn non_mapping_assignment() -> Self {
		Self::InvalidArgument(
			"When assigning attributes, you must pass a hash as an argument.".to_string(),
		)
	}
}
