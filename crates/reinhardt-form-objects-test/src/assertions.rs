//! Assertion helpers for form objects

use reinhardt_form_objects_core::{ExposedErrors, FormObject};
use serde_json::Value;

/// Assert that `key` carries exactly `expected`, in order.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::ExposedErrors;
/// use reinhardt_form_objects_test::assertions::assert_errors_on;
///
/// let mut errors = ExposedErrors::new();
/// errors.add("email", "can't be blank");
/// assert_errors_on(&errors, "email", &["can't be blank"]);
/// assert_errors_on(&errors, "name", &[]);
/// ```
pub fn assert_errors_on(errors: &ExposedErrors, key: &str, expected: &[&str]) {
	let actual: Vec<&str> = errors.get(key).iter().map(String::as_str).collect();
	assert_eq!(
		actual, expected,
		"Expected errors on '{}' to be {:?}, got {:?} (all errors: {:?})",
		key, expected, actual, errors
	);
}

/// Assert that none of `keys` carries an error.
pub fn assert_no_errors_on(errors: &ExposedErrors, keys: &[&str]) {
	for key in keys {
		assert!(
			!errors.contains_key(key),
			"Expected no errors on '{}', got {:?}",
			key,
			errors.get(key)
		);
	}
}

/// Assert that the form reads `expected` for `name`.
pub fn assert_attribute_eq<F: FormObject>(form: &F, name: &str, expected: &Value) {
	let actual = form
		.get(name)
		.unwrap_or_else(|error| panic!("Expected attribute '{}' to be readable: {}", name, error));
	assert_eq!(
		&actual, expected,
		"Expected attribute '{}' to equal {:?}, got {:?}",
		name, expected, actual
	);
}

/// Assert that the form's errors are empty.
pub fn assert_form_clean<F: FormObject>(form: &F) {
	assert!(
		form.errors().is_empty(),
		"Expected no errors, got {:?}",
		form.errors().full_messages()
	);
}
