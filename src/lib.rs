//! # Reinhardt Form Objects
//!
//! Form objects put one validated, savable facade in front of several backing
//! records. A form declares which records back it, which of their attributes
//! it exposes and under what names, attributes of its own, and nested
//! collections of child forms. Validation errors raised by the backing records
//! come back keyed by the exposed names, including dotted nested paths such as
//! `line_items.qty`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - Everything below
//! - `test-utils` - In-memory backing records, rstest fixtures and assertions
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_form_objects::prelude::*;
//! use reinhardt_form_objects::test::{MemoryRecord, customer_record};
//! use serde_json::json;
//! use std::sync::LazyLock;
//!
//! struct CustomerForm {
//!     customer: MemoryRecord,
//!     state: FormState,
//! }
//!
//! impl FormObject for CustomerForm {
//!     fn schema() -> &'static FormSchema<Self> {
//!         static SCHEMA: LazyLock<FormSchema<CustomerForm>> = LazyLock::new(|| {
//!             FormSchema::builder()
//!                 .backing_model(
//!                     "customer",
//!                     |form: &CustomerForm| &form.customer,
//!                     |form: &mut CustomerForm| &mut form.customer,
//!                 )
//!                 .expose_with(
//!                     "customer",
//!                     ["email"],
//!                     ExposeOptions::new().rename("email", "contact_email"),
//!                 )
//!                 .build()
//!                 .expect("CustomerForm schema")
//!         });
//!         &SCHEMA
//!     }
//!     fn form_state(&self) -> &FormState { &self.state }
//!     fn form_state_mut(&mut self) -> &mut FormState { &mut self.state }
//! }
//!
//! let mut form = CustomerForm { customer: customer_record(), state: FormState::new() };
//!
//! assert!(!form.update(json!({"contact_email": ""}), SaveOptions::default()).unwrap());
//! assert_eq!(form.errors()["contact_email"], ["can't be blank".to_string()]);
//! assert_eq!(form.errors().full_messages(), vec!["Contact email can't be blank"]);
//! ```

pub use reinhardt_form_objects_core::*;

/// Testing utilities
#[cfg(feature = "test-utils")]
pub mod test {
	pub use reinhardt_form_objects_test::*;
}

pub mod prelude {
	pub use crate::{
		AttributeType, BackingRecord, CollectionWrapper, ErrorTranslator, ExposeOptions,
		ExposedErrors, FormObject, FormObjectError, FormObjectResult, FormSchema, FormState,
		NestedForm, RecordErrors, RecordResult, SaveOptions, SharedRecord, Validation,
		exposed_accessors,
	};
}
