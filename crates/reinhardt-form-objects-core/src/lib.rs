//! Form objects for Reinhardt
//!
//! A form object is a facade over one or more backing records. It exposes a
//! chosen subset of their attributes (optionally renamed), adds attributes of
//! its own, nests collections of child forms, and presents validation errors
//! from every backing record under the names it exposes:
//! - [`FormSchema`]: class-level exposure tables, built once per form type
//! - [`FormObject`]: attribute proxy, bulk assignment and the save lifecycle
//! - [`ErrorTranslator`]: rewrites backing error keys, including nested
//!   `collection.attribute` paths, into exposed names
//! - [`CollectionWrapper`]: lazily wraps has-many association records into
//!   child forms

mod attributes;
pub mod collection;
pub mod error;
pub mod errors;
pub mod form;
mod macros;
pub mod multiparameter;
pub mod options;
pub mod record;
pub mod schema;
pub mod types;
pub mod validation;

pub use collection::{CollectionAccessor, CollectionWrapper, NestedCollection, NestedForm};
pub use error::{FormObjectError, FormObjectResult};
pub use errors::{BASE, ErrorTranslator, ExposedErrors, TranslatorState};
pub use form::{FormObject, FormState};
pub use options::{ExposeOptions, SaveOptions};
pub use record::{BackingRecord, RecordErrors, RecordResult, SharedRecord, share};
pub use schema::{
	BackingModel, CollectionSpec, FormSchema, FormSchemaBuilder, FormValidator,
	IntroducedAttribute, RecordAccessor, Resolution,
};
pub use serde_json::Value;
pub use types::AttributeType;
pub use validation::{Rule, Validation};
