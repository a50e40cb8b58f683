use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Options accepted by the save/update family.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::SaveOptions;
///
/// assert!(SaveOptions::default().validate);
/// assert!(!SaveOptions::skip_validation().validate);
///
/// let options: SaveOptions = serde_json::from_str(r#"{"validate": false}"#).unwrap();
/// assert_eq!(options, SaveOptions::skip_validation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveOptions {
	/// Run form and backing validations before persisting.
	pub validate: bool,
}

impl SaveOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn skip_validation() -> Self {
		Self { validate: false }
	}

	pub fn with_validate(mut self, validate: bool) -> Self {
		self.validate = validate;
		self
	}
}

impl Default for SaveOptions {
	fn default() -> Self {
		Self { validate: true }
	}
}

/// How backing attribute names turn into exposed names.
///
/// Renames are keyed by backing name. Prefix and suffix apply to every
/// exposed name produced by the exposure, renamed or not.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::ExposeOptions;
///
/// let options = ExposeOptions::new().rename("quantity", "qty").prefix("item_");
/// assert_eq!(options.exposed_name("quantity"), "item_qty");
/// assert_eq!(options.exposed_name("price"), "item_price");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExposeOptions {
	pub renames: IndexMap<String, String>,
	pub prefix: Option<String>,
	pub suffix: Option<String>,
}

impl ExposeOptions {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn rename(mut self, backing: impl Into<String>, exposed: impl Into<String>) -> Self {
		self.renames.insert(backing.into(), exposed.into());
		self
	}

	pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = Some(prefix.into());
		self
	}

	pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
		self.suffix = Some(suffix.into());
		self
	}

	pub fn exposed_name(&self, backing: &str) -> String {
		let base = self
			.renames
			.get(backing)
			.map(String::as_str)
			.unwrap_or(backing);
		format!(
			"{}{}{}",
			self.prefix.as_deref().unwrap_or_default(),
			base,
			self.suffix.as_deref().unwrap_or_default()
		)
	}
}
