/// Generate named getter and setter methods for exposed attributes.
///
/// Each `getter / setter` pair expands to `fn getter(&self)` reading the
/// exposed attribute named `getter`, and `fn setter(&mut self, value)` writing
/// it.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_core::{
///     BackingRecord, FormObject, FormSchema, FormState, RecordErrors, RecordResult, SaveOptions,
///     exposed_accessors,
/// };
/// use serde_json::{Value, json};
/// use std::sync::LazyLock;
///
/// #[derive(Default)]
/// struct Profile { nickname: Value }
///
/// impl BackingRecord for Profile {
///     fn read_attribute(&self, _name: &str) -> RecordResult<Value> { Ok(self.nickname.clone()) }
///     fn write_attribute(&mut self, _name: &str, value: Value) -> RecordResult<()> {
///         self.nickname = value;
///         Ok(())
///     }
///     fn validate(&mut self) -> RecordResult<bool> { Ok(true) }
///     fn save(&mut self, _options: &SaveOptions) -> RecordResult<bool> { Ok(true) }
///     fn errors(&self) -> RecordResult<RecordErrors> { Ok(RecordErrors::new()) }
/// }
///
/// #[derive(Default)]
/// struct ProfileForm { profile: Profile, state: FormState }
///
/// impl FormObject for ProfileForm {
///     fn schema() -> &'static FormSchema<Self> {
///         static SCHEMA: LazyLock<FormSchema<ProfileForm>> = LazyLock::new(|| {
///             FormSchema::builder()
///                 .backing_model(
///                     "profile",
///                     |form: &ProfileForm| &form.profile,
///                     |form: &mut ProfileForm| &mut form.profile,
///                 )
///                 .expose("profile", ["nickname"])
///                 .build()
///                 .expect("ProfileForm schema")
///         });
///         &SCHEMA
///     }
///     fn form_state(&self) -> &FormState { &self.state }
///     fn form_state_mut(&mut self) -> &mut FormState { &mut self.state }
/// }
///
/// exposed_accessors!(ProfileForm { nickname / set_nickname });
///
/// let mut form = ProfileForm::default();
/// form.set_nickname("kit").unwrap();
/// assert_eq!(form.nickname().unwrap(), json!("kit"));
/// ```
#[macro_export]
macro_rules! exposed_accessors {
	($form:ty { $($getter:ident / $setter:ident),* $(,)? }) => {
		impl $form {
			$(
				pub fn $getter(&self) -> $crate::FormObjectResult<$crate::Value> {
					<$form as $crate::FormObject>::get(self, stringify!($getter))
				}

				pub fn $setter(
					&mut self,
					value: impl ::std::convert::Into<$crate::Value>,
				) -> $crate::FormObjectResult<()> {
					<$form as $crate::FormObject>::set(self, stringify!($getter), value)
				}
			)*
		}
	};
}
