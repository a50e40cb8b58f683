//! Saving and updating form objects.

mod common;

use common::forms::{CustomerForm, OrderForm, ShippingForm};
use reinhardt_form_objects_core::{BackingRecord, FormObject, FormObjectError, SaveOptions};
use reinhardt_form_objects_test::{
	MemoryRecord, address_record, assert_errors_on, assert_form_clean, customer_record,
	init_test_logging, order_record,
};
use rstest::*;
use serde_json::json;

#[rstest]
fn test_save_persists_valid_form(customer_record: MemoryRecord) {
	init_test_logging();
	let mut form = CustomerForm::new(customer_record);
	form.set("name", "Ann").unwrap();

	assert!(form.save(SaveOptions::default()).unwrap());

	assert_form_clean(&form);
	assert_eq!(form.customer.persisted_attribute("name"), Some(json!("Ann")));
	assert_eq!(form.customer.save_count(), 1);
}

#[rstest]
fn test_save_returns_false_and_keeps_errors(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);
	form.set("email", "").unwrap();

	assert!(!form.save(SaveOptions::default()).unwrap());

	assert_errors_on(form.errors(), "email", &["can't be blank"]);
	assert!(!form.customer.is_persisted());
}

#[rstest]
fn test_save_strict_raises_record_invalid(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);
	form.set("email", "").unwrap();

	let error = form.save_strict(SaveOptions::default()).unwrap_err();

	assert!(matches!(error, FormObjectError::RecordInvalid(_)));
	assert_eq!(error.to_string(), "Validation failed: Email can't be blank");
	assert_eq!(error.validation_errors(), Some(form.errors()));
	assert!(!form.customer.is_persisted());
}

#[rstest]
fn test_skipping_validation_saves_invalid_records(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);
	form.set("email", "").unwrap();
	form.set("name", "A name far beyond ten characters").unwrap();

	assert!(form.save(SaveOptions::skip_validation()).unwrap());

	assert_form_clean(&form);
	assert_eq!(form.customer.persisted_attribute("email"), Some(json!("")));
}

#[rstest]
fn test_skipping_validation_clears_stale_errors(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);
	form.set("email", "").unwrap();
	assert!(!form.save(SaveOptions::default()).unwrap());

	form.save_strict(SaveOptions::new().with_validate(false))
		.unwrap();

	assert_form_clean(&form);
}

#[rstest]
fn test_form_validation_failure_takes_precedence(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);
	form.set_attributes(json!({"name": "Bartholomew Jones", "email": ""}))
		.unwrap();

	let error = form.save_strict(SaveOptions::default()).unwrap_err();

	assert!(matches!(error, FormObjectError::FormInvalid(_)));
	assert_eq!(
		form.errors().keys().collect::<Vec<_>>(),
		vec!["name", "email"]
	);
	assert_errors_on(
		form.errors(),
		"name",
		&["is too long (maximum is 10 characters)"],
	);
	assert_errors_on(form.errors(), "email", &["can't be blank"]);
	assert!(!form.customer.is_persisted());
}

#[rstest]
fn test_form_validation_failure_alone(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);
	form.set("name", "Bartholomew Jones").unwrap();

	assert!(!form.save(SaveOptions::default()).unwrap());
	assert!(matches!(
		form.save_strict(SaveOptions::default()),
		Err(FormObjectError::FormInvalid(_))
	));
	assert_eq!(form.errors().len(), 1);
}

#[rstest]
fn test_record_rejecting_without_messages_blocks_save(
	customer_record: MemoryRecord,
	address_record: MemoryRecord,
) {
	let mut form = ShippingForm::new(customer_record, address_record.rejecting_silently());

	assert!(!form.is_valid().unwrap());
	assert!(form.errors().is_empty());
	assert!(!form.save(SaveOptions::default()).unwrap());
	assert!(matches!(
		form.save_strict(SaveOptions::default()),
		Err(FormObjectError::RecordInvalid(_))
	));
	assert_eq!(form.customer.save_count(), 0);
	assert_eq!(form.address.save_count(), 0);
}

#[rstest]
fn test_backing_models_save_in_declaration_order(
	customer_record: MemoryRecord,
	address_record: MemoryRecord,
) {
	let mut form = ShippingForm::new(customer_record, address_record);
	form.set_attributes(json!({"city": "Shelbyville", "postal_code": "99999"}))
		.unwrap();

	assert!(form.save(SaveOptions::default()).unwrap());

	assert_eq!(form.customer.save_count(), 1);
	assert_eq!(
		form.address.persisted_attribute("city"),
		Some(json!("Shelbyville"))
	);
	assert_eq!(form.address.persisted_attribute("zip"), Some(json!("99999")));
}

#[rstest]
fn test_failed_save_stops_before_later_models(
	customer_record: MemoryRecord,
	address_record: MemoryRecord,
) {
	let mut form = ShippingForm::new(customer_record.failing_save("disk full"), address_record);

	let error = form.save(SaveOptions::default()).unwrap_err();

	assert!(matches!(error, FormObjectError::Record(_)));
	assert_eq!(error.to_string(), "disk full");
	assert_eq!(form.address.save_count(), 0);
}

#[rstest]
fn test_invalid_second_model_blocks_every_save(
	customer_record: MemoryRecord,
	address_record: MemoryRecord,
) {
	let mut form = ShippingForm::new(customer_record, address_record);
	form.set("postal_code", "").unwrap();

	assert!(!form.save(SaveOptions::default()).unwrap());

	assert_eq!(form.customer.save_count(), 0);
	assert_eq!(form.address.save_count(), 0);
	assert_errors_on(form.errors(), "postal_code", &["can't be blank"]);
}

#[rstest]
fn test_collaborator_failures_are_not_swallowed(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record.failing_errors("errors backend offline"));

	let error = form.save(SaveOptions::default()).unwrap_err();

	assert_eq!(error.to_string(), "errors backend offline");
	assert!(!error.is_validation_failure());
}

#[rstest]
fn test_update_assigns_then_saves(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);

	assert!(
		form.update(
			json!({"name": "Ann", "phone_number": "555-1234"}),
			SaveOptions::default()
		)
		.unwrap()
	);

	assert_eq!(
		form.customer.persisted_attribute("phone_number"),
		Some(json!("555-1234"))
	);
}

#[rstest]
fn test_update_strict_reports_assignment_and_validation_errors(customer_record: MemoryRecord) {
	let mut form = CustomerForm::new(customer_record);

	let error = form
		.update_strict(json!([1, 2]), SaveOptions::default())
		.unwrap_err();
	assert!(matches!(error, FormObjectError::InvalidArgument(_)));

	let error = form
		.update_strict(json!({"email": ""}), SaveOptions::default())
		.unwrap_err();
	assert!(matches!(error, FormObjectError::RecordInvalid(_)));
	assert_eq!(form.customer.save_count(), 0);
}

#[rstest]
fn test_nested_update_saves_child_records(order_record: MemoryRecord) {
	let mut form = OrderForm::new(order_record);

	assert!(
		form.update(
			json!({"order_number": "A-2002", "line_items": [{"qty": "5"}, {"product": "Sprocket"}]}),
			SaveOptions::default()
		)
		.unwrap()
	);

	let items = form.order.children("items");
	assert_eq!(items[0].lock().read_attribute("quantity").unwrap(), json!(5));
	assert_eq!(
		items[1].lock().read_attribute("product").unwrap(),
		json!("Sprocket")
	);
	assert_eq!(
		form.order.persisted_attribute("number"),
		Some(json!("A-2002"))
	);
	assert_eq!(
		form.get("line_items").unwrap(),
		json!([
			{"product": "Widget", "qty": 5},
			{"product": "Sprocket", "qty": 1},
		])
	);
}

#[rstest]
fn test_nested_write_rejects_bad_shapes(order_record: MemoryRecord) {
	let mut form = OrderForm::new(order_record);

	let not_an_array = form.set("line_items", json!({"qty": 1})).unwrap_err();
	let too_many = form
		.set("line_items", json!([{}, {}, {"qty": 3}]))
		.unwrap_err();

	assert!(matches!(not_an_array, FormObjectError::InvalidArgument(_)));
	assert!(matches!(too_many, FormObjectError::InvalidArgument(_)));
	assert_eq!(too_many.to_string(), "no nested form at index 2 (2 loaded)");
}

#[rstest]
fn test_nested_form_saves_on_its_own(order_record: MemoryRecord) {
	let mut form = OrderForm::new(order_record);
	form.load_collection("line_items").unwrap();

	let child = &mut form.line_items.loaded_forms_mut()[0];
	child.set("qty", 0).unwrap();

	assert!(!child.save(SaveOptions::default()).unwrap());
	assert_errors_on(child.errors(), "qty", &["must be greater than 0"]);
}
