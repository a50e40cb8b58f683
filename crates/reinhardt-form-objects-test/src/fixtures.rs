//! rstest fixtures providing prepared backing records.
//!
//! ```rust,no_run
//! use reinhardt_form_objects_test::fixtures::customer_record;
//! use reinhardt_form_objects_test::record::MemoryRecord;
//! use rstest::*;
//!
//! #[rstest]
//! fn test_with_customer(customer_record: MemoryRecord) {
//!     assert_eq!(customer_record.model(), "customer");
//! }
//! ```

use crate::record::MemoryRecord;
use reinhardt_form_objects_core::{AttributeType, share};
use rstest::*;
use serde_json::{Value, json};

pub const FRIENDLY_MESSAGE: &str = "Customer needs to be friendly";

/// Customer with `name`, `email`, `phone_number` and `friendly`.
///
/// `email` must be present, and an unfriendly customer gets a base error.
#[fixture]
pub fn customer_record() -> MemoryRecord {
	MemoryRecord::new("customer")
		.with_typed_attribute("name", AttributeType::String, json!("Test User"))
		.with_typed_attribute("email", AttributeType::String, json!("test@example.com"))
		.with_typed_attribute("phone_number", AttributeType::String, json!("123-4567"))
		.with_typed_attribute("friendly", AttributeType::Boolean, json!(true))
		.validates_presence_of("email")
		.validates_with(|record, errors| {
			if record.attribute("friendly") == Value::Bool(false) {
				errors.add("base", FRIENDLY_MESSAGE);
			}
		})
}

/// Address with a required `zip`.
#[fixture]
pub fn address_record() -> MemoryRecord {
	MemoryRecord::new("address")
		.with_typed_attribute("street", AttributeType::String, json!("1 Main St"))
		.with_typed_attribute("city", AttributeType::String, json!("Springfield"))
		.with_typed_attribute("zip", AttributeType::String, json!("12345"))
		.validates_presence_of("zip")
}

/// Line item whose `quantity` must be present and positive.
pub fn line_item_record(product: &str, quantity: i64) -> MemoryRecord {
	MemoryRecord::new("line_item")
		.with_typed_attribute("product", AttributeType::String, json!(product))
		.with_typed_attribute("quantity", AttributeType::Integer, json!(quantity))
		.validates_presence_of("quantity")
		.validates_with(|record, errors| {
			if record
				.attribute("quantity")
				.as_i64()
				.is_some_and(|quantity| quantity <= 0)
			{
				errors.add("quantity", "must be greater than 0");
			}
		})
}

/// Order with two line items under the `items` association.
#[fixture]
pub fn order_record() -> MemoryRecord {
	MemoryRecord::new("order")
		.with_typed_attribute("number", AttributeType::String, json!("A-1001"))
		.validates_presence_of("number")
		.has_many(
			"items",
			[
				share(line_item_record("Widget", 2)),
				share(line_item_record("Gadget", 1)),
			],
		)
}
