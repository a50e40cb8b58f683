use reinhardt_form_objects_core::{
	CollectionWrapper, ExposeOptions, ExposedErrors, FormObject, FormSchema, FormState, NestedForm,
	SharedRecord, Validation,
};
use reinhardt_form_objects_test::MemoryRecord;
use std::sync::LazyLock;

/// Exposes `name`, `email` and `phone_number` of a customer, and requires
/// `name` to fit in ten characters.
pub struct CustomerForm {
	pub customer: MemoryRecord,
	state: FormState,
}

impl CustomerForm {
	pub fn new(customer: MemoryRecord) -> Self {
		Self {
			customer,
			state: FormState::new(),
		}
	}
}

impl FormObject for CustomerForm {
	fn schema() -> &'static FormSchema<Self> {
		static SCHEMA: LazyLock<FormSchema<CustomerForm>> = LazyLock::new(|| {
			FormSchema::builder()
				.backing_model(
					"customer",
					|form: &CustomerForm| &form.customer,
					|form: &mut CustomerForm| &mut form.customer,
				)
				.expose("customer", ["name", "email", "phone_number"])
				.validates("name", Validation::length().maximum(10))
				.build()
				.expect("CustomerForm schema")
		});
		&SCHEMA
	}

	fn form_state(&self) -> &FormState {
		&self.state
	}

	fn form_state_mut(&mut self) -> &mut FormState {
		&mut self.state
	}
}

/// Customer and address behind one form; the address `zip` is exposed as
/// `postal_code`.
pub struct ShippingForm {
	pub customer: MemoryRecord,
	pub address: MemoryRecord,
	state: FormState,
}

impl ShippingForm {
	pub fn new(customer: MemoryRecord, address: MemoryRecord) -> Self {
		Self {
			customer,
			address,
			state: FormState::new(),
		}
	}
}

impl FormObject for ShippingForm {
	fn schema() -> &'static FormSchema<Self> {
		static SCHEMA: LazyLock<FormSchema<ShippingForm>> = LazyLock::new(|| {
			FormSchema::builder()
				.backing_model(
					"customer",
					|form: &ShippingForm| &form.customer,
					|form: &mut ShippingForm| &mut form.customer,
				)
				.backing_model(
					"address",
					|form: &ShippingForm| &form.address,
					|form: &mut ShippingForm| &mut form.address,
				)
				.expose("customer", ["email"])
				.expose_with(
					"customer",
					["email"],
					ExposeOptions::new().suffix("_confirmation"),
				)
				.expose("address", ["street", "city"])
				.expose_with(
					"address",
					["zip"],
					ExposeOptions::new().rename("zip", "postal_code"),
				)
				.build()
				.expect("ShippingForm schema")
		});
		&SCHEMA
	}

	fn form_state(&self) -> &FormState {
		&self.state
	}

	fn form_state_mut(&mut self) -> &mut FormState {
		&mut self.state
	}
}

/// Wraps one line item record, exposing `quantity` as `qty`.
pub struct LineItemForm {
	pub item: SharedRecord,
	state: FormState,
}

impl FormObject for LineItemForm {
	fn schema() -> &'static FormSchema<Self> {
		static SCHEMA: LazyLock<FormSchema<LineItemForm>> = LazyLock::new(|| {
			FormSchema::builder()
				.backing_model(
					"item",
					|form: &LineItemForm| &form.item,
					|form: &mut LineItemForm| &mut form.item,
				)
				.expose("item", ["product"])
				.expose_with(
					"item",
					["quantity"],
					ExposeOptions::new().rename("quantity", "qty"),
				)
				.build()
				.expect("LineItemForm schema")
		});
		&SCHEMA
	}

	fn form_state(&self) -> &FormState {
		&self.state
	}

	fn form_state_mut(&mut self) -> &mut FormState {
		&mut self.state
	}
}

impl NestedForm for LineItemForm {
	fn wrap(item: SharedRecord) -> Self {
		Self {
			item,
			state: FormState::new(),
		}
	}
}

/// Order form exposing the `items` association as `line_items`.
pub struct OrderForm {
	pub order: MemoryRecord,
	pub line_items: CollectionWrapper<LineItemForm>,
	state: FormState,
}

impl OrderForm {
	pub fn new(order: MemoryRecord) -> Self {
		Self {
			order,
			line_items: CollectionWrapper::new(),
			state: FormState::new(),
		}
	}
}

impl FormObject for OrderForm {
	fn schema() -> &'static FormSchema<Self> {
		static SCHEMA: LazyLock<FormSchema<OrderForm>> = LazyLock::new(|| {
			FormSchema::builder()
				.backing_model(
					"order",
					|form: &OrderForm| &form.order,
					|form: &mut OrderForm| &mut form.order,
				)
				.expose_with(
					"order",
					["number"],
					ExposeOptions::new().prefix("order_"),
				)
				.collection(
					"line_items",
					"order",
					"items",
					|form: &OrderForm| &form.line_items,
					|form: &mut OrderForm| &mut form.line_items,
				)
				.build()
				.expect("OrderForm schema")
		});
		&SCHEMA
	}

	fn form_state(&self) -> &FormState {
		&self.state
	}

	fn form_state_mut(&mut self) -> &mut FormState {
		&mut self.state
	}
}

/// Order form whose number must start with `R`.
pub struct RushOrderForm {
	pub order: OrderForm,
	state: FormState,
}

impl RushOrderForm {
	pub fn new(order: MemoryRecord) -> Self {
		Self {
			order: OrderForm::new(order),
			state: FormState::new(),
		}
	}
}

impl FormObject for RushOrderForm {
	fn schema() -> &'static FormSchema<Self> {
		static SCHEMA: LazyLock<FormSchema<RushOrderForm>> = LazyLock::new(|| {
			FormSchema::builder()
				.inherit(
					OrderForm::schema(),
					|form: &RushOrderForm| &form.order,
					|form: &mut RushOrderForm| &mut form.order,
				)
				.validate(|form: &RushOrderForm, errors: &mut ExposedErrors| {
					let number = form.get("order_number")?;
					if !number.as_str().is_some_and(|n| n.starts_with('R')) {
						errors.add("order_number", "must start with R");
					}
					Ok(())
				})
				.build()
				.expect("RushOrderForm schema")
		});
		&SCHEMA
	}

	fn form_state(&self) -> &FormState {
		&self.state
	}

	fn form_state_mut(&mut self) -> &mut FormState {
		&mut self.state
	}
}
