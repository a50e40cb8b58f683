//! Testing utilities for Reinhardt form objects
//!
//! - [`record::MemoryRecord`]: in-memory backing record with presence and
//!   custom validations, has-many associations and failure switches
//! - [`fixtures`]: rstest fixtures for customer, address and order records
//! - [`assertions`]: error and attribute assertions
//! - [`logging`]: one-time `env_logger` setup

pub mod assertions;
pub mod fixtures;
pub mod logging;
pub mod record;

pub use assertions::{assert_attribute_eq, assert_errors_on, assert_form_clean, assert_no_errors_on};
pub use fixtures::{
	FRIENDLY_MESSAGE, address_record, customer_record, line_item_record, order_record,
};
pub use logging::init_test_logging;
pub use record::{MemoryRecord, RecordRule};
