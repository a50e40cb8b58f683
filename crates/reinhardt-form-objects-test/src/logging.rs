//! Logging for form object tests
//!
//! Form objects emit `tracing` events with the `log` bridge enabled. The
//! logger installed here captures them per test. Without `RUST_LOG` it shows
//! schema building, validation and saves from the core crate at `debug` and
//! everything else at `warn`.

use env_logger::Env;
use std::sync::Once;

static INIT: Once = Once::new();

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn,reinhardt_form_objects_core=debug";

/// Install the test logger. Later calls do nothing.
///
/// # Examples
///
/// ```
/// use reinhardt_form_objects_test::logging::init_test_logging;
///
/// init_test_logging();
/// init_test_logging();
/// ```
pub fn init_test_logging() {
	INIT.call_once(|| {
		let env = Env::default().default_filter_or(DEFAULT_FILTER);
		let _ = env_logger::Builder::from_env(env).is_test(true).try_init();
	});
}
