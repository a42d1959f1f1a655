//! test-support: helpers shared by the integration tests.
//!
//! ```rust,ignore
//! use test_support::{init_tracing, compile_schema};
//!
//! #[test]
//! fn example() {
//!     init_tracing();
//!     let validator = compile_schema("report-request.schema.json");
//! }
//! ```

use once_cell::sync::Lazy;
use tracing_subscriber::{fmt, EnvFilter};

use std::path::PathBuf;

/// Initialize `tracing` once, honoring `RUST_LOG` and writing via the test writer.
///
/// Safe to call from multiple tests; only the first call configures the global subscriber.
pub fn init_tracing() {
    static INIT: Lazy<()> = Lazy::new(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        // with_test_writer() causes logs to appear alongside failing tests only (cargo/nextest)
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    });
    Lazy::force(&INIT);
}

/// Path to the repository's `tests/schemas` directory.
pub fn schemas_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("schemas")
}

pub fn read_schema(name: &str) -> serde_json::Value {
    let path = schemas_dir().join(name);
    let data = std::fs::read(&path)
        .unwrap_or_else(|e| panic!("failed to read schema {}: {e}", path.display()));
    serde_json::from_slice(&data).expect("valid schema JSON")
}

pub fn compile_schema(name: &str) -> jsonschema::Validator {
    let schema = read_schema(name);
    jsonschema::validator_for(&schema).expect("compile schema")
}
