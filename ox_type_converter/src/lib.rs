//! ox_type_converter - Runtime type conversion engine
//!
//! Converts dynamically typed [`Value`]s to a target [`TypeDescriptor`] chosen
//! at runtime, as needed when working with decoded untyped data. Conversions
//! are resolved through custom converters registered per source type, per
//! target type and per interface, the value's own [`ConvertTo`] capability,
//! and finally the built-in string, numeric and container rules.
//!
//! ```
//! use ox_type_converter::{ConverterEngine, TypeDescriptor, Value};
//!
//! let engine = ConverterEngine::new();
//! let ints: Vec<i32> = engine
//!     .convert_into(Value::list(vec![Value::from("1"), Value::from(2.0f64)]))
//!     .unwrap();
//! assert_eq!(ints, vec![1, 2]);
//!
//! let text = engine.convert(Value::from(19.3f64), &TypeDescriptor::string()).unwrap();
//! assert_eq!(text.as_str(), Some("19.3"));
//! ```

pub mod config;
pub mod converters;
pub mod engine;
pub mod error;
pub mod registry;
pub mod typed;
pub mod value;
pub mod value_type;

use std::sync::{PoisonError, RwLock};

use lazy_static::lazy_static;

pub use config::EngineConfig;
pub use engine::ConverterEngine;
pub use error::ConvertError;
pub use registry::{ConverterFn, ConverterRegistry, ConverterResult};
pub use typed::Typed;
pub use value::{ConvertTo, Data, Object, RenderText, Value};
pub use value_type::{Kind, TypeDescriptor};

lazy_static! {
    /// The process-wide engine behind [`convert`] and [`set`].
    ///
    /// Register converters through `DEFAULT_ENGINE.write()` during setup.
    /// Converters must not take the write lock while a conversion on this
    /// engine is running.
    pub static ref DEFAULT_ENGINE: RwLock<ConverterEngine> = RwLock::new(ConverterEngine::new());
}

/// Convert `source` to `target` with the default engine.
pub fn convert(source: Value, target: &TypeDescriptor) -> Result<Value, ConvertError> {
    DEFAULT_ENGINE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .convert(source, target)
}

/// Store `source` into the reference `target` with the default engine.
pub fn set(target: &Value, source: Value) -> Result<(), ConvertError> {
    DEFAULT_ENGINE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .set(target, source)
}
