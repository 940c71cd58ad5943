//! The conversion engine
//!
//! [`ConverterEngine::convert`] walks a fixed chain of strategies until one
//! produces a value:
//!
//! 1. identity, when the source already has the target type
//! 2. converters registered for the source type
//! 3. the source's own [`ConvertTo`](crate::value::ConvertTo) capability
//! 4. converters registered for the target type
//! 5. converters registered for interfaces the source type satisfies
//! 6. the built-in rules in [`converters`](crate::converters)
//!
//! A value produced by steps 2 to 5 is fed back into step 1, so a converter may
//! return an approximate type and let the engine finish the job.

use std::sync::PoisonError;

use log::{debug, trace, warn};

use crate::config::EngineConfig;
use crate::converters::convert_builtin;
use crate::error::ConvertError;
use crate::registry::{ConverterFn, ConverterRegistry, ConverterResult};
use crate::typed::Typed;
use crate::value::{Data, Value};
use crate::value_type::{Kind, TypeDescriptor};

/// Converts dynamic values between runtime types.
///
/// Registration needs `&mut self` and conversion `&self`, so an engine cannot
/// be reconfigured while a conversion on it is running.
#[derive(Debug, Default)]
pub struct ConverterEngine {
    registry: ConverterRegistry,
    config: EngineConfig,
}

impl ConverterEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            registry: ConverterRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ConverterRegistry {
        &self.registry
    }

    /// See [`ConverterRegistry::add_source_converter`].
    pub fn add_source_converter<F>(&mut self, source_type: &TypeDescriptor, converter: F)
    where
        F: Fn(&Value, &TypeDescriptor) -> ConverterResult + Send + Sync + 'static,
    {
        self.registry.add_source_converter(source_type, converter);
    }

    /// See [`ConverterRegistry::add_target_converter`].
    pub fn add_target_converter<F>(&mut self, target_type: &TypeDescriptor, converter: F)
    where
        F: Fn(&Value, &TypeDescriptor) -> ConverterResult + Send + Sync + 'static,
    {
        self.registry.add_target_converter(target_type, converter);
    }

    /// See [`ConverterRegistry::add_interface_converter`].
    pub fn add_interface_converter<F>(&mut self, interface_type: &TypeDescriptor, converter: F) -> Result<(), ConvertError>
    where
        F: Fn(&Value, &TypeDescriptor) -> ConverterResult + Send + Sync + 'static,
    {
        self.registry.add_interface_converter(interface_type, converter)
    }

    /// Convert `source` to `target`.
    ///
    /// On success the result has exactly the target type, except for interface
    /// targets, where the value keeps the concrete type that satisfies it.
    pub fn convert(&self, source: Value, target: &TypeDescriptor) -> Result<Value, ConvertError> {
        self.resolve(source, target, 0)
    }

    /// Convert `source` into the type referenced by `target` and store it there.
    ///
    /// `target` must be a reference value; the referent is left untouched when
    /// the conversion fails.
    pub fn set(&self, target: &Value, source: Value) -> Result<(), ConvertError> {
        let (slot, elem_type) = match (target.data(), target.ty().elem()) {
            (Data::Ref(slot), Some(elem_type)) if target.kind() == Kind::Reference => (slot, elem_type),
            _ => {
                return Err(ConvertError::ExpectedReference {
                    found: target.ty().clone(),
                })
            }
        };

        let converted = self.convert(source, elem_type)?;
        *slot.lock().unwrap_or_else(PoisonError::into_inner) = converted;
        Ok(())
    }

    /// Convert `source` into a Rust value of type `T`.
    pub fn convert_into<T: Typed>(&self, source: Value) -> Result<T, ConvertError> {
        let target = T::type_descriptor();
        let converted = self.convert(source, &target)?;
        let converted_type = converted.ty().clone();
        T::from_value(converted).ok_or_else(|| ConvertError::incompatible(&converted_type, &target))
    }

    /// Convert `source` and write it into `target`, leaving it untouched on failure.
    pub fn assign<T: Typed>(&self, target: &mut T, source: Value) -> Result<(), ConvertError> {
        *target = self.convert_into(source)?;
        Ok(())
    }

    pub(crate) fn resolve(&self, source: Value, target: &TypeDescriptor, depth: usize) -> Result<Value, ConvertError> {
        if source.ty() == target {
            return Ok(source);
        }

        if depth > self.config.max_redispatch_depth {
            warn!(
                "Conversion of {} to {} exceeded {} re-dispatches",
                source.ty(),
                target,
                self.config.max_redispatch_depth
            );
            return Err(ConvertError::DidNotConverge {
                from: source.ty().clone(),
                to: target.clone(),
                depth,
            });
        }

        let converted = self.first_conversion("source", self.registry.source_converters(source.ty()), &source, target)?;
        if let Some(result) = converted {
            return self.resolve(result, target, depth + 1);
        }

        if let Some(capability) = source.as_object().and_then(|object| object.as_convert_to()) {
            let converted = capability.convert_to(target).map_err(|e| {
                debug!("Self conversion of {} to {} failed: {}", source.ty(), target, e);
                e
            })?;
            if let Some(result) = converted {
                trace!("{} converted itself to {}", source.ty(), result.ty());
                return self.resolve(result, target, depth + 1);
            }
        }

        let converted = self.first_conversion("target", self.registry.target_converters(target), &source, target)?;
        if let Some(result) = converted {
            return self.resolve(result, target, depth + 1);
        }

        let converted = self.first_conversion("interface", self.registry.interface_converters(source.ty()), &source, target)?;
        if let Some(result) = converted {
            return self.resolve(result, target, depth + 1);
        }

        convert_builtin(self, source, target, depth)
    }

    /// Run `converters` in order until one produces a value or fails.
    fn first_conversion<'a, I>(&self, strategy: &str, converters: I, source: &Value, target: &TypeDescriptor) -> ConverterResult
    where
        I: IntoIterator<Item = &'a ConverterFn>,
    {
        for converter in converters {
            match converter(source, target) {
                Ok(Some(result)) => {
                    trace!("{} converter turned {} into {} for {}", strategy, source.ty(), result.ty(), target);
                    return Ok(Some(result));
                }
                Ok(None) => continue,
                Err(e) => {
                    debug!("{} converter for {} -> {} failed: {}", strategy, source.ty(), target, e);
                    return Err(e);
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let engine = ConverterEngine::new();
        let result = engine.convert(Value::from("hello"), &TypeDescriptor::string());
        assert_eq!(result.unwrap(), Value::from("hello"));
    }

    #[test]
    fn test_source_converter_result_is_redispatched() {
        let mut engine = ConverterEngine::new();
        let meters = TypeDescriptor::named("Meters", &TypeDescriptor::f64());
        engine.add_source_converter(&meters, |source, _| Ok(source.as_f64().map(|m| Value::from(m * 100.0))));

        let result = engine.convert(Value::typed(&meters, Data::Float(1.5)), &TypeDescriptor::i32());
        assert_eq!(result.unwrap(), Value::from(150i32));
    }

    #[test]
    fn test_redispatch_bound() {
        let mut engine = ConverterEngine::with_config(EngineConfig { max_redispatch_depth: 3 });
        let looping = TypeDescriptor::structure("Looping");
        let looping_value = Value::typed(&looping, Data::Nil);
        let produced = looping_value.clone();
        engine.add_source_converter(&looping, move |_, _| Ok(Some(produced.clone())));

        let result = engine.convert(looping_value, &TypeDescriptor::string());
        assert!(matches!(result, Err(ConvertError::DidNotConverge { depth: 4, .. })));
    }

    #[test]
    fn test_set_requires_reference() {
        let engine = ConverterEngine::new();
        let result = engine.set(&Value::from(3isize), Value::from(4isize));
        assert!(matches!(result, Err(ConvertError::ExpectedReference { .. })));
    }

    #[test]
    fn test_set_writes_on_success_only() {
        let engine = ConverterEngine::new();
        let target = Value::reference(Value::from(0i32));

        engine.set(&target, Value::from("42")).unwrap();
        assert_eq!(target.load(), Some(Value::from(42i32)));

        assert!(engine.set(&target, Value::from("forty-three")).is_err());
        assert_eq!(target.load(), Some(Value::from(42i32)));
    }

    #[test]
    fn test_assign() {
        let engine = ConverterEngine::new();
        let mut ints: Vec<i32> = Vec::new();
        engine
            .assign(&mut ints, Value::list(vec![Value::from(1i64), Value::from("2"), Value::from(3.9f64)]))
            .unwrap();
        assert_eq!(ints, vec![1, 2, 3]);
    }
}
