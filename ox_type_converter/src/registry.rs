use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::error::ConvertError;
use crate::value::Value;
use crate::value_type::TypeDescriptor;

/// Outcome of a single conversion strategy.
///
/// `Ok(Some(value))` converted, `Ok(None)` means no conversion is available and
/// the next strategy is tried, `Err(_)` aborts the whole resolution.
pub type ConverterResult = Result<Option<Value>, ConvertError>;

/// A registered conversion function, given the source value and the target type.
pub type ConverterFn = Box<dyn Fn(&Value, &TypeDescriptor) -> ConverterResult + Send + Sync + 'static>;

/// Registries of custom converters, keyed by source type, target type or
/// interface. Lists keep registration order.
#[derive(Default)]
pub struct ConverterRegistry {
    source_converters: HashMap<TypeDescriptor, Vec<ConverterFn>>,
    target_converters: HashMap<TypeDescriptor, Vec<ConverterFn>>,
    /// Ordered by first registration of each interface.
    interface_converters: Vec<(TypeDescriptor, Vec<ConverterFn>)>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter consulted whenever the source value has exactly `source_type`.
    pub fn add_source_converter<F>(&mut self, source_type: &TypeDescriptor, converter: F)
    where
        F: Fn(&Value, &TypeDescriptor) -> ConverterResult + Send + Sync + 'static,
    {
        debug!("Registering source converter for {}", source_type);
        self.source_converters
            .entry(source_type.clone())
            .or_default()
            .push(Box::new(converter));
    }

    /// Register a converter consulted whenever the requested target is exactly `target_type`.
    pub fn add_target_converter<F>(&mut self, target_type: &TypeDescriptor, converter: F)
    where
        F: Fn(&Value, &TypeDescriptor) -> ConverterResult + Send + Sync + 'static,
    {
        debug!("Registering target converter for {}", target_type);
        self.target_converters
            .entry(target_type.clone())
            .or_default()
            .push(Box::new(converter));
    }

    /// Register a converter consulted for any source type satisfying `interface_type`.
    ///
    /// Fails with [`ConvertError::NotAnInterface`] when `interface_type` is a
    /// concrete type; the registry is left unchanged.
    pub fn add_interface_converter<F>(&mut self, interface_type: &TypeDescriptor, converter: F) -> Result<(), ConvertError>
    where
        F: Fn(&Value, &TypeDescriptor) -> ConverterResult + Send + Sync + 'static,
    {
        if !interface_type.is_interface() {
            return Err(ConvertError::NotAnInterface {
                name: interface_type.clone(),
            });
        }

        debug!("Registering interface converter for {}", interface_type);
        match self
            .interface_converters
            .iter_mut()
            .find(|(registered, _)| registered == interface_type)
        {
            Some((_, converters)) => converters.push(Box::new(converter)),
            None => self
                .interface_converters
                .push((interface_type.clone(), vec![Box::new(converter)])),
        }
        Ok(())
    }

    pub fn source_converters(&self, source_type: &TypeDescriptor) -> &[ConverterFn] {
        self.source_converters
            .get(source_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn target_converters(&self, target_type: &TypeDescriptor) -> &[ConverterFn] {
        self.target_converters
            .get(target_type)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Converters of every interface `source_type` satisfies, interfaces in
    /// registration order.
    pub fn interface_converters<'a>(&'a self, source_type: &'a TypeDescriptor) -> impl Iterator<Item = &'a ConverterFn> + 'a {
        self.interface_converters
            .iter()
            .filter(move |(interface, _)| source_type.satisfies(interface))
            .flat_map(|(_, converters)| converters.iter())
    }

    pub fn source_converter_count(&self, source_type: &TypeDescriptor) -> usize {
        self.source_converters(source_type).len()
    }

    pub fn target_converter_count(&self, target_type: &TypeDescriptor) -> usize {
        self.target_converters(target_type).len()
    }

    pub fn interface_converter_count(&self, interface_type: &TypeDescriptor) -> usize {
        self.interface_converters
            .iter()
            .find(|(registered, _)| registered == interface_type)
            .map_or(0, |(_, converters)| converters.len())
    }

    pub fn registered_interfaces(&self) -> Vec<TypeDescriptor> {
        self.interface_converters
            .iter()
            .map(|(interface, _)| interface.clone())
            .collect()
    }
}

impl fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("source_types", &self.source_converters.keys().collect::<Vec<_>>())
            .field("target_types", &self.target_converters.keys().collect::<Vec<_>>())
            .field("interfaces", &self.registered_interfaces())
            .finish()
    }
}
