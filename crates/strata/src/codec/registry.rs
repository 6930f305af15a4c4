//! Structure and interface registrations.
//!
//! Every registration is recorded in one table per wire format. A value can be
//! decoded under whichever format was canonical when it was written (historical
//! replay), so both tables always receive the same registrations.

use std::any::TypeId;
use std::collections::{BTreeSet, HashMap};
use strata_core::{Format, Result, StrataError};

use super::Encodable;

#[derive(Debug, Default, Clone)]
struct FormatTable {
    /// Concrete type -> registered structure name
    structures: HashMap<TypeId, String>,
    /// Structure name -> concrete type
    names: HashMap<String, TypeId>,
    /// Interface name -> allowed concrete tags
    interfaces: HashMap<String, BTreeSet<String>>,
}

/// Registrations for both formats.
///
/// Built up through [`CodecBuilder`](super::CodecBuilder) and immutable once the
/// codec is built.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    legacy: FormatTable,
    modern: FormatTable,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, format: Format) -> &FormatTable {
        match format {
            Format::Legacy => &self.legacy,
            Format::Modern => &self.modern,
        }
    }

    fn tables_mut(&mut self) -> [&mut FormatTable; 2] {
        [&mut self.legacy, &mut self.modern]
    }

    /// Register `T` under `name` in both formats.
    pub fn register_structure<T: Encodable>(&mut self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(StrataError::Registry("structure name must not be empty".into()));
        }
        let type_id = TypeId::of::<T>();
        if let Some(existing) = self.legacy.structures.get(&type_id) {
            return Err(StrataError::Registry(format!(
                "{} is already registered as '{}'",
                T::type_name(),
                existing
            )));
        }
        if self.legacy.names.contains_key(name) {
            return Err(StrataError::Registry(format!(
                "structure name '{}' is already taken",
                name
            )));
        }

        for table in self.tables_mut() {
            table.structures.insert(type_id, name.to_string());
            table.names.insert(name.to_string(), type_id);
        }
        tracing::debug!("Registered structure {} as '{}'", T::type_name(), name);
        Ok(())
    }

    /// Register interface `I` under `name` with its allowed concrete tags, in
    /// both formats.
    pub fn register_interface<I: Encodable>(&mut self, name: &str, impls: &[&str]) -> Result<()> {
        match I::INTERFACE {
            Some(declared) if declared == name => {}
            Some(declared) => {
                return Err(StrataError::Registry(format!(
                    "{} declares interface '{}', not '{}'",
                    I::type_name(),
                    declared,
                    name
                )))
            }
            None => {
                return Err(StrataError::Registry(format!(
                    "{} is not an interface type",
                    I::type_name()
                )))
            }
        }
        if impls.is_empty() {
            return Err(StrataError::Registry(format!(
                "interface '{}' needs at least one implementation",
                name
            )));
        }
        if self.legacy.interfaces.contains_key(name) {
            return Err(StrataError::Registry(format!(
                "interface '{}' is already registered",
                name
            )));
        }

        let tags: BTreeSet<String> = impls.iter().map(|tag| tag.to_string()).collect();
        for table in self.tables_mut() {
            table.interfaces.insert(name.to_string(), tags.clone());
        }
        tracing::debug!("Registered interface '{}' with {} implementations", name, tags.len());
        Ok(())
    }

    /// Structure name registered for `T`, if any.
    pub fn structure_name<T: 'static>(&self, format: Format) -> Option<&str> {
        self.table(format)
            .structures
            .get(&TypeId::of::<T>())
            .map(String::as_str)
    }

    pub fn is_registered_name(&self, format: Format, name: &str) -> bool {
        self.table(format).names.contains_key(name)
    }

    pub fn interface_impls(&self, format: Format, interface: &str) -> Option<&BTreeSet<String>> {
        self.table(format).interfaces.get(interface)
    }

    /// Verify that a value of an interface type holds a registered variant.
    ///
    /// Values of non-interface types always pass.
    pub fn check_concrete<T: Encodable>(&self, value: &T, format: Format) -> Result<()> {
        let Some(interface) = T::INTERFACE else {
            return Ok(());
        };
        let impls = self
            .interface_impls(format, interface)
            .ok_or_else(|| StrataError::UnregisteredInterface(interface.to_string()))?;
        let tag = value.concrete_tag().unwrap_or_default();
        if !impls.contains(tag) {
            return Err(StrataError::UnregisteredConcrete {
                interface: interface.to_string(),
                tag: tag.to_string(),
                format,
            });
        }
        Ok(())
    }

    pub fn structure_count(&self) -> usize {
        self.legacy.structures.len()
    }

    pub fn interface_count(&self) -> usize {
        self.legacy.interfaces.len()
    }
}
