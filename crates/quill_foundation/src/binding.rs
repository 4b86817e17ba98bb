//! Binding named records to native Rust structs.
//!
//! Every bindable native type is described once, at registration time, by a
//! [`StructBinding`]: a table of [`FieldDescriptor`]s keyed by tag. A field
//! declared on an embedded sub-struct carries an [`EmbedPath`], the chain of
//! embedded members to walk through before the field itself is reached. This
//! lets a flat record like `(Employee name:"ann" id:7)` fill a struct whose
//! `id` actually lives on an embedded `Badge`.
//!
//! Factories are collected in a [`RegistryBuilder`] during host start-up and
//! frozen into a [`FactoryRegistry`] that is passed to
//! [`Record::materialize`] and [`Record::dehydrate`].

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::config::RecordConfig;
use crate::error::{Error, Result};
use crate::host::HostValue;
use crate::record::Record;
use crate::sexp::Sexp;
use crate::symbol::SymbolTable;
use crate::types::Type;
use crate::value::Value;

/// One step through an embedded member.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmbedStep {
    /// Type name of the embedded struct.
    pub child_name: String,
    /// Ordinal of the embedded member on its parent.
    pub child_field: usize,
}

impl EmbedStep {
    /// Creates a step.
    #[must_use]
    pub fn new(child_name: impl Into<String>, child_field: usize) -> Self {
        Self {
            child_name: child_name.into(),
            child_field,
        }
    }
}

/// Route from a struct to one of its (possibly deeply) embedded members.
///
/// Empty for fields declared directly on the bound type.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EmbedPath(Vec<EmbedStep>);

impl EmbedPath {
    /// The empty path.
    #[must_use]
    pub fn direct() -> Self {
        Self::default()
    }

    /// Returns the path extended by one step.
    #[must_use]
    pub fn then(mut self, child_name: impl Into<String>, child_field: usize) -> Self {
        self.0.push(EmbedStep::new(child_name, child_field));
        self
    }

    /// The steps, outermost first.
    #[must_use]
    pub fn steps(&self) -> &[EmbedStep] {
        &self.0
    }

    /// Returns true if no step is needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<EmbedStep>> for EmbedPath {
    fn from(steps: Vec<EmbedStep>) -> Self {
        Self(steps)
    }
}

impl fmt::Display for EmbedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            f.write_str(&step.child_name)?;
        }
        Ok(())
    }
}

/// Describes one native field reachable from a bound record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Key under which the field appears in the record.
    pub tag: String,
    /// Field name on the native type.
    pub name: String,
    /// Position of the field on the struct that declares it.
    pub ordinal: usize,
    /// Declared field type.
    pub ty: Type,
    /// Embedded members to traverse first.
    pub embed_path: EmbedPath,
}

impl FieldDescriptor {
    /// Describes a field declared directly on the bound type.
    #[must_use]
    pub fn new(tag: impl Into<String>, name: impl Into<String>, ordinal: usize, ty: Type) -> Self {
        Self {
            tag: tag.into(),
            name: name.into(),
            ordinal,
            ty,
            embed_path: EmbedPath::direct(),
        }
    }

    /// Sets the embed path.
    #[must_use]
    pub fn embedded_via(mut self, path: EmbedPath) -> Self {
        self.embed_path = path;
        self
    }

    /// Returns true if the field lives on an embedded member.
    #[must_use]
    pub fn is_embedded(&self) -> bool {
        !self.embed_path.is_empty()
    }
}

/// Field table for one native type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructBinding {
    type_name: Arc<str>,
    fields: Vec<FieldDescriptor>,
    by_tag: HashMap<String, usize>,
}

impl StructBinding {
    /// Creates an empty table for `type_name`.
    #[must_use]
    pub fn new(type_name: impl Into<Arc<str>>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            by_tag: HashMap::new(),
        }
    }

    /// Adds a field. A repeated tag replaces the earlier descriptor.
    #[must_use]
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        if let Some(&index) = self.by_tag.get(&field.tag) {
            self.fields[index] = field;
        } else {
            self.by_tag.insert(field.tag.clone(), self.fields.len());
            self.fields.push(field);
        }
        self
    }

    /// The native type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Field descriptors in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Looks up a field by tag.
    #[must_use]
    pub fn field(&self, tag: &str) -> Option<&FieldDescriptor> {
        self.by_tag.get(tag).map(|&index| &self.fields[index])
    }
}

/// A native struct that records can be materialized into.
///
/// Fields are addressed by ordinal. Embedded members are exposed through
/// [`embedded`](NativeStruct::embedded) and
/// [`embedded_mut`](NativeStruct::embedded_mut) rather than as values.
pub trait NativeStruct: HostValue {
    /// The registered type name.
    fn type_name(&self) -> &str;

    /// Reads a field.
    ///
    /// # Errors
    ///
    /// Returns an error if `ordinal` is not a readable field.
    fn get_field(&self, ordinal: usize) -> Result<Value>;

    /// Writes a field.
    ///
    /// # Errors
    ///
    /// Returns an error if `ordinal` is not a writable field or the value
    /// cannot be stored in it.
    fn set_field(&mut self, ordinal: usize, value: Value) -> Result<()>;

    /// Embedded member at `ordinal`.
    fn embedded(&self, _ordinal: usize) -> Option<&dyn NativeStruct> {
        None
    }

    /// Mutable embedded member at `ordinal`.
    fn embedded_mut(&mut self, _ordinal: usize) -> Option<&mut dyn NativeStruct> {
        None
    }
}

impl dyn NativeStruct {
    /// Returns the struct as `T`, if that is its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        HostValue::as_any(self).downcast_ref::<T>()
    }
}

/// Allocates native structs of one registered type.
pub struct StructFactory {
    binding: Arc<StructBinding>,
    allocate: fn() -> Box<dyn NativeStruct>,
}

fn allocate_default<T: NativeStruct + Default>() -> Box<dyn NativeStruct> {
    Box::new(T::default())
}

impl StructFactory {
    /// Creates a factory from a field table and an allocator.
    #[must_use]
    pub fn new(binding: StructBinding, allocate: fn() -> Box<dyn NativeStruct>) -> Self {
        Self {
            binding: Arc::new(binding),
            allocate,
        }
    }

    /// Creates a factory that allocates `T::default()`.
    #[must_use]
    pub fn of<T: NativeStruct + Default>(binding: StructBinding) -> Self {
        Self::new(binding, allocate_default::<T>)
    }

    /// The field table.
    #[must_use]
    pub fn binding(&self) -> &Arc<StructBinding> {
        &self.binding
    }

    /// Allocates a fresh struct.
    #[must_use]
    pub fn allocate(&self) -> Box<dyn NativeStruct> {
        (self.allocate)()
    }
}

impl fmt::Debug for StructFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructFactory({})", self.binding.type_name())
    }
}

/// Collects factories during host initialization.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    factories: HashMap<Arc<str>, Arc<StructFactory>>,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under its binding's type name.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateStructType`](crate::ErrorKind::DuplicateStructType)
    /// if the name is already taken.
    pub fn register(&mut self, factory: StructFactory) -> Result<()> {
        let name: Arc<str> = factory.binding().type_name().into();
        if self.factories.contains_key(&name) {
            return Err(Error::duplicate_struct_type(&*name));
        }
        tracing::debug!(
            type_name = &*name,
            fields = factory.binding().fields().len(),
            "registered struct factory"
        );
        self.factories.insert(name, Arc::new(factory));
        Ok(())
    }

    /// Builder-style [`register`](Self::register).
    ///
    /// # Errors
    ///
    /// Same as [`register`](Self::register).
    pub fn with(mut self, factory: StructFactory) -> Result<Self> {
        self.register(factory)?;
        Ok(self)
    }

    /// Ends the registration phase.
    #[must_use]
    pub fn build(self) -> FactoryRegistry {
        FactoryRegistry {
            factories: Arc::new(self.factories),
        }
    }
}

/// Read-only map from type names to struct factories.
///
/// Cloning shares the underlying table.
#[derive(Clone, Debug, Default)]
pub struct FactoryRegistry {
    factories: Arc<HashMap<Arc<str>, Arc<StructFactory>>>,
}

impl FactoryRegistry {
    /// Starts a registration phase.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Looks up the factory for a type name.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownStructType`](crate::ErrorKind::UnknownStructType) if
    /// nothing was registered under `type_name`.
    pub fn get(&self, type_name: &str) -> Result<&Arc<StructFactory>> {
        self.factories
            .get(type_name)
            .ok_or_else(|| Error::unknown_struct_type(type_name))
    }

    /// Returns true if `type_name` is registered.
    #[must_use]
    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    /// Registered type names, sorted.
    #[must_use]
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(AsRef::as_ref).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

fn tag_text(key: &Value) -> Result<&str> {
    match key {
        Value::String(s) => Ok(s),
        Value::Symbol(sym) => Ok(sym.name()),
        other => Err(Error::invalid_tag(other.sexp_string())),
    }
}

fn descend<'a>(root: &'a dyn NativeStruct, path: &EmbedPath) -> Result<&'a dyn NativeStruct> {
    let mut current = root;
    for step in path.steps() {
        current = current
            .embedded(step.child_field)
            .ok_or_else(|| Error::embed_path(path.to_string(), step.child_name.clone()))?;
    }
    Ok(current)
}

fn descend_mut<'a>(
    root: &'a mut dyn NativeStruct,
    path: &EmbedPath,
) -> Result<&'a mut dyn NativeStruct> {
    let mut current = root;
    for step in path.steps() {
        current = current
            .embedded_mut(step.child_field)
            .ok_or_else(|| Error::embed_path(path.to_string(), step.child_name.clone()))?;
    }
    Ok(current)
}

impl Record {
    /// Builds a native struct from this record's entries.
    ///
    /// The factory is looked up by type name. Field descriptors come from the
    /// attached binding when there is one, otherwise from the factory. Each
    /// key (a string or symbol) names a field by tag; embedded fields are
    /// written after walking their embed path.
    ///
    /// # Errors
    ///
    /// Fails for anonymous maps, unregistered types, keys that name no field,
    /// values whose type the field does not accept, and broken embed paths.
    pub fn materialize(&self, registry: &FactoryRegistry) -> Result<Box<dyn NativeStruct>> {
        if self.is_anonymous() {
            return Err(Error::anonymous_binding());
        }
        let factory = registry.get(self.type_name())?;
        let binding = self.binding().unwrap_or_else(|| factory.binding());
        let mut target = factory.allocate();

        for (key, value) in self {
            let tag = tag_text(key)?;
            let Some(field) = binding.field(tag) else {
                tracing::warn!(type_name = self.type_name(), tag, "record key has no native field");
                return Err(Error::unknown_tag(self.type_name(), tag));
            };
            let actual = value.value_type();
            if !field.ty.accepts(&actual) {
                return Err(Error::type_mismatch(field.ty.clone(), actual));
            }
            let holder = descend_mut(&mut *target, &field.embed_path)?;
            holder.set_field(field.ordinal, value.clone())?;
            tracing::trace!(tag, field = %field.name, embed = %field.embed_path, "materialized field");
        }

        Ok(target)
    }

    /// Reads a native struct back into a bound record.
    ///
    /// Keys are symbols named after each field's tag, interned through
    /// `symbols`, in descriptor order. The result carries the factory's
    /// binding.
    ///
    /// # Errors
    ///
    /// Fails for unregistered types, unreadable fields and broken embed paths.
    pub fn dehydrate(
        native: &dyn NativeStruct,
        registry: &FactoryRegistry,
        symbols: &mut dyn SymbolTable,
    ) -> Result<Record> {
        let factory = registry.get(native.type_name())?;
        let binding = factory.binding();
        let config = RecordConfig::default().with_initial_capacity(binding.fields().len());
        let mut record = Record::with_config(binding.type_name(), &config);

        for field in binding.fields() {
            let holder = descend(native, &field.embed_path)?;
            let value = holder.get_field(field.ordinal)?;
            tracing::trace!(tag = %field.tag, field = %field.name, "dehydrated field");
            record.insert(Value::Symbol(symbols.intern(&field.tag)), value);
        }

        record.bind_factory(Arc::clone(binding))?;
        Ok(record)
    }
}
