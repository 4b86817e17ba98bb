//! Integration tests for struct binding
//!
//! Tests factory registration, materializing records into native structs,
//! and reading native structs back into bound records.

use quill_foundation::{
    EmbedPath, Error, ErrorKind, FactoryRegistry, FieldDescriptor, Interner, NativeStruct,
    Record, Result, Sexp, StructBinding, StructFactory, SymbolTable, Type, Value,
};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Origin {
    x: f64,
    y: f64,
}

impl NativeStruct for Origin {
    fn type_name(&self) -> &str {
        "Origin"
    }

    fn get_field(&self, ordinal: usize) -> Result<Value> {
        match ordinal {
            0 => Ok(Value::Float(self.x)),
            1 => Ok(Value::Float(self.y)),
            _ => Err(Error::field_access("Origin", ordinal)),
        }
    }

    fn set_field(&mut self, ordinal: usize, value: Value) -> Result<()> {
        let x = value
            .as_float()
            .ok_or_else(|| Error::type_mismatch(Type::Float, value.value_type()))?;
        match ordinal {
            0 => self.x = x,
            1 => self.y = x,
            _ => return Err(Error::field_access("Origin", ordinal)),
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Shape {
    label: String,
    sides: i64,
    origin: Origin,
}

impl NativeStruct for Shape {
    fn type_name(&self) -> &str {
        "Shape"
    }

    fn get_field(&self, ordinal: usize) -> Result<Value> {
        match ordinal {
            0 => Ok(Value::from(self.label.as_str())),
            1 => Ok(Value::Int(self.sides)),
            _ => Err(Error::field_access("Shape", ordinal)),
        }
    }

    fn set_field(&mut self, ordinal: usize, value: Value) -> Result<()> {
        match (ordinal, &value) {
            (0, Value::String(s)) => self.label = s.to_string(),
            (1, Value::Int(n)) => self.sides = *n,
            _ => return Err(Error::field_access("Shape", ordinal)),
        }
        Ok(())
    }

    fn embedded(&self, ordinal: usize) -> Option<&dyn NativeStruct> {
        (ordinal == 2).then_some(&self.origin as &dyn NativeStruct)
    }

    fn embedded_mut(&mut self, ordinal: usize) -> Option<&mut dyn NativeStruct> {
        (ordinal == 2).then_some(&mut self.origin as &mut dyn NativeStruct)
    }
}

fn shape_binding() -> StructBinding {
    let via_origin = || EmbedPath::direct().then("Origin", 2);
    StructBinding::new("Shape")
        .with_field(FieldDescriptor::new("label", "Label", 0, Type::String))
        .with_field(FieldDescriptor::new("sides", "Sides", 1, Type::Int))
        .with_field(FieldDescriptor::new("x", "X", 0, Type::Float).embedded_via(via_origin()))
        .with_field(FieldDescriptor::new("y", "Y", 1, Type::Float).embedded_via(via_origin()))
}

fn registry() -> FactoryRegistry {
    FactoryRegistry::builder()
        .with(StructFactory::of::<Shape>(shape_binding()))
        .unwrap()
        .build()
}

fn square() -> Record {
    let mut rec = Record::named("Shape");
    rec.insert(Value::from("label"), Value::from("square"));
    rec.insert(Value::from("sides"), Value::Int(4));
    rec.insert(Value::from("x"), Value::Float(1.0));
    rec.insert(Value::from("y"), Value::Float(-2.5));
    rec
}

#[test]
fn materialize_fills_direct_and_embedded_fields() {
    let native = square().materialize(&registry()).unwrap();
    let shape = native.downcast_ref::<Shape>().unwrap();
    assert_eq!(shape.label, "square");
    assert_eq!(shape.sides, 4);
    assert!((shape.origin.x - 1.0).abs() < f64::EPSILON);
    assert!((shape.origin.y + 2.5).abs() < f64::EPSILON);
}

#[test]
fn materialize_accepts_symbol_keys() {
    let mut symbols = Interner::new();
    let mut rec = Record::named("Shape");
    rec.insert(Value::Symbol(symbols.intern("sides")), Value::Int(3));
    let native = rec.materialize(&registry()).unwrap();
    assert_eq!(native.downcast_ref::<Shape>().unwrap().sides, 3);
}

#[test]
fn unregistered_types_fail() {
    let rec = Record::named("Circle");
    let err = rec.materialize(&registry()).unwrap_err();
    assert_eq!(err.kind, ErrorKind::UnknownStructType("Circle".to_string()));
}

#[test]
fn non_text_keys_cannot_name_fields() {
    let mut rec = Record::named("Shape");
    rec.insert(Value::Int(0), Value::from("zero"));
    let err = rec.materialize(&registry()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::InvalidTag(_)));
}

#[test]
fn mistyped_values_are_rejected() {
    let mut rec = Record::named("Shape");
    rec.insert(Value::from("x"), Value::Int(1));
    let err = rec.materialize(&registry()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
}

#[test]
fn end_and_marker_do_not_fill_optional_fields() {
    let binding = StructBinding::new("Shape")
        .with_field(FieldDescriptor::new("label", "Label", 0, Type::option(Type::String)));
    for sentinel in [Value::END, Value::MARKER] {
        let mut rec = Record::named("Shape");
        rec.insert(Value::from("label"), sentinel);
        rec.bind_factory(Arc::new(binding.clone())).unwrap();
        let err = rec.materialize(&registry()).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    }
}

#[test]
fn dehydrate_round_trips_through_text() {
    let shape = Shape {
        label: "tri".to_string(),
        sides: 3,
        origin: Origin { x: 0.5, y: 2.0 },
    };
    let mut symbols = Interner::new();
    let rec = Record::dehydrate(&shape, &registry(), &mut symbols).unwrap();
    assert_eq!(rec.sexp_string(), " (Shape label:\"tri\" sides:3 x:0.5 y:2)");
    assert_eq!(symbols.len(), 4);
}

#[test]
fn bound_binding_overrides_factory_binding() {
    let narrow = StructBinding::new("Shape")
        .with_field(FieldDescriptor::new("n", "Sides", 1, Type::Int));
    let mut rec = Record::named("Shape");
    rec.insert(Value::from("n"), Value::Int(8));
    rec.bind_factory(Arc::new(narrow)).unwrap();

    let native = rec.materialize(&registry()).unwrap();
    assert_eq!(native.downcast_ref::<Shape>().unwrap().sides, 8);
}

#[test]
fn registry_reports_its_types() {
    let registry = registry();
    assert_eq!(registry.len(), 1);
    assert!(registry.contains("Shape"));
    assert!(!registry.contains("Origin"));
    let factory = registry.get("Shape").unwrap();
    assert_eq!(factory.binding().fields().len(), 4);
    assert_eq!(factory.allocate().type_name(), "Shape");
}
