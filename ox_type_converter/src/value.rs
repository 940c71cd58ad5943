//! Dynamically typed values
//!
//! A [`Value`] pairs a [`TypeDescriptor`] with its [`Data`]. Struct-like values
//! wrap an [`Object`], which is where the optional conversion capabilities live.

use std::any::Any;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem;
use std::sync::{Arc, Mutex, PoisonError};

use crate::converters::numeric_conversions::normalize;
use crate::registry::ConverterResult;
use crate::value_type::{Kind, TypeDescriptor};

/// Self-describing capability: the value supplies its own outgoing conversions.
pub trait ConvertTo {
    /// Return `Ok(None)` when no conversion to `target` is known.
    fn convert_to(&self, target: &TypeDescriptor) -> ConverterResult;
}

/// Render-as-text capability, used when converting to string-like targets.
pub trait RenderText {
    fn render_text(&self) -> String;
}

/// A struct-like payload carried inside a [`Value`].
///
/// Capabilities are discovered through the `as_*` casts, which default to
/// `None`. Implementors opt in by returning `Some(self)`.
pub trait Object: Any + fmt::Debug + Send + Sync {
    fn type_descriptor(&self) -> TypeDescriptor;

    fn as_any(&self) -> &dyn Any;

    fn eq_object(&self, _other: &dyn Object) -> bool {
        false
    }

    fn as_convert_to(&self) -> Option<&dyn ConvertTo> {
        None
    }

    fn as_render(&self) -> Option<&dyn RenderText> {
        None
    }
}

/// Payload of a [`Value`].
#[derive(Clone, Debug)]
pub enum Data {
    Nil,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    Seq(Vec<Value>),
    /// Entries in insertion order, keys unique.
    Map(Vec<(Value, Value)>),
    Object(Arc<dyn Object>),
    Ref(Arc<Mutex<Value>>),
}

impl PartialEq for Data {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Data::Nil, Data::Nil) => true,
            (Data::Bool(a), Data::Bool(b)) => a == b,
            (Data::Int(a), Data::Int(b)) => a == b,
            (Data::Uint(a), Data::Uint(b)) => a == b,
            (Data::Float(a), Data::Float(b)) => a == b,
            (Data::Str(a), Data::Str(b)) => a == b,
            (Data::Seq(a), Data::Seq(b)) => a == b,
            (Data::Map(a), Data::Map(b)) => entries_equal(a, b),
            (Data::Object(a), Data::Object(b)) => Arc::ptr_eq(a, b) || a.eq_object(b.as_ref()),
            (Data::Ref(a), Data::Ref(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

fn find_entry<'a>(entries: &'a [(Value, Value)], key: &Value) -> Option<&'a (Value, Value)> {
    entries.iter().find(|(k, _)| k == key)
}

/// Order-insensitive comparison of map entries.
fn entries_equal(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut index: HashMap<u64, Vec<&(Value, Value)>> = HashMap::with_capacity(b.len());
    for entry in b {
        index.entry(key_hash(&entry.0)).or_default().push(entry);
    }
    a.iter().all(|(key, value)| {
        index
            .get(&key_hash(key))
            .is_some_and(|bucket| bucket.iter().any(|(k, v)| k == key && v == value))
    })
}

/// Hash of a map key, consistent with `Value` equality.
fn key_hash(key: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    hash_value(key, &mut hasher);
    hasher.finish()
}

fn hash_value<H: Hasher>(value: &Value, state: &mut H) {
    value.ty.hash(state);
    mem::discriminant(&value.data).hash(state);
    match &value.data {
        Data::Nil | Data::Object(_) => {}
        Data::Bool(b) => b.hash(state),
        Data::Int(i) => i.hash(state),
        Data::Uint(u) => u.hash(state),
        // 0.0 == -0.0
        Data::Float(f) => (if *f == 0.0 { 0.0f64 } else { *f }).to_bits().hash(state),
        Data::Str(s) => s.hash(state),
        Data::Seq(items) => {
            items.len().hash(state);
            for item in items {
                hash_value(item, state);
            }
        }
        Data::Map(entries) => entries.len().hash(state),
        Data::Ref(slot) => (Arc::as_ptr(slot) as usize).hash(state),
    }
}

/// Map entries under construction. Keys are indexed by hash so each insert
/// costs the same however large the map grows; insertion order is kept.
pub(crate) struct EntryBuilder {
    entries: Vec<(Value, Value)>,
    index: HashMap<u64, Vec<usize>>,
}

impl EntryBuilder {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        EntryBuilder {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Insert, replacing the value of an existing equal key.
    pub(crate) fn insert(&mut self, key: Value, value: Value) {
        let hash = key_hash(&key);
        let existing = self
            .index
            .get(&hash)
            .and_then(|bucket| bucket.iter().copied().find(|&i| self.entries[i].0 == key));
        match existing {
            Some(i) => self.entries[i].1 = value,
            None => {
                self.index.entry(hash).or_default().push(self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub(crate) fn into_entries(self) -> Vec<(Value, Value)> {
        self.entries
    }
}

fn payload_fits(kind: Kind, data: &Data) -> bool {
    match data {
        Data::Nil => true,
        Data::Bool(_) => kind == Kind::Bool,
        Data::Int(_) => kind.is_signed(),
        Data::Uint(_) => kind.is_unsigned(),
        Data::Float(_) => kind.is_float(),
        Data::Str(_) => kind == Kind::String,
        Data::Seq(_) => kind == Kind::Sequence,
        Data::Map(_) => kind == Kind::Map,
        Data::Object(_) => kind == Kind::Struct,
        Data::Ref(_) => kind == Kind::Reference,
    }
}

/// A value together with its exact runtime type.
#[derive(Clone, Debug, PartialEq)]
pub struct Value {
    ty: TypeDescriptor,
    data: Data,
}

impl Value {
    /// Build a value of type `ty`. Numeric payloads are normalized to the
    /// width of the type's kind.
    ///
    /// The payload must match the kind: `Data::Int` for signed kinds,
    /// `Data::Str` for string kinds and so on. `Data::Nil` fits every type.
    /// Debug builds panic on a mismatch.
    pub fn typed(ty: &TypeDescriptor, data: Data) -> Self {
        debug_assert!(
            payload_fits(ty.kind(), &data),
            "payload {:?} does not fit {:?}",
            data,
            ty
        );
        Value {
            data: normalize(data, ty.kind()),
            ty: ty.clone(),
        }
    }

    pub fn nil() -> Self {
        Value {
            ty: TypeDescriptor::nil(),
            data: Data::Nil,
        }
    }

    /// A sequence of `elem` typed items.
    pub fn sequence(elem: &TypeDescriptor, items: Vec<Value>) -> Self {
        Value {
            ty: TypeDescriptor::sequence(elem),
            data: Data::Seq(items),
        }
    }

    /// A `Vec<any>` holding heterogeneous items.
    pub fn list(items: Vec<Value>) -> Self {
        Self::sequence(&TypeDescriptor::any(), items)
    }

    /// A mapping; later entries win over earlier ones with an equal key.
    pub fn mapping<I>(key: &TypeDescriptor, value: &TypeDescriptor, entries: I) -> Self
    where
        I: IntoIterator<Item = (Value, Value)>,
    {
        let entries = entries.into_iter();
        let mut builder = EntryBuilder::with_capacity(entries.size_hint().0);
        for (k, v) in entries {
            builder.insert(k, v);
        }
        Value {
            ty: TypeDescriptor::map(key, value),
            data: Data::Map(builder.into_entries()),
        }
    }

    /// A `HashMap<String, any>`, the usual shape of decoded untyped records.
    pub fn record<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        Self::mapping(
            &TypeDescriptor::string(),
            &TypeDescriptor::any(),
            entries.into_iter().map(|(k, v)| {
                let key: String = k.into();
                (Value::from(key), v)
            }),
        )
    }

    pub fn object<O: Object>(object: O) -> Self {
        Value {
            ty: object.type_descriptor(),
            data: Data::Object(Arc::new(object)),
        }
    }

    /// A mutable reference whose referent starts out as `initial`.
    pub fn reference(initial: Value) -> Self {
        Value {
            ty: TypeDescriptor::reference(&initial.ty),
            data: Data::Ref(Arc::new(Mutex::new(initial))),
        }
    }

    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn kind(&self) -> Kind {
        self.ty.kind()
    }

    pub fn data(&self) -> &Data {
        &self.data
    }

    pub fn into_data(self) -> Data {
        self.data
    }

    pub fn is_nil(&self) -> bool {
        matches!(self.data, Data::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.data {
            Data::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self.data {
            Data::Int(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self.data {
            Data::Uint(u) => Some(u),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.data {
            Data::Float(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match &self.data {
            Data::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_slice(&self) -> Option<&[Value]> {
        match &self.data {
            Data::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_entries(&self) -> Option<&[(Value, Value)]> {
        match &self.data {
            Data::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Look up a map entry by key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_entries()
            .and_then(|entries| find_entry(entries, key))
            .map(|(_, v)| v)
    }

    pub fn as_object(&self) -> Option<&dyn Object> {
        match &self.data {
            Data::Object(object) => Some(object.as_ref()),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_object().and_then(|object| object.as_any().downcast_ref::<T>())
    }

    /// Snapshot of the referent when this value is a reference.
    pub fn load(&self) -> Option<Value> {
        match &self.data {
            Data::Ref(slot) => Some(slot.lock().unwrap_or_else(PoisonError::into_inner).clone()),
            _ => None,
        }
    }

    /// Map untyped JSON onto dynamic values.
    ///
    /// Arrays become `Vec<any>` and objects `HashMap<String, any>`. Integers
    /// that fit keep an integer type, everything else is `f64`.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::nil(),
            serde_json::Value::Bool(b) => Value::from(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    Value::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::list(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                Value::record(map.into_iter().map(|(k, v)| (k, Value::from_json(v))))
            }
        }
    }
}

macro_rules! value_from_primitive {
    ($($ty:ty => $descriptor:ident, $variant:ident, $cast:ty;)*) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Value::typed(&TypeDescriptor::$descriptor(), Data::$variant(v as $cast))
                }
            }
        )*
    };
}

value_from_primitive! {
    i8 => i8, Int, i64;
    i16 => i16, Int, i64;
    i32 => i32, Int, i64;
    i64 => i64, Int, i64;
    isize => isize, Int, i64;
    u8 => u8, Uint, u64;
    u16 => u16, Uint, u64;
    u32 => u32, Uint, u64;
    u64 => u64, Uint, u64;
    usize => usize, Uint, u64;
    f32 => f32, Float, f64;
    f64 => f64, Float, f64;
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::typed(&TypeDescriptor::bool(), Data::Bool(b))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::typed(&TypeDescriptor::string(), Data::Str(s))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::from(s.to_string())
    }
}

/// Bytes become a `Vec<u8>`.
impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::sequence(&TypeDescriptor::u8(), bytes.into_iter().map(Value::from).collect())
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::list(items)
    }
}
