use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use lazy_static::lazy_static;

/// Broad category of a type's underlying storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Nil,
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    /// Platform-width signed integer (`isize`).
    Int,
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    /// Platform-width unsigned integer (`usize`).
    Uint,
    Float32,
    Float64,
    String,
    Sequence,
    Map,
    Struct,
    Interface,
    Reference,
}

impl Kind {
    pub fn is_signed(self) -> bool {
        matches!(self, Kind::Int8 | Kind::Int16 | Kind::Int32 | Kind::Int64 | Kind::Int)
    }

    pub fn is_unsigned(self) -> bool {
        matches!(self, Kind::Uint8 | Kind::Uint16 | Kind::Uint32 | Kind::Uint64 | Kind::Uint)
    }

    pub fn is_float(self) -> bool {
        matches!(self, Kind::Float32 | Kind::Float64)
    }

    pub fn is_numeric(self) -> bool {
        self.is_signed() || self.is_unsigned() || self.is_float()
    }

    /// Storage width in bits for numeric kinds.
    pub fn bits(self) -> Option<u32> {
        match self {
            Kind::Int8 | Kind::Uint8 => Some(8),
            Kind::Int16 | Kind::Uint16 => Some(16),
            Kind::Int32 | Kind::Uint32 | Kind::Float32 => Some(32),
            Kind::Int64 | Kind::Uint64 | Kind::Float64 | Kind::Int | Kind::Uint => Some(64),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
struct TypeInfo {
    name: String,
    kind: Kind,
    elem: Option<TypeDescriptor>,
    key: Option<TypeDescriptor>,
    methods: BTreeSet<String>,
}

/// Runtime identity of a declared type.
///
/// Two descriptors denote the same type when they agree on the declared name
/// and the representation: kind, element and key types, and for interfaces the
/// required methods. An alias created with [`TypeDescriptor::named`] is a
/// different type from its underlying type even though both share the same
/// [`Kind`], and a struct declared as `"String"` is not the builtin `String`.
#[derive(Clone)]
pub struct TypeDescriptor(Arc<TypeInfo>);

lazy_static! {
    static ref NIL: TypeDescriptor = TypeDescriptor::scalar("nil", Kind::Nil);
    static ref BOOL: TypeDescriptor = TypeDescriptor::scalar("bool", Kind::Bool);
    static ref I8: TypeDescriptor = TypeDescriptor::scalar("i8", Kind::Int8);
    static ref I16: TypeDescriptor = TypeDescriptor::scalar("i16", Kind::Int16);
    static ref I32: TypeDescriptor = TypeDescriptor::scalar("i32", Kind::Int32);
    static ref I64: TypeDescriptor = TypeDescriptor::scalar("i64", Kind::Int64);
    static ref ISIZE: TypeDescriptor = TypeDescriptor::scalar("isize", Kind::Int);
    static ref U8: TypeDescriptor = TypeDescriptor::scalar("u8", Kind::Uint8);
    static ref U16: TypeDescriptor = TypeDescriptor::scalar("u16", Kind::Uint16);
    static ref U32: TypeDescriptor = TypeDescriptor::scalar("u32", Kind::Uint32);
    static ref U64: TypeDescriptor = TypeDescriptor::scalar("u64", Kind::Uint64);
    static ref USIZE: TypeDescriptor = TypeDescriptor::scalar("usize", Kind::Uint);
    static ref F32: TypeDescriptor = TypeDescriptor::scalar("f32", Kind::Float32);
    static ref F64: TypeDescriptor = TypeDescriptor::scalar("f64", Kind::Float64);
    static ref STRING: TypeDescriptor = TypeDescriptor::scalar("String", Kind::String);
    static ref ANY: TypeDescriptor = TypeDescriptor::interface("any", &[]);
}

impl TypeDescriptor {
    fn scalar(name: &str, kind: Kind) -> Self {
        Self(Arc::new(TypeInfo {
            name: name.to_string(),
            kind,
            elem: None,
            key: None,
            methods: BTreeSet::new(),
        }))
    }

    pub fn nil() -> Self { NIL.clone() }
    pub fn bool() -> Self { BOOL.clone() }
    pub fn i8() -> Self { I8.clone() }
    pub fn i16() -> Self { I16.clone() }
    pub fn i32() -> Self { I32.clone() }
    pub fn i64() -> Self { I64.clone() }
    pub fn isize() -> Self { ISIZE.clone() }
    pub fn u8() -> Self { U8.clone() }
    pub fn u16() -> Self { U16.clone() }
    pub fn u32() -> Self { U32.clone() }
    pub fn u64() -> Self { U64.clone() }
    pub fn usize() -> Self { USIZE.clone() }
    pub fn f32() -> Self { F32.clone() }
    pub fn f64() -> Self { F64.clone() }
    pub fn string() -> Self { STRING.clone() }

    /// The empty interface, satisfied by every type.
    pub fn any() -> Self { ANY.clone() }

    /// Declare a new named type sharing the representation of `underlying`.
    ///
    /// Element and key types carry over. Methods do not, except when the
    /// underlying type is an interface, where the method set is the interface.
    pub fn named(name: &str, underlying: &TypeDescriptor) -> Self {
        let methods = if underlying.kind() == Kind::Interface {
            underlying.0.methods.clone()
        } else {
            BTreeSet::new()
        };
        Self(Arc::new(TypeInfo {
            name: name.to_string(),
            kind: underlying.kind(),
            elem: underlying.0.elem.clone(),
            key: underlying.0.key.clone(),
            methods,
        }))
    }

    /// Declare a struct-like type. Values of it are carried as objects.
    pub fn structure(name: &str) -> Self {
        Self::scalar(name, Kind::Struct)
    }

    /// Declare a capability contract listing the methods a type must declare.
    pub fn interface(name: &str, methods: &[&str]) -> Self {
        Self(Arc::new(TypeInfo {
            name: name.to_string(),
            kind: Kind::Interface,
            elem: None,
            key: None,
            methods: methods.iter().map(|m| m.to_string()).collect(),
        }))
    }

    pub fn sequence(elem: &TypeDescriptor) -> Self {
        Self(Arc::new(TypeInfo {
            name: format!("Vec<{}>", elem.name()),
            kind: Kind::Sequence,
            elem: Some(elem.clone()),
            key: None,
            methods: BTreeSet::new(),
        }))
    }

    pub fn map(key: &TypeDescriptor, value: &TypeDescriptor) -> Self {
        Self(Arc::new(TypeInfo {
            name: format!("HashMap<{}, {}>", key.name(), value.name()),
            kind: Kind::Map,
            elem: Some(value.clone()),
            key: Some(key.clone()),
            methods: BTreeSet::new(),
        }))
    }

    pub fn reference(elem: &TypeDescriptor) -> Self {
        Self(Arc::new(TypeInfo {
            name: format!("&mut {}", elem.name()),
            kind: Kind::Reference,
            elem: Some(elem.clone()),
            key: None,
            methods: BTreeSet::new(),
        }))
    }

    /// Add methods to the declared method set.
    pub fn with_methods(mut self, methods: &[&str]) -> Self {
        let info = Arc::make_mut(&mut self.0);
        info.methods.extend(methods.iter().map(|m| m.to_string()));
        self
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn kind(&self) -> Kind {
        self.0.kind
    }

    /// Element type of a sequence or reference, value type of a map.
    pub fn elem(&self) -> Option<&TypeDescriptor> {
        self.0.elem.as_ref()
    }

    /// Key type of a map.
    pub fn key(&self) -> Option<&TypeDescriptor> {
        self.0.key.as_ref()
    }

    pub fn methods(&self) -> impl Iterator<Item = &str> {
        self.0.methods.iter().map(String::as_str)
    }

    pub fn has_method(&self, method: &str) -> bool {
        self.0.methods.contains(method)
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == Kind::Interface
    }

    /// True when this type declares every method `interface` requires.
    pub fn satisfies(&self, interface: &TypeDescriptor) -> bool {
        interface.is_interface() && interface.0.methods.is_subset(&self.0.methods)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.0, &other.0) {
            return true;
        }
        let (a, b) = (&*self.0, &*other.0);
        a.name == b.name
            && a.kind == b.kind
            && a.elem == b.elem
            && a.key == b.key
            && (a.kind != Kind::Interface || a.methods == b.methods)
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.name.hash(state);
        self.0.kind.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.0.name, self.0.kind)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_descriptors() {
        assert_eq!(TypeDescriptor::i32().name(), "i32");
        assert_eq!(TypeDescriptor::i32().kind(), Kind::Int32);
        assert_eq!(TypeDescriptor::i32(), TypeDescriptor::i32());
        assert_ne!(TypeDescriptor::i32(), TypeDescriptor::i64());
    }

    #[test]
    fn test_alias_is_distinct() {
        let alias = TypeDescriptor::named("StringAlias", &TypeDescriptor::string());
        assert_eq!(alias.kind(), Kind::String);
        assert_ne!(alias, TypeDescriptor::string());
        assert_eq!(alias, TypeDescriptor::named("StringAlias", &TypeDescriptor::string()));
    }

    #[test]
    fn test_same_name_different_representation() {
        let text_id = TypeDescriptor::named("Id", &TypeDescriptor::string());
        let numeric_id = TypeDescriptor::named("Id", &TypeDescriptor::i64());
        assert_ne!(text_id, numeric_id);

        assert_ne!(TypeDescriptor::structure("String"), TypeDescriptor::string());
        assert_ne!(TypeDescriptor::named("i32", &TypeDescriptor::string()), TypeDescriptor::i32());

        let narrow = TypeDescriptor::interface("Shape", &["area"]);
        let wide = TypeDescriptor::interface("Shape", &["area", "perimeter"]);
        assert_ne!(narrow, wide);

        let point = TypeDescriptor::structure("Point");
        assert_eq!(point.clone().with_methods(&["render"]), point);
    }

    #[test]
    fn test_composite_names() {
        let map = TypeDescriptor::map(&TypeDescriptor::string(), &TypeDescriptor::sequence(&TypeDescriptor::u8()));
        assert_eq!(map.to_string(), "HashMap<String, Vec<u8>>");
        assert_eq!(map.key(), Some(&TypeDescriptor::string()));
        assert_eq!(map.elem().map(|e| e.kind()), Some(Kind::Sequence));
        assert_eq!(TypeDescriptor::reference(&TypeDescriptor::f64()).to_string(), "&mut f64");
    }

    #[test]
    fn test_satisfies() {
        let renderable = TypeDescriptor::interface("Renderable", &["render"]);
        let point = TypeDescriptor::structure("Point").with_methods(&["render", "convert_to"]);
        let plain = TypeDescriptor::structure("Plain");

        assert!(point.satisfies(&renderable));
        assert!(!plain.satisfies(&renderable));
        assert!(plain.satisfies(&TypeDescriptor::any()));
        assert!(!point.satisfies(&plain));
    }

    #[test]
    fn test_kind_widths() {
        assert_eq!(Kind::Int8.bits(), Some(8));
        assert_eq!(Kind::Uint.bits(), Some(64));
        assert_eq!(Kind::Float32.bits(), Some(32));
        assert_eq!(Kind::String.bits(), None);
        assert!(Kind::Float64.is_numeric());
        assert!(!Kind::Bool.is_numeric());
    }
}
