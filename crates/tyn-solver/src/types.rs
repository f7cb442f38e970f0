//! Type representation.
//!
//! Types are interned into `TypeId` handles by `TypeInterner`. The structural
//! data behind a handle is a `TypeData`; compound payloads (member lists,
//! object and function shapes) are interned separately and referenced by id.

use bitflags::bitflags;
use serde::Serialize;
use std::hash::{Hash, Hasher};
use tyn_common::Atom;

/// Interned type handle. Equality of handles is structural equality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TypeId(pub u32);

impl TypeId {
    pub const NONE: TypeId = TypeId(0);
    pub const ERROR: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const UNKNOWN: TypeId = TypeId(3);
    pub const ANY: TypeId = TypeId(4);
    pub const VOID: TypeId = TypeId(5);
    pub const UNDEFINED: TypeId = TypeId(6);
    pub const NULL: TypeId = TypeId(7);
    pub const BOOLEAN: TypeId = TypeId(8);
    pub const NUMBER: TypeId = TypeId(9);
    pub const STRING: TypeId = TypeId(10);
    pub const BIGINT: TypeId = TypeId(11);
    pub const SYMBOL: TypeId = TypeId(12);
    pub const OBJECT: TypeId = TypeId(13);

    /// First id handed out for non-intrinsic types.
    pub const FIRST_USER: u32 = 100;

    #[inline]
    pub fn is_intrinsic(self) -> bool {
        self.0 >= TypeId::NEVER.0 && self.0 < TypeId::FIRST_USER
    }

    #[inline]
    pub fn is_error(self) -> bool {
        self == TypeId::ERROR
    }

    /// `any` and `unknown`: types that admit every value.
    #[inline]
    pub fn is_any_or_unknown(self) -> bool {
        self == TypeId::ANY || self == TypeId::UNKNOWN
    }

    #[inline]
    pub fn is_nullish(self) -> bool {
        matches!(self, TypeId::NULL | TypeId::UNDEFINED | TypeId::VOID)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Never,
    Unknown,
    Any,
    Void,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Bigint,
    Symbol,
    Object,
}

impl IntrinsicKind {
    pub fn to_type_id(self) -> TypeId {
        match self {
            IntrinsicKind::Never => TypeId::NEVER,
            IntrinsicKind::Unknown => TypeId::UNKNOWN,
            IntrinsicKind::Any => TypeId::ANY,
            IntrinsicKind::Void => TypeId::VOID,
            IntrinsicKind::Undefined => TypeId::UNDEFINED,
            IntrinsicKind::Null => TypeId::NULL,
            IntrinsicKind::Boolean => TypeId::BOOLEAN,
            IntrinsicKind::Number => TypeId::NUMBER,
            IntrinsicKind::String => TypeId::STRING,
            IntrinsicKind::Bigint => TypeId::BIGINT,
            IntrinsicKind::Symbol => TypeId::SYMBOL,
            IntrinsicKind::Object => TypeId::OBJECT,
        }
    }

    pub fn from_type_id(id: TypeId) -> Option<IntrinsicKind> {
        Some(match id {
            TypeId::NEVER => IntrinsicKind::Never,
            TypeId::UNKNOWN => IntrinsicKind::Unknown,
            TypeId::ANY => IntrinsicKind::Any,
            TypeId::VOID => IntrinsicKind::Void,
            TypeId::UNDEFINED => IntrinsicKind::Undefined,
            TypeId::NULL => IntrinsicKind::Null,
            TypeId::BOOLEAN => IntrinsicKind::Boolean,
            TypeId::NUMBER => IntrinsicKind::Number,
            TypeId::STRING => IntrinsicKind::String,
            TypeId::BIGINT => IntrinsicKind::Bigint,
            TypeId::SYMBOL => IntrinsicKind::Symbol,
            TypeId::OBJECT => IntrinsicKind::Object,
            _ => return None,
        })
    }

    pub fn as_str(self) -> &'static str {
        match self {
            IntrinsicKind::Never => "never",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Any => "any",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Number => "number",
            IntrinsicKind::String => "string",
            IntrinsicKind::Bigint => "bigint",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::Object => "object",
        }
    }
}

/// Runtime type tag, as observed by `typeof` (plus `null` and `never`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeTag {
    Null,
    Undefined,
    Boolean,
    Number,
    String,
    BigInt,
    Symbol,
    Object,
    Function,
    Never,
}

impl TypeTag {
    /// Parse a `typeof` result string. `"null"` is accepted for the null tag.
    pub fn from_typeof(s: &str) -> Option<TypeTag> {
        Some(match s {
            "null" => TypeTag::Null,
            "undefined" => TypeTag::Undefined,
            "boolean" => TypeTag::Boolean,
            "number" => TypeTag::Number,
            "string" => TypeTag::String,
            "bigint" => TypeTag::BigInt,
            "symbol" => TypeTag::Symbol,
            "object" => TypeTag::Object,
            "function" => TypeTag::Function,
            _ => return None,
        })
    }

    /// The `typeof` string; `never` has none.
    pub fn as_typeof_str(self) -> Option<&'static str> {
        Some(match self {
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
            TypeTag::Boolean => "boolean",
            TypeTag::Number => "number",
            TypeTag::String => "string",
            TypeTag::BigInt => "bigint",
            TypeTag::Symbol => "symbol",
            TypeTag::Object => "object",
            TypeTag::Function => "function",
            TypeTag::Never => return None,
        })
    }
}

/// A float with total equality and hashing, for literal interning.
#[derive(Clone, Copy, Debug)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits() || (self.0 == 0.0 && other.0 == 0.0)
    }
}

impl Eq for OrderedFloat {}

impl Hash for OrderedFloat {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // +0 and -0 compare equal and must hash equal.
        if self.0 == 0.0 {
            0u64.hash(state);
        } else {
            self.0.to_bits().hash(state);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(Atom),
    Number(OrderedFloat),
    /// Decimal digits, `-` prefixed when negative.
    BigInt(Atom),
    Boolean(bool),
}

impl LiteralValue {
    pub fn tag(&self) -> TypeTag {
        match self {
            LiteralValue::String(_) => TypeTag::String,
            LiteralValue::Number(_) => TypeTag::Number,
            LiteralValue::BigInt(_) => TypeTag::BigInt,
            LiteralValue::Boolean(_) => TypeTag::Boolean,
        }
    }

    /// The primitive this literal widens to.
    pub fn primitive(&self) -> TypeId {
        match self {
            LiteralValue::String(_) => TypeId::STRING,
            LiteralValue::Number(_) => TypeId::NUMBER,
            LiteralValue::BigInt(_) => TypeId::BIGINT,
            LiteralValue::Boolean(_) => TypeId::BOOLEAN,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TupleListId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

/// A named declaration whose structure is bound after its body is lowered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DefId(pub u32);

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PropertyFlags: u8 {
        const OPTIONAL = 1 << 0;
        const READONLY = 1 << 1;
        const METHOD = 1 << 2;
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    pub type_id: TypeId,
    pub flags: PropertyFlags,
}

impl PropertyInfo {
    pub fn new(name: Atom, type_id: TypeId) -> Self {
        PropertyInfo {
            name,
            type_id,
            flags: PropertyFlags::empty(),
        }
    }

    pub fn optional(name: Atom, type_id: TypeId) -> Self {
        PropertyInfo {
            name,
            type_id,
            flags: PropertyFlags::OPTIONAL,
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: PropertyFlags) -> Self {
        self.flags |= flags;
        self
    }

    #[inline]
    pub fn is_optional(&self) -> bool {
        self.flags.contains(PropertyFlags::OPTIONAL)
    }

    #[inline]
    pub fn is_readonly(&self) -> bool {
        self.flags.contains(PropertyFlags::READONLY)
    }

    #[inline]
    pub fn is_method(&self) -> bool {
        self.flags.contains(PropertyFlags::METHOD)
    }
}

/// Properties in declaration order, plus the declared name.
///
/// `name` is the interface or class the shape was declared as, used for
/// display. `nominal` marks class instance types: their name is the runtime
/// tag `instanceof` tests.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
    pub name: Option<Atom>,
    pub nominal: bool,
}

impl ObjectShape {
    pub fn anonymous(properties: Vec<PropertyInfo>) -> Self {
        ObjectShape {
            properties,
            name: None,
            nominal: false,
        }
    }

    pub fn property(&self, name: Atom) -> Option<&PropertyInfo> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// The runtime class tag, if this is a class instance type.
    pub fn class_name(&self) -> Option<Atom> {
        if self.nominal { self.name } else { None }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParamInfo {
    pub name: Option<Atom>,
    pub type_id: TypeId,
    pub optional: bool,
    pub rest: bool,
}

impl ParamInfo {
    pub fn required(name: Atom, type_id: TypeId) -> Self {
        ParamInfo {
            name: Some(name),
            type_id,
            optional: false,
            rest: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeParamInfo {
    pub name: Atom,
    pub constraint: Option<TypeId>,
}

/// `x is T`, `asserts x is T` or `asserts x`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypePredicate {
    pub asserts: bool,
    pub parameter: Atom,
    pub type_id: Option<TypeId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShape {
    pub type_params: Vec<TypeParamInfo>,
    pub params: Vec<ParamInfo>,
    /// Explicit `this` parameter type.
    pub this_type: Option<TypeId>,
    pub return_type: TypeId,
    pub type_predicate: Option<TypePredicate>,
    pub is_constructor: bool,
}

impl FunctionShape {
    pub fn new(params: Vec<ParamInfo>, return_type: TypeId) -> Self {
        FunctionShape {
            type_params: Vec::new(),
            params,
            this_type: None,
            return_type,
            type_predicate: None,
            is_constructor: false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TupleElement {
    pub type_id: TypeId,
    pub name: Option<Atom>,
    pub optional: bool,
    pub rest: bool,
}

impl TupleElement {
    pub fn new(type_id: TypeId) -> Self {
        TupleElement {
            type_id,
            name: None,
            optional: false,
            rest: false,
        }
    }
}

/// Structural data of an interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    /// Flattened, deduplicated, canonically ordered members.
    Union(TypeListId),
    /// Intersections that do not reduce to a single shape.
    Intersection(TypeListId),
    Object(ObjectShapeId),
    Function(FunctionShapeId),
    Array(TypeId),
    ReadonlyArray(TypeId),
    Tuple { elements: TupleListId, readonly: bool },
    Promise(TypeId),
    TypeParameter(TypeParamInfo),
    /// `NoInfer<T>`: behaves as `T` except during inference.
    NoInfer(TypeId),
    /// `ThisType<T>`: a marker that sets the `this` type of methods it is
    /// intersected with.
    ThisType(TypeId),
    /// Reference to a declaration. `lookup` sees through it once the
    /// declaration is bound, so self-references stay finite.
    Lazy(DefId),
    Error,
}
