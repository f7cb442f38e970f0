//! Owned syntax tree for declarations and type annotations.

use serde::Serialize;
use tyn_common::Span;

/// An identifier with its source range.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Ident {
    pub text: String,
    pub span: Span,
}

impl Ident {
    pub fn new(text: impl Into<String>, span: Span) -> Self {
        Ident {
            text: text.into(),
            span,
        }
    }
}

/// A parsed file: its declarations in source order.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SourceFile {
    pub file_name: String,
    pub declarations: Vec<Declaration>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum Declaration {
    TypeAlias(TypeAliasDecl),
    Interface(InterfaceDecl),
    Class(ClassDecl),
    Function(FunctionDecl),
    Const(ConstDecl),
}

impl Declaration {
    pub fn name(&self) -> &Ident {
        match self {
            Declaration::TypeAlias(decl) => &decl.name,
            Declaration::Interface(decl) => &decl.name,
            Declaration::Class(decl) => &decl.name,
            Declaration::Function(decl) => &decl.name,
            Declaration::Const(decl) => &decl.name,
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Declaration::TypeAlias(decl) => decl.span,
            Declaration::Interface(decl) => decl.span,
            Declaration::Class(decl) => decl.span,
            Declaration::Function(decl) => decl.span,
            Declaration::Const(decl) => decl.span,
        }
    }
}

/// `type Name = Type;`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeAliasDecl {
    pub name: Ident,
    pub type_node: TypeNode,
    pub span: Span,
}

/// `interface Name { members }`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct InterfaceDecl {
    pub name: Ident,
    pub members: Vec<MemberNode>,
    pub span: Span,
}

/// `class Name { members }`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ClassDecl {
    pub name: Ident,
    pub members: Vec<ClassMember>,
    pub span: Span,
}

/// `function name(params): ReturnType` (body, if any, is skipped).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FunctionDecl {
    pub name: Ident,
    pub signature: SignatureNode,
    pub span: Span,
}

/// `declare const name: Type;`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConstDecl {
    pub name: Ident,
    pub type_node: TypeNode,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ClassMember {
    Member(MemberNode),
    /// `name = literal;`: the property takes the literal type, widened unless `readonly`.
    Initialized {
        name: Ident,
        readonly: bool,
        value: LiteralNode,
    },
    Constructor(Vec<ParamNode>),
}

/// A property or method signature in an object type, interface or class.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum MemberNode {
    Property {
        name: Ident,
        optional: bool,
        readonly: bool,
        type_node: TypeNode,
    },
    Method {
        name: Ident,
        optional: bool,
        signature: SignatureNode,
    },
}

impl MemberNode {
    pub fn name(&self) -> &Ident {
        match self {
            MemberNode::Property { name, .. } | MemberNode::Method { name, .. } => name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeNode {
    pub kind: TypeNodeKind,
    pub span: Span,
}

impl TypeNode {
    pub fn new(kind: TypeNodeKind, span: Span) -> Self {
        TypeNode { kind, span }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.kind, TypeNodeKind::Error)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum KeywordType {
    String,
    Number,
    Boolean,
    BigInt,
    Symbol,
    Object,
    Any,
    Unknown,
    Never,
    Void,
    Null,
    Undefined,
    This,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum LiteralNode {
    String(String),
    Number(f64),
    /// Decimal digits, with a leading `-` when negative.
    BigInt(String),
    Boolean(bool),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum TypeNodeKind {
    Keyword(KeywordType),
    Literal(LiteralNode),
    /// `Name` or `Name<Args>`
    Reference {
        name: Ident,
        type_args: Vec<TypeNode>,
    },
    /// `typeof name`
    TypeQuery(Ident),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    /// `T[]`
    Array(Box<TypeNode>),
    /// `readonly T[]` / `readonly [A, B]`
    ReadonlyOperator(Box<TypeNode>),
    /// `T["prop"]`
    IndexedAccess {
        object: Box<TypeNode>,
        index: Box<TypeNode>,
    },
    Tuple(Vec<TupleElementNode>),
    Object(Vec<MemberNode>),
    Function(Box<SignatureNode>),
    Parenthesized(Box<TypeNode>),
    /// `x is T`, `asserts x is T`, `asserts x` (return positions only)
    Predicate {
        asserts: bool,
        parameter: Ident,
        type_node: Option<Box<TypeNode>>,
    },
    Error,
}

/// Parameter list and return type of a function, method or constructor type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SignatureNode {
    pub type_params: Vec<TypeParamNode>,
    pub params: Vec<ParamNode>,
    pub return_type: TypeNode,
    pub is_constructor: bool,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParamNode {
    /// `this` for an explicit this-parameter.
    pub name: Ident,
    pub type_node: Option<TypeNode>,
    pub optional: bool,
    pub rest: bool,
}

impl ParamNode {
    pub fn is_this(&self) -> bool {
        self.name.text == "this"
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TypeParamNode {
    pub name: Ident,
    pub constraint: Option<TypeNode>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TupleElementNode {
    pub name: Option<Ident>,
    pub type_node: TypeNode,
    pub optional: bool,
    pub rest: bool,
}
