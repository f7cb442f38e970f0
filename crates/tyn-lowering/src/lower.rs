//! Type lowering: parsed type nodes → `TypeId`.
//!
//! `TypeLowering` walks `TypeNode`s and builds interned types through the
//! `TypeDatabase`. Named declarations are lowered on first use and cached
//! (see `lower_declarations.rs`). Problems are collected as diagnostics and
//! the offending node lowers to `TypeId::ERROR`, which absorbs everything it
//! touches, so one mistake is reported once.

use crate::environment::DeclarationEnvironment;
use rustc_hash::{FxHashMap, FxHashSet};
use std::cell::{Cell, RefCell};
use tracing::{Level, span, trace};
use tyn_common::diagnostics::diagnostic_codes;
use tyn_common::limits::MAX_PARSER_RECURSION_DEPTH;
use tyn_common::{Diagnostic, Span};
use tyn_parser::{
    Ident, KeywordType, LiteralNode, MemberNode, ParamNode, SignatureNode, TupleElementNode,
    TypeNode, TypeNodeKind, TypeParamNode, parse_type_annotation,
};
use tyn_solver::type_queries::{literal_value, object_shape_id, union_list_id, union_members};
use tyn_solver::{
    DiscriminatedUnion, TypeDatabase, TypeDeclarationError, UtilityKind, declare_discriminated_union,
    declare_literal_union, declare_union, evaluate_utility, find_discriminant_property, format_type,
};
use tyn_solver::types::*;

/// Maximum number of type lowering operations to prevent runaway recursion.
pub const MAX_LOWERING_OPERATIONS: u32 = 100_000;

/// File name used for diagnostics on standalone annotations.
pub const ANNOTATION_FILE: &str = "<annotation>";

/// Type lowering context.
pub struct TypeLowering<'a> {
    pub(crate) db: &'a dyn TypeDatabase,
    pub(crate) env: &'a DeclarationEnvironment,
    /// File that spans of the node being lowered refer to.
    pub(crate) file: RefCell<String>,
    type_param_scopes: RefCell<Vec<Vec<(String, TypeId)>>>,
    /// Innermost last. `this` resolves to the top entry.
    pub(crate) this_types: RefCell<Vec<TypeId>>,
    /// Named types being lowered, with the object nesting depth at which
    /// lowering started.
    pub(crate) resolving: RefCell<Vec<(String, u32)>>,
    pub(crate) resolving_values: RefCell<Vec<String>>,
    /// Number of object literals and interface or class bodies enclosing the
    /// current node.
    pub(crate) object_depth: Cell<u32>,
    /// Lowered declarations. Interfaces, classes and object aliases are
    /// entered as lazy references before their bodies are lowered.
    pub(crate) named_types: RefCell<FxHashMap<String, TypeId>>,
    /// Lazy references to aliases still being lowered, bound once they are.
    pub(crate) alias_refs: RefCell<FxHashMap<String, TypeId>>,
    pub(crate) value_types: RefCell<FxHashMap<String, TypeId>>,
    pub(crate) circular: RefCell<FxHashSet<String>>,
    /// Members of lowered unions in the order they were written.
    written_unions: RefCell<FxHashMap<TypeId, Vec<TypeId>>>,
    diagnostics: RefCell<Vec<Diagnostic>>,
    /// Number of `lower_type` calls on the stack, across declarations.
    nesting: Cell<u32>,
    operations: Cell<u32>,
    limit_exceeded: Cell<bool>,
}

impl<'a> TypeLowering<'a> {
    pub fn new(db: &'a dyn TypeDatabase, env: &'a DeclarationEnvironment) -> Self {
        TypeLowering {
            db,
            env,
            file: RefCell::new(ANNOTATION_FILE.to_string()),
            type_param_scopes: RefCell::new(Vec::new()),
            this_types: RefCell::new(Vec::new()),
            resolving: RefCell::new(Vec::new()),
            resolving_values: RefCell::new(Vec::new()),
            object_depth: Cell::new(0),
            named_types: RefCell::new(FxHashMap::default()),
            alias_refs: RefCell::new(FxHashMap::default()),
            value_types: RefCell::new(FxHashMap::default()),
            circular: RefCell::new(FxHashSet::default()),
            written_unions: RefCell::new(FxHashMap::default()),
            diagnostics: RefCell::new(Vec::new()),
            nesting: Cell::new(0),
            operations: Cell::new(0),
            limit_exceeded: Cell::new(false),
        }
    }

    pub fn db(&self) -> &'a dyn TypeDatabase {
        self.db
    }

    /// Diagnostics reported so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }

    pub fn take_diagnostics(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.borrow().iter().any(Diagnostic::is_error)
    }

    /// Whether the operation limit cut lowering short.
    pub fn limit_exceeded(&self) -> bool {
        self.limit_exceeded.get()
    }

    /// Count one operation; false once the limit has been hit.
    fn check_limit(&self) -> bool {
        if self.limit_exceeded.get() {
            return false;
        }
        let operations = self.operations.get() + 1;
        self.operations.set(operations);
        if operations > MAX_LOWERING_OPERATIONS {
            self.limit_exceeded.set(true);
            return false;
        }
        true
    }

    pub(crate) fn with_file<R>(&self, file: &str, f: impl FnOnce() -> R) -> R {
        let previous = std::mem::replace(&mut *self.file.borrow_mut(), file.to_string());
        let result = f();
        *self.file.borrow_mut() = previous;
        result
    }

    /// Run `f` at the top level of a declaration: no enclosing type
    /// parameters and no enclosing `this`.
    pub(crate) fn in_declaration_scope<R>(&self, file: &str, f: impl FnOnce() -> R) -> R {
        let outer_params = std::mem::take(&mut *self.type_param_scopes.borrow_mut());
        let outer_this = std::mem::take(&mut *self.this_types.borrow_mut());
        let result = self.with_file(file, f);
        *self.type_param_scopes.borrow_mut() = outer_params;
        *self.this_types.borrow_mut() = outer_this;
        result
    }

    pub(crate) fn error(&self, code: u32, args: &[&str], span: Span) {
        self.report(Diagnostic::from_code(code, args), span);
    }

    pub(crate) fn report(&self, diagnostic: Diagnostic, span: Span) {
        let diagnostic = diagnostic.at(&self.file.borrow(), span.start, span.len());
        trace!(code = diagnostic.code, message = %diagnostic.message_text, "lowering diagnostic");
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    // =========================================================================
    // Type parameter scopes
    // =========================================================================

    fn push_type_param_scope(&self) {
        self.type_param_scopes.borrow_mut().push(Vec::new());
    }

    fn pop_type_param_scope(&self) {
        self.type_param_scopes.borrow_mut().pop();
    }

    fn add_type_param_binding(&self, name: &str, type_id: TypeId) {
        if let Some(scope) = self.type_param_scopes.borrow_mut().last_mut() {
            scope.push((name.to_string(), type_id));
        }
    }

    fn lookup_type_param(&self, name: &str) -> Option<TypeId> {
        let scopes = self.type_param_scopes.borrow();
        scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter().rev())
            .find(|(param, _)| param == name)
            .map(|(_, type_id)| *type_id)
    }

    /// Bind `params` for the duration of `f`. A constraint may mention the
    /// parameters declared before it.
    fn with_type_params<R>(
        &self,
        params: &[TypeParamNode],
        f: impl FnOnce() -> R,
    ) -> (Vec<TypeParamInfo>, R) {
        if params.is_empty() {
            return (Vec::new(), f());
        }

        self.push_type_param_scope();
        let mut infos = Vec::with_capacity(params.len());
        for param in params {
            let constraint = param.constraint.as_ref().map(|c| self.lower_type(c));
            let info = TypeParamInfo {
                name: self.db.intern_string(&param.name.text),
                constraint,
            };
            let type_id = self.db.type_param(info.clone());
            self.add_type_param_binding(&param.name.text, type_id);
            infos.push(info);
        }
        let result = f();
        self.pop_type_param_scope();
        (infos, result)
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    /// Parse and lower a standalone annotation such as `Pick<User, "id">`.
    ///
    /// Syntax errors are recorded as diagnostics and yield `TypeId::ERROR`.
    pub fn lower_annotation(&self, text: &str) -> TypeId {
        let parsed = parse_type_annotation(text);
        let has_syntax_errors = parsed.has_errors();
        self.diagnostics.borrow_mut().extend(parsed.diagnostics);
        if has_syntax_errors {
            return TypeId::ERROR;
        }
        self.with_file(ANNOTATION_FILE, || self.lower_type(&parsed.value))
    }

    /// Lower a type node.
    ///
    /// Declarations lower inside the reference that first names them, so a
    /// chain of nested declarations can nest deeper than any single parsed
    /// type. Past `MAX_PARSER_RECURSION_DEPTH` the node is reported and
    /// lowers to `TypeId::ERROR`.
    pub fn lower_type(&self, node: &TypeNode) -> TypeId {
        if !self.check_limit() {
            return TypeId::ERROR;
        }
        let nesting = self.nesting.get();
        if nesting >= MAX_PARSER_RECURSION_DEPTH {
            trace!(nesting, "type nesting limit reached");
            self.error(diagnostic_codes::TYPE_NESTED_TOO_DEEPLY, &[], node.span);
            return TypeId::ERROR;
        }
        self.nesting.set(nesting + 1);
        let type_id = self.lower_type_kind(node);
        self.nesting.set(nesting);
        type_id
    }

    fn lower_type_kind(&self, node: &TypeNode) -> TypeId {
        match &node.kind {
            TypeNodeKind::Keyword(keyword) => self.lower_keyword(*keyword, node.span),
            TypeNodeKind::Literal(literal) => self.lower_literal(literal),
            TypeNodeKind::Reference { name, type_args } => {
                self.lower_type_reference(name, type_args, node.span)
            }
            TypeNodeKind::TypeQuery(name) => self.resolve_value_type(name),
            TypeNodeKind::Union(members) => self.lower_union_type(members, node.span),
            TypeNodeKind::Intersection(members) => {
                self.lower_intersection_type(members, node.span)
            }
            TypeNodeKind::Array(element) => {
                let element = self.lower_type(element);
                self.db.array(element)
            }
            TypeNodeKind::ReadonlyOperator(inner) => self.lower_readonly(inner, node.span),
            TypeNodeKind::IndexedAccess { object, index } => {
                self.lower_indexed_access(object, index)
            }
            TypeNodeKind::Tuple(elements) => {
                let elements = self.lower_tuple_elements(elements);
                self.db.tuple(elements)
            }
            TypeNodeKind::Object(members) => self.in_object_literal(|| {
                let properties = self.lower_members(members);
                self.db.object(properties)
            }),
            TypeNodeKind::Function(signature) => self.lower_signature(signature),
            TypeNodeKind::Parenthesized(inner) => self.lower_type(inner),
            // Only meaningful as a return type; elsewhere it is a boolean.
            TypeNodeKind::Predicate { .. } => TypeId::BOOLEAN,
            TypeNodeKind::Error => TypeId::ERROR,
        }
    }

    pub(crate) fn in_object_literal<R>(&self, f: impl FnOnce() -> R) -> R {
        self.object_depth.set(self.object_depth.get() + 1);
        let result = f();
        self.object_depth.set(self.object_depth.get() - 1);
        result
    }

    fn lower_keyword(&self, keyword: KeywordType, span: Span) -> TypeId {
        match keyword {
            KeywordType::String => TypeId::STRING,
            KeywordType::Number => TypeId::NUMBER,
            KeywordType::Boolean => TypeId::BOOLEAN,
            KeywordType::BigInt => TypeId::BIGINT,
            KeywordType::Symbol => TypeId::SYMBOL,
            KeywordType::Object => TypeId::OBJECT,
            KeywordType::Any => TypeId::ANY,
            KeywordType::Unknown => TypeId::UNKNOWN,
            KeywordType::Never => TypeId::NEVER,
            KeywordType::Void => TypeId::VOID,
            KeywordType::Null => TypeId::NULL,
            KeywordType::Undefined => TypeId::UNDEFINED,
            KeywordType::This => match self.this_types.borrow().last() {
                Some(&this_type) => this_type,
                None => {
                    self.error(diagnostic_codes::THIS_TYPE_UNAVAILABLE, &[], span);
                    TypeId::ERROR
                }
            },
        }
    }

    pub(crate) fn lower_literal(&self, literal: &LiteralNode) -> TypeId {
        match literal {
            LiteralNode::String(value) => self.db.literal_string(value),
            LiteralNode::Number(value) => self.db.literal_number(*value),
            LiteralNode::BigInt(digits) => self.db.literal_bigint(digits),
            LiteralNode::Boolean(value) => self.db.literal_boolean(*value),
        }
    }

    // =========================================================================
    // References
    // =========================================================================

    /// `Name` or `Name<Args>`: a type parameter, a declared type, or a
    /// built-in utility type, in that order.
    fn lower_type_reference(&self, name: &Ident, type_args: &[TypeNode], span: Span) -> TypeId {
        if let Some(type_param) = self.lookup_type_param(&name.text) {
            if !type_args.is_empty() {
                self.error(diagnostic_codes::TYPE_NOT_GENERIC, &[name.text.as_str()], span);
            }
            return type_param;
        }

        if self.env.type_decl(&name.text).is_some() {
            if !type_args.is_empty() {
                self.error(diagnostic_codes::TYPE_NOT_GENERIC, &[name.text.as_str()], span);
            }
            return self.resolve_named_type(name);
        }

        if let Some(kind) = UtilityKind::from_name(&name.text) {
            return self.lower_utility_reference(kind, type_args, span);
        }

        self.error(diagnostic_codes::CANNOT_FIND_NAME, &[name.text.as_str()], name.span);
        TypeId::ERROR
    }

    fn lower_utility_reference(&self, kind: UtilityKind, type_args: &[TypeNode], span: Span) -> TypeId {
        let _span = span!(Level::TRACE, "lower_utility_reference", utility = kind.name()).entered();

        let args: Vec<TypeId> = type_args.iter().map(|arg| self.lower_type(arg)).collect();
        if args.iter().any(|arg| arg.is_error()) {
            return TypeId::ERROR;
        }
        match evaluate_utility(self.db, kind, &args) {
            Ok(type_id) => type_id,
            Err(err) => {
                self.report(err.to_diagnostic(), span);
                TypeId::ERROR
            }
        }
    }

    // =========================================================================
    // Unions and intersections
    // =========================================================================

    /// A written union. The members written directly must form a valid
    /// union declaration; members that name a union are flattened into it.
    fn lower_union_type(&self, members: &[TypeNode], span: Span) -> TypeId {
        let mut written = Vec::with_capacity(members.len());
        let mut flattened = Vec::with_capacity(members.len());
        for member in members {
            let type_id = self.lower_type(member);
            let names_a_union = matches!(
                member.kind,
                TypeNodeKind::Reference { .. } | TypeNodeKind::TypeQuery(_)
            ) && union_list_id(self.db, type_id).is_some();
            if names_a_union {
                flattened.extend(self.written_members(type_id));
            } else {
                if !type_id.is_error() {
                    written.push(type_id);
                }
                flattened.push(type_id);
            }
        }

        if !written.is_empty()
            && let Err(err) = declare_union(self.db, &written)
        {
            self.report(err.to_diagnostic(), span);
        }

        let union = self.db.union(flattened.clone());
        self.record_written_order(union, flattened);
        union
    }

    fn record_written_order(&self, union: TypeId, flattened: Vec<TypeId>) {
        let Some(list) = union_list_id(self.db, union) else {
            return;
        };
        let canonical = self.db.type_list(list);
        let mut order: Vec<TypeId> = Vec::with_capacity(canonical.len());
        for member in flattened {
            if canonical.contains(&member) && !order.contains(&member) {
                order.push(member);
            }
        }
        if order.len() == canonical.len() {
            self.written_unions.borrow_mut().entry(union).or_insert(order);
        }
    }

    /// Members of a union in the order they were first written, falling back
    /// to the canonical order for unions that were never written.
    pub fn written_members(&self, type_id: TypeId) -> Vec<TypeId> {
        match self.written_unions.borrow().get(&type_id) {
            Some(order) => order.clone(),
            None => union_members(self.db, type_id),
        }
    }

    /// Build the discriminated union a declared union type describes.
    ///
    /// Without an explicit `property`, the first property that tells every
    /// variant apart is used; a union of literals is its own discriminant.
    pub fn discriminated_union(
        &self,
        type_id: TypeId,
        property: Option<&str>,
    ) -> Result<DiscriminatedUnion, TypeDeclarationError> {
        let members = self.written_members(type_id);
        let property = property
            .map(|p| self.db.intern_string(p))
            .or_else(|| find_discriminant_property(self.db, &members));
        match property {
            Some(property) => declare_discriminated_union(self.db, property, &members),
            None => declare_literal_union(self.db, &members),
        }
    }

    fn lower_intersection_type(&self, members: &[TypeNode], span: Span) -> TypeId {
        let mut lowered = members.iter().map(|member| self.lower_type(member));
        let Some(mut result) = lowered.next() else {
            return TypeId::UNKNOWN;
        };
        for next in lowered {
            if self.is_unsupported_this_intersection(result, next) {
                let left = format_type(self.db, result);
                let right = format_type(self.db, next);
                self.error(
                    diagnostic_codes::UNSUPPORTED_INTERSECTION,
                    &[left.as_str(), right.as_str()],
                    span,
                );
                return TypeId::ERROR;
            }
            result = self.db.intersection2(result, next);
        }
        result
    }

    /// `ThisType<T>` only combines with object types.
    fn is_unsupported_this_intersection(&self, left: TypeId, right: TypeId) -> bool {
        let is_marker = |t: TypeId| matches!(self.db.lookup(t), Some(TypeData::ThisType(_)));
        let is_object = |t: TypeId| {
            union_members(self.db, t)
                .iter()
                .all(|&member| object_shape_id(self.db, member).is_some())
        };
        let unsupported = |marker: TypeId, other: TypeId| {
            is_marker(marker) && !is_marker(other) && !other.is_error() && !is_object(other)
        };
        unsupported(left, right) || unsupported(right, left)
    }

    // =========================================================================
    // Arrays, tuples and indexed access
    // =========================================================================

    fn lower_readonly(&self, inner: &TypeNode, span: Span) -> TypeId {
        let inner_type = self.lower_type(inner);
        match self.db.lookup(inner_type) {
            Some(TypeData::Array(element) | TypeData::ReadonlyArray(element)) => {
                self.db.readonly_array(element)
            }
            Some(TypeData::Tuple { elements, .. }) => {
                self.db.readonly_tuple(self.db.tuple_list(elements).to_vec())
            }
            Some(TypeData::Error) => TypeId::ERROR,
            _ => {
                self.error(diagnostic_codes::READONLY_ONLY_ON_ARRAYS, &[], span);
                inner_type
            }
        }
    }

    fn lower_tuple_elements(&self, elements: &[TupleElementNode]) -> Vec<TupleElement> {
        elements
            .iter()
            .map(|element| TupleElement {
                type_id: self.lower_type(&element.type_node),
                name: element
                    .name
                    .as_ref()
                    .map(|name| self.db.intern_string(&name.text)),
                optional: element.optional,
                rest: element.rest,
            })
            .collect()
    }

    /// `T["a" | "b"]`, `T[number]` on arrays and tuples, `T[0]` on tuples.
    fn lower_indexed_access(&self, object: &TypeNode, index: &TypeNode) -> TypeId {
        let object_type = self.lower_type(object);
        let index_type = self.lower_type(index);
        if object_type.is_error() || index_type.is_error() {
            return TypeId::ERROR;
        }

        let mut results = Vec::new();
        for key in union_members(self.db, index_type) {
            match self.index_access_one(object_type, key) {
                Ok(type_id) => results.push(type_id),
                Err(diagnostic) => {
                    self.report(diagnostic, index.span);
                    return TypeId::ERROR;
                }
            }
        }
        self.db.union(results)
    }

    fn index_access_one(&self, object_type: TypeId, key: TypeId) -> Result<TypeId, Diagnostic> {
        match (self.db.lookup(object_type), literal_value(self.db, key)) {
            (Some(TypeData::Array(element) | TypeData::ReadonlyArray(element)), _)
                if key == TypeId::NUMBER =>
            {
                return Ok(element);
            }
            (Some(TypeData::Tuple { elements, .. }), _) if key == TypeId::NUMBER => {
                let elements = self.db.tuple_list(elements);
                let types = elements.iter().map(|e| self.tuple_element_type(e)).collect();
                return Ok(self.db.union(types));
            }
            (Some(TypeData::Tuple { elements, .. }), Some(LiteralValue::Number(n))) => {
                let elements = self.db.tuple_list(elements);
                let position = n.0 as usize;
                return match elements.get(position) {
                    Some(element) if n.0.fract() == 0.0 && n.0 >= 0.0 => {
                        Ok(self.tuple_element_type(element))
                    }
                    _ => {
                        let key_text = format_type(self.db, key);
                        let object_text = format_type(self.db, object_type);
                        Err(Diagnostic::from_code(
                            diagnostic_codes::PROPERTY_DOES_NOT_EXIST,
                            &[key_text.as_str(), object_text.as_str()],
                        ))
                    }
                };
            }
            _ => {}
        }

        let Some(LiteralValue::String(name)) = literal_value(self.db, key) else {
            let key_text = format_type(self.db, key);
            return Err(Diagnostic::from_code(
                diagnostic_codes::INVALID_INDEX_TYPE,
                &[key_text.as_str()],
            ));
        };

        let mut found = Vec::new();
        for member in union_members(self.db, object_type) {
            let property = object_shape_id(self.db, member)
                .and_then(|shape| self.db.object_shape(shape).property(name).cloned());
            match property {
                Some(prop) if prop.is_optional() => {
                    found.push(self.db.union2(prop.type_id, TypeId::UNDEFINED));
                }
                Some(prop) => found.push(prop.type_id),
                None => {
                    let name_text = self.db.resolve_atom(name);
                    let object_text = format_type(self.db, object_type);
                    return Err(Diagnostic::from_code(
                        diagnostic_codes::PROPERTY_DOES_NOT_EXIST,
                        &[name_text.as_str(), object_text.as_str()],
                    ));
                }
            }
        }
        Ok(self.db.union(found))
    }

    fn tuple_element_type(&self, element: &TupleElement) -> TypeId {
        if element.rest
            && let Some(TypeData::Array(inner) | TypeData::ReadonlyArray(inner)) =
                self.db.lookup(element.type_id)
        {
            return inner;
        }
        if element.optional {
            return self.db.union2(element.type_id, TypeId::UNDEFINED);
        }
        element.type_id
    }

    // =========================================================================
    // Members and signatures
    // =========================================================================

    pub(crate) fn lower_members(&self, members: &[MemberNode]) -> Vec<PropertyInfo> {
        members.iter().map(|member| self.lower_member(member)).collect()
    }

    pub(crate) fn lower_member(&self, member: &MemberNode) -> PropertyInfo {
        match member {
            MemberNode::Property {
                name,
                optional,
                readonly,
                type_node,
            } => {
                let mut flags = PropertyFlags::empty();
                flags.set(PropertyFlags::OPTIONAL, *optional);
                flags.set(PropertyFlags::READONLY, *readonly);
                PropertyInfo::new(self.db.intern_string(&name.text), self.lower_type(type_node))
                    .with_flags(flags)
            }
            MemberNode::Method {
                name,
                optional,
                signature,
            } => {
                let mut flags = PropertyFlags::METHOD;
                flags.set(PropertyFlags::OPTIONAL, *optional);
                PropertyInfo::new(self.db.intern_string(&name.text), self.lower_signature(signature))
                    .with_flags(flags)
            }
        }
    }

    /// A function, method or construct signature.
    pub fn lower_signature(&self, signature: &SignatureNode) -> TypeId {
        let (type_params, mut shape) = self.with_type_params(&signature.type_params, || {
            self.in_object_literal(|| self.lower_signature_parts(signature))
        });
        shape.type_params = type_params;
        self.db.function(shape)
    }

    fn lower_signature_parts(&self, signature: &SignatureNode) -> FunctionShape {
        let (this_type, params) = self.lower_params(&signature.params);
        let (return_type, type_predicate) = self.lower_return_type(&signature.return_type);
        FunctionShape {
            type_params: Vec::new(),
            params,
            this_type,
            return_type,
            type_predicate,
            is_constructor: signature.is_constructor,
        }
    }

    /// Lower a parameter list, splitting off an explicit `this` parameter.
    /// An unannotated parameter is `any`.
    pub(crate) fn lower_params(&self, params: &[ParamNode]) -> (Option<TypeId>, Vec<ParamInfo>) {
        let mut this_type = None;
        let mut lowered = Vec::with_capacity(params.len());
        for param in params {
            let type_id = param
                .type_node
                .as_ref()
                .map_or(TypeId::ANY, |node| self.lower_type(node));
            if param.is_this() {
                this_type = Some(type_id);
                continue;
            }
            lowered.push(ParamInfo {
                name: Some(self.db.intern_string(&param.name.text)),
                type_id,
                optional: param.optional,
                rest: param.rest,
            });
        }
        (this_type, lowered)
    }

    /// `x is T` returns `boolean`; `asserts x [is T]` returns `void`.
    fn lower_return_type(&self, node: &TypeNode) -> (TypeId, Option<TypePredicate>) {
        match &node.kind {
            TypeNodeKind::Predicate {
                asserts,
                parameter,
                type_node,
            } => {
                let predicate = TypePredicate {
                    asserts: *asserts,
                    parameter: self.db.intern_string(&parameter.text),
                    type_id: type_node.as_ref().map(|t| self.lower_type(t)),
                };
                let return_type = if *asserts {
                    TypeId::VOID
                } else {
                    TypeId::BOOLEAN
                };
                (return_type, Some(predicate))
            }
            _ => (self.lower_type(node), None),
        }
    }
}
