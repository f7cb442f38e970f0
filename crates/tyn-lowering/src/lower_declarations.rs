//! Lowering of named declarations: aliases, interfaces, classes and values.
//!
//! Each name is lowered once and cached. Interfaces, classes and aliases of
//! object literals are cached as a lazy reference before their body is
//! lowered, and the reference is bound to the lowered shape afterwards, so
//! `interface Node { next?: Node }` and `this` see the complete type.
//!
//! Any other alias referring to itself is a cycle:
//!
//! - outside any object or function type it is circular (TS2456)
//! - inside one the reference is a lazy reference bound once the alias is
//!   lowered

use crate::environment::{Declared, TypeDeclaration, ValueDeclaration};
use crate::lower::TypeLowering;
use tracing::{Level, debug, span};
use tyn_common::diagnostics::diagnostic_codes;
use tyn_common::limits::MAX_ALIAS_RESOLUTION_DEPTH;
use tyn_parser::{ClassDecl, ClassMember, Ident, InterfaceDecl, TypeAliasDecl, TypeNodeKind};
use tyn_solver::type_queries::widen_literals;
use tyn_solver::types::*;

impl<'a> TypeLowering<'a> {
    /// Resolve a declared type name, lowering its declaration on first use.
    pub fn resolve_named_type(&self, name: &Ident) -> TypeId {
        if let Some(&cached) = self.named_types.borrow().get(&name.text) {
            return cached;
        }
        let Some(declared) = self.env.type_decl(&name.text) else {
            self.error(diagnostic_codes::CANNOT_FIND_NAME, &[name.text.as_str()], name.span);
            return TypeId::ERROR;
        };
        if let Some(in_progress) = self.in_progress_reference(&name.text, declared) {
            return in_progress;
        }
        if self.resolving.borrow().len() as u32 >= MAX_ALIAS_RESOLUTION_DEPTH {
            debug!(name = %name.text, "declaration nesting limit reached");
            return TypeId::ERROR;
        }

        let _span = span!(Level::DEBUG, "resolve_named_type", name = %name.text).entered();
        self.resolving
            .borrow_mut()
            .push((name.text.clone(), self.object_depth.get()));
        let type_id = self.in_declaration_scope(&declared.file, || match &declared.decl {
            TypeDeclaration::Alias(decl) => self.lower_alias(decl),
            TypeDeclaration::Interface(decl) => self.lower_interface(decl),
            TypeDeclaration::Class(decl) => self.lower_class_instance(decl),
        });
        self.resolving.borrow_mut().pop();

        let pending = self.alias_refs.borrow_mut().remove(&name.text);
        if let Some(lazy) = pending {
            self.db.bind_lazy(lazy, type_id);
        }
        self.named_types
            .borrow_mut()
            .insert(name.text.clone(), type_id);
        type_id
    }

    /// Enter `name` as a lazy reference so its own body can refer to it.
    fn declare_lazy(&self, name: &str) -> TypeId {
        let lazy = self.db.lazy(self.db.intern_string(name));
        self.named_types.borrow_mut().insert(name.to_string(), lazy);
        lazy
    }

    /// Resolve a declared name by its text, if it is declared.
    pub fn resolve_type_name(&self, name: &str) -> Option<TypeId> {
        let declared = self.env.type_decl(name)?;
        Some(self.resolve_named_type(declared.decl.name()))
    }

    fn in_progress_reference(
        &self,
        name: &str,
        declared: &Declared<TypeDeclaration>,
    ) -> Option<TypeId> {
        let started_at = self
            .resolving
            .borrow()
            .iter()
            .find(|(resolving, _)| resolving == name)
            .map(|(_, depth)| *depth)?;

        match &declared.decl {
            TypeDeclaration::Alias(alias) if self.object_depth.get() <= started_at => {
                if self.circular.borrow_mut().insert(name.to_string()) {
                    self.with_file(&declared.file, || {
                        self.error(diagnostic_codes::TYPE_ALIAS_CIRCULAR, &[name], alias.name.span);
                    });
                }
                Some(TypeId::ERROR)
            }
            _ => {
                let mut refs = self.alias_refs.borrow_mut();
                let lazy = *refs
                    .entry(name.to_string())
                    .or_insert_with(|| self.db.lazy(self.db.intern_string(name)));
                Some(lazy)
            }
        }
    }

    /// An alias of an object type literal names that object.
    fn lower_alias(&self, decl: &TypeAliasDecl) -> TypeId {
        if !matches!(decl.type_node.kind, TypeNodeKind::Object(_)) {
            return self.lower_type(&decl.type_node);
        }
        let lazy = self.declare_lazy(&decl.name.text);
        let type_id = self.lower_type(&decl.type_node);
        let named = match self.db.lookup(type_id) {
            Some(TypeData::Object(shape_id)) => {
                let shape = self.db.object_shape(shape_id);
                self.db.object_with_shape(ObjectShape {
                    properties: shape.properties.clone(),
                    name: Some(self.db.intern_string(&decl.name.text)),
                    nominal: false,
                })
            }
            _ => type_id,
        };
        self.db.bind_lazy(lazy, named);
        lazy
    }

    fn lower_interface(&self, decl: &InterfaceDecl) -> TypeId {
        let lazy = self.declare_lazy(&decl.name.text);
        self.this_types.borrow_mut().push(lazy);
        let properties = self.in_object_literal(|| self.lower_members(&decl.members));
        self.this_types.borrow_mut().pop();

        let shape = self.db.object_with_shape(ObjectShape {
            properties,
            name: Some(self.db.intern_string(&decl.name.text)),
            nominal: false,
        });
        self.db.bind_lazy(lazy, shape);
        lazy
    }

    /// Instance side of a class. Initialized fields take the widened type of
    /// their initializer unless they are `readonly`.
    fn lower_class_instance(&self, decl: &ClassDecl) -> TypeId {
        let lazy = self.declare_lazy(&decl.name.text);
        self.this_types.borrow_mut().push(lazy);

        let properties = self.in_object_literal(|| self.lower_class_members(decl));
        self.this_types.borrow_mut().pop();

        let shape = self.db.object_with_shape(ObjectShape {
            properties,
            name: Some(self.db.intern_string(&decl.name.text)),
            nominal: true,
        });
        self.db.bind_lazy(lazy, shape);
        lazy
    }

    fn lower_class_members(&self, decl: &ClassDecl) -> Vec<PropertyInfo> {
        let mut properties = Vec::with_capacity(decl.members.len());
        for member in &decl.members {
            match member {
                ClassMember::Member(member) => properties.push(self.lower_member(member)),
                ClassMember::Initialized {
                    name,
                    readonly,
                    value,
                } => {
                    let literal = self.lower_literal(value);
                    let (type_id, flags) = if *readonly {
                        (literal, PropertyFlags::READONLY)
                    } else {
                        (widen_literals(self.db, literal), PropertyFlags::empty())
                    };
                    properties.push(
                        PropertyInfo::new(self.db.intern_string(&name.text), type_id)
                            .with_flags(flags),
                    );
                }
                ClassMember::Constructor(_) => {}
            }
        }
        properties
    }

    /// `typeof C`: a construct signature returning the instance type.
    fn lower_class_constructor(&self, decl: &ClassDecl) -> TypeId {
        let instance = self.resolve_named_type(&decl.name);
        let params = decl
            .members
            .iter()
            .find_map(|member| match member {
                ClassMember::Constructor(params) => Some(self.lower_params(params).1),
                _ => None,
            })
            .unwrap_or_default();
        let mut shape = FunctionShape::new(params, instance);
        shape.is_constructor = true;
        self.db.function(shape)
    }

    // =========================================================================
    // Values
    // =========================================================================

    /// The type of a declared value, as seen by `typeof name`.
    pub fn resolve_value_type(&self, name: &Ident) -> TypeId {
        if let Some(&cached) = self.value_types.borrow().get(&name.text) {
            return cached;
        }
        let Some(declared) = self.env.value_decl(&name.text) else {
            self.error(diagnostic_codes::CANNOT_FIND_NAME, &[name.text.as_str()], name.span);
            return TypeId::ERROR;
        };

        if self.resolving_values.borrow().contains(&name.text) {
            return match &declared.decl {
                ValueDeclaration::Class(class_name) => {
                    let instance = self.resolve_named_type(class_name);
                    let mut shape = FunctionShape::new(Vec::new(), instance);
                    shape.is_constructor = true;
                    self.db.function(shape)
                }
                _ => {
                    self.error(
                        diagnostic_codes::REFERENCED_IN_OWN_ANNOTATION,
                        &[name.text.as_str()],
                        name.span,
                    );
                    TypeId::ERROR
                }
            };
        }

        let _span = span!(Level::DEBUG, "resolve_value_type", name = %name.text).entered();
        self.resolving_values.borrow_mut().push(name.text.clone());
        let type_id = self.in_declaration_scope(&declared.file, || match &declared.decl {
            ValueDeclaration::Function(decl) => self.lower_signature(&decl.signature),
            ValueDeclaration::Const(decl) => self.lower_type(&decl.type_node),
            ValueDeclaration::Class(class_name) => match self.env.type_decl(&class_name.text) {
                Some(Declared {
                    decl: TypeDeclaration::Class(class),
                    ..
                }) => self.lower_class_constructor(class),
                _ => TypeId::ERROR,
            },
        });
        self.resolving_values.borrow_mut().pop();

        self.value_types
            .borrow_mut()
            .insert(name.text.clone(), type_id);
        type_id
    }

    /// Resolve a declared value by its text, if it is declared.
    pub fn resolve_value_name(&self, name: &str) -> Option<TypeId> {
        let declared = self.env.value_decl(name)?;
        let ident = match &declared.decl {
            ValueDeclaration::Function(decl) => &decl.name,
            ValueDeclaration::Const(decl) => &decl.name,
            ValueDeclaration::Class(class_name) => class_name,
        };
        Some(self.resolve_value_type(ident))
    }

    /// Lower every declaration in the environment, reporting what is wrong
    /// with each.
    pub fn lower_all_declarations(&self) {
        let _span = span!(Level::DEBUG, "lower_all_declarations").entered();
        for name in self.env.type_names() {
            self.resolve_type_name(name);
        }
        for name in self.env.value_names() {
            self.resolve_value_name(name);
        }
    }
}
