//! Render types in TypeScript syntax.

use crate::db::TypeDatabase;
use crate::types::*;

/// Formats `TypeId`s for diagnostics and reports.
///
/// Named shapes (interfaces, classes) print as their name unless
/// `expand_named` is set, in which case the top-level shape is written out.
pub struct TypeFormatter<'a> {
    db: &'a dyn TypeDatabase,
    expand_named: bool,
    depth: u32,
}

const MAX_FORMAT_DEPTH: u32 = 16;

impl<'a> TypeFormatter<'a> {
    pub fn new(db: &'a dyn TypeDatabase) -> Self {
        TypeFormatter {
            db,
            expand_named: false,
            depth: 0,
        }
    }

    #[must_use]
    pub fn expand_named(mut self, expand: bool) -> Self {
        self.expand_named = expand;
        self
    }

    pub fn format(&mut self, type_id: TypeId) -> String {
        if self.depth > MAX_FORMAT_DEPTH {
            return "...".to_string();
        }
        self.depth += 1;
        let text = self.format_inner(type_id);
        self.depth -= 1;
        text
    }

    fn format_inner(&mut self, type_id: TypeId) -> String {
        // Declarations print by name, which keeps recursive ones finite.
        if let Some(name) = self.db.lazy_name(type_id)
            && (!self.expand_named || self.depth > 1 || self.db.resolve_lazy(type_id) == type_id)
        {
            return self.db.resolve_atom(name);
        }
        let Some(data) = self.db.lookup(type_id) else {
            return "error".to_string();
        };
        match data {
            TypeData::Intrinsic(kind) => kind.as_str().to_string(),
            TypeData::Lazy(_) | TypeData::Error => "error".to_string(),
            TypeData::Literal(value) => self.format_literal(&value),
            TypeData::Union(list) => self.format_union(list),
            TypeData::Intersection(list) => {
                let members = self.db.type_list(list);
                self.format_list(&members, " & ")
            }
            TypeData::Object(shape_id) => self.format_object(shape_id),
            TypeData::Function(shape_id) => self.format_function(shape_id),
            TypeData::Array(element) => format!("{}[]", self.format_element(element)),
            TypeData::ReadonlyArray(element) => {
                format!("readonly {}[]", self.format_element(element))
            }
            TypeData::Tuple { elements, readonly } => {
                let body = self.format_tuple(elements);
                if readonly {
                    format!("readonly {body}")
                } else {
                    body
                }
            }
            TypeData::Promise(inner) => format!("Promise<{}>", self.format(inner)),
            TypeData::TypeParameter(info) => self.db.resolve_atom(info.name),
            TypeData::NoInfer(inner) => format!("NoInfer<{}>", self.format(inner)),
            TypeData::ThisType(inner) => format!("ThisType<{}>", self.format(inner)),
        }
    }

    fn format_literal(&self, value: &LiteralValue) -> String {
        match value {
            LiteralValue::String(atom) => {
                let text = self.db.resolve_atom_ref(*atom);
                format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
            }
            LiteralValue::Number(n) => format_number(n.0),
            LiteralValue::BigInt(atom) => format!("{}n", self.db.resolve_atom_ref(*atom)),
            LiteralValue::Boolean(b) => b.to_string(),
        }
    }

    /// `null` and `undefined` go last, in that order.
    fn format_union(&mut self, list: TypeListId) -> String {
        let members = self.db.type_list(list);
        let mut ordered: Vec<TypeId> = members
            .iter()
            .copied()
            .filter(|&m| m != TypeId::NULL && m != TypeId::UNDEFINED)
            .collect();
        ordered.extend(
            [TypeId::NULL, TypeId::UNDEFINED]
                .into_iter()
                .filter(|nullish| members.contains(nullish)),
        );
        self.format_list(&ordered, " | ")
    }

    fn format_list(&mut self, members: &[TypeId], separator: &str) -> String {
        members
            .iter()
            .map(|&m| self.format_element(m))
            .collect::<Vec<_>>()
            .join(separator)
    }

    /// Wrap types that would bind loosely inside `[]`, `|` or `&`.
    fn format_element(&mut self, type_id: TypeId) -> String {
        let text = self.format(type_id);
        match self.db.lookup(type_id) {
            Some(TypeData::Union(_) | TypeData::Intersection(_) | TypeData::Function(_)) => {
                format!("({text})")
            }
            _ => text,
        }
    }

    fn format_object(&mut self, shape_id: ObjectShapeId) -> String {
        let shape = self.db.object_shape(shape_id);
        if let Some(name) = shape.name
            && (!self.expand_named || self.depth > 1)
        {
            return self.db.resolve_atom(name);
        }
        if shape.properties.is_empty() {
            return "{}".to_string();
        }
        let members: Vec<String> = shape
            .properties
            .iter()
            .map(|prop| {
                let mut out = String::new();
                if prop.is_readonly() {
                    out.push_str("readonly ");
                }
                out.push_str(&self.db.resolve_atom_ref(prop.name));
                if prop.is_optional() {
                    out.push('?');
                }
                out.push_str(": ");
                out.push_str(&self.format(prop.type_id));
                out
            })
            .collect();
        format!("{{ {}; }}", members.join("; "))
    }

    fn format_function(&mut self, shape_id: FunctionShapeId) -> String {
        let shape = self.db.function_shape(shape_id);
        let mut out = String::new();
        if shape.is_constructor {
            out.push_str("new ");
        }
        if !shape.type_params.is_empty() {
            let params: Vec<String> = shape
                .type_params
                .iter()
                .map(|tp| {
                    let name = self.db.resolve_atom(tp.name);
                    match tp.constraint {
                        Some(c) => format!("{name} extends {}", self.format(c)),
                        None => name,
                    }
                })
                .collect();
            out.push_str(&format!("<{}>", params.join(", ")));
        }

        let mut params: Vec<String> = Vec::new();
        if let Some(this_type) = shape.this_type {
            params.push(format!("this: {}", self.format(this_type)));
        }
        for (index, param) in shape.params.iter().enumerate() {
            let name = match param.name {
                Some(atom) => self.db.resolve_atom(atom),
                None => format!("arg{index}"),
            };
            let prefix = if param.rest { "..." } else { "" };
            let optional = if param.optional { "?" } else { "" };
            params.push(format!("{prefix}{name}{optional}: {}", self.format(param.type_id)));
        }
        out.push_str(&format!("({}) => ", params.join(", ")));

        match &shape.type_predicate {
            Some(pred) => {
                if pred.asserts {
                    out.push_str("asserts ");
                }
                out.push_str(&self.db.resolve_atom_ref(pred.parameter));
                if let Some(ty) = pred.type_id {
                    out.push_str(" is ");
                    out.push_str(&self.format(ty));
                }
            }
            None => out.push_str(&self.format(shape.return_type)),
        }
        out
    }

    fn format_tuple(&mut self, elements: TupleListId) -> String {
        let elements = self.db.tuple_list(elements);
        let parts: Vec<String> = elements
            .iter()
            .map(|elem| {
                let ty = if elem.optional {
                    self.format_element(elem.type_id)
                } else {
                    self.format(elem.type_id)
                };
                let rest = if elem.rest { "..." } else { "" };
                let optional = if elem.optional { "?" } else { "" };
                match elem.name {
                    Some(name) => {
                        format!("{rest}{}{optional}: {ty}", self.db.resolve_atom_ref(name))
                    }
                    None => format!("{rest}{ty}{optional}"),
                }
            })
            .collect();
        format!("[{}]", parts.join(", "))
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Shorthand for a one-off rendering.
pub fn format_type(db: &dyn TypeDatabase, type_id: TypeId) -> String {
    TypeFormatter::new(db).format(type_id)
}
