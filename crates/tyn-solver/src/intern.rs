//! Type interning for structural deduplication.
//!
//! This module implements the type interning engine that converts
//! `TypeData` structures into lightweight `TypeId` handles.
//!
//! Benefits:
//! - O(1) type equality (just compare TypeId values)
//! - Memory efficient (each unique structure stored once)
//! - Union normalization happens once, at construction

use crate::types::*;
use rustc_hash::{FxHashMap, FxHasher};
use smallvec::SmallVec;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use tyn_common::limits::MAX_ALIAS_RESOLUTION_DEPTH;
use tyn_common::{Atom, ShardedInterner};

const SHARD_BITS: u32 = 4;
const SHARD_COUNT: usize = 1 << SHARD_BITS; // 16 shards
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;
const TYPE_LIST_INLINE: usize = 8;

type TypeListBuffer = SmallVec<[TypeId; TYPE_LIST_INLINE]>;

struct TypeShard {
    key_to_index: RwLock<FxHashMap<TypeData, u32>>,
    /// Each key with its creation order.
    index_to_key: RwLock<Vec<(TypeData, u32)>>,
}

impl TypeShard {
    fn new() -> Self {
        TypeShard {
            key_to_index: RwLock::new(FxHashMap::default()),
            index_to_key: RwLock::new(Vec::new()),
        }
    }
}

struct SliceInterner<T> {
    items: Vec<Arc<[T]>>,
    map: FxHashMap<Arc<[T]>, u32>,
}

impl<T> SliceInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        let empty: Arc<[T]> = Arc::from(Vec::new());
        let mut map = FxHashMap::default();
        map.insert(empty.clone(), 0);
        SliceInterner {
            items: vec![empty],
            map,
        }
    }

    fn intern(&mut self, items: Vec<T>) -> u32 {
        if items.is_empty() {
            return 0;
        }
        if let Some(&id) = self.map.get(items.as_slice()) {
            return id;
        }
        let arc: Arc<[T]> = items.into();
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<[T]>> {
        self.items.get(id as usize).cloned()
    }

    fn empty(&self) -> Arc<[T]> {
        self.items[0].clone()
    }
}

struct ValueInterner<T> {
    items: Vec<Arc<T>>,
    map: FxHashMap<Arc<T>, u32>,
}

impl<T> ValueInterner<T>
where
    T: Eq + Hash,
{
    fn new() -> Self {
        ValueInterner {
            items: Vec::new(),
            map: FxHashMap::default(),
        }
    }

    fn intern(&mut self, value: T) -> u32 {
        if let Some(&id) = self.map.get(&value) {
            return id;
        }
        let arc = Arc::new(value);
        let id = self.items.len() as u32;
        self.items.push(arc.clone());
        self.map.insert(arc, id);
        id
    }

    fn get(&self, id: u32) -> Option<Arc<T>> {
        self.items.get(id as usize).cloned()
    }
}

struct LazyDef {
    name: Atom,
    target: Option<TypeId>,
}

/// Type interning table.
/// Thread-safe via RwLock for concurrent access.
///
/// Ids interleave across shards, so canonical orderings (union members,
/// intersection members) use the order in which types were first interned.
pub struct TypeInterner {
    shards: [TypeShard; SHARD_COUNT],
    /// Property names, string literal values and bigint digits.
    pub string_interner: ShardedInterner,
    type_lists: RwLock<SliceInterner<TypeId>>,
    tuple_lists: RwLock<SliceInterner<TupleElement>>,
    object_shapes: RwLock<ValueInterner<ObjectShape>>,
    function_shapes: RwLock<ValueInterner<FunctionShape>>,
    defs: RwLock<Vec<LazyDef>>,
    next_order: AtomicU32,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create a new type interner with pre-registered intrinsics
    pub fn new() -> Self {
        TypeInterner {
            shards: std::array::from_fn(|_| TypeShard::new()),
            string_interner: {
                let interner = ShardedInterner::new();
                interner.intern_common();
                interner
            },
            type_lists: RwLock::new(SliceInterner::new()),
            tuple_lists: RwLock::new(SliceInterner::new()),
            object_shapes: RwLock::new(ValueInterner::new()),
            function_shapes: RwLock::new(ValueInterner::new()),
            defs: RwLock::new(Vec::new()),
            next_order: AtomicU32::new(TypeId::FIRST_USER),
        }
    }

    pub fn intern_string(&self, s: &str) -> Atom {
        self.string_interner.intern(s)
    }

    pub fn resolve_atom(&self, atom: Atom) -> String {
        self.string_interner.resolve(atom).to_string()
    }

    /// Resolve an Atom without allocating a new String.
    pub fn resolve_atom_ref(&self, atom: Atom) -> Arc<str> {
        self.string_interner.resolve(atom)
    }

    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        let lists = self.type_lists.read().expect("type_lists lock poisoned");
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    pub fn tuple_list(&self, id: TupleListId) -> Arc<[TupleElement]> {
        let lists = self.tuple_lists.read().expect("tuple_lists lock poisoned");
        lists.get(id.0).unwrap_or_else(|| lists.empty())
    }

    pub fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        self.object_shapes
            .read()
            .expect("object_shapes lock poisoned")
            .get(id.0)
            .unwrap_or_default()
    }

    pub fn function_shape(&self, id: FunctionShapeId) -> Arc<FunctionShape> {
        self.function_shapes
            .read()
            .expect("function_shapes lock poisoned")
            .get(id.0)
            .unwrap_or_else(|| Arc::new(FunctionShape::new(Vec::new(), TypeId::ERROR)))
    }

    /// Intern a type key and return its TypeId.
    /// If the key already exists, returns the existing TypeId.
    pub fn intern(&self, key: TypeData) -> TypeId {
        if let Some(id) = Self::get_intrinsic_id(&key) {
            return id;
        }

        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let shard_idx = (hasher.finish() as usize) & (SHARD_COUNT - 1);
        let shard = &self.shards[shard_idx];

        {
            let map = shard
                .key_to_index
                .read()
                .expect("shard key_to_index lock poisoned");
            if let Some(&local_index) = map.get(&key) {
                return Self::make_id(local_index, shard_idx as u32);
            }
        }

        let mut map = shard
            .key_to_index
            .write()
            .expect("shard key_to_index lock poisoned");
        let mut storage = shard
            .index_to_key
            .write()
            .expect("shard index_to_key lock poisoned");

        if let Some(&local_index) = map.get(&key) {
            return Self::make_id(local_index, shard_idx as u32);
        }

        let local_index = storage.len() as u32;
        if local_index > ((u32::MAX - TypeId::FIRST_USER) >> SHARD_BITS) {
            return TypeId::ERROR;
        }

        let order = self.next_order.fetch_add(1, Ordering::Relaxed);
        storage.push((key.clone(), order));
        map.insert(key, local_index);
        Self::make_id(local_index, shard_idx as u32)
    }

    /// Look up the TypeData for a given TypeId. Bound lazy references
    /// resolve to their target; an unbound one is returned as `Lazy`.
    pub fn lookup(&self, id: TypeId) -> Option<TypeData> {
        let data = self.lookup_raw(id)?;
        if !matches!(data, TypeData::Lazy(_)) {
            return Some(data);
        }
        let resolved = self.resolve_lazy(id);
        if resolved == id {
            Some(data)
        } else {
            self.lookup_raw(resolved)
        }
    }

    fn lookup_raw(&self, id: TypeId) -> Option<TypeData> {
        if id.is_error() || id == TypeId::NONE {
            return Some(TypeData::Error);
        }
        if id.is_intrinsic() {
            return IntrinsicKind::from_type_id(id).map(TypeData::Intrinsic);
        }
        self.with_entry(id, |(data, _)| data.clone())
    }

    fn with_entry<R>(&self, id: TypeId, f: impl FnOnce(&(TypeData, u32)) -> R) -> Option<R> {
        let raw_val = id.0.checked_sub(TypeId::FIRST_USER)?;
        let shard_idx = (raw_val & SHARD_MASK) as usize;
        let local_index = raw_val >> SHARD_BITS;

        let shard = self.shards.get(shard_idx)?;
        let storage = shard
            .index_to_key
            .read()
            .expect("shard index_to_key lock poisoned");
        storage.get(local_index as usize).map(f)
    }

    /// Position of `id` in interning order. Intrinsics come first, in id
    /// order.
    pub fn creation_order(&self, id: TypeId) -> u32 {
        if id.0 < TypeId::FIRST_USER {
            return id.0;
        }
        self.with_entry(id, |(_, order)| *order).unwrap_or(u32::MAX)
    }

    // =========================================================================
    // Lazy declaration references
    // =========================================================================

    /// A fresh, unbound reference to the declaration `name`.
    pub fn lazy(&self, name: Atom) -> TypeId {
        let def = {
            let mut defs = self.defs.write().expect("defs lock poisoned");
            defs.push(LazyDef { name, target: None });
            DefId(defs.len() as u32 - 1)
        };
        self.intern(TypeData::Lazy(def))
    }

    /// Bind a lazy reference to the type its declaration lowered to. A
    /// binding that would lead back to `lazy` itself binds to `error`.
    pub fn bind_lazy(&self, lazy: TypeId, target: TypeId) {
        let Some(TypeData::Lazy(def)) = self.lookup_raw(lazy) else {
            return;
        };
        let target = if self.resolve_lazy(target) == lazy {
            TypeId::ERROR
        } else {
            target
        };
        let mut defs = self.defs.write().expect("defs lock poisoned");
        if let Some(entry) = defs.get_mut(def.0 as usize) {
            entry.target = Some(target);
        }
    }

    /// Follow lazy bindings from `id`. Returns `id` itself when it is not
    /// a lazy reference or is still unbound.
    pub fn resolve_lazy(&self, id: TypeId) -> TypeId {
        let mut current = id;
        for _ in 0..MAX_ALIAS_RESOLUTION_DEPTH {
            match self.lazy_target(current) {
                Some(next) => current = next,
                None => return current,
            }
        }
        TypeId::ERROR
    }

    fn lazy_target(&self, id: TypeId) -> Option<TypeId> {
        let Some(TypeData::Lazy(def)) = self.lookup_raw(id) else {
            return None;
        };
        let defs = self.defs.read().expect("defs lock poisoned");
        defs.get(def.0 as usize).and_then(|entry| entry.target)
    }

    /// The declaration name behind a lazy reference.
    pub fn lazy_name(&self, id: TypeId) -> Option<Atom> {
        let Some(TypeData::Lazy(def)) = self.lookup_raw(id) else {
            return None;
        };
        let defs = self.defs.read().expect("defs lock poisoned");
        defs.get(def.0 as usize).map(|entry| entry.name)
    }

    fn intern_type_list(&self, members: Vec<TypeId>) -> TypeListId {
        let mut lists = self.type_lists.write().expect("type_lists lock poisoned");
        TypeListId(lists.intern(members))
    }

    fn intern_tuple_list(&self, elements: Vec<TupleElement>) -> TupleListId {
        let mut lists = self.tuple_lists.write().expect("tuple_lists lock poisoned");
        TupleListId(lists.intern(elements))
    }

    fn intern_object_shape(&self, shape: ObjectShape) -> ObjectShapeId {
        let mut shapes = self.object_shapes.write().expect("object_shapes lock poisoned");
        ObjectShapeId(shapes.intern(shape))
    }

    fn intern_function_shape(&self, shape: FunctionShape) -> FunctionShapeId {
        let mut shapes = self
            .function_shapes
            .write()
            .expect("function_shapes lock poisoned");
        FunctionShapeId(shapes.intern(shape))
    }

    /// Number of interned types, intrinsics included.
    pub fn len(&self) -> usize {
        let mut total = TypeId::FIRST_USER as usize;
        for shard in &self.shards {
            total += shard
                .index_to_key
                .read()
                .expect("shard index_to_key lock poisoned")
                .len();
        }
        total
    }

    /// Check if the interner only holds intrinsics
    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_USER as usize
    }

    #[inline]
    fn make_id(local_index: u32, shard_idx: u32) -> TypeId {
        let raw_val = (local_index << SHARD_BITS) | (shard_idx & SHARD_MASK);
        TypeId(TypeId::FIRST_USER + raw_val)
    }

    fn get_intrinsic_id(key: &TypeData) -> Option<TypeId> {
        match key {
            TypeData::Intrinsic(kind) => Some(kind.to_type_id()),
            TypeData::Error => Some(TypeId::ERROR),
            _ => None,
        }
    }

    // =========================================================================
    // Convenience methods for common type constructions
    // =========================================================================

    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeData::Literal(LiteralValue::String(atom)))
    }

    pub fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Number(OrderedFloat(value))))
    }

    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(TypeData::Literal(LiteralValue::Boolean(value)))
    }

    /// `value` is the decimal digits, optionally `-` prefixed, without the `n`.
    pub fn literal_bigint(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeData::Literal(LiteralValue::BigInt(atom)))
    }

    /// Intern a union type, normalizing and deduplicating members
    pub fn union(&self, members: Vec<TypeId>) -> TypeId {
        self.union_from_iter(members)
    }

    /// Fast path for unions that already fit in registers.
    pub fn union2(&self, left: TypeId, right: TypeId) -> TypeId {
        self.union_from_iter([left, right])
    }

    fn union_from_iter<I>(&self, members: I) -> TypeId
    where
        I: IntoIterator<Item = TypeId>,
    {
        let mut iter = members.into_iter();
        let Some(first) = iter.next() else {
            return TypeId::NEVER;
        };
        let Some(second) = iter.next() else {
            return first;
        };

        let mut flat: TypeListBuffer = SmallVec::new();
        self.push_union_member(&mut flat, first);
        self.push_union_member(&mut flat, second);
        for member in iter {
            self.push_union_member(&mut flat, member);
        }

        self.normalize_union(flat)
    }

    fn push_union_member(&self, flat: &mut TypeListBuffer, member: TypeId) {
        if let Some(TypeData::Union(inner)) = self.lookup(member) {
            let members = self.type_list(inner);
            flat.extend(members.iter().copied());
        } else {
            flat.push(member);
        }
    }

    fn normalize_union(&self, mut flat: TypeListBuffer) -> TypeId {
        // Deduplicate and sort for consistent hashing
        flat.sort_by_cached_key(|id| self.creation_order(*id));
        flat.dedup();

        if flat.contains(&TypeId::ERROR) {
            return TypeId::ERROR;
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        flat.retain(|id| *id != TypeId::NEVER);

        // e.g., "a" | string | number => string | number
        // e.g., true | false => boolean
        self.absorb_literals_into_primitives(&mut flat);

        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let list_id = self.intern_type_list(flat.into_vec());
                self.intern(TypeData::Union(list_id))
            }
        }
    }

    fn absorb_literals_into_primitives(&self, flat: &mut TypeListBuffer) {
        let true_id = self.literal_boolean(true);
        let false_id = self.literal_boolean(false);
        if flat.contains(&true_id) && flat.contains(&false_id) {
            flat.retain(|id| *id != true_id && *id != false_id);
            if let Err(pos) =
                flat.binary_search_by_key(&TypeId::BOOLEAN.0, |id| self.creation_order(*id))
            {
                flat.insert(pos, TypeId::BOOLEAN);
            }
        }

        let has = |id: TypeId| flat.contains(&id);
        let (has_string, has_number, has_bigint, has_boolean) = (
            has(TypeId::STRING),
            has(TypeId::NUMBER),
            has(TypeId::BIGINT),
            has(TypeId::BOOLEAN),
        );
        if !(has_string || has_number || has_bigint || has_boolean) {
            return;
        }

        flat.retain(|id| match self.lookup(*id) {
            Some(TypeData::Literal(literal)) => match literal {
                LiteralValue::String(_) => !has_string,
                LiteralValue::Number(_) => !has_number,
                LiteralValue::BigInt(_) => !has_bigint,
                LiteralValue::Boolean(_) => !has_boolean,
            },
            _ => true,
        });
    }

    /// Intersect two types.
    ///
    /// Identical types collapse, object shapes merge, a subtype wins over its
    /// supertype, disjoint types reduce to `never`, and `ThisType<T>` markers
    /// set the `this` type of the other side's methods. Anything else is kept
    /// as an intersection.
    pub fn intersection2(&self, left: TypeId, right: TypeId) -> TypeId {
        if left == right {
            return left;
        }
        if left.is_error() || right.is_error() {
            return TypeId::ERROR;
        }
        if left == TypeId::NEVER || right == TypeId::NEVER {
            return TypeId::NEVER;
        }
        if left == TypeId::ANY || right == TypeId::ANY {
            return TypeId::ANY;
        }
        if left == TypeId::UNKNOWN {
            return right;
        }
        if right == TypeId::UNKNOWN {
            return left;
        }

        // Distribute over unions: (A | B) & C = (A & C) | (B & C)
        if let Some(TypeData::Union(list)) = self.lookup(left) {
            let members = self.type_list(list);
            return self.union(
                members
                    .iter()
                    .map(|&member| self.intersection2(member, right))
                    .collect(),
            );
        }
        if let Some(TypeData::Union(list)) = self.lookup(right) {
            let members = self.type_list(list);
            return self.union(
                members
                    .iter()
                    .map(|&member| self.intersection2(left, member))
                    .collect(),
            );
        }

        match (self.lookup(left), self.lookup(right)) {
            (Some(TypeData::Object(shape_id)), Some(TypeData::ThisType(this_type)))
            | (Some(TypeData::ThisType(this_type)), Some(TypeData::Object(shape_id))) => {
                return self.apply_this_type(shape_id, this_type);
            }
            (Some(TypeData::Object(a)), Some(TypeData::Object(b))) => {
                return self.merge_object_shapes(a, b);
            }
            _ => {}
        }

        if crate::subtype::is_subtype_of(self, left, right) {
            return left;
        }
        if crate::subtype::is_subtype_of(self, right, left) {
            return right;
        }
        if !crate::subtype::are_types_overlapping(self, left, right) {
            return TypeId::NEVER;
        }

        self.intersection_of(left, right)
    }

    fn intersection_of(&self, left: TypeId, right: TypeId) -> TypeId {
        let mut members = vec![left, right];
        members.sort_by_cached_key(|id| self.creation_order(*id));
        let list_id = self.intern_type_list(members);
        self.intern(TypeData::Intersection(list_id))
    }

    /// Property types that reference declarations are compared, not merged,
    /// so intersecting recursive declarations terminates.
    fn intersect_property(&self, left: TypeId, right: TypeId) -> TypeId {
        if left == right {
            return left;
        }
        if self.lazy_name(left).is_none() && self.lazy_name(right).is_none() {
            return self.intersection2(left, right);
        }
        if crate::subtype::is_subtype_of(self, left, right) {
            left
        } else if crate::subtype::is_subtype_of(self, right, left) {
            right
        } else {
            self.intersection_of(left, right)
        }
    }

    fn merge_object_shapes(&self, a: ObjectShapeId, b: ObjectShapeId) -> TypeId {
        let left = self.object_shape(a);
        let right = self.object_shape(b);
        let mut properties = left.properties.clone();
        for prop in &right.properties {
            match properties.iter_mut().find(|p| p.name == prop.name) {
                Some(existing) => {
                    existing.type_id = self.intersect_property(existing.type_id, prop.type_id);
                    let optional = existing.is_optional() && prop.is_optional();
                    existing.flags.set(PropertyFlags::OPTIONAL, optional);
                    let readonly = existing.is_readonly() && prop.is_readonly();
                    existing.flags.set(PropertyFlags::READONLY, readonly);
                }
                None => properties.push(prop.clone()),
            }
        }
        let (name, nominal) = if left.nominal {
            (left.name, true)
        } else if right.nominal {
            (right.name, true)
        } else {
            (None, false)
        };
        self.object_with_shape(ObjectShape {
            properties,
            name,
            nominal,
        })
    }

    /// Set the `this` type of every method of an object shape.
    fn apply_this_type(&self, shape_id: ObjectShapeId, this_type: TypeId) -> TypeId {
        let shape = self.object_shape(shape_id);
        let mut properties = shape.properties.clone();
        for prop in &mut properties {
            if let Some(TypeData::Function(fn_id)) = self.lookup(prop.type_id) {
                let mut func = (*self.function_shape(fn_id)).clone();
                if func.this_type.is_none() {
                    func.this_type = Some(this_type);
                    prop.type_id = self.function(func);
                }
            }
        }
        self.object_with_shape(ObjectShape {
            properties,
            name: None,
            nominal: false,
        })
    }

    /// Anonymous object type. A later property with the same name replaces
    /// an earlier one.
    pub fn object(&self, properties: Vec<PropertyInfo>) -> TypeId {
        self.object_with_shape(ObjectShape::anonymous(properties))
    }

    pub fn object_with_shape(&self, mut shape: ObjectShape) -> TypeId {
        let mut deduped: Vec<PropertyInfo> = Vec::with_capacity(shape.properties.len());
        for prop in shape.properties.drain(..) {
            match deduped.iter_mut().find(|p| p.name == prop.name) {
                Some(existing) => *existing = prop,
                None => deduped.push(prop),
            }
        }
        shape.properties = deduped;
        let shape_id = self.intern_object_shape(shape);
        self.intern(TypeData::Object(shape_id))
    }

    pub fn function(&self, shape: FunctionShape) -> TypeId {
        let shape_id = self.intern_function_shape(shape);
        self.intern(TypeData::Function(shape_id))
    }

    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::Array(element))
    }

    pub fn readonly_array(&self, element: TypeId) -> TypeId {
        self.intern(TypeData::ReadonlyArray(element))
    }

    pub fn tuple(&self, elements: Vec<TupleElement>) -> TypeId {
        let list = self.intern_tuple_list(elements);
        self.intern(TypeData::Tuple {
            elements: list,
            readonly: false,
        })
    }

    pub fn readonly_tuple(&self, elements: Vec<TupleElement>) -> TypeId {
        let list = self.intern_tuple_list(elements);
        self.intern(TypeData::Tuple {
            elements: list,
            readonly: true,
        })
    }

    pub fn promise(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::Promise(inner))
    }

    pub fn type_param(&self, info: TypeParamInfo) -> TypeId {
        self.intern(TypeData::TypeParameter(info))
    }

    pub fn no_infer(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::NoInfer(inner))
    }

    pub fn this_type_marker(&self, inner: TypeId) -> TypeId {
        self.intern(TypeData::ThisType(inner))
    }
}
