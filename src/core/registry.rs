//! Type identity registry
//!
//! Maps a native type's identity (`TypeId`) to a human-readable display name.
//! Names only feed diagnostics and signatures, never dispatch decisions.
//! One registry is owned by each interpreter; it is seeded with the primitive
//! names on first use and lives until the interpreter is dropped.

use crate::core::value::Value;
use dashmap::DashMap;
use once_cell::unsync::OnceCell;
use std::any::{type_name, TypeId};
use std::fmt;
use tracing::{debug, trace};

/// Compatibility predicate of a native type
pub type CompatFn = fn(&Value) -> bool;

/// Identity key of a native type plus what the checker needs to know about it
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    rust_name: &'static str,
    compatible: CompatFn,
}

impl TypeDescriptor {
    pub const fn new(id: TypeId, rust_name: &'static str, compatible: CompatFn) -> Self {
        Self { id, rust_name, compatible }
    }

    /// Descriptor for a type with no compatibility predicate of its own
    #[cfg(test)]
    pub(crate) fn opaque<T: 'static>() -> Self {
        Self::new(TypeId::of::<T>(), type_name::<T>(), |_| false)
    }

    #[inline]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    pub fn rust_name(&self) -> &'static str {
        self.rust_name
    }

    #[inline]
    pub fn accepts(&self, value: &Value) -> bool {
        (self.compatible)(value)
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TypeDescriptor").field(&self.rust_name).finish()
    }
}

/// Display names of native types, keyed by type identity
pub struct TypeNames {
    names: OnceCell<DashMap<TypeId, String>>,
}

impl TypeNames {
    /// Create an empty registry; seeding happens on first access
    pub fn new() -> Self {
        Self { names: OnceCell::new() }
    }

    fn table(&self) -> &DashMap<TypeId, String> {
        self.names.get_or_init(|| {
            let table = DashMap::with_capacity(32);
            seed_primitives(&table);
            debug!(target: "registry", entries = table.len(), "type name registry initialized");
            table
        })
    }

    /// Insert or overwrite the display name of a type identity
    pub fn register_name(&self, id: TypeId, display_name: impl Into<String>) {
        let display_name = display_name.into();
        trace!(target: "registry", name = %display_name, "registering type name");
        self.table().insert(id, display_name);
    }

    pub fn register<T: 'static>(&self, display_name: impl Into<String>) {
        self.register_name(TypeId::of::<T>(), display_name);
    }

    /// Registered name of the descriptor's type, or a shortened Rust name
    pub fn lookup(&self, descriptor: &TypeDescriptor) -> String {
        self.lookup_id(descriptor.id(), descriptor.rust_name())
    }

    pub fn lookup_id(&self, id: TypeId, fallback: &str) -> String {
        match self.table().get(&id) {
            Some(name) => name.clone(),
            None => short_type_name(fallback),
        }
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.table().contains_key(&id)
    }

    pub fn is_initialized(&self) -> bool {
        self.names.get().is_some()
    }

    pub fn len(&self) -> usize {
        self.table().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TypeNames {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TypeNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeNames")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

fn seed_primitives(table: &DashMap<TypeId, String>) {
    let seeds: [(TypeId, &str); 16] = [
        (TypeId::of::<()>(), "void"),
        (TypeId::of::<bool>(), "bool"),
        (TypeId::of::<i8>(), "signed char"),
        (TypeId::of::<i16>(), "short"),
        (TypeId::of::<i32>(), "int"),
        (TypeId::of::<i64>(), "long"),
        (TypeId::of::<isize>(), "ssize"),
        (TypeId::of::<u8>(), "unsigned char"),
        (TypeId::of::<u16>(), "unsigned short"),
        (TypeId::of::<u32>(), "unsigned"),
        (TypeId::of::<u64>(), "unsigned long"),
        (TypeId::of::<usize>(), "size"),
        (TypeId::of::<f32>(), "float"),
        (TypeId::of::<f64>(), "double"),
        (TypeId::of::<String>(), "string"),
        (TypeId::of::<Value>(), "object"),
    ];

    for (id, name) in seeds {
        table.insert(id, name.to_string());
    }
}

/// Strip module paths from a Rust type name, keeping generic structure:
/// `alloc::vec::Vec<my::Point>` becomes `Vec<Point>`
pub fn short_type_name(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;
    let mut chars = full.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                out.truncate(segment_start);
            }
            c if c.is_alphanumeric() || c == '_' => out.push(c),
            c => {
                out.push(c);
                segment_start = out.len();
            }
        }
    }

    out
}
