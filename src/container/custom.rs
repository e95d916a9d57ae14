//! Named custom attributes: type-erased per-element columns.
//!
//! Callers can attach arbitrarily typed per-element data under a string
//! name. Each column erases its element type behind a small vtable so the
//! registry can keep every column in lockstep with the container without
//! knowing the types; typed access re-checks the type and reports
//! mismatches as errors rather than panicking. Columns are value-initialized
//! eagerly: a slot never written reads as `T::default()`.
//!
//! Unlike the toggleable built-in attributes, a custom column exists from
//! registration until removal; there is no disabled state in between.

use crate::container::remap::{RemapTable, compact_column};
use crate::element::ElementKind;
use crate::mesh_error::MeshArenaError;
use hashbrown::HashMap;
use itertools::Itertools;
use std::any::{Any, TypeId, type_name};
use std::fmt;

/// Object-safe surface of one erased column.
trait ErasedColumn: Send + Sync {
    fn len(&self) -> usize;
    fn push_default(&mut self);
    fn resize_default(&mut self, len: usize);
    fn reserve(&mut self, additional: usize);
    fn compact(&mut self, remap: &RemapTable);
    fn clear(&mut self);
    fn append_defaults(&mut self, n: usize);
    /// Extends from a column of the same element type; `false` on mismatch.
    fn append_erased(&mut self, other: &dyn ErasedColumn) -> bool;
    /// A fresh default-filled column of the same element type.
    fn new_same_type(&self, len: usize) -> Box<dyn ErasedColumn>;
    fn clone_boxed(&self) -> Box<dyn ErasedColumn>;
    fn element_type(&self) -> TypeId;
    fn element_type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct TypedColumn<T> {
    values: Vec<T>,
}

impl<T: Clone + Default + Send + Sync + 'static> ErasedColumn for TypedColumn<T> {
    fn len(&self) -> usize {
        self.values.len()
    }

    fn push_default(&mut self) {
        self.values.push(T::default());
    }

    fn resize_default(&mut self, len: usize) {
        self.values.resize_with(len, T::default);
    }

    fn reserve(&mut self, additional: usize) {
        self.values.reserve(additional);
    }

    fn compact(&mut self, remap: &RemapTable) {
        compact_column(&mut self.values, remap);
    }

    fn clear(&mut self) {
        self.values.clear();
    }

    fn append_defaults(&mut self, n: usize) {
        self.values.resize_with(self.values.len() + n, T::default);
    }

    fn append_erased(&mut self, other: &dyn ErasedColumn) -> bool {
        match other.as_any().downcast_ref::<TypedColumn<T>>() {
            Some(src) => {
                self.values.extend_from_slice(&src.values);
                true
            }
            None => false,
        }
    }

    fn new_same_type(&self, len: usize) -> Box<dyn ErasedColumn> {
        Box::new(TypedColumn::<T> {
            values: std::iter::repeat_with(T::default).take(len).collect(),
        })
    }

    fn clone_boxed(&self) -> Box<dyn ErasedColumn> {
        Box::new(TypedColumn {
            values: self.values.clone(),
        })
    }

    fn element_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn element_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Registry of named custom attribute columns for one container.
///
/// Stored value types must be `Clone + Default + Send + Sync + 'static`;
/// the registry captures the type at registration and checks it on every
/// typed access.
pub struct CustomAttributes {
    kind: ElementKind,
    len: usize,
    columns: HashMap<String, Box<dyn ErasedColumn>>,
}

impl CustomAttributes {
    pub(crate) fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            len: 0,
            columns: HashMap::new(),
        }
    }

    /// Registers a new column under `name`, default-filled to the current
    /// container length.
    pub fn register<T>(&mut self, name: &str) -> Result<(), MeshArenaError>
    where
        T: Clone + Default + Send + Sync + 'static,
    {
        if self.columns.contains_key(name) {
            return Err(MeshArenaError::DuplicateCustomAttribute {
                kind: self.kind,
                name: name.to_owned(),
            });
        }
        let column = TypedColumn::<T> {
            values: std::iter::repeat_with(T::default).take(self.len).collect(),
        };
        self.columns.insert(name.to_owned(), Box::new(column));
        Ok(())
    }

    /// Removes the column under `name`, dropping its storage.
    pub fn remove(&mut self, name: &str) -> Result<(), MeshArenaError> {
        self.columns
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MeshArenaError::MissingCustomAttribute {
                kind: self.kind,
                name: name.to_owned(),
            })
    }

    /// Whether a column named `name` exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Whether a column named `name` exists and stores `T`.
    #[must_use]
    pub fn holds<T: 'static>(&self, name: &str) -> bool {
        self.columns
            .get(name)
            .is_some_and(|c| c.element_type() == TypeId::of::<T>())
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.columns.keys().cloned().sorted().collect()
    }

    /// Number of registered columns.
    #[must_use]
    pub fn attribute_count(&self) -> usize {
        self.columns.len()
    }

    fn lookup<T: 'static>(&self, name: &str) -> Result<&TypedColumn<T>, MeshArenaError> {
        let column =
            self.columns
                .get(name)
                .ok_or_else(|| MeshArenaError::MissingCustomAttribute {
                    kind: self.kind,
                    name: name.to_owned(),
                })?;
        column.as_any().downcast_ref::<TypedColumn<T>>().ok_or_else(|| {
            MeshArenaError::CustomAttributeType {
                kind: self.kind,
                name: name.to_owned(),
                stored: column.element_type_name(),
                requested: type_name::<T>(),
            }
        })
    }

    /// Typed read access to the whole column.
    pub fn column<T: 'static>(&self, name: &str) -> Result<&[T], MeshArenaError> {
        Ok(&self.lookup::<T>(name)?.values)
    }

    /// Typed write access to the whole column.
    pub fn column_mut<T: 'static>(&mut self, name: &str) -> Result<&mut [T], MeshArenaError> {
        // Split lookup so the error path can borrow immutably first.
        self.lookup::<T>(name)?;
        let column = self.columns.get_mut(name).expect("checked by lookup");
        Ok(&mut column
            .as_any_mut()
            .downcast_mut::<TypedColumn<T>>()
            .expect("checked by lookup")
            .values)
    }

    pub(crate) fn push(&mut self) {
        for column in self.columns.values_mut() {
            column.push_default();
        }
        self.len += 1;
    }

    pub(crate) fn resize(&mut self, len: usize) {
        for column in self.columns.values_mut() {
            column.resize_default(len);
        }
        self.len = len;
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        for column in self.columns.values_mut() {
            column.reserve(additional);
        }
    }

    pub(crate) fn compact(&mut self, remap: &RemapTable) {
        for column in self.columns.values_mut() {
            column.compact(remap);
        }
        self.len = remap.live_len();
    }

    /// Empties every column; registrations survive.
    pub(crate) fn clear(&mut self) {
        for column in self.columns.values_mut() {
            column.clear();
        }
        self.len = 0;
    }

    /// Registers, default-filled at `len`, every column `other` has that
    /// this registry lacks. Existing columns are left as they are, even on
    /// type disagreement.
    pub(crate) fn register_same_as(&mut self, other: &Self, len: usize) {
        for (name, column) in &other.columns {
            if !self.columns.contains_key(name) {
                self.columns.insert(name.clone(), column.new_same_type(len));
            }
        }
    }

    /// Extends every column by `other`'s rows. Columns `other` lacks (or
    /// holds under a different type) extend with defaults; a type
    /// disagreement is tolerated and logged.
    pub(crate) fn append_from(&mut self, other: &Self, other_len: usize) {
        for (name, column) in &mut self.columns {
            match other.columns.get(name) {
                Some(src) => {
                    if !column.append_erased(src.as_ref()) {
                        log::warn!(
                            "custom {} attribute `{}`: source stores {}, keeping {} and filling defaults",
                            self.kind,
                            name,
                            src.element_type_name(),
                            column.element_type_name(),
                        );
                        column.append_defaults(other_len);
                    }
                }
                None => column.append_defaults(other_len),
            }
        }
        self.len += other_len;
    }

    pub(crate) fn validate_lengths(&self, expected: usize) -> Result<(), MeshArenaError> {
        for (name, column) in &self.columns {
            if column.len() != expected {
                return Err(MeshArenaError::ColumnLengthMismatch {
                    kind: self.kind,
                    column: name.clone(),
                    expected,
                    found: column.len(),
                });
            }
        }
        Ok(())
    }
}

impl Clone for CustomAttributes {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            len: self.len,
            columns: self
                .columns
                .iter()
                .map(|(name, column)| (name.clone(), column.clone_boxed()))
                .collect(),
        }
    }
}

/// Prints names, element types, and lengths; values stay opaque.
impl fmt::Debug for CustomAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for name in self.names() {
            let column = &self.columns[&name];
            map.entry(
                &name,
                &format_args!("{}[{}]", column.element_type_name(), column.len()),
            );
        }
        map.finish()
    }
}
