//! Named per-object attribute storage.
//!
//! A [`VariableStore`] holds one [`FieldArray`] per attribute, split into a
//! static and a dynamic namespace. Every array has exactly one row per
//! object; this is checked on every write.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::StoreError,
    field::FieldArray,
    types::{Field, Namespace, ObjectId},
};

/// Per-object attribute arrays keyed by [`Field`].
#[derive(Clone, Debug)]
pub struct VariableStore {
    object_count: usize,
    static_fields: BTreeMap<Field, FieldArray>,
    dynamic_fields: BTreeMap<Field, FieldArray>,
}

impl VariableStore {
    /// Creates an empty store for `object_count` objects.
    ///
    /// ### Returns
    /// The store, or [`StoreError::EmptyPopulation`] if `object_count` is zero.
    pub fn new(object_count: usize) -> Result<Self, StoreError> {
        if object_count == 0 {
            return Err(StoreError::EmptyPopulation);
        }
        Ok(Self {
            object_count,
            static_fields: BTreeMap::new(),
            dynamic_fields: BTreeMap::new(),
        })
    }

    /// Number of objects; every field has this many rows.
    #[inline]
    pub fn object_count(&self) -> usize {
        self.object_count
    }

    /// Writes `value` into `field` of the given namespace.
    ///
    /// Creates the field on first write and replaces it afterwards. The
    /// array is rejected with [`StoreError::ShapeMismatch`] if its row count
    /// is not the store's object count; the previous value is kept.
    pub fn set(
        &mut self,
        namespace: Namespace,
        field: Field,
        value: FieldArray,
    ) -> Result<(), StoreError> {
        if value.rows() != self.object_count {
            return Err(StoreError::ShapeMismatch {
                field,
                expected: self.object_count,
                actual: value.rows(),
            });
        }
        let map = self.namespace_mut(namespace);
        if map.insert(field, value).is_none() {
            debug!(%field, %namespace, "field created");
        }
        Ok(())
    }

    /// Reads `field` from the given namespace.
    pub fn get(&self, namespace: Namespace, field: Field) -> Result<&FieldArray, StoreError> {
        self.namespace(namespace)
            .get(&field)
            .ok_or(StoreError::UnknownField { field, namespace })
    }

    pub fn set_static(&mut self, field: Field, value: FieldArray) -> Result<(), StoreError> {
        self.set(Namespace::Static, field, value)
    }

    pub fn set_dynamic(&mut self, field: Field, value: FieldArray) -> Result<(), StoreError> {
        self.set(Namespace::Dynamic, field, value)
    }

    pub fn get_static(&self, field: Field) -> Result<&FieldArray, StoreError> {
        self.get(Namespace::Static, field)
    }

    pub fn get_dynamic(&self, field: Field) -> Result<&FieldArray, StoreError> {
        self.get(Namespace::Dynamic, field)
    }

    /// Mutable access to a dynamic field.
    ///
    /// Callers may change values in place but not the shape, since
    /// [`FieldArray`] has no resizing API.
    pub fn get_dynamic_mut(&mut self, field: Field) -> Result<&mut FieldArray, StoreError> {
        self.dynamic_fields
            .get_mut(&field)
            .ok_or(StoreError::UnknownField {
                field,
                namespace: Namespace::Dynamic,
            })
    }

    /// Mutable access to two different dynamic fields at once.
    ///
    /// ### Returns
    /// `(a, b)` in argument order, [`StoreError::AliasedField`] if `a == b`,
    /// or [`StoreError::UnknownField`] for the first missing field.
    pub fn get_dynamic_pair_mut(
        &mut self,
        a: Field,
        b: Field,
    ) -> Result<(&mut FieldArray, &mut FieldArray), StoreError> {
        if a == b {
            return Err(StoreError::AliasedField(a));
        }
        let mut first = None;
        let mut second = None;
        for (field, value) in self.dynamic_fields.iter_mut() {
            if *field == a {
                first = Some(value);
            } else if *field == b {
                second = Some(value);
            }
        }
        let missing = |field| StoreError::UnknownField {
            field,
            namespace: Namespace::Dynamic,
        };
        match (first, second) {
            (Some(first), Some(second)) => Ok((first, second)),
            (None, _) => Err(missing(a)),
            (_, None) => Err(missing(b)),
        }
    }

    /// Returns `true` if `field` has been written in `namespace`.
    pub fn contains(&self, namespace: Namespace, field: Field) -> bool {
        self.namespace(namespace).contains_key(&field)
    }

    /// All fields of a namespace, in sorted order.
    pub fn fields(&self, namespace: Namespace) -> impl Iterator<Item = Field> + '_ {
        self.namespace(namespace).keys().copied()
    }

    /// Sum of the column counts of all dynamic fields.
    pub fn control_variable_count(&self) -> usize {
        self.dynamic_fields.values().map(FieldArray::cols).sum()
    }

    /// Iterates over objects, yielding the requested dynamic fields' rows.
    ///
    /// All `fields` are looked up before anything is yielded, so an unknown
    /// name fails the call rather than the iteration. The iterator borrows
    /// the store; calling this again restarts from object 0.
    pub fn row_iter<'a>(&'a self, fields: &[Field]) -> Result<RowIter<'a>, StoreError> {
        let columns = fields
            .iter()
            .map(|&field| self.get_dynamic(field).map(|array| (field, array)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RowIter {
            columns,
            next: 0,
            end: self.object_count,
        })
    }

    fn namespace(&self, namespace: Namespace) -> &BTreeMap<Field, FieldArray> {
        match namespace {
            Namespace::Static => &self.static_fields,
            Namespace::Dynamic => &self.dynamic_fields,
        }
    }

    fn namespace_mut(&mut self, namespace: Namespace) -> &mut BTreeMap<Field, FieldArray> {
        match namespace {
            Namespace::Static => &mut self.static_fields,
            Namespace::Dynamic => &mut self.dynamic_fields,
        }
    }
}

/// One object's view over a selection of fields, produced by [`RowIter`].
#[derive(Clone, Debug)]
pub struct Row<'a> {
    index: ObjectId,
    values: Vec<(Field, &'a [f32])>,
}

impl<'a> Row<'a> {
    /// Index of the object this row belongs to.
    #[inline]
    pub fn index(&self) -> ObjectId {
        self.index
    }

    /// The row of `field`, if it was part of the selection.
    pub fn get(&self, field: Field) -> Option<&'a [f32]> {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|&(_, values)| values)
    }

    /// Selected fields in the order they were requested.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &'a [f32])> + '_ {
        self.values.iter().copied()
    }
}

/// Lazy per-object iterator returned by [`VariableStore::row_iter`].
#[derive(Clone, Debug)]
pub struct RowIter<'a> {
    columns: Vec<(Field, &'a FieldArray)>,
    next: usize,
    end: usize,
}

impl<'a> Iterator for RowIter<'a> {
    type Item = Row<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let values = self
            .columns
            .iter()
            .map(|&(field, array)| (field, array.row(index)))
            .collect();
        Some(Row { index, values })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RowIter<'_> {}
