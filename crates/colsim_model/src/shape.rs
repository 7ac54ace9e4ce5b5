//! Shape table: per-shape field-presence bitmaps.

use croaring::Bitmap;

use crate::field::{column_count, Field};
use crate::types::ShapeId;

/// The shape-id to field-presence table of a snapshot.
///
/// Entry `i` holds the bitmap of field indices present in shape `i`.
/// Entry 0 is the reserved empty shape. The table is constructed fully
/// up front and never patched afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeTable {
    shapes: Vec<Bitmap>,
}

impl ShapeTable {
    /// Creates a shape table from per-shape field-presence bitmaps.
    #[must_use]
    pub fn new(shapes: Vec<Bitmap>) -> Self {
        Self { shapes }
    }

    /// Returns the presence bitmap for the given shape.
    ///
    /// # Panics
    ///
    /// Panics if the shape id is outside the table. Snapshot validation
    /// guarantees replayed ids are in range.
    #[must_use]
    pub fn get(&self, shape: ShapeId) -> &Bitmap {
        &self.shapes[shape.as_usize()]
    }

    /// Returns the number of shapes, including the reserved empty shape.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    /// Checks whether the table has no shapes at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Iterates over the presence bitmaps in shape-id order.
    pub fn iter(&self) -> impl Iterator<Item = &Bitmap> {
        self.shapes.iter()
    }

    /// Returns the underlying bitmaps, indexed by shape id.
    #[must_use]
    pub fn bitmaps(&self) -> &[Bitmap] {
        &self.shapes
    }

    /// Projects each shape's field presence through the current
    /// field-to-column assignment and complements the result, producing
    /// one "columns guaranteed clear" bitmap per shape.
    ///
    /// A column is clear for a shape when no field stored in that column
    /// is present in the shape; segments built from rows with overlapping
    /// clear columns can share null vectors for them.
    #[must_use]
    pub fn clear_column_layouts(&self, fields: &[Field]) -> Vec<Bitmap> {
        let columns = column_count(fields) as u32;
        let mut column_of_index = vec![0usize; fields.len()];
        for field in fields {
            column_of_index[field.index] = field.column;
        }

        self.shapes
            .iter()
            .map(|layout| {
                let mut clear = Bitmap::new();
                clear.add_range(0..columns);
                for bit in layout.iter() {
                    clear.remove(column_of_index[bit as usize] as u32);
                }
                clear
            })
            .collect()
    }

    /// Returns how many columns two clear-column bitmaps have in common.
    #[must_use]
    pub fn common_clear_columns(a: &Bitmap, b: &Bitmap) -> u64 {
        a.and(b).cardinality()
    }
}
