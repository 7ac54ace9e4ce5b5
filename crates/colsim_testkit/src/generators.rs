//! Property-based test generators using proptest.
//!
//! All generated snapshots validate: shape 0 is empty, every shape bit
//! names a defined field, every segment row names a defined shape.

use colsim_model::{Bitmap, DatasetLayout, Field, ShapeTable};
use proptest::prelude::*;

use crate::fixtures::rows;

/// Strategy for valid field widths.
pub fn field_width_strategy() -> impl Strategy<Value = u32> {
    1u32..=32
}

/// Strategy for field lists of 1 to `max_fields` fields.
///
/// Each field starts in its own column, so the initial assignment never
/// violates the 32-bit budget regardless of widths.
pub fn field_list_strategy(max_fields: usize) -> impl Strategy<Value = Vec<Field>> {
    prop::collection::vec(field_width_strategy(), 1..=max_fields).prop_map(|sizes| {
        sizes
            .into_iter()
            .enumerate()
            .map(|(i, size)| {
                Field::new(format!("f{i}"), size, i, i).expect("generated width is valid")
            })
            .collect()
    })
}

/// Strategy for shape bitmap lists over `field_count` fields: the empty
/// shape at index 0 plus 1 to 6 arbitrary presence sets.
pub fn shape_list_strategy(field_count: usize) -> impl Strategy<Value = Vec<Bitmap>> {
    prop::collection::vec(
        prop::collection::btree_set(0..field_count as u32, 0..=field_count),
        1..=6,
    )
    .prop_map(|sets| {
        std::iter::once(Bitmap::new())
            .chain(
                sets.into_iter()
                    .map(|set| Bitmap::of(&set.into_iter().collect::<Vec<_>>())),
            )
            .collect()
    })
}

/// Strategy for complete, validated dataset snapshots.
pub fn dataset_strategy() -> impl Strategy<Value = DatasetLayout> {
    field_list_strategy(8)
        .prop_flat_map(|fields| {
            let field_count = fields.len();
            (Just(fields), shape_list_strategy(field_count))
        })
        .prop_flat_map(|(fields, shapes)| {
            let shape_count = shapes.len() as u32;
            (
                Just(fields),
                Just(shapes),
                prop::collection::vec(
                    prop::collection::vec(0..shape_count, 0..60),
                    1..=4,
                ),
            )
        })
        .prop_map(|(fields, shapes, segments)| {
            DatasetLayout::new(
                fields,
                ShapeTable::new(shapes),
                segments.iter().map(|s| rows(s)).collect(),
            )
            .expect("generated snapshot is valid")
        })
}
