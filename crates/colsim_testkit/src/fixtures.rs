//! Snapshot fixtures and builders.

use colsim_model::{Bitmap, DatasetLayout, Field, ShapeId, ShapeTable};

/// Builds a field, panicking on invalid widths.
#[must_use]
pub fn field(name: &str, size: u32, column: usize, index: usize) -> Field {
    Field::new(name, size, column, index).expect("fixture field is valid")
}

/// Builds a field-presence bitmap from field indices.
#[must_use]
pub fn shape(indices: &[u32]) -> Bitmap {
    Bitmap::of(indices)
}

/// Converts raw ids into a segment row vector.
#[must_use]
pub fn rows(ids: &[u32]) -> Vec<ShapeId> {
    ids.iter().copied().map(ShapeId::new).collect()
}

/// Builds a validated dataset snapshot.
#[must_use]
pub fn dataset(fields: Vec<Field>, shapes: Vec<Bitmap>, segments: Vec<Vec<u32>>) -> DatasetLayout {
    DatasetLayout::new(
        fields,
        ShapeTable::new(shapes),
        segments.iter().map(|s| rows(s)).collect(),
    )
    .expect("fixture snapshot is valid")
}

/// The two-field scenario: A(10 bits) and B(5 bits), shape 1 = {A},
/// shape 2 = {B}, one ground segment `[1, 2, 1]`.
#[must_use]
pub fn two_field_scenario() -> DatasetLayout {
    dataset(
        vec![field("a", 10, 0, 0), field("b", 5, 1, 1)],
        vec![Bitmap::new(), shape(&[0]), shape(&[1])],
        vec![vec![1, 2, 1]],
    )
}

/// A mixed snapshot: six fields of varying widths over five shapes,
/// with empty rows sprinkled in, split across three ground segments.
#[must_use]
pub fn mixed_dataset() -> DatasetLayout {
    dataset(
        vec![
            field("rating", 4, 0, 0),
            field("nps", 7, 0, 1),
            field("region", 12, 1, 2),
            field("channel", 3, 1, 3),
            field("flags", 32, 2, 4),
            field("age", 8, 3, 5),
        ],
        vec![
            Bitmap::new(),
            shape(&[0, 1]),
            shape(&[0, 2, 3]),
            shape(&[4]),
            shape(&[0, 1, 2, 3, 5]),
        ],
        vec![
            vec![1, 1, 2, 0, 3],
            vec![4, 4, 1, 2],
            vec![3, 0, 0, 4, 1, 2, 1],
        ],
    )
}

/// Builds a snapshot with `shape_count` shapes (shape 0 empty, each
/// other shape using exactly one field) and `row_count` rows striped
/// across the shapes in 500-row ground segments.
#[must_use]
pub fn dataset_with_rows(shape_count: usize, row_count: usize) -> DatasetLayout {
    assert!(shape_count >= 2, "need at least one non-empty shape");

    let fields = (0..shape_count - 1)
        .map(|i| field(&format!("f{i}"), (i % 32) as u32 + 1, i, i))
        .collect();
    let shapes = std::iter::once(Bitmap::new())
        .chain((0..shape_count - 1).map(|i| shape(&[i as u32])))
        .collect();

    let ids: Vec<u32> = (0..row_count).map(|r| (r % shape_count) as u32).collect();
    let segments = ids.chunks(500).map(<[u32]>::to_vec).collect();

    dataset(fields, shapes, segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_validate() {
        assert_eq!(two_field_scenario().row_count(), 3);
        assert_eq!(mixed_dataset().row_count(), 16);

        let big = dataset_with_rows(4, 2000);
        assert_eq!(big.row_count(), 2000);
        assert_eq!(big.segments.len(), 4);
        assert_eq!(big.shapes.len(), 4);
    }
}
