//! Segment store: growable, capacity-capped row containers.

use colsim_model::ShapeId;

/// Hard cap on rows in a single segment.
pub const MAX_SEGMENT_SIZE: usize = 65536;

/// Initial segment capacity; grows by doubling up to [`MAX_SEGMENT_SIZE`].
const INITIAL_SEGMENT_CAPACITY: usize = 1024;

/// An ordered, append-only sequence of shape ids.
///
/// Backing storage starts at a small capacity and doubles on overflow up
/// to [`MAX_SEGMENT_SIZE`]; at the cap further appends are refused.
/// Refusal is a capacity signal, not a failure; callers open a new
/// segment and retry.
#[derive(Debug, Clone)]
pub struct Segment {
    data: Vec<ShapeId>,
    capacity: usize,
}

impl Segment {
    /// Creates an empty segment at the initial capacity.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: Vec::with_capacity(INITIAL_SEGMENT_CAPACITY),
            capacity: INITIAL_SEGMENT_CAPACITY,
        }
    }

    /// Attempts to append a row with the given shape.
    ///
    /// Returns `false` once the segment has reached [`MAX_SEGMENT_SIZE`];
    /// otherwise appends, growing the backing storage if needed.
    pub fn try_add(&mut self, shape: ShapeId) -> bool {
        if self.data.len() >= self.capacity {
            if self.capacity >= MAX_SEGMENT_SIZE {
                return false;
            }
            self.capacity = (self.capacity * 2).min(MAX_SEGMENT_SIZE);
            self.data.reserve(self.capacity - self.data.len());
        }
        self.data.push(shape);
        true
    }

    /// Returns the rows appended so far, in order.
    #[must_use]
    pub fn records(&self) -> &[ShapeId] {
        &self.data
    }

    /// Returns the number of appended rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Checks whether no rows have been appended.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the current backing capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterates over the appended rows.
    pub fn iter(&self) -> impl Iterator<Item = ShapeId> + '_ {
        self.data.iter().copied()
    }

    /// Consumes the segment into its row vector.
    #[must_use]
    pub fn into_rows(self) -> Vec<ShapeId> {
        self.data
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::new()
    }
}

/// An exclusively-owned, ordered list of [`Segment`]s.
///
/// Simple strategies without custom packing place rows here directly.
/// No segment is ever shared between owners.
#[derive(Debug, Clone, Default)]
pub struct DataSet {
    segments: Vec<Segment>,
}

impl DataSet {
    /// Creates an empty dataset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rows across all segments.
    #[must_use]
    pub fn total_record_count(&self) -> u64 {
        self.segments.iter().map(|s| s.len() as u64).sum()
    }

    /// Places a row in the first segment with room, opening a new
    /// segment when every existing one is at capacity.
    pub fn add_anywhere(&mut self, shape: ShapeId) {
        for segment in &mut self.segments {
            if segment.try_add(shape) {
                return;
            }
        }
        self.add_segment().try_add(shape);
    }

    /// Places a row in the last segment, opening a new segment when the
    /// last one is at capacity or none exists.
    pub fn add_to_last(&mut self, shape: ShapeId) {
        if let Some(last) = self.segments.last_mut() {
            if last.try_add(shape) {
                return;
            }
        }
        self.add_segment().try_add(shape);
    }

    /// Inserts a new empty segment at the given position, shifting
    /// later segments right.
    pub fn insert_segment_at(&mut self, index: usize) -> &mut Segment {
        self.segments.insert(index, Segment::new());
        &mut self.segments[index]
    }

    /// Appends a new empty segment.
    pub fn add_segment(&mut self) -> &mut Segment {
        self.segments.push(Segment::new());
        self.segments.last_mut().unwrap()
    }

    /// Returns the segment at the given index.
    #[must_use]
    pub fn segment(&self, index: usize) -> &Segment {
        &self.segments[index]
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Iterates over the segments in order.
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// Consumes the dataset into plain row vectors, one per segment.
    #[must_use]
    pub fn into_segments(self) -> Vec<Vec<ShapeId>> {
        self.segments.into_iter().map(Segment::into_rows).collect()
    }
}
