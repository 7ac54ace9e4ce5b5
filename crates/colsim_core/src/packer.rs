//! Packing primitives: reusable building blocks for strategies.

use std::collections::HashSet;

use colsim_model::{Field, ShapeId, COLUMN_BITS};

use crate::error::{SimError, SimResult};
use crate::strategy::RecordProcessor;

/// Greedy, order-preserving field-to-column bin packing.
///
/// Fields are placed in the order presented (callers choose the order,
/// e.g. ascending by size). When a field would push the current column
/// past 32 bits, a fresh column is opened first. Packing never reorders
/// the caller's sequence; it only assigns columns.
#[derive(Debug, Default)]
pub struct FieldPacker {
    column: usize,
    bits_used: u32,
    fields: Vec<Field>,
    packed: HashSet<usize>,
}

impl FieldPacker {
    /// Creates an empty packer positioned at column 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Packs the given field, opening a new column if needed.
    ///
    /// Packing the same field instance (by `index` identity) twice is a
    /// bug in the calling strategy and fails with
    /// [`SimError::FieldAlreadyPacked`].
    pub fn pack(&mut self, field: &Field) -> SimResult<()> {
        if !self.packed.insert(field.index) {
            return Err(SimError::FieldAlreadyPacked {
                name: field.name.clone(),
                index: field.index,
            });
        }
        if !self.fits_in_current_column(field) {
            self.column += 1;
            self.bits_used = 0;
        }
        self.bits_used += field.size;
        self.fields.push(field.with_column(self.column));
        Ok(())
    }

    /// Checks whether packing the field would stay within the current
    /// column's 32-bit budget.
    #[must_use]
    pub fn fits_in_current_column(&self, field: &Field) -> bool {
        field.size + self.bits_used <= COLUMN_BITS
    }

    /// Checks whether the field has already been packed.
    #[must_use]
    pub fn is_packed(&self, field: &Field) -> bool {
        self.packed.contains(&field.index)
    }

    /// Forces a new column if the current one has at least one bit
    /// occupied. Lets callers partition fields manually.
    pub fn new_column(&mut self) {
        if self.bits_used > 0 {
            self.column += 1;
            self.bits_used = 0;
        }
    }

    /// Returns the fields packed so far, in packing order.
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Consumes the packer into its packed field list.
    #[must_use]
    pub fn into_fields(self) -> Vec<Field> {
        self.fields
    }
}

/// Fixed-capacity segment filler.
///
/// Holds one open buffer of the configured capacity; appends close and
/// reopen it transparently when full. An explicit [`flush`](Self::flush)
/// closes the open buffer early, truncated to the entries actually
/// written, and opens nothing until the next append. Closed segments
/// accumulate in an ordered list.
#[derive(Debug)]
pub struct RecordPacker {
    segments: Vec<Vec<ShapeId>>,
    current: Option<Vec<ShapeId>>,
    capacity: usize,
}

impl RecordPacker {
    /// Creates a packer producing segments of up to `capacity` rows.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            segments: Vec::new(),
            current: None,
            capacity,
        }
    }

    /// Closes the currently open buffer, if any. A flush with no open
    /// buffer is a no-op.
    pub fn flush(&mut self) {
        if let Some(current) = self.current.take() {
            self.segments.push(current);
        }
    }

    /// Returns the closed segments so far.
    #[must_use]
    pub fn segments(&self) -> &[Vec<ShapeId>] {
        &self.segments
    }

    /// Consumes the packer into its closed segments. Flush first: an
    /// open buffer is dropped, not published.
    #[must_use]
    pub fn into_segments(self) -> Vec<Vec<ShapeId>> {
        self.segments
    }
}

impl RecordProcessor for RecordPacker {
    fn process_record(&mut self, shape: ShapeId) {
        match self.current.as_mut() {
            Some(buf) if buf.len() < self.capacity => buf.push(shape),
            _ => {
                self.flush();
                let mut buf = Vec::with_capacity(self.capacity);
                buf.push(shape);
                self.current = Some(buf);
            }
        }
    }
}

/// Routes each incoming shape id to one of N independent
/// [`RecordPacker`]s.
///
/// Several shape ids may share one packer; distinct packers are stored
/// exactly once and addressed through a routing table, so a flush
/// reaches each underlying packer exactly once and segment collection
/// concatenates each packer's output exactly once, in packer order.
#[derive(Debug)]
pub struct MultiplexingPacker {
    packers: Vec<RecordPacker>,
    routes: Vec<usize>,
}

impl MultiplexingPacker {
    /// Creates a multiplexing packer.
    ///
    /// `routes` maps each shape id to an index into `packers` and must
    /// cover every shape id that will be processed.
    pub fn new(packers: Vec<RecordPacker>, routes: Vec<usize>) -> SimResult<Self> {
        for (shape, &route) in routes.iter().enumerate() {
            if route >= packers.len() {
                return Err(SimError::RouteOutOfRange {
                    shape: ShapeId::new(shape as u32),
                    route,
                    packers: packers.len(),
                });
            }
        }
        Ok(Self { packers, routes })
    }

    /// Flushes each underlying packer exactly once.
    pub fn flush(&mut self) {
        for packer in &mut self.packers {
            packer.flush();
        }
    }

    /// Consumes the packer into every underlying packer's segments,
    /// concatenated in packer order.
    #[must_use]
    pub fn into_segments(self) -> Vec<Vec<ShapeId>> {
        self.packers
            .into_iter()
            .flat_map(RecordPacker::into_segments)
            .collect()
    }
}

impl RecordProcessor for MultiplexingPacker {
    /// Routes the row to its packer.
    ///
    /// # Panics
    ///
    /// Panics if the shape id is not covered by the routing table.
    fn process_record(&mut self, shape: ShapeId) {
        let route = self.routes[shape.as_usize()];
        self.packers[route].process_record(shape);
    }
}
