//! Spatial bucketing for fast neighbor queries over continuous coordinates.

/// Uniform bucket grid storing entity indices by position
#[derive(Clone, Debug)]
pub struct SpatialIndex {
    bucket_size: f32,
    cols: usize,
    rows: usize,
    /// buckets[row * cols + col] contains indices of entities in that bucket
    buckets: Vec<Vec<usize>>,
}

impl SpatialIndex {
    /// Create an index covering `width` x `height` with square buckets
    pub fn new(width: f32, height: f32, bucket_size: f32) -> Self {
        let bucket_size = bucket_size.max(1.0);
        let cols = ((width / bucket_size).ceil() as usize).max(1);
        let rows = ((height / bucket_size).ceil() as usize).max(1);
        Self {
            bucket_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
        }
    }

    /// Clear all entries
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
    }

    #[inline]
    fn bucket_of(&self, x: f32, y: f32) -> (usize, usize) {
        let col = (x / self.bucket_size).floor().max(0.0) as usize;
        let row = (y / self.bucket_size).floor().max(0.0) as usize;
        (col.min(self.cols - 1), row.min(self.rows - 1))
    }

    /// Insert an entity index at the given position. Non-finite positions are ignored.
    #[inline]
    pub fn insert(&mut self, x: f32, y: f32, idx: usize) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        let (col, row) = self.bucket_of(x, y);
        self.buckets[row * self.cols + col].push(idx);
    }

    /// Rebuild from a sequence of positions, indexed by iteration order
    pub fn rebuild<I: IntoIterator<Item = (f32, f32)>>(&mut self, positions: I) {
        self.clear();
        for (idx, (x, y)) in positions.into_iter().enumerate() {
            self.insert(x, y, idx);
        }
    }

    /// Indices in every bucket overlapping the square around (x, y).
    /// Callers filter by exact distance.
    pub fn query_radius(&self, x: f32, y: f32, radius: f32) -> Vec<usize> {
        let mut results = Vec::new();
        if !(x.is_finite() && y.is_finite()) {
            return results;
        }

        let (col_min, row_min) = self.bucket_of(x - radius, y - radius);
        let (col_max, row_max) = self.bucket_of(x + radius, y + radius);

        for row in row_min..=row_max {
            for col in col_min..=col_max {
                results.extend_from_slice(&self.buckets[row * self.cols + col]);
            }
        }

        results
    }

    /// Total number of indexed entries
    pub fn len(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }
}
