use std::time::Duration;

use serde::Serialize;

/// Statistics of a game session.
///
/// Tracks:
///
/// - **Locked pieces**: pieces committed into the field
/// - **Rows cleared**: total rows removed, and a histogram of how many rows each
///   lock removed
/// - **Speedups**: how many times the normal fall speed was raised
/// - **Elapsed time**: time spent playing, pauses excluded
///
/// # Example
///
/// ```
/// use blockfall_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_lock(0);
/// stats.complete_piece_lock(2);
///
/// assert_eq!(stats.locked_pieces(), 2);
/// assert_eq!(stats.total_rows_cleared(), 2);
/// assert_eq!(stats.rows_cleared_counter(), [1, 0, 1]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameStats {
    locked_pieces: usize,
    total_rows_cleared: usize,
    rows_cleared_counter: Vec<usize>,
    speedups: usize,
    elapsed: Duration,
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            locked_pieces: 0,
            total_rows_cleared: 0,
            rows_cleared_counter: Vec::new(),
            speedups: 0,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn locked_pieces(&self) -> usize {
        self.locked_pieces
    }

    #[must_use]
    pub const fn total_rows_cleared(&self) -> usize {
        self.total_rows_cleared
    }

    /// Histogram of rows removed per lock.
    ///
    /// Index `n` is the number of locks that removed exactly `n` rows. The slice
    /// is as long as the largest count seen so far, plus one.
    #[must_use]
    pub fn rows_cleared_counter(&self) -> &[usize] {
        &self.rows_cleared_counter
    }

    #[must_use]
    pub const fn speedups(&self) -> usize {
        self.speedups
    }

    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Records a piece lock and the rows its line scan removed.
    pub fn complete_piece_lock(&mut self, cleared_rows: usize) {
        self.locked_pieces += 1;
        self.total_rows_cleared += cleared_rows;
        if self.rows_cleared_counter.len() <= cleared_rows {
            self.rows_cleared_counter.resize(cleared_rows + 1, 0);
        }
        self.rows_cleared_counter[cleared_rows] += 1;
    }

    pub(crate) const fn record_speedup(&mut self) {
        self.speedups += 1;
    }

    pub(crate) fn add_elapsed(&mut self, dt: f32) {
        self.elapsed += Duration::from_secs_f32(dt.max(0.0));
    }
}
