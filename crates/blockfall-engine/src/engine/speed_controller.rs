use super::config::GameConfig;

/// Raises the normal fall speed as rows are cleared.
///
/// Every time the number of rows cleared since the last speedup reaches the
/// threshold, the speed grows by a fixed increment and the counter restarts from
/// zero. Rows above the threshold are dropped, so one call triggers at most one
/// speedup however many rows it reports.
///
/// # Example
///
/// ```
/// use blockfall_engine::SpeedController;
///
/// let mut speed = SpeedController::new(2.0, 10, 0.5);
/// assert!(!speed.on_rows_cleared(4));
/// assert!(speed.on_rows_cleared(6));
/// assert_eq!(speed.current_normal_speed(), 2.5);
/// assert_eq!(speed.rows_cleared_since_speedup(), 0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SpeedController {
    threshold: usize,
    increment: f32,
    rows_cleared_since_speedup: usize,
    current_normal_speed: f32,
}

impl SpeedController {
    #[must_use]
    pub const fn new(initial_speed: f32, threshold: usize, increment: f32) -> Self {
        Self {
            threshold,
            increment,
            rows_cleared_since_speedup: 0,
            current_normal_speed: initial_speed,
        }
    }

    #[must_use]
    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.normal_speed,
            config.rows_to_speedup,
            config.speedup_amount,
        )
    }

    /// Fall speed, in cells per second, given to newly spawned pieces.
    #[must_use]
    pub const fn current_normal_speed(&self) -> f32 {
        self.current_normal_speed
    }

    #[must_use]
    pub const fn rows_cleared_since_speedup(&self) -> usize {
        self.rows_cleared_since_speedup
    }

    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// Records `rows` cleared rows. Returns `true` if the speed was raised.
    pub fn on_rows_cleared(&mut self, rows: usize) -> bool {
        self.rows_cleared_since_speedup += rows;
        if self.rows_cleared_since_speedup < self.threshold {
            return false;
        }
        self.current_normal_speed += self.increment;
        self.rows_cleared_since_speedup = 0;
        true
    }
}
