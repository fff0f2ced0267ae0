use std::ops::Range;

use crate::{
    PieceCollisionError,
    core::{CellPos, Field, ShapeMatrix, field::to_coord},
};

use super::{
    config::GameConfig,
    input::{HorizontalDirection, TickInput},
};

/// Lifecycle of an [`ActivePiece`].
#[derive(Debug, Clone, Copy, PartialEq, derive_more::IsVariant)]
pub enum PiecePhase {
    /// Waiting at the spawn position before gravity starts.
    Delaying { remaining: f32 },
    /// Descending at the piece's fall speed.
    Falling,
    /// Committed into the field. Terminal.
    Locked,
}

/// A piece that has been committed into the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedPiece {
    cells: Vec<CellPos>,
    rows: Range<i32>,
}

impl LockedPiece {
    /// Field cells written by the lock, top row first.
    #[must_use]
    pub fn cells(&self) -> &[CellPos] {
        &self.cells
    }

    /// Rows spanned by the locked cells, bottom row first.
    #[must_use]
    pub fn rows(&self) -> Range<i32> {
        self.rows.clone()
    }
}

/// The falling piece: a shape bound to a field position.
///
/// Shape cell `(col, row)` occupies field cell `(anchor_x + col, anchor_y - row)`.
/// Every move is checked against the field before it is applied, so a piece that
/// has not locked never overlaps an occupied cell.
///
/// # Timing
///
/// The piece is advanced once per tick with the elapsed time:
///
/// 1. After spawning it waits `spawn_delay_factor / normal_speed` seconds.
///    Dropping the piece cuts the wait short.
/// 2. It then falls one cell every `1 / fall_speed` seconds. The first step
///    happens as soon as the delay ends.
/// 3. When the next row down is blocked, the piece is committed into the field
///    at its current row and becomes [`PiecePhase::Locked`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActivePiece {
    shape: ShapeMatrix,
    anchor_x: i32,
    anchor_y: i32,
    fall_speed: f32,
    drop_speed: f32,
    move_delay: f32,
    phase: PiecePhase,
    fall_progress: f32,
    move_cooldown: f32,
    dropped: bool,
}

impl ActivePiece {
    /// Places `shape` at the spawn position of `field`.
    ///
    /// Fails if the spawn position is already occupied, which ends the game.
    pub fn spawn(
        shape: ShapeMatrix,
        field: &Field,
        normal_speed: f32,
        config: &GameConfig,
    ) -> Result<Self, PieceCollisionError> {
        let anchor = field.spawn_anchor(shape.size());
        if field.check_overlap(&shape, anchor.x, anchor.y) {
            return Err(PieceCollisionError);
        }
        Ok(Self {
            shape,
            anchor_x: anchor.x,
            anchor_y: anchor.y,
            fall_speed: normal_speed,
            drop_speed: config.drop_speed,
            move_delay: config.move_delay,
            phase: PiecePhase::Delaying {
                remaining: config.spawn_delay_factor / normal_speed,
            },
            fall_progress: 0.0,
            move_cooldown: 0.0,
            dropped: false,
        })
    }

    #[must_use]
    pub fn shape(&self) -> &ShapeMatrix {
        &self.shape
    }

    #[must_use]
    pub fn anchor(&self) -> CellPos {
        CellPos::new(self.anchor_x, self.anchor_y)
    }

    #[must_use]
    pub fn anchor_x(&self) -> i32 {
        self.anchor_x
    }

    #[must_use]
    pub fn anchor_y(&self) -> i32 {
        self.anchor_y
    }

    #[must_use]
    pub fn fall_speed(&self) -> f32 {
        self.fall_speed
    }

    #[must_use]
    pub fn phase(&self) -> PiecePhase {
        self.phase
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.phase.is_locked()
    }

    #[must_use]
    pub fn is_dropped(&self) -> bool {
        self.dropped
    }

    /// Field cells covered by the piece, top row first.
    pub fn cells(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.shape.occupied_cells().map(|(col, row)| {
            CellPos::new(self.anchor_x + to_coord(col), self.anchor_y - to_coord(row))
        })
    }

    /// Fraction of a cell left before the next gravity step.
    ///
    /// Goes from 1 down to 0 over `1 / fall_speed` seconds while falling, and is 0
    /// in the other phases.
    #[must_use]
    pub fn fall_offset(&self) -> f32 {
        match self.phase {
            PiecePhase::Falling => (1.0 - self.fall_progress).clamp(0.0, 1.0),
            PiecePhase::Delaying { .. } | PiecePhase::Locked => 0.0,
        }
    }

    /// Moves the piece one column. Returns `false` if the target is blocked.
    pub fn move_horizontal(&mut self, field: &Field, direction: HorizontalDirection) -> bool {
        if self.is_locked() {
            return false;
        }
        let x = self.anchor_x + direction.dx();
        if field.check_overlap(&self.shape, x, self.anchor_y) {
            return false;
        }
        self.anchor_x = x;
        true
    }

    /// Rotates the piece clockwise in place. Returns `false` if the rotated shape
    /// would overlap; there are no wall kicks.
    pub fn rotate(&mut self, field: &Field) -> bool {
        if self.is_locked() {
            return false;
        }
        let rotated = self.shape.rotated_clockwise();
        if field.check_overlap(&rotated, self.anchor_x, self.anchor_y) {
            return false;
        }
        self.shape = rotated;
        true
    }

    /// Switches the piece to the drop speed for the rest of its fall.
    pub fn drop(&mut self) {
        if self.is_locked() {
            return;
        }
        self.fall_speed = self.drop_speed;
        self.dropped = true;
    }

    /// Applies one tick of player input.
    ///
    /// After a successful horizontal move the axis is ignored for `move_delay`
    /// seconds. Once the piece is dropped, input is no longer read.
    pub fn apply_input(&mut self, field: &Field, input: &TickInput, dt: f32) {
        if self.is_locked() || self.dropped {
            return;
        }

        self.move_cooldown = (self.move_cooldown - dt).max(0.0);
        if self.move_cooldown <= 0.0
            && let Some(direction) = input.direction()
            && self.move_horizontal(field, direction)
        {
            self.move_cooldown = self.move_delay;
        }

        if input.rotate {
            self.rotate(field);
        }
        if input.drop {
            self.drop();
        }
    }

    /// Advances the delay and gravity by `dt` seconds.
    ///
    /// Returns the locked piece on the tick the piece is committed into `field`.
    pub fn advance(&mut self, field: &mut Field, dt: f32) -> Option<LockedPiece> {
        match self.phase {
            PiecePhase::Locked => return None,
            PiecePhase::Delaying { remaining } => {
                let remaining = remaining - dt;
                if remaining > 0.0 && !self.dropped {
                    self.phase = PiecePhase::Delaying { remaining };
                    return None;
                }
                // The first step is taken at once; time past the delay keeps falling.
                self.phase = PiecePhase::Falling;
                self.fall_progress = 1.0 + (-remaining).max(0.0) * self.fall_speed;
            }
            PiecePhase::Falling => self.fall_progress += dt * self.fall_speed,
        }

        while self.fall_progress >= 1.0 {
            self.fall_progress -= 1.0;
            if field.check_overlap(&self.shape, self.anchor_x, self.anchor_y - 1) {
                return Some(self.lock(field));
            }
            self.anchor_y -= 1;
        }
        None
    }

    fn lock(&mut self, field: &mut Field) -> LockedPiece {
        field.commit(&self.shape, self.anchor_x, self.anchor_y);
        self.phase = PiecePhase::Locked;
        self.fall_progress = 0.0;

        let occupied = self.shape.occupied_rows();
        let bottom = self.anchor_y - to_coord(*occupied.end());
        let top = self.anchor_y - to_coord(*occupied.start());
        LockedPiece {
            cells: self.cells().collect(),
            rows: bottom..top + 1,
        }
    }
}
