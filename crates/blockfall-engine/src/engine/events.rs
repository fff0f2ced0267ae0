use std::ops::Range;

use crate::core::CellPos;

/// A cell that moved down because a row below it was removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftedCell {
    pub x: i32,
    pub from_y: i32,
    pub to_y: i32,
}

/// Record of a single row removal.
///
/// `shifted` lists every occupied playable cell that was above the removed row,
/// bottom row first, with the row it moved to. The presentation layer uses it to
/// animate the collapse and signals the session once the shift has settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowCollapse {
    pub y: i32,
    pub shifted: Vec<ShiftedCell>,
}

/// Notifications emitted by a [`GameSession`](super::GameSession) for the
/// presentation layer, in the order the changes happened.
#[derive(Debug, Clone, PartialEq, derive_more::IsVariant)]
pub enum GameEvent {
    /// A piece appeared at its spawn position.
    PieceSpawned { cells: Vec<CellPos> },
    /// A cell was written into the field by a lock.
    CellFilled(CellPos),
    /// A piece locked; `rows` is the vertical extent of its cells.
    PieceLocked { rows: Range<i32> },
    /// A full row was removed and the rows above moved down.
    RowCollapsed(RowCollapse),
    /// The normal fall speed was raised.
    SpeedIncreased { normal_speed: f32 },
    /// A new piece could not be placed at its spawn position.
    GameOver,
}
