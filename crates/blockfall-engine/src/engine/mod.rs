//! Game rules built on top of the core grid types.
//!
//! - [`ActivePiece`] - The falling piece: spawn delay, gravity, moves and lock
//! - [`scan_and_clear`] / [`LineScan`] - Full-row detection and removal
//! - [`SpeedController`] - Raises the fall speed as rows are cleared
//! - [`GameSession`] - Sequences spawn, fall, lock and line scan for one game
//! - [`ShapeCatalog`] / [`ShapeSource`] - The shapes a session can spawn and
//!   the order they come in
//! - [`GameConfig`] - Tunable parameters, loadable from JSON
//!
//! # Game Flow
//!
//! 1. A piece spawns at the top of the field and waits for a short delay
//! 2. It falls at the normal speed while the player moves and rotates it
//! 3. When it cannot descend any further it is committed into the field
//! 4. Full rows in its span are removed one by one; the caller is notified of
//!    each removal through [`GameEvent`]s
//! 5. The next piece spawns; if its spawn position is blocked the game is over
//!
//! # Example
//!
//! ```
//! use blockfall_engine::{
//!     GameConfig, GameSession, RandomShapeSource, ShapeCatalog, TickInput,
//! };
//!
//! let config = GameConfig::default();
//! let catalog = ShapeCatalog::standard(config.max_shape_size).unwrap();
//! let mut session = GameSession::new(config, catalog, RandomShapeSource::with_seed(7)).unwrap();
//!
//! let drop = TickInput { drop: true, ..TickInput::NONE };
//! while session.stats().locked_pieces() < 3 {
//!     session.advance(1.0 / 60.0, &drop);
//!     for event in session.take_events() {
//!         if event.is_row_collapsed() {
//!             session.notify_collapse_settled();
//!         }
//!     }
//! }
//! assert!(session.state().is_playing());
//! ```

pub use self::{
    active_piece::*, config::*, events::*, game_session::*, game_stats::*, input::*,
    line_clear::*, shape_catalog::*, shape_source::*, speed_controller::*,
};

mod active_piece;
mod config;
mod events;
mod game_session;
mod game_stats;
mod input;
mod line_clear;
mod shape_catalog;
mod shape_source;
mod speed_controller;
