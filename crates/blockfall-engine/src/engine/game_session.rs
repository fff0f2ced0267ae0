use serde::Serialize;

use crate::{PieceCollisionError, core::Field};

use super::{
    active_piece::{ActivePiece, LockedPiece},
    config::{ConfigError, GameConfig},
    events::GameEvent,
    game_stats::GameStats,
    input::TickInput,
    line_clear::LineScan,
    shape_catalog::{CatalogError, ShapeCatalog},
    shape_source::ShapeSource,
    speed_controller::SpeedController,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::IsVariant)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Playing,
    Paused,
    GameOver,
}

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum SessionError {
    #[display("invalid config: {_0}")]
    #[from]
    Config(ConfigError),
    #[display("invalid shape catalog: {_0}")]
    #[from]
    Catalog(CatalogError),
    #[display("shape {name:?} has size {size}, but max_shape_size is {max}")]
    ShapeTooLarge {
        name: String,
        size: usize,
        max: usize,
    },
}

/// A line scan in progress, paused after a row removal until the shift settles.
#[derive(Debug, Clone)]
struct PendingCollapse {
    scan: LineScan,
    elapsed: f32,
    settled: bool,
}

#[derive(Debug, Clone)]
enum Phase {
    Falling(ActivePiece),
    Collapsing(PendingCollapse),
    Over,
}

/// A single game, from the first spawn to the top-out.
///
/// The session owns the field, the speed controller and the current piece, and
/// sequences them once per tick:
///
/// 1. The active piece reads the input and falls.
/// 2. When it locks, the rows it spans are scanned for full rows. Each removed
///    row is reported as a [`GameEvent::RowCollapsed`] and the scan waits until
///    the shift has settled, either by [`notify_collapse_settled`] or after
///    `collapse_settle_time` seconds.
/// 3. Once the scan is complete the cleared rows are reported to the speed
///    controller and the next piece spawns. A blocked spawn ends the game.
///
/// [`notify_collapse_settled`]: Self::notify_collapse_settled
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    catalog: ShapeCatalog,
    source: Box<dyn ShapeSource>,
    field: Field,
    speed: SpeedController,
    stats: GameStats,
    state: SessionState,
    phase: Phase,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Starts a session and spawns its first piece.
    pub fn new(
        config: GameConfig,
        catalog: ShapeCatalog,
        source: impl ShapeSource + 'static,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        if let Some(shape) = catalog
            .iter()
            .find(|shape| shape.matrix().size() > config.max_shape_size)
        {
            return Err(SessionError::ShapeTooLarge {
                name: shape.name().to_owned(),
                size: shape.matrix().size(),
                max: config.max_shape_size,
            });
        }

        let mut session = Self {
            field: new_field(&config),
            speed: SpeedController::from_config(&config),
            stats: GameStats::new(),
            state: SessionState::Playing,
            phase: Phase::Over,
            events: vec![],
            config,
            catalog,
            source: Box::new(source),
        };
        session.spawn_next();
        Ok(session)
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn catalog(&self) -> &ShapeCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// The falling piece, or `None` while a collapse is in progress or the game
    /// is over.
    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        match &self.phase {
            Phase::Falling(piece) => Some(piece),
            Phase::Collapsing(_) | Phase::Over => None,
        }
    }

    #[must_use]
    pub fn speed(&self) -> &SpeedController {
        &self.speed
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn is_collapsing(&self) -> bool {
        matches!(self.phase, Phase::Collapsing(_))
    }

    /// Drains the events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            SessionState::Playing => SessionState::Paused,
            SessionState::Paused => SessionState::Playing,
            SessionState::GameOver => SessionState::GameOver,
        };
    }

    /// Starts over on an empty field with the initial speed.
    pub fn restart(&mut self) {
        self.field = new_field(&self.config);
        self.speed = SpeedController::from_config(&self.config);
        self.stats = GameStats::new();
        self.state = SessionState::Playing;
        self.phase = Phase::Over;
        self.events.clear();
        self.spawn_next();
    }

    /// Signals that the last reported row collapse is visually settled.
    ///
    /// The scan resumes on the next [`advance`](Self::advance).
    pub fn notify_collapse_settled(&mut self) {
        if let Phase::Collapsing(pending) = &mut self.phase {
            pending.settled = true;
        }
    }

    /// Advances the session by `dt` seconds.
    ///
    /// Does nothing while paused or after the game is over.
    pub fn advance(&mut self, dt: f32, input: &TickInput) {
        if !self.state.is_playing() {
            return;
        }
        self.stats.add_elapsed(dt);

        match &mut self.phase {
            Phase::Falling(piece) => {
                piece.apply_input(&self.field, input, dt);
                if let Some(locked) = piece.advance(&mut self.field, dt) {
                    self.start_scan(&locked);
                }
            }
            Phase::Collapsing(pending) => {
                pending.elapsed += dt;
                let settled = pending.settled
                    || self
                        .config
                        .collapse_settle_time
                        .is_some_and(|settle| pending.elapsed >= settle);
                if settled {
                    self.continue_scan();
                }
            }
            Phase::Over => {}
        }
    }

    fn start_scan(&mut self, locked: &LockedPiece) {
        self.events
            .extend(locked.cells().iter().copied().map(GameEvent::CellFilled));
        let rows = locked.rows();
        self.events
            .push(GameEvent::PieceLocked { rows: rows.clone() });
        self.phase = Phase::Collapsing(PendingCollapse {
            scan: LineScan::new(&self.field, rows.start, rows.len()),
            elapsed: 0.0,
            settled: false,
        });
        self.continue_scan();
    }

    fn continue_scan(&mut self) {
        let Phase::Collapsing(pending) = &mut self.phase else {
            return;
        };
        if let Some(collapse) = pending.scan.next_collapse(&mut self.field) {
            pending.elapsed = 0.0;
            pending.settled = false;
            self.events.push(GameEvent::RowCollapsed(collapse));
            return;
        }

        let cleared = pending.scan.cleared();
        self.stats.complete_piece_lock(cleared);
        if cleared > 0 && self.speed.on_rows_cleared(cleared) {
            self.stats.record_speedup();
            self.events.push(GameEvent::SpeedIncreased {
                normal_speed: self.speed.current_normal_speed(),
            });
        }
        self.spawn_next();
    }

    fn spawn_next(&mut self) {
        let index = self.source.next_shape(&self.catalog);
        let shape = self.catalog.shape(index).matrix().clone();
        match ActivePiece::spawn(
            shape,
            &self.field,
            self.speed.current_normal_speed(),
            &self.config,
        ) {
            Ok(piece) => {
                self.events.push(GameEvent::PieceSpawned {
                    cells: piece.cells().collect(),
                });
                self.phase = Phase::Falling(piece);
            }
            Err(PieceCollisionError) => {
                self.phase = Phase::Over;
                self.state = SessionState::GameOver;
                self.events.push(GameEvent::GameOver);
            }
        }
    }
}

fn new_field(config: &GameConfig) -> Field {
    Field::new(
        config.field_width,
        config.field_height,
        config.max_shape_size,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::CellPos,
        engine::{
            events::{RowCollapse, ShiftedCell},
            shape_catalog::ShapeDefinition,
            shape_source::SequenceShapeSource,
        },
    };

    const DT: f32 = 1.0 / 60.0;

    const DROP: TickInput = TickInput {
        horizontal: 0.0,
        rotate: false,
        drop: true,
    };

    fn config(field_width: usize, field_height: usize) -> GameConfig {
        GameConfig {
            field_width,
            field_height,
            max_shape_size: 2,
            ..GameConfig::default()
        }
    }

    fn o_catalog() -> ShapeCatalog {
        ShapeCatalog::from_definitions(&[ShapeDefinition::new("O", &["11", "11"])], 2).unwrap()
    }

    fn o_session(config: GameConfig) -> GameSession {
        GameSession::new(config, o_catalog(), SequenceShapeSource::new(vec![0])).unwrap()
    }

    /// Drops the active piece and returns the events up to and including its lock.
    fn drop_until_locked(session: &mut GameSession) -> Vec<GameEvent> {
        let mut events = vec![];
        for _ in 0..100 {
            session.advance(DT, &DROP);
            events.extend(session.take_events());
            if events.iter().any(GameEvent::is_piece_locked) {
                return events;
            }
        }
        panic!("piece never locked");
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GameConfig {
            normal_speed: -1.0,
            ..GameConfig::default()
        };
        let err = GameSession::new(
            config,
            ShapeCatalog::standard(5).unwrap(),
            SequenceShapeSource::new(vec![]),
        )
        .unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_new_rejects_shape_larger_than_border() {
        let err = GameSession::new(
            config(10, 10),
            ShapeCatalog::standard(5).unwrap(),
            SequenceShapeSource::new(vec![]),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            SessionError::ShapeTooLarge { size: 4, max: 2, .. }
        ));
    }

    #[test]
    fn test_first_piece_spawns() {
        let mut session = o_session(config(4, 4));
        assert!(session.state().is_playing());
        let piece = session.active_piece().unwrap();
        // total width 8, total height 6
        assert_eq!(piece.anchor(), CellPos::new(3, 5));
        assert_eq!(
            session.take_events(),
            [GameEvent::PieceSpawned {
                cells: vec![
                    CellPos::new(3, 5),
                    CellPos::new(4, 5),
                    CellPos::new(3, 4),
                    CellPos::new(4, 4)
                ]
            }]
        );
        assert!(session.take_events().is_empty());
    }

    #[test]
    fn test_lock_without_clear_spawns_next() {
        let mut session = o_session(config(4, 4));
        session.take_events();
        let events = drop_until_locked(&mut session);
        assert_eq!(
            events,
            [
                GameEvent::CellFilled(CellPos::new(3, 2)),
                GameEvent::CellFilled(CellPos::new(4, 2)),
                GameEvent::CellFilled(CellPos::new(3, 1)),
                GameEvent::CellFilled(CellPos::new(4, 1)),
                GameEvent::PieceLocked { rows: 1..3 },
                GameEvent::PieceSpawned {
                    cells: vec![
                        CellPos::new(3, 5),
                        CellPos::new(4, 5),
                        CellPos::new(3, 4),
                        CellPos::new(4, 4)
                    ]
                },
            ]
        );
        assert!(!session.is_collapsing());
        assert_eq!(session.stats().locked_pieces(), 1);
        assert_eq!(session.stats().total_rows_cleared(), 0);
    }

    #[test]
    fn test_collapse_waits_for_settle_time() {
        let config = GameConfig {
            rows_to_speedup: 2,
            ..config(2, 4)
        };
        let mut session = o_session(config);
        session.take_events();

        let events = drop_until_locked(&mut session);
        // Commit happens before the scan; the first collapse is reported at once.
        assert_eq!(
            events[4..],
            [
                GameEvent::PieceLocked { rows: 1..3 },
                GameEvent::RowCollapsed(RowCollapse {
                    y: 1,
                    shifted: vec![
                        ShiftedCell {
                            x: 2,
                            from_y: 2,
                            to_y: 1
                        },
                        ShiftedCell {
                            x: 3,
                            from_y: 2,
                            to_y: 1
                        },
                    ],
                }),
            ]
        );
        assert!(session.is_collapsing());
        assert!(session.active_piece().is_none());

        // The default settle time is 0.2 seconds.
        session.advance(0.1, &TickInput::NONE);
        assert!(session.take_events().is_empty());
        session.advance(0.1, &TickInput::NONE);
        assert_eq!(
            session.take_events(),
            [GameEvent::RowCollapsed(RowCollapse {
                y: 1,
                shifted: vec![]
            })]
        );

        session.advance(0.2, &TickInput::NONE);
        let events = session.take_events();
        assert_eq!(events[0], GameEvent::SpeedIncreased { normal_speed: 2.5 });
        assert!(events[1].is_piece_spawned());
        assert!(!session.is_collapsing());
        assert_eq!(session.field(), &Field::new(2, 4, 2));
        assert_eq!(session.stats().total_rows_cleared(), 2);
        assert_eq!(session.stats().rows_cleared_counter(), [0, 0, 1]);
        assert_eq!(session.stats().speedups(), 1);
        assert_eq!(session.speed().current_normal_speed(), 2.5);
        assert_eq!(session.active_piece().unwrap().fall_speed(), 2.5);
    }

    #[test]
    fn test_collapse_waits_for_settle_signal() {
        let config = GameConfig {
            collapse_settle_time: None,
            ..config(2, 4)
        };
        let mut session = o_session(config);
        drop_until_locked(&mut session);
        assert!(session.is_collapsing());

        session.advance(10.0, &TickInput::NONE);
        assert!(session.is_collapsing());
        assert!(session.take_events().is_empty());

        session.notify_collapse_settled();
        session.advance(DT, &TickInput::NONE);
        assert!(session.take_events()[0].is_row_collapsed());

        session.notify_collapse_settled();
        session.advance(DT, &TickInput::NONE);
        let events = session.take_events();
        assert_eq!(events.len(), 1);
        assert!(events[0].is_piece_spawned());
        assert!(session.active_piece().is_some());
    }

    #[test]
    fn test_spawn_collision_ends_game() {
        let mut session = o_session(config(3, 4));
        drop_until_locked(&mut session);
        let events = drop_until_locked(&mut session);
        assert_eq!(events.last(), Some(&GameEvent::GameOver));
        assert!(session.state().is_game_over());
        assert!(session.active_piece().is_none());

        // The blocked spawn position.
        let shape = o_catalog().shape(0).matrix().clone();
        let anchor = session.field().spawn_anchor(2);
        assert!(session.field().check_overlap(&shape, anchor.x, anchor.y));

        let field = session.field().clone();
        session.advance(1.0, &DROP);
        session.toggle_pause();
        assert!(session.state().is_game_over());
        assert_eq!(session.field(), &field);
        assert!(session.take_events().is_empty());

        session.restart();
        assert!(session.state().is_playing());
        assert_eq!(session.field(), &Field::new(3, 4, 2));
        assert_eq!(session.stats().locked_pieces(), 0);
        assert!(session.take_events()[0].is_piece_spawned());
    }

    #[test]
    fn test_pause_freezes_session() {
        let mut session = o_session(config(4, 4));
        session.toggle_pause();
        assert!(session.state().is_paused());
        let piece = session.active_piece().cloned();
        session.advance(5.0, &DROP);
        assert_eq!(session.active_piece().cloned(), piece);
        assert_eq!(session.stats().elapsed(), std::time::Duration::ZERO);

        session.toggle_pause();
        assert!(session.state().is_playing());
        session.advance(DT, &DROP);
        assert!(session.active_piece().unwrap().is_dropped());
    }
}
