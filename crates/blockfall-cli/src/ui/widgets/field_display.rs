use blockfall_engine::{ActivePiece, CellPos, Field};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

const CELL_WIDTH: u16 = 2;

/// Draws the playable columns of a field, from the top spawn row down to row 1.
///
/// Spawn rows above the visible height use a darker background.
#[derive(Debug)]
pub struct FieldDisplay<'a> {
    field: &'a Field,
    piece_cells: Vec<CellPos>,
    collapsed_row: Option<i32>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> FieldDisplay<'a> {
    pub fn new(field: &'a Field) -> Self {
        Self {
            field,
            piece_cells: vec![],
            collapsed_row: None,
            block: None,
        }
    }

    pub fn piece(self, piece: &ActivePiece) -> Self {
        Self {
            piece_cells: piece.cells().collect(),
            ..self
        }
    }

    /// Highlights the row that just collapsed.
    pub fn collapsed_row(self, y: i32) -> Self {
        Self {
            collapsed_row: Some(y),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn columns(&self) -> u16 {
        u16::try_from(self.field.width()).unwrap_or(u16::MAX)
    }

    fn rows(&self) -> u16 {
        u16::try_from(self.field.total_height() - 1).unwrap_or(u16::MAX)
    }

    pub fn width(&self) -> u16 {
        self.columns() * CELL_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        self.rows() + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_style(&self, x: i32, y: i32) -> (Style, &'static str) {
        let spawn_bottom = i32::try_from(self.field.playable_y_range().end).unwrap_or(i32::MAX);
        if self.piece_cells.contains(&CellPos::new(x, y)) {
            (style::ACTIVE, "  ")
        } else if self.collapsed_row == Some(y) {
            (style::COLLAPSED_ROW, "  ")
        } else if self.field.is_occupied(x, y) {
            (style::LOCKED, "  ")
        } else if y >= spawn_bottom {
            (style::SPAWN_AREA, "  ")
        } else {
            (style::EMPTY_DOT, " .")
        }
    }
}

impl Widget for FieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &FieldDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let left = i32::try_from(self.field.border()).unwrap_or(0);
        let top = i32::from(self.rows());
        for row in 0..self.rows().min(area.height) {
            let y = top - i32::from(row);
            for col in 0..self.columns() {
                let cell_x = area.x + col * CELL_WIDTH;
                if cell_x + CELL_WIDTH > area.right() {
                    break;
                }
                let (style, symbol) = self.cell_style(left + i32::from(col), y);
                buf.set_string(cell_x, area.y + row, symbol, style);
            }
        }
    }
}
