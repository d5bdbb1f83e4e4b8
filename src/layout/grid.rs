//! Equal-cell grid layout.

use super::{Arrangement, LayoutContext, PanelStyle, Rect, Shadow, Slot};

/// Gap between a cell edge and its panel.
pub const CELL_PADDING: f32 = 8.0;

const STYLE: PanelStyle = PanelStyle {
    corner_radius: 12.0,
    inset: 8.0,
    inner_radius: 8.0,
    shadow: Shadow::new(0.1, 10.0, 2.0, 2.0),
};

/// Column and row counts for a photo count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridShape {
    pub cols: usize,
    pub rows: usize,
}

impl GridShape {
    /// `cols = ceil(sqrt(n))`, `rows = ceil(n / cols)`.
    ///
    /// Returns `None` for zero photos.
    pub fn for_count(count: usize) -> Option<Self> {
        if count == 0 {
            return None;
        }
        let cols = (count as f64).sqrt().ceil() as usize;
        let rows = count.div_ceil(cols);
        Some(Self { cols, rows })
    }

    /// Row-major photo assignment of every cell.
    ///
    /// Trailing cells of the last row stay `None`.
    pub fn cells(&self, count: usize) -> Vec<Option<usize>> {
        (0..self.cols * self.rows)
            .map(|cell| (cell < count).then_some(cell))
            .collect()
    }

    /// `(row, col)` of the photo at `index`.
    pub fn position(&self, index: usize) -> (usize, usize) {
        (index / self.cols, index % self.cols)
    }
}

/// Photos in equal cells, left to right then top to bottom.
#[derive(Debug, Clone, Copy, Default)]
pub struct Grid;

impl Arrangement for Grid {
    fn arrange(&self, ctx: &mut LayoutContext<'_>) -> Vec<Slot> {
        let Some(shape) = GridShape::for_count(ctx.count) else {
            return Vec::new();
        };
        let cell_width = ctx.width() / shape.cols as f32;
        let cell_height = ctx.height() / shape.rows as f32;

        (0..ctx.count)
            .map(|index| {
                let (row, col) = shape.position(index);
                let cell = Rect::new(
                    col as f32 * cell_width,
                    row as f32 * cell_height,
                    cell_width,
                    cell_height,
                );
                STYLE.slot(index, cell.inset(CELL_PADDING), 0.0)
            })
            .collect()
    }
}
