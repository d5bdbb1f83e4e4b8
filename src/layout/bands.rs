//! Equal bands along one axis (the Vertical and Horizontal layouts).

use super::{Arrangement, LayoutContext, PanelStyle, Rect, Shadow, Slot};

/// Gap around and between bands.
pub const PADDING: f32 = 10.0;

const STYLE: PanelStyle = PanelStyle {
    corner_radius: 16.0,
    inset: 12.0,
    inner_radius: 12.0,
    shadow: Shadow::new(0.1, 12.0, 2.0, 4.0),
};

/// Direction in which bands are stacked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Full-width bands, top to bottom.
    Vertical,
    /// Full-height bands, left to right.
    Horizontal,
}

/// One band per photo along `axis`, each spanning the other axis.
#[derive(Debug, Clone, Copy)]
pub struct Bands {
    pub axis: Axis,
}

impl Bands {
    pub fn new(axis: Axis) -> Self {
        Self { axis }
    }
}

impl Arrangement for Bands {
    fn arrange(&self, ctx: &mut LayoutContext<'_>) -> Vec<Slot> {
        if ctx.count == 0 {
            return Vec::new();
        }
        let n = ctx.count as f32;
        // Work in (along, across) and transpose for the horizontal case.
        let (along, across) = match self.axis {
            Axis::Vertical => (ctx.height(), ctx.width()),
            Axis::Horizontal => (ctx.width(), ctx.height()),
        };
        let band = (along - PADDING * (n + 1.0)) / n;
        let span = across - PADDING * 2.0;

        (0..ctx.count)
            .map(|index| {
                let offset = PADDING + index as f32 * (band + PADDING);
                let rect = match self.axis {
                    Axis::Vertical => Rect::new(PADDING, offset, span, band),
                    Axis::Horizontal => Rect::new(offset, PADDING, band, span),
                };
                STYLE.slot(index, rect, 0.0)
            })
            .collect()
    }
}
