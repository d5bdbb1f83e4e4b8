//! Main photo on the left, remaining photos stacked in a right-hand strip.

use super::{Arrangement, LayoutContext, PanelStyle, Rect, Shadow, Slot};

/// Gap around and between panels.
pub const PADDING: f32 = 12.0;

/// Share of the canvas width given to the main photo.
pub const MAIN_SHARE: f32 = 0.65;

const MAIN_STYLE: PanelStyle = PanelStyle {
    corner_radius: 16.0,
    inset: 12.0,
    inner_radius: 12.0,
    shadow: Shadow::new(0.15, 15.0, 3.0, 3.0),
};

const SIDE_STYLE: PanelStyle = PanelStyle {
    corner_radius: 12.0,
    inset: 8.0,
    inner_radius: 8.0,
    shadow: Shadow::new(0.1, 10.0, 2.0, 2.0),
};

/// Photo 0 large on the left; photos 1.. share the right strip equally.
///
/// With a single photo there is no side strip and the main panel spans the
/// whole canvas width.
#[derive(Debug, Clone, Copy, Default)]
pub struct MainSide;

impl MainSide {
    fn main_rect(&self, ctx: &LayoutContext<'_>) -> Rect {
        let column = if ctx.count > 1 {
            ctx.width() * MAIN_SHARE
        } else {
            ctx.width()
        };
        Rect::new(PADDING, PADDING, column - PADDING * 2.0, ctx.height() - PADDING * 2.0)
    }

    /// Side panels start at `PADDING` with `PADDING` between them.
    ///
    /// Heights leave room for the gaps only, so the column ends `PADDING`
    /// past the bottom edge of the canvas.
    fn side_rects(&self, ctx: &LayoutContext<'_>) -> Vec<Rect> {
        let count = ctx.count.saturating_sub(1).max(1);
        let height = (ctx.height() - PADDING * (count as f32 - 1.0)) / count as f32;
        let x = ctx.width() * MAIN_SHARE + PADDING;
        let width = ctx.width() * (1.0 - MAIN_SHARE) - PADDING * 2.0;

        (0..ctx.count.saturating_sub(1))
            .map(|i| Rect::new(x, PADDING + i as f32 * (height + PADDING), width, height))
            .collect()
    }
}

impl Arrangement for MainSide {
    fn arrange(&self, ctx: &mut LayoutContext<'_>) -> Vec<Slot> {
        if ctx.count == 0 {
            return Vec::new();
        }
        let mut slots = Vec::with_capacity(ctx.count);
        slots.push(MAIN_STYLE.slot(0, self.main_rect(ctx), 0.0));
        slots.extend(
            self.side_rects(ctx)
                .into_iter()
                .enumerate()
                .map(|(i, rect)| SIDE_STYLE.slot(i + 1, rect, 0.0)),
        );
        slots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::CANVAS_SIZE;
    use crate::layout::test_support::ZeroRng;
    use approx::assert_relative_eq;

    fn arrange(count: usize) -> Vec<Slot> {
        let mut rng = ZeroRng;
        MainSide.arrange(&mut LayoutContext::new(count, CANVAS_SIZE, &mut rng))
    }

    #[test]
    fn single_photo_takes_the_full_canvas() {
        let slots = arrange(1);
        assert_eq!(slots.len(), 1);
        let main = slots[0].panel;
        assert_eq!((main.x, main.y), (12.0, 12.0));
        assert_eq!(main.width, 1200.0 - 24.0);
        assert_eq!(main.height, 800.0 - 24.0);
        assert!(main.width.is_finite() && main.height.is_finite());
    }

    #[test]
    fn main_column_is_65_percent() {
        let main = arrange(3)[0].panel;
        assert_relative_eq!(main.width, 780.0 - 24.0, epsilon = 1e-3);
        assert_relative_eq!(main.height, 776.0);
        assert_eq!(main.corner_radius, 16.0);
    }

    #[test]
    fn side_panels_share_the_height() {
        let slots = arrange(4);
        let side: Vec<_> = slots[1..].iter().map(|s| s.panel).collect();
        let expected_height = (800.0 - 12.0 * 2.0) / 3.0;

        for (i, panel) in side.iter().enumerate() {
            assert_relative_eq!(panel.x, 792.0, epsilon = 1e-3);
            assert_relative_eq!(panel.width, 420.0 - 24.0, epsilon = 1e-3);
            assert_relative_eq!(panel.height, expected_height, epsilon = 1e-3);
            assert_relative_eq!(
                panel.y,
                12.0 + i as f32 * (expected_height + 12.0),
                epsilon = 1e-3
            );
        }
        let last = side[2];
        assert_relative_eq!(last.y + last.height, 812.0, epsilon = 1e-3);
    }

    #[test]
    fn side_column_starts_level_with_the_main_panel() {
        let slots = arrange(3);
        assert_eq!(slots[0].panel.y, PADDING);
        assert_eq!(slots[1].panel.y, PADDING);
        assert_relative_eq!(slots[2].panel.y, PADDING + 394.0 + PADDING, epsilon = 1e-3);
    }

    #[test]
    fn side_slots_use_the_small_frame() {
        let slots = arrange(2);
        assert_eq!(slots[0].inset, 12.0);
        assert_eq!(slots[1].inset, 8.0);
        assert_eq!(slots[1].index, 1);
        assert_relative_eq!(slots[1].panel.height, 800.0);
        assert_eq!(slots[1].panel.y, PADDING);
    }
}
