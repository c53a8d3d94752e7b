use crate::graph::graph_info::GraphInfo;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    /// pixel x of the press and of the pointer now
    Dragging { anchor: f64, current: f64 },
}

/// Turns a horizontal drag over the plot into an x interval.
///
/// Without overlap the moving end cannot go left of the anchor (zoom); with overlap the
/// interval may be inverted (integration bounds). Releasing always ends the drag; a zero
/// width drag yields nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomSelector {
    state: DragState,
    allow_overlap: bool,
}

impl Default for ZoomSelector {
    fn default() -> Self {
        ZoomSelector::new()
    }
}

impl ZoomSelector {
    pub fn new() -> ZoomSelector {
        ZoomSelector {
            state: DragState::Idle,
            allow_overlap: false,
        }
    }

    pub fn with_overlap() -> ZoomSelector {
        ZoomSelector {
            state: DragState::Idle,
            allow_overlap: true,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Starts a drag at pixel `px` when the pointer is over the plot. Returns whether it started.
    pub fn press(&mut self, px: f64, over_plot: bool) -> bool {
        if !over_plot || self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging {
            anchor: px,
            current: px,
        };
        true
    }

    pub fn drag(&mut self, px: f64) {
        if let DragState::Dragging { anchor, current } = &mut self.state {
            *current = if self.allow_overlap { px } else { px.max(*anchor) };
        }
    }

    /// Ends the drag; the pixel interval (anchor, end) if its ends differ.
    pub fn release(&mut self) -> Option<(f64, f64)> {
        match std::mem::replace(&mut self.state, DragState::Idle) {
            DragState::Dragging { anchor, current } if anchor != current => Some((anchor, current)),
            _ => None,
        }
    }

    /// Ends the drag and maps it to the new domain [min, max] in function space.
    pub fn commit_zoom(&mut self, graph: &GraphInfo) -> Option<(f64, f64)> {
        let (a, b) = self.release()?;
        let (a, b) = (graph.unscale_x(a), graph.unscale_x(b));
        debug!("zoom to [{}, {}]", a.min(b), a.max(b));
        Some((a.min(b), a.max(b)))
    }

    /// Ends the drag and maps it to a selection, keeping the drag direction.
    pub fn commit_selection(&mut self, graph: &GraphInfo) -> Option<Selection> {
        let (a, b) = self.release()?;
        Some(Selection::new(graph.unscale_x(a), graph.unscale_x(b)))
    }

    /// the interval being dragged, in function space
    pub fn live_selection(&self, graph: &GraphInfo) -> Option<Selection> {
        match self.state {
            DragState::Dragging { anchor, current } => Some(Selection::new(
                graph.unscale_x(anchor),
                graph.unscale_x(current),
            )),
            DragState::Idle => None,
        }
    }
}

/// (start_x, end_x) in function space; start_x > end_x is allowed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection {
    pub start_x: f64,
    pub end_x: f64,
}

impl Selection {
    pub fn new(start_x: f64, end_x: f64) -> Selection {
        Selection { start_x, end_x }
    }

    pub fn is_inverted(&self) -> bool {
        self.start_x > self.end_x
    }

    pub fn width(&self) -> f64 {
        (self.end_x - self.start_x).abs()
    }

    /// both ends clamped to [min_x, max_x], direction kept
    pub fn clamp(&self, min_x: f64, max_x: f64) -> Selection {
        Selection::new(self.start_x.clamp(min_x, max_x), self.end_x.clamp(min_x, max_x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_info::{GraphInfo, PlotRect};
    use crate::numerical::sampler::sample;
    use crate::symbolic::expression::Expression;
    use approx::assert_relative_eq;

    fn graph() -> GraphInfo {
        let expression = Expression::from_formula("x^2 + x + 1").unwrap();
        let samples = sample(&expression, -1.0, 1.0, 1000).unwrap();
        GraphInfo::build(&samples, PlotRect::new(0.0, 0.0, 630.0, 400.0)).unwrap()
    }

    #[test]
    fn test_zoom_to_left_half() {
        let graph = graph();
        let mut zoom = ZoomSelector::new();
        assert!(zoom.press(0.0, true));
        zoom.drag(200.0);
        zoom.drag(315.0);
        let (min_x, max_x) = zoom.commit_zoom(&graph).unwrap();
        assert_relative_eq!(min_x, -1.0);
        assert_relative_eq!(max_x, 0.0, epsilon = 2e-3);
        assert_eq!(zoom.state(), DragState::Idle);
    }

    #[test]
    fn test_press_outside_plot_is_ignored() {
        let mut zoom = ZoomSelector::new();
        assert!(!zoom.press(10.0, false));
        assert_eq!(zoom.state(), DragState::Idle);
        assert_eq!(zoom.release(), None);
    }

    #[test]
    fn test_zero_width_drag_does_not_commit() {
        let graph = graph();
        let mut zoom = ZoomSelector::new();
        zoom.press(100.0, true);
        assert_eq!(zoom.commit_zoom(&graph), None);
        assert!(!zoom.is_dragging());
    }

    #[test]
    fn test_no_overlap_clamps_to_anchor() {
        let mut zoom = ZoomSelector::new();
        zoom.press(300.0, true);
        zoom.drag(100.0);
        assert_eq!(
            zoom.state(),
            DragState::Dragging {
                anchor: 300.0,
                current: 300.0
            }
        );
        assert_eq!(zoom.release(), None);
    }

    #[test]
    fn test_overlap_keeps_direction() {
        let graph = graph();
        let mut selector = ZoomSelector::with_overlap();
        selector.press(629.0, true);
        selector.drag(0.0);
        let live = selector.live_selection(&graph).unwrap();
        assert!(live.is_inverted());
        let selection = selector.commit_selection(&graph).unwrap();
        assert_relative_eq!(selection.start_x, 1.0);
        assert_relative_eq!(selection.end_x, -1.0);
        assert_relative_eq!(selection.width(), 2.0);
    }

    #[test]
    fn test_selection_clamp() {
        let selection = Selection::new(3.0, -7.0).clamp(-1.0, 1.0);
        assert_eq!(selection, Selection::new(1.0, -1.0));
    }
}
