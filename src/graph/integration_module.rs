use crate::graph::graph_info::GraphInfo;
use crate::graph::modules::PointerEvent;
use crate::graph::selection::{Selection, ZoomSelector};
use crate::numerical::integration::{IntegrationError, integrate};
use crate::numerical::sampler::SampleSet;
use log::info;

/// Integral of the grapher's function over a dragged selection.
/// While active it owns the pointer input of the grapher.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationSubModule {
    active: bool,
    selector: ZoomSelector,
    selection: Selection,
}

impl Default for IntegrationSubModule {
    fn default() -> Self {
        IntegrationSubModule {
            active: false,
            selector: ZoomSelector::with_overlap(),
            selection: Selection::new(-1.0, 1.0),
        }
    }
}

impl IntegrationSubModule {
    pub fn open(&mut self) {
        self.active = true;
    }

    /// closing drops an unfinished drag, the last selection stays
    pub fn close(&mut self) {
        self.active = false;
        self.selector.release();
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// the selection being dragged, or the last one
    pub fn displayed_selection(&self, graph: &GraphInfo) -> Selection {
        self.selector
            .live_selection(graph)
            .unwrap_or(self.selection)
    }

    /// Returns whether the event was consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent, graph: &GraphInfo) -> bool {
        if !self.active {
            return false;
        }
        match event {
            PointerEvent::Pressed { x, y } => self.selector.press(x, graph.contains_pixel(x, y)),
            PointerEvent::Moved { x, .. } => {
                self.selector.drag(x);
                self.selector.is_dragging()
            }
            PointerEvent::Released { x, .. } => {
                if !self.selector.is_dragging() {
                    return false;
                }
                self.selector.drag(x);
                if let Some(selection) = self.selector.commit_selection(graph) {
                    info!(
                        "integration bounds [{}, {}]",
                        selection.start_x, selection.end_x
                    );
                    self.selection = selection;
                }
                true
            }
        }
    }

    /// Signed integral over the selection clamped to the sampled domain.
    pub fn integrate(&self, samples: &SampleSet) -> Result<f64, IntegrationError> {
        let (min_x, max_x) = samples.domain()?;
        let selection = self.selection.clamp(min_x, max_x);
        integrate(samples, selection.start_x, selection.end_x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::graph_info::PlotRect;
    use crate::numerical::sampler::sample;
    use crate::symbolic::expression::Expression;
    use approx::assert_relative_eq;

    fn setup() -> (SampleSet, GraphInfo) {
        let samples = sample(&Expression::from_formula("x").unwrap(), -1.0, 1.0, 1000).unwrap();
        let graph = GraphInfo::build(&samples, PlotRect::new(0.0, 0.0, 630.0, 400.0)).unwrap();
        (samples, graph)
    }

    #[test]
    fn test_inactive_ignores_input() {
        let (_, graph) = setup();
        let mut module = IntegrationSubModule::default();
        assert!(!module.handle_pointer(PointerEvent::Pressed { x: 10.0, y: 10.0 }, &graph));
    }

    #[test]
    fn test_drag_sets_selection() {
        let (samples, graph) = setup();
        let mut module = IntegrationSubModule::default();
        module.open();
        assert!(module.handle_pointer(PointerEvent::Pressed { x: 629.0, y: 10.0 }, &graph));
        assert!(module.handle_pointer(PointerEvent::Moved { x: 314.5, y: 10.0 }, &graph));
        assert!(module.handle_pointer(PointerEvent::Released { x: 314.5, y: 10.0 }, &graph));
        let selection = module.selection();
        assert_relative_eq!(selection.start_x, 1.0);
        assert_relative_eq!(selection.end_x, 0.0, epsilon = 1e-12);
        // from 1 down to 0 of x
        assert_relative_eq!(module.integrate(&samples).unwrap(), -0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_selection_is_clamped() {
        let (samples, _) = setup();
        let mut module = IntegrationSubModule::default();
        module.set_selection(Selection::new(-5.0, 0.0));
        assert_relative_eq!(module.integrate(&samples).unwrap(), -0.5, epsilon = 1e-9);
    }
}
