//! Grapher: formula, domain, samples and their mapping to the plot rectangle, with zoom,
//! tangent and the integration sub-module on top of the same samples.
use crate::config::GraphAnalyzeConfig;
use crate::graph::graph_info::{GraphError, GraphInfo, PlotRect};
use crate::graph::integration_module::IntegrationSubModule;
use crate::graph::modules::{InputOwner, ModuleId, PointerEvent};
use crate::graph::selection::{Selection, ZoomSelector};
use crate::numerical::integration::IntegrationError;
use crate::numerical::sampler::{SampleError, SampleSet, sample, sample_par};
use crate::numerical::tangent::{Tangent, tangent_at_x};
use crate::symbolic::expression::{Expression, ExpressionError};
use log::{info, warn};
use std::fmt;

/// resolutions from this size on are sampled on the rayon pool
const PARALLEL_SAMPLING_FROM: usize = 2000;

#[derive(Debug, Clone, PartialEq)]
pub enum GrapherError {
    Expression(ExpressionError),
    Sample(SampleError),
    Graph(GraphError),
    Integration(IntegrationError),
    /// nothing has been plotted yet
    NotReady,
}

impl fmt::Display for GrapherError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GrapherError::Expression(e) => write!(f, "{}", e),
            GrapherError::Sample(e) => write!(f, "{}", e),
            GrapherError::Graph(e) => write!(f, "{}", e),
            GrapherError::Integration(e) => write!(f, "{}", e),
            GrapherError::NotReady => write!(f, "No function plotted"),
        }
    }
}

impl std::error::Error for GrapherError {}

impl From<ExpressionError> for GrapherError {
    fn from(e: ExpressionError) -> Self {
        GrapherError::Expression(e)
    }
}

impl From<SampleError> for GrapherError {
    fn from(e: SampleError) -> Self {
        GrapherError::Sample(e)
    }
}

impl From<GraphError> for GrapherError {
    fn from(e: GraphError) -> Self {
        GrapherError::Graph(e)
    }
}

impl From<IntegrationError> for GrapherError {
    fn from(e: IntegrationError) -> Self {
        GrapherError::Integration(e)
    }
}

#[derive(Debug, Clone)]
pub struct GrapherModule {
    expression: Expression,
    min_x: f64,
    max_x: f64,
    resolution: usize,
    samples: SampleSet,
    graph: Option<GraphInfo>,
    plot_rect: PlotRect,
    zoom: ZoomSelector,
    integration: IntegrationSubModule,
}

impl GrapherModule {
    /// Grapher with the configured formula and domain, plotted if the formula is valid.
    pub fn from_config(config: &GraphAnalyzeConfig) -> GrapherModule {
        let mut grapher = GrapherModule {
            expression: Expression::new("x").with_max_length(config.max_formula_length),
            min_x: config.min_x,
            max_x: config.max_x,
            resolution: config.resolution,
            samples: SampleSet::from_points(&[]),
            graph: None,
            plot_rect: PlotRect::default(),
            zoom: ZoomSelector::new(),
            integration: IntegrationSubModule::default(),
        };
        if let Err(e) = grapher.set_formula(&config.formula) {
            warn!("initial formula '{}' not plotted: {}", config.formula, e);
        }
        grapher
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    pub fn graph(&self) -> Option<&GraphInfo> {
        self.graph.as_ref()
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.min_x, self.max_x)
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    /// Edits the formula without validating it (typing in the field).
    pub fn edit_formula(&mut self, text: &str) {
        self.expression.set_text(text);
    }

    /// Commits the formula and replots. An invalid formula keeps the previous plot.
    pub fn set_formula(&mut self, text: &str) -> Result<(), GrapherError> {
        self.expression.set_text(text);
        self.expression.commit()?;
        self.refresh_function_data()
    }

    /// New domain and replot; the previous domain is kept on failure.
    pub fn set_domain(&mut self, min_x: f64, max_x: f64) -> Result<(), GrapherError> {
        let previous = (self.min_x, self.max_x);
        self.min_x = min_x;
        self.max_x = max_x;
        if let Err(e) = self.refresh_function_data() {
            (self.min_x, self.max_x) = previous;
            return Err(e);
        }
        Ok(())
    }

    /// whether the graph action is available
    pub fn can_graph(&self) -> bool {
        self.expression.is_valid()
            && self.min_x.is_finite()
            && self.max_x.is_finite()
            && self.min_x < self.max_x
    }

    /// Resamples the committed expression over the domain and rebuilds the mapping.
    /// Both are built aside and swapped in only when everything succeeded.
    pub fn refresh_function_data(&mut self) -> Result<(), GrapherError> {
        let samples = if self.resolution >= PARALLEL_SAMPLING_FROM {
            sample_par(&self.expression, self.min_x, self.max_x, self.resolution)?
        } else {
            sample(&self.expression, self.min_x, self.max_x, self.resolution)?
        };
        let graph = GraphInfo::build(&samples, self.plot_rect)?;
        info!(
            "'{}' plotted on [{}, {}], y in [{}, {}]",
            self.expression.text(),
            self.min_x,
            self.max_x,
            graph.bounds().min_y,
            graph.bounds().max_y
        );
        self.samples = samples;
        self.graph = Some(graph);
        Ok(())
    }

    pub fn plot_rect(&self) -> PlotRect {
        self.plot_rect
    }

    /// The plot area moved or was resized.
    pub fn set_plot_rect(&mut self, rect: PlotRect) -> Result<(), GrapherError> {
        if let Some(graph) = &self.graph {
            self.graph = Some(graph.with_rect(rect)?);
        }
        self.plot_rect = rect;
        Ok(())
    }

    /// Routes a pointer event: to the integration sub-module while it is open, else to the zoom.
    /// Returns the owner of the input for this event.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InputOwner {
        let Some(graph) = self.graph else {
            return InputOwner::None;
        };
        if self.integration.is_active() {
            return if self.integration.handle_pointer(event, &graph) {
                InputOwner::Module(ModuleId::Integration)
            } else {
                InputOwner::None
            };
        }
        let consumed = match event {
            PointerEvent::Pressed { x, y } => self.zoom.press(x, graph.contains_pixel(x, y)),
            PointerEvent::Moved { x, .. } => {
                self.zoom.drag(x);
                self.zoom.is_dragging()
            }
            PointerEvent::Released { x, .. } => {
                if !self.zoom.is_dragging() {
                    return InputOwner::None;
                }
                self.zoom.drag(x);
                if let Some((min_x, max_x)) = self.zoom.commit_zoom(&graph) {
                    if let Err(e) = self.set_domain(min_x, max_x) {
                        warn!("zoom to [{}, {}] failed: {}", min_x, max_x, e);
                    }
                }
                true
            }
        };
        if consumed {
            InputOwner::Module(ModuleId::Grapher)
        } else {
            InputOwner::None
        }
    }

    pub fn zoom(&self) -> &ZoomSelector {
        &self.zoom
    }

    /// Tangent at the sample under pixel column `px`.
    pub fn tangent_at_pixel(&self, px: f64) -> Result<Tangent, GrapherError> {
        let graph = self.graph.as_ref().ok_or(GrapherError::NotReady)?;
        Ok(tangent_at_x(&self.samples, graph.unscale_x(px))?)
    }

    pub fn tangent_at(&self, x: f64) -> Result<Tangent, GrapherError> {
        Ok(tangent_at_x(&self.samples, x)?)
    }

    pub fn open_integration(&mut self) {
        self.integration.open();
    }

    pub fn close_integration(&mut self) {
        self.integration.close();
    }

    pub fn integration(&self) -> &IntegrationSubModule {
        &self.integration
    }

    pub fn set_integration_bounds(&mut self, from: f64, to: f64) {
        self.integration.set_selection(Selection::new(from, to));
    }

    /// Integral over the current selection.
    pub fn integration_result(&self) -> Result<f64, GrapherError> {
        Ok(self.integration.integrate(&self.samples)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn grapher(resolution: usize) -> GrapherModule {
        let config = GraphAnalyzeConfig {
            resolution,
            ..GraphAnalyzeConfig::default()
        };
        GrapherModule::from_config(&config)
    }

    #[test]
    fn test_initial_plot() {
        let grapher = grapher(1000);
        assert!(grapher.can_graph());
        let samples = grapher.samples();
        assert_eq!(samples.len(), 1001);
        assert_relative_eq!(samples.ys()[500], 1.0, epsilon = 1e-12);
        assert_relative_eq!(samples.ys()[1000], 3.0, epsilon = 1e-12);
        assert_relative_eq!(grapher.graph().unwrap().bounds().min_y, 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_parallel_resolution() {
        let grapher = grapher(5000);
        assert_eq!(grapher.samples().len(), 5001);
    }

    #[test]
    fn test_invalid_formula_keeps_plot() {
        let mut grapher = grapher(1000);
        let before = grapher.samples().clone();
        assert!(grapher.set_formula("x^").is_err());
        assert!(!grapher.can_graph());
        assert_eq!(grapher.samples(), &before);
        grapher.set_formula("2*x").unwrap();
        assert_relative_eq!(grapher.samples().ys()[1000], 2.0);
    }

    #[test]
    fn test_bad_domain_is_rejected() {
        let mut grapher = grapher(100);
        assert!(grapher.set_domain(1.0, -1.0).is_err());
        assert_eq!(grapher.domain(), (-1.0, 1.0));
    }

    #[test]
    fn test_zoom_resamples() {
        let mut grapher = grapher(1000);
        grapher.set_plot_rect(PlotRect::new(0.0, 0.0, 630.0, 400.0)).unwrap();
        assert_eq!(
            grapher.handle_pointer(PointerEvent::Pressed { x: 0.0, y: 100.0 }),
            InputOwner::Module(ModuleId::Grapher)
        );
        grapher.handle_pointer(PointerEvent::Moved { x: 100.0, y: 100.0 });
        grapher.handle_pointer(PointerEvent::Released { x: 315.0, y: 100.0 });
        let (min_x, max_x) = grapher.domain();
        assert_relative_eq!(min_x, -1.0);
        assert_relative_eq!(max_x, 0.0, epsilon = 2e-3);
        assert_eq!(grapher.samples().len(), 1001);
        assert_relative_eq!(grapher.samples().max_x().unwrap(), max_x);
    }

    #[test]
    fn test_press_outside_plot() {
        let mut grapher = grapher(100);
        assert_eq!(
            grapher.handle_pointer(PointerEvent::Pressed { x: 5000.0, y: 0.0 }),
            InputOwner::None
        );
    }

    #[test]
    fn test_integration_owns_input() {
        let mut grapher = grapher(1000);
        grapher.open_integration();
        let owner = grapher.handle_pointer(PointerEvent::Pressed { x: 0.0, y: 10.0 });
        assert_eq!(owner, InputOwner::Module(ModuleId::Integration));
        grapher.handle_pointer(PointerEvent::Released { x: 629.0, y: 10.0 });
        // the domain did not change, the selection did
        assert_eq!(grapher.domain(), (-1.0, 1.0));
        assert_relative_eq!(grapher.integration_result().unwrap(), 8.0 / 3.0, epsilon = 1e-5);
        grapher.close_integration();
        assert_eq!(
            grapher.handle_pointer(PointerEvent::Pressed { x: 0.0, y: 10.0 }),
            InputOwner::Module(ModuleId::Grapher)
        );
    }

    #[test]
    fn test_tangent() {
        let mut grapher = grapher(1000);
        grapher.set_formula("x^2").unwrap();
        let tangent = grapher.tangent_at(0.5).unwrap();
        assert_relative_eq!(tangent.slope, 1.0, epsilon = 3e-3);
        let tangent = grapher.tangent_at_pixel(0.0).unwrap();
        assert_relative_eq!(tangent.x, -1.0);
    }
}
