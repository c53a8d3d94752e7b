/// # Graph info
/// mapping between function space and the pixels of the plot rectangle
///# Example
/// ```
/// use GraphAnalyze::graph::graph_info::{DisplayBounds, GraphInfo, PlotRect};
/// let graph = GraphInfo::new(
///     DisplayBounds::new(-1.0, 1.0, 0.0, 2.0),
///     PlotRect::new(0.0, 0.0, 630.0, 400.0),
/// )
/// .unwrap();
/// let (px, py) = graph.scale(0.5, 1.5);
/// let (x, y) = graph.unscale(px, py);
/// assert!((x - 0.5).abs() < 1e-12 && (y - 1.5).abs() < 1e-12);
/// ```
pub mod graph_info;
/// drag state machine for zoom and for integration bounds
pub mod selection;
pub mod integration_module;
/// # Grapher
/// formula, domain and samples with zoom, tangent and integral
///# Example
/// ```
/// use GraphAnalyze::config::GraphAnalyzeConfig;
/// use GraphAnalyze::graph::grapher_module::GrapherModule;
/// use GraphAnalyze::graph::modules::PointerEvent;
/// let mut grapher = GrapherModule::from_config(&GraphAnalyzeConfig::default());
/// // drag over the left half of the default 630 px wide plot
/// grapher.handle_pointer(PointerEvent::Pressed { x: 0.0, y: 100.0 });
/// grapher.handle_pointer(PointerEvent::Released { x: 315.0, y: 100.0 });
/// let (min_x, max_x) = grapher.domain();
/// assert!((min_x + 1.0).abs() < 1e-12 && max_x.abs() < 2e-3);
/// ```
pub mod grapher_module;
pub mod diff_eq_module;
/// modules of the application and pointer input routing
pub mod modules;
