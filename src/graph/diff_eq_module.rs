use crate::config::GraphAnalyzeConfig;
use crate::graph::graph_info::{GraphError, GraphInfo, PlotRect};
use crate::numerical::linear_ODE::{LinearODE, OdeError};
use crate::numerical::sampler::SampleSet;
use log::warn;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum DiffEqError {
    Ode(OdeError),
    Graph(GraphError),
}

impl fmt::Display for DiffEqError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiffEqError::Ode(e) => write!(f, "{}", e),
            DiffEqError::Graph(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for DiffEqError {}

impl From<OdeError> for DiffEqError {
    fn from(e: OdeError) -> Self {
        DiffEqError::Ode(e)
    }
}

impl From<GraphError> for DiffEqError {
    fn from(e: GraphError) -> Self {
        DiffEqError::Graph(e)
    }
}

/// Linear ODE editor with its last solution and plot mapping.
#[derive(Debug, Clone)]
pub struct DiffEqModule {
    ode: LinearODE,
    solution: Option<SampleSet>,
    graph: Option<GraphInfo>,
    plot_rect: PlotRect,
}

impl DiffEqModule {
    pub fn from_config(config: &GraphAnalyzeConfig) -> DiffEqModule {
        let mut ode = LinearODE::new().with_limits(config.max_ode_degree, config.ode_max_steps);
        ode.set_domain(config.min_x, config.max_x);
        DiffEqModule {
            ode,
            solution: None,
            graph: None,
            plot_rect: PlotRect::default(),
        }
    }

    pub fn ode(&self) -> &LinearODE {
        &self.ode
    }

    /// Edits go to the system directly; the solution is only replaced by `solve`.
    pub fn ode_mut(&mut self) -> &mut LinearODE {
        &mut self.ode
    }

    /// whether the solve button does something
    pub fn can_solve(&self) -> bool {
        self.ode.can_solve()
    }

    /// Solves and replaces the plotted solution. On failure the previous one stays.
    pub fn solve(&mut self) -> Result<&SampleSet, DiffEqError> {
        let solution = self.ode.solve().inspect_err(|e| warn!("not solved: {}", e))?;
        let graph = GraphInfo::build(&solution, self.plot_rect)?;
        self.graph = Some(graph);
        Ok(self.solution.insert(solution))
    }

    pub fn solution(&self) -> Option<&SampleSet> {
        self.solution.as_ref()
    }

    pub fn graph(&self) -> Option<&GraphInfo> {
        self.graph.as_ref()
    }

    pub fn set_plot_rect(&mut self, rect: PlotRect) -> Result<(), DiffEqError> {
        if let Some(graph) = &self.graph {
            self.graph = Some(graph.with_rect(rect)?);
        }
        self.plot_rect = rect;
        Ok(())
    }
}
