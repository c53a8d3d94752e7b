//! The application's modules as one enum, and the routing of pointer input between them.
//!
//! A module is opened in the workspace and receives the pointer events of the frame; the
//! module that consumed an event is reported as the `InputOwner`. Inside the grapher the
//! integration sub-module takes the input while it is open.
use crate::config::GraphAnalyzeConfig;
use crate::graph::diff_eq_module::DiffEqModule;
use crate::graph::grapher_module::GrapherModule;
use crate::probability::proba_tree::{ProbabilityLimits, ProbabilityModel};
use log::{info, warn};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ModuleId {
    Grapher,
    Integration,
    Probability,
    #[strum(serialize = "Differential equations")]
    DiffEq,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOwner {
    None,
    Module(ModuleId),
}

/// pointer position in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Pressed { x: f64, y: f64 },
    Moved { x: f64, y: f64 },
    Released { x: f64, y: f64 },
}

/// Probability model plus the views shown for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityModule {
    pub model: ProbabilityModel,
    pub show_tree: bool,
    pub show_histogram: bool,
    pub show_binomial: bool,
}

impl ProbabilityModule {
    pub fn from_config(config: &GraphAnalyzeConfig) -> ProbabilityModule {
        let limits = ProbabilityLimits {
            max_outcomes: config.max_outcomes,
            max_repetitions: config.max_repetitions,
            tolerance: config.probability_tolerance,
        };
        let mut model = ProbabilityModel::certain(limits);
        if let Err(e) = model
            .set_outcomes(2)
            .and_then(|_| model.set_repetitions(1))
        {
            warn!("probability module starts with a single outcome: {}", e);
        }
        ProbabilityModule {
            model,
            show_tree: true,
            show_histogram: false,
            show_binomial: false,
        }
    }

    /// Derived views are shown only for a valid probability vector.
    pub fn views_enabled(&self) -> bool {
        self.model.is_valid()
    }
}

#[derive(Debug, Clone)]
pub enum Module {
    Grapher(GrapherModule),
    Probability(ProbabilityModule),
    DiffEq(DiffEqModule),
}

impl Module {
    pub fn open(id: ModuleId, config: &GraphAnalyzeConfig) -> Module {
        match id {
            ModuleId::Grapher => Module::Grapher(GrapherModule::from_config(config)),
            ModuleId::Integration => {
                let mut grapher = GrapherModule::from_config(config);
                grapher.open_integration();
                Module::Grapher(grapher)
            }
            ModuleId::Probability => Module::Probability(ProbabilityModule::from_config(config)),
            ModuleId::DiffEq => Module::DiffEq(DiffEqModule::from_config(config)),
        }
    }

    pub fn id(&self) -> ModuleId {
        match self {
            Module::Grapher(grapher) if grapher.integration().is_active() => ModuleId::Integration,
            Module::Grapher(_) => ModuleId::Grapher,
            Module::Probability(_) => ModuleId::Probability,
            Module::DiffEq(_) => ModuleId::DiffEq,
        }
    }

    /// The probability and equation modules take no pointer input in the plot area.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> InputOwner {
        match self {
            Module::Grapher(grapher) => grapher.handle_pointer(event),
            Module::Probability(_) | Module::DiffEq(_) => InputOwner::None,
        }
    }
}

/// The open module, created from the configuration.
#[derive(Debug, Clone)]
pub struct Workspace {
    config: GraphAnalyzeConfig,
    current: Option<Module>,
}

impl Workspace {
    pub fn new(config: GraphAnalyzeConfig) -> Workspace {
        Workspace {
            config,
            current: None,
        }
    }

    pub fn config(&self) -> &GraphAnalyzeConfig {
        &self.config
    }

    /// Replaces the current module (the menu choice).
    pub fn open(&mut self, id: ModuleId) -> &mut Module {
        info!("opening module {}", id);
        self.current.insert(Module::open(id, &self.config))
    }

    pub fn close(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&Module> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Module> {
        self.current.as_mut()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> InputOwner {
        match self.current.as_mut() {
            Some(module) => module.handle_pointer(event),
            None => InputOwner::None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    fn workspace() -> Workspace {
        Workspace::new(GraphAnalyzeConfig {
            resolution: 200,
            ..GraphAnalyzeConfig::default()
        })
    }

    #[test]
    fn test_every_module_opens() {
        let mut workspace = workspace();
        for id in ModuleId::iter() {
            assert_eq!(workspace.open(id).id(), id);
        }
        assert_eq!(ModuleId::DiffEq.to_string(), "Differential equations");
    }

    #[test]
    fn test_routing() {
        let mut workspace = workspace();
        let press = PointerEvent::Pressed { x: 10.0, y: 10.0 };
        assert_eq!(workspace.handle_pointer(press), InputOwner::None);

        workspace.open(ModuleId::Integration);
        assert_eq!(
            workspace.handle_pointer(press),
            InputOwner::Module(ModuleId::Integration)
        );

        workspace.open(ModuleId::Grapher);
        assert_eq!(
            workspace.handle_pointer(press),
            InputOwner::Module(ModuleId::Grapher)
        );

        workspace.open(ModuleId::Probability);
        assert_eq!(workspace.handle_pointer(press), InputOwner::None);
    }

    #[test]
    fn test_probability_module_defaults() {
        let module = ProbabilityModule::from_config(&GraphAnalyzeConfig::default());
        assert_eq!(module.model.outcomes(), 2);
        assert_eq!(module.model.repetitions(), 1);
        assert!(module.views_enabled());
    }
}
