//! Scenario schema definitions.

use aq_plant::FaultSet;
use aq_signals::{DisturbanceConfig, DisturbanceKind};
use aq_sim::PlanStep;
use serde::{Deserialize, Serialize};

/// A complete, self-contained run description.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub paradigm: ParadigmDef,
    #[serde(default)]
    pub simulation: SimulationDef,
    pub demand: DisturbanceConfig,
    #[serde(default = "default_setpoint")]
    pub setpoint: DisturbanceConfig,
    #[serde(default)]
    pub faults: FaultSet,
    #[serde(default)]
    pub plans: Vec<PlanStep>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<TopologyDef>,
}

fn default_setpoint() -> DisturbanceConfig {
    DisturbanceConfig::constant(50.0)
}

/// Either a named preset or a fully specified design.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParadigmDef {
    Preset {
        preset: String,
    },
    Custom {
        id: String,
        name: String,
        tank_area_m2: f64,
        algorithm: aq_controls::Algorithm,
        #[serde(default)]
        metadata: aq_controls::ParadigmMetadata,
    },
}

impl Default for ParadigmDef {
    fn default() -> Self {
        ParadigmDef::Preset {
            preset: "reservoir".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SimulationDef {
    #[serde(default = "default_dt")]
    pub dt_s: f64,
    #[serde(default = "default_pipe_delay")]
    pub pipe_delay_s: f64,
    #[serde(default = "default_initial_level")]
    pub initial_level_m: f64,
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    #[serde(default = "default_valve_open")]
    pub valve_open: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_dt() -> f64 {
    0.1
}

fn default_pipe_delay() -> f64 {
    5.0
}

fn default_initial_level() -> f64 {
    50.0
}

fn default_history_len() -> usize {
    600
}

fn default_valve_open() -> bool {
    true
}

impl Default for SimulationDef {
    fn default() -> Self {
        Self {
            dt_s: default_dt(),
            pipe_delay_s: default_pipe_delay(),
            initial_level_m: default_initial_level(),
            history_len: default_history_len(),
            valve_open: default_valve_open(),
            seed: None,
        }
    }
}

/// Display-only network layout. Never solved; the plant is always a
/// single pump, pipe and tank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TopologyDef {
    #[serde(default)]
    pub nodes: Vec<TopologyNodeDef>,
    #[serde(default)]
    pub edges: Vec<TopologyEdgeDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopologyNodeDef {
    pub id: String,
    pub name: String,
    pub kind: TopologyNodeKind,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TopologyNodeKind {
    Pump,
    Pipe,
    Tank,
    Demand,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopologyEdgeDef {
    pub from_node_id: String,
    pub to_node_id: String,
}

impl TopologyDef {
    /// pump -> pipe -> tank -> demand.
    pub fn standard() -> Self {
        let node = |id: &str, name: &str, kind| TopologyNodeDef {
            id: id.to_string(),
            name: name.to_string(),
            kind,
        };
        let edge = |from: &str, to: &str| TopologyEdgeDef {
            from_node_id: from.to_string(),
            to_node_id: to.to_string(),
        };
        Self {
            nodes: vec![
                node("pump", "Pump Station", TopologyNodeKind::Pump),
                node("pipe", "Supply Pipe", TopologyNodeKind::Pipe),
                node("tank", "Storage Tank", TopologyNodeKind::Tank),
                node("demand", "Consumers", TopologyNodeKind::Demand),
            ],
            edges: vec![
                edge("pump", "pipe"),
                edge("pipe", "tank"),
                edge("tank", "demand"),
            ],
        }
    }
}

impl Scenario {
    /// The stock starting scenario: reservoir design, sinusoidal demand.
    pub fn example(name: impl Into<String>) -> Self {
        Self {
            version: crate::migrate::LATEST_VERSION,
            name: name.into(),
            description: String::new(),
            paradigm: ParadigmDef::default(),
            simulation: SimulationDef::default(),
            demand: DisturbanceConfig::new(DisturbanceKind::Sine, 50.0, 20.0, 0.05),
            setpoint: default_setpoint(),
            faults: FaultSet::default(),
            plans: Vec::new(),
            topology: Some(TopologyDef::standard()),
        }
    }
}
