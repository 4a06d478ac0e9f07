//! Scenario validation logic.

use crate::migrate::LATEST_VERSION;
use crate::schema::{ParadigmDef, Scenario, SimulationDef, TopologyDef};
use aq_controls::DesignParadigm;
use aq_plant::FaultKind;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    validate_paradigm(&scenario.paradigm)?;
    validate_simulation(&scenario.simulation)?;

    scenario
        .demand
        .validate()
        .map_err(|e| invalid("demand", scenario.demand.kind, e.to_string()))?;
    scenario
        .setpoint
        .validate()
        .map_err(|e| invalid("setpoint", scenario.setpoint.kind, e.to_string()))?;

    for kind in FaultKind::ALL {
        scenario.faults.validate_kind(kind).map_err(|e| {
            invalid(
                &format!("faults.{kind}"),
                scenario.faults.get(kind).value,
                e.to_string(),
            )
        })?;
    }

    let mut plan_ids = HashSet::new();
    for plan in &scenario.plans {
        if !plan_ids.insert(plan.id) {
            return Err(ValidationError::DuplicateId {
                id: plan.id.to_string(),
                context: "plans".to_string(),
            });
        }
        plan.validate_trigger()
            .map_err(|e| invalid("plans.trigger_time", plan.trigger_time, e.to_string()))?;
        plan.action
            .validate()
            .map_err(|e| invalid("plans.payload", plan.action.describe(), e.to_string()))?;
    }

    if let Some(topology) = &scenario.topology {
        validate_topology(topology)?;
    }

    Ok(())
}

fn validate_paradigm(paradigm: &ParadigmDef) -> Result<(), ValidationError> {
    match paradigm {
        ParadigmDef::Preset { preset } => {
            DesignParadigm::preset(preset).map_err(|_| ValidationError::MissingReference {
                id: preset.clone(),
                context: "paradigm preset".to_string(),
            })?;
        }
        ParadigmDef::Custom {
            id, tank_area_m2, ..
        } => {
            if id.trim().is_empty() {
                return Err(invalid("paradigm.id", "", "must not be empty"));
            }
            if !tank_area_m2.is_finite() || *tank_area_m2 <= 0.0 {
                return Err(invalid(
                    "paradigm.tank_area_m2",
                    tank_area_m2,
                    "must be positive and finite",
                ));
            }
        }
    }
    Ok(())
}

fn validate_simulation(sim: &SimulationDef) -> Result<(), ValidationError> {
    if !sim.dt_s.is_finite() || sim.dt_s <= 0.0 {
        return Err(invalid("simulation.dt_s", sim.dt_s, "must be positive and finite"));
    }
    if !sim.pipe_delay_s.is_finite() || sim.pipe_delay_s < 0.0 {
        return Err(invalid(
            "simulation.pipe_delay_s",
            sim.pipe_delay_s,
            "must be non-negative and finite",
        ));
    }
    if !sim.initial_level_m.is_finite() || sim.initial_level_m < 0.0 {
        return Err(invalid(
            "simulation.initial_level_m",
            sim.initial_level_m,
            "must be non-negative and finite",
        ));
    }
    if sim.history_len == 0 {
        return Err(invalid("simulation.history_len", 0, "must be positive"));
    }
    Ok(())
}

fn validate_topology(topology: &TopologyDef) -> Result<(), ValidationError> {
    let mut node_ids = HashSet::new();
    for node in &topology.nodes {
        if !node_ids.insert(node.id.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: node.id.clone(),
                context: "topology nodes".to_string(),
            });
        }
    }
    for edge in &topology.edges {
        for id in [&edge.from_node_id, &edge.to_node_id] {
            if !node_ids.contains(id.as_str()) {
                return Err(ValidationError::MissingReference {
                    id: id.clone(),
                    context: "topology edge".to_string(),
                });
            }
        }
    }
    Ok(())
}
