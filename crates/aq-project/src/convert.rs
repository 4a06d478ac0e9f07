//! Scenario <-> runtime configuration.

use crate::schema::{ParadigmDef, Scenario, SimulationDef};
use crate::{ProjectResult, migrate::LATEST_VERSION, schema::TopologyDef};
use aq_controls::DesignParadigm;
use aq_core::units::m2;
use aq_sim::{PlanQueue, SimConfig};

impl ParadigmDef {
    /// Resolve to a runtime design. Custom areas enter through `uom`.
    pub fn resolve(&self) -> ProjectResult<DesignParadigm> {
        let paradigm = match self {
            ParadigmDef::Preset { preset } => DesignParadigm::preset(preset)?,
            ParadigmDef::Custom {
                id,
                name,
                tank_area_m2,
                algorithm,
                metadata,
            } => DesignParadigm::new(id.clone(), name.clone(), m2(*tank_area_m2), *algorithm)?
                .with_metadata(metadata.clone()),
        };
        Ok(paradigm)
    }

    /// Presets are written back by id; anything edited is written in full.
    pub fn from_paradigm(paradigm: &DesignParadigm) -> Self {
        match DesignParadigm::preset(&paradigm.id) {
            Ok(preset) if &preset == paradigm => ParadigmDef::Preset {
                preset: paradigm.id.clone(),
            },
            _ => ParadigmDef::Custom {
                id: paradigm.id.clone(),
                name: paradigm.name.clone(),
                tank_area_m2: paradigm.tank_area_m2,
                algorithm: paradigm.algorithm,
                metadata: paradigm.metadata.clone(),
            },
        }
    }
}

impl Scenario {
    pub fn to_sim_config(&self) -> ProjectResult<SimConfig> {
        let sim = &self.simulation;
        let config = SimConfig {
            dt: sim.dt_s,
            pipe_delay_s: sim.pipe_delay_s,
            initial_level: sim.initial_level_m,
            history_len: sim.history_len,
            paradigm: self.paradigm.resolve()?,
            demand: self.demand.clone(),
            setpoint: self.setpoint.clone(),
            faults: self.faults,
            plans: PlanQueue::from(self.plans.clone()),
            valve_open: sim.valve_open,
            seed: sim.seed,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_sim_config(name: impl Into<String>, config: &SimConfig) -> Self {
        Self {
            version: LATEST_VERSION,
            name: name.into(),
            description: String::new(),
            paradigm: ParadigmDef::from_paradigm(&config.paradigm),
            simulation: SimulationDef {
                dt_s: config.dt,
                pipe_delay_s: config.pipe_delay_s,
                initial_level_m: config.initial_level,
                history_len: config.history_len,
                valve_open: config.valve_open,
                seed: config.seed,
            },
            demand: config.demand.clone(),
            setpoint: config.setpoint.clone(),
            faults: config.faults,
            plans: config.plans.steps().to_vec(),
            topology: Some(TopologyDef::standard()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aq_controls::Algorithm;

    #[test]
    fn example_compiles_to_default_config() {
        let config = Scenario::example("stock").to_sim_config().unwrap();
        assert_eq!(config, SimConfig::default());
    }

    #[test]
    fn preset_round_trips_by_id() {
        let paradigm = DesignParadigm::preset("predictive").unwrap();
        let def = ParadigmDef::from_paradigm(&paradigm);
        assert_eq!(
            def,
            ParadigmDef::Preset {
                preset: "predictive".to_string()
            }
        );
        assert_eq!(def.resolve().unwrap(), paradigm);
    }

    #[test]
    fn edited_preset_written_in_full() {
        let mut paradigm = DesignParadigm::preset("reservoir").unwrap();
        paradigm.tank_area_m2 = 250.0;
        let def = ParadigmDef::from_paradigm(&paradigm);
        assert!(matches!(def, ParadigmDef::Custom { tank_area_m2, .. } if tank_area_m2 == 250.0));
        let resolved = def.resolve().unwrap();
        assert_eq!(resolved.algorithm, Algorithm::Pid);
        assert_eq!(resolved, paradigm);
    }
}
