//! Scenario loading, saving, validation and compilation.

use std::path::Path;

use aq_controls::DesignParadigm;
use aq_project::Scenario;
use aq_sim::{SimConfig, Simulation};
use tracing::info;

use crate::error::{AppError, AppResult};

/// Load a YAML or JSON scenario (migrated and validated).
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let scenario = aq_project::load_scenario(path)?;
    info!(path = %path.display(), name = %scenario.name, "scenario loaded");
    Ok(scenario)
}

pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    aq_project::save_scenario(path, scenario).map_err(|e| match e {
        aq_project::ProjectError::Io(source) => AppError::ScenarioFileWrite {
            path: path.to_path_buf(),
            source,
        },
        other => other.into(),
    })?;
    info!(path = %path.display(), "scenario saved");
    Ok(())
}

pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    aq_project::validate_scenario(scenario).map_err(|e| AppError::Scenario(e.to_string()))
}

/// Scenario -> runtime configuration, with an optional seed override.
pub fn compile_scenario(scenario: &Scenario, seed: Option<u64>) -> AppResult<SimConfig> {
    validate_scenario(scenario)?;
    let mut config = scenario.to_sim_config()?;
    if seed.is_some() {
        config.seed = seed;
    }
    Ok(config)
}

pub fn build_simulation(scenario: &Scenario, seed: Option<u64>) -> AppResult<Simulation> {
    Ok(Simulation::new(compile_scenario(scenario, seed)?)?)
}

/// Write the stock scenario, refusing to overwrite.
pub fn init_scenario(path: &Path, name: &str) -> AppResult<Scenario> {
    if path.exists() {
        return Err(AppError::ScenarioExists(path.to_path_buf()));
    }
    let scenario = Scenario::example(name);
    save_scenario(path, &scenario)?;
    Ok(scenario)
}

pub fn list_paradigms() -> Vec<DesignParadigm> {
    DesignParadigm::presets()
}

pub fn find_paradigm(id: &str) -> AppResult<DesignParadigm> {
    Ok(DesignParadigm::preset(id)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_override_wins() {
        let mut scenario = Scenario::example("seeded");
        scenario.simulation.seed = Some(1);
        let config = compile_scenario(&scenario, Some(99)).unwrap();
        assert_eq!(config.seed, Some(99));
        let config = compile_scenario(&scenario, None).unwrap();
        assert_eq!(config.seed, Some(1));
    }

    #[test]
    fn unknown_paradigm_maps_to_not_found() {
        assert!(matches!(
            find_paradigm("aqueduct"),
            Err(AppError::ParadigmNotFound(id)) if id == "aqueduct"
        ));
    }

    #[test]
    fn init_refuses_overwrite() {
        let path = std::env::temp_dir().join("aq_app_init_refuses_overwrite.yaml");
        let _ = std::fs::remove_file(&path);
        init_scenario(&path, "first").unwrap();
        assert!(matches!(
            init_scenario(&path, "second"),
            Err(AppError::ScenarioExists(_))
        ));
        let loaded = load_scenario(&path).unwrap();
        assert_eq!(loaded.name, "first");
    }
}
