//! Scenario schema migration. Versions start at 1.

use crate::ProjectError;
use crate::schema::{Scenario, TopologyDef};

pub const LATEST_VERSION: u32 = 2;

pub fn migrate_to_latest(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    while scenario.version < LATEST_VERSION {
        scenario = migrate_one_version(scenario)?;
    }
    Ok(scenario)
}

fn migrate_one_version(scenario: Scenario) -> Result<Scenario, ProjectError> {
    match scenario.version {
        1 => migrate_v1_to_v2(scenario),
        v => Err(ProjectError::Migration {
            what: format!("No migration path from version {}", v),
        }),
    }
}

/// Version 2 carries a display topology. Older files get the standard
/// pump/pipe/tank/demand chain.
fn migrate_v1_to_v2(mut scenario: Scenario) -> Result<Scenario, ProjectError> {
    if scenario.topology.is_none() {
        scenario.topology = Some(TopologyDef::standard());
    }
    scenario.version = 2;
    Ok(scenario)
}
