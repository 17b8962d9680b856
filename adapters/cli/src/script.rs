//! Scripted player actions loaded from TOML.
//!
//! ```toml
//! [[action]]
//! tick = 0
//! kind = "place"
//! structure = "basic"
//! column = 2
//! row = 4
//!
//! [[action]]
//! tick = 30
//! kind = "start"
//! ```

use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use lane_defense_core::{BuildKind, Catalog, CellCoord, Command, StructureId, TargetMode};
use serde::Deserialize;

/// Parsed script file.
#[derive(Clone, Debug, Default, Deserialize)]
pub(crate) struct Script {
    #[serde(default, rename = "action")]
    actions: Vec<ScriptedAction>,
}

#[derive(Clone, Debug, Deserialize)]
struct ScriptedAction {
    tick: u64,
    #[serde(flatten)]
    action: Action,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum Action {
    Place {
        structure: String,
        column: u32,
        row: u32,
    },
    Sell {
        id: u32,
    },
    Upgrade {
        id: u32,
    },
    Target {
        id: u32,
        mode: TargetMode,
    },
    Start,
}

impl Script {
    /// Reads and parses a script file.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid script {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Resolves structure names and groups the commands by tick.
    pub(crate) fn schedule(&self, catalog: &Catalog) -> Result<BTreeMap<u64, Vec<Command>>> {
        let mut schedule: BTreeMap<u64, Vec<Command>> = BTreeMap::new();
        for scripted in &self.actions {
            let command = scripted.action.to_command(catalog)?;
            schedule.entry(scripted.tick).or_default().push(command);
        }
        Ok(schedule)
    }
}

impl Action {
    fn to_command(&self, catalog: &Catalog) -> Result<Command> {
        let command = match self {
            Self::Place {
                structure,
                column,
                row,
            } => {
                let kind = if structure == "bank" {
                    BuildKind::Bank
                } else {
                    match catalog.tower_kind(structure) {
                        Some(tower) => BuildKind::Tower(tower),
                        None => bail!("unknown structure '{structure}'"),
                    }
                };
                Command::PlaceStructure {
                    kind,
                    cell: CellCoord::new(*column, *row),
                }
            }
            Self::Sell { id } => Command::SellStructure {
                structure: StructureId::new(*id),
            },
            Self::Upgrade { id } => Command::UpgradeTower {
                structure: StructureId::new(*id),
            },
            Self::Target { id, mode } => Command::SetTargetMode {
                structure: StructureId::new(*id),
                mode: *mode,
            },
            Self::Start => Command::StartNextWave,
        };
        Ok(command)
    }
}
