//! Stage definitions
//!
//! A stage is terrain geometry plus the two starting positions. Both
//! stages target the same 1024x768 arena; the volcano's floor is a
//! floating island, so anything that slips past its edges falls out of
//! the arena and despawns.

use serde::{Deserialize, Serialize};

use crate::sim::terrain::{Platform, Terrain, Wall};

/// Every playable stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StageId {
    Forest,
    Volcano,
}

/// One combatant's spawn point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StartPosition {
    pub x: f64,
    pub y: f64,
}

/// Full description of one stage
#[derive(Debug, Clone)]
pub struct Stage {
    pub id: StageId,
    pub terrain: Terrain,
    pub starts: [StartPosition; 2],
}

impl Stage {
    pub fn load(id: StageId) -> Self {
        match id {
            StageId::Forest => forest(),
            StageId::Volcano => volcano(),
        }
    }
}

fn platform(y: f64, x_left: f64, x_right: f64) -> Platform {
    Platform { y, x_left, x_right }
}

fn wall(x: f64, y_top: f64, y_bottom: f64) -> Wall {
    Wall { x, y_top, y_bottom }
}

/// Flat ground between two tree-trunk walls, with floating platforms
fn forest() -> Stage {
    Stage {
        id: StageId::Forest,
        terrain: Terrain {
            platforms: vec![
                platform(660.0, 0.0, 1024.0),
                platform(250.0, 60.0, 154.0),
                platform(575.0, 300.0, 724.0),
                platform(250.0, 870.0, 964.0),
                platform(100.0, 1024.0, 1124.0),
            ],
            walls: vec![wall(60.0, 0.0, 768.0), wall(964.0, 0.0, 768.0)],
        },
        starts: [
            StartPosition { x: 100.0, y: 190.0 },
            StartPosition { x: 896.0, y: 190.0 },
        ],
    }
}

/// A floating island with open edges and no walls
fn volcano() -> Stage {
    Stage {
        id: StageId::Volcano,
        terrain: Terrain {
            platforms: vec![
                platform(452.0, 200.0, 824.0),
                platform(352.0, 224.0, 324.0),
                platform(352.0, 700.0, 800.0),
                platform(100.0, 1024.0, 1124.0),
            ],
            walls: Vec::new(),
        },
        starts: [
            StartPosition { x: 250.0, y: 290.0 },
            StartPosition { x: 747.0, y: 290.0 },
        ],
    }
}
