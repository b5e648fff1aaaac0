use crate::path::CostModel;

/// Game configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Cost model used when planning concrete routes.
    pub cost_model: CostModel,

    /// Path-cost units covered by one action point. With the octile model's
    /// straight cost of 10 the default makes a cardinal step cost 1 AP and a
    /// diagonal step round up to 2.
    pub units_per_ap: u32,

    /// Radius (Chebyshev, in tiles) within which an enemy can sight the
    /// player and trigger combat.
    pub sight_radius: u32,

    /// Radius around an enemy's spawn cell for random patrol destinations.
    pub patrol_radius: u32,

    /// Minimum ticks between movement-preview recalculations while the
    /// pointer is held down.
    pub preview_recalc_interval: u64,

    /// Sides on the initiative die. Initiative = dexterity + 1d{sides}.
    pub initiative_die: u32,

    /// Edge length of one tile in continuous world units.
    pub cell_size: f32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum combatants in one encounter (player + enemies).
    pub const MAX_COMBATANTS: usize = 16;
    /// Bounded neighbor expansion: 4 cardinal + 4 diagonal directions.
    pub const MAX_NEIGHBORS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_UNITS_PER_AP: u32 = 10;
    pub const DEFAULT_SIGHT_RADIUS: u32 = 5;
    pub const DEFAULT_PATROL_RADIUS: u32 = 5;
    pub const DEFAULT_PREVIEW_RECALC_INTERVAL: u64 = 6;
    pub const DEFAULT_INITIATIVE_DIE: u32 = 10;
    pub const DEFAULT_CELL_SIZE: f32 = 0.5;

    pub fn new() -> Self {
        Self {
            cost_model: CostModel::default(),
            units_per_ap: Self::DEFAULT_UNITS_PER_AP,
            sight_radius: Self::DEFAULT_SIGHT_RADIUS,
            patrol_radius: Self::DEFAULT_PATROL_RADIUS,
            preview_recalc_interval: Self::DEFAULT_PREVIEW_RECALC_INTERVAL,
            initiative_die: Self::DEFAULT_INITIATIVE_DIE,
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }

    pub fn with_cost_model(cost_model: CostModel) -> Self {
        Self {
            cost_model,
            ..Self::new()
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
