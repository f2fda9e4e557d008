use serde::{Deserialize, Serialize};

/// YAML-configurable parameters governing inference runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferConfig {
    /// Master seed and substream policy.
    #[serde(default)]
    pub seed_policy: SeedPolicy,
    /// Enumeration bounds and search order.
    #[serde(default)]
    pub enumerate: EnumerateConfig,
    /// Particle filter settings.
    #[serde(default)]
    pub smc: SmcConfig,
}

impl Default for InferConfig {
    fn default() -> Self {
        Self {
            seed_policy: SeedPolicy::default(),
            enumerate: EnumerateConfig::default(),
            smc: SmcConfig::default(),
        }
    }
}

/// Deterministic seeding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedPolicy {
    /// Master seed used by the engine.
    #[serde(default = "default_master_seed")]
    pub master_seed: u64,
    /// Optional label recorded alongside run reports.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_master_seed() -> u64 {
    0x5E1E_5EED_5E1E_5EED_u64
}

impl Default for SeedPolicy {
    fn default() -> Self {
        Self {
            master_seed: default_master_seed(),
            label: None,
        }
    }
}

/// Enumeration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnumerateConfig {
    /// Maximum number of completed executions before the marginal is closed.
    #[serde(default = "default_max_executions")]
    pub max_executions: usize,
    /// Frontier discipline.
    #[serde(default)]
    pub order: SearchOrder,
}

fn default_max_executions() -> usize {
    1000
}

impl Default for EnumerateConfig {
    fn default() -> Self {
        Self {
            max_executions: default_max_executions(),
            order: SearchOrder::default(),
        }
    }
}

impl EnumerateConfig {
    /// Best-first enumeration bounded by `max_executions`.
    pub fn likely_first(max_executions: usize) -> Self {
        Self {
            max_executions,
            order: SearchOrder::LikelyFirst,
        }
    }

    /// Depth-first enumeration bounded by `max_executions`.
    pub fn depth_first(max_executions: usize) -> Self {
        Self {
            max_executions,
            order: SearchOrder::DepthFirst,
        }
    }

    /// Breadth-first enumeration bounded by `max_executions`.
    pub fn breadth_first(max_executions: usize) -> Self {
        Self {
            max_executions,
            order: SearchOrder::BreadthFirst,
        }
    }
}

/// Order in which enumeration explores its frontier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchOrder {
    /// Highest cumulative log-score first (priority queue).
    LikelyFirst,
    /// Most recently enqueued first (LIFO).
    DepthFirst,
    /// Earliest enqueued first (FIFO).
    BreadthFirst,
}

impl Default for SearchOrder {
    fn default() -> Self {
        SearchOrder::LikelyFirst
    }
}

/// Particle filter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmcConfig {
    /// Number of synchronized particles.
    #[serde(default = "default_particles")]
    pub particles: usize,
}

fn default_particles() -> usize {
    100
}

impl Default for SmcConfig {
    fn default() -> Self {
        Self {
            particles: default_particles(),
        }
    }
}
