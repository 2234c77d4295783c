//! XP leveling curve
//!
//! Each level costs 50 XP more than the one before it, starting at 100 XP
//! for level 1 → 2. Levels stop at [`MAX_LEVEL`].

use crate::errors::{EngineError, EngineResult};
use crate::validation::validate_xp;
use serde::{Deserialize, Serialize};

/// Highest reachable level
pub const MAX_LEVEL: u32 = 100;

const BASE_LEVEL_COST: i64 = 100;
const LEVEL_COST_STEP: i64 = 50;

/// XP required to advance from `level` to `level + 1`
pub fn xp_for_level(level: u32) -> EngineResult<i64> {
    if level == 0 {
        return Err(EngineError::invalid("level must be at least 1"));
    }
    Ok(BASE_LEVEL_COST + i64::from(level - 1) * LEVEL_COST_STEP)
}

/// Position on the leveling curve for a cumulative XP total
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp_into_level: i64,
    pub xp_needed: i64,
}

impl LevelProgress {
    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_LEVEL
    }

    /// Share of the current level completed, 0 to 100
    pub fn progress_percent(&self) -> u32 {
        if self.xp_needed <= 0 || self.xp_into_level <= 0 {
            return 0;
        }
        // Past the cap xp_into_level is unbounded
        if self.xp_into_level >= self.xp_needed {
            return 100;
        }
        let pct = (200 * self.xp_into_level + self.xp_needed) / (2 * self.xp_needed);
        pct.clamp(0, 100) as u32
    }

    /// XP still missing for the next level, never negative
    pub fn xp_to_next_level(&self) -> i64 {
        (self.xp_needed - self.xp_into_level).max(0)
    }
}

/// Map cumulative XP to level, XP into that level and that level's cost
///
/// Past the level cap the level stays at [`MAX_LEVEL`] while `xp_into_level`
/// keeps growing. Negative XP is rejected.
pub fn level_from_xp(xp: i64) -> EngineResult<LevelProgress> {
    validate_xp(xp)?;

    let mut level = 1u32;
    let mut remaining = xp;
    let mut cost = xp_for_level(level)?;

    while level < MAX_LEVEL && remaining >= cost {
        remaining -= cost;
        level += 1;
        cost = xp_for_level(level)?;
    }

    Ok(LevelProgress {
        level,
        xp_into_level: remaining,
        xp_needed: cost,
    })
}

/// Total XP needed to reach `level` from zero
pub fn total_xp_for_level(level: u32) -> EngineResult<i64> {
    if level == 0 || level > MAX_LEVEL {
        return Err(EngineError::invalid(format!(
            "level must be between 1 and {}, got {}",
            MAX_LEVEL, level
        )));
    }
    (1..level).map(xp_for_level).sum()
}
