//! Engine configuration and parameter synchronization
//!
//! [`EngineConfig`] holds the strength and resource knobs of the analysis
//! engine. [`EngineSynchronizer`] remembers the last configuration that was
//! successfully applied and only sends the parameters that changed since.
//!
//! # Cheap vs expensive parameters
//!
//! | Parameter      | UCI option    | Cost                               |
//! |----------------|---------------|------------------------------------|
//! | `search_depth` | (`go depth`)  | cheap, per search                  |
//! | `skill_level`  | `Skill Level` | cheap                              |
//! | `thread_count` | `Threads`     | expensive, respawns search threads |
//! | `hash_size_mb` | `Hash`        | expensive, reallocates the table   |
//!
//! Depth and skill are re-sent together whenever either differs. Threads and
//! hash are sent only when they differ from the last applied snapshot.

use crate::game::ai::AnalysisEngine;
use crate::game::error::EngineError;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{debug, info, warn};

/// Valid `Skill Level` values
pub const SKILL_RANGE: RangeInclusive<u8> = 0..=20;

/// Depth range offered to the user
pub const DEPTH_RANGE: RangeInclusive<u32> = 10..=30;

/// Analysis engine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub search_depth: u32,
    pub skill_level: u8,
    pub thread_count: u32,
    pub hash_size_mb: u32,
}

impl Default for EngineConfig {
    /// Full strength, depth 18, 3 threads, 128 MB hash
    fn default() -> Self {
        Self {
            search_depth: 18,
            skill_level: 20,
            thread_count: 3,
            hash_size_mb: 128,
        }
    }
}

impl EngineConfig {
    /// Copy with every field forced into its valid range
    pub fn normalized(self) -> Self {
        Self {
            search_depth: self.search_depth.max(1),
            skill_level: self.skill_level.min(*SKILL_RANGE.end()),
            thread_count: self.thread_count.max(1),
            hash_size_mb: self.hash_size_mb.max(1),
        }
    }
}

/// One parameter-update command for the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamUpdate {
    SearchDepth(u32),
    SkillLevel(u8),
    Threads(u32),
    HashMb(u32),
    Ponder(bool),
}

impl ParamUpdate {
    /// UCI option name, `None` for limits passed with `go`
    pub fn option_name(&self) -> Option<&'static str> {
        match self {
            ParamUpdate::SearchDepth(_) => None,
            ParamUpdate::SkillLevel(_) => Some("Skill Level"),
            ParamUpdate::Threads(_) => Some("Threads"),
            ParamUpdate::HashMb(_) => Some("Hash"),
            ParamUpdate::Ponder(_) => Some("Ponder"),
        }
    }

    pub fn value(&self) -> String {
        match self {
            ParamUpdate::SearchDepth(v) => v.to_string(),
            ParamUpdate::SkillLevel(v) => v.to_string(),
            ParamUpdate::Threads(v) => v.to_string(),
            ParamUpdate::HashMb(v) => v.to_string(),
            ParamUpdate::Ponder(v) => v.to_string(),
        }
    }

    pub fn is_expensive(&self) -> bool {
        matches!(self, ParamUpdate::Threads(_) | ParamUpdate::HashMb(_))
    }
}

/// Commands needed to move the engine from `last_applied` to `desired`,
/// paired with the snapshot to store once they have been applied
///
/// With no snapshot every field is sent, plus `Ponder false`.
pub fn sync_if_needed(
    last_applied: Option<&EngineConfig>,
    desired: &EngineConfig,
) -> (EngineConfig, Vec<ParamUpdate>) {
    let mut updates = Vec::new();
    match last_applied {
        None => {
            updates.push(ParamUpdate::Threads(desired.thread_count));
            updates.push(ParamUpdate::HashMb(desired.hash_size_mb));
            updates.push(ParamUpdate::Ponder(false));
            updates.push(ParamUpdate::SearchDepth(desired.search_depth));
            updates.push(ParamUpdate::SkillLevel(desired.skill_level));
        }
        Some(last) => {
            if last.thread_count != desired.thread_count {
                updates.push(ParamUpdate::Threads(desired.thread_count));
            }
            if last.hash_size_mb != desired.hash_size_mb {
                updates.push(ParamUpdate::HashMb(desired.hash_size_mb));
            }
            if last.search_depth != desired.search_depth || last.skill_level != desired.skill_level {
                updates.push(ParamUpdate::SearchDepth(desired.search_depth));
                updates.push(ParamUpdate::SkillLevel(desired.skill_level));
            }
        }
    }
    (*desired, updates)
}

/// Session-scoped snapshot of the last configuration the engine accepted
#[derive(Debug, Clone, Default)]
pub struct EngineSynchronizer {
    last_applied: Option<EngineConfig>,
}

impl EngineSynchronizer {
    pub fn last_applied(&self) -> Option<&EngineConfig> {
        self.last_applied.as_ref()
    }

    /// Forget the snapshot so the next sync sends every field
    pub fn invalidate(&mut self) {
        self.last_applied = None;
    }

    /// Bring `engine` in line with `desired`, returning the commands sent
    ///
    /// # Errors
    ///
    /// The first transport error aborts the sync. The snapshot is left as it
    /// was, so the next call retries the whole diff.
    pub fn sync(
        &mut self,
        engine: &mut dyn AnalysisEngine,
        desired: &EngineConfig,
    ) -> Result<Vec<ParamUpdate>, EngineError> {
        let (snapshot, updates) = sync_if_needed(self.last_applied.as_ref(), desired);
        if updates.is_empty() {
            return Ok(updates);
        }

        for update in &updates {
            if update.is_expensive() {
                info!("[ENGINE] Applying {:?} (expensive)", update);
            } else {
                debug!("[ENGINE] Applying {:?}", update);
            }
            if let Err(e) = engine.configure(update) {
                warn!("[ENGINE] Configuration failed at {:?}: {}", update, e);
                return Err(e);
            }
        }

        self.last_applied = Some(snapshot);
        Ok(updates)
    }
}
