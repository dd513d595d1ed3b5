//! Dao of Zero game state definitions.

use std::collections::{BTreeMap, BTreeSet};

use super::catalog::{ActionId, Feature, Resource, Stat, TechniqueId, UpgradeId};

/// Log entries kept, newest first.
pub const LOG_CAPACITY: usize = 20;
pub const STARTING_REALM: &str = "Qi Condensation";

/// Current resource balances. All values stay non-negative.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Balances {
    pub qi: f64,
    pub dao_marks: f64,
    pub insight: f64,
    pub prestige: f64,
}

impl Balances {
    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Qi => self.qi,
            Resource::DaoMarks => self.dao_marks,
            Resource::Insight => self.insight,
            Resource::Prestige => self.prestige,
        }
    }

    pub fn get_mut(&mut self, resource: Resource) -> &mut f64 {
        match resource {
            Resource::Qi => &mut self.qi,
            Resource::DaoMarks => &mut self.dao_marks,
            Resource::Insight => &mut self.insight,
            Resource::Prestige => &mut self.prestige,
        }
    }
}

/// What the player has bought, researched and used.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Progression {
    /// Upgrades absent from the map are level 0.
    pub levels: BTreeMap<UpgradeId, u32>,
    pub researched: BTreeSet<TechniqueId>,
    /// Host time (ms) of each action's last successful use.
    pub last_used: BTreeMap<ActionId, u64>,
}

impl Progression {
    pub fn level(&self, id: UpgradeId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    pub fn is_researched(&self, id: TechniqueId) -> bool {
        self.researched.contains(&id)
    }

    pub fn last_used(&self, id: ActionId) -> Option<u64> {
        self.last_used.get(&id).copied()
    }
}

/// Production stats derived from progression. Never edited directly; see
/// [`super::stats::recalculate`].
#[derive(Clone, Debug, PartialEq)]
pub struct DerivedStats {
    pub qi_per_click: f64,
    pub qi_per_second: f64,
    pub marks_per_click: f64,
    pub marks_per_second: f64,
    pub insight_per_second: f64,
    pub tribute_per_second: f64,
    pub global_multiplier: f64,
    pub qi_multiplier: f64,
    pub mark_multiplier: f64,
    pub refine_bonus: f64,
    pub refine_cost_reduction: f64,
    pub max_qi: f64,
}

impl Default for DerivedStats {
    fn default() -> Self {
        Self {
            qi_per_click: 1.0,
            qi_per_second: 0.0,
            marks_per_click: 0.0,
            marks_per_second: 0.0,
            insight_per_second: 0.0,
            tribute_per_second: 0.0,
            global_multiplier: 1.0,
            qi_multiplier: 1.0,
            mark_multiplier: 1.0,
            refine_bonus: 0.0,
            refine_cost_reduction: 0.0,
            max_qi: 100.0,
        }
    }
}

impl DerivedStats {
    pub fn stat_mut(&mut self, stat: Stat) -> &mut f64 {
        match stat {
            Stat::QiPerClick => &mut self.qi_per_click,
            Stat::QiPerSecond => &mut self.qi_per_second,
            Stat::MarksPerClick => &mut self.marks_per_click,
            Stat::MarksPerSecond => &mut self.marks_per_second,
            Stat::InsightPerSecond => &mut self.insight_per_second,
            Stat::GlobalMultiplier => &mut self.global_multiplier,
            Stat::QiMultiplier => &mut self.qi_multiplier,
            Stat::MarkMultiplier => &mut self.mark_multiplier,
            Stat::RefineBonus => &mut self.refine_bonus,
            Stat::RefineCostReduction => &mut self.refine_cost_reduction,
            Stat::MaxQi => &mut self.max_qi,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub autosave_enabled: bool,
    pub sound_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            autosave_enabled: true,
            sound_enabled: true,
        }
    }
}

/// A cultivation journal line.
#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// Whole seconds since the game started.
    pub elapsed_secs: u64,
    pub text: String,
    pub is_important: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Milestone {
    /// Phase 1 produced enough Dao Marks to move on.
    VesselPerfected,
}

/// Notifications for the presentation layer, drained once per frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    FeatureUnlocked(Feature),
    MilestoneReached(Milestone),
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub balances: Balances,
    pub progression: Progression,
    pub stats: DerivedStats,

    pub phase: u32,
    pub realm: String,
    pub total_marks_produced: f64,
    pub total_clicks: u64,
    /// Latch so the phase-2 milestone fires once.
    pub phase_two_announced: bool,

    pub settings: Settings,
    pub unlocked: BTreeSet<Feature>,

    /// Host time (ms) of the last processed tick; the simulation clock.
    pub last_tick_ms: u64,
    pub last_save_ms: u64,
    pub game_start_ms: u64,

    pub log: Vec<LogEntry>,
    /// Next lore line to reveal.
    pub lore_index: usize,
    pub events: Vec<GameEvent>,
}

impl GameState {
    pub fn new(now_ms: u64) -> Self {
        Self {
            balances: Balances::default(),
            progression: Progression::default(),
            stats: DerivedStats::default(),
            phase: 1,
            realm: STARTING_REALM.to_string(),
            total_marks_produced: 0.0,
            total_clicks: 0,
            phase_two_announced: false,
            settings: Settings::default(),
            unlocked: BTreeSet::new(),
            last_tick_ms: now_ms,
            last_save_ms: now_ms,
            game_start_ms: now_ms,
            log: Vec::new(),
            lore_index: 0,
            events: Vec::new(),
        }
    }

    /// Prepend a journal line stamped with the simulation clock.
    pub fn add_log(&mut self, text: &str, is_important: bool) {
        let elapsed_secs = self.last_tick_ms.saturating_sub(self.game_start_ms) / 1000;
        self.log.insert(
            0,
            LogEntry {
                elapsed_secs,
                text: text.to_string(),
                is_important,
            },
        );
        self.log.truncate(LOG_CAPACITY);
    }

    pub fn is_unlocked(&self, feature: Feature) -> bool {
        self.unlocked.contains(&feature)
    }

    /// Reveal a feature, notifying the presenter the first time only.
    pub fn unlock(&mut self, feature: Feature) {
        if self.unlocked.insert(feature) {
            self.events.push(GameEvent::FeatureUnlocked(feature));
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
