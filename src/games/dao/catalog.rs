//! Dao of Zero catalog: resources, upgrades, techniques and actions.
//!
//! Everything here is `'static` and never mutated. Declaration order is the
//! order stat recalculation replays effects in, and the order item lists are
//! shown in.

/// A resource the player accumulates and spends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    Qi,
    DaoMarks,
    Insight,
    Prestige,
}

impl Resource {
    #[cfg(test)]
    pub const ALL: [Resource; 4] = [
        Resource::Qi,
        Resource::DaoMarks,
        Resource::Insight,
        Resource::Prestige,
    ];

    /// Key used in save data and cost breakdowns.
    pub fn key(self) -> &'static str {
        match self {
            Resource::Qi => "qi",
            Resource::DaoMarks => "daoMarks",
            Resource::Insight => "insight",
            Resource::Prestige => "prestige",
        }
    }

    /// Display name.
    pub fn label(self) -> &'static str {
        match self {
            Resource::Qi => "Qi",
            Resource::DaoMarks => "Dao Marks",
            Resource::Insight => "Insight",
            Resource::Prestige => "Prestige",
        }
    }
}

/// One line of a cost.
pub type CostEntry = (Resource, f64);

/// A resolved cost. Resources not listed are unconstrained.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cost(pub Vec<CostEntry>);

impl Cost {
    pub fn from_entries(entries: &[CostEntry]) -> Self {
        Self(entries.to_vec())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CostEntry> {
        self.0.iter()
    }

    #[cfg(test)]
    pub fn amount(&self, resource: Resource) -> Option<f64> {
        self.0
            .iter()
            .find(|(r, _)| *r == resource)
            .map(|(_, amount)| *amount)
    }
}

/// Derived stats an effect can target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stat {
    QiPerClick,
    QiPerSecond,
    MarksPerClick,
    MarksPerSecond,
    InsightPerSecond,
    GlobalMultiplier,
    QiMultiplier,
    MarkMultiplier,
    RefineBonus,
    RefineCostReduction,
    MaxQi,
}

/// Effect descriptor, interpreted by the stat recalculation engine.
///
/// Effects only ever see a freshly reset stat block, so `Add` and `Scale`
/// are safe to replay on every recalculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// `stat = base + per_level * level`
    Set { stat: Stat, base: f64, per_level: f64 },
    /// `stat += per_level * level`
    Add { stat: Stat, per_level: f64 },
    /// `stat *= factor ^ level`
    Scale { stat: Stat, factor: f64 },
}

/// Parts of the interface that start hidden and are revealed by progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Feature {
    InsightDisplay,
    StatsGroup,
    PrestigeDisplay,
    ActionsSection,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::InsightDisplay,
        Feature::StatsGroup,
        Feature::PrestigeDisplay,
        Feature::ActionsSection,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Feature::InsightDisplay => "insight",
            Feature::StatsGroup => "stats",
            Feature::PrestigeDisplay => "prestige",
            Feature::ActionsSection => "actions",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.key() == key)
    }

    pub fn label(self) -> &'static str {
        match self {
            Feature::InsightDisplay => "Insight",
            Feature::StatsGroup => "Cultivation Stats",
            Feature::PrestigeDisplay => "Prestige",
            Feature::ActionsSection => "Actions",
        }
    }
}

/// Minimum upgrade level needed before an item is shown or can be bought.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Requirement {
    pub upgrade: UpgradeId,
    pub level: u32,
}

const fn req(upgrade: UpgradeId, level: u32) -> Requirement {
    Requirement { upgrade, level }
}

// ── Upgrades ────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UpgradeId {
    FocusedBreathing,
    ManualRefinement,
    MentalClarity,
    MeridianDredging,
    BreathingRhythm,
    DantianExpansion,
    QiCompression,
    AutonomicCycling,
    IronSkinChant,
    GoldenMarrowInjection,
    FiveVisceraRemoval,
    VoidPulseHeart,
    DivineSenseAwakening,
}

impl UpgradeId {
    pub const ALL: [UpgradeId; 13] = [
        UpgradeId::FocusedBreathing,
        UpgradeId::ManualRefinement,
        UpgradeId::MentalClarity,
        UpgradeId::MeridianDredging,
        UpgradeId::BreathingRhythm,
        UpgradeId::DantianExpansion,
        UpgradeId::QiCompression,
        UpgradeId::AutonomicCycling,
        UpgradeId::IronSkinChant,
        UpgradeId::GoldenMarrowInjection,
        UpgradeId::FiveVisceraRemoval,
        UpgradeId::VoidPulseHeart,
        UpgradeId::DivineSenseAwakening,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn def(self) -> &'static UpgradeDef {
        &UPGRADES[self.index()]
    }

    pub fn key(self) -> &'static str {
        self.def().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        UPGRADES.iter().find(|d| d.key == key).map(|d| d.id)
    }
}

/// A leveled upgrade with geometrically scaling cost.
#[derive(Debug)]
pub struct UpgradeDef {
    pub id: UpgradeId,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub effect_text: &'static str,
    pub base_cost: &'static [CostEntry],
    pub cost_multiplier: f64,
    pub max_level: u32,
    pub requires: &'static [Requirement],
    pub effects: &'static [Effect],
    /// Revealed the first time the upgrade is bought.
    pub unlocks: &'static [Feature],
    pub unlock_message: Option<&'static str>,
}

pub static UPGRADES: [UpgradeDef; 13] = [
    // Tier 0: Dao Mark sinks
    UpgradeDef {
        id: UpgradeId::FocusedBreathing,
        key: "focusedBreathing",
        name: "Focused Breathing",
        description: "Concentrate on each breath. Quality over quantity.",
        effect_text: "+1 Qi per click",
        base_cost: &[(Resource::DaoMarks, 5.0)],
        cost_multiplier: 2.0,
        max_level: 5,
        requires: &[],
        effects: &[Effect::Set { stat: Stat::QiPerClick, base: 1.0, per_level: 1.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::ManualRefinement,
        key: "manualRefinement",
        name: "Manual Refinement",
        description: "Learn to compress Qi into Dao Marks more efficiently.",
        effect_text: "Refine Qi action gives +1 extra Dao Mark",
        base_cost: &[(Resource::DaoMarks, 10.0)],
        cost_multiplier: 3.0,
        max_level: 3,
        requires: &[],
        effects: &[Effect::Set { stat: Stat::RefineBonus, base: 0.0, per_level: 1.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::MentalClarity,
        key: "mentalClarity",
        name: "Mental Clarity",
        description: "A clear mind optimizes the breathing cycle.",
        effect_text: "Reduce Refine Qi cost by 1",
        base_cost: &[(Resource::DaoMarks, 15.0)],
        cost_multiplier: 2.0,
        max_level: 3,
        requires: &[],
        effects: &[Effect::Set { stat: Stat::RefineCostReduction, base: 0.0, per_level: 1.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    // Tier 1
    UpgradeDef {
        id: UpgradeId::MeridianDredging,
        key: "meridianDredging",
        name: "Meridian Dredging",
        description: "The pathways are clogged with mortal filth. Force them open with jagged Qi.",
        effect_text: "+1 Dao Mark per click",
        base_cost: &[(Resource::Qi, 50.0)],
        cost_multiplier: 2.0,
        max_level: 5,
        requires: &[],
        effects: &[Effect::Set { stat: Stat::MarksPerClick, base: 0.0, per_level: 1.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::BreathingRhythm,
        key: "breathingRhythm",
        name: "Breathing Rhythm",
        description: "Establish a steady rhythm. The body remembers the pattern.",
        effect_text: "+0.5 Qi/sec",
        base_cost: &[(Resource::Qi, 30.0), (Resource::DaoMarks, 10.0)],
        cost_multiplier: 1.8,
        max_level: 5,
        requires: &[],
        effects: &[Effect::Add { stat: Stat::QiPerSecond, per_level: 0.5 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::DantianExpansion,
        key: "dantianExpansion",
        name: "Dantian Expansion",
        description: "The Sea of Qi is a cup. Smash the cup. Make it a lake.",
        effect_text: "+50 Max Qi per level",
        base_cost: &[(Resource::Qi, 80.0)],
        cost_multiplier: 1.5,
        max_level: 10,
        requires: &[],
        effects: &[Effect::Set { stat: Stat::MaxQi, base: 100.0, per_level: 50.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::QiCompression,
        key: "qiCompression",
        name: "Qi Compression",
        description: "Compress Qi into denser forms. More output per breath.",
        effect_text: "+2 Qi per click",
        base_cost: &[(Resource::Qi, 100.0), (Resource::DaoMarks, 25.0)],
        cost_multiplier: 2.0,
        max_level: 3,
        requires: &[],
        effects: &[Effect::Add { stat: Stat::QiPerClick, per_level: 2.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::AutonomicCycling,
        key: "autonomicCycling",
        name: "Autonomic Cycling",
        description: "Conscious breathing is inefficient. Delegate the task to the spinal cord.",
        effect_text: "Unlocks automatic Qi generation: +2 Qi/sec",
        base_cost: &[(Resource::Qi, 200.0), (Resource::DaoMarks, 50.0)],
        cost_multiplier: 1.0,
        max_level: 1,
        requires: &[],
        effects: &[Effect::Add { stat: Stat::QiPerSecond, per_level: 2.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    // Tier 2
    UpgradeDef {
        id: UpgradeId::IronSkinChant,
        key: "ironSkinChant",
        name: "Iron Skin Chant",
        description: "Nerve endings are unnecessary sensors. Calcify the dermis.",
        effect_text: "+5% global production",
        base_cost: &[(Resource::Qi, 1_000.0)],
        cost_multiplier: 2.5,
        max_level: 5,
        requires: &[req(UpgradeId::AutonomicCycling, 1)],
        effects: &[Effect::Add { stat: Stat::GlobalMultiplier, per_level: 0.05 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::GoldenMarrowInjection,
        key: "goldenMarrowInjection",
        name: "Golden Marrow Injection",
        description: "Bone marrow produces weak blood. Replace it with molten gold essence.",
        effect_text: "2x Dao Mark production",
        base_cost: &[(Resource::Qi, 5_000.0), (Resource::DaoMarks, 100.0)],
        cost_multiplier: 5.0,
        max_level: 3,
        requires: &[req(UpgradeId::IronSkinChant, 1)],
        effects: &[Effect::Scale { stat: Stat::MarkMultiplier, factor: 2.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::FiveVisceraRemoval,
        key: "fiveVisceraRemoval",
        name: "Five-Viscera Removal",
        description: "Digestion wastes energy. Photosynthesize Qi directly.",
        effect_text: "Qi generation +10/sec",
        base_cost: &[(Resource::Qi, 10_000.0), (Resource::DaoMarks, 500.0)],
        cost_multiplier: 1.0,
        max_level: 1,
        requires: &[req(UpgradeId::GoldenMarrowInjection, 1)],
        effects: &[Effect::Add { stat: Stat::QiPerSecond, per_level: 10.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    // Tier 3
    UpgradeDef {
        id: UpgradeId::VoidPulseHeart,
        key: "voidPulseHeart",
        name: "Void-Pulse Heart",
        description: "The heart beats too slowly. Install a rhythmic void-pump.",
        effect_text: "Qi generation x10",
        base_cost: &[(Resource::Qi, 50_000.0), (Resource::DaoMarks, 2_000.0)],
        cost_multiplier: 1.0,
        max_level: 1,
        requires: &[req(UpgradeId::FiveVisceraRemoval, 1)],
        effects: &[Effect::Scale { stat: Stat::QiPerSecond, factor: 10.0 }],
        unlocks: &[],
        unlock_message: None,
    },
    UpgradeDef {
        id: UpgradeId::DivineSenseAwakening,
        key: "divineSenseAwakening",
        name: "Divine Sense Awakening",
        description: "Expand consciousness beyond the flesh. See the threads of causality.",
        effect_text: "Unlocks Insight generation",
        base_cost: &[(Resource::DaoMarks, 1_000.0)],
        cost_multiplier: 1.0,
        max_level: 1,
        requires: &[req(UpgradeId::VoidPulseHeart, 1)],
        effects: &[Effect::Set { stat: Stat::InsightPerSecond, base: 0.1, per_level: 0.0 }],
        unlocks: &[Feature::InsightDisplay, Feature::StatsGroup],
        unlock_message: Some(
            "Your consciousness expands. You begin to perceive the underlying patterns.",
        ),
    },
];

// ── Techniques ──────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TechniqueId {
    BreathControl,
}

impl TechniqueId {
    pub const ALL: [TechniqueId; 1] = [TechniqueId::BreathControl];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn def(self) -> &'static TechniqueDef {
        &TECHNIQUES[self.index()]
    }

    pub fn key(self) -> &'static str {
        self.def().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        TECHNIQUES.iter().find(|d| d.key == key).map(|d| d.id)
    }
}

/// A one-time research with a permanent effect.
#[derive(Debug)]
pub struct TechniqueDef {
    pub id: TechniqueId,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub effect_text: &'static str,
    pub cost: &'static [CostEntry],
    pub requires: &'static [Requirement],
    pub effects: &'static [Effect],
    pub research_message: &'static str,
}

pub static TECHNIQUES: [TechniqueDef; 1] = [TechniqueDef {
    id: TechniqueId::BreathControl,
    key: "breathControl",
    name: "Sutra of Eternal Breath",
    description: "A meditation on the cyclical nature of respiration.",
    effect_text: "+50% Qi generation",
    cost: &[(Resource::Insight, 10.0)],
    requires: &[req(UpgradeId::DivineSenseAwakening, 1)],
    effects: &[Effect::Scale { stat: Stat::QiPerSecond, factor: 1.5 }],
    research_message: "Understanding flows through you. Your breath becomes endless.",
}];

// ── Actions ─────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ActionId {
    RefineQi,
    CultivateFace,
}

impl ActionId {
    pub const ALL: [ActionId; 2] = [ActionId::RefineQi, ActionId::CultivateFace];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    pub fn def(self) -> &'static ActionDef {
        &ACTIONS[self.index()]
    }

    pub fn key(self) -> &'static str {
        self.def().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ACTIONS.iter().find(|d| d.key == key).map(|d| d.id)
    }
}

/// How an action's cost is computed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionCost {
    Flat(&'static [CostEntry]),
    /// `max(floor, base - refine_cost_reduction)` Qi.
    RefineQi { base: f64, floor: f64 },
}

/// What a successful action does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ActionEffect {
    /// `base + refine_bonus` Dao Marks, counted as produced.
    RefineMarks { base: f64 },
    Gain(Resource, f64),
}

/// A repeatable, cooldown-gated manual command.
#[derive(Debug)]
pub struct ActionDef {
    pub id: ActionId,
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    /// `None` when the text depends on current stats.
    pub effect_text: Option<&'static str>,
    pub cost: ActionCost,
    pub effect: ActionEffect,
    pub cooldown_ms: u64,
    pub requires: &'static [Requirement],
    pub unlocks: &'static [Feature],
    pub message: Option<&'static str>,
}

pub static ACTIONS: [ActionDef; 2] = [
    ActionDef {
        id: ActionId::RefineQi,
        key: "refineQi",
        name: "Refine Qi → Dao Marks",
        description: "Manually compress and crystallize your Qi into permanent Dao Marks.",
        effect_text: None,
        cost: ActionCost::RefineQi { base: 10.0, floor: 1.0 },
        effect: ActionEffect::RefineMarks { base: 1.0 },
        cooldown_ms: 0,
        requires: &[],
        unlocks: &[],
        message: None,
    },
    ActionDef {
        id: ActionId::CultivateFace,
        key: "cultivateFace",
        name: "Cultivate Face",
        description: "Manifest a miracle to awe the mortals. Costs Qi, increases Prestige.",
        effect_text: Some("+10 Face"),
        cost: ActionCost::Flat(&[(Resource::Qi, 100.0)]),
        effect: ActionEffect::Gain(Resource::Prestige, 10.0),
        cooldown_ms: 5_000,
        requires: &[req(UpgradeId::DivineSenseAwakening, 1)],
        unlocks: &[Feature::PrestigeDisplay, Feature::ActionsSection],
        message: Some(
            "You part the clouds with a gesture. The villagers below prostrate themselves.",
        ),
    },
];

// ── Uniform item handle ─────────────────────────────────────────

/// Any purchasable catalog entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Item {
    Upgrade(UpgradeId),
    Technique(TechniqueId),
    Action(ActionId),
}

impl Item {
    pub fn key(self) -> &'static str {
        match self {
            Item::Upgrade(id) => id.key(),
            Item::Technique(id) => id.key(),
            Item::Action(id) => id.key(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Item::Upgrade(id) => id.def().name,
            Item::Technique(id) => id.def().name,
            Item::Action(id) => id.def().name,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Item::Upgrade(id) => id.def().description,
            Item::Technique(id) => id.def().description,
            Item::Action(id) => id.def().description,
        }
    }

    pub fn requires(self) -> &'static [Requirement] {
        match self {
            Item::Upgrade(id) => id.def().requires,
            Item::Technique(id) => id.def().requires,
            Item::Action(id) => id.def().requires,
        }
    }

    /// Techniques are binary (max 1); actions have no level cap.
    pub fn max_level(self) -> Option<u32> {
        match self {
            Item::Upgrade(id) => Some(id.def().max_level),
            Item::Technique(_) => Some(1),
            Item::Action(_) => None,
        }
    }
}

// ── Flavor ──────────────────────────────────────────────────────

/// Message shown when a brand-new game starts.
pub const OPENING_LINE: &str =
    "You open your eyes in a dark cave. The air is thin. The path begins here.";

/// One line is revealed every [`LORE_CLICK_INTERVAL`] clicks, in order.
pub const LORE: [&str; 10] = [
    "The Qi in this cave is thin. I must breathe 10,000 times to condense a single drop of liquid mana. It is honest work.",
    "Each breath pulls fragments of the Dao closer. The process is manual. Tedious. Necessary.",
    "My meridians ache. The pathway from breath to power is inefficient. I must optimize.",
    "The villagers speak of a hermit in the mountain. They do not understand. I am not hiding. I am iterating.",
    "I have begun to view my body as a machine. Each organ: a component. Each cell: a subroutine.",
    "The path to immortality is paved with incremental gains. One breath at a time. One mark at a time.",
    "Today I forced my meridians open. The pain was irrelevant. The throughput increased 100%.",
    "I no longer need to focus on breathing. My spinal cord handles the calculation. My mind is free for higher functions.",
    "The magistrate sent tribute. He thinks I am divine. I am merely efficient.",
    "My disciples ask why I do not sleep. Sleep is a bug in mortal firmware. I have patched it out.",
];

pub const LORE_CLICK_INTERVAL: u64 = 50;
