//! Read-only projections of [`GameState`] for rendering.

use super::catalog::{
    ActionEffect, ActionId, Feature, Item, Resource, TechniqueId, ACTIONS, TECHNIQUES, UPGRADES,
};
use super::logic::{self, format_number};
use super::state::GameState;

/// Everything the UI needs to draw one item row.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemView {
    pub item: Item,
    pub name: &'static str,
    pub description: &'static str,
    pub effect_text: String,
    pub current_level: u32,
    pub max_level: Option<u32>,
    pub cost: Vec<(Resource, f64)>,
    pub is_purchasable: bool,
    pub is_maxed: bool,
    pub cooldown_remaining_ms: u64,
}

impl ItemView {
    /// "MAX" once maxed, otherwise e.g. "30 qi, 10 daoMarks".
    pub fn cost_text(&self) -> String {
        if self.is_maxed {
            return "MAX".to_string();
        }
        cost_text(&self.cost)
    }

    /// "(2/5)" for upgrades already owned, empty otherwise.
    pub fn level_text(&self) -> String {
        if !matches!(self.item, Item::Upgrade(_)) {
            return String::new();
        }
        match self.max_level {
            Some(max) if self.current_level > 0 => {
                format!("({}/{})", self.current_level, max)
            }
            _ => String::new(),
        }
    }

    /// Whole seconds left on cooldown, if any.
    pub fn cooldown_text(&self) -> Option<String> {
        if self.cooldown_remaining_ms == 0 {
            return None;
        }
        Some(format!("{}s", self.cooldown_remaining_ms.div_ceil(1000)))
    }
}

pub fn cost_text(cost: &[(Resource, f64)]) -> String {
    cost.iter()
        .map(|&(resource, amount)| format!("{} {}", format_number(amount, 0), resource.key()))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn item_view(item: Item, state: &GameState, now_ms: u64) -> ItemView {
    let progression = &state.progression;
    let (current_level, effect_text, cooldown_remaining_ms) = match item {
        Item::Upgrade(id) => (progression.level(id), id.def().effect_text.to_string(), 0),
        Item::Technique(id) => (
            u32::from(progression.is_researched(id)),
            id.def().effect_text.to_string(),
            0,
        ),
        Item::Action(id) => (
            0,
            action_effect_text(id, state),
            logic::cooldown_remaining(id.def(), progression, now_ms),
        ),
    };

    ItemView {
        item,
        name: item.name(),
        description: item.description(),
        effect_text,
        current_level,
        max_level: item.max_level(),
        cost: logic::cost(item, state).0,
        is_purchasable: logic::is_purchasable(item, state, now_ms),
        is_maxed: logic::is_maxed(item, progression),
        cooldown_remaining_ms,
    }
}

fn action_effect_text(id: ActionId, state: &GameState) -> String {
    let def = id.def();
    if let Some(text) = def.effect_text {
        return text.to_string();
    }
    match def.effect {
        ActionEffect::RefineMarks { base } => {
            let gained = base + state.stats.refine_bonus;
            let plural = if gained > 1.0 { "s" } else { "" };
            format!("+{} Dao Mark{}", format_number(gained, 0), plural)
        }
        ActionEffect::Gain(resource, amount) => {
            format!("+{} {}", format_number(amount, 0), resource.label())
        }
    }
}

fn visible(items: impl Iterator<Item = Item>, state: &GameState, now_ms: u64) -> Vec<ItemView> {
    items
        .filter(|&item| logic::is_visible(item, &state.progression))
        .map(|item| item_view(item, state, now_ms))
        .collect()
}

pub fn upgrade_views(state: &GameState) -> Vec<ItemView> {
    visible(UPGRADES.iter().map(|d| Item::Upgrade(d.id)), state, 0)
}

pub fn technique_views(state: &GameState) -> Vec<ItemView> {
    visible(TECHNIQUES.iter().map(|d| Item::Technique(d.id)), state, 0)
}

pub fn action_views(state: &GameState, now_ms: u64) -> Vec<ItemView> {
    visible(ACTIONS.iter().map(|d| Item::Action(d.id)), state, now_ms)
}

/// Header numbers and the cultivate button face.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceSummary {
    pub dao_marks: String,
    pub qi: String,
    pub max_qi: String,
    pub insight: Option<String>,
    pub prestige: Option<String>,
    pub marks_per_second: String,
    pub qi_per_second: String,
    pub qi_per_click: String,
    pub tribute_per_second: Option<String>,
    pub realm: String,
    pub button_glyph: &'static str,
    pub button_label: &'static str,
}

pub fn resource_summary(state: &GameState) -> ResourceSummary {
    let stats = &state.stats;
    let (button_glyph, button_label) = if stats.marks_per_click > 0.0 {
        ("道", "Cultivate")
    } else {
        ("吸", "Breathe")
    };

    ResourceSummary {
        dao_marks: format_number(state.balances.dao_marks, 0),
        qi: format_number(state.balances.qi, 0),
        max_qi: format_number(stats.max_qi, 0),
        insight: state
            .is_unlocked(Feature::InsightDisplay)
            .then(|| format_number(state.balances.insight, 1)),
        prestige: state
            .is_unlocked(Feature::PrestigeDisplay)
            .then(|| format_number(state.balances.prestige, 0)),
        marks_per_second: format_number(stats.marks_per_second, 2),
        qi_per_second: format_number(stats.qi_per_second, 1),
        qi_per_click: format_number(stats.qi_per_click, 1),
        tribute_per_second: state
            .is_unlocked(Feature::StatsGroup)
            .then(|| format_number(stats.tribute_per_second, 0)),
        realm: state.realm.clone(),
        button_glyph,
        button_label,
    }
}

/// Whether an item list section has anything to show yet.
pub fn has_techniques(state: &GameState) -> bool {
    TechniqueId::ALL
        .iter()
        .any(|&id| logic::is_visible(Item::Technique(id), &state.progression))
}
