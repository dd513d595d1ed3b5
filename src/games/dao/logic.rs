//! Dao of Zero game logic: pure functions over [`GameState`].
//!
//! Commands return `bool`: `false` means nothing changed.

use super::catalog::{
    ActionCost, ActionDef, ActionEffect, ActionId, Cost, Item, Requirement, Resource,
    TechniqueId, UpgradeDef, UpgradeId, LORE, LORE_CLICK_INTERVAL,
};
use super::state::{Balances, DerivedStats, GameEvent, GameState, Milestone, Progression};
use super::stats;

/// Total Dao Marks produced in phase 1 before the next step is announced.
pub const PHASE_TWO_MARKS: f64 = 10_000.0;

pub const PHASE_TWO_MESSAGE: &str =
    "The vessel is perfected. The next step beckons: a Sect to command.";

// ── Costs ───────────────────────────────────────────────────────

/// `floor(base * multiplier ^ level)` for every resource in the base cost.
pub fn upgrade_cost(def: &UpgradeDef, current_level: u32) -> Cost {
    let scale = def.cost_multiplier.powi(current_level as i32);
    Cost(
        def.base_cost
            .iter()
            .map(|&(resource, base)| (resource, (base * scale).floor()))
            .collect(),
    )
}

pub fn action_cost(def: &ActionDef, stats: &DerivedStats) -> Cost {
    match def.cost {
        ActionCost::Flat(entries) => Cost::from_entries(entries),
        ActionCost::RefineQi { base, floor } => Cost(vec![(
            Resource::Qi,
            (base - stats.refine_cost_reduction).max(floor),
        )]),
    }
}

/// Current cost of any item.
pub fn cost(item: Item, state: &GameState) -> Cost {
    match item {
        Item::Upgrade(id) => upgrade_cost(id.def(), state.progression.level(id)),
        Item::Technique(id) => Cost::from_entries(id.def().cost),
        Item::Action(id) => action_cost(id.def(), &state.stats),
    }
}

pub fn can_afford(balances: &Balances, cost: &Cost) -> bool {
    cost.iter()
        .all(|&(resource, amount)| balances.get(resource) >= amount)
}

/// Deduct all of `cost`, or nothing at all.
fn spend(balances: &mut Balances, cost: &Cost) -> bool {
    if !can_afford(balances, cost) {
        return false;
    }
    for &(resource, amount) in cost.iter() {
        *balances.get_mut(resource) -= amount;
    }
    true
}

// ── Eligibility ─────────────────────────────────────────────────

pub fn prerequisites_met(progression: &Progression, requires: &[Requirement]) -> bool {
    requires
        .iter()
        .all(|r| progression.level(r.upgrade) >= r.level)
}

/// Visible means prerequisites are met. Maxed and researched items stay
/// visible (shown as locked).
pub fn is_visible(item: Item, progression: &Progression) -> bool {
    prerequisites_met(progression, item.requires())
}

pub fn is_maxed(item: Item, progression: &Progression) -> bool {
    match item {
        Item::Upgrade(id) => progression.level(id) >= id.def().max_level,
        Item::Technique(id) => progression.is_researched(id),
        Item::Action(_) => false,
    }
}

/// Milliseconds until the action can be used again; 0 when ready.
pub fn cooldown_remaining(def: &ActionDef, progression: &Progression, now_ms: u64) -> u64 {
    match progression.last_used(def.id) {
        Some(last) => def.cooldown_ms.saturating_sub(now_ms.saturating_sub(last)),
        None => 0,
    }
}

pub fn can_buy_upgrade(state: &GameState, id: UpgradeId) -> bool {
    let item = Item::Upgrade(id);
    is_visible(item, &state.progression)
        && !is_maxed(item, &state.progression)
        && can_afford(&state.balances, &cost(item, state))
}

pub fn can_research(state: &GameState, id: TechniqueId) -> bool {
    let item = Item::Technique(id);
    is_visible(item, &state.progression)
        && !is_maxed(item, &state.progression)
        && can_afford(&state.balances, &cost(item, state))
}

pub fn can_execute(state: &GameState, id: ActionId, now_ms: u64) -> bool {
    let def = id.def();
    prerequisites_met(&state.progression, def.requires)
        && cooldown_remaining(def, &state.progression, now_ms) == 0
        && can_afford(&state.balances, &action_cost(def, &state.stats))
}

pub fn is_purchasable(item: Item, state: &GameState, now_ms: u64) -> bool {
    match item {
        Item::Upgrade(id) => can_buy_upgrade(state, id),
        Item::Technique(id) => can_research(state, id),
        Item::Action(id) => can_execute(state, id, now_ms),
    }
}

// ── Commands ────────────────────────────────────────────────────

/// Try to buy one level of an upgrade. Returns true if successful.
pub fn buy_upgrade(state: &mut GameState, id: UpgradeId) -> bool {
    if !can_buy_upgrade(state, id) {
        return false;
    }
    let def = id.def();
    let level = state.progression.level(id);
    if !spend(&mut state.balances, &upgrade_cost(def, level)) {
        return false;
    }
    let new_level = level + 1;
    state.progression.levels.insert(id, new_level);
    state.add_log(
        &format!("Purchased: {} (Level {})", def.name, new_level),
        false,
    );

    if new_level == 1 {
        for &feature in def.unlocks {
            state.unlock(feature);
        }
        if let Some(message) = def.unlock_message {
            state.add_log(message, true);
        }
    }

    tracing::debug!(upgrade = def.key, level = new_level, "upgrade purchased");
    stats::refresh(state);
    true
}

/// Research a technique once. Returns true if successful.
pub fn research(state: &mut GameState, id: TechniqueId) -> bool {
    if !can_research(state, id) {
        return false;
    }
    let def = id.def();
    if !spend(&mut state.balances, &Cost::from_entries(def.cost)) {
        return false;
    }
    state.progression.researched.insert(id);
    state.add_log(def.research_message, true);

    tracing::debug!(technique = def.key, "technique researched");
    stats::refresh(state);
    true
}

/// Run an action at host time `now_ms`. Returns true if successful.
pub fn execute_action(state: &mut GameState, id: ActionId, now_ms: u64) -> bool {
    if !can_execute(state, id, now_ms) {
        return false;
    }
    let def = id.def();
    if !spend(&mut state.balances, &action_cost(def, &state.stats)) {
        return false;
    }

    match def.effect {
        ActionEffect::RefineMarks { base } => {
            let gained = base + state.stats.refine_bonus;
            state.balances.dao_marks += gained;
            state.total_marks_produced += gained;
        }
        ActionEffect::Gain(resource, amount) => {
            *state.balances.get_mut(resource) += amount;
        }
    }
    state.progression.last_used.insert(id, now_ms);

    for &feature in def.unlocks {
        state.unlock(feature);
    }
    if let Some(message) = def.message {
        state.add_log(message, true);
    }

    tracing::debug!(action = def.key, now_ms, "action executed");
    // Prestige feeds tribute, so stats follow every action.
    stats::refresh(state);
    true
}

/// One press of the cultivate button.
pub fn cultivate(state: &mut GameState) {
    state.total_clicks += 1;

    let max_qi = state.stats.max_qi;
    state.balances.qi = (state.balances.qi + state.stats.qi_per_click)
        .min(max_qi)
        .max(0.0);

    let marks = state.stats.marks_per_click;
    if marks > 0.0 {
        state.balances.dao_marks += marks;
        state.total_marks_produced += marks;
    }

    if state.total_clicks % LORE_CLICK_INTERVAL == 0 {
        reveal_lore(state);
    }
}

fn reveal_lore(state: &mut GameState) {
    if let Some(line) = LORE.get(state.lore_index) {
        state.add_log(line, false);
        state.lore_index += 1;
    }
}

/// Advance the simulation to host time `now_ms`.
///
/// Elapsed time is measured from `last_tick_ms` and saturates at zero if
/// the clock went backwards. `max_elapsed_ms` caps offline catch-up.
pub fn tick(state: &mut GameState, now_ms: u64, max_elapsed_ms: Option<u64>) {
    let mut elapsed_ms = now_ms.saturating_sub(state.last_tick_ms);
    if let Some(cap) = max_elapsed_ms {
        elapsed_ms = elapsed_ms.min(cap);
    }
    state.last_tick_ms = now_ms;
    let seconds = elapsed_ms as f64 / 1000.0;

    let max_qi = state.stats.max_qi;
    state.balances.qi = (state.balances.qi + state.stats.qi_per_second * seconds)
        .min(max_qi)
        .max(0.0);

    let marks = state.stats.marks_per_second * seconds;
    if marks > 0.0 {
        state.balances.dao_marks += marks;
        state.total_marks_produced += marks;
    }

    let insight = state.stats.insight_per_second * seconds;
    if insight > 0.0 {
        state.balances.insight += insight;
    }

    check_phase_transition(state);
}

pub fn check_phase_transition(state: &mut GameState) {
    if state.phase == 1
        && state.total_marks_produced >= PHASE_TWO_MARKS
        && !state.phase_two_announced
    {
        state.phase_two_announced = true;
        state.add_log(PHASE_TWO_MESSAGE, true);
        state
            .events
            .push(GameEvent::MilestoneReached(Milestone::VesselPerfected));
        tracing::info!(
            total_marks = state.total_marks_produced,
            "phase two milestone reached"
        );
    }
}

// ── Formatting ──────────────────────────────────────────────────

/// Compact number display: fixed decimals below 1000, then K/M/B/T with
/// one decimal.
pub fn format_number(num: f64, decimals: usize) -> String {
    if num < 1_000.0 {
        to_fixed(num, decimals)
    } else if num < 1_000_000.0 {
        format!("{}K", to_fixed(num / 1_000.0, 1))
    } else if num < 1_000_000_000.0 {
        format!("{}M", to_fixed(num / 1_000_000.0, 1))
    } else if num < 1_000_000_000_000.0 {
        format!("{}B", to_fixed(num / 1_000_000_000.0, 1))
    } else {
        format!("{}T", to_fixed(num / 1_000_000_000_000.0, 1))
    }
}

/// Fixed-point rendering where exact halfway values round up (away from
/// zero), e.g. `to_fixed(2.5, 0) == "3"`. Everything else rounds to the
/// nearest representable digit string.
pub fn to_fixed(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    // Negative zero prints as "0".
    let x = if x == 0.0 { 0.0 } else { x };
    if x < 0.0 {
        return format!("-{}", to_fixed(-x, digits));
    }
    match halfway_numerator(x, digits as u32) {
        Some(n) => insert_point((n + 5) / 10, digits),
        None => format!("{:.*}", digits, x),
    }
}

/// If `x * 10^(digits+1)` is an exact integer ending in 5 (a rounding tie
/// at `digits`), return it.
fn halfway_numerator(x: f64, digits: u32) -> Option<u128> {
    let bits = x.to_bits();
    let exp_bits = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & ((1u64 << 52) - 1);
    let (mantissa, exp) = if exp_bits == 0 {
        (fraction, -1074)
    } else {
        (fraction | (1u64 << 52), exp_bits - 1075)
    };
    if mantissa == 0 {
        return None;
    }
    // x = odd * 2^(exp + tz); a tie needs exactly 2^-(digits + 1).
    let tz = mantissa.trailing_zeros() as i32;
    if exp + tz != -(digits as i32 + 1) {
        return None;
    }
    let odd = (mantissa >> tz) as u128;
    odd.checked_mul(5u128.checked_pow(digits + 1)?)
}

fn insert_point(value: u128, digits: usize) -> String {
    let mut s = value.to_string();
    if digits == 0 {
        return s;
    }
    if s.len() <= digits {
        s = format!("{}{}", "0".repeat(digits + 1 - s.len()), s);
    }
    let split = s.len() - digits;
    format!("{}.{}", &s[..split], &s[split..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dao::catalog::Feature;

    fn state_with(levels: &[(UpgradeId, u32)]) -> GameState {
        let mut state = GameState::new(0);
        for &(id, lvl) in levels {
            state.progression.levels.insert(id, lvl);
        }
        stats::refresh(&mut state);
        state
    }

    // ── cultivate ─────────────────────────────────────────

    #[test]
    fn first_click_gives_one_qi() {
        let mut state = GameState::new(0);
        cultivate(&mut state);
        assert_eq!(state.balances.qi, 1.0);
        assert_eq!(state.balances.dao_marks, 0.0);
        assert_eq!(state.total_clicks, 1);
    }

    #[test]
    fn click_is_clamped_to_max_qi() {
        let mut state = GameState::new(0);
        state.balances.qi = 99.5;
        cultivate(&mut state);
        assert_eq!(state.balances.qi, 100.0);
    }

    #[test]
    fn click_yields_marks_after_dredging() {
        let mut state = state_with(&[(UpgradeId::MeridianDredging, 2)]);
        cultivate(&mut state);
        assert_eq!(state.balances.dao_marks, 2.0);
        assert_eq!(state.total_marks_produced, 2.0);
    }

    #[test]
    fn lore_revealed_every_fifty_clicks() {
        let mut state = GameState::new(0);
        for _ in 0..49 {
            cultivate(&mut state);
        }
        assert!(state.log.is_empty());
        cultivate(&mut state);
        assert_eq!(state.log[0].text, LORE[0]);
        for _ in 0..50 {
            cultivate(&mut state);
        }
        assert_eq!(state.log[0].text, LORE[1]);
        assert_eq!(state.lore_index, 2);
    }

    #[test]
    fn lore_stops_when_exhausted() {
        let mut state = GameState::new(0);
        state.lore_index = LORE.len();
        state.total_clicks = 49;
        cultivate(&mut state);
        assert!(state.log.is_empty());
    }

    // ── tick ──────────────────────────────────────────────

    #[test]
    fn tick_generates_qi_over_time() {
        let mut state = state_with(&[(UpgradeId::BreathingRhythm, 2)]);
        tick(&mut state, 1_000, None);
        assert_eq!(state.balances.qi, 1.0);
        assert_eq!(state.last_tick_ms, 1_000);
    }

    #[test]
    fn tick_clamps_qi_to_max() {
        let mut state = state_with(&[(UpgradeId::AutonomicCycling, 1)]);
        state.balances.qi = 99.0;
        tick(&mut state, 10_000, None);
        assert_eq!(state.balances.qi, 100.0);
    }

    #[test]
    fn tick_with_backwards_clock_is_noop() {
        let mut state = state_with(&[(UpgradeId::BreathingRhythm, 2)]);
        state.last_tick_ms = 5_000;
        tick(&mut state, 4_000, None);
        assert_eq!(state.balances.qi, 0.0);
        assert_eq!(state.last_tick_ms, 4_000);
    }

    #[test]
    fn tick_respects_catch_up_cap() {
        let mut state = state_with(&[(UpgradeId::BreathingRhythm, 2)]);
        tick(&mut state, 60_000, Some(5_000));
        assert_eq!(state.balances.qi, 5.0);
    }

    #[test]
    fn tick_accrues_insight() {
        let mut state = state_with(&[(UpgradeId::DivineSenseAwakening, 1)]);
        tick(&mut state, 10_000, None);
        assert!((state.balances.insight - 1.0).abs() < 1e-9);
    }

    #[test]
    fn phase_two_milestone_fires_once() {
        let mut state = GameState::new(0);
        state.total_marks_produced = 10_000.0;
        tick(&mut state, 100, None);
        assert!(state.phase_two_announced);
        assert_eq!(state.log[0].text, PHASE_TWO_MESSAGE);
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::MilestoneReached(Milestone::VesselPerfected)]
        );

        tick(&mut state, 200, None);
        assert_eq!(state.log.len(), 1);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn phase_two_needs_full_total() {
        let mut state = GameState::new(0);
        state.total_marks_produced = 9_999.0;
        tick(&mut state, 100, None);
        assert!(!state.phase_two_announced);
    }

    // ── costs ─────────────────────────────────────────────

    #[test]
    fn upgrade_cost_scales_and_floors() {
        let def = UpgradeId::BreathingRhythm.def();
        assert_eq!(upgrade_cost(def, 0).0, vec![(Resource::Qi, 30.0), (Resource::DaoMarks, 10.0)]);
        // 30 * 1.8^2 = 97.2, 10 * 3.24 = 32.4
        assert_eq!(upgrade_cost(def, 2).0, vec![(Resource::Qi, 97.0), (Resource::DaoMarks, 32.0)]);
    }

    #[test]
    fn focused_breathing_cost_doubles() {
        let def = UpgradeId::FocusedBreathing.def();
        let costs: Vec<Option<f64>> = (0..3)
            .map(|level| upgrade_cost(def, level).amount(Resource::DaoMarks))
            .collect();
        assert_eq!(costs, vec![Some(5.0), Some(10.0), Some(20.0)]);
        assert_eq!(upgrade_cost(def, 1).0.len(), 1);
    }

    #[test]
    fn refine_cost_has_floor_of_one() {
        let mut stats = DerivedStats::default();
        let def = ActionId::RefineQi.def();
        assert_eq!(action_cost(def, &stats).amount(Resource::Qi), Some(10.0));
        stats.refine_cost_reduction = 3.0;
        assert_eq!(action_cost(def, &stats).amount(Resource::Qi), Some(7.0));
        stats.refine_cost_reduction = 20.0;
        assert_eq!(action_cost(def, &stats).amount(Resource::Qi), Some(1.0));
    }

    // ── buy_upgrade ───────────────────────────────────────

    #[test]
    fn buy_focused_breathing() {
        let mut state = GameState::new(0);
        state.balances.dao_marks = 5.0;
        assert!(buy_upgrade(&mut state, UpgradeId::FocusedBreathing));
        assert_eq!(state.balances.dao_marks, 0.0);
        assert_eq!(state.progression.level(UpgradeId::FocusedBreathing), 1);
        assert_eq!(state.stats.qi_per_click, 2.0);
        assert_eq!(state.log[0].text, "Purchased: Focused Breathing (Level 1)");
    }

    #[test]
    fn buy_fails_when_unaffordable() {
        let mut state = GameState::new(0);
        state.balances.dao_marks = 4.0;
        assert!(!buy_upgrade(&mut state, UpgradeId::FocusedBreathing));
        assert_eq!(state.balances.dao_marks, 4.0);
        assert_eq!(state.progression.level(UpgradeId::FocusedBreathing), 0);
        assert!(state.log.is_empty());
    }

    #[test]
    fn multi_resource_purchase_is_atomic() {
        let mut state = GameState::new(0);
        state.balances.qi = 30.0;
        state.balances.dao_marks = 9.0;
        assert!(!buy_upgrade(&mut state, UpgradeId::BreathingRhythm));
        assert_eq!(state.balances.qi, 30.0);
        assert_eq!(state.balances.dao_marks, 9.0);
    }

    #[test]
    fn buy_fails_at_max_level() {
        let mut state = state_with(&[(UpgradeId::AutonomicCycling, 1)]);
        state.balances.qi = 1e9;
        state.balances.dao_marks = 1e9;
        assert!(!buy_upgrade(&mut state, UpgradeId::AutonomicCycling));
        assert_eq!(state.progression.level(UpgradeId::AutonomicCycling), 1);
    }

    #[test]
    fn buy_fails_without_prerequisite() {
        let mut state = GameState::new(0);
        state.balances.qi = 1e9;
        assert!(!buy_upgrade(&mut state, UpgradeId::IronSkinChant));
        state.progression.levels.insert(UpgradeId::AutonomicCycling, 1);
        assert!(buy_upgrade(&mut state, UpgradeId::IronSkinChant));
    }

    #[test]
    fn buying_meridian_dredging_sets_marks_per_click() {
        let mut state = GameState::new(0);
        state.balances.qi = 50.0;
        assert_eq!(state.stats.marks_per_click, 0.0);
        assert!(buy_upgrade(&mut state, UpgradeId::MeridianDredging));
        assert_eq!(state.balances.qi, 0.0);
        assert_eq!(state.stats.marks_per_click, 1.0);

        cultivate(&mut state);
        assert_eq!(state.balances.dao_marks, 1.0);
    }

    #[test]
    fn purchase_unlocks_dependent_upgrade_immediately() {
        let mut state = GameState::new(0);
        state.balances.qi = 1_200.0;
        state.balances.dao_marks = 50.0;
        assert!(!can_buy_upgrade(&state, UpgradeId::IronSkinChant));
        assert!(buy_upgrade(&mut state, UpgradeId::AutonomicCycling));
        assert!(can_buy_upgrade(&state, UpgradeId::IronSkinChant));
        assert!(buy_upgrade(&mut state, UpgradeId::IronSkinChant));
    }

    #[test]
    fn two_level_prerequisite_opens_on_second_purchase() {
        let requires = [Requirement {
            upgrade: UpgradeId::FocusedBreathing,
            level: 2,
        }];
        let mut state = GameState::new(0);
        state.balances.dao_marks = 15.0;

        assert!(buy_upgrade(&mut state, UpgradeId::FocusedBreathing));
        assert!(!prerequisites_met(&state.progression, &requires));

        assert!(buy_upgrade(&mut state, UpgradeId::FocusedBreathing));
        assert_eq!(state.progression.level(UpgradeId::FocusedBreathing), 2);
        assert!(prerequisites_met(&state.progression, &requires));
    }

    #[test]
    fn divine_sense_reveals_features() {
        let mut state = state_with(&[(UpgradeId::VoidPulseHeart, 1)]);
        state.balances.dao_marks = 1_000.0;
        assert!(buy_upgrade(&mut state, UpgradeId::DivineSenseAwakening));
        assert!(state.is_unlocked(Feature::InsightDisplay));
        assert!(state.is_unlocked(Feature::StatsGroup));
        assert_eq!(state.stats.insight_per_second, 0.1);
        assert!(state.log[0].is_important);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::FeatureUnlocked(Feature::InsightDisplay)));
        assert!(events.contains(&GameEvent::FeatureUnlocked(Feature::StatsGroup)));
    }

    // ── research ──────────────────────────────────────────

    #[test]
    fn research_breath_control_once() {
        let mut state = state_with(&[(UpgradeId::DivineSenseAwakening, 1)]);
        state.balances.insight = 25.0;
        assert!(research(&mut state, TechniqueId::BreathControl));
        assert_eq!(state.balances.insight, 15.0);
        assert!(state.progression.is_researched(TechniqueId::BreathControl));
        assert!(!research(&mut state, TechniqueId::BreathControl));
        assert_eq!(state.balances.insight, 15.0);
    }

    #[test]
    fn research_multiplier_applies_once() {
        let mut state = state_with(&[
            (UpgradeId::AutonomicCycling, 1),
            (UpgradeId::DivineSenseAwakening, 1),
        ]);
        state.balances.insight = 10.0;
        assert!(research(&mut state, TechniqueId::BreathControl));
        assert_eq!(state.stats.qi_per_second, 3.0);
        stats::refresh(&mut state);
        assert_eq!(state.stats.qi_per_second, 3.0);
    }

    #[test]
    fn research_fails_when_unaffordable() {
        let mut state = state_with(&[(UpgradeId::DivineSenseAwakening, 1)]);
        state.balances.insight = 9.9;
        assert!(!research(&mut state, TechniqueId::BreathControl));
        assert!(!state.progression.is_researched(TechniqueId::BreathControl));
    }

    // ── actions ───────────────────────────────────────────

    #[test]
    fn refine_qi_spends_and_gives_marks() {
        let mut state = state_with(&[(UpgradeId::ManualRefinement, 2), (UpgradeId::MentalClarity, 1)]);
        state.balances.qi = 20.0;
        assert!(execute_action(&mut state, ActionId::RefineQi, 1_000));
        assert_eq!(state.balances.qi, 11.0);
        assert_eq!(state.balances.dao_marks, 3.0);
        assert_eq!(state.total_marks_produced, 3.0);
        assert_eq!(state.progression.last_used(ActionId::RefineQi), Some(1_000));
    }

    #[test]
    fn refine_qi_fails_without_qi() {
        let mut state = GameState::new(0);
        state.balances.qi = 9.0;
        assert!(!execute_action(&mut state, ActionId::RefineQi, 0));
        assert_eq!(state.balances.qi, 9.0);
    }

    #[test]
    fn cultivate_face_respects_cooldown() {
        let mut state = state_with(&[(UpgradeId::DivineSenseAwakening, 1)]);
        state.balances.qi = 300.0;
        assert!(execute_action(&mut state, ActionId::CultivateFace, 10_000));
        assert_eq!(state.balances.prestige, 10.0);
        assert_eq!(state.stats.tribute_per_second, 1.0);
        assert!(state.is_unlocked(Feature::PrestigeDisplay));
        assert!(state.is_unlocked(Feature::ActionsSection));

        assert!(!execute_action(&mut state, ActionId::CultivateFace, 12_000));
        assert_eq!(state.balances.qi, 200.0);
        assert_eq!(
            cooldown_remaining(ActionId::CultivateFace.def(), &state.progression, 12_000),
            3_000
        );

        assert!(execute_action(&mut state, ActionId::CultivateFace, 15_000));
        assert_eq!(state.balances.prestige, 20.0);
        assert_eq!(state.stats.tribute_per_second, 2.0);
    }

    #[test]
    fn cultivate_face_requires_divine_sense() {
        let mut state = GameState::new(0);
        state.balances.qi = 100.0;
        assert!(!execute_action(&mut state, ActionId::CultivateFace, 0));
        assert_eq!(state.balances.prestige, 0.0);
    }

    #[test]
    fn never_used_action_has_no_cooldown() {
        let progression = Progression::default();
        assert_eq!(
            cooldown_remaining(ActionId::CultivateFace.def(), &progression, 0),
            0
        );
    }

    // ── visibility ────────────────────────────────────────

    #[test]
    fn tier_two_hidden_until_autonomic_cycling() {
        let mut p = Progression::default();
        assert!(!is_visible(Item::Upgrade(UpgradeId::IronSkinChant), &p));
        p.levels.insert(UpgradeId::AutonomicCycling, 1);
        assert!(is_visible(Item::Upgrade(UpgradeId::IronSkinChant), &p));
        assert!(is_visible(Item::Upgrade(UpgradeId::FocusedBreathing), &p));
    }

    #[test]
    fn researched_technique_stays_visible_but_maxed() {
        let mut p = Progression::default();
        p.levels.insert(UpgradeId::DivineSenseAwakening, 1);
        p.researched.insert(TechniqueId::BreathControl);
        let item = Item::Technique(TechniqueId::BreathControl);
        assert!(is_visible(item, &p));
        assert!(is_maxed(item, &p));
    }

    // ── formatting ────────────────────────────────────────

    #[test]
    fn format_number_small_values() {
        assert_eq!(format_number(0.0, 0), "0");
        assert_eq!(format_number(42.7, 0), "43");
        assert_eq!(format_number(3.14159, 2), "3.14");
        assert_eq!(format_number(999.0, 0), "999");
    }

    #[test]
    fn format_number_suffixes() {
        assert_eq!(format_number(1_000.0, 0), "1.0K");
        assert_eq!(format_number(1_234.0, 0), "1.2K");
        assert_eq!(format_number(2_500_000.0, 0), "2.5M");
        assert_eq!(format_number(7_100_000_000.0, 0), "7.1B");
        assert_eq!(format_number(3e12, 0), "3.0T");
    }

    #[test]
    fn to_fixed_rounds_ties_up() {
        assert_eq!(to_fixed(0.5, 0), "1");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.25, 1), "1.3");
        assert_eq!(to_fixed(0.125, 2), "0.13");
        assert_eq!(to_fixed(-2.5, 0), "-3");
    }

    #[test]
    fn to_fixed_non_ties_match_nearest() {
        assert_eq!(to_fixed(0.25, 0), "0");
        assert_eq!(to_fixed(1.5, 1), "1.5");
        // 1.005 is stored slightly below the tie.
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(0.0, 2), "0.00");
    }

    #[test]
    fn negative_zero_prints_without_sign() {
        assert_eq!(to_fixed(-0.0, 0), "0");
        assert_eq!(to_fixed(-0.0, 2), "0.00");
        assert_eq!(format_number(-0.0, 0), "0");
        assert_eq!(to_fixed(-0.4, 0), "-0");
    }

    #[test]
    fn to_fixed_non_finite() {
        assert_eq!(to_fixed(f64::NAN, 1), "NaN");
        assert_eq!(to_fixed(f64::INFINITY, 1), "Infinity");
        assert_eq!(to_fixed(f64::NEG_INFINITY, 0), "-Infinity");
    }
}
