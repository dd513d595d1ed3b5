//! Stat recalculation.
//!
//! Derived stats are always rebuilt from base values, so replaying every
//! owned effect is idempotent no matter how often it runs.

use super::catalog::{Effect, TECHNIQUES, UPGRADES};
use super::state::{DerivedStats, GameState, Progression};

/// Prestige needed per point of Qi tribute.
pub const PRESTIGE_PER_TRIBUTE: f64 = 10.0;

/// Apply one effect descriptor at `level`.
pub fn apply_effect(stats: &mut DerivedStats, effect: &Effect, level: u32) {
    match *effect {
        Effect::Set {
            stat,
            base,
            per_level,
        } => *stats.stat_mut(stat) = base + per_level * level as f64,
        Effect::Add { stat, per_level } => *stats.stat_mut(stat) += per_level * level as f64,
        Effect::Scale { stat, factor } => *stats.stat_mut(stat) *= factor.powi(level as i32),
    }
}

/// Rebuild every derived stat from progression and prestige.
///
/// Order: base values, owned upgrades in catalog order, researched
/// techniques in catalog order, multiplier compounding, then tribute.
pub fn recalculate(progression: &Progression, prestige: f64) -> DerivedStats {
    let mut stats = DerivedStats::default();

    for def in UPGRADES.iter() {
        let level = progression.level(def.id);
        if level == 0 {
            continue;
        }
        for effect in def.effects {
            apply_effect(&mut stats, effect, level);
        }
    }

    for def in TECHNIQUES.iter() {
        if !progression.is_researched(def.id) {
            continue;
        }
        for effect in def.effects {
            apply_effect(&mut stats, effect, 1);
        }
    }

    let global = stats.global_multiplier;
    stats.qi_per_second *= stats.qi_multiplier * global;
    stats.marks_per_second *= stats.mark_multiplier * global;
    stats.marks_per_click *= stats.mark_multiplier * global;

    stats.tribute_per_second = (prestige.max(0.0) / PRESTIGE_PER_TRIBUTE).floor();
    stats.qi_per_second += stats.tribute_per_second;

    stats
}

/// Recompute `state.stats` in place.
pub fn refresh(state: &mut GameState) {
    state.stats = recalculate(&state.progression, state.balances.prestige);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::dao::catalog::{Stat, TechniqueId, UpgradeId};

    fn prog(levels: &[(UpgradeId, u32)]) -> Progression {
        let mut p = Progression::default();
        for &(id, lvl) in levels {
            p.levels.insert(id, lvl);
        }
        p
    }

    #[test]
    fn empty_progression_gives_base_stats() {
        assert_eq!(recalculate(&Progression::default(), 0.0), DerivedStats::default());
    }

    #[test]
    fn breathing_rhythm_stacks_linearly() {
        let stats = recalculate(&prog(&[(UpgradeId::BreathingRhythm, 2)]), 0.0);
        assert_eq!(stats.qi_per_second, 1.0);
    }

    #[test]
    fn focused_breathing_then_compression() {
        // Set runs first (1 + 3), Add then stacks 2 per level on top.
        let stats = recalculate(
            &prog(&[(UpgradeId::FocusedBreathing, 3), (UpgradeId::QiCompression, 2)]),
            0.0,
        );
        assert_eq!(stats.qi_per_click, 8.0);
    }

    #[test]
    fn dantian_expansion_sets_max_qi() {
        let stats = recalculate(&prog(&[(UpgradeId::DantianExpansion, 4)]), 0.0);
        assert_eq!(stats.max_qi, 300.0);
    }

    #[test]
    fn golden_marrow_scales_marks_per_click() {
        let stats = recalculate(
            &prog(&[(UpgradeId::MeridianDredging, 3), (UpgradeId::GoldenMarrowInjection, 2)]),
            0.0,
        );
        assert_eq!(stats.mark_multiplier, 4.0);
        assert_eq!(stats.marks_per_click, 12.0);
    }

    #[test]
    fn global_multiplier_compounds_qi_per_second() {
        let stats = recalculate(
            &prog(&[(UpgradeId::AutonomicCycling, 1), (UpgradeId::IronSkinChant, 2)]),
            0.0,
        );
        assert!((stats.global_multiplier - 1.1).abs() < 1e-12);
        assert!((stats.qi_per_second - 2.2).abs() < 1e-12);
    }

    #[test]
    fn void_pulse_and_breath_control_compound() {
        let mut p = prog(&[
            (UpgradeId::BreathingRhythm, 2),
            (UpgradeId::FiveVisceraRemoval, 1),
            (UpgradeId::VoidPulseHeart, 1),
        ]);
        p.researched.insert(TechniqueId::BreathControl);
        let stats = recalculate(&p, 0.0);
        // (1 + 10) * 10 * 1.5
        assert!((stats.qi_per_second - 165.0).abs() < 1e-9);
    }

    #[test]
    fn tribute_is_floored_and_added() {
        let stats = recalculate(&Progression::default(), 37.0);
        assert_eq!(stats.tribute_per_second, 3.0);
        assert_eq!(stats.qi_per_second, 3.0);

        let stats = recalculate(&Progression::default(), 25.0);
        assert_eq!(stats.tribute_per_second, 2.0);
    }

    #[test]
    fn tribute_ignores_negative_prestige() {
        let stats = recalculate(&Progression::default(), -50.0);
        assert_eq!(stats.tribute_per_second, 0.0);
    }

    #[test]
    fn divine_sense_sets_insight_rate() {
        let stats = recalculate(&prog(&[(UpgradeId::DivineSenseAwakening, 1)]), 0.0);
        assert_eq!(stats.insight_per_second, 0.1);
    }

    #[test]
    fn apply_effect_scale_uses_power() {
        let mut stats = DerivedStats::default();
        apply_effect(&mut stats, &Effect::Scale { stat: Stat::QiMultiplier, factor: 3.0 }, 2);
        assert_eq!(stats.qi_multiplier, 9.0);
        apply_effect(&mut stats, &Effect::Scale { stat: Stat::QiMultiplier, factor: 3.0 }, 0);
        assert_eq!(stats.qi_multiplier, 9.0);
    }

    #[test]
    fn refresh_writes_state_stats() {
        let mut state = GameState::new(0);
        state.progression.levels.insert(UpgradeId::FocusedBreathing, 1);
        state.balances.prestige = 20.0;
        refresh(&mut state);
        assert_eq!(state.stats.qi_per_click, 2.0);
        assert_eq!(state.stats.tribute_per_second, 2.0);
    }
}
