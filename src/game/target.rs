//! Target kinds and the spawn draw.
//!
//! A target occupies one grid slot. Its kind is drawn from a cumulative
//! probability table so the policy can be read (and tested) in one place:
//!
//! ```text
//! roll ∈ [0.0, 0.6) → Primary  (+1)
//! roll ∈ [0.6, 0.9) → Penalty  (ends the round)
//! roll ∈ [0.9, 1.0) → Bonus    (+5)
//! ```

use rand::Rng;
use serde::Serialize;

/// What kind of target is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetKind {
    /// The regular mole.
    Primary,
    /// The rabbit. Clicking it ends the round.
    Penalty,
    /// The Mega Pass.
    Bonus,
}

/// Cumulative upper bounds for the kind draw. Must end at 1.0.
pub const KIND_TABLE: [(f64, TargetKind); 3] = [
    (0.6, TargetKind::Primary),
    (0.9, TargetKind::Penalty),
    (1.0, TargetKind::Bonus),
];

/// Effect of hitting a target of a given kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitEffect {
    Score(u32),
    EndRound,
}

impl TargetKind {
    pub fn hit_effect(self) -> HitEffect {
        match self {
            TargetKind::Primary => HitEffect::Score(1),
            TargetKind::Bonus => HitEffect::Score(5),
            TargetKind::Penalty => HitEffect::EndRound,
        }
    }

    /// Lowercase label used in CSS classes and image names.
    pub fn label(self) -> &'static str {
        match self {
            TargetKind::Primary => "mole",
            TargetKind::Penalty => "rabbit",
            TargetKind::Bonus => "megapass",
        }
    }
}

/// The single visible target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Target {
    pub slot: usize,
    pub kind: TargetKind,
}

/// Map a roll in `[0, 1)` to a kind by walking the cumulative table.
/// Out-of-range rolls fall through to the last entry.
pub fn kind_for_roll(roll: f64) -> TargetKind {
    KIND_TABLE
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map(|(_, kind)| *kind)
        .unwrap_or(KIND_TABLE[KIND_TABLE.len() - 1].1)
}

/// Draw a uniformly random slot in `0..slot_count` and a weighted kind.
pub fn draw_target<R: Rng + ?Sized>(rng: &mut R, slot_count: usize) -> Target {
    let slot = rng.gen_range(0..slot_count);
    let kind = kind_for_roll(rng.gen_range(0.0..1.0));
    Target { slot, kind }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rand::rngs::mock::StepRng;

    #[test]
    fn table_is_cumulative_and_complete() {
        let mut prev = 0.0;
        for (bound, _) in KIND_TABLE {
            assert!(bound > prev);
            prev = bound;
        }
        assert_eq!(prev, 1.0);
    }

    #[test]
    fn roll_boundaries() {
        assert_eq!(kind_for_roll(0.0), TargetKind::Primary);
        assert_eq!(kind_for_roll(0.5999), TargetKind::Primary);
        assert_eq!(kind_for_roll(0.6), TargetKind::Penalty);
        assert_eq!(kind_for_roll(0.8999), TargetKind::Penalty);
        assert_eq!(kind_for_roll(0.9), TargetKind::Bonus);
        assert_eq!(kind_for_roll(0.9999), TargetKind::Bonus);
        assert_eq!(kind_for_roll(1.5), TargetKind::Bonus);
    }

    #[test]
    fn hit_effects() {
        assert_eq!(TargetKind::Primary.hit_effect(), HitEffect::Score(1));
        assert_eq!(TargetKind::Bonus.hit_effect(), HitEffect::Score(5));
        assert_eq!(TargetKind::Penalty.hit_effect(), HitEffect::EndRound);
    }

    #[test]
    fn zero_rng_draws_first_slot_primary() {
        let mut rng = StepRng::new(0, 0);
        let target = draw_target(&mut rng, 15);
        assert_eq!(target, Target { slot: 0, kind: TargetKind::Primary });
    }

    #[test]
    fn seeded_draws_match_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut counts = [0usize; 3];
        let mut slots = [0usize; 15];
        let draws = 20_000;
        for _ in 0..draws {
            let target = draw_target(&mut rng, 15);
            slots[target.slot] += 1;
            let idx = match target.kind {
                TargetKind::Primary => 0,
                TargetKind::Penalty => 1,
                TargetKind::Bonus => 2,
            };
            counts[idx] += 1;
        }
        let freq = |n: usize| n as f64 / draws as f64;
        assert!((freq(counts[0]) - 0.6).abs() < 0.02);
        assert!((freq(counts[1]) - 0.3).abs() < 0.02);
        assert!((freq(counts[2]) - 0.1).abs() < 0.02);
        // every slot gets hit, roughly uniformly
        for n in slots {
            assert!(n > 1000 && n < 1700, "slot count {}", n);
        }
    }
}
