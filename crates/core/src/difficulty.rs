use rand::Rng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::model::{GameSettings, QuestionKind};

/// A contiguous range of question indices sharing the same eligible kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DifficultyBand {
    Easy,
    Medium,
    Hard,
}

impl DifficultyBand {
    /// Kinds eligible in this band; one is picked uniformly.
    #[must_use]
    pub fn kinds(self) -> &'static [QuestionKind] {
        match self {
            DifficultyBand::Easy => &[
                QuestionKind::ShapeIdentification,
                QuestionKind::SizeRecognition,
            ],
            DifficultyBand::Medium => &[QuestionKind::ColorShape, QuestionKind::CountingColor],
            DifficultyBand::Hard => &[
                QuestionKind::ColorShape,
                QuestionKind::CountingColor,
                QuestionKind::LogicalChallenge,
            ],
        }
    }
}

/// Fixed three-step difficulty ramp over a session.
///
/// With the default shares a 20-question session is split 7 easy, 7 medium
/// and 6 hard. Player performance has no influence on the ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyScheduler {
    easy_until: u32,
    medium_until: u32,
}

impl DifficultyScheduler {
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(total_questions: u32, easy_share: f64, medium_share: f64) -> Self {
        let total = f64::from(total_questions);
        let easy_until = (total * easy_share).round() as u32;
        let medium_until = (total * (easy_share + medium_share)).round() as u32;
        Self {
            easy_until: easy_until.min(total_questions),
            medium_until: medium_until.clamp(easy_until, total_questions),
        }
    }

    #[must_use]
    pub fn from_settings(settings: &GameSettings) -> Self {
        Self::new(
            settings.total_questions(),
            settings.easy_share(),
            settings.medium_share(),
        )
    }

    /// Band for a 1-based question index.
    #[must_use]
    pub fn band_for(&self, question_index: u32) -> DifficultyBand {
        if question_index <= self.easy_until {
            DifficultyBand::Easy
        } else if question_index <= self.medium_until {
            DifficultyBand::Medium
        } else {
            DifficultyBand::Hard
        }
    }

    /// Pick a question kind for the given 1-based index.
    pub fn pick_kind<R: Rng + ?Sized>(&self, question_index: u32, rng: &mut R) -> QuestionKind {
        let kinds = self.band_for(question_index).kinds();
        // Every band lists at least two kinds.
        kinds
            .choose(rng)
            .copied()
            .unwrap_or(QuestionKind::ShapeIdentification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn default_session_splits_seven_seven_six() {
        let scheduler = DifficultyScheduler::from_settings(&GameSettings::default());
        let bands: Vec<_> = (1..=20).map(|i| scheduler.band_for(i)).collect();
        assert_eq!(bands.iter().filter(|b| **b == DifficultyBand::Easy).count(), 7);
        assert_eq!(bands.iter().filter(|b| **b == DifficultyBand::Medium).count(), 7);
        assert_eq!(bands.iter().filter(|b| **b == DifficultyBand::Hard).count(), 6);
        assert_eq!(scheduler.band_for(7), DifficultyBand::Easy);
        assert_eq!(scheduler.band_for(8), DifficultyBand::Medium);
        assert_eq!(scheduler.band_for(15), DifficultyBand::Hard);
    }

    #[test]
    fn picked_kinds_stay_inside_their_band() {
        let scheduler = DifficultyScheduler::from_settings(&GameSettings::default());
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            for index in 1..=7 {
                let kind = scheduler.pick_kind(index, &mut rng);
                assert!(kind.is_single_figure(), "index {index} picked {kind:?}");
            }
            for index in 8..=14 {
                let kind = scheduler.pick_kind(index, &mut rng);
                assert!(matches!(
                    kind,
                    QuestionKind::ColorShape | QuestionKind::CountingColor
                ));
            }
            for index in 15..=20 {
                let kind = scheduler.pick_kind(index, &mut rng);
                assert!(!kind.is_single_figure());
            }
        }
    }

    #[test]
    fn hard_band_reaches_every_kind() {
        let scheduler = DifficultyScheduler::from_settings(&GameSettings::default());
        let mut rng = StdRng::seed_from_u64(5);
        let seen: std::collections::HashSet<_> =
            (0..200).map(|_| scheduler.pick_kind(20, &mut rng)).collect();
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn short_sessions_still_partition() {
        let scheduler = DifficultyScheduler::new(3, 0.35, 0.35);
        assert_eq!(scheduler.band_for(1), DifficultyBand::Easy);
        assert_eq!(scheduler.band_for(2), DifficultyBand::Medium);
        assert_eq!(scheduler.band_for(3), DifficultyBand::Hard);
    }
}
