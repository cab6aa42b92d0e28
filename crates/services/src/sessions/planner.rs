use std::sync::Arc;

use rand::Rng;
use tracing::debug;

use shapes_core::AttributeCatalog;
use shapes_core::difficulty::DifficultyScheduler;
use shapes_core::generator::QuestionGenerator;
use shapes_core::history::RecentCombinations;
use shapes_core::model::{GameSettings, Question};

/// Fresh draws tried before a recently used combination is accepted.
const MAX_ATTEMPTS: usize = 16;

/// Picks the kind for each question index and generates a question,
/// steering away from combinations seen in the recent window.
#[derive(Debug, Clone)]
pub struct QuestionPlanner {
    catalog: Arc<AttributeCatalog>,
    scheduler: DifficultyScheduler,
    recent: RecentCombinations,
}

impl QuestionPlanner {
    #[must_use]
    pub fn new(catalog: Arc<AttributeCatalog>, settings: &GameSettings) -> Self {
        Self {
            catalog,
            scheduler: DifficultyScheduler::from_settings(settings),
            recent: RecentCombinations::new(settings.min_combinations_before_repeat()),
        }
    }

    /// Generate the question for a 1-based index.
    ///
    /// Up to `MAX_ATTEMPTS` draws are made looking for a combination outside
    /// the recent window; if all of them collide, the last draw is used.
    ///
    /// # Errors
    ///
    /// Propagates generator errors.
    pub fn next<R: Rng + ?Sized>(
        &mut self,
        question_index: u32,
        rng: &mut R,
    ) -> Result<Question, shapes_core::Error> {
        let kind = self.scheduler.pick_kind(question_index, rng);
        let generator = QuestionGenerator::new(&self.catalog);

        let mut question = generator.generate(kind, rng)?;
        for _ in 1..MAX_ATTEMPTS {
            if !self.recent.contains(question.signature()) {
                break;
            }
            question = generator.generate(kind, rng)?;
        }

        if self.recent.contains(question.signature()) {
            debug!(question_index, %kind, "no fresh combination found, allowing a repeat");
        }
        self.recent.record(question.signature().clone());
        Ok(question)
    }

    /// Forget the repetition history.
    pub fn reset(&mut self) {
        self.recent.clear();
    }
}
