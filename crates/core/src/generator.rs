use rand::Rng;
use rand::seq::{IndexedRandom, SliceRandom};

use crate::catalog::{AttributeCatalog, AttributeKind};
use crate::error::Error;
use crate::model::{ANSWER_OPTIONS, Question, QuestionDraft, QuestionKind, ShapeInstance};

const DISTRACTOR_OPTIONS: usize = ANSWER_OPTIONS - 1;

//
// ─── GENERATOR ─────────────────────────────────────────────────────────────────
//

/// Builds randomized questions from a catalog.
///
/// Each kind has its own operation; [`QuestionGenerator::generate`] dispatches
/// on the requested kind. Generators only read the catalog, so one catalog can
/// back any number of sessions.
///
/// # Examples
///
/// ```
/// # use shapes_core::AttributeCatalog;
/// # use shapes_core::generator::QuestionGenerator;
/// # use shapes_core::model::QuestionKind;
/// use rand::SeedableRng;
///
/// let catalog = AttributeCatalog::reference();
/// let mut rng = rand::rngs::StdRng::seed_from_u64(1);
/// let question = QuestionGenerator::new(&catalog)
///     .generate(QuestionKind::CountingColor, &mut rng)?;
/// assert_eq!(question.options().len(), 4);
/// # Ok::<(), shapes_core::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct QuestionGenerator<'a> {
    catalog: &'a AttributeCatalog,
}

impl<'a> QuestionGenerator<'a> {
    #[must_use]
    pub fn new(catalog: &'a AttributeCatalog) -> Self {
        Self { catalog }
    }

    /// Generate one question of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `Error::Catalog` if the catalog cannot supply enough distinct
    /// attributes, and `Error::Question` if the assembled question breaks an
    /// option invariant.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        kind: QuestionKind,
        rng: &mut R,
    ) -> Result<Question, Error> {
        match kind {
            QuestionKind::ShapeIdentification => self.shape_identification(rng),
            QuestionKind::SizeRecognition => self.size_recognition(rng),
            QuestionKind::ColorShape => self.color_shape(rng),
            QuestionKind::CountingColor => self.counting_color(rng),
            QuestionKind::LogicalChallenge => self.logical_challenge(rng),
        }
    }

    /// One figure; name its shape.
    ///
    /// # Errors
    ///
    /// See [`QuestionGenerator::generate`].
    pub fn shape_identification<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Question, Error> {
        let figure = self.random_figure(rng)?;
        let names = self.names(&figure)?;
        let distractors = self.distractor_names(AttributeKind::Shape, &figure.shape, rng)?;

        QuestionDraft {
            kind: QuestionKind::ShapeIdentification,
            prompt: "What shape is this?".to_string(),
            hint: format!(
                "It's {} {} {}!",
                article(&names.size),
                names.size.to_lowercase(),
                names.phrase_color_shape()
            ),
            options: shuffled_options(names.shape.clone(), distractors, rng),
            correct_answer: names.shape,
            display: vec![figure],
            highlight: Some(0),
            focus: vec![0],
        }
        .validate()
        .map_err(Error::from)
    }

    /// One figure; name its size.
    ///
    /// # Errors
    ///
    /// See [`QuestionGenerator::generate`].
    pub fn size_recognition<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Question, Error> {
        let figure = self.random_figure(rng)?;
        let names = self.names(&figure)?;
        let distractors = self.distractor_names(AttributeKind::Size, &figure.size, rng)?;

        QuestionDraft {
            kind: QuestionKind::SizeRecognition,
            prompt: "What size is this shape?".to_string(),
            hint: format!(
                "This {} is {}.",
                names.phrase_color_shape(),
                names.size.to_lowercase()
            ),
            options: shuffled_options(names.size.clone(), distractors, rng),
            correct_answer: names.size,
            display: vec![figure],
            highlight: Some(0),
            focus: vec![0],
        }
        .validate()
        .map_err(Error::from)
    }

    /// A 3–5 figure scene; name the color of the target shape.
    ///
    /// Distractors are redrawn whenever they share the target's shape, not
    /// only when they repeat its shape and color. The scenes are therefore a
    /// subset of all "differs in shape or color" scenes, and the prompt
    /// "what color is the circle?" always has a single reading.
    ///
    /// # Errors
    ///
    /// See [`QuestionGenerator::generate`].
    pub fn color_shape<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Question, Error> {
        let catalog = self.catalog;
        let shape = catalog.random_id(AttributeKind::Shape, &[], rng)?;
        let color = catalog.random_id(AttributeKind::Color, &[], rng)?;
        let size = catalog.random_id(AttributeKind::Size, &[], rng)?;
        let target = ShapeInstance::new(shape, color, size);

        let figure_count = rng.random_range(3..=5);
        let mut figures = vec![(target, true)];
        while figures.len() < figure_count {
            let candidate = self.random_figure(rng)?;
            if candidate.shape == shape {
                continue;
            }
            figures.push((candidate, false));
        }

        let shape_name = catalog.display_name(AttributeKind::Shape, shape)?.to_lowercase();
        let color_name = catalog.display_name(AttributeKind::Color, color)?.to_string();
        let distractors = self.distractor_names(AttributeKind::Color, color, rng)?;
        let (display, focus) = shuffle_figures(figures, rng);

        QuestionDraft {
            kind: QuestionKind::ColorShape,
            prompt: format!("What color is the {shape_name}?"),
            hint: format!(
                "Find the {shape_name} and look at its color: it is {}.",
                color_name.to_lowercase()
            ),
            options: shuffled_options(color_name.clone(), distractors, rng),
            correct_answer: color_name,
            display,
            highlight: None,
            focus,
        }
        .validate()
        .map_err(Error::from)
    }

    /// Count the 2–5 figures of a target color among 3–6 others.
    ///
    /// # Errors
    ///
    /// See [`QuestionGenerator::generate`].
    pub fn counting_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Question, Error> {
        let catalog = self.catalog;
        let color = catalog.random_id(AttributeKind::Color, &[], rng)?;
        let count: u32 = rng.random_range(2..=5);
        let others: usize = rng.random_range(3..=6);

        let mut figures = Vec::new();
        for _ in 0..count {
            let shape = catalog.random_id(AttributeKind::Shape, &[], rng)?;
            let size = catalog.random_id(AttributeKind::Size, &[], rng)?;
            figures.push((ShapeInstance::new(shape, color, size), true));
        }
        for _ in 0..others {
            let shape = catalog.random_id(AttributeKind::Shape, &[], rng)?;
            let other = catalog.random_id(AttributeKind::Color, &[color], rng)?;
            let size = catalog.random_id(AttributeKind::Size, &[], rng)?;
            figures.push((ShapeInstance::new(shape, other, size), false));
        }

        let color_name = catalog.display_name(AttributeKind::Color, color)?.to_lowercase();
        let (display, focus) = shuffle_figures(figures, rng);
        let correct = count.to_string();

        QuestionDraft {
            kind: QuestionKind::CountingColor,
            prompt: format!("How many {color_name} shapes can you count?"),
            hint: format!("Count only the {color_name} shapes: there are {count}."),
            options: shuffled_options(correct.clone(), numeric_distractors(count, 1..=6, rng), rng),
            correct_answer: correct,
            display,
            highlight: None,
            focus,
        }
        .validate()
        .map_err(Error::from)
    }

    /// Count the 1–3 figures matching both a target size and color.
    ///
    /// Each of the 4–6 other figures misses the target in exactly one
    /// attribute: a fair coin decides whether the size or the color differs.
    ///
    /// # Errors
    ///
    /// See [`QuestionGenerator::generate`].
    pub fn logical_challenge<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Question, Error> {
        let catalog = self.catalog;
        let size = catalog.random_id(AttributeKind::Size, &[], rng)?;
        let color = catalog.random_id(AttributeKind::Color, &[], rng)?;
        let count: u32 = rng.random_range(1..=3);
        let others: usize = rng.random_range(4..=6);

        let mut figures = Vec::new();
        for _ in 0..count {
            let shape = catalog.random_id(AttributeKind::Shape, &[], rng)?;
            figures.push((ShapeInstance::new(shape, color, size), true));
        }
        for _ in 0..others {
            let shape = catalog.random_id(AttributeKind::Shape, &[], rng)?;
            let figure = if rng.random_bool(0.5) {
                let other = catalog.random_id(AttributeKind::Size, &[size], rng)?;
                ShapeInstance::new(shape, color, other)
            } else {
                let other = catalog.random_id(AttributeKind::Color, &[color], rng)?;
                ShapeInstance::new(shape, other, size)
            };
            figures.push((figure, false));
        }

        let size_name = catalog.display_name(AttributeKind::Size, size)?.to_lowercase();
        let color_name = catalog.display_name(AttributeKind::Color, color)?.to_lowercase();
        let (display, focus) = shuffle_figures(figures, rng);
        let correct = count.to_string();

        QuestionDraft {
            kind: QuestionKind::LogicalChallenge,
            prompt: format!("How many {size_name} {color_name} shapes are there?"),
            hint: format!(
                "A shape only counts if it is {size_name} and {color_name}: there {} {count}.",
                if count == 1 { "is" } else { "are" }
            ),
            options: shuffled_options(correct.clone(), numeric_distractors(count, 0..=5, rng), rng),
            correct_answer: correct,
            display,
            highlight: None,
            focus,
        }
        .validate()
        .map_err(Error::from)
    }

    fn random_figure<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<ShapeInstance, Error> {
        Ok(ShapeInstance::new(
            self.catalog.random_id(AttributeKind::Shape, &[], rng)?,
            self.catalog.random_id(AttributeKind::Color, &[], rng)?,
            self.catalog.random_id(AttributeKind::Size, &[], rng)?,
        ))
    }

    fn names(&self, figure: &ShapeInstance) -> Result<FigureNames, Error> {
        Ok(FigureNames {
            shape: self
                .catalog
                .display_name(AttributeKind::Shape, &figure.shape)?
                .to_string(),
            color: self
                .catalog
                .display_name(AttributeKind::Color, &figure.color)?
                .to_string(),
            size: self
                .catalog
                .display_name(AttributeKind::Size, &figure.size)?
                .to_string(),
        })
    }

    fn distractor_names<R: Rng + ?Sized>(
        &self,
        kind: AttributeKind,
        correct_id: &str,
        rng: &mut R,
    ) -> Result<Vec<String>, Error> {
        self.catalog
            .sample_ids(kind, &[correct_id], DISTRACTOR_OPTIONS, rng)?
            .into_iter()
            .map(|id| -> Result<String, Error> {
                Ok(self.catalog.display_name(kind, id)?.to_string())
            })
            .collect()
    }
}

//
// ─── HELPERS ───────────────────────────────────────────────────────────────────
//

struct FigureNames {
    shape: String,
    color: String,
    size: String,
}

impl FigureNames {
    fn phrase_color_shape(&self) -> String {
        format!(
            "{} {}",
            self.color.to_lowercase(),
            self.shape.to_lowercase()
        )
    }
}

fn article(word: &str) -> &'static str {
    match word.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a' | 'e' | 'i' | 'o' | 'u') => "an",
        _ => "a",
    }
}

fn shuffled_options<R: Rng + ?Sized>(
    correct: String,
    distractors: Vec<String>,
    rng: &mut R,
) -> Vec<String> {
    let mut options = Vec::with_capacity(ANSWER_OPTIONS);
    options.push(correct);
    options.extend(distractors);
    options.shuffle(rng);
    options
}

/// Three distinct numbers from `range`, none equal to `correct`.
fn numeric_distractors<R: Rng + ?Sized>(
    correct: u32,
    range: std::ops::RangeInclusive<u32>,
    rng: &mut R,
) -> Vec<String> {
    let pool: Vec<u32> = range.filter(|n| *n != correct).collect();
    pool.choose_multiple(rng, DISTRACTOR_OPTIONS)
        .map(u32::to_string)
        .collect()
}

/// Shuffle figures into display order, returning the positions of the
/// figures flagged as answer-bearing.
fn shuffle_figures<R: Rng + ?Sized>(
    mut figures: Vec<(ShapeInstance, bool)>,
    rng: &mut R,
) -> (Vec<ShapeInstance>, Vec<usize>) {
    figures.shuffle(rng);
    let focus = figures
        .iter()
        .enumerate()
        .filter_map(|(i, (_, counted))| counted.then_some(i))
        .collect();
    let display = figures.into_iter().map(|(figure, _)| figure).collect();
    (display, focus)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
