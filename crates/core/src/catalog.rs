use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

//
// ─── LIMITS ────────────────────────────────────────────────────────────────────
//

/// Fewest shapes a catalog may hold: one answer plus three distractors.
pub const MIN_SHAPES: usize = 4;
/// Fewest sizes a catalog may hold.
pub const MIN_SIZES: usize = 5;
/// Fewest selectable (non-reserved) colors a catalog may hold.
pub const MIN_COLORS: usize = 7;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CatalogError {
    #[error("no eligible {kind} ids left after exclusions")]
    EmptyPool { kind: AttributeKind },

    #[error("asked for {requested} distinct {kind} ids but only {available} are eligible")]
    InsufficientPool {
        kind: AttributeKind,
        requested: usize,
        available: usize,
    },

    #[error("unknown {kind} id: {id}")]
    UnknownId { kind: AttributeKind, id: String },

    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: AttributeKind, id: String },

    #[error("catalog needs at least {required} {kind} entries, found {found}")]
    TooFew {
        kind: AttributeKind,
        required: usize,
        found: usize,
    },
}

//
// ─── ENTRIES ───────────────────────────────────────────────────────────────────
//

/// The three attribute families a figure is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Shape,
    Color,
    Size,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AttributeKind::Shape => "shape",
            AttributeKind::Color => "color",
            AttributeKind::Size => "size",
        };
        f.write_str(label)
    }
}

/// Rendering data carried alongside an entry. The question logic never reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Presentation {
    None,
    Hex(String),
    Scale(f32),
}

/// One identifier with its display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeEntry {
    id: String,
    name: String,
    presentation: Presentation,
}

impl AttributeEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, presentation: Presentation) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            presentation,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// Immutable registry of shapes, colors and sizes.
///
/// Colors listed in `reserved_colors` exist for rendering only and are never
/// returned by [`AttributeCatalog::random_id`] or [`AttributeCatalog::sample_ids`].
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeCatalog {
    shapes: Vec<AttributeEntry>,
    colors: Vec<AttributeEntry>,
    sizes: Vec<AttributeEntry>,
    reserved_colors: HashSet<String>,
}

impl AttributeCatalog {
    /// Build a catalog, checking id uniqueness and the minimum sizes the
    /// question generator depends on.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::DuplicateId` for repeated ids within a family,
    /// `CatalogError::UnknownId` when a reserved color is not in `colors`,
    /// and `CatalogError::TooFew` when a family is below its minimum.
    pub fn new(
        shapes: Vec<AttributeEntry>,
        colors: Vec<AttributeEntry>,
        sizes: Vec<AttributeEntry>,
        reserved_colors: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, CatalogError> {
        let reserved_colors: HashSet<String> = reserved_colors.into_iter().map(Into::into).collect();

        check_unique(AttributeKind::Shape, &shapes)?;
        check_unique(AttributeKind::Color, &colors)?;
        check_unique(AttributeKind::Size, &sizes)?;

        if let Some(id) = reserved_colors
            .iter()
            .find(|id| !colors.iter().any(|entry| &entry.id == *id))
        {
            return Err(CatalogError::UnknownId {
                kind: AttributeKind::Color,
                id: id.clone(),
            });
        }

        let selectable_colors = colors
            .iter()
            .filter(|entry| !reserved_colors.contains(&entry.id))
            .count();

        for (kind, found, required) in [
            (AttributeKind::Shape, shapes.len(), MIN_SHAPES),
            (AttributeKind::Color, selectable_colors, MIN_COLORS),
            (AttributeKind::Size, sizes.len(), MIN_SIZES),
        ] {
            if found < required {
                return Err(CatalogError::TooFew {
                    kind,
                    required,
                    found,
                });
            }
        }

        Ok(Self {
            shapes,
            colors,
            sizes,
            reserved_colors,
        })
    }

    /// The built-in vocabulary: eight shapes, eight selectable colors plus
    /// white and black, and five sizes from smallest to largest.
    ///
    /// # Panics
    ///
    /// Never in practice; the reference data satisfies every catalog check.
    #[must_use]
    pub fn reference() -> Self {
        let shapes = [
            ("circle", "Circle"),
            ("square", "Square"),
            ("triangle", "Triangle"),
            ("rectangle", "Rectangle"),
            ("star", "Star"),
            ("heart", "Heart"),
            ("diamond", "Diamond"),
            ("oval", "Oval"),
        ]
        .into_iter()
        .map(|(id, name)| AttributeEntry::new(id, name, Presentation::None))
        .collect();

        let colors = [
            ("red", "Red", "#e74c3c"),
            ("blue", "Blue", "#3498db"),
            ("green", "Green", "#2ecc71"),
            ("yellow", "Yellow", "#f1c40f"),
            ("orange", "Orange", "#e67e22"),
            ("purple", "Purple", "#9b59b6"),
            ("pink", "Pink", "#ff6fb5"),
            ("brown", "Brown", "#8b5a2b"),
            ("white", "White", "#ffffff"),
            ("black", "Black", "#222222"),
        ]
        .into_iter()
        .map(|(id, name, hex)| AttributeEntry::new(id, name, Presentation::Hex(hex.to_string())))
        .collect();

        let sizes = [
            ("tiny", "Tiny", 0.5),
            ("small", "Small", 0.75),
            ("medium", "Medium", 1.0),
            ("big", "Big", 1.3),
            ("huge", "Huge", 1.6),
        ]
        .into_iter()
        .map(|(id, name, scale)| AttributeEntry::new(id, name, Presentation::Scale(scale)))
        .collect();

        Self::new(shapes, colors, sizes, ["white", "black"])
            .expect("reference catalog satisfies its own minimums")
    }

    #[must_use]
    pub fn entries(&self, kind: AttributeKind) -> &[AttributeEntry] {
        match kind {
            AttributeKind::Shape => &self.shapes,
            AttributeKind::Color => &self.colors,
            AttributeKind::Size => &self.sizes,
        }
    }

    /// Every id of the given family, reserved colors included.
    pub fn all_ids(&self, kind: AttributeKind) -> impl Iterator<Item = &str> {
        self.entries(kind).iter().map(AttributeEntry::id)
    }

    #[must_use]
    pub fn is_reserved_color(&self, id: &str) -> bool {
        self.reserved_colors.contains(id)
    }

    /// Display name for `id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::UnknownId` if the family has no such id.
    pub fn display_name(&self, kind: AttributeKind, id: &str) -> Result<&str, CatalogError> {
        self.entries(kind)
            .iter()
            .find(|entry| entry.id == id)
            .map(AttributeEntry::name)
            .ok_or_else(|| CatalogError::UnknownId {
                kind,
                id: id.to_string(),
            })
    }

    /// Ids eligible for random selection: everything not in `excluding`, and
    /// for colors never a reserved one.
    #[must_use]
    pub fn eligible_ids(&self, kind: AttributeKind, excluding: &[&str]) -> Vec<&str> {
        self.all_ids(kind)
            .filter(|id| !excluding.contains(id))
            .filter(|id| kind != AttributeKind::Color || !self.is_reserved_color(id))
            .collect()
    }

    /// Uniform random pick among the eligible ids.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyPool` when the exclusions leave nothing.
    pub fn random_id<R: Rng + ?Sized>(
        &self,
        kind: AttributeKind,
        excluding: &[&str],
        rng: &mut R,
    ) -> Result<&str, CatalogError> {
        self.eligible_ids(kind, excluding)
            .choose(rng)
            .copied()
            .ok_or(CatalogError::EmptyPool { kind })
    }

    /// `amount` distinct eligible ids, drawn without replacement in random order.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InsufficientPool` when fewer than `amount` ids are eligible.
    pub fn sample_ids<R: Rng + ?Sized>(
        &self,
        kind: AttributeKind,
        excluding: &[&str],
        amount: usize,
        rng: &mut R,
    ) -> Result<Vec<&str>, CatalogError> {
        let pool = self.eligible_ids(kind, excluding);
        if pool.len() < amount {
            return Err(CatalogError::InsufficientPool {
                kind,
                requested: amount,
                available: pool.len(),
            });
        }
        Ok(pool.choose_multiple(rng, amount).copied().collect())
    }
}

impl Default for AttributeCatalog {
    fn default() -> Self {
        Self::reference()
    }
}

fn check_unique(kind: AttributeKind, entries: &[AttributeEntry]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.id.as_str()) {
            return Err(CatalogError::DuplicateId {
                kind,
                id: entry.id.clone(),
            });
        }
    }
    Ok(())
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn plain(ids: &[&str]) -> Vec<AttributeEntry> {
        ids.iter()
            .map(|id| AttributeEntry::new(*id, id.to_uppercase(), Presentation::None))
            .collect()
    }

    #[test]
    fn reference_catalog_meets_minimums() {
        let catalog = AttributeCatalog::reference();
        assert!(catalog.entries(AttributeKind::Shape).len() >= MIN_SHAPES);
        assert!(catalog.entries(AttributeKind::Size).len() >= MIN_SIZES);
        assert!(catalog.eligible_ids(AttributeKind::Color, &[]).len() >= MIN_COLORS);
    }

    #[test]
    fn sizes_are_ordered_by_scale() {
        let catalog = AttributeCatalog::reference();
        let scales: Vec<f32> = catalog
            .entries(AttributeKind::Size)
            .iter()
            .filter_map(|entry| match entry.presentation() {
                Presentation::Scale(scale) => Some(*scale),
                _ => None,
            })
            .collect();
        assert_eq!(scales.len(), catalog.entries(AttributeKind::Size).len());
        assert!(scales.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn random_color_never_returns_reserved() {
        let catalog = AttributeCatalog::reference();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let id = catalog.random_id(AttributeKind::Color, &[], &mut rng).unwrap();
            assert!(id != "white" && id != "black");
        }
    }

    #[test]
    fn random_id_honors_exclusions() {
        let catalog = AttributeCatalog::reference();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let id = catalog
                .random_id(AttributeKind::Shape, &["circle", "square"], &mut rng)
                .unwrap();
            assert!(id != "circle" && id != "square");
        }
    }

    #[test]
    fn excluding_everything_is_an_error() {
        let catalog = AttributeCatalog::reference();
        let all: Vec<&str> = catalog.all_ids(AttributeKind::Size).collect();
        let mut rng = StdRng::seed_from_u64(1);
        let err = catalog
            .random_id(AttributeKind::Size, &all, &mut rng)
            .unwrap_err();
        assert_eq!(err, CatalogError::EmptyPool { kind: AttributeKind::Size });
    }

    #[test]
    fn sample_ids_are_distinct() {
        let catalog = AttributeCatalog::reference();
        let mut rng = StdRng::seed_from_u64(3);
        let picked = catalog
            .sample_ids(AttributeKind::Color, &["red"], 3, &mut rng)
            .unwrap();
        let unique: HashSet<_> = picked.iter().collect();
        assert_eq!(unique.len(), 3);
        assert!(!picked.contains(&"red"));
    }

    #[test]
    fn display_name_rejects_unknown_ids() {
        let catalog = AttributeCatalog::reference();
        assert_eq!(
            catalog.display_name(AttributeKind::Shape, "circle").unwrap(),
            "Circle"
        );
        assert!(matches!(
            catalog.display_name(AttributeKind::Shape, "blob"),
            Err(CatalogError::UnknownId { .. })
        ));
    }

    #[test]
    fn new_rejects_small_or_duplicated_families() {
        let colors = plain(&["a", "b", "c", "d", "e", "f", "g"]);
        let sizes = plain(&["s1", "s2", "s3", "s4", "s5"]);

        let err = AttributeCatalog::new(
            plain(&["x", "y", "z"]),
            colors.clone(),
            sizes.clone(),
            Vec::<String>::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::TooFew { kind: AttributeKind::Shape, required: 4, found: 3 }
        ));

        let err = AttributeCatalog::new(
            plain(&["x", "y", "z", "x"]),
            colors.clone(),
            sizes.clone(),
            Vec::<String>::new(),
        )
        .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));

        // Reserving a color shrinks the selectable pool below the minimum.
        let err = AttributeCatalog::new(plain(&["w", "x", "y", "z"]), colors, sizes, ["a"])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::TooFew { kind: AttributeKind::Color, .. }
        ));
    }
}
