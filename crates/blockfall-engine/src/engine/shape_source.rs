use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use super::shape_catalog::ShapeCatalog;

/// Chooses the shape of the next spawned piece.
///
/// The session asks for a new index every time a piece spawns. Indices wrap
/// around the catalog length.
pub trait ShapeSource: std::fmt::Debug {
    fn next_shape(&mut self, catalog: &ShapeCatalog) -> usize;
}

/// Picks shapes uniformly at random.
///
/// Using the same seed produces the same sequence of shapes:
///
/// ```
/// use blockfall_engine::{RandomShapeSource, ShapeCatalog, ShapeSource as _};
///
/// let catalog = ShapeCatalog::standard(5).unwrap();
/// let mut a = RandomShapeSource::with_seed(42);
/// let mut b = RandomShapeSource::with_seed(42);
/// for _ in 0..10 {
///     assert_eq!(a.next_shape(&catalog), b.next_shape(&catalog));
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RandomShapeSource {
    rng: Pcg32,
}

impl Default for RandomShapeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomShapeSource {
    /// Creates a source seeded from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl ShapeSource for RandomShapeSource {
    fn next_shape(&mut self, catalog: &ShapeCatalog) -> usize {
        self.rng.random_range(0..catalog.len())
    }
}

/// Cycles through a fixed list of catalog indices.
#[derive(Debug, Clone)]
pub struct SequenceShapeSource {
    indices: Vec<usize>,
    next: usize,
}

impl SequenceShapeSource {
    /// Creates a source repeating `indices`. An empty list always yields index 0.
    #[must_use]
    pub fn new(indices: Vec<usize>) -> Self {
        Self { indices, next: 0 }
    }
}

impl ShapeSource for SequenceShapeSource {
    fn next_shape(&mut self, catalog: &ShapeCatalog) -> usize {
        let Some(&index) = self.indices.get(self.next) else {
            return 0;
        };
        self.next = (self.next + 1) % self.indices.len();
        index % catalog.len()
    }
}
