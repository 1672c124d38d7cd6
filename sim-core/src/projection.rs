use glam::Vec2;
use rand::Rng;

/// Logistic function, maps any real to `(0, 1)`.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Fixed linear map from a 2D position to `k` output logits.
///
/// Stored as `k` columns of a `2 × k` matrix, so output channel `j` is
/// `position · columns[j]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Projection {
    columns: Vec<Vec2>,
}

impl Projection {
    pub fn new(columns: Vec<Vec2>) -> Self {
        Self { columns }
    }

    /// Entries drawn as `(U[0, 1) - 0.5) * 5`, i.e. uniformly in `[-2.5, 2.5)`.
    pub fn random_centered(outputs: usize, rng: &mut impl Rng) -> Self {
        let mut entry = || (rng.random::<f32>() - 0.5) * 5.0;
        let columns = (0..outputs).map(|_| Vec2::new(entry(), entry())).collect();
        Self { columns }
    }

    /// Entries drawn uniformly in `[0, 1)`.
    pub fn random_unit(outputs: usize, rng: &mut impl Rng) -> Self {
        let columns = (0..outputs)
            .map(|_| Vec2::new(rng.random(), rng.random()))
            .collect();
        Self { columns }
    }

    /// Number of output channels.
    #[inline]
    pub fn outputs(&self) -> usize {
        self.columns.len()
    }

    /// Writes `sigmoid` of each logit for `position` into `out`.
    ///
    /// Writes `min(out.len(), self.outputs())` entries; the rest of `out`
    /// is left untouched.
    pub fn apply_sigmoid_into(&self, position: Vec2, out: &mut [f32]) {
        for (o, col) in out.iter_mut().zip(&self.columns) {
            *o = sigmoid(position.dot(*col));
        }
    }

    /// The logits for `position`.
    pub fn apply(&self, position: Vec2) -> Vec<f32> {
        self.columns.iter().map(|col| position.dot(*col)).collect()
    }

    /// `sigmoid` of each logit; every value is in `[0, 1]`.
    pub fn apply_sigmoid(&self, position: Vec2) -> Vec<f32> {
        self.columns
            .iter()
            .map(|col| sigmoid(position.dot(*col)))
            .collect()
    }
}
