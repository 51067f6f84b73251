use crate::classifiers::classifier::check_training_data;
use crate::classifiers::{Classifier, Learner, ScoreKind};
use crate::error::TrainingError;
use crate::utils::math::squared_euclidean;
use linfa_nn::distance::L2Dist;
use linfa_nn::{CommonNearestNeighbour, NearestNeighbour, NearestNeighbourIndex};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};
use std::fmt::{Display, Formatter};
use tracing::{debug, warn};

/// Dimensionality above which `auto` prefers brute force.
const AUTO_BRUTE_MAX_DIMS: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Auto,
    BallTree,
    KdTree,
    Brute,
}

impl Algorithm {
    /// Picks a concrete search structure for `n` training rows of `d` columns.
    pub fn resolve(self, k: usize, n: usize, d: usize) -> Algorithm {
        match self {
            Algorithm::Auto if d > AUTO_BRUTE_MAX_DIMS || k >= n / 2 => Algorithm::Brute,
            Algorithm::Auto => Algorithm::KdTree,
            concrete => concrete,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Algorithm::Auto => "auto",
            Algorithm::BallTree => "ball_tree",
            Algorithm::KdTree => "kd_tree",
            Algorithm::Brute => "brute",
        }
    }

    fn structure(self) -> CommonNearestNeighbour {
        match self {
            Algorithm::KdTree => CommonNearestNeighbour::KdTree,
            Algorithm::BallTree => CommonNearestNeighbour::BallTree,
            Algorithm::Brute | Algorithm::Auto => CommonNearestNeighbour::LinearSearch,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weights {
    Uniform,
    /// Inverse distance; exact matches take all the weight.
    Distance,
}

/// A training row returned by a neighbour query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub sq_dist: f64,
}

impl Neighbor {
    pub fn distance(&self) -> f64 {
        self.sq_dist.sqrt()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KNearestNeighbors {
    pub n_neighbors: usize,
    pub algorithm: Algorithm,
    pub weights: Weights,
    pub leaf_size: usize,
}

impl KNearestNeighbors {
    pub fn new(n_neighbors: usize, algorithm: Algorithm, weights: Weights, leaf_size: usize) -> Self {
        Self {
            n_neighbors,
            algorithm,
            weights,
            leaf_size,
        }
    }
}

impl Display for KNearestNeighbors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let weights = match self.weights {
            Weights::Uniform => "uniform",
            Weights::Distance => "distance",
        };
        write!(
            f,
            "(n_neighbors={}, algorithm={}, weights={weights}, leaf_size={})",
            self.n_neighbors,
            self.algorithm.as_str(),
            self.leaf_size
        )
    }
}

fn backend(message: impl ToString) -> TrainingError {
    TrainingError::Backend {
        model: "k-NN",
        message: message.to_string(),
    }
}

impl Learner for KNearestNeighbors {
    type Model = KNearestNeighborsModel;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, usize>,
    ) -> Result<KNearestNeighborsModel, TrainingError> {
        check_training_data(x, y)?;
        let (n, d) = x.dim();
        if self.n_neighbors == 0 || self.n_neighbors > n {
            return Err(TrainingError::TooFewSamples {
                k: self.n_neighbors,
                samples: n,
            });
        }

        let algorithm = self.algorithm.resolve(self.n_neighbors, n, d);
        let model = KNearestNeighborsModel {
            points: x.to_owned(),
            labels: y.to_owned(),
            k: self.n_neighbors,
            weights: self.weights,
            algorithm,
            leaf_size: self.leaf_size,
        };
        // the index borrows the training rows, so it is rebuilt per query batch
        model.index()?;
        debug!(algorithm = algorithm.as_str(), rows = n, "k-NN index validated");
        Ok(model)
    }
}

/// Fitted k-NN: the training rows and how to search them.
#[derive(Debug, Clone)]
pub struct KNearestNeighborsModel {
    points: Array2<f64>,
    labels: Array1<usize>,
    k: usize,
    weights: Weights,
    algorithm: Algorithm,
    leaf_size: usize,
}

impl KNearestNeighborsModel {
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    fn index(&self) -> Result<Box<dyn NearestNeighbourIndex<f64> + '_>, TrainingError> {
        let index = self
            .algorithm
            .structure()
            .from_batch_with_leaf_size(&self.points, self.leaf_size, L2Dist)
            .map_err(backend)?;
        Ok(index)
    }

    fn query(
        &self,
        index: &dyn NearestNeighbourIndex<f64>,
        query: ArrayView1<'_, f64>,
    ) -> Result<Vec<Neighbor>, TrainingError> {
        let found = index.k_nearest(query, self.k).map_err(backend)?;
        let mut neighbors: Vec<Neighbor> = found
            .into_iter()
            .map(|(point, index)| Neighbor {
                index,
                sq_dist: squared_euclidean(point, query),
            })
            .collect();
        neighbors.sort_by(|a, b| a.sq_dist.total_cmp(&b.sq_dist).then(a.index.cmp(&b.index)));
        Ok(neighbors)
    }

    /// The `k` nearest training rows to `query`, nearest first, ties by row index.
    pub fn kneighbors(&self, query: ArrayView1<'_, f64>) -> Result<Vec<Neighbor>, TrainingError> {
        let index = self.index()?;
        self.query(index.as_ref(), query)
    }

    fn positive_probability(&self, neighbors: &[Neighbor]) -> f64 {
        let exact = neighbors.iter().any(|n| n.sq_dist == 0.0);

        let (mut positive, mut total) = (0.0, 0.0);
        for n in neighbors {
            let w = match (self.weights, exact) {
                (Weights::Uniform, _) => 1.0,
                (Weights::Distance, true) => f64::from(u8::from(n.sq_dist == 0.0)),
                (Weights::Distance, false) => 1.0 / n.distance(),
            };
            total += w;
            if self.labels[n.index] == 1 {
                positive += w;
            }
        }
        if total > 0.0 { positive / total } else { 0.0 }
    }
}

impl Classifier for KNearestNeighborsModel {
    /// Weighted share of positive neighbours.
    fn decision_scores(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        let index = match self.index() {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "k-NN index unavailable, scoring every row as negative");
                return Array1::zeros(x.nrows());
            }
        };
        x.rows()
            .into_iter()
            .enumerate()
            .map(|(row, query)| match self.query(index.as_ref(), query) {
                Ok(neighbors) => self.positive_probability(&neighbors),
                Err(e) => {
                    warn!(row, error = %e, "k-NN query failed");
                    0.0
                }
            })
            .collect()
    }

    fn score_kind(&self) -> ScoreKind {
        ScoreKind::PositiveProbability
    }
}
