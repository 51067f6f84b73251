use crate::classifiers::classifier::check_training_data;
use crate::classifiers::{Classifier, Learner, ScoreKind};
use crate::error::TrainingError;
use linfa::DatasetBase;
use linfa::traits::{Fit, Predict};
use linfa_trees::{DecisionTree as LinfaDecisionTree, SplitQuality};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use std::fmt::{Display, Formatter};
use tracing::debug;

pub const DEFAULT_FOREST_SEED: u64 = 0;

/// Bagged ensemble of Gini CART trees from `linfa-trees`.
///
/// Tree `i` sees `√d` randomly chosen columns and, with `bootstrap`, a
/// resample of the rows. Both draws come from `StdRng::seed_from_u64(seed + i)`,
/// so the forest is reproducible no matter how rayon schedules the trees.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomForest {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub bootstrap: bool,
    pub seed: u64,
}

impl RandomForest {
    pub fn new(n_estimators: usize, max_depth: usize, bootstrap: bool) -> Self {
        Self {
            n_estimators,
            max_depth,
            bootstrap,
            seed: DEFAULT_FOREST_SEED,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn max_features(n_features: usize) -> usize {
        ((n_features as f64).sqrt() as usize).max(1)
    }

    fn grow_tree(
        &self,
        tree_idx: usize,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, usize>,
    ) -> Result<ForestMember, TrainingError> {
        let (n, d) = x.dim();
        let mut rng = StdRng::seed_from_u64(self.seed.wrapping_add(tree_idx as u64));

        let mut features = rand::seq::index::sample(&mut rng, d, Self::max_features(d)).into_vec();
        features.sort_unstable();
        let rows: Vec<usize> = if self.bootstrap {
            (0..n).map(|_| rng.random_range(0..n)).collect()
        } else {
            (0..n).collect()
        };

        let records = x.select(Axis(1), &features).select(Axis(0), &rows);
        let targets = y.select(Axis(0), &rows);
        let dataset = DatasetBase::from(records).with_targets(targets);
        let tree = LinfaDecisionTree::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(Some(self.max_depth))
            .fit(&dataset)
            .map_err(|e| TrainingError::Backend {
                model: "Random Forest",
                message: e.to_string(),
            })?;
        Ok(ForestMember { features, tree })
    }
}

impl Display for RandomForest {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "(n_estimators={}, max_depth={}, bootstrap={})",
            self.n_estimators, self.max_depth, self.bootstrap
        )
    }
}

impl Learner for RandomForest {
    type Model = RandomForestModel;

    fn fit(
        &self,
        x: ArrayView2<'_, f64>,
        y: ArrayView1<'_, usize>,
    ) -> Result<RandomForestModel, TrainingError> {
        check_training_data(x, y)?;

        let members = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| self.grow_tree(tree_idx, x, y))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            trees = members.len(),
            max_features = Self::max_features(x.ncols()),
            "random forest fitted"
        );
        Ok(RandomForestModel { members })
    }
}

/// One tree and the columns it was trained on.
#[derive(Debug)]
struct ForestMember {
    features: Vec<usize>,
    tree: LinfaDecisionTree<f64, usize>,
}

impl ForestMember {
    fn positive_votes(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        let records = DatasetBase::from(x.select(Axis(1), &self.features));
        let labels: Array1<usize> = self.tree.predict(&records);
        labels.mapv(|l| f64::from(u8::from(l == 1)))
    }
}

#[derive(Debug)]
pub struct RandomForestModel {
    members: Vec<ForestMember>,
}

impl RandomForestModel {
    pub fn n_trees(&self) -> usize {
        self.members.len()
    }

    /// Column indices each tree was trained on, in tree order.
    pub fn feature_subsets(&self) -> Vec<&[usize]> {
        self.members.iter().map(|m| m.features.as_slice()).collect()
    }
}

impl Classifier for RandomForestModel {
    /// Share of trees voting for the positive class.
    fn decision_scores(&self, x: ArrayView2<'_, f64>) -> Array1<f64> {
        let n_trees = self.members.len().max(1) as f64;
        let votes = self
            .members
            .par_iter()
            .map(|m| m.positive_votes(x))
            .reduce(|| Array1::zeros(x.nrows()), |a, b| a + b);
        votes / n_trees
    }

    fn score_kind(&self) -> ScoreKind {
        ScoreKind::PositiveProbability
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dummies::labeled_table;
    use ndarray::array;

    #[test]
    fn same_seed_grows_the_same_forest() {
        let table = labeled_table(150, 4);
        let (x, y) = (table.features.view(), table.target.view());
        let rf = RandomForest::new(20, 6, true);
        let a = rf.fit(x, y).unwrap();
        let b = rf.fit(x, y).unwrap();
        assert_eq!(a.n_trees(), 20);
        assert_eq!(a.feature_subsets(), b.feature_subsets());
        assert_eq!(a.decision_scores(x), b.decision_scores(x));
    }

    #[test]
    fn probabilities_are_in_unit_interval_and_fit_well() {
        let table = labeled_table(300, 8);
        let model = RandomForest::new(30, 10, true)
            .fit(table.features.view(), table.target.view())
            .unwrap();
        let p = model.decision_scores(table.features.view());
        assert!(p.iter().all(|v| (0.0..=1.0).contains(v)));
        assert!(model.score(table.features.view(), table.target.view()) > 0.85);
    }

    #[test]
    fn without_bootstrap_a_deep_forest_memorizes_separable_data() {
        let x = array![[0.0, 1.0], [1.0, 1.0], [2.0, 0.0], [3.0, 0.0]];
        let y = array![0, 0, 1, 1];
        let model = RandomForest::new(10, 5, false)
            .fit(x.view(), y.view())
            .unwrap();
        assert_eq!(model.predict(x.view()), y);
    }

    #[test]
    fn each_tree_sees_sqrt_d_columns() {
        assert_eq!(RandomForest::max_features(1), 1);
        assert_eq!(RandomForest::max_features(21), 4);
        assert_eq!(RandomForest::max_features(22), 4);

        let table = labeled_table(80, 9);
        let model = RandomForest::new(5, 3, true)
            .fit(table.features.view(), table.target.view())
            .unwrap();
        let d = table.features.ncols();
        for subset in model.feature_subsets() {
            assert_eq!(subset.len(), RandomForest::max_features(d));
            assert!(subset.windows(2).all(|w| w[0] < w[1]));
            assert!(subset.iter().all(|&c| c < d));
        }
    }

    #[test]
    fn single_class_is_a_training_error() {
        let x = array![[0.0], [1.0]];
        let err = RandomForest::new(3, 2, true)
            .fit(x.view(), array![0, 0].view())
            .unwrap_err();
        assert_eq!(err, TrainingError::SingleClass(0));
    }
}
