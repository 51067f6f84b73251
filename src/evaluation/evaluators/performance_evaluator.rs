use crate::evaluation::Measurement;
use std::collections::HashMap;

/// Accumulating evaluator of predictive performance.
///
/// A `PerformanceEvaluator` consumes `(truth, prediction)` label pairs and
/// exposes aggregated metrics via [`performance`](Self::performance).
pub trait PerformanceEvaluator {
    /// Clears all accumulated counts.
    fn reset(&mut self);

    /// Feeds one test row: its true label and the predicted label.
    ///
    /// Labels outside the evaluator's class range are skipped.
    fn add_result(&mut self, truth: usize, predicted: usize);

    /// Returns a snapshot of current metrics.
    fn performance(&self) -> Vec<Measurement>;

    /// Feeds aligned label sequences.
    fn add_results<T, P>(&mut self, truth: T, predicted: P)
    where
        Self: Sized,
        T: IntoIterator<Item = usize>,
        P: IntoIterator<Item = usize>,
    {
        for (t, p) in truth.into_iter().zip(predicted) {
            self.add_result(t, p);
        }
    }
}

pub trait PerformanceEvaluatorExt {
    /// Returns (name, Some(value)|None) for each requested metric, preserving order.
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>;

    fn metric(&self, name: &str) -> Option<f64> {
        self.metrics([name]).into_iter().next().and_then(|(_, v)| v)
    }
}

impl<T: PerformanceEvaluator + ?Sized> PerformanceEvaluatorExt for T {
    fn metrics<'a, I>(&self, names: I) -> Vec<(String, Option<f64>)>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let ms = self.performance();
        let map: HashMap<_, _> = ms.into_iter().map(|m| (m.name, m.value)).collect();
        names
            .into_iter()
            .map(|n| (n.to_string(), map.get(n).copied()))
            .collect()
    }
}
