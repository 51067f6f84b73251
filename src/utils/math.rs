use ndarray::ArrayView1;

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[inline]
pub fn squared_euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn rounds_to_two_places() {
        assert_eq!(round_to(0.956, 2), 0.96);
        assert_eq!(round_to(0.954, 2), 0.95);
        assert_eq!(round_to(1.0, 2), 1.0);
    }

    #[test]
    fn squared_distance() {
        let a = array![0.0, 3.0];
        let b = array![4.0, 0.0];
        assert_eq!(squared_euclidean(a.view(), b.view()), 25.0);
    }
}
