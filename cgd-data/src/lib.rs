//! Data processing for COVID observations.
//!
//! This crate handles transforming raw observation series into forms
//! suitable for charting: smoothing, derived rates, per-capita scaling,
//! correlation, and downsampling for crisp rendering.

/// Sliding-window smoothing for daily series.
pub mod rolling {
    /// Rolling mean over a sliding window of consecutive points.
    ///
    /// Uses `min_periods = 1` semantics: the first `window - 1` outputs
    /// average whatever prefix is available, so the result has the same
    /// length as the input. A constant input series maps to itself.
    pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
        if values.is_empty() || window == 0 {
            return Vec::new();
        }
        let mut result = Vec::with_capacity(values.len());
        let mut sum = 0.0;
        for i in 0..values.len() {
            sum += values[i];
            if i >= window {
                sum -= values[i - window];
            }
            let count = (i + 1).min(window);
            result.push(sum / count as f64);
        }
        result
    }

}

/// Derived epidemiological rates, all expressed as percentages.
///
/// Every function returns `None` on a zero or missing denominator so
/// callers never divide by zero; charts simply skip those points.
pub mod rates {
    /// Deaths divided by confirmed cases, as a percentage.
    pub fn case_fatality_rate(total_deaths: u64, total_cases: u64) -> Option<f64> {
        if total_cases == 0 {
            return None;
        }
        Some(total_deaths as f64 / total_cases as f64 * 100.0)
    }

    /// Fully vaccinated people as a percentage of population.
    pub fn vaccination_rate(people_fully_vaccinated: u64, population: u64) -> Option<f64> {
        if population == 0 {
            return None;
        }
        Some(people_fully_vaccinated as f64 / population as f64 * 100.0)
    }

    /// Hospital patients as a percentage of daily new cases.
    pub fn hospitalization_rate(hosp_patients: u32, new_cases: u32) -> Option<f64> {
        if new_cases == 0 {
            return None;
        }
        Some(hosp_patients as f64 / new_cases as f64 * 100.0)
    }

    /// ICU patients as a percentage of hospital patients.
    pub fn icu_rate(icu_patients: u32, hosp_patients: u32) -> Option<f64> {
        if hosp_patients == 0 {
            return None;
        }
        Some(icu_patients as f64 / hosp_patients as f64 * 100.0)
    }

    /// Scale a raw count to a per-N-people figure.
    pub fn per_capita(value: f64, population: u64, per: f64) -> Option<f64> {
        if population == 0 {
            return None;
        }
        Some(value / population as f64 * per)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn cfr_basic() {
            let cfr = case_fatality_rate(350_000, 20_000_000).unwrap();
            assert!((cfr - 1.75).abs() < 1e-9);
        }

        #[test]
        fn zero_denominators_yield_none() {
            assert!(case_fatality_rate(10, 0).is_none());
            assert!(vaccination_rate(10, 0).is_none());
            assert!(hospitalization_rate(10, 0).is_none());
            assert!(icu_rate(10, 0).is_none());
            assert!(per_capita(10.0, 0, 100_000.0).is_none());
        }

        #[test]
        fn per_capita_scaling() {
            // 3310 cases in a population of 331M is 1 per 100k
            let v = per_capita(3310.0, 331_000_000, 100_000.0).unwrap();
            assert!((v - 1.0).abs() < 1e-9);
        }

        #[test]
        fn vaccination_rate_full_coverage() {
            let v = vaccination_rate(1000, 1000).unwrap();
            assert!((v - 100.0).abs() < 1e-9);
        }
    }
}

/// Pearson correlation between paired metric series.
pub mod correlate {
    /// Pearson correlation coefficient of two equal-length series.
    ///
    /// Returns `None` when the series lengths differ, fewer than two
    /// points are supplied, or either series has zero variance.
    pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
        if xs.len() != ys.len() || xs.len() < 2 {
            return None;
        }
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let mut cov = 0.0;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        for (x, y) in xs.iter().zip(ys.iter()) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            cov += dx * dy;
            var_x += dx * dx;
            var_y += dy * dy;
        }
        if var_x == 0.0 || var_y == 0.0 {
            return None;
        }
        Some(cov / (var_x.sqrt() * var_y.sqrt()))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn perfect_positive_correlation() {
            let xs = vec![1.0, 2.0, 3.0, 4.0];
            let ys = vec![10.0, 20.0, 30.0, 40.0];
            let r = pearson(&xs, &ys).unwrap();
            assert!((r - 1.0).abs() < 1e-9);
        }

        #[test]
        fn perfect_negative_correlation() {
            let xs = vec![1.0, 2.0, 3.0, 4.0];
            let ys = vec![8.0, 6.0, 4.0, 2.0];
            let r = pearson(&xs, &ys).unwrap();
            assert!((r + 1.0).abs() < 1e-9);
        }

        #[test]
        fn zero_variance_is_none() {
            let xs = vec![5.0, 5.0, 5.0];
            let ys = vec![1.0, 2.0, 3.0];
            assert!(pearson(&xs, &ys).is_none());
        }

        #[test]
        fn mismatched_or_short_input_is_none() {
            assert!(pearson(&[1.0, 2.0], &[1.0]).is_none());
            assert!(pearson(&[1.0], &[1.0]).is_none());
        }
    }
}

/// Stride-based series thinning for chart rendering.
pub mod downsample {
    /// Thin a series to at most `max_points`, always keeping the final
    /// point so the chart ends at the most recent observation.
    pub fn downsample<T: Clone>(points: &[T], max_points: usize) -> Vec<T> {
        if max_points == 0 || points.len() <= max_points {
            return points.to_vec();
        }
        let step = points.len() as f64 / max_points as f64;
        let mut result = Vec::with_capacity(max_points + 1);
        let mut idx = 0.0;
        while (idx as usize) < points.len() {
            result.push(points[idx as usize].clone());
            idx += step;
        }
        let last_idx = points.len() - 1;
        if (idx - step) as usize != last_idx {
            result.push(points[last_idx].clone());
        }
        result
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn short_series_unchanged() {
            let points: Vec<u32> = (0..100).collect();
            assert_eq!(downsample(&points, 2000), points);
        }

        #[test]
        fn long_series_is_thinned() {
            let points: Vec<u32> = (0..10_000).collect();
            let thinned = downsample(&points, 2000);
            assert!(thinned.len() <= 2001);
            assert_eq!(thinned[0], 0);
            assert_eq!(*thinned.last().unwrap(), 9999);
        }

        #[test]
        fn keeps_chronological_order() {
            let points: Vec<u32> = (0..5000).collect();
            let thinned = downsample(&points, 500);
            for pair in thinned.windows(2) {
                assert!(pair[0] < pair[1]);
            }
        }
    }
}
