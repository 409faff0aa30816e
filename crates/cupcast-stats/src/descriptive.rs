/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency, dispersion,
/// and spread for a dataset of `f64` values.
///
/// Dispersion uses the sample formula (n−1 denominator). A dataset with a
/// single value has no defined sample variance, so [`Self::sample_variance`]
/// and [`Self::sample_std_dev`] are `None` in that case rather than `NaN`.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    /// Number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The median value of the dataset.
    pub median: f64,
    /// The sample variance of the dataset (`None` for fewer than 2 values).
    pub sample_variance: Option<f64>,
    /// The sample standard deviation of the dataset (`None` for fewer than 2 values).
    pub sample_std_dev: Option<f64>,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// This method will sort the values internally before computing statistics.
    ///
    /// # Returns
    ///
    /// * `Some(DescriptiveStats)` - if the dataset contains at least one value
    /// * `None` - if the dataset is empty
    ///
    /// # Examples
    ///
    /// ```
    /// # use cupcast_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(values).unwrap();
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// assert_eq!(stats.median, 3.0);
    /// ```
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f64::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// Use this when you already have sorted data to avoid unnecessary work.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f64]) -> Option<Self> {
        assert!(
            sorted_values.is_sorted_by(|a, b| a <= b),
            "values must be sorted in ascending order"
        );

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let count = sorted_values.len();
        let n = count as f64;
        let mean = sorted_values.iter().sum::<f64>() / n;
        let median = if count % 2 == 1 {
            sorted_values[count / 2]
        } else {
            f64::midpoint(sorted_values[count / 2 - 1], sorted_values[count / 2])
        };
        let sample_variance = (count >= 2).then(|| {
            sorted_values
                .iter()
                .map(|v| (v - mean).powi(2))
                .sum::<f64>()
                / (n - 1.0)
        });
        let sample_std_dev = sample_variance.map(f64::sqrt);

        Some(Self {
            count,
            min,
            max,
            mean,
            median,
            sample_variance,
            sample_std_dev,
        })
    }
}
