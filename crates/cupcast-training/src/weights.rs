//! Bounded weight vector operations.
//!
//! Every feature weight lives in its own closed interval. The operations in
//! this module never leave those intervals:
//!
//! - **Initialization**: [`random`] samples each weight uniformly in its bound
//! - **Crossover**: [`blx_alpha`] implements the BLX-α operator
//! - **Mutation**: [`mutate`] applies Gaussian noise
//!
//! Results of crossover and mutation are clamped back into the bound of the
//! corresponding feature.
//!
//! # Bounds
//!
//! [`WeightBounds`] maps feature ids to bounds and falls back to a default
//! bound for features it does not name. It is loadable from JSON:
//!
//! ```
//! use cupcast_training::weights::{Bound, WeightBounds};
//!
//! let bounds: WeightBounds = serde_json::from_str(
//!     r#"{ "default": { "min": 0.0, "max": 5.0 }, "features": { "goalie_gsax": { "min": 8.0, "max": 10.0 } } }"#,
//! ).unwrap();
//! assert_eq!(bounds.get("goalie_gsax"), Bound::new(8.0, 10.0));
//! assert_eq!(bounds.get("f_1_3"), Bound::new(0.0, 5.0));
//! ```

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::Normal;
use serde::{Deserialize, Serialize};

/// Closed interval `[min, max]` of one weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bound {
    pub min: f64,
    pub max: f64,
}

impl Bound {
    #[must_use]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[must_use]
    pub fn contains(self, weight: f64) -> bool {
        (self.min..=self.max).contains(&weight)
    }

    #[must_use]
    pub fn clamp(self, weight: f64) -> f64 {
        weight.clamp(self.min, self.max)
    }

    fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

const DEFAULT_BOUND: Bound = Bound::new(0.0, 10.0);

fn default_bound() -> Bound {
    DEFAULT_BOUND
}

/// Per-feature weight bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightBounds {
    /// Bound of every feature not listed in `features`.
    #[serde(default = "default_bound")]
    pub default: Bound,
    #[serde(default)]
    pub features: BTreeMap<String, Bound>,
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
#[display("invalid weight bound for '{feature_id}': [{min}, {max}]")]
pub struct InvalidBound {
    pub feature_id: String,
    pub min: f64,
    pub max: f64,
}

impl Default for WeightBounds {
    fn default() -> Self {
        Self::tuned()
    }
}

impl WeightBounds {
    /// The same bound for every feature.
    #[must_use]
    pub fn uniform(bound: Bound) -> Self {
        Self {
            default: bound,
            features: BTreeMap::new(),
        }
    }

    /// Bounds that proved useful for the `lines` feature set: top lines and
    /// the third defense pair carry weight, middle tiers stay small and the
    /// starting goalie dominates.
    #[must_use]
    pub fn tuned() -> Self {
        let features = [
            ("f_1_3", Bound::new(3.0, 7.0)),
            ("f_4_6", Bound::new(0.0, 2.0)),
            ("f_7_9", Bound::new(0.0, 3.0)),
            ("f_10_12", Bound::new(3.0, 6.0)),
            ("d_1_2", Bound::new(6.0, 10.0)),
            ("d_3_4", Bound::new(0.0, 2.0)),
            ("d_5_6", Bound::new(5.0, 10.0)),
            ("goalie_gsax", Bound::new(9.0, 10.0)),
            ("goalie_gsax_per_gp", Bound::new(9.0, 10.0)),
        ]
        .into_iter()
        .map(|(id, bound)| (id.to_owned(), bound))
        .collect();
        Self {
            default: DEFAULT_BOUND,
            features,
        }
    }

    #[must_use]
    pub fn get(&self, feature_id: &str) -> Bound {
        self.features.get(feature_id).copied().unwrap_or(self.default)
    }

    /// Bounds of `feature_ids`, in order.
    ///
    /// # Errors
    ///
    /// Fails on a bound whose ends are not finite or are reversed.
    pub fn resolve<'a, I>(&self, feature_ids: I) -> Result<Vec<Bound>, InvalidBound>
    where
        I: IntoIterator<Item = &'a str>,
    {
        feature_ids
            .into_iter()
            .map(|id| {
                let bound = self.get(id);
                if bound.is_valid() {
                    Ok(bound)
                } else {
                    Err(InvalidBound {
                        feature_id: id.to_owned(),
                        min: bound.min,
                        max: bound.max,
                    })
                }
            })
            .collect()
    }
}

/// Creates a weight vector by applying a function to each index.
///
/// # Examples
///
/// ```
/// use cupcast_training::weights;
///
/// let weights = weights::from_fn(|i| 1.0 / (i as f64 + 1.0), 3);
/// assert_eq!(weights, vec![1.0, 0.5, 1.0 / 3.0]);
/// ```
pub fn from_fn<F>(mut f: F, len: usize) -> Vec<f64>
where
    F: FnMut(usize) -> f64,
{
    let mut values = Vec::with_capacity(len);
    for i in 0..len {
        values.push(f(i));
    }
    values
}

/// Samples each weight uniformly within its bound.
pub fn random<R>(rng: &mut R, bounds: &[Bound]) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    from_fn(|i| rng.random_range(bounds[i].min..=bounds[i].max), bounds.len())
}

/// Performs BLX-α (Blend Crossover) between two parent weight vectors.
///
/// For parents `x1` and `x2` at position `i`, the child is sampled uniformly
/// from `[min - α·d, max + α·d]` with `d = |x2 - x1|`, then clamped into
/// `bounds[i]`.
///
/// - `alpha = 0.0`: children strictly between the parents
/// - `alpha = 0.5`: standard BLX-0.5
///
/// # Panics
///
/// Panics if the parents and `bounds` have different lengths.
pub fn blx_alpha<R>(p1: &[f64], p2: &[f64], alpha: f64, bounds: &[Bound], rng: &mut R) -> Vec<f64>
where
    R: Rng + ?Sized,
{
    assert_eq!(p1.len(), p2.len());
    assert_eq!(p1.len(), bounds.len());
    from_fn(
        |i| {
            let min = f64::min(p1[i], p2[i]);
            let max = f64::max(p1[i], p2[i]);
            let d = max - min;
            let lower = min - alpha * d;
            let upper = max + alpha * d;
            bounds[i].clamp(rng.random_range(lower..=upper))
        },
        p1.len(),
    )
}

/// Applies Gaussian mutation to a weight vector in place.
///
/// Each weight is perturbed with probability `rate` by a sample of `noise`
/// and clamped back into its bound.
///
/// # Panics
///
/// Panics if `rate` is outside `[0, 1]` or `weights` and `bounds` have
/// different lengths.
pub fn mutate<R>(weights: &mut [f64], noise: &Normal<f64>, rate: f64, bounds: &[Bound], rng: &mut R)
where
    R: Rng + ?Sized,
{
    assert_eq!(weights.len(), bounds.len());
    for (w, bound) in weights.iter_mut().zip(bounds) {
        if rng.random_bool(rate) {
            *w = bound.clamp(*w + rng.sample(noise));
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg64;

    use super::*;

    fn bounds() -> Vec<Bound> {
        WeightBounds::tuned()
            .resolve(["f_1_3", "f_4_6", "d_5_6", "goalie_gsax", "es_gf_rank"])
            .unwrap()
    }

    #[test]
    fn test_tuned_bounds_fall_back_to_default() {
        let bounds = WeightBounds::tuned();
        assert_eq!(bounds.get("d_1_2"), Bound::new(6.0, 10.0));
        assert_eq!(bounds.get("pk_ga_rank"), Bound::new(0.0, 10.0));
    }

    #[test]
    fn test_reversed_bound_is_rejected() {
        let mut bounds = WeightBounds::uniform(Bound::new(0.0, 1.0));
        bounds.features.insert("f_1_3".to_owned(), Bound::new(2.0, 1.0));
        let err = bounds.resolve(["d_1_2", "f_1_3"]).unwrap_err();
        assert_eq!(err.feature_id, "f_1_3");

        let nan = WeightBounds::uniform(Bound::new(f64::NAN, 1.0));
        assert!(nan.resolve(["f_1_3"]).is_err());
    }

    #[test]
    fn test_operators_stay_within_bounds() {
        let bounds = bounds();
        let mut rng = Pcg64::seed_from_u64(7);
        let noise = Normal::new(0.0, 5.0).unwrap();
        for _ in 0..200 {
            let p1 = random(&mut rng, &bounds);
            let p2 = random(&mut rng, &bounds);
            let mut child = blx_alpha(&p1, &p2, 1.5, &bounds, &mut rng);
            assert!(child.iter().zip(&bounds).all(|(w, b)| b.contains(*w)));
            mutate(&mut child, &noise, 1.0, &bounds, &mut rng);
            assert!(child.iter().zip(&bounds).all(|(w, b)| b.contains(*w)));
        }
    }

    #[test]
    fn test_degenerate_bound_is_constant() {
        let bounds = [Bound::new(2.5, 2.5)];
        let mut rng = Pcg64::seed_from_u64(1);
        assert_eq!(random(&mut rng, &bounds), [2.5]);
    }
}
