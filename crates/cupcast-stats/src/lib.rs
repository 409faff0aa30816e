//! Statistical utilities for the cupcast scoring engine.
//!
//! This crate provides the small set of statistical tools the rest of the
//! workspace builds on:
//!
//! - **Descriptive statistics**: mean, median, range and the sample (n−1)
//!   variance/standard deviation of a dataset
//! - **Z-scores**: standardization against a reference mean and standard
//!   deviation, and the inverse transform
//!
//! # Modules
//!
//! - [`descriptive`]: Descriptive statistics for summarizing datasets
//! - [`zscore`]: Z-score normalization against a reference distribution
//!
//! # Examples
//!
//! ## Computing descriptive statistics
//!
//! ```
//! use cupcast_stats::descriptive::DescriptiveStats;
//!
//! let values = [1.0, 2.0, 3.0, 4.0, 5.0];
//! let stats = DescriptiveStats::new(values).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! assert_eq!(stats.sample_variance, Some(2.5));
//! ```
//!
//! ## Standardizing a value
//!
//! ```
//! use cupcast_stats::zscore::ZScore;
//!
//! let z = ZScore::new(10.0, 2.0).unwrap();
//! assert_eq!(z.standardize(14.0), 2.0);
//! assert_eq!(z.restore(2.0), 14.0);
//! ```

pub mod descriptive;
pub mod zscore;
