//! Feature extraction and contender scoring for hockey team-seasons.
//!
//! This crate implements the per-team half of the engine:
//!
//! 1. **Feature Extraction** ([`extractor`]) - Turns a season's player and
//!    team tables into one [`FeatureVector`](feature_table::FeatureVector) per
//!    team, plus a [`TeamProfile`](profile::TeamProfile) recording which
//!    players filled each roster tier.
//!
//! 2. **Composite Scoring** ([`scorer`]) - Standardizes a feature vector
//!    against a [`BaselineDistribution`](baseline::BaselineDistribution),
//!    flips features where lower is better, and sums the weighted z-scores.
//!
//! # Architecture
//!
//! ```text
//! LeagueTables (player + team rows)
//!     ↓ FeatureExtractor (roster tiers, goalie, league ranks, stars)
//! FeatureVector per team-season
//!     ↓ CompositeScorer (baseline + weights)
//! ContenderScore, ranked within each season
//! ```
//!
//! Baselines are computed over many team-seasons by `cupcast-analysis`;
//! weights are calibrated by `cupcast-training`.
//!
//! # Supporting Modules
//!
//! - [`team_feature`] - Feature definitions and the [`FeatureSet`](team_feature::FeatureSet)
//!   presets that decide which features exist
//! - [`league_rank`] - League-wide 1-based ranking with alphabetical tie-break
//! - [`stars`] - Points-per-game star classification
//!
//! # Determinism
//!
//! Extraction and scoring are pure functions of their inputs. Every sort that
//! could tie falls back to a stable key (team code, player id), so results
//! never depend on input row order.

pub mod baseline;
pub mod extractor;
pub mod feature_table;
pub mod league_rank;
pub mod profile;
pub mod scorer;
pub mod stars;
pub mod team_feature;
