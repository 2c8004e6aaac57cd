//! # u-ranktest
//!
//! Rank-based hypothesis testing for ordinal data in one factor.
//!
//! The pipeline ranks the pooled observations with midranks, aggregates
//! ranks by group, evaluates the Kruskal-Wallis H statistic against the
//! chi-squared distribution, and, when H₀ is rejected, runs Conover-Iman
//! pairwise comparisons that reuse the omnibus quantities.
//!
//! ## Modules
//!
//! - [`data`]: Validated observation sets and the group registry
//! - [`rank`]: Midrank assignment and tie structure
//! - [`groups`]: Group index sets, counts, mean ranks
//! - [`kruskal`]: Kruskal-Wallis omnibus test
//! - [`conover`]: Conover-Iman post-hoc comparisons
//! - [`distributions`] / [`special`]: Chi-squared and Student-t reference distributions
//! - [`stats`]: Compensated summation
//! - [`config`]: Significance level configuration
//!
//! ## Example
//!
//! ```
//! use u_ranktest::{OrdinalTest, KruskalWallisOutcome};
//!
//! let mut test = OrdinalTest::new();
//! test.add_data(
//!     ["a", "a", "a", "a", "b", "b", "c", "c", "c", "c"],
//!     [1.0, 2.0, 1.0, 2.0, 0.0, 0.0, 3.0, 3.0, 3.0, 4.0],
//! )?;
//!
//! match test.kruskal_wallis(0.05)? {
//!     KruskalWallisOutcome::Rejected(omnibus) => {
//!         for pair in omnibus.conover_iman()? {
//!             println!("{pair}");
//!         }
//!     }
//!     KruskalWallisOutcome::NotRejected(summary) => println!("{summary}"),
//! }
//! # Ok::<(), u_ranktest::Error>(())
//! ```
//!
//! ## Design Philosophy
//!
//! - **Sequencing in the types**: the post-hoc test accepts only a
//!   [`RejectedOmnibus`], which only a rejecting omnibus test produces
//! - **Deterministic output**: groups in first-appearance order, pairs in
//!   lexicographic index order
//! - **Property-based testing**: ranking and partition invariants verified via proptest

pub mod config;
pub mod conover;
pub mod data;
pub mod distributions;
pub mod error;
pub mod groups;
pub mod kruskal;
pub mod rank;
pub mod special;
pub mod stats;

pub use config::TestConfig;
pub use conover::{conover_iman, PairwiseComparison};
pub use data::Observations;
pub use error::{Error, Result};
pub use kruskal::{
    kruskal_wallis, Decision, KruskalWallisOutcome, KruskalWallisSummary, OrdinalTest,
    RejectedOmnibus,
};
