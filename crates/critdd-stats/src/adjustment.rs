//! Multiple testing adjustments.
//!
//! Running many pairwise tests inflates the chance of a false rejection. The
//! adjustments here control the family-wise error rate by scaling each
//! p-value with the number of comparisons. Adjusted values are not clipped
//! to 1; they are meant to be compared against a significance level.
//!
//! # Examples
//!
//! ```
//! use critdd_stats::adjustment::{Adjustment, adjust};
//!
//! let p = [0.01, 0.04, 0.03];
//! let holm = adjust(&p, Adjustment::Holm);
//! let bonferroni = adjust(&p, Adjustment::Bonferroni);
//! assert!((holm[0] - 0.03).abs() < 1e-12);
//! assert!((bonferroni[1] - 0.12).abs() < 1e-12);
//! ```

use core::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::StatsError;

/// Method used to adjust p-values for multiple comparisons.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Adjustment {
    /// Holm's step-down procedure.
    #[default]
    Holm,
    /// Bonferroni's single-step procedure.
    Bonferroni,
}

impl Adjustment {
    /// All supported methods.
    pub const ALL: [Self; 2] = [Self::Holm, Self::Bonferroni];

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Holm => "holm",
            Self::Bonferroni => "bonferroni",
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Adjustment {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| StatsError::UnknownAdjustment {
                name: s.to_owned(),
            })
    }
}

/// Adjusts a flat list of p-values.
///
/// Only finite entries take part: they determine the number of comparisons
/// `m` and are replaced by their adjusted values. Non-finite entries are
/// returned unchanged.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn adjust(p_values: &[f64], adjustment: Adjustment) -> Vec<f64> {
    let mut adjusted = p_values.to_vec();
    let finite = (0..p_values.len())
        .filter(|&i| p_values[i].is_finite())
        .collect::<Vec<_>>();
    let m = finite.len();

    match adjustment {
        Adjustment::Bonferroni => {
            for &i in &finite {
                adjusted[i] = p_values[i] * m as f64;
            }
        }
        Adjustment::Holm => {
            let mut order = finite;
            // stable, so equal p-values keep their original order
            order.sort_by(|&a, &b| p_values[a].total_cmp(&p_values[b]));
            let mut running_max = f64::NEG_INFINITY;
            for (rank, &i) in order.iter().enumerate() {
                let weight = (m - rank) as f64;
                running_max = running_max.max(p_values[i] * weight);
                adjusted[i] = running_max;
            }
        }
    }
    adjusted
}
