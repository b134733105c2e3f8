use serde::Deserialize;
use serde::Serialize;

use crate::constants::DEGENERATE_DOMAIN;
use crate::constants::RADIUS_MAX_PX;
use crate::constants::RADIUS_MIN_PX;

/// Square-root scale mapping the balance domain onto rendered radii,
/// clamped at both ends. Degenerate inputs (empty node set, non-positive
/// minimum) fall back to a safe domain so no build can divide by zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqrtScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl SqrtScale {
    pub fn new(
        domain: (f64, f64),
        range: (f64, f64),
    ) -> Self {
        Self { domain, range }
    }

    /// Derive the domain from observed balances.
    pub fn from_balances<I>(balances: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for b in balances {
            if b.is_finite() {
                min = min.min(b);
                max = max.max(b);
            }
        }

        let (fallback_min, fallback_max) = DEGENERATE_DOMAIN;
        if !min.is_finite() || !max.is_finite() {
            return Self::new(DEGENERATE_DOMAIN, (RADIUS_MIN_PX, RADIUS_MAX_PX));
        }
        if min <= 0.0 {
            min = fallback_min;
        }
        if max <= 0.0 {
            max = fallback_max;
        }

        Self::new((min, max), (RADIUS_MIN_PX, RADIUS_MAX_PX))
    }

    pub fn scale(
        &self,
        value: f64,
    ) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;

        let s0 = d0.max(0.0).sqrt();
        let s1 = d1.max(0.0).sqrt();
        if (s1 - s0).abs() < f64::EPSILON {
            // Collapsed domain: every node renders mid-range.
            return (r0 + r1) / 2.0;
        }

        let t = ((value.max(0.0).sqrt() - s0) / (s1 - s0)).clamp(0.0, 1.0);
        r0 + t * (r1 - r0)
    }
}

impl Default for SqrtScale {
    fn default() -> Self {
        Self::new(DEGENERATE_DOMAIN, (RADIUS_MIN_PX, RADIUS_MAX_PX))
    }
}
