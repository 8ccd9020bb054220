//! Derivation of the per access category EDCA parameter set.
//!
//! The experiment describes every category's contention window with a
//! base value and a backoff *stage*: the window starts at `base - 1` and
//! may double `stage` times, so
//!
//! ```text
//! cw_min = base - 1
//! cw_max = base * 2^stage - 1
//! ```
//!
//! These values are handed to the MAC layer as they are; nothing in this
//! crate enforces them.

use crate::{
    category::{AccessCategory, PerCategory},
    config::CategorySettings,
};
use std::time::Duration;
use thiserror::Error;

/// Channel access parameters of one access category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentionParameters {
    cw_min: u64,
    cw_max: u64,
    aifsn: u8,
    txop_limit: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CwDerivationError {
    #[error("contention window base must be at least 1")]
    ZeroBase,
    #[error("contention window base {base} with stage {stage} overflows")]
    Overflow { base: u64, stage: u32 },
}

impl ContentionParameters {
    /// Derive the contention window bounds from `base` and `stage`.
    ///
    /// ```
    /// # use edca_core::ContentionParameters;
    /// # use std::time::Duration;
    /// let params = ContentionParameters::derive(15, 6, 3, Duration::ZERO).unwrap();
    /// assert_eq!(params.cw_min(), 14);
    /// assert_eq!(params.cw_max(), 959);
    /// ```
    ///
    /// # Errors
    ///
    /// [`CwDerivationError::ZeroBase`] if `base` is `0`, and
    /// [`CwDerivationError::Overflow`] if `base * 2^stage` does not fit
    /// in a `u64`.
    pub fn derive(
        base: u64,
        stage: u32,
        aifsn: u8,
        txop_limit: Duration,
    ) -> Result<Self, CwDerivationError> {
        if base == 0 {
            return Err(CwDerivationError::ZeroBase);
        }

        // cw_max comes from the undecremented base
        let cw_max = 1u64
            .checked_shl(stage)
            .and_then(|factor| base.checked_mul(factor))
            .ok_or(CwDerivationError::Overflow { base, stage })?
            - 1;
        let cw_min = base - 1;

        Ok(Self {
            cw_min,
            cw_max,
            aifsn,
            txop_limit,
        })
    }

    pub fn cw_min(&self) -> u64 {
        self.cw_min
    }

    pub fn cw_max(&self) -> u64 {
        self.cw_max
    }

    pub fn aifsn(&self) -> u8 {
        self.aifsn
    }

    /// Maximum duration of a transmission opportunity. Zero means a
    /// single frame exchange per channel access.
    pub fn txop_limit(&self) -> Duration {
        self.txop_limit
    }
}

/// Failure to derive the window of one access category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid {category} contention window: {source}")]
pub struct EdcaDerivationError {
    pub category: AccessCategory,
    pub source: CwDerivationError,
}

/// The full EDCA parameter set, one entry per access category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdcaParameters(PerCategory<ContentionParameters>);

impl EdcaParameters {
    /// # Errors
    ///
    /// Fails on the first category whose window cannot be derived.
    pub fn derive(
        settings: &PerCategory<CategorySettings>,
    ) -> Result<Self, EdcaDerivationError> {
        settings
            .try_map(|category, s| {
                ContentionParameters::derive(s.cw_base, s.cw_stage, s.aifsn, s.txop_limit)
                    .map_err(|source| EdcaDerivationError { category, source })
            })
            .map(Self)
    }

    pub fn get(&self, category: AccessCategory) -> &ContentionParameters {
        self.0.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AccessCategory, &ContentionParameters)> {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExperimentConfig;

    #[test]
    fn best_effort_defaults() {
        let params = ContentionParameters::derive(15, 6, 3, Duration::ZERO).unwrap();
        assert_eq!(params.cw_min(), 14);
        assert_eq!(params.cw_max(), 959);
        assert_eq!(params.aifsn(), 3);
        assert_eq!(params.txop_limit(), Duration::ZERO);
    }

    #[test]
    fn stage_zero_keeps_window_fixed() {
        let params = ContentionParameters::derive(16, 0, 2, Duration::ZERO).unwrap();
        assert_eq!(params.cw_min(), 15);
        assert_eq!(params.cw_max(), 15);
    }

    #[test]
    fn base_one_is_a_zero_window() {
        let params = ContentionParameters::derive(1, 0, 2, Duration::ZERO).unwrap();
        assert_eq!(params.cw_min(), 0);
        assert_eq!(params.cw_max(), 0);
    }

    #[test]
    fn bounds_hold_over_a_grid() {
        for base in 1..=64u64 {
            for stage in 0..=10u32 {
                let params = ContentionParameters::derive(base, stage, 2, Duration::ZERO).unwrap();
                assert_eq!(params.cw_min(), base - 1);
                assert_eq!(params.cw_max(), base * 2u64.pow(stage) - 1);
                assert!(params.cw_min() <= params.cw_max());
            }
        }
    }

    #[test]
    fn zero_base_rejected() {
        assert_eq!(
            ContentionParameters::derive(0, 3, 2, Duration::ZERO),
            Err(CwDerivationError::ZeroBase)
        );
    }

    #[test]
    fn overflow_rejected() {
        assert!(matches!(
            ContentionParameters::derive(2, 63, 2, Duration::ZERO),
            Err(CwDerivationError::Overflow { base: 2, stage: 63 })
        ));
        assert!(ContentionParameters::derive(1, 64, 2, Duration::ZERO).is_err());
        assert_eq!(
            ContentionParameters::derive(1, 63, 2, Duration::ZERO)
                .unwrap()
                .cw_max(),
            (1u64 << 63) - 1
        );
    }

    #[test]
    fn default_parameter_set() {
        let config = ExperimentConfig::default();
        let edca = EdcaParameters::derive(&config.categories).unwrap();

        let vi = edca.get(AccessCategory::Video);
        assert_eq!((vi.cw_min(), vi.cw_max()), (6, 13));
        assert_eq!(vi.txop_limit(), Duration::from_micros(3008));

        let vo = edca.get(AccessCategory::Voice);
        assert_eq!((vo.cw_min(), vo.cw_max()), (2, 5));
        assert_eq!(vo.txop_limit(), Duration::from_micros(1504));

        let bk = edca.get(AccessCategory::Background);
        assert_eq!((bk.cw_min(), bk.cw_max(), bk.aifsn()), (14, 959, 7));
    }

    #[test]
    fn parameter_set_reports_failing_category() {
        let mut config = ExperimentConfig::default();
        config.categories.voice.cw_base = 0;
        assert_eq!(
            EdcaParameters::derive(&config.categories),
            Err(EdcaDerivationError {
                category: AccessCategory::Voice,
                source: CwDerivationError::ZeroBase,
            })
        );
    }
}
