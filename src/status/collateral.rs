use rust_decimal::Decimal;

use crate::deposit::{CollateralThresholds, Deposit};

/// Ordered from safe to worst, so `a < b` means `b` is more severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollateralizationStatus {
    Normal,
    CourtesyCall,
    Severe,
}

impl CollateralizationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollateralizationStatus::Normal => "normal",
            CollateralizationStatus::CourtesyCall => "courtesy_call",
            CollateralizationStatus::Severe => "severe",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CollateralizationStatus::Normal => "Normal",
            CollateralizationStatus::CourtesyCall => "Undercollateralized",
            CollateralizationStatus::Severe => "Severely Undercollateralized",
        }
    }
}

impl CollateralThresholds {
    /// Thresholds are the upper bounds of the danger zones; sitting exactly on one counts as
    /// inside it.
    pub fn classify(&self, live_percent: Decimal) -> CollateralizationStatus {
        if live_percent <= Decimal::from(self.severely_undercollateralized) {
            CollateralizationStatus::Severe
        } else if live_percent <= Decimal::from(self.undercollateralized) {
            CollateralizationStatus::CourtesyCall
        } else {
            CollateralizationStatus::Normal
        }
    }
}

/// `live_percent` comes from a price source outside this crate, in the same units as the
/// thresholds (150 = 150%).
pub fn resolve_collateralization_status(
    deposit: &Deposit,
    live_percent: Decimal,
) -> CollateralizationStatus {
    deposit.thresholds().classify(live_percent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deposit::fixtures::{self, CREATOR};

    fn thresholds() -> CollateralThresholds {
        CollateralThresholds {
            initial: 150,
            undercollateralized: 125,
            severely_undercollateralized: 110,
        }
    }

    #[test]
    fn exactly_severe_threshold_is_severe() {
        assert_eq!(
            thresholds().classify(Decimal::from(110)),
            CollateralizationStatus::Severe
        );
    }

    #[test]
    fn exactly_courtesy_threshold_is_courtesy_call() {
        assert_eq!(
            thresholds().classify(Decimal::from(125)),
            CollateralizationStatus::CourtesyCall
        );
    }

    #[test]
    fn just_above_thresholds() {
        let thresholds = thresholds();

        assert_eq!(
            thresholds.classify(Decimal::new(11001, 2)),
            CollateralizationStatus::CourtesyCall
        );
        assert_eq!(
            thresholds.classify(Decimal::new(12501, 2)),
            CollateralizationStatus::Normal
        );
    }

    #[test]
    fn only_worsens_as_collateral_drops() {
        let thresholds = thresholds();
        let mut previous = CollateralizationStatus::Normal;

        for tenths in (0..=2000).rev() {
            let status = thresholds.classify(Decimal::new(tenths, 1));
            assert!(status >= previous, "{} moved from {:?} to {:?}", tenths, previous, status);
            previous = status;
        }
        assert_eq!(previous, CollateralizationStatus::Severe);
    }

    #[test]
    fn resolves_from_deposit_thresholds() {
        let deposit = fixtures::deposit("ACTIVE", CREATOR);

        assert_eq!(
            resolve_collateralization_status(&deposit, Decimal::from(140)),
            CollateralizationStatus::Normal
        );
        assert_eq!(
            resolve_collateralization_status(&deposit, Decimal::from(120)),
            CollateralizationStatus::CourtesyCall
        );
        assert_eq!(
            resolve_collateralization_status(&deposit, Decimal::from(90)),
            CollateralizationStatus::Severe
        );
    }
}
