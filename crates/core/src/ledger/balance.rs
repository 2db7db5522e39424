//! Account balance calculation.
//!
//! One signed fold serves every balance consumer: the balance endpoint, the
//! statement projection, and the account balance cache rebuild. Sign
//! convention: `bakiye = borc - alacak`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::Direction;

/// Signed contribution of an entry to the running bakiye.
#[must_use]
pub fn signed_amount(direction: Direction, amount: Decimal) -> Decimal {
    match direction {
        Direction::Borc => amount,
        Direction::Alacak => -amount,
    }
}

/// Totals for an account over a set of journal entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSummary {
    /// Total debit amount.
    pub borc: Decimal,
    /// Total credit amount.
    pub alacak: Decimal,
    /// Net balance, `borc - alacak`.
    pub bakiye: Decimal,
}

impl BalanceSummary {
    /// An empty summary.
    #[must_use]
    pub const fn zero() -> Self {
        Self {
            borc: Decimal::ZERO,
            alacak: Decimal::ZERO,
            bakiye: Decimal::ZERO,
        }
    }

    /// Folds one entry into the summary.
    pub fn add(&mut self, direction: Direction, amount: Decimal) {
        match direction {
            Direction::Borc => self.borc += amount,
            Direction::Alacak => self.alacak += amount,
        }
        self.bakiye = self.borc - self.alacak;
    }

    /// Builds a summary from `(direction, amount)` pairs.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Direction, Decimal)>,
    {
        let mut summary = Self::zero();
        for (direction, amount) in entries {
            summary.add(direction, amount);
        }
        summary
    }
}

impl Default for BalanceSummary {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_signed_amount() {
        assert_eq!(signed_amount(Direction::Borc, dec!(100)), dec!(100));
        assert_eq!(signed_amount(Direction::Alacak, dec!(100)), dec!(-100));
    }

    #[test]
    fn test_empty_summary() {
        let summary = BalanceSummary::zero();
        assert_eq!(summary.borc, Decimal::ZERO);
        assert_eq!(summary.alacak, Decimal::ZERO);
        assert_eq!(summary.bakiye, Decimal::ZERO);
    }

    #[test]
    fn test_fold_convention() {
        let summary = BalanceSummary::from_entries([
            (Direction::Alacak, dec!(1000)),
            (Direction::Borc, dec!(400)),
        ]);

        assert_eq!(summary.borc, dec!(400));
        assert_eq!(summary.alacak, dec!(1000));
        assert_eq!(summary.bakiye, dec!(-600));
    }

    #[test]
    fn test_sale_then_cancel_nets_to_zero() {
        // Sale 1000 alacak, then its compensating cancel 1000 borc.
        let mut summary = BalanceSummary::zero();
        summary.add(Direction::Alacak, dec!(1000));
        assert_eq!(summary.bakiye, dec!(-1000));

        summary.add(Direction::Borc, dec!(1000));
        assert_eq!(summary.bakiye, Decimal::ZERO);
    }
}
