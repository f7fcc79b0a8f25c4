//! Per-session skip and reveal allowances.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::{BudgetKind, QuizError};

/// A fixed-ceiling allowance that only counts down within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    kind: BudgetKind,
    ceiling: u32,
    remaining: u32,
}

impl Budget {
    /// Creates a full budget.
    #[instrument]
    pub fn new(kind: BudgetKind, ceiling: u32) -> Self {
        Self {
            kind,
            ceiling,
            remaining: ceiling,
        }
    }

    /// Uses one unit of the budget and returns how many are left.
    ///
    /// # Errors
    ///
    /// Returns [`QuizError::BudgetExhausted`] without changing anything if the
    /// budget is already empty.
    #[instrument(skip(self), fields(kind = %self.kind, remaining = self.remaining))]
    pub fn try_consume(&mut self) -> Result<u32, QuizError> {
        if self.remaining == 0 {
            warn!("Budget exhausted");
            return Err(QuizError::BudgetExhausted(self.kind));
        }
        self.remaining -= 1;
        debug!(remaining = self.remaining, "Budget consumed");
        Ok(self.remaining)
    }

    /// Refills the budget to its ceiling.
    pub(crate) fn refill(&mut self) {
        self.remaining = self.ceiling;
    }

    /// Which action this budget pays for.
    pub fn kind(&self) -> BudgetKind {
        self.kind
    }

    /// Uses granted per session.
    pub fn ceiling(&self) -> u32 {
        self.ceiling
    }

    /// Uses left in this session.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Uses already spent in this session.
    pub fn used(&self) -> u32 {
        self.ceiling - self.remaining
    }

    /// Returns true once every use has been spent.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }
}

/// The skip and reveal budgets of one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBudget {
    skip: Budget,
    reveal: Budget,
}

impl SessionBudget {
    /// Creates full budgets with the given ceilings.
    #[instrument]
    pub fn new(max_skips: u32, max_reveals: u32) -> Self {
        Self {
            skip: Budget::new(BudgetKind::Skip, max_skips),
            reveal: Budget::new(BudgetKind::Reveal, max_reveals),
        }
    }

    /// Returns the budget for the given action.
    pub fn get(&self, kind: BudgetKind) -> &Budget {
        match kind {
            BudgetKind::Skip => &self.skip,
            BudgetKind::Reveal => &self.reveal,
        }
    }

    /// Returns the budget for the given action, mutably.
    pub(crate) fn get_mut(&mut self, kind: BudgetKind) -> &mut Budget {
        match kind {
            BudgetKind::Skip => &mut self.skip,
            BudgetKind::Reveal => &mut self.reveal,
        }
    }

    /// Skip budget.
    pub fn skip(&self) -> &Budget {
        &self.skip
    }

    /// Reveal budget.
    pub fn reveal(&self) -> &Budget {
        &self.reveal
    }

    /// Refills both budgets. Only a new session does this.
    pub(crate) fn refill(&mut self) {
        self.skip.refill();
        self.reveal.refill();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_consume_until_exhausted() {
        let mut budget = Budget::new(BudgetKind::Skip, 2);
        assert_eq!(budget.try_consume(), Ok(1));
        assert_eq!(budget.try_consume(), Ok(0));
        assert_eq!(
            budget.try_consume(),
            Err(QuizError::BudgetExhausted(BudgetKind::Skip))
        );
        assert_eq!(budget.remaining(), 0);
        assert_eq!(budget.used(), 2);
    }

    #[test]
    fn test_zero_ceiling_is_born_exhausted() {
        let mut budget = Budget::new(BudgetKind::Reveal, 0);
        assert!(budget.is_exhausted());
        assert!(budget.try_consume().is_err());
    }

    #[test]
    fn test_refill_restores_both_budgets() {
        let mut budgets = SessionBudget::new(2, 1);
        budgets.get_mut(BudgetKind::Skip).try_consume().unwrap();
        budgets.get_mut(BudgetKind::Reveal).try_consume().unwrap();
        budgets.refill();
        assert_eq!(budgets.skip().remaining(), 2);
        assert_eq!(budgets.reveal().remaining(), 1);
    }
}
