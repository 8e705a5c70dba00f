use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// One tier of a progressive tax schedule.
///
/// The range is `(min, max]`, with `max = None` for the unbounded top tier.
/// `deduction` is the quick-deduction constant: for income inside the tier,
/// `income × rate − deduction` equals the cumulative progressive tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    pub max: Option<Decimal>,
    pub rate: Decimal,
    pub deduction: Decimal,
}

impl TaxBracket {
    pub const fn new(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
        deduction: Decimal,
    ) -> Self {
        Self {
            min,
            max,
            rate,
            deduction,
        }
    }

    /// Lower bound is exclusive, upper bound inclusive. Zero income matches
    /// no tier, so it is taxed at zero through the absence of a match.
    pub fn contains(
        &self,
        income: Decimal,
    ) -> bool {
        income > self.min && self.max.is_none_or(|max| income <= max)
    }

    pub fn quick_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        income
            .saturating_mul(self.rate)
            .saturating_sub(self.deduction)
    }

    pub fn is_unbounded(&self) -> bool {
        self.max.is_none()
    }
}

/// Reasons a bracket table is rejected at construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at 0, got {0}")]
    FirstMinNotZero(Decimal),

    #[error("bracket {index}: max {max} must be greater than min {min}")]
    InvalidRange {
        index: usize,
        min: Decimal,
        max: Decimal,
    },

    #[error("bracket {index}: min {found} does not continue previous max {expected}")]
    NotContiguous {
        index: usize,
        expected: Decimal,
        found: Decimal,
    },

    #[error("bracket {index} is unbounded but is not the last bracket")]
    UnboundedNotLast { index: usize },

    #[error("last bracket must be unbounded")]
    NoUnboundedBracket,

    #[error("bracket {index}: rate must be between 0 and 1, got {rate}")]
    InvalidRate { index: usize, rate: Decimal },
}

/// A validated progressive schedule.
///
/// Brackets are contiguous, ascending, start at zero and end with exactly one
/// unbounded tier. Quick-deduction constants are used as given; one that
/// disagrees with the cumulative schedule is logged, not rejected. Once built
/// the table cannot be modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxBracket>", into = "Vec<TaxBracket>")]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    /// Validates `brackets` and wraps them.
    ///
    /// # Errors
    ///
    /// Returns the first [`BracketTableError`] found, scanning tiers in order.
    pub fn new(brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        Self::validate(&brackets)?;
        Ok(Self { brackets })
    }

    /// Replaces every quick-deduction constant with the value implied by the
    /// rates and lower bounds, then validates.
    pub fn with_derived_deductions(
        mut brackets: Vec<TaxBracket>
    ) -> Result<Self, BracketTableError> {
        let deductions = Self::quick_deductions(&brackets);
        for (bracket, deduction) in brackets.iter_mut().zip(deductions) {
            bracket.deduction = deduction;
        }
        Self::new(brackets)
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// First bracket containing `income`, if any.
    pub fn find(
        &self,
        income: Decimal,
    ) -> Option<&TaxBracket> {
        self.brackets.iter().find(|b| b.contains(income))
    }

    /// Tax owed via the quick-deduction formula; zero when no bracket matches.
    pub fn tax_for(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.find(income)
            .map(|b| b.quick_tax(income))
            .unwrap_or(Decimal::ZERO)
    }

    /// Tax owed by summing each tier's slice of `income`.
    pub fn cumulative_tax(
        &self,
        income: Decimal,
    ) -> Decimal {
        self.brackets
            .iter()
            .filter(|b| income > b.min)
            .map(|b| {
                let upper = match b.max {
                    Some(max) if max < income => max,
                    _ => income,
                };
                upper.saturating_sub(b.min).saturating_mul(b.rate)
            })
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Quick-deduction constants implied by the rates and lower bounds:
    /// `d[0] = min[0]·rate[0]`, `d[i] = d[i-1] + min[i]·(rate[i] − rate[i-1])`.
    pub fn quick_deductions(brackets: &[TaxBracket]) -> Vec<Decimal> {
        let mut deductions = Vec::with_capacity(brackets.len());
        let mut previous: Option<(Decimal, Decimal)> = None;

        for bracket in brackets {
            let deduction = match previous {
                None => bracket.min.saturating_mul(bracket.rate),
                Some((prev_deduction, prev_rate)) => {
                    let step = bracket.rate.saturating_sub(prev_rate);
                    prev_deduction.saturating_add(bracket.min.saturating_mul(step))
                }
            };
            deductions.push(deduction);
            previous = Some((deduction, bracket.rate));
        }

        deductions
    }

    fn validate(brackets: &[TaxBracket]) -> Result<(), BracketTableError> {
        let Some(first) = brackets.first() else {
            return Err(BracketTableError::Empty);
        };
        if !first.min.is_zero() {
            return Err(BracketTableError::FirstMinNotZero(first.min));
        }

        let expected_deductions = Self::quick_deductions(brackets);
        let last_index = brackets.len() - 1;

        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(BracketTableError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }

            match bracket.max {
                Some(max) if max <= bracket.min => {
                    return Err(BracketTableError::InvalidRange {
                        index,
                        min: bracket.min,
                        max,
                    });
                }
                Some(max) => {
                    if let Some(next) = brackets.get(index + 1) {
                        if next.min != max {
                            return Err(BracketTableError::NotContiguous {
                                index: index + 1,
                                expected: max,
                                found: next.min,
                            });
                        }
                    }
                }
                None if index != last_index => {
                    return Err(BracketTableError::UnboundedNotLast { index });
                }
                None => {}
            }

            let expected = expected_deductions[index];
            if bracket.deduction != expected {
                warn!(
                    index,
                    %expected,
                    found = %bracket.deduction,
                    "quick deduction disagrees with cumulative schedule"
                );
            }
        }

        if !brackets[last_index].is_unbounded() {
            return Err(BracketTableError::NoUnboundedBracket);
        }

        Ok(())
    }
}

impl TryFrom<Vec<TaxBracket>> for BracketTable {
    type Error = BracketTableError;

    fn try_from(brackets: Vec<TaxBracket>) -> Result<Self, Self::Error> {
        Self::new(brackets)
    }
}

impl From<BracketTable> for Vec<TaxBracket> {
    fn from(table: BracketTable) -> Self {
        table.brackets
    }
}
