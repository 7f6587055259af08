//! Credit estimation: computed base vs. declared base.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::{Finding, ICMS_SHARE_SIMPLES, ReconcileError, ReconciliationResult};

/// Compare a computed subtotal against the externally declared tax base.
///
/// `effective_rate` is the effective Simples Nacional rate in percent.
/// When the computed base does not exceed the declared figure the result
/// is [`Finding::NoCredit`] — a valid outcome, not an error. Negative
/// inputs are rejected up front so they cannot masquerade as findings.
pub fn reconcile(
    chosen_base: Decimal,
    declared_value: Decimal,
    effective_rate: Decimal,
) -> Result<Finding, ReconcileError> {
    if declared_value < Decimal::ZERO {
        return Err(ReconcileError::NegativeDeclared(declared_value));
    }
    if effective_rate < Decimal::ZERO {
        return Err(ReconcileError::NegativeRate(effective_rate));
    }

    let difference = chosen_base - declared_value;
    if difference <= Decimal::ZERO {
        return Ok(Finding::NoCredit {
            chosen_base,
            declared_value,
            difference,
        });
    }

    let credit_estimate = difference * (effective_rate / dec!(100)) * ICMS_SHARE_SIMPLES;
    Ok(Finding::Credit(ReconciliationResult {
        chosen_base,
        declared_value,
        difference,
        effective_rate,
        credit_estimate,
    }))
}

/// Time-value projection of a recovered credit over one period.
///
/// Kept separate from [`reconcile`]: the growth rate (e.g. Selic) is an
/// independent caller input. `credit * (1 + growth_rate/100)`.
pub fn project(credit_estimate: Decimal, growth_rate: Decimal) -> Result<Decimal, ReconcileError> {
    if growth_rate < Decimal::ZERO {
        return Err(ReconcileError::NegativeRate(growth_rate));
    }
    Ok(credit_estimate * (Decimal::ONE + growth_rate / dec!(100)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credit_formula_is_exact() {
        let finding = reconcile(dec!(10000), dec!(7000), dec!(8.5)).unwrap();
        match finding {
            Finding::Credit(r) => {
                assert_eq!(r.difference, dec!(3000));
                // 3000 * 0.085 * 0.335
                assert_eq!(r.credit_estimate, dec!(85.425));
            }
            Finding::NoCredit { .. } => panic!("expected a credit"),
        }
    }

    #[test]
    fn equal_bases_yield_no_credit() {
        let finding = reconcile(dec!(5000), dec!(5000), dec!(8.5)).unwrap();
        assert!(matches!(
            finding,
            Finding::NoCredit {
                difference: d,
                ..
            } if d == dec!(0)
        ));
    }

    #[test]
    fn declared_above_base_is_a_finding_not_an_error() {
        let finding = reconcile(dec!(4000), dec!(5000), dec!(8.5)).unwrap();
        assert!(matches!(finding, Finding::NoCredit { .. }));
    }

    #[test]
    fn negative_inputs_rejected() {
        assert!(matches!(
            reconcile(dec!(1), dec!(-1), dec!(8.5)),
            Err(ReconcileError::NegativeDeclared(_))
        ));
        assert!(matches!(
            reconcile(dec!(1), dec!(0), dec!(-0.1)),
            Err(ReconcileError::NegativeRate(_))
        ));
        assert!(matches!(
            project(dec!(100), dec!(-11.25)),
            Err(ReconcileError::NegativeRate(_))
        ));
    }

    #[test]
    fn projection_one_period() {
        assert_eq!(project(dec!(85.425), dec!(10)).unwrap(), dec!(93.9675));
        assert_eq!(project(dec!(100), dec!(0)).unwrap(), dec!(100));
    }
}
