//! The payroll batch driver.
//!
//! Executes one payroll for a (year, month): builds the month period and the
//! standard calculation registry, then computes one payment per employee.
//! Failures are per-employee: an invalid record or a failed computation is
//! logged and skipped, and the batch continues with the next employee.

use tracing::{debug, warn};

use crate::calculation::{CalculationSet, Calculator};
use crate::config::PayrollSettings;
use crate::error::EngineResult;
use crate::models::{
    Employee, ManualAdjustment, Payment, PaymentHistory, Reimbursement, TransactionStore, WorkLog,
};
use crate::tables::RateTables;
use crate::time::{Period, fraction_of_period_worked};

/// One payroll run over a set of employees.
///
/// The run borrows its collaborators: the loaded rate tables (shared,
/// read-only), the three transaction stores, and the payment history source.
/// Each employee is computed with a fresh [`Calculator`]; no state crosses
/// from one payment to the next.
pub struct PayrollRun<'a> {
    settings: &'a PayrollSettings,
    tables: &'a RateTables,
    work_logs: &'a dyn TransactionStore<WorkLog>,
    manual_adjustments: &'a dyn TransactionStore<ManualAdjustment>,
    reimbursements: &'a dyn TransactionStore<Reimbursement>,
    history: &'a dyn PaymentHistory,
}

impl<'a> PayrollRun<'a> {
    /// Creates a run over the given collaborators.
    pub fn new(
        settings: &'a PayrollSettings,
        tables: &'a RateTables,
        work_logs: &'a dyn TransactionStore<WorkLog>,
        manual_adjustments: &'a dyn TransactionStore<ManualAdjustment>,
        reimbursements: &'a dyn TransactionStore<Reimbursement>,
        history: &'a dyn PaymentHistory,
    ) -> Self {
        Self {
            settings,
            tables,
            work_logs,
            manual_adjustments,
            reimbursements,
            history,
        }
    }

    /// Computes the payroll for one month, one payment per eligible employee.
    ///
    /// Employees with no time worked in the period are skipped silently;
    /// employees whose records fail validation or whose computation errors
    /// are skipped with a warning. Only an invalid (year, month) fails the
    /// run as a whole.
    pub fn execute(&self, employees: &[Employee], year: i32, month: u32) -> EngineResult<Vec<Payment>> {
        let period = Period::month(year, month)?;
        let calculations = CalculationSet::standard(
            self.tables,
            self.work_logs,
            self.manual_adjustments,
            self.reimbursements,
            self.settings.part_time_tax_rate,
        );

        let mut payments = Vec::new();
        for employee in employees {
            if let Err(error) = employee.validate() {
                warn!(employee = %employee.key, %error, "skipping employee with invalid record");
                continue;
            }
            if fraction_of_period_worked(&employee.employment_period(), &period).is_zero() {
                debug!(employee = %employee.key, "no time worked in period, skipping");
                continue;
            }

            let historical =
                match self
                    .history
                    .year_to_date(&employee.key, year, period.start())
                {
                    Ok(items) => items,
                    Err(error) => {
                        warn!(employee = %employee.key, %error, "could not aggregate payment history, skipping");
                        continue;
                    }
                };

            let mut payment = Payment::new(employee.clone(), period, self.settings.currency);
            let mut calculator = Calculator::new(&payment, &historical, &calculations);
            match calculator.items() {
                Ok(items) => {
                    payment.items = items;
                    debug!(employee = %employee.key, net_pay = %payment.items.net_pay, "payment computed");
                    payments.push(payment);
                }
                Err(error) => {
                    warn!(employee = %employee.key, %error, "payment computation failed, skipping");
                }
            }
        }
        Ok(payments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Currency, MemoryPaymentHistory, MemoryTransactionStore, Money, PriorTaxInformation,
        SocialSecurityCategory, TaxComputation,
    };
    use crate::tables::{
        CategoryRateEntry, CategoryRateTable, IncomeTaxEntry, IncomeTaxTable, MonetaryBonusTable,
        RateKind,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_tables() -> RateTables {
        RateTables::new(
            IncomeTaxTable::new(vec![
                IncomeTaxEntry {
                    upto: Some(dec("9100")),
                    rate: dec("0"),
                    subtract: dec("0"),
                },
                IncomeTaxEntry {
                    upto: None,
                    rate: dec("0.25"),
                    subtract: dec("2725"),
                },
            ])
            .unwrap(),
            CategoryRateTable::new(vec![CategoryRateEntry {
                category: SocialSecurityCategory::B,
                kind: RateKind::Rate,
                rate: dec("0.10"),
                maximum: dec("51.60"),
            }])
            .unwrap(),
            CategoryRateTable::new(vec![CategoryRateEntry {
                category: SocialSecurityCategory::B,
                kind: RateKind::Rate,
                rate: dec("0.003"),
                maximum: dec("1.55"),
            }])
            .unwrap(),
            MonetaryBonusTable::new(vec![]).unwrap(),
        )
    }

    fn create_test_employee(key: &str, start: NaiveDate) -> Employee {
        Employee {
            key: key.to_string(),
            start_date: start,
            end_date: None,
            hours_per_week: dec("40"),
            tax_computation: TaxComputation::Single,
            social_security_category: SocialSecurityCategory::B,
            gross_annual_salary: dec("24000"),
            prior_tax_information: PriorTaxInformation::default(),
        }
    }

    #[test]
    fn test_execute_pays_every_eligible_employee() {
        let settings = PayrollSettings::default();
        let tables = create_test_tables();
        let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
        let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
        let reimbursements: MemoryTransactionStore<Reimbursement> =
            MemoryTransactionStore::new();
        let history = MemoryPaymentHistory::new(Currency::Eur);
        let run = PayrollRun::new(
            &settings,
            &tables,
            &work_logs,
            &adjustments,
            &reimbursements,
            &history,
        );

        let employees = vec![
            create_test_employee("emp_001", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
            create_test_employee("emp_002", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        ];
        let payments = run.execute(&employees, 2024, 1).unwrap();
        assert_eq!(payments.len(), 2);
        assert_eq!(
            payments[0].items.basic_pay_full_time,
            Money::new(dec("2000.00"), Currency::Eur)
        );
    }

    #[test]
    fn test_execute_skips_employees_outside_the_period() {
        let settings = PayrollSettings::default();
        let tables = create_test_tables();
        let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
        let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
        let reimbursements: MemoryTransactionStore<Reimbursement> =
            MemoryTransactionStore::new();
        let history = MemoryPaymentHistory::new(Currency::Eur);
        let run = PayrollRun::new(
            &settings,
            &tables,
            &work_logs,
            &adjustments,
            &reimbursements,
            &history,
        );

        let employees = vec![create_test_employee(
            "emp_future",
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        )];
        let payments = run.execute(&employees, 2024, 1).unwrap();
        assert!(payments.is_empty());
    }

    #[test]
    fn test_execute_skips_invalid_records_and_continues() {
        let settings = PayrollSettings::default();
        let tables = create_test_tables();
        let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
        let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
        let reimbursements: MemoryTransactionStore<Reimbursement> =
            MemoryTransactionStore::new();
        let history = MemoryPaymentHistory::new(Currency::Eur);
        let run = PayrollRun::new(
            &settings,
            &tables,
            &work_logs,
            &adjustments,
            &reimbursements,
            &history,
        );

        let mut broken = create_test_employee("emp_broken", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        broken.gross_annual_salary = dec("-1");
        let employees = vec![
            broken,
            create_test_employee("emp_001", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        ];

        let payments = run.execute(&employees, 2024, 1).unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].employee.key, "emp_001");
    }

    #[test]
    fn test_execute_skips_failing_computation_and_continues() {
        let settings = PayrollSettings::default();
        let tables = create_test_tables();
        let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
        let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
        let reimbursements: MemoryTransactionStore<Reimbursement> =
            MemoryTransactionStore::new();
        let history = MemoryPaymentHistory::new(Currency::Eur);
        let run = PayrollRun::new(
            &settings,
            &tables,
            &work_logs,
            &adjustments,
            &reimbursements,
            &history,
        );

        // Category F has no row in the contribution tables, which fails that
        // employee's computation but not the batch.
        let mut unmatched = create_test_employee("emp_unmatched", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        unmatched.social_security_category = SocialSecurityCategory::F;
        let employees = vec![
            unmatched,
            create_test_employee("emp_001", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
        ];

        let payments = run.execute(&employees, 2024, 1).unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].employee.key, "emp_001");
    }

    #[test]
    fn test_execute_rejects_invalid_month() {
        let settings = PayrollSettings::default();
        let tables = create_test_tables();
        let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
        let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
        let reimbursements: MemoryTransactionStore<Reimbursement> =
            MemoryTransactionStore::new();
        let history = MemoryPaymentHistory::new(Currency::Eur);
        let run = PayrollRun::new(
            &settings,
            &tables,
            &work_logs,
            &adjustments,
            &reimbursements,
            &history,
        );

        assert!(run.execute(&[], 2024, 13).is_err());
    }

    #[test]
    fn test_year_to_date_totals_feed_the_next_month() {
        let settings = PayrollSettings::default();
        let tables = create_test_tables();
        let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
        let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
        let reimbursements: MemoryTransactionStore<Reimbursement> =
            MemoryTransactionStore::new();
        let mut history = MemoryPaymentHistory::new(Currency::Eur);

        let employees = vec![create_test_employee(
            "emp_001",
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        )];

        let january = {
            let run = PayrollRun::new(
                &settings,
                &tables,
                &work_logs,
                &adjustments,
                &reimbursements,
                &history,
            );
            run.execute(&employees, 2024, 1).unwrap().remove(0)
        };
        history.record_payment(&january);

        let run = PayrollRun::new(
            &settings,
            &tables,
            &work_logs,
            &adjustments,
            &reimbursements,
            &history,
        );
        let february = run.execute(&employees, 2024, 2).unwrap().remove(0);

        // With one month already withheld, February smooths the remaining
        // liability over eleven remaining periods instead of twelve.
        let annual_liability = dec("3275");
        let january_tax = january.items.income_tax_full_time.amount();
        let expected_february = ((annual_liability - january_tax) / dec("11")).round_dp(0);
        assert_eq!(
            february.items.income_tax_full_time.amount(),
            expected_february
        );
    }
}
