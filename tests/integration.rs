//! Comprehensive integration tests for the payroll engine.
//!
//! This test suite covers whole-payment scenarios end to end:
//! - Full-time single-taxed employee over a full calendar month
//! - Progressive withholding against the bracket schedule
//! - Statutory bonus months, including six-month pro-ration
//! - Part-time-taxed employees paid through work logs
//! - Contribution caps
//! - Reimbursements staying outside the taxable gross
//! - Projection failures, shared-dependency memoization, and history chaining

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::cell::Cell;
use std::str::FromStr;

use payroll_engine::calculation::{CalculationSet, Calculator};
use payroll_engine::config::PayrollSettings;
use payroll_engine::error::EngineError;
use payroll_engine::models::{
    Currency, Employee, Items, LineItemName, ManualAdjustment, MemoryPaymentHistory,
    MemoryTransactionStore, Money, Payment, PriorTaxInformation, Reimbursement,
    SocialSecurityCategory, TaxComputation, TransactionStore, WorkLog,
};
use payroll_engine::run::PayrollRun;
use payroll_engine::tables::{
    CategoryRateEntry, CategoryRateTable, IncomeTaxEntry, IncomeTaxTable, MonetaryBonusEntry,
    MonetaryBonusTable, RateKind, RateTables,
};
use payroll_engine::time::Period;

// =============================================================================
// Test Helpers
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn eur(s: &str) -> Money {
    Money::new(dec(s), Currency::Eur)
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// The 2024 single-computation rates used across the scenarios.
fn single_rates() -> IncomeTaxTable {
    IncomeTaxTable::new(vec![
        IncomeTaxEntry {
            upto: Some(dec("9100")),
            rate: dec("0"),
            subtract: dec("0"),
        },
        IncomeTaxEntry {
            upto: Some(dec("14500")),
            rate: dec("0.15"),
            subtract: dec("1365"),
        },
        IncomeTaxEntry {
            upto: Some(dec("19500")),
            rate: dec("0.25"),
            subtract: dec("2815"),
        },
        IncomeTaxEntry {
            upto: Some(dec("60000")),
            rate: dec("0.25"),
            subtract: dec("2725"),
        },
        IncomeTaxEntry {
            upto: None,
            rate: dec("0.35"),
            subtract: dec("8725"),
        },
    ])
    .unwrap()
}

fn create_tables() -> RateTables {
    let social_security = CategoryRateTable::new(vec![
        CategoryRateEntry {
            category: SocialSecurityCategory::A,
            kind: RateKind::Fixed,
            rate: dec("6.62"),
            maximum: dec("6.62"),
        },
        CategoryRateEntry {
            category: SocialSecurityCategory::B,
            kind: RateKind::Rate,
            rate: dec("0.10"),
            maximum: dec("51.60"),
        },
    ])
    .unwrap();
    let maternity_fund = CategoryRateTable::new(vec![
        CategoryRateEntry {
            category: SocialSecurityCategory::A,
            kind: RateKind::Fixed,
            rate: dec("0.20"),
            maximum: dec("0.20"),
        },
        CategoryRateEntry {
            category: SocialSecurityCategory::B,
            kind: RateKind::Rate,
            rate: dec("0.003"),
            maximum: dec("1.55"),
        },
    ])
    .unwrap();
    let statutory_bonus = MonetaryBonusTable::new(vec![
        MonetaryBonusEntry {
            month: 3,
            bonus: dec("121.16"),
        },
        MonetaryBonusEntry {
            month: 6,
            bonus: dec("135.10"),
        },
        MonetaryBonusEntry {
            month: 9,
            bonus: dec("121.16"),
        },
        MonetaryBonusEntry {
            month: 12,
            bonus: dec("135.10"),
        },
    ])
    .unwrap();
    RateTables::new(single_rates(), social_security, maternity_fund, statutory_bonus)
}

fn create_employee(key: &str, annual_salary: &str) -> Employee {
    Employee {
        key: key.to_string(),
        start_date: date(2020, 1, 1),
        end_date: None,
        hours_per_week: dec("40"),
        tax_computation: TaxComputation::Single,
        social_security_category: SocialSecurityCategory::B,
        gross_annual_salary: dec(annual_salary),
        prior_tax_information: PriorTaxInformation::default(),
    }
}

/// Bundles the collaborators a calculator needs, all empty by default.
struct Fixture {
    tables: RateTables,
    work_logs: MemoryTransactionStore<WorkLog>,
    adjustments: MemoryTransactionStore<ManualAdjustment>,
    reimbursements: MemoryTransactionStore<Reimbursement>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            tables: create_tables(),
            work_logs: MemoryTransactionStore::new(),
            adjustments: MemoryTransactionStore::new(),
            reimbursements: MemoryTransactionStore::new(),
        }
    }

    fn calculations(&self) -> CalculationSet<'_> {
        CalculationSet::standard(
            &self.tables,
            &self.work_logs,
            &self.adjustments,
            &self.reimbursements,
            dec("0.15"),
        )
    }

    fn compute(&self, employee: Employee, year: i32, month: u32) -> Items {
        let calculations = self.calculations();
        let payment = Payment::new(employee, Period::month(year, month).unwrap(), Currency::Eur);
        let historical = Items::zero(Currency::Eur);
        let mut calculator = Calculator::new(&payment, &historical, &calculations);
        calculator.items().unwrap()
    }
}

// =============================================================================
// Full-time scenarios
// =============================================================================

#[test]
fn test_full_time_single_full_month() {
    let fixture = Fixture::new();
    let items = fixture.compute(create_employee("emp_001", "24000"), 2024, 1);

    assert_eq!(items.basic_pay_full_time, eur("2000.00"));
    assert_eq!(items.total_taxable_gross_emoluments, eur("2000.00"));
    assert_eq!(
        items.net_pay,
        items.total_taxable_gross_emoluments + items.reimbursements - items.total_deductions
    );

    // January 2024 has five Mondays; weekly wage 461.54 at 10%.
    assert_eq!(items.social_security_contribution_employee, eur("230.77"));
    assert_eq!(items.social_security_contribution_employer, eur("230.77"));
    assert_eq!(items.maternity_fund_contribution_employer, eur("6.92"));

    // Projected annual income 24000 + 512.52 bonus runs through the 25%
    // bracket: 3403 liability, smoothed over twelve periods.
    assert_eq!(items.income_tax_full_time, eur("284"));
    assert_eq!(items.total_deductions, eur("514.77"));
    assert_eq!(items.net_pay, eur("1485.23"));
    assert_eq!(items.tax_due, eur("752.46"));
}

#[test]
fn test_statutory_bonus_month_pays_the_scheduled_bonus() {
    let fixture = Fixture::new();
    let items = fixture.compute(create_employee("emp_001", "24000"), 2024, 6);

    assert_eq!(items.statutory_bonus, eur("135.10"));
    assert_eq!(items.total_taxable_gross_emoluments, eur("2135.10"));
}

#[test]
fn test_recently_started_employee_gets_pro_rated_bonus() {
    let fixture = Fixture::new();
    let mut employee = create_employee("emp_001", "24000");
    // Half of the 184-day window before June's month-end.
    employee.start_date = date(2024, 3, 31);
    let items = fixture.compute(employee, 2024, 6);

    assert_eq!(items.statutory_bonus, eur("67.55"));
}

#[test]
fn test_mid_month_starter_is_pro_rated_and_first_payment() {
    let fixture = Fixture::new();
    let mut employee = create_employee("emp_001", "24000");
    employee.start_date = date(2024, 1, 16);
    employee.prior_tax_information = PriorTaxInformation {
        gross_annual_emoluments: dec("5000"),
        income_tax: dec("300"),
    };
    let items = fixture.compute(employee, 2024, 1);

    // 16 of 31 days.
    assert_eq!(items.basic_pay_full_time, eur("1040.00"));
    // Prior-employer figures enter on the first payment.
    assert_eq!(items.prior_gross_emoluments, eur("5000"));
    assert_eq!(items.prior_income_tax_deduction, eur("300"));
    // Mondays on the 22nd and 29th remain after a start on Tuesday the 16th.
    assert_eq!(items.social_security_contribution_employee, eur("92.31"));
}

#[test]
fn test_reimbursements_are_paid_out_but_not_taxed() {
    let mut fixture = Fixture::new();
    fixture.reimbursements.push(Reimbursement {
        employee: "emp_001".to_string(),
        dated: date(2024, 1, 10),
        value: eur("75.50"),
        description: "conference travel".to_string(),
    });
    let items = fixture.compute(create_employee("emp_001", "24000"), 2024, 1);

    assert_eq!(items.reimbursements, eur("75.50"));
    assert_eq!(items.total_taxable_gross_emoluments, eur("2000.00"));
    assert_eq!(
        items.net_pay,
        items.total_taxable_gross_emoluments + eur("75.50") - items.total_deductions
    );
}

#[test]
fn test_manual_adjustments_are_taxed_with_the_salary() {
    let mut fixture = Fixture::new();
    fixture.adjustments.push(ManualAdjustment {
        employee: "emp_001".to_string(),
        dated: date(2024, 1, 10),
        value: eur("500.00"),
        description: "performance bonus".to_string(),
    });
    let items = fixture.compute(create_employee("emp_001", "24000"), 2024, 1);

    assert_eq!(items.manual_adjustments, eur("500.00"));
    assert_eq!(items.total_taxable_gross_emoluments, eur("2500.00"));
}

#[test]
fn test_contribution_cap_applies_to_high_earners() {
    let fixture = Fixture::new();
    // 31200 a year is a 600.00 weekly wage; 10% of it exceeds the 51.60 cap.
    let items = fixture.compute(create_employee("emp_001", "31200"), 2024, 1);

    assert_eq!(items.social_security_contribution_employee, eur("258.00"));
}

#[test]
fn test_fixed_category_rate_ignores_the_wage() {
    let fixture = Fixture::new();
    let mut employee = create_employee("emp_001", "24000");
    employee.social_security_category = SocialSecurityCategory::A;
    let items = fixture.compute(employee, 2024, 1);

    // 6.62 per Monday, five Mondays.
    assert_eq!(items.social_security_contribution_employee, eur("33.10"));
    assert_eq!(items.maternity_fund_contribution_employer, eur("1.00"));
}

// =============================================================================
// Part-time scenarios
// =============================================================================

#[test]
fn test_part_time_taxed_employee_full_payment() {
    let mut fixture = Fixture::new();
    for day in [8, 9, 10] {
        fixture.work_logs.push(WorkLog {
            employee: "emp_001".to_string(),
            dated: date(2024, 1, day),
            hours: dec("8"),
            hourly_wage: eur("10.00"),
        });
    }
    let mut employee = create_employee("emp_001", "0");
    employee.tax_computation = TaxComputation::PartTime;
    employee.hours_per_week = dec("20");
    let items = fixture.compute(employee, 2024, 1);

    assert_eq!(items.basic_pay_full_time, eur("0"));
    assert_eq!(items.basic_pay_part_time, eur("240.00"));
    assert_eq!(items.total_taxable_gross_emoluments, eur("240.00"));
    // Flat 15% on the taxable gross, rounded to whole units.
    assert_eq!(items.income_tax_part_time, eur("36"));
    assert_eq!(items.income_tax_full_time, eur("0"));
    // No employee-side social security for part-time-taxed employees; the
    // employer-side and maternity contributions still accrue on the (zero)
    // weekly wage here.
    assert_eq!(items.social_security_contribution_employee, eur("0"));
    assert_eq!(items.total_deductions, eur("36.00"));
    assert_eq!(items.net_pay, eur("204.00"));
}

// =============================================================================
// Resolution discipline
// =============================================================================

#[test]
fn test_projection_of_non_projectable_item_is_an_error_not_zero() {
    let fixture = Fixture::new();
    let calculations = fixture.calculations();
    let payment = Payment::new(
        create_employee("emp_001", "24000"),
        Period::month(2024, 1).unwrap(),
        Currency::Eur,
    );
    let historical = Items::zero(Currency::Eur);
    let mut calculator = Calculator::new(&payment, &historical, &calculations);

    for name in [
        LineItemName::NetPay,
        LineItemName::TaxDue,
        LineItemName::Reimbursements,
        LineItemName::BasicPayPartTime,
    ] {
        match calculator.projection_of(name) {
            Err(EngineError::ProjectionUnavailable { name: reported }) => {
                assert_eq!(reported, name);
            }
            other => panic!("Expected ProjectionUnavailable for {name}, got {:?}", other),
        }
    }
}

/// A transaction store that counts how often it is streamed.
struct CountingStore {
    inner: MemoryTransactionStore<ManualAdjustment>,
    calls: Cell<u32>,
}

impl TransactionStore<ManualAdjustment> for CountingStore {
    fn stream(
        &self,
        employee: &str,
        year: i32,
        filter: &dyn Fn(&ManualAdjustment) -> bool,
    ) -> Vec<ManualAdjustment> {
        self.calls.set(self.calls.get() + 1);
        self.inner.stream(employee, year, filter)
    }
}

#[test]
fn test_shared_dependency_is_computed_exactly_once() {
    let tables = create_tables();
    let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
    let reimbursements: MemoryTransactionStore<Reimbursement> = MemoryTransactionStore::new();
    let mut inner = MemoryTransactionStore::new();
    inner.push(ManualAdjustment {
        employee: "emp_001".to_string(),
        dated: date(2024, 1, 10),
        value: eur("100.00"),
        description: "adjustment".to_string(),
    });
    let counting = CountingStore {
        inner,
        calls: Cell::new(0),
    };

    let calculations =
        CalculationSet::standard(&tables, &work_logs, &counting, &reimbursements, dec("0.15"));
    let payment = Payment::new(
        create_employee("emp_001", "24000"),
        Period::month(2024, 1).unwrap(),
        Currency::Eur,
    );
    let historical = Items::zero(Currency::Eur);
    let mut calculator = Calculator::new(&payment, &historical, &calculations);

    // The taxable gross, the income tax projection, and the materialization
    // below all depend on manual adjustments; its calculation must still run
    // exactly once.
    let items = calculator.items().unwrap();
    assert_eq!(items.manual_adjustments, eur("100.00"));
    assert_eq!(counting.calls.get(), 1);
}

// =============================================================================
// Batch runs and history chaining
// =============================================================================

#[test]
fn test_full_year_of_payroll_runs() {
    let settings = PayrollSettings::default();
    let tables = create_tables();
    let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
    let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
    let reimbursements: MemoryTransactionStore<Reimbursement> = MemoryTransactionStore::new();
    let mut history = MemoryPaymentHistory::new(Currency::Eur);

    let employees = vec![create_employee("emp_001", "24000")];

    let mut year_to_date_tax = Decimal::ZERO;
    let mut year_to_date_bonus = Decimal::ZERO;
    for month in 1..=12 {
        let run = PayrollRun::new(
            &settings,
            &tables,
            &work_logs,
            &adjustments,
            &reimbursements,
            &history,
        );
        let mut payments = run.execute(&employees, 2024, month).unwrap();
        assert_eq!(payments.len(), 1);
        let payment = payments.remove(0);

        year_to_date_tax += payment.items.income_tax_full_time.amount();
        year_to_date_bonus += payment.items.statutory_bonus.amount();
        history.record_payment(&payment);
    }

    // The year withholds the full projected liability and pays the full
    // bonus schedule: 24000 salary + 512.52 bonus through the 25% bracket.
    assert_eq!(year_to_date_bonus, dec("512.52"));
    assert_eq!(year_to_date_tax, dec("3403"));
}

#[test]
fn test_employee_leaving_mid_year_stops_accruing() {
    let settings = PayrollSettings::default();
    let tables = create_tables();
    let work_logs: MemoryTransactionStore<WorkLog> = MemoryTransactionStore::new();
    let adjustments: MemoryTransactionStore<ManualAdjustment> = MemoryTransactionStore::new();
    let reimbursements: MemoryTransactionStore<Reimbursement> = MemoryTransactionStore::new();
    let history = MemoryPaymentHistory::new(Currency::Eur);
    let run = PayrollRun::new(
        &settings,
        &tables,
        &work_logs,
        &adjustments,
        &reimbursements,
        &history,
    );

    let mut employee = create_employee("emp_001", "24000");
    employee.end_date = Some(date(2024, 2, 15));

    let february = run.execute(&[employee.clone()], 2024, 2).unwrap();
    assert_eq!(february.len(), 1);
    // 15 of 29 days in a leap February.
    assert_eq!(february[0].time_worked, dec("0.52"));

    let march = run.execute(&[employee], 2024, 3).unwrap();
    assert!(march.is_empty());
}
