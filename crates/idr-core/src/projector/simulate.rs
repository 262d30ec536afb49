use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::config::plans::{PaymentBasis, PlanCatalog, PlanDefinition, PlanKey};
use crate::config::poverty::discretionary_income;
use crate::error::ProjectorError;
use crate::projector::forgiveness_tax::tax_on_forgiveness;
use crate::projector::payment::{monthly_payment, PaymentInputs};
use crate::time_value::amortized_monthly_payment;
use crate::types::{BorrowerProfile, LoanProfile, Money};
use crate::ProjectorResult;

/// Balances at or below this are treated as fully repaid, so cent-level
/// rounding can never keep the stepper alive past payoff.
const BALANCE_EPSILON: Decimal = dec!(0.01);

/// One simulated year of a plan's schedule, for tables and charts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanYear {
    /// 1-based year of the simulation (not of the loan's full history).
    pub year_index: u32,
    pub calendar_year: i32,
    pub beginning_balance: Money,
    pub monthly_payment: Money,
    pub interest_accrued: Money,
    pub amount_paid: Money,
    pub ending_balance: Money,
}

/// Outcome of simulating one plan to payoff or forgiveness.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    pub plan: PlanKey,
    /// Whether the plan is open to this borrower on the evaluation date.
    /// Unavailable plans are still simulated for display.
    pub available: bool,
    pub monthly_payment_year1: Money,
    pub monthly_payment_final: Money,
    pub total_paid: Money,
    pub forgiveness_amount: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forgiveness_year: Option<i32>,
    pub tax_on_forgiveness: Money,
    /// total_paid + tax_on_forgiveness.
    pub net_cost: Money,
    pub months_simulated: u32,
    pub year_by_year: Vec<PlanYear>,
}

/// Raw schedule out of the month stepper, before forgiveness/tax framing.
#[derive(Debug, Clone)]
pub(crate) struct Schedule {
    pub first_monthly_payment: Money,
    pub final_monthly_payment: Money,
    pub total_paid: Money,
    pub ending_balance: Money,
    pub months_simulated: u32,
    /// Income in force during the last simulated year.
    pub final_annual_income: Money,
    pub year_by_year: Vec<PlanYear>,
}

fn calendar_year_at(as_of: NaiveDate, months_ahead: u32) -> ProjectorResult<i32> {
    as_of
        .checked_add_months(Months::new(months_ahead))
        .map(|d| d.year())
        .ok_or_else(|| ProjectorError::DateError(format!("date overflow at +{months_ahead} months")))
}

/// Month-by-month balance roll-forward under one plan's payment formula.
///
/// Starts at `start_month` (months of the term already served; prior payments
/// are assumed to have been made on schedule and are not re-simulated) and
/// steps to `term_months`: accrue a month of interest, apply the payment to
/// interest then principal, and once per 12 months grow income and reprice
/// the payment.
pub(crate) fn roll_forward(
    catalog: &PlanCatalog,
    loan: &LoanProfile,
    borrower: &BorrowerProfile,
    plan: &PlanDefinition,
    as_of: NaiveDate,
    term_months: u32,
    start_month: u32,
) -> ProjectorResult<Schedule> {
    let start_month = start_month.min(term_months);
    let family_size = borrower.family_size.max(1);
    let monthly_rate = loan.interest_rate / dec!(12);
    let growth = Decimal::ONE + borrower.income_growth_rate;

    let mut balance = loan.balance;
    let mut income = borrower.annual_income;

    if start_month == term_months || balance <= BALANCE_EPSILON {
        let settled = if balance <= BALANCE_EPSILON {
            Decimal::ZERO
        } else {
            balance
        };
        return Ok(Schedule {
            first_monthly_payment: Decimal::ZERO,
            final_monthly_payment: Decimal::ZERO,
            total_paid: Decimal::ZERO,
            ending_balance: settled,
            months_simulated: 0,
            final_annual_income: income,
            year_by_year: Vec::new(),
        });
    }

    // Fixed amortised payment, priced once on the entry balance: the plan's
    // own remaining amortisation, or the cap on its percent formula.
    let amortized = match &plan.payment_basis {
        PaymentBasis::StandardAmortization { .. } => Some(amortized_monthly_payment(
            balance,
            loan.interest_rate,
            term_months - start_month,
        )?),
        _ => match plan.amortization_term_months() {
            Some(months) => Some(amortized_monthly_payment(balance, loan.interest_rate, months)?),
            None => None,
        },
    };

    let price = |income: Money| -> ProjectorResult<Money> {
        let disc = discretionary_income(
            catalog.poverty(),
            income,
            family_size,
            plan.poverty_line_multiplier,
        );
        monthly_payment(
            plan,
            &PaymentInputs {
                discretionary_income: disc,
                agi: income,
                family_size,
                amortized_payment: amortized,
            },
        )
    };

    let mut payment = price(income)?;
    let first_monthly_payment = payment;
    let mut total_paid = Decimal::ZERO;
    let mut months_simulated = 0u32;

    let mut year_by_year: Vec<PlanYear> = Vec::new();
    let mut year_begin_balance = balance;
    let mut year_interest = Decimal::ZERO;
    let mut year_paid = Decimal::ZERO;

    for month in start_month..term_months {
        let elapsed = month - start_month;

        // Annual income step-up, then reprice the payment
        if elapsed > 0 && elapsed % 12 == 0 {
            income *= growth;
            payment = price(income)?;
        }

        let interest = balance * monthly_rate;
        let due = balance + interest;
        let actual = payment.min(due);
        balance = due - actual;

        total_paid += actual;
        year_interest += interest;
        year_paid += actual;
        months_simulated += 1;

        if balance <= BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        let year_complete = (elapsed + 1) % 12 == 0;
        let terminal = balance.is_zero() || month + 1 == term_months;
        if year_complete || terminal {
            let year_index = elapsed / 12 + 1;
            year_by_year.push(PlanYear {
                year_index,
                calendar_year: calendar_year_at(as_of, (year_index - 1) * 12)?,
                beginning_balance: year_begin_balance,
                monthly_payment: payment,
                interest_accrued: year_interest,
                amount_paid: year_paid,
                ending_balance: balance,
            });
            year_begin_balance = balance;
            year_interest = Decimal::ZERO;
            year_paid = Decimal::ZERO;
        }

        if balance.is_zero() {
            break;
        }
    }

    Ok(Schedule {
        first_monthly_payment,
        final_monthly_payment: payment,
        total_paid,
        ending_balance: balance,
        months_simulated,
        final_annual_income: income,
        year_by_year,
    })
}

/// Simulate one plan to payoff or forgiveness and frame the result:
/// availability, forgiveness event, tax estimate, and net cost.
pub fn simulate(
    catalog: &PlanCatalog,
    loan: &LoanProfile,
    borrower: &BorrowerProfile,
    plan: &PlanDefinition,
    as_of: NaiveDate,
) -> ProjectorResult<SimulationResult> {
    let term_months = plan.term_months();
    let start_month = (loan.years_in_repayment.saturating_mul(12)).min(term_months);

    let schedule = roll_forward(catalog, loan, borrower, plan, as_of, term_months, start_month)?;
    let available = plan.is_available(as_of, loan.loan_type);

    let (forgiveness_amount, forgiveness_year) =
        if plan.forgiveness_term_years.is_some() && schedule.ending_balance > Decimal::ZERO {
            let year = calendar_year_at(as_of, term_months - start_month)?;
            (schedule.ending_balance, Some(year))
        } else {
            (Decimal::ZERO, None)
        };

    let tax = match forgiveness_year {
        Some(year) => tax_on_forgiveness(
            catalog.tax_tables(),
            forgiveness_amount,
            schedule.final_annual_income,
            borrower.filing_status,
            &borrower.state,
            year,
        ),
        None => Decimal::ZERO,
    };

    Ok(SimulationResult {
        plan: plan.key,
        available,
        monthly_payment_year1: schedule.first_monthly_payment,
        monthly_payment_final: schedule.final_monthly_payment,
        total_paid: schedule.total_paid,
        forgiveness_amount,
        forgiveness_year,
        tax_on_forgiveness: tax,
        net_cost: schedule.total_paid + tax,
        months_simulated: schedule.months_simulated,
        year_by_year: schedule.year_by_year,
    })
}
