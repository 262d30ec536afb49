use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use idr_core::config::poverty::discretionary_income;
use idr_core::config::{PlanCatalog, PlanKey};
use idr_core::projector::payment::{monthly_payment, PaymentInputs};
use idr_core::projector::{project_repayment, ProjectionInput};
use idr_core::time_value::amortized_monthly_payment;
use idr_core::{BorrowerProfile, FilingStatus, LoanProfile, LoanType, Money};

use crate::input;

/// Arguments for the full multi-plan projection
#[derive(Args)]
pub struct ProjectArgs {
    /// Path to a JSON/YAML input file (see ProjectionInput shape)
    #[arg(long)]
    pub input: Option<String>,

    /// Current loan balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate as a decimal (0.065 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Annual gross income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Annual income growth as a decimal (0.03 = 3%/year)
    #[arg(long, default_value = "0.03")]
    pub income_growth: Decimal,

    /// Tax filing status: single, married, head_of_household
    #[arg(long, default_value = "single")]
    pub filing_status: String,

    /// Household size including the borrower
    #[arg(long, default_value = "1")]
    pub family_size: u32,

    /// Two-letter state code for the forgiveness tax estimate
    /// (unlisted codes use a national-average rate)
    #[arg(long, default_value = "US")]
    pub state: String,

    /// Loan type: direct, parent_plus, ffel_consolidation
    #[arg(long, default_value = "direct")]
    pub loan_type: String,

    /// Completed years already in repayment
    #[arg(long, default_value = "0")]
    pub years_in_repayment: u32,

    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,

    /// Qualifying PSLF payments already made, to attach the PSLF overlay
    #[arg(long)]
    pub pslf_payments: Option<u32>,
}

/// Arguments for a single-plan payment quote
#[derive(Args)]
pub struct PaymentArgs {
    /// Plan to quote: ibr, paye, icr, save, rap, standard
    #[arg(long)]
    pub plan: String,

    /// Current loan balance
    #[arg(long)]
    pub balance: Decimal,

    /// Annual interest rate as a decimal
    #[arg(long)]
    pub rate: Decimal,

    /// Annual gross income
    #[arg(long)]
    pub income: Decimal,

    /// Household size including the borrower
    #[arg(long, default_value = "1")]
    pub family_size: u32,

    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Serialize)]
struct PaymentQuote {
    plan: PlanKey,
    open: bool,
    monthly_payment: Money,
    discretionary_income: Money,
    minimum_monthly_payment: Money,
}

pub fn parse_filing_status(s: &str) -> Result<FilingStatus, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "single" => Ok(FilingStatus::Single),
        "married" => Ok(FilingStatus::Married),
        "head_of_household" | "hoh" => Ok(FilingStatus::HeadOfHousehold),
        _ => Err(format!(
            "Unknown filing status '{s}'. Use: single, married, head_of_household"
        )
        .into()),
    }
}

pub fn parse_loan_type(s: &str) -> Result<LoanType, Box<dyn std::error::Error>> {
    match s.to_lowercase().as_str() {
        "direct" => Ok(LoanType::Direct),
        "parent_plus" => Ok(LoanType::ParentPlus),
        "ffel_consolidation" | "ffel" => Ok(LoanType::FfelConsolidation),
        _ => Err(format!(
            "Unknown loan type '{s}'. Use: direct, parent_plus, ffel_consolidation"
        )
        .into()),
    }
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn input_from_flags(args: &ProjectArgs) -> Result<ProjectionInput, Box<dyn std::error::Error>> {
    let balance = args
        .balance
        .ok_or("--balance is required (or provide --input / stdin)")?;
    let rate = args
        .rate
        .ok_or("--rate is required (or provide --input / stdin)")?;
    let income = args
        .income
        .ok_or("--income is required (or provide --input / stdin)")?;

    Ok(ProjectionInput {
        loan: LoanProfile {
            balance,
            interest_rate: rate,
            loan_type: parse_loan_type(&args.loan_type)?,
            years_in_repayment: args.years_in_repayment,
        },
        borrower: BorrowerProfile {
            annual_income: income,
            income_growth_rate: args.income_growth,
            filing_status: parse_filing_status(&args.filing_status)?,
            family_size: args.family_size,
            state: args.state.clone(),
        },
        as_of: args.as_of.unwrap_or_else(today),
        pslf_payments_made: args.pslf_payments,
    })
}

pub fn run_project(args: ProjectArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let proj_input: ProjectionInput = if let Some(ref path) = args.input {
        input::read_file(path)?
    } else if args.balance.is_some() || args.rate.is_some() || args.income.is_some() {
        input_from_flags(&args)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "Provide --balance/--rate/--income, --input <file>, or pipe JSON via stdin".into(),
        );
    };

    let catalog = PlanCatalog::builtin();
    let result = project_repayment(&catalog, &proj_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_payment(args: PaymentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let catalog = PlanCatalog::builtin();
    let key: PlanKey = args.plan.parse()?;
    let plan = catalog
        .plan(key)
        .ok_or_else(|| format!("plan {key} not in catalog"))?;

    let disc = discretionary_income(
        catalog.poverty(),
        args.income,
        args.family_size,
        plan.poverty_line_multiplier,
    );
    let amortized = plan
        .amortization_term_months()
        .map(|months| amortized_monthly_payment(args.balance, args.rate, months))
        .transpose()?;

    let payment = monthly_payment(
        plan,
        &PaymentInputs {
            discretionary_income: disc,
            agi: args.income,
            family_size: args.family_size,
            amortized_payment: amortized,
        },
    )?;

    let quote = PaymentQuote {
        plan: key,
        open: plan.is_open(args.as_of.unwrap_or_else(today)),
        monthly_payment: payment,
        discretionary_income: disc,
        minimum_monthly_payment: plan.minimum_monthly_payment,
    };
    Ok(serde_json::to_value(quote)?)
}
