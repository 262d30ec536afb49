use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use idr_core::config::{PlanCatalog, PlanKey};
use idr_core::pslf::{project_pslf, PslfInput};
use idr_core::{BorrowerProfile, LoanProfile, LoanType};

use crate::commands::project::{parse_filing_status, today};
use crate::input;

/// Arguments for the PSLF overlay projection
#[derive(Args)]
pub struct PslfArgs {
    /// Path to a JSON/YAML input file (see PslfInput shape)
    #[arg(long)]
    pub input: Option<String>,

    /// Qualifying payments already certified
    #[arg(long)]
    pub payments_made: Option<u32>,

    /// Current loan balance
    #[arg(long)]
    pub balance: Option<Decimal>,

    /// Annual interest rate as a decimal
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Annual gross income
    #[arg(long)]
    pub income: Option<Decimal>,

    /// Annual income growth as a decimal
    #[arg(long, default_value = "0.03")]
    pub income_growth: Decimal,

    /// Tax filing status: single, married, head_of_household
    #[arg(long, default_value = "single")]
    pub filing_status: String,

    /// Household size including the borrower
    #[arg(long, default_value = "1")]
    pub family_size: u32,

    /// Two-letter state code
    #[arg(long, default_value = "US")]
    pub state: String,

    /// IDR plan paying the remaining months (defaults to the cheapest open plan)
    #[arg(long)]
    pub plan: Option<String>,

    /// Evaluation date (YYYY-MM-DD); defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

fn input_from_flags(args: &PslfArgs) -> Result<PslfInput, Box<dyn std::error::Error>> {
    let payments_made = args
        .payments_made
        .ok_or("--payments-made is required (or provide --input / stdin)")?;
    let balance = args
        .balance
        .ok_or("--balance is required (or provide --input / stdin)")?;
    let rate = args
        .rate
        .ok_or("--rate is required (or provide --input / stdin)")?;
    let income = args
        .income
        .ok_or("--income is required (or provide --input / stdin)")?;

    let plan = match &args.plan {
        Some(s) => Some(s.parse::<PlanKey>()?),
        None => None,
    };

    Ok(PslfInput {
        loan: LoanProfile {
            balance,
            interest_rate: rate,
            loan_type: LoanType::Direct,
            years_in_repayment: 0,
        },
        borrower: BorrowerProfile {
            annual_income: income,
            income_growth_rate: args.income_growth,
            filing_status: parse_filing_status(&args.filing_status)?,
            family_size: args.family_size,
            state: args.state.clone(),
        },
        payments_made,
        as_of: args.as_of.unwrap_or_else(today),
        plan,
    })
}

pub fn run_pslf(args: PslfArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let pslf_input: PslfInput = if let Some(ref path) = args.input {
        input::read_file(path)?
    } else if args.payments_made.is_some() {
        input_from_flags(&args)?
    } else if let Some(data) = input::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("Provide --payments-made with loan flags, --input <file>, or pipe JSON".into());
    };

    let catalog = PlanCatalog::builtin();
    let result = project_pslf(&catalog, &pslf_input)?;
    Ok(serde_json::to_value(result)?)
}
