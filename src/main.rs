//! Wealth Projection CLI
//!
//! Command-line interface for single projection calculations

use anyhow::Result;
use clap::{Parser, Subcommand};
use serde::Serialize;
use wealth_projection::{
    compound_interest, compound_interest_rate, monthly_purchasing_power, rep,
    simulate_compound_interest, value_today, RateSolution,
};

#[derive(Parser)]
#[command(name = "wealth_projection", version, about = "Personal-finance projections")]
struct Cli {
    /// Print the result as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Final balance of a start balance plus periodic contributions
    Compound {
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 0.0)]
        contribution: f64,
        #[arg(long, default_value_t = 12)]
        periods_per_year: u32,
        #[arg(long)]
        years: u32,
        /// Include the per-period balance schedule
        #[arg(long)]
        schedule: bool,
    },
    /// Implied annual rate from start and final balances
    Rate {
        #[arg(long, default_value_t = 0.0)]
        start: f64,
        #[arg(long)]
        final_balance: f64,
        #[arg(long, default_value_t = 0.0)]
        contribution: f64,
        #[arg(long, default_value_t = 12)]
        periods_per_year: u32,
        #[arg(long)]
        years: u32,
    },
    /// First monthly withdrawal that keeps purchasing power and exhausts the balance
    PurchasingPower {
        #[arg(long)]
        start: f64,
        #[arg(long)]
        years: u32,
        #[arg(long)]
        rate: f64,
        #[arg(long, default_value_t = 0.03)]
        inflation: f64,
    },
    /// Time to repay a loan with a fixed installment
    Repay {
        #[arg(long)]
        loan: f64,
        #[arg(long)]
        rate: f64,
        #[arg(long)]
        installment: f64,
        #[arg(long, default_value_t = 12)]
        installments_per_year: u32,
    },
    /// Today's value of a future amount
    Today {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        years: u32,
        #[arg(long, default_value_t = 0.03)]
        inflation: f64,
    },
}

#[derive(Serialize)]
struct CompoundOutput {
    final_balance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    balances: Option<Vec<f64>>,
}

#[derive(Serialize)]
struct RepaymentOutput {
    installments: u64,
    months: f64,
    years: u32,
    remaining_months: f64,
    final_balance: f64,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Compound {
            start,
            rate,
            contribution,
            periods_per_year,
            years,
            schedule,
        } => {
            let output = if schedule {
                let sim =
                    simulate_compound_interest(start, rate, contribution, periods_per_year, years);
                CompoundOutput {
                    final_balance: sim.final_balance,
                    balances: Some(sim.balances),
                }
            } else {
                CompoundOutput {
                    final_balance: compound_interest(
                        start,
                        rate,
                        contribution,
                        periods_per_year,
                        years,
                    ),
                    balances: None,
                }
            };

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("Final balance: {:.2}", output.final_balance);
                for (period, balance) in output.balances.iter().flatten().enumerate() {
                    println!("{:>5} {:>14.2}", period, balance);
                }
            }
        }
        Command::Rate {
            start,
            final_balance,
            contribution,
            periods_per_year,
            years,
        } => {
            let solution: RateSolution =
                compound_interest_rate(start, final_balance, contribution, periods_per_year, years)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&solution)?);
            } else {
                println!("Implied annual rate: {:.6}", solution.rate);
                println!("Residual error: {:.6}", solution.residual_error);
                if solution.used_fallback {
                    println!("(no exact polynomial root matched; bracketed search used)");
                }
            }
        }
        Command::PurchasingPower {
            start,
            years,
            rate,
            inflation,
        } => {
            let mpp = monthly_purchasing_power(start, years, rate, inflation)?;
            if cli.json {
                println!("{}", serde_json::json!({ "monthly_purchasing_power": mpp }));
            } else {
                println!("Monthly purchasing power: {:.2}", mpp);
            }
        }
        Command::Repay {
            loan,
            rate,
            installment,
            installments_per_year,
        } => {
            let schedule = rep(loan, rate, installment, installments_per_year)?;
            let (years, remaining_months) = schedule.years_and_months();
            let output = RepaymentOutput {
                installments: schedule.installments,
                months: schedule.months,
                years,
                remaining_months,
                final_balance: schedule.final_balance(),
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!(
                    "Repaid after {} installments: {} years {:.1} months (final owed {:.2})",
                    output.installments, output.years, output.remaining_months, output.final_balance
                );
            }
        }
        Command::Today {
            amount,
            years,
            inflation,
        } => {
            let pv = value_today(amount, years, inflation);
            if cli.json {
                println!("{}", serde_json::json!({ "value_today": pv }));
            } else {
                println!("Value today: {:.2}", pv);
            }
        }
    }

    Ok(())
}
