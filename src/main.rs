use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use landed_cost::pricing::calculators::{auction_fee_bracket, handling_fee_bracket};
use landed_cost::pricing::models::VEHICLE_DEFAULTS;
use landed_cost::pricing::requests::QuoteRequest;
use landed_cost::pricing::responses::{
    FeesResponse, MoneyResponse, PricingErrorResponse, QuoteResponse, ShippingResponse,
    TaxBreakdownResponse,
};
use landed_cost::pricing::{
    auction_fee, calculate_landed_cost, handling_charge, max_discount_voucher,
    resolve_quote_input, shipping_info, vehicle_tax, vehicle_variants, Exporter, PricingError,
    ShippingSelector, TaxCategory,
};
use landed_cost::report::{render_quotation, VehicleDetails};
use landed_cost::{AppError, Config};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "landed-cost", version, about = "Vehicle import landed cost and customs tax calculator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Auction fee, handling charge and discount voucher for a bid
    Fees {
        /// Winning bid (JPY)
        #[arg(long)]
        bid: Decimal,

        /// autocom | icm, or the numeric code 1 | 2
        #[arg(long, default_value = "autocom")]
        exporter: Exporter,
    },

    /// Shipping charge for a model name or category code
    Shipping {
        /// Model name, or a code when all digits
        selector: Option<String>,

        /// Selector as a JSON value, e.g. '14' or '"Prado"'
        #[arg(long, conflicts_with = "selector")]
        json: Option<String>,
    },

    /// Customs tax breakdown for an LKR CIF value
    Tax {
        /// CIF value (LKR)
        #[arg(long)]
        cif: Decimal,

        /// Tax category key; unknown keys use the fallback category
        #[arg(long, default_value = "hybrid_1300_1500")]
        category: String,

        /// Engine capacity (cc) or motor power (kW)
        #[arg(long)]
        capacity: Decimal,
    },

    /// Preset variants for a model, or every model when omitted
    Variants { model: Option<String> },

    /// Full landed cost quotation from a JSON request
    Quote {
        /// Request file (stdin when omitted)
        #[arg(short = 'i', long)]
        input: Option<PathBuf>,

        /// Write an HTML quotation to this file or directory
        #[arg(long)]
        report: Option<PathBuf>,

        /// "Year, Model Grade, Auction Grade, Mileage" printed on the report
        #[arg(long, requires = "report")]
        details: Option<String>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("landed_cost=info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let response = error_response(&err);
            let body = serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| format!("{{\"error_type\":\"internal\",\"message\":\"{}\"}}", err));
            eprintln!("{}", body);
            ExitCode::FAILURE
        }
    }
}

fn error_response(err: &anyhow::Error) -> PricingErrorResponse {
    if let Some(app) = err.downcast_ref::<AppError>() {
        return app.to_response();
    }
    if let Some(pricing) = err.downcast_ref::<PricingError>() {
        return PricingErrorResponse::from(pricing);
    }
    tracing::error!("{:#}", err);
    PricingErrorResponse {
        error_type: "internal".to_string(),
        message: format!("{:#}", err),
        details: None,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Fees { bid, exporter } => {
            let response = FeesResponse {
                winning_bid: MoneyResponse::jpy(bid),
                exporter,
                auction_fee: MoneyResponse::lkr(auction_fee(bid)?),
                auction_fee_bracket: auction_fee_bracket(bid),
                handling_charge: MoneyResponse::jpy(handling_charge(bid, exporter)?),
                handling_fee_bracket: handling_fee_bracket(bid),
                max_discount_voucher: max_discount_voucher(bid).map(MoneyResponse::jpy),
            };
            print_json(&response)
        }
        Command::Shipping { selector, json } => {
            let selector = match (selector, json) {
                (_, Some(raw)) => {
                    let value: serde_json::Value = serde_json::from_str(&raw).map_err(AppError::from)?;
                    ShippingSelector::from_json(&value)?
                }
                (Some(arg), None) => ShippingSelector::parse_arg(&arg),
                (None, None) => return Err(PricingError::InvalidShippingSelector.into()),
            };
            print_json(&ShippingResponse::from(shipping_info(&selector)?))
        }
        Command::Tax { cif, category, capacity } => {
            let tax = vehicle_tax(cif, TaxCategory::resolve(&category), capacity)?;
            print_json(&TaxBreakdownResponse::from(&tax))
        }
        Command::Variants { model } => match model {
            Some(model) => print_json(vehicle_variants(&model)),
            None => print_json(VEHICLE_DEFAULTS),
        },
        Command::Quote { input, report, details } => {
            let config = Config::from_env()?;
            let request = read_request(input.as_deref())?;
            let quote_input = resolve_quote_input(&request, &config)?;
            let cost = calculate_landed_cost(&quote_input, &config)?;

            let report_file = match report {
                Some(target) => {
                    let details = match details {
                        Some(raw) => raw.parse::<VehicleDetails>()?,
                        None => VehicleDetails::default(),
                    };
                    let now = chrono::Local::now().naive_local();
                    let quotation = render_quotation(&cost, &details, &config, now)?;
                    let path = report_path(&target, &quotation.file_name);
                    fs::write(&path, quotation.html)
                        .map_err(AppError::from)
                        .with_context(|| format!("writing quotation to {}", path.display()))?;
                    tracing::info!(path = %path.display(), "quotation written");
                    Some(path.display().to_string())
                }
                None => None,
            };

            let mut response = QuoteResponse::from(cost);
            response.report_file = report_file;
            print_json(&response)
        }
    }
}

fn read_request(input: Option<&Path>) -> Result<QuoteRequest, AppError> {
    let raw = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Directories receive the suggested file name.
fn report_path(target: &Path, file_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(file_name)
    } else {
        target.to_path_buf()
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value).map_err(AppError::from)?;
    writeln!(stdout).map_err(AppError::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_response_unwraps_context() {
        let err = anyhow::Error::from(AppError::Config("bad rate".to_string()))
            .context("loading configuration");
        let response = error_response(&err);
        assert_eq!(response.error_type, "config_error");
        assert_eq!(response.message, "Configuration error: bad rate");

        let err = anyhow::Error::from(AppError::from(PricingError::InvalidShippingCode(15)))
            .context("quote");
        assert_eq!(error_response(&err).error_type, "invalid_shipping_code");
    }

    #[test]
    fn test_error_response_pricing_and_internal() {
        let err = anyhow::Error::from(PricingError::InvalidShippingSelector);
        assert_eq!(error_response(&err).error_type, "invalid_shipping_selector");

        let err = anyhow::anyhow!("disk on fire");
        let response = error_response(&err);
        assert_eq!(response.error_type, "internal");
        assert_eq!(response.message, "disk on fire");
    }

    #[test]
    fn test_tax_command_overflow_reports_error() {
        let cli = Cli::try_parse_from([
            "landed-cost",
            "tax",
            "--cif",
            "79228162514264337593543950335",
            "--category",
            "petrol_under_1000",
            "--capacity",
            "660",
        ])
        .unwrap();
        let err = run(cli).unwrap_err();
        let response = error_response(&err);
        assert_eq!(response.error_type, "amount_overflow");
        assert_eq!(response.message, "Vehicle tax is too large to calculate");
    }

    #[test]
    fn test_report_path() {
        let dir = std::env::temp_dir();
        assert_eq!(
            report_path(&dir, "DNM_Aqua_Quotation_20250307.html"),
            dir.join("DNM_Aqua_Quotation_20250307.html")
        );

        let file = dir.join("landed-cost-report-path-test.html");
        assert_eq!(report_path(&file, "ignored.html"), file);
    }
}
