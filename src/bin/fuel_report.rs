use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fuel_reports::config::{MissingPricePolicy, PriceAnchor};
use fuel_reports::models::{DateRange, Granularity, ReportFilter, ReportWarning};
use fuel_reports::queries::SalesReportParams;
use fuel_reports::{FuelReports, ReportConfig};

#[derive(Parser, Debug)]
#[command(name = "fuel-report")]
#[command(author, version, about = "Fuel station management reports", long_about = None)]
struct Cli {
    /// Directory holding the station exports
    #[arg(short, long, env = "FUEL_REPORTS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Currency symbol printed next to amounts
    #[arg(long, default_value = "грн")]
    currency: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    format: Format,

    /// Log level (overridden by RUST_LOG)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Args, Debug)]
struct RangeArgs {
    /// First day of the report (YYYY-MM-DD)
    #[arg(long)]
    from: NaiveDate,

    /// Last day of the report, inclusive (YYYY-MM-DD)
    #[arg(long)]
    to: NaiveDate,

    #[arg(long)]
    fuel: Option<i64>,

    #[arg(long)]
    staff: Option<i64>,

    #[arg(long)]
    pump: Option<i64>,
}

impl RangeArgs {
    fn range(&self) -> Result<DateRange> {
        Ok(DateRange::new(self.from, self.to)?)
    }

    fn filter(&self) -> ReportFilter {
        ReportFilter {
            fuel_type_id: self.fuel,
            staff_id: self.staff,
            pump_id: self.pump,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sales per period with revenue and lost profit
    Sales {
        #[command(flatten)]
        range: RangeArgs,

        /// daily, weekly or monthly; anything else falls back to daily
        #[arg(short, long)]
        group: Option<String>,

        /// Price each period at its first calendar day instead of its first sale
        #[arg(long)]
        period_start_prices: bool,

        /// Keep unpriced volume at a zero price instead of dropping it
        #[arg(long)]
        zero_price_gaps: bool,
    },
    /// Effect of price changes inside the range
    PriceImpact {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Throughput per pump
    Pumps {
        #[command(flatten)]
        range: RangeArgs,
    },
    /// Tank fill levels
    Tanks {
        #[arg(long)]
        fuel: Option<i64>,
    },
    /// Overdue credit with aging buckets
    Credit {
        /// Aging date (defaults to today)
        #[arg(long)]
        as_of: Option<NaiveDate>,

        #[arg(long)]
        customer: Option<i64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = ReportConfig {
        currency_symbol: cli.currency.clone(),
        ..ReportConfig::default()
    };
    if let Command::Sales {
        period_start_prices,
        zero_price_gaps,
        ..
    } = &cli.command
    {
        if *period_start_prices {
            config.price_anchor = PriceAnchor::PeriodStart;
        }
        if *zero_price_gaps {
            config.missing_price = MissingPricePolicy::ZeroPrice;
        }
    }

    let mut builder = FuelReports::builder().config(config);
    if let Some(dir) = &cli.data_dir {
        builder = builder.data_dir(dir);
    }
    let reports = builder.build().context("failed to open station data")?;
    let cur = reports.config().currency_symbol.clone();

    match &cli.command {
        Command::Sales { range, group, .. } => {
            let params = SalesReportParams::new(range.range()?)
                .granularity(Granularity::from_request(group.as_deref()))
                .filter(range.filter());
            let report = reports.sales().report(&params);
            emit(cli.format, &report, || {
                for bucket in &report.buckets {
                    println!("{}", bucket.period);
                    for fuel in &bucket.fuels {
                        println!(
                            "  {:<16} {:>12} l  {:>10} -> {:>10}  {:>14}  lost {:>12}",
                            fuel.fuel_name,
                            fuel.total_volume,
                            money(fuel.previous_price, &cur),
                            money(fuel.current_price, &cur),
                            money(fuel.total_revenue, &cur),
                            money(fuel.lost_profit, &cur),
                        );
                    }
                }
                println!(
                    "TOTAL {} l, revenue {}, lost profit {}",
                    report.totals.total_volume,
                    money(report.totals.total_revenue, &cur),
                    money(report.totals.lost_profit, &cur)
                );
                print_warnings(&report.warnings);
            })
        }
        Command::PriceImpact { range } => {
            let report = reports.prices().impact(range.range()?, &range.filter());
            emit(cli.format, &report, || {
                for change in &report.changes {
                    println!(
                        "{:<16} {}  {:>10} -> {:>10} ({:>6}%)  {:>12} l  lost {:>12}",
                        change.fuel_name,
                        change.effective_at,
                        money(change.previous_price, &cur),
                        money(change.new_price, &cur),
                        change.delta_percent,
                        change.volume,
                        money(change.lost_profit, &cur),
                    );
                }
                println!(
                    "TOTAL revenue {}, lost profit {}",
                    money(report.total_revenue, &cur),
                    money(report.total_lost_profit, &cur)
                );
                print_warnings(&report.warnings);
            })
        }
        Command::Pumps { range } => {
            let report = reports.pumps().report(range.range()?, &range.filter());
            emit(cli.format, &report, || {
                for pump in &report.pumps {
                    println!(
                        "{:<12} {:>6} tx  {:>12} l  avg {:>8} l  {:>6}%  {:>14}",
                        pump.pump_name,
                        pump.transactions,
                        pump.total_volume,
                        pump.average_volume,
                        pump.volume_share,
                        money(pump.total_revenue, &cur),
                    );
                }
                print_warnings(&report.warnings);
            })
        }
        Command::Tanks { fuel } => {
            let report = reports.tanks().levels(*fuel);
            emit(cli.format, &report, || {
                for tank in &report.tanks {
                    println!(
                        "tank {:<4} {:<16} {:>10} / {:>10} l  {:>6}%  {:?}",
                        tank.tank_id,
                        tank.fuel_name,
                        tank.current_volume,
                        tank.capacity,
                        tank.fill_percent,
                        tank.status,
                    );
                }
                print_warnings(&report.warnings);
            })
        }
        Command::Credit { as_of, customer } => {
            let report = reports.credit().overdue(*as_of, *customer);
            emit(cli.format, &report, || {
                for customer in &report.customers {
                    println!(
                        "{:<24} {:>3} invoices  oldest {:>4} days  {:>14}",
                        customer.customer_name,
                        customer.invoices,
                        customer.oldest_days_overdue,
                        money(customer.total_outstanding, &cur),
                    );
                }
                for (bucket, amount) in &report.by_bucket {
                    println!("  {:<6} {:>14}", bucket.label(), money(*amount, &cur));
                }
                println!("TOTAL {}", money(report.total_outstanding, &cur));
                print_warnings(&report.warnings);
            })
        }
    }
}

fn emit<T: Serialize>(format: Format, report: &T, table: impl FnOnce()) -> Result<()> {
    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(report)?),
        Format::Table => table(),
    }
    Ok(())
}

fn money(amount: Decimal, symbol: &str) -> String {
    format!("{:.2} {}", amount, symbol)
}

fn print_warnings(warnings: &[ReportWarning]) {
    for warning in warnings {
        eprintln!("warning: {:?}", warning);
    }
}
