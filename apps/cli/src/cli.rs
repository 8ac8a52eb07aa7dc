use cbrf_rates::{CbrfRates, RateQuery, Result, DEFAULT_PRECISION};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Value};

#[derive(Debug, Parser)]
#[command(name = "cbrf-rates")]
#[command(about = "Exchange rates published by the Central Bank of Russia")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Fetch feeds directly, without the cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Cache lifetime in seconds
    #[arg(long, global = true, conflicts_with = "no_cache")]
    pub cache_ttl: Option<u64>,

    /// HTTP timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Currency returned by `one default`
    #[arg(long, global = true)]
    pub default_currency: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the rate table
    All(TableArgs),
    /// Print a single currency
    One(OneArgs),
    /// Print historical series for the selected currencies
    Dynamic(DynamicArgs),
    /// Convert an amount between two currencies
    Convert(ConvertArgs),
}

#[derive(Debug, Args)]
pub struct DateArgs {
    /// As-of date (YYYY-MM-DD, DD.MM.YYYY, DD/MM/YYYY or a Unix timestamp)
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Series start date
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Series end date
    #[arg(long, requires = "from")]
    pub to: Option<String>,
}

#[derive(Debug, Args)]
pub struct TableArgs {
    #[command(flatten)]
    pub date: DateArgs,

    /// Comma-separated currency codes to keep
    #[arg(long)]
    pub currencies: Option<String>,

    /// Print bare values instead of full records
    #[arg(long)]
    pub short: bool,

    /// Attach historical series to each currency
    #[arg(long)]
    pub dynamic: bool,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct OneArgs {
    /// Currency code, or `default`
    #[arg(default_value = "default")]
    pub code: String,

    #[command(flatten)]
    pub date: DateArgs,

    #[arg(long)]
    pub short: bool,

    /// Attach the currency's historical series
    #[arg(long)]
    pub dynamic: bool,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct DynamicArgs {
    #[command(flatten)]
    pub date: DateArgs,

    /// Comma-separated currency codes
    #[arg(long)]
    pub currencies: String,

    #[command(flatten)]
    pub range: RangeArgs,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    pub from: String,
    pub to: String,
    #[arg(allow_negative_numbers = true)]
    pub amount: Decimal,

    #[command(flatten)]
    pub date: DateArgs,

    /// Decimal places of the result
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    pub precision: u32,
}

fn dated<'a>(query: RateQuery<'a>, args: &DateArgs) -> Result<RateQuery<'a>> {
    match &args.date {
        Some(date) => query.with_date(date.as_str()),
        None => Ok(query),
    }
}

fn ranged<'a>(query: RateQuery<'a>, args: &RangeArgs) -> Result<RateQuery<'a>> {
    match (&args.from, &args.to) {
        (Some(from), Some(to)) => query.with_dynamic_range(from.as_str(), to.as_str()),
        _ => Ok(query.with_dynamic()),
    }
}

pub async fn run_all(rates: &CbrfRates, args: &TableArgs) -> Result<Value> {
    let mut query = dated(rates.query(), &args.date)?;
    if let Some(codes) = &args.currencies {
        query = query.with_currencies(codes.as_str())?;
    }
    if args.short {
        query = query.with_short_mode();
    }
    if args.dynamic || args.range.from.is_some() {
        query = ranged(query, &args.range)?;
    }

    let table = query.all().await?;
    Ok(json!(table))
}

pub async fn run_one(rates: &CbrfRates, args: &OneArgs) -> Result<Value> {
    let mut query = dated(rates.query(), &args.date)?;
    if args.short {
        query = query.with_short_mode();
    }
    if args.dynamic || args.range.from.is_some() {
        query = ranged(query, &args.range)?;
    }
    let entry = query.one(&args.code).await?;
    Ok(json!(entry))
}

pub async fn run_dynamic(rates: &CbrfRates, args: &DynamicArgs) -> Result<Value> {
    let query = dated(rates.query(), &args.date)?.with_currencies(args.currencies.as_str())?;
    let series = ranged(query, &args.range)?.dynamic().await?;
    Ok(json!(series))
}

pub async fn run_convert(rates: &CbrfRates, args: &ConvertArgs) -> Result<Value> {
    let result = match &args.date.date {
        Some(date) => {
            rates
                .convert(date.as_str(), &args.from, &args.to, args.amount, args.precision)
                .await?
        }
        None => {
            rates
                .convert_latest(&args.from, &args.to, args.amount, args.precision)
                .await?
        }
    };
    Ok(json!({
        "from": args.from.to_uppercase(),
        "to": args.to.to_uppercase(),
        "amount": args.amount.to_string(),
        "result": result.to_string(),
    }))
}
