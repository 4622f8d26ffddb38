//! Price command implementation.
//!
//! Calculates bond price from yield or yield from price, to the worst of
//! maturity and the call schedule.

use anyhow::Result;
use clap::Args;

use parcurve_bonds::{Bond, BondCalc, CalcInput};

use crate::cli::OutputFormat;
use crate::commands::{validate_price, validate_yield, BondArgs};
use crate::config::{BondEntry, Config};
use crate::error::CliError;
use crate::output::{print_section, KeyValue};

/// Arguments for the price command.
#[derive(Args, Debug)]
pub struct PriceArgs {
    #[command(flatten)]
    pub bond: BondArgs,

    /// Bond from the market file, by name
    #[arg(short, long, conflicts_with_all = ["coupon", "maturity"])]
    pub name: Option<String>,

    /// Yield (as percentage). If provided, calculates price.
    #[arg(short, long = "yield", group = "calc_mode")]
    pub yield_value: Option<f64>,

    /// Clean price. If provided, calculates yield.
    #[arg(short, long, group = "calc_mode")]
    pub price: Option<f64>,
}

fn resolve_entry(args: &PriceArgs, config: &Config) -> Result<BondEntry> {
    if let Some(name) = &args.name {
        return config
            .bond(name)
            .cloned()
            .ok_or_else(|| CliError::Config(format!("no bond named '{name}' in the market file")).into());
    }
    Ok(args.bond.to_entry()?)
}

/// Price/yield rows for a bond at `input`.
pub fn price_rows(bond: &Bond, input: CalcInput) -> Result<(BondCalc, Vec<KeyValue>)> {
    let calc = bond.calc(input)?;
    let ytm = bond.to_ytm(calc.price)?;

    let mut rows = vec![
        KeyValue::percent("Coupon", bond.coupon()),
        KeyValue::new("Maturity", bond.maturity().to_string()),
        KeyValue::new("Settlement", bond.settlement().to_string()),
        KeyValue::new("Frequency", format!("{:?}", bond.frequency())),
    ];
    if let Some(first) = bond.call_list().first() {
        rows.push(KeyValue::new("First Call", format!("{} @ {:.3}", first.date, first.price)));
    }
    rows.extend([
        KeyValue::price("Clean Price", calc.price),
        KeyValue::price("Accrued Interest", bond.accrued_interest()),
        KeyValue::price("Dirty Price", calc.price + bond.accrued_interest()),
        KeyValue::percent("Yield to Worst", calc.bond_yield),
        KeyValue::new("Worst Date", calc.to_date.to_string()),
        KeyValue::price("Worst Price", calc.to_price),
        KeyValue::percent("Yield to Maturity", ytm),
    ]);
    Ok((calc, rows))
}

/// Execute the price command.
pub fn execute(args: PriceArgs, config: Config, format: OutputFormat, quiet: bool) -> Result<()> {
    let entry = resolve_entry(&args, &config)?;
    let bond = entry.build(None)?;

    let input = if let Some(yield_pct) = args.yield_value.or(entry.bond_yield) {
        CalcInput::Yield(validate_yield(yield_pct)? / 100.0)
    } else if let Some(price) = args.price.or(entry.price) {
        CalcInput::Price(validate_price(price)?)
    } else {
        // Default: price at a yield equal to the coupon
        CalcInput::Yield(bond.coupon())
    };

    let (calc, rows) = price_rows(&bond, input)?;
    match format {
        OutputFormat::Minimal => match input {
            CalcInput::Yield(_) => println!("{:.6}", calc.price),
            CalcInput::Price(_) => println!("{:.6}", calc.bond_yield * 100.0),
        },
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&calc)?),
        _ => print_section(&entry.label(), &rows, format, quiet)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use parcurve_bonds::CallFeature;
    use parcurve_core::Date;

    fn settle() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_par_at_coupon() {
        let bond = Bond::new(0.045, Date::from_ymd(2035, 1, 15).unwrap(), settle()).unwrap();
        let (calc, rows) = price_rows(&bond, CalcInput::Yield(0.045)).unwrap();
        assert_eq!(calc.price, 100.0);
        assert!(rows.iter().any(|r| r.key == "Yield to Worst"));
    }

    #[test]
    fn test_premium_callable_prices_to_call() {
        let call = Date::from_ymd(2030, 1, 15).unwrap();
        let bond = Bond::builder()
            .coupon(0.05)
            .maturity(Date::from_ymd(2040, 1, 15).unwrap())
            .settlement(settle())
            .call(CallFeature::new(call, 100.0))
            .build()
            .unwrap();
        let (calc, rows) = price_rows(&bond, CalcInput::Yield(0.03)).unwrap();
        assert_eq!(calc.to_date, call);
        assert!(rows.iter().any(|r| r.key == "First Call"));
    }

    #[test]
    fn test_named_bond_lookup() {
        let config: Config = toml::from_str(
            r#"
[[bonds]]
name = "NYC"
coupon = 5.0
maturity = "2040-01-15"
"#,
        )
        .unwrap();
        let args = PriceArgs {
            bond: BondArgs::default(),
            name: Some("nyc".into()),
            yield_value: None,
            price: None,
        };
        assert_eq!(resolve_entry(&args, &config).unwrap().coupon, 5.0);

        let missing = PriceArgs {
            name: Some("LA".into()),
            ..args
        };
        assert!(resolve_entry(&missing, &config).is_err());
    }
}
