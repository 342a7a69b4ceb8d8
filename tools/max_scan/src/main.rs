/// Prints the maximum of a list of integers (a fixed literal list by default).

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::debug;
use nimbus_core::scan::{max_value, DEFAULT_LIST};

#[derive(Parser, Debug)]
#[command(name = "max_scan", about = "Find the maximum number in a list")]
struct Args {
    /// Values to scan; negative numbers are accepted.
    #[arg(allow_negative_numbers = true)]
    values: Vec<i64>,
}

fn scan(args: &Args) -> Result<i64> {
    let values: &[i64] = if args.values.is_empty() {
        &DEFAULT_LIST
    } else {
        &args.values
    };
    debug!("Scanning {} values", values.len());
    max_value(values).context("No values to scan")
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let max = scan(&args)?;
    println!("Maximum number in list is: {max}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_scans_default_list() {
        let args = Args::parse_from(["max_scan"]);
        assert_eq!(scan(&args).unwrap(), 34);
    }

    #[test]
    fn negative_arguments_are_values() {
        let args = Args::parse_from(["max_scan", "-5", "-1", "-9"]);
        assert_eq!(scan(&args).unwrap(), -1);
    }
}
