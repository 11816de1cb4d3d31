// Licensed under the Apache-2.0 license

mod bloat;

use anyhow::{Context, Result};
use bloat::BloatFormat;

const USAGE: &str = "\
usage: cargo xtask <command> [options]

commands:
  bloat          size breakdown of the demo firmware
  bloat-report   write size reports to a directory

options:
  --release          analyse the release profile
  --target <triple>  target triple (default thumbv7em-none-eabihf)
  --format <fmt>     bloat output: table, json or csv
  --out <dir>        report directory (default target/bloat)";

struct Options {
    release: bool,
    target: String,
    format: BloatFormat,
    out: String,
}

fn parse_options(args: &[String]) -> Result<Options> {
    let mut options = Options {
        release: false,
        target: bloat::DEFAULT_TARGET.to_string(),
        format: BloatFormat::Table,
        out: "target/bloat".to_string(),
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--release" => options.release = true,
            "--target" => {
                options.target = iter.next().context("--target needs a value")?.clone();
            }
            "--format" => {
                let name = iter.next().context("--format needs a value")?;
                options.format = BloatFormat::parse(name)?;
            }
            "--out" => {
                options.out = iter.next().context("--out needs a value")?.clone();
            }
            other => anyhow::bail!("unknown option '{other}'\n\n{USAGE}"),
        }
    }
    Ok(options)
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };
    let options = parse_options(rest)?;

    match command.as_str() {
        "bloat" => bloat::analyze_bloat(options.release, &options.target, options.format),
        "bloat-report" => bloat::generate_report(options.release, &options.target, &options.out),
        other => anyhow::bail!("unknown command '{other}'\n\n{USAGE}"),
    }
}
