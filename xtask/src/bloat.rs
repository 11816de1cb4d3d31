// Licensed under the Apache-2.0 license

use anyhow::{Context, Result};
use std::process::Command;

/// Binary analysed by the size reports.
pub const DEMO_BIN: &str = "audio-io-demo";
pub const DEFAULT_TARGET: &str = "thumbv7em-none-eabihf";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BloatFormat {
    Table,
    Json,
    Csv,
}

impl BloatFormat {
    pub fn parse(name: &str) -> Result<Self> {
        match name {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => anyhow::bail!("unknown bloat format '{other}' (table, json, csv)"),
        }
    }
}

fn bloat_command(release: bool, target: &str) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg("bloat");
    if release {
        cmd.arg("--release");
    }
    cmd.args(["--target", target, "--bin", DEMO_BIN, "--features", "demo"]);
    cmd
}

/// Run cargo bloat on the demo firmware and print the result.
pub fn analyze_bloat(release: bool, target: &str, format: BloatFormat) -> Result<()> {
    println!("Running binary size analysis for {DEMO_BIN}...");

    let mut cmd = bloat_command(release, target);
    match format {
        BloatFormat::Table => {}
        BloatFormat::Json => {
            cmd.arg("--message-format=json");
        }
        BloatFormat::Csv => {
            cmd.arg("--format=csv");
        }
    }

    let output = cmd.output().context(
        "Failed to run cargo bloat - make sure it's installed with 'cargo install cargo-bloat'",
    )?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("cargo bloat failed: {}", stderr);
    }

    println!("{}", String::from_utf8_lossy(&output.stdout));
    Ok(())
}

/// Write per-function and per-crate size reports into `output_dir`.
pub fn generate_report(release: bool, target: &str, output_dir: &str) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {output_dir}"))?;

    let reports: [(&str, &[&str]); 2] = [("functions", &["-n", "50"]), ("crates", &["--crates"])];

    for (name, flags) in reports {
        let output_file = format!("{output_dir}/bloat_{name}.txt");

        let output = bloat_command(release, target)
            .args(flags)
            .output()
            .with_context(|| format!("Failed to generate {name} report"))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("cargo bloat ({name}) failed: {}", stderr);
        }

        std::fs::write(&output_file, &output.stdout)
            .with_context(|| format!("Failed to write report to {output_file}"))?;
        println!("Generated {output_file}");
    }

    Ok(())
}
