//! Subcommand implementations.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use hc_compare::{CompareOptions, compare_sets};
use hc_core::io::{derived_path, set_stem};
use hc_core::{Entry, Histogram, HistogramSet, OpsError, load_set, ops, save_set};
use tracing::{info, warn};

use crate::{
    Command, CompareArgs, NormalizeArgs, NormalizeMode, RatioArgs, RemoveBandArgs, SyncCvArgs,
    TransplantArgs,
};

/// Run one subcommand and return the process exit code.
pub fn run(command: Command) -> Result<u8> {
    match command {
        Command::Compare(args) => compare(args),
        Command::Normalize(args) => normalize(args).map(|_| 0),
        Command::Ratio(args) => ratio(args).map(|_| 0),
        Command::SyncCv(args) => sync_cv(args).map(|_| 0),
        Command::RemoveBand(args) => remove_band(args).map(|_| 0),
        Command::Transplant(args) => transplant(args).map(|_| 0),
    }
}

fn load(path: &Path) -> Result<HistogramSet> {
    load_set(path).with_context(|| format!("failed to read histograms from {}", path.display()))
}

fn save(set: &HistogramSet, path: &Path) -> Result<()> {
    save_set(set, path).with_context(|| format!("failed to write {}", path.display()))
}

fn histogram<'a>(set: &'a HistogramSet, name: &str) -> Result<&'a Histogram> {
    let hist = set.require(name)?.histogram().ok_or_else(|| OpsError::NotAHistogram {
        name: name.to_string(),
    })?;
    Ok(hist)
}

fn compare(args: CompareArgs) -> Result<u8> {
    let lhs = load(&args.lhs)?;
    let rhs = load(&args.rhs)?;

    let options = CompareOptions {
        tolerance: args.tolerance,
        compare_central: args.central,
    };
    let report = compare_sets(&lhs, &rhs, &options)
        .with_labels(args.lhs.display().to_string(), args.rhs.display().to_string());

    report.print_diagnostics();
    if args.report {
        report.print_summary(args.summary);
    }

    if let Some(path) = &args.json {
        std::fs::write(path, report.to_json())
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    let status = report.status(args.summary);
    info!(
        "{} discrepancies in {} histogram pairs, status {}",
        report.diagnostics.len(),
        report.histograms_compared,
        status
    );
    Ok(status.exit_code() as u8)
}

fn normalize(args: NormalizeArgs) -> Result<()> {
    let mut set = load(&args.file)?;
    let source = histogram(&set, &args.name)?;

    let (result, label) = match args.mode {
        NormalizeMode::Area => (ops::area_normalize(source), "area"),
        NormalizeMode::Row => (ops::row_normalize(source), "row"),
        NormalizeMode::Column => (ops::column_normalize(source), "column"),
    };
    let result = result.with_context(|| format!("cannot normalize {}", args.name))?;

    let out_name = format!("{}_{}Normalized", args.name, label);
    info!("writing {}", out_name);
    set.insert(out_name, Entry::Simple(result));

    save(&set, args.output.as_deref().unwrap_or(&args.file))
}

fn ratio(args: RatioArgs) -> Result<()> {
    let mut set = load(&args.file)?;
    let num = histogram(&set, &args.numerator)?;
    let den = histogram(&set, &args.denominator)?;

    let result = if args.binomial {
        ops::divide_binomial(num, den)
    } else {
        ops::divide(num, den)
    }
    .with_context(|| format!("cannot divide {} by {}", args.numerator, args.denominator))?;

    let out_name = args
        .name
        .unwrap_or_else(|| format!("{}_over_{}", args.numerator, args.denominator));
    info!("writing {}", out_name);
    set.insert(out_name, Entry::Simple(result));

    save(&set, args.output.as_deref().unwrap_or(&args.file))
}

fn sync_cv(args: SyncCvArgs) -> Result<()> {
    let mut set = load(&args.file)?;
    let synced = set.sync_cv();
    if synced == 0 {
        warn!("{} has no histograms with error bands", args.file.display());
    }
    info!("synchronized {} histograms", synced);

    let output = args
        .output
        .unwrap_or_else(|| derived_path(&args.file, "_withSyncCVHistos"));
    save(&set, &output)
}

fn remove_band(args: RemoveBandArgs) -> Result<()> {
    let mut set = load(&args.file)?;
    let removed = set.remove_band(&args.band);
    if removed == 0 {
        warn!("no histogram in {} has a band named {}", args.file.display(), args.band);
    }
    info!("removed {} from {} histograms", args.band, removed);

    save(&set, args.output.as_deref().unwrap_or(&args.file))
}

fn transplant(args: TransplantArgs) -> Result<()> {
    let mut target = load(&args.target)?;
    let source = load(&args.source)?;
    target.transplant(&source, &args.name)?;

    let output: PathBuf = args.output.unwrap_or_else(|| {
        derived_path(
            &args.target,
            &format!("_withFluxFrom_{}", set_stem(&args.source)),
        )
    });
    save(&target, &output)
}
