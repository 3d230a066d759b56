use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use serde::Serialize;

use qaoa_landscape::analysis::{
    average_difference, param_transferable_with, transfer_fraction, transferability_coeff,
};
use qaoa_landscape::{LandscapeConfig, TransferThresholds};

use super::landscape::LandscapeReport;
use crate::output::write_json;

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Landscape whose optimal parameters are transferred
    #[arg(short, long)]
    pub donor: PathBuf,

    /// Landscape that receives the parameters
    #[arg(short, long)]
    pub acceptor: PathBuf,

    /// Relative level a donor cell must reach to count as good
    #[arg(long = "donor-level")]
    pub a: Option<f64>,

    /// Relative level the acceptor must reach on those cells
    #[arg(long = "acceptor-level")]
    pub b: Option<f64>,

    /// Share of donor-good cells that must be acceptor-good
    #[arg(long)]
    pub min_overlap: Option<f64>,

    /// Output file (prints to stdout if not specified)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct CompareReport {
    thresholds: TransferThresholds,
    transfer_fraction: f64,
    param_transferable: bool,
    transferability_coeff: f64,
    average_difference: f64,
    donor_maximizing_parameters: Vec<(f64, f64)>,
}

pub fn run(args: CompareArgs, config: &LandscapeConfig) -> anyhow::Result<()> {
    let thresholds = TransferThresholds {
        a: args.a.unwrap_or(config.transfer.a),
        b: args.b.unwrap_or(config.transfer.b),
        min_overlap: args.min_overlap.unwrap_or(config.transfer.min_overlap),
    };
    thresholds.validate()?;

    let donor = LandscapeReport::load(&args.donor)?;
    let acceptor = LandscapeReport::load(&args.acceptor)?;
    if donor.spec != acceptor.spec {
        bail!(
            "landscapes were sampled on different windows ({:?} vs {:?})",
            donor.spec,
            acceptor.spec
        );
    }
    let (e1, e2) = (donor.grid.values(), acceptor.grid.values());

    let report = CompareReport {
        thresholds,
        transfer_fraction: transfer_fraction(e1, e2, thresholds.a, thresholds.b)?,
        param_transferable: param_transferable_with(e1, e2, &thresholds)?,
        transferability_coeff: transferability_coeff(e1, e2).context("transferability coefficient")?,
        average_difference: average_difference(e1, e2).context("average difference")?,
        donor_maximizing_parameters: donor.maximizing_parameters,
    };
    tracing::info!(
        transferable = report.param_transferable,
        coeff = report.transferability_coeff,
        "comparison done"
    );
    write_json(&report, args.output.as_deref())
}
