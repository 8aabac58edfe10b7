use tracing::info;
use tracing_subscriber::EnvFilter;

use rasagg::AggregationParams;
use rasagg::api::{aggregate_path_to_path, load_params, write_report};

use super::args::CliArgs;
use super::errors::AppError;

/// Merge a parameter file (if any) with the command line. The positional factor
/// always wins; flags only override when given.
pub fn resolve_params(args: &CliArgs) -> Result<AggregationParams, AppError> {
    let mut params = match &args.params {
        Some(path) => load_params(path).map_err(|source| AppError::Params {
            path: path.clone(),
            source,
        })?,
        None => AggregationParams::default(),
    };

    params.factor = args.cell_factor;
    if let Some(statistic) = args.statistic {
        params.statistic = statistic;
    }
    if args.expand {
        params.expand = true;
    }
    if args.propagate_no_data {
        params.propagate_no_data = true;
    }
    if let Some(driver) = &args.driver {
        params.driver = driver.clone();
    }
    if let Some(tile_blocks) = args.tile_blocks {
        params.tile_blocks = tile_blocks;
    }
    Ok(params)
}

fn init_logging(verbose: bool) {
    if verbose {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(args.log);

    let params = resolve_params(&args)?;
    let report = aggregate_path_to_path(&args.input, &args.output, &params)
        .map_err(AppError::from)?;

    info!(
        "Successfully aggregated: {:?} -> {:?} ({}x{} -> {}x{})",
        args.input,
        args.output,
        report.input_rows,
        report.input_cols,
        report.output_rows,
        report.output_cols
    );

    if let Some(path) = &args.report {
        write_report(path, &report).map_err(|source| AppError::Report {
            path: path.clone(),
            source,
        })?;
        info!("Report written to {:?}", path);
    }

    Ok(())
}
