mod cli;
mod io;

use clap::Parser;
use cli::{Cli, Command, HitTestArgs, SplitArgs};
use globe_geometry_lib::{Bounds, PolygonSplitter, QuadTree, QuadTreeConfig};
use io::{HitTestInput, HitTestOutput, Result, SplitInput, SplitOutput};
use std::process::ExitCode;

fn main() -> ExitCode {
    setup_logging();

    let cli = Cli::parse();
    let result = match &cli.command {
        Command::Split(args) => run_split(args),
        Command::HitTest(args) => run_hit_test(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging to stderr (stdout carries the JSON output)
fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{EnvFilter, fmt};

    if std::env::var("RUST_LOG").is_err() {
        // Safety: single-threaded at startup
        unsafe {
            if cfg!(debug_assertions) {
                std::env::set_var("RUST_LOG", "debug");
            } else {
                std::env::set_var("RUST_LOG", "warn");
            }
        }
    }

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(fmt_layer).init();
}

#[profiling::function]
fn run_split(args: &SplitArgs) -> Result<()> {
    let input: SplitInput = serde_json::from_str(&io::read_document(&args.input)?)?;
    let output = split_document(&input, args.validate)?;
    tracing::info!(
        "Split {} contours into {} polygons",
        input.contours.len(),
        output.polygons.len()
    );
    io::write_document(std::io::stdout().lock(), &output, args.pretty)
}

#[profiling::function]
fn run_hit_test(args: &HitTestArgs) -> Result<()> {
    let input: HitTestInput = serde_json::from_str(&io::read_document(&args.input)?)?;
    let output = hit_test_document(input, args.query(), args.config())?;
    io::write_document(std::io::stdout().lock(), &output, args.pretty)
}

fn split_document(input: &SplitInput, validate: bool) -> Result<SplitOutput> {
    let contours = input.to_contours();
    let split = if validate {
        PolygonSplitter::try_split_contours(&contours)?
    } else {
        PolygonSplitter::split_contours(&contours)
    };
    Ok(SplitOutput::from(&split))
}

fn hit_test_document(
    input: HitTestInput,
    query: Bounds,
    config: QuadTreeConfig,
) -> Result<HitTestOutput> {
    let query = query.validate()?;
    let mut tree = QuadTree::with_config(input.bounds, config)?;
    for object in input.objects {
        tree.insert(object.bounds, object.id)?;
    }
    tracing::debug!("Indexed {} objects (root split: {})", tree.len(), tree.is_split());

    let hits = if query.width == 0.0 && query.height == 0.0 {
        tree.hit_test(query.x, query.y)
    } else {
        tree.retrieve_overlapping(&query)
    };
    Ok(HitTestOutput {
        ids: hits.into_iter().map(|item| item.data.clone()).collect(),
    })
}
