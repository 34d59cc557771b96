use std::env;
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, bail};
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tracing::{debug, info};

use xgaway::{chart, data, print, render, stats};

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// CSV files of raw per-season match data
    raw_data: Vec<PathBuf>,

    /// where to write the rendered heatmap (.png, .svg, .json or .html)
    #[clap(short = 'o', long)]
    out: Option<PathBuf>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.raw_data.is_empty() {
            bail!("at least one raw data file must be specified");
        }
        self.out
            .as_ref()
            .ok_or(anyhow!("output file must be specified"))?;
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    args.validate()?;
    debug!("args: {args:?}");

    let start_time = Instant::now();
    let records = data::read_from_files(&args.raw_data)?;
    info!(
        "loaded {} fixtures from {} sources",
        records.len(),
        args.raw_data.len()
    );

    let stats = stats::summarise(&records);
    info!(
        "{} (season, team) groups survived the season-completeness filter",
        stats.len()
    );
    println!("{}", Console::default().render(&print::tabulate(&stats)));

    let heatmap = chart::heatmap(&stats);
    let out = args.out.unwrap();
    render::save(&heatmap, &out)?;

    let elapsed_time = start_time.elapsed();
    info!(
        "wrote {} in {}s",
        out.display(),
        elapsed_time.as_millis() as f64 / 1_000.
    );
    Ok(())
}
