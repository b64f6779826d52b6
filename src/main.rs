use std::path::PathBuf;

use clap::Parser;
use clients_daily::engine::RollupError;
use clients_daily::engine::rollup::RollupJob;
use clients_daily::engine::rollup::sink::{read_json_lines, write_json_lines_atomically};
use clients_daily::engine::schema::PingSchema;
use clients_daily::logging;
use clients_daily::shared::config::CONFIG;
use tracing::info;

#[derive(Parser)]
#[command(name = "clients-daily")]
#[command(about = "Roll up telemetry pings into one row per client per day", long_about = None)]
struct Args {
    /// Input pings, one JSON object per line
    #[arg(short, long)]
    input: PathBuf,

    /// Output rows, one JSON object per line
    #[arg(short, long)]
    output: PathBuf,

    /// TOML schema descriptor; overrides `rollup.schema_path`
    #[arg(short, long)]
    schema: Option<PathBuf>,
}

fn run(args: &Args) -> Result<(), RollupError> {
    let mut job = RollupJob::from_settings(&CONFIG)?;
    if let Some(path) = &args.schema {
        job = job.with_schema(PingSchema::from_toml_file(path)?);
    }

    let records = read_json_lines(&args.input)?;
    let output = job.run(records)?;
    write_json_lines_atomically(&args.output, &output.rows)?;

    info!(
        input = output.stats.input_rows,
        dropped = output.stats.dropped_rows,
        duplicates = output.stats.duplicate_rows,
        rows = output.rows.len(),
        "clients_daily finished"
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(&CONFIG.logging)?;

    if let Err(e) = run(&args) {
        e.log_error();
        return Err(e.into());
    }
    Ok(())
}
