use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shapethumb", version)]
struct Cli {
    /// Input shape list, one `"<id>","<url>"` record per line. Defaults to `shapes.txt`.
    list: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stdout)
        .with_target(false)
        .init();

    let cli = Cli::parse();
    tracing::info!("args: {:?}", cli.list);

    if let Err(e) = shapethumb::run_from_list(cli.list.as_deref(), shapethumb::PipelineOpts::default())
    {
        tracing::error!("{e}");
    }
    Ok(())
}
