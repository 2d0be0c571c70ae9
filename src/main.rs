// src/main.rs

use indicatif::MultiProgress;
use taskline::{cli, logging, run};

#[tokio::main]
async fn main() {
    if let Err(err) = run_main().await {
        eprintln!("taskline error: {err:?}");
        std::process::exit(1);
    }
}

async fn run_main() -> anyhow::Result<()> {
    let args = cli::parse();
    let progress = MultiProgress::new();
    logging::init_logging(args.log_level, progress.clone())?;
    run(args, progress).await
}
