use clap::{ColorChoice, Parser};
use colored::Colorize;
use log::info;
use segverify::{Args, Pipeline, logger};
use std::{
    io::{IsTerminal, stdout},
    process,
};

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    match args.color {
        ColorChoice::Always => colored::control::set_override(true),
        ColorChoice::Auto => colored::control::set_override(stdout().is_terminal()),
        ColorChoice::Never => colored::control::set_override(false),
    }

    logger::init(args.verbose);

    let config = args.into_config()?;
    let report = Pipeline::new(config)?.run().await?;

    report.log_summary();
    info!("\nDone!");
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("{}: {}", "error".bold().red(), e);
        process::exit(1);
    }
}
