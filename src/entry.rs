use std::ffi::OsString;
use std::path::Path;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tokio::sync::broadcast;
use tracing::info;

use crate::args::BurstArgs;
use crate::config;
use crate::error::AppResult;
use crate::http::{build_client, dispatch};
use crate::metrics::build_report;
use crate::shutdown::ShutdownSender;
use crate::sinks;

const SHUTDOWN_CHANNEL_CAPACITY: usize = 1;

pub(crate) fn run() -> AppResult<()> {
    let (args, matches) = match parse_args()? {
        Some(parsed) => parsed,
        None => return Ok(()),
    };

    crate::logger::init_logging(args.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args, &matches))
}

fn parse_args() -> AppResult<Option<(BurstArgs, ArgMatches)>> {
    let mut cmd = BurstArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    let args = BurstArgs::from_arg_matches(&matches)?;

    Ok(Some((args, matches)))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !config::has_default_config()
}

async fn run_async(mut args: BurstArgs, matches: &ArgMatches) -> AppResult<()> {
    if let Some(file) = config::load_config(args.config.as_deref())? {
        config::apply_config_file(&mut args, matches, &file)?;
    }
    let test_config = config::build_test_config(&args)?;

    let client = build_client(&test_config)?;
    let shutdown_tx = shutdown_channel();

    info!(
        "Bursting {} {} with {} requests (timeout {:.3}s)",
        test_config.method.as_str(),
        test_config.url,
        test_config.request_count.get(),
        test_config.timeout.as_secs_f64()
    );

    let batch = dispatch(&client, &test_config, &shutdown_tx).await?;
    let report = build_report(&batch.outcomes, batch.duration);

    let lines = sinks::summary_lines(&test_config, &report);
    sinks::print_summary(&lines);

    if !args.no_save {
        let path = sinks::write_text_report(
            Path::new(&args.output_dir),
            &test_config,
            &report,
            &batch.outcomes,
        )?;
        info!("Report written to {}", path.display());
    }
    if let Some(export) = args.export_json.as_deref() {
        sinks::write_json_report(Path::new(export), &report)?;
        info!("JSON report written to {}", export);
    }

    Ok(())
}

fn shutdown_channel() -> ShutdownSender {
    let (shutdown_tx, _) = broadcast::channel(SHUTDOWN_CHANNEL_CAPACITY);
    let signal_tx = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            drop(signal_tx.send(()));
        }
    });
    shutdown_tx
}
