// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;

use anyhow::{Context, Result, anyhow};
use config::Config;
use prebill_app::{AppCommand, AppState, InvoiceId};
use prebill_store::{FileStore, Store};
use runtime::StoreRuntime;
use std::env;
use std::path::PathBuf;

const FALLBACK_AUTHOR: &str = "reviewer";

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `prebill --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;

    let state_dir = match &options.state_dir {
        Some(dir) => dir.clone(),
        None => config.state_dir()?,
    };
    let mut preferences = FileStore::open(&state_dir).with_context(|| {
        format!(
            "open state directory {} -- set [storage].state_dir or {} to a writable directory",
            state_dir.display(),
            prebill_store::STATE_DIR_ENV
        )
    })?;

    let data_path = options.data_path.clone().or_else(|| config.data_path());
    let invoices = match &data_path {
        Some(path) => prebill_store::load_invoices(path)?,
        None => prebill_store::demo_invoices().context("load bundled demo invoices")?,
    };

    logging::env_filter(config.log_level())?;
    if options.check_only {
        return Ok(());
    }

    let log_path = config.log_file(&state_dir);
    logging::init(&log_path, config.log_level())?;
    let source = match &data_path {
        Some(path) => path.display().to_string(),
        None => "demo".to_owned(),
    };
    tracing::info!(
        invoices = invoices.len(),
        source,
        state_dir = %state_dir.display(),
        "starting prebill"
    );

    let mut store = Store::new(invoices);
    let mut state = AppState::default();
    if let Some(invoice_id) = options.invoice {
        state.dispatch(AppCommand::OpenInvoice(invoice_id));
    }

    let mut runtime = StoreRuntime::new(&mut store, &mut preferences, comment_author());
    prebill_tui::run_app(&mut state, &mut runtime, &config.landing_options())
}

fn comment_author() -> String {
    env::var("USER")
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_AUTHOR.to_owned())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    data_path: Option<PathBuf>,
    state_dir: Option<PathBuf>,
    invoice: Option<InvoiceId>,
    print_config_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        data_path: None,
        state_dir: None,
        invoice: None,
        print_config_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--data" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--data requires a path to an invoices JSON file"))?;
                options.data_path = Some(PathBuf::from(value.as_ref()));
            }
            "--state-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--state-dir requires a directory"))?;
                options.state_dir = Some(PathBuf::from(value.as_ref()));
            }
            "--invoice" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--invoice requires an invoice id"))?;
                let id = value.as_ref().trim().parse::<i64>().map_err(|_| {
                    anyhow!(
                        "--invoice expects a numeric invoice id, got {:?}",
                        value.as_ref()
                    )
                })?;
                options.invoice = Some(InvoiceId::new(id));
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("prebill");
    println!("  --config <path>          Use a specific config path");
    println!("  --data <path>            Load invoices from a JSON file instead of the demo set");
    println!("  --state-dir <dir>        Keep UI state (expanded groups, log) in <dir>");
    println!("  --invoice <id>           Open directly on an invoice's detail view");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --check                  Validate config, data and state dir, then exit");
    println!("  --help                   Show this help");
}
