use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use colored::Colorize;
use serde_json::json;
use tracing::debug;

use plv_sdk::{BootstrapMode, Dispatcher, EntityKind, Plv, PlvError};
use plv_server::{LedgerBackend, PlvServer, ServerConfig};

use crate::cli::*;

/// Ledger directory used by one-shot commands when nothing else is configured.
const DEFAULT_LEDGER_DIR: &str = ".plv";

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        command,
        ledger,
        config,
        format,
    } = cli;
    let one_shot = !matches!(command, Command::Serve(_));
    let config = resolve_config(config.as_deref(), ledger, one_shot)?;
    debug!(ledger = ?config.ledger, "resolved configuration");

    match command {
        Command::Init(args) => cmd_init(&config, args, format),
        Command::Invoke(args) => cmd_call(&config, args, false, format),
        Command::Query(args) => cmd_call(&config, args, true, format),
        Command::Status => cmd_status(&config, format),
        Command::Serve(args) => cmd_serve(config, args),
    }
}

fn resolve_config(
    path: Option<&Path>,
    ledger: Option<PathBuf>,
    one_shot: bool,
) -> anyhow::Result<ServerConfig> {
    let mut config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(dir) = ledger {
        config.ledger = LedgerBackend::Dir { path: dir };
    } else if one_shot && config.ledger == LedgerBackend::Memory {
        // An in-memory ledger would not outlive the command.
        config.ledger = LedgerBackend::Dir {
            path: PathBuf::from(DEFAULT_LEDGER_DIR),
        };
    }
    Ok(config)
}

fn open_dispatcher(config: &ServerConfig) -> anyhow::Result<Dispatcher> {
    let ledger = config
        .ledger
        .open()
        .with_context(|| format!("opening ledger {}", describe(&config.ledger)))?;
    Ok(Dispatcher::new(Arc::new(Plv::new(ledger, config.plv.clone()))))
}

fn describe(backend: &LedgerBackend) -> String {
    match backend {
        LedgerBackend::Memory => "(memory)".into(),
        LedgerBackend::Dir { path } => path.display().to_string(),
    }
}

fn plv_failure(e: PlvError) -> anyhow::Error {
    anyhow::anyhow!("{}: {e}", e.kind())
}

fn cmd_init(config: &ServerConfig, args: InitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let dispatcher = open_dispatcher(config)?;
    let mode = if args.wipe {
        BootstrapMode::Wipe
    } else {
        BootstrapMode::Fresh
    };
    let report = dispatcher.plv().bootstrap(mode).map_err(plv_failure)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }
    println!(
        "{} Initialized indexes in {} ({})",
        "✓".green().bold(),
        describe(&config.ledger).bold(),
        mode
    );
    for kind in &report.reset {
        println!("  {} {}", "reset:".green(), config.plv.indexes.key(*kind));
    }
    for kind in &report.kept {
        println!("  {} {}", "kept:".cyan(), config.plv.indexes.key(*kind));
    }
    if report.orphaned > 0 {
        println!(
            "  {} {} records are no longer reachable",
            "warning:".yellow().bold(),
            report.orphaned
        );
    }
    Ok(())
}

fn execute(dispatcher: &Dispatcher, call: &CallArgs, read_only: bool) -> anyhow::Result<Vec<u8>> {
    let outcome = if read_only {
        dispatcher.query(&call.function, &call.args)
    } else {
        dispatcher.invoke(&call.function, &call.args)
    };
    outcome.map_err(plv_failure)
}

fn render(payload: &[u8], format: OutputFormat) -> String {
    if format == OutputFormat::Text {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(payload) {
            if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                return pretty;
            }
        }
    }
    String::from_utf8_lossy(payload).into_owned()
}

fn cmd_call(
    config: &ServerConfig,
    call: CallArgs,
    read_only: bool,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let dispatcher = open_dispatcher(config)?;
    let payload = execute(&dispatcher, &call, read_only)?;
    if !payload.is_empty() {
        println!("{}", render(&payload, format));
    } else if format == OutputFormat::Text {
        println!("{} {}", "✓".green().bold(), call.function.bold());
    }
    Ok(())
}

fn cmd_status(config: &ServerConfig, format: OutputFormat) -> anyhow::Result<()> {
    let dispatcher = open_dispatcher(config)?;
    let plv = dispatcher.plv();
    let indexes = plv.repository().indexes();

    let mut sizes = Vec::new();
    for kind in EntityKind::ALL {
        let ids = indexes.get_index(kind).map_err(|e| plv_failure(e.into()))?;
        sizes.push((kind, indexes.key(kind).to_string(), ids.len()));
    }
    let counts = plv.status_counts().map_err(plv_failure)?;

    if format == OutputFormat::Json {
        let indexes: serde_json::Map<_, _> = sizes
            .iter()
            .map(|(kind, _, len)| (kind.to_string(), json!(len)))
            .collect();
        println!("{}", json!({ "indexes": indexes, "images": counts }));
        return Ok(());
    }
    println!("Ledger: {}", describe(&config.ledger).bold());
    for (kind, key, len) in &sizes {
        println!("  {:<6} {} registered (index {})", kind.to_string().cyan(), len, key.dimmed());
    }
    println!(
        "Images: {} demanded, {} delivered",
        counts.demanded.to_string().yellow(),
        counts.delivered.to_string().green()
    );
    Ok(())
}

fn cmd_serve(mut config: ServerConfig, args: ServeArgs) -> anyhow::Result<()> {
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    println!(
        "PLV server on {} (ledger: {})",
        config.bind_addr.to_string().bold(),
        describe(&config.ledger)
    );
    let server = PlvServer::new(config)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server.serve())?;
    Ok(())
}
