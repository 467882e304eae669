use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "plv",
    about = "Picture License Verifier: users and image licenses on a key-value ledger",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger directory (overrides the configured backend)
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,

    /// Server/PLV configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create the ID indexes
    Init(InitArgs),
    /// Run any operation, mutating or not
    Invoke(CallArgs),
    /// Run a read-only operation
    Query(CallArgs),
    /// Show index sizes and image status counts
    Status,
    /// Start the PLV HTTP server
    Serve(ServeArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Reset every index even if it holds IDs
    #[arg(long)]
    pub wipe: bool,
}

#[derive(Args)]
pub struct CallArgs {
    /// Operation name, e.g. addUser or GetImages
    pub function: String,
    /// Positional string arguments
    pub args: Vec<String>,
}

#[derive(Args)]
pub struct ServeArgs {
    /// Listen address (overrides the configured one)
    #[arg(long)]
    pub bind: Option<SocketAddr>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_init() {
        let cli = Cli::try_parse_from(["plv", "init"]).unwrap();
        assert!(matches!(cli.command, Command::Init(InitArgs { wipe: false })));
    }

    #[test]
    fn parse_init_wipe_with_ledger() {
        let cli = Cli::try_parse_from(["plv", "--ledger", "/tmp/l", "init", "--wipe"]).unwrap();
        if let Command::Init(args) = cli.command {
            assert!(args.wipe);
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.ledger, Some(PathBuf::from("/tmp/l")));
    }

    #[test]
    fn parse_invoke_with_json_argument() {
        let cli = Cli::try_parse_from([
            "plv",
            "invoke",
            "addUser",
            "alice",
            r#"{"password":"p"}"#,
        ])
        .unwrap();
        if let Command::Invoke(args) = cli.command {
            assert_eq!(args.function, "addUser");
            assert_eq!(args.args, vec!["alice", r#"{"password":"p"}"#]);
        } else {
            panic!("wrong command");
        }
    }

    #[test]
    fn parse_query_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["plv", "query", "getUsers", "--format", "json", "--ledger", "d"])
                .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Query(_)));
    }

    #[test]
    fn parse_serve() {
        let cli = Cli::try_parse_from(["plv", "serve", "--bind", "0.0.0.0:8080", "-c", "plv.toml"])
            .unwrap();
        if let Command::Serve(args) = cli.command {
            assert_eq!(args.bind.unwrap().port(), 8080);
        } else {
            panic!("wrong command");
        }
        assert_eq!(cli.config, Some(PathBuf::from("plv.toml")));
    }

    #[test]
    fn invoke_requires_function() {
        assert!(Cli::try_parse_from(["plv", "invoke"]).is_err());
    }
}
