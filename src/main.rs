//! tablekv - Command-Line Access to a Table Store
//!
//! A thin maintenance CLI over [`tablekv::TableStore`]: fetch or delete a
//! single record by table and key. Results go to stdout, errors to stderr
//! with a non-zero exit code.

use tablekv::{TableStore, DEFAULT_DATA_DIR};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Parsed command line.
struct Cli {
    /// Directory of the store to open.
    path: String,
    command: Command,
}

enum Command {
    Get { table: String, key: String },
    Delete { table: String, key: String },
}

impl Cli {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();

        let mut path = DEFAULT_DATA_DIR.to_string();
        let mut positional: Vec<String> = Vec::new();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--path" | "-p" => {
                    if i + 1 < args.len() {
                        path = args[i + 1].clone();
                        i += 2;
                    } else {
                        eprintln!("Error: --path requires a value");
                        std::process::exit(1);
                    }
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("tablekv version {}", tablekv::VERSION);
                    std::process::exit(0);
                }
                arg if arg.starts_with('-') => {
                    eprintln!("Unknown argument: {arg}");
                    print_help();
                    std::process::exit(1);
                }
                _ => {
                    positional.push(args[i].clone());
                    i += 1;
                }
            }
        }

        let command = match positional.as_slice() {
            [cmd, table, key] if cmd == "get" => Command::Get {
                table: table.clone(),
                key: key.clone(),
            },
            [cmd, table, key] if cmd == "delete" => Command::Delete {
                table: table.clone(),
                key: key.clone(),
            },
            _ => {
                print_help();
                std::process::exit(1);
            }
        };

        Self { path, command }
    }
}

fn print_help() {
    println!(
        r#"
tablekv - Command-Line Access to a Table Store

USAGE:
    tablekv [OPTIONS] <COMMAND> <table> <key>

COMMANDS:
    get <table> <key>       Print the record as JSON
    delete <table> <key>    Delete the record

OPTIONS:
    -p, --path <DIR>    Store directory (default: {DEFAULT_DATA_DIR})
    -v, --version       Print version information
        --help          Print this help message

EXAMPLES:
    tablekv get users u1
    tablekv --path /var/lib/app delete sessions s42
"#
    );
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::from_args();

    // Logs go to stderr so stdout stays clean JSON.
    let _subscriber = FmtSubscriber::builder()
        .with_max_level(Level::WARN)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let store = TableStore::open(&cli.path)?;

    match cli.command {
        Command::Get { table, key } => {
            match store.get::<serde_json::Value>(&table, &key) {
                Ok(value) => println!("{}", serde_json::to_string_pretty(&value)?),
                Err(e) => {
                    eprintln!("Error: {e}");
                    std::process::exit(1);
                }
            }
        }
        Command::Delete { table, key } => match store.delete(&table, &key) {
            Ok(()) => println!("Deleted: {table}:{key}"),
            Err(e) => {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
