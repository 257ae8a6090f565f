use clap::{Parser as ClapParser, Subcommand};
use std::io::{self, Read};
use tablequery::cli::{self, CheckOptions, CheckResult, CliError};
use tracing::debug;

#[derive(ClapParser)]
#[command(name = "tq")]
#[command(about = "tq - Check and compile table queries")]
#[command(version)]
struct Cli {
    /// Log matcher and compiler activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate and compile a query
    Check {
        /// The query to check (reads from stdin if not provided)
        query: Option<String>,

        /// Only validate syntax, don't compile
        #[arg(long)]
        syntax_only: bool,

        /// Print the syntax tree of the match
        #[arg(long, conflicts_with = "explain")]
        tree: bool,

        /// Print an outline of the compiled query
        #[arg(long)]
        explain: bool,

        /// Pretty-print the JSON output
        #[arg(short, long)]
        pretty: bool,

        /// Highlight rule names in errors and trees
        #[arg(long)]
        color: bool,

        /// Maximum where clause nesting depth
        #[arg(long, env = "TQ_MAX_DEPTH")]
        max_depth: Option<usize>,
    },

    /// List documentation categories
    Docs,

    /// Show documentation for a specific category
    Doc {
        /// Category name (use 'tq docs' to list categories)
        category: String,
    },

    /// Interactive onboarding tutorial
    Onboard,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check {
            query,
            syntax_only,
            tree,
            explain,
            pretty,
            color,
            max_depth,
        } => {
            let options = CheckOptions {
                query: String::new(),
                syntax_only,
                tree,
                explain,
                color,
                max_depth,
            };
            run_check(query, options, pretty)
        }
        Commands::Docs => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Doc { category } => cli::get_doc_category(&category).map(|content| {
            print!("{}", content);
        }),
        Commands::Onboard => {
            print!("{}", cli::get_onboarding_content());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(io::stderr)
        .init();
}

fn run_check(query: Option<String>, mut options: CheckOptions, pretty: bool) -> Result<(), CliError> {
    options.query = match query {
        Some(q) => q,
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            debug!(len = buffer.len(), "read query from stdin");
            buffer
        }
        None => return Err(CliError::NoInput),
    };

    match cli::execute_check(&options)? {
        CheckResult::SyntaxValid => println!("Syntax is valid"),
        CheckResult::Tree(tree) | CheckResult::Explained(tree) => print!("{}", tree),
        CheckResult::Compiled(output) => {
            let json = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{}", json);
        }
    }
    Ok(())
}
