//! Redash CLI — search, inspect, run and export queries from the terminal.

mod output;

use std::io::Write;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use redash_lib::{
    parse_redash_url, AdhocQuery, Config, DefaultClient, NewQuery, RedashClient, Submission,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "redash")]
#[command(about = "Redash CLI — search, inspect, run and export queries", long_about = None)]
struct Cli {
    /// Output format: plain (human-readable), json (structured).
    #[arg(short, long, default_value = "plain", value_enum)]
    output: OutputFormatArg,

    /// Redash server URL.
    #[arg(long, env = "REDASH_URL")]
    url: Option<String>,

    /// API key. Prefer REDASH_APIKEY or a secret backend over passing it here.
    #[arg(long, env = "REDASH_APIKEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Log requests to stderr (RUST_LOG overrides).
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormatArg {
    Plain,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search queries by text
    Search { q: String },
    /// Recently viewed queries
    Recent,
    /// Queries owned by you
    My {
        #[arg(long, default_value = "25")]
        page_size: u32,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// List all queries
    List {
        #[arg(long, default_value = "25")]
        page_size: u32,
        #[arg(long, default_value = "1")]
        page: u32,
    },
    /// Show one query
    Get { id: u64 },
    /// Create a query
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        data_source_id: u64,
        #[arg(long)]
        query: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Replace a query's name, text and data source
    Update {
        id: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        data_source_id: u64,
        #[arg(long)]
        query: String,
        #[arg(long)]
        description: Option<String>,
    },
    /// Archive a query
    Delete { id: u64 },
    /// Format SQL on the server
    Format { sql: String },
    /// Schedule a query refresh and print the job
    Refresh { id: u64 },
    /// Duplicate a query
    Fork { id: u64 },
    /// Download a query result file (written to stdout as-is)
    Results {
        id: u64,
        /// Specific result id; latest result when omitted
        #[arg(long)]
        result_id: Option<u64>,
        #[arg(long, default_value = "csv", value_parser = ["csv", "json", "xlsx"])]
        ext: String,
    },
    /// Submit SQL for execution and print the job (or cached result)
    Submit {
        #[arg(long)]
        query: String,
        #[arg(long)]
        data_source_id: u64,
        /// Accept a cached result up to this many seconds old
        #[arg(long, default_value = "0")]
        max_age: u64,
    },
    /// Show a result set
    Result { id: u64 },
    /// Poll a job
    Job { id: String },
    /// Cancel a job
    CancelJob { id: String },
    /// Parse a Redash URL and print extracted IDs
    ParseUrl { url: String },
    /// Show version
    Version,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let format = match cli.output {
        OutputFormatArg::Plain => output::OutputFormat::Plain,
        OutputFormatArg::Json => output::OutputFormat::Json,
    };

    match cli.command {
        Commands::Version => {
            println!("redash {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Commands::ParseUrl { ref url } => {
            return match parse_redash_url(url) {
                Ok(parsed) => finish(output::print(&parsed, format)),
                Err(e) => finish(Err(e)),
            };
        }
        _ => {}
    }

    let mut config = Config::from_env_with_key(cli.api_key);
    if let Some(url) = cli.url {
        config.url = Some(url);
    }
    tracing::debug!(?config, "resolved config");
    let client = DefaultClient::new(&config);

    finish(run(&client, cli.command, format).await)
}

fn finish(result: Result<(), String>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn new_query(name: String, data_source_id: u64, query: String, description: Option<String>) -> NewQuery {
    NewQuery {
        description,
        ..NewQuery::new(name, data_source_id, query)
    }
}

async fn run(
    client: &DefaultClient,
    cmd: Commands,
    format: output::OutputFormat,
) -> Result<(), String> {
    let queries = client.queries();

    match cmd {
        Commands::Search { q } => {
            let found = queries.search(&q).await.map_err(|e| e.to_string())?;
            output::print(&found, format)?;
        }
        Commands::Recent => {
            let recent = queries.recent().await.map_err(|e| e.to_string())?;
            output::print(&recent, format)?;
        }
        Commands::My { page_size, page } => {
            let page = queries.my(page_size, page).await.map_err(|e| e.to_string())?;
            output::print(&page, format)?;
        }
        Commands::List { page_size, page } => {
            let page = queries
                .list(page_size, page)
                .await
                .map_err(|e| e.to_string())?;
            output::print(&page, format)?;
        }
        Commands::Get { id } => {
            let query = queries.get(id).await.map_err(|e| e.to_string())?;
            output::print(&query, format)?;
        }
        Commands::Create {
            name,
            data_source_id,
            query,
            description,
        } => {
            let created = queries
                .create(&new_query(name, data_source_id, query, description))
                .await
                .map_err(|e| e.to_string())?;
            output::print(&created, format)?;
        }
        Commands::Update {
            id,
            name,
            data_source_id,
            query,
            description,
        } => {
            let updated = queries
                .update(id, &new_query(name, data_source_id, query, description))
                .await
                .map_err(|e| e.to_string())?;
            output::print(&updated, format)?;
        }
        Commands::Delete { id } => {
            queries.delete(id).await.map_err(|e| e.to_string())?;
            eprintln!("query {} archived", id);
        }
        Commands::Format { sql } => {
            let formatted = queries.format(&sql).await.map_err(|e| e.to_string())?;
            match format {
                output::OutputFormat::Plain => println!("{}", formatted),
                output::OutputFormat::Json => output::print(&serde_json::json!({ "query": formatted }), format)?,
            }
        }
        Commands::Refresh { id } => {
            let job = queries.refresh(id).await.map_err(|e| e.to_string())?;
            output::print(&job, format)?;
        }
        Commands::Fork { id } => {
            let forked = queries.fork(id).await.map_err(|e| e.to_string())?;
            output::print(&forked, format)?;
        }
        Commands::Results { id, result_id, ext } => {
            let bytes = match result_id {
                Some(rid) => queries.result_file(id, rid, &ext).await,
                None => queries.latest_result_file(id, &ext).await,
            }
            .map_err(|e| e.to_string())?;
            std::io::stdout()
                .write_all(&bytes)
                .map_err(|e| e.to_string())?;
        }
        Commands::Submit {
            query,
            data_source_id,
            max_age,
        } => {
            let submitted = client
                .query_results()
                .submit(&AdhocQuery {
                    query,
                    max_age,
                    data_source_id,
                })
                .await
                .map_err(|e| e.to_string())?;
            match submitted {
                Submission::Job(job) => output::print(&job, format)?,
                Submission::Cached(result) => output::print_result(&result, format)?,
            }
        }
        Commands::Result { id } => {
            let result = client
                .query_results()
                .get(id)
                .await
                .map_err(|e| e.to_string())?;
            output::print_result(&result, format)?;
        }
        Commands::Job { id } => {
            let job = client.jobs().get(&id).await.map_err(|e| e.to_string())?;
            output::print(&job, format)?;
        }
        Commands::CancelJob { id } => {
            client.jobs().cancel(&id).await.map_err(|e| e.to_string())?;
            eprintln!("job {} cancelled", id);
        }
        Commands::ParseUrl { .. } | Commands::Version => {}
    }
    Ok(())
}
