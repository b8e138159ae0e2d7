//! perfcompare CLI - compare Treeherder performance results

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use perfcompare::fixtures::fixture_keys;
use perfcompare::loader::Loader;
use perfcompare::report::{render_markdown, render_revisions};
use perfcompare::treeherder::{
    ClientConfig, RecentRevisionsParams, TreeherderClient, TREEHERDER_BASE_URL,
};
use perfcompare::{Framework, Repository};
use tracing::{debug, info};

/// perfcompare: compare performance results between revisions
#[derive(Parser, Debug)]
#[command(name = "perfcompare")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Treeherder instance to query
    #[arg(long, global = true, env = "TREEHERDER_URL", default_value = TREEHERDER_BASE_URL)]
    treeherder_url: String,

    #[arg(long, global = true, env = "PERFCOMPARE_USER_AGENT")]
    user_agent: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare a base revision with one or more new revisions
    Compare(CompareArgs),
    /// List recent pushes of a repository
    Revisions(RevisionsArgs),
    /// Show known repositories and frameworks
    Catalog,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Query string or URL of a comparison, e.g.
    /// "/compare-results/?baseRev=abc&baseRepo=try&newRev=def&newRepo=try"
    query: String,

    /// Use bundled fixtures instead of Treeherder
    #[arg(long, default_value = "false")]
    fake: bool,

    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,
}

#[derive(Parser, Debug)]
struct RevisionsArgs {
    #[arg(short, long)]
    repository: Repository,

    /// Only pushes by this author
    #[arg(long)]
    author: Option<String>,

    /// Only the push with this revision (ignored when --author is set)
    #[arg(long)]
    hash: Option<String>,

    #[arg(long, value_enum, default_value = "markdown")]
    format: OutputFormat,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum OutputFormat {
    Markdown,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    let mut config = ClientConfig {
        base_url: cli.treeherder_url.clone(),
        ..Default::default()
    };
    if let Some(user_agent) = cli.user_agent.clone() {
        config.user_agent = user_agent;
    }

    match cli.command {
        Commands::Compare(args) => compare_command(&config, args).await,
        Commands::Revisions(args) => revisions_command(&config, args).await,
        Commands::Catalog => catalog_command(),
    }
}

async fn compare_command(config: &ClientConfig, args: CompareArgs) -> Result<()> {
    let client = TreeherderClient::new(config).context("Failed to create Treeherder client")?;
    debug!("Using Treeherder at {}", client.base_url());

    let loader = Loader::new(client).with_fake_results(args.fake);
    if args.fake {
        info!("Using bundled fixtures");
    }

    let loaded = loader.load_query(&args.query).await?;

    match args.format {
        OutputFormat::Markdown => println!("{}", render_markdown(&loaded)?),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&loaded)?),
    }

    Ok(())
}

async fn revisions_command(config: &ClientConfig, args: RevisionsArgs) -> Result<()> {
    let client = TreeherderClient::new(config).context("Failed to create Treeherder client")?;

    let params = RecentRevisionsParams {
        repository: args.repository,
        hash: args.hash,
        author: args.author,
    };
    let revisions = client.fetch_recent_revisions(&params).await?;
    info!("Found {} push(es) on {}", revisions.len(), params.repository);

    match args.format {
        OutputFormat::Markdown => println!("{}", render_revisions(&revisions)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&revisions)?),
    }

    Ok(())
}

fn catalog_command() -> Result<()> {
    println!("Repositories:");
    for repo in Repository::ALL {
        println!("  {}", repo);
    }

    println!("\nFrameworks:");
    for framework in Framework::ALL {
        let marker = if framework == Framework::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {:>2}  {}{}", framework.id(), framework, marker);
    }

    println!("\nFixtures:");
    for key in fixture_keys() {
        println!("  {}", key);
    }

    Ok(())
}
