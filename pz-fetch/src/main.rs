//! pz-fetch - Read account, integration and post data from the Postiz API

use clap::{Parser, Subcommand};
use libpostiz::types::Display;
use libpostiz::{Config, PostizClient, PostsQuery, Result};
use serde_json::Value;

#[derive(Parser, Debug)]
#[command(name = "pz-fetch")]
#[command(version, about = "Read account, integration and post data from the Postiz API")]
#[command(long_about = r#"Read account, integration and post data from the Postiz API.

Responses are printed as JSON on stdout, ready for jq.

EXAMPLES:
    # Who am I?
    pz-fetch self

    # Integration IDs to post to
    pz-fetch integrations | jq -r '.[] | "\(.id) \(.identifier)"'

    # Posts for a week, oldest first
    pz-fetch posts --display week --year 2025 --week 7 --oldest-first

    # Posts for a single day
    pz-fetch posts --display day --year 2025 --month 2 --day 27

EXIT CODES:
    0 - Success
    1 - Request failed
    2 - Authentication rejected (401/403)
    3 - Invalid input
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print compact single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List posts for a calendar period
    Posts {
        /// Calendar view: day, week or month
        #[arg(long, default_value = "month", value_parser = ["day", "week", "month"])]
        display: String,

        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i64>,

        /// Month number
        #[arg(long, default_value_t = 1)]
        month: i64,

        /// Week number
        #[arg(long, default_value_t = 1)]
        week: i64,

        /// Day number
        #[arg(long, default_value_t = 1)]
        day: i64,

        /// Sort oldest first instead of newest first
        #[arg(long)]
        oldest_first: bool,
    },

    /// List connected integrations
    Integrations,

    /// Show the authenticated user
    #[command(name = "self")]
    Me,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    libpostiz::logging::init_default(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

/// A parsed subcommand, validated before any configuration is read
enum Request {
    Posts(PostsQuery),
    Integrations,
    Me,
}

impl Request {
    fn from_command(command: Commands) -> Result<Self> {
        Ok(match command {
            Commands::Posts {
                display,
                year,
                month,
                week,
                day,
                oldest_first,
            } => Request::Posts(build_query(&display, year, month, week, day, oldest_first)?),
            Commands::Integrations => Request::Integrations,
            Commands::Me => Request::Me,
        })
    }
}

async fn run(cli: Cli) -> Result<()> {
    let request = Request::from_command(cli.command)?;

    let config = Config::load()?;
    let client = PostizClient::from_config(&config)?;

    let data = match request {
        Request::Posts(query) => client.get_posts(&query).await?,
        Request::Integrations => client.get_integrations().await?,
        Request::Me => client.get_self().await?,
    };

    println!("{}", render(&data, cli.compact));
    Ok(())
}

fn build_query(
    display: &str,
    year: Option<i64>,
    month: i64,
    week: i64,
    day: i64,
    oldest_first: bool,
) -> Result<PostsQuery> {
    let defaults = PostsQuery::default();
    Ok(PostsQuery {
        display: display.parse::<Display>()?,
        year: year.unwrap_or(defaults.year),
        month,
        week,
        day,
        newest_first: !oldest_first,
    })
}

fn render(data: &Value, compact: bool) -> String {
    if compact {
        return data.to_string();
    }
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}
