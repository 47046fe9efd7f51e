//! pz-tools - Upload the Postiz tool sources to an agent platform

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use libpostiz::config::ToolsConfig;
use libpostiz::{catalog, dispatch, PostizClient};
use libpostiz::tools::env_file::missing_keys;
use libpostiz::tools::prompt::{resolve_agent_id, Prompter, StdinPrompter};
use libpostiz::tools::{load_env_file, EnvMap, UploadOrchestrator};
use libpostiz::{Config, PostizError};
use serde_json::Value;
use tracing::warn;

#[derive(Parser, Debug)]
#[command(name = "pz-tools")]
#[command(version, about = "Upload the Postiz tools to an agent platform")]
#[command(long_about = r#"Upload the Postiz tools to an agent platform and attach them to an agent.

Each tool source is uploaded in turn. When an upload endpoint is configured
it is tried first and the upload script is the fallback. A failing tool is
reported and skipped; the run continues with the next one.

`call` runs a single tool directly against the Postiz API. On failure it
prints {"success": false, "error": ..., "details": ...} to stdout.

EXAMPLES:
    # Upload all tools, asking which agent to attach them to
    pz-tools upload

    # Unattended upload to a known agent
    pz-tools upload --agent-id agent-123 --yes

    # Upload only; print the attach commands instead
    pz-tools upload --no-attach

    # Machine-readable report
    pz-tools upload --yes --format json | jq '.skipped'

    # What the tools do
    pz-tools list

    # Run a tool the way an agent would, with its params_json argument
    pz-tools call get_posts --params-json '{"display": "week", "year": 2025}'
    pz-tools call create_post_1A --params-json '{"content": "Hello world", "integration_id": "abc"}'

EXIT CODES:
    0 - Success (including uploads where individual tools failed)
    1 - Error (configuration unreadable, request failed, etc.)
    2 - Authentication error (call)
    3 - Unknown tool or invalid arguments (call)
"#)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload every tool and attach it to an agent
    Upload {
        /// Agent to attach the tools to (skips the prompt)
        #[arg(long, value_name = "ID")]
        agent_id: Option<String>,

        /// Upload only, do not attach
        #[arg(long, conflicts_with = "agent_id")]
        no_attach: bool,

        /// Never prompt; use the agent ID from the env file if present
        #[arg(short, long, alias = "non-interactive")]
        yes: bool,

        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// List the tools and what they do
    List {
        /// Output format
        #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },

    /// Run one tool against the Postiz API and print its JSON result
    Call {
        /// Tool name, with or without the registration suffix
        name: String,

        /// Tool arguments as a JSON object
        #[arg(long, value_name = "JSON", default_value = "{}")]
        params_json: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    libpostiz::logging::init_default(cli.verbose);

    if let Err(e) = run_command(cli.command).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<PostizError>()
            .map(PostizError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run_command(command: Commands) -> Result<()> {
    match command {
        Commands::Upload {
            agent_id,
            no_attach,
            yes,
            format,
        } => {
            let config = Config::load()?;
            upload(&config.tools, agent_id, no_attach, yes, &format).await
        }
        Commands::List { format } => list(&format),
        Commands::Call { name, params_json } => {
            let output = match call(&name, &params_json).await {
                Ok(data) => data,
                Err(e) => {
                    println!("{}", serde_json::to_string_pretty(&dispatch::error_response(&e))?);
                    return Err(e.into());
                }
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
    }
}

async fn upload(
    tools: &ToolsConfig,
    agent_id: Option<String>,
    no_attach: bool,
    yes: bool,
    format: &str,
) -> Result<()> {
    let env = load_env_file(&tools.env_file())?;
    let missing = missing_keys(&env, &tools.required_vars);
    if !missing.is_empty() {
        warn!(
            "Missing environment variables in {}: {}",
            tools.env_file().display(),
            missing.join(", ")
        );
    }

    // Prompts write to stdout, which must stay clean for JSON
    let interactive = !yes && format == "text" && StdinPrompter::is_interactive();
    let agent_id = if no_attach {
        None
    } else {
        pick_agent(agent_id.as_deref(), &env, &tools.agent_id_var, interactive)?
    };

    let orchestrator = UploadOrchestrator::from_config(tools, env);
    let report = orchestrator
        .run(&tools.tool_specs(), agent_id.as_deref())
        .await;

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => print!("\n{}", report.summary(orchestrator.attacher())),
    }

    Ok(())
}

fn pick_agent(
    explicit: Option<&str>,
    env: &EnvMap,
    env_key: &str,
    interactive: bool,
) -> Result<Option<String>> {
    let mut stdin_prompter = StdinPrompter;
    let prompter: Option<&mut dyn Prompter> = if interactive {
        Some(&mut stdin_prompter)
    } else {
        None
    };

    resolve_agent_id(explicit, env, env_key, prompter).context("Failed to read agent ID")
}

fn list(format: &str) -> Result<()> {
    let definitions = catalog::definitions();
    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&definitions)?),
        _ => {
            println!("Available Tools:");
            for tool in &definitions {
                println!("- {}: {}", tool.name, tool.description);
            }
        }
    }
    Ok(())
}

async fn call(name: &str, params_json: &str) -> libpostiz::Result<Value> {
    let tool = dispatch::resolve(name)?;
    let arguments = dispatch::parse_params_json(params_json)?;
    let config = Config::load()?;

    if tool.authenticated {
        let client = PostizClient::from_config(&config)?;
        dispatch::call_tool(&client, tool.name, arguments).await
    } else {
        dispatch::call_tool(&PostizClient::anonymous(&config), tool.name, arguments).await
    }
}
