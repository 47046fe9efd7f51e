//! pz-login - Authenticate against the Postiz API with email and password
//!
//! The password is read with a hidden prompt, or from stdin with
//! `--password-stdin` for automation. It is never written anywhere.

use anyhow::{bail, Context, Result};
use clap::Parser;
use libpostiz::types::Credentials;
use libpostiz::{Config, PostizClient, PostizError};
use std::io::{self, Read};

#[derive(Parser, Debug)]
#[command(name = "pz-login")]
#[command(version, about = "Authenticate against the Postiz API")]
#[command(long_about = r#"Authenticate against the Postiz API with email and password.

The response body is printed as JSON. No API key is needed for this call.

EXAMPLES:
    # Interactive, hidden password prompt
    pz-login user@example.com

    # Password from a secret manager
    pass show postiz | pz-login user@example.com --password-stdin

EXIT CODES:
    0 - Success
    1 - Request failed
    2 - Credentials rejected (401/403)
    3 - Invalid input
"#)]
struct Cli {
    /// Account email
    email: String,

    /// Read the password from stdin instead of prompting
    #[arg(long)]
    password_stdin: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    libpostiz::logging::init_default(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<PostizError>()
            .map(PostizError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.email.trim().is_empty() {
        return Err(PostizError::InvalidInput("Email cannot be empty".to_string()).into());
    }

    let password = read_password(cli.password_stdin)?;
    let credentials = Credentials::new(cli.email.trim(), password);

    let config = Config::load()?;
    let client = PostizClient::anonymous(&config);
    let data = client.login(&credentials).await?;

    println!(
        "{}",
        serde_json::to_string_pretty(&data).unwrap_or_else(|_| data.to_string())
    );
    Ok(())
}

fn read_password(from_stdin: bool) -> Result<String> {
    let password = if from_stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read password from stdin")?;
        buffer.trim_end_matches(&['\n', '\r'][..]).to_string()
    } else {
        if !atty::is(atty::Stream::Stdin) {
            bail!("Not a TTY. Use --password-stdin to read the password from stdin.");
        }
        rpassword::prompt_password("Password: ").context("Failed to read password")?
    };

    if password.is_empty() {
        return Err(PostizError::InvalidInput("Password cannot be empty".to_string()).into());
    }

    Ok(password)
}
