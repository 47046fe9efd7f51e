//! pz-post - Create a post through the Postiz API

use clap::Parser;
use libpostiz::{Config, CreatePostRequest, PostBatch, PostizClient, PostizError, Result};
use serde_json::Value;
use std::io::Read;

#[derive(Parser, Debug)]
#[command(name = "pz-post")]
#[command(version, about = "Create a post through the Postiz API")]
#[command(long_about = r#"Create a post through the Postiz API.

EXAMPLES:
    # Publish immediately
    pz-post "Hello from the terminal" --integration cm4abc123

    # Schedule with media
    pz-post "Launch day!" -i cm4abc123 --type schedule \
        --date 2025-01-04T19:46:00.000Z \
        --media https://cdn.example.com/launch.png

    # Content from stdin, saved as draft
    echo "Draft for later review" | pz-post -i cm4abc123 --type draft

EXIT CODES:
    0 - Success
    1 - Request failed
    2 - Authentication rejected (401/403)
    3 - Invalid input (content shorter than 6 characters, unknown type)
"#)]
struct Cli {
    /// Content to post (reads from stdin if not provided)
    content: Option<String>,

    /// Integration ID to post to (see `pz-fetch integrations`)
    #[arg(short, long, env = "POSTIZ_INTEGRATION")]
    integration: String,

    /// Post type: draft, schedule or now
    #[arg(short = 't', long = "type", default_value = "now")]
    post_type: String,

    /// Publish date in ISO 8601 (defaults to now)
    #[arg(short, long, value_name = "DATE")]
    date: Option<String>,

    /// Media URL to attach (repeatable, kept in order)
    #[arg(short, long = "media", value_name = "URL")]
    media: Vec<String>,

    /// Ask the service to shorten links
    #[arg(long)]
    short_link: bool,

    /// Output format
    #[arg(short, long, default_value = "text", value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
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

async fn run(cli: Cli) -> Result<()> {
    let content = resolve_content(cli.content)?;

    let request = CreatePostRequest {
        content,
        integration_id: cli.integration,
        post_type: cli.post_type,
        publish_date: cli.date,
        media_urls: cli.media,
        short_link: cli.short_link,
    };

    // Reject bad input before touching configuration or the network
    PostBatch::from_request(&request)?;

    let config = Config::load()?;
    let client = PostizClient::from_config(&config)?;
    let data = client.create_post(&request).await?;

    match cli.format.as_str() {
        "json" => println!("{}", pretty(&data)),
        _ => println!("{}", render_text(&data)),
    }

    Ok(())
}

fn resolve_content(arg: Option<String>) -> Result<String> {
    if let Some(content) = arg {
        return Ok(content);
    }

    if atty::is(atty::Stream::Stdin) {
        return Err(PostizError::InvalidInput(
            "No content provided. Pass it as an argument or pipe it on stdin".to_string(),
        ));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| PostizError::InvalidInput(format!("Failed to read stdin: {}", e)))?;
    Ok(buffer.trim_end_matches(&['\n', '\r'][..]).to_string())
}

/// One `integration:postId` line per created post
fn render_text(data: &Value) -> String {
    match data {
        Value::Array(items) if items.iter().all(|i| i.get("postId").is_some()) => items
            .iter()
            .map(|item| {
                format!(
                    "{}:{}",
                    item.get("integration").and_then(Value::as_str).unwrap_or("unknown"),
                    item.get("postId").and_then(Value::as_str).unwrap_or_default()
                )
            })
            .collect::<Vec<_>>()
            .join("\n"),
        other => pretty(other),
    }
}

fn pretty(data: &Value) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_text_lists_post_ids() {
        let data = json!([
            {"postId": "p1", "integration": "int-a"},
            {"postId": "p2", "integration": "int-b"}
        ]);
        assert_eq!(render_text(&data), "int-a:p1\nint-b:p2");
    }

    #[test]
    fn test_render_text_falls_back_to_json() {
        let data = json!({"status": "queued"});
        assert!(render_text(&data).contains("\"status\": \"queued\""));
    }

    #[test]
    fn test_explicit_content_wins() {
        assert_eq!(
            resolve_content(Some("Hello there".to_string())).unwrap(),
            "Hello there"
        );
    }
}
