use clap::Parser;
use colored::Colorize;
use std::process;

use mackerel_api_core::action::{self, ApiResponse, ErrorHandlers};
use mackerel_api_core::params::{ApiParams, DEFAULT_SERVER_URL};

mod reqwest_client;

/// mackerel-api — Call a Mackerel API endpoint and get the JSON response
#[derive(Parser, Debug)]
#[command(
    name = "mackerel-api",
    version,
    about = "Call a Mackerel API endpoint and get the resulting JSON response"
)]
struct Cli {
    /// Base URL of the Mackerel API server
    #[arg(long, env = "FL_MACKEREL_API_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,

    /// Mackerel API key
    #[arg(long, env = "FL_MACKEREL_API_KEY", hide_env_values = true)]
    api_key: String,

    /// HTTP method (GET, POST, PUT, DELETE, HEAD, CONNECT, PATCH)
    #[arg(short, long, default_value = "GET")]
    method: String,

    /// Endpoint path relative to the server URL (e.g. api/v0/org)
    #[arg(short, long)]
    path: Option<String>,

    /// Full endpoint URL, used when no path is given
    #[arg(long, env = "FL_MACKEREL_API_URL")]
    url: Option<String>,

    /// JSON request body
    #[arg(short, long)]
    body: Option<String>,

    /// Verbatim request body, sent untouched (wins over --body)
    #[arg(long)]
    raw_body: Option<String>,

    /// Additional header as "Key: Value"; may be repeated
    #[arg(short = 'H', long = "header")]
    headers: Vec<String>,

    /// Skip TLS certificate verification (accepts self-signed certificates)
    #[arg(long)]
    no_tls_verify: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Report non-2xx responses instead of failing
    #[arg(long)]
    allow_failure: bool,

    /// Print the MACKEREL_API_* output keys after the response
    #[arg(long)]
    outputs: bool,

    /// Show verbose output (request line, redacted headers)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut overrides = Vec::new();
    for raw in &cli.headers {
        match raw.split_once(':') {
            Some((name, value)) => {
                overrides.push((name.trim().to_string(), value.trim().to_string()))
            }
            None => {
                eprintln!(
                    "{} Invalid header '{}': expected \"Key: Value\"",
                    "✖".red().bold(),
                    raw.bold()
                );
                process::exit(1);
            }
        }
    }

    // A --body value that is not valid JSON is passed through as a JSON
    // string, so the core validator rejects it with a proper error.
    let body = cli.body.as_ref().map(|text| {
        serde_json::from_str(text).unwrap_or_else(|_| serde_json::Value::String(text.clone()))
    });

    let params = ApiParams {
        server_url: Some(cli.server_url.clone()),
        api_key: Some(cli.api_key.clone()),
        http_method: Some(cli.method.clone()),
        path: cli.path.clone(),
        url: cli.url.clone(),
        body,
        raw_body: cli.raw_body.clone(),
        headers: overrides,
        tls_verify: !cli.no_tls_verify,
        timeout: cli.timeout,
    };

    let mut handlers = ErrorHandlers::new();
    if cli.allow_failure {
        handlers.on_any(|response: &ApiResponse| {
            eprintln!(
                "{} Endpoint returned status {}, continuing",
                "!".yellow().bold(),
                response.status
            );
        });
    }

    let client = reqwest_client::ReqwestClient::new();
    let response = match action::run(&client, &params, &mut handlers, None, cli.verbose) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {}", "✖".red().bold(), e);
            process::exit(1);
        }
    };

    print_response(&response);

    if cli.outputs {
        for (key, value) in response.outputs() {
            println!("{}={}", key, value);
        }
    }
}

fn print_response(response: &ApiResponse) {
    let status = response.status;
    let status_colored = if response.is_success() {
        format!("{}", status).green().bold()
    } else if (400..500).contains(&status) {
        format!("{}", status).yellow().bold()
    } else if (500..600).contains(&status) {
        format!("{}", status).red().bold()
    } else {
        format!("{}", status).white().bold()
    };

    println!("{} {}", "Status:".dimmed(), status_colored);

    if response.body.is_empty() {
        return;
    }

    println!("{}", "Response Body:".dimmed());
    // Try to pretty-print JSON bodies
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(&response.body) {
        let pretty =
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| response.body.clone());
        for line in pretty.lines() {
            println!("  {}", line);
        }
    } else {
        // Limit output for very large responses
        let max_lines = 50;
        let lines: Vec<&str> = response.body.lines().collect();
        for line in lines.iter().take(max_lines) {
            println!("  {}", line);
        }
        if lines.len() > max_lines {
            println!(
                "  {}",
                format!("... ({} more lines)", lines.len() - max_lines).dimmed()
            );
        }
    }
}
