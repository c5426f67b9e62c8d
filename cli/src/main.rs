//! Command-line access to the page persistence API and draft tokens.
//!
//! `page` and `component` talk to a running server over REST. `draft` works
//! offline: it encodes an overlay file into a share token, decodes a token
//! back to JSON, or builds a complete share link.


use std::fs;
use std::time::Duration;

use blocks::rest::{self, BulkReorder, ComponentPatch, NewComponent, NewPage, OrderUpdate};
use blocks::{ComponentId, Overlay, Page, PageComponentRow, ReorderItem, draft};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid page key `{0}`")]
    InvalidPageKey(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("component data must be a JSON object")]
    NotAnObject,
    #[error("could not read {path}: {source}")]
    ReadFile { path: String, source: std::io::Error },
    #[error("pass --data or --file")]
    MissingInput,
    #[error(transparent)]
    Draft(#[from] blocks::DraftError),
}

#[derive(Parser, Debug)]
#[command(name = "livepage-cli", about = "Page builder API and draft-link CLI")]
struct Cli {
    #[arg(long, env = "LIVEPAGE_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, default_value_t = 10, help = "Request timeout in seconds")]
    timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    timeout: Duration,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    Page(PageCommand),
    Component(ComponentCommand),
    Draft(DraftCommand),
}

#[derive(Args, Debug)]
struct PageCommand {
    #[command(subcommand)]
    command: PageSubcommand,
}

#[derive(Subcommand, Debug)]
enum PageSubcommand {
    List,
    Create {
        key: String,
    },
    Delete {
        key: String,
    },
    /// Print the page's components in display order.
    Show {
        key: String,
        #[arg(long, help = "Include inactive components")]
        all: bool,
        #[arg(long, help = "Lay a draft token over the stored rows")]
        draft: Option<String>,
    },
}

#[derive(Args, Debug)]
struct ComponentCommand {
    #[command(subcommand)]
    command: ComponentSubcommand,
}

#[derive(Subcommand, Debug)]
enum ComponentSubcommand {
    Add {
        page_key: String,
        component_type: String,
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        order: Option<i64>,
        #[arg(long)]
        inactive: bool,
    },
    Patch {
        id: ComponentId,
        #[arg(long = "type")]
        component_type: Option<String>,
        #[arg(long)]
        data: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete {
        id: ComponentId,
    },
    /// Set one component's order value.
    Move {
        id: ComponentId,
        order: i64,
    },
    /// Renumber a page `0..n`: the given ids first, in that sequence, then
    /// the remaining components in their current order.
    Reorder {
        page_key: String,
        #[arg(required = true)]
        ids: Vec<ComponentId>,
    },
}

#[derive(Args, Debug)]
struct DraftCommand {
    #[command(subcommand)]
    command: DraftSubcommand,
}

#[derive(Args, Debug)]
struct OverlayInput {
    #[arg(long, conflicts_with = "file", help = "Overlay JSON: {\"<id>\": {<fields>}}")]
    data: Option<String>,
    #[arg(long, help = "Path to an overlay JSON file")]
    file: Option<String>,
}

#[derive(Subcommand, Debug)]
enum DraftSubcommand {
    Encode(OverlayInput),
    Decode {
        token: String,
    },
    /// Build a share link from a preview URL and an overlay.
    Link {
        preview_url: String,
        #[command(flatten)]
        input: OverlayInput,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let ctx = CliContext { base_url: cli.base_url, timeout: Duration::from_secs(cli.timeout) };

    let result = match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Page(page) => run_page(&ctx, page).await,
        Command::Component(component) => run_component(&ctx, component).await,
        Command::Draft(command) => run_draft(command),
    };
    if let Err(error) = result {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

async fn run_ping(cli: &CliContext) -> Result<(), CliError> {
    let client = reqwest::Client::builder().timeout(cli.timeout).build()?;
    let response = client.get(api_url(&cli.base_url, "/healthz")).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_page(cli: &CliContext, page: PageCommand) -> Result<(), CliError> {
    match page.command {
        PageSubcommand::List => {
            let json = api_request(cli, reqwest::Method::GET, rest::PAGES_PATH, None).await?;
            print_json(&json)
        }
        PageSubcommand::Create { key } => {
            let key = checked_key(key)?;
            let body = serde_json::to_value(NewPage { key })?;
            let json = api_request(cli, reqwest::Method::POST, rest::PAGES_PATH, Some(body)).await?;
            print_json(&json)
        }
        PageSubcommand::Delete { key } => {
            let key = checked_key(key)?;
            api_request(cli, reqwest::Method::DELETE, &rest::page_path(&key), None).await?;
            println!("deleted {key}");
            Ok(())
        }
        PageSubcommand::Show { key, all, draft } => {
            let key = checked_key(key)?;
            let json = api_request(cli, reqwest::Method::GET, &rest::page_components_path(&key), None).await?;
            let rows: Vec<PageComponentRow> = serde_json::from_value(json)?;
            let overlay = match draft.as_deref() {
                Some(token) => draft::decode(token)?,
                None => Overlay::default(),
            };
            print_json(&serde_json::to_value(display_rows(&key, rows, &overlay, all))?)
        }
    }
}

async fn run_component(cli: &CliContext, component: ComponentCommand) -> Result<(), CliError> {
    match component.command {
        ComponentSubcommand::Add { page_key, component_type, data, order, inactive } => {
            let body = NewComponent {
                page_key: checked_key(page_key)?,
                component_type,
                component_order: order,
                component_data: data.as_deref().map(parse_object).transpose()?,
                is_active: inactive.then_some(false),
            };
            let json =
                api_request(cli, reqwest::Method::POST, rest::COMPONENTS_PATH, Some(serde_json::to_value(body)?))
                    .await?;
            print_json(&json)
        }
        ComponentSubcommand::Patch { id, component_type, data, active } => {
            let patch = ComponentPatch {
                component_type,
                component_data: data.as_deref().map(parse_object).transpose()?,
                is_active: active,
            };
            let json =
                api_request(cli, reqwest::Method::PATCH, &rest::component_path(id), Some(serde_json::to_value(patch)?))
                    .await?;
            print_json(&json)
        }
        ComponentSubcommand::Delete { id } => {
            api_request(cli, reqwest::Method::DELETE, &rest::component_path(id), None).await?;
            println!("deleted {id}");
            Ok(())
        }
        ComponentSubcommand::Move { id, order } => {
            let body = serde_json::to_value(OrderUpdate { order })?;
            let json = api_request(cli, reqwest::Method::PATCH, &rest::component_order_path(id), Some(body)).await?;
            print_json(&json)
        }
        ComponentSubcommand::Reorder { page_key, ids } => {
            let page_key = checked_key(page_key)?;
            let json = api_request(cli, reqwest::Method::GET, &rest::page_components_path(&page_key), None).await?;
            let rows: Vec<PageComponentRow> = serde_json::from_value(json)?;
            let body = serde_json::to_value(reorder_body(page_key, &ids, rows))?;
            let json = api_request(cli, reqwest::Method::POST, rest::BULK_REORDER_PATH, Some(body)).await?;
            print_json(&json)
        }
    }
}

fn run_draft(command: DraftCommand) -> Result<(), CliError> {
    match command.command {
        DraftSubcommand::Encode(input) => {
            println!("{}", draft::encode(&read_overlay(&input)?));
            Ok(())
        }
        DraftSubcommand::Decode { token } => print_json(&serde_json::to_value(draft::decode(&token)?)?),
        DraftSubcommand::Link { preview_url, input } => {
            println!("{}", draft::share_link(&preview_url, &read_overlay(&input)?));
            Ok(())
        }
    }
}

fn api_url(base_url: &str, path: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), path)
}

async fn api_request(
    cli: &CliContext,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::builder().timeout(cli.timeout).build()?;
    let request = client.request(method, api_url(&cli.base_url, path));
    let request = if let Some(json) = body { request.json(&json) } else { request };

    let response = request.send().await?;
    let status = response.status();
    let value = response.json::<Value>().await.unwrap_or(Value::Null);

    if !status.is_success() {
        return Err(CliError::Server { status: status.as_u16(), message: error_message(&value) });
    }
    Ok(value)
}

/// `message` of a JSON error body, else the whole body.
fn error_message(body: &Value) -> String {
    body.get("message")
        .and_then(Value::as_str)
        .map_or_else(|| body.to_string(), str::to_owned)
}

fn checked_key(key: String) -> Result<String, CliError> {
    if rest::is_valid_page_key(&key) { Ok(key) } else { Err(CliError::InvalidPageKey(key)) }
}

fn parse_object(raw: &str) -> Result<Value, CliError> {
    let value = serde_json::from_str::<Value>(raw)?;
    if value.is_object() { Ok(value) } else { Err(CliError::NotAnObject) }
}

fn read_overlay(input: &OverlayInput) -> Result<Overlay, CliError> {
    let raw = match (&input.data, &input.file) {
        (Some(data), _) => data.clone(),
        (None, Some(path)) => {
            fs::read_to_string(path).map_err(|source| CliError::ReadFile { path: path.clone(), source })?
        }
        (None, None) => return Err(CliError::MissingInput),
    };
    Ok(serde_json::from_str(&raw)?)
}

/// Rows in display order. Without `all`, this is exactly what the preview
/// renders: active components only, with the overlay merged in.
fn display_rows(page_key: &str, rows: Vec<PageComponentRow>, overlay: &Overlay, all: bool) -> Vec<PageComponentRow> {
    let page = Page::from_rows(page_key, rows);
    let components = if all {
        let mut every: Vec<_> = page.components.iter().map(|c| overlay.merged(c)).collect();
        every.sort_by_key(|c| c.order);
        every
    } else {
        page.effective_list(overlay)
    };
    components
        .into_iter()
        .map(|c| PageComponentRow::from_component(Some(page_key.to_owned()), c))
        .collect()
}

/// `ids` first, then every other component of `rows` in display order,
/// numbered from zero.
fn reorder_body(page_key: String, ids: &[ComponentId], rows: Vec<PageComponentRow>) -> BulkReorder {
    let rest = Page::from_rows(page_key.as_str(), rows)
        .reorder_items()
        .into_iter()
        .map(|item| item.id)
        .filter(|id| !ids.contains(id));
    let mut sequence: Vec<ComponentId> = Vec::new();
    for id in ids.iter().copied().chain(rest) {
        if !sequence.contains(&id) {
            sequence.push(id);
        }
    }
    let items = sequence.into_iter().zip(0_i64..).map(|(id, order)| ReorderItem { id, order }).collect();
    BulkReorder { page_key, items }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
