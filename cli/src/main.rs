use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand, ValueEnum};
use logs::{DateParts, Envelope, LogMetadata, LogPage, LogScope, LogSource, LogType, TimeError};
use review::csv::format_cell;
use review::pagination::PageButton;
use review::{Column, Dashboard, DateRange, FetchError, FetchOutcome, FetchRequest, log_columns};
use serde_json::Value;

/// Widest a table cell is printed before truncation.
const MAX_CELL_WIDTH: usize = 40;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid date `{0}`; expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("date error: {0}")]
    Time(#[from] TimeError),
    #[error("{title}: {text}")]
    Rejected { title: String, text: String },
    #[error("server returned {code}: {message}")]
    Server { message: String, code: String },
    #[error("session expired; check --token or LOG_REVIEW_TOKEN")]
    SessionExpired,
}

#[derive(Parser, Debug)]
#[command(name = "log-review", about = "Review, filter and export application logs")]
struct Cli {
    #[arg(long, env = "LOG_REVIEW_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "LOG_REVIEW_TOKEN")]
    token: Option<String>,

    /// Log requests and dashboard decisions to stderr.
    #[arg(long, short, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone)]
struct CliContext {
    base_url: String,
    token: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    /// Print one page as the raw response body.
    Fetch(PageArgs),
    /// Print one page as a sorted text table.
    Table(TableArgs),
    /// Write the visible columns of one page as CSV.
    Export(ExportArgs),
    /// List the days a date chooser would offer.
    Months(MonthsArgs),
}

#[derive(Args, Debug, Default)]
struct PageArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Restrict to one month; requires --month.
    #[arg(long, requires = "month")]
    year: Option<i32>,

    #[arg(long, requires = "year")]
    month: Option<u32>,

    #[arg(long, default_value = "Logs")]
    title: String,

    /// JSON file declaring contexts, tags, targets and actions.
    #[arg(long)]
    metadata: Option<PathBuf>,

    #[command(flatten)]
    filters: FilterArgs,
}

#[derive(Args, Debug, Default)]
struct FilterArgs {
    /// First day to include (YYYY-MM-DD). Defaults to the first of this month.
    #[arg(long)]
    from: Option<String>,

    /// Last day to include (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    to: Option<String>,

    /// Drop the date restriction.
    #[arg(long, conflicts_with_all = ["from", "to"])]
    all_dates: bool,

    /// Keep records carrying any of these tags.
    #[arg(long = "tag")]
    tags: Vec<String>,

    /// Deselect a context or `context/subcontext`.
    #[arg(long = "exclude-context")]
    exclude_contexts: Vec<String>,

    #[arg(long, value_enum)]
    log_type: Option<LogTypeArg>,

    #[arg(long)]
    error_message: Option<String>,

    #[arg(long)]
    error_code: Option<String>,

    /// Deselect an action in the action checklist.
    #[arg(long = "exclude-action")]
    exclude_actions: Vec<String>,

    #[arg(long)]
    first_name: Option<String>,

    #[arg(long)]
    last_name: Option<String>,

    #[arg(long)]
    email: Option<String>,

    #[arg(long)]
    user_id: Option<String>,

    #[arg(long)]
    course_id: Option<String>,

    #[arg(long)]
    no_learners: bool,

    #[arg(long)]
    no_ttms: bool,

    #[arg(long)]
    no_admins: bool,

    #[arg(long)]
    mobile: Option<bool>,

    #[arg(long, value_enum)]
    source: Option<SourceArg>,

    #[arg(long)]
    route_path: Option<String>,

    #[arg(long)]
    route_template: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum LogTypeArg {
    Action,
    Error,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum SourceArg {
    Client,
    Server,
}

#[derive(Args, Debug, Default)]
struct TableArgs {
    #[command(flatten)]
    page: PageArgs,

    #[command(flatten)]
    view: ViewArgs,
}

#[derive(Args, Debug, Default)]
struct ViewArgs {
    /// Column param to sort by.
    #[arg(long)]
    sort: Option<String>,

    #[arg(long, requires = "sort")]
    desc: bool,

    /// Flip the visibility of a column by param.
    #[arg(long = "toggle-column")]
    toggle_columns: Vec<String>,
}

#[derive(Args, Debug, Default)]
struct ExportArgs {
    #[command(flatten)]
    page: PageArgs,

    #[command(flatten)]
    view: ViewArgs,

    /// Destination file. Defaults to `<title>.csv`.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print a `data:` URI instead of writing a file.
    #[arg(long, conflicts_with = "output")]
    data_uri: bool,
}

#[derive(Args, Debug)]
struct MonthsArgs {
    #[arg(long, default_value_t = 2)]
    count: usize,

    #[arg(long)]
    allow_past: bool,

    #[arg(long)]
    allow_today: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let level = if cli.verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt().with_writer(std::io::stderr).with_max_level(level).init();

    let ctx = CliContext { base_url: cli.base_url, token: cli.token };

    match cli.command {
        Command::Ping => run_ping(&ctx).await,
        Command::Fetch(args) => run_fetch(&ctx, args).await,
        Command::Table(args) => run_table(&ctx, args).await,
        Command::Export(args) => run_export(&ctx, args).await,
        Command::Months(args) => run_months(&args),
    }
}

async fn run_ping(ctx: &CliContext) -> Result<(), CliError> {
    let url = format!("{}/healthz", ctx.base_url.trim_end_matches('/'));
    let status = reqwest::Client::new().get(url).send().await?.status();
    if !status.is_success() {
        return Err(CliError::Server {
            message: "health check failed".to_owned(),
            code: format!("HTTP {}", status.as_u16()),
        });
    }
    println!("ok");
    Ok(())
}

async fn run_fetch(ctx: &CliContext, args: PageArgs) -> Result<(), CliError> {
    let dashboard = load_dashboard(ctx, &args).await?;
    let state = dashboard.state();
    let page = LogPage {
        items: state.logs.clone(),
        has_another_page: state.has_another_page,
        num_pages: Some(state.num_pages),
    };
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

async fn run_table(ctx: &CliContext, args: TableArgs) -> Result<(), CliError> {
    let mut dashboard = load_dashboard(ctx, &args.page).await?;
    apply_view(&mut dashboard, &args.view);
    print!("{}", render_table(&dashboard.visible_columns(), &dashboard.rows()));
    println!("{}", render_footer(&dashboard));
    Ok(())
}

async fn run_export(ctx: &CliContext, args: ExportArgs) -> Result<(), CliError> {
    let mut dashboard = load_dashboard(ctx, &args.page).await?;
    apply_view(&mut dashboard, &args.view);
    let export = dashboard.export_csv();
    if args.data_uri {
        println!("{}", export.data_uri());
        return Ok(());
    }
    let path = args.output.unwrap_or_else(|| PathBuf::from(&export.filename));
    tokio::fs::write(&path, export.contents.as_bytes()).await?;
    tracing::info!(path = %path.display(), rows = dashboard.rows().len(), "csv written");
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn run_months(args: &MonthsArgs) -> Result<(), CliError> {
    let today = DateParts::today_in_et();
    for month in logs::time::choosable_months(today, args.count, args.allow_past, args.allow_today)? {
        let days = month.days.iter().map(u32::to_string).collect::<Vec<_>>().join(" ");
        println!("{} {}: {days}", month.name.full, month.year);
    }
    Ok(())
}

// =============================================================================
// DASHBOARD DRIVER
// =============================================================================

/// Build a dashboard, apply the filter flags and perform the page fetch.
async fn load_dashboard(ctx: &CliContext, args: &PageArgs) -> Result<Dashboard, CliError> {
    let metadata = match &args.metadata {
        Some(path) => LogMetadata::from_json(&tokio::fs::read_to_string(path).await?)?,
        None => LogMetadata::default(),
    };
    let scope = match (args.year, args.month) {
        (Some(year), Some(month)) => LogScope::Month { year, month },
        _ => LogScope::All,
    };
    let mut dashboard = Dashboard::new(&args.title, log_columns(), &metadata, DateParts::today_in_et(), scope);

    apply_filters(&mut dashboard, &args.filters)?;
    if let Some(alert) = dashboard.notices().alert() {
        return Err(CliError::Rejected { title: alert.title.clone(), text: alert.text.clone() });
    }

    let client = reqwest::Client::new();
    let request = dashboard.request_page(args.page).ok_or(CliError::SessionExpired)?;
    let outcome = fetch(&client, ctx, &request).await;
    dashboard.complete_fetch(request.ticket, outcome);

    // Asked past the end: the count clamped the page, so load the last one.
    let state = dashboard.state();
    if state.page_number < args.page && state.logs.is_empty() && dashboard.notices().fatal().is_none() {
        tracing::debug!(requested = args.page, last = state.page_number, "page out of range");
        let request = dashboard.refresh().ok_or(CliError::SessionExpired)?;
        let outcome = fetch(&client, ctx, &request).await;
        dashboard.complete_fetch(request.ticket, outcome);
    }

    if dashboard.notices().session_expired() {
        return Err(CliError::SessionExpired);
    }
    if let Some(fatal) = dashboard.notices().fatal() {
        return Err(CliError::Server { message: fatal.message.clone(), code: fatal.code.clone() });
    }
    Ok(dashboard)
}

/// Push filter flags through the dashboard's setters. Each setter supersedes
/// the previous request; only the one issued afterwards is performed.
fn apply_filters(dashboard: &mut Dashboard, args: &FilterArgs) -> Result<(), CliError> {
    if args.all_dates {
        dashboard.set_date_range(None);
    } else if args.from.is_some() || args.to.is_some() {
        let current = dashboard.filters().date;
        let today = DateParts::today_in_et();
        let start = match &args.from {
            Some(raw) => parse_date(raw)?,
            None => current.map_or(today.first_of_month(), |range| range.start),
        };
        let end = match &args.to {
            Some(raw) => parse_date(raw)?,
            None => current.map_or(today, |range| range.end),
        };
        dashboard.set_date_range(Some(DateRange::new(start, end)));
    }

    if !args.tags.is_empty() {
        let mut tags = dashboard.filters().tags.clone();
        for tag in &args.tags {
            tags.insert(tag.clone(), true);
        }
        dashboard.set_tags(tags);
    }

    if !args.exclude_contexts.is_empty() {
        let mut context = dashboard.filters().context.clone();
        for raw in &args.exclude_contexts {
            let path = raw.split('/').collect::<Vec<_>>();
            context = context.with_checked(&path, false);
        }
        dashboard.set_context(context);
    }

    let mut action_error = dashboard.filters().action_error.clone();
    action_error.log_type = args.log_type.map(|t| match t {
        LogTypeArg::Action => LogType::Action,
        LogTypeArg::Error => LogType::Error,
    });
    if let Some(message) = &args.error_message {
        action_error.error_message.clone_from(message);
    }
    if let Some(code) = &args.error_code {
        action_error.error_code.clone_from(code);
    }
    for action in &args.exclude_actions {
        action_error.action.insert(action.clone(), false);
    }
    if action_error != dashboard.filters().action_error {
        dashboard.set_action_error(action_error);
    }

    let mut advanced = dashboard.filters().advanced.clone();
    let text_fields = [
        (&args.first_name, &mut advanced.user_first_name),
        (&args.last_name, &mut advanced.user_last_name),
        (&args.email, &mut advanced.user_email),
        (&args.user_id, &mut advanced.user_id),
        (&args.course_id, &mut advanced.course_id),
        (&args.route_path, &mut advanced.route_path),
        (&args.route_template, &mut advanced.route_template),
    ];
    for (flag, field) in text_fields {
        if let Some(value) = flag {
            field.clone_from(value);
        }
    }
    advanced.include_learners &= !args.no_learners;
    advanced.include_ttms &= !args.no_ttms;
    advanced.include_admins &= !args.no_admins;
    advanced.is_mobile = args.mobile.or(advanced.is_mobile);
    if let Some(source) = args.source {
        advanced.source = Some(match source {
            SourceArg::Client => LogSource::Client,
            SourceArg::Server => LogSource::Server,
        });
    }
    if advanced != dashboard.filters().advanced {
        dashboard.set_advanced(advanced);
    }
    Ok(())
}

fn apply_view(dashboard: &mut Dashboard, args: &ViewArgs) {
    if let Some(param) = &args.sort {
        dashboard.click_sort(param);
        if args.desc {
            dashboard.click_sort(param);
        }
    }
    for param in &args.toggle_columns {
        dashboard.toggle_column(param);
    }
}

/// Perform one page request. Transport failures and unreadable bodies are
/// network failures; failure envelopes keep their server code.
async fn fetch(client: &reqwest::Client, ctx: &CliContext, request: &FetchRequest) -> FetchOutcome {
    let url = page_url(&ctx.base_url, request.scope);
    tracing::debug!(%url, page = request.query.page_number, ticket = ?request.ticket, "fetching log page");

    let mut builder = client.get(&url).query(&request.query);
    if let Some(token) = &ctx.token {
        builder = builder.bearer_auth(token);
    }
    let response = builder.send().await.map_err(|e| FetchError::Network(e.to_string()))?;
    let status = response.status();
    let envelope = response.json::<Envelope<LogPage>>().await.map_err(|e| {
        FetchError::Network(format!("unreadable response (HTTP {}): {e}", status.as_u16()))
    })?;
    envelope.into_result().map_err(FetchError::from)
}

fn page_url(base_url: &str, scope: LogScope) -> String {
    format!("{}/api/admin{}", base_url.trim_end_matches('/'), scope.path())
}

// =============================================================================
// RENDERING
// =============================================================================

fn parse_date(raw: &str) -> Result<DateParts, CliError> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| CliError::InvalidDate(raw.to_owned()))?;
    Ok(DateParts::new(date.year(), date.month(), date.day()))
}

fn render_table(columns: &[&Column], rows: &[Value]) -> String {
    let cells = rows
        .iter()
        .map(|row| {
            columns
                .iter()
                .map(|c| truncate(&format_cell(review::table::value_at(row, &c.param), c.kind)))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    let widths = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].chars().count())
                .chain([c.title.chars().count()])
                .max()
                .unwrap_or(0)
        })
        .collect::<Vec<_>>();

    let mut out = String::new();
    let header = columns.iter().map(|c| c.title.clone()).collect::<Vec<_>>();
    for line in std::iter::once(&header).chain(cells.iter()) {
        let padded = line
            .iter()
            .zip(widths.iter().copied())
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>();
        let _ = writeln!(out, "{}", padded.join("  ").trim_end());
    }
    out
}

fn truncate(cell: &str) -> String {
    let single_line = cell.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= MAX_CELL_WIDTH {
        return single_line;
    }
    let mut cut = single_line.chars().take(MAX_CELL_WIDTH - 1).collect::<String>();
    cut.push('…');
    cut
}

fn render_footer(dashboard: &Dashboard) -> String {
    let state = dashboard.state();
    let buttons = dashboard
        .page_buttons()
        .into_iter()
        .map(|button| match button {
            PageButton::Page(n) if n == state.page_number => format!("[{n}]"),
            PageButton::Page(n) => n.to_string(),
            PageButton::Ellipsis => "…".to_owned(),
        })
        .collect::<Vec<_>>()
        .join(" ");
    let more = if state.has_another_page { ", more available" } else { "" };
    format!("page {} of {}{more}  {buttons}", state.page_number, state.num_pages)
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
