use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser, ValueEnum};
use clap_complete::Shell;
use std::collections::{BTreeMap, HashSet};
use std::io::{self, Write};
use wakedock_views::collection::parse_time_bound;
use wakedock_views::domain::{Alert, HealthCheck, LogEntry, Notification, Service};
use wakedock_views::format::format_row;
use wakedock_views::{
    BulkAction, Identified, ItemKind, ListView, Listable, Message, QueryCondition, SearchMode,
    SortDirection, SortSpec, TimeWindow, load_items, logging, parse_query,
};

#[derive(Parser)]
#[command(
    name = "wdv",
    version,
    about = "Filter, sort and select WakeDock dashboard collections",
    long_about = None
)]
struct Cli {
    /// JSON array, API envelope or JSON Lines file; `-` reads stdin
    #[arg(required_unless_present_any = ["help_query", "completions"])]
    file: Option<String>,

    /// Kind of item in the source collection
    #[arg(
        short,
        long,
        value_enum,
        env = "WDV_KIND",
        required_unless_present_any = ["help_query", "completions"]
    )]
    kind: Option<ItemKind>,

    /// Free-text search over the kind's text fields (case-insensitive)
    #[arg(short, long)]
    search: Option<String>,

    /// Treat --search as a query expression (AND/OR/NOT, quotes, /regex/)
    #[arg(short, long)]
    expr: bool,

    /// Enum filter, e.g. `level=error,fatal` (repeatable)
    #[arg(short = 'F', long = "filter", value_name = "DIM=V1,V2")]
    filters: Vec<String>,

    /// Only items at or after this time (RFC3339, date, epoch ms or "2 hours ago")
    #[arg(long)]
    after: Option<String>,

    /// Only items at or before this time
    #[arg(long)]
    before: Option<String>,

    /// Sort key (default depends on --kind)
    #[arg(long)]
    sort: Option<String>,

    /// Sort ascending
    #[arg(long, conflicts_with = "desc")]
    asc: bool,

    /// Sort descending
    #[arg(long)]
    desc: bool,

    /// Maximum number of items to print
    #[arg(short = 'n', long, env = "WDV_MAX_RESULTS")]
    max_results: Option<usize>,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "text", env = "WDV_FORMAT")]
    format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Select an item by id (repeatable)
    #[arg(long = "select", value_name = "ID")]
    select: Vec<String>,

    /// Select every visible item
    #[arg(long)]
    select_all: bool,

    /// Emit bulk action requests for the selection instead of listing items
    #[arg(long)]
    action: Option<String>,

    /// Emit one request per selected id
    #[arg(long, requires = "action")]
    per_item: bool,

    /// Show query syntax help
    #[arg(long)]
    help_query: bool,

    /// Print shell completions
    #[arg(long, value_enum, value_name = "SHELL")]
    completions: Option<Shell>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    #[value(name = "jsonl")]
    JsonL,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_tracing(cli.verbose);

    if cli.help_query {
        print_query_help();
        return Ok(());
    }

    if let Some(shell) = cli.completions {
        clap_complete::generate(shell, &mut Cli::command(), "wdv", &mut io::stdout());
        return Ok(());
    }

    let kind = cli.kind.ok_or_else(|| anyhow!("--kind is required"))?;
    match kind {
        ItemKind::Services => run::<Service>(&cli),
        ItemKind::Logs => run::<LogEntry>(&cli),
        ItemKind::Alerts => run::<Alert>(&cli),
        ItemKind::Health => run::<HealthCheck>(&cli),
        ItemKind::Notifications => run::<Notification>(&cli),
    }
}

fn run<T: Listable>(cli: &Cli) -> Result<()> {
    let path = cli
        .file
        .as_deref()
        .ok_or_else(|| anyhow!("Input file argument is required"))?;

    let mut view = ListView::new(T::view_config());
    let sort = sort_spec(cli, view.sort());
    view.config().validate_sort(&sort)?;

    for message in filter_messages(cli)? {
        view.update(message);
    }
    view.config().validate_criteria(view.criteria())?;
    view.update(Message::SetSort(sort));
    view.update(Message::SourceLoaded(load_items::<T>(path)?));

    if let Some(err) = view.query_error() {
        eprintln!("Error parsing query: {err}");
        eprintln!("Use --help-query for query syntax help");
        std::process::exit(1);
    }

    if cli.verbose {
        eprintln!("Loaded {} {} from {path}", view.total_count(), T::KIND.as_str());
        eprintln!("Criteria: {:?}", view.criteria());
        eprintln!("Sort: {:?}", view.sort());
    }

    if cli.select_all {
        view.update(Message::SelectAllVisible);
    }
    let (to_select, unknown) = partition_selection(&view, &cli.select);
    for id in unknown {
        eprintln!("Ignoring --select '{id}': no such item in {}", T::KIND.as_str());
    }
    for id in to_select {
        view.update(Message::ToggleSelection(id.to_string()));
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    if let Some(name) = &cli.action {
        if !T::ACTIONS.contains(&name.as_str()) {
            if T::ACTIONS.is_empty() {
                bail!("{} have no actions", T::KIND.as_str());
            }
            bail!(
                "Unknown action '{name}' for {} (expected one of: {})",
                T::KIND.as_str(),
                T::ACTIONS.join(", ")
            );
        }
        let action = if cli.per_item {
            BulkAction::per_item(name.as_str())
        } else {
            BulkAction::batch(name.as_str())
        };
        if view.selection().is_empty() {
            eprintln!("No items selected; nothing to do");
            return Ok(());
        }

        let calls = view.perform_bulk_action(&action, |ids| {
            let request = serde_json::json!({ "action": action.name, "ids": ids });
            serde_json::to_writer(&mut handle, &request).map_err(io::Error::from)?;
            writeln!(&mut handle)
        })?;
        eprintln!("{}: {calls} request(s)", action.name);
        return Ok(());
    }

    let shown: Vec<&T> = view
        .visible()
        .take(cli.max_results.unwrap_or(usize::MAX))
        .collect();

    match cli.format {
        OutputFormat::Text => {
            if shown.is_empty() {
                println!("No items found.");
            } else {
                println!("Found {} {}:\n", view.visible_count(), T::KIND.as_str());
                let highlight = highlight_condition(&view);
                let with_selection = !view.selection().is_empty();
                for item in &shown {
                    let selected = with_selection.then(|| view.is_selected(item.id()));
                    let line = format_row(
                        item.id(),
                        &item.summary(),
                        selected,
                        !cli.no_color,
                        highlight.as_ref(),
                    );
                    writeln!(&mut handle, "{line}")?;
                }

                if view.visible_count() > shown.len() {
                    eprintln!(
                        "\n(Showing {} of {} matching items, {} total)",
                        shown.len(),
                        view.visible_count(),
                        view.total_count()
                    );
                } else {
                    eprintln!(
                        "\n({} of {} items match)",
                        view.visible_count(),
                        view.total_count()
                    );
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "items": shown,
                "total_count": view.total_count(),
                "visible_count": view.visible_count(),
                "returned_count": shown.len(),
            });
            serde_json::to_writer_pretty(&mut handle, &output)?;
            writeln!(&mut handle)?;
        }
        OutputFormat::JsonL => {
            for item in &shown {
                serde_json::to_writer(&mut handle, item)?;
                writeln!(&mut handle)?;
            }
            let metadata = serde_json::json!({
                "_metadata": {
                    "total_count": view.total_count(),
                    "visible_count": view.visible_count(),
                    "returned_count": shown.len(),
                }
            });
            serde_json::to_writer(&mut handle, &metadata)?;
            writeln!(&mut handle)?;
        }
    }

    Ok(())
}

/// Messages that put the command-line criteria into a fresh view.
fn filter_messages<T>(cli: &Cli) -> Result<Vec<Message<T>>> {
    let mut messages = Vec::new();

    if cli.expr {
        messages.push(Message::ToggleSearchMode);
    }
    if let Some(search) = &cli.search {
        messages.push(Message::QueryChanged(search.clone()));
    }

    let mut dimensions: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for arg in &cli.filters {
        let (dimension, values) = parse_filter_arg(arg)?;
        dimensions.entry(dimension).or_default().extend(values);
    }
    for (dimension, values) in dimensions {
        messages.push(Message::SetFilter { dimension, values });
    }

    let window = TimeWindow {
        after: bound(cli.after.as_deref(), "--after")?,
        before: bound(cli.before.as_deref(), "--before")?,
    };
    if !window.is_unbounded() {
        messages.push(Message::SetTimeWindow(Some(window)));
    }

    Ok(messages)
}

fn bound(value: Option<&str>, flag: &str) -> Result<Option<i64>> {
    value
        .map(|v| parse_time_bound(v).with_context(|| format!("Invalid {flag} value")))
        .transpose()
}

/// Splits `DIM=V1,V2` into the dimension and its non-empty values.
fn parse_filter_arg(arg: &str) -> Result<(String, Vec<String>)> {
    let (dimension, values) = arg
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid filter '{arg}': expected DIM=VALUE[,VALUE...]"))?;
    let dimension = dimension.trim();
    if dimension.is_empty() {
        bail!("Invalid filter '{arg}': missing dimension name");
    }
    let values = values
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect();
    Ok((dimension.to_string(), values))
}

/// Splits requested ids into those still to select and those absent from
/// the source. Repeated or already selected ids are dropped.
fn partition_selection<'a, T: Identified>(
    view: &ListView<T>,
    requested: &'a [String],
) -> (Vec<&'a str>, Vec<&'a str>) {
    let known: HashSet<&str> = view.source().iter().map(Identified::id).collect();
    let mut seen = HashSet::new();
    let mut to_select = Vec::new();
    let mut unknown = Vec::new();
    for id in requested.iter().map(String::as_str) {
        if !seen.insert(id) {
            continue;
        }
        if !known.contains(id) {
            unknown.push(id);
        } else if !view.is_selected(id) {
            to_select.push(id);
        }
    }
    (to_select, unknown)
}

fn sort_spec(cli: &Cli, default: &SortSpec) -> SortSpec {
    let key = cli.sort.clone().unwrap_or_else(|| default.key.clone());
    let direction = if cli.asc {
        SortDirection::Ascending
    } else if cli.desc {
        SortDirection::Descending
    } else if key.eq_ignore_ascii_case(&default.key) {
        default.direction
    } else {
        SortDirection::Descending
    };
    SortSpec::new(key, direction)
}

fn highlight_condition<T: Identified>(view: &ListView<T>) -> Option<QueryCondition> {
    let search = view.criteria().search.trim();
    if search.is_empty() {
        return None;
    }
    match view.criteria().search_mode {
        SearchMode::Expression => parse_query(search).ok(),
        SearchMode::Substring => Some(QueryCondition::Literal {
            pattern: search.to_string(),
            case_sensitive: false,
        }),
    }
}

fn print_query_help() {
    println!(
        r#"WakeDock View Query Syntax Help

FREE TEXT (--search):
  postgres               Substring match on any text field (case-insensitive)

EXPRESSIONS (--search ... --expr):
  hello                  Literal (case-insensitive)
  "hello world"          Quoted literal (preserves spaces)
  'hello world'          Single-quoted literal
  /time.?out/i           Regular expression with flags

OPERATORS:
  nginx AND error        Both terms must be present
  nginx OR traefik       Either term must be present
  NOT healthcheck        Term must not be present
  (web OR api) AND prod  Parentheses for grouping

REGEX FLAGS:
  i - Case insensitive
  m - Multi-line mode
  s - Dot matches newline

FILTERS (--filter DIM=V1,V2):
  services       status, stack
  logs           level, source
  alerts         severity, status, source
  health         status, category
  notifications  type, read

TIME WINDOW (--after / --before):
  2024-05-01T10:00:00Z, 2024-05-01, 1714557600000, "2 hours ago", yesterday

TIPS:
  - Filters on different dimensions are combined with AND
  - Values within one dimension are combined with OR
  - AND has higher precedence than OR
  - An invalid expression is reported instead of silently matching nothing"#
    );
}
