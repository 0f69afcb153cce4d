use codspeed_criterion_compat::{BenchmarkId, black_box};
use codspeed_criterion_compat::{Criterion, criterion_group, criterion_main};
use std::io::Write;
use tempfile::NamedTempFile;
use wakedock_views::domain::LogEntry;
use wakedock_views::{
    FilterCriteria, Listable, ListView, Message, SearchMode, SortSpec, load_items, visible,
};

const LEVELS: [&str; 5] = ["debug", "info", "warn", "error", "fatal"];
const SOURCES: [&str; 4] = ["nginx", "postgres", "redis", "api"];

fn create_log_entries(count: usize) -> Vec<LogEntry> {
    let records: Vec<_> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": format!("log-{i}"),
                "timestamp": format!("2024-01-01T{:02}:{:02}:{:02}Z", (i / 3600) % 24, (i / 60) % 60, i % 60),
                "level": LEVELS[i % LEVELS.len()],
                "source": SOURCES[i % SOURCES.len()],
                "message": format!("request {i} finished with status {}", 200 + (i % 5) * 100),
            })
        })
        .collect();
    serde_json::from_value(serde_json::Value::Array(records)).unwrap()
}

fn benchmark_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let config = LogEntry::view_config();
    let criteria = FilterCriteria::new()
        .with_search("status 500")
        .with_values("level", ["error", "fatal"]);
    let sort = SortSpec::descending("timestamp");

    for size in [1_000, 10_000, 100_000].iter() {
        let entries = create_log_entries(*size);

        group.bench_with_input(BenchmarkId::new("filter_sort", size), size, |b, _| {
            b.iter(|| {
                let shown = visible(&entries, &config, black_box(&criteria), &sort).unwrap();
                black_box(shown.len());
            });
        });
    }

    group.finish();
}

fn benchmark_sort_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("sort_keys");
    let config = LogEntry::view_config();
    let entries = create_log_entries(10_000);
    let criteria = FilterCriteria::new();

    for key in ["timestamp", "level", "source"] {
        let sort = SortSpec::descending(key);
        group.bench_with_input(BenchmarkId::new("sort", key), &sort, |b, sort| {
            b.iter(|| {
                let shown = visible(&entries, &config, &criteria, black_box(sort)).unwrap();
                black_box(shown.len());
            });
        });
    }

    group.finish();
}

fn benchmark_expression_query(c: &mut Criterion) {
    let config = LogEntry::view_config();
    let entries = create_log_entries(10_000);
    let criteria = FilterCriteria::new()
        .with_mode(SearchMode::Expression)
        .with_search("(postgres OR redis) AND NOT /status [2-3]00/");
    let sort = SortSpec::descending("level");

    c.bench_function("expression_query_10000", |b| {
        b.iter(|| {
            let shown = visible(&entries, &config, black_box(&criteria), &sort).unwrap();
            black_box(shown.len());
        });
    });
}

fn benchmark_view_updates(c: &mut Criterion) {
    let entries = create_log_entries(10_000);
    let mut view = ListView::with_source(LogEntry::view_config(), entries);

    c.bench_function("view_query_changed_10000", |b| {
        let mut flip = false;
        b.iter(|| {
            flip = !flip;
            let query = if flip { "postgres" } else { "nginx" };
            view.update(Message::QueryChanged(black_box(query.to_string())));
            black_box(view.visible_count());
        });
    });
}

fn benchmark_load(c: &mut Criterion) {
    let mut file = NamedTempFile::new().unwrap();
    for entry in create_log_entries(10_000) {
        serde_json::to_writer(&mut file, &entry).unwrap();
        writeln!(file).unwrap();
    }
    let path = file.path().to_string_lossy().to_string();

    c.bench_function("load_jsonl_10000", |b| {
        b.iter(|| {
            let items: Vec<LogEntry> = load_items(black_box(&path)).unwrap();
            black_box(items.len());
        });
    });
}

criterion_group!(
    benches,
    benchmark_pipeline,
    benchmark_sort_keys,
    benchmark_expression_query,
    benchmark_view_updates,
    benchmark_load
);
criterion_main!(benches);
