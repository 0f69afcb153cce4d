use super::comparator::SortSpec;
use super::config::{Identified, RankTable, ViewConfig};

pub const LEVELS: RankTable = RankTable(&["debug", "info", "warn", "error", "fatal"]);
pub const SEVERITIES: RankTable = RankTable(&["info", "low", "medium", "high", "critical"]);

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row {
    pub id: String,
    pub name: String,
    pub source: Option<String>,
    pub level: Option<String>,
    pub severity: Option<String>,
    pub timestamp: Option<String>,
    pub score: Option<f64>,
    pub tags: Vec<String>,
}

impl Identified for Row {
    fn id(&self) -> &str {
        &self.id
    }
}

pub fn row(id: &str, name: &str) -> Row {
    Row {
        id: id.to_string(),
        name: name.to_string(),
        ..Row::default()
    }
}

impl Row {
    pub fn level(mut self, level: &str) -> Self {
        self.level = Some(level.to_string());
        self
    }

    pub fn severity(mut self, severity: &str) -> Self {
        self.severity = Some(severity.to_string());
        self
    }

    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn at(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_string());
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }
}

pub fn row_config() -> ViewConfig<Row> {
    ViewConfig::<Row>::new(SortSpec::descending("timestamp"))
        .text("name", |r| Some(r.name.as_str()))
        .text("source", |r| r.source.as_deref())
        .text_list("tags", |r| r.tags.as_slice())
        .dimension("level", |r| r.level.as_deref())
        .dimension("severity", |r| r.severity.as_deref())
        .dimension("source", |r| r.source.as_deref())
        .sort_text("name", |r| Some(r.name.as_str()))
        .sort_number("score", |r| r.score)
        .sort_timestamp("timestamp", |r| r.timestamp.as_deref())
        .sort_ranked("level", |r| r.level.as_deref(), LEVELS)
        .sort_ranked("severity", |r| r.severity.as_deref(), SEVERITIES)
        .time_field(|r| r.timestamp.as_deref())
}

pub fn ids<'a>(rows: impl IntoIterator<Item = &'a Row>) -> Vec<&'a str> {
    rows.into_iter().map(|r| r.id.as_str()).collect()
}
