use serde::Serialize;
use serde::de::DeserializeOwned;

use super::models::{Alert, HealthCheck, LogEntry, Notification, Service};
use crate::collection::{Identified, RankTable, SortSpec, ViewConfig};
use crate::format::RowSummary;

pub const SERVICE_STATUS_RANKS: RankTable =
    RankTable(&["stopped", "paused", "starting", "running", "error"]);
pub const LOG_LEVEL_RANKS: RankTable = RankTable(&["debug", "info", "warn", "error", "fatal"]);
pub const SEVERITY_RANKS: RankTable = RankTable(&["info", "low", "medium", "high", "critical"]);
pub const HEALTH_STATUS_RANKS: RankTable =
    RankTable(&["healthy", "unknown", "warning", "critical"]);
pub const NOTIFICATION_KIND_RANKS: RankTable =
    RankTable(&["info", "success", "warning", "error"]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum ItemKind {
    Services,
    Logs,
    Alerts,
    Health,
    Notifications,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Services => "services",
            ItemKind::Logs => "logs",
            ItemKind::Alerts => "alerts",
            ItemKind::Health => "health",
            ItemKind::Notifications => "notifications",
        }
    }
}

/// An item type that can back a list view.
pub trait Listable: Identified + Serialize + DeserializeOwned + Sized {
    const KIND: ItemKind;
    /// Actions the platform API accepts for this kind of item.
    const ACTIONS: &'static [&'static str];

    fn view_config() -> ViewConfig<Self>;
    fn summary(&self) -> RowSummary<'_>;
}

impl Identified for Service {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for Service {
    const KIND: ItemKind = ItemKind::Services;
    const ACTIONS: &'static [&'static str] = &["start", "stop", "restart", "remove"];

    fn view_config() -> ViewConfig<Self> {
        ViewConfig::<Self>::new(SortSpec::ascending("name"))
            .text("name", |s| Some(s.name.as_str()))
            .text("image", |s| s.image.as_deref())
            .text("stack", |s| s.stack.as_deref())
            .dimension("status", |s| Some(s.status.as_str()))
            .dimension("stack", |s| s.stack.as_deref())
            .sort_text("name", |s| Some(s.name.as_str()))
            .sort_timestamp("created", |s| s.created_at.as_deref())
            .sort_number("cpu", |s| s.cpu_percent)
            .sort_number("memory", |s| s.memory_mb)
            .sort_ranked("status", |s| Some(s.status.as_str()), SERVICE_STATUS_RANKS)
            .time_field(|s| s.created_at.as_deref())
    }

    fn summary(&self) -> RowSummary<'_> {
        RowSummary {
            when: self.created_at.as_deref(),
            badge: self.status.as_str(),
            title: &self.name,
            detail: self.image.as_deref(),
        }
    }
}

impl Identified for LogEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for LogEntry {
    const KIND: ItemKind = ItemKind::Logs;
    const ACTIONS: &'static [&'static str] = &[];

    fn view_config() -> ViewConfig<Self> {
        ViewConfig::<Self>::new(SortSpec::descending("timestamp"))
            .text("message", |l| Some(l.message.as_str()))
            .text("source", |l| l.source.as_deref())
            .dimension("level", |l| Some(l.level.as_str()))
            .dimension("source", |l| l.source.as_deref())
            .sort_timestamp("timestamp", |l| l.timestamp.as_deref())
            .sort_ranked("level", |l| Some(l.level.as_str()), LOG_LEVEL_RANKS)
            .sort_text("source", |l| l.source.as_deref())
            .time_field(|l| l.timestamp.as_deref())
    }

    fn summary(&self) -> RowSummary<'_> {
        RowSummary {
            when: self.timestamp.as_deref(),
            badge: self.level.as_str(),
            title: &self.message,
            detail: self.source.as_deref(),
        }
    }
}

impl Identified for Alert {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for Alert {
    const KIND: ItemKind = ItemKind::Alerts;
    const ACTIONS: &'static [&'static str] = &["acknowledge", "resolve"];

    fn view_config() -> ViewConfig<Self> {
        ViewConfig::<Self>::new(SortSpec::descending("timestamp"))
            .text("title", |a| Some(a.title.as_str()))
            .text("message", |a| Some(a.message.as_str()))
            .text("source", |a| a.source.as_deref())
            .text_list("tags", |a| a.tags.as_slice())
            .dimension("severity", |a| Some(a.severity.as_str()))
            .dimension("status", |a| Some(a.status.as_str()))
            .dimension("source", |a| a.source.as_deref())
            .sort_timestamp("timestamp", |a| a.timestamp.as_deref())
            .sort_ranked("severity", |a| Some(a.severity.as_str()), SEVERITY_RANKS)
            .sort_text("title", |a| Some(a.title.as_str()))
            .time_field(|a| a.timestamp.as_deref())
    }

    fn summary(&self) -> RowSummary<'_> {
        RowSummary {
            when: self.timestamp.as_deref(),
            badge: self.severity.as_str(),
            title: &self.title,
            detail: Some(self.status.as_str()),
        }
    }
}

impl Identified for HealthCheck {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for HealthCheck {
    const KIND: ItemKind = ItemKind::Health;
    const ACTIONS: &'static [&'static str] = &["run"];

    fn view_config() -> ViewConfig<Self> {
        ViewConfig::<Self>::new(SortSpec::descending("last_checked"))
            .text("name", |h| Some(h.name.as_str()))
            .text("message", |h| h.message.as_deref())
            .text("category", |h| h.category.as_deref())
            .dimension("status", |h| Some(h.status.as_str()))
            .dimension("category", |h| h.category.as_deref())
            .sort_timestamp("last_checked", |h| h.last_checked.as_deref())
            .sort_ranked("status", |h| Some(h.status.as_str()), HEALTH_STATUS_RANKS)
            .sort_text("name", |h| Some(h.name.as_str()))
            .sort_number("response_time", |h| h.response_time_ms)
            .time_field(|h| h.last_checked.as_deref())
    }

    fn summary(&self) -> RowSummary<'_> {
        RowSummary {
            when: self.last_checked.as_deref(),
            badge: self.status.as_str(),
            title: &self.name,
            detail: self.message.as_deref(),
        }
    }
}

impl Identified for Notification {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Listable for Notification {
    const KIND: ItemKind = ItemKind::Notifications;
    const ACTIONS: &'static [&'static str] = &["mark-read", "dismiss"];

    fn view_config() -> ViewConfig<Self> {
        ViewConfig::<Self>::new(SortSpec::descending("timestamp"))
            .text("title", |n| Some(n.title.as_str()))
            .text("message", |n| Some(n.message.as_str()))
            .dimension("type", |n| Some(n.kind.as_str()))
            .dimension("read", |n| Some(n.read_state()))
            .sort_timestamp("timestamp", |n| n.timestamp.as_deref())
            .sort_ranked("type", |n| Some(n.kind.as_str()), NOTIFICATION_KIND_RANKS)
            .time_field(|n| n.timestamp.as_deref())
    }

    fn summary(&self) -> RowSummary<'_> {
        RowSummary {
            when: self.timestamp.as_deref(),
            badge: self.kind.as_str(),
            title: &self.title,
            detail: (!self.message.is_empty()).then_some(self.message.as_str()),
        }
    }
}
