pub mod catalog;
pub mod models;


pub use catalog::{ItemKind, Listable};
pub use models::{
    Alert, AlertStatus, HealthCheck, HealthStatus, LogEntry, LogLevel, Notification,
    NotificationKind, Service, ServiceStatus, Severity,
};
