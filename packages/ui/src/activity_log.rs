//! User-visible log of persistence results and rejected actions.
//!
//! Every entry is mirrored to `tracing` at the matching level.

use dioxus::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    fn class(&self) -> &'static str {
        match self {
            LogLevel::Info => "log-entry info",
            LogLevel::Success => "log-entry success",
            LogLevel::Warning => "log-entry warning",
            LogLevel::Error => "log-entry error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

impl ActivityLog {
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.level == LogLevel::Error).count()
    }
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    match level {
        LogLevel::Info | LogLevel::Success => tracing::info!("{}", message),
        LogLevel::Warning => tracing::warn!("{}", message),
        LogLevel::Error => tracing::error!("{}", message),
    }
    log.write().entries.push(LogEntry {
        timestamp: current_time(),
        level,
        message: message.to_string(),
    });
}

#[cfg(target_arch = "wasm32")]
fn current_time() -> String {
    let date = js_sys::Date::new_0();
    format!(
        "{:02}:{:02}:{:02}",
        date.get_hours(),
        date.get_minutes(),
        date.get_seconds()
    )
}

#[cfg(not(target_arch = "wasm32"))]
fn current_time() -> String {
    let secs = store::models::current_timestamp() / 1000;
    format!("{:02}:{:02}:{:02}", (secs / 3600) % 24, (secs / 60) % 60, secs % 60)
}

/// Collapsible panel listing the newest entries first.
#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();
    let entries = log().entries.clone();
    let count = entries.len();
    let errors = log().error_count();

    rsx! {
        div {
            class: "activity-log",
            button {
                class: if errors > 0 { "activity-log-toggle has-errors" } else { "activity-log-toggle" },
                title: "Activity log",
                onclick: move |_| {
                    let visible = log().visible;
                    log.write().visible = !visible;
                },
                if count > 0 { "Log ({count})" } else { "Log" }
            }
            if log().visible {
                div {
                    class: "activity-log-entries",
                    button {
                        class: "activity-log-clear",
                        onclick: move |_| log.write().entries.clear(),
                        "Clear"
                    }
                    for entry in entries.iter().rev() {
                        div {
                            class: entry.level.class(),
                            span { class: "log-time", "{entry.timestamp}" }
                            span { " {entry.message}" }
                        }
                    }
                }
            }
        }
    }
}
