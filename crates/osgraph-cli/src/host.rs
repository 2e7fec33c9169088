//! Terminal host: results go to stdout as JSON, everything else to stderr.

use osgraph_app::{EmbeddedEnvelope, Notice, QueryHost, ResultEnvelope, ToastLevel};
use serde::Serialize;

/// Prints controller output for a terminal user.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleHost {
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl ConsoleHost {
    fn print<T: Serialize>(&self, value: &T) {
        let rendered = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        match rendered {
            Ok(json) => println!("{json}"),
            Err(error) => tracing::error!(%error, "failed to render result"),
        }
    }
}

impl QueryHost for ConsoleHost {
    fn on_loading_change(&self, loading: bool) {
        if loading {
            tracing::info!("executing query...");
        } else {
            tracing::debug!("query settled");
        }
    }

    fn on_search(&self, envelope: EmbeddedEnvelope) {
        self.print(&envelope);
    }

    fn navigate(&self, route: &str, envelope: ResultEnvelope) {
        tracing::debug!(route, "result ready");
        self.print(&envelope);
    }

    fn notify(&self, notice: Notice) {
        let label = match notice.level {
            ToastLevel::Info => "info",
            ToastLevel::Warning => "warning",
            ToastLevel::Error => "error",
        };
        eprintln!("{label}: {}", notice.message);
    }
}
