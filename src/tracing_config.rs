//! Tracing configuration for debugging class construction and dispatch.
//!
//! Supports three output formats controlled by `CLS_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`, one level per
//!   `create_class` span
//! - `json`: one JSON object per span/event
//!
//! ```bash
//! CLS_LOG=debug CLS_LOG_FORMAT=tree cargo test --test class_factory_tests
//! CLS_LOG="cls_runtime::factory=trace" cargo bench
//! ```
//!
//! The subscriber is only installed when `CLS_LOG` (or `RUST_LOG`) is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Tree,
    Json,
}

impl LogFormat {
    /// Parse a `CLS_LOG_FORMAT` value. Unknown values fall back to text.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("CLS_LOG_FORMAT").unwrap_or_default())
    }
}

/// `CLS_LOG` takes precedence over `RUST_LOG`; both use `RUST_LOG` syntax.
fn filter_directives() -> Option<String> {
    std::env::var("CLS_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
}

/// Install the global subscriber, writing to stderr.
///
/// Returns `false` when no filter is configured or a subscriber is already
/// installed, so it is safe to call from every test.
pub fn init_tracing() -> bool {
    let Some(directives) = filter_directives() else {
        return false;
    };
    let filter = EnvFilter::builder().parse_lossy(directives);

    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_targets(true);
            Registry::default().with(filter).with(tree_layer).try_init().is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(json_layer).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}
