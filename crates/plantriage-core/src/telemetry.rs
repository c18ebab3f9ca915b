//! Log setup for the `plantriage` binary.
//!
//! `plantriage evaluate` prints exactly one verdict (text, JSON or Markdown)
//! on stdout, and CI jobs pipe that into other tools. Everything else the
//! run reports goes through `tracing` to stderr:
//!
//! - the `triage.started` / `triage.evaluated` / `triage.error` events from
//!   [`crate::obs`], carrying cost, limit, status and priority fields
//! - the engine's `debug!` line naming which rule decided the verdict
//! - CLI status lines such as the artifact path or `Config OK`
//!
//! The CLI flags map onto [`init_tracing`] as follows:
//!
//! | flag          | effect                                          |
//! |---------------|-------------------------------------------------|
//! | (none)        | human-readable lines at `INFO`                  |
//! | `--verbose`   | default level drops to `DEBUG` (shows the rule) |
//! | `--json-logs` | one JSON object per event, for log collectors   |
//!
//! `RUST_LOG` wins over the level chosen by `--verbose`, e.g.
//! `RUST_LOG=plantriage_core=debug` keeps the CLI quiet but shows engine detail.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the process-wide subscriber. Only the first call takes effect, so
/// tests and embedding callers may call it freely.
pub fn init_tracing(json: bool, level: Level) {
    let filter = filter_for(level);
    let stderr_lines = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let installed = if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_lines.json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_lines)
            .try_init()
    };
    // Already installed by an earlier call.
    installed.ok();
}

/// `RUST_LOG` if set and valid, otherwise everything at `level` and above.
fn filter_for(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}
