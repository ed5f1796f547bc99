use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

fn env_filter() -> EnvFilter {
    let default = if cfg!(feature = "trace") {
        "furigana_core=debug"
    } else {
        "furigana_core=info"
    };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Install the global subscriber.
///
/// With a trace directory, events and span timings go to
/// `furitool-trace.jsonl` there as JSON lines; the returned guard must be
/// held until exit so buffered lines are flushed. Otherwise events are
/// written to stderr. `RUST_LOG` overrides the default filter.
pub fn init_tracing(trace_dir: Option<&Path>) -> Option<WorkerGuard> {
    match trace_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::never(dir, "furitool-trace.jsonl");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let installed = tracing_subscriber::fmt()
                .json()
                .with_writer(non_blocking)
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_env_filter(env_filter())
                .try_init()
                .is_ok();
            installed.then_some(guard)
        }
        None => {
            let _ = tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_env_filter(env_filter())
                .try_init();
            None
        }
    }
}
