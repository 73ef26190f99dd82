//! Logging setup for the `strand` binary.
//!
//! Logs go to stderr so they never mix with rendered output on stdout.
//!
//! ## Environment Variables
//!
//! 1. **`STRAND_LOG`** (highest priority) - a bare level such as `debug`
//!    applies to the strand crates only; anything with `=`, `:` or `,` is
//!    used as a full filter
//! 2. **`RUST_LOG`** - standard tracing filter, used as-is
//! 3. **Default** - `warn`

use std::env;

use tracing_subscriber::EnvFilter;

const STRAND_CRATES: [&str; 3] = ["strand", "strand_editor", "strand_rope"];

/// Install the stderr subscriber. Does nothing if one is already installed.
pub fn init() {
    let directives = filter_directives(
        env::var("STRAND_LOG").ok().as_deref(),
        env::var("RUST_LOG").ok().as_deref(),
    );
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directives))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Filter string for the given `STRAND_LOG` / `RUST_LOG` values.
fn filter_directives(strand_log: Option<&str>, rust_log: Option<&str>) -> String {
    if let Some(level) = strand_log.filter(|s| !s.trim().is_empty()) {
        if level.contains(['=', ':', ',']) {
            return level.to_string();
        }
        let scoped: Vec<String> = STRAND_CRATES
            .iter()
            .map(|krate| format!("{krate}={level}"))
            .collect();
        return format!("warn,{}", scoped.join(","));
    }
    if let Some(filter) = rust_log.filter(|s| !s.trim().is_empty()) {
        return filter.to_string();
    }
    "warn".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_warn() {
        assert_eq!(filter_directives(None, None), "warn");
        assert_eq!(filter_directives(Some(""), Some("  ")), "warn");
    }

    #[test]
    fn strand_log_level_scopes_to_crates() {
        assert_eq!(
            filter_directives(Some("debug"), Some("trace")),
            "warn,strand=debug,strand_editor=debug,strand_rope=debug"
        );
    }

    #[test]
    fn strand_log_full_filter_passes_through() {
        assert_eq!(
            filter_directives(Some("strand_rope=trace"), None),
            "strand_rope=trace"
        );
    }

    #[test]
    fn rust_log_used_when_strand_log_unset() {
        assert_eq!(filter_directives(None, Some("info")), "info");
    }

    #[test]
    fn init_twice_does_not_panic() {
        init();
        init();
    }
}
