//! Document options and the `:set` parser.
//!
//! Every tunable the document depends on lives in [`Options`]; nothing in
//! the editing path reads a hardcoded constant. The `:set` layer parses
//! directives and applies them to an `Options` value.
//!
//! # Supported syntax
//!
//! | Syntax           | Effect                        |
//! |------------------|-------------------------------|
//! | `:set option`    | Show the option's value       |
//! | `:set option?`   | Show the option's value       |
//! | `:set option=N`  | Assign a value                |
//! | `:set`           | Show options changed from default |
//! | `:set all`       | Show all options              |
//!
//! # Option names
//!
//! | Full name    | Abbrev | Default | Meaning                                   |
//! |--------------|--------|---------|-------------------------------------------|
//! | `maxleaf`    | `ml`   | 64      | small-leaf threshold for rope inserts     |
//! | `rebalance`  | `rb`   | 100     | edits between whole-document rebalances   |
//! | `scrolloff`  | `so`   | 3       | viewport margin, rows and columns         |
//! | `undolevels` | `ul`   | 0       | undo entries kept; 0 means unlimited      |

use thiserror::Error;

use strand_rope::DEFAULT_MAX_LEAF;

/// Default number of edits between rebalances.
pub const DEFAULT_REBALANCE_THRESHOLD: usize = 100;

/// Default viewport margin.
pub const DEFAULT_SCROLL_MARGIN: usize = 3;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to read or assign an option.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OptionError {
    #[error("unknown option: {0}")]
    Unknown(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("{name} must be at least {min}")]
    BelowMinimum { name: &'static str, min: usize },
}

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Configuration owned by a [`Document`](crate::document::Document).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Largest leaf an insert may leave behind before splitting it.
    pub max_leaf: usize,

    /// Number of edits after which every line is rebalanced.
    pub rebalance_threshold: usize,

    /// Rows/columns kept between the cursor and the viewport edge.
    pub scroll_margin: usize,

    /// Cap on undo entries. `None` keeps everything.
    pub history_limit: Option<usize>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_leaf: DEFAULT_MAX_LEAF,
            rebalance_threshold: DEFAULT_REBALANCE_THRESHOLD,
            scroll_margin: DEFAULT_SCROLL_MARGIN,
            history_limit: None,
        }
    }
}

impl Options {
    /// Current value of an option, formatted as `name=value`.
    ///
    /// # Errors
    ///
    /// [`OptionError::Unknown`] if `name` isn't an option or abbreviation.
    pub fn get(&self, name: &str) -> Result<String, OptionError> {
        let canonical = canonical_name(name).ok_or_else(|| OptionError::Unknown(name.into()))?;
        let value = match canonical {
            "maxleaf" => self.max_leaf,
            "rebalance" => self.rebalance_threshold,
            "scrolloff" => self.scroll_margin,
            _ => self.history_limit.unwrap_or(0),
        };
        Ok(format!("{canonical}={value}"))
    }

    /// Assign an option from its textual value.
    ///
    /// # Errors
    ///
    /// Unknown names, non-numeric values, and zero for `maxleaf` or
    /// `rebalance` are rejected; the options are left unchanged.
    pub fn set(&mut self, name: &str, value: &str) -> Result<(), OptionError> {
        let canonical = canonical_name(name).ok_or_else(|| OptionError::Unknown(name.into()))?;
        let n: usize = value
            .trim()
            .parse()
            .map_err(|_| OptionError::InvalidValue {
                name: canonical,
                value: value.into(),
            })?;
        match canonical {
            "maxleaf" | "rebalance" if n == 0 => {
                return Err(OptionError::BelowMinimum {
                    name: canonical,
                    min: 1,
                });
            }
            "maxleaf" => self.max_leaf = n,
            "rebalance" => self.rebalance_threshold = n,
            "scrolloff" => self.scroll_margin = n,
            _ => self.history_limit = (n > 0).then_some(n),
        }
        Ok(())
    }

    /// Apply one directive. Queries and listings return the text to show.
    ///
    /// # Errors
    ///
    /// See [`get`](Self::get) and [`set`](Self::set).
    pub fn apply(&mut self, directive: &SetDirective) -> Result<Option<String>, OptionError> {
        match directive {
            SetDirective::Query(name) => self.get(name).map(Some),
            SetDirective::Assign(name, value) => self.set(name, value).map(|()| None),
            SetDirective::ShowChanged => Ok(Some(self.changed().join(" "))),
            SetDirective::ShowAll => Ok(Some(self.all().join(" "))),
        }
    }

    /// `name=value` for every option.
    #[must_use]
    pub fn all(&self) -> Vec<String> {
        OPTION_NAMES
            .iter()
            .filter_map(|(name, _)| self.get(name).ok())
            .collect()
    }

    /// `name=value` for every option that differs from its default.
    #[must_use]
    pub fn changed(&self) -> Vec<String> {
        let defaults = Self::default();
        self.all()
            .into_iter()
            .zip(defaults.all())
            .filter(|(current, default)| current != default)
            .map(|(current, _)| current)
            .collect()
    }
}

// ---------------------------------------------------------------------------
// :set parsing
// ---------------------------------------------------------------------------

/// A parsed `:set` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetDirective {
    /// `:set option` / `:set option?` — show the current value.
    Query(String),

    /// `:set option=value` — assign a value.
    Assign(String, String),

    /// `:set` with no arguments — show changed options.
    ShowChanged,

    /// `:set all` — show all options.
    ShowAll,
}

/// Full names paired with their abbreviations.
const OPTION_NAMES: [(&str, &str); 4] = [
    ("maxleaf", "ml"),
    ("rebalance", "rb"),
    ("scrolloff", "so"),
    ("undolevels", "ul"),
];

/// Resolve a full name or abbreviation to the full name.
#[must_use]
pub fn canonical_name(name: &str) -> Option<&'static str> {
    OPTION_NAMES
        .iter()
        .find(|(full, short)| name == *full || name == *short)
        .map(|(full, _)| *full)
}

/// Returns `true` if `name` is a known option (full name or abbreviation).
#[must_use]
pub fn is_known_option(name: &str) -> bool {
    canonical_name(name).is_some()
}

/// Parse the full `:set` arguments string into directives.
///
/// Multiple space-separated arguments are supported
/// (`:set maxleaf=32 scrolloff=2`). An empty string produces
/// [`SetDirective::ShowChanged`].
#[must_use]
pub fn parse_set(args: &str) -> Vec<SetDirective> {
    let trimmed = args.trim();
    if trimmed.is_empty() {
        return vec![SetDirective::ShowChanged];
    }
    trimmed.split_whitespace().map(parse_set_arg).collect()
}

/// Parse a single `:set` argument into a directive.
#[must_use]
pub fn parse_set_arg(arg: &str) -> SetDirective {
    if arg == "all" {
        return SetDirective::ShowAll;
    }
    if let Some((name, value)) = arg.split_once('=') {
        return SetDirective::Assign(name.to_string(), value.to_string());
    }
    let name = arg.strip_suffix('?').unwrap_or(arg);
    SetDirective::Query(name.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ─────────────────────────────────────────────────────────

    #[test]
    fn defaults() {
        let opts = Options::default();
        assert_eq!(opts.max_leaf, 64);
        assert_eq!(opts.rebalance_threshold, 100);
        assert_eq!(opts.scroll_margin, 3);
        assert_eq!(opts.history_limit, None);
    }

    // ── parse_set_arg ─────────────────────────────────────────────────────

    #[test]
    fn parse_query() {
        assert_eq!(
            parse_set_arg("maxleaf?"),
            SetDirective::Query("maxleaf".into())
        );
        assert_eq!(parse_set_arg("so"), SetDirective::Query("so".into()));
    }

    #[test]
    fn parse_assign() {
        assert_eq!(
            parse_set_arg("scrolloff=5"),
            SetDirective::Assign("scrolloff".into(), "5".into())
        );
        assert_eq!(
            parse_set_arg("ml=8"),
            SetDirective::Assign("ml".into(), "8".into())
        );
    }

    #[test]
    fn parse_show_all() {
        assert_eq!(parse_set_arg("all"), SetDirective::ShowAll);
    }

    #[test]
    fn parse_empty_is_show_changed() {
        assert_eq!(parse_set(""), vec![SetDirective::ShowChanged]);
        assert_eq!(parse_set("  "), vec![SetDirective::ShowChanged]);
    }

    #[test]
    fn parse_multiple_args() {
        let result = parse_set("maxleaf=32 so rb=10");
        assert_eq!(
            result,
            vec![
                SetDirective::Assign("maxleaf".into(), "32".into()),
                SetDirective::Query("so".into()),
                SetDirective::Assign("rb".into(), "10".into()),
            ]
        );
    }

    // ── Names ────────────────────────────────────────────────────────────

    #[test]
    fn abbreviations_resolve() {
        assert_eq!(canonical_name("ml"), Some("maxleaf"));
        assert_eq!(canonical_name("rb"), Some("rebalance"));
        assert_eq!(canonical_name("so"), Some("scrolloff"));
        assert_eq!(canonical_name("ul"), Some("undolevels"));
        assert_eq!(canonical_name("scrolloff"), Some("scrolloff"));
    }

    #[test]
    fn unknown_is_not_option() {
        assert!(!is_known_option("foobar"));
        assert!(!is_known_option(""));
    }

    // ── get / set ────────────────────────────────────────────────────────

    #[test]
    fn set_and_get() {
        let mut opts = Options::default();
        opts.set("ml", "16").unwrap();
        opts.set("rebalance", "7").unwrap();
        opts.set("so", "0").unwrap();
        assert_eq!(opts.max_leaf, 16);
        assert_eq!(opts.rebalance_threshold, 7);
        assert_eq!(opts.scroll_margin, 0);
        assert_eq!(opts.get("maxleaf").unwrap(), "maxleaf=16");
    }

    #[test]
    fn undolevels_zero_means_unlimited() {
        let mut opts = Options::default();
        opts.set("ul", "50").unwrap();
        assert_eq!(opts.history_limit, Some(50));
        opts.set("ul", "0").unwrap();
        assert_eq!(opts.history_limit, None);
        assert_eq!(opts.get("undolevels").unwrap(), "undolevels=0");
    }

    #[test]
    fn set_rejects_zero_leaf_and_threshold() {
        let mut opts = Options::default();
        assert_eq!(
            opts.set("maxleaf", "0"),
            Err(OptionError::BelowMinimum {
                name: "maxleaf",
                min: 1
            })
        );
        assert!(opts.set("rb", "0").is_err());
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn set_rejects_garbage() {
        let mut opts = Options::default();
        assert_eq!(
            opts.set("so", "lots"),
            Err(OptionError::InvalidValue {
                name: "scrolloff",
                value: "lots".into()
            })
        );
        assert_eq!(
            opts.set("tabstop", "4"),
            Err(OptionError::Unknown("tabstop".into()))
        );
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            OptionError::Unknown("ts".into()).to_string(),
            "unknown option: ts"
        );
        assert_eq!(
            OptionError::BelowMinimum {
                name: "maxleaf",
                min: 1
            }
            .to_string(),
            "maxleaf must be at least 1"
        );
    }

    // ── apply ────────────────────────────────────────────────────────────

    #[test]
    fn apply_directives() {
        let mut opts = Options::default();
        for d in parse_set("ml=8 so=1") {
            assert_eq!(opts.apply(&d), Ok(None));
        }
        assert_eq!(
            opts.apply(&SetDirective::Query("ml".into())),
            Ok(Some("maxleaf=8".into()))
        );
        assert_eq!(
            opts.apply(&SetDirective::ShowChanged),
            Ok(Some("maxleaf=8 scrolloff=1".into()))
        );
        assert_eq!(
            opts.apply(&SetDirective::ShowAll),
            Ok(Some(
                "maxleaf=8 rebalance=100 scrolloff=1 undolevels=0".into()
            ))
        );
    }

    #[test]
    fn show_changed_empty_by_default() {
        let mut opts = Options::default();
        assert_eq!(opts.apply(&SetDirective::ShowChanged), Ok(Some(String::new())));
    }
}
