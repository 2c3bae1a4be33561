// wellkeep/src/logger.rs
//! Logger setup for the wellkeep binary.
//!
//! `RUST_LOG` is honoured unless an explicit level is passed, in which case
//! the level applies to the wellkeep crates only and everything else stays
//! at `warn`.

use env_logger::{Builder, Env};
use log::LevelFilter;

pub fn init_logger(level: Option<LevelFilter>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        builder
            .filter_level(LevelFilter::Warn)
            .filter_module("wellkeep", level)
            .filter_module("wellkeep_core", level);
        if level == LevelFilter::Off {
            builder.filter_level(LevelFilter::Off);
        }
    }
    builder.format_timestamp(None).target(env_logger::Target::Stderr);
    // A second initialisation (e.g. in tests) is not an error.
    let _ = builder.try_init();
}

/// Maps the global flags to a level override.
pub fn level_for_flags(quiet: bool, debug: bool) -> Option<LevelFilter> {
    if quiet {
        Some(LevelFilter::Off)
    } else if debug {
        Some(LevelFilter::Debug)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_wins_over_debug() {
        assert_eq!(level_for_flags(true, true), Some(LevelFilter::Off));
        assert_eq!(level_for_flags(false, true), Some(LevelFilter::Debug));
        assert_eq!(level_for_flags(false, false), None);
    }
}
