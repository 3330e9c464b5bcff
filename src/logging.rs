use std::io::Write;

use colored::Colorize;
use env_logger::{Builder, Env};
use log::{Level, LevelFilter};

/// Env var that overrides the `-v` level with an env_logger filter spec.
pub const LOG_ENV: &str = "OPENCOMMIT_LOG";

/// Map `-v` occurrences to a level filter.
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Error, // default: only errors
        1 => LevelFilter::Info,  // -v: info and up
        2 => LevelFilter::Debug, // -vv: filter decisions
        _ => LevelFilter::Trace, // -vvv: git invocations and prompts
    }
}

pub fn init_logger(verbosity: u8) {
    let level = level_for(verbosity);

    let mut builder = Builder::new();
    builder.filter_level(level);
    builder.parse_env(Env::new().filter(LOG_ENV));

    builder.format(|buf, record| {
        let level_label = match record.level() {
            Level::Error => "ERROR".red().bold(),
            Level::Warn => "WARN ".yellow().bold(),
            Level::Info => "INFO ".white().bold(),
            Level::Debug => "DEBUG".bright_black(),
            Level::Trace => "TRACE".bright_black(),
        };

        writeln!(buf, "{} {}", level_label, record.args())
    });

    // A second init (e.g. from tests) is harmless.
    let _ = builder.try_init();
}
