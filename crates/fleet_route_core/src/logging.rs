use std::{fs::File, io::Write};

use env_logger::{Builder, Target, WriteStyle, fmt::Formatter};
use log::Level;

use crate::options::{EngineOptions, LogFormat};
use crate::{Error, Result};

const COMPONENT_WIDTH: usize = 10;

/// Installs the global logger. Engine messages start with `component: ` and the pretty
/// format lifts that prefix into its own column.
pub fn init_logger(options: &EngineOptions) -> Result<()> {
    let format = options.log_format;
    let timestamps = options.log_timestamp;

    let mut builder = Builder::new();
    builder
        .filter_level(options.log_level.to_filter())
        .write_style(WriteStyle::Never)
        .format(move |buf: &mut Formatter, record| {
            if timestamps {
                write!(buf, "{} ", buf.timestamp_millis())?;
            }
            let message = record.args().to_string();
            writeln!(buf, "{}", render_line(format, record.level(), &message))
        });

    let target = match options.log_output_path() {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                Error::other(format!("failed to create log file {}: {e}", path.display()))
            })?;
            Target::Pipe(Box::new(file))
        }
        None => Target::Stderr,
    };
    builder.target(target);

    builder
        .try_init()
        .map_err(|e| Error::other(format!("logger init failed: {e}")))
}

fn render_line(format: LogFormat, level: Level, message: &str) -> String {
    let tag = level_tag(level);
    match format {
        LogFormat::Compact => format!("{tag} {message}"),
        LogFormat::Pretty => {
            let (component, rest) = split_component(message);
            format!("{tag:<5} {component:<COMPONENT_WIDTH$} | {rest}")
        }
    }
}

/// `"routes: built routes=3"` splits into `("routes", "built routes=3")`. Messages
/// without a single lowercase word before `": "` get `"-"`.
fn split_component(message: &str) -> (&str, &str) {
    match message.split_once(": ") {
        Some((head, rest))
            if !head.is_empty()
                && head.chars().all(|c| c.is_ascii_lowercase() || c == '_') =>
        {
            (head, rest)
        }
        _ => ("-", message),
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
