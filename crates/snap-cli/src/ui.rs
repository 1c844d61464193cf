use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{ColorMode, GlobalFlags, OutputFormat, ProgressMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UiPrefs {
    pub table_color: bool,
    pub progress: bool,
    pub term_width: Option<usize>,
}

/// Terminal facts the preferences are derived from.
#[derive(Clone, Copy, Debug)]
struct Terminal {
    stdout_tty: bool,
    stderr_tty: bool,
    no_color: bool,
    columns: Option<usize>,
}

static UI_PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    let terminal = Terminal {
        stdout_tty: std::io::stdout().is_terminal(),
        stderr_tty: std::io::stderr().is_terminal(),
        no_color: std::env::var_os("NO_COLOR").is_some(),
        columns: std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok()),
    };
    let _ = UI_PREFS.set(resolve(flags, terminal));
}

fn resolve(flags: &GlobalFlags, terminal: Terminal) -> UiPrefs {
    let table = flags.format == OutputFormat::Table;
    let table_color = match flags.color {
        ColorMode::Always => table,
        ColorMode::Never => false,
        ColorMode::Auto => terminal.stdout_tty && table && !flags.quiet && !terminal.no_color,
    };

    // Bars draw on stderr, so stdout may be piped while they still show.
    let progress = match flags.progress {
        ProgressMode::On => terminal.stderr_tty && !flags.quiet,
        ProgressMode::Off => false,
        ProgressMode::Auto => {
            terminal.stderr_tty && !flags.quiet && flags.format != OutputFormat::Json
        }
    };

    UiPrefs {
        table_color,
        progress,
        term_width: terminal.columns.filter(|width| *width >= 40),
    }
}

#[must_use]
pub fn prefs() -> UiPrefs {
    *UI_PREFS.get().unwrap_or(&UiPrefs {
        table_color: false,
        progress: false,
        term_width: None,
    })
}
