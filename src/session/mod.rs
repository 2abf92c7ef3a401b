//! Line-oriented user intents for driving a table from a terminal.

use std::path::PathBuf;

use thiserror::Error;

use crate::controller::{SortDirection, TableController};
use crate::export::{self, ExportError, ExportFormat};
use crate::table::TableError;

pub const HELP: &str = "\
commands:
  show                     redraw the table
  page N | next | prev     change page
  size N                   items per page (5, 10, 25, 50 or any positive number)
  sort FIELD asc|desc      order rows by a field
  search [QUERY]           typo-tolerant search, empty query clears
  clear                    clear the search
  filter FIELD [QUERY]     substring filter on one field, empty query clears
  blur                     leave the field filter
  export [PATH]            write the full data set (csv or json by extension)
  help                     this text
  quit                     exit";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Show,
    Page(usize),
    Next,
    Prev,
    Size(usize),
    Sort { field: String, direction: SortDirection },
    Search(String),
    Filter { field: String, query: String },
    Blur,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown command '{0}', try 'help'")]
    UnknownCommand(String),

    #[error("{command}: {message}")]
    BadArgument {
        command: &'static str,
        message: String,
    },

    #[error("{0} is disabled for this table")]
    Disabled(&'static str),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

fn bad(command: &'static str, message: &str) -> SessionError {
    SessionError::BadArgument {
        command,
        message: message.to_string(),
    }
}

fn parse_number(command: &'static str, raw: Option<&str>) -> Result<usize, SessionError> {
    let raw = raw.ok_or_else(|| bad(command, "expected a number"))?;
    raw.parse::<usize>()
        .map_err(|_| bad(command, &format!("invalid number '{raw}'")))
}

/// Parses one input line. Blank lines parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, SessionError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let cmd = match word.to_lowercase().as_str() {
        "show" | "ls" => Command::Show,
        "page" | "p" => Command::Page(parse_number("page", args.next())?),
        "next" | "n" => Command::Next,
        "prev" | "previous" => Command::Prev,
        "size" => Command::Size(parse_number("size", args.next())?),
        "sort" => {
            let field = args
                .next()
                .ok_or_else(|| bad("sort", "expected a field name"))?
                .to_string();
            let direction = match args.next() {
                None => SortDirection::Ascending,
                Some(d) => SortDirection::parse(d)
                    .ok_or_else(|| bad("sort", &format!("invalid direction '{d}'")))?,
            };
            Command::Sort { field, direction }
        }
        "search" | "/" => Command::Search(rest.to_string()),
        "clear" => Command::Search(String::new()),
        "filter" | "f" => {
            let (field, query) = match rest.split_once(char::is_whitespace) {
                Some((f, q)) => (f, q.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err(bad("filter", "expected a field name"));
            }
            Command::Filter {
                field: field.to_string(),
                query: query.to_string(),
            }
        }
        "blur" => Command::Blur,
        "export" => Command::Export(if rest.is_empty() {
            None
        } else {
            Some(PathBuf::from(rest))
        }),
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(SessionError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// State may have changed, redraw.
    Redraw,
    Exported { path: PathBuf, rows: usize },
    Help,
    Quit,
}

/// Applies a command, honoring the table's enabled features.
pub fn apply(table: &mut TableController, cmd: Command) -> Result<Outcome, SessionError> {
    let cfg = table.config();
    match cmd {
        Command::Show => {}
        Command::Page(n) => {
            table.go_to_page(n);
        }
        Command::Next => {
            table.next_page();
        }
        Command::Prev => {
            table.previous_page();
        }
        Command::Size(n) => {
            if !cfg.pagination {
                return Err(SessionError::Disabled("pagination"));
            }
            table.set_items_per_page(n)?;
        }
        Command::Sort { field, direction } => {
            if !cfg.sort {
                return Err(SessionError::Disabled("sorting"));
            }
            table.sort_by(&field, direction);
        }
        Command::Search(query) => {
            if !cfg.search {
                return Err(SessionError::Disabled("search"));
            }
            table.search(&query);
        }
        Command::Filter { field, query } => {
            if !cfg.search_by_fields {
                return Err(SessionError::Disabled("field filtering"));
            }
            table.search_by_field(&query, &field);
        }
        Command::Blur => table.blur_field_filter(),
        Command::Export(path) => {
            if !cfg.export_csv {
                return Err(SessionError::Disabled("export"));
            }
            let path = path.unwrap_or_else(|| {
                PathBuf::from(export::default_filename(
                    cfg.title.as_deref(),
                    ExportFormat::Csv,
                ))
            });
            let format = export::infer_format_from_path(&path.to_string_lossy())
                .unwrap_or(ExportFormat::Csv);
            let rows = export::write_export(&path, format, &cfg.headers, table.data())?;
            return Ok(Outcome::Exported { path, rows });
        }
        Command::Help => return Ok(Outcome::Help),
        Command::Quit => return Ok(Outcome::Quit),
    }
    Ok(Outcome::Redraw)
}
