use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;
use itertools::Itertools;
use tracing::{debug, Level};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::controller::{SortDirection, TableController};
use crate::data;
use crate::export::{self, ExportFormat};
use crate::model::{sample_branches, Record};
use crate::render::{self, RenderOptions};
use crate::session::{self, Command, Outcome};
use crate::table::{Column, FieldDescriptor, TableConfig, DEFAULT_ITEMS_PER_PAGE};

fn print_banner() {
    println!(
        "{} v{}  type 'help' for commands\n",
        "tableview".bold(),
        env!("CARGO_PKG_VERSION")
    );
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<10}: {}", label, value);
}

fn render_custom_help() -> String {
    let cmd = CliArgs::command();
    let mut out = String::new();

    out.push_str(cmd.get_name());
    if let Some(version) = cmd.get_version() {
        out.push(' ');
        out.push_str(version);
    }
    out.push('\n');
    if let Some(about) = cmd.get_about() {
        out.push_str(&format!("{about}\n"));
    }
    if let Some(long_about) = cmd.get_long_about() {
        out.push_str(&format!("\n{long_about}\n"));
    }
    out.push_str(&format!("\nUsage: {} [OPTIONS]\n\n", cmd.get_name()));

    let sections = cmd
        .get_arguments()
        .filter(|arg| !arg.is_hide_set())
        .into_group_map_by(|arg| arg.get_help_heading().unwrap_or("Options").to_string());
    let order: Vec<String> = cmd
        .get_arguments()
        .filter(|arg| !arg.is_hide_set())
        .map(|arg| arg.get_help_heading().unwrap_or("Options").to_string())
        .unique()
        .collect();

    for heading in order {
        out.push_str(&format!("{heading}:\n"));
        for arg in sections.get(&heading).into_iter().flatten() {
            let mut flags: Vec<String> = Vec::new();
            if let Some(short) = arg.get_short() {
                flags.push(format!("-{short}"));
            }
            if let Some(long) = arg.get_long() {
                flags.push(format!("--{long}"));
            }
            for alias in arg.get_visible_aliases().unwrap_or_default() {
                let rendered = format!("--{alias}");
                if !flags.contains(&rendered) {
                    flags.push(rendered);
                }
            }
            let mut line = flags.join(", ");
            if arg.get_action().takes_values() {
                let value_name = arg
                    .get_value_names()
                    .and_then(|names| names.first())
                    .map(|name| name.as_str())
                    .unwrap_or("VALUE");
                line.push_str(&format!(" <{value_name}>"));
            }
            out.push_str(&format!("  {line}\n"));
            if let Some(help) = arg.get_help() {
                let help = help.to_string();
                if !help.trim().is_empty() {
                    out.push_str(&format!("          {}\n", help.trim()));
                }
            }
            out.push('\n');
        }
    }

    out
}

fn init_tracing(verbose: u8) -> Result<(), String> {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let directive: Directive = format!("tableview={level}")
        .parse()
        .map_err(|e| format!("invalid log directive: {e}"))?;
    let filter = EnvFilter::from_default_env().add_directive(directive);
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
    {
        debug!(error = %e, "tracing subscriber already installed");
    }
    Ok(())
}

#[derive(Clone, Debug)]
struct RunConfig {
    no_color: bool,
    data_path: Option<PathBuf>,
    table: TableConfig,
    page: Option<usize>,
    sort: Option<(String, SortDirection)>,
    search: Option<String>,
    filter: Option<(String, String)>,
    interactive: bool,
    export: Option<PathBuf>,
    export_format: Option<ExportFormat>,
}

fn build_run_config(args: CliArgs, cfg: ConfigFile) -> Result<RunConfig, String> {
    validation::validate(&args)?;

    let no_color = if args.color {
        false
    } else {
        args.no_color || cfg.no_color.unwrap_or(false)
    };

    let data_path = args.data.or(cfg.data).map(|p| config::expand_tilde(&p));
    let demo = data_path.is_none().then(TableConfig::branch_demo);

    let (headers, columns) = match args.fields.as_deref() {
        Some(raw) => {
            let fields = crate::utils::parse_fields_csv(raw)
                .map_err(|e| format!("invalid --fields '{raw}': {e}"))?;
            (
                fields.iter().map(|f| FieldDescriptor::new(f, f)).collect(),
                fields.iter().map(|f| Column::field(f)).collect(),
            )
        }
        None => (
            cfg.headers.unwrap_or_default(),
            cfg.columns
                .unwrap_or_default()
                .into_iter()
                .map(Column::from)
                .collect::<Vec<_>>(),
        ),
    };
    let (headers, columns) = match demo.as_ref() {
        Some(demo) if headers.is_empty() && columns.is_empty() => {
            (demo.headers.clone(), demo.columns.clone())
        }
        _ => (headers, columns),
    };

    let items_per_page = args
        .items_per_page
        .or(cfg.items_per_page)
        .unwrap_or_else(|| {
            demo.as_ref()
                .map(|d| d.items_per_page)
                .unwrap_or(DEFAULT_ITEMS_PER_PAGE)
        });
    let title = args
        .title
        .or(cfg.title)
        .or_else(|| demo.as_ref().and_then(|d| d.title.clone()));
    let search_keys = match args.search_keys.as_deref() {
        Some(raw) => crate::utils::parse_fields_csv(raw)
            .map_err(|e| format!("invalid --search-keys '{raw}': {e}"))?,
        None => cfg.search_keys.unwrap_or_default(),
    };

    let table = TableConfig {
        headers,
        columns,
        items_per_page,
        pagination: !args.no_pagination && cfg.pagination.unwrap_or(true),
        search: !args.no_search && cfg.search.unwrap_or(true),
        sort: !args.no_sort && cfg.sort.unwrap_or(true),
        title,
        export_csv: cfg.export_csv.unwrap_or(true),
        search_by_fields: cfg.search_by_fields.unwrap_or(true),
        search_keys,
        fuzzy: cfg.fuzzy.unwrap_or_default(),
    };

    let export_format = match args.export_format.or(cfg.export_format) {
        Some(raw) => Some(
            ExportFormat::parse(&raw)
                .ok_or_else(|| format!("invalid export format '{raw}', expected csv or json"))?,
        ),
        None => None,
    };
    let sort = args
        .sort
        .as_deref()
        .map(crate::utils::parse_sort_spec)
        .transpose()?;
    let filter = args
        .filter
        .as_deref()
        .map(crate::utils::parse_filter_spec)
        .transpose()?;

    Ok(RunConfig {
        no_color,
        data_path,
        table,
        page: args.page,
        sort,
        search: args.search,
        filter,
        interactive: args.interactive,
        export: args.export.or(cfg.export).map(|p| config::expand_tilde(&p)),
        export_format,
    })
}

/// Fills in whichever of headers/columns the user left out. With neither,
/// every field of the first record becomes a column.
fn complete_layout(table: &mut TableConfig, records: &[Record]) {
    if table.headers.is_empty() && table.columns.is_empty() {
        let fields: Vec<String> = records
            .first()
            .map(|r| r.field_names().map(str::to_string).collect())
            .unwrap_or_default();
        table.headers = fields.iter().map(|f| FieldDescriptor::new(f, f)).collect();
        table.columns = fields.iter().map(|f| Column::field(f)).collect();
    } else if table.columns.is_empty() {
        table.columns = table
            .headers
            .iter()
            .map(|h| Column::field(&h.sorting_field_name))
            .collect();
    } else if table.headers.is_empty() {
        table.headers = table
            .columns
            .iter()
            .map(|c| {
                let name = c.field_name().unwrap_or("");
                FieldDescriptor::new(name, name)
            })
            .collect();
    }
}

fn initial_commands(run: &RunConfig) -> Vec<Command> {
    let mut cmds = Vec::new();
    if let Some((field, direction)) = run.sort.clone() {
        cmds.push(Command::Sort { field, direction });
    }
    if let Some((field, query)) = run.filter.clone() {
        cmds.push(Command::Filter { field, query });
    }
    if let Some(query) = run.search.clone() {
        cmds.push(Command::Search(query));
    }
    if let Some(page) = run.page {
        cmds.push(Command::Page(page));
    }
    cmds
}

fn export_table(
    table: &TableController,
    path: &Path,
    format: Option<ExportFormat>,
) -> Result<(), String> {
    if !table.config().export_csv {
        return Err("export is disabled for this table".to_string());
    }
    let format = format
        .or_else(|| export::infer_format_from_path(&path.to_string_lossy()))
        .unwrap_or(ExportFormat::Csv);
    let rows = export::write_export(path, format, &table.config().headers, table.data())
        .map_err(|e| e.to_string())?;
    format_kv_line(
        "Exported",
        &format!("{} ({rows} rows, {})", path.display(), format.extension()),
    );
    Ok(())
}

fn interactive(table: &mut TableController, opts: RenderOptions) -> Result<(), String> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("{} ", ">".bold());
        io::stdout()
            .flush()
            .map_err(|e| format!("failed to flush stdout: {e}"))?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| format!("failed to read stdin: {e}"))?;
        let cmd = match session::parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        };
        match session::apply(table, cmd) {
            Ok(Outcome::Redraw) => print!("{}", render::render(&table.frame(), opts)),
            Ok(Outcome::Exported { path, rows }) => {
                format_kv_line("Exported", &format!("{} ({rows} rows)", path.display()))
            }
            Ok(Outcome::Help) => println!("{}", session::HELP),
            Ok(Outcome::Quit) => break,
            Err(e) => eprintln!("{}", e.to_string().red()),
        }
    }
    Ok(())
}

fn execute(mut run: RunConfig) -> Result<(), String> {
    if run.no_color {
        colored::control::set_override(false);
    }
    let opts = RenderOptions {
        color: !run.no_color,
    };

    let records = match run.data_path.as_deref() {
        Some(path) => data::load_records(path).map_err(|e| e.to_string())?,
        None => sample_branches(),
    };
    let source = run
        .data_path
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "built-in branch sample".to_string());
    debug!(source = %source, records = records.len(), "data loaded");
    format_kv_line("Data", &format!("{source} ({} records)", records.len()));

    complete_layout(&mut run.table, &records);
    let mut table = TableController::new(run.table.clone(), records)
        .map_err(|e| format!("invalid table configuration: {e}"))?;
    for cmd in initial_commands(&run) {
        session::apply(&mut table, cmd).map_err(|e| e.to_string())?;
    }

    if run.interactive {
        print_banner();
    }
    print!("{}", render::render(&table.frame(), opts));

    if let Some(path) = run.export.as_deref() {
        export_table(&table, path, run.export_format)?;
    }
    if run.interactive {
        interactive(&mut table, opts)?;
    }
    Ok(())
}

pub fn run_cli() -> Result<(), String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                print!("{}", render_custom_help());
                return Ok(());
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(());
            }
            _ => return Err(e.to_string()),
        },
    };
    init_tracing(args.verbose)?;

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    if args.init_config {
        let path = user_config_path
            .or_else(config::default_config_path)
            .ok_or_else(|| "could not determine a home directory for the config".to_string())?;
        let status = if config::ensure_default_config_file(&path)? {
            "written"
        } else {
            "already exists"
        };
        format_kv_line("Config", &format!("{} ({status})", path.display()));
        return Ok(());
    }

    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let run = build_run_config(args, cfg)?;
    execute(run)
}
