use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "tableview",
    version,
    about = "sortable, searchable, paginated tables in the terminal",
    long_about = "Tableview renders a data set as a paginated table with sorting, typo-tolerant search, per-field filtering and CSV/JSON export.\n\nExamples:\n  tableview\n  tableview -d branches.json --sort branch:desc -n 10\n  tableview -d branches.csv --search mast\n  tableview -d branches.yaml -i\n\nTip: Use --config to persist the table layout and keep CLI invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.tableview/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "init-config",
        help_heading = "Input",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,

    #[arg(
        short = 'd',
        long = "dt",
        visible_alias = "data",
        value_name = "FILE",
        help_heading = "Input",
        help = "Data file (.json, .yaml/.yml or .csv). Without it the branch sample is shown."
    )]
    pub data: Option<String>,

    #[arg(
        long = "tt",
        visible_alias = "title",
        value_name = "TEXT",
        help_heading = "Table",
        help = "Table title (also the default export file name)."
    )]
    pub title: Option<String>,

    #[arg(
        long = "fld",
        visible_alias = "fields",
        value_name = "LIST",
        help_heading = "Table",
        help = "Comma-separated fields to show; each becomes a column and a header."
    )]
    pub fields: Option<String>,

    #[arg(
        short = 'n',
        long = "ipp",
        visible_alias = "items-per-page",
        value_name = "N",
        help_heading = "Table",
        help = "Rows per page (5, 10, 25, 50 or any positive number)."
    )]
    pub items_per_page: Option<usize>,

    #[arg(
        short = 'p',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "View",
        help = "Page to show (clamped to the available pages)."
    )]
    pub page: Option<usize>,

    #[arg(
        short = 's',
        long = "srt",
        visible_alias = "sort",
        value_name = "FIELD[:asc|desc]",
        help_heading = "View",
        help = "Sort rows by a field."
    )]
    pub sort: Option<String>,

    #[arg(
        short = 'q',
        long = "sq",
        visible_alias = "search",
        value_name = "QUERY",
        help_heading = "View",
        help = "Typo-tolerant search over the search keys."
    )]
    pub search: Option<String>,

    #[arg(
        long = "sk",
        visible_alias = "search-keys",
        value_name = "LIST",
        help_heading = "View",
        help = "Comma-separated fields the search looks at (defaults to the shown fields)."
    )]
    pub search_keys: Option<String>,

    #[arg(
        short = 'f',
        long = "flt",
        visible_alias = "filter",
        value_name = "FIELD=QUERY",
        help_heading = "View",
        help = "Case-insensitive substring filter on one field."
    )]
    pub filter: Option<String>,

    #[arg(
        short = 'i',
        long = "it",
        visible_alias = "interactive",
        help_heading = "View",
        help = "Read commands from stdin after the first render (type 'help')."
    )]
    pub interactive: bool,

    #[arg(
        long = "np",
        visible_alias = "no-pagination",
        help_heading = "Features",
        help = "Hide the pager (rows are still sliced by --items-per-page)."
    )]
    pub no_pagination: bool,

    #[arg(
        long = "ns",
        visible_alias = "no-sort",
        help_heading = "Features",
        help = "Disable sorting."
    )]
    pub no_sort: bool,

    #[arg(
        long = "nsr",
        visible_alias = "no-search",
        help_heading = "Features",
        help = "Disable the global search."
    )]
    pub no_search: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "export",
        value_name = "FILE",
        help_heading = "Export",
        help = "Export the full data set to a file."
    )]
    pub export: Option<String>,

    #[arg(
        short = 'A',
        long = "ef",
        visible_alias = "export-format",
        value_name = "FORMAT",
        help_heading = "Export",
        help = "Export format (csv or json); inferred from the file name when omitted."
    )]
    pub export_format: Option<String>,
}
