use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::model::Record;
use crate::search::FuzzyOptions;

/// Page sizes offered by the page-size picker.
pub const PAGE_SIZE_CHOICES: [usize; 4] = [5, 10, 25, 50];

/// Page size used when none is configured, effectively "everything on one page".
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10000;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct FieldDescriptor {
    #[serde(alias = "displayName")]
    pub display_name: String,
    #[serde(alias = "sortingFieldName")]
    pub sorting_field_name: String,
}

impl FieldDescriptor {
    pub fn new(display_name: &str, sorting_field_name: &str) -> Self {
        Self {
            display_name: display_name.to_string(),
            sorting_field_name: sorting_field_name.to_string(),
        }
    }
}

pub type CellRenderer = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// How a column turns a record into cell text.
#[derive(Clone)]
pub enum Column {
    Field(String),
    /// `{field}` placeholders are replaced with the record's field text.
    /// `{{` and `}}` escape literal braces.
    Template(String),
    Custom(CellRenderer),
}

impl Column {
    pub fn field(name: &str) -> Self {
        Column::Field(name.to_string())
    }

    pub fn custom<F>(render: F) -> Self
    where
        F: Fn(&Record) -> String + Send + Sync + 'static,
    {
        Column::Custom(Arc::new(render))
    }

    pub fn render(&self, record: &Record) -> String {
        match self {
            Column::Field(name) => record.text(name),
            Column::Template(template) => render_template(template, record),
            Column::Custom(render) => render(record),
        }
    }

    pub fn field_name(&self) -> Option<&str> {
        match self {
            Column::Field(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Column::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Column::Template(t) => f.debug_tuple("Template").field(t).finish(),
            Column::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Config-file form of a column: either a bare field name or
/// `{ template: "..." }`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ColumnSpec {
    Field(String),
    Template { template: String },
}

impl From<ColumnSpec> for Column {
    fn from(spec: ColumnSpec) -> Self {
        match spec {
            ColumnSpec::Field(name) => Column::Field(name),
            ColumnSpec::Template { template } => Column::Template(template),
        }
    }
}

fn render_template(template: &str, record: &Record) -> String {
    let mut out = String::with_capacity(template.len());
    let mut it = template.chars().peekable();
    while let Some(ch) = it.next() {
        match ch {
            '{' if it.peek() == Some(&'{') => {
                it.next();
                out.push('{');
            }
            '}' if it.peek() == Some(&'}') => {
                it.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                let mut closed = false;
                for c in it.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if closed {
                    out.push_str(&record.text(name.trim()));
                } else {
                    out.push('{');
                    out.push_str(&name);
                }
            }
            _ => out.push(ch),
        }
    }
    out
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    #[error("invalid items_per_page {value}, expected positive integer")]
    InvalidItemsPerPage { value: usize },

    #[error("no columns configured")]
    NoColumns,

    #[error("search key '{key}' is empty")]
    EmptySearchKey { key: String },

    #[error("invalid fuzzy option {name}: {message}")]
    InvalidFuzzyOption { name: &'static str, message: String },
}

/// Construction-time table configuration. Everything but the data is fixed
/// for the lifetime of a controller.
#[derive(Clone, Debug)]
pub struct TableConfig {
    pub headers: Vec<FieldDescriptor>,
    pub columns: Vec<Column>,
    pub items_per_page: usize,
    pub pagination: bool,
    pub search: bool,
    pub sort: bool,
    pub title: Option<String>,
    pub export_csv: bool,
    pub search_by_fields: bool,
    /// Fields the global search looks at. Empty means "every plain field column".
    pub search_keys: Vec<String>,
    pub fuzzy: FuzzyOptions,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            headers: Vec::new(),
            columns: Vec::new(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            pagination: false,
            search: false,
            sort: false,
            title: None,
            export_csv: false,
            search_by_fields: false,
            search_keys: Vec::new(),
            fuzzy: FuzzyOptions::default(),
        }
    }
}

impl TableConfig {
    /// The configuration the bundled branch demo runs with.
    pub fn branch_demo() -> Self {
        Self {
            headers: vec![FieldDescriptor::new("Branch", "branch")],
            columns: vec![Column::field("branch")],
            items_per_page: 5,
            pagination: true,
            search: true,
            sort: true,
            title: Some("Data Branches".to_string()),
            export_csv: true,
            search_by_fields: true,
            search_keys: Vec::new(),
            fuzzy: FuzzyOptions::default(),
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        if self.items_per_page == 0 {
            return Err(TableError::InvalidItemsPerPage {
                value: self.items_per_page,
            });
        }
        if self.columns.is_empty() {
            return Err(TableError::NoColumns);
        }
        if let Some(key) = self.search_keys.iter().find(|k| k.trim().is_empty()) {
            return Err(TableError::EmptySearchKey { key: key.clone() });
        }
        self.fuzzy.validate()?;
        Ok(())
    }

    pub fn effective_search_keys(&self) -> Vec<String> {
        if !self.search_keys.is_empty() {
            return self.search_keys.clone();
        }
        self.columns
            .iter()
            .filter_map(|c| c.field_name().map(|s| s.to_string()))
            .collect()
    }
}

/// Fields a configuration sorts, filters or searches by that some records
/// lack. Returned as `(field, missing_count)` pairs.
pub fn validate_records(config: &TableConfig, records: &[Record]) -> Vec<(String, usize)> {
    let mut fields: Vec<String> = Vec::new();
    if config.sort || config.search_by_fields {
        fields.extend(
            config
                .headers
                .iter()
                .filter(|h| !h.sorting_field_name.is_empty())
                .map(|h| h.sorting_field_name.clone()),
        );
    }
    if config.search {
        fields.extend(config.effective_search_keys());
    }
    let mut out: Vec<(String, usize)> = Vec::new();
    for field in fields {
        if out.iter().any(|(f, _)| *f == field) {
            continue;
        }
        let missing = records.iter().filter(|r| !r.contains(&field)).count();
        if missing > 0 {
            out.push((field, missing));
        }
    }
    out
}
