pub mod pagination;

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, warn};

use crate::model::Record;
use crate::search::{field_contains, FuzzyMatch, FuzzySearcher};
use crate::table::{validate_records, Column, FieldDescriptor, TableConfig, TableError};

use pagination::PageItem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "up" => Some(Self::Ascending),
            "desc" | "descending" | "down" => Some(Self::Descending),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortDescriptor {
    pub field: String,
    pub direction: SortDirection,
}

impl fmt::Display for SortDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            SortDirection::Ascending => write!(f, "Sorted Asc by {}", self.field),
            SortDirection::Descending => write!(f, "Sorted Desc by {}", self.field),
        }
    }
}

/// Which rows feed the view. The modes replace each other, they never stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchMode {
    Normal,
    FieldFiltering { field: String, query: String },
    FuzzySearching { query: String },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PaginationMetadata {
    pub active_page: usize,
    pub total_pages: usize,
}

/// Everything a renderer needs for one draw.
#[derive(Debug)]
pub struct Frame<'a> {
    pub title: Option<&'a str>,
    pub headers: &'a [FieldDescriptor],
    pub columns: &'a [Column],
    pub rows: Vec<&'a Record>,
    pub metadata: PaginationMetadata,
    pub items_per_page: usize,
    pub sort: Option<&'a SortDescriptor>,
    pub mode: &'a SearchMode,
    /// Match count while fuzzy searching.
    pub found: Option<usize>,
    pub page_items: Vec<PageItem>,
    pub show_pagination: bool,
    pub sortable: bool,
    pub searchable: bool,
    pub filterable: bool,
    pub exportable: bool,
    pub source_is_empty: bool,
}

impl Frame<'_> {
    /// Whether the table is currently sorted by `field` in `direction`, in
    /// which case the control that would re-trigger that sort is hidden.
    pub fn is_sorted_by(&self, field: &str, direction: SortDirection) -> bool {
        self.sort
            .map(|s| s.field == field && s.direction == direction)
            .unwrap_or(false)
    }
}

pub struct TableController {
    config: TableConfig,
    searcher: FuzzySearcher,
    source: Vec<Record>,
    /// Every source index in sort order.
    sorted: Vec<usize>,
    /// Indices feeding pagination: `sorted`, or its filtered subset.
    view: Vec<usize>,
    matches: Vec<FuzzyMatch>,
    active_page: usize,
    items_per_page: usize,
    sort: Option<SortDescriptor>,
    mode: SearchMode,
}

impl TableController {
    pub fn new(config: TableConfig, records: Vec<Record>) -> Result<Self, TableError> {
        config.validate()?;
        let searcher = FuzzySearcher::new(config.effective_search_keys(), config.fuzzy);
        let items_per_page = config.items_per_page;
        let mut controller = Self {
            config,
            searcher,
            source: Vec::new(),
            sorted: Vec::new(),
            view: Vec::new(),
            matches: Vec::new(),
            active_page: 1,
            items_per_page,
            sort: None,
            mode: SearchMode::Normal,
        };
        controller.set_data(records);
        Ok(controller)
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// The untouched source sequence, in the order it was supplied.
    pub fn data(&self) -> &[Record] {
        &self.source
    }

    pub fn sort_descriptor(&self) -> Option<&SortDescriptor> {
        self.sort.as_ref()
    }

    pub fn mode(&self) -> &SearchMode {
        &self.mode
    }

    pub fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    pub fn is_fuzzy_searching(&self) -> bool {
        matches!(self.mode, SearchMode::FuzzySearching { .. })
    }

    /// Replaces the backing data. The current sort is re-applied, search and
    /// field filters are dropped.
    pub fn set_data(&mut self, records: Vec<Record>) {
        for (field, missing) in validate_records(&self.config, &records) {
            warn!(field = %field, missing, "records lack a sort/search field");
        }
        self.source = records;
        self.mode = SearchMode::Normal;
        self.matches.clear();
        self.materialize_sorted();
        self.view = self.sorted.clone();
        self.active_page = 1;
        debug!(
            rows = self.source.len(),
            total_pages = self.total_pages(),
            "data replaced"
        );
    }

    pub fn sort_by(&mut self, field: &str, direction: SortDirection) {
        self.sort = Some(SortDescriptor {
            field: field.to_string(),
            direction,
        });
        self.materialize_sorted();
        self.rebuild_view();
        self.active_page = 1;
        debug!(field, direction = direction.label(), "sorted");
    }

    pub fn set_items_per_page(&mut self, n: usize) -> Result<(), TableError> {
        if n == 0 {
            return Err(TableError::InvalidItemsPerPage { value: n });
        }
        self.items_per_page = n;
        self.active_page = 1;
        debug!(
            items_per_page = n,
            total_pages = self.total_pages(),
            "page size changed"
        );
        Ok(())
    }

    /// Moves to `page`, clamped into the valid range. Returns the page that is
    /// active afterwards.
    pub fn go_to_page(&mut self, page: usize) -> usize {
        if self.is_fuzzy_searching() {
            debug!(page, "page change ignored while searching");
            return self.active_page;
        }
        let total = self.total_pages();
        let clamped = pagination::clamp_page(page, total);
        if clamped != page {
            warn!(requested = page, clamped, total_pages = total, "page out of range");
        }
        self.active_page = clamped;
        clamped
    }

    pub fn next_page(&mut self) -> usize {
        self.go_to_page(self.active_page.saturating_add(1))
    }

    pub fn previous_page(&mut self) -> usize {
        self.go_to_page(self.active_page.saturating_sub(1))
    }

    /// Global search. An empty query returns to the full, paginated data.
    pub fn search(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            self.mode = SearchMode::Normal;
            self.matches.clear();
            self.view = self.sorted.clone();
            self.active_page = 1;
            debug!("search cleared");
            return;
        }
        let candidates = self.sorted.iter().map(|&i| (i, &self.source[i]));
        self.matches = self.searcher.search(candidates, query);
        self.mode = SearchMode::FuzzySearching {
            query: query.to_string(),
        };
        self.view = self.sorted.clone();
        debug!(query, found = self.matches.len(), "fuzzy search");
    }

    /// Per-field filter. An empty query restores the unfiltered data.
    pub fn search_by_field(&mut self, query: &str, field: &str) {
        self.matches.clear();
        if query.is_empty() {
            self.mode = SearchMode::Normal;
        } else {
            self.mode = SearchMode::FieldFiltering {
                field: field.to_string(),
                query: query.to_string(),
            };
        }
        self.rebuild_view();
        self.active_page = 1;
        debug!(field, query, rows = self.view.len(), "field filter");
    }

    /// Leaving a per-field input drops its filter.
    pub fn blur_field_filter(&mut self) {
        if let SearchMode::FieldFiltering { .. } = self.mode {
            self.mode = SearchMode::Normal;
            self.rebuild_view();
            self.active_page = 1;
            debug!("field filter cleared");
        }
    }

    /// Rows that feed pagination, in view order.
    pub fn ordered_rows(&self) -> Vec<&Record> {
        self.view.iter().map(|&i| &self.source[i]).collect()
    }

    pub fn visible_rows(&self) -> Vec<&Record> {
        if self.is_fuzzy_searching() {
            return self
                .matches
                .iter()
                .map(|m| &self.source[m.index])
                .collect();
        }
        let bounds =
            pagination::page_bounds(self.active_page, self.items_per_page, self.view.len());
        self.view[bounds]
            .iter()
            .map(|&i| &self.source[i])
            .collect()
    }

    pub fn pagination_metadata(&self) -> PaginationMetadata {
        PaginationMetadata {
            active_page: self.active_page,
            total_pages: self.total_pages(),
        }
    }

    pub fn found_count(&self) -> Option<usize> {
        if self.is_fuzzy_searching() {
            Some(self.matches.len())
        } else {
            None
        }
    }

    pub fn frame(&self) -> Frame<'_> {
        let metadata = self.pagination_metadata();
        Frame {
            title: self.config.title.as_deref(),
            headers: &self.config.headers,
            columns: &self.config.columns,
            rows: self.visible_rows(),
            metadata,
            items_per_page: self.items_per_page,
            sort: self.sort.as_ref(),
            mode: &self.mode,
            found: self.found_count(),
            page_items: pagination::page_items(metadata.active_page, metadata.total_pages, 1, 1),
            show_pagination: self.config.pagination && !self.is_fuzzy_searching(),
            sortable: self.config.sort,
            searchable: self.config.search,
            filterable: self.config.search_by_fields,
            exportable: self.config.export_csv,
            source_is_empty: self.source.is_empty(),
        }
    }

    fn total_pages(&self) -> usize {
        pagination::total_pages(self.view.len(), self.items_per_page)
    }

    fn materialize_sorted(&mut self) {
        let mut order: Vec<usize> = (0..self.source.len()).collect();
        if let Some(sort) = self.sort.as_ref() {
            let source = &self.source;
            order.sort_by(|&a, &b| compare_records(&source[a], &source[b], sort));
        }
        self.sorted = order;
    }

    fn rebuild_view(&mut self) {
        self.view = match &self.mode {
            SearchMode::FieldFiltering { field, query } => self
                .sorted
                .iter()
                .copied()
                .filter(|&i| field_contains(&self.source[i], field, query))
                .collect(),
            SearchMode::Normal | SearchMode::FuzzySearching { .. } => self.sorted.clone(),
        };
    }
}

fn compare_records(a: &Record, b: &Record, sort: &SortDescriptor) -> Ordering {
    let ord = a.value(&sort.field).total_cmp(b.value(&sort.field));
    match sort.direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}
