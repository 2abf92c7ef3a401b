use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(n) = args.items_per_page {
        if n == 0 {
            return Err("invalid items-per-page, expected positive integer".to_string());
        }
    }
    if let Some(page) = args.page {
        if page == 0 {
            return Err("invalid page, pages start at 1".to_string());
        }
    }
    if let Some(raw) = args.sort.as_deref() {
        crate::utils::parse_sort_spec(raw).map_err(|e| format!("invalid --sort '{raw}': {e}"))?;
    }
    if let Some(raw) = args.filter.as_deref() {
        crate::utils::parse_filter_spec(raw)
            .map_err(|e| format!("invalid --filter '{raw}': {e}"))?;
    }
    if let Some(raw) = args.fields.as_deref() {
        crate::utils::parse_fields_csv(raw).map_err(|e| format!("invalid --fields '{raw}': {e}"))?;
    }
    if let Some(raw) = args.search_keys.as_deref() {
        crate::utils::parse_fields_csv(raw)
            .map_err(|e| format!("invalid --search-keys '{raw}': {e}"))?;
    }
    if let Some(raw) = args.export_format.as_deref() {
        if crate::export::ExportFormat::parse(raw).is_none() {
            return Err(format!("invalid --export-format '{raw}', expected csv or json"));
        }
    }
    if args.search.is_some() && args.filter.is_some() {
        return Err("--search and --filter are mutually exclusive".to_string());
    }
    Ok(())
}
