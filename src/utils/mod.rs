use std::collections::HashSet;

use crate::controller::SortDirection;

pub fn parse_sort_spec(value: &str) -> Result<(String, SortDirection), String> {
    let raw = value.trim();
    let (field, direction) = match raw.split_once(':') {
        Some((field, dir)) => {
            let direction = SortDirection::parse(dir)
                .ok_or_else(|| format!("invalid direction '{}', expected asc or desc", dir.trim()))?;
            (field.trim(), direction)
        }
        None => (raw, SortDirection::Ascending),
    };
    if field.is_empty() {
        return Err("sort field is empty".to_string());
    }
    Ok((field.to_string(), direction))
}

pub fn parse_filter_spec(value: &str) -> Result<(String, String), String> {
    let (field, query) = value
        .split_once('=')
        .ok_or_else(|| "expected format FIELD=QUERY".to_string())?;
    let field = field.trim();
    if field.is_empty() {
        return Err("filter field is empty".to_string());
    }
    Ok((field.to_string(), query.trim().to_string()))
}

pub fn parse_fields_csv(value: &str) -> Result<Vec<String>, String> {
    let raw = value.trim();
    if raw.is_empty() {
        return Err("field list is empty".to_string());
    }
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in raw.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_string()) {
            out.push(item.to_string());
        }
    }
    if out.is_empty() {
        return Err("field list is empty".to_string());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_spec_defaults_to_ascending() {
        assert_eq!(
            parse_sort_spec("branch").unwrap(),
            ("branch".to_string(), SortDirection::Ascending)
        );
        assert_eq!(
            parse_sort_spec(" branch : DESC ").unwrap(),
            ("branch".to_string(), SortDirection::Descending)
        );
    }

    #[test]
    fn sort_spec_rejects_garbage() {
        assert!(parse_sort_spec(":asc").is_err());
        assert!(parse_sort_spec("branch:sideways").is_err());
    }

    #[test]
    fn filter_spec_allows_empty_query() {
        assert_eq!(
            parse_filter_spec("branch=mas").unwrap(),
            ("branch".to_string(), "mas".to_string())
        );
        assert_eq!(
            parse_filter_spec("branch=").unwrap(),
            ("branch".to_string(), String::new())
        );
        assert!(parse_filter_spec("branch").is_err());
        assert!(parse_filter_spec("=mas").is_err());
    }

    #[test]
    fn fields_csv_dedupes_and_skips_blanks() {
        assert_eq!(
            parse_fields_csv("branch, author,,branch").unwrap(),
            vec!["branch".to_string(), "author".to_string()]
        );
        assert!(parse_fields_csv(" , ").is_err());
    }
}
