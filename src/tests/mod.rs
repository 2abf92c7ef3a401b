use crate::controller::{SearchMode, SortDirection, TableController};
use crate::model::{sample_branches, Record, Value};
use crate::render::{render, RenderOptions};
use crate::session::{apply, parse_command, Outcome};
use crate::table::{Column, ColumnSpec, FieldDescriptor, TableConfig};

const PLAIN: RenderOptions = RenderOptions { color: false };

fn demo() -> TableController {
    TableController::new(TableConfig::branch_demo(), sample_branches()).unwrap()
}

fn run(table: &mut TableController, line: &str) -> Outcome {
    let cmd = parse_command(line).unwrap().unwrap();
    apply(table, cmd).unwrap()
}

fn branches(rows: &[&Record]) -> Vec<String> {
    rows.iter().map(|r| r.text("branch")).collect()
}

#[test]
fn last_page_of_sample_has_two_rows() {
    let mut t = demo();
    run(&mut t, "page 3");
    assert_eq!(branches(&t.visible_rows()), vec!["develop2", "feature2"]);
    let out = render(&t.frame(), PLAIN);
    assert!(out.ends_with("Show 5 items per page   ‹ 1 2 [3] ›\n"));
}

#[test]
fn larger_page_size_fits_everything_on_one_page() {
    let mut t = demo();
    run(&mut t, "page 2");
    run(&mut t, "size 50");
    let meta = t.pagination_metadata();
    assert_eq!((meta.active_page, meta.total_pages), (1, 1));
    assert_eq!(t.visible_rows().len(), 12);
}

#[test]
fn filter_then_sort_then_blur() {
    let mut t = demo();
    run(&mut t, "filter branch master");
    assert_eq!(branches(&t.visible_rows()), vec!["master", "master1", "master2"]);

    run(&mut t, "sort branch desc");
    assert_eq!(branches(&t.visible_rows()), vec!["master2", "master1", "master"]);

    run(&mut t, "blur");
    assert_eq!(t.mode(), &SearchMode::Normal);
    assert_eq!(t.ordered_rows().len(), 12);
    assert_eq!(t.visible_rows()[0].text("branch"), "staging2");
}

#[test]
fn search_visible_rows_match_found_count() {
    let mut t = demo();
    for query in ["mast", "develop", "featur2", "zzzz"] {
        run(&mut t, &format!("search {query}"));
        assert_eq!(Some(t.visible_rows().len()), t.found_count(), "{query}");
    }
    run(&mut t, "clear");
    assert_eq!(t.found_count(), None);
    assert_eq!(t.visible_rows().len(), 5);
}

#[test]
fn total_pages_follows_ceiling_division() {
    for n in 0..=30usize {
        let data: Vec<Record> = (0..n)
            .map(|i| Record::new().with("branch", format!("b{i}").as_str()))
            .collect();
        for k in [1usize, 5, 7, 10] {
            let mut t = TableController::new(TableConfig::branch_demo(), data.clone()).unwrap();
            t.set_items_per_page(k).unwrap();
            assert_eq!(t.pagination_metadata().total_pages, (n + k - 1) / k, "n={n} k={k}");
        }
    }
}

#[test]
fn ascending_and_descending_mirror_each_other() {
    let mut t = demo();
    t.set_items_per_page(50).unwrap();
    t.sort_by("branch", SortDirection::Ascending);
    let mut asc = branches(&t.visible_rows());
    t.sort_by("branch", SortDirection::Descending);
    let desc = branches(&t.visible_rows());
    asc.reverse();
    assert_eq!(asc, desc);
}

#[test]
fn repeated_operations_are_idempotent() {
    let mut a = demo();
    let mut b = demo();
    for line in ["sort branch asc", "page 2", "filter branch a"] {
        run(&mut a, line);
        run(&mut b, line);
        run(&mut b, line);
    }
    assert_eq!(branches(&a.visible_rows()), branches(&b.visible_rows()));
    assert_eq!(a.pagination_metadata(), b.pagination_metadata());
}

#[test]
fn csv_data_file_drives_a_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("branches.csv");
    std::fs::write(
        &path,
        "branch,ahead,author\nmaster,0,ann\ndevelop,12,bob\nfeature,3,\n",
    )
    .unwrap();
    let records = crate::data::load_records(&path).unwrap();
    assert_eq!(records[1].value("ahead"), &Value::Number(12.0));

    let cfg = TableConfig {
        headers: vec![
            FieldDescriptor::new("Branch", "branch"),
            FieldDescriptor::new("Ahead", "ahead"),
        ],
        columns: vec![
            Column::field("branch"),
            Column::from(ColumnSpec::Template {
                template: "+{ahead}".to_string(),
            }),
        ],
        sort: true,
        ..TableConfig::default()
    };
    let mut t = TableController::new(cfg, records).unwrap();
    t.sort_by("ahead", SortDirection::Descending);
    let out = render(&t.frame(), PLAIN);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "Sorted Desc by ahead");
    assert_eq!(lines[1], "Branch ↓↑ | Ahead ↓");
    assert_eq!(lines[3], "develop   | +12");
    assert_eq!(lines[5], "master    | +0");
}

#[test]
fn export_of_sample_ignores_view_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.csv");
    let mut t = demo();
    run(&mut t, "sort branch desc");
    run(&mut t, "search develp");
    let outcome = run(&mut t, &format!("export {}", path.display()));
    assert_eq!(outcome, Outcome::Exported { path: path.clone(), rows: 12 });

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 13);
    assert_eq!(lines[0], "Branch");
    assert_eq!(lines[1], "master");
    assert_eq!(lines[12], "feature2");
}

#[test]
fn json_export_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");
    let mut t = demo();
    run(&mut t, &format!("export {}", path.display()));
    let parsed: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().map(|a| a.len()), Some(12));
    assert_eq!(parsed[4]["Branch"], "master1");
}

#[test]
fn empty_data_renders_message_without_pages() {
    let t = TableController::new(TableConfig::branch_demo(), Vec::new()).unwrap();
    let meta = t.pagination_metadata();
    assert_eq!((meta.active_page, meta.total_pages), (1, 0));
    let out = render(&t.frame(), PLAIN);
    assert!(out.contains("There is no data to display"));
}
