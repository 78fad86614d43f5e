//! Geometric table reconstruction over synthetic page layouts.

use ledgrid_core::grid::{
    Orientation, Table, TableSettings, detect_cells, extract_table, extract_tables,
    extract_tables_par, ruling_lines,
};
use ledgrid_core::{PageLayout, PrecomputedLayout, Segment, TextFragment};

const H: f64 = 300.0;

// Page-space (y down) helpers. Layout input is PDF space, so flip here.
fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
    Segment::line(x0, H - y0, x1, H - y1)
}

fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Segment {
    Segment::rect(x0, H - y0, x1, H - y1)
}

fn text(x0: f64, y0: f64, x1: f64, y1: f64, s: &str) -> TextFragment {
    TextFragment::new(x0, H - y0, x1, H - y1, s)
}

fn cells_of(segments: Vec<Segment>) -> usize {
    let settings = TableSettings::default();
    let lines = ruling_lines(&segments, H, settings.tolerance);
    detect_cells(&lines, settings.tolerance).len()
}

fn square() -> Vec<Segment> {
    vec![
        line(10.0, 10.0, 110.0, 10.0),
        line(110.0, 10.0, 110.0, 60.0),
        line(10.0, 60.0, 110.0, 60.0),
        line(10.0, 10.0, 10.0, 60.0),
    ]
}

fn grid_page() -> PageLayout {
    let mut page = PageLayout::new(H);
    page.segments = vec![
        rect(0.0, 0.0, 50.0, 20.0),
        rect(50.0, 0.0, 100.0, 20.0),
        rect(0.0, 20.0, 50.0, 40.0),
        rect(50.0, 20.0, 100.0, 40.0),
    ];
    page.texts = vec![
        text(55.0, 5.0, 95.0, 15.0, "Amount"),
        text(5.0, 5.0, 40.0, 15.0, "Date"),
        text(5.0, 22.0, 40.0, 38.0, "12/05\nPENDING\n"),
        text(55.0, 25.0, 95.0, 35.0, "12.34"),
        text(200.0, 200.0, 240.0, 210.0, "page 1 of 3"),
    ];
    page
}

fn strings(cells: &[&[&str]]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|c| c.iter().map(|s| s.to_string()).collect())
        .collect()
}

#[test]
fn test_perfect_square_closes_one_cell() {
    assert_eq!(cells_of(square()), 1);
}

#[test]
fn test_square_with_endpoint_noise_closes_one_cell() {
    let segments = vec![
        line(10.0, 10.0, 110.0, 10.0),
        line(111.0, 11.0, 111.0, 61.0),
        line(9.0, 61.0, 111.0, 61.0),
        line(10.0, 10.0, 10.0, 60.0),
    ];
    assert_eq!(cells_of(segments), 1);
}

#[test]
fn test_removing_any_side_closes_nothing() {
    for skip in 0..4 {
        let segments: Vec<Segment> = square()
            .into_iter()
            .enumerate()
            .filter(|(i, _)| *i != skip)
            .map(|(_, s)| s)
            .collect();
        assert_eq!(cells_of(segments), 0, "side {skip} removed");
    }
}

#[test]
fn test_diagonals_are_ignored() {
    let mut segments = square();
    segments.push(line(10.0, 10.0, 110.0, 60.0));
    let lines = ruling_lines(&segments, H, 2.0);
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines
            .iter()
            .filter(|l| l.orientation == Orientation::Horizontal)
            .count(),
        2
    );
}

#[test]
fn test_grid_assigns_text_to_cells() {
    let table = extract_table(&grid_page(), &TableSettings::default());
    assert_eq!(
        table.rows,
        vec![
            strings(&[&["Date"], &["Amount"]]),
            strings(&[&["12/05", "PENDING"], &["12.34"]]),
        ]
    );
}

#[test]
fn test_unsplit_text_stays_whole() {
    let settings = TableSettings {
        split_text_lines: false,
        ..TableSettings::default()
    };
    let table = extract_table(&grid_page(), &settings);
    assert_eq!(table.rows[1][0], vec!["12/05\nPENDING".to_string()]);
}

#[test]
fn test_reconstruction_is_idempotent() {
    let page = grid_page();
    let settings = TableSettings::default();
    assert_eq!(extract_table(&page, &settings), extract_table(&page, &settings));
}

#[test]
fn test_rows_without_text_are_dropped_by_default() {
    let mut page = grid_page();
    page.texts.retain(|t| t.text == "Date" || t.text == "Amount");
    let drop = extract_table(&page, &TableSettings::default());
    assert_eq!(drop.rows, vec![strings(&[&["Date"], &["Amount"]])]);
    let keep = extract_table(
        &page,
        &TableSettings {
            keep_empty_rows: true,
            ..TableSettings::default()
        },
    );
    assert_eq!(keep.rows.len(), 2);
    assert!(keep.rows[1].iter().all(|cell| cell.is_empty()));
}

#[test]
fn test_nested_boxes_share_their_text() {
    let mut page = PageLayout::new(H);
    page.segments = vec![rect(0.0, 0.0, 100.0, 100.0), rect(10.0, 10.0, 50.0, 50.0)];
    page.texts = vec![text(20.0, 20.0, 30.0, 30.0, "X")];
    let table = extract_table(&page, &TableSettings::default());
    assert_eq!(table.rows, vec![strings(&[&["X"]]), strings(&[&["X"]])]);
}

#[test]
fn test_out_of_range_coordinates_do_not_panic() {
    let mut page = PageLayout::new(H);
    page.segments = vec![
        Segment::line(0.0, -1e300, 50.0, -1e300),
        Segment::line(0.0, -1e300, 0.0, 10.0),
        Segment::line(f64::NAN, 0.0, f64::INFINITY, 0.0),
    ];
    page.texts = vec![text(1.0, 1.0, 2.0, 2.0, "x")];
    assert!(extract_table(&page, &TableSettings::default()).is_empty());
}

#[test]
fn test_page_without_geometry_is_empty() {
    let mut page = PageLayout::new(H);
    page.texts.push(text(0.0, 0.0, 10.0, 10.0, "lonely"));
    assert!(extract_table(&page, &TableSettings::default()).is_empty());
}

#[test]
fn test_tables_iterate_per_page() {
    let layout = PrecomputedLayout::new(vec![grid_page(), PageLayout::new(H), grid_page()]);
    let tables: Vec<Table> = extract_tables(b"%PDF-1.4", &layout, TableSettings::default())
        .unwrap()
        .collect();
    assert_eq!(tables.len(), 3);
    assert!(tables[1].is_empty());
    assert_eq!(tables[0], tables[2]);
    assert!(extract_tables(b"not a pdf", &layout, TableSettings::default()).is_err());
}

#[test]
fn test_parallel_matches_sequential() {
    let pages = vec![grid_page(), PageLayout::new(H), grid_page()];
    let settings = TableSettings::default();
    let sequential: Vec<Table> = pages.iter().map(|p| extract_table(p, &settings)).collect();
    assert_eq!(extract_tables_par(&pages, &settings), sequential);
}

#[test]
fn test_table_serializes_as_nested_arrays() {
    let table = extract_table(&grid_page(), &TableSettings::default());
    let json = serde_json::to_string(&table).unwrap();
    assert!(json.starts_with(r#"[[["Date"],["Amount"]]"#));
}

#[test]
fn test_tolerance_boundary_is_exclusive() {
    use ledgrid_core::geometry::{APPROX_TOLERANCE, approx_eq};
    assert!(approx_eq(100.0, 100.0 + APPROX_TOLERANCE - 0.01));
    assert!(!approx_eq(100.0, 100.0 + APPROX_TOLERANCE));

    // Parallel rules exactly one tolerance apart stay distinct.
    let segments = vec![line(10.0, 10.0, 110.0, 10.0), line(10.0, 12.0, 110.0, 12.0)];
    assert_eq!(ruling_lines(&segments, H, APPROX_TOLERANCE).len(), 2);
}

#[test]
fn test_boxed_grid_yields_every_cell() {
    let (rows, cols) = (3, 4);
    let mut page = PageLayout::new(H);
    for r in 0..rows {
        for c in 0..cols {
            let (x0, y0) = (20.0 + c as f64 * 40.0, 20.0 + r as f64 * 12.0);
            page.segments.push(rect(x0, y0, x0 + 40.0, y0 + 12.0));
            page.texts.push(text(x0 + 2.0, y0 + 2.0, x0 + 32.0, y0 + 10.0, format!("r{r}c{c}").as_str()));
        }
    }
    let table = extract_table(&page, &TableSettings::default());
    assert_eq!(table.rows.len(), rows);
    assert!(table.rows.iter().all(|row| row.len() == cols));
    assert_eq!(table.rows[2][3], vec!["r2c3".to_string()]);
}
