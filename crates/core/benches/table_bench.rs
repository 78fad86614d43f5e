use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use ledgrid_core::content::Tokenizer;
use ledgrid_core::grid::{TableSettings, extract_table, extract_tables_par};
use ledgrid_core::{PageLayout, Segment, StatementFormat, TextFragment};

const PAGE_HEIGHT: f64 = 792.0;

/// A `rows` x `cols` grid, each cell drawn as its own box, with one text
/// fragment per cell.
fn grid_page(rows: usize, cols: usize) -> PageLayout {
    let (w, h) = (40.0, 12.0);
    let mut page = PageLayout::new(PAGE_HEIGHT);
    for r in 0..rows {
        for c in 0..cols {
            let x0 = 20.0 + c as f64 * w;
            let top = PAGE_HEIGHT - 20.0 - r as f64 * h;
            page.segments.push(Segment::rect(x0, top, x0 + w, top - h));
            page.texts.push(TextFragment::new(
                x0 + 2.0,
                top - 10.0,
                x0 + 32.0,
                top - 2.0,
                format!("r{r}c{c}"),
            ));
        }
    }
    page
}

fn statement_content(records: usize) -> String {
    let mut out = String::from("(12/01/19 - 12/31/19) Tj\n");
    for n in 0..records {
        let day = n % 28 + 1;
        out.push_str(&format!(
            "BT\n1 0 0 1 40 {y} Tm\n(12/{day:02}) Tj\n1 0 0 1 90 {y} Tm\n(MERCHANT {n}) Tj\n1 0 0 1 500 {y} Tm\n(${n}.99) Tj\nET\n",
            y = 700 - (n % 60) * 10,
        ));
    }
    out
}

fn bench_table_extract(c: &mut Criterion) {
    let settings = TableSettings::default();
    let mut group = c.benchmark_group("table_extract");
    for (rows, cols) in [(10, 4), (40, 8)] {
        let page = grid_page(rows, cols);
        group.bench_with_input(
            BenchmarkId::new("page", format!("{rows}x{cols}")),
            &page,
            |b, page| b.iter(|| black_box(extract_table(page, &settings))),
        );
    }
    let pages: Vec<PageLayout> = (0..32).map(|_| grid_page(20, 6)).collect();
    group.bench_function("pages_par_32", |b| {
        b.iter(|| black_box(extract_tables_par(&pages, &settings)))
    });
    group.finish();
}

fn bench_statement(c: &mut Criterion) {
    let format = StatementFormat::tj_strings();
    let content = statement_content(500);
    let mut group = c.benchmark_group("statement");
    group.bench_function("tokenize_500", |b| {
        b.iter(|| black_box(Tokenizer::new(&content, &format.lexicon)))
    });
    group.bench_function("transactions_500", |b| {
        let statement = ledgrid_core::Statement::from_content(&content, &format);
        b.iter(|| black_box(statement.transactions().map(|t| t.count())))
    });
    group.finish();
}

criterion_group!(benches, bench_table_extract, bench_statement);
criterion_main!(benches);
