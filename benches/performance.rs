use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spendbook_core::{
    load_book, save_book, FilterService, InsightService, SummaryService, TrendService,
};
use spendbook_domain::{Book, Transaction, TransactionKind, ViewMode, ViewState, YearMonth};
use spendbook_storage_json::JsonFileStore;
use tempfile::tempdir;

fn build_sample_book(txn_count: usize) -> Book {
    let mut book = Book::new();
    let start_date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

    for idx in 0..txn_count {
        let date = start_date + Duration::days((idx % 730) as i64);
        let kind = if idx % 5 == 0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };
        let txn = Transaction::new(format!("Entry {idx}"), 50.0 + (idx % 100) as f64, kind, date);
        book.active_mut().transactions.push(txn);
    }
    book
}

fn bench_book_io(c: &mut Criterion) {
    let book = build_sample_book(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let store = JsonFileStore::open(dir.path().join("data"), dir.path().join("backups"))
        .expect("open store");

    c.bench_function("book_save_10k", |b| {
        b.iter(|| {
            save_book(&store, "bench", &book, Utc::now()).expect("save book");
        })
    });

    save_book(&store, "bench", &book, Utc::now()).expect("seed");

    c.bench_function("book_load_10k", |b| {
        b.iter(|| {
            let loaded = load_book(&store, "bench").expect("load book");
            black_box(loaded);
        })
    });
}

fn bench_book_reports(c: &mut Criterion) {
    let book = build_sample_book(black_box(10_000));
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let mut view = ViewState::new(ViewMode::Monthly);
    view.month = YearMonth::new(2025, 6);

    c.bench_function("monthly_filter_and_summary", |b| {
        b.iter(|| {
            let scoped = FilterService::filter(book.active_transactions(), &view, today);
            black_box(SummaryService::summarize(scoped));
        })
    });

    let all: Vec<&Transaction> = book.active_transactions().iter().collect();
    c.bench_function("insights_10k", |b| {
        b.iter(|| black_box(InsightService::generate(&all, today)))
    });

    c.bench_function("trend_all_time_10k", |b| {
        b.iter(|| black_box(TrendService::all_time(&all)))
    });
}

criterion_group!(benches, bench_book_io, bench_book_reports);
criterion_main!(benches);
