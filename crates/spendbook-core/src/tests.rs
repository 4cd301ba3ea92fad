use chrono::NaiveDate;

use crate::{
    category_service::CategoryService, exchange_service::ExchangeService,
    filter_service::FilterService, summary_service::SummaryService, time::FixedClock,
    transaction_service::TransactionService, view_service::ViewService, CoreError,
};
use spendbook_domain::{
    Book, Transaction, TransactionDraft, TransactionKind, ViewMode, ViewState, YearMonth,
    DEFAULT_CATEGORY_ID,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seeded_book() -> Book {
    let clock = FixedClock::on(date(2024, 1, 31));
    let mut book = Book::new();
    for (desc, amount, kind, on) in [
        ("Groceries", 100.0, TransactionKind::Expense, date(2024, 1, 1)),
        ("Salary", 300.0, TransactionKind::Income, date(2024, 1, 1)),
        ("Bus", 50.0, TransactionKind::Expense, date(2024, 1, 2)),
    ] {
        let draft = TransactionDraft::new(desc, amount, kind, Some(on));
        TransactionService::add(&mut book, &draft, &clock).expect("seed transaction");
    }
    book
}

#[test]
fn monthly_view_summary_matches_worked_example() {
    let book = seeded_book();
    let mut view = ViewState::new(ViewMode::Monthly);
    view.month = YearMonth::new(2024, 1);

    let scoped = FilterService::filter(book.active_transactions(), &view, date(2024, 6, 1));
    let summary = SummaryService::summarize(scoped);
    assert_eq!(summary.total_income, 300.0);
    assert_eq!(summary.total_expense, 150.0);
    assert_eq!(summary.balance, 150.0);
    assert_eq!(summary.day_count, 2);
    assert_eq!(summary.avg_expense, 75.0);
}

#[test]
fn single_day_custom_range_keeps_only_that_day() {
    let book = seeded_book();
    let mut view = ViewState::default();
    ViewService::apply_custom_range(&mut view, Some(date(2024, 1, 1)), Some(date(2024, 1, 1)))
        .expect("valid range");
    let scoped = FilterService::filter(book.active_transactions(), &view, date(2024, 1, 31));
    let names: Vec<&str> = scoped.iter().map(|t| t.description.as_str()).collect();
    assert_eq!(names, vec!["Groceries", "Salary"]);
}

#[test]
fn balance_is_income_minus_expense_for_every_view() {
    let book = seeded_book();
    let today = date(2024, 1, 2);
    for mode in ViewMode::ALL {
        let view = ViewState::new(mode);
        let summary = SummaryService::summarize(FilterService::filter(
            book.active_transactions(),
            &view,
            today,
        ));
        assert_eq!(summary.balance, summary.total_income - summary.total_expense);
    }
}

#[test]
fn categories_keep_transactions_apart() {
    let clock = FixedClock::on(date(2024, 1, 31));
    let mut book = seeded_book();
    let slug = CategoryService::add(&mut book, "Trip to Goa", Some("fas fa-plane")).unwrap();
    CategoryService::switch(&mut book, &slug).unwrap();
    let draft = TransactionDraft::new("Hotel", 80.0, TransactionKind::Expense, None);
    TransactionService::add(&mut book, &draft, &clock).unwrap();

    assert_eq!(book.active_transactions().len(), 1);
    assert_eq!(book.all_transactions().len(), 4);

    CategoryService::remove(&mut book, &slug).unwrap();
    assert_eq!(book.active_slug(), DEFAULT_CATEGORY_ID);
    assert_eq!(book.all_transactions().len(), 3);
    assert!(matches!(
        CategoryService::remove(&mut book, DEFAULT_CATEGORY_ID),
        Err(CoreError::ProtectedCategory(_))
    ));
}

#[test]
fn reimporting_an_export_adds_zero() {
    let mut book = seeded_book();
    let doc = ExchangeService::export(&book, "User", "temp_1", chrono::Utc::now());
    let raw = ExchangeService::export_json(&doc).unwrap();
    let outcome = ExchangeService::import_json(&mut book, &raw).unwrap();
    assert_eq!(outcome.added, 0);

    let sorted: Vec<&Transaction> = TransactionService::list_sorted(&book);
    assert_eq!(sorted[0].description, "Bus");
}
