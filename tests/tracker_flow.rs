mod common;

use common::{date, expense, income, open_tracker, setup_test_home, FakeRemote};
use spendbook::core::SyncStatus;
use spendbook_domain::{ViewMode, YearMonth};

#[test]
fn monthly_summary_matches_recorded_transactions() {
    let home = setup_test_home();
    let mut tracker = open_tracker(&home, date(2024, 1, 20));
    tracker.add_transaction(&expense("Groceries", 100.0, date(2024, 1, 1))).unwrap();
    tracker.add_transaction(&income("Salary", 300.0, date(2024, 1, 1))).unwrap();
    tracker.add_transaction(&expense("Bus pass", 50.0, date(2024, 1, 2))).unwrap();
    tracker.add_transaction(&expense("Rent", 900.0, date(2023, 12, 28))).unwrap();

    tracker.select_month(YearMonth::new(2024, 1).unwrap());
    let summary = tracker.summary();
    assert_eq!(summary.total_income, 300.0);
    assert_eq!(summary.total_expense, 150.0);
    assert_eq!(summary.balance, 150.0);
    assert_eq!(summary.day_count, 2);
    assert_eq!(summary.avg_expense, 75.0);

    let label = tracker.period_label();
    assert_eq!(label.title, "This Month's Summary");
    assert_eq!(label.detail, "January 2024");

    let listed: Vec<&str> = tracker
        .filtered()
        .into_iter()
        .map(|txn| txn.description.as_str())
        .collect();
    assert_eq!(listed.len(), 3);
    assert_eq!(listed[0], "Bus pass");
}

#[test]
fn single_day_custom_range_reads_as_daily() {
    let home = setup_test_home();
    let mut tracker = open_tracker(&home, date(2024, 3, 10));
    tracker.add_transaction(&expense("Lunch", 12.0, date(2024, 3, 9))).unwrap();
    tracker.add_transaction(&expense("Dinner", 30.0, date(2024, 3, 10))).unwrap();

    tracker
        .apply_custom_range(Some(date(2024, 3, 9)), Some(date(2024, 3, 9)))
        .unwrap();
    assert_eq!(tracker.view().mode, ViewMode::Custom);
    assert_eq!(tracker.period_label().title, "Daily Summary");
    assert_eq!(tracker.summary().total_expense, 12.0);

    let err = tracker
        .apply_custom_range(Some(date(2024, 3, 10)), Some(date(2024, 3, 1)))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(tracker.summary().total_expense, 12.0);
}

#[test]
fn reimporting_an_export_adds_nothing() {
    let home = setup_test_home();
    let mut tracker = open_tracker(&home, date(2024, 2, 1));
    tracker.add_transaction(&expense("Tea", 20.0, date(2024, 2, 1))).unwrap();
    tracker.add_transaction(&income("Refund", 5.0, date(2024, 2, 1))).unwrap();

    let (file_name, json) = tracker.export().unwrap();
    assert_eq!(file_name, "Asha-expenses-2024-02-01.json");

    let applied = tracker.import(&json).unwrap();
    assert_eq!(applied.value.added, 0);
    assert_eq!(applied.value.duplicates, 2);
    assert_eq!(tracker.book().transaction_count(), 2);

    let other_home = setup_test_home();
    let mut fresh = open_tracker(&other_home, date(2024, 2, 1));
    let applied = fresh.import(&json).unwrap();
    assert_eq!(applied.value.added, 2);
    assert_eq!(applied.sync, SyncStatus::Offline);
}

#[test]
fn remote_failures_keep_local_changes() {
    let home = setup_test_home();
    let remote = FakeRemote::default();
    let mut tracker = open_tracker(&home, date(2024, 5, 5)).with_remote(Box::new(remote.clone()));

    let first = tracker.add_transaction(&expense("Fuel", 40.0, date(2024, 5, 5))).unwrap();
    assert_eq!(first.sync, SyncStatus::Synced);
    assert_eq!(first.value.id, "1");

    remote.set_offline(true);
    let second = tracker.add_transaction(&expense("Snacks", 8.0, date(2024, 5, 5))).unwrap();
    assert!(matches!(second.sync, SyncStatus::LocalOnly(_)));
    assert_eq!(tracker.book().transaction_count(), 2);
    assert!(matches!(tracker.sync_from_remote().unwrap(), SyncStatus::LocalOnly(_)));
    assert_eq!(tracker.book().transaction_count(), 2);

    remote.set_offline(false);
    let created = tracker.add_category("Trips", None).unwrap();
    assert_eq!(created.value, "trips");
    assert!(created.sync.is_synced());
    let saved = remote.categories.lock().unwrap().clone().unwrap();
    assert!(saved.contains_key("trips"));
}

#[test]
fn remote_rows_are_filed_by_category_on_sync() {
    let home = setup_test_home();
    let remote = FakeRemote::default();
    let mut writer = open_tracker(&home, date(2024, 5, 5)).with_remote(Box::new(remote.clone()));
    writer.add_category("Trips", None).unwrap();
    writer.switch_category("trips").unwrap();
    writer.add_transaction(&expense("Train", 300.0, date(2024, 5, 4))).unwrap();

    let other_home = setup_test_home();
    let mut reader =
        open_tracker(&other_home, date(2024, 5, 5)).with_remote(Box::new(remote.clone()));
    assert_eq!(reader.sync_from_remote().unwrap(), SyncStatus::Synced);
    let trips = reader.book().category("trips").expect("trips synced");
    assert_eq!(trips.transactions.len(), 1);
    assert_eq!(trips.transactions[0].description, "Train");
}

#[test]
fn book_persists_in_the_data_dir() {
    let home = setup_test_home();
    {
        let mut tracker = open_tracker(&home, date(2024, 6, 1));
        tracker.add_category("Health", Some("fas fa-heart")).unwrap();
        tracker.switch_category("health").unwrap();
        tracker.add_transaction(&expense("Doctor", 60.0, date(2024, 6, 1))).unwrap();
    }

    let reopened = open_tracker(&home, date(2024, 6, 2));
    let health = reopened.book().category("health").expect("health persisted");
    assert_eq!(health.icon, "fas fa-heart");
    assert_eq!(health.transactions.len(), 1);
    assert!(home.join("data").is_dir());
}
