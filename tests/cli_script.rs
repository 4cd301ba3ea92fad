mod common;

use assert_cmd::Command;
use predicates::prelude::*;
use regex::Regex;

fn script(home: &std::path::Path, input: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("spendbook_cli")
        .unwrap()
        .env("SPENDBOOK_HOME", home)
        .env("SPENDBOOK_CLI_SCRIPT", "1")
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string())
        .assert()
}

#[test]
fn script_mode_records_and_summarizes() {
    let home = common::setup_test_home();
    let input = "\
config set ui_color_enabled false
add expense 100 Groceries --date 2024-01-01
add income 300 Salary --date 2024-01-01
add expense 50 \"Bus pass\" --date 2024-01-02
view monthly 2024-01
summary
exit
";
    script(&home, input)
        .success()
        .stdout(predicate::str::contains("Expense of ₹100.00 added on Jan 1, 2024"))
        .stdout(predicate::str::contains("Monthly Summary (January 2024)"))
        .stdout(predicate::str::contains("Income       : ₹300.00"))
        .stdout(predicate::str::contains("Expenses     : ₹150.00"))
        .stdout(predicate::str::contains("Balance      : ₹150.00"));
}

#[test]
fn list_shows_short_ids_that_edit_accepts() {
    let home = common::setup_test_home();
    let setup = "\
config set ui_color_enabled false
add expense 20 Tea --date 2024-02-01
view all
list
";
    let output = script(&home, setup).success().get_output().stdout.clone();
    let stdout = String::from_utf8(output).unwrap();
    let row = Regex::new(r"([0-9a-f]{8})  2024-02-01  Expense").unwrap();
    let id = row
        .captures(&stdout)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .expect("listed row");

    let edit = format!("edit {id} expense 25 Green tea\nview all\nlist\n");
    script(&home, &edit)
        .success()
        .stdout(predicate::str::contains("updated"))
        .stdout(predicate::str::contains("Green tea"))
        .stdout(predicate::str::contains("2024-02-01"));
}

#[test]
fn bad_input_reports_errors_and_continues() {
    let home = common::setup_test_home();
    let input = "\
config set ui_color_enabled false
add expense -5 Broken
category delete daily
frobnicate
category add Travel
category list
";
    script(&home, input)
        .success()
        .stdout(predicate::str::contains("ERROR: [x]"))
        .stdout(predicate::str::contains("Unknown command `frobnicate`"))
        .stdout(predicate::str::contains("Category `travel` created."))
        .stdout(predicate::str::is_match(r"\*\s+daily").unwrap());
}

#[test]
fn export_then_import_reports_duplicates() {
    let home = common::setup_test_home();
    let export_path = home.join("export.json");
    let input = format!(
        "config set ui_color_enabled false\nadd expense 10 Tea --date 2024-03-01\nexport {path}\nimport {path}\n",
        path = export_path.display()
    );
    script(&home, &input)
        .success()
        .stdout(predicate::str::contains("Exported 1 transaction(s)"))
        .stdout(predicate::str::contains("Imported 0 new transactions."))
        .stdout(predicate::str::contains("Skipped 1 already present."));
    assert!(export_path.exists());
}

#[test]
fn oversized_period_arguments_are_rejected_without_crashing() {
    let home = common::setup_test_home();
    let input = "\
config set ui_color_enabled false
quick 1000000000
view daily 2024-01-01
next 2147483647
view yearly 2147483647
trend 97000000
config set trend_days 97000000
status
exit
";
    script(&home, input)
        .success()
        .stdout(predicate::str::contains("quick range must cover 0 to 36500 days"))
        .stdout(predicate::str::contains("that period is outside the supported calendar"))
        .stdout(predicate::str::contains("invalid year `2147483647`"))
        .stdout(predicate::str::contains("invalid day count `97000000`"))
        .stdout(predicate::str::contains("must be between 1 and 366"))
        .stdout(predicate::str::contains("View         : daily"));
}

#[test]
fn version_reports_release_and_export_format() {
    let home = common::setup_test_home();
    script(&home, "config set ui_color_enabled false\nversion\n")
        .success()
        .stdout(predicate::str::is_match(r"=== spendbook \d+\.\d+\.\d+ \(\S+, built \S+\) ===").unwrap())
        .stdout(predicate::str::contains("Export format: v1.0.0"));
}
