use mealcounter::models::meal_type::MealType;
use predicates::str::contains;

mod common;
use common::{count, days_ago, init_db, mc, seed_on, seed_yesterday, yesterday};

#[test]
fn test_archive_moves_yesterday_once() {
    let db_path = init_db("archive_once");
    seed_yesterday(&db_path, "EMP010", MealType::Morning, 1);
    seed_yesterday(&db_path, "EMP011", MealType::Evening, 2);

    mc().args(["--db", &db_path, "archive"])
        .assert()
        .success()
        .stdout(contains("Archived 2 record(s)"));

    assert_eq!(count(&db_path, "active_meals"), 0);
    assert_eq!(count(&db_path, "archived_meals"), 2);

    mc().args(["--db", &db_path, "archive"])
        .assert()
        .success()
        .stdout(contains("Archive is up to date"));

    mc().args(["--db", &db_path, "archive", "--force"])
        .assert()
        .success()
        .stdout(contains("Nothing to archive"));

    assert_eq!(count(&db_path, "archived_meals"), 2);
}

#[test]
fn test_provide_triggers_due_sweep_and_history_shows_it() {
    let db_path = init_db("archive_on_provide");
    seed_yesterday(&db_path, "EMP020", MealType::Morning, 3);

    // Yesterday's meal no longer blocks today's.
    mc().args(["--db", &db_path, "provide", "EMP020", "--meal", "evening", "--counter", "1"])
        .assert()
        .success()
        .stdout(contains("Archived 1 meal(s)"));

    mc().args(["--db", &db_path, "history", "EMP020"])
        .assert()
        .success()
        .stdout(contains(yesterday().to_string()))
        .stdout(contains("MORNING"))
        .stdout(contains("1 meal(s)"));
}

#[test]
fn test_archive_status_reports_last_sweep() {
    let db_path = init_db("archive_status");

    mc().args(["--db", &db_path, "archive", "--status"])
        .assert()
        .success()
        .stdout(contains("Last sweep : never"))
        .stdout(contains("Sweep due  : yes"));

    mc().args(["--db", &db_path, "scheduler", "--once"])
        .assert()
        .success();

    mc().args(["--db", &db_path, "archive", "--status"])
        .assert()
        .success()
        .stdout(contains("Sweep due  : no"))
        .stdout(contains("Pending    : 0"));
}

#[test]
fn test_boot_sweep_warns_about_older_records() {
    let db_path = init_db("archive_stale_warning");
    seed_on(&db_path, "EMP040", days_ago(3), MealType::Morning, 1);
    seed_yesterday(&db_path, "EMP041", MealType::Evening, 1);

    mc().args(["--db", &db_path, "--test", "today"])
        .assert()
        .success()
        .stdout(contains("1 meal(s) from earlier days are still active"))
        .stdout(contains("archive --catch-up"));

    assert_eq!(count(&db_path, "archived_meals"), 1);
    assert_eq!(count(&db_path, "active_meals"), 1);

    mc().args(["--db", &db_path, "--test", "archive", "--catch-up"])
        .assert()
        .success()
        .stdout(contains("Archived 1 record(s)."));

    assert_eq!(count(&db_path, "active_meals"), 0);
}
