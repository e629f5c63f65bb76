use predicates::str::contains;
use std::path::Path;

mod common;
use common::{init_db, mc, setup_test_db, temp_out};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("init_schema");

    mc().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    assert!(Path::new(&db_path).exists());

    mc().args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Active meals:"))
        .stdout(contains("Schema:"));
}

#[test]
fn test_log_records_operations() {
    let db_path = init_db("log_records");

    mc().args(["--db", &db_path, "provide", "EMP050", "--meal", "morning"])
        .assert()
        .success();

    mc().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("init"))
        .stdout(contains("EMP050"));
}

#[test]
fn test_db_check_and_vacuum() {
    let db_path = init_db("db_check");

    mc().args(["--db", &db_path, "db", "--check", "--vacuum"])
        .assert()
        .success()
        .stdout(contains("Integrity check passed"))
        .stdout(contains("Vacuum completed"));
}

#[test]
fn test_backup_compressed() {
    let db_path = init_db("backup_zip");
    let out = temp_out("backup_zip", "sqlite");
    let zip = temp_out("backup_zip", "zip");

    mc().args(["--db", &db_path, "backup", "--file", &out, "--compress", "--force"])
        .assert()
        .success()
        .stdout(contains("Backup created"));

    assert!(Path::new(&zip).exists());
    assert!(!Path::new(&out).exists());
}
