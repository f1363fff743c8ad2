use assert_cmd::Command;
use predicates::{prelude::PredicateBooleanExt, str::contains};

fn run_script(home: &std::path::Path, script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("school_core_cli").unwrap();
    cmd.env("SCHOOL_CORE_CLI_SCRIPT", "1")
        .env("SCHOOL_CORE_HOME", home)
        .write_stdin(script.to_string())
        .assert()
        .success()
}

#[test]
fn seeded_report_card_shows_rank_and_promotion() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "login super-admin\nseed\nreport STU-0001 1\nreport STU-0003 first\nexit\n",
    )
    .stdout(
        contains("Report card: Chiamaka Nwosu (STU-0001)")
            .and(contains("Position 1 of 3"))
            .and(contains("Average 82.50"))
            .and(contains("Promotion: Repeat")),
    );
}

#[test]
fn score_entry_clamps_and_grades() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "login super-admin\nseed\nscore-set STU-0003 \"Basic Science\" 1 15 10 20 55\nscore-edit STU-0003 \"Basic Science\" 1 exam 19\nexit\n",
    )
    .stdout(
        contains("test1 limited to the range 0-10")
            .and(contains("= 95 (A1, Excellent)"))
            .and(contains("= 59 (C5, Credit)")),
    );
}

#[test]
fn payments_update_ledger_and_persist() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "login bursar\nopen demo\nlogin super-admin\nseed\nsave\nlogin bursar BR-0001\npay STU-0003 92500 transfer TRX-1 2024-11-02\nledger STU-0003\nsave\nexit\n",
    )
    .stdout(
        contains("Received ₦92,500.00 from STU-0003")
            .and(contains("balance ₦92,500.00 | Partial")),
    );

    run_script(home.path(), "login bursar\nopen demo\npayments STU-0003\nexit\n")
        .stdout(contains("TRX-1"));
    let stored = std::fs::read_to_string(home.path().join("stores").join("demo.json")).unwrap();
    assert!(stored.contains("TRX-1"));
}

#[test]
fn roles_are_limited_to_their_views() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "students\nlogin super-admin\nseed\nlogin teacher BR-0001\npay STU-0001 100\nstudents\nlogin student STU-0002\nreport STU-0001 1\nledger\nexit\n",
    )
    .stdout(
        contains("Not signed in")
            .and(contains("Teacher cannot access Payments"))
            .and(contains("STU-0003"))
            .and(contains("Student STU-0001 is outside your session"))
            .and(contains("Partial")),
    );
}

#[test]
fn backups_can_be_listed_and_restored() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "login super-admin\nseed school\nsave\nbackup before fees\nfee-set JSS1 1 0 0\nsave\nbackups\nrestore 1\nfees\nexit\n",
    )
    .stdout(
        contains("Backup written: school_")
            .and(contains("before-fees"))
            .and(contains("₦185,000.00")),
    );
}

#[test]
fn unknown_commands_suggest_alternatives() {
    let home = tempfile::tempdir().unwrap();
    run_script(home.path(), "reprot\ngrade 44\ngrade 101\nexit\n").stdout(
        contains("Did you mean `report`?")
            .and(contains("44 -> E8 (Pass)").not())
            .and(contains("Not signed in")),
    );
}

#[test]
fn collection_summary_for_branch_admin() {
    let home = tempfile::tempdir().unwrap();
    run_script(
        home.path(),
        "login super-admin\nseed\nlogin branch-admin BR-0002\ncollection\ndashboard\nexit\n",
    )
    .stdout(
        contains("Collection: BR-0002")
            .and(contains("Students     : 2"))
            .and(contains("Branch   : Ikeja Campus")),
    );
}
