//! Integration tests for the whs CLI
//!
//! These tests drive session scripts end-to-end through `whs run`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Helper to get a whs command isolated from the caller's environment
fn whs() -> Command {
    let mut cmd = Command::cargo_bin("whs").unwrap();
    cmd.env_remove("WHS_CONFIG")
        .env_remove("WHS_FORMAT")
        .env_remove("WHS_DEFAULT_YEAR")
        .env_remove("WHS_DEFAULT_PRICE")
        .env_remove("RUST_LOG");
    cmd
}

/// Helper to write a script into a temp directory
fn write_script(tmp: &TempDir, body: &str) -> std::path::PathBuf {
    let path = tmp.path().join("session.whs");
    fs::write(&path, body).unwrap();
    path
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    whs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Warehouse inventory toolkit"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("shell"));
}

#[test]
fn test_version_displays() {
    whs()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("whs"));
}

#[test]
fn test_completions_bash() {
    whs()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_whs"));
}

#[test]
fn test_missing_script_fails() {
    let tmp = TempDir::new().unwrap();
    whs()
        .arg("run")
        .arg(tmp.path().join("nope.whs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read script"));
}

// ============================================================================
// Session Scripts
// ============================================================================

#[test]
fn test_register_buy_search_sell() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        r#"# alice stocks and sells a bolt
register alice pw1
add detail --name Bolt --manufacturer ACME --year 2020 --price 0.5 --material steel
search bo
sell @1
search bo
"#,
    );

    whs()
        .args(["-f", "tsv", "run"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Registered warehouse 'alice'"))
        .stdout(predicate::str::contains("✓ Added Detail @1 Bolt"))
        .stdout(predicate::str::contains("@1\tDetail\tBolt\tACME\t2020\t0.5\tsteel"))
        .stdout(predicate::str::contains("✓ Removed 1 item(s)"))
        .stdout(predicate::str::contains("No items found for 'bo'."));
}

#[test]
fn test_script_from_stdin() {
    whs()
        .args(["run", "-"])
        .write_stdin("register bob pw\nsummary\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Warehouse bob"))
        .stdout(predicate::str::contains("Total value: 0"));
}

#[test]
fn test_duplicate_login_fails_with_line_number() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(&tmp, "register alice pw1\nregister alice pw2\n");

    whs()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("already taken"));
}

#[test]
fn test_invalid_credentials() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(&tmp, "register alice pw1\nlogout\nlogin alice PW1\n");

    whs()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stdout(predicate::str::contains("✓ Logged out 'alice'"))
        .stderr(predicate::str::contains("wrong login or password"));
}

#[test]
fn test_not_logged_in() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(&tmp, "stock\n");

    whs()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not logged in"))
        .stderr(predicate::str::contains("register"));
}

#[test]
fn test_assembly_consumes_details() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        r#"register alice pw1
add detail --name Bolt --manufacturer ACME --material steel
add detail --name Nut --manufacturer ACME --material brass
add detail --name Spring --manufacturer "Coil Co" --material steel
add assembly --name Shaft --manufacturer ACME --price 5 --details @1,@2
stock --kind detail
tree @4
"#,
    );

    whs()
        .args(["-f", "tsv", "run"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ Added Assembly @4 Shaft"))
        .stdout(predicate::str::contains("@3\tDetail\tSpring"))
        .stdout(predicate::str::contains("Bolt\tACME").not())
        .stdout(predicate::str::contains("├─ Bolt [Detail, steel]"))
        .stdout(predicate::str::contains("└─ Nut [Detail, brass]"));
}

#[test]
fn test_consumed_detail_cannot_be_reused() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        r#"register alice pw1
add detail --name Bolt --manufacturer ACME --material steel
add assembly --name First --manufacturer ACME --details @1
add assembly --name Second --manufacturer ACME --details @1
"#,
    );

    whs()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 4"))
        .stderr(predicate::str::contains("no in-stock item matches '@1'"));
}

#[test]
fn test_mechanism_rejects_details() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        r#"register alice pw1
add detail --name Bolt --manufacturer ACME --material steel
add mechanism --name Gearbox --manufacturer Gears --assemblies @1
"#,
    );

    whs()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not of kind Assembly"));
}

#[test]
fn test_json_output() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        "register alice pw1\nadd detail --name Bolt --manufacturer ACME --year 2020 --price 0.5 --material steel\nstock\n",
    );

    let output = whs()
        .args(["--quiet", "--format", "json", "run"])
        .arg(&script)
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows[0]["name"], "Bolt");
    assert_eq!(rows[0]["kind"], "detail");
    assert_eq!(rows[0]["year"], 2020);
    assert!(rows[0]["id"].as_str().unwrap().starts_with("DET-"));
}

#[test]
fn test_config_file_defaults() {
    let tmp = TempDir::new().unwrap();
    let config = tmp.path().join("whs.yaml");
    fs::write(&config, "default_year: 1999\ndefault_price: 3.5\ndefault_format: tsv\n").unwrap();
    let script = write_script(
        &tmp,
        "register alice pw1\nadd detail --name Gear --manufacturer X --material steel\nstock\n",
    );

    whs()
        .arg("--config")
        .arg(&config)
        .arg("run")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("@1\tDetail\tGear\tX\t1999\t3.5\tsteel"));
}

#[test]
fn test_malformed_price_rejected() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        "register alice pw1\nadd detail --name Gear --manufacturer X --price cheap --material steel\n",
    );

    whs()
        .arg("run")
        .arg(&script)
        .assert()
        .failure()
        .stderr(predicate::str::contains("'cheap' is not a number"));
}

#[test]
fn test_keep_going_reports_every_failure() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        "register alice pw1\nsell @7\nlogin alice nope\nsummary\n",
    );

    whs()
        .args(["run", "--keep-going"])
        .arg(&script)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Warehouse alice"))
        .stderr(predicate::str::contains("line 2"))
        .stderr(predicate::str::contains("line 3"))
        .stderr(predicate::str::contains("2 script line(s) failed"));
}

#[test]
fn test_search_is_case_insensitive_across_kinds() {
    let tmp = TempDir::new().unwrap();
    let script = write_script(
        &tmp,
        r#"register alice pw1
add detail --name "Gear tooth" --manufacturer ACME --material steel
add assembly --name "Gear train" --manufacturer ACME
add mechanism --name Winch --manufacturer ACME
search GEAR
"#,
    );

    whs()
        .args(["-f", "id", "--quiet", "run"])
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("DET-"))
        .stdout(predicate::str::contains("ASM-"))
        .stdout(predicate::str::contains("MECH-").not());
}
