//! Integration tests for the `export` and `labels` commands
//!
//! ## Exit Code Contract
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Workbook written (a missing logo is only a warning) |
//! | 1 | Invalid input or export failure; nothing written |

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn guardplan_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_guardplan"))
}

fn run(args: &[&str], cwd: &Path) -> Output {
    Command::new(guardplan_binary())
        .args(args)
        .current_dir(cwd)
        .output()
        .expect("failed to execute guardplan")
}

fn write_plan(dir: &Path, plan: &serde_json::Value) -> PathBuf {
    let path = dir.join("plan.json");
    fs::write(&path, serde_json::to_vec_pretty(plan).unwrap()).unwrap();
    path
}

fn week_plan() -> serde_json::Value {
    serde_json::json!({
        "guardDays": [
            {"date": "Lundi 12.05", "pair": [
                {"name": "Muller / Rossi", "period": [
                    {"name": "Poste", "class": "bg-emerald-200"},
                    {"name": "Repos"}
                ]}
            ]},
            {"date": "Mardi 13.05", "pair": []}
        ],
        "periodDuration": 60,
        "periodCount": 24,
        "officer": "Lt Favre",
        "commander": "Sgt Meier",
        "logoPath": "/logo.png",
        "filename": "semaine-20.xlsx"
    })
}

fn xlsx_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".xlsx"))
        .collect();
    names.sort();
    names
}

#[test]
fn export_writes_named_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), &week_plan());
    let out = dir.path().join("out");
    fs::create_dir(&out).unwrap();

    let output = run(
        &["export", plan.to_str().unwrap(), "--output-dir", out.to_str().unwrap()],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(xlsx_files(&out), ["semaine-20.xlsx"]);

    let bytes = fs::read(out.join("semaine-20.xlsx")).unwrap();
    assert_eq!(&bytes[0..2], b"PK");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 sheets"));
    assert!(stdout.contains("no logo"));
}

#[test]
fn export_picks_up_logo_next_to_plan() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), &week_plan());
    // 1x1 PNG
    fs::write(
        dir.path().join("logo.png"),
        [
            0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48,
            0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x04, 0x00, 0x00,
            0x00, 0xB5, 0x1C, 0x0C, 0x02, 0x00, 0x00, 0x00, 0x0B, 0x49, 0x44, 0x41, 0x54, 0x78,
            0xDA, 0x63, 0xFC, 0xFF, 0x9F, 0x07, 0x01, 0x05, 0x01, 0x00, 0xED, 0xFE, 0xD8, 0xDA,
            0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
        ],
    )
    .unwrap();

    let output = run(
        &["export", plan.to_str().unwrap(), "-o", dir.path().to_str().unwrap()],
        dir.path(),
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("no logo"), "stdout: {stdout}");
}

#[test]
fn filename_flag_overrides_plan() {
    let dir = tempfile::tempdir().unwrap();
    let plan = write_plan(dir.path(), &week_plan());

    let output = run(
        &["export", plan.to_str().unwrap(), "--filename", "garde.xlsx", "--no-logo"],
        dir.path(),
    );

    assert!(output.status.success());
    assert_eq!(xlsx_files(dir.path()), ["garde.xlsx"]);
}

#[test]
fn default_filename_is_date_stamped() {
    let dir = tempfile::tempdir().unwrap();
    let mut plan = week_plan();
    plan.as_object_mut().unwrap().remove("filename");
    let plan = write_plan(dir.path(), &plan);

    let output = run(&["export", plan.to_str().unwrap()], dir.path());

    assert!(output.status.success());
    let files = xlsx_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("plan-de-garde-"));
    // plan-de-garde-YYYY-MM-DD.xlsx
    assert_eq!(files[0].len(), "plan-de-garde-".len() + 10 + ".xlsx".len());
}

#[test]
fn empty_plan_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let mut plan = week_plan();
    plan["guardDays"] = serde_json::json!([]);
    let plan = write_plan(dir.path(), &plan);

    let output = run(&["export", plan.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no data to export"), "stderr: {stderr}");
    assert!(xlsx_files(dir.path()).is_empty());
}

#[test]
fn malformed_json_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plan.json");
    fs::write(&path, "{ not json").unwrap();

    let output = run(&["export", path.to_str().unwrap()], dir.path());

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid guard plan"));
}

#[test]
fn labels_prints_one_line_per_period() {
    let dir = tempfile::tempdir().unwrap();
    let output = run(&["labels", "--duration", "180", "--count", "8"], dir.path());

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "  1  00:00 - 03:00");
    assert_eq!(lines[7], "  8  21:00 - 24:00");
}
