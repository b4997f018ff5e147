use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::Path;
use std::{fs, process::Command};

mod helpers;
use helpers::*;

fn bin_cmd(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docloc").expect("docloc binary built");
    cmd.current_dir(dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env("RUST_LOG", "warn")
        .env_remove("DOCLOC_LOG_DIR")
        .arg("--no-color");
    cmd
}

fn run_ok(dir: &Path, args: &[&str]) -> String {
    let assert = bin_cmd(dir).args(args).assert().success();
    String::from_utf8_lossy(&assert.get_output().stdout).to_string()
}

#[test]
fn help_works() {
    let dir = tempfile::tempdir().unwrap();
    bin_cmd(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Gettext-based localization"));
}

#[test]
fn extract_writes_deduplicated_template() {
    let dir = tempfile::tempdir().unwrap();
    write_docs(dir.path());

    let out = run_ok(dir.path(), &["extract"]);
    assert!(out.contains("translations/messages.pot written"), "{out}");

    let pot = fs::read_to_string(dir.path().join("translations/messages.pot")).unwrap();
    assert_eq!(pot.matches("msgid \"Read the guide.\"").count(), 1);
    assert!(pot.contains("#: en-US/guide/usage.md:3 en-US/index.md:5\n"));
    assert!(pot.contains("#, fuzzy\nmsgid \"\""));
}

#[test]
fn update_requires_template() {
    let dir = tempfile::tempdir().unwrap();
    add_locale(dir.path(), "fr");
    bin_cmd(dir.path())
        .arg("update")
        .assert()
        .failure()
        .stderr(predicate::str::contains("run `extract` first"));
}

#[test]
fn full_pipeline_generates_translated_documents() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_docs(root);
    add_locale(root, "fr");
    add_locale(root, "de");

    run_ok(root, &["extract"]);
    let out = run_ok(root, &["update"]);
    assert!(out.contains("translations/fr/messages.po written"), "{out}");
    assert!(out.contains("translations/de/messages.po written"), "{out}");

    translate(root, "fr", FRENCH);
    translate(root, "de", &[("# Welcome", "# Willkommen")]);

    // Re-running update keeps the translations.
    run_ok(root, &["update"]);
    let po = fs::read_to_string(root.join("translations/fr/messages.po")).unwrap();
    assert!(po.contains("msgstr \"Lisez le guide.\""));

    let out = run_ok(root, &["generate"]);
    assert!(out.contains("[-] de          1/4      25%"), "{out}");
    assert!(out.contains("[+] fr          4/4     100% -- src/fr/"), "{out}");

    assert_eq!(
        fs::read_to_string(root.join("src/fr/index.md")).unwrap(),
        "# Bienvenue\n\nBonjour {name}\n\nLisez le guide.\n\n"
    );
    assert_eq!(
        fs::read_to_string(root.join("src/fr/guide/usage.md")).unwrap(),
        "# Utilisation\n\nLisez le guide.\n\n"
    );
    assert!(!root.join("src/de").exists());
}

#[test]
fn file_name_with_space_survives_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/en-US")).unwrap();
    fs::write(root.join("src/en-US/my doc.md"), "Hello\n\nWorld\n").unwrap();
    add_locale(root, "fr");

    bin_cmd(root)
        .arg("extract")
        .assert()
        .success()
        .stderr(predicate::str::contains("2 messages (2 locations) from 1 files"));
    let pot = fs::read_to_string(root.join("translations/messages.pot")).unwrap();
    assert!(pot.contains("#: \u{2068}en-US/my doc.md\u{2069}:1\n"), "{pot}");

    run_ok(root, &["update"]);
    translate(root, "fr", &[("Hello", "Bonjour"), ("World", "Monde")]);
    let out = run_ok(root, &["generate"]);
    assert!(out.contains("[+] fr          2/2     100% -- src/fr/"), "{out}");
    assert_eq!(
        fs::read_to_string(root.join("src/fr/my doc.md")).unwrap(),
        "Bonjour\n\nMonde\n\n"
    );
}

#[test]
fn generate_cutoff_from_flag_and_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_docs(root);
    add_locale(root, "de");
    run_ok(root, &["extract"]);
    run_ok(root, &["update"]);
    translate(root, "de", &[("# Welcome", "# Willkommen")]);

    let out = run_ok(root, &["generate", "--cutoff", "0.25", "--format", "json"]);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v[0]["locale"], "de");
    assert_eq!(v[0]["included"], true);
    assert_eq!(v[0]["destination"], "src/de");
    assert_eq!(
        fs::read_to_string(root.join("src/de/index.md")).unwrap(),
        "# Willkommen\n\nHello {name}\n\nRead the guide.\n\n"
    );

    bin_cmd(root)
        .args(["generate", "--cutoff", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cutoff must be between 0 and 1"));
}

#[test]
fn config_file_sets_cutoff() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_docs(root);
    add_locale(root, "de");
    fs::write(root.join("docloc.toml"), "[generate]\ncutoff = 0.2\n").unwrap();
    run_ok(root, &["extract"]);
    run_ok(root, &["update"]);
    translate(root, "de", &[("# Welcome", "# Willkommen")]);

    let out = run_ok(root, &["generate"]);
    assert!(out.contains("[+] de"), "{out}");
}

#[test]
fn check_reports_placeholder_mismatch_and_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_docs(root);
    add_locale(root, "fr");
    add_locale(root, "it");
    run_ok(root, &["extract"]);
    run_ok(root, &["update"]);
    translate(root, "fr", &[("Hello {name}", "Bonjour {nom}")]);
    translate(root, "it", &[("Hello {name}", "Ciao {name}")]);

    bin_cmd(root)
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[ERRORS] fr"))
        .stdout(predicate::str::contains(" - Hello {name}"))
        .stdout(predicate::str::contains("    - placeholders"))
        .stdout(predicate::str::contains("[OK] it"));
}

#[test]
fn check_passes_on_clean_catalogs() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write_docs(root);
    add_locale(root, "fr");
    run_ok(root, &["extract"]);
    run_ok(root, &["update"]);
    translate(root, "fr", FRENCH);

    let out = run_ok(root, &["check", "--format", "json"]);
    let v: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v[0]["ok"], true);
}

#[test]
fn schema_dumps_report_types() {
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("schemas");
    run_ok(dir.path(), &["schema", "--out-dir", out_dir.to_str().unwrap()]);
    for name in [
        "extract_summary.schema.json",
        "locale_update.schema.json",
        "locale_completion.schema.json",
        "locale_check.schema.json",
    ] {
        assert!(out_dir.join(name).is_file(), "{name} missing");
    }
}
