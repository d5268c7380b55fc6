//! Exit-code behavior of the compiled binary, run in an isolated directory
//! with a cleared environment.

use std::process::{Command, Output};

fn supamig(dir: &std::path::Path, vars: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_supamig"))
        .current_dir(dir)
        .env_clear()
        .envs(vars.iter().copied())
        .args(args)
        .output()
        .expect("failed to spawn supamig")
}

#[test]
fn missing_configuration_exits_1_naming_both_variables() {
    let dir = tempfile::tempdir().unwrap();
    let output = supamig(dir.path(), &[], &[]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("NEXT_PUBLIC_SUPABASE_URL"));
    assert!(stdout.contains("SUPABASE_SERVICE_ROLE_KEY"));
}

#[test]
fn missing_migration_file_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = supamig(
        dir.path(),
        &[
            ("NEXT_PUBLIC_SUPABASE_URL", "http://127.0.0.1:9"),
            ("SUPABASE_SERVICE_ROLE_KEY", "k"),
        ],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("✓ Connected to Supabase: http://127.0.0.1:9"));
    assert!(stdout.contains("❌ Error: migration file not found: PADDLE_MIGRATION.sql"));
}

#[test]
fn env_local_file_supplies_credentials() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env.local"),
        "NEXT_PUBLIC_SUPABASE_URL=http://127.0.0.1:9\nSUPABASE_SERVICE_ROLE_KEY=from-env-local\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("PADDLE_MIGRATION.sql"), "SELECT 1;").unwrap();

    let output = supamig(dir.path(), &[], &["--dry-run"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("SELECT 1;"));
    assert!(!stdout.contains("from-env-local"));
}

#[test]
fn unknown_flag_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let output = supamig(dir.path(), &[], &["--no-such-flag"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn help_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let output = supamig(dir.path(), &[], &["--help"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("--dry-run"));
}

#[test]
fn process_environment_beats_env_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env.local"),
        "NEXT_PUBLIC_SUPABASE_URL=http://local.invalid\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "NEXT_PUBLIC_SUPABASE_URL=http://dotenv.invalid\nSUPABASE_SERVICE_ROLE_KEY=k\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("PADDLE_MIGRATION.sql"), "SELECT 1;").unwrap();

    let output = supamig(
        dir.path(),
        &[("NEXT_PUBLIC_SUPABASE_URL", "http://process.invalid")],
        &["--dry-run"],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("✓ Connected to Supabase: http://process.invalid\n"));
}

#[test]
fn env_local_beats_env_and_env_fills_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".env.local"),
        "NEXT_PUBLIC_SUPABASE_URL=http://local.invalid\n",
    )
    .unwrap();
    std::fs::write(
        dir.path().join(".env"),
        "NEXT_PUBLIC_SUPABASE_URL=http://dotenv.invalid\nSUPABASE_SERVICE_ROLE_KEY=k\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("PADDLE_MIGRATION.sql"), "SELECT 1;").unwrap();

    let output = supamig(dir.path(), &[], &["--dry-run"]);

    // the key only exists in .env, so reaching the preview proves the fallback
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("✓ Connected to Supabase: http://local.invalid\n"));
    assert!(stdout.contains("SELECT 1;"));
}

#[test]
fn supamig_config_variable_selects_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let settings = dir.path().join("staging.toml");
    std::fs::write(&settings, "[migration]\nfile = \"002_orders.sql\"\n").unwrap();
    std::fs::write(dir.path().join("002_orders.sql"), "ALTER TABLE orders ADD note text;").unwrap();
    let settings = settings.display().to_string();

    let output = supamig(
        dir.path(),
        &[
            ("NEXT_PUBLIC_SUPABASE_URL", "http://127.0.0.1:9"),
            ("SUPABASE_SERVICE_ROLE_KEY", "k"),
            ("SUPAMIG_CONFIG", settings.as_str()),
        ],
        &["--dry-run"],
    );

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ALTER TABLE orders ADD note text;"));
}
