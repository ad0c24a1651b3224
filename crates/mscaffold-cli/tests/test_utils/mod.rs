//! Test utilities for mscaffold integration tests

// Internal imports (std, crate)
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

// External imports (alphabetized)
use anyhow::Context;
use tempfile::TempDir;

/// Module directory of the Acme_Widgets fixture, relative to the root
pub const MODULE_DIR: &str = "app/code/local/Acme/Widgets";

/// Design theme directory of the fixture, relative to the root
pub const THEME_DIR: &str = "app/design/frontend/base/default";

/// Creates a temporary application root
pub fn create_temp_dir() -> anyhow::Result<(TempDir, PathBuf)> {
    let temp_dir = tempfile::tempdir()?;
    let temp_path = temp_dir.path().to_path_buf();
    Ok((temp_dir, temp_path))
}

/// Creates an application root holding the Acme_Widgets module and the base/default theme
pub fn create_app_root() -> anyhow::Result<(TempDir, PathBuf)> {
    let (temp_dir, root) = create_temp_dir()?;
    fs::create_dir_all(root.join(MODULE_DIR))?;
    fs::create_dir_all(root.join(THEME_DIR))?;
    Ok((temp_dir, root))
}

/// Command running the built binary against `root`, isolated from the user's templates
pub fn mscaffold(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mscaffold"));
    cmd.arg("--root")
        .arg(root)
        .env_remove("MSCAFFOLD_TEMPLATE_DIR")
        .env_remove("RUST_LOG")
        .env("HOME", root);
    cmd
}

/// Runs `mscaffold widget create` for the featured_items widget with extra arguments
pub fn create_featured_items(root: &Path, extra: &[&str]) -> anyhow::Result<Output> {
    mscaffold(root)
        .args([
            "widget",
            "create",
            "acme",
            "widgets",
            "local",
            "acme_widgets",
            "featured_items",
            "Featured Items",
            "base",
            "default",
            "id=title,label=Title,required=1,visible=1,type=text,sort_order=10",
            "id=limit,label=Limit,type=text",
        ])
        .args(extra)
        .output()
        .context("Failed to run mscaffold")
}

/// Stdout of a successful run, failing with stderr otherwise
pub fn stdout_of(output: Output) -> anyhow::Result<String> {
    if !output.status.success() {
        return Err(anyhow::anyhow!(
            "mscaffold failed with {}:\n{}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        ));
    }
    Ok(String::from_utf8(output.stdout)?)
}

/// Asserts that a file contains specific content
pub fn assert_file_contains<P: AsRef<Path>>(path: P, contents: &[&str]) -> anyhow::Result<()> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(anyhow::anyhow!("File not found: {}", path.display()));
    }

    let file_content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;

    let missing_contents: Vec<&str> = contents
        .iter()
        .copied()
        .filter(|expected| !file_content.contains(expected))
        .collect();

    if !missing_contents.is_empty() {
        return Err(anyhow::anyhow!(
            "File {} is missing expected content:\n  {}",
            path.display(),
            missing_contents.join("\n  ")
        ));
    }

    Ok(())
}
