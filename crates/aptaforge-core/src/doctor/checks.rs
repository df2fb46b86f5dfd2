use super::report::{CheckOutcome, DoctorReport};
use crate::weights::{self, SEQUENCE_MODEL_WEIGHTS, STRUCTURE_MODEL_FILES};
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// What to probe. Field defaults mirror the standard pipeline install:
/// a `design` conda environment, the two pipeline packages, and the
/// structure viewer used for the optional validation step.
#[derive(Debug, Clone)]
pub struct DoctorConfig {
    /// Explicit interpreter; wins over env and PATH resolution.
    pub python: Option<PathBuf>,
    /// Conda environment name to look for under the usual install roots.
    pub conda_env: Option<String>,
    pub required_imports: Vec<String>,
    /// Directory holding checkpoint and parameter files.
    pub weights_dir: PathBuf,
    /// Viewer binary: bare name (PATH lookup) or explicit path.
    pub viewer: String,
}

impl DoctorConfig {
    pub fn new(weights_dir: PathBuf) -> Self {
        Self {
            python: None,
            conda_env: Some("boltz_design".to_string()),
            required_imports: vec!["boltz".to_string(), "ligandmpnn".to_string()],
            weights_dir,
            viewer: "pymol".to_string(),
        }
    }
}

/// Runs every installation check in order and collects the outcomes.
/// Checks are independent except that import probes need an interpreter;
/// without one they fail as "not checked" rather than being skipped, so the
/// summary still names them.
pub async fn run_doctor(config: &DoctorConfig) -> DoctorReport {
    let mut report = DoctorReport::default();

    let python = match resolve_python(config) {
        Ok(path) => {
            report.outcomes.push(CheckOutcome::pass(
                "Python interpreter",
                path.display().to_string(),
            ));
            Some(path)
        }
        Err(detail) => {
            report
                .outcomes
                .push(CheckOutcome::fail("Python interpreter", detail));
            None
        }
    };

    for package in &config.required_imports {
        let name = format!("Python package '{package}'");
        let outcome = match &python {
            Some(python) => probe_import(python, package).await,
            None => Err("not checked: no Python interpreter".to_string()),
        };
        report.outcomes.push(match outcome {
            Ok(()) => CheckOutcome::pass(name, "importable"),
            Err(detail) => CheckOutcome::fail(name, detail),
        });
    }

    report.outcomes.push(audit_check(
        "Structure-model checkpoint",
        &config.weights_dir,
        STRUCTURE_MODEL_FILES,
    ));
    report.outcomes.push(audit_check(
        "Sequence-model parameters",
        &config.weights_dir,
        SEQUENCE_MODEL_WEIGHTS,
    ));

    report.outcomes.push(viewer_check(&config.viewer));

    info!(passed = report.passed(), "Installation check complete.");
    report
}

fn resolve_python(config: &DoctorConfig) -> Result<PathBuf, String> {
    if let Some(python) = &config.python {
        return if is_executable(python) {
            Ok(python.clone())
        } else {
            Err(format!("'{}' is not an executable file", python.display()))
        };
    }

    if let Some(env_name) = &config.conda_env {
        if let Some(home) = env::var_os("HOME").map(PathBuf::from) {
            for root in ["miniconda3", "anaconda3", ".conda"] {
                let candidate = home.join(root).join("envs").join(env_name).join("bin/python");
                if is_executable(&candidate) {
                    return Ok(candidate);
                }
            }
        }
        debug!("Conda environment '{}' not found, falling back to PATH.", env_name);
    }

    for name in ["python3", "python"] {
        if let Some(found) = search_path(name, env::var_os("PATH").as_deref()) {
            return Ok(found);
        }
    }

    Err("no Python interpreter found (checked conda environments and PATH)".to_string())
}

async fn probe_import(python: &Path, package: &str) -> Result<(), String> {
    let output = Command::new(python)
        .arg("-c")
        .arg(format!("import {package}"))
        .output()
        .await
        .map_err(|e| format!("failed to launch interpreter: {e}"))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(format!(
            "import failed: {}",
            stderr.lines().last().unwrap_or("unknown error")
        ))
    }
}

fn audit_check(name: &str, dir: &Path, manifest: &'static [weights::WeightFile]) -> CheckOutcome {
    match weights::scan(dir, manifest) {
        Ok(report) if report.is_complete() => CheckOutcome::pass(
            name,
            format!("{}/{} files intact", report.intact_count(), manifest.len()),
        ),
        Ok(report) => {
            let damaged: Vec<&str> = report.needs_repair().map(|e| e.file.name).collect();
            CheckOutcome::fail(
                name,
                format!(
                    "{}/{} files intact; damaged or missing: {}",
                    report.intact_count(),
                    manifest.len(),
                    damaged.join(", ")
                ),
            )
        }
        Err(e) => CheckOutcome::fail(name, e.to_string()),
    }
}

fn viewer_check(viewer: &str) -> CheckOutcome {
    let name = format!("Structure viewer '{viewer}'");
    if viewer.contains('/') || viewer.contains('\\') {
        let path = Path::new(viewer);
        return if is_executable(path) {
            CheckOutcome::pass(name, viewer.to_string())
        } else {
            CheckOutcome::fail(name, format!("'{viewer}' is not an executable file"))
        };
    }
    match search_path(viewer, env::var_os("PATH").as_deref()) {
        Some(found) => CheckOutcome::pass(name, found.display().to_string()),
        None => CheckOutcome::fail(name, "not found on PATH".to_string()),
    }
}

fn search_path(name: &str, path_var: Option<&OsStr>) -> Option<PathBuf> {
    let path_var = path_var?;
    env::split_paths(path_var)
        .map(|dir| dir.join(name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn write_executable(path: &Path, contents: &str) {
        use std::os::unix::fs::PermissionsExt;
        fs::write(path, contents).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    fn write_weight_store(dir: &Path) {
        for file in crate::weights::full_manifest() {
            fs::write(dir.join(file.name), vec![0u8; file.min_bytes as usize]).unwrap();
        }
    }

    #[test]
    fn search_path_finds_executables_only() {
        let dir = tempdir().unwrap();
        let path_var = std::env::join_paths([dir.path()]).unwrap();

        assert_eq!(search_path("tool", Some(path_var.as_os_str())), None);

        #[cfg(unix)]
        {
            write_executable(&dir.path().join("tool"), "#!/bin/sh\n");
            assert_eq!(
                search_path("tool", Some(path_var.as_os_str())),
                Some(dir.path().join("tool"))
            );
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn all_checks_pass_against_a_faked_install() {
        let dir = tempdir().unwrap();
        // Fake interpreter accepting both imports.
        let python = dir.path().join("python");
        write_executable(&python, "#!/bin/sh\nexit 0\n");
        // Fake viewer, referenced by path.
        let viewer = dir.path().join("pymol");
        write_executable(&viewer, "#!/bin/sh\nexit 0\n");
        write_weight_store(dir.path());

        let config = DoctorConfig {
            python: Some(python),
            conda_env: None,
            required_imports: vec!["boltz".to_string(), "ligandmpnn".to_string()],
            weights_dir: dir.path().to_path_buf(),
            viewer: viewer.display().to_string(),
        };

        let report = run_doctor(&config).await;
        assert!(report.passed(), "{report}");
        assert_eq!(report.outcomes.len(), 6);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_import_is_named_in_the_summary() {
        let dir = tempdir().unwrap();
        // Fake interpreter rejecting the second package only.
        let python = dir.path().join("python");
        write_executable(
            &python,
            "#!/bin/sh\ncase \"$2\" in *ligandmpnn*) echo 'ModuleNotFoundError: ligandmpnn' >&2; exit 1;; esac\nexit 0\n",
        );
        let viewer = dir.path().join("pymol");
        write_executable(&viewer, "#!/bin/sh\nexit 0\n");
        write_weight_store(dir.path());

        let config = DoctorConfig {
            python: Some(python),
            conda_env: None,
            required_imports: vec!["boltz".to_string(), "ligandmpnn".to_string()],
            weights_dir: dir.path().to_path_buf(),
            viewer: viewer.display().to_string(),
        };

        let report = run_doctor(&config).await;
        assert!(!report.passed());
        let summary = report.to_string();
        assert!(summary.contains("1 of 6 checks failed"));
        assert!(summary.contains("Python package 'ligandmpnn'"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn missing_interpreter_fails_imports_too() {
        let dir = tempdir().unwrap();
        write_weight_store(dir.path());

        let config = DoctorConfig {
            python: Some(dir.path().join("no-such-python")),
            conda_env: None,
            required_imports: vec!["boltz".to_string()],
            weights_dir: dir.path().to_path_buf(),
            viewer: "definitely-not-installed-viewer".to_string(),
        };

        let report = run_doctor(&config).await;
        assert!(!report.passed());

        let failed: Vec<&str> = report.failures().map(|o| o.name.as_str()).collect();
        assert!(failed.contains(&"Python interpreter"));
        assert!(failed.contains(&"Python package 'boltz'"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn damaged_weight_store_fails_the_parameter_check() {
        let dir = tempdir().unwrap();
        let python = dir.path().join("python");
        write_executable(&python, "#!/bin/sh\nexit 0\n");
        write_weight_store(dir.path());
        // Corrupt one parameter file.
        fs::write(dir.path().join("ligandmpnn_v_32_010_25.pt"), b"").unwrap();

        let config = DoctorConfig {
            python: Some(python.clone()),
            conda_env: None,
            required_imports: vec![],
            weights_dir: dir.path().to_path_buf(),
            viewer: python.display().to_string(),
        };

        let report = run_doctor(&config).await;
        assert!(!report.passed());
        let summary = report.to_string();
        assert!(summary.contains("Sequence-model parameters"));
        assert!(summary.contains("ligandmpnn_v_32_010_25.pt"));
    }
}
