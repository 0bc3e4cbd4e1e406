use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use mei_script::{RunSummary, Script};

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    pub fail_fast: bool,
    pub strict: bool,
}

#[derive(Debug)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: anyhow::Error,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub attempted: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchOutcome {
    /// Print every failure to stderr and turn them into one error.
    pub fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        eprintln!(
            "[mei_tools] {} of {} script(s) failed:",
            self.failures.len(),
            self.attempted
        );
        for failure in &self.failures {
            eprintln!("  - {}: {:#}", failure.path.display(), failure.error);
        }
        bail!("{} script(s) failed", self.failures.len())
    }
}

/// Load and visit each script as an independent run.
///
/// `visit` runs the script and returns its output; `emit` only sees output
/// from scripts that passed, so a failed input contributes nothing. A failing
/// script is recorded and the batch moves on unless `options.fail_fast` is set.
pub fn run_batch<T, V, E>(
    paths: &[PathBuf],
    options: BatchOptions,
    mut visit: V,
    mut emit: E,
) -> BatchOutcome
where
    V: FnMut(&Path, &Script) -> Result<(RunSummary, T)>,
    E: FnMut(&Path, T) -> Result<()>,
{
    let mut outcome = BatchOutcome::default();
    for path in paths {
        outcome.attempted += 1;
        let result = Script::from_path(path)
            .with_context(|| format!("loading script {}", path.display()))
            .and_then(|script| visit(path.as_path(), &script))
            .and_then(|(summary, output)| {
                check_summary(&summary, options)?;
                emit(path.as_path(), output)
            });
        if let Err(error) = result {
            log::warn!("{}: {error:#}", path.display());
            outcome.failures.push(BatchFailure {
                path: path.clone(),
                error,
            });
            if options.fail_fast {
                break;
            }
        }
    }
    outcome
}

fn check_summary(summary: &RunSummary, options: BatchOptions) -> Result<()> {
    if !options.strict || summary.is_clean() {
        return Ok(());
    }
    let first = &summary.failures[0];
    Err(anyhow!(
        "command #{} ({}): {}",
        first.index,
        first.opcode,
        first.error
    )
    .context(format!(
        "{} command(s) failed to bind",
        summary.failures.len()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mei_script::run_script;
    use std::fs;
    use tempfile::tempdir;

    fn write(dir: &Path, name: &str, body: &str) -> Result<PathBuf> {
        let path = dir.join(name);
        fs::write(&path, body)?;
        Ok(path)
    }

    #[test]
    fn continues_past_failures_unless_fail_fast() -> Result<()> {
        let dir = tempdir()?;
        let broken = write(dir.path(), "broken.json", r#"{"commands": []}"#)?;
        let good = write(dir.path(), "good.json", r#"{"scr": [{"cmd0": "wait", "arg0": 1}]}"#)?;
        let paths = vec![broken, good];

        let mut visited = Vec::new();
        let outcome = run_batch(
            &paths,
            BatchOptions::default(),
            |path, script| {
                visited.push(path.to_path_buf());
                Ok((run_script(script, &mut ()), ()))
            },
            |_, ()| Ok(()),
        );
        assert_eq!(outcome.attempted, 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(visited.len(), 1);
        assert!(format!("{:#}", outcome.failures[0].error).contains("\"scr\""));
        assert!(outcome.into_result().is_err());

        let outcome = run_batch(
            &paths,
            BatchOptions {
                fail_fast: true,
                strict: false,
            },
            |_, script| Ok((run_script(script, &mut ()), ())),
            |_, ()| Ok(()),
        );
        assert_eq!(outcome.attempted, 1);
        Ok(())
    }

    #[test]
    fn strict_mode_withholds_output_of_failed_scripts() -> Result<()> {
        let dir = tempdir()?;
        let extra = write(dir.path(), "extra.json", r#"{"scr": [{"cmd0": "wipein", "arg0": 1}]}"#)?;
        let clean = write(dir.path(), "clean.json", r#"{"scr": [{"cmd0": "wipein"}]}"#)?;
        let paths = vec![extra, clean];

        let run = |strict: bool| {
            let mut emitted = Vec::new();
            let outcome = run_batch(
                &paths,
                BatchOptions {
                    fail_fast: false,
                    strict,
                },
                |path, script| Ok((run_script(script, &mut ()), path.to_path_buf())),
                |_, path| {
                    emitted.push(path);
                    Ok(())
                },
            );
            (outcome, emitted)
        };

        let (lenient, emitted) = run(false);
        assert!(lenient.failures.is_empty());
        assert_eq!(emitted, paths);

        let (strict, emitted) = run(true);
        assert_eq!(strict.failures.len(), 1);
        assert!(format!("{:#}", strict.failures[0].error).contains("wipein"));
        assert_eq!(emitted, vec![paths[1].clone()]);
        Ok(())
    }
}
