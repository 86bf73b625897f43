//! Models served by an external runner process.
//!
//! Protocol: `<runner argv...> <artifact>` is spawned once per batch, the
//! feature payload is written to stdin as JSON, and stdout must be a JSON
//! array with one score per row.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, info};

use crate::error::ModelError;
use crate::invoker::{validate_scores, ModelInput, ScoringModel};

#[derive(Debug)]
pub struct CommandModel {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    artifact: PathBuf,
}

impl CommandModel {
    pub fn load(name: &str, runner: &[String], artifact: &Path) -> Result<Self, ModelError> {
        if !artifact.is_file() {
            return Err(ModelError::unavailable(
                name,
                format!("artifact not found: {}", artifact.display()),
            ));
        }
        let (program, args) = runner
            .split_first()
            .ok_or_else(|| ModelError::unavailable(name, "no runner configured"))?;
        let program = resolve_program(program)
            .ok_or_else(|| ModelError::unavailable(name, format!("runner {program:?} not found in PATH")))?;

        debug!(model = name, program = %program.display(), "Runner resolved");
        Ok(Self {
            name: name.to_string(),
            program,
            args: args.to_vec(),
            artifact: artifact.to_path_buf(),
        })
    }
}

/// Explicit paths must exist; bare names are searched in `PATH`.
fn resolve_program(program: &str) -> Option<PathBuf> {
    let candidate = Path::new(program);
    if candidate.components().count() > 1 {
        return candidate.is_file().then(|| candidate.to_path_buf());
    }
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(program))
        .find(|p| p.is_file())
}

impl ScoringModel for CommandModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&self, input: &dyn ModelInput) -> Result<Vec<f64>, ModelError> {
        info!("Making {} predictions", self.name);
        let payload = input
            .to_payload()
            .map_err(|e| ModelError::inference(&self.name, format!("cannot encode features: {e}")))?;
        let body = serde_json::to_vec(&payload)
            .map_err(|e| ModelError::inference(&self.name, format!("cannot encode features: {e}")))?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(&self.artifact)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| ModelError::inference(&self.name, format!("cannot start runner: {e}")))?;

        // The payload is written from its own thread so a runner that fills
        // stdout or stderr before reading stdin cannot block us.
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(&body),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (output, writer.join())
        });

        let output = output.map_err(|e| ModelError::inference(&self.name, e.to_string()))?;
        match written {
            Err(_) => return Err(ModelError::inference(&self.name, "feature writer panicked")),
            // A runner may exit without draining stdin; its exit status decides.
            Ok(Err(e)) if e.kind() != std::io::ErrorKind::BrokenPipe => {
                return Err(ModelError::inference(&self.name, format!("cannot send features: {e}")));
            }
            Ok(_) => {}
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ModelError::inference(
                &self.name,
                format!("runner exited with {:?}: {}", output.status.code(), stderr.trim()),
            ));
        }

        let scores: Vec<f64> = serde_json::from_slice(&output.stdout)
            .map_err(|e| ModelError::inference(&self.name, format!("runner output is not a score array: {e}")))?;
        validate_scores(&self.name, input.pmids().len(), scores)
    }
}
