use std::fs;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;

use thiserror::Error;
use tracing::debug;
use wait_timeout::ChildExt;

use classmap_core::config::RenderConfig;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to prepare working directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("renderer `{program}` failed: {reason}")]
    RenderFailure { program: String, reason: String },
    #[error("viewer `{program}` failed: {reason}; document left at {}", document.display())]
    ViewFailure {
        program: String,
        reason: String,
        document: PathBuf,
    },
}

/// Write the graph description, render it into a viewable document, and
/// optionally hand it to the viewer. Returns the document path.
///
/// The working directory is a fresh temp dir that persists after the run so
/// the intermediate `.gv` file can be inspected. Renderer and viewer are each
/// bounded by the configured timeout; a timeout or non-zero exit aborts the
/// pipeline with no retry.
pub fn publish(dot_src: &str, config: &RenderConfig, open: bool) -> Result<PathBuf, RenderError> {
    let work_dir = tempfile::Builder::new()
        .prefix("classmap-")
        .tempdir()?
        .keep();
    let gv_path = work_dir.join("o.gv");
    fs::write(&gv_path, dot_src)?;
    debug!(path = %gv_path.display(), "wrote graph description");

    let document = work_dir.join(format!("o.{}", config.format));
    let stdout = fs::File::create(&document)?;
    let timeout = Duration::from_secs(config.timeout_secs);

    let mut renderer = Command::new(&config.renderer);
    renderer
        .arg(format!("-T{}", config.format))
        .arg("o.gv")
        .current_dir(&work_dir)
        .stdin(Stdio::null())
        .stdout(stdout)
        .stderr(Stdio::inherit());
    run_bounded(&mut renderer, timeout).map_err(|reason| RenderError::RenderFailure {
        program: config.renderer.clone(),
        reason,
    })?;
    debug!(path = %document.display(), "rendered document");

    if open {
        let mut viewer = Command::new(&config.viewer);
        viewer
            .arg(&document)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        run_bounded(&mut viewer, timeout).map_err(|reason| RenderError::ViewFailure {
            program: config.viewer.clone(),
            reason,
            document: document.clone(),
        })?;
    }

    Ok(document)
}

/// Spawn a command and wait for it with a hard timeout. On expiry the child
/// is killed and reaped.
fn run_bounded(cmd: &mut Command, timeout: Duration) -> Result<(), String> {
    let mut child = cmd
        .spawn()
        .map_err(|e| format!("failed to spawn: {e}"))?;
    match child
        .wait_timeout(timeout)
        .map_err(|e| format!("failed to wait: {e}"))?
    {
        Some(status) if status.success() => Ok(()),
        Some(status) => Err(format!("exited with {status}")),
        None => {
            let _ = child.kill();
            let _ = child.wait();
            Err(format!("timed out after {}s", timeout.as_secs()))
        }
    }
}
