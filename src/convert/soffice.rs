//! LibreOffice headless renderer.

use std::env;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

use super::{expected_output, DocumentRenderer, RenderFormat};

const EXECUTABLE_NAMES: [&str; 2] = ["soffice", "libreoffice"];
const WINDOWS_DEFAULT: &str = r"C:\Program Files\LibreOffice\program\soffice.exe";
const POLL_INTERVAL: Duration = Duration::from_millis(50);
const STDERR_GRACE: Duration = Duration::from_secs(2);

/// Renders documents by running `soffice --headless --convert-to`.
#[derive(Debug, Clone)]
pub struct SofficeRenderer {
    executable: PathBuf,
    timeout: Duration,
}

impl SofficeRenderer {
    /// Default per-document timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Create a renderer for a known executable.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Find LibreOffice on `PATH` or in its default Windows location.
    pub fn locate() -> Result<Self> {
        find_executable().map(Self::new).ok_or_else(|| {
            Error::RendererUnavailable(
                "LibreOffice (soffice) not found; install it and add it to PATH".into(),
            )
        })
    }

    /// Set the per-document timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Path of the executable in use.
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Per-document timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl DocumentRenderer for SofficeRenderer {
    fn name(&self) -> &str {
        "soffice"
    }

    fn render(&self, input: &Path, out_dir: &Path, format: RenderFormat) -> Result<PathBuf> {
        let file = input.display().to_string();
        log::debug!("soffice: converting {} to {}", file, format.extension());

        let mut child = Command::new(&self.executable)
            .arg("--headless")
            .arg("--convert-to")
            .arg(format.extension())
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => Error::RendererUnavailable(format!(
                    "{} could not be started",
                    self.executable.display()
                )),
                _ => Error::Conversion {
                    file: file.clone(),
                    reason: format!("failed to start renderer: {}", e),
                },
            })?;

        let stderr = child.stderr.take().map(|mut pipe| {
            thread::spawn(move || {
                let mut text = String::new();
                let _ = pipe.read_to_string(&mut text);
                text
            })
        });

        let deadline = Instant::now() + self.timeout;
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if Instant::now() >= deadline => {
                    stop(&mut child);
                    let stderr = collect_stderr(stderr);
                    log::debug!("soffice: stderr before timeout: {}", stderr.trim());
                    return Err(Error::Conversion {
                        file,
                        reason: format!("timed out after {}s", self.timeout.as_secs_f32()),
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    stop(&mut child);
                    collect_stderr(stderr);
                    return Err(Error::Conversion {
                        file,
                        reason: format!("lost track of renderer process: {}", e),
                    });
                }
            }
        };

        let stderr = collect_stderr(stderr);

        if !status.success() {
            return Err(Error::Conversion {
                file,
                reason: format!("{}: {}", status, stderr.trim()),
            });
        }

        let output = expected_output(input, out_dir, format);
        if !output.is_file() {
            return Err(Error::Conversion {
                file,
                reason: "renderer produced no output file".into(),
            });
        }
        Ok(output)
    }
}

/// Kill and reap a renderer that is still running.
fn stop(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Join the stderr drain, giving up once [`STDERR_GRACE`] has passed.
///
/// A helper process that inherited the pipe can keep it open after the
/// renderer exits. The drain thread then ends when that helper does.
fn collect_stderr(handle: Option<JoinHandle<String>>) -> String {
    let Some(handle) = handle else {
        return String::new();
    };
    let deadline = Instant::now() + STDERR_GRACE;
    while !handle.is_finished() {
        if Instant::now() >= deadline {
            log::warn!("soffice: stderr still open after the renderer exited, not waiting for it");
            return String::new();
        }
        thread::sleep(POLL_INTERVAL);
    }
    handle.join().unwrap_or_default()
}

fn find_executable() -> Option<PathBuf> {
    let path = env::var_os("PATH").unwrap_or_default();
    for name in EXECUTABLE_NAMES {
        for dir in env::split_paths(&path) {
            for candidate in [dir.join(name), dir.join(format!("{}.exe", name))] {
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }

    let windows = PathBuf::from(WINDOWS_DEFAULT);
    windows.is_file().then_some(windows)
}
