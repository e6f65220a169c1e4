/// Graphviz process bridge.
///
/// Runs a layout program as `<path> -T<format>`, feeding DOT on stdin and
/// collecting stdout. Custom shape files are staged into a scratch
/// directory that becomes the program's working directory.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{DotError, Result};
use crate::ports::{GraphRenderer, RenderRequest};

/// Layout programs shipped with Graphviz.
pub const PROGRAMS: [&str; 8] = ["dot", "neato", "twopi", "circo", "fdp", "sfdp", "patchwork", "osage"];

const POLL_INTERVAL: Duration = Duration::from_millis(10);

// ═══════════════════════════════════════════════════════════════════════════
// Executable table
// ═══════════════════════════════════════════════════════════════════════════

/// Program name → executable path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutableTable {
    paths: BTreeMap<String, PathBuf>,
}

impl ExecutableTable {
    /// Every Graphviz program, looked up on `PATH` at spawn time.
    pub fn from_path() -> Self {
        let paths = PROGRAMS
            .iter()
            .map(|p| (p.to_string(), PathBuf::from(p)))
            .collect();
        Self { paths }
    }

    pub fn empty() -> Self {
        Self { paths: BTreeMap::new() }
    }

    pub fn set(&mut self, program: impl Into<String>, path: impl Into<PathBuf>) {
        self.paths.insert(program.into(), path.into());
    }

    pub fn get(&self, program: &str) -> Option<&Path> {
        self.paths.get(program).map(PathBuf::as_path)
    }

    pub fn extend<I, K, P>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, P)>,
        K: Into<String>,
        P: Into<PathBuf>,
    {
        for (program, path) in entries {
            self.set(program, path);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.paths.iter().map(|(k, v)| (k.as_str(), v.as_path()))
    }
}

impl Default for ExecutableTable {
    fn default() -> Self {
        Self::from_path()
    }
}

impl<K: Into<String>, P: Into<PathBuf>> FromIterator<(K, P)> for ExecutableTable {
    fn from_iter<I: IntoIterator<Item = (K, P)>>(iter: I) -> Self {
        let mut table = Self::empty();
        table.extend(iter);
        table
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Renderer
// ═══════════════════════════════════════════════════════════════════════════

/// [`GraphRenderer`] backed by the Graphviz command line tools.
#[derive(Debug, Clone, Default)]
pub struct GraphvizRenderer {
    executables: ExecutableTable,
    timeout: Option<Duration>,
}

impl GraphvizRenderer {
    pub fn new(executables: ExecutableTable) -> Self {
        Self {
            executables,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn executables(&self) -> &ExecutableTable {
        &self.executables
    }

    pub fn executables_mut(&mut self) -> &mut ExecutableTable {
        &mut self.executables
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn spawn(&self, spec: &CommandSpec, workdir: Option<&Path>) -> Result<Child> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = workdir {
            command.current_dir(dir);
        }

        command.spawn().map_err(|e| {
            let message = match e.kind() {
                ErrorKind::NotFound => format!("executable not found: {}", spec.program.display()),
                ErrorKind::PermissionDenied => {
                    format!("not an executable file: {}", spec.program.display())
                }
                _ => format!("failed to start {}: {}", spec.program.display(), e),
            };
            DotError::invocation(&spec.name, message)
        })
    }
}

impl GraphRenderer for GraphvizRenderer {
    fn render(&self, dot: &[u8], request: &RenderRequest) -> Result<Vec<u8>> {
        let spec = build_command_spec(&self.executables, request)?;
        let staging = stage_shape_files(&request.shape_files)?;
        let workdir = staging.as_ref().map(TempDir::path);

        debug!(
            program = %spec.program.display(),
            format = %request.format,
            input_bytes = dot.len(),
            "spawning renderer"
        );
        let mut child = self.spawn(&spec, workdir)?;

        let writer = child.stdin.take().map(|mut stdin| {
            let input = dot.to_vec();
            thread::spawn(move || match stdin.write_all(&input) {
                // The program may exit without reading everything.
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                other => other,
            })
        });
        let stdout = child.stdout.take().map(drain);
        let stderr = child.stderr.take().map(drain);

        let status = wait_with_timeout(&mut child, self.timeout, &spec.name)?;

        let stdout = join(stdout, &spec.name)?;
        let stderr = join(stderr, &spec.name)?;
        if let Some(handle) = writer {
            let written = handle
                .join()
                .map_err(|_| DotError::invocation(&spec.name, "stdin writer panicked"))?;
            if let Err(e) = written {
                debug!(error = %e, "renderer stdin closed early");
            }
        }

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).into_owned();
            warn!(program = %spec.name, status = ?status.code(), "renderer failed");
            return Err(DotError::Invocation {
                program: spec.name.clone(),
                message: match status.code() {
                    Some(code) => format!("exited with status {code}"),
                    None => "terminated by signal".to_string(),
                },
                stderr,
            });
        }

        debug!(program = %spec.name, output_bytes = stdout.len(), "renderer finished");
        Ok(stdout)
    }
}

fn drain<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<std::io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join(handle: Option<JoinHandle<std::io::Result<Vec<u8>>>>, program: &str) -> Result<Vec<u8>> {
    match handle {
        Some(handle) => {
            let bytes = handle
                .join()
                .map_err(|_| DotError::invocation(program, "output reader panicked"))??;
            Ok(bytes)
        }
        None => Ok(Vec::new()),
    }
}

/// Wait for `child`, killing it once `timeout` has elapsed.
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>, program: &str) -> Result<ExitStatus> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            warn!(program, timeout_ms = timeout.as_millis() as u64, "renderer timed out, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(DotError::invocation(
                program,
                format!("timed out after {:.1}s", timeout.as_secs_f64()),
            ));
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Copy shape files into a fresh scratch directory. `None` when there is
/// nothing to stage.
pub fn stage_shape_files(files: &[PathBuf]) -> Result<Option<TempDir>> {
    if files.is_empty() {
        return Ok(None);
    }
    let dir = tempfile::Builder::new().prefix("dotkit-").tempdir()?;
    for file in files {
        let name = file.file_name().ok_or_else(|| {
            DotError::Io(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("shape file has no file name: {}", file.display()),
            ))
        })?;
        std::fs::copy(file, dir.path().join(name))?;
    }
    debug!(count = files.len(), dir = %dir.path().display(), "staged shape files");
    Ok(Some(dir))
}

// ═══════════════════════════════════════════════════════════════════════════
// Testable Command Builder
// ═══════════════════════════════════════════════════════════════════════════

/// The command a render request resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program name as requested.
    pub name: String,
    pub program: PathBuf,
    pub args: Vec<String>,
}

pub fn build_command_spec(executables: &ExecutableTable, request: &RenderRequest) -> Result<CommandSpec> {
    let program = executables.get(&request.program).ok_or_else(|| {
        DotError::invocation(
            &request.program,
            format!("program '{}' is not in the executable table", request.program),
        )
    })?;
    Ok(CommandSpec {
        name: request.program.clone(),
        program: program.to_path_buf(),
        args: vec![request.format.flag()],
    })
}
