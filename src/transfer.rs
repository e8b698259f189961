// Transfer step.
// Uploading is delegated to an external program. `Transferer` is the seam:
// the binary uses `RsyncTransferer`, which runs rsync once per file and
// waits for it, and tests plug in fakes that record calls.

use std::ffi::OsString;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Remote permissions forced on every uploaded file.
pub const REMOTE_MODE: u32 = 0o644;

/// Destination of one upload: `host:path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSpec {
    pub host: String,
    pub path: String,
}

impl RemoteSpec {
    /// `{dest_dir}/{subdirectory}/{name}` on `host`.
    pub fn new(host: &str, dest_dir: &str, subdirectory: &str, name: &str) -> Self {
        let root = match dest_dir.trim_end_matches('/') {
            "" if dest_dir.starts_with('/') => "",
            "" => ".",
            trimmed => trimmed,
        };
        Self {
            host: host.to_string(),
            path: format!("{root}/{subdirectory}/{name}"),
        }
    }
}

impl fmt::Display for RemoteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.path)
    }
}

/// How the remote copy is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferOptions {
    /// Skip based on checksum rather than size and mtime.
    pub checksum: bool,
    /// Force these permission bits on the remote file.
    pub mode: Option<u32>,
    /// Create missing remote directories.
    pub make_path: bool,
    pub preserve_times: bool,
    pub progress: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        Self {
            checksum: true,
            mode: Some(REMOTE_MODE),
            make_path: true,
            preserve_times: true,
            progress: true,
        }
    }
}

/// Exit status of one transfer. `code` is `None` when the program was
/// killed by a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferStatus {
    pub code: Option<i32>,
}

impl TransferStatus {
    pub const SUCCESS: Self = Self { code: Some(0) };

    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for TransferStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            code: status.code(),
        }
    }
}

/// Copies one local file to one remote destination and blocks until done.
pub trait Transferer {
    /// An `Err` means the transfer could not be started at all.
    fn transfer(
        &mut self,
        local: &Path,
        remote: &RemoteSpec,
        options: &TransferOptions,
    ) -> io::Result<TransferStatus>;
}

/// Runs the `rsync` binary with inherited stdio so its progress output
/// reaches the terminal.
#[derive(Debug, Clone)]
pub struct RsyncTransferer {
    program: OsString,
}

impl Default for RsyncTransferer {
    fn default() -> Self {
        Self::new("rsync")
    }
}

impl RsyncTransferer {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Build the command for one file without running it.
    pub fn command(&self, local: &Path, remote: &RemoteSpec, options: &TransferOptions) -> Command {
        let mut command = Command::new(&self.program);
        command.args(flags(options));
        // Paths starting with `-` must not be read as options.
        command.arg("--");
        command.arg(local);
        command.arg(remote.to_string());
        command
    }
}

impl Transferer for RsyncTransferer {
    fn transfer(
        &mut self,
        local: &Path,
        remote: &RemoteSpec,
        options: &TransferOptions,
    ) -> io::Result<TransferStatus> {
        let mut command = self.command(local, remote, options);
        tracing::debug!(?command, "running rsync");
        let status = command.status()?;
        tracing::debug!(%status, local = %local.display(), "rsync finished");
        Ok(status.into())
    }
}

fn flags(options: &TransferOptions) -> Vec<String> {
    let mut flags = Vec::new();
    if options.checksum {
        flags.push("--checksum".to_string());
    }
    if let Some(mode) = options.mode {
        flags.push("--chmod".to_string());
        flags.push(format!("{mode:04o}"));
    }
    if options.make_path {
        flags.push("--mkpath".to_string());
    }
    if options.progress {
        flags.push("--progress".to_string());
    }
    if options.preserve_times {
        flags.push("--times".to_string());
    }
    flags
}
