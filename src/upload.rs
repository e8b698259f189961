// Upload orchestration.
// One run = one remote session directory. Files are handled strictly in
// order, one transfer at a time. A failure is reported and recorded but
// never stops the remaining files; the batch succeeds only if every file
// did.

use crate::config::Config;
use crate::name::RemoteSession;
use crate::output::Console;
use crate::slug;
use crate::transfer::{RemoteSpec, TransferOptions, Transferer};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

/// Why a single file was not uploaded.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("bad file: {file}")]
    BadFile { file: String },

    #[error("file name has no usable characters: '{file}'")]
    EmptyName { file: String },

    #[error("could not run rsync for '{file}': {source}")]
    Spawn {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("rsync failed with exit code {code} for '{file}'")]
    Exited { file: String, code: i32 },

    #[error("rsync was terminated by a signal for '{file}'")]
    Signaled { file: String },
}

/// Outcome for one input file.
#[derive(Debug)]
pub enum UploadResult {
    Success { public_url: String },
    Failure { reason: UploadError },
}

impl UploadResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// Outcomes for the whole batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub results: Vec<(PathBuf, UploadResult)>,
    /// First failure writing a URL or error line, if any.
    pub output_error: Option<io::Error>,
}

impl BatchReport {
    /// True when every file uploaded and every line was written. An empty
    /// batch counts as success.
    pub fn success(&self) -> bool {
        self.output_error.is_none()
            && self.results.iter().all(|(_, result)| result.is_success())
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Public URL for a remote name inside the session directory.
pub fn public_url(config: &Config, session: &RemoteSession, remote_name: &str) -> String {
    format!("{}/{}/{remote_name}", config.base_url(), session.subdirectory())
}

/// Upload one file without printing anything.
pub fn upload_file<T: Transferer>(
    path: &Path,
    config: &Config,
    session: &RemoteSession,
    transferer: &mut T,
    options: &TransferOptions,
) -> UploadResult {
    let file = path.display().to_string();
    if !path.is_file() {
        return UploadResult::Failure {
            reason: UploadError::BadFile { file },
        };
    }

    let Some(remote_name) = slug::remote_name(path) else {
        return UploadResult::Failure {
            reason: UploadError::EmptyName { file },
        };
    };

    let remote = RemoteSpec::new(
        config.target_host(),
        config.dest_dir(),
        session.subdirectory(),
        &remote_name,
    );
    tracing::debug!(local = %file, %remote, "uploading");

    match transferer.transfer(path, &remote, options) {
        Ok(status) if status.success() => UploadResult::Success {
            public_url: public_url(config, session, &remote_name),
        },
        Ok(status) => {
            let reason = match status.code {
                Some(code) => UploadError::Exited { file, code },
                None => UploadError::Signaled { file },
            };
            UploadResult::Failure { reason }
        }
        Err(source) => UploadResult::Failure {
            reason: UploadError::Spawn { file, source },
        },
    }
}

/// Upload every file in order, printing each URL or error as it happens.
///
/// A failed console write is recorded in the report and the loop moves on
/// to the next file; only the first such error is kept.
pub fn run<T, O, E>(
    files: &[PathBuf],
    config: &Config,
    session: &RemoteSession,
    transferer: &mut T,
    console: &mut Console<O, E>,
) -> BatchReport
where
    T: Transferer,
    O: Write,
    E: Write,
{
    let options = TransferOptions::default();
    let mut report = BatchReport::default();
    tracing::info!(%session, files = files.len(), "starting upload batch");

    for path in files {
        let result = upload_file(path, config, session, transferer, &options);
        let written = match &result {
            UploadResult::Success { public_url } => console.url(public_url),
            UploadResult::Failure { reason } => {
                tracing::debug!(file = %path.display(), error = %reason, "upload failed");
                console.error(reason)
            }
        };
        if let Err(err) = written {
            tracing::debug!(file = %path.display(), error = %err, "console write failed");
            report.output_error.get_or_insert(err);
        }
        report.results.push((path.clone(), result));
    }

    report
}
