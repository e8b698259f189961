//! Batch behaviour of the upload loop against an in-memory transferer.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tempfile::TempDir;
use up::config::{Config, RawConfig};
use up::name::RemoteSession;
use up::output::Console;
use up::transfer::{RemoteSpec, TransferOptions, TransferStatus, Transferer};
use up::upload::{self, UploadError, UploadResult};

#[derive(Debug, Clone)]
struct Call {
    local: PathBuf,
    remote: RemoteSpec,
    options: TransferOptions,
}

/// Records every call and answers with scripted statuses (success once the
/// script runs out).
#[derive(Default)]
struct FakeTransferer {
    calls: Rc<RefCell<Vec<Call>>>,
    script: VecDeque<io::Result<TransferStatus>>,
}

impl FakeTransferer {
    fn scripted(script: Vec<io::Result<TransferStatus>>) -> Self {
        Self {
            calls: Rc::default(),
            script: script.into(),
        }
    }
}

impl Transferer for FakeTransferer {
    fn transfer(
        &mut self,
        local: &Path,
        remote: &RemoteSpec,
        options: &TransferOptions,
    ) -> io::Result<TransferStatus> {
        self.calls.borrow_mut().push(Call {
            local: local.to_path_buf(),
            remote: remote.clone(),
            options: *options,
        });
        self.script
            .pop_front()
            .unwrap_or(Ok(TransferStatus::SUCCESS))
    }
}

fn config() -> Config {
    Config::from_raw(RawConfig {
        base_url: Some("https://example.com/files/".into()),
        dest_dir: Some("/srv/up".into()),
        target_host: Some("me@example.com".into()),
    })
    .expect("valid config")
}

fn touch(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, name.as_bytes()).expect("write file");
    path
}

fn lines(bytes: Vec<u8>) -> Vec<String> {
    String::from_utf8(bytes)
        .expect("utf8 output")
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn single_file_prints_public_url() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(&dir, "report.txt");
    let session = RemoteSession::new("b3k2p-00f7a");
    let mut fake = FakeTransferer::default();
    let calls = Rc::clone(&fake.calls);
    let mut console = Console::new("up", Vec::new(), Vec::new());

    let report = upload::run(&[file.clone()], &config(), &session, &mut fake, &mut console);

    assert!(report.success());
    let (out, err) = console.into_parts();
    assert_eq!(lines(out), ["https://example.com/files/b3k2p-00f7a/report.txt"]);
    assert!(err.is_empty());

    let calls = calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].local, file);
    assert_eq!(
        calls[0].remote.to_string(),
        "me@example.com:/srv/up/b3k2p-00f7a/report.txt"
    );
    assert_eq!(calls[0].options, TransferOptions::default());
}

#[test]
fn missing_middle_file_does_not_stop_the_batch() {
    let dir = tempfile::tempdir().unwrap();
    let first = touch(&dir, "one.txt");
    let missing = dir.path().join("two.txt");
    let third = touch(&dir, "Three Notes.md");
    let session = RemoteSession::new("s1-00001");
    let mut fake = FakeTransferer::default();
    let calls = Rc::clone(&fake.calls);
    let mut console = Console::new("up", Vec::new(), Vec::new());

    let report = upload::run(
        &[first, missing.clone(), third],
        &config(),
        &session,
        &mut fake,
        &mut console,
    );

    assert!(!report.success());
    assert_eq!(report.results.len(), 3);
    assert!(report.results[0].1.is_success());
    assert!(matches!(
        report.results[1].1,
        UploadResult::Failure {
            reason: UploadError::BadFile { .. }
        }
    ));
    assert!(report.results[2].1.is_success());

    let (out, err) = console.into_parts();
    assert_eq!(
        lines(out),
        [
            "https://example.com/files/s1-00001/one.txt",
            "https://example.com/files/s1-00001/three-notes.md",
        ]
    );
    assert_eq!(
        lines(err),
        [format!("up: error: bad file: {}", missing.display())]
    );
    assert_eq!(calls.borrow().len(), 2);
}

#[test]
fn transfer_failures_are_reported_and_batch_continues() {
    let dir = tempfile::tempdir().unwrap();
    let a = touch(&dir, "a.txt");
    let b = touch(&dir, "b.txt");
    let c = touch(&dir, "c.txt");
    let session = RemoteSession::new("s");
    let mut fake = FakeTransferer::scripted(vec![
        Ok(TransferStatus::exited(12)),
        Err(io::Error::new(io::ErrorKind::NotFound, "no rsync")),
        Ok(TransferStatus::SUCCESS),
    ]);
    let mut console = Console::new("up", Vec::new(), Vec::new());

    let files = [a.clone(), b.clone(), c];
    let report = upload::run(&files, &config(), &session, &mut fake, &mut console);

    assert!(!report.success());
    let (out, err) = console.into_parts();
    assert_eq!(lines(out), ["https://example.com/files/s/c.txt"]);
    assert_eq!(
        lines(err),
        [
            format!("up: error: rsync failed with exit code 12 for '{}'", a.display()),
            format!("up: error: could not run rsync for '{}': no rsync", b.display()),
        ]
    );
}

#[test]
fn every_file_shares_the_session_directory() {
    let dir = tempfile::tempdir().unwrap();
    let files = vec![touch(&dir, "x.bin"), touch(&dir, "y.bin")];
    let session = RemoteSession::new("abc-00000");
    let mut fake = FakeTransferer::default();
    let calls = Rc::clone(&fake.calls);
    let mut console = Console::new("up", Vec::new(), Vec::new());

    upload::run(&files, &config(), &session, &mut fake, &mut console);

    let paths: Vec<String> = calls
        .borrow()
        .iter()
        .map(|call| call.remote.path.clone())
        .collect();
    assert_eq!(paths, ["/srv/up/abc-00000/x.bin", "/srv/up/abc-00000/y.bin"]);
}

#[test]
fn duplicate_inputs_are_uploaded_each_time() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(&dir, "dup.txt");
    let session = RemoteSession::new("s");
    let mut fake = FakeTransferer::default();
    let calls = Rc::clone(&fake.calls);
    let mut console = Console::new("up", Vec::new(), Vec::new());

    let files = [file.clone(), file];
    let report = upload::run(&files, &config(), &session, &mut fake, &mut console);

    assert!(report.success());
    assert_eq!(calls.borrow().len(), 2);
    let (out, _) = console.into_parts();
    assert_eq!(lines(out).len(), 2);
}

#[test]
fn remote_names_are_slugged_and_encoded() {
    let dir = tempfile::tempdir().unwrap();
    let file = touch(&dir, "My Report (final)+v2.PDF");
    let session = RemoteSession::new("s");
    let mut fake = FakeTransferer::default();
    let mut console = Console::new("up", Vec::new(), Vec::new());

    upload::run(&[file], &config(), &session, &mut fake, &mut console);

    let (out, _) = console.into_parts();
    assert_eq!(
        lines(out),
        ["https://example.com/files/s/my-report-final-%2Bv2.pdf"]
    );
}
