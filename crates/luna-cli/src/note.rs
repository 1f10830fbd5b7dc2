//! Editing the free-text note through a scoped plaintext temp file.

use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{bail, Context};
use luna_records::RecordStore;
use tracing::{error, warn};
use zeroize::Zeroizing;

/// A plaintext file that is securely erased when dropped.
///
/// Created with mode 0600. On drop the file is shredded with
/// `shred --remove --zero --iterations=3`; if that is unavailable or fails,
/// it is overwritten with zeros and removed.
pub struct SecretTempFile {
    path: PathBuf,
}

impl SecretTempFile {
    pub fn create(contents: &[u8]) -> io::Result<Self> {
        Self::create_in(&std::env::temp_dir(), |file| {
            file.write_all(contents)?;
            file.sync_all()
        })
    }

    /// Create the file in `dir` and fill it with `write`. The file is owned
    /// by the returned guard before `write` runs, so a failed write is
    /// erased like any other.
    fn create_in<F>(dir: &Path, write: F) -> io::Result<Self>
    where
        F: FnOnce(&mut fs::File) -> io::Result<()>,
    {
        let (mut file, path) = tempfile::Builder::new()
            .prefix("luna-pass-")
            .tempfile_in(dir)?
            .keep()
            .map_err(|e| e.error)?;
        let secret = Self { path };
        write(&mut file)?;
        Ok(secret)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read(&self) -> io::Result<Zeroizing<Vec<u8>>> {
        let mut contents = Zeroizing::new(Vec::new());
        fs::File::open(&self.path)?.read_to_end(&mut contents)?;
        Ok(contents)
    }

    fn erase(&self) -> io::Result<()> {
        let shred = Command::new("shred")
            .args(["--remove", "--zero", "--iterations=3"])
            .arg(&self.path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match shred {
            Ok(status) if status.success() && !self.path.exists() => return Ok(()),
            Ok(status) => warn!(%status, "shred failed; using fallback"),
            Err(e) => warn!(error = %e, "shred unavailable; using fallback"),
        }
        zero_fill_and_remove(&self.path)
    }
}

impl Drop for SecretTempFile {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        if let Err(e) = self.erase() {
            error!(path = %self.path.display(), error = %e, "failed to erase plaintext note");
        }
    }
}

fn zero_fill_and_remove(path: &Path) -> io::Result<()> {
    let len = fs::metadata(path)?.len();
    let mut file = OpenOptions::new().write(true).open(path)?;
    io::copy(&mut io::repeat(0).take(len), &mut file)?;
    file.sync_all()?;
    drop(file);
    fs::remove_file(path)
}

#[derive(Debug, PartialEq, Eq)]
pub enum NoteOutcome {
    Saved,
    Unchanged,
}

/// Open the note in `editor` and save it back if it changed.
pub async fn edit_note(store: &RecordStore, editor: &str) -> anyhow::Result<NoteOutcome> {
    let mut words = editor.split_whitespace();
    let Some(program) = words.next() else {
        bail!("no editor configured");
    };

    let note = store.get_note().await?;
    let file = SecretTempFile::create(&note).context("failed to create temporary note file")?;

    let status = tokio::process::Command::new(program)
        .args(words)
        .arg(file.path())
        .status()
        .await
        .with_context(|| format!("failed to run editor `{program}`"))?;
    if !status.success() {
        bail!("editor exited with {status}");
    }

    let edited = file.read().context("failed to read edited note")?;
    if *edited == *note {
        return Ok(NoteOutcome::Unchanged);
    }
    store.save_note(&edited).await?;
    Ok(NoteOutcome::Saved)
}
