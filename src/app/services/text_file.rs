use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::infrastructure::error::Result;

/// Split editor text into file lines.
///
/// A trailing newline ends the last line rather than starting an empty one,
/// so text loaded with [`join_lines`] saves back byte for byte.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.lines().collect()
}

/// Editor text for a sequence of file lines: every line gets a `\n`.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut text = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for line in lines {
        text.push_str(line.as_ref());
        text.push('\n');
    }
    text
}

/// Read a text file line by line. Invalid UTF-8 is replaced, not rejected.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lines = Vec::new();
    for line in reader.split(b'\n') {
        let mut bytes = line?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }
        lines.push(String::from_utf8_lossy(&bytes).into_owned());
    }
    info!("Read {} lines from {}", lines.len(), path.display());
    Ok(lines)
}

/// Load a file into editor text.
pub fn load_text(path: &Path) -> Result<String> {
    Ok(join_lines(&read_lines(path)?))
}

/// The file a save actually rewrites: symlinks are followed so the link
/// stays a link. Paths that do not exist yet are used as given.
fn save_target(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Temporary sibling used while saving `path`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.mirrorpad-tmp", name))
}

/// Write `lines` to `path`, one `\n`-terminated line each.
///
/// The lines go to a staging file next to the target which is then renamed
/// over it; the existing file is untouched if any step before the rename
/// fails. The file is created when absent. A symlinked `path` rewrites the
/// file it points to, and an existing file keeps its permissions.
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    let target = save_target(path);
    let staging = staging_path(&target);
    let written = (|| -> Result<()> {
        let mut out = BufWriter::new(File::create(&staging)?);
        for line in lines {
            out.write_all(line.as_ref().as_bytes())?;
            out.write_all(b"\n")?;
        }
        out.into_inner().map_err(|e| e.into_error())?.sync_all()?;
        if let Ok(meta) = fs::metadata(&target) {
            fs::set_permissions(&staging, meta.permissions())?;
        }
        fs::rename(&staging, &target)?;
        Ok(())
    })();

    match written {
        Ok(()) => {
            info!("Wrote {} lines to {}", lines.len(), path.display());
            Ok(())
        }
        Err(e) => {
            warn!("Saving {} failed: {}", path.display(), e);
            let _ = fs::remove_file(&staging);
            Err(e)
        }
    }
}

/// Save editor text to `path` line by line.
pub fn save_text(path: &Path, text: &str) -> Result<()> {
    write_lines(path, &split_lines(text))
}
