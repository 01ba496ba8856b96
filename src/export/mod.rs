//! Document export: transcripts and verdicts as PDF, written on request.

pub mod pdf;

use std::path::{Path, PathBuf};

pub use pdf::{transcript_pdf, verdict_pdf, ExportError};

/// Write `bytes` to `dir/file_name`, creating `dir` when missing.
pub fn save_document(dir: &Path, file_name: &str, bytes: &[u8]) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    std::fs::write(&path, bytes)?;
    log::info!("export: wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(path)
}

/// `<stem>-YYYYMMDD-HHMMSS.<ext>` in local time.
pub fn timestamped_name(stem: &str, extension: &str) -> String {
    format!(
        "{stem}-{}.{extension}",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_creates_directory_and_file() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("exports");
        let path = save_document(&out, "chat.pdf", b"%PDF-1.5").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.5");
    }

    #[test]
    fn timestamped_name_has_stem_and_extension() {
        let name = timestamped_name("chat_history", "pdf");
        assert!(name.starts_with("chat_history-"));
        assert!(name.ends_with(".pdf"));
        assert_eq!(name.len(), "chat_history-".len() + 15 + ".pdf".len());
    }
}
