//! Pending-attachment list with type filtering and size formatting.
//!
//! Unsupported types are dropped at selection time, not at send time; each
//! drop leaves a warning the UI layer can surface inline.

use shared::chat_api::Attachment;

const DOCUMENT_TYPE: &str = "application/pdf";
const IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/gif", "image/webp"];
const TEXT_TYPE: &str = "text/plain";

pub fn is_supported(mime_type: &str) -> bool {
    mime_type == DOCUMENT_TYPE || mime_type == TEXT_TYPE || IMAGE_TYPES.contains(&mime_type)
}

/// Ordered list of files staged for the next send.
#[derive(Debug, Default)]
pub struct PendingAttachments {
    files: Vec<Attachment>,
    warnings: Vec<String>,
}

impl PendingAttachments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages supported files; records one warning per rejected file.
    pub fn add(&mut self, files: impl IntoIterator<Item = Attachment>) {
        for file in files {
            if is_supported(&file.mime_type) {
                self.files.push(file);
            } else {
                tracing::warn!(name = %file.name, mime = %file.mime_type, "rejected attachment");
                self.warnings
                    .push(format!("{}: unsupported file type ({})", file.name, file.mime_type));
            }
        }
    }

    pub fn remove(&mut self, index: usize) -> Option<Attachment> {
        if index < self.files.len() {
            Some(self.files.remove(index))
        } else {
            None
        }
    }

    /// Hands the staged files to the send path and empties the list.
    pub fn drain(&mut self) -> Vec<Attachment> {
        std::mem::take(&mut self.files)
    }

    pub fn files(&self) -> &[Attachment] {
        &self.files
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }
}

/// Binary (1024-based) size with up to two decimals, e.g. "1.5 KB".
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut exp = 0;
    let mut value = bytes as f64;
    while value >= 1024.0 && exp < UNITS.len() - 1 {
        value /= 1024.0;
        exp += 1;
    }
    let rounded = format!("{value:.2}");
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[exp])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_keeps_pdf_drops_executable() {
        let mut pending = PendingAttachments::new();
        pending.add(vec![
            Attachment::new("report.pdf", "application/pdf", vec![0x25]),
            Attachment::new("setup.exe", "application/x-msdownload", vec![0x4d]),
        ]);
        assert_eq!(pending.files().len(), 1);
        assert_eq!(pending.files()[0].name, "report.pdf");
        assert_eq!(pending.warnings().len(), 1);
        assert!(pending.warnings()[0].contains("setup.exe"));
    }

    #[test]
    fn test_remove_by_position() {
        let mut pending = PendingAttachments::new();
        pending.add(vec![
            Attachment::new("a.txt", "text/plain", vec![1]),
            Attachment::new("b.txt", "text/plain", vec![2]),
        ]);
        let removed = pending.remove(0).unwrap();
        assert_eq!(removed.name, "a.txt");
        assert_eq!(pending.files()[0].name, "b.txt");
        assert!(pending.remove(5).is_none());
    }

    #[test]
    fn test_drain_empties_the_list() {
        let mut pending = PendingAttachments::new();
        pending.add(vec![Attachment::new("a.txt", "text/plain", vec![1])]);
        let drained = pending.drain();
        assert_eq!(drained.len(), 1);
        assert!(pending.is_empty());
    }

    #[test]
    fn test_take_warnings_clears() {
        let mut pending = PendingAttachments::new();
        pending.add(vec![Attachment::new("x.bin", "application/octet-stream", vec![0])]);
        assert_eq!(pending.take_warnings().len(), 1);
        assert!(pending.warnings().is_empty());
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1024 * 1024), "1 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024), "5 GB");
    }

    #[test]
    fn test_format_file_size_caps_at_gb() {
        assert_eq!(format_file_size(2048 * 1024 * 1024 * 1024), "2048 GB");
    }
}
