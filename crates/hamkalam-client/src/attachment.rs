//! Pending attachment validation and preview.
//!
//! At most one file is pending at a time; a new selection silently replaces
//! the previous preview, and a removal clears everything.

use thiserror::Error;
use tracing::debug;

use hamkalam_shared::constants::MAX_ATTACHMENT_SIZE;

/// User-facing rejection message (size ceiling), in the user's language.
pub const TOO_LARGE_MESSAGE: &str = "حجم فایل نباید بیشتر از 16 مگابایت باشد";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachmentError {
    #[error("{TOO_LARGE_MESSAGE}")]
    TooLarge { size: u64 },
}

/// A file chosen in the picker, held only until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSelection {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

/// Icon shown in the preview row, derived from the MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileIcon {
    Image,
    Video,
    Audio,
    Pdf,
    Archive,
    Generic,
}

impl FileIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            FileIcon::Image => "🖼️",
            FileIcon::Video => "🎥",
            FileIcon::Audio => "🎵",
            FileIcon::Pdf => "📄",
            FileIcon::Archive => "📦",
            FileIcon::Generic => "📎",
        }
    }
}

/// Preview row rendered for the pending selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentPreview {
    pub icon: FileIcon,
    pub name: String,
    pub size_label: String,
}

pub fn icon_for_mime(mime: &str) -> FileIcon {
    if mime.starts_with("image/") {
        FileIcon::Image
    } else if mime.starts_with("video/") {
        FileIcon::Video
    } else if mime.starts_with("audio/") {
        FileIcon::Audio
    } else if mime.contains("pdf") {
        FileIcon::Pdf
    } else if mime.contains("zip") || mime.contains("rar") {
        FileIcon::Archive
    } else {
        FileIcon::Generic
    }
}

/// Human-readable size: bytes below 1024, KB to one decimal below 1 MiB,
/// MB to one decimal above.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

/// The file input plus its preview row.
#[derive(Debug, Default)]
pub struct AttachmentPicker {
    pending: Option<FileSelection>,
}

impl AttachmentPicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a chosen file. Oversized files clear the input and reject;
    /// anything else replaces the pending selection wholesale.
    pub fn select(&mut self, file: FileSelection) -> Result<AttachmentPreview, AttachmentError> {
        if file.size > MAX_ATTACHMENT_SIZE {
            let size = file.size;
            self.pending = None;
            return Err(AttachmentError::TooLarge { size });
        }

        let preview = AttachmentPreview {
            icon: icon_for_mime(&file.mime),
            name: file.name.clone(),
            size_label: format_size(file.size),
        };

        debug!(name = %file.name, size = file.size, "Attachment selected");
        self.pending = Some(file);
        Ok(preview)
    }

    /// Remove action on the preview row.
    pub fn remove(&mut self) {
        self.pending = None;
    }

    /// Clear after a successful send.
    pub fn clear(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&FileSelection> {
        self.pending.as_ref()
    }
}
