//! Acquisition of the image the user wants analyzed.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

/// MIME prefix every accepted file must carry.
pub const IMAGE_MIME_PREFIX: &str = "image/";

/// Where the bytes of a file live.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FileContent {
    /// A file on disk, read when the upload is built.
    Path(PathBuf),
    /// Bytes already in memory (e.g. handed over by the windowing system).
    Bytes(Arc<[u8]>),
}

impl FileContent {
    pub fn read(&self) -> io::Result<Vec<u8>> {
        match self {
            Self::Path(path) => std::fs::read(path),
            Self::Bytes(bytes) => Ok(bytes.to_vec()),
        }
    }
}

/// A file offered through drag-and-drop or the file picker, not yet validated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
    /// Declared MIME type; empty when unknown.
    pub mime: String,
    pub content: FileContent,
}

impl FileCandidate {
    /// Describe a file on disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let meta = std::fs::metadata(path)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        Ok(Self {
            name: display_name(path),
            size: meta.len(),
            mime: guess_mime(path),
            content: FileContent::Path(path.to_path_buf()),
        })
    }

    /// Describe an in-memory file with an already-declared MIME type.
    pub fn from_bytes(name: impl Into<String>, mime: impl Into<String>, bytes: Arc<[u8]>) -> Self {
        Self {
            name: name.into(),
            size: bytes.len() as u64,
            mime: mime.into(),
            content: FileContent::Bytes(bytes),
        }
    }

    pub fn is_image(&self) -> bool {
        self.mime
            .trim()
            .to_ascii_lowercase()
            .starts_with(IMAGE_MIME_PREFIX)
    }
}

/// MIME type guessed from a path's extension, or an empty string.
pub fn guess_mime(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|mime| mime.essence_str().to_string())
        .unwrap_or_default()
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// The file currently adopted for analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedFile {
    /// Increases with every accepted selection, including re-selecting the same file.
    pub generation: u64,
    pub name: String,
    pub size: u64,
    pub mime: String,
    pub content: FileContent,
}

/// Why a candidate was not adopted.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("No file was dropped")]
    Empty,
    #[error("{name} is not an image ({})", describe_mime(.mime))]
    NotAnImage { name: String, mime: String },
}

fn describe_mime(mime: &str) -> &str {
    if mime.is_empty() { "unknown type" } else { mime }
}

/// Result of offering a candidate to the controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Accepted { generation: u64 },
    Rejected(RejectReason),
}

impl SubmitOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted { .. })
    }
}

/// Owns the selected file and the drag-hover flag.
#[derive(Debug, Default)]
pub struct AcquisitionController {
    selected: Option<SelectedFile>,
    drag_active: bool,
    last_generation: u64,
}

impl AcquisitionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn is_drag_active(&self) -> bool {
        self.drag_active
    }

    /// Adopt `candidate` if it is an image, replacing any current selection.
    ///
    /// Non-image candidates leave the selection untouched.
    pub fn submit(&mut self, candidate: FileCandidate) -> SubmitOutcome {
        if !candidate.is_image() {
            warn!(
                "Ignoring {} with non-image type {:?}",
                candidate.name, candidate.mime
            );
            return SubmitOutcome::Rejected(RejectReason::NotAnImage {
                name: candidate.name,
                mime: candidate.mime,
            });
        }
        self.last_generation += 1;
        let generation = self.last_generation;
        info!(
            "Selected {} ({} bytes, {}) as generation {generation}",
            candidate.name, candidate.size, candidate.mime
        );
        self.selected = Some(SelectedFile {
            generation,
            name: candidate.name,
            size: candidate.size,
            mime: candidate.mime,
            content: candidate.content,
        });
        SubmitOutcome::Accepted { generation }
    }

    /// Handle a drop: ends the drag and submits only the first file.
    pub fn drop_files(&mut self, candidates: impl IntoIterator<Item = FileCandidate>) -> SubmitOutcome {
        self.drag_active = false;
        let mut candidates = candidates.into_iter();
        let Some(first) = candidates.next() else {
            debug!("Drop carried no files");
            return SubmitOutcome::Rejected(RejectReason::Empty);
        };
        let ignored = candidates.count();
        if ignored > 0 {
            debug!("Ignoring {ignored} extra dropped file(s)");
        }
        self.submit(first)
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.drag_active = false;
    }

    pub fn drag_enter(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_over(&mut self) {
        self.drag_active = true;
    }

    pub fn drag_leave(&mut self) {
        self.drag_active = false;
    }
}
