use std::path::PathBuf;

/// A single playlist entry.
///
/// Identity is the path alone; the same path may appear more than once when
/// the user adds overlapping folders, and no deduplication is performed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Track {
    pub path: PathBuf,
    /// File name without directory and without extension.
    pub title: String,
}

impl Track {
    pub fn from_path(path: PathBuf) -> Self {
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();
        Self { path, title }
    }

    /// File name including the extension, as matched by search queries.
    pub fn file_name(&self) -> &str {
        self.path.file_name().and_then(|s| s.to_str()).unwrap_or("")
    }
}
