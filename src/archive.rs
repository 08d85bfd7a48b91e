use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Writes generated artifacts into a directory, one timestamped file per save
#[derive(Debug, Clone)]
pub struct FileArchive {
    base_path: PathBuf,
    extension: String,
}

impl FileArchive {
    pub fn new(base_path: PathBuf, extension: &str) -> Self {
        Self {
            base_path,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Save `contents` as `<slug(label)>_<timestamp>.<extension>`
    pub async fn save(&self, label: &str, contents: &[u8]) -> io::Result<PathBuf> {
        let timestamp = Utc::now();
        let filename = format!(
            "{}_{}.{}",
            slug(label),
            timestamp.format("%Y%m%d_%H%M%S_%3f"),
            self.extension
        );
        let file_path = self.base_path.join(filename);

        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&file_path).await?;
        file.write_all(contents).await?;
        file.flush().await?;

        debug!(path = %file_path.display(), bytes = contents.len(), "Saved artifact");
        Ok(file_path)
    }
}

fn slug(label: &str) -> String {
    let slug: String = label
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect();
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "topic".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_is_filesystem_safe() {
        assert_eq!(slug("Law of Demand"), "law-of-demand");
        assert_eq!(slug("  ../etc "), "etc");
        assert_eq!(slug("???"), "topic");
    }

    #[tokio::test]
    async fn save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FileArchive::new(dir.path().join("nested"), "mp3");
        let path = archive.save("Water Cycle", b"mp3").await.unwrap();

        assert!(path.starts_with(dir.path().join("nested")));
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("water-cycle_"));
        assert!(name.ends_with(".mp3"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"mp3");
    }

    #[tokio::test]
    async fn extension_dot_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let archive = FileArchive::new(dir.path().to_path_buf(), ".txt");
        let path = archive.save("Physics", b"answers").await.unwrap();
        assert_eq!(path.extension().unwrap(), "txt");
    }
}
