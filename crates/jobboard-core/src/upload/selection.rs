use std::io;
use std::path::{Path, PathBuf};

use futures::stream::{self, BoxStream, StreamExt};
use tokio::io::AsyncReadExt;

use super::SelectionError;

/// Known video extensions and their media types
const VIDEO_TYPES: &[(&str, &str)] = &[
    ("mp4", "video/mp4"),
    ("m4v", "video/x-m4v"),
    ("mov", "video/quicktime"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("avi", "video/x-msvideo"),
    ("ogv", "video/ogg"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("3gp", "video/3gpp"),
];

/// Media type for a video file name, if the extension is a known video type
pub fn video_content_type(file_name: &str) -> Option<&'static str> {
    let ext = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    VIDEO_TYPES
        .iter()
        .find(|(known, _)| *known == ext)
        .map(|(_, content_type)| *content_type)
}

#[derive(Debug, Clone)]
enum Source {
    Path(PathBuf),
    Memory(Vec<u8>),
}

/// A video chosen for upload.
#[derive(Debug, Clone)]
pub struct VideoFile {
    file_name: String,
    content_type: String,
    size: u64,
    source: Source,
}

impl VideoFile {
    /// Pick a file from disk. It must exist, be non-empty and have a video
    /// extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(SelectionError::NotFound(path.to_path_buf()));
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| SelectionError::NotVideo(path.to_path_buf()))?;
        let content_type =
            video_content_type(&file_name).ok_or_else(|| SelectionError::NotVideo(path.to_path_buf()))?;

        let size = std::fs::metadata(path)?.len();
        if size == 0 {
            return Err(SelectionError::Empty(path.to_path_buf()));
        }

        Ok(Self {
            file_name,
            content_type: content_type.to_string(),
            size,
            source: Source::Path(path.to_path_buf()),
        })
    }

    /// Wrap bytes already in memory. No validation is done here.
    pub fn from_bytes(file_name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size: data.len() as u64,
            source: Source::Memory(data),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the file as a stream of chunks of at most `chunk_size` bytes.
    pub(crate) fn chunks(&self, chunk_size: usize) -> BoxStream<'static, io::Result<Vec<u8>>> {
        let chunk_size = chunk_size.max(1);
        match &self.source {
            Source::Memory(data) => {
                let chunks: Vec<io::Result<Vec<u8>>> =
                    data.chunks(chunk_size).map(|c| Ok(c.to_vec())).collect();
                stream::iter(chunks).boxed()
            }
            Source::Path(path) => file_chunks(path.clone(), chunk_size),
        }
    }
}

enum ReadState {
    Unopened(PathBuf),
    Open(tokio::fs::File),
    Done,
}

fn file_chunks(path: PathBuf, chunk_size: usize) -> BoxStream<'static, io::Result<Vec<u8>>> {
    stream::unfold(ReadState::Unopened(path), move |state| async move {
        let mut file = match state {
            ReadState::Unopened(path) => match tokio::fs::File::open(&path).await {
                Ok(file) => file,
                Err(e) => return Some((Err(e), ReadState::Done)),
            },
            ReadState::Open(file) => file,
            ReadState::Done => return None,
        };

        let mut buf = vec![0u8; chunk_size];
        match file.read(&mut buf).await {
            Ok(0) => None,
            Ok(n) => {
                buf.truncate(n);
                Some((Ok(buf), ReadState::Open(file)))
            }
            Err(e) => Some((Err(e), ReadState::Done)),
        }
    })
    .boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;

    #[test]
    fn test_video_content_type() {
        assert_eq!(video_content_type("intro.mp4"), Some("video/mp4"));
        assert_eq!(video_content_type("INTRO.MOV"), Some("video/quicktime"));
        assert_eq!(video_content_type("clip.webm"), Some("video/webm"));
        assert_eq!(video_content_type("notes.txt"), None);
        assert_eq!(video_content_type("no_extension"), None);
    }

    #[test]
    fn test_from_path_rejects_missing_empty_and_non_video() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.mp4");
        assert!(matches!(VideoFile::from_path(&missing), Err(SelectionError::NotFound(_))));

        let empty = dir.path().join("empty.mp4");
        std::fs::write(&empty, b"").unwrap();
        assert!(matches!(VideoFile::from_path(&empty), Err(SelectionError::Empty(_))));

        let text = dir.path().join("cv.pdf");
        std::fs::write(&text, b"%PDF").unwrap();
        assert!(matches!(VideoFile::from_path(&text), Err(SelectionError::NotVideo(_))));
    }

    #[test]
    fn test_from_path_accepts_video() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intro.mp4");
        std::fs::write(&path, vec![7u8; 1500]).unwrap();

        let video = VideoFile::from_path(&path).unwrap();
        assert_eq!(video.file_name(), "intro.mp4");
        assert_eq!(video.content_type(), "video/mp4");
        assert_eq!(video.size(), 1500);
    }

    #[tokio::test]
    async fn test_file_chunks_cover_whole_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intro.webm");
        let data: Vec<u8> = (0..2500u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        let video = VideoFile::from_path(&path).unwrap();
        let chunks: Vec<Vec<u8>> = video.chunks(1000).try_collect().await.unwrap();
        assert!(chunks.iter().all(|c| c.len() <= 1000));
        assert_eq!(chunks.concat(), data);
    }

    #[tokio::test]
    async fn test_memory_chunks() {
        let video = VideoFile::from_bytes("a.mp4", "video/mp4", vec![1, 2, 3, 4, 5]);
        let chunks: Vec<Vec<u8>> = video.chunks(2).try_collect().await.unwrap();
        assert_eq!(chunks, vec![vec![1, 2], vec![3, 4], vec![5]]);
    }
}
