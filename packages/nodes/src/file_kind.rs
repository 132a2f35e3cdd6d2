//! File-kind inference
//!
//! File embeds carry a coarse media category used to pick the playback
//! surface (`<img>`, `<audio>`, `<video>`, download link). When the
//! category is not supplied it is inferred from the source reference.
//! Inference is deterministic and pure (no I/O), so the authoring and
//! playback sides always agree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    Image,
    Audio,
    Video,
    #[serde(rename = "model_3d")]
    Model3d,
    Document,
    Other,
}

const IMAGE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "webp", "avif", "svg", "bmp", "ico",
];
const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg", "m4a", "flac", "aac"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "m4v", "mkv", "avi"];
const MODEL_3D_EXTENSIONS: &[&str] = &["glb", "gltf", "usdz", "obj", "fbx", "stl"];
const DOCUMENT_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "ppt", "pptx", "xls", "xlsx", "txt", "md", "csv",
];

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::Image => "image",
            FileKind::Audio => "audio",
            FileKind::Video => "video",
            FileKind::Model3d => "model_3d",
            FileKind::Document => "document",
            FileKind::Other => "other",
        }
    }

    /// Infer the kind from a source reference.
    ///
    /// `data:` URIs are classified by MIME prefix first; anything else by
    /// file extension against fixed per-category allow-lists. Unmatched
    /// sources are [`FileKind::Other`].
    pub fn infer(src: &str) -> FileKind {
        if let Some(rest) = src.strip_prefix("data:") {
            return Self::from_mime(rest.split(|c| c == ';' || c == ',').next().unwrap_or(""));
        }

        match extension_of(src) {
            Some(ext) => Self::from_extension(&ext),
            None => FileKind::Other,
        }
    }

    pub fn from_mime(mime: &str) -> FileKind {
        if mime.starts_with("image/") {
            FileKind::Image
        } else if mime.starts_with("audio/") {
            FileKind::Audio
        } else if mime.starts_with("video/") {
            FileKind::Video
        } else if mime.starts_with("model/") {
            FileKind::Model3d
        } else if mime == "application/pdf" || mime.starts_with("text/") {
            FileKind::Document
        } else {
            FileKind::Other
        }
    }

    pub fn from_extension(ext: &str) -> FileKind {
        let ext = ext.to_ascii_lowercase();
        let ext = ext.as_str();

        if IMAGE_EXTENSIONS.contains(&ext) {
            FileKind::Image
        } else if AUDIO_EXTENSIONS.contains(&ext) {
            FileKind::Audio
        } else if VIDEO_EXTENSIONS.contains(&ext) {
            FileKind::Video
        } else if MODEL_3D_EXTENSIONS.contains(&ext) {
            FileKind::Model3d
        } else if DOCUMENT_EXTENSIONS.contains(&ext) {
            FileKind::Document
        } else {
            FileKind::Other
        }
    }
}

/// Extension of a URL-ish source, query string and fragment stripped
fn extension_of(src: &str) -> Option<String> {
    let path = src
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or(src);
    let name = path.rsplit('/').next().unwrap_or(path);

    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_from_extension() {
        assert_eq!(FileKind::infer("https://cdn.example.com/diagram.png"), FileKind::Image);
        assert_eq!(FileKind::infer("lecture.mp3"), FileKind::Audio);
        assert_eq!(FileKind::infer("clip.webm"), FileKind::Video);
        assert_eq!(FileKind::infer("heart.glb"), FileKind::Model3d);
        assert_eq!(FileKind::infer("syllabus.pdf"), FileKind::Document);
        assert_eq!(FileKind::infer("archive.zip"), FileKind::Other);
    }

    #[test]
    fn test_infer_ignores_query_and_fragment() {
        assert_eq!(
            FileKind::infer("https://cdn.example.com/photo.jpeg?w=640#top"),
            FileKind::Image
        );
    }

    #[test]
    fn test_data_uri_mime_wins_over_extension() {
        assert_eq!(FileKind::infer("data:audio/mpeg;base64,AAAA"), FileKind::Audio);
        assert_eq!(FileKind::infer("data:image/png;base64,AAAA"), FileKind::Image);
        assert_eq!(FileKind::infer("data:application/pdf,x"), FileKind::Document);
    }

    #[test]
    fn test_unmatched_is_other() {
        assert_eq!(FileKind::infer("no-extension"), FileKind::Other);
        assert_eq!(FileKind::infer(""), FileKind::Other);
        assert_eq!(FileKind::infer(".gitignore"), FileKind::Other);
    }

    #[test]
    fn test_serde_tags() {
        assert_eq!(
            serde_json::to_string(&FileKind::Model3d).unwrap(),
            "\"model_3d\""
        );
        assert_eq!(
            serde_json::from_str::<FileKind>("\"image\"").unwrap(),
            FileKind::Image
        );
    }
}
