//! Album description files.

use std::path::{Path, PathBuf};

use album_render::AlbumContent;
use anyhow::Context;
use serde::Deserialize;

/// JSON album description: the album metadata plus an optional cover path.
///
/// ```json
/// {
///   "title": "Abbey Road",
///   "artist": "The Beatles",
///   "release_date": "1969-09-26",
///   "tracks": ["Come Together", {"name": "Something", "highlighted": true}],
///   "url": "https://open.spotify.com/album/...",
///   "cover_path": "covers/abbey-road.jpg"
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct AlbumFile {
    #[serde(flatten)]
    pub content: AlbumContent,
    /// Relative paths resolve against the directory of the JSON file.
    #[serde(default)]
    pub cover_path: Option<PathBuf>,
}

impl AlbumFile {
    pub fn parse(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Cover path resolved against `base_dir`.
    pub fn resolved_cover(&self, base_dir: &Path) -> Option<PathBuf> {
        self.cover_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                base_dir.join(p)
            }
        })
    }
}

/// Read an album file and its cover image.
///
/// `cover_override` replaces the file's `cover_path`. With neither, the
/// content has no cover and the renderer draws a placeholder.
pub fn load_album(
    path: &Path,
    cover_override: Option<&Path>,
) -> Result<AlbumContent, anyhow::Error> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read album file {}", path.display()))?;
    let album = AlbumFile::parse(&json)
        .with_context(|| format!("Invalid album file {}", path.display()))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let cover = cover_override
        .map(Path::to_path_buf)
        .or_else(|| album.resolved_cover(base_dir));

    let mut content = album.content;
    if let Some(cover) = cover {
        tracing::debug!("Reading cover from {}", cover.display());
        let bytes = std::fs::read(&cover)
            .with_context(|| format!("Failed to read cover image {}", cover.display()))?;
        content.cover = Some(bytes);
    } else {
        tracing::warn!("No cover image for '{}', using placeholder", content.title);
    }

    Ok(content)
}
