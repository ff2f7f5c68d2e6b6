//! Album metadata handed to the renderer.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Track list entries shown on the panel.
pub const MAX_TRACKS: usize = 5;

/// One entry of the track list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TrackRepr")]
pub struct Track {
    pub name: String,
    /// Marked with an asterisk (e.g. the track is also in the source playlist).
    pub highlighted: bool,
}

impl Track {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            highlighted: false,
        }
    }

    pub fn highlighted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            highlighted: true,
        }
    }
}

impl From<&str> for Track {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Track {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Accepts either a bare track name or a `{name, highlighted}` object.
#[derive(Deserialize)]
#[serde(untagged)]
enum TrackRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        highlighted: bool,
    },
}

impl From<TrackRepr> for Track {
    fn from(repr: TrackRepr) -> Self {
        match repr {
            TrackRepr::Name(name) => Track::new(name),
            TrackRepr::Full { name, highlighted } => Track { name, highlighted },
        }
    }
}

/// Everything drawn for one album.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumContent {
    pub title: String,
    pub artist: String,
    /// Release date as reported by the catalog (`YYYY-MM-DD`, `YYYY-MM` or `YYYY`).
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub tracks: Vec<Track>,
    /// Encoded cover image bytes; `None` draws a placeholder.
    #[serde(skip)]
    pub cover: Option<Vec<u8>>,
    /// Link encoded in the QR code.
    #[serde(default)]
    pub url: String,
}

impl AlbumContent {
    /// Year shown under the cover, if there is a release date.
    pub fn release_year(&self) -> Option<String> {
        self.release_date.as_deref().map(format_release_year)
    }

    /// Numbered rows for the track list.
    pub fn track_rows(&self) -> Vec<TrackRow> {
        numbered_tracks(&self.tracks)
    }
}

/// A numbered track list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackRow {
    /// 1-based position, two digits (`01`..`05`).
    pub number: String,
    pub name: String,
    pub highlighted: bool,
}

/// Number the first [`MAX_TRACKS`] tracks, starting at 1.
pub fn numbered_tracks(tracks: &[Track]) -> Vec<TrackRow> {
    tracks
        .iter()
        .take(MAX_TRACKS)
        .enumerate()
        .map(|(i, track)| TrackRow {
            number: format!("{:02}", i + 1),
            name: track.name.clone(),
            highlighted: track.highlighted,
        })
        .collect()
}

/// Reduce a release date to its year.
///
/// `1971-09-24` becomes `1971`; other strings of at least four characters
/// keep their first four; shorter strings are returned as is.
pub fn format_release_year(date: &str) -> String {
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return parsed.year().to_string();
    }
    match date.char_indices().nth(4) {
        Some((end, _)) => date[..end].to_string(),
        None => date.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seven_tracks_keep_first_five() {
        let tracks: Vec<Track> = ["A", "B", "C", "D", "E", "F", "G"]
            .into_iter()
            .map(Track::from)
            .collect();
        let rows = numbered_tracks(&tracks);
        assert_eq!(rows.len(), MAX_TRACKS);
        let numbers: Vec<&str> = rows.iter().map(|r| r.number.as_str()).collect();
        assert_eq!(numbers, ["01", "02", "03", "04", "05"]);
        assert_eq!(rows[4].name, "E");
    }

    #[test]
    fn test_no_tracks_no_rows() {
        assert!(numbered_tracks(&[]).is_empty());
    }

    #[test]
    fn test_highlight_carries_over() {
        let rows = numbered_tracks(&[Track::new("Something"), Track::highlighted("Because")]);
        assert!(!rows[0].highlighted);
        assert!(rows[1].highlighted);
        assert_eq!(rows[1].number, "02");
    }

    #[test]
    fn test_format_release_year() {
        assert_eq!(format_release_year("1969-09-26"), "1969");
        assert_eq!(format_release_year("1971-09"), "1971");
        assert_eq!(format_release_year("1971"), "1971");
        assert_eq!(format_release_year("71"), "71");
        assert_eq!(format_release_year(""), "");
    }

    #[test]
    fn test_release_year_absent() {
        let content = AlbumContent::default();
        assert_eq!(content.release_year(), None);
    }

    #[test]
    fn test_album_json_accepts_both_track_shapes() {
        let json = r#"{
            "title": "Abbey Road",
            "artist": "The Beatles",
            "release_date": "1969-09-26",
            "tracks": ["Come Together", {"name": "Something", "highlighted": true}],
            "url": "https://open.spotify.com/album/x"
        }"#;
        let content: AlbumContent = serde_json::from_str(json).unwrap();
        assert_eq!(content.tracks[0], Track::new("Come Together"));
        assert_eq!(content.tracks[1], Track::highlighted("Something"));
        assert!(content.cover.is_none());
        assert_eq!(content.release_year().as_deref(), Some("1969"));
    }
}
