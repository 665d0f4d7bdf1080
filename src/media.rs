use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// A single episode of a series
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Episode {
    pub number: i64,
    pub title: String,
    #[serde(default, alias = "is_filler")]
    pub filler: bool,
}

impl Episode {
    pub fn new(number: i64, title: impl Into<String>, filler: bool) -> Self {
        Self {
            number,
            title: title.into(),
            filler,
        }
    }
}

/// Fully resolved series metadata, read-only for the renamer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Media {
    pub title: String,
    pub episode_count: usize,
    episodes: BTreeMap<i64, Episode>,
}

impl Media {
    pub fn new(title: impl Into<String>, episodes: impl IntoIterator<Item = Episode>) -> Self {
        let episodes: BTreeMap<i64, Episode> =
            episodes.into_iter().map(|e| (e.number, e)).collect();

        Self {
            title: title.into(),
            episode_count: episodes.len(),
            episodes,
        }
    }

    pub fn episode(&self, number: i64) -> Option<&Episode> {
        self.episodes.get(&number)
    }

    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.episodes.values()
    }
}

#[derive(Deserialize)]
struct MediaFile {
    title: String,
    #[serde(default)]
    episode_count: Option<usize>,
    #[serde(default)]
    episodes: Vec<Episode>,
}

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Failed to read media file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid media file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Load series metadata from a JSON file:
/// `{"title": "...", "episodes": [{"number": 1, "title": "...", "filler": false}]}`
pub fn load_media(path: &Path) -> Result<Media, MediaError> {
    debug!(path = ?path, "Loading media");

    let file = File::open(path).map_err(|source| MediaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let raw: MediaFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| MediaError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut media = Media::new(raw.title, raw.episodes);
    if let Some(count) = raw.episode_count {
        media.episode_count = count;
    }

    info!(title = %media.title, episodes = media.episode_count, "Loaded media");

    Ok(media)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_media_lookup() {
        let media = Media::new(
            "Naruto",
            vec![
                Episode::new(5, "Filler Arc Start", true),
                Episode::new(6, "Canon Arc Start", false),
            ],
        );

        assert_eq!(media.episode_count, 2);
        assert!(media.episode(5).unwrap().filler);
        assert_eq!(media.episode(6).unwrap().title, "Canon Arc Start");
        assert!(media.episode(7).is_none());
    }

    #[test]
    fn test_load_media() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("media.json");
        std::fs::write(
            &path,
            r#"{
                "title": "My Anime",
                "episode_count": 24,
                "episodes": [
                    {"number": 1, "title": "Start"},
                    {"number": 2, "title": "Recap", "is_filler": true}
                ]
            }"#,
        )
        .unwrap();

        let media = load_media(&path).unwrap();
        assert_eq!(media.title, "My Anime");
        assert_eq!(media.episode_count, 24);
        assert!(!media.episode(1).unwrap().filler);
        assert!(media.episode(2).unwrap().filler);
    }

    #[test]
    fn test_load_media_missing_file() {
        let result = load_media(Path::new("/nonexistent/media.json"));
        assert!(matches!(result, Err(MediaError::Io { .. })));
    }

    #[test]
    fn test_load_media_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("media.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(load_media(&path), Err(MediaError::Parse { .. })));
    }
}
