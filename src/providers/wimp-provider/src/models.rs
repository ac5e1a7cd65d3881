//! Wire types of the streaming API. Only the fields the plugin reads are
//! declared; everything else in the payload is ignored.

use serde::{Deserialize, Deserializer};

/// Ids arrive as JSON numbers for catalog entities and as strings for
/// playlists; both end up as strings.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(deserialize_with = "deserialize_id")]
    pub user_id: String,
    pub session_id: String,
    pub country_code: String,
}

/// Envelope of every paginated listing.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsPage<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub total_number_of_items: Option<u32>,
}

/// Favorites wrap each entity together with the time it was added.
#[derive(Debug, Deserialize)]
pub struct FavoriteEntry<T> {
    pub item: T,
}

#[derive(Debug, Deserialize)]
pub struct ArtistRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AlbumRef {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cover: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub track_number: Option<u32>,
    #[serde(default)]
    pub volume_number: Option<u32>,
    #[serde(default = "default_true")]
    pub stream_ready: bool,
    #[serde(default = "default_true")]
    pub allow_streaming: bool,
    pub artist: ArtistRef,
    pub album: AlbumRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub cover: Option<String>,
    pub artist: ArtistRef,
    #[serde(default)]
    pub number_of_tracks: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Artist {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub uuid: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub number_of_tracks: Option<u32>,
    #[serde(default)]
    pub duration: Option<u32>,
    #[serde(default)]
    pub image: Option<String>,
}

/// A genre or mood entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub has_playlists: bool,
    #[serde(default)]
    pub has_albums: bool,
    #[serde(default)]
    pub has_tracks: bool,
}

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub artists: Option<ItemsPage<Artist>>,
    #[serde(default)]
    pub albums: Option<ItemsPage<Album>>,
    #[serde(default)]
    pub playlists: Option<ItemsPage<Playlist>>,
    #[serde(default)]
    pub tracks: Option<ItemsPage<Track>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StreamUrlResponse {
    pub url: String,
    #[serde(default)]
    pub sound_quality: Option<String>,
}
