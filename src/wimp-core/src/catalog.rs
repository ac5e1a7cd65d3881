use crate::models::{
    Album, AlbumId, Artist, ArtistId, CatalogItem, Category, ContentKind, FeaturedGroup,
    MediaStream, Playlist, PlaylistId, SearchResult, Track, TrackId,
};
use crate::session::Session;
use std::fmt;
use thiserror::Error;

/// Why a call was refused for lack of identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No session at all; nothing was sent.
    NoSession,
    /// The call targets the current user but the session carries none.
    NoUser,
    /// The service answered 401/403.
    Rejected { status: u16 },
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthFailure::NoSession => f.write_str("no session"),
            AuthFailure::NoUser => f.write_str("no user in session"),
            AuthFailure::Rejected { status } => write!(f, "rejected with HTTP {status}"),
        }
    }
}

/// Failures surfaced by the streaming service client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthenticated: {0}")]
    Unauthenticated(AuthFailure),
    #[error("login failed: {message}")]
    LoginFailed { message: String },
    #[error("HTTP {status} from {endpoint}")]
    Http { status: u16, endpoint: String },
    #[error("network error: {message}")]
    Network { message: String },
    #[error("unexpected response from {endpoint}: {message}")]
    Decode { endpoint: String, message: String },
    #[error("invalid media url: {0}")]
    InvalidMediaUrl(String),
    #[error("{message}")]
    Other { message: String },
}

impl ApiError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated(_))
    }

    /// HTTP-class status of the failure, when it has one. Local
    /// authentication refusals report 401.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthenticated(AuthFailure::Rejected { status }) => Some(*status),
            ApiError::Unauthenticated(_) => Some(401),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The streaming service as seen by the views.
///
/// Listings come back in server order. Tracks keep their `available` flag;
/// filtering unplayable tracks is the caller's job.
pub trait CatalogService {
    fn session(&self) -> &Session;

    /// Exchange credentials for a session. On failure the current session is
    /// left exactly as it was.
    fn login(&mut self, username: &str, password: &str) -> ApiResult<Session>;

    /// Drop the current identity. Never touches the network.
    fn logout(&mut self) -> Session;

    fn album(&self, album_id: &AlbumId) -> ApiResult<Album>;

    fn album_tracks(&self, album_id: &AlbumId) -> ApiResult<Vec<Track>>;

    fn artist(&self, artist_id: &ArtistId) -> ApiResult<Artist>;

    /// Regular studio albums.
    fn artist_albums(&self, artist_id: &ArtistId) -> ApiResult<Vec<Album>>;

    fn artist_albums_ep_singles(&self, artist_id: &ArtistId) -> ApiResult<Vec<Album>>;

    /// Compilations and appearances.
    fn artist_albums_other(&self, artist_id: &ArtistId) -> ApiResult<Vec<Album>>;

    /// Main albums, then EPs and singles, then everything else.
    fn artist_albums_all(&self, artist_id: &ArtistId) -> ApiResult<Vec<Album>> {
        let mut albums = self.artist_albums(artist_id)?;
        albums.extend(self.artist_albums_ep_singles(artist_id)?);
        albums.extend(self.artist_albums_other(artist_id)?);
        Ok(albums)
    }

    fn artist_top_tracks(&self, artist_id: &ArtistId) -> ApiResult<Vec<Track>>;

    fn artist_radio(&self, artist_id: &ArtistId) -> ApiResult<Vec<Track>>;

    fn similar_artists(&self, artist_id: &ArtistId) -> ApiResult<Vec<Artist>>;

    fn playlist(&self, playlist_id: &PlaylistId) -> ApiResult<Playlist>;

    fn playlist_tracks(&self, playlist_id: &PlaylistId) -> ApiResult<Vec<Track>>;

    fn user_playlists(&self) -> ApiResult<Vec<Playlist>>;

    fn favorite_artists(&self) -> ApiResult<Vec<Artist>>;

    fn favorite_albums(&self) -> ApiResult<Vec<Album>>;

    fn favorite_tracks(&self) -> ApiResult<Vec<Track>>;

    fn favorite_playlists(&self) -> ApiResult<Vec<Playlist>>;

    fn genres(&self) -> ApiResult<Vec<Category>>;

    fn genre_items(&self, genre_path: &str, kind: ContentKind) -> ApiResult<Vec<CatalogItem>>;

    fn moods(&self) -> ApiResult<Vec<Category>>;

    fn mood_playlists(&self, mood_path: &str) -> ApiResult<Vec<Playlist>>;

    fn featured(&self, group: FeaturedGroup, kind: ContentKind) -> ApiResult<Vec<CatalogItem>>;

    /// One query, all four entity types.
    fn search(&self, query: &str) -> ApiResult<SearchResult>;

    /// Resolve a playable URL for the track at the session's quality.
    fn media_url(&self, track_id: &TrackId) -> ApiResult<MediaStream>;
}
