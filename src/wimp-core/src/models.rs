use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Hash)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

catalog_id!(
    /// A catalog track identifier.
    ///
    /// The service hands out numeric ids; they are kept as opaque strings since
    /// they only ever travel back into URLs.
    TrackId
);
catalog_id!(
    /// A catalog album identifier.
    AlbumId
);
catalog_id!(
    /// A catalog artist identifier.
    ArtistId
);
catalog_id!(
    /// A playlist identifier (a UUID on the service side).
    PlaylistId
);

/// Lightweight artist reference embedded in tracks and albums.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: ArtistId,
    pub name: String,
}

/// Lightweight album reference embedded in tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRef {
    pub id: AlbumId,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: TrackId,
    pub name: String,
    pub track_num: u32,
    pub disc_num: u32,
    /// Duration in seconds when known.
    pub duration: Option<u32>,
    pub artist: ArtistRef,
    pub album: AlbumRef,
    /// False when the track cannot be streamed in the session's region.
    pub available: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Album {
    pub id: AlbumId,
    pub name: String,
    pub image: Option<String>,
    pub artist: ArtistRef,
    pub num_tracks: Option<u32>,
    pub duration: Option<u32>,
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub id: ArtistId,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: PlaylistId,
    pub name: String,
    pub description: Option<String>,
    pub num_tracks: Option<u32>,
    pub duration: Option<u32>,
    pub image: Option<String>,
}

/// A genre or a mood. Both are browsed by their `path` slug.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub path: String,
    pub image: Option<String>,
    pub has_playlists: bool,
    pub has_albums: bool,
    pub has_tracks: bool,
}

impl Category {
    /// Whether the category exposes a sub-listing of the given kind.
    pub fn has(&self, kind: ContentKind) -> bool {
        match kind {
            ContentKind::Playlists => self.has_playlists,
            ContentKind::Albums => self.has_albums,
            ContentKind::Tracks => self.has_tracks,
        }
    }
}

/// Results of a single search query across all entity types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub artists: Vec<Artist>,
    pub albums: Vec<Album>,
    pub playlists: Vec<Playlist>,
    pub tracks: Vec<Track>,
}

/// Any entity that can show up in a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CatalogItem {
    Artist(Artist),
    Album(Album),
    Playlist(Playlist),
    Track(Track),
}

impl From<SearchResult> for Vec<CatalogItem> {
    /// Flattens in display order: artists, albums, playlists, tracks.
    fn from(result: SearchResult) -> Self {
        let mut items = Vec::with_capacity(
            result.artists.len() + result.albums.len() + result.playlists.len() + result.tracks.len(),
        );
        items.extend(result.artists.into_iter().map(CatalogItem::Artist));
        items.extend(result.albums.into_iter().map(CatalogItem::Album));
        items.extend(result.playlists.into_iter().map(CatalogItem::Playlist));
        items.extend(result.tracks.into_iter().map(CatalogItem::Track));
        items
    }
}

/// Entity kinds that genres, moods and featured lists can be scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Playlists,
    Albums,
    Tracks,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Playlists,
        ContentKind::Albums,
        ContentKind::Tracks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Playlists => "playlists",
            ContentKind::Albums => "albums",
            ContentKind::Tracks => "tracks",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }
}

/// Editorial groups of the featured listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeaturedGroup {
    New,
    Top,
    Recommended,
}

impl FeaturedGroup {
    pub const ALL: [FeaturedGroup; 3] = [
        FeaturedGroup::New,
        FeaturedGroup::Top,
        FeaturedGroup::Recommended,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeaturedGroup::New => "new",
            FeaturedGroup::Top => "top",
            FeaturedGroup::Recommended => "recommended",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|group| group.as_str() == value)
    }
}

/// Paging request represented as offset/limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn first_page(limit: u32) -> Self {
        Self { offset: 0, limit }
    }

    /// The request following a page that returned `received` items. Servers
    /// may return short pages before the end, so the offset moves by what
    /// actually arrived.
    pub fn after(&self, received: usize) -> Self {
        let received = u32::try_from(received).unwrap_or(u32::MAX);
        Self {
            offset: self.offset.saturating_add(received),
            limit: self.limit,
        }
    }
}

/// A single page of items plus the server-reported total, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: Option<u32>,
}

/// Transport scheme of a resolved stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamProtocol {
    /// Progressive download over HTTP(S).
    Http,
    /// Legacy RTMP stream rebuilt from a `host/app/playpath` string.
    Rtmp,
}

/// A playable URL for one track plus the metadata the host needs to play it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaStream {
    pub url: String,
    pub protocol: StreamProtocol,
    pub quality: crate::session::Quality,
}

impl MediaStream {
    pub fn mime_type(&self) -> &'static str {
        self.quality.mime_type()
    }
}
