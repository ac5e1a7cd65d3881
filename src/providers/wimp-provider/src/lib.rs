//! Blocking client for the WiMP/TIDAL private API.
//!
//! [`WimpClient`] owns the process [`Session`] and implements
//! [`CatalogService`] on top of it: every catalog request carries the
//! session's `sessionId` and `countryCode`, paginated listings are walked to
//! completion, and stream URLs are normalised by [`stream::resolve_stream`].

mod http;
mod mapping;
pub mod models;
pub mod stream;
mod user;

use http::HttpTransport;
use mapping::{map_album, map_artist, map_category, map_playlist, map_track};
use serde::de::DeserializeOwned;
use std::time::Duration;
use wimp_core::models::{
    Album, AlbumId, Artist, ArtistId, CatalogItem, Category, ContentKind, FeaturedGroup,
    MediaStream, Page, PageRequest, Playlist, PlaylistId, SearchResult, Track, TrackId,
};
use wimp_core::{
    ApiConfig, ApiError, ApiResult, AuthFailure, CatalogService, Credentials, Quality, Session,
};

pub use stream::{resolve_stream, LegacyStreamUrl};
pub use user::{Favorites, User};

const SEARCH_LIMIT: u32 = 50;
const SEARCH_TYPES: &str = "ARTISTS,ALBUMS,PLAYLISTS,TRACKS";
const FILTER_EP_SINGLES: &str = "EPSINGLES";
const FILTER_OTHER: &str = "COMPILATIONS";

#[derive(Debug, Clone)]
pub struct WimpConfig {
    /// Overrides the site's API root.
    pub base_url: Option<String>,
    /// Overrides the site's application token.
    pub token: Option<String>,
    pub timeout: Duration,
    pub page_size: u32,
    pub max_items: u32,
}

impl Default for WimpConfig {
    fn default() -> Self {
        Self::from(&ApiConfig::default())
    }
}

impl From<&ApiConfig> for WimpConfig {
    fn from(api: &ApiConfig) -> Self {
        Self {
            base_url: api.base_url.clone(),
            token: api.token.clone(),
            timeout: Duration::from_secs(api.timeout_seconds),
            page_size: api.page_size.max(1),
            max_items: api.max_items.max(1),
        }
    }
}

pub struct WimpClient {
    transport: HttpTransport,
    token: String,
    session: Session,
    page_size: u32,
    max_items: u32,
}

impl WimpClient {
    pub fn new(config: WimpConfig, session: Session) -> ApiResult<Self> {
        let site = session.site();
        let base_url = config
            .base_url
            .as_deref()
            .unwrap_or_else(|| site.api_base_url());
        let transport = HttpTransport::new(base_url, config.timeout)?;
        tracing::debug!(base_url = %transport.base_url(), ?site, "api client ready");
        Ok(Self {
            transport,
            token: config.token.unwrap_or_else(|| site.api_token().to_string()),
            session,
            page_size: config.page_size.max(1),
            max_items: config.max_items.max(1),
        })
    }

    /// The logged-in user, for user-scoped collections.
    pub fn user(&self) -> ApiResult<User<'_>> {
        let creds = self
            .session
            .credentials()
            .ok_or(ApiError::Unauthenticated(AuthFailure::NoUser))?;
        Ok(User::new(self, creds.user_id.clone()))
    }

    fn credentials(&self) -> ApiResult<&Credentials> {
        self.session
            .credentials()
            .ok_or(ApiError::Unauthenticated(AuthFailure::NoSession))
    }

    fn get<T: DeserializeOwned>(&self, segments: &[&str], extra: &[(&str, String)]) -> ApiResult<T> {
        let creds = self.credentials()?;
        let mut query = vec![
            ("sessionId", creds.session_id.clone()),
            ("countryCode", creds.country_code.clone()),
        ];
        query.extend_from_slice(extra);
        self.transport.get(segments, &query)
    }

    fn page<W: DeserializeOwned>(
        &self,
        segments: &[&str],
        extra: &[(&str, String)],
        paging: PageRequest,
    ) -> ApiResult<Page<W>> {
        let mut query = extra.to_vec();
        query.push(("offset", paging.offset.to_string()));
        query.push(("limit", paging.limit.to_string()));
        let body: models::ItemsPage<W> = self.get(segments, &query)?;
        Ok(Page {
            items: body.items,
            total: body.total_number_of_items,
        })
    }

    /// Walk a paginated listing until the server's total or `max_items`.
    fn collect<W: DeserializeOwned>(
        &self,
        segments: &[&str],
        extra: &[(&str, String)],
    ) -> ApiResult<Vec<W>> {
        let mut paging = PageRequest::first_page(self.page_size.min(self.max_items));
        let cap = self.max_items as usize;
        let mut items = Vec::new();

        loop {
            let page = self.page::<W>(segments, extra, paging)?;
            let received = page.items.len();
            items.extend(page.items);

            let exhausted = match page.total {
                Some(total) => items.len() >= total as usize,
                None => received < paging.limit as usize,
            };
            if received == 0 || exhausted || items.len() >= cap {
                break;
            }
            paging = paging.after(received);
        }

        items.truncate(cap);
        Ok(items)
    }

    fn tracks(&self, segments: &[&str], extra: &[(&str, String)]) -> ApiResult<Vec<Track>> {
        let site = self.session.site();
        Ok(self
            .collect::<models::Track>(segments, extra)?
            .into_iter()
            .map(|t| map_track(t, site))
            .collect())
    }

    fn albums(&self, segments: &[&str], extra: &[(&str, String)]) -> ApiResult<Vec<Album>> {
        let site = self.session.site();
        Ok(self
            .collect::<models::Album>(segments, extra)?
            .into_iter()
            .map(|a| map_album(a, site))
            .collect())
    }

    fn artists(&self, segments: &[&str], extra: &[(&str, String)]) -> ApiResult<Vec<Artist>> {
        let site = self.session.site();
        Ok(self
            .collect::<models::Artist>(segments, extra)?
            .into_iter()
            .map(|a| map_artist(a, site))
            .collect())
    }

    fn playlists(&self, segments: &[&str], extra: &[(&str, String)]) -> ApiResult<Vec<Playlist>> {
        let site = self.session.site();
        Ok(self
            .collect::<models::Playlist>(segments, extra)?
            .into_iter()
            .map(|p| map_playlist(p, site))
            .collect())
    }

    fn categories(&self, root: &str) -> ApiResult<Vec<Category>> {
        let site = self.session.site();
        let categories: Vec<models::Category> = self.get(&[root], &[])?;
        Ok(categories
            .into_iter()
            .map(|c| map_category(c, site))
            .collect())
    }

    /// Listing of `kind` under `segments`, wrapped into catalog items.
    fn items_of_kind(&self, segments: &[&str], kind: ContentKind) -> ApiResult<Vec<CatalogItem>> {
        Ok(match kind {
            ContentKind::Playlists => self
                .playlists(segments, &[])?
                .into_iter()
                .map(CatalogItem::Playlist)
                .collect(),
            ContentKind::Albums => self
                .albums(segments, &[])?
                .into_iter()
                .map(CatalogItem::Album)
                .collect(),
            ContentKind::Tracks => self
                .tracks(segments, &[])?
                .into_iter()
                .map(CatalogItem::Track)
                .collect(),
        })
    }
}

impl CatalogService for WimpClient {
    fn session(&self) -> &Session {
        &self.session
    }

    fn login(&mut self, username: &str, password: &str) -> ApiResult<Session> {
        tracing::info!(username, "logging in");
        let reply: models::LoginResponse = self
            .transport
            .post_form(
                &["login", "username"],
                &[("token", self.token.clone())],
                &[("username", username), ("password", password)],
            )
            .map_err(|e| {
                tracing::warn!(error = %e, "login rejected");
                ApiError::LoginFailed {
                    message: e.to_string(),
                }
            })?;

        let session = self.session.with_credentials(Credentials {
            session_id: reply.session_id,
            country_code: reply.country_code,
            user_id: reply.user_id,
        });
        self.session = session.clone();
        tracing::info!(
            user_id = %session.credentials().map(|c| c.user_id.as_str()).unwrap_or_default(),
            "logged in"
        );
        Ok(session)
    }

    fn logout(&mut self) -> Session {
        self.session = self.session.logged_out();
        tracing::info!("logged out");
        self.session.clone()
    }

    fn album(&self, album_id: &AlbumId) -> ApiResult<Album> {
        let album: models::Album = self.get(&["albums", album_id.as_ref()], &[])?;
        Ok(map_album(album, self.session.site()))
    }

    fn album_tracks(&self, album_id: &AlbumId) -> ApiResult<Vec<Track>> {
        self.tracks(&["albums", album_id.as_ref(), "tracks"], &[])
    }

    fn artist(&self, artist_id: &ArtistId) -> ApiResult<Artist> {
        let artist: models::Artist = self.get(&["artists", artist_id.as_ref()], &[])?;
        Ok(map_artist(artist, self.session.site()))
    }

    fn artist_albums(&self, artist_id: &ArtistId) -> ApiResult<Vec<Album>> {
        self.albums(&["artists", artist_id.as_ref(), "albums"], &[])
    }

    fn artist_albums_ep_singles(&self, artist_id: &ArtistId) -> ApiResult<Vec<Album>> {
        self.albums(
            &["artists", artist_id.as_ref(), "albums"],
            &[("filter", FILTER_EP_SINGLES.to_string())],
        )
    }

    fn artist_albums_other(&self, artist_id: &ArtistId) -> ApiResult<Vec<Album>> {
        self.albums(
            &["artists", artist_id.as_ref(), "albums"],
            &[("filter", FILTER_OTHER.to_string())],
        )
    }

    fn artist_top_tracks(&self, artist_id: &ArtistId) -> ApiResult<Vec<Track>> {
        self.tracks(&["artists", artist_id.as_ref(), "toptracks"], &[])
    }

    fn artist_radio(&self, artist_id: &ArtistId) -> ApiResult<Vec<Track>> {
        self.tracks(&["artists", artist_id.as_ref(), "radio"], &[])
    }

    fn similar_artists(&self, artist_id: &ArtistId) -> ApiResult<Vec<Artist>> {
        self.artists(&["artists", artist_id.as_ref(), "similar"], &[])
    }

    fn playlist(&self, playlist_id: &PlaylistId) -> ApiResult<Playlist> {
        let playlist: models::Playlist = self.get(&["playlists", playlist_id.as_ref()], &[])?;
        Ok(map_playlist(playlist, self.session.site()))
    }

    fn playlist_tracks(&self, playlist_id: &PlaylistId) -> ApiResult<Vec<Track>> {
        self.tracks(&["playlists", playlist_id.as_ref(), "tracks"], &[])
    }

    fn user_playlists(&self) -> ApiResult<Vec<Playlist>> {
        self.user()?.playlists()
    }

    fn favorite_artists(&self) -> ApiResult<Vec<Artist>> {
        self.user()?.favorites().artists()
    }

    fn favorite_albums(&self) -> ApiResult<Vec<Album>> {
        self.user()?.favorites().albums()
    }

    fn favorite_tracks(&self) -> ApiResult<Vec<Track>> {
        self.user()?.favorites().tracks()
    }

    fn favorite_playlists(&self) -> ApiResult<Vec<Playlist>> {
        self.user()?.favorites().playlists()
    }

    fn genres(&self) -> ApiResult<Vec<Category>> {
        self.categories("genres")
    }

    fn genre_items(&self, genre_path: &str, kind: ContentKind) -> ApiResult<Vec<CatalogItem>> {
        self.items_of_kind(&["genres", genre_path, kind.as_str()], kind)
    }

    fn moods(&self) -> ApiResult<Vec<Category>> {
        self.categories("moods")
    }

    fn mood_playlists(&self, mood_path: &str) -> ApiResult<Vec<Playlist>> {
        self.playlists(&["moods", mood_path, "playlists"], &[])
    }

    fn featured(&self, group: FeaturedGroup, kind: ContentKind) -> ApiResult<Vec<CatalogItem>> {
        self.items_of_kind(&["featured", group.as_str(), kind.as_str()], kind)
    }

    fn search(&self, query: &str) -> ApiResult<SearchResult> {
        let site = self.session.site();
        let reply: models::SearchResponse = self.get(
            &["search"],
            &[
                ("query", query.to_string()),
                ("types", SEARCH_TYPES.to_string()),
                ("limit", SEARCH_LIMIT.to_string()),
            ],
        )?;

        fn items<W, T>(page: Option<models::ItemsPage<W>>, map: impl Fn(W) -> T) -> Vec<T> {
            page.map(|p| p.items.into_iter().map(map).collect())
                .unwrap_or_default()
        }

        Ok(SearchResult {
            artists: items(reply.artists, |a| map_artist(a, site)),
            albums: items(reply.albums, |a| map_album(a, site)),
            playlists: items(reply.playlists, |p| map_playlist(p, site)),
            tracks: items(reply.tracks, |t| map_track(t, site)),
        })
    }

    fn media_url(&self, track_id: &TrackId) -> ApiResult<MediaStream> {
        let requested = self.session.quality();
        let reply: models::StreamUrlResponse = self.get(
            &["tracks", track_id.as_ref(), "streamUrl"],
            &[("soundQuality", requested.as_api_str().to_string())],
        )?;
        let negotiated = reply
            .sound_quality
            .as_deref()
            .and_then(Quality::from_api_str)
            .unwrap_or(requested);
        if negotiated != requested {
            tracing::info!(?requested, ?negotiated, "server downgraded stream quality");
        }
        resolve_stream(&reply.url, negotiated)
    }
}
