use crate::host::{ContentType, DirectoryItem, Host, ResolvedItem};
use crate::listing::Listing;
use crate::router::{Params, RouteError, Router};
use crate::PluginError;
use wimp_core::models::{
    AlbumId, ArtistId, CatalogItem, ContentKind, FeaturedGroup, PlaylistId, Track, TrackId,
};
use wimp_core::{ApiError, CatalogService, SettingsStore};

/// Every page the plugin can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Root,
    MyMusic,
    Featured,
    FeaturedItems,
    Genres,
    Genre,
    GenreItems,
    Moods,
    Mood,
    Album,
    Artist,
    ArtistRadio,
    ArtistTopTracks,
    SimilarArtists,
    Playlist,
    UserPlaylists,
    FavouriteArtists,
    FavouriteAlbums,
    FavouriteTracks,
    FavouritePlaylists,
    Search,
    Login,
    Logout,
    Play,
    NotImplemented,
}

pub const ROUTES: &[(&str, View)] = &[
    ("/", View::Root),
    ("/my_music", View::MyMusic),
    ("/featured/<group>", View::Featured),
    ("/featured/<group>/<kind>", View::FeaturedItems),
    ("/genres", View::Genres),
    ("/genre/<genre_path>", View::Genre),
    ("/genre/<genre_path>/<kind>", View::GenreItems),
    ("/moods", View::Moods),
    ("/mood/<mood_path>", View::Mood),
    ("/album/<album_id>", View::Album),
    ("/artist/<artist_id>", View::Artist),
    ("/artist/<artist_id>/radio", View::ArtistRadio),
    ("/artist/<artist_id>/top", View::ArtistTopTracks),
    ("/artist/<artist_id>/similar", View::SimilarArtists),
    ("/playlist/<playlist_id>", View::Playlist),
    ("/user_playlists", View::UserPlaylists),
    ("/favourite_artists", View::FavouriteArtists),
    ("/favourite_albums", View::FavouriteAlbums),
    ("/favourite_tracks", View::FavouriteTracks),
    ("/favourite_playlists", View::FavouritePlaylists),
    ("/search", View::Search),
    ("/login", View::Login),
    ("/logout", View::Logout),
    ("/play/<track_id>", View::Play),
    ("/not_implemented", View::NotImplemented),
];

impl View {
    /// Every view except playback answers with a folder listing.
    pub fn is_listing(&self) -> bool {
        !matches!(self, View::Play)
    }
}

pub fn router(addon_id: &str) -> Result<Router<View>, RouteError> {
    let mut router = Router::new(addon_id);
    for (pattern, view) in ROUTES {
        router.register(pattern, *view)?;
    }
    Ok(router)
}

fn kind_label(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Playlists => "Playlists",
        ContentKind::Albums => "Albums",
        ContentKind::Tracks => "Tracks",
    }
}

fn group_label(group: FeaturedGroup) -> &'static str {
    match group {
        FeaturedGroup::New => "New",
        FeaturedGroup::Top => "Top",
        FeaturedGroup::Recommended => "Recommended",
    }
}

fn kind_content(kind: ContentKind) -> Option<ContentType> {
    match kind {
        ContentKind::Playlists => None,
        ContentKind::Albums => Some(ContentType::Albums),
        ContentKind::Tracks => Some(ContentType::Songs),
    }
}

fn parse_param<T>(
    params: &Params,
    name: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, PluginError> {
    let value = params.require(name)?;
    parse(value).ok_or_else(|| PluginError::InvalidParameter {
        name: name.to_string(),
        value: value.to_string(),
    })
}

/// One invocation's worth of borrowed plugin state.
pub(crate) struct Views<'a, C, S, H> {
    pub router: &'a Router<View>,
    pub catalog: &'a mut C,
    pub settings: &'a mut S,
    pub host: &'a mut H,
}

impl<C: CatalogService, S: SettingsStore, H: Host> Views<'_, C, S, H> {
    /// Runs the handler for `view`. A listing view that fails still closes
    /// its directory, marked unsuccessful.
    pub fn handle(&mut self, view: View, params: &Params) -> Result<(), PluginError> {
        tracing::debug!(?view, "handling view");
        let result = self.render(view, params);
        if result.is_err() && view.is_listing() {
            self.host.end_of_directory(false);
        }
        result
    }

    fn render(&mut self, view: View, params: &Params) -> Result<(), PluginError> {
        match view {
            View::Root => self.root(),
            View::MyMusic => self.my_music(),
            View::Featured => self.featured(parse_param(params, "group", FeaturedGroup::parse)?),
            View::FeaturedItems => {
                let group = parse_param(params, "group", FeaturedGroup::parse)?;
                let kind = parse_param(params, "kind", ContentKind::parse)?;
                let items = self.catalog.featured(group, kind)?;
                self.show_items(kind_content(kind), &items)
            }
            View::Genres => {
                let genres = self.catalog.genres()?;
                let rows = self.listing().categories(&genres, View::Genre, "genre_path")?;
                self.show(None, rows);
                Ok(())
            }
            View::Genre => self.genre(params.require("genre_path")?),
            View::GenreItems => {
                let kind = parse_param(params, "kind", ContentKind::parse)?;
                let items = self
                    .catalog
                    .genre_items(params.require("genre_path")?, kind)?;
                self.show_items(kind_content(kind), &items)
            }
            View::Moods => {
                let moods = self.catalog.moods()?;
                let rows = self.listing().categories(&moods, View::Mood, "mood_path")?;
                self.show(None, rows);
                Ok(())
            }
            View::Mood => {
                let playlists = self.catalog.mood_playlists(params.require("mood_path")?)?;
                let rows = self.listing().playlists(&playlists)?;
                self.show(None, rows);
                Ok(())
            }
            View::Album => {
                let tracks = self
                    .catalog
                    .album_tracks(&AlbumId::new(params.require("album_id")?))?;
                self.show_tracks(&tracks)
            }
            View::Artist => self.artist(ArtistId::new(params.require("artist_id")?)),
            View::ArtistRadio => {
                let tracks = self
                    .catalog
                    .artist_radio(&ArtistId::new(params.require("artist_id")?))?;
                self.show_tracks(&tracks)
            }
            View::ArtistTopTracks => {
                let tracks = self
                    .catalog
                    .artist_top_tracks(&ArtistId::new(params.require("artist_id")?))?;
                self.show_tracks(&tracks)
            }
            View::SimilarArtists => {
                let artists = self
                    .catalog
                    .similar_artists(&ArtistId::new(params.require("artist_id")?))?;
                let rows = self.listing().artists(&artists)?;
                self.show(Some(ContentType::Artists), rows);
                Ok(())
            }
            View::Playlist => {
                let tracks = self
                    .catalog
                    .playlist_tracks(&PlaylistId::new(params.require("playlist_id")?))?;
                self.show_tracks(&tracks)
            }
            View::UserPlaylists => {
                let playlists = self.catalog.user_playlists()?;
                let rows = self.listing().playlists(&playlists)?;
                self.show(None, rows);
                Ok(())
            }
            View::FavouriteArtists => {
                let artists = self.catalog.favorite_artists()?;
                let rows = self.listing().artists(&artists)?;
                self.show(Some(ContentType::Artists), rows);
                Ok(())
            }
            View::FavouriteAlbums => {
                let albums = self.catalog.favorite_albums()?;
                let rows = self.listing().albums(&albums)?;
                self.show(Some(ContentType::Albums), rows);
                Ok(())
            }
            View::FavouriteTracks => {
                let tracks = self.catalog.favorite_tracks()?;
                self.show_tracks(&tracks)
            }
            View::FavouritePlaylists => {
                let playlists = self.catalog.favorite_playlists()?;
                let rows = self.listing().playlists(&playlists)?;
                self.show(None, rows);
                Ok(())
            }
            View::Search => self.search(params.get("query")),
            View::Login => self.login(),
            View::Logout => self.logout(),
            View::Play => self.play(TrackId::new(params.require("track_id")?)),
            View::NotImplemented => Err(PluginError::NotImplemented),
        }
    }

    fn listing(&self) -> Listing<'_> {
        Listing::new(self.router, self.catalog.session().quality())
    }

    fn folder(&self, label: &str, view: View, params: Params) -> Result<DirectoryItem, RouteError> {
        Ok(DirectoryItem::folder(
            self.router.reverse(&view, &params)?,
            label,
        ))
    }

    fn show(&mut self, content: Option<ContentType>, rows: Vec<DirectoryItem>) {
        if let Some(content) = content {
            self.host.set_content(content);
        }
        self.host.add_directory_items(rows);
        self.host.end_of_directory(true);
    }

    fn show_tracks(&mut self, tracks: &[Track]) -> Result<(), PluginError> {
        let rows = self.listing().tracks(tracks)?;
        self.show(Some(ContentType::Songs), rows);
        Ok(())
    }

    fn show_items(
        &mut self,
        content: Option<ContentType>,
        items: &[CatalogItem],
    ) -> Result<(), PluginError> {
        let rows = self.listing().items(items)?;
        self.show(content, rows);
        Ok(())
    }

    fn root(&mut self) -> Result<(), PluginError> {
        let mut rows = vec![self.folder("My Music", View::MyMusic, Params::new())?];
        for group in FeaturedGroup::ALL {
            rows.push(self.folder(
                group_label(group),
                View::Featured,
                Params::new().with("group", group.as_str()),
            )?);
        }
        rows.push(self.folder("Genres", View::Genres, Params::new())?);
        rows.push(self.folder("Moods", View::Moods, Params::new())?);
        rows.push(self.folder("Search", View::Search, Params::new())?);
        rows.push(if self.catalog.session().is_authenticated() {
            self.folder("Logout", View::Logout, Params::new())?
        } else {
            self.folder("Login", View::Login, Params::new())?
        });
        self.show(None, rows);
        Ok(())
    }

    fn my_music(&mut self) -> Result<(), PluginError> {
        let rows = vec![
            self.folder("Playlists", View::UserPlaylists, Params::new())?,
            self.folder("Favourite Artists", View::FavouriteArtists, Params::new())?,
            self.folder("Favourite Albums", View::FavouriteAlbums, Params::new())?,
            self.folder("Favourite Tracks", View::FavouriteTracks, Params::new())?,
            self.folder("Favourite Playlists", View::FavouritePlaylists, Params::new())?,
        ];
        self.show(None, rows);
        Ok(())
    }

    fn featured(&mut self, group: FeaturedGroup) -> Result<(), PluginError> {
        let rows = ContentKind::ALL
            .into_iter()
            .map(|kind| {
                self.folder(
                    kind_label(kind),
                    View::FeaturedItems,
                    Params::new()
                        .with("group", group.as_str())
                        .with("kind", kind.as_str()),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.show(None, rows);
        Ok(())
    }

    /// Sub-listings the genre offers; all of them when the genre is unknown.
    fn genre(&mut self, genre_path: &str) -> Result<(), PluginError> {
        let genres = self.catalog.genres()?;
        let kinds: Vec<ContentKind> = match genres.iter().find(|g| g.path == genre_path) {
            Some(genre) => ContentKind::ALL
                .into_iter()
                .filter(|kind| genre.has(*kind))
                .collect(),
            None => {
                tracing::warn!(genre_path, "genre not in catalog, offering every kind");
                ContentKind::ALL.to_vec()
            }
        };

        let rows = kinds
            .into_iter()
            .map(|kind| {
                self.folder(
                    kind_label(kind),
                    View::GenreItems,
                    Params::new()
                        .with("genre_path", genre_path)
                        .with("kind", kind.as_str()),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.show(None, rows);
        Ok(())
    }

    fn artist(&mut self, artist_id: ArtistId) -> Result<(), PluginError> {
        let by_artist = Params::new().with("artist_id", artist_id.as_ref());
        let mut rows = vec![
            self.folder("Top Tracks", View::ArtistTopTracks, by_artist.clone())?,
            self.folder("Artist Radio", View::ArtistRadio, by_artist.clone())?,
            self.folder("Similar Artists", View::SimilarArtists, by_artist)?,
        ];
        let albums = self.catalog.artist_albums_all(&artist_id)?;
        rows.extend(self.listing().albums(&albums)?);
        self.show(Some(ContentType::Albums), rows);
        Ok(())
    }

    /// Searches for `query` when the URL carries one, asks the user otherwise.
    fn search(&mut self, query: Option<&str>) -> Result<(), PluginError> {
        let query = match query.filter(|q| !q.trim().is_empty()) {
            Some(query) => query.to_string(),
            None => match self.host.input("Search", false) {
                Some(query) if !query.trim().is_empty() => query,
                _ => {
                    tracing::debug!("search cancelled");
                    self.host.end_of_directory(false);
                    return Ok(());
                }
            },
        };
        let result = self.catalog.search(query.trim())?;
        let items: Vec<CatalogItem> = result.into();
        self.show_items(None, &items)
    }

    /// A rejected login leaves both the session and the settings untouched.
    /// On success the root menu is shown again, now offering Logout.
    fn login(&mut self) -> Result<(), PluginError> {
        let Some(username) = self.host.input("Username", false).filter(|u| !u.is_empty()) else {
            self.host.end_of_directory(false);
            return Ok(());
        };
        let Some(password) = self.host.input("Password", true).filter(|p| !p.is_empty()) else {
            self.host.end_of_directory(false);
            return Ok(());
        };

        match self.catalog.login(&username, &password) {
            Ok(session) => {
                session.write_credentials(&mut *self.settings)?;
                self.root()
            }
            Err(ApiError::LoginFailed { message }) => {
                tracing::warn!(%message, "login failed, keeping previous session");
                self.host.end_of_directory(false);
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn logout(&mut self) -> Result<(), PluginError> {
        let session = self.catalog.logout();
        session.write_credentials(&mut *self.settings)?;
        self.root()
    }

    fn play(&mut self, track_id: TrackId) -> Result<(), PluginError> {
        let stream = self.catalog.media_url(&track_id)?;
        tracing::info!(track = %track_id, protocol = ?stream.protocol, "resolved stream");
        self.host.set_resolved_url(ResolvedItem {
            mime_type: stream.mime_type().to_string(),
            url: stream.url,
        });
        Ok(())
    }
}
