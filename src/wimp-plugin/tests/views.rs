use std::cell::RefCell;
use std::collections::VecDeque;
use wimp_core::models::{
    Album, AlbumId, AlbumRef, Artist, ArtistId, ArtistRef, CatalogItem, Category, ContentKind,
    FeaturedGroup, MediaStream, Playlist, PlaylistId, SearchResult, StreamProtocol, Track, TrackId,
};
use wimp_core::session::{KEY_COUNTRY_CODE, KEY_SESSION_ID, KEY_USER_ID};
use wimp_core::{
    ApiError, ApiResult, AuthFailure, CatalogService, Credentials, FileSettings, MemorySettings,
    Quality, Session, SettingsStore, Site,
};
use wimp_plugin::{
    views, ContentType, DirectoryItem, Host, Params, Plugin, PluginError, ResolvedItem,
    RouteError, View,
};

const ADDON: &str = "plugin.audio.wimp";

fn url(path: &str) -> String {
    format!("plugin://{ADDON}{path}")
}

fn credentials() -> Credentials {
    Credentials {
        session_id: "sess-1".into(),
        country_code: "NO".into(),
        user_id: "7".into(),
    }
}

fn track(id: &str, available: bool) -> Track {
    Track {
        id: TrackId::new(id),
        name: format!("Track {id}"),
        track_num: id.parse().unwrap_or(1),
        disc_num: 1,
        duration: Some(200),
        artist: ArtistRef {
            id: ArtistId::new("1"),
            name: "Band".into(),
        },
        album: AlbumRef {
            id: AlbumId::new("5"),
            name: "Record".into(),
            image: None,
        },
        available,
    }
}

fn album(id: &str, name: &str, num_tracks: u32) -> Album {
    Album {
        id: AlbumId::new(id),
        name: name.into(),
        image: None,
        artist: ArtistRef {
            id: ArtistId::new("1"),
            name: "Band".into(),
        },
        num_tracks: Some(num_tracks),
        duration: None,
        release_date: None,
    }
}

fn artist(id: &str, name: &str) -> Artist {
    Artist {
        id: ArtistId::new(id),
        name: name.into(),
        image: None,
    }
}

fn playlist(id: &str, name: &str) -> Playlist {
    Playlist {
        id: PlaylistId::new(id),
        name: name.into(),
        description: None,
        num_tracks: Some(4),
        duration: None,
        image: None,
    }
}

fn category(name: &str, path: &str) -> Category {
    Category {
        name: name.into(),
        path: path.into(),
        image: None,
        has_playlists: true,
        has_albums: false,
        has_tracks: false,
    }
}

/// Behaves like the HTTP client as far as identity goes.
struct FakeCatalog {
    session: Session,
    tracks: Vec<Track>,
    main_albums: Vec<Album>,
    ep_singles: Vec<Album>,
    other_albums: Vec<Album>,
    search: SearchResult,
    stream_url: String,
    broken: bool,
    queries: RefCell<Vec<String>>,
}

impl FakeCatalog {
    fn new(session: Session) -> Self {
        Self {
            session,
            tracks: Vec::new(),
            main_albums: Vec::new(),
            ep_singles: Vec::new(),
            other_albums: Vec::new(),
            search: SearchResult::default(),
            stream_url: "https://cdn.example/track.flac".into(),
            broken: false,
            queries: RefCell::default(),
        }
    }

    fn guard(&self) -> ApiResult<()> {
        if self.broken {
            return Err(ApiError::Http {
                status: 500,
                endpoint: "albums".into(),
            });
        }
        match self.session.credentials() {
            Some(_) => Ok(()),
            None => Err(ApiError::Unauthenticated(AuthFailure::NoSession)),
        }
    }

    fn user_guard(&self) -> ApiResult<()> {
        match self.session.credentials() {
            Some(_) => Ok(()),
            None => Err(ApiError::Unauthenticated(AuthFailure::NoUser)),
        }
    }
}

impl CatalogService for FakeCatalog {
    fn session(&self) -> &Session {
        &self.session
    }

    fn login(&mut self, username: &str, password: &str) -> ApiResult<Session> {
        if username == "validuser" && password == "validpass" {
            self.session = self.session.with_credentials(Credentials {
                session_id: "fresh".into(),
                country_code: "SE".into(),
                user_id: "99".into(),
            });
            Ok(self.session.clone())
        } else {
            Err(ApiError::LoginFailed {
                message: "invalid credentials".into(),
            })
        }
    }

    fn logout(&mut self) -> Session {
        self.session = self.session.logged_out();
        self.session.clone()
    }

    fn album(&self, album_id: &AlbumId) -> ApiResult<Album> {
        self.guard()?;
        Ok(album(album_id.as_ref(), "Record", self.tracks.len() as u32))
    }

    fn album_tracks(&self, _album_id: &AlbumId) -> ApiResult<Vec<Track>> {
        self.guard()?;
        Ok(self.tracks.clone())
    }

    fn artist(&self, artist_id: &ArtistId) -> ApiResult<Artist> {
        self.guard()?;
        Ok(Artist {
            id: artist_id.clone(),
            name: "Band".into(),
            image: None,
        })
    }

    fn artist_albums(&self, _artist_id: &ArtistId) -> ApiResult<Vec<Album>> {
        self.guard()?;
        Ok(self.main_albums.clone())
    }

    fn artist_albums_ep_singles(&self, _artist_id: &ArtistId) -> ApiResult<Vec<Album>> {
        self.guard()?;
        Ok(self.ep_singles.clone())
    }

    fn artist_albums_other(&self, _artist_id: &ArtistId) -> ApiResult<Vec<Album>> {
        self.guard()?;
        Ok(self.other_albums.clone())
    }

    fn artist_top_tracks(&self, _artist_id: &ArtistId) -> ApiResult<Vec<Track>> {
        self.guard()?;
        Ok(self.tracks.clone())
    }

    fn artist_radio(&self, _artist_id: &ArtistId) -> ApiResult<Vec<Track>> {
        self.guard()?;
        Ok(self.tracks.clone())
    }

    fn similar_artists(&self, _artist_id: &ArtistId) -> ApiResult<Vec<Artist>> {
        self.guard()?;
        Ok(vec![artist("2", "Other Band")])
    }

    fn playlist(&self, playlist_id: &PlaylistId) -> ApiResult<Playlist> {
        self.guard()?;
        Ok(Playlist {
            id: playlist_id.clone(),
            name: "Mix".into(),
            description: None,
            num_tracks: None,
            duration: None,
            image: None,
        })
    }

    fn playlist_tracks(&self, _playlist_id: &PlaylistId) -> ApiResult<Vec<Track>> {
        self.guard()?;
        Ok(self.tracks.clone())
    }

    fn user_playlists(&self) -> ApiResult<Vec<Playlist>> {
        self.user_guard()?;
        Ok(vec![playlist("p-1", "Mine")])
    }

    fn favorite_artists(&self) -> ApiResult<Vec<Artist>> {
        self.user_guard()?;
        Ok(vec![artist("1", "Band")])
    }

    fn favorite_albums(&self) -> ApiResult<Vec<Album>> {
        self.user_guard()?;
        Ok(vec![album("5", "Record", 3)])
    }

    fn favorite_tracks(&self) -> ApiResult<Vec<Track>> {
        self.user_guard()?;
        Ok(self.tracks.clone())
    }

    fn favorite_playlists(&self) -> ApiResult<Vec<Playlist>> {
        self.user_guard()?;
        Ok(vec![playlist("p-2", "Liked")])
    }

    fn genres(&self) -> ApiResult<Vec<Category>> {
        self.guard()?;
        Ok(vec![Category {
            name: "Jazz".into(),
            path: "jazz".into(),
            image: None,
            has_playlists: true,
            has_albums: true,
            has_tracks: false,
        }])
    }

    fn genre_items(&self, _genre_path: &str, _kind: ContentKind) -> ApiResult<Vec<CatalogItem>> {
        self.guard()?;
        Ok(Vec::new())
    }

    fn moods(&self) -> ApiResult<Vec<Category>> {
        self.guard()?;
        Ok(vec![category("Chill", "chill"), category("Party Time", "party time")])
    }

    fn mood_playlists(&self, mood_path: &str) -> ApiResult<Vec<Playlist>> {
        self.guard()?;
        Ok(vec![playlist("p-3", &format!("{mood_path} mix"))])
    }

    fn featured(&self, _group: FeaturedGroup, kind: ContentKind) -> ApiResult<Vec<CatalogItem>> {
        self.guard()?;
        Ok(match kind {
            ContentKind::Tracks => self.tracks.iter().cloned().map(CatalogItem::Track).collect(),
            _ => Vec::new(),
        })
    }

    fn search(&self, query: &str) -> ApiResult<SearchResult> {
        self.guard()?;
        self.queries.borrow_mut().push(query.to_string());
        Ok(self.search.clone())
    }

    fn media_url(&self, _track_id: &TrackId) -> ApiResult<MediaStream> {
        self.guard()?;
        Ok(MediaStream {
            url: self.stream_url.clone(),
            protocol: StreamProtocol::Http,
            quality: self.session.quality(),
        })
    }
}

#[derive(Default)]
struct RecordingHost {
    content: Vec<ContentType>,
    items: Vec<DirectoryItem>,
    ended: Vec<bool>,
    resolved: Vec<ResolvedItem>,
    inputs: VecDeque<Option<String>>,
    prompts: Vec<(String, bool)>,
    notifications: Vec<String>,
}

impl RecordingHost {
    fn answering(answers: &[Option<&str>]) -> Self {
        Self {
            inputs: answers.iter().map(|a| a.map(str::to_string)).collect(),
            ..Self::default()
        }
    }

    fn labels(&self) -> Vec<&str> {
        self.items.iter().map(|i| i.label.as_str()).collect()
    }
}

impl Host for RecordingHost {
    fn set_content(&mut self, content: ContentType) {
        self.content.push(content);
    }

    fn add_directory_items(&mut self, items: Vec<DirectoryItem>) {
        self.items.extend(items);
    }

    fn end_of_directory(&mut self, succeeded: bool) {
        self.ended.push(succeeded);
    }

    fn set_resolved_url(&mut self, item: ResolvedItem) {
        self.resolved.push(item);
    }

    fn input(&mut self, heading: &str, hidden: bool) -> Option<String> {
        self.prompts.push((heading.to_string(), hidden));
        self.inputs.pop_front().flatten()
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }
}

fn logged_in(quality: Quality) -> Session {
    Session::authenticated(Site::Wimp, quality, credentials())
}

fn plugin(
    catalog: FakeCatalog,
    host: RecordingHost,
) -> Plugin<FakeCatalog, MemorySettings, RecordingHost> {
    Plugin::new(ADDON, catalog, MemorySettings::default(), host).unwrap()
}

#[test]
fn unavailable_tracks_are_dropped_but_still_counted() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::High));
    catalog.tracks = vec![track("1", true), track("2", false), track("3", true)];
    catalog.main_albums = vec![album("5", "Record", 3)];

    let mut plugin = plugin(catalog, RecordingHost::default());
    plugin.run(&url("/album/5")).unwrap();
    {
        let host = plugin.host();
        assert_eq!(host.items.len(), 2);
        assert!(host.items.iter().all(|i| i.info.playable && !i.is_folder));
        assert_eq!(
            host.items[1].url,
            "plugin://plugin.audio.wimp/play/3".to_string()
        );
        assert_eq!(host.content, vec![ContentType::Songs]);
        assert_eq!(host.ended, vec![true]);
    }

    let (catalog, settings, _) = plugin.into_parts();
    let mut plugin = Plugin::new(ADDON, catalog, settings, RecordingHost::default()).unwrap();
    plugin.run(&url("/artist/1")).unwrap();
    let album_row = plugin
        .host()
        .items
        .iter()
        .find(|i| i.url.ends_with("/album/5"))
        .unwrap();
    assert_eq!(album_row.info.track_count, Some(3));
}

#[test]
fn artist_page_lists_folders_then_albums_in_category_order() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::High));
    catalog.main_albums = vec![album("10", "First", 9), album("11", "Second", 11)];
    catalog.ep_singles = vec![album("20", "Single", 2)];
    catalog.other_albums = vec![album("30", "Best Of", 20)];

    let mut plugin = plugin(catalog, RecordingHost::default());
    plugin.run(&url("/artist/1")).unwrap();

    let host = plugin.host();
    assert_eq!(
        host.labels(),
        vec![
            "Top Tracks",
            "Artist Radio",
            "Similar Artists",
            "Band - First",
            "Band - Second",
            "Band - Single",
            "Band - Best Of",
        ]
    );
    assert_eq!(host.items[0].url, url("/artist/1/top"));
    assert_eq!(host.items[1].url, url("/artist/1/radio"));
    assert_eq!(host.content, vec![ContentType::Albums]);
}

#[test]
fn every_listing_link_routes_back_into_the_plugin() {
    let mut plugin = plugin(
        FakeCatalog::new(logged_in(Quality::High)),
        RecordingHost::default(),
    );
    plugin.run(&url("/")).unwrap();
    let links: Vec<String> = plugin.host().items.iter().map(|i| i.url.clone()).collect();
    assert_eq!(links.len(), 8);
    for link in &links {
        plugin.router().resolve(link).unwrap();
    }
    assert_eq!(plugin.host().labels().last(), Some(&"Logout"));
}

#[test]
fn anonymous_root_offers_login() {
    let mut plugin = plugin(
        FakeCatalog::new(Session::anonymous(Site::Wimp, Quality::High)),
        RecordingHost::default(),
    );
    plugin.run("plugin://plugin.audio.wimp/").unwrap();
    let last = plugin.host().items.last().unwrap();
    assert_eq!(last.label, "Login");
    assert_eq!(last.url, url("/login"));
}

#[test]
fn successful_login_persists_credentials() {
    let host = RecordingHost::answering(&[Some("validuser"), Some("validpass")]);
    let mut plugin = plugin(
        FakeCatalog::new(Session::anonymous(Site::Wimp, Quality::High)),
        host,
    );
    plugin.run(&url("/login")).unwrap();

    assert_eq!(
        plugin.host().prompts,
        vec![("Username".to_string(), false), ("Password".to_string(), true)]
    );
    let settings = plugin.settings();
    assert_eq!(settings.get(KEY_SESSION_ID).as_deref(), Some("fresh"));
    assert_eq!(settings.get(KEY_COUNTRY_CODE).as_deref(), Some("SE"));
    assert_eq!(settings.get(KEY_USER_ID).as_deref(), Some("99"));

    let host = plugin.host();
    assert_eq!(host.labels().last(), Some(&"Logout"));
    assert_eq!(host.ended, vec![true]);
}

#[test]
fn failed_login_leaves_session_and_settings_alone() {
    let before = MemorySettings::from_pairs([
        (KEY_SESSION_ID, "sess-1"),
        (KEY_COUNTRY_CODE, "NO"),
        (KEY_USER_ID, "7"),
    ]);
    let host = RecordingHost::answering(&[Some("validuser"), Some("wrong")]);
    let mut plugin = Plugin::new(
        ADDON,
        FakeCatalog::new(logged_in(Quality::High)),
        before.clone(),
        host,
    )
    .unwrap();

    plugin.run(&url("/login")).unwrap();

    assert_eq!(plugin.settings(), &before);
    assert_eq!(plugin.catalog().session(), &logged_in(Quality::High));
    assert!(plugin.host().notifications.is_empty());
    assert!(plugin.host().items.is_empty());
    assert_eq!(plugin.host().ended, vec![false]);
}

#[test]
fn cancelled_login_asks_only_once() {
    let host = RecordingHost::answering(&[None]);
    let mut plugin = plugin(
        FakeCatalog::new(Session::anonymous(Site::Wimp, Quality::High)),
        host,
    );
    plugin.run(&url("/login")).unwrap();
    assert_eq!(plugin.host().prompts.len(), 1);
    assert_eq!(plugin.settings().get(KEY_SESSION_ID), None);
    assert_eq!(plugin.host().ended, vec![false]);
}

#[test]
fn logout_clears_persisted_identity_and_later_calls_notify() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    let mut settings = FileSettings::open(&path).unwrap();
    logged_in(Quality::High).write_credentials(&mut settings).unwrap();

    let mut plugin = Plugin::new(
        ADDON,
        FakeCatalog::new(logged_in(Quality::High)),
        settings,
        RecordingHost::default(),
    )
    .unwrap();
    plugin.run(&url("/logout")).unwrap();
    assert!(!plugin.catalog().session().is_authenticated());
    assert_eq!(plugin.host().labels().last(), Some(&"Login"));
    let menu_rows = plugin.host().items.len();

    let reopened = FileSettings::open(&path).unwrap();
    assert_eq!(reopened.get(KEY_SESSION_ID).as_deref(), Some(""));
    assert_eq!(reopened.get(KEY_USER_ID).as_deref(), Some(""));
    assert!(!Session::from_settings(&reopened).is_authenticated());

    plugin.run(&url("/favourite_tracks")).unwrap();
    plugin.run(&url("/album/5")).unwrap();
    let host = plugin.host();
    assert_eq!(host.notifications.len(), 2);
    assert_eq!(host.items.len(), menu_rows);
    assert_eq!(host.ended, vec![true, false, false]);
}

#[test]
fn play_resolves_stream_with_quality_mime_type() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::Lossless));
    catalog.stream_url = "rtmp://streamhost.example app=app1 playpath=path/to/track".into();
    let mut plugin = plugin(catalog, RecordingHost::default());

    plugin.run(&url("/play/42")).unwrap();
    assert_eq!(
        plugin.host().resolved,
        vec![ResolvedItem {
            url: "rtmp://streamhost.example app=app1 playpath=path/to/track".into(),
            mime_type: "audio/flac".into(),
        }]
    );
}

#[test]
fn search_lists_all_four_entity_types() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::High));
    catalog.search = SearchResult {
        artists: vec![Artist {
            id: ArtistId::new("1"),
            name: "Band".into(),
            image: None,
        }],
        albums: vec![album("5", "Record", 3)],
        playlists: vec![Playlist {
            id: PlaylistId::new("p-1"),
            name: "Mix".into(),
            description: None,
            num_tracks: Some(4),
            duration: None,
            image: None,
        }],
        tracks: vec![track("8", true)],
    };
    let host = RecordingHost::answering(&[Some("band")]);
    let mut plugin = plugin(catalog, host);

    plugin.run(&url("/search")).unwrap();
    let urls: Vec<_> = plugin.host().items.iter().map(|i| i.url.clone()).collect();
    assert_eq!(
        urls,
        vec![
            url("/artist/1"),
            url("/album/5"),
            url("/playlist/p-1"),
            url("/play/8"),
        ]
    );
}

#[test]
fn cancelled_search_shows_nothing() {
    let mut plugin = plugin(
        FakeCatalog::new(logged_in(Quality::High)),
        RecordingHost::answering(&[Some("   ")]),
    );
    plugin.run(&url("/search")).unwrap();
    let host = plugin.host();
    assert!(host.items.is_empty());
    assert_eq!(host.ended, vec![false]);
    assert!(plugin.catalog().queries.borrow().is_empty());
}

#[test]
fn genre_offers_only_its_kinds() {
    let mut plugin = plugin(
        FakeCatalog::new(logged_in(Quality::High)),
        RecordingHost::default(),
    );
    plugin.run(&url("/genre/jazz")).unwrap();
    assert_eq!(plugin.host().labels(), vec!["Playlists", "Albums"]);
    assert_eq!(plugin.host().items[1].url, url("/genre/jazz/albums"));
}

#[test]
fn featured_tracks_are_songs() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::High));
    catalog.tracks = vec![track("1", true), track("2", false)];
    let mut plugin = plugin(catalog, RecordingHost::default());

    plugin.run(&url("/featured/new/tracks")).unwrap();
    assert_eq!(plugin.host().content, vec![ContentType::Songs]);
    assert_eq!(plugin.host().items.len(), 1);

    let err = plugin.run(&url("/featured/old/tracks")).unwrap_err();
    assert!(matches!(err, PluginError::InvalidParameter { .. }));
}

#[test]
fn other_failures_propagate() {
    let mut plugin = plugin(
        FakeCatalog::new(logged_in(Quality::High)),
        RecordingHost::default(),
    );

    let err = plugin.run(&url("/not_implemented")).unwrap_err();
    assert!(matches!(err, PluginError::NotImplemented));

    let err = plugin.run(&url("/no/such/page")).unwrap_err();
    assert!(matches!(err, PluginError::Route(RouteError::NotFound(_))));

    let (mut catalog, settings, host) = plugin.into_parts();
    catalog.broken = true;
    let mut plugin = Plugin::new(ADDON, catalog, settings, host).unwrap();
    let err = plugin.run(&url("/album/5")).unwrap_err();
    assert!(matches!(
        err,
        PluginError::Api(ApiError::Http { status: 500, .. })
    ));
    assert!(plugin.host().notifications.is_empty());
}

fn visit(catalog: FakeCatalog, link: &str) -> (FakeCatalog, RecordingHost) {
    let mut plugin = plugin(catalog, RecordingHost::default());
    plugin.run(link).unwrap();
    let (catalog, _, host) = plugin.into_parts();
    (catalog, host)
}

#[test]
fn my_music_opens_each_user_listing() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::High));
    catalog.tracks = vec![track("1", true)];

    let (mut catalog, menu) = visit(catalog, &url("/my_music"));
    assert_eq!(menu.ended, vec![true]);

    let expected = [
        ("Playlists", "/user_playlists", None, "Mine"),
        ("Favourite Artists", "/favourite_artists", Some(ContentType::Artists), "Band"),
        ("Favourite Albums", "/favourite_albums", Some(ContentType::Albums), "Band - Record"),
        ("Favourite Tracks", "/favourite_tracks", Some(ContentType::Songs), "Track 1"),
        ("Favourite Playlists", "/favourite_playlists", None, "Liked"),
    ];
    assert_eq!(menu.items.len(), expected.len());
    for (row, (label, path, content, first)) in menu.items.iter().zip(expected) {
        assert_eq!(row.label, label);
        assert_eq!(row.url, url(path));
        assert!(row.is_folder);

        let (next, host) = visit(catalog, &row.url);
        catalog = next;
        assert_eq!(host.content, content.into_iter().collect::<Vec<_>>(), "{path}");
        assert_eq!(host.labels(), vec![first], "{path}");
        assert_eq!(host.ended, vec![true], "{path}");
    }
}

#[test]
fn artist_folders_open_radio_top_tracks_and_similar_artists() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::High));
    catalog.tracks = vec![track("1", true), track("2", false)];

    let (catalog, radio) = visit(catalog, &url("/artist/1/radio"));
    assert_eq!(radio.content, vec![ContentType::Songs]);
    assert_eq!(radio.labels(), vec!["Track 1"]);

    let (catalog, top) = visit(catalog, &url("/artist/1/top"));
    assert_eq!(top.content, vec![ContentType::Songs]);
    assert_eq!(top.items[0].url, url("/play/1"));

    let (_, similar) = visit(catalog, &url("/artist/1/similar"));
    assert_eq!(similar.content, vec![ContentType::Artists]);
    assert_eq!(similar.labels(), vec!["Other Band"]);
    assert_eq!(similar.items[0].url, url("/artist/2"));
}

#[test]
fn featured_group_offers_every_kind() {
    let (_, host) = visit(
        FakeCatalog::new(logged_in(Quality::High)),
        &url("/featured/top"),
    );
    assert_eq!(host.labels(), vec!["Playlists", "Albums", "Tracks"]);
    assert_eq!(
        host.items.iter().map(|i| i.url.clone()).collect::<Vec<_>>(),
        vec![
            url("/featured/top/playlists"),
            url("/featured/top/albums"),
            url("/featured/top/tracks"),
        ]
    );
    assert_eq!(host.ended, vec![true]);
}

#[test]
fn genres_and_moods_link_to_their_pages() {
    let catalog = FakeCatalog::new(logged_in(Quality::High));

    let (catalog, genres) = visit(catalog, &url("/genres"));
    assert_eq!(genres.labels(), vec!["Jazz"]);
    assert_eq!(genres.items[0].url, url("/genre/jazz"));

    let (catalog, moods) = visit(catalog, &url("/moods"));
    assert_eq!(moods.labels(), vec!["Chill", "Party Time"]);
    assert_eq!(moods.items[1].url, url("/mood/party%20time"));

    let (_, mood) = visit(catalog, &moods.items[1].url);
    assert_eq!(mood.labels(), vec!["party time mix"]);
    assert_eq!(mood.items[0].url, url("/playlist/p-3"));
}

#[test]
fn search_link_with_query_skips_the_prompt() {
    let mut catalog = FakeCatalog::new(logged_in(Quality::High));
    catalog.search = SearchResult {
        artists: vec![artist("1", "Band")],
        ..SearchResult::default()
    };
    let router = views::router(ADDON).unwrap();
    let link = router
        .reverse(&View::Search, &Params::new().with("query", "the band"))
        .unwrap();

    let (catalog, host) = visit(catalog, &link);
    assert!(host.prompts.is_empty());
    assert_eq!(host.labels(), vec!["Band"]);
    assert_eq!(*catalog.queries.borrow(), vec!["the band".to_string()]);
}

#[test]
fn failed_listing_is_closed_unsuccessfully() {
    let (_, host) = visit(
        FakeCatalog::new(Session::anonymous(Site::Wimp, Quality::High)),
        &url("/genres"),
    );
    assert_eq!(host.notifications.len(), 1);
    assert_eq!(host.ended, vec![false]);

    let (_, host) = visit(
        FakeCatalog::new(Session::anonymous(Site::Wimp, Quality::High)),
        &url("/play/1"),
    );
    assert_eq!(host.notifications.len(), 1);
    assert!(host.ended.is_empty());
}

#[test]
fn every_route_round_trips_through_reverse_and_resolve() {
    let router = views::router(ADDON).unwrap();
    let sample = |name: &str| match name {
        "group" => "recommended",
        "kind" => "albums",
        "genre_path" => "rock/metal",
        "mood_path" => "feel good",
        _ => "42",
    };

    for (pattern, view) in views::ROUTES {
        let params: Params = pattern
            .split('/')
            .filter_map(|seg| seg.strip_prefix('<')?.strip_suffix('>'))
            .map(|name| (name, sample(name)))
            .collect();

        let link = router.reverse(view, &params).unwrap();
        let found = router.resolve(&link).unwrap();
        assert_eq!(found.key, *view, "{pattern} -> {link}");
        assert_eq!(found.params, params, "{pattern} -> {link}");
    }

    let genre = router
        .reverse(&View::Genre, &Params::new().with("genre_path", "pop"))
        .unwrap();
    let genre_items = router
        .reverse(
            &View::GenreItems,
            &Params::new().with("genre_path", "pop").with("kind", "tracks"),
        )
        .unwrap();
    assert_eq!(router.resolve(&genre).unwrap().key, View::Genre);
    assert_eq!(router.resolve(&genre_items).unwrap().key, View::GenreItems);

    let featured = router
        .reverse(&View::Featured, &Params::new().with("group", "new"))
        .unwrap();
    assert_eq!(router.resolve(&featured).unwrap().key, View::Featured);
    assert_eq!(
        router.resolve(&format!("{featured}/playlists")).unwrap().key,
        View::FeaturedItems
    );
}
