use crate::mapping::{map_album, map_artist, map_playlist, map_track};
use crate::models::{self, FavoriteEntry};
use crate::WimpClient;
use serde::de::DeserializeOwned;
use wimp_core::models::{Album, Artist, Playlist, Track};
use wimp_core::ApiResult;

/// The logged-in user. Collections are fetched on every access.
pub struct User<'a> {
    client: &'a WimpClient,
    id: String,
}

impl<'a> User<'a> {
    pub(crate) fn new(client: &'a WimpClient, id: String) -> Self {
        Self { client, id }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn playlists(&self) -> ApiResult<Vec<Playlist>> {
        self.client.playlists(&["users", self.id.as_str(), "playlists"], &[])
    }

    pub fn favorites(&self) -> Favorites<'a> {
        Favorites {
            client: self.client,
            user_id: self.id.clone(),
        }
    }
}

pub struct Favorites<'a> {
    client: &'a WimpClient,
    user_id: String,
}

impl Favorites<'_> {
    fn fetch<W: DeserializeOwned>(&self, kind: &str) -> ApiResult<Vec<W>> {
        let entries: Vec<FavoriteEntry<W>> = self
            .client
            .collect(&["users", self.user_id.as_str(), "favorites", kind], &[])?;
        Ok(entries.into_iter().map(|e| e.item).collect())
    }

    pub fn artists(&self) -> ApiResult<Vec<Artist>> {
        let site = self.client.session.site();
        Ok(self
            .fetch::<models::Artist>("artists")?
            .into_iter()
            .map(|a| map_artist(a, site))
            .collect())
    }

    pub fn albums(&self) -> ApiResult<Vec<Album>> {
        let site = self.client.session.site();
        Ok(self
            .fetch::<models::Album>("albums")?
            .into_iter()
            .map(|a| map_album(a, site))
            .collect())
    }

    pub fn tracks(&self) -> ApiResult<Vec<Track>> {
        let site = self.client.session.site();
        Ok(self
            .fetch::<models::Track>("tracks")?
            .into_iter()
            .map(|t| map_track(t, site))
            .collect())
    }

    pub fn playlists(&self) -> ApiResult<Vec<Playlist>> {
        let site = self.client.session.site();
        Ok(self
            .fetch::<models::Playlist>("playlists")?
            .into_iter()
            .map(|p| map_playlist(p, site))
            .collect())
    }
}
