//! Turning catalog entities into listing rows.

use crate::host::{DirectoryItem, ItemInfo};
use crate::router::{Params, RouteError, Router};
use crate::views::View;
use wimp_core::models::{Album, Artist, CatalogItem, Category, Playlist, Track};
use wimp_core::Quality;

/// Builds rows whose URLs point back into the plugin.
pub struct Listing<'a> {
    router: &'a Router<View>,
    quality: Quality,
}

impl<'a> Listing<'a> {
    /// `quality` picks the MIME hint put on playable rows.
    pub fn new(router: &'a Router<View>, quality: Quality) -> Self {
        Self { router, quality }
    }

    fn url(&self, view: View, name: &str, value: &str) -> Result<String, RouteError> {
        self.router.reverse(&view, &Params::new().with(name, value))
    }

    /// Playable rows. Tracks the service will not stream are left out.
    pub fn tracks(&self, tracks: &[Track]) -> Result<Vec<DirectoryItem>, RouteError> {
        let items = tracks
            .iter()
            .filter(|t| t.available)
            .map(|t| self.track(t))
            .collect::<Result<Vec<_>, _>>()?;
        if items.len() < tracks.len() {
            tracing::debug!(
                skipped = tracks.len() - items.len(),
                "unavailable tracks left out of listing"
            );
        }
        Ok(items)
    }

    fn track(&self, track: &Track) -> Result<DirectoryItem, RouteError> {
        Ok(DirectoryItem {
            url: self.url(View::Play, "track_id", track.id.as_ref())?,
            label: track.name.clone(),
            is_folder: false,
            info: ItemInfo {
                title: Some(track.name.clone()),
                album: Some(track.album.name.clone()),
                artist: Some(track.artist.name.clone()),
                track_number: Some(track.track_num),
                disc_number: Some(track.disc_num),
                duration: track.duration,
                thumbnail: track.album.image.clone(),
                playable: true,
                mime_type: Some(self.quality.mime_type().to_string()),
                ..ItemInfo::default()
            },
        })
    }

    pub fn albums(&self, albums: &[Album]) -> Result<Vec<DirectoryItem>, RouteError> {
        albums.iter().map(|a| self.album(a)).collect()
    }

    /// Track count comes from the album metadata, whatever is streamable.
    fn album(&self, album: &Album) -> Result<DirectoryItem, RouteError> {
        Ok(DirectoryItem {
            url: self.url(View::Album, "album_id", album.id.as_ref())?,
            label: format!("{} - {}", album.artist.name, album.name),
            is_folder: true,
            info: ItemInfo {
                title: Some(album.name.clone()),
                album: Some(album.name.clone()),
                artist: Some(album.artist.name.clone()),
                duration: album.duration,
                track_count: album.num_tracks,
                thumbnail: album.image.clone(),
                ..ItemInfo::default()
            },
        })
    }

    pub fn artists(&self, artists: &[Artist]) -> Result<Vec<DirectoryItem>, RouteError> {
        artists.iter().map(|a| self.artist(a)).collect()
    }

    fn artist(&self, artist: &Artist) -> Result<DirectoryItem, RouteError> {
        Ok(DirectoryItem {
            url: self.url(View::Artist, "artist_id", artist.id.as_ref())?,
            label: artist.name.clone(),
            is_folder: true,
            info: ItemInfo {
                artist: Some(artist.name.clone()),
                thumbnail: artist.image.clone(),
                ..ItemInfo::default()
            },
        })
    }

    pub fn playlists(&self, playlists: &[Playlist]) -> Result<Vec<DirectoryItem>, RouteError> {
        playlists.iter().map(|p| self.playlist(p)).collect()
    }

    fn playlist(&self, playlist: &Playlist) -> Result<DirectoryItem, RouteError> {
        Ok(DirectoryItem {
            url: self.url(View::Playlist, "playlist_id", playlist.id.as_ref())?,
            label: playlist.name.clone(),
            is_folder: true,
            info: ItemInfo {
                title: Some(playlist.name.clone()),
                duration: playlist.duration,
                track_count: playlist.num_tracks,
                thumbnail: playlist.image.clone(),
                ..ItemInfo::default()
            },
        })
    }

    /// Genre or mood rows, opening `view` with the category path.
    pub fn categories(
        &self,
        categories: &[Category],
        view: View,
        param: &str,
    ) -> Result<Vec<DirectoryItem>, RouteError> {
        categories
            .iter()
            .map(|c| -> Result<DirectoryItem, RouteError> {
                let mut item = DirectoryItem::folder(self.url(view, param, &c.path)?, &c.name);
                item.info.thumbnail = c.image.clone();
                Ok(item)
            })
            .collect()
    }

    /// Mixed listings such as search results and featured lists.
    pub fn items(&self, items: &[CatalogItem]) -> Result<Vec<DirectoryItem>, RouteError> {
        let mut rows = Vec::with_capacity(items.len());
        for item in items {
            let row = match item {
                CatalogItem::Artist(artist) => self.artist(artist)?,
                CatalogItem::Album(album) => self.album(album)?,
                CatalogItem::Playlist(playlist) => self.playlist(playlist)?,
                CatalogItem::Track(track) if track.available => self.track(track)?,
                CatalogItem::Track(_) => continue,
            };
            rows.push(row);
        }
        Ok(rows)
    }
}
