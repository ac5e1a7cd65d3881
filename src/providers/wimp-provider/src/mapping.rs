use crate::models::{Album, Artist, Category, Playlist, Track};
use wimp_core::models::{
    Album as CoreAlbum, AlbumId, AlbumRef, Artist as CoreArtist, ArtistId, ArtistRef,
    Category as CoreCategory, Playlist as CorePlaylist, PlaylistId, Track as CoreTrack, TrackId,
};
use wimp_core::Site;

const ALBUM_IMAGE_SIZE: &str = "640x640";
const ARTIST_IMAGE_SIZE: &str = "320x320";
const PLAYLIST_IMAGE_SIZE: &str = "480x320";
const CATEGORY_IMAGE_SIZE: &str = "460x306";

/// Image resource ids are UUIDs; the resource server wants the dashes as
/// path separators.
pub fn image_url(site: Site, resource: Option<&str>, size: &str) -> Option<String> {
    let resource = resource.filter(|r| !r.is_empty())?;
    Some(format!(
        "{}{}/{}.jpg",
        site.image_base_url(),
        resource.replace('-', "/"),
        size
    ))
}

pub fn map_track(track: Track, site: Site) -> CoreTrack {
    CoreTrack {
        id: TrackId::new(track.id),
        name: track.title,
        track_num: track.track_number.unwrap_or(0),
        disc_num: track.volume_number.unwrap_or(1),
        duration: track.duration,
        artist: ArtistRef {
            id: ArtistId::new(track.artist.id),
            name: track.artist.name,
        },
        album: AlbumRef {
            id: AlbumId::new(track.album.id),
            name: track.album.title,
            image: image_url(site, track.album.cover.as_deref(), ALBUM_IMAGE_SIZE),
        },
        available: track.stream_ready && track.allow_streaming,
    }
}

pub fn map_album(album: Album, site: Site) -> CoreAlbum {
    CoreAlbum {
        id: AlbumId::new(album.id),
        image: image_url(site, album.cover.as_deref(), ALBUM_IMAGE_SIZE),
        name: album.title,
        artist: ArtistRef {
            id: ArtistId::new(album.artist.id),
            name: album.artist.name,
        },
        num_tracks: album.number_of_tracks,
        duration: album.duration,
        release_date: album.release_date,
    }
}

pub fn map_artist(artist: Artist, site: Site) -> CoreArtist {
    CoreArtist {
        id: ArtistId::new(artist.id),
        image: image_url(site, artist.picture.as_deref(), ARTIST_IMAGE_SIZE),
        name: artist.name,
    }
}

pub fn map_playlist(playlist: Playlist, site: Site) -> CorePlaylist {
    CorePlaylist {
        id: PlaylistId::new(playlist.uuid),
        image: image_url(site, playlist.image.as_deref(), PLAYLIST_IMAGE_SIZE),
        name: playlist.title,
        description: playlist.description,
        num_tracks: playlist.number_of_tracks,
        duration: playlist.duration,
    }
}

pub fn map_category(category: Category, site: Site) -> CoreCategory {
    CoreCategory {
        image: image_url(site, category.image.as_deref(), CATEGORY_IMAGE_SIZE),
        name: category.name,
        path: category.path,
        has_playlists: category.has_playlists,
        has_albums: category.has_albums,
        has_tracks: category.has_tracks,
    }
}
