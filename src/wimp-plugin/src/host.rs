//! What the plugin needs from the media-center host.

/// Hint for how the host should lay out a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Songs,
    Albums,
    Artists,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Songs => "songs",
            ContentType::Albums => "albums",
            ContentType::Artists => "artists",
        }
    }
}

/// Metadata shown next to a listing row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemInfo {
    pub title: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub track_number: Option<u32>,
    pub disc_number: Option<u32>,
    /// Seconds.
    pub duration: Option<u32>,
    pub track_count: Option<u32>,
    pub thumbnail: Option<String>,
    /// Resolved through the play route rather than opened as a folder.
    pub playable: bool,
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryItem {
    pub url: String,
    pub label: String,
    pub is_folder: bool,
    pub info: ItemInfo,
}

impl DirectoryItem {
    pub fn folder(url: String, label: impl Into<String>) -> Self {
        Self {
            url,
            label: label.into(),
            is_folder: true,
            info: ItemInfo::default(),
        }
    }
}

/// A stream handed back to the host's player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedItem {
    pub url: String,
    pub mime_type: String,
}

/// Listing, playback and dialog primitives of the host application.
pub trait Host {
    fn set_content(&mut self, content: ContentType);

    fn add_directory_items(&mut self, items: Vec<DirectoryItem>);

    /// Closes the listing started by the current invocation. `succeeded` is
    /// false when the folder produced nothing to show (cancelled dialog,
    /// failed request) and the host should stay where it was.
    fn end_of_directory(&mut self, succeeded: bool);

    fn set_resolved_url(&mut self, item: ResolvedItem);

    /// Text entry. `None` when the user cancels.
    fn input(&mut self, heading: &str, hidden: bool) -> Option<String>;

    fn notify(&mut self, message: &str);
}
