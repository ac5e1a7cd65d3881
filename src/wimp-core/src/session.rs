//! Session state shared by the API client and the plugin views.
//!
//! A [`Session`] is built once per invocation from the persisted settings and
//! replaced wholesale on login/logout; nothing else mutates it.

use crate::settings::{SettingsError, SettingsStore};
use serde::{Deserialize, Serialize};

pub const KEY_SESSION_ID: &str = "session_id";
pub const KEY_COUNTRY_CODE: &str = "country_code";
pub const KEY_USER_ID: &str = "user_id";
pub const KEY_QUALITY: &str = "quality";
pub const KEY_SITE: &str = "site";

/// Country used when a stored session has no country code.
pub const DEFAULT_COUNTRY_CODE: &str = "NO";

/// Requested stream quality. Persisted as the index into
/// `[lossless, high, low]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Lossless,
    #[default]
    High,
    Low,
}

impl Quality {
    pub const ORDERED: [Quality; 3] = [Quality::Lossless, Quality::High, Quality::Low];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ORDERED.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Quality::Lossless => 0,
            Quality::High => 1,
            Quality::Low => 2,
        }
    }

    /// Value of the `soundQuality` request parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Quality::Lossless => "LOSSLESS",
            Quality::High => "HIGH",
            Quality::Low => "LOW",
        }
    }

    pub fn from_api_str(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "LOSSLESS" => Some(Quality::Lossless),
            "HIGH" => Some(Quality::High),
            "LOW" => Some(Quality::Low),
            _ => None,
        }
    }

    pub fn is_lossless(&self) -> bool {
        matches!(self, Quality::Lossless)
    }

    /// Container hint handed to the host player.
    pub fn mime_type(&self) -> &'static str {
        if self.is_lossless() {
            "audio/flac"
        } else {
            "audio/aac"
        }
    }
}

/// Which of the two API deployments the plugin talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Site {
    #[default]
    Wimp,
    Tidal,
}

impl Site {
    pub const ORDERED: [Site; 2] = [Site::Wimp, Site::Tidal];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ORDERED.get(index).copied()
    }

    pub fn index(&self) -> usize {
        match self {
            Site::Wimp => 0,
            Site::Tidal => 1,
        }
    }

    pub fn api_base_url(&self) -> &'static str {
        match self {
            Site::Wimp => "https://api.wimpmusic.com/v1/",
            Site::Tidal => "https://api.tidalhifi.com/v1/",
        }
    }

    /// Application token sent with the login request.
    pub fn api_token(&self) -> &'static str {
        match self {
            Site::Wimp => "rQtt0XAsYjXYIlml",
            Site::Tidal => "P5Xbeo5LFvESeDy6",
        }
    }

    pub fn image_base_url(&self) -> &'static str {
        match self {
            Site::Wimp => "https://resources.wimpmusic.com/images/",
            Site::Tidal => "https://resources.tidal.com/images/",
        }
    }
}

/// Identity returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub session_id: String,
    pub country_code: String,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    credentials: Option<Credentials>,
    quality: Quality,
    site: Site,
}

impl Session {
    pub fn anonymous(site: Site, quality: Quality) -> Self {
        Self {
            credentials: None,
            quality,
            site,
        }
    }

    pub fn authenticated(site: Site, quality: Quality, credentials: Credentials) -> Self {
        Self {
            credentials: Some(credentials),
            quality,
            site,
        }
    }

    /// Same site and quality, new identity.
    pub fn with_credentials(&self, credentials: Credentials) -> Self {
        Self::authenticated(self.site, self.quality, credentials)
    }

    pub fn logged_out(&self) -> Self {
        Self::anonymous(self.site, self.quality)
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn site(&self) -> Site {
        self.site
    }

    /// Load the session from persisted settings.
    ///
    /// A stored `session_id` without a `user_id` (or vice versa) is treated as
    /// anonymous. Unknown quality/site indices fall back to the defaults.
    pub fn from_settings(settings: &dyn SettingsStore) -> Self {
        let quality = read_index(settings, KEY_QUALITY)
            .and_then(Quality::from_index)
            .unwrap_or_default();
        let site = read_index(settings, KEY_SITE)
            .and_then(Site::from_index)
            .unwrap_or_default();

        let session_id = non_empty(settings.get(KEY_SESSION_ID));
        let user_id = non_empty(settings.get(KEY_USER_ID));
        let credentials = match (session_id, user_id) {
            (Some(session_id), Some(user_id)) => Some(Credentials {
                session_id,
                user_id,
                country_code: non_empty(settings.get(KEY_COUNTRY_CODE))
                    .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_string()),
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("ignoring partial session in settings");
                None
            }
            (None, None) => None,
        };

        Self {
            credentials,
            quality,
            site,
        }
    }

    /// Persist the identity fields. Quality and site belong to the user's
    /// settings dialog and are left alone.
    pub fn write_credentials(&self, settings: &mut dyn SettingsStore) -> Result<(), SettingsError> {
        let (session_id, country_code, user_id) = match &self.credentials {
            Some(creds) => (
                creds.session_id.as_str(),
                creds.country_code.as_str(),
                creds.user_id.as_str(),
            ),
            None => ("", "", ""),
        };
        settings.set(KEY_SESSION_ID, session_id);
        settings.set(KEY_COUNTRY_CODE, country_code);
        settings.set(KEY_USER_ID, user_id);
        settings.save()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn read_index(settings: &dyn SettingsStore, key: &str) -> Option<usize> {
    settings.get(key).and_then(|v| v.trim().parse().ok())
}
