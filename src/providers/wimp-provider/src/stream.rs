//! Turning the `streamUrl` reply into something the host can play.

use wimp_core::models::{MediaStream, StreamProtocol};
use wimp_core::{ApiError, ApiResult, Quality};

const RTMP_SCHEME: &str = "rtmp";

/// A legacy stream location, `host[/instance]/app/playpath`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyStreamUrl {
    pub host: String,
    /// Server instance segment, present in four-or-more segment strings.
    pub instance: Option<String>,
    pub app: String,
    pub playpath: String,
}

impl LegacyStreamUrl {
    /// Three segments read as `host/app/playpath`; with four or more the
    /// second one is the server instance and the playpath keeps its slashes.
    pub fn parse(raw: &str) -> Option<Self> {
        let segments: Vec<&str> = raw.trim().trim_matches('/').split('/').collect();
        if segments.len() < 3 || segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        let (instance, app, rest) = if segments.len() == 3 {
            (None, segments[1], &segments[2..])
        } else {
            (Some(segments[1].to_string()), segments[2], &segments[3..])
        };

        Some(Self {
            host: segments[0].to_string(),
            instance,
            app: app.to_string(),
            playpath: rest.join("/"),
        })
    }

    pub fn to_rtmp_url(&self) -> String {
        format!(
            "{RTMP_SCHEME}://{} app={} playpath={}",
            self.host, self.app, self.playpath
        )
    }
}

fn is_direct_http(raw: &str) -> bool {
    let lower = raw.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Classify a raw media URL and attach the quality the server settled on.
pub fn resolve_stream(raw: &str, quality: Quality) -> ApiResult<MediaStream> {
    if is_direct_http(raw) {
        return Ok(MediaStream {
            url: raw.trim().to_string(),
            protocol: StreamProtocol::Http,
            quality,
        });
    }

    let legacy =
        LegacyStreamUrl::parse(raw).ok_or_else(|| ApiError::InvalidMediaUrl(raw.to_string()))?;
    tracing::debug!(host = %legacy.host, app = %legacy.app, "rebuilt legacy stream url");
    Ok(MediaStream {
        url: legacy.to_rtmp_url(),
        protocol: StreamProtocol::Rtmp,
        quality,
    })
}
