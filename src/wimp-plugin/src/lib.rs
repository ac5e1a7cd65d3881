//! Media-center plugin front end for the WiMP/TIDAL catalog.
//!
//! The host starts one process per navigation step and hands it a single
//! `plugin://<addon-id>/<path>?<query>` URL. [`Plugin::run`] routes that URL
//! to a view, which queries the [`CatalogService`] and pushes a listing, a
//! resolved stream, or a dialog through the [`Host`].
//!
//! # Usage
//!
//! ```rust,ignore
//! let session = Session::from_settings(&settings);
//! let client = WimpClient::new(WimpConfig::from(&config.api), session)?;
//! let mut plugin = Plugin::new(&config.addon_id, client, settings, host)?;
//! plugin.run("plugin://plugin.audio.wimp/artist/42")?;
//! ```

pub mod host;
pub mod listing;
pub mod router;
pub mod views;

use thiserror::Error;
use wimp_core::redact::redact_secrets;
use wimp_core::{ApiError, AuthFailure, CatalogService, SettingsError, SettingsStore};

pub use host::{ContentType, DirectoryItem, Host, ItemInfo, ResolvedItem};
pub use router::{Params, RouteError, RouteMatch, Router};
pub use views::View;

#[derive(Debug, Error)]
pub enum PluginError {
    #[error(transparent)]
    Route(#[from] RouteError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("parameter {name:?} has unsupported value {value:?}")]
    InvalidParameter { name: String, value: String },
    #[error("this view is not implemented yet")]
    NotImplemented,
}

pub struct Plugin<C, S, H> {
    router: Router<View>,
    catalog: C,
    settings: S,
    host: H,
}

impl<C: CatalogService, S: SettingsStore, H: Host> Plugin<C, S, H> {
    pub fn new(addon_id: &str, catalog: C, settings: S, host: H) -> Result<Self, PluginError> {
        Ok(Self {
            router: views::router(addon_id)?,
            catalog,
            settings,
            host,
        })
    }

    pub fn router(&self) -> &Router<View> {
        &self.router
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn into_parts(self) -> (C, S, H) {
        (self.catalog, self.settings, self.host)
    }

    /// Handle one host invocation.
    ///
    /// Authentication failures end in a single notification on the host and
    /// count as handled. Every other error is returned to the caller.
    pub fn run(&mut self, url: &str) -> Result<(), PluginError> {
        tracing::info!(url = %redact_secrets(url), "plugin invoked");
        match self.dispatch(url) {
            Err(PluginError::Api(ApiError::Unauthenticated(failure))) => {
                tracing::warn!(%failure, "request needs a logged-in session");
                self.host.notify(unauthenticated_message(failure));
                Ok(())
            }
            other => other,
        }
    }

    fn dispatch(&mut self, url: &str) -> Result<(), PluginError> {
        let Plugin {
            router,
            catalog,
            settings,
            host,
        } = self;
        let router = &*router;
        router.dispatch(url, |view, params| {
            views::Views {
                router,
                catalog,
                settings,
                host,
            }
            .handle(view, &params)
        })
    }
}

fn unauthenticated_message(failure: AuthFailure) -> &'static str {
    match failure {
        AuthFailure::NoSession | AuthFailure::NoUser => "Please log in to browse this content.",
        AuthFailure::Rejected { .. } => "Your session has expired. Please log in again.",
    }
}
