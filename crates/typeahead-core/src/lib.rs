//! Query resolution and result lifecycle engine for incremental search inputs.
//!
//! As the user types, input events are debounced, the live query is resolved
//! through a per-widget cache against a local candidate list or a remote
//! endpoint, results are grouped by category into a [`RenderPlan`], and the
//! suggestion menu is opened and closed in response to focus, blur, typing and
//! selection. Drawing and networking are injected through [`Renderer`] and
//! [`Transport`].

pub mod cache;
pub mod config;
pub mod debounce;
pub mod menu;
pub mod present;
pub mod source;

mod error;
mod widget;

#[cfg(test)]
mod tests;

pub use cache::QueryCache;
pub use config::{SourceConfig, WidgetConfig, WidgetHooks};
pub use error::{Error, ResolutionError, Result};
pub use menu::{MenuContainer, NullRenderer, Renderer};
pub use present::ItemFormatter;
pub use source::{NullTransport, Transport};
pub use widget::Autocomplete;

#[cfg(feature = "http")]
pub use source::HttpTransport;

pub use typeahead_types::*;
