mod classes;
mod hooks;
mod settings;
mod validation;

pub use classes::ClassTokens;
pub use hooks::{PlacementFn, WidgetHooks};
pub use settings::{QUERY_PLACEHOLDER, SourceConfig, WidgetConfig};
pub use validation::warn_unknown_fields;
