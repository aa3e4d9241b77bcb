//! Host callbacks that cannot be expressed as JSON options.

use crate::menu::MenuContainer;
use crate::present::ItemFormatter;
use std::fmt;
use std::sync::Arc;

/// Custom menu insertion, called once before the first render
pub type PlacementFn = Box<dyn FnMut(&MenuContainer) + Send>;

/// Optional hooks supplied alongside `WidgetConfig`
#[derive(Default)]
pub struct WidgetHooks {
    /// Builds item content instead of the default label-only element
    pub format: Option<Arc<dyn ItemFormatter>>,

    /// Inserts the menu container instead of the default after-input placement
    pub menu_placement: Option<PlacementFn>,
}

impl WidgetHooks {
    #[must_use]
    pub fn with_format(mut self, format: impl ItemFormatter + 'static) -> Self {
        self.format = Some(Arc::new(format));
        self
    }

    #[must_use]
    pub fn with_menu_placement(
        mut self,
        placement: impl FnMut(&MenuContainer) + Send + 'static,
    ) -> Self {
        self.menu_placement = Some(Box::new(placement));
        self
    }
}

impl fmt::Debug for WidgetHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetHooks")
            .field("format", &self.format.is_some())
            .field("menu_placement", &self.menu_placement.is_some())
            .finish()
    }
}
