//! Open/closed state of the suggestion surface and the renderer contract.

use crate::config::PlacementFn;
use std::time::Duration;
use tracing::debug;
use typeahead_types::{MenuState, RenderPlan, WidgetUpdate};

/// The menu element handed to placement hooks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuContainer {
    pub class: String,
}

/// Visual side of the widget, implemented by the host.
///
/// The renderer reports input focus/blur and clicks on any item of the
/// current plan back to the core as `WidgetEvent`s.
pub trait Renderer: Send {
    /// Insert the menu container immediately after the input element
    fn attach_after_input(&mut self, menu: &MenuContainer);

    /// Replace the menu contents with `plan`
    fn render(&mut self, plan: &RenderPlan);

    /// Remove every entry from the menu
    fn clear(&mut self);

    /// Start a fade-in; not awaited
    fn fade_in(&mut self, duration: Duration);

    /// Start a fade-out; not awaited
    fn fade_out(&mut self, duration: Duration);

    /// Write `value` into the input element
    fn set_input_value(&mut self, value: &str);
}

/// Renderer that draws nothing, for hosts that only consume updates
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn attach_after_input(&mut self, _menu: &MenuContainer) {}
    fn render(&mut self, _plan: &RenderPlan) {}
    fn clear(&mut self) {}
    fn fade_in(&mut self, _duration: Duration) {}
    fn fade_out(&mut self, _duration: Duration) {}
    fn set_input_value(&mut self, _value: &str) {}
}

/// Menu state machine: `Closed` ⇄ `Open`, plus whether the container has
/// been inserted into the host surface.
#[derive(Debug)]
pub struct MenuStateMachine {
    state: MenuState,
    attached: bool,
    fade_in: Duration,
    fade_out: Duration,
}

impl MenuStateMachine {
    #[must_use]
    pub fn new(fade_in: Duration, fade_out: Duration) -> Self {
        Self {
            state: MenuState::Closed,
            attached: false,
            fade_in,
            fade_out,
        }
    }

    #[must_use]
    pub fn state(&self) -> MenuState {
        self.state
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == MenuState::Open
    }

    #[must_use]
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Insert the container once, through `placement` when given, otherwise
    /// right after the input. Returns whether this call attached it.
    pub fn ensure_attached(
        &mut self,
        container: &MenuContainer,
        placement: Option<&mut PlacementFn>,
        renderer: &mut dyn Renderer,
    ) -> bool {
        if self.attached {
            return false;
        }

        match placement {
            Some(place) => place(container),
            None => renderer.attach_after_input(container),
        }
        self.attached = true;
        debug!("Menu container '{}' attached", container.class);
        true
    }

    /// Force the menu open. Always signals, even when already open.
    pub fn open(&mut self, renderer: &mut dyn Renderer) -> WidgetUpdate {
        self.state = MenuState::Open;
        renderer.fade_in(self.fade_in);
        debug!("Menu opened");
        WidgetUpdate::Opened {
            fade_in_ms: duration_ms(self.fade_in),
        }
    }

    /// Close the menu. Signals only on an actual `Open` → `Closed` transition.
    pub fn close(&mut self, renderer: &mut dyn Renderer) -> Option<WidgetUpdate> {
        if self.state == MenuState::Closed {
            return None;
        }

        self.state = MenuState::Closed;
        renderer.fade_out(self.fade_out);
        debug!("Menu closed");
        Some(WidgetUpdate::Closed {
            fade_out_ms: duration_ms(self.fade_out),
        })
    }
}

// Fade durations come from u64 millisecond options
#[allow(clippy::cast_possible_truncation)]
fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}
