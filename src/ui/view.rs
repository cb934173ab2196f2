use std::ops::{Deref, DerefMut};

use crate::viz::{RenderError, VizKind};

pub const LABEL_IDLE: &str = "Explain";
pub const LABEL_BUSY: &str = "Working…";
pub const NO_IMAGE: &str = "No image";
pub const NO_IMAGE_AVAILABLE: &str = "No image available";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    Beginner,
    Intermediate,
    Advanced,
    Applications,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Beginner,
        Panel::Intermediate,
        Panel::Advanced,
        Panel::Applications,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Panel::Beginner => "Beginner",
            Panel::Intermediate => "Intermediate",
            Panel::Advanced => "Advanced",
            Panel::Applications => "Applications",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSlot {
    Url(String),
    Placeholder(&'static str),
}

/// Output regions the controller writes to. Implementations own the actual
/// surfaces; the controller never looks anything up itself.
pub trait ExplainerView {
    fn set_trigger(&mut self, enabled: bool, label: &str);

    fn set_panel(&mut self, panel: Panel, text: &str);

    fn set_image(&mut self, image: ImageSlot);

    fn clear_canvas(&mut self);

    fn draw_visualization(&mut self, kind: VizKind, concept: &str) -> Result<(), RenderError>;

    /// Blocking, user-facing error.
    fn alert(&mut self, message: &str);

    /// Non-blocking status line.
    fn notice(&mut self, message: &str);
}

/// Holds the view in its loading state; dropping the guard restores the
/// trigger on every exit path.
pub struct LoadingGuard<'a, V: ExplainerView + ?Sized> {
    view: &'a mut V,
}

impl<'a, V: ExplainerView + ?Sized> LoadingGuard<'a, V> {
    pub fn enter(view: &'a mut V) -> Self {
        view.set_trigger(false, LABEL_BUSY);
        Self { view }
    }
}

impl<V: ExplainerView + ?Sized> Deref for LoadingGuard<'_, V> {
    type Target = V;

    fn deref(&self) -> &V {
        &*self.view
    }
}

impl<V: ExplainerView + ?Sized> DerefMut for LoadingGuard<'_, V> {
    fn deref_mut(&mut self) -> &mut V {
        &mut *self.view
    }
}

impl<V: ExplainerView + ?Sized> Drop for LoadingGuard<'_, V> {
    fn drop(&mut self) {
        self.view.set_trigger(true, LABEL_IDLE);
    }
}
