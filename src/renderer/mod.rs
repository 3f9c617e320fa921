//! Presentation adapter
//!
//! [`shapes`] turns a snapshot into 2D primitives; a [`Presenter`] puts them
//! on screen. The canvas presenter only exists on wasm.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPresenter;
pub use shapes::{GarageView, Shape, TextAlign};

use crate::economy::CatalogKind;
use crate::game::Intent;
use crate::layout::Layout;
use crate::sim::RunState;

/// Something that can draw a composed frame
pub trait Presenter {
    type Error;

    fn present(&mut self, shapes: &[Shape]) -> Result<(), Self::Error>;
}

/// Collects frames instead of drawing them
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub frames: Vec<Vec<Shape>>,
}

impl Presenter for RecordingPresenter {
    type Error = std::convert::Infallible;

    fn present(&mut self, shapes: &[Shape]) -> Result<(), Self::Error> {
        self.frames.push(shapes.to_vec());
        Ok(())
    }
}

/// Tap target on the garage screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GarageTap {
    Back,
    Tab(CatalogKind),
    Prev,
    Next,
    Action,
}

/// Map a tap in layout pixels to a garage control
pub fn garage_tap(layout: &Layout, x: f32, y: f32) -> Option<GarageTap> {
    let (w, h) = (layout.width, layout.height);
    if y < 60.0 && x < 60.0 {
        return Some(GarageTap::Back);
    }
    if y > 80.0 && y < 140.0 {
        let tab = if x < w / 2.0 {
            CatalogKind::Vehicle
        } else {
            CatalogKind::Color
        };
        return Some(GarageTap::Tab(tab));
    }
    if y > h / 2.0 && y < h / 2.0 + 100.0 {
        if x < 80.0 {
            return Some(GarageTap::Prev);
        }
        if x > w - 80.0 {
            return Some(GarageTap::Next);
        }
    }
    if y > h - 150.0 {
        return Some(GarageTap::Action);
    }
    None
}

/// Whether a menu tap hit the garage button in the top-right corner
pub fn is_garage_button(layout: &Layout, x: f32, y: f32) -> bool {
    y < 100.0 && x > layout.width - 60.0
}

/// What a tap outside the garage does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTap {
    OpenGarage,
    Intent(Intent),
}

/// Map a tap on the run screens to an action. Taps while playing are
/// swipe origins and do nothing on their own.
pub fn screen_tap(phase: RunState, layout: &Layout, x: f32, y: f32) -> Option<ScreenTap> {
    match phase {
        RunState::Menu if is_garage_button(layout, x, y) => Some(ScreenTap::OpenGarage),
        RunState::Menu | RunState::GameOver => Some(ScreenTap::Intent(Intent::PrimaryAction)),
        RunState::Paused => Some(ScreenTap::Intent(Intent::PauseToggle)),
        RunState::Playing => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garage_zones() {
        let layout = Layout::default();
        let (w, h) = (layout.width, layout.height);
        assert_eq!(garage_tap(&layout, 10.0, 10.0), Some(GarageTap::Back));
        assert_eq!(
            garage_tap(&layout, 20.0, 100.0),
            Some(GarageTap::Tab(CatalogKind::Vehicle))
        );
        assert_eq!(
            garage_tap(&layout, w - 20.0, 100.0),
            Some(GarageTap::Tab(CatalogKind::Color))
        );
        assert_eq!(
            garage_tap(&layout, 10.0, h / 2.0 + 50.0),
            Some(GarageTap::Prev)
        );
        assert_eq!(
            garage_tap(&layout, w - 10.0, h / 2.0 + 50.0),
            Some(GarageTap::Next)
        );
        assert_eq!(
            garage_tap(&layout, w / 2.0, h - 100.0),
            Some(GarageTap::Action)
        );
        assert_eq!(garage_tap(&layout, w / 2.0, h / 2.0 + 50.0), None);
    }

    #[test]
    fn test_menu_garage_button() {
        let layout = Layout::default();
        assert!(is_garage_button(&layout, layout.width - 10.0, 20.0));
        assert!(!is_garage_button(&layout, layout.width / 2.0, 20.0));
        assert!(!is_garage_button(&layout, layout.width - 10.0, 300.0));
    }

    #[test]
    fn test_screen_taps() {
        let layout = Layout::default();
        let center = (layout.width / 2.0, layout.height / 2.0);
        let tap = |phase| screen_tap(phase, &layout, center.0, center.1);

        let start = Some(ScreenTap::Intent(Intent::PrimaryAction));
        assert_eq!(tap(RunState::Menu), start);
        assert_eq!(tap(RunState::GameOver), start);
        assert_eq!(tap(RunState::Playing), None);
        assert_eq!(
            screen_tap(RunState::Menu, &layout, layout.width - 10.0, 20.0),
            Some(ScreenTap::OpenGarage)
        );
    }

    #[test]
    fn test_tap_resumes_paused_run() {
        use crate::economy::NeonCatalog;
        use crate::game::Game;
        use crate::persistence::MemoryStore;
        use crate::tuning::Tuning;

        let (store, catalog) = (MemoryStore::new(), NeonCatalog::new());
        let mut game = Game::new(Tuning::default(), 405.0, 720.0, store, catalog, 9).unwrap();
        game.start_game();
        game.push_intent(Intent::PauseToggle);
        game.step();
        assert_eq!(game.phase(), RunState::Paused);

        let layout = game.state().layout;
        let tap = screen_tap(game.phase(), &layout, 100.0, 400.0);
        let Some(ScreenTap::Intent(intent)) = tap else {
            panic!("unexpected tap action {:?}", tap);
        };
        game.push_intent(intent);
        game.step();
        assert_eq!(game.phase(), RunState::Playing);
    }
}
