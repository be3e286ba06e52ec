//! Drawing target the game renders onto. Coordinates are arena units.

use crate::assets::Sprite;
use crate::geometry::{CollisionRect, Placement};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tint {
    White,
    Grey,
    Red,
    Green,
    Blue,
    Yellow,
    Golden,
    Cyan,
}

pub trait Surface {
    /// Draw `sprite` centred on the placement, rotated and scaled by it.
    fn draw_sprite(&mut self, sprite: &Sprite, placement: &Placement);
    /// Outline a rectangle (debug collision overlays, bars).
    fn stroke_rect(&mut self, rect: &CollisionRect, tint: Tint);
    fn fill_rect(&mut self, rect: &CollisionRect, tint: Tint);
    /// Text centred horizontally on `x`, top edge at `y`.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, tint: Tint);
}
