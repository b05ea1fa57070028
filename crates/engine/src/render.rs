use crate::geometry::{Rect, Vec2};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderableKind {
    Placeholder,
    Sprite(String),
}

/// Opaque draw association for an actor or solid. The core never interprets
/// pixel content; it only hands the descriptor back to the host once per
/// draw pass, together with the entity's current world position.
#[derive(Debug, Clone)]
pub struct RenderableDesc {
    pub kind: RenderableKind,
    pub source_rect: Option<Rect>,
    pub debug_name: &'static str,
}

/// Draw delegate supplied by the host. `Level::draw` calls it for solids
/// first, then actors, both in registration order (back-to-front layering).
pub trait DrawSink {
    fn draw(&mut self, desc: &RenderableDesc, position: Vec2);
}
