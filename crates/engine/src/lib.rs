pub mod actor;
pub mod behavior;
pub mod context;
pub mod geometry;
pub mod grid;
pub mod input;
pub mod level;
pub mod render;
pub mod solid;

pub use actor::{Actor, Anchor, MoveResult, OnCollide};
pub use behavior::{ActorBehavior, GenericActor, SquishResponse};
pub use context::{TickContext, TICKS_PER_SECOND};
pub use geometry::{GeometryError, Rect, Vec2};
pub use grid::{populate_level, GridError, TileGrid, TilesetLayout};
pub use input::{Button, InputSnapshot};
pub use level::{ActorId, Level, SolidId};
pub use render::{DrawSink, RenderableDesc, RenderableKind};
pub use solid::Solid;
