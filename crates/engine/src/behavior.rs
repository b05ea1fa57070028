use crate::context::TickContext;
use crate::level::{ActorId, Level};

/// What an actor kind wants done when it is pinned between solid geometry
/// with no room left to be pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SquishResponse {
    /// Deregister the actor from the level (the default).
    Remove,
    /// Leave the actor registered; the behavior handled it some other way.
    Keep,
}

/// Per-actor capability hooks. This replaces subclass overrides with an
/// explicit interface: a behavior receives the owning level and its own id,
/// and drives the actor exclusively through the level's move primitives.
pub trait ActorBehavior {
    fn update(&mut self, level: &mut Level, id: ActorId, ctx: &TickContext);

    fn on_squish(&mut self, _level: &mut Level, _id: ActorId) -> SquishResponse {
        SquishResponse::Remove
    }
}

/// Inert actor kind: no per-tick logic, removed on squish.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericActor;

impl ActorBehavior for GenericActor {
    fn update(&mut self, _level: &mut Level, _id: ActorId, _ctx: &TickContext) {}
}
