use crate::geometry::{GeometryError, Rect, Vec2};
use crate::level::{ActorId, Level, SolidId};
use crate::render::RenderableDesc;

/// How an actor's integer hitbox is derived from its fractional position.
///
/// Generic actors anchor at the top-left corner like solids. The player
/// anchors at its center; that offset convention must be preserved exactly
/// or carry and push interactions end up off by half the hitbox size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    TopLeft,
    Center,
}

/// Movable entity subject to per-pixel collision. Its position is mutated
/// only through the level's move primitives; solids that carry or push it
/// go through the same primitives rather than writing fields directly.
pub struct Actor {
    pub position: Vec2,
    width: i32,
    height: i32,
    /// Sub-pixel leftovers per axis, each in (-1, 1) at rest. Movement
    /// below one pixel accumulates here until it rounds to a whole step.
    pub(crate) remainder: Vec2,
    pub collidable: bool,
    anchor: Anchor,
    pub renderable: Option<RenderableDesc>,
}

impl Actor {
    pub fn new(position: Vec2, width: i32, height: i32) -> Result<Self, GeometryError> {
        Self::with_anchor(position, width, height, Anchor::TopLeft)
    }

    pub fn with_anchor(
        position: Vec2,
        width: i32,
        height: i32,
        anchor: Anchor,
    ) -> Result<Self, GeometryError> {
        if width <= 0 || height <= 0 {
            return Err(GeometryError::NonPositiveSize { width, height });
        }
        Ok(Self {
            position,
            width,
            height,
            remainder: Vec2::ZERO,
            collidable: true,
            anchor,
            renderable: None,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    pub fn remainder(&self) -> Vec2 {
        self.remainder
    }

    pub fn bounds(&self) -> Rect {
        self.bounds_at(self.position)
    }

    /// Hitbox the actor would have at a hypothetical position. Pure: the
    /// stored position is never touched, which is what keeps `collide_at`
    /// free of observable side effects.
    pub fn bounds_at(&self, position: Vec2) -> Rect {
        let x = position.x.round() as i32;
        let y = position.y.round() as i32;
        let (left, top) = match self.anchor {
            Anchor::TopLeft => (x, y),
            Anchor::Center => (x - self.width / 2, y - self.height / 2),
        };
        Rect::from_validated(left, top, self.width, self.height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    X,
    Y,
}

/// Outcome of one move primitive call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveResult {
    /// Signed whole pixels actually committed this call.
    pub pixels_moved: i32,
    /// True iff the move stopped early against a collidable solid.
    pub collided: bool,
}

/// Optional hook invoked once when a move is blocked. Receives the level so
/// terminal handling (e.g. squish) can mutate the world.
pub type OnCollide<'a> = &'a mut dyn FnMut(&mut Level, ActorId);

impl Level {
    /// Moves an actor horizontally by a fractional pixel amount, one whole
    /// pixel at a time. Sub-pixel residue is carried in the actor's
    /// remainder; a blocked step fires `on_collide` once and discards the
    /// rest of this call's pixels.
    pub fn move_actor_x(
        &mut self,
        id: ActorId,
        amount: f32,
        on_collide: Option<OnCollide<'_>>,
    ) -> MoveResult {
        self.move_actor_axis(id, amount, Axis::X, on_collide)
    }

    /// Vertical counterpart of [`Level::move_actor_x`]. Positive is down.
    pub fn move_actor_y(
        &mut self,
        id: ActorId,
        amount: f32,
        on_collide: Option<OnCollide<'_>>,
    ) -> MoveResult {
        self.move_actor_axis(id, amount, Axis::Y, on_collide)
    }

    fn move_actor_axis(
        &mut self,
        id: ActorId,
        amount: f32,
        axis: Axis,
        mut on_collide: Option<OnCollide<'_>>,
    ) -> MoveResult {
        let Some(index) = self.actor_index(id) else {
            return MoveResult::default();
        };

        let move_px = {
            let actor = &mut self.actors[index].actor;
            let remainder = match axis {
                Axis::X => &mut actor.remainder.x,
                Axis::Y => &mut actor.remainder.y,
            };
            *remainder += amount;
            // Nearest integer, ties away from zero; the fractional residue
            // stays behind in the remainder.
            let px = remainder.round() as i32;
            *remainder -= px as f32;
            px
        };
        if move_px == 0 {
            return MoveResult::default();
        }

        let step = move_px.signum();
        let mut remaining = move_px;
        let mut moved = 0;
        while remaining != 0 {
            let current = self.actors[index].actor.position;
            let candidate = match axis {
                Axis::X => Vec2::new(current.x + step as f32, current.y),
                Axis::Y => Vec2::new(current.x, current.y + step as f32),
            };
            if self.collide_at(id, candidate) {
                if let Some(callback) = on_collide.as_mut() {
                    callback(self, id);
                }
                return MoveResult {
                    pixels_moved: moved,
                    collided: true,
                };
            }
            // The callback never ran, so the slot index is still valid here.
            self.actors[index].actor.position = candidate;
            remaining -= step;
            moved += step;
        }
        MoveResult {
            pixels_moved: moved,
            collided: false,
        }
    }

    /// Shifts an actor by whole pixels with no collision testing. Only the
    /// solid carry pass uses this: a carried actor moves freely with its
    /// carrier.
    pub(crate) fn shift_actor(&mut self, id: ActorId, axis: Axis, pixels: i32) {
        let Some(index) = self.actor_index(id) else {
            return;
        };
        let position = &mut self.actors[index].actor.position;
        match axis {
            Axis::X => position.x += pixels as f32,
            Axis::Y => position.y += pixels as f32,
        }
    }

    /// True iff the actor, hypothetically placed at `test_position`, would
    /// overlap any collidable solid. The actor's real position is never
    /// mutated. An empty level always answers false.
    pub fn collide_at(&self, id: ActorId, test_position: Vec2) -> bool {
        let Some(index) = self.actor_index(id) else {
            return false;
        };
        let bounds = self.actors[index].actor.bounds_at(test_position);
        self.solids
            .iter()
            .any(|slot| slot.solid.collidable && slot.solid.bounds().intersects(&bounds))
    }

    /// The sole definition of "standing on": the actor's bottom edge exactly
    /// equals the solid's top edge and their horizontal extents strictly
    /// overlap (touching corners do not count).
    pub fn is_riding(&self, actor_id: ActorId, solid_id: SolidId) -> bool {
        let Some(actor) = self.actor(actor_id) else {
            return false;
        };
        let Some(solid) = self.solid(solid_id) else {
            return false;
        };
        let actor_bounds = actor.bounds();
        let solid_bounds = solid.bounds();
        actor_bounds.bottom() == solid_bounds.top()
            && actor_bounds.left() < solid_bounds.right()
            && actor_bounds.right() > solid_bounds.left()
    }

    /// Terminal handling for an actor pinned between solids. Dispatches the
    /// behavior's `on_squish` hook; the default response deregisters the
    /// actor and records the id for `take_squished`.
    pub fn squish_actor(&mut self, id: ActorId) {
        use crate::behavior::SquishResponse;

        let Some(index) = self.actor_index(id) else {
            return;
        };
        let response = match self.actors[index].behavior.take() {
            Some(mut behavior) => {
                let response = behavior.on_squish(self, id);
                if let Some(index) = self.actor_index(id) {
                    self.actors[index].behavior = Some(behavior);
                }
                response
            }
            None => SquishResponse::Remove,
        };
        if response == SquishResponse::Remove && self.remove_actor(id) {
            self.log_squish(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::Solid;

    fn level_with_actor(x: f32, y: f32) -> (Level, ActorId) {
        let mut level = Level::new();
        let id = level.add_actor(Actor::new(Vec2::new(x, y), 8, 8).expect("actor"));
        (level, id)
    }

    fn add_solid(level: &mut Level, x: f32, y: f32, width: i32, height: i32) -> SolidId {
        level.add_solid(Solid::new(Vec2::new(x, y), width, height).expect("solid"))
    }

    #[test]
    fn actor_new_rejects_non_positive_size() {
        assert!(Actor::new(Vec2::ZERO, 0, 8).is_err());
        assert!(Actor::new(Vec2::ZERO, 8, -2).is_err());
    }

    #[test]
    fn center_anchor_offsets_bounds_by_half_size() {
        let actor = Actor::with_anchor(Vec2::new(100.0, 50.0), 8, 12, Anchor::Center)
            .expect("actor");
        let bounds = actor.bounds();
        assert_eq!(bounds.left(), 96);
        assert_eq!(bounds.right(), 104);
        assert_eq!(bounds.top(), 44);
        assert_eq!(bounds.bottom(), 56);
    }

    #[test]
    fn subpixel_amounts_accumulate_before_moving() {
        let (mut level, id) = level_with_actor(0.0, 0.0);

        // 0.4 five times: cumulative rounds 0, 1, 1, 2, 2 -> exactly two
        // one-pixel commits, never a third.
        let mut positions = Vec::new();
        for _ in 0..5 {
            level.move_actor_x(id, 0.4, None);
            positions.push(level.actor(id).expect("actor").position.x);
        }
        assert_eq!(positions, vec![0.0, 1.0, 1.0, 2.0, 2.0]);

        let remainder = level.actor(id).expect("actor").remainder();
        assert!(remainder.x.abs() < 1e-5);
    }

    #[test]
    fn rounding_is_ties_away_from_zero() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        level.move_actor_x(id, 0.5, None);
        assert_eq!(level.actor(id).expect("actor").position.x, 1.0);

        let (mut level, id) = level_with_actor(0.0, 0.0);
        level.move_actor_x(id, -0.5, None);
        assert_eq!(level.actor(id).expect("actor").position.x, -1.0);
    }

    #[test]
    fn zero_rounded_move_fires_no_callback() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        // Wall immediately to the right; a 0.3 move rounds to zero pixels
        // and must not even probe for collision.
        add_solid(&mut level, 8.0, 0.0, 8, 8);
        let mut calls = 0;
        let result = level.move_actor_x(id, 0.3, Some(&mut |_, _| calls += 1));
        assert_eq!(result, MoveResult::default());
        assert_eq!(calls, 0);
    }

    #[test]
    fn blocked_move_keeps_position_and_fires_callback_once() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        add_solid(&mut level, 8.0, 0.0, 8, 8);

        let mut calls = 0;
        let result = level.move_actor_x(id, 5.0, Some(&mut |_, _| calls += 1));

        assert_eq!(level.actor(id).expect("actor").position.x, 0.0);
        assert_eq!(calls, 1);
        assert!(result.collided);
        assert_eq!(result.pixels_moved, 0);
    }

    #[test]
    fn move_stops_partway_at_an_obstacle() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        add_solid(&mut level, 11.0, 0.0, 8, 8);

        let result = level.move_actor_x(id, 10.0, None);

        // Steps commit until the candidate pixel would overlap: 3 pixels in,
        // the rest discarded for this call.
        assert_eq!(level.actor(id).expect("actor").position.x, 3.0);
        assert!(result.collided);
        assert_eq!(result.pixels_moved, 3);
    }

    #[test]
    fn discarded_pixels_are_not_queued_for_later() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        let wall = add_solid(&mut level, 8.0, 0.0, 8, 8);
        level.move_actor_x(id, 5.0, None);

        // Wall gone: the next move starts fresh from the remainder, it does
        // not replay the discarded five pixels.
        level.solid_mut(wall).expect("solid").collidable = false;
        level.move_actor_x(id, 1.0, None);
        assert_eq!(level.actor(id).expect("actor").position.x, 1.0);
    }

    #[test]
    fn collide_at_ignores_non_collidable_solids_and_leaves_position_alone() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        let wall = add_solid(&mut level, 4.0, 0.0, 8, 8);

        assert!(level.collide_at(id, Vec2::new(0.0, 0.0)));
        level.solid_mut(wall).expect("solid").collidable = false;
        assert!(!level.collide_at(id, Vec2::new(0.0, 0.0)));

        assert_eq!(level.actor(id).expect("actor").position, Vec2::ZERO);
    }

    #[test]
    fn collide_at_with_no_solids_is_false() {
        let (level, id) = level_with_actor(3.0, 7.0);
        assert!(!level.collide_at(id, Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn riding_requires_exact_edge_contact_and_strict_overlap() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        let solid = add_solid(&mut level, 0.0, 8.0, 16, 8);
        assert!(level.is_riding(id, solid));

        // Resting on top means not intersecting.
        let actor_bounds = level.actor(id).expect("actor").bounds();
        let solid_bounds = level.solid(solid).expect("solid").bounds();
        assert!(!actor_bounds.intersects(&solid_bounds));

        // One pixel above: no contact.
        level.actor_mut(id).expect("actor").position.y = -1.0;
        assert!(!level.is_riding(id, solid));

        // Exactly beside the ledge: zero-width overlap does not count.
        level.actor_mut(id).expect("actor").position = Vec2::new(16.0, 0.0);
        assert!(!level.is_riding(id, solid));

        // One pixel of horizontal overlap does.
        level.actor_mut(id).expect("actor").position = Vec2::new(15.0, 0.0);
        assert!(level.is_riding(id, solid));
    }

    #[test]
    fn squish_removes_actor_and_records_id() {
        let (mut level, id) = level_with_actor(0.0, 0.0);
        level.squish_actor(id);
        assert!(level.actor(id).is_none());
        assert_eq!(level.take_squished(), vec![id]);

        // Squishing an absent id is a no-op.
        level.squish_actor(id);
        assert!(level.take_squished().is_empty());
    }

    #[test]
    fn squish_respects_keep_response() {
        use crate::behavior::{ActorBehavior, SquishResponse};
        use crate::context::TickContext;

        struct Unsquishable;
        impl ActorBehavior for Unsquishable {
            fn update(&mut self, _: &mut Level, _: ActorId, _: &TickContext) {}
            fn on_squish(&mut self, _: &mut Level, _: ActorId) -> SquishResponse {
                SquishResponse::Keep
            }
        }

        let mut level = Level::new();
        let id = level.add_actor_with(
            Actor::new(Vec2::ZERO, 8, 8).expect("actor"),
            Box::new(Unsquishable),
        );
        level.squish_actor(id);
        assert!(level.actor(id).is_some());
        assert!(level.take_squished().is_empty());
    }
}
