use crate::actor::Axis;
use crate::geometry::{GeometryError, Rect, Vec2};
use crate::level::{ActorId, Level, SolidId};
use crate::render::RenderableDesc;

/// Collision geometry. Static solids never call `move_solid`; moving solids
/// (platforms, crushers) relocate their passengers through the actors' own
/// move primitives while they travel.
pub struct Solid {
    pub position: Vec2,
    width: i32,
    height: i32,
    pub collidable: bool,
    /// Declared but never consulted by the movement algorithm; reserved for
    /// one-way-platform semantics.
    pub one_way: bool,
    pub(crate) remainder: Vec2,
    pub renderable: Option<RenderableDesc>,
}

impl Solid {
    pub fn new(position: Vec2, width: i32, height: i32) -> Result<Self, GeometryError> {
        if width <= 0 || height <= 0 {
            return Err(GeometryError::NonPositiveSize { width, height });
        }
        Ok(Self {
            position,
            width,
            height,
            collidable: true,
            one_way: false,
            remainder: Vec2::ZERO,
            renderable: None,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_validated(
            self.position.x.round() as i32,
            self.position.y.round() as i32,
            self.width,
            self.height,
        )
    }
}

impl Level {
    /// Moves a solid by a fractional delta, carrying riders and pushing
    /// overlapped actors out of the way.
    ///
    /// The riding snapshot is taken once, against pre-move geometry, and
    /// reused for both axis passes: an actor riding at the start of the call
    /// is carried on both axes even if the X pass breaks the riding
    /// relationship. While the solid repositions, its collidable flag is
    /// cleared so the pushes and carries it triggers do not collide with the
    /// solid itself.
    pub fn move_solid(&mut self, id: SolidId, dx: f32, dy: f32) {
        let Some(index) = self.solid_index(id) else {
            return;
        };

        let (move_x, move_y) = {
            let solid = &mut self.solids[index].solid;
            solid.remainder.x += dx;
            solid.remainder.y += dy;
            let move_x = solid.remainder.x.round() as i32;
            let move_y = solid.remainder.y.round() as i32;
            solid.remainder.x -= move_x as f32;
            solid.remainder.y -= move_y as f32;
            (move_x, move_y)
        };
        if move_x == 0 && move_y == 0 {
            return;
        }

        // Scratch sets live on the slot between calls; cleared here and
        // again before being put back.
        let mut carried = std::mem::take(&mut self.solids[index].carried);
        let mut colliding = std::mem::take(&mut self.solids[index].colliding);
        carried.clear();
        colliding.clear();

        for actor_id in self.actor_ids() {
            if self.is_riding(actor_id, id) {
                carried.push(actor_id);
            }
        }

        self.solids[index].solid.collidable = false;

        if move_x != 0 {
            self.move_solid_axis(id, Axis::X, move_x, &carried, &mut colliding);
        }
        if move_y != 0 {
            self.move_solid_axis(id, Axis::Y, move_y, &carried, &mut colliding);
        }

        if let Some(index) = self.solid_index(id) {
            self.solids[index].solid.collidable = true;
            carried.clear();
            colliding.clear();
            self.solids[index].carried = carried;
            self.solids[index].colliding = colliding;
        }
    }

    fn move_solid_axis(
        &mut self,
        id: SolidId,
        axis: Axis,
        step: i32,
        carried: &[ActorId],
        colliding: &mut Vec<ActorId>,
    ) {
        let Some(index) = self.solid_index(id) else {
            return;
        };

        // Solids do not collide against other solids: commit the whole step.
        {
            let solid = &mut self.solids[index].solid;
            match axis {
                Axis::X => solid.position.x += step as f32,
                Axis::Y => solid.position.y += step as f32,
            }
        }
        let new_bounds = self.solids[index].solid.bounds();

        // Overlap set is rebuilt fresh per axis, independent of the carried
        // snapshot.
        colliding.clear();
        for actor_id in self.actor_ids() {
            let Some(actor) = self.actor(actor_id) else {
                continue;
            };
            if actor.bounds().intersects(&new_bounds) {
                colliding.push(actor_id);
            }
        }

        for actor_id in colliding.iter().copied() {
            let Some(actor) = self.actor(actor_id) else {
                continue;
            };
            let actor_bounds = actor.bounds();
            // Exactly the displacement that leaves the actor flush against
            // the trailing edge of the moving solid.
            let push = match axis {
                Axis::X => {
                    if step > 0 {
                        (new_bounds.right() - actor_bounds.left()) as f32
                    } else {
                        (new_bounds.left() - actor_bounds.right()) as f32
                    }
                }
                Axis::Y => {
                    if step > 0 {
                        (new_bounds.bottom() - actor_bounds.top()) as f32
                    } else {
                        (new_bounds.top() - actor_bounds.bottom()) as f32
                    }
                }
            };
            let squish: &mut dyn FnMut(&mut Level, ActorId) =
                &mut |level, actor_id| level.squish_actor(actor_id);
            match axis {
                Axis::X => self.move_actor_x(actor_id, push, Some(squish)),
                Axis::Y => self.move_actor_y(actor_id, push, Some(squish)),
            };
        }

        for actor_id in carried.iter().copied() {
            if colliding.contains(&actor_id) {
                continue;
            }
            // Carried actors ride along untested; their carrier already
            // cleared the way.
            self.shift_actor(actor_id, axis, step);
        }
    }
}
