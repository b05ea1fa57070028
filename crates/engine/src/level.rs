use tracing::debug;

use crate::actor::Actor;
use crate::behavior::ActorBehavior;
use crate::context::TickContext;
use crate::render::DrawSink;
use crate::solid::Solid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SolidId(pub u64);

#[derive(Debug, Default)]
struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    fn allocate(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.saturating_add(1);
        id
    }
}

pub(crate) struct ActorSlot {
    pub(crate) id: ActorId,
    pub(crate) actor: Actor,
    pub(crate) behavior: Option<Box<dyn ActorBehavior>>,
}

pub(crate) struct SolidSlot {
    pub(crate) id: SolidId,
    pub(crate) solid: Solid,
    // Scratch sets reused across move_solid calls; cleared at both the
    // start and end of every move.
    pub(crate) carried: Vec<ActorId>,
    pub(crate) colliding: Vec<ActorId>,
}

/// Spatial registry: owns every live actor and solid in insertion order.
///
/// All collision queries and movement primitives live on `Level` so that a
/// solid repositioning its passengers and an actor probing for obstacles
/// both see one consistent world. Iteration that may trigger removal always
/// walks an id snapshot, never a live collection.
#[derive(Default)]
pub struct Level {
    pub(crate) actors: Vec<ActorSlot>,
    pub(crate) solids: Vec<SolidSlot>,
    actor_ids: IdAllocator,
    solid_ids: IdAllocator,
    pub(crate) squished: Vec<ActorId>,
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_actor(&mut self, actor: Actor) -> ActorId {
        self.add_actor_slot(actor, None)
    }

    pub fn add_actor_with(&mut self, actor: Actor, behavior: Box<dyn ActorBehavior>) -> ActorId {
        self.add_actor_slot(actor, Some(behavior))
    }

    fn add_actor_slot(&mut self, actor: Actor, behavior: Option<Box<dyn ActorBehavior>>) -> ActorId {
        let id = ActorId(self.actor_ids.allocate());
        debug_assert!(self.actor_index(id).is_none(), "actor id already present");
        self.actors.push(ActorSlot {
            id,
            actor,
            behavior,
        });
        id
    }

    pub fn add_solid(&mut self, solid: Solid) -> SolidId {
        let id = SolidId(self.solid_ids.allocate());
        debug_assert!(self.solid_index(id).is_none(), "solid id already present");
        self.solids.push(SolidSlot {
            id,
            solid,
            carried: Vec::new(),
            colliding: Vec::new(),
        });
        id
    }

    /// Removes an actor. Idempotent: removing an absent id is a no-op and
    /// returns false.
    pub fn remove_actor(&mut self, id: ActorId) -> bool {
        let Some(index) = self.actor_index(id) else {
            return false;
        };
        self.actors.remove(index);
        true
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actor_index(id).map(|index| &self.actors[index].actor)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actor_index(id)
            .map(|index| &mut self.actors[index].actor)
    }

    pub fn solid(&self, id: SolidId) -> Option<&Solid> {
        self.solid_index(id).map(|index| &self.solids[index].solid)
    }

    pub fn solid_mut(&mut self, id: SolidId) -> Option<&mut Solid> {
        self.solid_index(id)
            .map(|index| &mut self.solids[index].solid)
    }

    /// Registration-order snapshot of live actor ids. Safe to iterate while
    /// mutating the level, including removals.
    pub fn actor_ids(&self) -> Vec<ActorId> {
        self.actors.iter().map(|slot| slot.id).collect()
    }

    pub fn solid_ids(&self) -> Vec<SolidId> {
        self.solids.iter().map(|slot| slot.id).collect()
    }

    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    pub fn solid_count(&self) -> usize {
        self.solids.len()
    }

    /// Runs each actor's behavior hook once, in registration order, over a
    /// stable id snapshot. A behavior may mutate the level freely, including
    /// removing its own or other actors; removed actors are skipped, and no
    /// survivor is skipped or run twice.
    pub fn update(&mut self, ctx: &TickContext) {
        for id in self.actor_ids() {
            let Some(index) = self.actor_index(id) else {
                continue;
            };
            let Some(mut behavior) = self.actors[index].behavior.take() else {
                continue;
            };
            behavior.update(self, id, ctx);
            if let Some(index) = self.actor_index(id) {
                self.actors[index].behavior = Some(behavior);
            }
        }
    }

    /// Draw pass: solids then actors, both in registration order, one sink
    /// call per entity that carries a renderable.
    pub fn draw(&self, sink: &mut dyn DrawSink) {
        for slot in &self.solids {
            if let Some(desc) = &slot.solid.renderable {
                sink.draw(desc, slot.solid.position);
            }
        }
        for slot in &self.actors {
            if let Some(desc) = &slot.actor.renderable {
                sink.draw(desc, slot.actor.position);
            }
        }
    }

    /// Drains the ids of actors squished since the last call.
    pub fn take_squished(&mut self) -> Vec<ActorId> {
        std::mem::take(&mut self.squished)
    }

    pub(crate) fn actor_index(&self, id: ActorId) -> Option<usize> {
        self.actors.iter().position(|slot| slot.id == id)
    }

    pub(crate) fn solid_index(&self, id: SolidId) -> Option<usize> {
        self.solids.iter().position(|slot| slot.id == id)
    }

    pub(crate) fn log_squish(&mut self, id: ActorId) {
        debug!(actor = id.0, "actor_squished");
        self.squished.push(id);
    }
}
