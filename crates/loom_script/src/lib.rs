//! # loom_script
//!
//! Behavior objects ("scripts") attached to entities as ordinary component
//! data. A script is a trait object polymorphic over a small capability set
//! — setup, event, update, collision, destruction — and the store treats it
//! like any other component: it is deep-cloned when its entity is cloned
//! and dropped when its entity is despawned.
//!
//! Scripts receive `&mut World` in every hook, so the dispatching layer must
//! first move the script out of the store (see the driver in `loom_app`);
//! the store itself neither knows nor cares what a script does.

use loom_ecs::{Component, Entity, World};

/// A key identifier delivered with keyboard events.
///
/// The store does not interpret key codes; they are opaque values supplied
/// by whatever polls the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u32);

/// An input event delivered to scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// A key was pressed.
    KeyDown(KeyCode),
    /// A key was released.
    KeyUp(KeyCode),
    /// The application was asked to quit.
    Quit,
}

/// Clone plumbing for boxed scripts.
///
/// Blanket-implemented for every `Script + Clone`, giving
/// `Box<dyn Script>` a deep `Clone` so [`ScriptComponent`] can satisfy
/// [`Component`] and ride the store's ordinary clone thunk.
pub trait CloneScript {
    /// Clone `self` into a fresh box.
    fn clone_boxed(&self) -> Box<dyn Script>;
}

impl<T: Script + Clone> CloneScript for T {
    fn clone_boxed(&self) -> Box<dyn Script> {
        Box::new(self.clone())
    }
}

impl Clone for Box<dyn Script> {
    fn clone(&self) -> Self {
        self.as_ref().clone_boxed()
    }
}

/// Per-entity behavior. All hooks default to no-ops; implement the ones the
/// behavior needs.
///
/// `self_id` is the entity the script is attached to. The script has been
/// moved out of the store for the duration of the call, so it may freely
/// mutate the world — including despawning its own entity.
pub trait Script: CloneScript + 'static {
    /// Called once when the script is attached.
    fn on_setup(&mut self, _self_id: Entity, _world: &mut World) {}

    /// Called for every polled input event.
    fn on_event(&mut self, _self_id: Entity, _world: &mut World, _event: &Event) {}

    /// Called once per fixed simulation tick.
    fn on_update(&mut self, _self_id: Entity, _world: &mut World, _dt: f32) {}

    /// Called when the entity collides with another.
    fn on_collision(&mut self, _self_id: Entity, _world: &mut World, _other: Entity) {}

    /// Called just before the entity is despawned.
    fn on_destroyed(&mut self, _self_id: Entity, _world: &mut World) {}
}

/// The component wrapper storing a boxed [`Script`] on an entity.
#[derive(Clone)]
pub struct ScriptComponent {
    script: Box<dyn Script>,
}

impl ScriptComponent {
    /// Wrap a script for attachment to an entity.
    #[must_use]
    pub fn new(script: impl Script) -> Self {
        Self {
            script: Box::new(script),
        }
    }

    /// Forward the setup hook.
    pub fn on_setup(&mut self, self_id: Entity, world: &mut World) {
        self.script.on_setup(self_id, world);
    }

    /// Forward an input event.
    pub fn on_event(&mut self, self_id: Entity, world: &mut World, event: &Event) {
        self.script.on_event(self_id, world, event);
    }

    /// Forward a fixed-tick update.
    pub fn on_update(&mut self, self_id: Entity, world: &mut World, dt: f32) {
        self.script.on_update(self_id, world, dt);
    }

    /// Forward a collision notification.
    pub fn on_collision(&mut self, self_id: Entity, world: &mut World, other: Entity) {
        self.script.on_collision(self_id, world, other);
    }

    /// Forward the destruction hook.
    pub fn on_destroyed(&mut self, self_id: Entity, world: &mut World) {
        self.script.on_destroyed(self_id, world);
    }
}

impl std::fmt::Debug for ScriptComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptComponent").finish_non_exhaustive()
    }
}

impl Component for ScriptComponent {
    fn type_name() -> &'static str {
        "Script"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Counter {
        value: u32,
    }
    impl Component for Counter {
        fn type_name() -> &'static str {
            "Counter"
        }
    }

    /// Advances internal state every update and mirrors it into the
    /// entity's counter component.
    #[derive(Debug, Clone)]
    struct Ticker {
        local_ticks: u32,
    }
    impl Script for Ticker {
        fn on_update(&mut self, self_id: Entity, world: &mut World, _dt: f32) {
            self.local_ticks += 1;
            if let Ok(counter) = world.get_mut::<Counter>(self_id) {
                counter.value = self.local_ticks;
            }
        }
    }

    #[test]
    fn test_script_mutates_world_through_hook() {
        let mut world = World::new();
        let e = world.spawn();
        world.emplace(e, Counter { value: 0 }).unwrap();

        let mut script = ScriptComponent::new(Ticker { local_ticks: 0 });
        script.on_update(e, &mut world, 0.016);
        script.on_update(e, &mut world, 0.016);

        assert_eq!(world.get::<Counter>(e).unwrap().value, 2);
    }

    #[test]
    fn test_boxed_script_clone_is_deep() {
        let mut world = World::new();
        let a = world.spawn();
        let b = world.spawn();
        world.emplace(a, Counter { value: 0 }).unwrap();
        world.emplace(b, Counter { value: 0 }).unwrap();

        let mut original = ScriptComponent::new(Ticker { local_ticks: 0 });
        let mut copy = original.clone();

        // Tick the copy twice, the original once. Each mirrors its OWN
        // internal tick count, so shared state would show up as 3.
        copy.on_update(b, &mut world, 0.016);
        copy.on_update(b, &mut world, 0.016);
        original.on_update(a, &mut world, 0.016);

        assert_eq!(world.get::<Counter>(b).unwrap().value, 2);
        assert_eq!(world.get::<Counter>(a).unwrap().value, 1);
    }

    #[test]
    fn test_cloned_entity_gets_independent_script_state() {
        let mut world = World::new();
        let source = world.spawn();
        world.emplace(source, Counter { value: 0 }).unwrap();
        world
            .emplace(source, ScriptComponent::new(Ticker { local_ticks: 0 }))
            .unwrap();

        let clone = world.clone_entity(source).unwrap();
        assert!(world.has::<ScriptComponent>(clone));

        // Drive only the clone's script; the source's counter stays put.
        let mut script = world.take::<ScriptComponent>(clone).unwrap();
        script.on_update(clone, &mut world, 0.016);
        world.emplace(clone, script).unwrap();

        assert_eq!(world.get::<Counter>(clone).unwrap().value, 1);
        assert_eq!(world.get::<Counter>(source).unwrap().value, 0);
    }
}
