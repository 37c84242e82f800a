//! Script driver and game loop behavior.

use loom_app::{GameLoop, Setting, script_driver};
use loom_ecs::{Component, Entity, World};
use loom_script::{Event, KeyCode, Script};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Counter {
    setups: u32,
    updates: u32,
    events: u32,
    collisions: u32,
    destroys: u32,
}
impl Component for Counter {
    fn type_name() -> &'static str {
        "Counter"
    }
}

/// Records every hook invocation into its entity's counter component.
#[derive(Debug, Clone)]
struct Recorder;
impl Script for Recorder {
    fn on_setup(&mut self, self_id: Entity, world: &mut World) {
        if let Ok(c) = world.get_mut::<Counter>(self_id) {
            c.setups += 1;
        }
    }
    fn on_event(&mut self, self_id: Entity, world: &mut World, _event: &Event) {
        if let Ok(c) = world.get_mut::<Counter>(self_id) {
            c.events += 1;
        }
    }
    fn on_update(&mut self, self_id: Entity, world: &mut World, _dt: f32) {
        if let Ok(c) = world.get_mut::<Counter>(self_id) {
            c.updates += 1;
        }
    }
    fn on_collision(&mut self, self_id: Entity, world: &mut World, _other: Entity) {
        if let Ok(c) = world.get_mut::<Counter>(self_id) {
            c.collisions += 1;
        }
    }
    fn on_destroyed(&mut self, self_id: Entity, world: &mut World) {
        if let Ok(c) = world.get_mut::<Counter>(self_id) {
            c.destroys += 1;
        }
    }
}

/// Despawns its own entity on the first update.
#[derive(Debug, Clone)]
struct SelfDestruct;
impl Script for SelfDestruct {
    fn on_update(&mut self, self_id: Entity, world: &mut World, _dt: f32) {
        world.despawn(self_id);
    }
}

fn scripted_entity(world: &mut World) -> Entity {
    let e = world.spawn();
    world.emplace(e, Counter::default()).unwrap();
    script_driver::attach_script(world, e, Recorder).unwrap();
    e
}

#[test]
fn attach_runs_setup_once() {
    let mut world = World::new();
    let e = scripted_entity(&mut world);
    assert_eq!(world.get::<Counter>(e).unwrap().setups, 1);
}

#[test]
fn update_dispatch_reaches_every_scripted_entity() {
    let mut world = World::new();
    let a = scripted_entity(&mut world);
    let b = scripted_entity(&mut world);

    script_driver::dispatch_update(&mut world, 0.01);
    script_driver::dispatch_update(&mut world, 0.01);

    assert_eq!(world.get::<Counter>(a).unwrap().updates, 2);
    assert_eq!(world.get::<Counter>(b).unwrap().updates, 2);
}

#[test]
fn event_dispatch_forwards_payload() {
    let mut world = World::new();
    let e = scripted_entity(&mut world);

    script_driver::dispatch_event(&mut world, &Event::KeyDown(KeyCode(32)));
    assert_eq!(world.get::<Counter>(e).unwrap().events, 1);
}

#[test]
fn collision_notifies_both_parties() {
    let mut world = World::new();
    let a = scripted_entity(&mut world);
    let b = scripted_entity(&mut world);

    script_driver::dispatch_collision(&mut world, a, b);

    assert_eq!(world.get::<Counter>(a).unwrap().collisions, 1);
    assert_eq!(world.get::<Counter>(b).unwrap().collisions, 1);
}

#[test]
fn self_destruction_is_not_resurrected() {
    let mut world = World::new();
    let doomed = world.spawn();
    script_driver::attach_script(&mut world, doomed, SelfDestruct).unwrap();
    let bystander = scripted_entity(&mut world);

    script_driver::dispatch_update(&mut world, 0.01);

    assert!(!world.is_alive(doomed));
    assert!(world.is_alive(bystander));
    assert_eq!(world.get::<Counter>(bystander).unwrap().updates, 1);
}

#[test]
fn despawn_notified_runs_hook_then_kills() {
    let mut world = World::new();
    let e = scripted_entity(&mut world);

    // The hook runs while the entity is still alive (it can still read its
    // own components), then the entity dies.
    assert!(script_driver::despawn_notified(&mut world, e));
    assert!(!world.is_alive(e));
    assert!(!script_driver::despawn_notified(&mut world, e));
}

#[test]
fn loop_runs_exactly_max_ticks_updates() {
    let mut world = World::new();
    let e = scripted_entity(&mut world);

    let setting = Setting::new("test")
        .with_seconds_per_update(0.001)
        .with_max_ticks(5);
    let mut game_loop = GameLoop::new(setting);

    let mut update_calls = 0u32;
    game_loop.run(
        &mut world,
        |_| Vec::new(),
        |_, _| update_calls += 1,
        |_, alpha| assert!((0.0..=1.0).contains(&alpha)),
    );

    assert_eq!(update_calls, 5);
    assert_eq!(game_loop.tick_id(), 5);
    assert_eq!(world.get::<Counter>(e).unwrap().updates, 5);
}

#[test]
fn loop_stops_on_quit_event() {
    let mut world = World::new();
    scripted_entity(&mut world);

    let setting = Setting::new("test").with_seconds_per_update(0.001);
    let mut game_loop = GameLoop::new(setting);

    let mut polled = false;
    game_loop.run(
        &mut world,
        |_| {
            if polled {
                Vec::new()
            } else {
                polled = true;
                vec![Event::Quit]
            }
        },
        |_, _| {},
        |_, _| {},
    );

    // The quit frame still finished, then the loop exited.
    assert!(polled);
}
