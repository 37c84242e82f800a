//! Script dispatch over the store.
//!
//! Hooks receive `&mut World`, but the script lives *inside* that world, so
//! every dispatch follows the same protocol: snapshot the query result, move
//! the script component out of the store, run the hook, then reattach —
//! unless the hook despawned its own entity or attached a replacement
//! script in the meantime.

use loom_ecs::{Entity, StoreError, World};
use loom_script::{Event, Script, ScriptComponent};
use tracing::debug;

/// Move the entity's script out, run `hook` with full world access, and
/// reattach afterwards. Entities despawned inside the hook stay dead.
fn with_script<F>(world: &mut World, entity: Entity, hook: F)
where
    F: FnOnce(&mut ScriptComponent, &mut World),
{
    let Ok(mut script) = world.take::<ScriptComponent>(entity) else {
        // Despawned or detached by an earlier hook in the same dispatch.
        return;
    };
    hook(&mut script, world);
    if world.is_alive(entity) && !world.has::<ScriptComponent>(entity) {
        if let Err(err) = world.emplace(entity, script) {
            debug!(entity = %entity, %err, "script reattach failed");
        }
    }
}

/// Attach a script to an entity and run its setup hook.
pub fn attach_script(
    world: &mut World,
    entity: Entity,
    script: impl Script,
) -> Result<(), StoreError> {
    world.emplace(entity, ScriptComponent::new(script))?;
    with_script(world, entity, |script, world| {
        script.on_setup(entity, world);
    });
    Ok(())
}

/// Deliver one input event to every scripted entity.
pub fn dispatch_event(world: &mut World, event: &Event) {
    for entity in world.query::<(ScriptComponent,)>() {
        with_script(world, entity, |script, world| {
            script.on_event(entity, world, event);
        });
    }
}

/// Run the fixed-tick update hook on every scripted entity.
pub fn dispatch_update(world: &mut World, dt: f32) {
    for entity in world.query::<(ScriptComponent,)>() {
        with_script(world, entity, |script, world| {
            script.on_update(entity, world, dt);
        });
    }
}

/// Notify both parties of a collision. Either script may despawn either
/// entity; the second notification is skipped if its target died.
pub fn dispatch_collision(world: &mut World, a: Entity, b: Entity) {
    with_script(world, a, |script, world| {
        script.on_collision(a, world, b);
    });
    with_script(world, b, |script, world| {
        script.on_collision(b, world, a);
    });
}

/// Run the entity's destruction hook, then despawn it.
///
/// Returns `false` if the entity was already dead.
pub fn despawn_notified(world: &mut World, entity: Entity) -> bool {
    with_script(world, entity, |script, world| {
        script.on_destroyed(entity, world);
    });
    world.despawn(entity)
}
