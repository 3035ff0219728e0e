//! # Ecs — World + System Registry + Lifecycle
//!
//! The [`Ecs`] pairs the [`World`] with an ordered list of systems and keeps
//! each system's entity set equal to the live entities whose signature is a
//! superset of the system's.
//!
//! ```text
//! Ecs
//!  ├─ world:   World              (entities, signatures, components)
//!  ├─ systems: Vec<Registered>    (registration order)
//!  │            ├─ state:  SystemState { name, signature, entities }
//!  │            └─ system: Box<dyn System>
//!  └─ memory:  Arc<MemoryManager>
//! ```
//!
//! ## Phases
//!
//! Initialize, load, update and render visit systems in registration order;
//! unload and terminate visit them back to front. The first failing system
//! aborts the phase and its error is returned. Terminate also deallocates
//! each system once it has terminated successfully.
//!
//! ## Membership
//!
//! Any signature change (through the `Ecs` directly, or by a system mutating
//! the world during a step) is re-evaluated against every system:
//!
//! ```text
//! for each system s:
//!     if sig(e) ⊇ s.signature  → s.add_entity(e)      (no-op if present)
//!     else                     → s.remove_entity(e)   (no-op if absent)
//! ```
//!
//! Deleted entities leave every set. The world entity never joins one.

use std::collections::BTreeSet;
use std::fmt::Display;
use std::sync::Arc;

use super::component::{Component, ComponentKind};
use super::entity::EntityId;
use super::signature::Signature;
use super::system::{System, SystemContext, SystemState};
use super::world::World;
use crate::error::{EcsResult, LifecycleError, Phase, SystemResult};
use crate::event::EventBus;
use crate::memory::MemoryManager;

struct Registered {
    state: SystemState,
    system: Box<dyn System>,
}

/// The entity-component-system kernel.
pub struct Ecs {
    world: World,
    systems: Vec<Registered>,
    memory: Arc<MemoryManager>,
}

impl Ecs {
    /// Create an ECS whose components and systems are accounted in `memory`.
    /// The world entity is allocated here.
    pub fn new(memory: Arc<MemoryManager>) -> Self {
        Self {
            world: World::new(memory.clone()),
            systems: Vec::new(),
            memory,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_id(&self) -> EntityId {
        self.world.world_id()
    }

    pub fn memory(&self) -> &Arc<MemoryManager> {
        &self.memory
    }

    // ── Entities ───────────────────────────────────────────────────────

    pub fn create_entity(&mut self) -> EntityId {
        let id = self.world.create_entity();
        self.sync_systems();
        id
    }

    pub fn delete_entity(&mut self, id: EntityId) -> EcsResult<()> {
        let result = self.world.delete_entity(id);
        self.sync_systems();
        result
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.world.is_alive(id)
    }

    pub fn entity_count(&self) -> usize {
        self.world.entity_count()
    }

    pub fn signature(&self, id: EntityId) -> Option<Signature> {
        self.world.signature(id)
    }

    // ── Components ─────────────────────────────────────────────────────

    pub fn add_component<T: Component>(&mut self, id: EntityId, component: T) -> EcsResult<()> {
        let result = self.world.add_component(id, component);
        self.sync_systems();
        result
    }

    pub fn try_add_component<T: Component, E: Display>(
        &mut self,
        id: EntityId,
        ctor: impl FnOnce() -> Result<T, E>,
    ) -> EcsResult<()> {
        let result = self.world.try_add_component(id, ctor);
        self.sync_systems();
        result
    }

    pub fn adopt_component<T: Component>(&mut self, id: EntityId, component: Box<T>) -> EcsResult<()> {
        let result = self.world.adopt_component(id, component);
        self.sync_systems();
        result
    }

    pub fn remove_component(&mut self, id: EntityId, kind: ComponentKind) -> EcsResult<()> {
        let result = self.world.remove_component(id, kind);
        self.sync_systems();
        result
    }

    pub fn get_component<T: Component>(&self, id: EntityId) -> Option<&T> {
        self.world.get::<T>(id)
    }

    pub fn get_component_mut<T: Component>(&mut self, id: EntityId) -> Option<&mut T> {
        self.world.get_mut::<T>(id)
    }

    pub fn has_component(&self, id: EntityId, kind: ComponentKind) -> bool {
        self.world.has_component(id, kind)
    }

    // ── Systems ────────────────────────────────────────────────────────

    /// Register `system` after every existing one and hand it all live
    /// entities that already match.
    pub fn add_system<S: System>(&mut self, name: impl Into<String>, system: S) {
        let system: Box<dyn System> = self.memory.alloc(system);
        let mut state = SystemState::new(name.into(), system.signature());
        let world_id = self.world.world_id();
        for id in self.world.entities() {
            if id == world_id {
                continue;
            }
            if self.world.signature(id).is_some_and(|sig| sig.matches(state.signature())) {
                state.add_entity(id);
            }
        }
        log::info!(
            "registered system `{}` ({:?}, {} entities)",
            state.name(),
            state.signature(),
            state.entities().len()
        );
        self.systems.push(Registered { state, system });
    }

    /// The state of the system registered under `name`.
    pub fn system(&self, name: &str) -> Option<&SystemState> {
        self.systems
            .iter()
            .map(|registered| &registered.state)
            .find(|state| state.name() == name)
    }

    /// The entity set of the system registered under `name`.
    pub fn system_entities(&self, name: &str) -> Option<&BTreeSet<EntityId>> {
        self.system(name).map(SystemState::entities)
    }

    /// Names in registration order.
    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|r| r.state.name()).collect()
    }

    pub fn system_count(&self) -> usize {
        self.systems.len()
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    pub fn initialize(&mut self, events: &mut EventBus) -> Result<(), LifecycleError> {
        self.run_phase(Phase::Initialize, events, |system, ctx| system.initialize(ctx))
    }

    pub fn load(&mut self, events: &mut EventBus) -> Result<(), LifecycleError> {
        self.run_phase(Phase::Load, events, |system, ctx| system.load(ctx))
    }

    pub fn update(&mut self, dt: f32, events: &mut EventBus) -> Result<(), LifecycleError> {
        self.run_phase(Phase::Update, events, |system, ctx| system.update(ctx, dt))
    }

    pub fn render(&mut self, events: &mut EventBus) -> Result<(), LifecycleError> {
        self.run_phase(Phase::Render, events, |system, ctx| system.render(ctx))
    }

    pub fn unload(&mut self, events: &mut EventBus) -> Result<(), LifecycleError> {
        self.run_phase(Phase::Unload, events, |system, ctx| system.unload(ctx))
    }

    /// Terminate systems back to front, deallocating each one that succeeds.
    /// On failure the failing system and everything registered before it
    /// stay in the registry.
    pub fn terminate(&mut self, events: &mut EventBus) -> Result<(), LifecycleError> {
        while let Some(index) = self.systems.len().checked_sub(1) {
            self.run_step(index, Phase::Terminate, events, &mut |system, ctx| {
                system.terminate(ctx)
            })?;
            if let Some(registered) = self.systems.pop() {
                log::info!("terminated system `{}`", registered.state.name());
                self.memory.dealloc(registered.system);
            }
        }
        Ok(())
    }

    fn run_phase(
        &mut self,
        phase: Phase,
        events: &mut EventBus,
        mut step: impl FnMut(&mut dyn System, &mut SystemContext<'_>) -> SystemResult,
    ) -> Result<(), LifecycleError> {
        let count = self.systems.len();
        let order: Vec<usize> = if phase.is_reverse() {
            (0..count).rev().collect()
        } else {
            (0..count).collect()
        };
        for index in order {
            self.run_step(index, phase, events, &mut step)?;
        }
        if !matches!(phase, Phase::Update | Phase::Render) {
            log::info!("{phase} complete ({count} systems)");
        }
        Ok(())
    }

    fn run_step(
        &mut self,
        index: usize,
        phase: Phase,
        events: &mut EventBus,
        step: &mut dyn FnMut(&mut dyn System, &mut SystemContext<'_>) -> SystemResult,
    ) -> Result<(), LifecycleError> {
        let registered = &mut self.systems[index];
        let result = {
            let mut ctx = SystemContext {
                world: &mut self.world,
                entities: registered.state.entities(),
                events,
            };
            step(registered.system.as_mut(), &mut ctx)
        };
        match (&result, phase) {
            (Ok(()), Phase::Initialize) => registered.state.set_initialized(true),
            (Ok(()), Phase::Terminate) => registered.state.set_initialized(false),
            _ => {}
        }
        let name = registered.state.name().to_owned();
        self.sync_systems();
        result.map_err(|source| {
            let err = LifecycleError {
                system: name,
                phase,
                source,
            };
            log::error!("{err}");
            err
        })
    }

    /// Re-evaluate membership for every entity the world marked dirty.
    fn sync_systems(&mut self) {
        let world_id = self.world.world_id();
        for id in self.world.take_dirty() {
            if id == world_id {
                continue;
            }
            match self.world.signature(id) {
                Some(sig) if self.world.is_alive(id) => {
                    for registered in &mut self.systems {
                        let state = &mut registered.state;
                        if sig.matches(state.signature()) {
                            if !state.contains(id) {
                                state.add_entity(id);
                            }
                        } else if state.contains(id) {
                            state.remove_entity(id);
                        }
                    }
                }
                _ => {
                    for registered in &mut self.systems {
                        if registered.state.contains(id) {
                            registered.state.remove_entity(id);
                        }
                    }
                }
            }
        }
    }
}

impl Drop for Ecs {
    fn drop(&mut self) {
        // Systems that were never terminated are still owned here.
        while let Some(registered) = self.systems.pop() {
            self.memory.dealloc(registered.system);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::error::SystemError;

    #[derive(Debug, PartialEq, Default)]
    struct Pos(f32);
    impl Component for Pos {
        const KIND: ComponentKind = ComponentKind::Transform;
    }

    #[derive(Debug, Default)]
    struct Vel(f32);
    impl Component for Vel {
        const KIND: ComponentKind = ComponentKind::Physics;
    }

    #[derive(Debug, Default)]
    struct Model;
    impl Component for Model {
        const KIND: ComponentKind = ComponentKind::Mesh;
    }

    type Journal = Rc<RefCell<Vec<String>>>;

    /// Records every lifecycle call; optionally fails one phase.
    struct Probe {
        tag: &'static str,
        signature: Signature,
        journal: Journal,
        fail_on: Option<Phase>,
    }

    impl Probe {
        fn new(tag: &'static str, kinds: &[ComponentKind], journal: &Journal) -> Self {
            Self {
                tag,
                signature: Signature::of(kinds),
                journal: journal.clone(),
                fail_on: None,
            }
        }

        fn record(&self, phase: Phase) -> SystemResult {
            self.journal.borrow_mut().push(format!("{}:{phase}", self.tag));
            if self.fail_on == Some(phase) {
                return Err(SystemError::Failed(format!("{} refused", self.tag)));
            }
            Ok(())
        }
    }

    impl System for Probe {
        fn signature(&self) -> Signature {
            self.signature
        }
        fn initialize(&mut self, _: &mut SystemContext<'_>) -> SystemResult {
            self.record(Phase::Initialize)
        }
        fn load(&mut self, _: &mut SystemContext<'_>) -> SystemResult {
            self.record(Phase::Load)
        }
        fn update(&mut self, _: &mut SystemContext<'_>, _: f32) -> SystemResult {
            self.record(Phase::Update)
        }
        fn render(&mut self, _: &mut SystemContext<'_>) -> SystemResult {
            self.record(Phase::Render)
        }
        fn unload(&mut self, _: &mut SystemContext<'_>) -> SystemResult {
            self.record(Phase::Unload)
        }
        fn terminate(&mut self, _: &mut SystemContext<'_>) -> SystemResult {
            self.record(Phase::Terminate)
        }
    }

    /// Moves every matching entity by its velocity.
    struct Integrate;
    impl System for Integrate {
        fn signature(&self) -> Signature {
            Signature::of(&[ComponentKind::Transform, ComponentKind::Physics])
        }
        fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) -> SystemResult {
            for &id in ctx.entities {
                let v = ctx.world.get::<Vel>(id).map(|v| v.0).unwrap_or_default();
                if let Some(p) = ctx.world.get_mut::<Pos>(id) {
                    p.0 += v;
                }
            }
            Ok(())
        }
    }

    /// Strips the velocity off every entity it sees.
    struct Brake;
    impl System for Brake {
        fn signature(&self) -> Signature {
            Signature::of(&[ComponentKind::Physics])
        }
        fn update(&mut self, ctx: &mut SystemContext<'_>, _dt: f32) -> SystemResult {
            let ids: Vec<_> = ctx.entities.iter().copied().collect();
            for id in ids {
                ctx.world.remove_component(id, ComponentKind::Physics).ok();
            }
            Ok(())
        }
    }

    fn ecs() -> Ecs {
        Ecs::new(Arc::new(MemoryManager::new()))
    }

    fn journal() -> Journal {
        Rc::new(RefCell::new(Vec::new()))
    }

    /// Membership equals the superset rule for every system and live entity.
    fn assert_membership(ecs: &Ecs) {
        for registered in &ecs.systems {
            let expected: BTreeSet<_> = ecs
                .world
                .entities()
                .into_iter()
                .filter(|&id| id != ecs.world_id())
                .filter(|&id| {
                    ecs.signature(id)
                        .is_some_and(|sig| sig.matches(registered.state.signature()))
                })
                .collect();
            assert_eq!(registered.state.entities(), &expected, "{}", registered.state.name());
        }
    }

    #[test]
    fn ids_are_recycled_fifo() {
        let mut ecs = ecs();
        let first: Vec<_> = (0..3).map(|_| ecs.create_entity()).collect();
        assert_eq!(first, vec![1, 2, 3]);
        for &id in &first {
            ecs.delete_entity(id).unwrap();
        }
        let again: Vec<_> = (0..3).map(|_| ecs.create_entity()).collect();
        assert_eq!(again, vec![1, 2, 3]);
        assert_eq!(ecs.create_entity(), 4);
        assert_eq!(ecs.create_entity(), 5);
    }

    #[test]
    fn add_system_sweeps_existing_entities() {
        let mut ecs = ecs();
        let journal = journal();
        let a = ecs.create_entity();
        ecs.add_component(a, Model).unwrap();
        ecs.add_component(a, Pos(0.0)).unwrap();
        let b = ecs.create_entity();
        ecs.add_component(b, Pos(0.0)).unwrap();

        ecs.add_system(
            "render",
            Probe::new("r", &[ComponentKind::Mesh, ComponentKind::Transform], &journal),
        );
        let members = ecs.system_entities("render").unwrap();
        assert!(members.contains(&a));
        assert!(!members.contains(&b));
        assert_membership(&ecs);
    }

    #[test]
    fn membership_follows_signature_changes() {
        let mut ecs = ecs();
        let journal = journal();
        ecs.add_system("move", Probe::new("m", &[ComponentKind::Transform, ComponentKind::Physics], &journal));
        ecs.add_system("pos", Probe::new("p", &[ComponentKind::Transform], &journal));

        let e = ecs.create_entity();
        ecs.add_component(e, Pos(0.0)).unwrap();
        assert_membership(&ecs);
        assert!(!ecs.system_entities("move").unwrap().contains(&e));

        ecs.add_component(e, Vel(1.0)).unwrap();
        assert!(ecs.system_entities("move").unwrap().contains(&e));
        assert_membership(&ecs);

        ecs.remove_component(e, ComponentKind::Transform).unwrap();
        assert!(ecs.system_entities("move").unwrap().is_empty());
        assert!(ecs.system_entities("pos").unwrap().is_empty());
        assert_membership(&ecs);

        ecs.add_component(e, Pos(2.0)).unwrap();
        ecs.delete_entity(e).unwrap();
        assert!(ecs.system_entities("move").unwrap().is_empty());
        assert_membership(&ecs);
    }

    #[test]
    fn empty_signature_system_never_sees_world_entity() {
        let mut ecs = ecs();
        let journal = journal();
        ecs.add_system("all", Probe::new("a", &[], &journal));
        let e = ecs.create_entity();
        ecs.adopt_component(ecs.world_id(), Box::new(Pos(0.0))).unwrap();

        let members = ecs.system_entities("all").unwrap();
        assert_eq!(members.iter().copied().collect::<Vec<_>>(), vec![e]);
    }

    #[test]
    fn phases_run_forward_then_reverse() {
        let mut ecs = ecs();
        let journal = journal();
        ecs.add_system("one", Probe::new("1", &[], &journal));
        ecs.add_system("two", Probe::new("2", &[], &journal));
        let mut events = EventBus::new();

        ecs.initialize(&mut events).unwrap();
        ecs.load(&mut events).unwrap();
        ecs.update(0.0, &mut events).unwrap();
        ecs.render(&mut events).unwrap();
        ecs.unload(&mut events).unwrap();
        ecs.terminate(&mut events).unwrap();

        let expected = [
            "1:initialize", "2:initialize", "1:load", "2:load", "1:update", "2:update",
            "1:render", "2:render", "2:unload", "1:unload", "2:terminate", "1:terminate",
        ];
        assert_eq!(*journal.borrow(), expected);
        assert_eq!(ecs.system_count(), 0);
    }

    #[test]
    fn failing_system_aborts_phase() {
        let mut ecs = ecs();
        let journal = journal();
        ecs.add_system("one", Probe::new("1", &[], &journal));
        let mut failing = Probe::new("2", &[], &journal);
        failing.fail_on = Some(Phase::Load);
        ecs.add_system("two", failing);
        ecs.add_system("three", Probe::new("3", &[], &journal));
        let mut events = EventBus::new();

        ecs.initialize(&mut events).unwrap();
        journal.borrow_mut().clear();
        let err = ecs.load(&mut events).unwrap_err();
        assert_eq!(err.system, "two");
        assert_eq!(err.phase, Phase::Load);
        assert_eq!(*journal.borrow(), ["1:load", "2:load"]);
        assert!(ecs.system("three").unwrap().is_initialized());
    }

    #[test]
    fn terminate_deallocates_systems() {
        let memory = Arc::new(MemoryManager::new());
        let mut ecs = Ecs::new(memory.clone());
        let journal = journal();
        ecs.add_system("one", Probe::new("1", &[], &journal));
        ecs.add_system("two", Probe::new("2", &[], &journal));
        assert_eq!(memory.in_use(), 2 * std::mem::size_of::<Probe>());

        let mut events = EventBus::new();
        ecs.initialize(&mut events).unwrap();
        ecs.terminate(&mut events).unwrap();
        assert_eq!(memory.in_use(), 0);
        assert!(ecs.system_names().is_empty());
    }

    #[test]
    fn failing_terminate_keeps_remaining_systems() {
        let mut ecs = ecs();
        let journal = journal();
        let mut failing = Probe::new("1", &[], &journal);
        failing.fail_on = Some(Phase::Terminate);
        ecs.add_system("one", failing);
        ecs.add_system("two", Probe::new("2", &[], &journal));

        let mut events = EventBus::new();
        assert!(ecs.terminate(&mut events).is_err());
        assert_eq!(ecs.system_names(), vec!["one"]);
    }

    #[test]
    fn systems_see_component_writes_from_earlier_systems() {
        let mut ecs = ecs();
        ecs.add_system("integrate", Integrate);
        let e = ecs.create_entity();
        ecs.add_component(e, Pos(1.0)).unwrap();
        ecs.add_component(e, Vel(0.5)).unwrap();

        let mut events = EventBus::new();
        ecs.update(0.0, &mut events).unwrap();
        ecs.update(0.0, &mut events).unwrap();
        assert_eq!(ecs.get_component::<Pos>(e), Some(&Pos(2.0)));
    }

    #[test]
    fn signature_changes_inside_a_step_resync_membership() {
        let mut ecs = ecs();
        ecs.add_system("brake", Brake);
        ecs.add_system("integrate", Integrate);
        let e = ecs.create_entity();
        ecs.add_component(e, Pos(1.0)).unwrap();
        ecs.add_component(e, Vel(0.5)).unwrap();
        assert!(ecs.system_entities("integrate").unwrap().contains(&e));

        let mut events = EventBus::new();
        ecs.update(0.0, &mut events).unwrap();
        // Brake ran first and removed Physics, so Integrate no longer saw it.
        assert_eq!(ecs.get_component::<Pos>(e), Some(&Pos(1.0)));
        assert!(ecs.system_entities("integrate").unwrap().is_empty());
        assert_membership(&ecs);
    }

    #[test]
    fn teardown_returns_all_memory() {
        let memory = Arc::new(MemoryManager::new());
        {
            let mut ecs = Ecs::new(memory.clone());
            ecs.add_system("integrate", Integrate);
            for _ in 0..4 {
                let e = ecs.create_entity();
                ecs.add_component(e, Pos(0.0)).unwrap();
                ecs.add_component(e, Vel(0.0)).unwrap();
            }
            let doomed = ecs.create_entity();
            ecs.add_component(doomed, Model).unwrap();
            ecs.delete_entity(doomed).unwrap();
        }
        assert_eq!(memory.in_use(), 0);
    }
}
