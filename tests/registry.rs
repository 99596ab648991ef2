use anyhow::{bail, Result};
use skirmish::{
    ecs::{
        BatchSystem, Commands, Component, Components, DispatchError, Entity, EntitySet,
        EntitySystem, Registry, RegistryError, SystemCatalog, SystemContext, SystemRegistration,
    },
    headless::Harness,
};

#[derive(Debug, Default, PartialEq)]
struct Health(u32);
impl Component for Health {}

#[derive(Debug, Default)]
struct Armor;
impl Component for Armor {}

#[test]
fn define_is_identity_stable() {
    let mut registry = Registry::default();
    let mut entity = registry.create_entity();

    let first: *const Health = {
        let health = entity.define::<Health>();
        health.0 = 7;
        health
    };
    let second: *const Health = entity.define::<Health>();

    assert_eq!(first, second);
    assert_eq!(entity.get::<Health>(), Some(&Health(7)));
}

#[test]
fn absent_component_reads_as_absent() {
    let mut registry = Registry::default();
    let id = registry
        .spawn(Components::new().with(Health(3)))
        .expect("spawn");
    let entity = registry.entity(id).expect("entity is live");

    assert!(entity.get::<Armor>().is_none());
    assert!(!entity.has::<Armor>());
    assert!(entity.has::<Health>());
}

#[test]
fn lifecycle_errors_do_not_corrupt_the_set() {
    let mut registry = Registry::default();
    let a = registry.spawn(Components::new()).expect("spawn a");
    let b = registry.spawn(Components::new()).expect("spawn b");

    assert_eq!(
        registry.add_entity(Entity::new(a)),
        Err(RegistryError::DuplicateEntity(a))
    );
    registry.remove_entity(a).expect("remove a");
    assert!(matches!(
        registry.remove_entity(a),
        Err(RegistryError::UnknownEntity(id)) if id == a
    ));
    assert_eq!(registry.entities().ids(), vec![b]);
}

#[derive(Default)]
struct Heal;

impl EntitySystem for Heal {
    fn execute(
        &mut self,
        _ctx: &mut SystemContext<'_>,
        entity: &mut Entity,
        _commands: &mut Commands,
    ) -> Result<()> {
        if let Some(health) = entity.get_mut::<Health>() {
            health.0 += 1;
        }
        Ok(())
    }
}

struct NotRegistered;

#[test]
fn executing_an_unregistered_type_is_a_noop() {
    let mut registry =
        Registry::initialize(SystemCatalog::new().per_entity::<Heal>()).expect("initialize");
    let id = registry
        .spawn(Components::new().with(Health(1)))
        .expect("spawn");
    let mut harness = Harness::new();

    registry
        .execute::<NotRegistered>(&mut harness.context(1, 1.0))
        .expect("no-op");
    assert_eq!(registry.entity(id).and_then(|e| e.get::<Health>()), Some(&Health(1)));

    registry
        .execute::<Heal>(&mut harness.context(1, 1.0))
        .expect("heal");
    assert_eq!(registry.entity(id).and_then(|e| e.get::<Health>()), Some(&Health(2)));
}

struct Faulty;

impl BatchSystem for Faulty {
    fn execute(
        &mut self,
        ctx: &mut SystemContext<'_>,
        _entities: &mut EntitySet,
        commands: &mut Commands,
    ) -> Result<()> {
        commands.spawn(Components::new());
        bail!("sensor offline at tick {}", ctx.tick)
    }
}

#[test]
fn system_failure_names_the_system_and_discards_its_commands() {
    let catalog = SystemCatalog::new().register(SystemRegistration::batch_with(|| Faulty));
    let mut registry = Registry::initialize(catalog).expect("initialize");
    let mut harness = Harness::new();

    let err = registry
        .execute::<Faulty>(&mut harness.context(4, 1.0))
        .unwrap_err();

    match &err {
        DispatchError::System { system, source } => {
            assert_eq!(*system, "Faulty");
            assert!(source.to_string().contains("tick 4"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(registry.entity_count(), 0);
}
