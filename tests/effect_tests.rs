//! Effect application and tick integration tests.
//!
//! These tests drive characters through the public API only: build
//! definitions, create outgoing specs, apply them and tick.

use std::sync::Arc;

use proptest::prelude::*;
use rust_gas::attributes::{AttributeId, ClampAttribute};
use rust_gas::character::Character;
use rust_gas::core::CharacterId;
use rust_gas::effects::{Curve, EffectDefinition, EffectModifier, Magnitude, ModifierOperator};
use rust_gas::tags::TagId;

const HEALTH: AttributeId = AttributeId::new(0);
const MAX_HEALTH: AttributeId = AttributeId::new(1);
const POWER: AttributeId = AttributeId::new(2);

const BURNING: TagId = TagId::new(1);

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn character(id: u32) -> Character {
    let mut character = Character::new(CharacterId::new(id));
    character.attributes_mut().add_attribute(HEALTH, 10.0);
    character.attributes_mut().add_attribute(MAX_HEALTH, 100.0);
    character.attributes_mut().add_attribute(POWER, 0.0);
    character
}

fn apply(character: &mut Character, definition: EffectDefinition) -> bool {
    let spec = character.make_outgoing_spec(Arc::new(definition), None);
    character.apply_effect_spec_to_self(spec)
}

/// Instant +5 on base 10 moves both base and (after a tick) current to 15.
#[test]
fn test_instant_add_changes_base_and_current() {
    init_tracing();
    let mut hero = character(1);

    assert!(apply(&mut hero, EffectDefinition::instant("Heal").with_modifier(EffectModifier::add(HEALTH, 5.0))));
    assert_eq!(hero.attributes().base_value(HEALTH), Some(15.0));

    hero.tick(0.016);
    assert_eq!(hero.attributes().current_value(HEALTH), Some(15.0));
    assert!(hero.active_effects().is_empty());
}

/// A durational +3 contributes to current but never to base.
#[test]
fn test_durational_add_with_multiply() {
    init_tracing();
    let mut hero = character(1);

    apply(
        &mut hero,
        EffectDefinition::has_duration("Might", 5.0)
            .with_modifier(EffectModifier::add(HEALTH, 3.0))
            .with_modifier(EffectModifier::multiply(HEALTH, 0.5)),
    );
    let summary = hero.tick(1.0);

    // (10 + 3) * (1 + 0.5)
    assert_eq!(hero.attributes().current_value(HEALTH), Some(19.5));
    assert_eq!(hero.attributes().base_value(HEALTH), Some(10.0));
    assert_eq!(summary.removed, 0);
    assert_eq!(hero.active_effects().len(), 1);
}

/// A 2 second effect ticked by 2.5 seconds is gone after that tick.
#[test]
fn test_has_duration_culled() {
    init_tracing();
    let mut hero = character(1);
    apply(&mut hero, EffectDefinition::has_duration("Haste", 2.0).with_modifier(EffectModifier::add(POWER, 1.0)));
    assert_eq!(hero.active_effects()[0].spec.duration_remaining(), 2.0);

    let summary = hero.tick(2.5);

    assert_eq!(summary.removed, 1);
    assert!(hero.active_effects().is_empty());
}

/// Infinite effects survive any amount of time.
#[test]
fn test_infinite_never_culled() {
    let mut hero = character(1);
    apply(&mut hero, EffectDefinition::infinite("Aura").with_modifier(EffectModifier::add(POWER, 1.0)));

    for _ in 0..50 {
        hero.tick(100.0);
    }
    assert_eq!(hero.active_effects().len(), 1);
    assert_eq!(hero.attributes().current_value(POWER), Some(1.0));

    assert_eq!(hero.remove_effects_with_tag(BURNING), 0);
}

/// Interval 2 with execute-on-application fires at t = 0, 2, 4, 6.
#[test]
fn test_periodic_execute_on_application() {
    init_tracing();
    let mut hero = character(1);
    apply(
        &mut hero,
        EffectDefinition::infinite("Regen")
            .with_period(2.0, true)
            .with_modifier(EffectModifier::add(MAX_HEALTH, 1.0)),
    );

    let mut fired_at = Vec::new();
    for frame in 0..=6 {
        if hero.tick(1.0).periodic_executions > 0 {
            fired_at.push(frame);
        }
    }

    assert_eq!(fired_at, vec![0, 2, 4, 6]);
    assert_eq!(hero.attributes().base_value(MAX_HEALTH), Some(104.0));
}

/// Without execute-on-application the first execution waits one interval.
#[test]
fn test_periodic_delayed_start() {
    let mut hero = character(1);
    apply(
        &mut hero,
        EffectDefinition::infinite("Poison")
            .with_period(2.0, false)
            .with_modifier(EffectModifier::add(MAX_HEALTH, -1.0)),
    );

    let fired_at: Vec<_> = (0..6).filter(|_| hero.tick(1.0).periodic_executions > 0).collect();
    assert_eq!(fired_at, vec![1, 3, 5]);
}

/// Overrides from later containers win, and an explicit zero is honoured.
#[test]
fn test_override_order() {
    let mut hero = character(1);
    apply(&mut hero, EffectDefinition::infinite("Stone").with_modifier(EffectModifier::override_with(HEALTH, 5.0)));
    apply(&mut hero, EffectDefinition::infinite("Glass").with_modifier(EffectModifier::override_with(HEALTH, 7.0)));
    hero.tick(0.1);
    assert_eq!(hero.attributes().current_value(HEALTH), Some(7.0));

    apply(&mut hero, EffectDefinition::infinite("Void").with_modifier(EffectModifier::override_with(HEALTH, 0.0)));
    hero.tick(0.1);
    assert_eq!(hero.attributes().current_value(HEALTH), Some(0.0));
}

/// Durational deltas are fixed when the effect is applied.
#[test]
fn test_durational_magnitude_fixed_at_application() {
    let mut hero = character(1);
    hero.attributes_mut().set_base(POWER, 4.0);
    hero.tick(0.0);

    apply(
        &mut hero,
        EffectDefinition::infinite("Rage").with_modifier(EffectModifier::new(
            HEALTH,
            ModifierOperator::Add,
            Magnitude::target_attribute(POWER, Curve::linear(2.0, 0.0)),
        )),
    );
    hero.tick(0.1);
    assert_eq!(hero.attributes().current_value(HEALTH), Some(18.0));

    hero.attributes_mut().set_base(POWER, 50.0);
    hero.tick(0.1);
    hero.tick(0.1);
    assert_eq!(hero.attributes().current_value(HEALTH), Some(18.0));
}

/// A source snapshot does not follow the source's later changes.
#[test]
fn test_cross_character_snapshot() {
    init_tracing();
    let mut caster = character(1);
    caster.attributes_mut().set_base(POWER, 20.0);
    caster.tick(0.0);
    let mut victim = character(2);

    let strike = Arc::new(EffectDefinition::instant("Strike").with_modifier(
        EffectModifier::new(HEALTH, ModifierOperator::Add, Magnitude::source_attribute(POWER, Curve::Identity))
            .with_multiplier(-0.25),
    ));
    let spec = caster.make_outgoing_spec(strike, None);

    caster.attributes_mut().set_base(POWER, 1000.0);
    caster.tick(0.0);

    assert!(caster.apply_effect_spec_to_target(spec, &mut victim));
    assert_eq!(victim.attributes().base_value(HEALTH), Some(5.0));
}

/// A foreign spec applied through the target's own entry point reads the
/// source's value from when the spec was created.
#[test]
fn test_foreign_spec_live_source_read() {
    let mut caster = character(1);
    caster.attributes_mut().set_base(POWER, 8.0);
    caster.tick(0.0);
    let mut victim = character(2);

    let drain = Arc::new(EffectDefinition::instant("Drain").with_modifier(
        EffectModifier::new(HEALTH, ModifierOperator::Add, Magnitude::live_source_attribute(POWER, Curve::Identity))
            .with_multiplier(-1.0),
    ));
    let spec = caster.make_outgoing_spec(drain, None);

    assert!(victim.apply_effect_spec_to_self(spec));
    assert_eq!(victim.attributes().base_value(HEALTH), Some(2.0));
}

/// An override stays in force when a later effect only adds.
#[test]
fn test_override_survives_later_add() {
    let mut hero = character(1);
    apply(&mut hero, EffectDefinition::infinite("Stone").with_modifier(EffectModifier::override_with(HEALTH, 50.0)));
    apply(&mut hero, EffectDefinition::infinite("Might").with_modifier(EffectModifier::add(HEALTH, 5.0)));
    hero.tick(0.1);

    assert_eq!(hero.attributes().current_value(HEALTH), Some(50.0));
}

/// Level-scaled magnitudes use the spec's level.
#[test]
fn test_level_scaled_modifier() {
    let mut hero = character(1);
    hero.set_level(3.0);
    let bolt = Arc::new(EffectDefinition::instant("Bolt").with_modifier(EffectModifier::new(
        MAX_HEALTH,
        ModifierOperator::Add,
        Magnitude::LevelScaled(Curve::points([(1.0, -10.0), (5.0, -50.0)])),
    )));

    let spec = hero.make_outgoing_spec(Arc::clone(&bolt), None);
    hero.apply_effect_spec_to_self(spec);
    assert_eq!(hero.attributes().base_value(MAX_HEALTH), Some(70.0));

    let spec = hero.make_outgoing_spec(bolt, Some(10.0));
    hero.apply_effect_spec_to_self(spec);
    assert_eq!(hero.attributes().base_value(MAX_HEALTH), Some(20.0));
}

/// Clamp handlers run before notifications are produced.
#[test]
fn test_clamped_health_notification() {
    let mut hero = character(1);
    hero.attributes_mut()
        .add_handler(Arc::new(ClampAttribute::new(HEALTH).with_min(0.0).with_max_attribute(MAX_HEALTH)));

    apply(&mut hero, EffectDefinition::infinite("Overheal").with_modifier(EffectModifier::add(HEALTH, 500.0)));
    let summary = hero.tick(0.1);

    assert_eq!(summary.changes.len(), 1);
    assert_eq!(summary.changes[0].previous, 10.0);
    assert_eq!(summary.changes[0].current, 100.0);
}

/// Removing by tag matches granted tags as well as asset tags.
#[test]
fn test_remove_by_tag_then_tick() {
    let mut hero = character(1);
    apply(
        &mut hero,
        EffectDefinition::infinite("Burning")
            .with_granted_tag(BURNING)
            .with_modifier(EffectModifier::add(HEALTH, -4.0)),
    );
    hero.tick(0.1);
    assert_eq!(hero.attributes().current_value(HEALTH), Some(6.0));

    assert_eq!(hero.remove_effects_with_tag(BURNING), 1);
    let summary = hero.tick(0.1);
    assert_eq!(hero.attributes().current_value(HEALTH), Some(10.0));
    assert_eq!(summary.changes[0].previous, 6.0);
}

proptest! {
    /// Instant effects only touch base values, so after a tick with no
    /// registered effects every current value equals its base.
    #[test]
    fn prop_current_equals_base_without_active_effects(amounts in proptest::collection::vec(-50.0f32..50.0, 0..10)) {
        let mut hero = character(1);
        for amount in amounts {
            apply(&mut hero, EffectDefinition::instant("Nudge").with_modifier(EffectModifier::add(HEALTH, amount)));
        }
        hero.tick(0.1);

        for value in hero.attributes().iter() {
            prop_assert_eq!(value.current_value, value.base_value);
        }
    }

    /// A timed effect is removed on exactly the tick its duration runs out.
    #[test]
    fn prop_timed_effect_lifetime(duration in 0.5f32..10.0, dt in 0.1f32..2.0) {
        let mut hero = character(1);
        apply(&mut hero, EffectDefinition::has_duration("Timed", duration));

        let mut elapsed = 0.0f32;
        let mut remaining = duration;
        loop {
            let summary = hero.tick(dt);
            elapsed += dt;
            remaining -= dt;
            if summary.removed == 1 {
                prop_assert!(remaining <= 0.0);
                break;
            }
            prop_assert!(remaining > 0.0);
            prop_assert!(elapsed < duration + dt);
        }
        prop_assert!(hero.active_effects().is_empty());
    }
}
