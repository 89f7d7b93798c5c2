//! Multi-tick scenarios on a real [`GridWorld`].
//!
//! Each test builds a small grid, runs the global tick a few times and checks
//! where offers are buffered and which stores were debited or credited.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use gridcraft_core::{EnergyOffer, EnergySource, GridNode};
use gridcraft_types::{Direction, EnergyLevel, EnergyValue};
use gridcraft_world::{
    Accumulator, AccumulatorSpec, BlockPos, Cable, CableSpec, Generator, GeneratorSpec, GridWorld,
    NodeKind,
};

fn units(n: u32) -> EnergyValue {
    EnergyValue::from(n)
}

/// A generator holding `stored` that offers `output` per tick and never
/// refills.
fn battery(stored: u32, output: u32, directions: Vec<Direction>) -> Generator {
    Generator::new(GeneratorSpec {
        capacity: units(stored),
        production: EnergyValue::ZERO,
        max_output: units(output),
        directions,
    })
    .with_stored(units(stored))
}

fn cable(resistance: u32, level: EnergyLevel) -> Cable {
    Cable::new(CableSpec {
        resistance: units(resistance),
        level,
    })
}

fn sink_from_below(capacity: u32) -> Accumulator {
    Accumulator::new(AccumulatorSpec {
        capacity: units(capacity),
        level: EnergyLevel::L3,
        input_faces: vec![Direction::Down],
    })
}

fn remaining_of(offers: &[EnergyOffer]) -> Vec<EnergyValue> {
    offers.iter().map(EnergyOffer::remaining).collect()
}

#[test]
fn one_hop_per_tick_then_accept() {
    let mut world = GridWorld::new();
    let generator = world
        .place_generator(BlockPos::new(0, 0, 0), battery(1_000, 100, vec![Direction::Up]))
        .unwrap();
    let wire = world
        .place_cable(BlockPos::new(0, 1, 0), cable(5, EnergyLevel::L4))
        .unwrap();
    let sink = world
        .place_accumulator(BlockPos::new(0, 2, 0), sink_from_below(10_000))
        .unwrap();

    let first = world.tick();
    assert_eq!(first.offers_emitted, 1);
    assert_eq!(remaining_of(&wire.pending_offers()), vec![units(100)]);
    assert!(sink.pending_offers().is_empty());

    let second = world.tick();
    assert_eq!(second.forwarded, 1);
    let pending = sink.pending_offers();
    assert_eq!(remaining_of(&pending), vec![units(95)]);
    assert_eq!(
        pending.first().map(EnergyOffer::source_id),
        Some(generator.source_id())
    );
    assert_eq!(pending.first().map(EnergyOffer::original), Some(units(100)));
    // Nothing accepted yet: offers are free until someone accepts.
    assert_eq!(generator.stored(), units(1_000));

    let third = world.tick();
    assert_eq!(third.accepted, 1);
    assert_eq!(third.banked, units(95));
    assert_eq!(sink.stored(), units(95));
    assert_eq!(generator.stored(), units(900));
    assert_eq!(third.generator_storage, units(900));
    assert_eq!(third.accumulator_storage, units(95));
}

#[test]
fn overload_burns_the_cable_without_forwarding() {
    let mut world = GridWorld::new();
    let generator = world
        .place_generator(BlockPos::new(0, 0, 0), battery(600, 600, vec![Direction::Up]))
        .unwrap();
    let wire_pos = BlockPos::new(0, 1, 0);
    let wire = world
        .place_cable(wire_pos, cable(5, EnergyLevel::L3))
        .unwrap();
    let sink = world
        .place_accumulator(BlockPos::new(0, 2, 0), sink_from_below(10_000))
        .unwrap();

    world.tick();
    let summary = world.tick();

    assert_eq!(summary.destroyed.len(), 1);
    let destroyed = summary.destroyed.first().unwrap();
    assert_eq!(destroyed.id, wire.node_id());
    assert_eq!(destroyed.pos, wire_pos);
    assert_eq!(destroyed.kind, NodeKind::Cable);
    assert_eq!(summary.forwarded, 0);

    assert!(wire.is_destroyed());
    assert!(world.node_at(wire_pos).is_none());
    assert!(sink.pending_offers().is_empty());
    // The overloading offer was accepted: its source paid in full.
    assert_eq!(generator.stored(), EnergyValue::ZERO);

    let later = world.tick();
    assert!(later.destroyed.is_empty());
    assert_eq!(sink.stored(), EnergyValue::ZERO);
}

#[test]
fn converging_paths_reach_the_sink_once() {
    // G feeds two arms of different resistance that meet in a joint cable
    // under the sink:
    //
    //   B'(-1,1) ─ C(0,1) ─ A'(1,1)        S(0,2) above C
    //     │                  │
    //   B(-1,0) ── G(0,0) ── A(1,0)
    let mut world = GridWorld::new();
    let generator = world
        .place_generator(
            BlockPos::new(0, 0, 0),
            battery(1_000, 100, vec![Direction::East, Direction::West]),
        )
        .unwrap();
    world
        .place_cable(BlockPos::new(1, 0, 0), cable(20, EnergyLevel::L3))
        .unwrap();
    world
        .place_cable(BlockPos::new(1, 1, 0), cable(1, EnergyLevel::L3))
        .unwrap();
    world
        .place_cable(BlockPos::new(-1, 0, 0), cable(40, EnergyLevel::L3))
        .unwrap();
    world
        .place_cable(BlockPos::new(-1, 1, 0), cable(1, EnergyLevel::L3))
        .unwrap();
    let joint = world
        .place_cable(BlockPos::new(0, 1, 0), cable(1, EnergyLevel::L3))
        .unwrap();
    let sink = world
        .place_accumulator(BlockPos::new(0, 2, 0), sink_from_below(10_000))
        .unwrap();

    for _ in 0..3 {
        world.tick();
    }
    // 100 - 20 - 1 = 79 beat 100 - 40 - 1 = 59.
    assert_eq!(remaining_of(&joint.pending_offers()), vec![units(79)]);

    world.tick();
    assert_eq!(remaining_of(&sink.pending_offers()), vec![units(78)]);

    let summary = world.tick();
    assert_eq!(summary.accepted, 1);
    assert_eq!(sink.stored(), units(78));
    assert_eq!(generator.stored(), units(900));
}

#[test]
fn sink_without_room_never_costs_the_source() {
    let mut world = GridWorld::new();
    let generator = world
        .place_generator(BlockPos::new(0, 0, 0), battery(1_000, 100, vec![Direction::Up]))
        .unwrap();
    world
        .place_cable(BlockPos::new(0, 1, 0), cable(5, EnergyLevel::L4))
        .unwrap();
    let sink = world
        .place_accumulator(BlockPos::new(0, 2, 0), sink_from_below(50))
        .unwrap();

    for _ in 0..10 {
        let summary = world.tick();
        assert_eq!(summary.accepted, 0);
    }
    assert_eq!(generator.stored(), units(1_000));
    assert_eq!(sink.stored(), EnergyValue::ZERO);
}

#[test]
fn two_sinks_cannot_spend_the_same_energy() {
    let mut world = GridWorld::new();
    let generator = world
        .place_generator(
            BlockPos::new(0, 0, 0),
            battery(100, 100, vec![Direction::East, Direction::West]),
        )
        .unwrap();
    let west = world
        .place_accumulator(
            BlockPos::new(-1, 0, 0),
            Accumulator::new(AccumulatorSpec::default()),
        )
        .unwrap();
    let east = world
        .place_accumulator(
            BlockPos::new(1, 0, 0),
            Accumulator::new(AccumulatorSpec::default()),
        )
        .unwrap();

    let first = world.tick();
    assert_eq!(first.offers_emitted, 2);

    let second = world.tick();
    assert_eq!(second.accepted, 1);
    assert_eq!(second.refused, 1);
    assert_eq!(generator.stored(), EnergyValue::ZERO);
    assert_eq!(
        west.stored().saturating_add(east.stored()),
        units(100)
    );
}

#[test]
fn removed_source_offers_die_in_transit() {
    let mut world = GridWorld::new();
    let origin = BlockPos::new(0, 0, 0);
    let generator = world
        .place_generator(origin, battery(1_000, 100, vec![Direction::Up]))
        .unwrap();
    world
        .place_cable(BlockPos::new(0, 1, 0), cable(5, EnergyLevel::L4))
        .unwrap();
    let sink = world
        .place_accumulator(BlockPos::new(0, 2, 0), sink_from_below(10_000))
        .unwrap();

    world.tick();
    world.tick();
    assert_eq!(sink.pending_offers().len(), 1);

    let removed = world.remove(origin).unwrap();
    assert_eq!(removed.kind(), NodeKind::Generator);
    assert!(generator.is_removed());

    // One stale offer waits in the cable, the other in the sink.
    let summary = world.tick();
    assert_eq!(summary.accepted, 0);
    assert_eq!(summary.dead_sources, 2);
    assert_eq!(sink.stored(), EnergyValue::ZERO);
    assert_eq!(generator.stored(), units(1_000));
}

#[test]
fn node_order_does_not_change_latency() {
    // Same chain as above, laid out so the sink ticks before the cable and
    // the cable before the generator.
    let mut world = GridWorld::new();
    let generator = world
        .place_generator(BlockPos::new(0, 2, 0), battery(1_000, 100, vec![Direction::Down]))
        .unwrap();
    world
        .place_cable(BlockPos::new(0, 1, 0), cable(5, EnergyLevel::L4))
        .unwrap();
    let sink = world
        .place_accumulator(
            BlockPos::new(0, 0, 0),
            Accumulator::new(AccumulatorSpec {
                input_faces: vec![Direction::Up],
                ..AccumulatorSpec::default()
            }),
        )
        .unwrap();

    world.tick();
    assert!(sink.pending_offers().is_empty());
    world.tick();
    assert_eq!(remaining_of(&sink.pending_offers()), vec![units(95)]);
    world.tick();
    assert_eq!(sink.stored(), units(95));
    assert_eq!(generator.stored(), units(900));

    let handle: Arc<dyn GridNode> = Arc::clone(&sink) as Arc<dyn GridNode>;
    assert!(handle.as_sink().is_some());
}
