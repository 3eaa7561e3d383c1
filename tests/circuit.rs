use std::collections::HashSet;

use egui::pos2;
use pinboard::codegen;
use pinboard::db::{Circuit, CircuitError, PartId, PartKind};
use pinboard::pins::{self, PinSpace};
use pinboard::simulator::Simulator;

fn init_logger() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::builder().is_test(true).try_init().ok();
}

/// Small deterministic generator so the sequence is reproducible.
struct Lcg(u64);

impl Lcg {
    fn next_u64(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

fn assert_pins_unique(circuit: &Circuit) {
    let mut seen = HashSet::new();
    for part in circuit.parts() {
        if let Some(pin) = part.pin {
            assert!(seen.insert(pin), "pin {pin} held twice:\n{}", circuit.display());
            assert!(circuit.pin_space().contains(pin), "pin {pin} out of space");
        }
        if part.kind == PartKind::Controller {
            assert_eq!(part.pin, None, "controller never holds a pin");
        }
    }
    assert_eq!(seen, pins::used_pins(circuit).into_iter().collect::<HashSet<_>>());
}

#[test]
fn pins_stay_unique_under_random_edits() {
    init_logger();
    let mut rng = Lcg(0x5eed);
    let mut circuit = Circuit::new(PinSpace::default());
    let mut ids: Vec<PartId> = Vec::new();

    for _ in 0..2_000 {
        match rng.below(4) {
            0 | 1 => {
                let kind = PartKind::ALL[rng.below(PartKind::ALL.len())];
                let placed = circuit.add_part(kind, pos2(0.0, 0.0));
                if placed.warning.is_some() {
                    assert_eq!(pins::first_free(&circuit, circuit.pin_space()), None);
                }
                ids.push(placed.id);
            }
            2 if !ids.is_empty() => {
                let id = ids.swap_remove(rng.below(ids.len()));
                assert!(circuit.remove_part(id).is_some());
            }
            _ if !ids.is_empty() => {
                let id = ids[rng.below(ids.len())];
                let pin = 1 + rng.below(14) as u8;
                let before = circuit.find_part(id).and_then(|p| p.pin);
                match circuit.set_pin(id, pin) {
                    Ok(()) => assert_eq!(circuit.find_part(id).and_then(|p| p.pin), Some(pin)),
                    Err(_) => assert_eq!(circuit.find_part(id).and_then(|p| p.pin), before),
                }
            }
            _ => {}
        }
        assert_pins_unique(&circuit);
        assert_eq!(circuit.len(), ids.len());
    }
}

#[test]
fn building_a_blink_circuit_end_to_end() {
    init_logger();
    let mut circuit = Circuit::default();
    circuit.add_part(PartKind::Controller, pos2(100.0, 100.0));
    let led = circuit.add_part(PartKind::Led, pos2(400.0, 100.0)).id;
    let button = circuit.add_part(PartKind::Button, pos2(400.0, 300.0)).id;

    assert_eq!(circuit.find_part(led).and_then(|p| p.pin), Some(10));
    assert_eq!(circuit.find_part(button).and_then(|p| p.pin), Some(2));

    let choices = pins::pin_choices(&circuit, circuit.pin_space(), led);
    let used: Vec<u8> = choices
        .iter()
        .filter(|c| !c.available)
        .map(|c| c.pin)
        .collect();
    assert_eq!(used, vec![2], "own pin 10 stays selectable");

    assert_eq!(
        circuit.set_pin(led, 2),
        Err(CircuitError::PinConflict {
            pin: 2,
            holder: button
        })
    );
    circuit.set_pin(led, 13).ok();

    let code = codegen::generate(&circuit);
    assert!(code.starts_with("const int ledPin1 = 13;\nconst int buttonPin1 = 2;\n\n"));
    assert_eq!(code, codegen::generate(&circuit));

    let mut sim = Simulator::new();
    sim.press();
    assert!(!sim.led_on(), "idle simulation ignores the button");
    sim.start();
    sim.press();
    assert!(sim.led_on());
    sim.stop();
    assert!(!sim.led_on());
    assert!(!sim.button_held());
}

#[test]
fn removing_unknown_part_changes_nothing() {
    let mut circuit = Circuit::default();
    let id = circuit.add_part(PartKind::Led, pos2(0.0, 0.0)).id;
    circuit.add_part(PartKind::Button, pos2(0.0, 0.0));
    circuit.remove_part(id);

    let before = circuit.display();
    assert_eq!(circuit.remove_part(id), None);
    assert!(!circuit.move_part(id, pos2(5.0, 5.0)));
    assert_eq!(circuit.display(), before);
    assert_eq!(circuit.len(), 1);
}
