use std::collections::BTreeSet;
use std::fmt::Display;

use crate::db::{Circuit, PartId};

/// Inclusive range of digital pin numbers parts may be wired to.
#[derive(serde::Deserialize, serde::Serialize, Copy, Debug, Clone, PartialEq, Eq)]
pub struct PinSpace {
    pub first: u8,
    pub last: u8,
}

impl Default for PinSpace {
    fn default() -> Self {
        // Digital pins 0 and 1 are the serial lines on the board.
        Self { first: 2, last: 13 }
    }
}

impl Display for PinSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.first, self.last)
    }
}

impl PinSpace {
    pub fn new(first: u8, last: u8) -> Self {
        Self { first, last }
    }

    pub fn contains(&self, pin: u8) -> bool {
        (self.first..=self.last).contains(&pin)
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + use<> {
        self.first..=self.last
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.first > self.last
    }
}

/// One entry of the inspector's pin selector.
#[derive(Copy, Debug, Clone, PartialEq, Eq)]
pub struct PinChoice {
    pub pin: u8,
    /// False when another part already holds the pin.
    pub available: bool,
}

pub fn used_pins(circuit: &Circuit) -> BTreeSet<u8> {
    circuit.parts().filter_map(|part| part.pin).collect()
}

pub fn is_free(circuit: &Circuit, pin: u8) -> bool {
    circuit.parts().all(|part| part.pin != Some(pin))
}

/// Lowest pin of `space` not held by any part.
pub fn first_free(circuit: &Circuit, space: PinSpace) -> Option<u8> {
    let used = used_pins(circuit);
    space.iter().find(|pin| !used.contains(pin))
}

/// Every pin of `space`, flagged with whether `id` may take it.
///
/// The pin `id` currently holds always counts as available so the selector
/// never blocks re-selecting it.
pub fn pin_choices(circuit: &Circuit, space: PinSpace, id: PartId) -> Vec<PinChoice> {
    let own = circuit.find_part(id).and_then(|part| part.pin);
    let used = used_pins(circuit);
    space
        .iter()
        .map(|pin| PinChoice {
            pin,
            available: !used.contains(&pin) || own == Some(pin),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use egui::pos2;

    use super::*;
    use crate::db::PartKind;

    #[test]
    fn empty_circuit_has_everything_free() {
        let circuit = Circuit::default();
        assert!(used_pins(&circuit).is_empty());
        assert!(is_free(&circuit, 2));
        assert_eq!(first_free(&circuit, PinSpace::default()), Some(2));
    }

    #[test]
    fn first_free_skips_used_pins() {
        let mut circuit = Circuit::default();
        circuit.add_part(PartKind::Button, pos2(0.0, 0.0)); // 2
        circuit.add_part(PartKind::Led, pos2(0.0, 0.0)); // 10
        circuit.add_part(PartKind::Button, pos2(0.0, 0.0)); // 3

        assert_eq!(
            used_pins(&circuit).into_iter().collect::<Vec<_>>(),
            vec![2, 3, 10]
        );
        assert!(!is_free(&circuit, 3));
        assert_eq!(first_free(&circuit, PinSpace::default()), Some(4));
    }

    #[test]
    fn first_free_none_when_space_full() {
        let space = PinSpace::new(4, 5);
        let mut circuit = Circuit::new(space);
        circuit.add_part(PartKind::Led, pos2(0.0, 0.0));
        circuit.add_part(PartKind::Led, pos2(0.0, 0.0));
        assert_eq!(first_free(&circuit, space), None);
    }

    #[test]
    fn own_pin_is_always_a_choice() {
        let mut circuit = Circuit::default();
        let button = circuit.add_part(PartKind::Button, pos2(0.0, 0.0)).id;
        let led = circuit.add_part(PartKind::Led, pos2(0.0, 0.0)).id;

        let choices = pin_choices(&circuit, PinSpace::default(), led);
        assert_eq!(choices.len(), 12);
        let of = |pin: u8| choices.iter().find(|c| c.pin == pin).copied();
        assert_eq!(of(10).map(|c| c.available), Some(true), "own pin");
        assert_eq!(of(2).map(|c| c.available), Some(false), "button's pin");
        assert_eq!(of(5).map(|c| c.available), Some(true));

        let choices = pin_choices(&circuit, PinSpace::default(), button);
        assert!(choices.iter().any(|c| c.pin == 2 && c.available));
        assert!(choices.iter().any(|c| c.pin == 10 && !c.available));
    }

    #[test]
    fn pin_space_bounds() {
        let space = PinSpace::default();
        assert!(space.contains(2));
        assert!(space.contains(13));
        assert!(!space.contains(1));
        assert!(!space.contains(14));
        assert_eq!(space.len(), 12);
        assert_eq!(space.to_string(), "2..=13");
    }
}
