use std::fmt::Display;

use egui::{Pos2, Vec2, vec2};
use slotmap::SlotMap;

use crate::pins::{self, PinSpace};

pub const MIN_PART_SIZE: Vec2 = vec2(40.0, 40.0);

slotmap::new_key_type! {
    pub struct PartId;
}

impl Display for PartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format!("{:?}", self.0))
    }
}

#[derive(serde::Deserialize, serde::Serialize, PartialEq, Eq, Hash, Copy, Debug, Clone)]
pub enum PartKind {
    Controller,
    Led,
    Button,
}

impl PartKind {
    pub const ALL: [Self; 3] = [Self::Controller, Self::Led, Self::Button];

    /// Pin tried first when a part of this kind is dropped on the canvas.
    pub fn preferred_pin(self) -> Option<u8> {
        match self {
            Self::Controller => None,
            Self::Led => Some(10),
            Self::Button => Some(2),
        }
    }

    pub fn takes_pin(self) -> bool {
        match self {
            Self::Controller => false,
            Self::Led | Self::Button => true,
        }
    }

    pub fn default_size(self) -> Vec2 {
        match self {
            Self::Controller => vec2(220.0, 160.0),
            Self::Led | Self::Button => vec2(80.0, 80.0),
        }
    }
}

impl Display for PartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Controller => f.write_str("Arduino Uno"),
            Self::Led => f.write_str("LED"),
            Self::Button => f.write_str("Button"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CircuitError {
    #[error("no free pin left for {0}, placed without a pin")]
    PinExhausted(PartKind),
    #[error("pin {pin} is already used by part {holder}")]
    PinConflict { pin: u8, holder: PartId },
    #[error("no part with id {0}")]
    UnknownId(PartId),
    #[error("{0} does not take a pin")]
    NoPinForKind(PartKind),
    #[error("pin {pin} is outside the pin space {space}")]
    PinOutOfRange { pin: u8, space: PinSpace },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub id: PartId,
    pub kind: PartKind,
    /// Top-left corner in canvas coordinates.
    pub pos: Pos2,
    pub size: Vec2,
    pub pin: Option<u8>,
}

impl Part {
    pub fn display(&self) -> String {
        match self.pin {
            Some(pin) => format!("{} [{}] pin {pin}", self.kind, self.id),
            None if self.kind.takes_pin() => format!("{} [{}] unwired", self.kind, self.id),
            None => format!("{} [{}]", self.kind, self.id),
        }
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(self.pos, self.size)
    }
}

/// Result of dropping a new part on the canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    pub id: PartId,
    /// Set when the part could not get a pin. The part is still placed.
    pub warning: Option<CircuitError>,
}

#[derive(Debug, Clone)]
pub struct Circuit {
    pin_space: PinSpace,
    parts: SlotMap<PartId, Part>,
    // Insertion order, doubles as z-order
    order: Vec<PartId>,
}

impl Default for Circuit {
    fn default() -> Self {
        Self::new(PinSpace::default())
    }
}

impl Circuit {
    pub fn new(pin_space: PinSpace) -> Self {
        Self {
            pin_space,
            parts: SlotMap::with_key(),
            order: Vec::new(),
        }
    }

    pub fn pin_space(&self) -> PinSpace {
        self.pin_space
    }

    /// Parts in insertion order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> + '_ {
        self.order.iter().filter_map(|id| self.parts.get(*id))
    }

    pub fn ids(&self) -> Vec<PartId> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn find_part(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id)
    }

    pub fn first_controller(&self) -> Option<&Part> {
        self.parts().find(|p| p.kind == PartKind::Controller)
    }

    pub fn add_part(&mut self, kind: PartKind, pos: Pos2) -> Placed {
        let mut warning = None;
        let pin = if kind.takes_pin() {
            let pin = self.allocate_pin(kind);
            if pin.is_none() {
                let err = CircuitError::PinExhausted(kind);
                log::warn!("{err}");
                warning = Some(err);
            }
            pin
        } else {
            None
        };

        let id = self.parts.insert_with_key(|id| Part {
            id,
            kind,
            pos,
            size: kind.default_size(),
            pin,
        });
        self.order.push(id);
        log::info!("added {}", self.parts[id].display());

        Placed { id, warning }
    }

    fn allocate_pin(&self, kind: PartKind) -> Option<u8> {
        if let Some(preferred) = kind.preferred_pin()
            && self.pin_space.contains(preferred)
            && pins::is_free(self, preferred)
        {
            return Some(preferred);
        }
        pins::first_free(self, self.pin_space)
    }

    /// Remove a part. Its pin becomes free. Unknown ids are ignored.
    pub fn remove_part(&mut self, id: PartId) -> Option<Part> {
        let part = self.parts.remove(id)?;
        self.order.retain(|other| *other != id);
        log::info!("removed {}", part.display());
        Some(part)
    }

    pub fn move_part(&mut self, id: PartId, pos: Pos2) -> bool {
        let Some(part) = self.parts.get_mut(id) else {
            return false;
        };
        part.pos = pos;
        true
    }

    /// Resizing from a corner handle may also shift the origin, hence `pos`.
    pub fn resize_part(&mut self, id: PartId, size: Vec2, pos: Pos2) -> bool {
        let Some(part) = self.parts.get_mut(id) else {
            return false;
        };
        part.size = size.max(MIN_PART_SIZE);
        part.pos = pos;
        true
    }

    pub fn set_pin(&mut self, id: PartId, pin: u8) -> Result<(), CircuitError> {
        let part = self.parts.get(id).ok_or(CircuitError::UnknownId(id))?;
        if !part.kind.takes_pin() {
            return Err(CircuitError::NoPinForKind(part.kind));
        }
        if !self.pin_space.contains(pin) {
            return Err(CircuitError::PinOutOfRange {
                pin,
                space: self.pin_space,
            });
        }
        if let Some(holder) = self.parts().find(|p| p.id != id && p.pin == Some(pin)) {
            return Err(CircuitError::PinConflict {
                pin,
                holder: holder.id,
            });
        }

        if let Some(part) = self.parts.get_mut(id) {
            part.pin = Some(pin);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.parts.clear();
        self.order.clear();
    }

    pub fn display(&self) -> String {
        let mut out = String::new();
        use std::fmt::Write as _;

        writeln!(out, "======================================").ok();
        writeln!(out, "  PARTS ({} total)", self.len()).ok();
        writeln!(out, "======================================").ok();

        let count = self.len();
        for (idx, part) in self.parts().enumerate() {
            let branch = if idx + 1 == count { "`-" } else { "|-" };
            writeln!(
                out,
                "{branch} {} at ({:.0}, {:.0}) {:.0}x{:.0}",
                part.display(),
                part.pos.x,
                part.pos.y,
                part.size.x,
                part.size.y
            )
            .ok();
        }

        let used = pins::used_pins(self);
        writeln!(out).ok();
        writeln!(out, "pins used: {used:?} of {}", self.pin_space).ok();
        out
    }
}
