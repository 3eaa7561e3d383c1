//! Arduino sketch generation.
//!
//! LEDs and buttons are paired by index, not by wiring: button `i` drives
//! LED `i` if there is one.

use std::fmt::Write as _;

use crate::db::{Circuit, Part, PartKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SketchOptions {
    pub baud_rate: u32,
}

impl Default for SketchOptions {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

pub fn generate(circuit: &Circuit) -> String {
    generate_with(circuit, &SketchOptions::default())
}

pub fn generate_with(circuit: &Circuit, options: &SketchOptions) -> String {
    let leds = wired(circuit, PartKind::Led);
    let buttons = wired(circuit, PartKind::Button);

    let mut out = String::new();

    for (i, led) in leds.iter().enumerate() {
        if let Some(pin) = led.pin {
            writeln!(out, "const int ledPin{} = {pin};", i + 1).ok();
        }
    }
    for (i, button) in buttons.iter().enumerate() {
        if let Some(pin) = button.pin {
            writeln!(out, "const int buttonPin{} = {pin};", i + 1).ok();
        }
    }
    if !out.is_empty() {
        out.push('\n');
    }

    out.push_str("void setup() {\n");
    if !leds.is_empty() || !buttons.is_empty() {
        writeln!(out, "  Serial.begin({});", options.baud_rate).ok();
    }
    for i in 1..=leds.len() {
        writeln!(out, "  pinMode(ledPin{i}, OUTPUT);").ok();
    }
    for i in 1..=buttons.len() {
        writeln!(out, "  pinMode(buttonPin{i}, INPUT_PULLUP);").ok();
    }
    out.push_str("}\n\n");

    out.push_str("void loop() {\n");
    for i in 1..=buttons.len() {
        let has_led = i <= leds.len();
        writeln!(out, "  int buttonState{i} = digitalRead(buttonPin{i});").ok();
        // LOW means pressed because of the pull-up
        writeln!(out, "  if (buttonState{i} == LOW) {{").ok();
        if has_led {
            writeln!(out, "    digitalWrite(ledPin{i}, HIGH);").ok();
        }
        out.push_str("  } else {\n");
        if has_led {
            writeln!(out, "    digitalWrite(ledPin{i}, LOW);").ok();
        }
        out.push_str("  }\n");
    }
    out.push_str("}\n");

    out
}

fn wired(circuit: &Circuit, kind: PartKind) -> Vec<&Part> {
    circuit
        .parts()
        .filter(|p| p.kind == kind && p.pin.is_some())
        .collect()
}
