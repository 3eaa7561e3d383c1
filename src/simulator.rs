//! Button to LED simulation.
//!
//! The rule is deliberately topology agnostic: while running, holding any
//! button lights every LED. Pin assignments are not consulted.

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SimulationState {
    #[default]
    Idle,
    Running,
}

#[derive(Debug, Clone, Default)]
pub struct Simulator {
    state: SimulationState,
    button_held: bool,
    led_on: bool,
}

impl Simulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SimulationState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SimulationState::Running
    }

    pub fn button_held(&self) -> bool {
        self.button_held
    }

    pub fn led_on(&self) -> bool {
        self.led_on
    }

    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        log::debug!("simulation started");
        self.state = SimulationState::Running;
        self.recompute();
    }

    /// Stopping never latches: held and lit both drop back to false.
    pub fn stop(&mut self) {
        log::debug!("simulation stopped");
        self.state = SimulationState::Idle;
        self.button_held = false;
        self.led_on = false;
    }

    pub fn toggle(&mut self) -> SimulationState {
        match self.state {
            SimulationState::Idle => self.start(),
            SimulationState::Running => self.stop(),
        }
        self.state
    }

    pub fn press(&mut self) {
        self.set_button_held(true);
    }

    pub fn release(&mut self) {
        self.set_button_held(false);
    }

    /// Input from the canvas. Ignored while idle.
    pub fn set_button_held(&mut self, held: bool) {
        if !self.is_running() {
            return;
        }
        if self.button_held != held {
            log::debug!("button {}", if held { "pressed" } else { "released" });
        }
        self.button_held = held;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.led_on = self.is_running() && self.button_held;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_ignores_presses() {
        let mut sim = Simulator::new();
        sim.press();
        assert!(!sim.led_on());
        assert!(!sim.button_held());
        sim.release();
        assert!(!sim.led_on());
    }

    #[test]
    fn running_follows_button() {
        let mut sim = Simulator::new();
        sim.start();
        assert_eq!(sim.state(), SimulationState::Running);
        assert!(!sim.led_on(), "no press yet");

        sim.press();
        assert!(sim.led_on());
        sim.release();
        assert!(!sim.led_on());
    }

    #[test]
    fn stop_resets_everything() {
        let mut sim = Simulator::new();
        sim.start();
        sim.press();
        assert!(sim.led_on());

        sim.stop();
        assert_eq!(sim.state(), SimulationState::Idle);
        assert!(!sim.button_held());
        assert!(!sim.led_on());

        // No latching into the next run
        sim.start();
        assert!(!sim.button_held());
        assert!(!sim.led_on());
    }

    #[test]
    fn toggle_alternates() {
        let mut sim = Simulator::new();
        assert_eq!(sim.toggle(), SimulationState::Running);
        sim.set_button_held(true);
        assert_eq!(sim.toggle(), SimulationState::Idle);
        assert!(!sim.led_on());
        assert_eq!(sim.toggle(), SimulationState::Running);
        assert!(!sim.led_on());
    }

    #[test]
    fn start_twice_keeps_held_state() {
        let mut sim = Simulator::new();
        sim.start();
        sim.press();
        sim.start();
        assert!(sim.led_on());
    }
}
