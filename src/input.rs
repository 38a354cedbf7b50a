//! Keyboard state and per-tick intent
//!
//! Browser key identifiers are mapped to game keys. Movement follows the held
//! state; firing is edge-triggered so holding space fires exactly once.

use std::collections::HashSet;

use crate::sim::TickInput;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Fire,
    /// Start a new run after game over
    Restart,
    /// Toggle the autopilot demo
    Autopilot,
    /// Toggle sound
    Mute,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            " " | "Spacebar" => Some(Key::Fire),
            "Enter" => Some(Key::Restart),
            "i" | "I" => Some(Key::Autopilot),
            "m" | "M" => Some(Key::Mute),
            _ => None,
        }
    }

    /// Keys whose browser default (page scrolling) must be suppressed
    pub fn blocks_default(&self) -> bool {
        matches!(self, Key::Left | Key::Right | Key::Fire)
    }
}

/// Pressed-key state machine
#[derive(Debug, Clone)]
pub struct InputMapper {
    pressed: HashSet<Key>,
    /// Fire may trigger on the next press
    fire_armed: bool,
    /// A press was seen but no tick has consumed it yet
    fire_latched: bool,
}

impl Default for InputMapper {
    fn default() -> Self {
        Self::new()
    }
}

impl InputMapper {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            fire_armed: true,
            fire_latched: false,
        }
    }

    /// Record a key-down; returns the mapped key on a fresh press only.
    ///
    /// Auto-repeat key-downs arrive while a key is held; they return `None`
    /// and never re-arm fire.
    pub fn key_down(&mut self, name: &str) -> Option<Key> {
        let key = Key::from_key_name(name)?;
        if key == Key::Fire && self.fire_armed {
            self.fire_armed = false;
            self.fire_latched = true;
        }
        self.pressed.insert(key).then_some(key)
    }

    /// Record a key-up; releasing fire re-arms it
    pub fn key_up(&mut self, name: &str) -> Option<Key> {
        let key = Key::from_key_name(name)?;
        if key == Key::Fire {
            self.fire_armed = true;
        }
        self.pressed.remove(&key);
        Some(key)
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    /// Forget held keys (focus lost, key-ups will never arrive)
    pub fn release_all(&mut self) {
        self.pressed.clear();
        self.fire_armed = true;
        self.fire_latched = false;
    }

    /// Intent for the next simulation tick; consumes a pending shot
    pub fn next_tick_input(&mut self) -> TickInput {
        TickInput {
            move_left: self.is_pressed(Key::Left),
            move_right: self.is_pressed(Key::Right),
            fire: std::mem::take(&mut self.fire_latched),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_key_names() {
        assert_eq!(Key::from_key_name("ArrowLeft"), Some(Key::Left));
        assert_eq!(Key::from_key_name("ArrowRight"), Some(Key::Right));
        assert_eq!(Key::from_key_name(" "), Some(Key::Fire));
        assert_eq!(Key::from_key_name("Enter"), Some(Key::Restart));
        assert_eq!(Key::from_key_name("q"), None);
    }

    #[test]
    fn test_hold_to_move() {
        let mut input = InputMapper::new();
        input.key_down("ArrowLeft");
        assert!(input.next_tick_input().move_left);
        assert!(input.next_tick_input().move_left);
        input.key_up("ArrowLeft");
        assert!(!input.next_tick_input().move_left);
    }

    #[test]
    fn test_fire_once_per_hold() {
        let mut input = InputMapper::new();
        input.key_down(" ");
        assert!(input.next_tick_input().fire);
        // Held plus auto-repeat
        input.key_down(" ");
        input.key_down(" ");
        assert!(!input.next_tick_input().fire);
        assert!(!input.next_tick_input().fire);

        input.key_up(" ");
        assert!(!input.next_tick_input().fire);
        input.key_down(" ");
        assert!(input.next_tick_input().fire);
    }

    #[test]
    fn test_held_toggle_key_reports_once() {
        let mut input = InputMapper::new();
        let toggles = (0..5)
            .filter(|_| input.key_down("m") == Some(Key::Mute))
            .count();
        assert_eq!(toggles, 1);

        input.key_up("m");
        assert_eq!(input.key_down("M"), Some(Key::Mute));
        assert_eq!(input.key_down("Enter"), Some(Key::Restart));
        assert_eq!(input.key_down("Enter"), None);
    }

    #[test]
    fn test_quick_tap_between_ticks_still_fires() {
        let mut input = InputMapper::new();
        input.key_down(" ");
        input.key_up(" ");
        assert!(input.next_tick_input().fire);
        assert!(!input.next_tick_input().fire);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputMapper::new();
        input.key_down("ArrowRight");
        input.key_down(" ");
        input.release_all();
        let tick = input.next_tick_input();
        assert!(!tick.move_right);
        assert!(!tick.fire);
        // Fire is armed again after losing focus
        input.key_down(" ");
        assert!(input.next_tick_input().fire);
    }

    #[derive(Debug, Clone)]
    enum Event {
        Down,
        Up,
        Tick,
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![Just(Event::Down), Just(Event::Up), Just(Event::Tick)]
    }

    proptest! {
        #[test]
        fn prop_at_most_one_shot_per_press_cycle(events in prop::collection::vec(event(), 0..200)) {
            let mut input = InputMapper::new();
            let mut shots_this_cycle = 0;
            let mut total_shots = 0;
            let mut presses = 0;
            let mut held = false;

            for ev in events {
                match ev {
                    Event::Down => {
                        if !held {
                            presses += 1;
                            shots_this_cycle = 0;
                        }
                        held = true;
                        input.key_down(" ");
                    }
                    Event::Up => {
                        held = false;
                        input.key_up(" ");
                    }
                    Event::Tick => {
                        if input.next_tick_input().fire {
                            shots_this_cycle += 1;
                            total_shots += 1;
                        }
                    }
                }
                prop_assert!(shots_this_cycle <= 1);
            }
            prop_assert!(total_shots <= presses);
        }
    }
}
