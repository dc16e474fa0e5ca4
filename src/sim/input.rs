//! Held/pressed key model drained once per tick
//!
//! - **Held:** true every tick the key is physically down (jump sustain, sprint).
//! - **Pressed:** true only until the next `poll`, which runs at the start of
//!   each simulation tick so a press is consumed by exactly one tick.
//! - **Jump buffer:** a jump press arms a short countdown so a press made just
//!   before landing still fires once the player is grounded.

use std::collections::HashSet;

use super::state::Item;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Up,
    W,
    Shift,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    F,
    P,
}

impl Key {
    pub fn is_jump(self) -> bool {
        matches!(self, Key::Space | Key::Up | Key::W)
    }

    /// Hotbar slot selected by a digit key
    pub fn item_slot(self) -> Option<Item> {
        match self {
            Key::Digit1 => Some(Item::Water),
            Key::Digit2 => Some(Item::Rope),
            Key::Digit3 => Some(Item::Torch),
            Key::Digit4 => Some(Item::Bow),
            _ => None,
        }
    }
}

/// Movement intent sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerIntent {
    /// Fresh jump press this tick or a still-armed jump buffer
    pub wants_jump: bool,
    pub holding_jump: bool,
    pub sprinting: bool,
}

#[derive(Debug, Clone)]
pub struct InputState {
    held: HashSet<Key>,
    pressed: HashSet<Key>,
    jump_buffer: f32,
    buffer_window: f32,
}

impl InputState {
    pub fn new(buffer_window: f32) -> Self {
        Self {
            held: HashSet::new(),
            pressed: HashSet::new(),
            jump_buffer: 0.0,
            buffer_window,
        }
    }

    pub fn press(&mut self, key: Key) {
        if self.held.insert(key) {
            self.pressed.insert(key);
            if key.is_jump() {
                self.jump_buffer = self.buffer_window;
            }
        }
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_pressed(&self, key: Key) -> bool {
        self.pressed.contains(&key)
    }

    pub fn jump_buffer(&self) -> f32 {
        self.jump_buffer
    }

    pub fn sprinting(&self) -> bool {
        self.is_held(Key::Shift) && self.is_held(Key::W)
    }

    /// Clear the pressed set and decay the jump buffer, returning this tick's intent
    pub fn poll(&mut self, dt: f32) -> PlayerIntent {
        let fresh_jump = self.pressed.iter().any(|k| k.is_jump());
        self.pressed.clear();
        if self.jump_buffer > 0.0 {
            self.jump_buffer = (self.jump_buffer - dt).max(0.0);
        }
        PlayerIntent {
            wants_jump: fresh_jump || self.jump_buffer > 0.0,
            holding_jump: self.held.iter().any(|k| k.is_jump()),
            sprinting: self.sprinting(),
        }
    }

    /// A jump fired; the buffered press is spent
    pub fn consume_jump(&mut self) {
        self.jump_buffer = 0.0;
    }

    pub fn clear_all(&mut self) {
        self.held.clear();
        self.pressed.clear();
        self.jump_buffer = 0.0;
    }
}
