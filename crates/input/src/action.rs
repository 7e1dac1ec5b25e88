use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Physical keys the game cares about, independent of the window backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    Q,
    E,
    Space,
    Escape,
    LeftShift,
    LeftControl,
    Up,
    Down,
    Left,
    Right,
}

/// A high-level action produced from held keys.
///
/// Simulation code consumes actions, never raw keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Jump,
    Quit,
}

/// Key-to-action map. Several keys may trigger the same action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bindings {
    map: BTreeMap<Key, Action>,
}

impl Bindings {
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    pub fn bind(&mut self, key: Key, action: Action) -> &mut Self {
        self.map.insert(key, action);
        self
    }

    pub fn action_for(&self, key: Key) -> Option<Action> {
        self.map.get(&key).copied()
    }

    pub fn keys_for(&self, action: Action) -> impl Iterator<Item = Key> + '_ {
        self.map
            .iter()
            .filter(move |(_, a)| **a == action)
            .map(|(k, _)| *k)
    }
}

impl Default for Bindings {
    /// WASD plus arrow keys to move, space to jump, Q to quit.
    fn default() -> Self {
        let mut b = Self::empty();
        b.bind(Key::W, Action::Forward)
            .bind(Key::Up, Action::Forward)
            .bind(Key::S, Action::Back)
            .bind(Key::Down, Action::Back)
            .bind(Key::A, Action::StrafeLeft)
            .bind(Key::Left, Action::StrafeLeft)
            .bind(Key::D, Action::StrafeRight)
            .bind(Key::Right, Action::StrafeRight)
            .bind(Key::Space, Action::Jump)
            .bind(Key::Q, Action::Quit);
        b
    }
}
