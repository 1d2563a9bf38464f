use serde::{Deserialize, Serialize};

/// Session command bound to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommand {
    TapCenter,
    Start,
    Stop,
}

/// Key name as written in config files (`"Space"`, `"Enter"`, `"KeyJ"`...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyName(pub String);

impl KeyName {
    pub fn new(name: &str) -> Self {
        Self(name.to_string())
    }

    pub fn matches(&self, name: &str) -> bool {
        self.0.eq_ignore_ascii_case(name)
    }
}

/// Keyboard bindings for development play.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub tap: Vec<KeyName>,
    pub start: Vec<KeyName>,
    pub stop: Vec<KeyName>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            tap: vec![KeyName::new("Space")],
            start: vec![KeyName::new("Enter")],
            stop: vec![KeyName::new("Escape")],
        }
    }
}

impl KeyBindings {
    /// Resolve a key name; taps win when a key is bound twice.
    pub fn command_for(&self, name: &str) -> Option<KeyCommand> {
        let bound = |keys: &[KeyName]| keys.iter().any(|k| k.matches(name));
        if bound(&self.tap) {
            Some(KeyCommand::TapCenter)
        } else if bound(&self.start) {
            Some(KeyCommand::Start)
        } else if bound(&self.stop) {
            Some(KeyCommand::Stop)
        } else {
            None
        }
    }
}
