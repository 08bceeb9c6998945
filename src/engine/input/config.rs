// Input configuration and remapping system

use super::action::{default_bindings, Action, InputSource};
use std::collections::HashMap;

/// Maps input sources (keys) to game actions
///
/// Several sources may drive the same action; each source drives at most one.
#[derive(Debug, Clone)]
pub struct InputConfig {
    bindings: HashMap<InputSource, Action>,
}

impl InputConfig {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a configuration from a list of bindings
    pub fn from_bindings(bindings: Vec<(InputSource, Action)>) -> Self {
        let mut config = Self::new();
        for (source, action) in bindings {
            config.bind(source, action);
        }
        config
    }

    /// Bind an input source to an action, replacing any previous binding of that source
    pub fn bind(&mut self, source: InputSource, action: Action) {
        self.bindings.insert(source, action);
    }

    /// Get the action bound to an input source
    pub fn get_action(&self, source: InputSource) -> Option<Action> {
        self.bindings.get(&source).copied()
    }

    /// Get all input sources bound to an action
    pub fn sources_for(&self, action: Action) -> Vec<InputSource> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(s, _)| *s)
            .collect()
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self::from_bindings(default_bindings())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn test_bind_action() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyJ);
        config.bind(source, Action::Jump);

        assert_eq!(config.get_action(source), Some(Action::Jump));
    }

    #[test]
    fn test_sources_for() {
        let config = InputConfig::default();
        let sources = config.sources_for(Action::MoveRight);

        assert_eq!(sources.len(), 2);
        assert!(sources.contains(&InputSource::key(KeyCode::ArrowRight)));
        assert!(sources.contains(&InputSource::key(KeyCode::KeyD)));
    }

    #[test]
    fn test_rebind_source() {
        let mut config = InputConfig::new();
        let source = InputSource::key(KeyCode::KeyA);

        config.bind(source, Action::MoveLeft);
        config.bind(source, Action::MoveRight);

        assert_eq!(config.get_action(source), Some(Action::MoveRight));
        assert!(config.sources_for(Action::MoveLeft).is_empty());
    }

    #[test]
    fn test_default_binds_every_action() {
        let config = InputConfig::default();
        for action in Action::ALL {
            assert!(!config.sources_for(action).is_empty(), "{action:?} is unbound");
        }
    }
}
