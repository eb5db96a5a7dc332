//! Registry resolving brush names and aliases to factories.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::error::Error;
use crate::core::types::Result;
use crate::player::PlayerContext;
use super::{
    Brush, BrushFactory, CheckeredBrushFactory, CloudyBrushFactory, NormalBrushFactory, RainbowBrush,
    RandomBrushFactory, ReplaceBrushFactory,
};

/// Case-insensitive brush registry
#[derive(Default)]
pub struct BrushManager {
    factories: Vec<Arc<dyn BrushFactory>>,
    by_name: HashMap<String, Arc<dyn BrushFactory>>,
    by_alias: HashMap<String, Arc<dyn BrushFactory>>,
    help: String,
}

impl BrushManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in brush
    pub fn with_builtin_brushes() -> Result<Self> {
        let mut manager = Self::new();
        manager.register_brush(Arc::new(NormalBrushFactory))?;
        manager.register_brush(Arc::new(CheckeredBrushFactory))?;
        manager.register_brush(Arc::new(RandomBrushFactory))?;
        manager.register_brush(Arc::new(CloudyBrushFactory))?;
        manager.register_brush(Arc::new(RainbowBrush::default()))?;
        manager.register_brush(Arc::new(ReplaceBrushFactory::replace()))?;
        manager.register_brush(Arc::new(ReplaceBrushFactory::replace_not()))?;
        Ok(manager)
    }

    /// Add a factory. Fails if its name or an alias is already taken.
    pub fn register_brush(&mut self, factory: Arc<dyn BrushFactory>) -> Result<()> {
        let name = factory.name().to_lowercase();
        let aliases: Vec<String> = factory.aliases().iter().map(|a| a.to_lowercase()).collect();

        for key in std::iter::once(&name).chain(&aliases) {
            if self.by_name.contains_key(key) || self.by_alias.contains_key(key) {
                return Err(Error::BrushNameConflict(key.clone()));
            }
        }
        if let Some(dup) = aliases.iter().enumerate().find_map(|(i, a)| {
            (*a == name || aliases[..i].contains(a)).then_some(a)
        }) {
            return Err(Error::BrushNameConflict(dup.clone()));
        }

        for alias in aliases {
            self.by_alias.insert(alias, Arc::clone(&factory));
        }
        if self.help.is_empty() {
            self.help.push_str("Available brushes: ");
        } else {
            self.help.push_str(", ");
        }
        self.help.push_str(&name);
        log::debug!("Registered brush {}", factory.name());
        self.by_name.insert(name, Arc::clone(&factory));
        self.factories.push(factory);
        Ok(())
    }

    /// Factory registered under `name` or an alias of it
    pub fn get_brush_factory(&self, name: &str) -> Option<Arc<dyn BrushFactory>> {
        let key = name.to_lowercase();
        self.by_name.get(&key).or_else(|| self.by_alias.get(&key)).cloned()
    }

    /// Factories in registration order
    pub fn registered_factories(&self) -> &[Arc<dyn BrushFactory>] {
        &self.factories
    }

    /// One-line list of registered brush names
    pub fn help_text(&self) -> &str {
        &self.help
    }

    /// Resolve and configure a brush from a command line.
    ///
    /// Without arguments the factory's default brush is used when it has one.
    /// Unknown names and bad arguments are reported to the player.
    pub fn make_brush(&self, player: &dyn PlayerContext, name: &str, args: &[&str]) -> Option<Box<dyn Brush>> {
        let Some(factory) = self.get_brush_factory(name) else {
            player.message(&format!("Unrecognized brush \"{name}\". {}", self.help));
            return None;
        };
        if args.is_empty() {
            if let Some(brush) = factory.make_default() {
                return Some(brush);
            }
        }
        factory.make_brush(player, args)
    }
}

impl std::fmt::Debug for BrushManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrushManager")
            .field("brushes", &self.factories.iter().map(|f| f.name()).collect::<Vec<_>>())
            .finish()
    }
}
