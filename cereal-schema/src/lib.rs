//! TOML event scripts for vkcereal.
//!
//! An event script is a recorded walk over the Vulkan registry: features in
//! order, each listing the entities it introduces. Replaying a script
//! produces the same event stream a registry driver would.
//!
//! ```toml
//! [[entity]]
//! kind = "type"
//! name = "VkFlags"
//! category = "basic"
//!
//! [[feature]]
//! name = "VK_VERSION_1_0"
//!
//! [[feature.entity]]
//! kind = "struct"
//! name = "VkExtent2D"
//! fields = [
//!     { name = "width", type = "uint32_t" },
//!     { name = "height", type = "uint32_t" },
//! ]
//!
//! [[feature.entity]]
//! kind = "struct"
//! name = "VkExtent2DKHR"
//! alias = "VkExtent2D"
//! ```

// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

mod error;

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;
use vkcereal_codegen::{EntityInfo, EntityKind, Event, GenOptions};

pub use error::{Error, Result};

/// Root of an event script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EventScript {
    /// Entities outside any feature block, replayed first.
    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityDecl>,

    /// Feature blocks, in replay order.
    #[serde(default, rename = "feature")]
    pub features: Vec<Feature>,
}

/// One `[[feature]]` block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    /// Guard macro, e.g. `VK_VERSION_1_0`.
    pub name: String,

    #[serde(default, rename = "entity")]
    pub entities: Vec<EntityDecl>,
}

/// One entity notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityDecl {
    pub kind: EntityKind,
    pub name: String,
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(flatten)]
    pub info: EntityInfo,
}

impl EntityDecl {
    fn to_event(&self) -> Event {
        Event::Entity {
            kind: self.kind,
            info: self.info.clone(),
            name: self.name.clone(),
            alias: self.alias.clone(),
        }
    }
}

impl FromStr for EventScript {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "events.toml")
    }
}

impl EventScript {
    /// Parse an event script from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse an event script with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::parse(e, content, filename))
    }

    /// Number of entity notifications in the script.
    pub fn entity_count(&self) -> usize {
        self.entities.len() + self.features.iter().map(|f| f.entities.len()).sum::<usize>()
    }

    /// The complete event stream for one file written under `directory`.
    pub fn events(&self, directory: impl Into<PathBuf>) -> Vec<Event> {
        let mut events = Vec::with_capacity(self.entity_count() + self.features.len() * 2 + 2);
        events.push(Event::BeginFile(GenOptions::new(directory)));
        events.extend(self.entities.iter().map(EntityDecl::to_event));

        for feature in &self.features {
            events.push(Event::BeginFeature(feature.name.clone()));
            events.extend(feature.entities.iter().map(EntityDecl::to_event));
            events.push(Event::EndFeature);
        }

        events.push(Event::EndFile);
        events
    }
}
