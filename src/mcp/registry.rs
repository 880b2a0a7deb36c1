//! Immutable, named collections of capabilities

use std::{collections::HashMap, fmt, sync::Arc};

use serde_json::Value;
use thiserror::Error;

use crate::mcp::capability::{to_json_object, Capability};
use crate::mcp::rpc::JsonObject;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityGroup {
    Tools,
    Prompts,
    Resources,
}

impl CapabilityGroup {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tools => "tools",
            Self::Prompts => "prompts",
            Self::Resources => "resources",
        }
    }
}

impl fmt::Display for CapabilityGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("{group} registry already contains a capability named \"{name}\"")]
    DuplicateCapability {
        group: CapabilityGroup,
        name: String,
    },
    #[error("{group} capability \"{name}\" has an unusable definition: {reason}")]
    InvalidDefinition {
        group: CapabilityGroup,
        name: String,
        reason: String,
    },
}

struct Registered {
    name: String,
    definition: JsonObject,
    capability: Arc<dyn Capability>,
}

/// Definitions are captured once at registration, so the advertised name is
/// always the lookup key and repeated listings are identical.
pub struct CapabilityRegistry {
    group: CapabilityGroup,
    entries: Vec<Registered>,
    index: HashMap<String, usize>,
}

impl CapabilityRegistry {
    pub fn new(
        group: CapabilityGroup,
        capabilities: Vec<Arc<dyn Capability>>,
    ) -> Result<Self, RegistryError> {
        let mut entries = Vec::with_capacity(capabilities.len());
        let mut index = HashMap::with_capacity(capabilities.len());

        for capability in capabilities {
            let tool = capability.definition();
            let name = tool.name.clone();
            if index.contains_key(&name) {
                return Err(RegistryError::DuplicateCapability { group, name });
            }
            let definition =
                to_json_object(&tool).map_err(|err| RegistryError::InvalidDefinition {
                    group,
                    name: name.clone(),
                    reason: err.to_string(),
                })?;

            index.insert(name.clone(), entries.len());
            entries.push(Registered {
                name,
                definition,
                capability,
            });
        }

        Ok(Self {
            group,
            entries,
            index,
        })
    }

    pub fn empty(group: CapabilityGroup) -> Self {
        Self {
            group,
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.group.as_str()
    }

    pub fn has_capabilities(&self) -> bool {
        !self.entries.is_empty()
    }

    pub fn get_capability(&self, name: &str) -> Option<&Arc<dyn Capability>> {
        self.index
            .get(name)
            .and_then(|position| self.entries.get(*position))
            .map(|entry| &entry.capability)
    }

    /// Registration order.
    pub fn all_capabilities(&self) -> impl Iterator<Item = &Arc<dyn Capability>> + '_ {
        self.entries.iter().map(|entry| &entry.capability)
    }

    /// Serialized definitions in registration order.
    pub fn definitions(&self) -> impl Iterator<Item = &JsonObject> + '_ {
        self.entries.iter().map(|entry| &entry.definition)
    }

    /// Negotiation block advertised under this registry's group name. Capability
    /// sets never change after startup, so `listChanged` is always false.
    pub fn parameters(&self) -> JsonObject {
        let mut parameters = JsonObject::new();
        parameters.insert("listChanged".to_string(), Value::Bool(false));
        parameters
    }
}

impl fmt::Debug for CapabilityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityRegistry")
            .field("group", &self.group)
            .field(
                "capabilities",
                &self
                    .entries
                    .iter()
                    .map(|entry| entry.name.as_str())
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
