use std::{fmt, str::FromStr};

/// Protocol method names recognised on the wire. Recognition does not imply a
/// handler exists; see the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McpMethod {
    Initialize,
    ToolsList,
    ToolsCall,
    NotificationToolsListChanged,
    PromptsList,
    PromptsGet,
    ResourcesList,
    ResourcesTemplatesList,
    ResourcesRead,
    ResourcesSubscribe,
    NotificationResourcesUpdated,
    NotificationResourcesListChanged,
}

impl McpMethod {
    pub const ALL: [McpMethod; 12] = [
        Self::Initialize,
        Self::ToolsList,
        Self::ToolsCall,
        Self::NotificationToolsListChanged,
        Self::PromptsList,
        Self::PromptsGet,
        Self::ResourcesList,
        Self::ResourcesTemplatesList,
        Self::ResourcesRead,
        Self::ResourcesSubscribe,
        Self::NotificationResourcesUpdated,
        Self::NotificationResourcesListChanged,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::ToolsList => "tools/list",
            Self::ToolsCall => "tools/call",
            Self::NotificationToolsListChanged => "notifications/tools/list_changed",
            Self::PromptsList => "prompts/list",
            Self::PromptsGet => "prompts/get",
            Self::ResourcesList => "resources/list",
            Self::ResourcesTemplatesList => "resources/templates/list",
            Self::ResourcesRead => "resources/read",
            Self::ResourcesSubscribe => "resources/subscribe",
            Self::NotificationResourcesUpdated => "notifications/resources/updated",
            Self::NotificationResourcesListChanged => "notifications/resources/list_changed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMethod(pub String);

impl FromStr for McpMethod {
    type Err = UnknownMethod;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|method| method.as_str() == value)
            .ok_or_else(|| UnknownMethod(value.to_string()))
    }
}

impl fmt::Display for McpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
