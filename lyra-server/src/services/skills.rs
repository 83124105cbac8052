//! The fixed skills catalog.

/// A capability the assistant advertises to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    pub id: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub active: bool,
}

static SKILLS: [Skill; 4] = [
    Skill {
        id: "web_search",
        name: "Web Search",
        icon: "🔍",
        active: true,
    },
    Skill {
        id: "document_analysis",
        name: "Document Analysis",
        icon: "📝",
        active: true,
    },
    Skill {
        id: "data_visualization",
        name: "Data Visualization",
        icon: "📊",
        active: false,
    },
    Skill {
        id: "code_assistant",
        name: "Code Assistant",
        icon: "💻",
        active: true,
    },
];

pub fn list() -> &'static [Skill] {
    &SKILLS
}
