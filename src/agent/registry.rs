//! Agent registry for agent-demo.
//!
//! The registry is an ordered table keyed by agent name. It is built in (the
//! seven hotel demo agents) unless an `agents.yaml` file replaces it.
//!
//! # File Format
//!
//! ```yaml
//! agents:
//!   - name: "Check-in Processor"
//!     executable_path: "checkin-agent.py"
//!     description: "Processes guest arrivals and personalised check-ins"
//!     demo_scenario: "Sample booking data: Alice Wonderland, Room 305, VIP guest"
//!     expected_output: "Guest processing and room assignment"
//!     tag: "[CHECKIN]"
//! ```
//!
//! Agents are listed in file order. `file` and `demo_data` are accepted as
//! aliases of `executable_path` and `demo_scenario`.

use crate::error::{DemoError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One demo agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDescriptor {
    /// Unique, human-readable agent name.
    pub name: String,

    /// Script path, relative to the working directory unless absolute.
    #[serde(alias = "file")]
    pub executable_path: PathBuf,

    /// What the agent does.
    #[serde(default)]
    pub description: String,

    /// The demo data the agent works on.
    #[serde(default, alias = "demo_data")]
    pub demo_scenario: String,

    /// What the audience should expect to see.
    #[serde(default)]
    pub expected_output: String,

    /// Bracketed display tag shown in front of the name (e.g. `[HR]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl AgentDescriptor {
    fn builtin(
        name: &str,
        file: &str,
        tag: &str,
        description: &str,
        demo_scenario: &str,
        expected_output: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            executable_path: PathBuf::from(file),
            description: description.to_string(),
            demo_scenario: demo_scenario.to_string(),
            expected_output: expected_output.to_string(),
            tag: Some(tag.to_string()),
        }
    }

    /// Name prefixed with the display tag, as shown in the selector.
    pub fn label(&self) -> String {
        match &self.tag {
            Some(tag) if !tag.is_empty() => format!("{} {}", tag, self.name),
            _ => self.name.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    agents: Vec<AgentDescriptor>,
}

/// Ordered, immutable table of agents.
#[derive(Debug, Clone)]
pub struct AgentRegistry {
    agents: Vec<AgentDescriptor>,
}

impl AgentRegistry {
    /// The built-in hotel demo agents.
    pub fn builtin() -> Self {
        let agents = vec![
            AgentDescriptor::builtin(
                "Check-in Processor",
                "checkin-agent.py",
                "[CHECKIN]",
                "Processes guest arrivals and personalised check-ins",
                "Sample booking data: Alice Wonderland, Room 305, VIP guest",
                "Guest processing and room assignment",
            ),
            AgentDescriptor::builtin(
                "Customer Service",
                "customerservice-agent.py",
                "[SERVICE]",
                "Intelligent FAQ resolution and escalation management",
                "Guest inquiry: 'What time is breakfast served?'",
                "FAQ analysis and knowledge base management",
            ),
            AgentDescriptor::builtin(
                "F&B Management",
                "fb-agent.py",
                "[F&B]",
                "Inventory optimisation and menu engineering",
                "Analysing 25 inventory items across 5 categories",
                "Inventory analysis and menu optimization",
            ),
            AgentDescriptor::builtin(
                "Finance Processor",
                "finance-agent.py",
                "[FINANCE]",
                "Automated invoice verification and matching",
                "Processing 7 invoices against purchase orders",
                "Invoice verification and discrepancy detection",
            ),
            AgentDescriptor::builtin(
                "HR Assistant",
                "hr-agent.py",
                "[HR]",
                "Employee onboarding and progress tracking",
                "Managing 6 new hires across different departments",
                "Onboarding progress analysis",
            ),
            AgentDescriptor::builtin(
                "Maintenance Coordinator",
                "maintenance-agent3.py",
                "[MAINTENANCE]",
                "Predictive maintenance and property care",
                "Monitoring 25 assets with IoT integration",
                "Asset health analysis and maintenance recommendations",
            ),
            AgentDescriptor::builtin(
                "Marketing Engine",
                "marketing-agent.py",
                "[MARKETING]",
                "Personalised guest marketing and offers",
                "Creating targeted offers for 8 guest profiles",
                "Personalised marketing offers generation",
            ),
        ];

        Self { agents }
    }

    /// Build a registry from descriptors, validating the table.
    ///
    /// Validation rules:
    /// - At least one agent must be defined
    /// - Names must be non-empty and unique
    /// - Executable paths must be non-empty
    pub fn from_agents(agents: Vec<AgentDescriptor>) -> Result<Self> {
        if agents.is_empty() {
            return Err(DemoError::UserError(
                "agents.yaml validation failed: no agents defined".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for agent in &agents {
            if agent.name.trim().is_empty() {
                return Err(DemoError::UserError(
                    "agents.yaml validation failed: agent name cannot be empty".to_string(),
                ));
            }
            if !seen.insert(agent.name.as_str()) {
                return Err(DemoError::UserError(format!(
                    "agents.yaml validation failed: duplicate agent name '{}'",
                    agent.name
                )));
            }
            if agent.executable_path.as_os_str().is_empty() {
                return Err(DemoError::UserError(format!(
                    "agents.yaml validation failed: agent '{}' has empty executable_path",
                    agent.name
                )));
            }
        }

        Ok(Self { agents })
    }

    /// Parse a registry from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let file: RegistryFile = if yaml.trim().is_empty() {
            RegistryFile::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| DemoError::UserError(format!("failed to parse agents.yaml: {}", e)))?
        };

        Self::from_agents(file.agents)
    }

    /// Load a registry from a YAML file.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    /// Returns `Err` if the file exists but cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            DemoError::UserError(format!(
                "failed to read agents file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content).map(Some)
    }

    /// Load a registry from `path`, or fall back to the built-in agents.
    pub fn load_or_builtin<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::load(path)?.unwrap_or_else(Self::builtin))
    }

    /// All agents, in registry order.
    pub fn list(&self) -> &[AgentDescriptor] {
        &self.agents
    }

    /// Find an agent by name.
    ///
    /// An exact match wins; otherwise a unique case-insensitive match is accepted.
    pub fn lookup(&self, name: &str) -> Result<&AgentDescriptor> {
        if let Some(agent) = self.agents.iter().find(|a| a.name == name) {
            return Ok(agent);
        }

        let mut folded = self
            .agents
            .iter()
            .filter(|a| a.name.eq_ignore_ascii_case(name));
        if let (Some(agent), None) = (folded.next(), folded.next()) {
            return Ok(agent);
        }

        Err(DemoError::UserError(format!(
            "agent '{}' not found.\nAvailable agents: {}",
            name,
            self.names().join(", ")
        )))
    }

    /// Agent names, in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name.as_str()).collect()
    }

    /// Number of agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
