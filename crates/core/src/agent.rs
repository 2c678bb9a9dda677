//! The backend's agent roster.
//!
//! The backend routes each query to one specialist agent or to the whole
//! team. The wire key goes out as `agent_type`; the display name is what the
//! backend stamps on streamed fragments.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentKind {
    /// General legal guidance and coordination (default)
    #[default]
    LegalAdvisor,
    /// Case law and statute research
    Researcher,
    /// Clause-by-clause contract review
    ContractAnalyzer,
    /// Regulatory compliance checks
    ComplianceAdvisor,
    /// Drafting of contracts, memos and policies
    DocumentDrafter,
    /// All specialists coordinated as one team
    Team,
}

impl AgentKind {
    pub const ALL: [AgentKind; 6] = [
        Self::LegalAdvisor,
        Self::Researcher,
        Self::ContractAnalyzer,
        Self::ComplianceAdvisor,
        Self::DocumentDrafter,
        Self::Team,
    ];

    /// Key sent as `agent_type` on outbound requests.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LegalAdvisor => "legal_advisor",
            Self::Researcher => "researcher",
            Self::ContractAnalyzer => "contract_analyzer",
            Self::ComplianceAdvisor => "compliance_advisor",
            Self::DocumentDrafter => "document_drafter",
            Self::Team => "team",
        }
    }

    /// Name the backend reports in the `agent` field of its events.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::LegalAdvisor => "LegalAdvisor",
            Self::Researcher => "LegalResearcher",
            Self::ContractAnalyzer => "ContractAnalyzer",
            Self::ComplianceAdvisor => "ComplianceAdvisor",
            Self::DocumentDrafter => "DocumentDrafter",
            Self::Team => "Legal Team",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == key)
            .ok_or_else(|| {
                let known: Vec<&str> = Self::ALL.iter().map(|k| k.as_str()).collect();
                format!("unknown agent '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_legal_advisor() {
        assert_eq!(AgentKind::default(), AgentKind::LegalAdvisor);
    }

    #[test]
    fn parse_roundtrips_every_kind() {
        for kind in AgentKind::ALL {
            assert_eq!(kind.as_str().parse::<AgentKind>().unwrap(), kind);
        }
        assert_eq!(" TEAM ".parse::<AgentKind>().unwrap(), AgentKind::Team);
    }

    #[test]
    fn unknown_agent_lists_known_keys() {
        let err = "paralegal".parse::<AgentKind>().unwrap_err();
        assert!(err.contains("paralegal"));
        assert!(err.contains("document_drafter"));
    }

    #[test]
    fn serde_uses_wire_keys() {
        let json = serde_json::to_string(&AgentKind::ContractAnalyzer).unwrap();
        assert_eq!(json, r#""contract_analyzer""#);
    }

    #[test]
    fn team_display_name() {
        assert_eq!(AgentKind::Team.display_name(), "Legal Team");
    }
}
