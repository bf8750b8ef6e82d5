/// A system prompt governing one assistant persona on the storefront.
#[derive(Debug, Clone, Copy)]
pub struct AgentPrompt {
    /// The agent type tag sent by the client (e.g. "resume")
    pub agent_type: &'static str,
    /// The system prompt forwarded ahead of the conversation
    pub system_prompt: &'static str,
}

/// Agent type used when the client sends an unknown or missing tag.
pub const DEFAULT_AGENT_TYPE: &str = "immigration";

/// All assistant personas. This is the single source of truth; the table is
/// immutable after load and unknown tags fall back to the default entry
/// instead of being rejected.
const AGENT_PROMPT_REGISTRY: &[AgentPrompt] = &[
    AgentPrompt {
        agent_type: "immigration",
        system_prompt: "You are an immigration assistant for newcomers to Canada. You help with \
            questions about visas, permanent residence, Express Entry, provincial nominee \
            programs, work and study permits, and settlement services. Give accurate, practical \
            guidance in plain English and recommend consulting a licensed immigration consultant \
            (RCIC) or lawyer for case-specific decisions. Never invent processing times or fees.",
    },
    AgentPrompt {
        agent_type: "resume",
        system_prompt: "You are a Canadian resume and cover letter coach. You help newcomers \
            adapt their experience to Canadian resume conventions: reverse-chronological format, \
            no photo, no personal details, quantified achievements, and keywords matched to the \
            job posting. Ask for the target role when it is unclear, and keep suggestions \
            concrete and encouraging.",
    },
    AgentPrompt {
        agent_type: "interview",
        system_prompt: "You are an interview preparation coach for newcomers entering the \
            Canadian job market. You run mock interviews, explain behavioural questions and the \
            STAR method, and give direct feedback on answers. Highlight Canadian workplace norms \
            (small talk, eye contact, follow-up emails) where relevant.",
    },
    AgentPrompt {
        agent_type: "courses",
        system_prompt: "You are a learning advisor for newcomers to Canada. You help users pick \
            courses and certifications that improve their employability in Canada, including \
            credential recognition, bridging programs, and language training. Keep \
            recommendations specific and explain why each one helps.",
    },
];

/// Resolve the system prompt for an agent type tag.
///
/// Unknown tags resolve to the default ("immigration") entry.
pub fn system_prompt_for(agent_type: &str) -> &'static str {
    AGENT_PROMPT_REGISTRY
        .iter()
        .find(|p| p.agent_type == agent_type)
        .or_else(|| {
            AGENT_PROMPT_REGISTRY
                .iter()
                .find(|p| p.agent_type == DEFAULT_AGENT_TYPE)
        })
        .map(|p| p.system_prompt)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_agent_type_resolves_to_its_prompt() {
        assert!(system_prompt_for("resume").contains("resume"));
        assert!(system_prompt_for("interview").contains("interview"));
    }

    #[test]
    fn unknown_agent_type_falls_back_to_immigration() {
        let fallback = system_prompt_for("definitely-not-an-agent");
        assert_eq!(fallback, system_prompt_for(DEFAULT_AGENT_TYPE));
        assert!(fallback.contains("immigration assistant"));
    }

    #[test]
    fn registry_contains_the_default_entry() {
        assert!(AGENT_PROMPT_REGISTRY
            .iter()
            .any(|p| p.agent_type == DEFAULT_AGENT_TYPE));
    }
}
