//! Prompt construction for deliberation rounds.
//!
//! Prompts carry three parts: the agent's persona (rendered from its
//! free-form attribute map), the operation under review, and the full
//! transcript so far. The `|@Name|` mention convention is part of the
//! transcript contract, so every prompt spells it out.

use agora_types::{Agent, Operation};

/// Renders an agent's persona block from its attribute map.
pub(crate) fn persona(agent: &Agent, role_line: &str) -> String {
    let mut out = format!("You are {}, {}.\n", agent.name, role_line);

    for (key, value) in &agent.attributes {
        match value {
            serde_json::Value::Array(items) => {
                let rendered: Vec<String> = items.iter().map(render_value).collect();
                out.push_str(&format!("{}: {}\n", title_case(key), rendered.join(", ")));
            }
            other => {
                out.push_str(&format!("{}: {}\n", title_case(key), render_value(other)));
            }
        }
    }

    out
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn transcript_block(transcript: &str) -> String {
    format!(
        "--- Previous Discussion Log ---\n{}\n--- End of Discussion Log ---\n",
        transcript
    )
}

const MENTION_RULE: &str = "When referencing another reviewer you MUST use the exact \
format |@Name| - the pipes are required, and never mention reviewers that have not \
already appeared in the discussion log.";

/// Prompt for one paper-review round.
pub(crate) fn paper_review(
    agent: &Agent,
    title: &str,
    abstract_text: &str,
    content: &str,
    transcript: &str,
) -> String {
    format!(
        "{persona}\n\
You are participating in a multi-round review of the following research paper:\n\n\
Title: {title}\n\
Abstract: {abstract_text}\n\
Content: {content}\n\n\
{log}\n\
Write your review as part of an ongoing academic discussion: build on, critique, or \
clarify earlier points. {mention}\n\n\
Consider scientific merit, reproducibility, clarity, and significance.\n\n\
Respond with ONLY a JSON object in this exact shape:\n\
{{\n\
  \"summary\": \"brief overview and any evolution of your opinion\",\n\
  \"flaws\": [\"major issues\"],\n\
  \"suggestions\": [\"constructive feedback\"],\n\
  \"is_reproducible\": true,\n\
  \"approval\": true\n\
}}\n\
The approval field must be a boolean, not a string.",
        persona = persona(agent, "a scientific reviewer with the following background"),
        title = title,
        abstract_text = abstract_text,
        content = content,
        log = transcript_block(transcript),
        mention = MENTION_RULE,
    )
}

/// Prompt for one loan-review round.
pub(crate) fn loan_review(agent: &Agent, details: &str, transcript: &str) -> String {
    format!(
        "{persona}\n\
You are participating in a multi-round review of this loan request:\n\n\
Request Details: {details}\n\n\
{log}\n\
Write your review as part of an ongoing discussion with the other bankers. {mention}\n\n\
Consider collateralization and risk, the borrower's history, the purpose and viability \
of the loan, and market conditions.\n\n\
Respond with ONLY a JSON object in this exact shape:\n\
{{\n\
  \"summary\": \"your discussion summary\",\n\
  \"risk_factors\": [\"risk\"],\n\
  \"terms\": [\"term\"],\n\
  \"approval\": true\n\
}}\n\
The approval field must be a boolean, not a string.",
        persona = persona(agent, "a DeFi banker with the following background"),
        details = details,
        log = transcript_block(transcript),
        mention = MENTION_RULE,
    )
}

/// Prompt for one discussion round.
pub(crate) fn discussion(agent: &Agent, topic: &str, transcript: &str) -> String {
    format!(
        "{persona}\n\
You are participating in a group discussion about this statement:\n\n\
{topic}\n\n\
{log}\n\
Share your thoughts naturally, based on your personality. If others have spoken, build \
on or challenge their points. {mention}\n\n\
Your stance must be consistent with your message: SUPPORT if you agree with the \
statement, OPPOSE if you disagree, QUESTION if you are unsure - and exactly one of the \
three flags below should be true.\n\n\
Respond with ONLY a JSON object in this exact shape:\n\
{{\n\
  \"message\": \"your discussion message\",\n\
  \"support\": false,\n\
  \"oppose\": false,\n\
  \"question\": false\n\
}}",
        persona = persona(agent, "joining a validator panel discussion"),
        topic = topic,
        log = transcript_block(transcript),
        mention = MENTION_RULE,
    )
}

/// Builds the round prompt for any deliberated operation kind.
///
/// Validator registrations are not deliberated and yield no prompt.
pub(crate) fn for_operation(agent: &Agent, op: &Operation, transcript: &str) -> Option<String> {
    match op {
        Operation::PaperSubmission {
            title,
            abstract_text,
            content,
            ..
        } => Some(paper_review(agent, title, abstract_text, content, transcript)),
        Operation::LoanRequest { details, .. } => Some(loan_review(agent, details, transcript)),
        Operation::GenericDiscussion { topic, .. } => Some(discussion(agent, topic, transcript)),
        Operation::ValidatorRegistration { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_types::AgentId;

    fn agent() -> Agent {
        Agent::new(AgentId::new("a-1"), "Ada", "validator")
            .with_attribute("traits", serde_json::json!(["curious", "skeptical"]))
            .with_attribute("style", serde_json::json!("terse"))
    }

    #[test]
    fn test_persona_renders_attributes() {
        let text = persona(&agent(), "a reviewer");
        assert!(text.starts_with("You are Ada, a reviewer."));
        assert!(text.contains("Traits: curious, skeptical"));
        assert!(text.contains("Style: terse"));
    }

    #[test]
    fn test_prompts_embed_transcript_and_content() {
        let op = Operation::LoanRequest {
            originator: "bob".into(),
            details: "100 ETH".into(),
        };
        let prompt = for_operation(&agent(), &op, "[Round 0] (true) |@Bob|: fine").unwrap();
        assert!(prompt.contains("100 ETH"));
        assert!(prompt.contains("|@Bob|: fine"));
        assert!(prompt.contains("|@Name|"));
    }

    #[test]
    fn test_registration_has_no_prompt() {
        let op = Operation::ValidatorRegistration {
            originator: "carol".into(),
            pubkey: agora_types::PublicKeyBytes::from_bytes(&[1u8; 32]),
        };
        assert!(for_operation(&agent(), &op, "").is_none());
    }
}
