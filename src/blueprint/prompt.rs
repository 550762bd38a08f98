//! Prompt contract for blueprint generation
//!
//! The instruction text, the JSON schema contract the model must honor, the
//! repair instruction for near-miss outputs, and the serialized paper block.

use crate::ingest::PaperRef;
use crate::llm::Message;

/// Abstracts are truncated to this many characters in the paper block.
const ABSTRACT_CHARS: usize = 500;

/// Authors listed per paper in the paper block.
const AUTHOR_LIMIT: usize = 5;

pub const MASTER_INSTRUCTION: &str = r#"Role: You are a Senior AI Architect and a Lead Hiring Manager at a top-tier startup (like Anthropic, OpenAI, or Vercel). Your goal is to identify cutting-edge research and translate it into "Startup-Grade" engineering projects.

Task: Analyze the provided list of the newest Arxiv papers (titles + abstracts + links). Select 5-10 papers that have the highest potential for real-world application or represent a significant technical breakthrough that a Software Engineer (SWE) or Machine Learning Engineer (MLE) can implement as a standout resume project.

For each selected paper, generate a project blueprint with the following sections:

Project Title & Concept: A catchy, "startup-style" name and a 2-sentence value proposition.

Technical Core (The "Hard" Part): Explain exactly which technical mechanism from the paper needs to be implemented (e.g., a specific attention modification, a new RAG retrieval strategy, or a novel loss function). This must be the "wow factor" on a resume.

Startup-Level Implementation: How should this be built to look professional? (e.g., "Build a distributed crawler using Ray," "Implement a low-latency FastAPI endpoint with Redis caching," or "Create a real-time monitoring dashboard with Prometheus").

Modern Tech Stack: List specific, 2026-relevant tools (e.g., PyTorch, LangGraph, Qdrant, Modal for serverless GPU, or ONNX for edge deployment).

Resume "Impact" Bullets: Provide 3 bullet points written in the "Action-Context-Result" format that the user can adapt for their resume (e.g., "Reduced inference latency by 40% by implementing the [Paper Name] technique...").

Constraints: Avoid "Generic" projects (e.g., no basic chatbots or simple sentiment analysis). Prioritize projects that demonstrate End-to-End Engineering: Data ingestion, Model/Logic, and Deployment.

Focus on current 2026 trends: Agentic workflows, Multi-modal RAG, Small Language Model (SLM) optimization, and AI Security/Privacy.

Thinking Process: Before listing the projects, briefly summarize the 3 biggest "Research Themes" you see in this batch to ground your suggestions."#;

pub const JSON_SCHEMA_INSTRUCTION: &str = r#"
Return ONLY raw JSON matching this exact schema. No markdown fences. No commentary. No trailing commas.

{
  "researchThemes": ["theme1", "theme2", "theme3"],
  "ideas": [
    {
      "startupName": "string",
      "valueProposition": "Exactly two sentences.",
      "whyThisPaper": "Exactly one sentence explaining why a hiring manager would be impressed by this paper-to-project translation.",
      "technicalCore": "string",
      "implementation": "string",
      "techStack": ["string", "5-12 items"],
      "resumeBullets": ["bullet1", "bullet2", "bullet3"],
      "paper": {
        "title": "string",
        "url": "string",
        "authors": ["optional"],
        "abstract": "optional",
        "arxivId": "optional",
        "publishedAt": "optional",
        "primaryCategory": "optional"
      },
      "scores": {
        "demand_urgency": 0,
        "pricing_power": 0,
        "distribution_ease": 0,
        "speed_to_mvp": 0
      }
    }
  ]
}

Hard requirements:
- Return ONLY raw JSON. No markdown fences. No commentary.
- Provide exactly 3 researchThemes.
- Choose 5-10 ideas.
- valueProposition must be exactly two sentences.
- whyThisPaper must be exactly one sentence.
- resumeBullets must be Action-Context-Result style.
- scores must be integer 0-10 for each field.
"#;

pub const REPAIR_INSTRUCTION: &str =
    "Fix this to valid JSON ONLY matching the schema. Output only JSON.";

const SYSTEM_JSON_ONLY: &str = "You are a JSON-only API. Return raw JSON.";

const SYSTEM_REPAIR: &str = "You are a JSON repair tool.";

/// Serialize the paper list into the numbered block embedded in the request.
pub fn build_papers_block(papers: &[PaperRef]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(papers.len());
    for (i, paper) in papers.iter().enumerate() {
        let authors = paper
            .authors
            .iter()
            .take(AUTHOR_LIMIT)
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");
        let abstract_head: String = paper.abstract_text.chars().take(ABSTRACT_CHARS).collect();
        lines.push(format!(
            "{}. [{}] {}\n   URL: {}\n   Authors: {}\n   Abstract: {}\n",
            i + 1,
            paper.primary_category,
            paper.title,
            paper.url,
            authors,
            abstract_head,
        ));
    }
    lines.join("\n")
}

/// Messages for the initial generation request: full instruction, schema
/// contract, and the serialized paper list as a single user turn.
pub fn generation_messages(papers: &[PaperRef]) -> Vec<Message> {
    let user_message = format!(
        "{}\n\n{}\n\n--- PAPERS ---\n{}",
        MASTER_INSTRUCTION,
        JSON_SCHEMA_INSTRUCTION,
        build_papers_block(papers),
    );
    vec![Message::system(SYSTEM_JSON_ONLY), Message::user(user_message)]
}

/// Messages for a repair request: the fix-it instruction plus the current
/// malformed candidate, sent to the same model that produced it.
pub fn repair_messages(candidate: &str) -> Vec<Message> {
    vec![
        Message::system(SYSTEM_REPAIR),
        Message::user(format!("{}\n\n{}", REPAIR_INSTRUCTION, candidate)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MessageRole;

    fn paper(n: usize) -> PaperRef {
        PaperRef {
            title: format!("Paper {}", n),
            url: format!("http://arxiv.org/abs/2601.0000{}", n),
            authors: vec![
                "A".into(),
                "B".into(),
                "C".into(),
                "D".into(),
                "E".into(),
                "F".into(),
            ],
            abstract_text: "x".repeat(600),
            arxiv_id: format!("2601.0000{}", n),
            published_at: "2026-01-10".into(),
            primary_category: "cs.LG".into(),
        }
    }

    #[test]
    fn papers_block_numbers_and_truncates() {
        let block = build_papers_block(&[paper(1), paper(2)]);
        assert!(block.starts_with("1. [cs.LG] Paper 1"));
        assert!(block.contains("2. [cs.LG] Paper 2"));
        // Abstract truncated to 500 chars
        assert!(block.contains(&"x".repeat(500)));
        assert!(!block.contains(&"x".repeat(501)));
        // Only the first five authors are listed
        assert!(block.contains("A, B, C, D, E"));
        assert!(!block.contains("F"));
    }

    #[test]
    fn generation_messages_shape() {
        let messages = generation_messages(&[paper(1)]);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::System);
        assert_eq!(messages[1].role, MessageRole::User);
        assert!(messages[1].content.contains("--- PAPERS ---"));
        assert!(messages[1].content.contains("researchThemes"));
    }

    #[test]
    fn repair_messages_carry_candidate() {
        let messages = repair_messages("{broken");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].content, SYSTEM_REPAIR);
        assert!(messages[1].content.contains(REPAIR_INSTRUCTION));
        assert!(messages[1].content.ends_with("{broken"));
    }
}
