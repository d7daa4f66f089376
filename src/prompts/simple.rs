//! The fixed topic-only prompt behind `/api/gemini`.
//!
//! The output is requested in labeled sections so callers can split the
//! reply by header, even though the relay itself returns it unparsed.

pub const SUMMARY_LABEL: &str = "SUMMARY:";
pub const QUIZ_LABEL: &str = "QUIZ:";
pub const ACTIVITY_LABEL: &str = "ACTIVITY:";

const RULES: &[&str] = &[
    "Respond only in English.",
    "Do not add any introduction, commentary, or closing remarks.",
    "Use the section labels exactly as written above, each on its own line.",
];

pub fn build_simple_prompt(topic: &str) -> String {
    let rules = RULES
        .iter()
        .map(|rule| format!("- {rule}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are a teacher in Kenya following the CBC curriculum. Create learning material about \"{topic}\" in the following structure:\n\n\
         {SUMMARY_LABEL}\n\
         A summary of the topic in 3-4 sentences.\n\n\
         {QUIZ_LABEL}\n\
         Exactly 3 multiple-choice questions. Each question has 4 options labeled A), B), C), D), with the correct option marked \"(correct)\".\n\n\
         {ACTIVITY_LABEL}\n\
         One practical exercise learners can do in real life.\n\n\
         Rules:\n{rules}\n"
    )
}
