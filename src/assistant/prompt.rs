//! Prompt Builder
//!
//! Sectioned construction of system instructions for the assistant.

/// Prompt section types
#[derive(Debug, Clone)]
enum PromptSection {
    /// Who the model is and what it does
    Role { persona: String, task: String },
    /// Numbered rules
    Rules(Vec<String>),
    /// Raw text
    Text(String),
    /// Fenced block
    Code { language: String, content: String },
}

/// Builder for system instructions
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(mut self, persona: &str, task: &str) -> Self {
        self.sections.push(PromptSection::Role {
            persona: persona.to_string(),
            task: task.to_string(),
        });
        self
    }

    pub fn rules(mut self, rules: &[&str]) -> Self {
        self.sections.push(PromptSection::Rules(
            rules.iter().map(|r| r.to_string()).collect(),
        ));
        self
    }

    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text(content.to_string()));
        self
    }

    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Role { persona, task } => {
                    prompt.push_str(&format!("You are {}. {}\n\n", persona, task));
                }
                PromptSection::Rules(rules) => {
                    for (i, rule) in rules.iter().enumerate() {
                        prompt.push_str(&format!("{}. {}\n", i + 1, rule));
                    }
                    prompt.push('\n');
                }
                PromptSection::Text(content) => {
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

/// Preset instructions used by the assistant
pub struct PromptTemplates;

impl PromptTemplates {
    /// Chat instruction embedding the venue snapshot
    pub fn venue_chat(snapshot: &str, ids_field: &str) -> String {
        let ids_rule = format!(
            "Put the ids of every venue you recommend in the '{}' list of the JSON answer. \
             Leave the list empty if you recommend nothing.",
            ids_field
        );

        PromptBuilder::new()
            .role(
                "a friendly, professional AI assistant",
                "Your job is to help the customer find the perfect venue for their \
                 preferences (type, rating, atmosphere, partnership).",
            )
            .rules(&[
                "Recommend and assist using ONLY the venues listed below.",
                "Keep answers very short, concise and direct. Do NOT repeat venue details in the text.",
                ids_rule.as_str(),
            ])
            .text("Venues (with ids):")
            .code("json", snapshot)
            .build()
    }

    /// Single-shot venue summary instruction
    pub fn venue_summary() -> String {
        PromptBuilder::new()
            .role(
                "an expert in local recommendations",
                "Write a short, persuasive summary of this venue.",
            )
            .text(
                "The summary must be one short paragraph that captures the atmosphere. \
                 End with A SINGLE sentence: \"Perfect for...\". Answer ONLY with the text.",
            )
            .build()
    }
}
