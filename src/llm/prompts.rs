//! Prompt templates for idea, plan and topic requests

use std::collections::HashMap;

use crate::errors::IdeaSparkError;
use crate::errors::Result;

/// Template with `{{variable}}` placeholders
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Create a new prompt template
    pub fn new(template: impl Into<String>) -> Self {
        let template = template.into();
        let variables = segments(&template)
            .into_iter()
            .filter_map(|segment| match segment {
                Segment::Variable(name) => Some(name.to_string()),
                Segment::Text(_) => None,
            })
            .fold(Vec::new(), |mut acc, name| {
                if !acc.contains(&name) {
                    acc.push(name);
                }
                acc
            });

        Self {
            template,
            variables,
        }
    }

    /// Fill in every placeholder in one pass
    ///
    /// Substituted values are never re-scanned, so user text containing
    /// `{{...}}` is inserted literally.
    ///
    /// # Errors
    /// - `Prompt` naming the first placeholder without a value
    pub fn render(&self, values: &HashMap<&str, String>) -> Result<String> {
        let mut result = String::with_capacity(self.template.len());
        for segment in segments(&self.template) {
            match segment {
                Segment::Text(text) => result.push_str(text),
                Segment::Variable(name) => {
                    let value = values
                        .get(name)
                        .ok_or_else(|| IdeaSparkError::Prompt(name.to_string()))?;
                    result.push_str(value);
                }
            }
        }
        Ok(result)
    }

    /// Get required variables
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }
}

enum Segment<'a> {
    Text(&'a str),
    Variable(&'a str),
}

/// Split a template into literal text and `{{name}}` placeholders
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let after_open = &rest[start + 2..];
        let Some(len) = after_open.find("}}") else {
            break;
        };
        let name = after_open[..len].trim();
        if name.is_empty() {
            // "{{}}" is literal text
            out.push(Segment::Text(&rest[..start + 4]));
        } else {
            out.push(Segment::Text(&rest[..start]));
            out.push(Segment::Variable(name));
        }
        rest = &after_open[len + 2..];
    }

    out.push(Segment::Text(rest));
    out
}

/// System framing for idea generation
pub const IDEA_SYSTEM_PROMPT: &str = "You are a creative project coach.";
/// System framing for execution plans
pub const PLAN_SYSTEM_PROMPT: &str = "You are a detailed project planner.";
/// System framing for topic extraction
pub const TOPIC_SYSTEM_PROMPT: &str =
    "You extract only the topic of a query, like a search engine.";

/// System framing for polishing a drafted reply
pub const TUTOR_SYSTEM_PROMPT: &str = "You are HighSchoolTutorAI: a friendly, expert tutor for grades 9–12.
- Define any technical term in simple language.
- Use real-world examples.
- Keep tone encouraging and concise.
- Always tailor content to a high-school audience.";

const IDEA_FORMAT: &str = r"For each idea, return **exactly** in this format:

---
Project Title: <Concise, engaging title>
Summary: <One-sentence overview>
Problem Being Solved: <What real issue it addresses>
Proposed Solution: <How the idea solves it>
Resources Required: <Key materials or expertise>
Basic Items Needed & Approximate Cost (₹):
- Item 1 (e.g., {{item_one}}): ₹X (use inexpensive, commonly available items, under ₹300 each)
- Item 2 (e.g., {{item_two}}): ₹Y
- Item 3 (e.g., {{item_three}}): ₹Z
(Try to keep total cost around ₹1,500 or less for the entire project.)
Timeline: <High-level phases and durations>
Cost Involved: ₹<total cost> (sum of items above)
Recommended Competition: <Suggest one contest/category from your dataset where this could be entered>
Step-by-Step Execution:
1. ...
2. ...
…
How to Measure Success: <Metrics or outcomes>
Final Tips for Completion: <Any final advice>
---";

/// Standard project prompt templates
pub struct ProjectPrompts;

impl ProjectPrompts {
    /// Ideas grounded in a numbered list of past projects
    #[must_use]
    pub fn ideas_with_context() -> PromptTemplate {
        PromptTemplate::new(format!(
            r#"You're a project mentor for high school students.

Here are some existing student projects for inspiration:
{{{{context}}}}

Using only those as inspiration, generate {{{{idea_count}}}} brand-new, creative project ideas in the domain of "{{{{topic}}}}".

{}"#,
            IDEA_FORMAT
                .replace("{{item_one}}", "cardboard sheet")
                .replace("{{item_two}}", "glue stick")
                .replace("{{item_three}}", "LEDs, wires")
        ))
    }

    /// Ideas without any past-project examples
    #[must_use]
    pub fn ideas_fallback() -> PromptTemplate {
        PromptTemplate::new(format!(
            r#"You're a project mentor for high school students.

Generate {{{{idea_count}}}} innovative, practical project ideas in the domain of "{{{{topic}}}}".

{}"#,
            IDEA_FORMAT
                .replace("{{item_one}}", "popsicle sticks")
                .replace("{{item_two}}", "sensors or simple microcontroller")
                .replace("{{item_three}}", "paint, markers")
        ))
    }

    /// Step-by-step execution plan for one project
    #[must_use]
    pub fn execution_plan() -> PromptTemplate {
        PromptTemplate::new(
            r#"You're a project mentor for high school students.
Provide a detailed, step-by-step execution plan for the project:
"{{topic}}"

Return the plan as a numbered list of steps, followed by:
- Estimated timeline
- Key materials needed
- Final tips for success"#,
        )
    }

    /// Polish a drafted chatbot reply into one structured project idea
    #[must_use]
    pub fn refine_draft() -> PromptTemplate {
        PromptTemplate::new(
            r#"Here's the draft reply from a reasoning model; please:
1. Polish it for a high-school audience.
2. Propose one unique, sensible, original project idea.
3. Recommend one relevant competition to apply for (with name and deadline).
4. Suggest the best AI model or integration to help build the project.

"""
{{draft}}
"""

Additionally, format the project idea using exactly this structure:

Project Title: <Concise, engaging title>
Summary: <One-sentence overview>
Problem Being Solved: <What real issue it addresses>
Proposed Solution: <How the idea solves it>
Resources Required: <Key materials or expertise>
Basic Items Needed & Approximate Cost (₹):
- Item 1: ₹X (under ₹300)
- Item 2: ₹Y
- Item 3: ₹Z
Total Cost: ₹<sum of items>
Timeline: <High-level phases and durations>
Recommended Competition: <Contest name + deadline>
Step-by-Step Execution:
1. ...
2. ...
…
How to Measure Success: <Metrics or outcomes>
Final Tips for Completion: <Any final advice>"#,
        )
    }

    /// Keyword extraction with two worked examples
    #[must_use]
    pub fn topic_extraction() -> PromptTemplate {
        PromptTemplate::new(
            r#"Input: "{{input}}"

Extract only the 2-3 most relevant keywords that represent the main topic or domain of the user's request.
Do NOT explain or generate. Just return keywords. All lowercase.

Examples:
- Input: "Give me some cool ideas about eco-friendly tech"
  Output: eco-friendly technology

- Input: "I want a project to save water and recycle stuff"
  Output: water recycling

- Input: "{{input}}"
  Output:"#,
        )
    }
}
