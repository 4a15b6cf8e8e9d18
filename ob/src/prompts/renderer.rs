//! Prompt Renderer
//!
//! Fills the embedded plan template with the user's goals.

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Context for rendering the plan prompt
#[derive(Debug, Clone, Serialize)]
pub struct PlanPromptContext<'a> {
    pub weekly_goals: &'a str,
    pub overall_goals: &'a str,
}

/// Renders prompt templates
pub struct PromptRenderer {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
}

impl PromptRenderer {
    pub fn new() -> Self {
        debug!("PromptRenderer::new: called");
        let mut hbs = Handlebars::new();
        // Goals are plain text for the model, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        Self { hbs }
    }

    /// Render an embedded template by name
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptRenderer::render: called");
        let template =
            embedded::get_embedded(template_name).ok_or_else(|| eyre!("Prompt template not found: {}", template_name))?;

        self.hbs
            .render_template(template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the plan prompt for one pair of goals
    pub fn plan_prompt(&self, weekly_goals: &str, overall_goals: &str) -> Result<String> {
        debug!(
            weekly_len = weekly_goals.len(),
            overall_len = overall_goals.len(),
            "PromptRenderer::plan_prompt: called"
        );
        self.render(
            "plan",
            &PlanPromptContext {
                weekly_goals,
                overall_goals,
            },
        )
    }
}

impl Default for PromptRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_prompt_embeds_goals() {
        let renderer = PromptRenderer::new();
        let prompt = renderer.plan_prompt("ship v1", "grow users").unwrap();

        assert!(prompt.contains("Weekly goals: ship v1"));
        assert!(prompt.contains("Overall goals: grow users"));
        assert!(!prompt.contains("{{"));
    }

    #[test]
    fn test_plan_prompt_is_deterministic() {
        let renderer = PromptRenderer::new();
        let a = renderer.plan_prompt("write docs", "be useful").unwrap();
        let b = renderer.plan_prompt("write docs", "be useful").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_plan_prompt_is_not_html_escaped() {
        let renderer = PromptRenderer::new();
        let goals = r#"R&D <alpha> "launch" & 'beta'"#;
        let prompt = renderer.plan_prompt(goals, "").unwrap();
        assert!(prompt.contains(goals));
        assert!(!prompt.contains("&amp;"));
    }

    #[test]
    fn test_plan_prompt_with_empty_goals() {
        let renderer = PromptRenderer::new();
        let prompt = renderer.plan_prompt("", "").unwrap();
        assert!(prompt.contains("Weekly goals: \n"));
        assert!(prompt.contains("\"objectives\""));
    }

    #[test]
    fn test_plan_prompt_keeps_handlebars_syntax_in_input() {
        let renderer = PromptRenderer::new();
        let prompt = renderer.plan_prompt("{{overall_goals}}", "x").unwrap();
        assert!(prompt.contains("Weekly goals: {{overall_goals}}"));
    }

    #[test]
    fn test_render_unknown_template() {
        let renderer = PromptRenderer::new();
        let ctx = PlanPromptContext {
            weekly_goals: "",
            overall_goals: "",
        };
        assert!(renderer.render("nonexistent-template", &ctx).is_err());
    }
}
