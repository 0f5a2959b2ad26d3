//! Prompt templates for shortsmith.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub script: ScriptPrompts,
    pub ideas: IdeaPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for drafting the short's script, titles, captions and image prompt.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    pub system: String,
    pub user: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are the lead writer of a popular news shorts channel.

Strengths:
- Write 30-second scripts (roughly 250-350 characters) in {{language}}
- Tone halfway between a current-affairs YouTuber and a radio newscaster
- Conversational, without sensationalism
- Always hook the viewer within the first 3 seconds

Output format:
Follow this layout exactly:

[SCRIPT]
(the 30-second script)

[TITLES]
1. (title 1)
2. (title 2)
3. (title 3)

[THUMBNAILS]
1. (4-10 character thumbnail caption)
2. (4-10 character thumbnail caption)
3. (4-10 character thumbnail caption)
4. (4-10 character thumbnail caption)
5. (4-10 character thumbnail caption)

[IMAGE_PROMPT]
(an English prompt for generating the thumbnail image)"#
                .to_string(),

            user: r#"Generation mode: {{mode}}

Today's top news (top {{item_count}}):
{{news}}

Most viewed news shorts on YouTube (top {{item_count}}):
{{videos}}

---

Based on the above, produce:

1. A 30-second shorts script (conversational, natural)
   - 0-3s: a strong hook
   - 3-25s: only the most important facts
   - 25-30s: a question inviting viewers to comment

2. Three video titles
   - click-worthy, at most 40 characters, emoji allowed

3. Five thumbnail captions
   - 4-10 characters each, punchy keywords

4. An image prompt in English
   - depicts the news topic visually
   - include "dramatic news thumbnail style, bold text overlay, high contrast""#
                .to_string(),
        }
    }
}

/// Prompts for brainstorming short ideas from a channel's profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaPrompts {
    pub system: String,
    pub user: String,
}

impl Default for IdeaPrompts {
    fn default() -> Self {
        Self {
            system: "You are a creative content generator. Always respond in valid JSON format."
                .to_string(),

            user: r#"You come up with creative ideas for short-form videos.

Channel topic: {{topic}}
{{channel_details}}
Requirements:
1. A striking subject that grabs the viewer's attention
2. Fits a short video of 30-60 seconds
3. High viral potential
4. A clear message

Write the ideas in {{language}}.

Produce {{count}} ideas in the following JSON format:
[
  {
    "title": "title",
    "hook": "a strong opening line (3-5 seconds)",
    "content": "summary of the core content",
    "cta": "call to action",
    "keywords": ["keyword1", "keyword2", "keyword3"]
  }
]

Output only the JSON."#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }

            let ideas_path = custom_path.join("ideas.toml");
            if ideas_path.exists() {
                let content = std::fs::read_to_string(&ideas_path)?;
                prompts.ideas = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts_describe_every_section() {
        let prompts = Prompts::default();
        for marker in ["[SCRIPT]", "[TITLES]", "[THUMBNAILS]", "[IMAGE_PROMPT]"] {
            assert!(prompts.script.system.contains(marker), "missing {marker}");
        }
    }

    #[test]
    fn test_default_idea_prompt_asks_for_json() {
        let prompts = Prompts::default();
        assert!(prompts.ideas.system.contains("JSON"));
        for var in ["{{topic}}", "{{channel_details}}", "{{count}}"] {
            assert!(prompts.ideas.user.contains(var), "missing {var}");
        }
    }

    #[test]
    fn test_render_template() {
        let template = "Hello {{name}}, you have {{count}} messages.";
        let mut vars = HashMap::new();
        vars.insert("name".to_string(), "Alice".to_string());
        vars.insert("count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Hello Alice, you have 5 messages.");
    }

    #[test]
    fn test_provided_vars_override_custom() {
        let mut prompts = Prompts::default();
        prompts.variables.insert("mode".to_string(), "config".to_string());
        prompts.variables.insert("channel".to_string(), "Daily Brief".to_string());

        let mut vars = HashMap::new();
        vars.insert("mode".to_string(), "request".to_string());

        let result = prompts.render_with_custom("{{mode}} / {{channel}}", &vars);
        assert_eq!(result, "request / Daily Brief");
    }

    #[test]
    fn test_load_custom_script_prompts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("script.toml"),
            "system = \"custom system\"\nuser = \"custom {{mode}}\"\n",
        )
        .unwrap();

        let prompts = Prompts::load(dir.path().to_str(), None).unwrap();
        assert_eq!(prompts.script.system, "custom system");
        assert_eq!(prompts.script.user, "custom {{mode}}");
        assert_eq!(prompts.ideas.user, IdeaPrompts::default().user);
    }
}
