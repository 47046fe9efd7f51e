//! Interactive resolution of the agent id

use std::io::{self, BufRead, Write};

use super::EnvMap;

/// Asks the user questions; abstracted so the flow can be scripted in tests
pub trait Prompter {
    /// Yes/no question; an empty answer means `default`
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool>;

    /// Free-text question; the answer is trimmed
    fn ask(&mut self, question: &str) -> io::Result<String>;
}

/// Prompts on stdout and reads answers from stdin
pub struct StdinPrompter;

impl StdinPrompter {
    /// Whether stdin is a terminal a user can answer from
    pub fn is_interactive() -> bool {
        atty::is(atty::Stream::Stdin)
    }

    fn read_line(&self) -> io::Result<String> {
        let mut input = String::new();
        io::stdin().lock().read_line(&mut input)?;
        Ok(input.trim().to_string())
    }
}

impl Prompter for StdinPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> io::Result<bool> {
        let default_str = if default { "Y/n" } else { "y/N" };
        print!("{} ({}): ", question, default_str);
        io::stdout().flush()?;

        let input = self.read_line()?.to_lowercase();
        Ok(match input.as_str() {
            "" => default,
            "y" | "yes" => true,
            "n" | "no" => false,
            _ => default,
        })
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        print!("{}: ", question);
        io::stdout().flush()?;
        self.read_line()
    }
}

const ENTER_AGENT_ID: &str =
    "Enter the agent ID to attach tools to (leave blank to skip attachment)";

/// Decide which agent (if any) the uploaded tools are attached to
///
/// An explicit id wins. Otherwise the env-file value is offered for
/// confirmation; declining it, or having none, asks for an id. Without a
/// prompter nothing is asked and the env-file value is used as is. An empty
/// answer means "skip attachment".
pub fn resolve_agent_id(
    explicit: Option<&str>,
    env: &EnvMap,
    env_key: &str,
    prompter: Option<&mut dyn Prompter>,
) -> io::Result<Option<String>> {
    if let Some(id) = explicit {
        return Ok(non_empty(id));
    }

    let from_env = env.get(env_key).and_then(|v| non_empty(v));

    let Some(prompter) = prompter else {
        return Ok(from_env);
    };

    if let Some(id) = from_env {
        println!("Found agent ID in environment: {}", id);
        if prompter.confirm("Use this agent ID?", true)? {
            return Ok(Some(id));
        }
    }

    Ok(non_empty(&prompter.ask(ENTER_AGENT_ID)?))
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::mock::ScriptedPrompter;

    const KEY: &str = "BOOKSTACK_AGENT_ID";

    fn env_with_agent(id: &str) -> EnvMap {
        let mut env = EnvMap::new();
        env.insert(KEY.to_string(), id.to_string());
        env
    }

    #[test]
    fn test_explicit_wins() {
        let mut prompter = ScriptedPrompter::new(vec![]);
        let id = resolve_agent_id(
            Some("flag-agent"),
            &env_with_agent("env-agent"),
            KEY,
            Some(&mut prompter),
        )
        .unwrap();
        assert_eq!(id.as_deref(), Some("flag-agent"));
        assert!(prompter.questions().is_empty());
    }

    #[test]
    fn test_env_value_confirmed() {
        let mut prompter = ScriptedPrompter::new(vec![""]);
        let id =
            resolve_agent_id(None, &env_with_agent("env-agent"), KEY, Some(&mut prompter)).unwrap();
        assert_eq!(id.as_deref(), Some("env-agent"));
        assert_eq!(prompter.questions().len(), 1);
    }

    #[test]
    fn test_env_value_declined_then_entered() {
        let mut prompter = ScriptedPrompter::new(vec!["n", "typed-agent"]);
        let id =
            resolve_agent_id(None, &env_with_agent("env-agent"), KEY, Some(&mut prompter)).unwrap();
        assert_eq!(id.as_deref(), Some("typed-agent"));
    }

    #[test]
    fn test_blank_answer_skips_attachment() {
        let mut prompter = ScriptedPrompter::new(vec!["   "]);
        let id = resolve_agent_id(None, &EnvMap::new(), KEY, Some(&mut prompter)).unwrap();
        assert_eq!(id, None);
    }

    #[test]
    fn test_non_interactive_uses_env_without_asking() {
        let id = resolve_agent_id(None, &env_with_agent("env-agent"), KEY, None).unwrap();
        assert_eq!(id.as_deref(), Some("env-agent"));

        let id = resolve_agent_id(None, &EnvMap::new(), KEY, None).unwrap();
        assert_eq!(id, None);
    }
}
