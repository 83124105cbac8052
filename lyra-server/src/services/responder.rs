//! Canned reply selection.
//!
//! A [`Responder`] holds an ordered list of [`Rule`]s. Each rule is tried in
//! turn against the latest user message and the trailing context window; the
//! first one that yields a reply wins.

use crate::config::Variant;
use crate::entities::ChatMessage;

pub const EMPTY_INPUT_REPLY: &str = "I'm here! How can I help you today?";
pub const GREETING_REPLY: &str = "Hello! 👋 How can I assist you today?";
pub const DARK_MODE_REPLY: &str = "Switching to dark mode! 🌙 (Try toggling your theme in the UI.)";
pub const LIGHT_MODE_REPLY: &str =
    "Switching to light mode! ☀️ (Try toggling your theme in the UI.)";
pub const HELP_REPLY: &str = "Of course! Please tell me what you need help with.";
pub const WEATHER_REPLY: &str =
    "I can't check the weather yet, but I can help you with tasks, notes, and more!";
pub const THANKS_REPLY: &str = "You're welcome! 😊";
pub const REPEATED_REPLY: &str = "You just asked that! 😊 Anything else I can help with?";

pub const FULL_ECHO_SUFFIX: &str = "Let me know if you need anything else! 🤖";
pub const SIMPLE_ECHO_SUFFIX: &str = "I can help you with that! 😊";

/// One step of the reply chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Input is empty after trimming.
    EmptyInput { reply: &'static str },
    /// The previous user message in the window equals this one, ignoring
    /// case and surrounding whitespace.
    Repeated { reply: &'static str },
    /// Input contains any of `keywords` (already lowercase).
    Keyword {
        keywords: &'static [&'static str],
        reply: &'static str,
    },
    /// Always matches. Embeds the verbatim input.
    Echo { suffix: &'static str },
}

/// The message being answered, with its context.
#[derive(Debug)]
pub struct Turn<'a> {
    raw: &'a str,
    normalized: String,
    context: &'a [ChatMessage],
}

impl<'a> Turn<'a> {
    /// `context` is the trailing history window and ends with the user
    /// message that carries `raw`.
    pub fn new(raw: &'a str, context: &'a [ChatMessage]) -> Self {
        Self {
            raw,
            normalized: normalize(raw),
            context,
        }
    }

    /// The user message immediately before this one, if it is in the window.
    fn previous_user_message(&self) -> Option<&'a ChatMessage> {
        let context: &'a [ChatMessage] = self.context;
        let (_, earlier) = context.split_last()?;
        earlier.iter().rev().find(|m| m.is_user())
    }
}

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::EmptyInput { .. } => "empty_input",
            Rule::Repeated { .. } => "repeated",
            Rule::Keyword { keywords, .. } => keywords.first().copied().unwrap_or("keyword"),
            Rule::Echo { .. } => "echo",
        }
    }

    pub fn apply(&self, turn: &Turn<'_>) -> Option<String> {
        match self {
            Rule::EmptyInput { reply } => turn.normalized.is_empty().then(|| reply.to_string()),
            Rule::Repeated { reply } => turn
                .previous_user_message()
                .filter(|prev| normalize(&prev.content) == turn.normalized)
                .map(|_| reply.to_string()),
            Rule::Keyword { keywords, reply } => keywords
                .iter()
                .any(|k| turn.normalized.contains(k))
                .then(|| reply.to_string()),
            Rule::Echo { suffix } => Some(echo(turn.raw, suffix)),
        }
    }
}

/// Which rule answered and what it said.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub rule: &'static str,
    pub content: String,
}

#[derive(Debug, Clone)]
pub struct Responder {
    rules: Vec<Rule>,
}

impl Responder {
    /// Input that no rule in `rules` answers is echoed with
    /// [`FULL_ECHO_SUFFIX`].
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn for_variant(variant: Variant) -> Self {
        match variant {
            Variant::Full => Self::new(full_rules()),
            Variant::Simple => Self::new(vec![Rule::Echo {
                suffix: SIMPLE_ECHO_SUFFIX,
            }]),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn select(&self, input: &str, context: &[ChatMessage]) -> Selection {
        let turn = Turn::new(input, context);
        self.rules
            .iter()
            .find_map(|rule| {
                rule.apply(&turn).map(|content| Selection {
                    rule: rule.name(),
                    content,
                })
            })
            .unwrap_or_else(|| Selection {
                rule: "echo",
                content: echo(input, FULL_ECHO_SUFFIX),
            })
    }
}

/// The rich chain. The repetition check runs right after the empty-input
/// check so that a repeated question is noticed even when it also contains
/// a keyword.
fn full_rules() -> Vec<Rule> {
    vec![
        Rule::EmptyInput {
            reply: EMPTY_INPUT_REPLY,
        },
        Rule::Repeated {
            reply: REPEATED_REPLY,
        },
        Rule::Keyword {
            keywords: &["hello", "hi"],
            reply: GREETING_REPLY,
        },
        Rule::Keyword {
            keywords: &["dark mode"],
            reply: DARK_MODE_REPLY,
        },
        Rule::Keyword {
            keywords: &["light mode"],
            reply: LIGHT_MODE_REPLY,
        },
        Rule::Keyword {
            keywords: &["help"],
            reply: HELP_REPLY,
        },
        Rule::Keyword {
            keywords: &["weather"],
            reply: WEATHER_REPLY,
        },
        Rule::Keyword {
            keywords: &["thank"],
            reply: THANKS_REPLY,
        },
        Rule::Echo {
            suffix: FULL_ECHO_SUFFIX,
        },
    ]
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

fn echo(input: &str, suffix: &str) -> String {
    format!("You said: **{input}**\n\n{suffix}")
}
