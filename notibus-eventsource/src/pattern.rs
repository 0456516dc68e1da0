//! Wildcard pattern expansion against advertised notification types.
//!
//! Subscription patterns use shell-style wildcards: `*` matches any run of
//! characters, `?` matches exactly one. Patterns are translated to anchored
//! regular expressions and matched against the textual form of a
//! notification type (`"{namespace}:{name}"`).

use regex::Regex;

use notibus_session::NotificationTypeId;

use crate::error::{EventSourceError, Result};

/// A compiled subscription pattern.
#[derive(Debug, Clone)]
pub struct NotificationPattern {
    regex: Regex,
}

impl NotificationPattern {
    /// Compile a wildcard pattern.
    ///
    /// Fails with [`EventSourceError::InvalidPattern`] for an empty pattern
    /// or one the regex engine rejects.
    pub fn compile(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(EventSourceError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: "pattern must not be empty".to_string(),
            });
        }

        let regex = Regex::new(&wildcard_to_regex(pattern)).map_err(|err| {
            EventSourceError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: err.to_string(),
            }
        })?;

        Ok(Self { regex })
    }

    /// Whether the pattern fully matches the type's textual form.
    pub fn matches(&self, notification_type: &NotificationTypeId) -> bool {
        self.regex.is_match(&notification_type.to_string())
    }

    /// Every available type the pattern matches.
    ///
    /// An empty result is not an error; callers map it to a Down join status.
    pub fn filter(&self, available: &[NotificationTypeId]) -> Vec<NotificationTypeId> {
        available
            .iter()
            .filter(|ty| self.matches(ty))
            .cloned()
            .collect()
    }

    /// The translated regular expression, for diagnostics.
    pub fn as_regex(&self) -> &str {
        self.regex.as_str()
    }
}

impl std::fmt::Display for NotificationPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.regex.as_str())
    }
}

/// Translate a wildcard pattern into an anchored regular expression.
///
/// `*` and `?` become `.*` and `.`; every other regex metacharacter is
/// escaped so it matches literally.
fn wildcard_to_regex(wildcard: &str) -> String {
    let mut regex = String::with_capacity(wildcard.len() + 2);
    regex.push('^');
    for c in wildcard.chars() {
        match c {
            '*' => regex.push_str(".*"),
            '?' => regex.push('.'),
            '(' | ')' | '[' | ']' | '{' | '}' | '$' | '^' | '.' | '|' | '+' | '\\' => {
                regex.push('\\');
                regex.push(c);
            }
            _ => regex.push(c),
        }
    }
    regex.push('$');
    regex
}
