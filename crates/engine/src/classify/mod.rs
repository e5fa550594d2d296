//! Event classification against an ordered, caller-supplied rule table.
//!
//! Patterns are matched case-insensitively against both the event name and
//! the event code, so one table can mix free-text descriptions
//! ("thick spots") with code prefixes ("W05"). First matching rule wins;
//! events no rule matches take the table's fallback category.

use grep_matcher::Matcher;
use grep_regex::{RegexMatcher, RegexMatcherBuilder};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::event::{Event, EventCategory, RawEvent};

/// One uncompiled rule, in table order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyRule {
    pub pattern: String,
    pub category: EventCategory,
}

#[derive(Debug)]
struct CompiledRule {
    pattern: String,
    category: EventCategory,
    matcher: RegexMatcher,
}

/// A compiled, immutable rule table. Classification is pure: the same table
/// can be re-applied to the same parsed events any number of times.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<CompiledRule>,
    fallback: EventCategory,
}

impl RuleTable {
    /// Compile a rule table. Fails on an empty rule list or an invalid
    /// pattern; both are caller misconfiguration.
    pub fn compile(
        rules: Vec<ClassifyRule>,
        fallback: EventCategory,
    ) -> Result<Self, EngineError> {
        if rules.is_empty() {
            return Err(EngineError::EmptyRuleTable);
        }

        let compiled = rules
            .into_iter()
            .map(|rule| {
                let matcher = RegexMatcherBuilder::new()
                    .case_insensitive(true)
                    .multi_line(false)
                    .build(&rule.pattern)
                    .map_err(|e| EngineError::InvalidRulePattern {
                        pattern: rule.pattern.clone(),
                        message: e.to_string(),
                    })?;
                Ok(CompiledRule {
                    pattern: rule.pattern,
                    category: rule.category,
                    matcher,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        Ok(Self {
            rules: compiled,
            fallback,
        })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn fallback(&self) -> EventCategory {
        self.fallback
    }

    /// Assign a category to every event, first matching rule wins.
    pub fn classify(&self, events: &[RawEvent]) -> Vec<Event> {
        events
            .iter()
            .map(|raw| Event {
                timestamp: raw.timestamp,
                raw_event: raw.raw_event.clone(),
                code: raw.code.clone(),
                category: self.categorize(raw),
            })
            .collect()
    }

    fn categorize(&self, raw: &RawEvent) -> EventCategory {
        for rule in &self.rules {
            if self.matches(rule, raw.raw_event.as_bytes())
                || self.matches(rule, raw.code.as_bytes())
            {
                tracing::trace!(
                    pattern = %rule.pattern,
                    category = rule.category.as_str(),
                    event = %raw.raw_event,
                    "classify: rule matched"
                );
                return rule.category;
            }
        }
        self.fallback
    }

    fn matches(&self, rule: &CompiledRule, haystack: &[u8]) -> bool {
        rule.matcher.is_match(haystack).unwrap_or(false)
    }
}
