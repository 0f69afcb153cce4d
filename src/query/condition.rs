use serde::{Deserialize, Serialize};

use super::fast_lowercase::FastLowercase;
use super::regex_cache::get_or_compile_regex;
use crate::error::{ViewError, ViewResult};

/// A boolean text query evaluated against the text fields of one item.
///
/// Literals and regexes match when any field matches; `Not`, `And` and `Or`
/// compose those per-item results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryCondition {
    Literal {
        pattern: String,
        #[serde(rename = "caseSensitive")]
        case_sensitive: bool,
    },
    Regex {
        pattern: String,
        flags: String,
    },
    Not {
        condition: Box<QueryCondition>,
    },
    #[serde(rename = "AND")]
    And { conditions: Vec<QueryCondition> },
    #[serde(rename = "OR")]
    Or { conditions: Vec<QueryCondition> },
}

impl QueryCondition {
    /// Condition that matches every item.
    pub fn match_all() -> Self {
        QueryCondition::And {
            conditions: Vec::new(),
        }
    }

    /// Lowercases case-insensitive literals and compiles every regex once, so
    /// that `matches_any` never has to report an error.
    pub fn prepare(self) -> ViewResult<Self> {
        match self {
            QueryCondition::Literal {
                pattern,
                case_sensitive,
            } => {
                let pattern = if case_sensitive {
                    pattern
                } else {
                    pattern.fast_to_lowercase()
                };
                Ok(QueryCondition::Literal {
                    pattern,
                    case_sensitive,
                })
            }
            QueryCondition::Regex { pattern, flags } => {
                get_or_compile_regex(&pattern, &flags).map_err(|source| {
                    ViewError::InvalidRegex {
                        pattern: pattern.clone(),
                        source,
                    }
                })?;
                Ok(QueryCondition::Regex { pattern, flags })
            }
            QueryCondition::Not { condition } => Ok(QueryCondition::Not {
                condition: Box::new(condition.prepare()?),
            }),
            QueryCondition::And { conditions } => Ok(QueryCondition::And {
                conditions: conditions
                    .into_iter()
                    .map(QueryCondition::prepare)
                    .collect::<ViewResult<_>>()?,
            }),
            QueryCondition::Or { conditions } => Ok(QueryCondition::Or {
                conditions: conditions
                    .into_iter()
                    .map(QueryCondition::prepare)
                    .collect::<ViewResult<_>>()?,
            }),
        }
    }

    /// Evaluates a prepared condition against an item's text fields.
    pub fn matches_any(&self, fields: &[&str]) -> bool {
        match self {
            QueryCondition::Literal {
                pattern,
                case_sensitive,
            } => {
                if *case_sensitive {
                    fields.iter().any(|field| field.contains(pattern.as_str()))
                } else {
                    fields.iter().any(|field| field.contains_lowered(pattern))
                }
            }
            QueryCondition::Regex { pattern, flags } => match get_or_compile_regex(pattern, flags)
            {
                Ok(regex) => fields.iter().any(|field| regex.is_match(field)),
                Err(_) => false,
            },
            QueryCondition::Not { condition } => !condition.matches_any(fields),
            QueryCondition::And { conditions } => {
                conditions.iter().all(|condition| condition.matches_any(fields))
            }
            QueryCondition::Or { conditions } => {
                conditions.iter().any(|condition| condition.matches_any(fields))
            }
        }
    }

    /// Byte range `(start, len)` of the first positive match in `text`, used
    /// for highlighting.
    pub fn find_match(&self, text: &str) -> Option<(usize, usize)> {
        match self {
            QueryCondition::Literal {
                pattern,
                case_sensitive,
            } => {
                if pattern.is_empty() {
                    return None;
                }
                let found = if *case_sensitive {
                    text.find(pattern.as_str())
                } else {
                    text.fast_to_lowercase().find(&pattern.fast_to_lowercase())
                };
                found
                    .map(|pos| (pos, pattern.len()))
                    .filter(|(pos, len)| {
                        text.is_char_boundary(*pos) && text.is_char_boundary(pos + len)
                    })
            }
            QueryCondition::Regex { pattern, flags } => get_or_compile_regex(pattern, flags)
                .ok()
                .and_then(|regex| regex.find(text).map(|m| (m.start(), m.len()))),
            QueryCondition::Not { .. } => None,
            QueryCondition::And { conditions } | QueryCondition::Or { conditions } => conditions
                .iter()
                .find_map(|condition| condition.find_match(text)),
        }
    }
}
