//! Parser for the free-text query language.
//!
//! ```text
//! query       := disjunction
//! disjunction := conjunction ("OR" conjunction)*
//! conjunction := negation (["AND"] negation)*
//! negation    := "NOT" atom | atom
//! atom        := "(" query ")" | /regex/flags | "phrase" | 'phrase' | word
//! ```
//!
//! Adjacent terms without an operator are AND-ed, so `nginx web` behaves
//! like `nginx AND web`.

use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{map, opt, peek, value, verify},
    multi::fold_many0,
    sequence::{delimited, preceded, terminated},
};

use super::condition::QueryCondition;
use crate::error::{ViewError, ViewResult};

pub fn parse_query(input: &str) -> ViewResult<QueryCondition> {
    match disjunction(input) {
        Ok((remaining, condition)) if remaining.trim().is_empty() => Ok(condition),
        Ok((remaining, _)) => Err(ViewError::InvalidQuery {
            query: input.to_string(),
            details: format!("unexpected input '{}'", remaining.trim()),
        }),
        Err(e) => Err(ViewError::InvalidQuery {
            query: input.to_string(),
            details: e.to_string(),
        }),
    }
}

fn disjunction(input: &str) -> IResult<&str, QueryCondition> {
    let (input, first) = conjunction(input)?;

    fold_many0(
        preceded(
            (multispace0, tag("OR"), keyword_end),
            conjunction,
        ),
        move || first.clone(),
        |acc, next| match acc {
            QueryCondition::Or { mut conditions } => {
                conditions.push(next);
                QueryCondition::Or { conditions }
            }
            _ => QueryCondition::Or {
                conditions: vec![acc, next],
            },
        },
    )
    .parse(input)
}

fn conjunction(input: &str) -> IResult<&str, QueryCondition> {
    let (input, first) = negation(input)?;

    fold_many0(
        preceded(
            (multispace0, opt(terminated(tag("AND"), keyword_end))),
            negation,
        ),
        move || first.clone(),
        |acc, next| match acc {
            QueryCondition::And { mut conditions } => {
                conditions.push(next);
                QueryCondition::And { conditions }
            }
            _ => QueryCondition::And {
                conditions: vec![acc, next],
            },
        },
    )
    .parse(input)
}

fn negation(input: &str) -> IResult<&str, QueryCondition> {
    alt((
        map(
            preceded((multispace0, tag("NOT"), keyword_end), atom),
            |condition| QueryCondition::Not {
                condition: Box::new(condition),
            },
        ),
        atom,
    ))
    .parse(input)
}

/// A keyword ends at whitespace or right before an opening parenthesis, so
/// `NOT(a)` is an operator while `NOTES` stays a word.
fn keyword_end(input: &str) -> IResult<&str, ()> {
    alt((value((), multispace1), value((), peek(char('('))))).parse(input)
}

fn atom(input: &str) -> IResult<&str, QueryCondition> {
    preceded(multispace0, alt((group, regex_literal, quoted_phrase, bare_word))).parse(input)
}

fn group(input: &str) -> IResult<&str, QueryCondition> {
    delimited(
        char('('),
        preceded(multispace0, disjunction),
        preceded(multispace0, char(')')),
    )
    .parse(input)
}

fn regex_literal(input: &str) -> IResult<&str, QueryCondition> {
    map(
        (
            char('/'),
            regex_body,
            char('/'),
            take_while(|c: char| matches!(c, 'i' | 'm' | 's' | 'x')),
        ),
        |(_, pattern, _, flags): (char, &str, char, &str)| QueryCondition::Regex {
            pattern: pattern.to_string(),
            flags: flags.to_string(),
        },
    )
    .parse(input)
}

/// Everything up to the next unescaped `/`. Escapes are kept verbatim for the
/// regex engine.
fn regex_body(input: &str) -> IResult<&str, &str> {
    let mut end = 0;
    let mut escaped = false;

    for ch in input.chars() {
        if escaped {
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if ch == '/' {
            break;
        }
        end += ch.len_utf8();
    }

    Ok((&input[end..], &input[..end]))
}

fn quoted_phrase(input: &str) -> IResult<&str, QueryCondition> {
    map(
        alt((
            delimited(char('"'), phrase_body('"'), char('"')),
            delimited(char('\''), phrase_body('\''), char('\'')),
        )),
        |pattern| QueryCondition::Literal {
            pattern,
            case_sensitive: false,
        },
    )
    .parse(input)
}

/// Unescapes a quoted phrase up to, but not including, the closing quote.
fn phrase_body(quote: char) -> impl Fn(&str) -> IResult<&str, String> {
    move |input: &str| {
        let mut result = String::new();
        let mut consumed = 0;
        let mut chars = input.chars();

        while let Some(ch) = chars.next() {
            if ch == quote {
                break;
            }
            consumed += ch.len_utf8();

            if ch != '\\' {
                result.push(ch);
                continue;
            }
            match chars.next() {
                Some(next) => {
                    consumed += next.len_utf8();
                    match next {
                        'n' => result.push('\n'),
                        't' => result.push('\t'),
                        'r' => result.push('\r'),
                        '\\' => result.push('\\'),
                        c if c == quote => result.push(c),
                        c => {
                            result.push('\\');
                            result.push(c);
                        }
                    }
                }
                None => result.push('\\'),
            }
        }

        Ok((&input[consumed..], result))
    }
}

fn bare_word(input: &str) -> IResult<&str, QueryCondition> {
    map(
        verify(take_while1(is_word_char), |word: &str| {
            !matches!(word, "AND" | "OR" | "NOT")
        }),
        |word: &str| QueryCondition::Literal {
            pattern: word.to_string(),
            case_sensitive: false,
        },
    )
    .parse(input)
}

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, '(' | ')' | '"' | '\'' | '/')
}
