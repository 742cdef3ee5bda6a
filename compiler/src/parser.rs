use parcel::parsers::character::expect_character;
use parcel::prelude::v1::*;

use super::ast;

/// Characters that can never begin a literal atom.
const RESERVED_CHARACTERS: [char; 7] = ['*', '+', '?', '|', '(', ')', '\\'];

/// Represents every way a pattern can fail to parse. Each variant carries the
/// character position in the pattern that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseErr {
    #[error("group opened at position {0} is never closed")]
    UnclosedGroup(usize),
    #[error("escape at position {0} has no character to escape")]
    TrailingEscape(usize),
    #[error("quantifier at position {0} has nothing to repeat")]
    DanglingQuantifier(usize),
    #[error("alternation at position {0} is not supported")]
    UnsupportedAlternation(usize),
    #[error("unmatched `)` at position {0}")]
    UnmatchedGroupClose(usize),
    #[error("undefined parse error: {0}")]
    Undefined(String),
}

/// Parses a pattern, presented as `(position, character)` pairs, into its
/// ast.
pub fn parse(input: &[(usize, char)]) -> Result<ast::Regex, ParseErr> {
    let (expression, remainder) = expression()
        .parse(input)
        .map_err(|err| ParseErr::Undefined(format!("unspecified parse error occurred: {}", err)))
        .map(|ms| match ms {
            MatchStatus::Match {
                inner, remainder, ..
            } => (inner, remainder),
            MatchStatus::NoMatch(remainder) => (ast::Expression::default(), remainder),
        })?;

    if remainder.is_empty() {
        Ok(ast::Regex(expression))
    } else {
        Err(diagnose(remainder))
    }
}

/// Explains why parsing stopped at the head of `remainder`.
///
/// A group that fails to close is backtracked over by the combinators, so an
/// unparsed `(` is re-entered to find whether the group ran off the end of
/// the pattern or stopped on an error nested inside it.
fn diagnose(mut remainder: &[(usize, char)]) -> ParseErr {
    loop {
        match remainder {
            [(pos, '('), rest @ ..] => {
                let inner_remainder = match expression().parse(rest) {
                    Ok(MatchStatus::Match { remainder, .. }) => remainder,
                    Ok(MatchStatus::NoMatch(remainder)) => remainder,
                    Err(err) => return ParseErr::Undefined(format!("{}", err)),
                };

                match inner_remainder.first() {
                    None | Some((_, ')')) => return ParseErr::UnclosedGroup(*pos),
                    Some(_) => remainder = inner_remainder,
                }
            }
            [(pos, '\\')] => return ParseErr::TrailingEscape(*pos),
            [(pos, '*' | '+' | '?'), ..] => return ParseErr::DanglingQuantifier(*pos),
            [(pos, '|'), ..] => return ParseErr::UnsupportedAlternation(*pos),
            [(pos, ')'), ..] => return ParseErr::UnmatchedGroupClose(*pos),
            [(pos, c), ..] => {
                return ParseErr::Undefined(format!("unexpected {:?} at position {}", c, pos))
            }
            [] => return ParseErr::Undefined("unexpected end of pattern".to_string()),
        }
    }
}

// Expression

fn expression<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Expression> {
    parcel::zero_or_more(factor()).map(ast::Expression)
}

fn factor<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Factor> {
    parcel::join(atom(), parcel::optional(quantifier()))
        .map(|(atom, quantifier)| ast::Factor::new(atom, quantifier))
}

// Atoms

fn atom<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Atom> {
    parcel::or(group().map(Into::into), || {
        parcel::or(any_character().map(Into::into), || {
            parcel::or(
                escaped_character().map(ast::Atom::EscapedCharacter),
                || literal_character().map(ast::Atom::Character),
            )
        })
    })
}

fn group<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Group> {
    // the inner expression is built lazily, as groups nest recursively.
    expect_character('(')
        .and_then(|_| parcel::left(parcel::join(expression(), expect_character(')'))))
        .map(ast::Group)
}

fn any_character<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::AnyCharacter> {
    expect_character('.').map(|_| ast::AnyCharacter)
}

fn escaped_character<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::Char> {
    move |input: &'a [(usize, char)]| match input.get(0..2) {
        Some(&[(escape_pos, '\\'), (escaped_pos, escaped)]) => Ok(MatchStatus::Match {
            span: escape_pos..escaped_pos + 1,
            remainder: &input[2..],
            inner: ast::Char(escaped),
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

fn literal_character<'a>() -> impl Parser<'a, &'a [(usize, char)], ast::Char> {
    move |input: &'a [(usize, char)]| match input.first() {
        Some(&(pos, next)) if !RESERVED_CHARACTERS.contains(&next) => Ok(MatchStatus::Match {
            span: pos..pos + 1,
            remainder: &input[1..],
            inner: ast::Char(next),
        }),
        _ => Ok(MatchStatus::NoMatch(input)),
    }
}

// Quantifiers

fn quantifier<'a>() -> impl parcel::Parser<'a, &'a [(usize, char)], ast::Quantifier> {
    parcel::or(
        expect_character('*').map(|_| ast::Quantifier::ZeroOrMore),
        || {
            parcel::or(
                expect_character('+').map(|_| ast::Quantifier::OneOrMore),
                || expect_character('?').map(|_| ast::Quantifier::ZeroOrOne),
            )
        },
    )
}
