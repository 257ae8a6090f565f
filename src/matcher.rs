//! Backtracking recogniser for the table query grammar.
//!
//! ```text
//! Query           <- Spacing Select ActionAddSelect !.
//! Select          <- "select" MustSpacing SelectKey (MustSpacing Where)? (MustSpacing Limit)?
//! SelectKey       <- <Key> ActionSetTableName
//! Limit           <- "limit" MustSpacing <PositiveInteger> ActionSetLimit
//! Where           <- "where" ActionInitWhere MustSpacing WhereClause
//! WhereClause     <- ActionPushWhere (PredicateClause / OrClause / AndClause) ActionPopWhere
//! AndClause       <- "and" ActionInitAndClause Spacing "(" Spacing WhereClause Spacing
//!                    ("," Spacing WhereClause Spacing)* ")"
//! OrClause        <- "or" ActionInitOrClause Spacing "(" Spacing WhereClause Spacing
//!                    ("," Spacing WhereClause Spacing)* ")"
//! PredicateClause <- ActionInitPredicate Predicate Spacing "(" Spacing PredicateValue
//!                    ("," Spacing PredicateValue Spacing)* ")"
//! Predicate       <- <"str_eq" / "str_neq"> ActionSetPredicateCommand
//! PredicateValue  <- PredicateLiteralValue / PredicateRowKey / PredicateKey
//! PredicateRowKey <- "@key" ActionUsePredicateRowKey
//! PredicateKey    <- <Key> ActionAddPredicateKey
//! PredicateLiteralValue <- "'" <(!"'" .)*> "'" ActionAddPredicateLiteral
//! Key             <- (Escape / [0-9A-Za-z])+
//! Escape          <- "\" [abfnrtv\\?"']
//! PositiveInteger <- [1-9] [0-9]*
//! MustSpacing     <- [ \t\n]+
//! Spacing         <- [ \t\n]*
//! ```
//!
//! `<X>` records X's span as a [`RuleTag::Text`] token. Action markers are
//! zero-width tokens; nothing here calls into the AST.

use crate::{
    ast::{RuleTag, Token, TokenBuffer},
    parser::{ParseError, ParserSettings, SyntaxError},
    position,
};

const SPACES: [char; 3] = [' ', '\t', '\n'];
const ESCAPES: [char; 11] = ['a', 'b', 'f', 'n', 'r', 't', 'v', '\\', '?', '"', '\''];

/// Outcome of a rule: matched or not, unless the whole match was aborted.
type Matched = Result<bool, Abort>;

/// Stops matching outright; no alternative is tried afterwards.
#[derive(Debug, Clone, Copy)]
struct Abort {
    offset: u32,
}

/// Deepest primitive mismatch seen so far.
#[derive(Debug, Clone, Copy)]
struct Failure {
    rule: RuleTag,
    begin: u32,
    end: u32,
    found: Option<char>,
}

#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    position: u32,
    tokens: usize,
}

pub struct Matcher<'a> {
    input: &'a [char],
    position: u32,
    tokens: TokenBuffer,

    /// Rules currently being matched, innermost last, with their start offsets
    active: Vec<(RuleTag, u32)>,
    furthest: Option<Failure>,

    depth: usize,
    max_depth: usize,
    pretty_errors: bool,
}

impl<'a> Matcher<'a> {
    pub fn new(input: &'a [char], settings: &ParserSettings) -> Self {
        Matcher {
            input,
            position: 0,
            tokens: TokenBuffer::with_capacity(settings.token_capacity),
            active: Vec::new(),
            furthest: None,
            depth: 0,
            max_depth: settings.max_nesting_depth,
            pretty_errors: settings.pretty_errors,
        }
    }

    /// Matches the whole input, returning the token buffer in match order.
    pub fn run(mut self) -> Result<Vec<Token>, ParseError> {
        if u32::try_from(self.input.len()).is_err() {
            return Err(ParseError::InputTooLong {
                len: self.input.len(),
            });
        }

        match self.query() {
            Ok(true) => Ok(self.tokens.into_tokens()),
            Ok(false) => Err(self.syntax_error()),
            Err(Abort { offset }) => Err(ParseError::NestingTooDeep {
                limit: self.max_depth,
                position: position::translate(self.input, offset),
            }),
        }
    }

    fn syntax_error(&self) -> ParseError {
        let failure = self.furthest.unwrap_or(Failure {
            rule: RuleTag::Query,
            begin: 0,
            end: 0,
            found: self.input.first().copied(),
        });

        let positions = position::translate_all(self.input, &[failure.begin, failure.end]);
        let excerpt = self.input[failure.begin as usize..failure.end as usize]
            .iter()
            .collect();

        ParseError::Syntax(SyntaxError {
            rule: failure.rule,
            begin: positions[0],
            end: positions[1],
            excerpt,
            found: failure.found,
            pretty: self.pretty_errors,
        })
    }

    // ------------------------------------------------------------------
    // Scanning primitives
    // ------------------------------------------------------------------

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position as usize).copied()
    }

    fn peek_char(&self, offset: u32) -> Option<char> {
        self.input.get((self.position + offset) as usize).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Records a mismatch at the current position and returns false.
    fn fail(&mut self) -> bool {
        if self.furthest.is_none_or(|f| self.position > f.end) {
            let (rule, begin) = self.active.last().copied().unwrap_or((RuleTag::Query, 0));
            self.furthest = Some(Failure {
                rule,
                begin,
                end: self.position,
                found: self.current_char(),
            });
        }
        false
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == Some(expected) {
            self.advance();
            true
        } else {
            self.fail()
        }
    }

    fn match_literal(&mut self, literal: &str) -> bool {
        literal.chars().all(|ch| self.match_char(ch))
    }

    fn match_class(&mut self, accept: impl Fn(char) -> bool) -> bool {
        match self.current_char() {
            Some(ch) if accept(ch) => {
                self.advance();
                true
            }
            _ => self.fail(),
        }
    }

    fn skip_while(&mut self, accept: impl Fn(char) -> bool) {
        while self.current_char().is_some_and(&accept) {
            self.advance();
        }
    }

    fn end_of_input(&mut self) -> bool {
        if self.current_char().is_none() {
            true
        } else {
            self.fail()
        }
    }

    // ------------------------------------------------------------------
    // Combinators
    // ------------------------------------------------------------------

    fn save(&self) -> Checkpoint {
        Checkpoint {
            position: self.position,
            tokens: self.tokens.len(),
        }
    }

    fn restore(&mut self, checkpoint: Checkpoint) {
        self.position = checkpoint.position;
        self.tokens.truncate(checkpoint.tokens);
    }

    /// Runs `body` as `rule`, appending its token on success and undoing
    /// everything it consumed or recorded on failure.
    fn rule(&mut self, rule: RuleTag, body: impl FnOnce(&mut Self) -> Matched) -> Matched {
        let checkpoint = self.save();
        self.active.push((rule, checkpoint.position));
        let matched = body(self);
        self.active.pop();

        if matched? {
            self.tokens.add(rule, checkpoint.position, self.position);
            Ok(true)
        } else {
            self.restore(checkpoint);
            Ok(false)
        }
    }

    /// Like [`Self::rule`], but records the span as captured text.
    fn capture(&mut self, body: impl FnOnce(&mut Self) -> Matched) -> Matched {
        let checkpoint = self.save();

        if body(self)? {
            self.tokens.add(RuleTag::Text, checkpoint.position, self.position);
            Ok(true)
        } else {
            self.restore(checkpoint);
            Ok(false)
        }
    }

    /// Backtracking group without a token of its own.
    fn attempt(&mut self, body: impl FnOnce(&mut Self) -> Matched) -> Matched {
        let checkpoint = self.save();
        let matched = body(self)?;
        if !matched {
            self.restore(checkpoint);
        }
        Ok(matched)
    }

    fn optional(&mut self, body: impl FnOnce(&mut Self) -> Matched) -> Result<(), Abort> {
        self.attempt(body)?;
        Ok(())
    }

    fn repeat(&mut self, mut body: impl FnMut(&mut Self) -> Matched) -> Result<(), Abort> {
        loop {
            let start = self.position;
            if !self.attempt(&mut body)? || self.position == start {
                return Ok(());
            }
        }
    }

    fn action(&mut self, marker: RuleTag) -> bool {
        debug_assert!(marker.is_action());
        self.tokens.add(marker, self.position, self.position);
        true
    }

    fn nested(&mut self, body: impl FnOnce(&mut Self) -> Matched) -> Matched {
        if self.depth >= self.max_depth {
            return Err(Abort {
                offset: self.position,
            });
        }
        self.depth += 1;
        let matched = body(self);
        self.depth -= 1;
        matched
    }

    // ------------------------------------------------------------------
    // Grammar
    // ------------------------------------------------------------------

    fn query(&mut self) -> Matched {
        self.rule(RuleTag::Query, |m| {
            Ok(m.spacing()?
                && m.select()?
                && m.action(RuleTag::ActionAddSelect)
                && m.end_of_input())
        })
    }

    fn select(&mut self) -> Matched {
        self.rule(RuleTag::Select, |m| {
            if !(m.match_literal("select") && m.must_spacing()? && m.select_key()?) {
                return Ok(false);
            }
            m.optional(|m| Ok(m.must_spacing()? && m.where_section()?))?;
            m.optional(|m| Ok(m.must_spacing()? && m.limit()?))?;
            Ok(true)
        })
    }

    fn select_key(&mut self) -> Matched {
        self.rule(RuleTag::SelectKey, |m| {
            Ok(m.capture(Self::key)? && m.action(RuleTag::ActionSetTableName))
        })
    }

    fn limit(&mut self) -> Matched {
        self.rule(RuleTag::Limit, |m| {
            Ok(m.match_literal("limit")
                && m.must_spacing()?
                && m.capture(Self::positive_integer)?
                && m.action(RuleTag::ActionSetLimit))
        })
    }

    fn where_section(&mut self) -> Matched {
        self.rule(RuleTag::Where, |m| {
            Ok(m.match_literal("where")
                && m.action(RuleTag::ActionInitWhere)
                && m.must_spacing()?
                && m.where_clause()?)
        })
    }

    fn where_clause(&mut self) -> Matched {
        self.nested(|m| {
            m.rule(RuleTag::WhereClause, |m| {
                m.action(RuleTag::ActionPushWhere);
                let matched = m.predicate_clause()? || m.or_clause()? || m.and_clause()?;
                Ok(matched && m.action(RuleTag::ActionPopWhere))
            })
        })
    }

    fn and_clause(&mut self) -> Matched {
        self.rule(RuleTag::AndClause, |m| {
            m.clause_list("and", RuleTag::ActionInitAndClause)
        })
    }

    fn or_clause(&mut self) -> Matched {
        self.rule(RuleTag::OrClause, |m| {
            m.clause_list("or", RuleTag::ActionInitOrClause)
        })
    }

    /// `<keyword> Spacing "(" Spacing WhereClause Spacing ("," Spacing WhereClause Spacing)* ")"`
    fn clause_list(&mut self, keyword: &str, marker: RuleTag) -> Matched {
        if !(self.match_literal(keyword)
            && self.action(marker)
            && self.spacing()?
            && self.match_char('(')
            && self.spacing()?
            && self.where_clause()?
            && self.spacing()?)
        {
            return Ok(false);
        }

        self.repeat(|m| {
            Ok(m.match_char(',') && m.spacing()? && m.where_clause()? && m.spacing()?)
        })?;
        Ok(self.match_char(')'))
    }

    fn predicate_clause(&mut self) -> Matched {
        self.rule(RuleTag::PredicateClause, |m| {
            if !(m.action(RuleTag::ActionInitPredicate)
                && m.predicate()?
                && m.spacing()?
                && m.match_char('(')
                && m.spacing()?
                && m.predicate_value()?)
            {
                return Ok(false);
            }

            m.repeat(|m| {
                Ok(m.match_char(',') && m.spacing()? && m.predicate_value()? && m.spacing()?)
            })?;
            Ok(m.match_char(')'))
        })
    }

    fn predicate(&mut self) -> Matched {
        self.rule(RuleTag::Predicate, |m| {
            let named = m.capture(|m| {
                Ok(m.attempt(|m| Ok(m.match_literal("str_eq")))?
                    || m.attempt(|m| Ok(m.match_literal("str_neq")))?)
            })?;
            Ok(named && m.action(RuleTag::ActionSetPredicateCommand))
        })
    }

    fn predicate_value(&mut self) -> Matched {
        self.rule(RuleTag::PredicateValue, |m| {
            Ok(m.predicate_literal_value()? || m.predicate_row_key()? || m.predicate_key()?)
        })
    }

    fn predicate_row_key(&mut self) -> Matched {
        self.rule(RuleTag::PredicateRowKey, |m| {
            Ok(m.match_literal("@key") && m.action(RuleTag::ActionUsePredicateRowKey))
        })
    }

    fn predicate_key(&mut self) -> Matched {
        self.rule(RuleTag::PredicateKey, |m| {
            Ok(m.capture(Self::key)? && m.action(RuleTag::ActionAddPredicateKey))
        })
    }

    fn predicate_literal_value(&mut self) -> Matched {
        self.rule(RuleTag::PredicateLiteralValue, |m| {
            Ok(m.match_char('\'')
                && m.capture(|m| {
                    m.skip_while(|ch| ch != '\'');
                    Ok(true)
                })?
                && m.match_char('\'')
                && m.action(RuleTag::ActionAddPredicateLiteral))
        })
    }

    fn positive_integer(&mut self) -> Matched {
        self.rule(RuleTag::PositiveInteger, |m| {
            if !m.match_class(|ch| matches!(ch, '1'..='9')) {
                return Ok(false);
            }
            m.skip_while(|ch| ch.is_ascii_digit());
            Ok(true)
        })
    }

    fn key(&mut self) -> Matched {
        self.rule(RuleTag::Key, |m| {
            if !m.key_part()? {
                return Ok(false);
            }
            while m.at_key_part() {
                m.key_part()?;
            }
            Ok(true)
        })
    }

    fn at_key_part(&self) -> bool {
        match self.current_char() {
            Some('\\') => self.peek_char(1).is_some_and(|ch| ESCAPES.contains(&ch)),
            Some(ch) => ch.is_ascii_alphanumeric(),
            None => false,
        }
    }

    fn key_part(&mut self) -> Matched {
        if self.current_char() == Some('\\') {
            return self.escape();
        }
        Ok(self.match_class(|ch| ch.is_ascii_alphanumeric()))
    }

    fn escape(&mut self) -> Matched {
        self.rule(RuleTag::Escape, |m| {
            Ok(m.match_char('\\') && m.match_class(|ch| ESCAPES.contains(&ch)))
        })
    }

    fn spacing(&mut self) -> Matched {
        self.rule(RuleTag::Spacing, |m| {
            m.skip_while(is_space);
            Ok(true)
        })
    }

    fn must_spacing(&mut self) -> Matched {
        self.rule(RuleTag::MustSpacing, |m| {
            if !m.match_class(is_space) {
                return Ok(false);
            }
            m.skip_while(is_space);
            Ok(true)
        })
    }
}

fn is_space(ch: char) -> bool {
    SPACES.contains(&ch)
}
