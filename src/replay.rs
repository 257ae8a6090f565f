//! Second pass over a successful match: fires the recorded action markers.

use tracing::trace;

use crate::ast::{RuleTag, Token};

/// Receiver of replayed actions.
///
/// Calls arrive in the order the corresponding constructs appear in the
/// source. Implementations may panic on calls the grammar can never produce,
/// such as popping a where clause that was never pushed.
pub trait QueryBuilder {
    fn add_select(&mut self);
    fn set_table_name(&mut self, name: &str);
    fn set_limit(&mut self, limit: &str);

    fn init_where(&mut self);
    fn push_where(&mut self);
    fn pop_where(&mut self);

    fn init_predicate(&mut self);
    fn init_and_clause(&mut self);
    fn init_or_clause(&mut self);

    fn set_predicate_command(&mut self, command: &str);
    fn use_predicate_row_key(&mut self);
    fn add_predicate_key(&mut self, key: &str);
    fn add_predicate_literal(&mut self, literal: &str);
}

/// Walks `tokens` once, front to back.
///
/// A [`RuleTag::Text`] token becomes the current text; each action marker
/// calls the matching builder method, handing over the current text where
/// the action takes one. All other tokens are ignored.
pub fn replay<B: QueryBuilder + ?Sized>(tokens: &[Token], input: &[char], builder: &mut B) {
    let mut text = String::new();

    for token in tokens {
        match token.rule {
            RuleTag::Text => {
                text = input[token.begin as usize..token.end as usize].iter().collect();
                continue;
            }
            rule if !rule.is_action() => continue,
            rule => trace!(action = %rule, text = %text, "replaying action"),
        }

        match token.rule {
            RuleTag::ActionAddSelect => builder.add_select(),
            RuleTag::ActionSetTableName => builder.set_table_name(&text),
            RuleTag::ActionSetLimit => builder.set_limit(&text),
            RuleTag::ActionInitWhere => builder.init_where(),
            RuleTag::ActionPushWhere => builder.push_where(),
            RuleTag::ActionPopWhere => builder.pop_where(),
            RuleTag::ActionInitPredicate => builder.init_predicate(),
            RuleTag::ActionInitAndClause => builder.init_and_clause(),
            RuleTag::ActionInitOrClause => builder.init_or_clause(),
            RuleTag::ActionSetPredicateCommand => builder.set_predicate_command(&text),
            RuleTag::ActionUsePredicateRowKey => builder.use_predicate_row_key(),
            RuleTag::ActionAddPredicateKey => builder.add_predicate_key(&text),
            RuleTag::ActionAddPredicateLiteral => builder.add_predicate_literal(&text),
            _ => unreachable!("non-action token {} survived the filter", token.rule),
        }
    }
}
