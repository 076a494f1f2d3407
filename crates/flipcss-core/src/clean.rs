//! Strips rules authored for the other direction and declares the target
//! direction up front.
//!
//! A rule, at-rule or declaration preceded by `/*@ltr-only*/` or
//! `/*@rtl-only*/` (only whitespace in between) applies to that direction
//! alone. Cleaning for a direction removes the items marked for the other one
//! and drops the markers of the items it keeps.

use crate::ast::{AtRuleBlock, BodyItem, Item, Marker, Rule, Stylesheet};
use crate::options::Direction;

/// Clean `sheet` in place for `direction`.
pub fn clean_stylesheet(sheet: &mut Stylesheet, direction: Direction) {
    clean_items(&mut sheet.items, direction);
    let at = preface_position(&sheet.items);
    sheet
        .items
        .insert(at, Item::Rule(Rule::direction_preface(direction)));
}

/// Statements that are only valid before any style rule.
const LEADING_STATEMENTS: &[&str] = &["charset", "import", "namespace", "layer"];

/// Index just past the leading `@charset`/`@import`/`@namespace`/`@layer`
/// statements, so the preface never invalidates them.
fn preface_position(items: &[Item]) -> usize {
    let mut at = 0;
    for (idx, item) in items.iter().enumerate() {
        match item {
            Item::Whitespace(_) | Item::Comment(_) => {}
            Item::AtRule(at_rule)
                if matches!(at_rule.block, AtRuleBlock::Statement { .. })
                    && LEADING_STATEMENTS
                        .iter()
                        .any(|name| at_rule.unprefixed_name().eq_ignore_ascii_case(name)) =>
            {
                at = idx + 1;
            }
            _ => break,
        }
    }
    at
}

fn clean_items(items: &mut Vec<Item>, direction: Direction) {
    strip_marked(items, direction);
    for item in items.iter_mut() {
        match item {
            Item::Rule(rule) => {
                if strip_marked(&mut rule.body, direction) {
                    rule.touch();
                }
            }
            Item::AtRule(at_rule) => {
                if let AtRuleBlock::Rules(children) = &mut at_rule.block {
                    clean_items(children, direction);
                }
            }
            _ => {}
        }
    }
}

/// The parts of a sequence that marker handling needs to tell apart.
trait Markable {
    fn marker(&self) -> Option<Marker>;
    fn is_whitespace(&self) -> bool;
    /// Whether a marker in front of this item applies to it.
    fn is_markable(&self) -> bool;
}

impl Markable for Item {
    fn marker(&self) -> Option<Marker> {
        match self {
            Item::Comment(comment) => comment.marker(),
            _ => None,
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, Item::Whitespace(_))
    }

    fn is_markable(&self) -> bool {
        matches!(self, Item::Rule(_) | Item::AtRule(_))
    }
}

impl Markable for BodyItem {
    fn marker(&self) -> Option<Marker> {
        match self {
            BodyItem::Comment(comment) => comment.marker(),
            _ => None,
        }
    }

    fn is_whitespace(&self) -> bool {
        matches!(self, BodyItem::Whitespace(_))
    }

    fn is_markable(&self) -> bool {
        matches!(self, BodyItem::Declaration(_))
    }
}

/// Applies direction markers in `items`. Returns whether anything was removed.
fn strip_marked<T: Markable>(items: &mut Vec<T>, direction: Direction) -> bool {
    let mut changed = false;
    let mut idx = 0;

    while idx < items.len() {
        let Some(Marker::Only(marked)) = items[idx].marker() else {
            idx += 1;
            continue;
        };
        let mut target = idx + 1;
        while target < items.len() && items[target].is_whitespace() {
            target += 1;
        }
        if target >= items.len() || !items[target].is_markable() {
            idx += 1;
            continue;
        }

        if marked == direction {
            tracing::debug!(direction = %marked, "direction marker dropped");
            items.drain(idx..target);
        } else {
            tracing::debug!(direction = %marked, "item for the other direction removed");
            items.drain(idx..=target);
        }
        changed = true;
    }

    changed
}
