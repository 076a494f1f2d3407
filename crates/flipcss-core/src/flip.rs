//! Mirrors every direction-sensitive construct of a parsed stylesheet.

use crate::ast::{
    AtRuleBlock, Attribute, BodyItem, Declaration, Item, Marker, Rule, Selector, SelectorToken,
    Stylesheet, ValueToken,
};
use crate::diagnostic::Diagnostic;
use crate::options::FlipOptions;
use crate::tables::{self, Shorthand};

/// Flip `sheet` in place and return the diagnostics collected on the way.
/// Diagnostics are only collected when `options.warnings` is set.
pub fn flip_stylesheet(sheet: &mut Stylesheet, options: &FlipOptions) -> Vec<Diagnostic> {
    let mut flipper = Flipper {
        options,
        diagnostics: Vec::new(),
    };
    flipper.flip_items(&mut sheet.items);
    flipper.diagnostics
}

struct Flipper<'o> {
    options: &'o FlipOptions,
    diagnostics: Vec<Diagnostic>,
}

impl Flipper<'_> {
    fn flip_items(&mut self, items: &mut [Item]) {
        let mut skip = false;
        for item in items.iter_mut() {
            match item {
                Item::Whitespace(_) => continue,
                Item::Comment(comment) => {
                    skip = comment.marker() == Some(Marker::NoFlip);
                    continue;
                }
                Item::Rule(rule) if skip => {
                    tracing::debug!(at = %rule.span, "rule left alone by @noflip");
                }
                Item::Rule(rule) => self.flip_rule(rule),
                Item::AtRule(at_rule) if !skip => {
                    if let AtRuleBlock::Rules(children) = &mut at_rule.block {
                        self.flip_items(children);
                    }
                }
                Item::AtRule(_) | Item::Raw(_) => {}
            }
            skip = false;
        }
    }

    fn flip_rule(&mut self, rule: &mut Rule) {
        let mut changed = false;
        if self.options.swap_pseudo {
            changed |= swap_pseudo_elements(&mut rule.selector);
        }
        if self.options.flip_selectors {
            changed |= flip_selector_words(&mut rule.selector);
        }

        let selector = rule.selector.to_string().trim().to_string();
        let mut skip = false;
        for item in rule.body.iter_mut() {
            match item {
                BodyItem::Whitespace(_) => continue,
                BodyItem::Comment(comment) => {
                    skip = comment.marker() == Some(Marker::NoFlip);
                    continue;
                }
                BodyItem::Declaration(decl) if !skip => {
                    changed |= self.flip_declaration(decl, &selector);
                }
                BodyItem::Declaration(_) | BodyItem::Raw(_) => {}
            }
            skip = false;
        }

        if self.options.warnings {
            self.check_inline_float(rule, &selector);
        }
        if changed {
            tracing::debug!(selector = %selector, at = %rule.span, "rule flipped");
            rule.touch();
        }
    }

    fn flip_declaration(&mut self, decl: &mut Declaration, selector: &str) -> bool {
        let name = decl.property.to_ascii_lowercase();
        let mut changed = false;

        if let Some(mirror) = tables::mirror_property(&name) {
            tracing::debug!(from = %decl.property, to = mirror, "property mirrored");
            decl.property = match_case(&decl.property, mirror);
            changed = true;
        }

        match tables::shorthand(&name) {
            Some(Shorthand::Box) => changed |= permute_box(&mut decl.value),
            Some(Shorthand::Radius) => changed |= permute_radius(&mut decl.value),
            None => {}
        }

        if tables::has_keyword_values(&name) {
            changed |= mirror_keywords(&mut decl.value);
        }

        if self.options.warnings
            && tables::is_position_property(&name)
            && has_numeric_horizontal(&decl.value)
        {
            self.diagnostics.push(Diagnostic::ambiguous_position(
                selector,
                &decl.property,
                &decl.value_text(),
                decl.span,
            ));
        }

        if self.options.flip_urls {
            changed |= flip_urls(&mut decl.value);
        }

        changed
    }

    fn check_inline_float(&mut self, rule: &Rule, selector: &str) {
        let float = rule.declarations().find(|decl| {
            decl.property.eq_ignore_ascii_case("float")
                && (decl.has_keyword("left") || decl.has_keyword("right"))
        });
        let inline = rule.declarations().any(|decl| {
            decl.property.eq_ignore_ascii_case("display") && decl.has_keyword("inline")
        });
        if let (Some(float), true) = (float, inline) {
            self.diagnostics
                .push(Diagnostic::inline_float(selector, float.span));
        }
    }
}

fn swap_pseudo_elements(selector: &mut Selector) -> bool {
    let mut changed = false;
    for token in &mut selector.tokens {
        let SelectorToken::Pseudo(text) = token else {
            continue;
        };
        let name_start = text.rfind(':').map_or(0, |idx| idx + 1);
        if let Some(mirror) = tables::mirror_pseudo(&text[name_start..]) {
            *text = format!("{}{}", &text[..name_start], match_case(&text[name_start..], mirror));
            changed = true;
        }
    }
    changed
}

fn flip_selector_words(selector: &mut Selector) -> bool {
    let mut changed = false;
    for token in &mut selector.tokens {
        let target = match token {
            SelectorToken::Class(name) | SelectorToken::Id(name) => name,
            SelectorToken::Attribute(Attribute { value, .. }) => value,
            _ => continue,
        };
        if let Some(flipped) = flip_words(target) {
            *target = flipped;
            changed = true;
        }
    }
    changed
}

/// Indices of the top-level components of a value, stopping at `!important`.
fn slots(value: &[ValueToken]) -> Vec<usize> {
    value
        .iter()
        .enumerate()
        .take_while(|(_, token)| !token.is_delim("!"))
        .filter(|(_, token)| !token.is_trivia())
        .map(|(idx, _)| idx)
        .collect()
}

fn permute_box(value: &mut [ValueToken]) -> bool {
    let slots = slots(value);
    if slots.len() != 4 {
        return false;
    }
    let (a, b) = (slots[tables::BOX_SWAP.0], slots[tables::BOX_SWAP.1]);
    if value[a] == value[b] {
        return false;
    }
    value.swap(a, b);
    true
}

fn permute_radius(value: &mut Vec<ValueToken>) -> bool {
    let before = value.clone();
    let slots = slots(value);
    let groups: Vec<Vec<usize>> = slots
        .split(|&idx| value[idx].is_delim("/"))
        .map(<[usize]>::to_vec)
        .collect();

    // Back to front so insertions do not shift groups still to be visited.
    for group in groups.iter().rev() {
        let Some(order) = tables::radius_permutation(group.len()) else {
            continue;
        };
        let original: Vec<ValueToken> = group.iter().map(|&idx| value[idx].clone()).collect();
        for (&slot, &src) in group.iter().zip(order) {
            value[slot] = original[src].clone();
        }
        let mut at = group[group.len() - 1] + 1;
        for &src in &order[group.len()..] {
            value.insert(at, ValueToken::Whitespace(" ".to_string()));
            value.insert(at + 1, original[src].clone());
            at += 2;
        }
    }

    *value != before
}

fn mirror_keywords(value: &mut [ValueToken]) -> bool {
    let mut changed = false;
    for token in value.iter_mut() {
        match token {
            ValueToken::Ident(word) => {
                if let Some(mirror) = tables::mirror_keyword(word) {
                    *word = match_case(word, mirror);
                    changed = true;
                }
            }
            ValueToken::Function { name, args, .. } if !name.eq_ignore_ascii_case("var") => {
                changed |= mirror_keywords(args);
            }
            _ => {}
        }
    }
    changed
}

fn has_numeric_horizontal(value: &[ValueToken]) -> bool {
    let slots = slots(value);
    slots
        .split(|&idx| value[idx].is_delim(","))
        .any(|layer| {
            let horizontal = match layer {
                [only] => *only,
                [first, second] if is_vertical_keyword(&value[*first]) => *second,
                [first, _] => *first,
                _ => return false,
            };
            is_numeric(&value[horizontal])
        })
}

fn is_vertical_keyword(token: &ValueToken) -> bool {
    matches!(token, ValueToken::Ident(word)
        if word.eq_ignore_ascii_case("top") || word.eq_ignore_ascii_case("bottom"))
}

fn is_numeric(token: &ValueToken) -> bool {
    match token {
        ValueToken::Number(_) => true,
        ValueToken::Function { name, .. } => name.eq_ignore_ascii_case("calc"),
        _ => false,
    }
}

fn flip_urls(value: &mut [ValueToken]) -> bool {
    let mut changed = false;
    for token in value.iter_mut() {
        match token {
            ValueToken::Url(url) => {
                if let Some(flipped) = flip_url(url) {
                    tracing::debug!(from = %url, to = %flipped, "url mirrored");
                    *url = flipped;
                    changed = true;
                }
            }
            ValueToken::Function { args, .. } => changed |= flip_urls(args),
            _ => {}
        }
    }
    changed
}

fn flip_url(url: &str) -> Option<String> {
    let open = url.find('(')? + 1;
    let close = url.rfind(')').filter(|&idx| idx >= open).unwrap_or(url.len());
    if is_data_uri(&url[open..close]) {
        return None;
    }
    let inner = flip_words(&url[open..close])?;
    Some(format!("{}{}{}", &url[..open], inner, &url[close..]))
}

/// Inline payloads such as base64 images must stay byte for byte.
fn is_data_uri(body: &str) -> bool {
    let body = body.trim().trim_start_matches(['"', '\'']);
    body.get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
}

/// Mirrors whole words only: a word is a maximal run of ASCII letters and
/// digits, so `left-arrow` flips while `leftmost` does not.
/// Returns `None` when nothing changed.
fn flip_words(text: &str) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut changed = false;
    let mut rest = text;

    while let Some(ch) = rest.chars().next() {
        if !ch.is_ascii_alphanumeric() {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        }
        let end = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        let (word, tail) = rest.split_at(end);
        match tables::mirror_word(word) {
            Some(mirror) => {
                out.push_str(&match_case(word, mirror));
                changed = true;
            }
            None => out.push_str(word),
        }
        rest = tail;
    }

    changed.then_some(out)
}

/// `replacement` in the letter case of `original`: lower, UPPER or Capitalized.
fn match_case(original: &str, replacement: &str) -> String {
    if !original.chars().any(|c| c.is_ascii_uppercase()) {
        return replacement.to_string();
    }
    if !original.chars().any(|c| c.is_ascii_lowercase()) {
        return replacement.to_ascii_uppercase();
    }
    let mut chars = replacement.chars();
    match chars.next() {
        Some(first) if original.starts_with(|c: char| c.is_ascii_uppercase()) => {
            first.to_ascii_uppercase().to_string() + chars.as_str()
        }
        _ => replacement.to_string(),
    }
}
