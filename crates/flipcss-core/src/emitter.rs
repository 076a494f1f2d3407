use crate::ast::{AtRule, AtRuleBlock, BodyItem, Declaration, Item, Rule, Stylesheet};

/// Render a stylesheet back to CSS text.
///
/// Untouched rules are written from their source text; rewritten rules are
/// rebuilt from their parts, which still carry the original whitespace.
pub fn render(stylesheet: &Stylesheet) -> String {
    let mut out = String::new();
    emit_items(&stylesheet.items, &mut out);
    out
}

fn emit_items(items: &[Item], out: &mut String) {
    for item in items {
        match item {
            Item::Rule(rule) => emit_rule(rule, out),
            Item::AtRule(at_rule) => emit_at_rule(at_rule, out),
            Item::Comment(comment) => out.push_str(&comment.text),
            Item::Whitespace(text) => out.push_str(text),
            Item::Raw(raw) => out.push_str(&raw.text),
        }
    }
}

fn emit_rule(rule: &Rule, out: &mut String) {
    if let Some(raw) = rule.raw() {
        out.push_str(raw);
        return;
    }

    out.push_str(&rule.selector.to_string());
    out.push('{');
    for item in &rule.body {
        match item {
            BodyItem::Declaration(decl) => emit_declaration(decl, out),
            BodyItem::Comment(comment) => out.push_str(&comment.text),
            BodyItem::Whitespace(text) => out.push_str(text),
            BodyItem::Raw(raw) => out.push_str(&raw.text),
        }
    }
    out.push('}');
}

fn emit_declaration(decl: &Declaration, out: &mut String) {
    out.push_str(&decl.property);
    out.push_str(&decl.colon);
    for token in &decl.value {
        token.write_to(out);
    }
    if decl.semicolon {
        out.push(';');
    }
}

fn emit_at_rule(at_rule: &AtRule, out: &mut String) {
    out.push('@');
    out.push_str(&at_rule.name);
    out.push_str(&at_rule.prelude);
    match &at_rule.block {
        AtRuleBlock::Statement { semicolon } => {
            if *semicolon {
                out.push(';');
            }
        }
        AtRuleBlock::Rules(items) => {
            out.push('{');
            emit_items(items, out);
            out.push('}');
        }
        AtRuleBlock::Opaque(body) => {
            out.push('{');
            out.push_str(body);
            out.push('}');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ValueToken;
    use crate::options::Direction;
    use crate::parser::parse;

    #[test]
    fn emits_preface_compactly() {
        let sheet = Stylesheet {
            items: vec![Item::Rule(Rule::direction_preface(Direction::Ltr))],
        };
        assert_eq!(render(&sheet), "body{direction:ltr;}");
    }

    #[test]
    fn touched_rule_keeps_original_spacing() {
        let css = "a {\n  float : left ;\n  color: red\n}\n";
        let mut sheet = parse(css);
        let Item::Rule(rule) = &mut sheet.items[0] else {
            panic!("expected rule");
        };
        rule.touch();
        assert_eq!(render(&sheet), css);

        let Item::Rule(rule) = &mut sheet.items[0] else {
            panic!("expected rule");
        };
        if let BodyItem::Declaration(decl) = &mut rule.body[1] {
            decl.value[0] = ValueToken::Ident("right".to_string());
        }
        assert_eq!(render(&sheet), "a {\n  float : right ;\n  color: red\n}\n");
    }

    #[test]
    fn untouched_rule_uses_source_text() {
        let mut sheet = parse("a{float:left}");
        if let Item::Rule(rule) = &mut sheet.items[0] {
            if let BodyItem::Declaration(decl) = &mut rule.body[0] {
                decl.property = "clear".to_string();
            }
        }
        assert_eq!(render(&sheet), "a{float:left}");
    }

    #[test]
    fn rebuilds_nested_at_rules() {
        let css = "@media (min-width: 1px) {\n  a { left: 0 }\n}\n@import 'x.css';";
        assert_eq!(render(&parse(css)), css);
    }
}
