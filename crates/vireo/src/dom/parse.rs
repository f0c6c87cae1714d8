//! Markup parser producing a node tree.
//!
//! Covers the subset templates need: elements, attributes (double-quoted,
//! single-quoted, unquoted and bare), void elements, `/>` self-closing syntax,
//! comments and doctypes (both dropped), and the basic character entities.

use super::node::{Attribute, Node, VOID_ELEMENTS};
use crate::error::{Error, Result};

/// Parse markup into a fragment holding the top-level nodes.
pub fn parse(markup: &str) -> Result<Node> {
    Parser::new(markup).run()
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    stack: Vec<Node>,
}

impl<'a> Parser<'a> {
    fn new(src: &'a str) -> Self {
        Self {
            src,
            pos: 0,
            stack: vec![Node::fragment()],
        }
    }

    fn run(mut self) -> Result<Node> {
        while self.pos < self.src.len() {
            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.skip_past("-->", "unterminated comment")?;
            } else if rest.starts_with("</") {
                self.close_tag()?;
            } else if rest.starts_with("<!") {
                self.skip_past(">", "unterminated declaration")?;
            } else if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
            {
                self.open_tag()?;
            } else {
                self.text();
            }
        }
        if self.stack.len() > 1 {
            let open = self.current();
            return Err(self.error(format!(
                "unclosed element <{}>",
                open.tag_name().unwrap_or_default()
            )));
        }
        Ok(self.stack.remove(0))
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn current(&self) -> &Node {
        // The root fragment is never popped.
        &self.stack[self.stack.len() - 1]
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Markup {
            position: self.pos,
            message: message.into(),
        }
    }

    fn skip_past(&mut self, terminator: &str, message: &str) -> Result<()> {
        match self.rest().find(terminator) {
            Some(index) => {
                self.pos += index + terminator.len();
                Ok(())
            }
            None => Err(self.error(message)),
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let end = rest.find(|c: char| !pred(c)).unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    fn text(&mut self) {
        let rest = self.rest();
        // A '<' that does not start markup is literal text.
        let mut end = 0;
        loop {
            match rest[end..].find('<') {
                Some(index) => {
                    let at = end + index;
                    let after = &rest[at + 1..];
                    if after.starts_with(|c: char| c.is_ascii_alphabetic() || c == '/' || c == '!')
                    {
                        end = at;
                        break;
                    }
                    end = at + 1;
                }
                None => {
                    end = rest.len();
                    break;
                }
            }
        }
        self.pos += end;
        self.current().append_child(&Node::text(decode_entities(&rest[..end])));
    }

    fn open_tag(&mut self) -> Result<()> {
        self.pos += 1;
        let tag = self
            .take_while(|c| c.is_ascii_alphanumeric() || c == '-')
            .to_ascii_lowercase();
        let element = Node::element(&tag);
        let self_closing = loop {
            self.skip_whitespace();
            let rest = self.rest();
            if rest.is_empty() {
                return Err(self.error(format!("unterminated tag <{tag}>")));
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                break true;
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break false;
            }
            let attribute = self.attribute()?;
            element.set_attribute(&attribute.name, attribute.value);
        };
        self.current().append_child(&element);
        if !self_closing && !VOID_ELEMENTS.contains(&tag.as_str()) {
            self.stack.push(element);
        }
        Ok(())
    }

    fn attribute(&mut self) -> Result<Attribute> {
        let name = self.take_while(|c| !c.is_whitespace() && c != '=' && c != '>' && c != '/');
        if name.is_empty() {
            return Err(self.error("expected attribute name"));
        }
        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            return Ok(Attribute::new(name, ""));
        }
        self.pos += 1;
        self.skip_whitespace();
        let value = match self.rest().chars().next() {
            Some(quote @ ('"' | '\'')) => {
                self.pos += 1;
                let value = self.take_while(|c| c != quote);
                if self.rest().is_empty() {
                    return Err(self.error(format!("unterminated value for attribute `{name}`")));
                }
                self.pos += 1;
                value
            }
            _ => self.take_while(|c| !c.is_whitespace() && c != '>'),
        };
        Ok(Attribute::new(name, decode_entities(value)))
    }

    fn close_tag(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos += 2;
        let tag = self
            .take_while(|c| c != '>')
            .trim()
            .to_ascii_lowercase();
        if self.rest().is_empty() {
            return Err(self.error(format!("unterminated closing tag </{tag}>")));
        }
        self.pos += 1;
        if self.stack.len() > 1 && self.current().tag_name() == Some(tag.as_str()) {
            self.stack.pop();
            return Ok(());
        }
        Err(Error::Markup {
            position: start,
            message: format!("unexpected closing tag </{tag}>"),
        })
    }
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(index) = rest.find('&') {
        out.push_str(&rest[..index]);
        rest = &rest[index..];
        let decoded = rest.find(';').and_then(|end| {
            let entity = &rest[1..end];
            let c = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" | "#39" => Some('\''),
                _ => entity
                    .strip_prefix('#')
                    .and_then(|n| n.parse::<u32>().ok())
                    .and_then(char::from_u32),
            };
            c.map(|c| (c, end + 1))
        });
        match decoded {
            Some((c, len)) => {
                out.push(c);
                rest = &rest[len..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directives() {
        let root = parse(r#"<div id="app"><input v-model="name"><button @click="go">Go</button></div>"#)
            .unwrap();
        let app = root.query_selector("#app").unwrap();
        let children = app.children();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].attribute("v-model").as_deref(), Some("name"));
        assert_eq!(children[1].attribute("@click").as_deref(), Some("go"));
        assert_eq!(children[1].text_content(), "Go");
    }

    #[test]
    fn test_attribute_forms() {
        let root = parse(r#"<p a="1" b='2' c=3 d v-on:click = "x"></p>"#).unwrap();
        let p = root.first_child().unwrap();
        let names: Vec<_> = p.attributes().into_iter().map(|a| (a.name, a.value)).collect();
        assert_eq!(
            names,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
                ("c".to_string(), "3".to_string()),
                ("d".to_string(), String::new()),
                ("v-on:click".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn test_void_and_self_closing() {
        let root = parse("<input value=a><br/><span/>text").unwrap();
        let children = root.children();
        assert_eq!(children.len(), 4);
        assert_eq!(children[0].value(), "a");
        assert!(!children[2].has_children());
        assert!(children[3].is_text());
    }

    #[test]
    fn test_comments_and_entities() {
        let root = parse("<!doctype html><!-- note --><p>a &lt; b &amp;&amp; {{ c }} &#65; &bogus;</p>").unwrap();
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.text_content(), "a < b && {{ c }} A &bogus;");
    }

    #[test]
    fn test_literal_less_than() {
        let root = parse("<p>1 < 2</p>").unwrap();
        assert_eq!(root.text_content(), "1 < 2");
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            parse("<div><p></div>"),
            Err(Error::Markup { message, .. }) if message == "unexpected closing tag </div>"
        ));
        assert!(matches!(
            parse("<div>"),
            Err(Error::Markup { message, .. }) if message == "unclosed element <div>"
        ));
        assert!(matches!(parse("<div a=\"x></div>"), Err(Error::Markup { .. })));
        assert!(matches!(parse("</p>"), Err(Error::Markup { position: 0, .. })));
    }

    #[test]
    fn test_roundtrip_markup() {
        let markup = r#"<div id="app"><p>{{ a }} and {{ b }}</p><input v-model="name"></div>"#;
        assert_eq!(parse(markup).unwrap().inner_html(), markup);
    }
}
