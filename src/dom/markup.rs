//! Minimal markup fragment parser.
//!
//! Handles what a formatted completion typically produces: nested tags with
//! quoted or bare attributes, self-closing and void tags, comments, and a
//! narrow set of character references. Anything that does not parse as a
//! tag is kept as literal text.

use super::is_void_element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
    Element {
        name: String,
        attributes: Vec<(String, String)>,
        children: Vec<Fragment>,
    },
    Text(String),
}

impl Fragment {
    pub fn text(value: &str) -> Self {
        Fragment::Text(value.to_string())
    }
}

#[derive(Debug)]
enum Token {
    Start {
        name: String,
        attributes: Vec<(String, String)>,
        self_closing: bool,
    },
    End(String),
    Text(String),
}

pub fn parse_fragment(input: &str) -> Vec<Fragment> {
    build(tokenize(input))
}

fn tokenize(input: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut text = String::new();
    let mut rest = input;

    while let Some(lt) = rest.find('<') {
        text.push_str(&rest[..lt]);
        let tail = &rest[lt..];

        if let Some(body) = tail.strip_prefix("<!--") {
            let end = body.find("-->").map(|i| i + 3).unwrap_or(body.len());
            rest = &body[end..];
            continue;
        }

        match scan_tag(tail) {
            Some((token, consumed)) => {
                flush_text(&mut text, &mut tokens);
                tokens.push(token);
                rest = &tail[consumed..];
            }
            None => {
                text.push('<');
                rest = &tail[1..];
            }
        }
    }
    text.push_str(rest);
    flush_text(&mut text, &mut tokens);
    tokens
}

fn flush_text(text: &mut String, tokens: &mut Vec<Token>) {
    if !text.is_empty() {
        tokens.push(Token::Text(decode_entities(text)));
        text.clear();
    }
}

/// Scans one tag starting at `<`. Returns the token and the bytes consumed.
fn scan_tag(s: &str) -> Option<(Token, usize)> {
    let close = s.find('>')?;
    let inner = &s[1..close];

    if let Some(name) = inner.strip_prefix('/') {
        let name = name.trim();
        if !is_tag_name(name) {
            return None;
        }
        return Some((Token::End(name.to_ascii_lowercase()), close + 1));
    }

    let (inner, self_closing) = match inner.strip_suffix('/') {
        Some(stripped) => (stripped, true),
        None => (inner, false),
    };
    let name_end = inner
        .find(|c: char| c.is_whitespace())
        .unwrap_or(inner.len());
    let name = &inner[..name_end];
    if !is_tag_name(name) {
        return None;
    }

    let attributes = parse_attributes(&inner[name_end..])?;
    Some((
        Token::Start {
            name: name.to_ascii_lowercase(),
            attributes,
            self_closing,
        },
        close + 1,
    ))
}

fn is_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn parse_attributes(mut s: &str) -> Option<Vec<(String, String)>> {
    let mut attributes = Vec::new();
    loop {
        s = s.trim_start();
        if s.is_empty() {
            return Some(attributes);
        }
        let key_end = s
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(s.len());
        let key = &s[..key_end];
        if key.is_empty() || key.contains(['"', '\'', '<']) {
            return None;
        }
        s = s[key_end..].trim_start();

        let value = if let Some(after_eq) = s.strip_prefix('=') {
            let after_eq = after_eq.trim_start();
            match after_eq.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &after_eq[1..];
                    let end = body.find(quote)?;
                    s = &body[end + 1..];
                    decode_entities(&body[..end])
                }
                Some(_) => {
                    let end = after_eq
                        .find(|c: char| c.is_whitespace())
                        .unwrap_or(after_eq.len());
                    s = &after_eq[end..];
                    decode_entities(&after_eq[..end])
                }
                None => return None,
            }
        } else {
            String::new()
        };
        attributes.push((key.to_ascii_lowercase(), value));
    }
}

fn build(tokens: Vec<Token>) -> Vec<Fragment> {
    // Each open element is (name, attributes, children); index 0 is the fragment root.
    let mut stack: Vec<(String, Vec<(String, String)>, Vec<Fragment>)> =
        vec![(String::new(), Vec::new(), Vec::new())];

    for token in tokens {
        match token {
            Token::Text(text) => {
                if let Some((_, _, children)) = stack.last_mut() {
                    children.push(Fragment::Text(text));
                }
            }
            Token::Start {
                name,
                attributes,
                self_closing,
            } => {
                if self_closing || is_void_element(&name) {
                    if let Some((_, _, children)) = stack.last_mut() {
                        children.push(Fragment::Element {
                            name,
                            attributes,
                            children: Vec::new(),
                        });
                    }
                } else {
                    stack.push((name, attributes, Vec::new()));
                }
            }
            Token::End(name) => {
                // Stray end tags are dropped; a matching one closes everything above it.
                let Some(depth) = stack.iter().skip(1).rposition(|(n, _, _)| *n == name) else {
                    continue;
                };
                while stack.len() > depth + 1 {
                    close_top(&mut stack);
                }
            }
        }
    }

    while stack.len() > 1 {
        close_top(&mut stack);
    }
    stack.pop().map(|(_, _, children)| children).unwrap_or_default()
}

fn close_top(stack: &mut Vec<(String, Vec<(String, String)>, Vec<Fragment>)>) {
    if let Some((name, attributes, children)) = stack.pop()
        && let Some((_, _, parent)) = stack.last_mut()
    {
        parent.push(Fragment::Element {
            name,
            attributes,
            children,
        });
    }
}

/// Decodes `&amp;`, `&lt;`, `&gt;`, `&quot;`, `&apos;`, `&nbsp;` and
/// semicolon-terminated numeric references. Everything else passes through.
pub fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_one(tail) {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &tail[consumed..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_one(s: &str) -> Option<(char, usize)> {
    const NAMED: &[(&str, char)] = &[
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&nbsp;", '\u{a0}'),
    ];
    if let Some((name, ch)) = NAMED.iter().find(|(name, _)| s.starts_with(name)) {
        return Some((*ch, name.len()));
    }

    let body = s.strip_prefix("&#")?;
    let semi = body.find(';')?;
    let digits = &body[..semi];
    let value = match digits.strip_prefix(['x', 'X']) {
        Some(hex) if !hex.is_empty() && hex.len() <= 6 => u32::from_str_radix(hex, 16).ok()?,
        Some(_) => return None,
        None if !digits.is_empty() && digits.len() <= 7 => digits.parse().ok()?,
        None => return None,
    };
    char::from_u32(value).map(|ch| (ch, 2 + semi + 1))
}

pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn escape_attribute(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_with_entities() {
        assert_eq!(
            parse_fragment("a &amp; b&nbsp;"),
            vec![Fragment::text("a & b\u{a0}")]
        );
    }

    #[test]
    fn test_nested_elements_and_attributes() {
        let parsed = parse_fragment(r#"<span class="ac" data-id=7>@<b>alice</b></span>&nbsp;"#);
        assert_eq!(
            parsed,
            vec![
                Fragment::Element {
                    name: "span".into(),
                    attributes: vec![
                        ("class".into(), "ac".into()),
                        ("data-id".into(), "7".into())
                    ],
                    children: vec![
                        Fragment::text("@"),
                        Fragment::Element {
                            name: "b".into(),
                            attributes: vec![],
                            children: vec![Fragment::text("alice")],
                        },
                    ],
                },
                Fragment::text("\u{a0}"),
            ]
        );
    }

    #[test]
    fn test_void_and_self_closing_tags() {
        let parsed = parse_fragment("a<br>b<img src='x'/>c");
        assert_eq!(parsed.len(), 5);
        assert!(matches!(&parsed[1], Fragment::Element { name, .. } if name == "br"));
        assert!(matches!(&parsed[3], Fragment::Element { name, .. } if name == "img"));
    }

    #[test]
    fn test_unclosed_elements_are_closed_at_end() {
        let parsed = parse_fragment("<i>open");
        assert_eq!(
            parsed,
            vec![Fragment::Element {
                name: "i".into(),
                attributes: vec![],
                children: vec![Fragment::text("open")],
            }]
        );
    }

    #[test]
    fn test_stray_angle_brackets_stay_text() {
        assert_eq!(parse_fragment("1 < 2 > 0"), vec![Fragment::text("1 < 2 > 0")]);
        assert_eq!(parse_fragment("x</p>y"), vec![Fragment::text("x"), Fragment::text("y")]);
    }

    #[test]
    fn test_numeric_references() {
        assert_eq!(decode_entities("&#64;&#x41;&#xZZ;"), "@A&#xZZ;");
    }

    #[test]
    fn test_comments_are_dropped() {
        assert_eq!(parse_fragment("a<!-- hidden -->b"), vec![Fragment::text("ab")]);
    }
}
