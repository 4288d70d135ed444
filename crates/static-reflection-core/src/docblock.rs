//! Doc comment model and parsing.
//!
//! A [`DocCommentParser`] is handed to the parser by whoever owns the parse
//! (normally the session), so callers can swap in their own tag handling.

use std::fmt::Debug;

/// A single `@tag value` line of a doc comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocTag {
    /// Tag name without the `@`.
    pub name: String,
    /// Everything after the tag name, continuation lines joined by a space.
    pub value: String,
}

impl DocTag {
    /// The first whitespace-separated word of the value (the type for
    /// `@var`, `@param` and `@return`).
    pub fn first_word(&self) -> Option<&str> {
        self.value.split_whitespace().next()
    }
}

/// A parsed doc comment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocBlock {
    /// The first paragraph.
    pub summary: String,
    /// Remaining free text before the tags.
    pub description: String,
    /// Tags in declaration order.
    pub tags: Vec<DocTag>,
}

impl DocBlock {
    /// First tag with the given name (without `@`, case-sensitive).
    pub fn tag(&self, name: &str) -> Option<&DocTag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// All tags with the given name.
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a DocTag> + 'a {
        self.tags.iter().filter(move |t| t.name == name)
    }

    /// Type word of the first `@var` tag.
    pub fn var_type(&self) -> Option<&str> {
        self.tag("var").and_then(DocTag::first_word)
    }

    /// Type word of the first `@return` tag.
    pub fn return_type(&self) -> Option<&str> {
        self.tag("return").and_then(DocTag::first_word)
    }

    /// Type word of the `@param` tag naming `$variable`.
    pub fn param_type(&self, variable: &str) -> Option<&str> {
        let wanted = variable.trim_start_matches('$');
        self.tags_named("param").find_map(|tag| {
            let mut words = tag.value.split_whitespace();
            let ty = words.next()?;
            let name = words.next()?.trim_start_matches('&').trim_start_matches("...");
            (name.trim_start_matches('$') == wanted).then_some(ty)
        })
    }
}

/// Turns raw doc comment text into a [`DocBlock`].
pub trait DocCommentParser: Send + Sync + Debug {
    /// Parse a raw `/** … */` comment.
    fn parse(&self, raw: &str) -> DocBlock;
}

/// Default doc comment parser: summary paragraph, description, `@tags`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardDocCommentParser;

impl DocCommentParser for StandardDocCommentParser {
    fn parse(&self, raw: &str) -> DocBlock {
        let mut block = DocBlock::default();
        let mut paragraphs: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut in_tags = false;

        for line in comment_lines(raw) {
            if let Some(rest) = line.strip_prefix('@') {
                in_tags = true;
                let (name, value) = match rest.find(char::is_whitespace) {
                    Some(idx) => (&rest[..idx], rest[idx..].trim()),
                    None => (rest, ""),
                };
                block.tags.push(DocTag {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            } else if in_tags {
                if let Some(tag) = block.tags.last_mut()
                    && !line.is_empty()
                {
                    if !tag.value.is_empty() {
                        tag.value.push(' ');
                    }
                    tag.value.push_str(line);
                }
            } else if line.is_empty() {
                if !current.is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                }
            } else {
                if !current.is_empty() {
                    current.push('\n');
                }
                current.push_str(line);
            }
        }
        if !current.is_empty() {
            paragraphs.push(current);
        }

        let mut paragraphs = paragraphs.into_iter();
        block.summary = paragraphs.next().unwrap_or_default();
        block.description = paragraphs.collect::<Vec<_>>().join("\n\n");
        block
    }
}

/// Strip the comment delimiters and leading `*` gutters.
fn comment_lines(raw: &str) -> impl Iterator<Item = &str> {
    let body = raw.trim();
    let body = body.strip_prefix("/**").unwrap_or(body);
    let body = body.strip_suffix("*/").unwrap_or(body);
    body.lines().map(|line| {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line);
        line.trim()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> DocBlock {
        StandardDocCommentParser.parse(raw)
    }

    #[test]
    fn summary_description_and_tags() {
        let block = parse(
            "/**\n * Loads users.\n *\n * Reads from the primary store.\n * Falls back to cache.\n *\n * @param int $id The id\n *        of the user.\n * @return User|null\n */",
        );
        assert_eq!(block.summary, "Loads users.");
        assert_eq!(block.description, "Reads from the primary store.\nFalls back to cache.");
        assert_eq!(block.tags.len(), 2);
        assert_eq!(block.tags[0].value, "int $id The id of the user.");
        assert_eq!(block.return_type(), Some("User|null"));
        assert_eq!(block.param_type("$id"), Some("int"));
        assert_eq!(block.param_type("other"), None);
    }

    #[test]
    fn single_line_comment() {
        let block = parse("/** @var string */");
        assert_eq!(block.summary, "");
        assert_eq!(block.var_type(), Some("string"));
    }

    #[test]
    fn tag_without_value() {
        let block = parse("/**\n * @deprecated\n */");
        assert_eq!(block.tag("deprecated").map(|t| t.value.as_str()), Some(""));
        assert_eq!(block.tag("deprecated").and_then(DocTag::first_word), None);
    }

    #[test]
    fn by_reference_and_variadic_params() {
        let block = parse("/**\n * @param array &$items\n * @param string ...$rest\n */");
        assert_eq!(block.param_type("items"), Some("array"));
        assert_eq!(block.param_type("rest"), Some("string"));
    }
}
