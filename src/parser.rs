use log::{debug, trace};

use crate::ast::{Autoescape, Block, For, Node, Set};
use crate::error::ParseError;
use crate::lexer::{next_tag, tokenize_text, TagKind};
use crate::literals::{parse_extends, parse_types, split_and_trim, strip_quotes};
use crate::node_list::NodeList;

/// The closing tag a scoped construct waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EndTag {
    Block,
    For,
    Set,
    Autoescape,
}

impl EndTag {
    fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "endblock" => Some(EndTag::Block),
            "endfor" => Some(EndTag::For),
            "endset" => Some(EndTag::Set),
            "endautoescape" => Some(EndTag::Autoescape),
            _ => None,
        }
    }

    fn keyword(self) -> &'static str {
        match self {
            EndTag::Block => "endblock",
            EndTag::For => "endfor",
            EndTag::Set => "endset",
            EndTag::Autoescape => "endautoescape",
        }
    }
}

/// What a single `{% ... %}` tag turned into.
enum Tag {
    Node(Node),
    /// Closes the scope currently being parsed.
    Close,
    /// Not something we model; keep the raw tag text.
    Literal,
}

/// Recursive-descent parser over a template string.
pub struct Parser<'a> {
    input: &'a str,
    cursor: usize,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, cursor: 0 }
    }

    pub fn parse(mut self) -> Result<NodeList, ParseError> {
        self.parse_nodes(None)
    }

    /// Parse until end of input, or until the `until` end tag closes the
    /// current scope. The end tag itself is consumed.
    fn parse_nodes(&mut self, until: Option<EndTag>) -> Result<NodeList, ParseError> {
        let input = self.input;
        let mut nodes = Vec::new();

        while self.cursor < input.len() {
            let rest = &input[self.cursor..];
            let Some((offset, kind)) = next_tag(rest) else {
                nodes.extend(tokenize_text(rest));
                self.cursor = input.len();
                break;
            };

            nodes.extend(tokenize_text(&rest[..offset]));

            let tag_start = self.cursor + offset;
            let body_start = tag_start + 2;
            let close = input[body_start..]
                .find(kind.closer())
                .ok_or(match kind {
                    TagKind::Block => ParseError::UnclosedBlockTag { offset: tag_start },
                    TagKind::Expr => ParseError::UnclosedExpressionTag { offset: tag_start },
                })?;
            let tag_end = body_start + close + 2;
            let body = input[body_start..body_start + close].trim();
            self.cursor = tag_end;

            match kind {
                TagKind::Expr => nodes.push(expression(body)),
                TagKind::Block => match self.block_tag(body, until)? {
                    Tag::Node(node) => nodes.push(node),
                    Tag::Close => return Ok(nodes.into()),
                    Tag::Literal => nodes.extend(tokenize_text(&input[tag_start..tag_end])),
                },
            }
        }

        if let Some(end) = until {
            debug!("reached end of input without {{% {} %}}, closing scope", end.keyword());
        }
        Ok(nodes.into())
    }

    fn parse_scope(&mut self, end: EndTag) -> Result<NodeList, ParseError> {
        trace!("entering scope closed by {} at byte {}", end.keyword(), self.cursor);
        self.parse_nodes(Some(end))
    }

    fn block_tag(&mut self, body: &str, until: Option<EndTag>) -> Result<Tag, ParseError> {
        let (keyword, args) = match body.split_once(char::is_whitespace) {
            Some((keyword, args)) => (keyword, args.trim()),
            None => (body, ""),
        };
        trace!("block tag {keyword:?} at byte {}", self.cursor);

        let tag = match keyword {
            "deprecated" if !args.is_empty() => {
                Tag::Node(Node::Deprecated(strip_quotes(args).to_string()))
            }
            "autoescape" => {
                let strategy = args.split_whitespace().next().map(str::to_string);
                let children = self.parse_scope(EndTag::Autoescape)?;
                Tag::Node(Node::Autoescape(Autoescape { strategy, children }))
            }
            "set" if !args.is_empty() => Tag::Node(self.set_tag(args)?),
            "types" => Tag::Node(Node::Types(parse_types(args)?)),
            "block" if !args.is_empty() => {
                let name = args.split_whitespace().next().unwrap_or(args).to_string();
                let children = self.parse_scope(EndTag::Block)?;
                Tag::Node(Node::Block(Block { name, children }))
            }
            "for" => match args.split_once(" in ") {
                Some((variable, collection))
                    if !variable.trim().is_empty() && !collection.trim().is_empty() =>
                {
                    let variable = variable.trim().to_string();
                    let collection = collection.trim().to_string();
                    let children = self.parse_scope(EndTag::For)?;
                    Tag::Node(Node::For(For {
                        variable,
                        collection,
                        children,
                    }))
                }
                _ => {
                    debug!("for tag without `in` kept as text: {body:?}");
                    Tag::Literal
                }
            },
            "sw_extends" => Tag::Node(Node::Extends(parse_extends(args)?)),
            other => match EndTag::from_keyword(other) {
                Some(end) if until == Some(end) => Tag::Close,
                Some(end) => {
                    debug!("orphaned {} kept as text", end.keyword());
                    Tag::Literal
                }
                None => {
                    debug!("unrecognized tag kept as text: {body:?}");
                    Tag::Literal
                }
            },
        };

        Ok(tag)
    }

    fn set_tag(&mut self, assignment: &str) -> Result<Node, ParseError> {
        if let Some((lhs, rhs)) = assignment.split_once('=') {
            return Ok(Node::Set(Set {
                variables: split_and_trim(lhs, ','),
                values: split_and_trim(rhs, ','),
                body: None,
            }));
        }

        let variables = split_and_trim(assignment, ',');
        let body = self.parse_scope(EndTag::Set)?;
        Ok(Node::Set(Set {
            variables,
            values: Vec::new(),
            body: Some(body),
        }))
    }
}

fn expression(body: &str) -> Node {
    if body == "parent()" {
        Node::Parent
    } else {
        Node::Print(body.to_string())
    }
}
