use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use serde::{Deserialize, Serialize};

use crate::literals::strip_quotes;
use crate::node_list::NodeList;

/// Strategy assumed by `{% autoescape %}` when none is given.
pub const DEFAULT_AUTOESCAPE_STRATEGY: &str = "html";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Node {
    /// A run of non-whitespace text.
    Text(String),
    /// A run of whitespace only.
    Whitespace(String),
    Block(Block),
    /// `{{ parent() }}`
    Parent,
    Extends(Extends),
    For(For),
    /// `{{ expr }}`, holding the trimmed expression verbatim.
    Print(String),
    /// `{% deprecated '...' %}`, holding the unquoted message.
    Deprecated(String),
    Set(Set),
    Autoescape(Autoescape),
    Types(Types),
}

/// `{% block name %} ... {% endblock %}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub name: String,
    pub children: NodeList,
}

impl Block {
    /// True when the only non-whitespace content of the block is a single
    /// `{{ parent() }}` call.
    pub fn delegates_to_parent(&self) -> bool {
        matches!(self.children.remove_whitespace().as_slice(), [Node::Parent])
    }
}

/// `{% sw_extends ... %}` in either the simple or the object-literal form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extends {
    pub template: String,
    pub scopes: Vec<String>,
}

impl Extends {
    /// The template path without a leading `@Bundle/` namespace segment.
    ///
    /// `@Storefront/storefront/base.html.twig` becomes
    /// `storefront/base.html.twig`; paths without a namespace are returned as is.
    pub fn relative_path(&self) -> &str {
        if !self.template.starts_with('@') {
            return &self.template;
        }
        match self.template.split_once('/') {
            Some((_, rest)) => rest,
            None => &self.template,
        }
    }
}

/// `{% for variable in collection %} ... {% endfor %}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct For {
    pub variable: String,
    /// Raw collection expression, never evaluated.
    pub collection: String,
    pub children: NodeList,
}

/// `{% set a, b = x, y %}` or `{% set a %} ... {% endset %}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Set {
    pub variables: Vec<String>,
    /// Right-hand side expressions; empty for the block form.
    pub values: Vec<String>,
    /// Captured content; present only for the block form.
    pub body: Option<NodeList>,
}

impl Set {
    pub fn is_block(&self) -> bool {
        self.body.is_some()
    }
}

/// `{% autoescape [strategy] %} ... {% endautoescape %}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autoescape {
    /// The strategy token exactly as written (`'js'`, `false`, ...), if any.
    pub strategy: Option<String>,
    pub children: NodeList,
}

impl Autoescape {
    /// The effective strategy name with quotes removed.
    pub fn strategy_name(&self) -> &str {
        match &self.strategy {
            Some(token) => strip_quotes(token),
            None => DEFAULT_AUTOESCAPE_STRATEGY,
        }
    }
}

/// `{% types key:'value' ... %}`. Values are stored single-quoted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Types {
    pub types: BTreeMap<String, String>,
}

impl Node {
    /// Reconstruct the template source for this node and its children.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out);
        out
    }

    pub(crate) fn dump_into(&self, out: &mut String) {
        match self {
            Node::Text(text) | Node::Whitespace(text) => out.push_str(text),
            Node::Block(block) => {
                out.push_str("{% block ");
                out.push_str(&block.name);
                out.push_str(" %}");
                block.children.dump_into(out);
                out.push_str("{% endblock %}");
            }
            Node::Parent => out.push_str("{{ parent() }}"),
            Node::Extends(extends) => {
                if extends.scopes.is_empty() {
                    let _ = write!(out, "{{% sw_extends '{}' %}}", extends.template);
                } else {
                    let scopes = extends
                        .scopes
                        .iter()
                        .map(|scope| format!("'{scope}'"))
                        .collect::<Vec<_>>()
                        .join(", ");
                    let _ = write!(
                        out,
                        "{{% sw_extends {{ template: '{}', scopes: [{}] }} %}}",
                        extends.template, scopes
                    );
                }
            }
            Node::For(for_node) => {
                let _ = write!(
                    out,
                    "{{% for {} in {} %}}",
                    for_node.variable, for_node.collection
                );
                for_node.children.dump_into(out);
                out.push_str("{% endfor %}");
            }
            Node::Print(expression) => {
                out.push_str("{{ ");
                out.push_str(expression);
                out.push_str(" }}");
            }
            Node::Deprecated(message) => {
                let _ = write!(out, "{{% deprecated '{message}' %}}");
            }
            Node::Set(set) => match &set.body {
                Some(body) => {
                    let _ = write!(out, "{{% set {} %}}", set.variables.join(", "));
                    body.dump_into(out);
                    out.push_str("{% endset %}");
                }
                None => {
                    let _ = write!(
                        out,
                        "{{% set {} = {} %}}",
                        set.variables.join(", "),
                        set.values.join(", ")
                    );
                }
            },
            Node::Autoescape(autoescape) => {
                match &autoescape.strategy {
                    Some(token) => {
                        let _ = write!(out, "{{% autoescape {token} %}}");
                    }
                    None => out.push_str("{% autoescape %}"),
                }
                autoescape.children.dump_into(out);
                out.push_str("{% endautoescape %}");
            }
            Node::Types(types) => {
                out.push_str("{% types");
                for (key, value) in &types.types {
                    let _ = write!(out, " {key}:{value}");
                }
                out.push_str(" %}");
            }
        }
    }

    /// Append this node's debug line(s) at the given depth.
    pub(crate) fn write_debug(&self, out: &mut String, depth: usize) {
        let indent = "  ".repeat(depth);
        let _ = match self {
            Node::Text(text) => writeln!(out, "{indent}Text({text:?})"),
            Node::Whitespace(text) => writeln!(out, "{indent}Whitespace({text:?})"),
            Node::Block(block) => writeln!(out, "{indent}Block(name: {})", block.name),
            Node::Parent => writeln!(out, "{indent}Parent"),
            Node::Extends(extends) if extends.scopes.is_empty() => {
                writeln!(out, "{indent}Extends(template: {:?})", extends.template)
            }
            Node::Extends(extends) => writeln!(
                out,
                "{indent}Extends(template: {:?}, scopes: {:?})",
                extends.template, extends.scopes
            ),
            Node::For(for_node) => writeln!(
                out,
                "{indent}For(variable: {}, collection: {})",
                for_node.variable, for_node.collection
            ),
            Node::Print(expression) => writeln!(out, "{indent}Print({expression})"),
            Node::Deprecated(message) => writeln!(out, "{indent}Deprecated({message:?})"),
            Node::Set(set) if set.is_block() => {
                writeln!(out, "{indent}Set(block, variables: {:?})", set.variables)
            }
            Node::Set(set) => writeln!(
                out,
                "{indent}Set(inline, variables: {:?}, values: {:?})",
                set.variables, set.values
            ),
            Node::Autoescape(autoescape) => writeln!(
                out,
                "{indent}Autoescape(strategy: {})",
                autoescape.strategy_name()
            ),
            Node::Types(types) => writeln!(out, "{indent}Types({:?})", types.types),
        };

        if let Some(children) = self.children() {
            children.write_debug(out, depth + 1);
        }
    }

    /// The owned child list of a scoped node.
    pub fn children(&self) -> Option<&NodeList> {
        match self {
            Node::Block(block) => Some(&block.children),
            Node::For(for_node) => Some(&for_node.children),
            Node::Set(set) => set.body.as_ref(),
            Node::Autoescape(autoescape) => Some(&autoescape.children),
            _ => None,
        }
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            Node::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Whitespace(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}
