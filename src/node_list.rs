use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use crate::ast::{Block, Extends, Node};

/// An ordered sequence of nodes in document order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeList(pub Vec<Node>);

impl NodeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// All nodes matching `predicate`, in document order.
    ///
    /// Only [`Block`] children are searched recursively; the bodies of `for`,
    /// `set` and `autoescape` are not visited.
    pub fn find<P>(&self, mut predicate: P) -> Vec<&Node>
    where
        P: FnMut(&Node) -> bool,
    {
        let mut matches = Vec::new();
        self.find_into(&mut predicate, &mut matches);
        matches
    }

    fn find_into<'a, P>(&'a self, predicate: &mut P, matches: &mut Vec<&'a Node>)
    where
        P: FnMut(&Node) -> bool,
    {
        for node in &self.0 {
            if predicate(node) {
                matches.push(node);
            }
            if let Node::Block(block) = node {
                block.children.find_into(predicate, matches);
            }
        }
    }

    /// The first block named `name`, searching nested blocks too.
    pub fn find_block(&self, name: &str) -> Option<&Block> {
        self.find(|node| matches!(node, Node::Block(block) if block.name == name))
            .into_iter()
            .find_map(Node::as_block)
    }

    /// The first `sw_extends` declaration.
    pub fn extends(&self) -> Option<&Extends> {
        self.find(|node| matches!(node, Node::Extends(_)))
            .into_iter()
            .find_map(|node| match node {
                Node::Extends(extends) => Some(extends),
                _ => None,
            })
    }

    /// Names of every block, outer blocks before the blocks nested in them.
    pub fn block_names(&self) -> Vec<&str> {
        self.find(|node| matches!(node, Node::Block(_)))
            .into_iter()
            .filter_map(Node::as_block)
            .map(|block| block.name.as_str())
            .collect()
    }

    /// Depth-first rewrite. Block children are visited before their block,
    /// and every node is replaced by what `visitor` returns for it.
    ///
    /// Like [`NodeList::find`], only block children are descended into.
    pub fn traverse<F>(&mut self, mut visitor: F)
    where
        F: FnMut(Node) -> Node,
    {
        self.traverse_with(&mut visitor);
    }

    fn traverse_with<F>(&mut self, visitor: &mut F)
    where
        F: FnMut(Node) -> Node,
    {
        let nodes = std::mem::take(&mut self.0);
        self.0 = nodes
            .into_iter()
            .map(|mut node| {
                if let Node::Block(block) = &mut node {
                    block.children.traverse_with(visitor);
                }
                visitor(node)
            })
            .collect();
    }

    /// Every non-whitespace node, found the same way as [`NodeList::find`].
    pub fn remove_whitespace(&self) -> Vec<&Node> {
        self.find(|node| !node.is_whitespace())
    }

    /// Reconstruct the template source.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(&mut out);
        out
    }

    pub(crate) fn dump_into(&self, out: &mut String) {
        for node in &self.0 {
            node.dump_into(out);
        }
    }

    /// An indented, one-node-per-line view of the tree.
    pub fn debug_tree(&self) -> String {
        let mut out = String::new();
        self.write_debug(&mut out, 0);
        out
    }

    pub(crate) fn write_debug(&self, out: &mut String, depth: usize) {
        for node in &self.0 {
            node.write_debug(out, depth);
        }
    }

    pub fn into_inner(self) -> Vec<Node> {
        self.0
    }
}

impl fmt::Display for NodeList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dump())
    }
}

impl Deref for NodeList {
    type Target = Vec<Node>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for NodeList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Node>> for NodeList {
    fn from(nodes: Vec<Node>) -> Self {
        Self(nodes)
    }
}

impl FromIterator<Node> for NodeList {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for NodeList {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
