//! Subgraphs and the [`Container`] trait shared with the root graph.
//!
//! A container owns an ordered list of statements. Duplicates are allowed
//! and kept; lookups return every match in order, deletions pick matches
//! by occurrence index rather than by value.

use crate::domain::attributes::{AttrValue, Attributes};
use crate::domain::element::{Defaults, Edge, Node};
use crate::domain::id::Id;
use crate::domain::loose::Object;
use crate::error::Result;

/// One statement of a (sub)graph body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Node(Node),
    Edge(Edge),
    Subgraph(Subgraph),
    Defaults(Defaults),
}

/// A named or anonymous nested block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Subgraph {
    name: Option<Id>,
    attributes: Attributes,
    statements: Vec<Statement>,
}

impl Subgraph {
    pub fn new(name: impl Into<Id>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// A bare `{ ... }` block.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn name(&self) -> Option<&Id> {
        self.name.as_ref()
    }

    pub fn set_name(&mut self, name: Option<Id>) {
        self.name = name;
    }

    /// Merge `node` onto an existing node of the same name in this
    /// container, or append it. Nested containers are not searched.
    pub fn merge_node(&mut self, node: Node) {
        match self.get_node_mut(node.name().as_str()) {
            Some(existing) => existing.attributes_mut().merge(node.attributes()),
            None => self.statements.push(Statement::Node(node)),
        }
    }

    /// Merge `edge` onto an existing edge with the same endpoints in this
    /// container, or append it.
    pub fn merge_edge(&mut self, edge: Edge, directed: bool) {
        let existing = self.statements.iter_mut().find_map(|s| match s {
            Statement::Edge(e) if e.same_endpoints(&edge, directed) => Some(e),
            _ => None,
        });
        match existing {
            Some(e) => e.attributes_mut().merge(edge.attributes()),
            None => self.statements.push(Statement::Edge(edge)),
        }
    }

    pub fn get_node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.statements.iter_mut().find_map(|s| match s {
            Statement::Node(n) if n.name() == name => Some(n),
            _ => None,
        })
    }

    pub(crate) fn push(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    /// Remove the `index`-th statement matching `pred`, or all of them.
    fn remove_matching(&mut self, index: Option<usize>, pred: impl Fn(&Statement) -> bool) -> bool {
        match index {
            None => {
                let before = self.statements.len();
                self.statements.retain(|s| !pred(s));
                self.statements.len() != before
            }
            Some(i) => {
                let position = self
                    .statements
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| pred(s))
                    .nth(i)
                    .map(|(pos, _)| pos);
                match position {
                    Some(pos) => {
                        self.statements.remove(pos);
                        true
                    }
                    None => false,
                }
            }
        }
    }
}

/// Shared behaviour of [`Subgraph`] and [`Graph`](crate::domain::graph::Graph).
pub trait Container {
    fn body(&self) -> &Subgraph;
    fn body_mut(&mut self) -> &mut Subgraph;

    fn add_node(&mut self, node: Node) {
        self.body_mut().push(Statement::Node(node));
    }

    fn add_edge(&mut self, edge: Edge) {
        self.body_mut().push(Statement::Edge(edge));
    }

    fn add_subgraph(&mut self, subgraph: Subgraph) {
        self.body_mut().push(Statement::Subgraph(subgraph));
    }

    fn add_defaults(&mut self, defaults: Defaults) {
        self.body_mut().push(Statement::Defaults(defaults));
    }

    fn try_add_node(&mut self, obj: impl Into<Object>) -> Result<()>
    where
        Self: Sized,
    {
        let node = Node::try_from(obj.into())?;
        self.add_node(node);
        Ok(())
    }

    fn try_add_edge(&mut self, obj: impl Into<Object>) -> Result<()>
    where
        Self: Sized,
    {
        let edge = Edge::try_from(obj.into())?;
        self.add_edge(edge);
        Ok(())
    }

    fn try_add_subgraph(&mut self, obj: impl Into<Object>) -> Result<()>
    where
        Self: Sized,
    {
        let subgraph = Subgraph::try_from(obj.into())?;
        self.add_subgraph(subgraph);
        Ok(())
    }

    fn statements(&self) -> &[Statement] {
        &self.body().statements
    }

    /// Every node declared directly in this container with raw name `name`.
    fn get_node(&self, name: &str) -> Vec<&Node> {
        self.get_nodes().into_iter().filter(|n| n.name() == name).collect()
    }

    fn get_nodes(&self) -> Vec<&Node> {
        self.statements()
            .iter()
            .filter_map(|s| match s {
                Statement::Node(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    /// Edges from `src` to `dst` (raw `id[:port]` text, exact order).
    fn get_edge(&self, src: &str, dst: &str) -> Vec<&Edge> {
        self.get_edges().into_iter().filter(|e| e.connects(src, dst)).collect()
    }

    fn get_edges(&self) -> Vec<&Edge> {
        self.statements()
            .iter()
            .filter_map(|s| match s {
                Statement::Edge(e) => Some(e),
                _ => None,
            })
            .collect()
    }

    fn get_subgraph(&self, name: &str) -> Vec<&Subgraph> {
        self.get_subgraph_list()
            .into_iter()
            .filter(|s| s.name().is_some_and(|n| n == name))
            .collect()
    }

    fn get_subgraph_list(&self) -> Vec<&Subgraph> {
        self.statements()
            .iter()
            .filter_map(|s| match s {
                Statement::Subgraph(sub) => Some(sub),
                _ => None,
            })
            .collect()
    }

    /// Delete the `index`-th node named `name`, or all of them when `index`
    /// is `None`. Returns whether anything was removed.
    fn del_node(&mut self, name: &str, index: Option<usize>) -> bool {
        self.body_mut()
            .remove_matching(index, |s| matches!(s, Statement::Node(n) if n.name() == name))
    }

    fn del_edge(&mut self, src: &str, dst: &str, index: Option<usize>) -> bool {
        self.body_mut()
            .remove_matching(index, |s| matches!(s, Statement::Edge(e) if e.connects(src, dst)))
    }

    fn del_subgraph(&mut self, name: &str, index: Option<usize>) -> bool {
        self.body_mut().remove_matching(index, |s| {
            matches!(s, Statement::Subgraph(sub) if sub.name().is_some_and(|n| n == name))
        })
    }

    /// The container's own graph attributes.
    fn attributes(&self) -> &Attributes {
        &self.body().attributes
    }

    fn attributes_mut(&mut self) -> &mut Attributes {
        &mut self.body_mut().attributes
    }

    fn set(&mut self, name: impl Into<String>, value: impl Into<AttrValue>)
    where
        Self: Sized,
    {
        self.attributes_mut().set(name, value);
    }

    fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attributes().get(name)
    }
}

impl Container for Subgraph {
    fn body(&self) -> &Subgraph {
        self
    }

    fn body_mut(&mut self) -> &mut Subgraph {
        self
    }
}
