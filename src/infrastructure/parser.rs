//! Recursive descent parser for DOT documents.
//!
//! ```text
//! document  := block*
//! block     := ["strict"] ("graph" | "digraph") [ID] "{" stmt* "}" [";"]
//! stmt      := node_stmt | edge_stmt | attr_stmt | ID "=" ID | subgraph
//! subgraph  := ["subgraph" [ID]] "{" stmt* "}"
//! ```
//!
//! Keywords are case-insensitive and `;` between statements is optional.
//! `node [...]` / `edge [...]` statements are kept in place and, unless
//! disabled in [`ParserConfig`], their attributes are copied into every
//! node or edge created after them in the same scope or a nested one.

use crate::domain::attributes::Attributes;
use crate::domain::charset::Charset;
use crate::domain::element::{Defaults, DefaultsKind, Edge, Endpoint, Node};
use crate::domain::graph::{Graph, GraphKind};
use crate::domain::id::Id;
use crate::domain::subgraph::{Container, Statement, Subgraph};
use crate::error::{DotError, Result};
use crate::infrastructure::lexer::{tokenize, Token, TokenKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Copy `node [...]` / `edge [...]` defaults into later declarations.
    pub inherit_defaults: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self { inherit_defaults: true }
    }
}

/// Result of parsing a document: one graph, or several in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Single(Graph),
    Many(Vec<Graph>),
}

impl Parsed {
    pub fn len(&self) -> usize {
        match self {
            Parsed::Single(_) => 1,
            Parsed::Many(graphs) => graphs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_graphs(self) -> Vec<Graph> {
        match self {
            Parsed::Single(graph) => vec![graph],
            Parsed::Many(graphs) => graphs,
        }
    }

    pub fn graphs(&self) -> Vec<&Graph> {
        match self {
            Parsed::Single(graph) => vec![graph],
            Parsed::Many(graphs) => graphs.iter().collect(),
        }
    }

    /// The graph of a single-graph document.
    pub fn single(self) -> Option<Graph> {
        match self {
            Parsed::Single(graph) => Some(graph),
            Parsed::Many(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, src: &str) -> Result<Parsed> {
        let tokens = tokenize(src)?;
        let mut session = Session {
            tokens: &tokens,
            pos: 0,
            config: self.config,
            kind: GraphKind::Graph,
            strict: false,
        };
        let mut graphs = session.document()?;
        debug!(graphs = graphs.len(), tokens = tokens.len(), "parsed DOT document");
        if graphs.len() == 1 {
            Ok(Parsed::Single(graphs.remove(0)))
        } else {
            Ok(Parsed::Many(graphs))
        }
    }

    pub fn parse_bytes(&self, bytes: &[u8], charset: Charset) -> Result<Parsed> {
        let text = charset.decode(bytes)?;
        self.parse(&text)
    }

    /// Read and parse a file. Input is decoded as UTF-8 unless that fails
    /// and the raw bytes declare a Latin-1 charset.
    pub fn parse_file(&self, path: &Path) -> Result<Parsed> {
        let bytes = std::fs::read(path)?;
        match Charset::Utf8.decode(&bytes) {
            Ok(text) => self.parse(&text),
            Err(_) if declares_latin1(&bytes) => {
                debug!(path = %path.display(), "falling back to latin1 decoding");
                self.parse_bytes(&bytes, Charset::Latin1)
            }
            Err(err) => Err(err),
        }
    }
}

fn declares_latin1(bytes: &[u8]) -> bool {
    let ascii: String = bytes
        .iter()
        .filter(|b| b.is_ascii())
        .map(|&b| (b as char).to_ascii_lowercase())
        .filter(|c| !c.is_whitespace() && *c != '"')
        .collect();
    ["charset=latin1", "charset=iso-8859-1", "charset=latin-1", "charset=l1"]
        .iter()
        .any(|needle| ascii.contains(needle))
}

/// Parse with the default configuration.
pub fn parse(src: &str) -> Result<Parsed> {
    Parser::default().parse(src)
}

pub fn parse_bytes(bytes: &[u8], charset: Charset) -> Result<Parsed> {
    Parser::default().parse_bytes(bytes, charset)
}

pub fn parse_file(path: &Path) -> Result<Parsed> {
    Parser::default().parse_file(path)
}

/// Defaults in force at some point of a scope.
#[derive(Debug, Clone, Default)]
struct Scope {
    node: Attributes,
    edge: Attributes,
}

struct Session<'t> {
    tokens: &'t [Token],
    pos: usize,
    config: ParserConfig,
    kind: GraphKind,
    strict: bool,
}

impl<'t> Session<'t> {
    fn peek(&self) -> &'t Token {
        // The lexer always ends the stream with Eof.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek_kind(&self) -> &'t TokenKind {
        &self.peek().kind
    }

    fn peek_kind_at(&self, ahead: usize) -> &'t TokenKind {
        let idx = (self.pos + ahead).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn bump(&mut self) -> &'t Token {
        let token = self.peek();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == kind {
            self.bump();
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> DotError {
        let token = self.peek();
        DotError::parse(
            token.line,
            token.column,
            format!("expected {expected}, found {}", token.kind.describe()),
        )
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<()> {
        if self.eat(kind) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn document(&mut self) -> Result<Vec<Graph>> {
        let mut graphs = Vec::new();
        loop {
            while self.eat(&TokenKind::Semi) {}
            if *self.peek_kind() == TokenKind::Eof {
                break;
            }
            graphs.push(self.block()?);
        }
        if graphs.is_empty() {
            return Err(self.unexpected("'graph' or 'digraph'"));
        }
        Ok(graphs)
    }

    fn block(&mut self) -> Result<Graph> {
        let strict = if self.peek_kind().is_keyword("strict") {
            self.bump();
            true
        } else {
            false
        };

        let kind = if self.peek_kind().is_keyword("graph") {
            GraphKind::Graph
        } else if self.peek_kind().is_keyword("digraph") {
            GraphKind::Digraph
        } else {
            return Err(self.unexpected("'graph' or 'digraph'"));
        };
        self.bump();
        self.kind = kind;
        self.strict = strict;

        let name = if *self.peek_kind() == TokenKind::LBrace {
            None
        } else {
            Some(self.id()?)
        };

        let mut graph = match name {
            Some(name) => Graph::new(name, kind),
            None => Graph::anonymous(kind),
        };
        graph.set_strict(strict);

        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut scope = Scope::default();
        self.statements(graph.body_mut(), &mut scope)?;
        self.expect(&TokenKind::RBrace, "'}'")?;

        trace!(
            name = graph.name().map(Id::as_str).unwrap_or(""),
            statements = graph.statements().len(),
            "parsed graph block"
        );
        Ok(graph)
    }

    fn statements(&mut self, container: &mut Subgraph, scope: &mut Scope) -> Result<()> {
        loop {
            match self.peek_kind() {
                TokenKind::RBrace => return Ok(()),
                TokenKind::Semi => {
                    self.bump();
                }
                TokenKind::Eof => return Err(self.unexpected("'}'")),
                _ => self.statement(container, scope)?,
            }
        }
    }

    fn statement(&mut self, container: &mut Subgraph, scope: &mut Scope) -> Result<()> {
        let kind = self.peek_kind();

        if kind.is_keyword("node") || kind.is_keyword("edge") {
            let defaults_kind = if kind.is_keyword("node") {
                DefaultsKind::Node
            } else {
                DefaultsKind::Edge
            };
            self.bump();
            if *self.peek_kind() != TokenKind::LBracket {
                return Err(self.unexpected("'['"));
            }
            let attrs = self.attr_lists()?;
            let target = match defaults_kind {
                DefaultsKind::Node => &mut scope.node,
                DefaultsKind::Edge => &mut scope.edge,
            };
            target.merge(&attrs);
            container.add_defaults(Defaults::new(defaults_kind, attrs));
            return Ok(());
        }

        if kind.is_keyword("graph") {
            self.bump();
            if *self.peek_kind() != TokenKind::LBracket {
                return Err(self.unexpected("'['"));
            }
            let attrs = self.attr_lists()?;
            container.attributes_mut().merge(&attrs);
            return Ok(());
        }

        if kind.is_keyword("subgraph") || *kind == TokenKind::LBrace {
            let sub = self.subgraph(scope)?;
            if self.at_edge_op() {
                return self.edge_chain(Endpoint::from(sub), container, scope);
            }
            container.add_subgraph(sub);
            return Ok(());
        }

        let id = self.id()?;

        if self.eat(&TokenKind::Equals) {
            let value = self.id()?;
            container.attributes_mut().set(id.into_string(), value);
            return Ok(());
        }

        let port = self.port()?;
        if self.at_edge_op() {
            let first = Endpoint::Node { id, port };
            return self.edge_chain(first, container, scope);
        }

        let explicit = self.attr_lists()?;
        // Nodes are keyed by name alone; a re-declaration keeps the first port.
        match container.get_node_mut(id.as_str()) {
            Some(existing) => existing.attributes_mut().merge(&explicit),
            None => {
                let mut node = Node::new(id);
                node.set_port(port);
                if self.config.inherit_defaults {
                    node.attributes_mut().merge(&scope.node);
                }
                node.attributes_mut().merge(&explicit);
                container.add_node(node);
            }
        }
        Ok(())
    }

    fn at_edge_op(&self) -> bool {
        matches!(self.peek_kind(), TokenKind::Arrow | TokenKind::Line)
    }

    fn edge_chain(&mut self, first: Endpoint, container: &mut Subgraph, scope: &mut Scope) -> Result<()> {
        let mut endpoints = vec![first];
        while self.at_edge_op() {
            self.bump();
            endpoints.push(self.endpoint(scope)?);
        }

        let explicit = self.attr_lists()?;
        let mut attrs = Attributes::new();
        if self.config.inherit_defaults {
            attrs.merge(&scope.edge);
        }
        attrs.merge(&explicit);

        let directed = self.kind.is_directed();
        for pair in endpoints.windows(2) {
            let mut edge = Edge::new(pair[0].clone(), pair[1].clone());
            *edge.attributes_mut() = attrs.clone();
            if self.strict {
                container.merge_edge(edge, directed);
            } else {
                container.push(Statement::Edge(edge));
            }
        }
        Ok(())
    }

    fn endpoint(&mut self, scope: &Scope) -> Result<Endpoint> {
        let kind = self.peek_kind();
        if kind.is_keyword("subgraph") || *kind == TokenKind::LBrace {
            return Ok(Endpoint::from(self.subgraph(scope)?));
        }
        let id = self.id()?;
        let port = self.port()?;
        Ok(Endpoint::Node { id, port })
    }

    fn subgraph(&mut self, scope: &Scope) -> Result<Subgraph> {
        let mut name = None;
        if self.peek_kind().is_keyword("subgraph") {
            self.bump();
            if *self.peek_kind() != TokenKind::LBrace {
                name = Some(self.id()?);
            }
        }
        let mut sub = match name {
            Some(name) => Subgraph::new(name),
            None => Subgraph::anonymous(),
        };
        self.expect(&TokenKind::LBrace, "'{'")?;
        let mut inner = scope.clone();
        self.statements(&mut sub, &mut inner)?;
        self.expect(&TokenKind::RBrace, "'}'")?;
        Ok(sub)
    }

    /// `[":" ID [":" ID]]`, kept as raw text.
    fn port(&mut self) -> Result<Option<String>> {
        if !self.eat(&TokenKind::Colon) {
            return Ok(None);
        }
        let mut port = self.id()?.into_string();
        if self.eat(&TokenKind::Colon) {
            port.push(':');
            port.push_str(self.id()?.as_str());
        }
        Ok(Some(port))
    }

    /// Zero or more `[ ... ]` lists folded into one. A key given twice
    /// keeps its last value at its last position.
    fn attr_lists(&mut self) -> Result<Attributes> {
        let mut attrs = Attributes::new();
        while self.eat(&TokenKind::LBracket) {
            loop {
                match self.peek_kind() {
                    TokenKind::RBracket => {
                        self.bump();
                        break;
                    }
                    TokenKind::Comma | TokenKind::Semi => {
                        self.bump();
                    }
                    TokenKind::Eof => return Err(self.unexpected("']'")),
                    _ => {
                        let key = self.id()?.into_string();
                        attrs.remove(&key);
                        if self.eat(&TokenKind::Equals) {
                            let value = self.id()?;
                            attrs.set(key, value);
                        } else {
                            attrs.set_implicit(key);
                        }
                    }
                }
            }
        }
        Ok(attrs)
    }

    /// An ID: name, numeral, quoted string (with `+` concatenation) or HTML
    /// string. Keywords are not ids.
    fn id(&mut self) -> Result<Id> {
        let token = self.peek();
        match &token.kind {
            TokenKind::Name(text) => {
                if Id::from(text.as_str()).is_keyword() {
                    return Err(DotError::parse(
                        token.line,
                        token.column,
                        format!("keyword '{text}' cannot be used as an identifier; quote it"),
                    ));
                }
                self.bump();
                Ok(Id::new(text.clone()))
            }
            TokenKind::Numeral(text) | TokenKind::Html(text) => {
                self.bump();
                Ok(Id::new(text.clone()))
            }
            TokenKind::Quoted(text) => {
                self.bump();
                let mut literal = text.clone();
                while *self.peek_kind() == TokenKind::Plus {
                    let TokenKind::Quoted(next) = self.peek_kind_at(1) else {
                        self.bump();
                        return Err(self.unexpected("quoted string after '+'"));
                    };
                    self.bump();
                    self.bump();
                    literal.pop();
                    literal.push_str(&next[1..]);
                }
                Ok(Id::new(literal))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }
}
