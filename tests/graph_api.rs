/// Graph construction, lookup and serialization through the public API.

use dotkit::{
    parse, Charset, Container, DotWriter, Edge, Graph, GraphKind, Node, Object, Subgraph, WriterConfig,
};
use pretty_assertions::assert_eq;

fn directed() -> Graph {
    Graph::new("testgraph", GraphKind::Digraph)
}

#[test]
fn test_keep_graph_type() {
    let g = Graph::new("Test", GraphKind::Graph);
    assert_eq!(g.kind(), GraphKind::Graph);
    let g = Graph::new("Test", GraphKind::Digraph);
    assert_eq!(g.kind(), GraphKind::Digraph);
}

#[test]
fn test_add_style() {
    let mut node = Node::new("mynode");
    node.add_style("abc");
    assert_eq!(node.style().as_deref(), Some("abc"));
    node.add_style("def");
    assert_eq!(node.style().as_deref(), Some("abc,def"));
    node.add_style("ghi");
    assert_eq!(node.style().as_deref(), Some("abc,def,ghi"));
}

#[test]
fn test_create_simple_graph_with_node() {
    let mut g = Graph::digraph("G");
    g.add_node(Node::with_attrs("legend", [("shape", "box"), ("label", "mine")]));
    let writer = DotWriter::new(WriterConfig {
        sort_attributes: true,
        ..WriterConfig::default()
    });
    assert_eq!(writer.write_graph(&g), "digraph G {\nlegend [label=mine, shape=box];\n}\n");
}

#[test]
fn test_attribute_with_implicit_value() {
    let g = parse("digraph {\na -> b[label=\"hi\", decorate];\n}")
        .unwrap()
        .single()
        .unwrap();
    let attrs = g.get_edges()[0].attributes();
    assert!(attrs.contains("decorate"));
}

#[test]
fn test_subgraphs() {
    let mut g = Graph::default();
    assert!(g.get_subgraph_list().is_empty());
    g.add_subgraph(Subgraph::new("foo"));
    assert_eq!(g.get_subgraph_list().len(), 1);
    assert_eq!(g.get_subgraph_list()[0].name().unwrap(), "foo");
    assert!(g.del_subgraph("foo", None));
    assert!(g.get_subgraph_list().is_empty());
}

#[test]
fn test_unicode_ids() {
    let node1 = "\"aánñoöüé€\"";
    let node2 = "\"îôø®çßΩ\"";

    let mut g = Graph::default();
    g.set_charset("utf-8").unwrap();
    g.add_node(Node::new(node1));
    g.add_node(Node::new(node2));
    g.add_edge(Edge::new(node1, node2));

    assert_eq!(g.get_node(node1)[0].name(), node1);
    assert_eq!(g.get_node(node2)[0].name(), node2);
    assert!(*g.get_edges()[0].source() == node1);
    assert!(*g.get_edges()[0].destination() == node2);

    let g2 = parse(&g.to_string()).unwrap().single().unwrap();
    assert_eq!(g2.get_node(node1)[0].name(), node1);
    assert_eq!(g2.get_node(node2)[0].name(), node2);
    assert!(*g2.get_edges()[0].source() == node1);
    assert!(*g2.get_edges()[0].destination() == node2);
}

#[test]
fn test_latin1_ids_survive_bytes() {
    let name = "\"café crème\"";
    let mut g = Graph::default();
    g.set_charset("latin1").unwrap();
    g.add_node(Node::new(name));

    let bytes = g.to_bytes().unwrap();
    assert!(std::str::from_utf8(&bytes).is_err());

    let g2 = dotkit::parse_bytes(&bytes, Charset::Latin1).unwrap().single().unwrap();
    assert_eq!(g2.get_nodes()[0].name(), name);
    assert_eq!(g2.charset().unwrap(), Charset::Latin1);
}

#[test]
fn test_multiple_graphs() {
    let graphs = parse("graph A { a->b };\ngraph B {c->d}").unwrap().into_graphs();
    assert_eq!(graphs.len(), 2);
    let names: Vec<String> = graphs.iter().map(|g| g.name().unwrap().to_string()).collect();
    assert_eq!(names, vec!["A".to_string(), "B".to_string()]);
}

#[test]
fn test_numeric_node_id() {
    let mut g = directed();
    g.add_node(Node::new(1));
    assert_eq!(g.get_nodes()[0].name(), "1");
}

#[test]
fn test_quoted_node_id() {
    let mut g = directed();
    g.add_node(Node::new("\"node\""));
    assert_eq!(g.get_nodes()[0].name(), "\"node\"");
    assert_eq!(g.get_nodes()[0].to_string(), "\"node\";");
}

#[test]
fn test_keyword_node_id() {
    let mut g = directed();
    g.add_node(Node::new("node"));
    assert_eq!(g.get_nodes()[0].name(), "node");
    assert_eq!(g.get_nodes()[0].to_string(), "");
}

#[test]
fn test_keyword_node_id_with_attributes() {
    let mut g = directed();
    g.add_node(Node::with_attrs("node", [("shape", "box")]));
    assert_eq!(g.get_nodes()[0].to_string(), "node [shape=box];");
}

#[test]
fn test_names_of_many_nodes() {
    let mut g = directed();
    let names: Vec<String> = (0..10_000).map(|i| format!("node_{i:05}")).collect();
    for name in &names {
        g.add_node(Node::with_attrs(name, [("label", name.as_str())]));
    }
    let found: Vec<&str> = g.get_nodes().iter().map(|n| n.name().as_str()).collect();
    assert_eq!(found, names.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_add_argument_types() {
    let mut g = directed();
    assert!(g.try_add_node(1).unwrap_err().is_type());
    assert!(g.try_add_node("a").unwrap_err().is_type());
    assert!(g.try_add_edge(1).unwrap_err().is_type());
    assert!(g.try_add_edge("a").unwrap_err().is_type());
    assert!(g.try_add_subgraph(1).unwrap_err().is_type());
    assert!(g.try_add_subgraph("a").unwrap_err().is_type());
    assert!(g.try_add_node(Object::from(Edge::new("a", "b"))).unwrap_err().is_type());

    g.try_add_edge(Edge::new("a", "b")).unwrap();
    assert_eq!(g.get_edges().len(), 1);
}

#[test]
fn test_printable_label_quoting() {
    let printable: String = (0x20u8..0x7f).map(char::from).chain("\t\n\r".chars()).collect();
    let mut g = Graph::default();
    g.add_node(Node::with_attrs("test", [("label", printable.as_str())]));

    let first = g.to_string();
    let reparsed = parse(&first).unwrap().single().unwrap();
    assert_eq!(reparsed.get_node("test").len(), 1);
    assert_eq!(reparsed.to_string(), first);
}

#[test]
fn test_edges_do_not_create_nodes() {
    let mut g = directed();
    g.add_edge(Edge::new("a", "b"));
    assert!(g.get_nodes().is_empty());
    assert_eq!(g.get_edge("a", "b").len(), 1);
    assert!(g.get_edge("b", "a").is_empty());
}

#[test]
fn test_delete_by_index() {
    let mut g = directed();
    g.add_edge(Edge::with_attrs("a", "b", [("n", "0")]));
    g.add_edge(Edge::with_attrs("a", "b", [("n", "1")]));
    g.add_edge(Edge::with_attrs("a", "b", [("n", "2")]));

    assert!(g.del_edge("a", "b", Some(1)));
    let left: Vec<&str> = g
        .get_edge("a", "b")
        .iter()
        .filter_map(|e| e.attributes().get_text("n"))
        .collect();
    assert_eq!(left, vec!["0", "2"]);
    assert!(!g.del_node("missing", None));
}
