//! Default example graph shown to new users

use crate::model::{Edge, Node, OntologyGraph, Position};

/// The default "Sandwich" ontology: 9 classes and 10 relations, 5 of
/// which are `subClassOf` edges.
pub fn sandwich_graph() -> OntologyGraph {
    let nodes = vec![
        Node::new("1", "Sandwich", Position::new(400.0, 40.0)),
        Node::new("2", "Bread", Position::new(150.0, 200.0)),
        Node::new("3", "Filling", Position::new(400.0, 200.0)),
        Node::new("4", "Condiment", Position::new(650.0, 200.0)),
        Node::new("5", "Cheese", Position::new(250.0, 360.0)),
        Node::new("6", "Ham", Position::new(400.0, 360.0)),
        Node::new("7", "Lettuce", Position::new(550.0, 360.0)),
        Node::new("8", "Tomato", Position::new(700.0, 360.0)),
        Node::new("9", "Mayonnaise", Position::new(850.0, 360.0)),
    ];

    let edges = vec![
        Edge::new("e1", "5", "3", "subClassOf"),
        Edge::new("e2", "6", "3", "subClassOf"),
        Edge::new("e3", "7", "3", "subClassOf"),
        Edge::new("e4", "8", "3", "subClassOf"),
        Edge::new("e5", "9", "4", "subClassOf"),
        Edge::new("e6", "1", "2", "hasBase"),
        Edge::new("e7", "1", "3", "hasFilling"),
        Edge::new("e8", "1", "4", "hasCondiment"),
        Edge::new("e9", "6", "5", "pairsWith"),
        Edge::new("e10", "9", "2", "spreadOn"),
    ];

    OntologyGraph::new(nodes, edges).expect("sample graph is within limits")
}
