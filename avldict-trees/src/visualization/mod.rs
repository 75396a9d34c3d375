//! Graphviz DOT rendering of a tree, for inspection.

use std::fs;
use std::path::Path;

use anyhow::Context;
use graphviz_rust::dot_structures;
use graphviz_rust::dot_structures::{Edge, GraphAttributes};
use graphviz_rust::printer::{DotPrinter, PrinterContext};
use uuid::Uuid;

/// A directed graph with one node per tree entry.
pub struct TreeGraph {
    /// The DOT statements drawn so far.
    pub graph: dot_structures::Graph,
    nodes: usize,
}

impl TreeGraph {
    /// An empty graph captioned with `label`.
    pub fn new(label: String) -> TreeGraph {
        let mut g = TreeGraph {
            graph: dot_structures::Graph::DiGraph {
                id: dot_structures::Id::Anonymous(String::from("tree")),
                strict: false,
                stmts: vec![],
            },
            nodes: 0,
        };
        g.graph.add_stmt(dot_structures::Stmt::GAttribute(
            GraphAttributes::Graph(vec![
                dot_structures::Attribute(
                    dot_structures::Id::Plain(String::from("ordering")),
                    dot_structures::Id::Plain(String::from("out")),
                ),
                dot_structures::Attribute(
                    dot_structures::Id::Plain(String::from("label")),
                    dot_structures::Id::Escaped(format!("\"{}\"", label)),
                ),
            ])
        ));
        g
    }

    /// Adds a node with `label` and returns its id.
    pub fn new_node(&mut self, label: String) -> dot_structures::NodeId {
        let id = dot_structures::NodeId(dot_structures::Id::Plain(format!("\"{:?}\"", Uuid::new_v4())), None);
        self.graph.add_stmt(dot_structures::Stmt::Node(
            dot_structures::Node::new(id.clone(), vec![
                dot_structures::Attribute(
                    dot_structures::Id::Plain(String::from("label")),
                    dot_structures::Id::Html(format!("{:?}", label)))
            ]),
        ));
        self.nodes += 1;
        id
    }

    /// Adds an edge between two drawn nodes.
    pub fn draw_edge(&mut self, from: &dot_structures::NodeId, to: &dot_structures::NodeId) {
        self.graph.add_stmt(dot_structures::Stmt::Edge(
            Edge {
                ty: dot_structures::EdgeTy::Pair(dot_structures::Vertex::N(from.clone()), dot_structures::Vertex::N(to.clone())),
                attributes: vec![],
            }
        ));
    }

    /// Number of tree entries drawn.
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Renders the graph as DOT source.
    pub fn to_dot(&self) -> String {
        let mut ctx = PrinterContext::default();
        self.graph.print(&mut ctx)
    }

    /// Writes the DOT source to `path`, replacing any existing file.
    pub fn save_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_dot())
            .with_context(|| format!("unable to write graph to {}", path.display()))
    }
}
