//! Operation graph arena.

use std::fmt;

use crate::operand::{Node, Operand};
use crate::types::OperandType;

/// Most nodes a graph holds. Handles are 32-bit indices.
pub const MAX_NODES: usize = u32::MAX as usize;

fn handle(index: usize) -> Operand {
    debug_assert!(index < MAX_NODES, "graph exceeds {MAX_NODES} nodes");
    Operand::new(u32::try_from(index).unwrap_or(u32::MAX))
}

/// Append-only arena of nodes in program order.
///
/// A node may only reference nodes appended before it, so the arena order
/// is also a valid evaluation order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Append a node and return its handle.
    ///
    /// Graphs are limited to [`MAX_NODES`] nodes. Debug builds assert on
    /// overflow; release builds hand out `u32::MAX` for every node past it.
    pub fn push(&mut self, node: Node) -> Operand {
        let operand = handle(self.nodes.len());
        self.nodes.push(node);
        operand
    }

    /// Look up a node.
    #[must_use]
    pub fn node(&self, operand: Operand) -> Option<&Node> {
        self.nodes.get(operand.index())
    }

    /// Result type of a node.
    #[must_use]
    pub fn ty(&self, operand: Operand) -> Option<OperandType> {
        self.node(operand).and_then(|node| node.ty)
    }

    /// Get number of nodes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if graph is empty.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over nodes with their handles.
    pub fn iter(&self) -> impl Iterator<Item = (Operand, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (handle(idx), node))
    }

    /// All nodes in program order.
    #[must_use]
    pub const fn nodes(&self) -> &[Node] {
        self.nodes.as_slice()
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (operand, node) in self.iter() {
            match node.ty {
                Some(ty) => write!(f, "{operand}:{ty} = {}", node.opcode)?,
                None => write!(f, "{}", node.opcode)?,
            }
            for (i, arg) in node.args.iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{sep}{arg}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
