//! Huffman prefix codes built on a linked min-heap.
//!
//! The priority queue is a complete binary tree of arena nodes rather than
//! an array; level-order positions are found by walking the bits of the
//! position. [`HuffmanTree::build`] drains it with the usual two-minima
//! merge and [`HuffmanTree::codes`] reads the prefix code off the result.
//!
//! ```
//! use huffman_heap::{HuffmanTree, SingleSymbolCode};
//!
//! let tree = HuffmanTree::build(&['a', 'b', 'c'], &[5, 2, 1])?;
//! let table = tree.code_table(SingleSymbolCode::Empty);
//! assert_eq!(table[&'a'].len(), 1);
//! assert_eq!(tree.weighted_length(SingleSymbolCode::Empty), 11);
//! # Ok::<(), huffman_heap::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod heap;
pub mod huffman;
pub mod node;
pub mod symbol;

#[cfg(test)]
mod proptests;

pub use config::{Config, SingleSymbolCode};
pub use error::{Error, Result};
pub use heap::{Heap, locate};
pub use huffman::{
    CodeTable, HuffmanTree, PriorityQueue, QueueEntry, TreeBuilder, count_frequencies, entropy,
    huffman_codes,
};
pub use node::{Node, NodeArena, NodeId};
pub use symbol::Symbol;
