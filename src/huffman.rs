use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};

use log::{debug, trace};

use crate::config::{Config, SingleSymbolCode};
use crate::error::{Error, Result};
use crate::heap::Heap;
use crate::node::{NodeArena, NodeId};
use crate::symbol::Symbol;

pub type CodeTable = HashMap<char, String>;

/// A subtree waiting in the priority queue, keyed by its root's frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueEntry {
    freq: u64,
    node: NodeId,
}

impl QueueEntry {
    pub fn freq(&self) -> u64 {
        self.freq
    }

    pub fn node(&self) -> NodeId {
        self.node
    }
}

fn by_frequency(a: &QueueEntry, b: &QueueEntry) -> Ordering {
    a.freq.cmp(&b.freq)
}

pub type PriorityQueue = Heap<QueueEntry, fn(&QueueEntry, &QueueEntry) -> Ordering>;

/// Scratch state of a tree under construction. Dropping it releases
/// everything built so far.
pub struct TreeBuilder {
    nodes: NodeArena<Symbol>,
    queue: PriorityQueue,
}

impl TreeBuilder {
    /// Wraps every (code-point, frequency) pair in a leaf and queues it by
    /// ascending frequency.
    pub fn new(code_points: &[char], frequencies: &[u64], config: &Config) -> Result<Self> {
        validate(code_points, frequencies)?;

        let mut nodes = match config.node_limit {
            Some(limit) => NodeArena::with_limit(limit),
            None => NodeArena::new(),
        };
        let mut queue = PriorityQueue::new(by_frequency);
        for (&code_point, &freq) in code_points.iter().zip(frequencies) {
            let node = nodes.create(None, Symbol::new(code_point, freq))?;
            queue.insert(QueueEntry { freq, node })?;
        }
        debug!("Initial queue size: {}", queue.len());

        Ok(Self { nodes, queue })
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Merges the two lightest subtrees under a new internal node.
    ///
    /// The internal node is reserved before anything is extracted, so a
    /// failure leaves the builder as it was.
    pub fn merge_step(&mut self) -> Result<()> {
        if self.queue.len() < 2 {
            return Err(Error::NotEnoughNodes(self.queue.len()));
        }
        self.nodes.reserve(1)?;

        let first = self.queue.extract_min()?;
        let second = self.queue.extract_min()?;
        let freq = first.freq + second.freq;

        let parent = self.nodes.create(None, Symbol::internal(freq))?;
        self.nodes.set_left(parent, Some(first.node));
        self.nodes.set_right(parent, Some(second.node));
        self.nodes.set_parent(first.node, Some(parent));
        self.nodes.set_parent(second.node, Some(parent));
        trace!("Merged {} + {} into {}", first.freq, second.freq, freq);

        // reuses a queue slot freed by the extractions above
        self.queue.insert(QueueEntry { freq, node: parent })?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<HuffmanTree> {
        if self.queue.len() != 1 {
            return Err(Error::Unmerged(self.queue.len()));
        }
        let root = self.queue.extract_min()?.node;
        Ok(HuffmanTree {
            nodes: self.nodes,
            root,
        })
    }
}

fn validate(code_points: &[char], frequencies: &[u64]) -> Result<()> {
    if code_points.is_empty() {
        return Err(Error::invalid_argument("no symbols given"));
    }
    if code_points.len() != frequencies.len() {
        return Err(Error::invalid_argument(format!(
            "{} code points but {} frequencies",
            code_points.len(),
            frequencies.len()
        )));
    }
    let mut seen = HashSet::with_capacity(code_points.len());
    if let Some(c) = code_points.iter().find(|&&c| !seen.insert(c)) {
        return Err(Error::invalid_argument(format!(
            "code point '{}' given twice",
            c.escape_default()
        )));
    }
    // every merged frequency is bounded by the total
    frequencies
        .iter()
        .try_fold(0u64, |acc, &f| acc.checked_add(f))
        .ok_or_else(|| Error::invalid_argument("total frequency overflows u64"))?;
    Ok(())
}

/// A finished Huffman tree: leaves carry input symbols, internal nodes
/// carry the sentinel.
#[derive(Debug)]
pub struct HuffmanTree {
    nodes: NodeArena<Symbol>,
    root: NodeId,
}

impl HuffmanTree {
    pub fn build(code_points: &[char], frequencies: &[u64]) -> Result<Self> {
        Self::build_with(code_points, frequencies, &Config::default())
    }

    pub fn build_with(code_points: &[char], frequencies: &[u64], config: &Config) -> Result<Self> {
        debug!(
            "Building Huffman tree from {} unique symbols",
            code_points.len()
        );
        let mut builder = TreeBuilder::new(code_points, frequencies, config)?;
        while builder.len() > 1 {
            builder.merge_step()?;
        }
        let tree = builder.finish()?;
        debug!("Tree construction complete, {} nodes", tree.len());
        Ok(tree)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, leaves and internal.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn symbol(&self, id: NodeId) -> Option<&Symbol> {
        self.nodes.payload(id)
    }

    pub fn left(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.left()
    }

    pub fn right(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.right()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent()
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes.get(id).is_some_and(|n| n.is_leaf())
    }

    /// Code for every literal leaf, in left-before-right depth-first order.
    pub fn codes(&self, single_symbol: SingleSymbolCode) -> Vec<(char, String)> {
        self.leaf_codes(single_symbol)
            .into_iter()
            .filter_map(|(symbol, code)| symbol.code_point().map(|c| (c, code)))
            .collect()
    }

    pub fn code_table(&self, single_symbol: SingleSymbolCode) -> CodeTable {
        self.codes(single_symbol).into_iter().collect()
    }

    /// Total encoded size in bits: sum of frequency times code length.
    ///
    /// Only the total frequency is bounded by `u64`; multiplied by code
    /// lengths it can exceed it, hence the wider result.
    pub fn weighted_length(&self, single_symbol: SingleSymbolCode) -> u128 {
        self.leaf_codes(single_symbol)
            .iter()
            .map(|(symbol, code)| u128::from(symbol.freq()) * code.len() as u128)
            .sum()
    }

    fn leaf_codes(&self, single_symbol: SingleSymbolCode) -> Vec<(Symbol, String)> {
        let mut out = Vec::new();
        let mut stack = vec![(self.root, String::new())];

        while let Some((id, code)) = stack.pop() {
            let Some(node) = self.nodes.get(id) else {
                continue;
            };
            if node.is_leaf() {
                let symbol = *node.payload();
                if symbol.is_internal() {
                    continue;
                }
                let code = if code.is_empty() && single_symbol == SingleSymbolCode::SingleBit {
                    String::from("0")
                } else {
                    code
                };
                trace!("Assigning code to {} : '{}'", symbol, code);
                out.push((symbol, code));
                continue;
            }
            if let Some(right) = node.right() {
                stack.push((right, format!("{code}1")));
            }
            if let Some(left) = node.left() {
                stack.push((left, format!("{code}0")));
            }
        }
        out
    }

    /// Tears the tree down bottom-up, left subtree first, handing every
    /// symbol to `destructor`. Returns the number of nodes released.
    pub fn destroy_with<F>(mut self, destructor: F) -> usize
    where
        F: FnMut(Symbol),
    {
        self.nodes.destroy_with(Some(self.root), destructor)
    }
}

/// Builds the tree, reads the codes off it and tears it down.
pub fn huffman_codes(
    code_points: &[char],
    frequencies: &[u64],
    config: &Config,
) -> Result<Vec<(char, String)>> {
    let tree = HuffmanTree::build_with(code_points, frequencies, config)?;
    let codes = tree.codes(config.single_symbol);
    tree.destroy_with(drop);
    Ok(codes)
}

/// Per-character counts in ascending code-point order.
pub fn count_frequencies(text: &str) -> (Vec<char>, Vec<u64>) {
    let mut counts: BTreeMap<char, u64> = BTreeMap::new();
    for c in text.chars() {
        *counts.entry(c).or_insert(0) += 1;
    }
    counts.into_iter().unzip()
}

/// Shannon entropy in bits per symbol.
pub fn entropy(frequencies: &[u64]) -> f64 {
    let total: u64 = frequencies.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total_f = total as f64;

    let entropy: f64 = frequencies
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / total_f;
            -p * p.log2()
        })
        .sum();

    debug!(
        "Calculated entropy: {:.4} bits/symbol (Total samples: {})",
        entropy, total
    );
    entropy
}
