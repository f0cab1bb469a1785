//! Revocation status tree
//!
//! A sparse merkle tree whose leaves commit to the attestations an issuer
//! still stands behind. Revoking an entry clears its leaf, so the witness a
//! holder kept from before no longer verifies against the new root. The root
//! is what the issuer publishes as its revocation anchor.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use umbra_core::Digest;

use crate::hash::sha3_256_multi;

/// Deepest tree supported (about a million leaves)
pub const MAX_DEPTH: usize = 20;

const NODE_DOMAIN: &[u8] = b"umbra:node:";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("Tree depth {0} exceeds maximum of {MAX_DEPTH}")]
    DepthTooLarge(usize),

    #[error("Tree is full")]
    Full,

    #[error("No live leaf at index {0}")]
    EmptyLeaf(u64),
}

fn hash_node(left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
    sha3_256_multi(&[NODE_DOMAIN, left, right])
}

/// Inclusion witness for a live leaf
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusWitness {
    pub index: u64,
    pub leaf: [u8; 32],
    /// Sibling hashes from leaf level upwards
    pub siblings: Vec<[u8; 32]>,
}

impl StatusWitness {
    pub fn compute_root(&self) -> [u8; 32] {
        let mut current = self.leaf;
        let mut index = self.index;

        for sibling in &self.siblings {
            current = if index & 1 == 1 {
                hash_node(sibling, &current)
            } else {
                hash_node(&current, sibling)
            };
            index >>= 1;
        }

        current
    }

    /// True when this witness folds up to the anchored root
    pub fn verify(&self, anchored_root: &Digest) -> bool {
        anchored_root.as_bytes() == self.compute_root().as_slice()
    }
}

/// Sparse merkle tree of unrevoked attestation leaves
#[derive(Debug, Clone)]
pub struct RevocationTree {
    depth: usize,
    /// Non-default nodes keyed by (level, index)
    nodes: HashMap<(usize, u64), [u8; 32]>,
    /// Hash of an all-empty subtree at each level
    empty: Vec<[u8; 32]>,
    next_index: u64,
    live: u64,
}

impl RevocationTree {
    pub fn new(depth: usize) -> Result<Self, TreeError> {
        if depth > MAX_DEPTH {
            return Err(TreeError::DepthTooLarge(depth));
        }
        Ok(Self::build(depth))
    }

    fn build(depth: usize) -> Self {
        let mut empty = Vec::with_capacity(depth + 1);
        empty.push([0u8; 32]);
        for level in 0..depth {
            let below = empty[level];
            empty.push(hash_node(&below, &below));
        }

        Self {
            depth,
            nodes: HashMap::new(),
            empty,
            next_index: 0,
            live: 0,
        }
    }

    /// Build a tree from leaves in order
    pub fn from_leaves(
        depth: usize,
        leaves: impl IntoIterator<Item = [u8; 32]>,
    ) -> Result<Self, TreeError> {
        let mut tree = Self::new(depth)?;
        for leaf in leaves {
            tree.append(leaf)?;
        }
        Ok(tree)
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn root(&self) -> [u8; 32] {
        self.node(self.depth, 0)
    }

    /// Root as an anchorable digest
    pub fn root_digest(&self) -> Digest {
        Digest::from(self.root())
    }

    /// Append a leaf and return its index
    pub fn append(&mut self, leaf: [u8; 32]) -> Result<u64, TreeError> {
        if self.next_index >= 1u64 << self.depth {
            return Err(TreeError::Full);
        }
        let index = self.next_index;
        self.nodes.insert((0, index), leaf);
        self.rehash_from(index);
        self.next_index += 1;
        self.live += 1;
        Ok(index)
    }

    /// Clear the leaf at `index`, invalidating every witness issued for it
    pub fn revoke(&mut self, index: u64) -> Result<(), TreeError> {
        if self.nodes.remove(&(0, index)).is_none() {
            return Err(TreeError::EmptyLeaf(index));
        }
        self.rehash_from(index);
        self.live -= 1;
        Ok(())
    }

    pub fn witness(&self, index: u64) -> Result<StatusWitness, TreeError> {
        let leaf = *self
            .nodes
            .get(&(0, index))
            .ok_or(TreeError::EmptyLeaf(index))?;

        let mut siblings = Vec::with_capacity(self.depth);
        let mut current = index;
        for level in 0..self.depth {
            siblings.push(self.node(level, current ^ 1));
            current >>= 1;
        }

        Ok(StatusWitness {
            index,
            leaf,
            siblings,
        })
    }

    pub fn is_live(&self, index: u64) -> bool {
        self.nodes.contains_key(&(0, index))
    }

    /// Number of unrevoked leaves
    pub fn live_count(&self) -> u64 {
        self.live
    }

    fn node(&self, level: usize, index: u64) -> [u8; 32] {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or(self.empty[level])
    }

    fn rehash_from(&mut self, leaf_index: u64) {
        let mut index = leaf_index;

        for level in 0..self.depth {
            let (left, right) = if index & 1 == 0 {
                (self.node(level, index), self.node(level, index ^ 1))
            } else {
                (self.node(level, index ^ 1), self.node(level, index))
            };
            let parent = hash_node(&left, &right);
            index >>= 1;

            if parent == self.empty[level + 1] {
                self.nodes.remove(&(level + 1, index));
            } else {
                self.nodes.insert((level + 1, index), parent);
            }
        }
    }
}

impl Default for RevocationTree {
    fn default() -> Self {
        Self::build(MAX_DEPTH)
    }
}
