// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binary trees over fixed-size node data.
//!
//! One arena-backed tree type serves two roles: seed trees (a root seed
//! expands to per-round and per-party seeds, with subtrees revealable
//! while hiding chosen leaves) and the Merkle tree over the per-round
//! view commitments (buildable from leaves, openable for a set of
//! missing leaves).
//!
//! Nodes are stored in a flat arena in heap order (children of node `i`
//! at `2i + 1` and `2i + 2`), with the `numLeaves` leaves occupying the
//! tail of the arena. Trees whose leaf count is not a power of two drop
//! the unused tail slots of the last level, which leaves a few
//! non-existent interior slots tracked by the `exists` map.

use crate::bits::ceil_log2;
use crate::error::{Error, Result};
use crate::hashing::HashCtx;
use crate::params::{PicnicParameter, HASH_PREFIX_1, HASH_PREFIX_3, SALT_SIZE};

pub(crate) struct Tree {
    depth: usize,
    num_nodes: usize,
    num_leaves: usize,
    data_size: usize,
    nodes: Vec<u8>,
    have_node: Vec<bool>,
    exists: Vec<bool>,
}

#[inline]
fn is_left_child(node: usize) -> bool {
    node % 2 == 1
}

#[inline]
fn parent(node: usize) -> usize {
    debug_assert!(node != 0);
    (node - 1) / 2
}

impl Tree {
    pub(crate) fn new(num_leaves: usize, data_size: usize) -> Self {
        let depth = ceil_log2(num_leaves) as usize + 1;
        let num_nodes = ((1 << depth) - 1) - ((1 << (depth - 1)) - num_leaves);

        let mut exists = vec![false; num_nodes];
        for slot in exists.iter_mut().skip(num_nodes - num_leaves) {
            *slot = true;
        }
        for i in (1..num_nodes - num_leaves).rev() {
            let left = 2 * i + 1 < num_nodes && exists[2 * i + 1];
            let right = 2 * i + 2 < num_nodes && exists[2 * i + 2];
            exists[i] = left || right;
        }
        if num_nodes > 0 {
            exists[0] = true;
        }

        Self {
            depth,
            num_nodes,
            num_leaves,
            data_size,
            nodes: vec![0u8; num_nodes * data_size],
            have_node: vec![false; num_nodes],
            exists,
        }
    }

    #[inline]
    fn exists(&self, node: usize) -> bool {
        node < self.num_nodes && self.exists[node]
    }

    #[inline]
    fn is_leaf(&self, node: usize) -> bool {
        2 * node + 1 >= self.num_nodes
    }

    #[inline]
    fn has_right_child(&self, node: usize) -> bool {
        self.exists(2 * node + 2)
    }

    fn sibling(&self, node: usize) -> usize {
        if is_left_child(node) {
            node + 1
        } else {
            node - 1
        }
    }

    fn has_sibling(&self, node: usize) -> bool {
        if !self.exists(node) {
            return false;
        }
        !(is_left_child(node) && !self.exists(node + 1))
    }

    fn node(&self, i: usize) -> &[u8] {
        &self.nodes[i * self.data_size..(i + 1) * self.data_size]
    }

    fn node_mut(&mut self, i: usize) -> &mut [u8] {
        &mut self.nodes[i * self.data_size..(i + 1) * self.data_size]
    }

    /// The root node's data.
    pub(crate) fn root(&self) -> &[u8] {
        self.node(0)
    }

    /// Data of leaf `i`.
    pub(crate) fn leaf(&self, i: usize) -> &[u8] {
        self.node(self.num_nodes - self.num_leaves + i)
    }

    /// All leaves, contiguous in leaf order.
    pub(crate) fn leaves(&self) -> &[u8] {
        &self.nodes[(self.num_nodes - self.num_leaves) * self.data_size..]
    }

    // ------------------------------------------------------------------
    // Seed tree operations
    // ------------------------------------------------------------------

    /// Expand `root_seed` into a tree with `num_leaves` leaf seeds.
    pub(crate) fn generate_seeds<P: PicnicParameter>(
        num_leaves: usize,
        root_seed: &[u8],
        salt: &[u8; SALT_SIZE],
        rep_index: u16,
    ) -> Self {
        let mut tree = Self::new(num_leaves, P::SEED_SIZE);
        tree.node_mut(0).copy_from_slice(root_seed);
        tree.have_node[0] = true;
        tree.expand_seeds::<P>(salt, rep_index);
        tree
    }

    /// Derive children for every present node, top down.
    fn expand_seeds<P: PicnicParameter>(&mut self, salt: &[u8; SALT_SIZE], rep_index: u16) {
        let seed_size = self.data_size;
        let mut expanded = vec![0u8; 2 * seed_size];
        let last_non_leaf = parent(self.num_nodes - 1);

        for i in 0..=last_non_leaf {
            if !self.have_node[i] {
                continue;
            }
            let mut ctx = HashCtx::new_prefixed(P::DIGEST_SIZE, HASH_PREFIX_1);
            ctx.update(self.node(i));
            ctx.update(salt);
            ctx.update_u16_le(rep_index);
            ctx.update_u16_le(i as u16);
            ctx.finalize().squeeze(&mut expanded);

            let left = 2 * i + 1;
            if !self.have_node[left] {
                self.node_mut(left).copy_from_slice(&expanded[..seed_size]);
                self.have_node[left] = true;
            }
            let right = 2 * i + 2;
            if self.exists(right) && !self.have_node[right] {
                self.node_mut(right).copy_from_slice(&expanded[seed_size..]);
                self.have_node[right] = true;
            }
        }
    }

    /// Nodes whose data must be published so every leaf except those in
    /// `hide_list` can be recomputed.
    fn revealed_nodes(&self, hide_list: &[u16]) -> Vec<usize> {
        let path_len = self.depth - 1;
        let first_leaf = self.num_nodes - self.num_leaves;

        // Paths from each hidden leaf up to the root, level by level.
        let mut path_sets = vec![vec![0usize; hide_list.len()]; path_len];
        for (i, &leaf) in hide_list.iter().enumerate() {
            let mut node = first_leaf + leaf as usize;
            path_sets[0][i] = node;
            for level in path_sets.iter_mut().skip(1) {
                node = parent(node);
                level[i] = node;
            }
        }

        let mut revealed = Vec::new();
        for level in &path_sets {
            for &node in level {
                if !self.has_sibling(node) {
                    continue;
                }
                let mut sibling = self.sibling(node);
                if !level.contains(&sibling) {
                    // Descend past interior slots that have no right child.
                    while !self.has_right_child(sibling) && !self.is_leaf(sibling) {
                        sibling = 2 * sibling + 1;
                    }
                    if !revealed.contains(&sibling) {
                        revealed.push(sibling);
                    }
                }
            }
        }
        revealed
    }

    /// Serialized seed data covering all leaves except those in `hide_list`.
    pub(crate) fn reveal_seeds(&self, hide_list: &[u16]) -> Vec<u8> {
        let revealed = self.revealed_nodes(hide_list);
        let mut out = Vec::with_capacity(revealed.len() * self.data_size);
        for node in revealed {
            out.extend_from_slice(self.node(node));
        }
        out
    }

    /// Byte length [`Tree::reveal_seeds`] produces for this shape.
    pub(crate) fn reveal_seeds_size<P: PicnicParameter>(
        num_leaves: usize,
        hide_list: &[u16],
    ) -> usize {
        let tree = Self::new(num_leaves, P::SEED_SIZE);
        tree.revealed_nodes(hide_list).len() * P::SEED_SIZE
    }

    /// Install revealed seed data and re-expand every derivable seed.
    pub(crate) fn reconstruct_seeds<P: PicnicParameter>(
        &mut self,
        hide_list: &[u16],
        seed_info: &[u8],
        salt: &[u8; SALT_SIZE],
        rep_index: u16,
    ) -> Result<()> {
        let revealed = self.revealed_nodes(hide_list);
        if seed_info.len() != revealed.len() * self.data_size {
            return Err(Error::SeedReconstruct);
        }
        let data_size = self.data_size;
        for (i, node) in revealed.into_iter().enumerate() {
            self.node_mut(node)
                .copy_from_slice(&seed_info[i * data_size..(i + 1) * data_size]);
            self.have_node[node] = true;
        }
        self.expand_seeds::<P>(salt, rep_index);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Merkle tree operations
    // ------------------------------------------------------------------

    fn compute_parent_hash<P: PicnicParameter>(&mut self, child: usize, salt: &[u8; SALT_SIZE]) {
        if !self.exists(child) {
            return;
        }
        let parent = parent(child);
        if self.have_node[parent] {
            return;
        }
        // Both children must be present before the parent can be hashed.
        if !self.have_node[2 * parent + 1] {
            return;
        }
        if self.exists(2 * parent + 2) && !self.have_node[2 * parent + 2] {
            return;
        }

        let mut ctx = HashCtx::new_prefixed(P::DIGEST_SIZE, HASH_PREFIX_3);
        ctx.update(self.node(2 * parent + 1));
        if self.has_right_child(parent) {
            ctx.update(self.node(2 * parent + 2));
        }
        ctx.update(salt);
        ctx.update_u16_le(parent as u16);
        let mut digest = vec![0u8; P::DIGEST_SIZE];
        ctx.finalize().squeeze(&mut digest);
        self.node_mut(parent).copy_from_slice(&digest);
        self.have_node[parent] = true;
    }

    /// Build the full tree from `leaf_data` digests.
    pub(crate) fn build_merkle_tree<P: PicnicParameter>(
        &mut self,
        leaf_data: &[Vec<u8>],
        salt: &[u8; SALT_SIZE],
    ) {
        debug_assert_eq!(leaf_data.len(), self.num_leaves);
        let first_leaf = self.num_nodes - self.num_leaves;
        for (i, data) in leaf_data.iter().enumerate() {
            self.node_mut(first_leaf + i).copy_from_slice(data);
            self.have_node[first_leaf + i] = true;
        }
        for child in (1..self.num_nodes).rev() {
            self.compute_parent_hash::<P>(child, salt);
        }
    }

    /// For each missing leaf, the highest all-missing ancestor on its path.
    fn revealed_merkle_nodes(&self, missing_leaves: &[u16]) -> Vec<usize> {
        let first_leaf = self.num_nodes - self.num_leaves;
        let mut missing = vec![false; self.num_nodes];
        for &leaf in missing_leaves {
            missing[first_leaf + leaf as usize] = true;
        }

        // An interior node is missing when every child that exists is missing.
        let last_non_leaf = parent(self.num_nodes - 1);
        for i in (1..=last_non_leaf).rev() {
            if !self.exists(i) {
                continue;
            }
            if self.exists(2 * i + 2) {
                missing[i] = missing[2 * i + 1] && missing[2 * i + 2];
            } else {
                missing[i] = missing[2 * i + 1];
            }
        }

        let mut revealed = Vec::new();
        for &leaf in missing_leaves {
            let mut node = first_leaf + leaf as usize;
            while node != 0 {
                if !missing[parent(node)] {
                    if !revealed.contains(&node) {
                        revealed.push(node);
                    }
                    break;
                }
                node = parent(node);
            }
        }
        revealed
    }

    /// Serialized node digests a verifier needs to fill in the leaves it
    /// is missing.
    pub(crate) fn open_merkle_tree(&self, missing_leaves: &[u16]) -> Vec<u8> {
        let revealed = self.revealed_merkle_nodes(missing_leaves);
        let mut out = Vec::with_capacity(revealed.len() * self.data_size);
        for node in revealed {
            out.extend_from_slice(self.node(node));
        }
        out
    }

    /// Byte length [`Tree::open_merkle_tree`] produces for this shape.
    pub(crate) fn open_merkle_tree_size<P: PicnicParameter>(
        num_leaves: usize,
        missing_leaves: &[u16],
    ) -> usize {
        let tree = Self::new(num_leaves, P::DIGEST_SIZE);
        tree.revealed_merkle_nodes(missing_leaves).len() * P::DIGEST_SIZE
    }

    /// Install opened node digests received in a signature.
    pub(crate) fn add_merkle_nodes(&mut self, missing_leaves: &[u16], info: &[u8]) -> Result<()> {
        let revealed = self.revealed_merkle_nodes(missing_leaves);
        debug_assert!(!revealed.contains(&0));
        if info.len() != revealed.len() * self.data_size {
            return Err(Error::MerkleVerify);
        }
        let data_size = self.data_size;
        for (i, node) in revealed.into_iter().enumerate() {
            self.node_mut(node)
                .copy_from_slice(&info[i * data_size..(i + 1) * data_size]);
            self.have_node[node] = true;
        }
        Ok(())
    }

    /// Fill in the known leaves and recompute every derivable node; fails
    /// unless the root becomes computable.
    pub(crate) fn verify_merkle_tree<P: PicnicParameter>(
        &mut self,
        leaf_data: &[Option<Vec<u8>>],
        salt: &[u8; SALT_SIZE],
    ) -> Result<()> {
        debug_assert_eq!(leaf_data.len(), self.num_leaves);
        let first_leaf = self.num_nodes - self.num_leaves;
        for (i, data) in leaf_data.iter().enumerate() {
            if let Some(data) = data {
                // A leaf we can compute must not also come from the signature.
                if self.have_node[first_leaf + i] {
                    return Err(Error::MerkleVerify);
                }
                self.node_mut(first_leaf + i).copy_from_slice(data);
                self.have_node[first_leaf + i] = true;
            }
        }
        for child in (1..self.num_nodes).rev() {
            self.compute_parent_hash::<P>(child, salt);
        }
        if !self.have_node[0] {
            return Err(Error::MerkleVerify);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::Picnic3L1;

    type P = Picnic3L1;
    const SALT: [u8; SALT_SIZE] = [7u8; SALT_SIZE];

    fn digest_leaves(count: usize) -> Vec<Vec<u8>> {
        (0..count)
            .map(|i| {
                let mut d = vec![0u8; P::DIGEST_SIZE];
                d[0] = i as u8;
                d[1] = (i >> 8) as u8;
                d
            })
            .collect()
    }

    #[test]
    fn seed_reveal_hides_exactly_the_hidden_leaves() {
        let root = [3u8; 16];
        let tree = Tree::generate_seeds::<P>(16, &root, &SALT, 5);
        let hide = [4u16, 11];

        let info = tree.reveal_seeds(&hide);
        assert_eq!(
            info.len(),
            Tree::reveal_seeds_size::<P>(16, &hide),
        );

        let mut rebuilt = Tree::new(16, P::SEED_SIZE);
        rebuilt
            .reconstruct_seeds::<P>(&hide, &info, &SALT, 5)
            .unwrap();

        for i in 0..16u16 {
            if hide.contains(&i) {
                assert_eq!(rebuilt.leaf(i as usize), vec![0u8; P::SEED_SIZE]);
            } else {
                assert_eq!(rebuilt.leaf(i as usize), tree.leaf(i as usize));
            }
        }
    }

    #[test]
    fn seed_reveal_works_for_non_power_of_two_trees() {
        let root = [9u8; 16];
        let tree = Tree::generate_seeds::<P>(250, &root, &SALT, 0);
        let hide = [0u16, 1, 100, 249];

        let info = tree.reveal_seeds(&hide);
        let mut rebuilt = Tree::new(250, P::SEED_SIZE);
        rebuilt
            .reconstruct_seeds::<P>(&hide, &info, &SALT, 0)
            .unwrap();

        for i in 0..250u16 {
            if hide.contains(&i) {
                assert_eq!(rebuilt.leaf(i as usize), vec![0u8; P::SEED_SIZE]);
            } else {
                assert_eq!(rebuilt.leaf(i as usize), tree.leaf(i as usize));
            }
        }
    }

    #[test]
    fn reconstruct_rejects_short_input() {
        let mut tree = Tree::new(16, P::SEED_SIZE);
        let err = tree
            .reconstruct_seeds::<P>(&[3], &[0u8; 5], &SALT, 0)
            .unwrap_err();
        assert!(matches!(err, Error::SeedReconstruct));
    }

    #[test]
    fn merkle_open_and_verify_round_trip() {
        let leaves = digest_leaves(250);
        let mut tree = Tree::new(250, P::DIGEST_SIZE);
        tree.build_merkle_tree::<P>(&leaves, &SALT);
        let root = tree.root().to_vec();

        let missing: Vec<u16> = (0..250u16).filter(|t| t % 3 == 0).collect();
        let info = tree.open_merkle_tree(&missing);
        assert_eq!(
            info.len(),
            Tree::open_merkle_tree_size::<P>(250, &missing),
        );

        let mut rebuilt = Tree::new(250, P::DIGEST_SIZE);
        rebuilt.add_merkle_nodes(&missing, &info).unwrap();
        let partial: Vec<Option<Vec<u8>>> = (0..250u16)
            .map(|t| {
                if missing.contains(&t) {
                    None
                } else {
                    Some(leaves[t as usize].clone())
                }
            })
            .collect();
        rebuilt.verify_merkle_tree::<P>(&partial, &SALT).unwrap();
        assert_eq!(rebuilt.root(), root.as_slice());
    }

    #[test]
    fn merkle_verify_detects_tampered_leaf() {
        let leaves = digest_leaves(64);
        let mut tree = Tree::new(64, P::DIGEST_SIZE);
        tree.build_merkle_tree::<P>(&leaves, &SALT);
        let root = tree.root().to_vec();

        let missing = [5u16];
        let info = tree.open_merkle_tree(&missing);

        let mut rebuilt = Tree::new(64, P::DIGEST_SIZE);
        rebuilt.add_merkle_nodes(&missing, &info).unwrap();
        let mut partial: Vec<Option<Vec<u8>>> = leaves.iter().cloned().map(Some).collect();
        partial[5] = None;
        partial[20].as_mut().unwrap()[0] ^= 1;
        rebuilt.verify_merkle_tree::<P>(&partial, &SALT).unwrap();
        assert_ne!(rebuilt.root(), root.as_slice());
    }

    #[test]
    fn add_merkle_nodes_rejects_wrong_length() {
        let mut tree = Tree::new(64, P::DIGEST_SIZE);
        let err = tree.add_merkle_nodes(&[5], &[0u8; 1]).unwrap_err();
        assert!(matches!(err, Error::MerkleVerify));
    }
}
