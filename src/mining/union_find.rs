//! Union-find with path compression and union by rank.
//!
//! Replaces an ad-hoc "merge two groups" conditional ladder with a
//! deterministic `O(alpha(n))` grouping step (spec §9 design note).

use std::collections::HashMap;

pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
    index_of: HashMap<String, usize>,
    labels: Vec<String>,
}

impl UnionFind {
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            rank: Vec::new(),
            index_of: HashMap::new(),
            labels: Vec::new(),
        }
    }

    fn index_for(&mut self, label: &str) -> usize {
        if let Some(&idx) = self.index_of.get(label) {
            return idx;
        }
        let idx = self.parent.len();
        self.parent.push(idx);
        self.rank.push(0);
        self.labels.push(label.to_string());
        self.index_of.insert(label.to_string(), idx);
        idx
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    /// Ensures `label` is a member of the structure, even with no union yet.
    pub fn make_set(&mut self, label: &str) {
        self.index_for(label);
    }

    pub fn union(&mut self, a: &str, b: &str) {
        let ia = self.index_for(a);
        let ib = self.index_for(b);
        let ra = self.find(ia);
        let rb = self.find(ib);
        if ra == rb {
            return;
        }
        if self.rank[ra] < self.rank[rb] {
            self.parent[ra] = rb;
        } else if self.rank[ra] > self.rank[rb] {
            self.parent[rb] = ra;
        } else {
            self.parent[rb] = ra;
            self.rank[ra] += 1;
        }
    }

    /// Returns every component with 2 or more members, as label sets.
    pub fn components(&mut self) -> Vec<Vec<String>> {
        let mut groups: HashMap<usize, Vec<String>> = HashMap::new();
        let indices: Vec<usize> = (0..self.parent.len()).collect();
        for idx in indices {
            let root = self.find(idx);
            groups.entry(root).or_default().push(self.labels[idx].clone());
        }
        groups.into_values().collect()
    }
}

impl Default for UnionFind {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unions_transitively() {
        let mut uf = UnionFind::new();
        uf.union("a", "b");
        uf.union("b", "c");
        uf.make_set("d");

        let mut components = uf.components();
        for group in &mut components {
            group.sort();
        }
        components.sort();

        assert_eq!(
            components,
            vec![vec!["a".to_string(), "b".to_string(), "c".to_string()], vec!["d".to_string()]]
        );
    }
}
