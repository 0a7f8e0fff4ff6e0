//! Value classes and congruence classes.
//!
//! Both structures partition the variable pool. Value classes group variables
//! known to carry the same runtime value (built from copy chains); congruence
//! classes group variables that will share one name after destruction. Value
//! classes are unordered; congruence classes keep their members sorted by
//! dominance-preorder definition position, which the interference test's
//! merged walk depends on.

use std::collections::HashMap;

use crate::analysis::{defuse::DefUseIndex, ssa::VarId};

/// A union-find partition of variables by runtime value.
///
/// Every variable starts in its own singleton class. Joining is directional
/// in spirit (a copy target joins its source's class) but the structure is a
/// plain disjoint-set union.
pub struct ValueClasses {
    parent: Vec<usize>,
    /// Members per representative; only valid for current roots.
    members: HashMap<usize, Vec<VarId>>,
}

impl ValueClasses {
    /// Creates singleton classes for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            parent: (0..num_vars).collect(),
            members: (0..num_vars).map(|i| (i, vec![VarId::new(i)])).collect(),
        }
    }

    fn find(&mut self, var: usize) -> usize {
        let mut root = var;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = var;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Merges `var`'s class into `into`'s class.
    pub fn join(&mut self, var: VarId, into: VarId) {
        let a = self.find(var.index());
        let b = self.find(into.index());
        if a == b {
            return;
        }
        self.parent[a] = b;
        let moved = self.members.remove(&a).unwrap_or_default();
        self.members.entry(b).or_default().extend(moved);
    }

    /// Returns `true` if `a` and `b` hold the same value.
    pub fn same(&mut self, a: VarId, b: VarId) -> bool {
        self.find(a.index()) == self.find(b.index())
    }

    /// Returns the members of `var`'s class, in join order.
    pub fn members(&mut self, var: VarId) -> &[VarId] {
        let root = self.find(var.index());
        self.members.get(&root).map_or(&[], Vec::as_slice)
    }
}

/// A union-find partition of variables into post-destruction name classes.
///
/// Class members are kept sorted by their dominance-preorder definition
/// position, so the head of a class is always its dominance-minimal member
/// and two classes can be walked in a single merged pass.
pub struct CongruenceClasses {
    parent: Vec<usize>,
    /// Members per representative, sorted by definition position.
    members: HashMap<usize, Vec<VarId>>,
}

impl CongruenceClasses {
    /// Creates singleton classes for `num_vars` variables.
    #[must_use]
    pub fn new(num_vars: usize) -> Self {
        Self {
            parent: (0..num_vars).collect(),
            members: (0..num_vars).map(|i| (i, vec![VarId::new(i)])).collect(),
        }
    }

    fn find(&mut self, var: usize) -> usize {
        let mut root = var;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut current = var;
        while self.parent[current] != root {
            let next = self.parent[current];
            self.parent[current] = root;
            current = next;
        }
        root
    }

    /// Returns `true` if `a` and `b` are congruent.
    pub fn same(&mut self, a: VarId, b: VarId) -> bool {
        self.find(a.index()) == self.find(b.index())
    }

    /// Returns `true` if `var`'s class has exactly one member.
    pub fn is_singleton(&mut self, var: VarId) -> bool {
        let root = self.find(var.index());
        self.members.get(&root).map_or(true, |m| m.len() == 1)
    }

    /// Merges the classes of `a` and `b`, keeping members sorted by the
    /// definition positions in `index`.
    pub fn union(&mut self, a: VarId, b: VarId, index: &DefUseIndex) {
        let ra = self.find(a.index());
        let rb = self.find(b.index());
        if ra == rb {
            return;
        }
        self.parent[rb] = ra;
        let left = self.members.remove(&ra).unwrap_or_default();
        let right = self.members.remove(&rb).unwrap_or_default();

        let mut merged = Vec::with_capacity(left.len() + right.len());
        let mut li = left.into_iter().peekable();
        let mut ri = right.into_iter().peekable();
        loop {
            match (li.peek(), ri.peek()) {
                (Some(&l), Some(&r)) => {
                    if index.pre_dom_order(l, r) {
                        merged.push(l);
                        li.next();
                    } else {
                        merged.push(r);
                        ri.next();
                    }
                }
                (Some(_), None) => {
                    merged.extend(li.by_ref());
                }
                (None, Some(_)) => {
                    merged.extend(ri.by_ref());
                }
                (None, None) => break,
            }
        }
        self.members.insert(ra, merged);
    }

    /// Returns the members of `var`'s class, sorted by definition position.
    pub fn members(&mut self, var: VarId) -> &[VarId] {
        let root = self.find(var.index());
        self.members.get(&root).map_or(&[], Vec::as_slice)
    }

    /// Returns the dominance-minimal member of `var`'s class.
    ///
    /// This is the representative every member is renamed to.
    pub fn first(&mut self, var: VarId) -> VarId {
        let root = self.find(var.index());
        self.members
            .get(&root)
            .and_then(|m| m.first().copied())
            .unwrap_or(var)
    }
}
