//! Search state of the VF2 matcher.
//!
//! Each side (pattern and target) keeps its half of the partial mapping plus
//! the two terminal sets: unmapped nodes reachable over one outgoing edge
//! from the mapping (`out`) and unmapped nodes with an edge into the mapping
//! (`ins`). Terminal membership is stamped with the depth at which the node
//! entered the set, so popping a pair clears exactly the stamps its push
//! created.

mod feasibility;

use crate::graph::{Graph, NodeId, NodeIdx};
use crate::mapping::Mapping;
use crate::pattern::Pattern;

/// Half of the VF2 state, for one graph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SideState {
    /// Node on this side -> node on the other side.
    core: Vec<Option<NodeIdx>>,
    /// Depth at which the node entered the out-terminal set, 0 if never.
    out: Vec<usize>,
    /// Depth at which the node entered the in-terminal set, 0 if never.
    ins: Vec<usize>,
    /// Unmapped nodes with a nonzero `out` stamp.
    out_len: usize,
    /// Unmapped nodes with a nonzero `ins` stamp.
    ins_len: usize,
}

impl SideState {
    fn new(node_count: usize) -> Self {
        Self {
            core: vec![None; node_count],
            out: vec![0; node_count],
            ins: vec![0; node_count],
            out_len: 0,
            ins_len: 0,
        }
    }

    pub(crate) fn core(&self, idx: NodeIdx) -> Option<NodeIdx> {
        self.core[idx.as_usize()]
    }

    pub(crate) fn is_mapped(&self, idx: NodeIdx) -> bool {
        self.core(idx).is_some()
    }

    pub(crate) fn in_out_terminal(&self, idx: NodeIdx) -> bool {
        self.out[idx.as_usize()] != 0 && !self.is_mapped(idx)
    }

    pub(crate) fn in_in_terminal(&self, idx: NodeIdx) -> bool {
        self.ins[idx.as_usize()] != 0 && !self.is_mapped(idx)
    }

    pub(crate) const fn out_len(&self) -> usize {
        self.out_len
    }

    pub(crate) const fn ins_len(&self) -> usize {
        self.ins_len
    }

    fn push<G: NodeId>(&mut self, graph: &Graph<G>, from: NodeIdx, to: NodeIdx, depth: usize) {
        let f = from.as_usize();
        self.core[f] = Some(to);
        if self.out[f] != 0 {
            self.out_len -= 1;
        }
        if self.ins[f] != 0 {
            self.ins_len -= 1;
        }

        for &s in graph.succ(from) {
            let i = s.as_usize();
            if self.out[i] == 0 {
                self.out[i] = depth;
                if self.core[i].is_none() {
                    self.out_len += 1;
                }
            }
        }
        for &q in graph.pred(from) {
            let i = q.as_usize();
            if self.ins[i] == 0 {
                self.ins[i] = depth;
                if self.core[i].is_none() {
                    self.ins_len += 1;
                }
            }
        }
    }

    fn pop<G: NodeId>(&mut self, graph: &Graph<G>, from: NodeIdx, depth: usize) {
        // `from` is still mapped here, so a self-loop stamp is not counted.
        for &s in graph.succ(from) {
            let i = s.as_usize();
            if self.out[i] == depth {
                self.out[i] = 0;
                if self.core[i].is_none() {
                    self.out_len -= 1;
                }
            }
        }
        for &q in graph.pred(from) {
            let i = q.as_usize();
            if self.ins[i] == depth {
                self.ins[i] = 0;
                if self.core[i].is_none() {
                    self.ins_len -= 1;
                }
            }
        }

        let f = from.as_usize();
        self.core[f] = None;
        if self.out[f] != 0 {
            self.out_len += 1;
        }
        if self.ins[f] != 0 {
            self.ins_len += 1;
        }
    }

    /// Least out-terminal node at or after `start`.
    pub(crate) fn next_out(&self, start: usize) -> Option<NodeIdx> {
        (start..self.core.len())
            .find(|&i| self.out[i] != 0 && self.core[i].is_none())
            .map(NodeIdx::from)
    }

    /// Least in-terminal node at or after `start`.
    pub(crate) fn next_in(&self, start: usize) -> Option<NodeIdx> {
        (start..self.core.len())
            .find(|&i| self.ins[i] != 0 && self.core[i].is_none())
            .map(NodeIdx::from)
    }

    /// Least unmapped node at or after `start`.
    pub(crate) fn next_rest(&self, start: usize) -> Option<NodeIdx> {
        (start..self.core.len())
            .find(|&i| self.core[i].is_none())
            .map(NodeIdx::from)
    }
}

/// Paired VF2 state over a pattern and a target graph.
pub(crate) struct State<'a, P, N> {
    pattern: &'a Pattern<P>,
    target: &'a Graph<N>,
    /// Pattern node -> target node (`core_fwd`).
    fwd: SideState,
    /// Target node -> pattern node (`core_rev`).
    rev: SideState,
    depth: usize,
}

impl<'a, P: NodeId, N: NodeId> State<'a, P, N> {
    pub(crate) fn new(pattern: &'a Pattern<P>, target: &'a Graph<N>) -> Self {
        Self {
            pattern,
            target,
            fwd: SideState::new(pattern.node_count()),
            rev: SideState::new(target.node_count()),
            depth: 0,
        }
    }

    pub(crate) const fn pattern(&self) -> &'a Pattern<P> {
        self.pattern
    }

    pub(crate) const fn target(&self) -> &'a Graph<N> {
        self.target
    }

    pub(crate) const fn fwd(&self) -> &SideState {
        &self.fwd
    }

    pub(crate) const fn rev(&self) -> &SideState {
        &self.rev
    }

    /// Number of mapped pairs.
    pub(crate) const fn depth(&self) -> usize {
        self.depth
    }

    pub(crate) fn is_pattern_mapped(&self, p: NodeIdx) -> bool {
        self.fwd.is_mapped(p)
    }

    pub(crate) fn is_target_used(&self, t: NodeIdx) -> bool {
        self.rev.is_mapped(t)
    }

    /// Every pattern node has an image.
    pub(crate) fn is_complete(&self) -> bool {
        self.depth == self.pattern.node_count()
    }

    /// Extend the mapping with `p -> t`.
    #[contracts::debug_requires(!self.is_pattern_mapped(p))]
    #[contracts::debug_requires(!self.is_target_used(t))]
    #[contracts::debug_ensures(self.is_pattern_mapped(p) && self.is_target_used(t))]
    pub(crate) fn push(&mut self, p: NodeIdx, t: NodeIdx) {
        self.depth += 1;
        self.fwd.push(self.pattern.graph(), p, t, self.depth);
        self.rev.push(self.target, t, p, self.depth);
    }

    /// Undo the most recent `push(p, t)`.
    #[contracts::debug_requires(self.fwd.core(p) == Some(t) && self.rev.core(t) == Some(p))]
    #[contracts::debug_ensures(!self.is_pattern_mapped(p) && !self.is_target_used(t))]
    pub(crate) fn pop(&mut self, p: NodeIdx, t: NodeIdx) {
        self.rev.pop(self.target, t, self.depth);
        self.fwd.pop(self.pattern.graph(), p, self.depth);
        self.depth -= 1;
    }

    /// Every pattern terminal node needs a distinct target terminal node.
    pub(crate) fn terminal_sizes_fit(&self) -> bool {
        self.fwd.out_len() <= self.rev.out_len() && self.fwd.ins_len() <= self.rev.ins_len()
    }

    /// Snapshot the complete mapping, keyed by caller ids.
    #[contracts::debug_requires(self.is_complete())]
    pub(crate) fn to_mapping(&self) -> Mapping<P, N> {
        let graph = self.pattern.graph();
        let pairs = (0..self.pattern.node_count())
            .map(NodeIdx::from)
            .filter_map(|p| {
                let t = self.fwd.core(p)?;
                Some((graph.id_of(p).clone(), self.target.id_of(t).clone()))
            })
            .collect();
        Mapping::new(pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot<P: NodeId, N: NodeId>(st: &State<'_, P, N>) -> (SideState, SideState, usize) {
        (st.fwd.clone(), st.rev.clone(), st.depth)
    }

    #[test]
    fn push_then_pop_restores_state_exactly() {
        let pattern = Pattern::directed_cycle(3);
        let target: Graph<u32> =
            Graph::from_edges([(1, 2), (2, 3), (3, 1), (3, 3), (2, 4), (4, 1)]);
        let mut st = State::new(&pattern, &target);

        let empty = snapshot(&st);
        st.push(NodeIdx::from(0), NodeIdx::from(0));
        let one = snapshot(&st);
        st.push(NodeIdx::from(1), NodeIdx::from(1));
        st.push(NodeIdx::from(2), NodeIdx::from(2));
        assert!(st.is_complete());

        st.pop(NodeIdx::from(2), NodeIdx::from(2));
        st.pop(NodeIdx::from(1), NodeIdx::from(1));
        assert_eq!(snapshot(&st), one);
        st.pop(NodeIdx::from(0), NodeIdx::from(0));
        assert_eq!(snapshot(&st), empty);
    }

    #[test]
    fn terminal_sets_track_both_directions() {
        let pattern = Pattern::directed_cycle(3);
        let target: Graph<u32> = Graph::from_edges([(1, 2), (2, 3), (3, 1), (5, 1)]);
        let mut st = State::new(&pattern, &target);

        // target 1 has successor 2 and predecessors 3 and 5.
        st.push(NodeIdx::from(0), NodeIdx::from(0));
        assert_eq!(st.rev().out_len(), 1);
        assert_eq!(st.rev().ins_len(), 2);
        assert_eq!(st.fwd().out_len(), 1);
        assert_eq!(st.fwd().ins_len(), 1);
        assert!(st.rev().in_out_terminal(NodeIdx::from(1)));
        assert!(st.rev().in_in_terminal(NodeIdx::from(3)));
        assert_eq!(st.rev().next_out(0), Some(NodeIdx::from(1)));
        assert_eq!(st.rev().next_in(0), Some(NodeIdx::from(2)));
        assert!(st.terminal_sizes_fit());
    }

    #[test]
    fn self_loops_do_not_enter_terminal_sets() {
        let pattern = Pattern::directed_cycle(1);
        let target: Graph<u32> = Graph::from_edges([(7, 7)]);
        let mut st = State::new(&pattern, &target);
        st.push(NodeIdx::from(0), NodeIdx::from(0));
        assert_eq!(st.fwd().out_len(), 0);
        assert_eq!(st.rev().ins_len(), 0);
        st.pop(NodeIdx::from(0), NodeIdx::from(0));
        assert_eq!(st.rev().out_len(), 0);
        assert_eq!(st.rev().next_rest(0), Some(NodeIdx::from(0)));
    }
}
