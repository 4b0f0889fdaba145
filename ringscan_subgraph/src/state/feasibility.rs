//! Pruning rules for a candidate pair `(p, t)`.
//!
//! All checks are read-only and evaluated against the state before the pair
//! is pushed. Structural rules run first; attribute predicates only see
//! pairs that are already structurally sound.

use ringscan_common::MatchSemantics;

use super::{SideState, State};
use crate::graph::{Graph, NodeId, NodeIdx};

/// Neighbour counts of one node split by terminal set:
/// `[succ in out, succ in ins, pred in out, pred in ins]`.
type TerminalCounts = [usize; 4];

fn terminal_counts<G: NodeId>(graph: &Graph<G>, side: &SideState, node: NodeIdx) -> TerminalCounts {
    let mut counts = [0; 4];
    for &s in graph.succ(node).iter().filter(|&&s| s != node) {
        counts[0] += usize::from(side.in_out_terminal(s));
        counts[1] += usize::from(side.in_in_terminal(s));
    }
    for &q in graph.pred(node).iter().filter(|&&q| q != node) {
        counts[2] += usize::from(side.in_out_terminal(q));
        counts[3] += usize::from(side.in_in_terminal(q));
    }
    counts
}

impl<P: NodeId, N: NodeId> State<'_, P, N> {
    /// Whether `p -> t` can extend the current partial mapping.
    pub(crate) fn is_feasible(&self, p: NodeIdx, t: NodeIdx, semantics: MatchSemantics) -> bool {
        if self.is_pattern_mapped(p) || self.is_target_used(t) {
            return false;
        }
        if !self.edges_preserved(p, t) {
            return false;
        }
        if semantics.is_induced() && !self.no_extra_edges(p, t) {
            return false;
        }
        self.lookahead_fits(p, t) && self.predicates_hold(p, t)
    }

    /// Every pattern edge between `p` and a mapped node (or `p` itself) has
    /// its image in the target.
    fn edges_preserved(&self, p: NodeIdx, t: NodeIdx) -> bool {
        let pg = self.pattern.graph();
        let tg = self.target;

        let outgoing = pg.succ(p).iter().all(|&q| {
            if q == p {
                return tg.has_edge_idx(t, t);
            }
            self.fwd.core(q).is_none_or(|tq| tg.has_edge_idx(t, tq))
        });
        if !outgoing {
            return false;
        }
        pg.pred(p)
            .iter()
            .filter(|&&q| q != p)
            .all(|&q| self.fwd.core(q).is_none_or(|tq| tg.has_edge_idx(tq, t)))
    }

    /// Every target edge between `t` and a mapped node (or `t` itself) has a
    /// pattern preimage. Induced semantics only.
    fn no_extra_edges(&self, p: NodeIdx, t: NodeIdx) -> bool {
        let pg = self.pattern.graph();
        let tg = self.target;

        let outgoing = tg.succ(t).iter().all(|&u| {
            if u == t {
                return pg.has_edge_idx(p, p);
            }
            self.rev.core(u).is_none_or(|q| pg.has_edge_idx(p, q))
        });
        if !outgoing {
            return false;
        }
        tg.pred(t)
            .iter()
            .filter(|&&u| u != t)
            .all(|&u| self.rev.core(u).is_none_or(|q| pg.has_edge_idx(q, p)))
    }

    /// Unmapped neighbours of `p` in each terminal set need at least as many
    /// counterparts around `t`.
    fn lookahead_fits(&self, p: NodeIdx, t: NodeIdx) -> bool {
        let need = terminal_counts(self.pattern.graph(), &self.fwd, p);
        let have = terminal_counts(self.target, &self.rev, t);
        need.iter().zip(have.iter()).all(|(n, h)| n <= h)
    }

    /// Node and edge predicates for the pair and its edges into the mapping.
    fn predicates_hold(&self, p: NodeIdx, t: NodeIdx) -> bool {
        let pattern = self.pattern;
        if !pattern.has_predicates() {
            return true;
        }
        let pg = pattern.graph();
        let tg = self.target;

        let node_ok = pattern
            .node_predicate(p)
            .is_none_or(|pred| pred.matches(pg.node_attrs_idx(p), tg.node_attrs_idx(t)));
        if !node_ok {
            return false;
        }

        let edge_ok = |ps: NodeIdx, pd: NodeIdx, ts: NodeIdx, td: NodeIdx| -> bool {
            let Some(pred) = pattern.edge_predicate(ps, pd) else {
                return true;
            };
            match (pg.edge_attrs_idx(ps, pd), tg.edge_attrs_idx(ts, td)) {
                (Some(pa), Some(ta)) => pred.matches(pa, ta),
                _ => false,
            }
        };

        let outgoing = pg.succ(p).iter().all(|&q| {
            let image = if q == p { Some(t) } else { self.fwd.core(q) };
            image.is_none_or(|tq| edge_ok(p, q, t, tq))
        });
        if !outgoing {
            return false;
        }
        pg.pred(p)
            .iter()
            .filter(|&&q| q != p)
            .all(|&q| self.fwd.core(q).is_none_or(|tq| edge_ok(q, p, tq, t)))
    }
}
