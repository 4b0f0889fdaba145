//! Candidate pair generation.
//!
//! The pattern side always picks its least eligible node. While a terminal
//! set is open, every feasible image of that node is adjacent to the image
//! of one mapped neighbour (the anchor), so the target side walks the
//! anchor's adjacency list instead of the whole target. Only the fallback
//! list scans target indices.

use crate::graph::{NodeId, NodeIdx};
use crate::state::State;

/// Which set the target candidates of the current frame are drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OpenList {
    /// Successors of `anchor`; `pos` is the current slot in that list.
    Out { anchor: NodeIdx, pos: usize },
    /// Predecessors of `anchor`; `pos` is the current slot in that list.
    In { anchor: NodeIdx, pos: usize },
    /// Neither terminal set applies: any unmapped node.
    Other,
    /// A single fixed pair handed out by a parallel driver.
    Seed,
}

/// First candidate pair for the current state, or `None` at a dead end.
pub(crate) fn first_pair<P: NodeId, N: NodeId>(
    st: &State<'_, P, N>,
) -> Option<(NodeIdx, NodeIdx, OpenList)> {
    let (fwd, rev) = (st.fwd(), st.rev());
    let pg = st.pattern().graph();
    let tg = st.target();

    if fwd.out_len() > 0 {
        let p = fwd.next_out(0)?;
        // p is out-terminal, so some mapped pattern node points at it.
        let anchor = pg
            .pred(p)
            .iter()
            .filter_map(|&q| fwd.core(q))
            .min_by_key(|&a| (tg.succ(a).len(), a))?;
        let (pos, t) = next_unmapped(st, tg.succ(anchor), 0)?;
        return Some((p, t, OpenList::Out { anchor, pos }));
    }
    if fwd.ins_len() > 0 {
        let p = fwd.next_in(0)?;
        let anchor = pg
            .succ(p)
            .iter()
            .filter_map(|&q| fwd.core(q))
            .min_by_key(|&a| (tg.pred(a).len(), a))?;
        let (pos, t) = next_unmapped(st, tg.pred(anchor), 0)?;
        return Some((p, t, OpenList::In { anchor, pos }));
    }
    let p = fwd.next_rest(0)?;
    let t = rev.next_rest(0)?;
    Some((p, t, OpenList::Other))
}

/// Next target candidate after `t` from the same list, with the list
/// advanced to it.
pub(crate) fn next_target<P: NodeId, N: NodeId>(
    st: &State<'_, P, N>,
    t: NodeIdx,
    list: OpenList,
) -> Option<(NodeIdx, OpenList)> {
    let tg = st.target();
    match list {
        OpenList::Out { anchor, pos } => {
            let (pos, t) = next_unmapped(st, tg.succ(anchor), pos + 1)?;
            Some((t, OpenList::Out { anchor, pos }))
        }
        OpenList::In { anchor, pos } => {
            let (pos, t) = next_unmapped(st, tg.pred(anchor), pos + 1)?;
            Some((t, OpenList::In { anchor, pos }))
        }
        OpenList::Other => st.rev().next_rest(t.as_usize() + 1).map(|t| (t, list)),
        OpenList::Seed => None,
    }
}

/// First unmapped target node in `adj` at or after slot `from`.
fn next_unmapped<P: NodeId, N: NodeId>(
    st: &State<'_, P, N>,
    adj: &[NodeIdx],
    from: usize,
) -> Option<(usize, NodeIdx)> {
    adj.iter()
        .enumerate()
        .skip(from)
        .find(|&(_, &t)| !st.is_target_used(t))
        .map(|(pos, &t)| (pos, t))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;
    use crate::pattern::Pattern;

    /// Every target node a list hands out, starting from its first pair.
    fn walk<P: NodeId, N: NodeId>(st: &State<'_, P, N>) -> Vec<NodeIdx> {
        let Some((_, mut t, mut list)) = first_pair(st) else {
            return Vec::new();
        };
        let mut seen = vec![t];
        while let Some((next, advanced)) = next_target(st, t, list) {
            seen.push(next);
            (t, list) = (next, advanced);
        }
        seen
    }

    #[test]
    fn empty_state_pairs_least_nodes() {
        let pattern = Pattern::directed_cycle(3);
        let target: Graph<u32> = Graph::from_edges([(4, 5), (5, 6), (6, 4)]);
        let st = State::new(&pattern, &target);
        let (p, t, list) = first_pair(&st).unwrap();
        assert_eq!((p, t, list), (NodeIdx::from(0), NodeIdx::from(0), OpenList::Other));
        assert_eq!(next_target(&st, t, list), Some((NodeIdx::from(1), list)));
        assert_eq!(next_target(&st, NodeIdx::from(2), list), None);
    }

    #[test]
    fn terminal_sets_take_priority() {
        let pattern = Pattern::directed_cycle(3);
        let target: Graph<u32> = Graph::from_edges([(4, 5), (5, 6), (6, 4), (4, 7)]);
        let mut st = State::new(&pattern, &target);
        st.push(NodeIdx::from(0), NodeIdx::from(0));
        let (p, t, list) = first_pair(&st).unwrap();
        assert_eq!(
            list,
            OpenList::Out {
                anchor: NodeIdx::from(0),
                pos: 0
            }
        );
        assert_eq!(p, NodeIdx::from(1));
        assert_eq!(t, NodeIdx::from(1));
        // 7 is the other successor of 4.
        let (next, _) = next_target(&st, t, list).unwrap();
        assert_eq!(next, NodeIdx::from(3));
        assert_eq!(next_target(&st, t, OpenList::Seed), None);
    }

    #[test]
    fn empty_target_terminal_is_a_dead_end() {
        let pattern = Pattern::directed_cycle(2);
        let target: Graph<u32> = Graph::from_edges([(1, 2), (3, 3)]);
        let mut st = State::new(&pattern, &target);
        // 2 has no successors, so nothing can follow it.
        st.push(NodeIdx::from(0), NodeIdx::from(1));
        assert!(first_pair(&st).is_none());
    }

    #[test]
    fn out_list_only_visits_anchor_successors() {
        // 0 fans out to 1 and 2; the chain 3..=9 is never offered.
        let mut edges = vec![(0, 1), (0, 2)];
        edges.extend((3..9).map(|i| (i, i + 1)));
        let target: Graph<u32> = Graph::from_edges(edges);
        let pattern = Pattern::from_edges(2, &[(0, 1)]).unwrap();
        let mut st = State::new(&pattern, &target);
        st.push(NodeIdx::from(0), NodeIdx::from(0));
        assert_eq!(walk(&st), vec![NodeIdx::from(1), NodeIdx::from(2)]);
    }

    #[test]
    fn in_list_uses_the_smallest_anchor() {
        // pattern 2 points at both 0 and 1; once those are mapped, 2 is
        // in-terminal only and its candidates are predecessors of an image.
        let pattern = Pattern::from_edges(3, &[(2, 0), (2, 1)]).unwrap();
        let target: Graph<u32> =
            Graph::from_edges([(10, 20), (11, 20), (12, 20), (10, 21), (13, 14)]);
        let mut st = State::new(&pattern, &target);
        let (hub, leaf) = (
            target.index_of(&20).unwrap(),
            target.index_of(&21).unwrap(),
        );
        st.push(NodeIdx::from(0), hub);
        st.push(NodeIdx::from(1), leaf);
        let (p, t, list) = first_pair(&st).unwrap();
        assert_eq!(p, NodeIdx::from(2));
        assert_eq!(list, OpenList::In { anchor: leaf, pos: 0 });
        assert_eq!(t, target.index_of(&10).unwrap());
        assert_eq!(walk(&st), vec![t]);
    }
}
