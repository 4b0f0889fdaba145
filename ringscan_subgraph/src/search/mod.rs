//! Lazy depth-first enumeration of pattern mappings.
//!
//! The recursion of the classic VF2 search is unrolled into an explicit
//! frame stack so that [`Matches`] can hand out one mapping at a time and
//! resume exactly where it stopped. Pushing a pair is always mirrored by a
//! pop when its `Unwind` frame is reached, so the state is clean whenever
//! the stack is empty.

mod candidates;

use ringscan_common::Config;

use crate::graph::{Graph, NodeId, NodeIdx};
use crate::mapping::Mapping;
use crate::pattern::Pattern;
use crate::state::State;
use candidates::{OpenList, first_pair, next_target};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Frame {
    /// Report a complete mapping or open the next candidate list.
    Outer,
    /// Try `p -> t`, then move on to the next target in `list`.
    Inner {
        p: NodeIdx,
        t: NodeIdx,
        list: OpenList,
    },
    /// Undo `p -> t` after its subtree is exhausted.
    Unwind {
        p: NodeIdx,
        t: NodeIdx,
        list: OpenList,
    },
}

/// Iterator over every mapping of a pattern into a target graph.
///
/// Mappings come out in a fixed order for fixed inputs. If the step budget
/// runs out the iterator ends early and [`Matches::truncated`] reports it.
pub struct Matches<'a, P, N> {
    state: State<'a, P, N>,
    config: Config,
    stack: Vec<Frame>,
    steps: usize,
    truncated: bool,
}

impl<'a, P: NodeId, N: NodeId> Matches<'a, P, N> {
    /// A search over the whole target.
    pub(crate) fn new(pattern: &'a Pattern<P>, target: &'a Graph<N>, config: &Config) -> Self {
        let stack = if fits_in(pattern, target) {
            vec![Frame::Outer]
        } else {
            tracing::debug!(
                "pattern ({} nodes, {} edges) cannot fit target ({} nodes, {} edges)",
                pattern.node_count(),
                pattern.edge_count(),
                target.node_count(),
                target.edge_count()
            );
            Vec::new()
        };
        Self::with_stack(State::new(pattern, target), config, stack)
    }

    /// A search restricted to mappings that send the first pattern node to
    /// `seed`. The union over every target node is the full search.
    ///
    /// `state` must be clean; a state handed back by
    /// [`Matches::into_state`] can be reused for the next seed.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    #[contracts::debug_requires(state.depth() == 0)]
    pub(crate) fn seeded_in(state: State<'a, P, N>, config: &Config, seed: NodeIdx) -> Self {
        let (pattern, target) = (state.pattern(), state.target());
        let stack = if !pattern.graph().is_empty() && fits_in(pattern, target) {
            vec![Frame::Inner {
                p: NodeIdx::from(0),
                t: seed,
                list: OpenList::Seed,
            }]
        } else {
            Vec::new()
        };
        Self::with_stack(state, config, stack)
    }

    fn with_stack(state: State<'a, P, N>, config: &Config, stack: Vec<Frame>) -> Self {
        Self {
            state,
            config: config.clone(),
            stack,
            steps: 0,
            truncated: false,
        }
    }

    /// Number of pairs pushed onto the state so far.
    #[must_use]
    pub const fn steps(&self) -> usize {
        self.steps
    }

    /// Whether the search stopped because `max_steps` was exceeded.
    #[must_use]
    pub const fn truncated(&self) -> bool {
        self.truncated
    }

    /// Give the state back for another search, abandoning any pending
    /// frames.
    #[cfg_attr(not(feature = "rayon"), allow(dead_code))]
    pub(crate) fn into_state(mut self) -> State<'a, P, N> {
        self.unwind();
        self.state
    }

    fn advance(&mut self, p: NodeIdx, t: NodeIdx, list: OpenList) {
        if let Some((next, list)) = next_target(&self.state, t, list) {
            self.stack.push(Frame::Inner { p, t: next, list });
        }
    }

    fn unwind(&mut self) {
        while let Some(frame) = self.stack.pop() {
            if let Frame::Unwind { p, t, .. } = frame {
                self.state.pop(p, t);
            }
        }
    }

    /// Abandon the search, unwinding every pushed pair.
    fn truncate(&mut self) {
        tracing::warn!(
            "search stopped after {} steps (max_steps = {:?}); results are incomplete",
            self.steps,
            self.config.max_steps
        );
        self.unwind();
        self.truncated = true;
    }
}

/// Cheap size checks: an injective mapping needs room for every pattern
/// node, and monomorphism maps pattern edges onto distinct target edges.
fn fits_in<P: NodeId, N: NodeId>(pattern: &Pattern<P>, target: &Graph<N>) -> bool {
    pattern.node_count() <= target.node_count() && pattern.edge_count() <= target.edge_count()
}

impl<P: NodeId, N: NodeId> Iterator for Matches<'_, P, N> {
    type Item = Mapping<P, N>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.stack.pop() {
            match frame {
                Frame::Outer => {
                    if self.state.is_complete() {
                        tracing::trace!("mapping complete after {} steps", self.steps);
                        return Some(self.state.to_mapping());
                    }
                    if let Some((p, t, list)) = first_pair(&self.state) {
                        self.stack.push(Frame::Inner { p, t, list });
                    }
                }
                Frame::Inner { p, t, list } => {
                    if self.state.is_feasible(p, t, self.config.semantics) {
                        self.state.push(p, t);
                        if self.state.terminal_sizes_fit() {
                            self.steps += 1;
                            self.stack.push(Frame::Unwind { p, t, list });
                            if self.config.budget_exceeded(self.steps) {
                                self.truncate();
                                return None;
                            }
                            self.stack.push(Frame::Outer);
                            continue;
                        }
                        self.state.pop(p, t);
                    }
                    self.advance(p, t, list);
                }
                Frame::Unwind { p, t, list } => {
                    self.state.pop(p, t);
                    self.advance(p, t, list);
                }
            }
        }
        None
    }
}
