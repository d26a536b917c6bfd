//! Series/parallel classification of bulb wiring.

use std::collections::HashSet;

use crate::circuit::{ComponentId, ComponentRegistry};

use super::{Topology, DEFAULT_MAX_PATHS, DEFAULT_MAX_PATH_LEN, DEFAULT_MAX_STEPS, MAX_PATH_LEN_LIMIT};

/// Bounds on a single simple-path enumeration.
///
/// Enumerating simple paths is exponential on dense graphs, so every
/// enumeration stops at whichever limit it hits first.
///
/// `max_path_len` is also the recursion depth of the search. [`PathSearch`]
/// clamps it to [`MAX_PATH_LEN_LIMIT`] and to the number of placed
/// components, since no simple path can be longer than that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Paths collected before stopping
    pub max_paths: usize,
    /// Components allowed on one path, at most [`MAX_PATH_LEN_LIMIT`]
    pub max_path_len: usize,
    /// Node expansions allowed
    pub max_steps: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
            max_path_len: DEFAULT_MAX_PATH_LEN,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

/// Per-enumeration bookkeeping.
struct Walk {
    target: ComponentId,
    path: Vec<ComponentId>,
    on_path: HashSet<ComponentId>,
    found: Vec<Vec<ComponentId>>,
    steps: usize,
    truncated: bool,
}

/// Bounded depth-first enumeration of simple paths.
pub struct PathSearch<'a> {
    registry: &'a ComponentRegistry,
    limits: SearchLimits,
    total_steps: usize,
    truncated: bool,
}

impl<'a> PathSearch<'a> {
    /// Create a search over `registry`.
    pub fn new(registry: &'a ComponentRegistry, mut limits: SearchLimits) -> Self {
        limits.max_path_len = limits.max_path_len.min(MAX_PATH_LEN_LIMIT).min(registry.len());
        Self {
            registry,
            limits,
            total_steps: 0,
            truncated: false,
        }
    }

    /// Every simple path (no repeated component) from `from` to `to`, both
    /// ends included, up to the search limits.
    pub fn simple_paths(&mut self, from: ComponentId, to: ComponentId) -> Vec<Vec<ComponentId>> {
        if self.registry.get(from).is_none() || self.registry.get(to).is_none() {
            return Vec::new();
        }

        let mut walk = Walk {
            target: to,
            path: Vec::new(),
            on_path: HashSet::new(),
            found: Vec::new(),
            steps: 0,
            truncated: false,
        };
        self.extend(&mut walk, from);
        self.total_steps += walk.steps;
        self.truncated |= walk.truncated;

        if walk.truncated {
            tracing::warn!(
                %from,
                %to,
                paths = walk.found.len(),
                steps = walk.steps,
                "path enumeration hit its limit"
            );
        }
        walk.found
    }

    /// Node expansions spent across every enumeration so far.
    pub fn steps(&self) -> usize {
        self.total_steps
    }

    /// Whether any enumeration stopped early.
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    fn exhausted(&self, walk: &Walk) -> bool {
        walk.steps >= self.limits.max_steps || walk.found.len() >= self.limits.max_paths
    }

    /// Callers only recurse while a node is left to expand, so stopping
    /// here always skips work.
    fn extend(&self, walk: &mut Walk, node: ComponentId) {
        if self.exhausted(walk) {
            walk.truncated = true;
            return;
        }
        walk.steps += 1;
        walk.path.push(node);
        walk.on_path.insert(node);

        if node == walk.target {
            walk.found.push(walk.path.clone());
        } else if walk.path.len() >= self.limits.max_path_len {
            walk.truncated |= self.registry.peers(node).any(|peer| !walk.on_path.contains(&peer));
        } else {
            for peer in self.registry.peers(node) {
                if walk.on_path.contains(&peer) {
                    continue;
                }
                if self.exhausted(walk) {
                    walk.truncated = true;
                    break;
                }
                self.extend(walk, peer);
            }
        }

        walk.path.pop();
        walk.on_path.remove(&node);
    }
}

/// Labels how the bulbs are wired relative to the battery.
///
/// With two or more bulbs only the first two are inspected:
///
/// 1. If the two bulbs are wired directly to each other, they are in
///    series. (The only simple path on which they are neighbours is the
///    direct one, so no enumeration is needed.)
/// 2. Otherwise, if each bulb has a path to the battery and some pair of
///    those paths shares no component besides the battery, they are in
///    parallel.
/// 3. Anything else counts as series.
///
/// Mixed series-parallel networks are not recognised.
#[derive(Debug, Clone, Copy, Default)]
pub struct TopologyClassifier {
    limits: SearchLimits,
}

impl TopologyClassifier {
    /// Create a classifier with the given enumeration limits.
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }

    /// Classify the wiring of `bulbs` (in the order given).
    pub fn classify(
        &self,
        registry: &ComponentRegistry,
        battery: Option<ComponentId>,
        bulbs: &[ComponentId],
    ) -> Topology {
        let Some(battery) = battery.filter(|&id| registry.get(id).is_some()) else {
            return Topology::None;
        };

        match bulbs {
            [] => Topology::None,
            [_] => Topology::Simple,
            [first, second, ..] => self.classify_pair(registry, battery, *first, *second),
        }
    }

    fn classify_pair(
        &self,
        registry: &ComponentRegistry,
        battery: ComponentId,
        first: ComponentId,
        second: ComponentId,
    ) -> Topology {
        if registry.get(first).map_or(false, |c| c.is_connected_to(second)) {
            tracing::trace!(%first, %second, "bulbs wired directly, series");
            return Topology::Series;
        }

        let mut search = PathSearch::new(registry, self.limits);

        let from_first = search.simple_paths(first, battery);
        let from_second = search.simple_paths(second, battery);
        let topology = if independent_paths_exist(&from_first, &from_second, battery) {
            Topology::Parallel
        } else {
            Topology::Series
        };

        tracing::trace!(
            %first,
            %second,
            %topology,
            steps = search.steps(),
            truncated = search.truncated(),
            "bulb pair classified"
        );
        topology
    }
}

/// Check for one path from each set that only overlap at the battery.
fn independent_paths_exist(
    first: &[Vec<ComponentId>],
    second: &[Vec<ComponentId>],
    battery: ComponentId,
) -> bool {
    let second: Vec<HashSet<ComponentId>> = second
        .iter()
        .map(|path| path.iter().copied().filter(|&id| id != battery).collect())
        .collect();

    first.iter().any(|path| {
        second
            .iter()
            .any(|other| path.iter().all(|id| *id == battery || !other.contains(id)))
    })
}
