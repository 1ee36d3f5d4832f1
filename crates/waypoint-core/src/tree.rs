//! Compressed-trie storage and lookup
//!
//! The tree stores route patterns as a radix tree over raw bytes. Static
//! text lives in node prefixes; dynamic segments are singleton child slots
//! (`param_child`, `any_child`) whose stored prefix is the one-byte sentinel
//! (`:` or `*`) the pattern compiler collapsed the name into. Lookup walks
//! the tree with a fixed priority order per node (static before param
//! before catch-all) and backtracks up the decision path when a branch dead
//! ends, so the structure behaves as a decision tree rather than a plain
//! trie descent.
//!
//! Nodes live in an arena (`Vec<Node>`) and refer to each other by index;
//! splitting a node re-points indices instead of juggling references, and
//! `parent` back-links are plain indices used only while backtracking.

use crate::error::{Error, Result};
use crate::params::Params;
use crate::pattern;

pub(crate) const PARAM_LABEL: u8 = b':';
pub(crate) const ANY_LABEL: u8 = b'*';

/// Node classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Literal text, matched byte for byte.
    Static,
    /// Named parameter, captures one segment (up to the next `/`).
    Param,
    /// Catch-all, captures the whole remaining path.
    CatchAll,
}

/// Arena index of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    fn idx(self) -> usize {
        self.0 as usize
    }
}

const ROOT: NodeId = NodeId(0);

/// Payload installed on a terminal node.
pub(crate) struct Route<T> {
    /// The full original pattern, e.g. `/cmd/:tool/:sub`.
    pub pattern: String,
    /// Parameter names in capture order along the path to this node.
    pub param_names: Vec<String>,
    pub value: T,
}

impl<T> Route<T> {
    pub(crate) fn new(pattern: &str, param_names: Vec<String>, value: T) -> Self {
        Self {
            pattern: pattern.to_string(),
            param_names,
            value,
        }
    }
}

/// One edge of the compressed trie.
struct Node<T> {
    kind: Kind,
    /// First byte of `prefix`; dispatch key among static siblings.
    label: u8,
    /// Literal bytes for static nodes, the sentinel byte for wildcards.
    /// Bytes rather than a string: splits may land inside a multi-byte
    /// UTF-8 sequence.
    prefix: Vec<u8>,
    /// Back-link for backtracking only; never ownership.
    parent: Option<NodeId>,
    /// Static children, unique first byte each.
    children: Vec<NodeId>,
    param_child: Option<NodeId>,
    any_child: Option<NodeId>,
    /// Present only on nodes that terminate a registered route.
    route: Option<Route<T>>,
}

impl<T> Node<T> {
    fn root() -> Self {
        Self {
            kind: Kind::Static,
            label: 0,
            prefix: Vec::new(),
            parent: None,
            children: Vec::new(),
            param_child: None,
            any_child: None,
            route: None,
        }
    }
}

/// Build-phase tree.
///
/// Mutation happens only here; [`freeze`](TreeBuilder::freeze) turns the
/// builder into a read-only [`RouteTree`]. Registration is single-threaded
/// by contract.
pub struct TreeBuilder<T> {
    nodes: Vec<Node<T>>,
    route_count: usize,
    max_params: usize,
}

impl<T> TreeBuilder<T> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::root()],
            route_count: 0,
            max_params: 0,
        }
    }

    /// Register `pattern` with its payload.
    ///
    /// The pattern is validated in full before the tree is touched. A
    /// malformed pattern leaves the tree unchanged. A duplicate pattern
    /// (one whose exact node already carries a payload) is rejected by the
    /// final insert operation before any payload field is written; the
    /// structural nodes added by earlier operations of the same pattern are
    /// payload-free intermediates and leave every registered route intact.
    pub fn add_route(&mut self, pattern: &str, value: T) -> Result<()> {
        let ops = pattern::compile(pattern, value)?;
        let n_params = ops
            .last()
            .and_then(|op| op.route.as_ref())
            .map(|r| r.param_names.len())
            .unwrap_or(0);

        for op in ops {
            self.insert(&op.search, op.kind, op.route)?;
        }

        self.max_params = self.max_params.max(n_params);
        self.route_count += 1;
        Ok(())
    }

    /// Finalize registration. The returned tree is immutable and may be
    /// shared freely across threads.
    pub fn freeze(self) -> RouteTree<T> {
        RouteTree {
            nodes: self.nodes,
            route_count: self.route_count,
            max_params: self.max_params,
        }
    }

    /// Place one compiled search string into the tree.
    fn insert(&mut self, search: &str, kind: Kind, mut route: Option<Route<T>>) -> Result<()> {
        let mut cur = ROOT;
        let mut search: &[u8] = search.as_bytes();

        loop {
            let prefix_len = self.nodes[cur.idx()].prefix.len();
            let search_len = search.len();
            let max = prefix_len.min(search_len);
            let mut lcp = 0;
            while lcp < max && search[lcp] == self.nodes[cur.idx()].prefix[lcp] {
                lcp += 1;
            }

            if lcp == 0 {
                // only possible at a freshly created, empty root
                let node = &mut self.nodes[cur.idx()];
                node.label = search.first().copied().unwrap_or(0);
                node.prefix = search.to_vec();
                if let Some(incoming) = route.take() {
                    node.kind = kind;
                    node.route = Some(incoming);
                }
            } else if lcp < prefix_len {
                // partial overlap: split `cur`, pushing its unmatched tail
                // down into a new child that keeps everything `cur` owned
                let (tail_kind, tail_prefix, tail_route, tail_children, tail_param, tail_any) = {
                    let node = &mut self.nodes[cur.idx()];
                    (
                        node.kind,
                        node.prefix.split_off(lcp),
                        node.route.take(),
                        std::mem::take(&mut node.children),
                        node.param_child.take(),
                        node.any_child.take(),
                    )
                };
                let tail = NodeId(self.nodes.len() as u32);
                self.nodes.push(Node {
                    kind: tail_kind,
                    label: tail_prefix[0],
                    prefix: tail_prefix,
                    parent: Some(cur),
                    children: tail_children,
                    param_child: tail_param,
                    any_child: tail_any,
                    route: tail_route,
                });
                self.reparent_children(tail);

                let node = &mut self.nodes[cur.idx()];
                node.kind = Kind::Static;
                node.label = node.prefix[0];
                node.children.push(tail);

                if lcp == search_len {
                    // the incoming route terminates exactly at the truncated node
                    let node = &mut self.nodes[cur.idx()];
                    node.kind = kind;
                    node.route = route.take();
                } else {
                    let id = self.push_node(kind, search[lcp..].to_vec(), cur, route.take());
                    self.attach(cur, id, kind);
                }
            } else if lcp < search_len {
                // existing prefix fully consumed, more of `search` remains
                search = &search[lcp..];
                if let Some(child) = self.find_child_with_label(cur, search[0]) {
                    cur = child;
                    continue;
                }
                let id = self.push_node(kind, search.to_vec(), cur, route.take());
                self.attach(cur, id, kind);
            } else {
                // exact node match
                if let Some(incoming) = route.take() {
                    let node = &mut self.nodes[cur.idx()];
                    if node.route.is_some() {
                        return Err(Error::DuplicateRoute(incoming.pattern));
                    }
                    node.route = Some(incoming);
                }
            }
            return Ok(());
        }
    }

    fn push_node(
        &mut self,
        kind: Kind,
        prefix: Vec<u8>,
        parent: NodeId,
        route: Option<Route<T>>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            kind,
            label: prefix.first().copied().unwrap_or(0),
            prefix,
            parent: Some(parent),
            children: Vec::new(),
            param_child: None,
            any_child: None,
            route,
        });
        id
    }

    fn reparent_children(&mut self, id: NodeId) {
        let kids: Vec<NodeId> = self.nodes[id.idx()].children.clone();
        for kid in kids {
            self.nodes[kid.idx()].parent = Some(id);
        }
        if let Some(kid) = self.nodes[id.idx()].param_child {
            self.nodes[kid.idx()].parent = Some(id);
        }
        if let Some(kid) = self.nodes[id.idx()].any_child {
            self.nodes[kid.idx()].parent = Some(id);
        }
    }

    fn attach(&mut self, parent: NodeId, child: NodeId, kind: Kind) {
        let node = &mut self.nodes[parent.idx()];
        match kind {
            Kind::Static => node.children.push(child),
            Kind::Param => node.param_child = Some(child),
            Kind::CatchAll => node.any_child = Some(child),
        }
    }

    /// Static child by label, or the wildcard slot matching a sentinel byte.
    fn find_child_with_label(&self, id: NodeId, label: u8) -> Option<NodeId> {
        let node = &self.nodes[id.idx()];
        for &c in &node.children {
            if self.nodes[c.idx()].label == label {
                return Some(c);
            }
        }
        match label {
            PARAM_LABEL => node.param_child,
            ANY_LABEL => node.any_child,
            _ => None,
        }
    }
}

impl<T> Default for TreeBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a lookup.
#[derive(Debug)]
pub enum Lookup<'t, T> {
    /// A terminal node matched; the capture buffer holds the bindings.
    Found {
        value: &'t T,
        /// Full registered pattern, e.g. `/cmd/:tool/:sub`.
        pattern: &'t str,
    },
    /// No terminal matched. `tsr` hints that the slash-adjusted path (the
    /// path with a trailing `/` added or removed) likely would have.
    NotFound { tsr: bool },
}

/// Frozen, read-only route tree.
///
/// Produced by [`TreeBuilder::freeze`]. Lookup is a pure, bounded traversal
/// of the path bytes plus backtracking; it never blocks, performs no I/O,
/// and allocates nothing beyond the caller's capture buffer. Share it by
/// reference or `Arc` across any number of concurrent readers.
pub struct RouteTree<T> {
    nodes: Vec<Node<T>>,
    route_count: usize,
    max_params: usize,
}

impl<T> RouteTree<T> {
    /// Match `path` against the registered patterns.
    ///
    /// Captured parameter values are written into `params` in path order;
    /// names are resolved from the terminal node only on success. The buffer
    /// is cleared first, so it can be reused across calls.
    pub fn find<'t, 'p>(&'t self, path: &'p str, params: &mut Params<'t, 'p>) -> Lookup<'t, T> {
        params.clear();
        let bytes = path.as_bytes();
        let mut cn = ROOT;
        let mut search_index = 0usize;
        let mut tsr = false;
        // which step the current iteration starts at; backtracking resumes
        // directly at the untried alternative
        let mut entry = Kind::Static;

        loop {
            if entry == Kind::Static {
                let node = self.node(cn);
                if node.kind == Kind::Static {
                    let search = &bytes[search_index..];
                    if search.len() >= node.prefix.len()
                        && node.prefix.as_slice() == &search[..node.prefix.len()]
                    {
                        search_index += node.prefix.len();
                    } else {
                        // the prefix is exactly the remainder plus a trailing '/'
                        if node.prefix.len() == search.len() + 1
                            && node.prefix[search.len()] == b'/'
                            && node.prefix[..search.len()] == *search
                            && (node.route.is_some() || node.any_child.is_some())
                        {
                            tsr = true;
                        }
                        match self.backtrack(&mut cn, &mut search_index, params, Kind::Static) {
                            Some(Kind::Param) => {
                                entry = Kind::Param;
                                continue;
                            }
                            _ => return Lookup::NotFound { tsr },
                        }
                    }
                }

                let node = self.node(cn);
                let search = &bytes[search_index..];
                if search.is_empty() {
                    if let Some(route) = &node.route {
                        params.set_keys(&route.param_names);
                        return Lookup::Found {
                            value: &route.value,
                            pattern: &route.pattern,
                        };
                    }
                }
                if !search.is_empty() {
                    if search == b"/" && node.route.is_some() {
                        tsr = true;
                    }
                    if let Some(child) = self.find_child(cn, search[0]) {
                        cn = child;
                        continue;
                    }
                }
                if search.is_empty() && self.slash_child_terminates(cn) {
                    tsr = true;
                }
            }

            if entry != Kind::CatchAll {
                let search = &bytes[search_index..];
                if !search.is_empty() {
                    if let Some(child) = self.node(cn).param_child {
                        cn = child;
                        let seg = search
                            .iter()
                            .position(|&b| b == b'/')
                            .unwrap_or(search.len());
                        // capture boundaries coincide with '/' bytes in the
                        // path or with a wildcard position of a registered
                        // pattern, so they always fall on char boundaries
                        params.push_value(&path[search_index..search_index + seg]);
                        search_index += seg;
                        if search_index == bytes.len() && self.slash_child_terminates(cn) {
                            tsr = true;
                        }
                        entry = Kind::Static;
                        continue;
                    }
                }
            }

            if let Some(child) = self.node(cn).any_child {
                // catch-all nodes are terminal by construction
                match &self.node(child).route {
                    Some(route) => {
                        // the capture lands in the terminal's last name slot
                        params.truncate(route.param_names.len().saturating_sub(1));
                        params.push_value(&path[search_index..]);
                        params.set_keys(&route.param_names);
                        return Lookup::Found {
                            value: &route.value,
                            pattern: &route.pattern,
                        };
                    }
                    None => return Lookup::NotFound { tsr },
                }
            }

            match self.backtrack(&mut cn, &mut search_index, params, Kind::CatchAll) {
                Some(Kind::Param) => entry = Kind::Param,
                Some(Kind::CatchAll) => entry = Kind::CatchAll,
                _ => return Lookup::NotFound { tsr },
            }
        }
    }

    /// Largest parameter count across all registered routes; size capture
    /// buffers with this.
    pub fn max_params(&self) -> usize {
        self.max_params
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.route_count
    }

    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }

    /// Registered `(pattern, payload)` pairs, in arbitrary order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &T)> {
        self.nodes
            .iter()
            .filter_map(|n| n.route.as_ref().map(|r| (r.pattern.as_str(), &r.value)))
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.idx()]
    }

    fn find_child(&self, id: NodeId, label: u8) -> Option<NodeId> {
        self.node(id)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).label == label)
    }

    /// Whether `id` has a static `/` child that terminates a route or owns a
    /// catch-all: the "one more slash would match" redirect condition.
    fn slash_child_terminates(&self, id: NodeId) -> bool {
        match self.find_child(id, b'/') {
            Some(cd) => {
                let child = self.node(cd);
                child.route.is_some() || child.any_child.is_some()
            }
            None => false,
        }
    }

    /// Step one level up the decision path and report which alternative kind
    /// to try next at the parent, in static → param → catch-all order.
    /// Returns `None` when no ancestor remains.
    ///
    /// Leaving a node undoes its consumption: a static node rewinds by its
    /// prefix length, a wildcard node pops its captured value and rewinds by
    /// the value's length. A static *mismatch* consumed nothing, so `from ==
    /// Static` skips the rewind.
    fn backtrack(
        &self,
        cn: &mut NodeId,
        search_index: &mut usize,
        params: &mut Params<'_, '_>,
        from: Kind,
    ) -> Option<Kind> {
        let previous = *cn;
        let prev = self.node(previous);
        let parent = prev.parent?;
        *cn = parent;

        let next = match prev.kind {
            Kind::Static => Kind::Param,
            Kind::Param => Kind::CatchAll,
            Kind::CatchAll => Kind::Static,
        };

        if from == Kind::Static {
            return Some(next);
        }

        match prev.kind {
            Kind::Static => *search_index -= prev.prefix.len(),
            _ => *search_index -= params.pop_value(),
        }
        Some(next)
    }
}
