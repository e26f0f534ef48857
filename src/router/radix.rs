//! Radix tree implementation for efficient HTTP route matching
//!
//! This module provides a radix tree (also called compact prefix tree) for O(k)
//! route matching where k is the path length.
//!
//! ## Layout
//!
//! Nodes live in a single `Vec` arena and refer to their children by
//! [`NodeId`]. The tree is therefore a plain owned value: it can be cloned,
//! shared read-only across threads behind an `Arc`, and dropped without any
//! pointer bookkeeping.
//!
//! Each node consumes a byte prefix of the path relative to its parent:
//!
//! - **Static** nodes match their prefix literally.
//! - **Param** nodes (prefix `:`) capture one segment, up to the next `/`.
//! - **Match-any** nodes (prefix `*`) capture everything that is left.
//!
//! Siblings never share a first byte (`label`), which keeps child selection
//! deterministic.
//!
//! ## Lookup order
//!
//! At every node the walk tries the static child for the next byte first,
//! then the param child, then the match-any child. A dead end unwinds to the
//! nearest alternative that has not been tried yet, dropping any parameter
//! values captured below it.

use std::fmt::Write as _;
use std::mem;

use super::endpoint::RouteEntry;
use super::method::{MethodHandler, MethodKind};
use super::params::Params;

/// Kind of a tree node, fixed at creation except when a split repurposes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Static,
    Param,
    MatchAny,
}

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(u32);

impl NodeId {
    const ROOT: NodeId = NodeId(0);

    #[inline]
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// Node in the radix tree.
#[derive(Debug, Clone)]
pub(crate) struct Node<H> {
    pub kind: NodeKind,
    /// First byte of `prefix`.
    pub label: u8,
    /// Bytes consumed relative to the parent. May end inside a multi-byte
    /// character; captures always start on a character boundary.
    pub prefix: Vec<u8>,
    pub children: Vec<NodeId>,
    /// Non-empty only on route termini.
    pub handlers: MethodHandler<RouteEntry<H>>,
}

impl<H> Node<H> {
    fn new(kind: NodeKind, prefix: &[u8]) -> Self {
        Self {
            kind,
            label: prefix.first().copied().unwrap_or(0),
            prefix: prefix.to_vec(),
            children: Vec::new(),
            handlers: MethodHandler::new(),
        }
    }
}

/// Result of a tree walk.
pub(crate) enum Walk<'t, H> {
    /// A node serves the method; `params` holds its captures.
    Found(&'t RouteEntry<H>),
    /// The path exists, but only for other methods.
    MethodNotAllowed(&'t MethodHandler<RouteEntry<H>>),
    NotFound,
}

/// Radix tree of route patterns.
#[derive(Debug, Clone)]
pub(crate) struct RadixTree<H> {
    nodes: Vec<Node<H>>,
}

impl<H> Default for RadixTree<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> RadixTree<H> {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Static, b"")],
        }
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node<H> {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node<H> {
        &mut self.nodes[id.index()]
    }

    /// Number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True until the first insertion.
    pub fn is_empty(&self) -> bool {
        self.node(NodeId::ROOT).prefix.is_empty()
    }

    fn push_node(&mut self, node: Node<H>) -> NodeId {
        // The arena cannot outgrow u32: every node consumes at least one byte of
        // some registered pattern.
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    fn add_child(&mut self, parent: NodeId, node: Node<H>) -> NodeId {
        let id = self.push_node(node);
        self.node_mut(parent).children.push(id);
        id
    }

    fn child_with_label(&self, parent: NodeId, label: u8) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).label == label)
    }

    fn child_with_kind(&self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| self.node(c).kind == kind)
    }

    fn static_child(&self, parent: NodeId, label: u8) -> Option<NodeId> {
        self.node(parent)
            .children
            .iter()
            .copied()
            .find(|&c| {
                let child = self.node(c);
                child.kind == NodeKind::Static && child.label == label
            })
    }

    /// Insert `path` (params already collapsed to `:`) as a node of `kind`.
    ///
    /// With `handler` set, the node reached becomes a route terminus for that
    /// method; the entry it replaces, if any, is returned. Without a handler
    /// the call only guarantees the node exists (an intermediate segment).
    pub fn insert(
        &mut self,
        path: &[u8],
        kind: NodeKind,
        handler: Option<(MethodKind, RouteEntry<H>)>,
    ) -> Option<RouteEntry<H>> {
        let mut current = NodeId::ROOT;
        let mut search = path;

        loop {
            let node = self.node(current);

            if node.prefix.is_empty() {
                // First insertion: the root adopts the whole path.
                let node = self.node_mut(current);
                node.label = search.first().copied().unwrap_or(0);
                node.prefix = search.to_vec();
                if let Some((method, entry)) = handler {
                    node.kind = kind;
                    return node.handlers.add_handler(method, entry);
                }
                return None;
            }

            let prefix_len = node.prefix.len();
            let lcp = longest_common_prefix(search, &node.prefix);

            if lcp < prefix_len {
                // Split: the unmatched tail of this node moves into a new child
                // that inherits everything the node carried.
                let node = self.node_mut(current);
                let tail = node.prefix.split_off(lcp);
                let split = Node {
                    kind: node.kind,
                    label: tail[0],
                    prefix: tail,
                    children: mem::take(&mut node.children),
                    handlers: mem::take(&mut node.handlers),
                };
                node.kind = NodeKind::Static;
                self.add_child(current, split);

                if lcp == search.len() {
                    let node = self.node_mut(current);
                    node.kind = kind;
                    if let Some((method, entry)) = handler {
                        node.handlers.add_handler(method, entry);
                    }
                } else {
                    let mut child = Node::new(kind, &search[lcp..]);
                    if let Some((method, entry)) = handler {
                        child.handlers.add_handler(method, entry);
                    }
                    self.add_child(current, child);
                }
                return None;
            }

            if lcp < search.len() {
                search = &search[lcp..];
                if let Some(child) = self.child_with_label(current, search[0]) {
                    current = child;
                    continue;
                }
                let mut child = Node::new(kind, search);
                if let Some((method, entry)) = handler {
                    child.handlers.add_handler(method, entry);
                }
                self.add_child(current, child);
                return None;
            }

            // The node already exists for this exact path.
            return match handler {
                Some((method, entry)) => self.node_mut(current).handlers.add_handler(method, entry),
                None => None,
            };
        }
    }

    /// Match `path` for `method`, writing captures into `params`.
    ///
    /// `method` is `None` for methods that can never be routed; the walk then
    /// only decides between not-found and method-not-allowed.
    pub fn find<'t>(
        &'t self,
        method: Option<MethodKind>,
        path: &str,
        params: &mut Params,
    ) -> Walk<'t, H> {
        if self.is_empty() {
            return Walk::NotFound;
        }
        let mut walker = Walker {
            tree: self,
            method,
            path,
            params,
            not_allowed: None,
        };
        match walker.visit(NodeId::ROOT, 0) {
            Some(entry) => Walk::Found(entry),
            None => match walker.not_allowed {
                Some(id) => {
                    walker.params.truncate(0);
                    Walk::MethodNotAllowed(&self.node(id).handlers)
                }
                None => Walk::NotFound,
            },
        }
    }

    /// True when no node has two children with the same first byte.
    #[cfg(test)]
    pub fn labels_are_unique(&self) -> bool {
        self.nodes.iter().all(|node| {
            node.children.iter().enumerate().all(|(i, &a)| {
                node.children[i + 1..]
                    .iter()
                    .all(|&b| self.node(a).label != self.node(b).label)
            })
        })
    }

    /// Indented rendering of the tree, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.render_node(NodeId::ROOT, 0, &mut out);
        out
    }

    fn render_node(&self, id: NodeId, depth: usize, out: &mut String) {
        let node = self.node(id);
        let methods: Vec<String> = node
            .handlers
            .allowed_methods()
            .map(|m| m.to_string())
            .collect();
        let _ = writeln!(
            out,
            "{:indent$}{} {:?}{}",
            "",
            String::from_utf8_lossy(&node.prefix),
            node.kind,
            if methods.is_empty() {
                String::new()
            } else {
                format!(" [{}]", methods.join(","))
            },
            indent = depth * 2
        );
        for &child in &node.children {
            self.render_node(child, depth + 1, out);
        }
    }
}

/// Depth-first lookup state.
struct Walker<'t, 'p, 'b, H> {
    tree: &'t RadixTree<H>,
    method: Option<MethodKind>,
    path: &'p str,
    params: &'b mut Params,
    /// First fully matching node that lacked the method.
    not_allowed: Option<NodeId>,
}

impl<'t, 'p, H> Walker<'t, 'p, '_, H> {
    /// Try to finish the match from node `id` with `pos` bytes of the path
    /// consumed so far.
    fn visit(&mut self, id: NodeId, pos: usize) -> Option<&'t RouteEntry<H>> {
        let tree = self.tree;
        let path = self.path;
        let node = tree.node(id);
        let rest = &path.as_bytes()[pos..];
        let mark = self.params.len();

        let pos = match node.kind {
            NodeKind::Static => {
                if !rest.starts_with(&node.prefix) {
                    return None;
                }
                pos + node.prefix.len()
            }
            NodeKind::Param => {
                let end = rest.iter().position(|&b| b == b'/').unwrap_or(rest.len());
                if end == 0 {
                    return None;
                }
                self.params.push(pos, pos + end);
                pos + end
            }
            NodeKind::MatchAny => {
                self.params.push(pos, path.len());
                path.len()
            }
        };

        if pos == path.len() && !node.handlers.is_empty() {
            if let Some(entry) = self.method.and_then(|m| node.handlers.find_handler(m)) {
                return Some(entry);
            }
            if self.not_allowed.is_none() {
                self.not_allowed = Some(id);
            }
        }

        if let Some(&next) = path.as_bytes().get(pos) {
            if let Some(child) = tree.static_child(id, next) {
                if let Some(entry) = self.visit(child, pos) {
                    return Some(entry);
                }
            }
            if let Some(child) = tree.child_with_kind(id, NodeKind::Param) {
                if let Some(entry) = self.visit(child, pos) {
                    return Some(entry);
                }
            }
        }
        if let Some(child) = tree.child_with_kind(id, NodeKind::MatchAny) {
            if let Some(entry) = self.visit(child, pos) {
                return Some(entry);
            }
        }

        self.params.truncate(mark);
        None
    }
}

fn longest_common_prefix(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::endpoint::Endpoint;
    use crate::router::pattern;
    use http::Method;

    fn entry(pattern: &str, handler: &'static str) -> RouteEntry<&'static str> {
        let parsed = pattern::parse(pattern).unwrap();
        RouteEntry {
            endpoint: Endpoint::new(handler, handler),
            pattern: parsed.pattern,
            param_names: parsed.param_names,
        }
    }

    /// Register `pattern` the way the router does, forcing literal patterns
    /// into the tree as well.
    fn add(tree: &mut RadixTree<&'static str>, method: Method, pattern: &str, handler: &'static str) {
        let parsed = pattern::parse(pattern).unwrap();
        let kind = MethodKind::from_method(&method).unwrap();
        let e = entry(pattern, handler);
        if parsed.is_static() {
            tree.insert(parsed.pattern.as_bytes(), NodeKind::Static, Some((kind, e)));
            return;
        }
        let (last, intermediate) = parsed.steps.split_last().unwrap();
        for step in intermediate {
            tree.insert(&step.path, step.kind, None);
        }
        tree.insert(&last.path, last.kind, Some((kind, e)));
    }

    fn lookup<'t>(
        tree: &'t RadixTree<&'static str>,
        method: Method,
        path: &'t str,
    ) -> (Option<&'static str>, Vec<&'t str>) {
        let mut params = Params::new();
        let kind = MethodKind::from_method(&method);
        match tree.find(kind, path, &mut params) {
            Walk::Found(e) => (Some(e.endpoint.handler), params.values(path).collect()),
            _ => (None, Vec::new()),
        }
    }

    #[test]
    fn test_first_insert_becomes_root() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/users", "list_users");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.node(NodeId::ROOT).prefix, b"/users");
        assert_eq!(lookup(&tree, Method::GET, "/users").0, Some("list_users"));
    }

    #[test]
    fn test_split_on_shared_prefix() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/users", "list_users");
        add(&mut tree, Method::GET, "/uploads", "list_uploads");

        let root = tree.node(NodeId::ROOT);
        assert_eq!(root.prefix, b"/u");
        assert!(root.handlers.is_empty());
        assert_eq!(root.children.len(), 2);
        assert!(tree.labels_are_unique());

        assert_eq!(lookup(&tree, Method::GET, "/users").0, Some("list_users"));
        assert_eq!(lookup(&tree, Method::GET, "/uploads").0, Some("list_uploads"));
        assert_eq!(lookup(&tree, Method::GET, "/u").0, None);
    }

    #[test]
    fn test_split_where_insert_ends_on_branch_point() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/users/all", "all_users");
        add(&mut tree, Method::GET, "/users", "list_users");

        assert_eq!(tree.node(NodeId::ROOT).prefix, b"/users");
        assert_eq!(lookup(&tree, Method::GET, "/users").0, Some("list_users"));
        assert_eq!(lookup(&tree, Method::GET, "/users/all").0, Some("all_users"));
    }

    #[test]
    fn test_param_and_static_siblings() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/users/:id", "get_user");
        add(&mut tree, Method::GET, "/users/new", "new_user");

        assert!(tree.labels_are_unique());
        assert_eq!(lookup(&tree, Method::GET, "/users/new").0, Some("new_user"));
        let (handler, params) = lookup(&tree, Method::GET, "/users/42");
        assert_eq!(handler, Some("get_user"));
        assert_eq!(params, vec!["42"]);
    }

    #[test]
    fn test_static_dead_end_falls_back_to_param() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/users/new/form", "new_form");
        add(&mut tree, Method::GET, "/users/:id", "get_user");

        let (handler, params) = lookup(&tree, Method::GET, "/users/new");
        assert_eq!(handler, Some("get_user"));
        assert_eq!(params, vec!["new"]);
    }

    #[test]
    fn test_empty_segment_is_not_a_param() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/users/:id", "get_user");
        assert_eq!(lookup(&tree, Method::GET, "/users/").0, None);
    }

    #[test]
    fn test_match_any_accepts_empty_remainder() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/files/*", "files");
        let (handler, params) = lookup(&tree, Method::GET, "/files/");
        assert_eq!(handler, Some("files"));
        assert_eq!(params, vec![""]);
    }

    #[test]
    fn test_multibyte_prefixes_split_on_bytes() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/café/:id", "cafe");
        add(&mut tree, Method::GET, "/cafè/:id", "cafe_grave");

        assert!(tree.labels_are_unique());
        assert_eq!(lookup(&tree, Method::GET, "/café/1").0, Some("cafe"));
        let (handler, params) = lookup(&tree, Method::GET, "/cafè/ü");
        assert_eq!(handler, Some("cafe_grave"));
        assert_eq!(params, vec!["ü"]);
    }

    #[test]
    fn test_method_not_allowed_reports_node_methods() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/items/:id", "get_item");
        add(&mut tree, Method::PUT, "/items/:id", "put_item");

        let mut params = Params::new();
        match tree.find(MethodKind::from_method(&Method::POST), "/items/1", &mut params) {
            Walk::MethodNotAllowed(handlers) => {
                let allowed: Vec<Method> = handlers.allowed_methods().collect();
                assert_eq!(allowed, vec![Method::GET, Method::PUT]);
            }
            _ => panic!("expected method not allowed"),
        }
        assert!(params.is_empty());
    }

    #[test]
    fn test_render_lists_nodes() {
        let mut tree = RadixTree::new();
        add(&mut tree, Method::GET, "/a/:x", "a");
        let rendered = tree.render();
        assert!(rendered.contains("Param [GET]"));
    }
}
