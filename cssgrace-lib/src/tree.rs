//! Mutable stylesheet tree.
//!
//! Nodes live in an arena owned by [`Stylesheet`] and are addressed by [`NodeId`].
//! Every node remembers its parent, so rules can look at and rewrite their
//! neighbours. Removing a node only detaches it; ids handed out earlier stay valid,
//! which is what lets a walk over a snapshot of ids survive insertions and removals.

use std::fmt;

/// Handle to a node inside a [`Stylesheet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Formatting of the stylesheet itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootRaws {
    /// Text after the last node.
    pub after: Option<String>,
    pub semicolon: Option<bool>,
}

/// Formatting of a rule or an at-rule. `None` means "not recorded"; the printer
/// falls back to what the rest of the stylesheet does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockRaws {
    /// Whitespace before the node.
    pub before: Option<String>,
    /// Text between the prelude and `{` (or `;` for a statement at-rule).
    pub between: Option<String>,
    /// Text between the last child and `}`.
    pub after: Option<String>,
    /// Whether the last non-comment child is followed by `;`.
    pub semicolon: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclRaws {
    pub before: Option<String>,
    /// The colon and the whitespace around it.
    pub between: Option<String>,
    /// Exact spelling of the `!important` suffix, including whitespace up to `;`.
    pub important: Option<String>,
    /// Source text of the value when it differs from the clean one.
    pub value: Option<RawValue>,
}

/// A value as written (with comments and trailing whitespace) next to the clean
/// value it was read as. The printer only uses `raw` while `value` still matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub value: String,
    pub raw: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentRaws {
    pub before: Option<String>,
    /// Whitespace between `/*` and the text.
    pub left: Option<String>,
    /// Whitespace between the text and `*/`.
    pub right: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// e.g. "a::before", ".nav > li"
    pub selector: String,
    pub raws: BlockRaws,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtRule {
    /// Name without the `@`, e.g. "media".
    pub name: String,
    pub params: String,
    /// `@media {}` has a block, `@import url(a.css);` does not.
    pub has_block: bool,
    /// Whitespace between the name and the params.
    pub after_name: Option<String>,
    pub raws: BlockRaws,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    /// Value without the `!important` suffix and comments.
    pub value: String,
    pub important: bool,
    pub raws: DeclRaws,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub raws: CommentRaws,
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Root(RootRaws),
    Rule(Rule),
    AtRule(AtRule),
    Decl(Declaration),
    Comment(Comment),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed (or hand-built) stylesheet.
#[derive(Debug, Clone)]
pub struct Stylesheet {
    nodes: Vec<NodeData>,
}

impl Rule {
    pub fn new(selector: impl Into<String>) -> Self {
        Rule {
            selector: selector.into(),
            raws: BlockRaws::default(),
        }
    }
}

impl AtRule {
    pub fn new(name: impl Into<String>, params: impl Into<String>, has_block: bool) -> Self {
        AtRule {
            name: name.into(),
            params: params.into(),
            has_block,
            after_name: None,
            raws: BlockRaws::default(),
        }
    }
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Declaration {
            prop: prop.into(),
            value: value.into(),
            important: false,
            raws: DeclRaws::default(),
        }
    }

    /// A declaration that reuses an existing `before` formatting.
    pub fn with_before(
        prop: impl Into<String>,
        value: impl Into<String>,
        before: Option<String>,
    ) -> Self {
        let mut decl = Declaration::new(prop, value);
        decl.raws.before = before;
        decl
    }

    /// True when the property and value are exactly `prop` and `value`.
    pub fn is(&self, prop: &str, value: &str) -> bool {
        self.prop == prop && self.value == value
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.prop, self.value)?;
        if self.important {
            write!(f, " !important")?;
        }
        Ok(())
    }
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Comment {
            text: text.into(),
            raws: CommentRaws::default(),
        }
    }
}

impl From<Rule> for NodeKind {
    fn from(rule: Rule) -> Self {
        NodeKind::Rule(rule)
    }
}

impl From<AtRule> for NodeKind {
    fn from(at_rule: AtRule) -> Self {
        NodeKind::AtRule(at_rule)
    }
}

impl From<Declaration> for NodeKind {
    fn from(decl: Declaration) -> Self {
        NodeKind::Decl(decl)
    }
}

impl From<Comment> for NodeKind {
    fn from(comment: Comment) -> Self {
        NodeKind::Comment(comment)
    }
}

impl NodeKind {
    /// Formatting text in front of the node, if recorded.
    pub fn before(&self) -> Option<&str> {
        match self {
            NodeKind::Root(_) => None,
            NodeKind::Rule(rule) => rule.raws.before.as_deref(),
            NodeKind::AtRule(at_rule) => at_rule.raws.before.as_deref(),
            NodeKind::Decl(decl) => decl.raws.before.as_deref(),
            NodeKind::Comment(comment) => comment.raws.before.as_deref(),
        }
    }

    /// Whether nodes of this kind hold children.
    pub fn is_container(&self) -> bool {
        match self {
            NodeKind::Root(_) | NodeKind::Rule(_) => true,
            NodeKind::AtRule(at_rule) => at_rule.has_block,
            NodeKind::Decl(_) | NodeKind::Comment(_) => false,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, NodeKind::Comment(_))
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        Self::new()
    }
}

impl Stylesheet {
    /// An empty stylesheet holding only its root.
    pub fn new() -> Self {
        Stylesheet {
            nodes: vec![NodeData {
                kind: NodeKind::Root(RootRaws::default()),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Allocate a detached node. Attach it with [`append`](Self::append) or the
    /// `insert_*` methods.
    pub fn create(&mut self, kind: impl Into<NodeKind>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind: kind.into(),
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.0].kind
    }

    pub fn decl(&self, id: NodeId) -> Option<&Declaration> {
        match self.kind(id) {
            NodeKind::Decl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn decl_mut(&mut self, id: NodeId) -> Option<&mut Declaration> {
        match self.kind_mut(id) {
            NodeKind::Decl(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn rule(&self, id: NodeId) -> Option<&Rule> {
        match self.kind(id) {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn rule_mut(&mut self, id: NodeId) -> Option<&mut Rule> {
        match self.kind_mut(id) {
            NodeKind::Rule(rule) => Some(rule),
            _ => None,
        }
    }

    pub fn at_rule(&self, id: NodeId) -> Option<&AtRule> {
        match self.kind(id) {
            NodeKind::AtRule(at_rule) => Some(at_rule),
            _ => None,
        }
    }

    pub fn comment(&self, id: NodeId) -> Option<&Comment> {
        match self.kind(id) {
            NodeKind::Comment(comment) => Some(comment),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// A node is attached while it still sits in some parent's child list.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root() || self.parent(id).is_some()
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Snapshot of the immediate children, safe to hold while mutating the tree.
    pub fn each(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id).to_vec()
    }

    /// Immediate declaration children of `id`, in document order.
    pub fn decls(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|&child| self.decl(child).is_some())
            .collect()
    }

    pub fn index(&self, id: NodeId) -> Option<usize> {
        let parent = self.parent(id)?;
        self.children(parent).iter().position(|&child| child == id)
    }

    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index(id)?;
        self.children(parent).get(index + 1).copied()
    }

    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.index(id)?;
        index
            .checked_sub(1)
            .and_then(|i| self.children(parent).get(i).copied())
    }

    /// Add `child` as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if !self.kind(parent).is_container() {
            log::warn!("cannot append {:?} to non-container {:?}", child, parent);
            return;
        }
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    /// Put `node` right after `anchor`. Returns false if `anchor` is detached.
    pub fn insert_after(&mut self, anchor: NodeId, node: NodeId) -> bool {
        self.insert_relative(anchor, node, 1)
    }

    /// Put `node` right before `anchor`. Returns false if `anchor` is detached.
    pub fn insert_before(&mut self, anchor: NodeId, node: NodeId) -> bool {
        self.insert_relative(anchor, node, 0)
    }

    fn insert_relative(&mut self, anchor: NodeId, node: NodeId, offset: usize) -> bool {
        if anchor == node {
            return false;
        }
        self.detach(node);
        let (Some(parent), Some(index)) = (self.parent(anchor), self.index(anchor)) else {
            return false;
        };
        self.nodes[node.0].parent = Some(parent);
        self.nodes[parent.0].children.insert(index + offset, node);
        true
    }

    /// Detach `id` from its parent. The node and its subtree stay readable.
    pub fn remove(&mut self, id: NodeId) {
        self.detach(id);
    }

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&child| child != id);
        }
    }

    /// Every declaration below `id` at any depth, in document order.
    pub fn walk_decls(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id, |kind| matches!(kind, NodeKind::Decl(_)), |_| true)
    }

    /// Declarations below `id` at any depth whose closest style rule is `id`:
    /// at-rules are entered, nested style rules are not.
    pub fn rule_decls(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(
            id,
            |kind| matches!(kind, NodeKind::Decl(_)),
            |kind| !matches!(kind, NodeKind::Rule(_)),
        )
    }

    /// Every style rule below `id` at any depth (inside at-rules and nested
    /// rules too), in document order.
    pub fn walk_rules(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id, |kind| matches!(kind, NodeKind::Rule(_)), |_| true)
    }

    fn walk(
        &self,
        id: NodeId,
        keep: impl Fn(&NodeKind) -> bool,
        descend: impl Fn(&NodeKind) -> bool,
    ) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            let kind = self.kind(node);
            if keep(kind) {
                found.push(node);
            }
            if descend(kind) {
                stack.extend(self.children(node).iter().rev().copied());
            }
        }
        found
    }
}
