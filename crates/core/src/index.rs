//! Arena-backed container index.
//!
//! `AstIndex` owns every node of a model resource and maintains the two
//! relations the rest of the crate relies on: the containment tree
//! (parent pointers) and the reverse reference index (`uses`), which maps
//! a declaration to the nodes holding a cross reference to it. Both are
//! updated by every mutating primitive, so `change` runs in O(uses).
//!
//! Nodes are never freed individually. `remove` and `replace` detach a
//! subtree; detached nodes keep their handles valid until the index is
//! dropped.

use crate::ast::*;
use crate::error::{ExprError, ExprResult};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone)]
struct Slot {
    node: Node,
    parent: Option<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct AstIndex {
    slots: Vec<Slot>,
    uses: HashMap<NodeId, BTreeSet<NodeId>>,
}

impl AstIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    // ── Allocation ──────────────────────────────────────────────────

    /// Allocates `node`. Its children must be detached; they become
    /// contained by the new node.
    pub fn add(&mut self, node: Node) -> ExprResult<NodeId> {
        let mut seen = BTreeSet::new();
        for child in node.children() {
            if !seen.insert(child) {
                return Err(ExprError::DuplicateChild { child });
            }
            let slot = self.slot(child)?;
            if let Some(container) = slot.parent {
                return Err(ExprError::AlreadyContained {
                    node: child,
                    container,
                });
            }
        }
        for target in node.cross_references() {
            self.slot(target)?;
        }
        let id = NodeId(self.slots.len() as u32);
        for child in node.children() {
            self.slots[child.as_usize()].parent = Some(id);
        }
        for target in node.cross_references() {
            self.uses.entry(target).or_default().insert(id);
        }
        self.slots.push(Slot { node, parent: None });
        Ok(id)
    }

    pub fn add_expr(&mut self, expression: Expression) -> ExprResult<NodeId> {
        self.add(Node::Expression(expression))
    }

    pub fn add_type(&mut self, type_def: TypeDefinition) -> ExprResult<NodeId> {
        self.add(Node::Type(type_def))
    }

    pub fn add_decl(&mut self, name: impl Into<String>, kind: DeclarationKind) -> ExprResult<NodeId> {
        self.add(Node::Declaration(Declaration {
            name: name.into(),
            kind,
        }))
    }

    // ── Accessors ───────────────────────────────────────────────────

    fn slot(&self, id: NodeId) -> ExprResult<&Slot> {
        self.slots
            .get(id.as_usize())
            .ok_or(ExprError::UnknownNode { node: id })
    }

    pub fn node(&self, id: NodeId) -> ExprResult<&Node> {
        Ok(&self.slot(id)?.node)
    }

    /// Mutable access for attribute edits. Containment and cross reference
    /// slots must be changed through the index primitives instead, or the
    /// parent and `uses` relations go stale.
    fn node_mut(&mut self, id: NodeId) -> ExprResult<&mut Node> {
        self.slots
            .get_mut(id.as_usize())
            .map(|s| &mut s.node)
            .ok_or(ExprError::UnknownNode { node: id })
    }

    pub fn expr(&self, id: NodeId) -> ExprResult<&Expression> {
        match self.node(id)? {
            Node::Expression(e) => Ok(e),
            other => Err(ExprError::unsupported(id, other.variant_name(), "expression")),
        }
    }

    pub fn decl(&self, id: NodeId) -> ExprResult<&Declaration> {
        match self.node(id)? {
            Node::Declaration(d) => Ok(d),
            other => Err(ExprError::unsupported(id, other.variant_name(), "declaration")),
        }
    }

    pub fn type_def(&self, id: NodeId) -> ExprResult<&TypeDefinition> {
        match self.node(id)? {
            Node::Type(t) => Ok(t),
            other => Err(ExprError::unsupported(id, other.variant_name(), "type")),
        }
    }

    pub fn package(&self, id: NodeId) -> ExprResult<&Package> {
        match self.node(id)? {
            Node::Package(p) => Ok(p),
            other => Err(ExprError::unsupported(id, other.variant_name(), "package")),
        }
    }

    /// Mutable annotation list of a variable declaration.
    pub fn annotations_mut(&mut self, variable: NodeId) -> ExprResult<&mut Vec<VariableAnnotation>> {
        match self.node_mut(variable)? {
            Node::Declaration(Declaration {
                kind: DeclarationKind::Variable { annotations, .. },
                ..
            }) => Ok(annotations),
            other => {
                let found = other.variant_name();
                Err(ExprError::unsupported(variable, found, "variable declaration"))
            }
        }
    }

    // ── Containment queries ─────────────────────────────────────────

    pub fn container(&self, id: NodeId) -> ExprResult<Option<NodeId>> {
        Ok(self.slot(id)?.parent)
    }

    /// `id` itself or its nearest ancestor satisfying `pred`.
    pub fn self_or_container_of(
        &self,
        id: NodeId,
        pred: impl Fn(&Node) -> bool,
    ) -> ExprResult<Option<NodeId>> {
        let mut current = Some(id);
        while let Some(n) = current {
            let slot = self.slot(n)?;
            if pred(&slot.node) {
                return Ok(Some(n));
            }
            current = slot.parent;
        }
        Ok(None)
    }

    /// Nearest strict ancestor of `id` satisfying `pred`.
    pub fn container_of(
        &self,
        id: NodeId,
        pred: impl Fn(&Node) -> bool,
    ) -> ExprResult<Option<NodeId>> {
        match self.container(id)? {
            Some(parent) => self.self_or_container_of(parent, pred),
            None => Ok(None),
        }
    }

    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> ExprResult<bool> {
        let mut current = Some(id);
        while let Some(n) = current {
            if n == ancestor {
                return Ok(true);
            }
            current = self.slot(n)?.parent;
        }
        Ok(false)
    }

    /// `child` may be placed under `target`: it is detached and does not
    /// contain `target`.
    pub(crate) fn ensure_attachable(&self, child: NodeId, target: NodeId) -> ExprResult<()> {
        if let Some(container) = self.slot(child)?.parent {
            return Err(ExprError::AlreadyContained {
                node: child,
                container,
            });
        }
        if self.is_within(target, child)? {
            return Err(ExprError::ContainmentCycle {
                node: child,
                container: target,
            });
        }
        Ok(())
    }

    /// Pre-order walk of the containment subtree rooted at `id`, self
    /// included.
    pub fn self_and_all_contents(&self, id: NodeId) -> ExprResult<Vec<NodeId>> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            let node = self.node(n)?;
            out.push(n);
            stack.extend(node.children().into_iter().rev());
        }
        Ok(out)
    }

    pub fn self_and_all_contents_of(
        &self,
        id: NodeId,
        pred: impl Fn(&Node) -> bool,
    ) -> ExprResult<Vec<NodeId>> {
        let all = self.self_and_all_contents(id)?;
        let mut out = Vec::new();
        for n in all {
            if pred(self.node(n)?) {
                out.push(n);
            }
        }
        Ok(out)
    }

    /// Nodes holding a cross reference to `target`.
    pub fn uses(&self, target: NodeId) -> BTreeSet<NodeId> {
        self.uses.get(&target).cloned().unwrap_or_default()
    }

    // ── Structural equality and copying ─────────────────────────────

    /// Structural equality: same variants and attributes, pairwise equal
    /// children, identical cross reference targets.
    pub fn helper_equals(&self, a: NodeId, b: NodeId) -> bool {
        if a == b {
            return true;
        }
        let (Ok(left), Ok(right)) = (self.node(a), self.node(b)) else {
            return false;
        };
        if !left.same_shape(right) || left.cross_references() != right.cross_references() {
            return false;
        }
        let (lc, rc) = (left.children(), right.children());
        lc.len() == rc.len()
            && lc
                .iter()
                .zip(rc.iter())
                .all(|(l, r)| self.helper_equals(*l, *r))
    }

    /// Deep copy of the subtree rooted at `id`. References pointing into
    /// the copied subtree are redirected to the copies; references leaving
    /// it are kept. The copy is detached.
    pub fn clone_subtree(&mut self, id: NodeId) -> ExprResult<NodeId> {
        let originals = self.self_and_all_contents(id)?;
        let mut mapping: HashMap<NodeId, NodeId> = HashMap::new();
        let base = self.slots.len() as u32;
        for (offset, original) in originals.iter().enumerate() {
            mapping.insert(*original, NodeId(base + offset as u32));
        }
        for original in &originals {
            let mut node = self.node(*original)?.clone();
            for slot in node.child_slots_mut() {
                // every child of a subtree node is itself in the subtree
                if let Some(copy) = mapping.get(&*slot) {
                    *slot = *copy;
                }
            }
            for slot in node.cross_reference_slots_mut() {
                if let Some(copy) = mapping.get(&*slot) {
                    *slot = *copy;
                }
            }
            let copy = NodeId(self.slots.len() as u32);
            for target in node.cross_references() {
                self.uses.entry(target).or_default().insert(copy);
            }
            self.slots.push(Slot { node, parent: None });
        }
        for i in base as usize..self.slots.len() {
            let parent = NodeId(i as u32);
            for child in self.slots[i].node.children() {
                self.slots[child.as_usize()].parent = Some(parent);
            }
        }
        Ok(mapping[&id])
    }

    // ── Mutation ────────────────────────────────────────────────────

    /// Puts `new` into the containment slot of `old`; `old` is detached.
    pub fn replace(&mut self, new: NodeId, old: NodeId) -> ExprResult<()> {
        if new == old {
            return Ok(());
        }
        let Some(parent) = self.slot(old)?.parent else {
            if let Some(container) = self.slot(new)?.parent {
                return Err(ExprError::AlreadyContained {
                    node: new,
                    container,
                });
            }
            return Ok(());
        };
        self.ensure_attachable(new, parent)?;
        for slot in self.node_mut(parent)?.child_slots_mut() {
            if *slot == old {
                *slot = new;
            }
        }
        self.slots[new.as_usize()].parent = Some(parent);
        self.slots[old.as_usize()].parent = None;
        Ok(())
    }

    /// Detaches `id` from a list or optional slot of its container.
    pub fn remove(&mut self, id: NodeId) -> ExprResult<()> {
        let Some(parent) = self.slot(id)?.parent else {
            return Ok(());
        };
        if !self.node_mut(parent)?.remove_child(id) {
            return Err(ExprError::NotRemovable { node: id });
        }
        self.slots[id.as_usize()].parent = None;
        Ok(())
    }

    /// Appends a detached `child` to the list slot of `parent` that accepts
    /// it.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> ExprResult<()> {
        self.ensure_attachable(child, parent)?;
        let child_is_decl = matches!(self.node(child)?, Node::Declaration(_));
        let list = match self.node_mut(parent)? {
            Node::Package(p) if child_is_decl => &mut p.declarations,
            Node::Package(p) => &mut p.expressions,
            Node::Type(TypeDefinition::Enumeration { literals }) => literals,
            Node::Type(TypeDefinition::Record { fields }) => fields,
            Node::Expression(Expression::ArrayLiteral { operands })
            | Node::Expression(Expression::Multiary { operands, .. }) => operands,
            Node::Expression(Expression::RecordLiteral {
                field_assignments, ..
            }) => field_assignments,
            other => {
                let found = other.variant_name();
                return Err(ExprError::unsupported(parent, found, "node with a list slot"));
            }
        };
        list.push(child);
        self.slots[child.as_usize()].parent = Some(parent);
        Ok(())
    }

    /// Sets (or replaces) the initializer of a variable declaration.
    pub fn set_initializer(&mut self, variable: NodeId, expression: NodeId) -> ExprResult<()> {
        self.ensure_attachable(expression, variable)?;
        let previous = match self.node_mut(variable)? {
            Node::Declaration(Declaration {
                kind: DeclarationKind::Variable { initializer, .. },
                ..
            }) => initializer.replace(expression),
            other => {
                let found = other.variant_name();
                return Err(ExprError::unsupported(variable, found, "variable declaration"));
            }
        };
        if let Some(previous) = previous {
            self.slots[previous.as_usize()].parent = None;
        }
        self.slots[expression.as_usize()].parent = Some(variable);
        Ok(())
    }

    /// Redirects every cross reference to `from` held by a node under
    /// `within` so that it points to `to`. Returns the number of
    /// redirected reference sites.
    pub fn change(&mut self, to: NodeId, from: NodeId, within: NodeId) -> ExprResult<usize> {
        self.slot(to)?;
        self.slot(within)?;
        if to == from {
            return Ok(0);
        }
        let mut changed = 0;
        for site in self.uses(from) {
            if !self.is_within(site, within)? {
                continue;
            }
            for slot in self.node_mut(site)?.cross_reference_slots_mut() {
                if *slot == from {
                    *slot = to;
                }
            }
            if let Some(sites) = self.uses.get_mut(&from) {
                sites.remove(&site);
            }
            self.uses.entry(to).or_default().insert(site);
            changed += 1;
        }
        tracing::debug!(%from, %to, %within, changed, "redirected references");
        Ok(changed)
    }
}
