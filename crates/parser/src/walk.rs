//! Child enumeration for syntax tree nodes.
//!
//! `#[derive(WalkAst)]` implements [`Walk`] for every node: structs report each
//! named field in declaration order, enums over node types delegate to the
//! wrapped node. Consumers implement [`Visitor`] and receive one callback per
//! field, so they never need to know the concrete node types.

use std::fmt;
use std::sync::Arc;

use crate::ast::{ChanDir, LitKind, SpecType};
use crate::position::Position;
use crate::token::Token;

/// Grammar category and concrete kind of a node, e.g. `Stmt` / `IfStmt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKind {
    pub category: Option<&'static str>,
    pub name: &'static str,
}

pub trait Walk {
    fn kind(&self) -> NodeKind;

    /// Reports every field of this node to `v`.
    fn walk<'ast>(&'ast self, v: &mut dyn Visitor<'ast>);
}

pub trait Visitor<'ast> {
    fn visit_node(&mut self, field: &'static str, node: &'ast dyn Walk);

    fn visit_list(&mut self, field: &'static str, nodes: &mut dyn Iterator<Item = &'ast dyn Walk>) {
        for node in nodes {
            self.visit_node(field, node);
        }
    }

    fn visit_leaf(&mut self, _field: &'static str, _value: &'ast dyn fmt::Display) {}

    fn visit_pos(&mut self, _field: &'static str, _pos: &'ast Position) {}

    fn visit_absent(&mut self, _field: &'static str) {}
}

/// How a struct field reports itself. Nodes report as nodes, containers
/// unwrap, and plain values report as leaves.
pub trait FieldWalk {
    fn walk_field<'ast>(&'ast self, name: &'static str, v: &mut dyn Visitor<'ast>);
}

impl<T: FieldWalk> FieldWalk for Option<T> {
    #[inline]
    fn walk_field<'ast>(&'ast self, name: &'static str, v: &mut dyn Visitor<'ast>) {
        match self {
            Some(x) => x.walk_field(name, v),
            None => v.visit_absent(name),
        }
    }
}

impl<T: FieldWalk> FieldWalk for Box<T> {
    #[inline]
    fn walk_field<'ast>(&'ast self, name: &'static str, v: &mut dyn Visitor<'ast>) {
        (**self).walk_field(name, v);
    }
}

impl<T: Walk> FieldWalk for Vec<T> {
    #[inline]
    fn walk_field<'ast>(&'ast self, name: &'static str, v: &mut dyn Visitor<'ast>) {
        v.visit_list(name, &mut self.iter().map(|n| n as &dyn Walk));
    }
}

impl FieldWalk for Position {
    #[inline]
    fn walk_field<'ast>(&'ast self, name: &'static str, v: &mut dyn Visitor<'ast>) {
        v.visit_pos(name, self);
    }
}

/// Enum variants may box their node.
impl<T: Walk> Walk for Box<T> {
    #[inline]
    fn kind(&self) -> NodeKind {
        (**self).kind()
    }

    #[inline]
    fn walk<'ast>(&'ast self, v: &mut dyn Visitor<'ast>) {
        (**self).walk(v);
    }
}

macro_rules! impl_walk_leaf {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FieldWalk for $ty {
                #[inline]
                fn walk_field<'ast>(&'ast self, name: &'static str, v: &mut dyn Visitor<'ast>) {
                    v.visit_leaf(name, self);
                }
            }
        )*
    };
}

impl_walk_leaf! {
    String,
    Arc<str>,
    bool,
    Token,
    LitKind,
    SpecType,
    ChanDir,
}

/// Depth-first count of the nodes reachable from `root`, `root` included.
pub fn count_nodes(root: &dyn Walk) -> usize {
    struct Counter(usize);

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_node(&mut self, _field: &'static str, node: &'ast dyn Walk) {
            self.0 += 1;
            node.walk(self);
        }
    }

    let mut counter = Counter(1);
    root.walk(&mut counter);
    counter.0
}
