//! Indented structural dump of a syntax tree.
//!
//! The dumper only sees nodes through [`Walk`], so it works from any node
//! down, not just from a [`File`](crate::ast::File):
//!
//! ```text
//! [Decl] FuncDecl 3:0
//!   keyword: Keyword 3:0
//!     token: "func"
//!   name: Ident 3:5
//!     name: main
//!   type_params: -
//!   ...
//! ```

use std::fmt;
use std::io;

use crate::position::Position;
use crate::walk::{Visitor, Walk};

/// One reported field of the node being printed.
enum Field<'ast> {
    Node(&'static str, &'ast dyn Walk),
    Leaf(&'static str, &'ast dyn fmt::Display),
    Pos(&'static str, &'ast Position),
    Absent(&'static str),
    EmptyList(&'static str),
}

#[derive(Default)]
struct Fields<'ast>(Vec<Field<'ast>>);

impl<'ast> Visitor<'ast> for Fields<'ast> {
    fn visit_node(&mut self, field: &'static str, node: &'ast dyn Walk) {
        self.0.push(Field::Node(field, node));
    }

    fn visit_list(&mut self, field: &'static str, nodes: &mut dyn Iterator<Item = &'ast dyn Walk>) {
        let before = self.0.len();
        for node in nodes {
            self.visit_node(field, node);
        }
        if self.0.len() == before {
            self.0.push(Field::EmptyList(field));
        }
    }

    fn visit_leaf(&mut self, field: &'static str, value: &'ast dyn fmt::Display) {
        self.0.push(Field::Leaf(field, value));
    }

    fn visit_pos(&mut self, field: &'static str, pos: &'ast Position) {
        self.0.push(Field::Pos(field, pos));
    }

    fn visit_absent(&mut self, field: &'static str) {
        self.0.push(Field::Absent(field));
    }
}

fn fields_of(node: &dyn Walk) -> Vec<Field<'_>> {
    let mut fields = Fields::default();
    node.walk(&mut fields);
    fields.0
}

/// Prints `[Category] Kind pos` headers with the node's fields indented
/// below. List fields repeat their name once per element; absent optional
/// fields print `name: -` and empty lists `name: []`.
#[derive(Debug)]
pub struct NodeDumper<W> {
    out: W,
    indent: String,
    positions: bool,
    filenames: bool,
}

impl<W: io::Write> NodeDumper<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent: "  ".to_owned(),
            positions: true,
            filenames: false,
        }
    }

    /// Indentation unit per nesting level.
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }

    pub fn with_positions(mut self, positions: bool) -> Self {
        self.positions = positions;
        self
    }

    /// Prefix printed positions with their filename, when they have one.
    pub fn with_filenames(mut self, filenames: bool) -> Self {
        self.filenames = filenames;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn dump(&mut self, root: &dyn Walk) -> io::Result<()> {
        self.dump_node(None, root, 0)
    }

    fn dump_node(&mut self, label: Option<&str>, node: &dyn Walk, depth: usize) -> io::Result<()> {
        let fields = fields_of(node);
        let kind = node.kind();

        self.write_indent(depth)?;
        if let Some(label) = label {
            write!(self.out, "{label}: ")?;
        }
        if let Some(category) = kind.category {
            write!(self.out, "[{category}] ")?;
        }
        write!(self.out, "{}", kind.name)?;

        // The first position is the node's own; it goes on the header line.
        let own_pos = fields.iter().position(|f| matches!(f, Field::Pos(..)));
        if let Some(Field::Pos(_, pos)) = own_pos.map(|i| &fields[i]) {
            if self.positions {
                write!(self.out, " ")?;
                self.write_pos(pos)?;
            }
        }
        writeln!(self.out)?;

        for (i, field) in fields.iter().enumerate() {
            match *field {
                Field::Node(name, child) => self.dump_node(Some(name), child, depth + 1)?,
                Field::Leaf(name, value) => {
                    self.write_indent(depth + 1)?;
                    writeln!(self.out, "{name}: {value}")?;
                }
                Field::Pos(name, pos) => {
                    if self.positions && own_pos != Some(i) {
                        self.write_indent(depth + 1)?;
                        write!(self.out, "{name}: ")?;
                        self.write_pos(pos)?;
                        writeln!(self.out)?;
                    }
                }
                Field::Absent(name) => {
                    self.write_indent(depth + 1)?;
                    writeln!(self.out, "{name}: -")?;
                }
                Field::EmptyList(name) => {
                    self.write_indent(depth + 1)?;
                    writeln!(self.out, "{name}: []")?;
                }
            }
        }
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) -> io::Result<()> {
        for _ in 0..depth {
            self.out.write_all(self.indent.as_bytes())?;
        }
        Ok(())
    }

    fn write_pos(&mut self, pos: &Position) -> io::Result<()> {
        match pos.filename() {
            Some(name) if self.filenames => write!(self.out, "{name}:{}:{}", pos.line, pos.offset),
            _ => write!(self.out, "{}:{}", pos.line, pos.offset),
        }
    }
}

/// Dumps `root` with the default options into a string.
pub fn dump_to_string(root: &dyn Walk) -> String {
    let mut dumper = NodeDumper::new(Vec::new());
    // Writing into a Vec cannot fail.
    let _ = dumper.dump(root);
    String::from_utf8_lossy(&dumper.into_inner()).into_owned()
}
