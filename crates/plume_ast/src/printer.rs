//! Indented tree dumps, for debugging

use crate::expr::{Expr, Expression};
use crate::items::FunctionDecl;
use crate::program::Program;
use itertools::Itertools;
use std::fmt::{Display, Formatter, Write as _};

/// Writes a tree one node per line, drawing `|-` for inner children and `\-` for the last one
#[derive(Debug, Default)]
pub struct TreePrinter {
    buffer: String,
    indent: String,
}

impl TreePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a node, then lets `children` write the children of the node one level deeper
    pub fn node<F>(&mut self, label: impl Display, last: bool, children: F)
    where
        F: FnOnce(&mut Self),
    {
        let branch = if last { "\\-" } else { "|-" };
        // writing into a String cannot fail
        let _ = writeln!(self.buffer, "{}{branch}{label}", self.indent);
        let saved = self.indent.len();
        self.indent.push_str(if last { "  " } else { "| " });
        children(self);
        self.indent.truncate(saved);
    }

    /// Writes a node with no children
    pub fn leaf(&mut self, label: impl Display, last: bool) {
        self.node(label, last, |_| {});
    }

    pub fn finish(self) -> String {
        self.buffer
    }
}

/// Displays a [Program] as an indented tree
pub struct AstPrinter<'a> {
    program: &'a Program,
}

impl<'a> AstPrinter<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self { program }
    }

    fn print_function(printer: &mut TreePrinter, function: &FunctionDecl, last: bool) {
        let params = function
            .parameters
            .params
            .iter()
            .map(|p| format!("{}: {}", p.name(), p.ty))
            .join(", ");
        let label = format!(
            "{} {}({params}): {}",
            function.purity(),
            function.name(),
            function.return_type
        );
        printer.node(label, last, |printer| {
            Self::print_expression(printer, &function.body, true)
        });
    }

    fn print_expression(printer: &mut TreePrinter, expression: &Expression, last: bool) {
        let label = if expression.is_block() {
            "Expression {}"
        } else {
            "Expression"
        };
        printer.node(label, last, |printer| {
            let count = expression.children.len();
            for (idx, child) in expression.children.iter().enumerate() {
                Self::print_expr(printer, child, idx + 1 == count);
            }
        });
    }

    fn print_expr(printer: &mut TreePrinter, expr: &Expr, last: bool) {
        match expr {
            Expr::Expression(expression) => Self::print_expression(printer, expression, last),
            Expr::Statement(statement) => printer.node("Statement", last, |printer| {
                Self::print_expr(printer, &statement.child, true)
            }),
            Expr::Binary(binary) => printer.node(binary.op, last, |printer| {
                Self::print_expr(printer, &binary.left, false);
                Self::print_expr(printer, &binary.right, true);
            }),
            Expr::Integer(integer) => printer.leaf(format!("Integer {}", integer.value), last),
            Expr::Identifier(identifier) => {
                printer.leaf(format!("Identifier {}", identifier.name), last)
            }
            Expr::Call(call) => printer.node(format!("Call {}", call.name()), last, |printer| {
                let count = call.arguments.args.len();
                for (idx, arg) in call.arguments.args.iter().enumerate() {
                    Self::print_expression(printer, arg, idx + 1 == count);
                }
            }),
        }
    }
}

impl Display for AstPrinter<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut printer = TreePrinter::new();
        printer.node("Program", true, |printer| {
            let count = self.program.functions.len();
            for (idx, function) in self.program.functions.iter().enumerate() {
                Self::print_function(printer, function, idx + 1 == count);
            }
        });
        f.write_str(&printer.finish())
    }
}
