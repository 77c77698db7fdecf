//! # Debug rendering
//!
//! Renders a finished tree as the canonical, indented debug text used to compare
//! trees structurally. The layout is fixed:
//!
//! - calls print `target.function(` followed by one argument per indented line;
//! - lists and structs print one element or entry per line, entries prefixed with
//!   `?` when optional;
//! - selects created by `has()` carry a `~test-only~` marker;
//! - comprehensions print as a `__comprehension__(...)` call with a `// Label`
//!   line before each field.
//!
//! An [`Adorner`] may append metadata after each node and each struct entry.
//!
//! ```rust
//! use cel_ast::builder::Builder;
//! use cel_ast::debug::{to_adorned_debug_string, KindAdorner};
//!
//! let mut builder = Builder::new();
//! let a = builder.new_ident_expr(0, "a");
//! let select = builder.new_select_expr(1, a, "b");
//! assert_eq!(
//!     to_adorned_debug_string(&select, &KindAdorner),
//!     "a^#*expr.Expr_IdentExpr#.b^#*expr.Expr_SelectExpr#"
//! );
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ast::{Call, Comprehension, EntryKey, Expr, ExprKind, List, Select, Struct};

pub mod adorner;
pub mod literal;

pub use adorner::{Adorned, Adorner, EmptyAdorner, KindAdorner, KindAndIdAdorner};
pub use literal::format_literal;

/// Renders `expr` without adornments.
pub fn to_debug_string(expr: &Expr) -> String {
    to_adorned_debug_string(expr, &EmptyAdorner)
}

/// Renders `expr`, appending `adorner` metadata after every node and entry.
pub fn to_adorned_debug_string(expr: &Expr, adorner: &dyn Adorner) -> String {
    let mut writer = Writer::new(adorner);
    writer.buffer(expr);
    writer.content
}

static ID_ADORNMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\^#\d+:").expect("valid id adornment pattern"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\n\r\t ]+").expect("valid whitespace pattern"));

/// Normalises a debug string for comparison: ids in `^#<id>:` adornments become
/// `0` and all whitespace is removed.
///
/// ```rust
/// use cel_ast::debug::normalize_debug_string;
/// assert_eq!(
///     normalize_debug_string("f(\n  a^#12:*expr.Expr_IdentExpr#\n)"),
///     "f(a^#0:*expr.Expr_IdentExpr#)"
/// );
/// ```
pub fn normalize_debug_string(text: &str) -> String {
    let ids_cleared = ID_ADORNMENT.replace_all(text, "^#0:");
    WHITESPACE.replace_all(&ids_cleared, "").into_owned()
}

// ============================================================================
// WRITER
// ============================================================================

const COMPREHENSION_LABELS: [&str; 7] = [
    "// Variable",
    "// Target",
    "// Accumulator",
    "// Init",
    "// LoopCondition",
    "// LoopStep",
    "// Result",
];

struct Writer<'a> {
    adorner: &'a dyn Adorner,
    content: String,
    indent: usize,
    line_start: bool,
}

impl<'a> Writer<'a> {
    fn new(adorner: &'a dyn Adorner) -> Self {
        Self {
            adorner,
            content: String::new(),
            indent: 0,
            line_start: true,
        }
    }

    fn buffer(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(constant) => self.append(&format_literal(constant)),
            ExprKind::Ident(ident) => self.append(&ident.name),
            ExprKind::Select(select) => self.append_select(select),
            ExprKind::Call(call) => self.append_call(call),
            ExprKind::List(list) => self.append_list(list),
            ExprKind::Struct(object) => self.append_struct(object),
            ExprKind::Comprehension(comprehension) => self.append_comprehension(comprehension),
        }
        self.adorn(Adorned::Expr(expr));
    }

    fn append_select(&mut self, select: &Select) {
        self.buffer(&select.operand);
        self.append(".");
        self.append(&select.field);
        if select.test_only {
            self.append("~test-only~");
        }
    }

    fn append_call(&mut self, call: &Call) {
        if let Some(target) = &call.target {
            self.buffer(target);
            self.append(".");
        }
        self.append(&call.function);
        self.append("(");
        if !call.args.is_empty() {
            self.add_indent();
            self.append_line();
            for (i, arg) in call.args.iter().enumerate() {
                if i > 0 {
                    self.append(",");
                    self.append_line();
                }
                self.buffer(arg);
            }
            self.remove_indent();
            self.append_line();
        }
        self.append(")");
    }

    fn append_list(&mut self, list: &List) {
        self.append("[");
        if !list.elements.is_empty() {
            self.append_line();
            self.add_indent();
            for (i, element) in list.elements.iter().enumerate() {
                if i > 0 {
                    self.append(",");
                    self.append_line();
                }
                self.buffer(element);
            }
            self.remove_indent();
            self.append_line();
        }
        self.append("]");
    }

    fn append_struct(&mut self, object: &Struct) {
        self.append(&object.message_name);
        self.append("{");
        if !object.entries.is_empty() {
            self.append_line();
            self.add_indent();
            for (i, entry) in object.entries.iter().enumerate() {
                if i > 0 {
                    self.append(",");
                    self.append_line();
                }
                if entry.optional_entry {
                    self.append("?");
                }
                match &entry.key {
                    EntryKey::FieldKey(field) => self.append(field),
                    EntryKey::MapKey(key) => self.buffer(key),
                }
                self.append(":");
                self.buffer(&entry.value);
                self.adorn(Adorned::Entry(entry));
            }
            self.remove_indent();
            self.append_line();
        }
        self.append("}");
    }

    fn append_comprehension(&mut self, comprehension: &Comprehension) {
        let [variable, target, accumulator, init, condition, step, result] = COMPREHENSION_LABELS;
        self.append("__comprehension__(");
        self.add_indent();
        self.append_line();
        self.labelled(variable);
        self.append(&comprehension.iter_var);
        self.append(",");
        self.append_line();
        self.labelled(target);
        self.buffer(&comprehension.iter_range);
        self.append(",");
        self.append_line();
        self.labelled(accumulator);
        self.append(&comprehension.accu_var);
        self.append(",");
        self.append_line();
        self.labelled(init);
        self.buffer(&comprehension.accu_init);
        self.append(",");
        self.append_line();
        self.labelled(condition);
        self.buffer(&comprehension.loop_condition);
        self.append(",");
        self.append_line();
        self.labelled(step);
        self.buffer(&comprehension.loop_step);
        self.append(",");
        self.append_line();
        self.labelled(result);
        self.buffer(&comprehension.result);
        self.append(")");
        self.remove_indent();
    }

    fn labelled(&mut self, label: &str) {
        self.append(label);
        self.append_line();
    }

    fn append(&mut self, text: &str) {
        self.do_indent();
        self.content.push_str(text);
    }

    fn do_indent(&mut self) {
        if self.line_start {
            self.line_start = false;
            for _ in 0..self.indent {
                self.content.push_str("  ");
            }
        }
    }

    fn adorn(&mut self, node: Adorned<'_>) {
        let metadata = self.adorner.metadata(node);
        self.append(&metadata);
    }

    fn append_line(&mut self) {
        self.content.push('\n');
        self.line_start = true;
    }

    fn add_indent(&mut self) {
        self.indent += 1;
    }

    fn remove_indent(&mut self) {
        if self.indent == 0 {
            panic!("Internal error: debug writer indent went negative");
        }
        self.indent -= 1;
    }
}
