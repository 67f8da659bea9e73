//! Statement assembly buffer.
//!
//! [`ScriptBuilder`] is the line/indentation writer the statement builders
//! render into. In pretty mode each [`ScriptBuilder::new_line`] starts a new
//! indented line; in compact mode it collapses to a single separating space,
//! except right after a comma where CQL output carries no whitespace at all.

/// A small append-only buffer with optional pretty-printing.
#[derive(Debug)]
pub struct ScriptBuilder {
    pretty: bool,
    indent: usize,
    buffer: String,
}

const INDENT: &str = "  ";

impl ScriptBuilder {
    /// Create a buffer. `pretty` selects multi-line indented output.
    pub fn new(pretty: bool) -> Self {
        Self {
            pretty,
            indent: 0,
            buffer: String::new(),
        }
    }

    /// Append text verbatim.
    pub fn append(&mut self, text: &str) -> &mut Self {
        self.buffer.push_str(text);
        self
    }

    /// Start a new clause.
    ///
    /// Pretty mode: newline plus the current indentation. Compact mode: a
    /// single space, suppressed at the start of the buffer and after a comma.
    pub fn new_line(&mut self) -> &mut Self {
        if self.pretty {
            self.buffer.push('\n');
            for _ in 0..self.indent {
                self.buffer.push_str(INDENT);
            }
        } else if !(self.buffer.is_empty() || self.buffer.ends_with(',')) {
            self.buffer.push(' ');
        }
        self
    }

    /// Increase the indentation used by subsequent new lines.
    pub fn increase_indent(&mut self) -> &mut Self {
        self.indent += 1;
        self
    }

    /// Decrease the indentation used by subsequent new lines.
    pub fn decrease_indent(&mut self) -> &mut Self {
        self.indent = self.indent.saturating_sub(1);
        self
    }

    /// Consume the buffer and return the assembled string.
    pub fn build(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_mode_joins_with_single_spaces() {
        let mut b = ScriptBuilder::new(false);
        b.append("SELECT");
        b.new_line().append("a");
        b.append(",");
        b.new_line().append("b");
        b.new_line().append("FROM t");
        assert_eq!(b.build(), "SELECT a,b FROM t");
    }

    #[test]
    fn pretty_mode_indents_new_lines() {
        let mut b = ScriptBuilder::new(true);
        b.append("SELECT");
        b.increase_indent();
        b.new_line().append("a");
        b.decrease_indent();
        b.new_line().append("FROM t");
        assert_eq!(b.build(), "SELECT\n  a\nFROM t");
    }
}
