//! Indentation-scoped source writer.
//!
//! Every opened block increases nesting and every closed block decreases
//! it. [`SourceWriter::member`] starts a sibling declaration: it puts one
//! blank line before it unless it is the first thing in its block, so a
//! blank line never follows an opening brace or precedes a closing one.

const INDENT: &str = "    ";

#[derive(Debug)]
pub struct SourceWriter {
    out: String,
    /// Per open block: whether anything was written into it yet.
    blocks: Vec<bool>,
}

impl Default for SourceWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            blocks: vec![false],
        }
    }

    fn depth(&self) -> usize {
        self.blocks.len() - 1
    }

    fn mark_written(&mut self) {
        if let Some(written) = self.blocks.last_mut() {
            *written = true;
        }
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.depth() {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
        self.mark_written();
    }

    /// Start a sibling declaration.
    pub fn member(&mut self) {
        if self.blocks.last().copied().unwrap_or(false) {
            self.out.push('\n');
        }
    }

    /// Write `header` followed by an opening brace line.
    pub fn open(&mut self, header: &str) {
        self.line(header);
        self.line("{");
        self.blocks.push(false);
    }

    pub fn close(&mut self) {
        self.close_with("");
    }

    /// Close the current block; `suffix` follows the brace (e.g. `);`).
    pub fn close_with(&mut self, suffix: &str) {
        if self.blocks.len() > 1 {
            self.blocks.pop();
        }
        self.line(&format!("}}{suffix}"));
    }

    pub fn finish(self) -> String {
        self.out
    }
}
