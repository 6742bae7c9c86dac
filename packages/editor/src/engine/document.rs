//! Blocks and runs of the in-memory document.

use super::{BlockAttrs, BlockType, Marks};

/// A stretch of text sharing one set of marks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Run {
    pub text: String,
    pub marks: Marks,
}

impl Run {
    pub fn new(text: impl Into<String>, marks: Marks) -> Self {
        Self {
            text: text.into(),
            marks,
        }
    }

    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A paragraph or list item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Block {
    pub kind: BlockType,
    pub attrs: BlockAttrs,
    pub runs: Vec<Run>,
}

impl Block {
    pub fn new(kind: BlockType) -> Self {
        Self {
            kind,
            attrs: BlockAttrs::default(),
            runs: Vec::new(),
        }
    }

    pub fn paragraph(text: &str) -> Self {
        let mut block = Self::new(BlockType::Paragraph);
        if !text.is_empty() {
            block.runs.push(Run::new(text, Marks::default()));
        }
        block
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(Run::char_len).sum()
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Make sure a run boundary falls at `offset` and return the index of the
    /// first run starting there (`runs.len()` at the end of the block).
    pub fn split_at(&mut self, offset: usize) -> usize {
        let mut pos = 0;
        for i in 0..self.runs.len() {
            if offset == pos {
                return i;
            }
            let len = self.runs[i].char_len();
            if offset < pos + len {
                let cut = self.runs[i]
                    .text
                    .char_indices()
                    .nth(offset - pos)
                    .map(|(idx, _)| idx)
                    .unwrap_or(self.runs[i].text.len());
                let tail = self.runs[i].text.split_off(cut);
                let marks = self.runs[i].marks.clone();
                self.runs.insert(i + 1, Run::new(tail, marks));
                return i + 1;
            }
            pos += len;
        }
        self.runs.len()
    }

    /// Runs overlapping `[start, end)` by at least one char.
    pub fn runs_between(&self, start: usize, end: usize) -> impl Iterator<Item = &Run> {
        let mut pos = 0;
        self.runs.iter().filter(move |run| {
            let run_start = pos;
            pos += run.char_len();
            run_start < end && pos > start && run.char_len() > 0
        })
    }

    /// The run holding the char just before `offset`, or the first run when
    /// `offset` is 0.
    pub fn run_before(&self, offset: usize) -> Option<&Run> {
        if offset == 0 {
            return self.runs.first();
        }
        let mut pos = 0;
        for run in &self.runs {
            pos += run.char_len();
            if pos >= offset {
                return Some(run);
            }
        }
        self.runs.last()
    }

    /// Drop empty runs and merge neighbours with identical marks.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.marks == run.marks => prev.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bold() -> Marks {
        Marks {
            bold: true,
            ..Marks::default()
        }
    }

    #[test]
    fn test_split_inside_run() {
        let mut block = Block::paragraph("héllo");
        let idx = block.split_at(2);
        assert_eq!(idx, 1);
        assert_eq!(block.runs[0].text, "hé");
        assert_eq!(block.runs[1].text, "llo");
        // Splitting on an existing boundary is a no-op
        assert_eq!(block.split_at(2), 1);
        assert_eq!(block.runs.len(), 2);
        assert_eq!(block.split_at(5), 2);
    }

    #[test]
    fn test_normalize_merges_equal_marks() {
        let mut block = Block::new(BlockType::Paragraph);
        block.runs = vec![
            Run::new("a", bold()),
            Run::new("", Marks::default()),
            Run::new("b", bold()),
            Run::new("c", Marks::default()),
        ];
        block.normalize();
        assert_eq!(block.runs.len(), 2);
        assert_eq!(block.runs[0].text, "ab");
    }

    #[test]
    fn test_runs_between() {
        let mut block = Block::new(BlockType::Paragraph);
        block.runs = vec![Run::new("ab", bold()), Run::new("cd", Marks::default())];
        assert_eq!(block.runs_between(0, 2).count(), 1);
        assert_eq!(block.runs_between(1, 3).count(), 2);
        assert_eq!(block.runs_between(2, 2).count(), 0);
    }

    #[test]
    fn test_run_before() {
        let mut block = Block::new(BlockType::Paragraph);
        block.runs = vec![Run::new("ab", bold()), Run::new("cd", Marks::default())];
        assert!(block.run_before(2).unwrap().marks.bold);
        assert!(!block.run_before(3).unwrap().marks.bold);
        assert!(block.run_before(0).unwrap().marks.bold);
    }
}
