use smallvec::SmallVec;

use crate::error::{Result, SqlfmtError};

/// Rewind depth guaranteed even when no long operators are registered.
pub const MIN_REWIND: usize = 4;

/// Character reader over the source with a bounded pushback buffer.
///
/// Only the last `limit` characters read can be pushed back; the lexer never
/// needs more than the length of the longest registered operator.
pub struct Scanner<'a> {
    src: &'a str,
    pos: usize,
    /// Byte lengths of the most recently read characters, oldest first.
    history: SmallVec<[u8; 8]>,
    limit: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(src: &'a str, limit: usize) -> Self {
        Self {
            src,
            pos: 0,
            history: SmallVec::new(),
            limit: limit.max(MIN_REWIND),
        }
    }

    /// Current byte offset.
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    pub fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    pub fn read(&mut self) -> Option<char> {
        let ch = self.peek()?;
        let len = ch.len_utf8();
        self.pos += len;
        self.history.push(len as u8);
        if self.history.len() > self.limit {
            self.history.remove(0);
        }
        Some(ch)
    }

    pub fn unread(&mut self) -> Result<()> {
        let len = self.history.pop().ok_or_else(|| {
            SqlfmtError::lex(self.pos, "rewind beyond the lookahead buffer")
        })?;
        self.pos -= len as usize;
        Ok(())
    }

    /// Push back the last `n` characters read.
    pub fn rewind(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.unread()?;
        }
        Ok(())
    }

    /// Continue reading at byte offset `pos`. Clears the pushback buffer.
    pub fn jump_to(&mut self, pos: usize) {
        self.pos = pos.min(self.src.len());
        self.history.clear();
    }

    /// Source text from `start` up to the current position.
    pub fn slice(&self, start: usize) -> &'a str {
        &self.src[start..self.pos]
    }
}
