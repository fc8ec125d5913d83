/// A single edit applied to the query input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEdit {
    Insert(char),
    Backspace,
    Delete,
    DeleteWordLeft,
    Left,
    Right,
    Home,
    End,
}

impl QueryEdit {
    pub fn changes_text(self) -> bool {
        matches!(
            self,
            Self::Insert(_) | Self::Backspace | Self::Delete | Self::DeleteWordLeft
        )
    }
}

/// Editable query text with a char-based cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: String,
    cursor: usize,
}

impl Query {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = char_count(text.as_str());
        Self { text, cursor }
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_count(&self) -> usize {
        char_count(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// A query only reaches the catalog once it has at least `min_len` chars.
    pub fn is_effective(&self, min_len: usize) -> bool {
        !self.is_empty() && self.char_count() >= min_len
    }

    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = char_count(self.text.as_str());
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns true when the edit did anything (text or cursor).
    pub fn apply(&mut self, edit: QueryEdit) -> bool {
        match edit {
            QueryEdit::Insert(ch) => {
                self.insert_char(ch);
                true
            }
            QueryEdit::Backspace => self.backspace(),
            QueryEdit::Delete => self.delete(),
            QueryEdit::DeleteWordLeft => self.delete_word_left(),
            QueryEdit::Left => self.move_left(),
            QueryEdit::Right => self.move_right(),
            QueryEdit::Home => self.move_home(),
            QueryEdit::End => self.move_end(),
        }
    }

    pub fn insert_char(&mut self, ch: char) {
        let pos = self.clamped_cursor();
        let byte_pos = byte_index_at_char(self.text.as_str(), pos);
        self.text.insert(byte_pos, ch);
        self.cursor = pos + 1;
    }

    pub fn backspace(&mut self) -> bool {
        let pos = self.clamped_cursor();
        if pos == 0 {
            return false;
        }
        let byte_pos = byte_index_at_char(self.text.as_str(), pos - 1);
        self.text.remove(byte_pos);
        self.cursor = pos - 1;
        true
    }

    pub fn delete(&mut self) -> bool {
        let pos = self.clamped_cursor();
        if pos >= self.char_count() {
            return false;
        }
        let byte_pos = byte_index_at_char(self.text.as_str(), pos);
        self.text.remove(byte_pos);
        true
    }

    pub fn move_left(&mut self) -> bool {
        let pos = self.clamped_cursor();
        if pos == 0 {
            return false;
        }
        self.cursor = pos - 1;
        true
    }

    pub fn move_right(&mut self) -> bool {
        let pos = self.clamped_cursor();
        if pos >= self.char_count() {
            return false;
        }
        self.cursor = pos + 1;
        true
    }

    pub fn move_home(&mut self) -> bool {
        let moved = self.cursor != 0;
        self.cursor = 0;
        moved
    }

    pub fn move_end(&mut self) -> bool {
        let end = self.char_count();
        let moved = self.cursor != end;
        self.cursor = end;
        moved
    }

    pub fn delete_word_left(&mut self) -> bool {
        let mut chars: Vec<char> = self.text.chars().collect();
        let pos = self.cursor.min(chars.len());
        if pos == 0 {
            self.cursor = 0;
            return false;
        }

        let mut start = pos;
        while start > 0 && is_separator(chars[start - 1]) {
            start -= 1;
        }
        while start > 0 && !is_separator(chars[start - 1]) {
            start -= 1;
        }

        chars.drain(start..pos);
        self.text = chars.into_iter().collect();
        self.cursor = start;
        true
    }

    fn clamped_cursor(&self) -> usize {
        self.cursor.min(self.char_count())
    }
}

fn char_count(value: &str) -> usize {
    value.chars().count()
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '.' | '/' | ',' | '-' | '_' | ':')
}

fn byte_index_at_char(value: &str, char_idx: usize) -> usize {
    value
        .char_indices()
        .nth(char_idx)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}
