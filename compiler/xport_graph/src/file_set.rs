//! Position table shared by a decode call.
//!
//! Decoders that carry source positions add one entry per referenced source
//! file and encode positions as offsets into a single flat range. Position 0
//! means "no position"; the first file starts at base 1 and each file
//! reserves `size + 1` positions so the end-of-file offset stays addressable.

/// A resolved source position.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    pub file: String,
    pub offset: u32,
}

#[derive(Clone, Debug)]
struct FileEntry {
    name: String,
    base: u32,
    size: u32,
}

/// Flat position space over a set of named files.
#[derive(Clone, Debug)]
pub struct FileSet {
    files: Vec<FileEntry>,
    next_base: u32,
}

impl FileSet {
    pub fn new() -> Self {
        FileSet {
            files: Vec::new(),
            next_base: 1,
        }
    }

    /// Reserve positions for a file of `size` bytes and return its base.
    pub fn add_file(&mut self, name: impl Into<String>, size: u32) -> u32 {
        let base = self.next_base;
        self.files.push(FileEntry {
            name: name.into(),
            base,
            size,
        });
        self.next_base = base.saturating_add(size).saturating_add(1);
        base
    }

    /// Name of the file containing `pos`, if any.
    pub fn file(&self, pos: u32) -> Option<&str> {
        self.entry(pos).map(|entry| entry.name.as_str())
    }

    /// Resolve an absolute position into a file name and byte offset.
    pub fn position(&self, pos: u32) -> Option<Position> {
        self.entry(pos).map(|entry| Position {
            file: entry.name.clone(),
            offset: pos - entry.base,
        })
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn entry(&self, pos: u32) -> Option<&FileEntry> {
        if pos == 0 {
            return None;
        }
        // Bases are strictly increasing, so the candidate is the last file
        // starting at or before `pos`.
        let idx = self.files.partition_point(|entry| entry.base <= pos);
        let entry = self.files.get(idx.checked_sub(1)?)?;
        (pos - entry.base <= entry.size).then_some(entry)
    }
}

impl Default for FileSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests;
