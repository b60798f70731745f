/// Capture bookkeeping for a single composition pass.
///
/// Three index spaces meet here: the outer pattern's original group numbers, each
/// subpattern's local group numbers, and the global numbering of the merged output.
/// `outer_index_map[n]` is the global index of the outer pattern's original group `n`;
/// slot 0 maps to itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingState {
    total_captures: usize,
    outer_captures_seen: usize,
    outer_index_map: Vec<usize>,
}

impl Default for NumberingState {
    fn default() -> Self {
        Self::new()
    }
}

impl NumberingState {
    pub fn new() -> Self {
        Self {
            total_captures: 0,
            outer_captures_seen: 0,
            outer_index_map: vec![0],
        }
    }

    /// Captures emitted so far, which is also the most recently assigned global index.
    pub fn total_captures(&self) -> usize {
        self.total_captures
    }

    pub fn outer_captures_seen(&self) -> usize {
        self.outer_captures_seen
    }

    pub fn outer_index_map(&self) -> &[usize] {
        &self.outer_index_map
    }

    pub fn assign_capture(&mut self) -> usize {
        self.total_captures += 1;
        self.total_captures
    }

    /// Registers an outer-pattern capture. Returns its 0-based position among outer captures
    /// and the global index it was given.
    pub fn assign_outer_capture(&mut self) -> (usize, usize) {
        let ordinal = self.outer_captures_seen;
        let global = self.assign_capture();
        self.outer_captures_seen += 1;
        self.outer_index_map.push(global);
        (ordinal, global)
    }

    /// Global index of the outer pattern's original group `original` (1-based), once seen.
    pub fn outer_global_index(&self, original: usize) -> Option<usize> {
        if original == 0 {
            return None;
        }
        self.outer_index_map.get(original).copied()
    }
}
