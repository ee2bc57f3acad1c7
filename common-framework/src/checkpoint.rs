/// Saved cursor state used to open a speculative region.
///
/// `index` is where the region started; `floor` is the earliest open
/// speculative position that was in force before the region opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    index: usize,
    floor: Option<usize>,
}

impl Checkpoint {
    /// Creates a new checkpoint with the given index and speculative floor.
    pub fn new(index: usize, floor: Option<usize>) -> Self {
        Self { index, floor }
    }

    /// Returns the index stored in this checkpoint.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the speculative floor that was active when the checkpoint was taken.
    pub fn floor(&self) -> Option<usize> {
        self.floor
    }

    /// Returns true if the checkpoint was taken inside another speculative region.
    pub fn is_nested(&self) -> bool {
        self.floor.is_some()
    }
}
