use smallvec::SmallVec;

pub type FastHashMap<K, V> = hashbrown::HashMap<K, V>;

/// Capture names in textual order, `None` for unnamed groups. Group 0 is not included.
pub type CaptureNames = SmallVec<[Option<Box<str>>; 4]>;
