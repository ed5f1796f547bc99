//! Enumeration of anchor placements: every way to place an ordered list of
//! needles in a string without overlap, each after the previous one.

/// Lazy depth-first enumeration of order-preserving, non-overlapping
/// occurrences of `needles` in `text`. Yields byte offsets, one per needle.
///
/// An empty needle matches exactly once, at the position where the previous
/// needle ended. With no needles the single empty placement is yielded.
pub struct AnchorMatches<'a> {
    text: &'a str,
    needles: Vec<&'a str>,
    positions: Vec<usize>,
    started: bool,
    done: bool,
}

impl<'a> AnchorMatches<'a> {
    pub fn new(text: &'a str, needles: Vec<&'a str>) -> Self {
        Self {
            text,
            needles,
            positions: Vec::new(),
            started: false,
            done: false,
        }
    }

    fn find_from(&self, k: usize, from: usize) -> Option<usize> {
        let i = self.text.get(from..)?.find(self.needles[k])?;
        Some(from + i)
    }

    /// Place the remaining needles as early as possible. On failure returns
    /// the index of the needle that could not be placed.
    fn extend(&mut self) -> Result<(), usize> {
        for k in self.positions.len()..self.needles.len() {
            let from = match k {
                0 => 0,
                _ => self.positions[k - 1] + self.needles[k - 1].len(),
            };
            let p = self.find_from(k, from).ok_or(k)?;
            self.positions.push(p);
        }
        Ok(())
    }

    /// Move to the next complete placement after the current one.
    fn advance(&mut self) -> bool {
        while let Some(last) = self.positions.pop() {
            let k = self.positions.len();
            if self.needles[k].is_empty() {
                continue;
            }
            let step = self.text[last..].chars().next().map_or(1, char::len_utf8);
            let Some(p) = self.find_from(k, last + step) else {
                continue;
            };
            self.positions.push(p);
            match self.extend() {
                Ok(()) => return true,
                // Needle `failed` is absent past its earliest start, so moving
                // its predecessor further right cannot help.
                Err(failed) => self.positions.truncate(failed.saturating_sub(1)),
            }
        }
        false
    }
}

impl Iterator for AnchorMatches<'_> {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        if self.done {
            return None;
        }
        let found = if self.started {
            self.advance()
        } else {
            self.started = true;
            match self.extend() {
                Ok(()) => true,
                Err(failed) => {
                    self.positions.truncate(failed.saturating_sub(1));
                    self.advance()
                }
            }
        };
        if !found {
            self.done = true;
            return None;
        }
        Some(self.positions.clone())
    }
}

/// Collect every placement of `needles` in `text`.
pub fn find_all_matches_in_string(text: &str, needles: &[&str]) -> Vec<Vec<usize>> {
    AnchorMatches::new(text, needles.to_vec()).collect()
}
