//! Recently used colors.

use crate::color::Color;
use std::collections::VecDeque;

/// Default number of remembered colors.
pub const DEFAULT_RECENT_COLORS: usize = 16;

/// Most-recent-first list of unique colors with a fixed capacity.
///
/// Pushing past the capacity evicts the oldest color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentColors {
    colors: VecDeque<Color>,
    cap: usize,
}

impl RecentColors {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self { colors: VecDeque::with_capacity(cap), cap }
    }

    /// Record `color` as most recent. Returns the evicted color, if any.
    pub fn push(&mut self, color: Color) -> Option<Color> {
        if let Some(pos) = self.colors.iter().position(|&c| c == color) {
            self.colors.remove(pos);
            self.colors.push_front(color);
            return None;
        }

        self.colors.push_front(color);
        if self.colors.len() > self.cap {
            let evicted = self.colors.pop_back();
            if let Some(c) = evicted {
                log::debug!("recent colors full, dropped {}", c);
            }
            return evicted;
        }
        None
    }

    pub fn iter(&self) -> impl Iterator<Item = Color> + '_ {
        self.colors.iter().copied()
    }

    pub fn most_recent(&self) -> Option<Color> {
        self.colors.front().copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn cap(&self) -> usize {
        self.cap
    }
}

impl Default for RecentColors {
    fn default() -> Self {
        Self::new(DEFAULT_RECENT_COLORS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gray(v: u8) -> Color {
        Color::rgb(v, v, v)
    }

    #[test]
    fn test_push_orders_most_recent_first() {
        let mut recent = RecentColors::new(4);
        recent.push(gray(1));
        recent.push(gray(2));
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec![gray(2), gray(1)]);
        assert_eq!(recent.most_recent(), Some(gray(2)));
    }

    #[test]
    fn test_repush_moves_to_front() {
        let mut recent = RecentColors::new(4);
        recent.push(gray(1));
        recent.push(gray(2));
        recent.push(gray(1));
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec![gray(1), gray(2)]);
    }

    #[test]
    fn test_cap_evicts_oldest() {
        let mut recent = RecentColors::new(2);
        assert_eq!(recent.push(gray(1)), None);
        assert_eq!(recent.push(gray(2)), None);
        assert_eq!(recent.push(gray(3)), Some(gray(1)));
        assert_eq!(recent.len(), 2);
    }
}
