//! Array-backed binary min-heap used as the open list of the best-first strategies.
//!
//! There is no decrease-key: strategies push a node again when they find a
//! better priority for it, and drop stale copies when they pop them.

#[derive(Clone, Debug)]
struct Entry<T> {
    priority: f64,
    value: T,
}

/// A binary min-heap keyed by an `f64` priority.
///
/// Ties are not broken in any guaranteed order.
///
/// # Examples
/// ```
/// use fifteen_solver::frontier::MinHeap;
///
/// let mut heap = MinHeap::new();
/// heap.push("far", 9.0);
/// heap.push("near", 1.5);
/// heap.push("middle", 4.0);
/// assert_eq!(heap.pop(), Some("near"));
/// assert_eq!(heap.pop(), Some("middle"));
/// assert_eq!(heap.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct MinHeap<T> {
    heap: Vec<Entry<T>>,
}

impl<T> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MinHeap<T> {
    pub fn new() -> Self {
        MinHeap { heap: Vec::new() }
    }

    pub fn push(&mut self, value: T, priority: f64) {
        self.heap.push(Entry { priority, value });
        self.sift_up(self.heap.len() - 1);
    }

    /// Removes and returns the value with the smallest priority.
    pub fn pop(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }
        let last = self.heap.len() - 1;
        self.heap.swap(0, last);
        let top = self.heap.pop().map(|entry| entry.value);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        top
    }

    /// The smallest priority currently queued.
    pub fn peek_priority(&self) -> Option<f64> {
        self.heap.first().map(|entry| entry.priority)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].priority >= self.heap[parent].priority {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;
            if left < len && self.heap[left].priority < self.heap[smallest].priority {
                smallest = left;
            }
            if right < len && self.heap[right].priority < self.heap[smallest].priority {
                smallest = right;
            }
            if smallest == index {
                break;
            }
            self.heap.swap(index, smallest);
            index = smallest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_empty_heap() {
        let mut heap: MinHeap<u32> = MinHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.pop(), None);
        assert_eq!(heap.peek_priority(), None);
    }

    #[test]
    fn test_pops_in_priority_order() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut heap = MinHeap::new();
        let mut priorities: Vec<f64> = (0..500).map(|_| rng.gen_range(0.0..1000.0)).collect();
        for &priority in &priorities {
            heap.push(priority, priority);
        }
        assert_eq!(heap.len(), 500);

        priorities.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for expected in priorities {
            assert_eq!(heap.peek_priority(), Some(expected));
            assert_eq!(heap.pop(), Some(expected));
        }
        assert!(heap.is_empty());
    }

    #[test]
    fn test_duplicates_and_interleaving() {
        let mut heap = MinHeap::new();
        heap.push('a', 3.0);
        heap.push('b', 3.0);
        heap.push('c', 1.0);
        assert_eq!(heap.pop(), Some('c'));
        heap.push('d', 0.5);
        assert_eq!(heap.pop(), Some('d'));

        let mut rest = vec![heap.pop().unwrap(), heap.pop().unwrap()];
        rest.sort();
        assert_eq!(rest, vec!['a', 'b']);
        assert_eq!(heap.pop(), None);
    }

    #[test]
    fn test_clear() {
        let mut heap = MinHeap::default();
        heap.push(1, 1.0);
        heap.push(2, 2.0);
        heap.clear();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);
    }
}
