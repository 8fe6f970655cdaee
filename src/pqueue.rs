//! Gain-ordered priority queue for Fiduccia-Mattheyses refinement.
//!
//! Two representations back the same inherent API, chosen once at
//! construction and never switched mid-pass: a binary max-heap for small or
//! high-variance gain ranges, and a bucket array indexed by `gain +
//! gain_max` otherwise. The heap's sift routines keep the "check the second
//! child too" asymmetry of the source verbatim — it matters for tie
//! ordering under repeated delete/update churn.

const BUCKET_VERTICES_MIN: usize = 512;
const BUCKET_GAIN_MAX_LIMIT: i64 = 512;

pub enum FmQueue {
    Heap(FmHeap),
    Bucket(FmBucket),
}

impl FmQueue {
    pub fn new(nvertices: usize, gain_max: i64) -> Self {
        if nvertices < BUCKET_VERTICES_MIN || gain_max > BUCKET_GAIN_MAX_LIMIT {
            FmQueue::Heap(FmHeap::new(nvertices))
        } else {
            FmQueue::Bucket(FmBucket::new(nvertices, gain_max))
        }
    }

    pub fn clear(&mut self) {
        match self {
            FmQueue::Heap(h) => h.clear(),
            FmQueue::Bucket(b) => b.clear(),
        }
    }

    pub fn insert(&mut self, v: usize, gain: i64) {
        match self {
            FmQueue::Heap(h) => h.insert(v, gain),
            FmQueue::Bucket(b) => b.insert(v, gain),
        }
    }

    pub fn delete(&mut self, v: usize, gain: i64) {
        match self {
            FmQueue::Heap(h) => h.delete(v),
            FmQueue::Bucket(b) => b.delete(v, gain),
        }
    }

    pub fn update(&mut self, v: usize, gain_old: i64, gain_new: i64) {
        match self {
            FmQueue::Heap(h) => h.update(v, gain_old, gain_new),
            FmQueue::Bucket(b) => b.update(v, gain_old, gain_new),
        }
    }

    pub fn extract_max(&mut self) -> Option<usize> {
        match self {
            FmQueue::Heap(h) => h.extract_max(),
            FmQueue::Bucket(b) => b.extract_max(),
        }
    }
}

pub(crate) struct FmHeap {
    len: usize,
    heap: Vec<(i64, usize)>,
    pointer: Vec<Option<usize>>,
}

impl FmHeap {
    fn new(nvertices: usize) -> Self {
        FmHeap {
            len: 0,
            heap: vec![(0, 0); nvertices],
            pointer: vec![None; nvertices],
        }
    }

    fn clear(&mut self) {
        self.len = 0;
        self.pointer.iter_mut().for_each(|p| *p = None);
    }

    fn insert(&mut self, v: usize, gain: i64) {
        let mut i = self.len;
        self.len += 1;
        while i > 0 {
            let j = (i - 1) / 2;
            if self.heap[j].0 < gain {
                self.heap[i] = self.heap[j];
                self.pointer[self.heap[i].1] = Some(i);
                i = j;
            } else {
                break;
            }
        }
        self.heap[i] = (gain, v);
        self.pointer[v] = Some(i);
    }

    fn extract_max(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        let top = self.heap[0].1;
        self.pointer[top] = None;
        if self.len > 0 {
            let (gain, v) = self.heap[self.len];
            let i = self.sift_down(0, gain);
            self.heap[i] = (gain, v);
            self.pointer[v] = Some(i);
        }
        Some(top)
    }

    fn delete(&mut self, v: usize) {
        let i = self.pointer[v].expect("vertex not present in heap");
        self.pointer[v] = None;
        self.len -= 1;
        if self.len > 0 && self.heap[self.len].1 != v {
            let (gain_new, v_new) = self.heap[self.len];
            let gain_old = self.heap[i].0;
            let dest = if gain_old < gain_new {
                self.sift_up(i, gain_new)
            } else {
                self.sift_down(i, gain_new)
            };
            self.heap[dest] = (gain_new, v_new);
            self.pointer[v_new] = Some(dest);
        }
    }

    fn update(&mut self, v: usize, gain_old: i64, gain_new: i64) {
        let i = self.pointer[v].expect("vertex not present in heap");
        let dest = if gain_old < gain_new {
            self.sift_up(i, gain_new)
        } else {
            self.sift_down(i, gain_new)
        };
        self.heap[dest] = (gain_new, v);
        self.pointer[v] = Some(dest);
    }

    /// Bubble a hole at `i` towards the root while an ancestor's gain is
    /// smaller than `gain`. Returns the final hole position.
    fn sift_up(&mut self, mut i: usize, gain: i64) -> usize {
        while i > 0 {
            let j = (i - 1) / 2;
            if self.heap[j].0 < gain {
                self.heap[i] = self.heap[j];
                self.pointer[self.heap[i].1] = Some(i);
                i = j;
            } else {
                break;
            }
        }
        i
    }

    /// Push a hole at `i` down towards the leaves while a child's gain
    /// exceeds `gain`. Checks both children every step, not just the larger
    /// one first — matches the source's asymmetric comparison order.
    fn sift_down(&mut self, mut i: usize, gain: i64) -> usize {
        loop {
            let j = 2 * i + 1;
            if j >= self.len {
                break;
            }
            let mut jj = j;
            if self.heap[jj].0 > gain {
                if jj + 1 < self.len && self.heap[jj + 1].0 > self.heap[jj].0 {
                    jj += 1;
                }
                self.heap[i] = self.heap[jj];
                self.pointer[self.heap[i].1] = Some(i);
                i = jj;
            } else if jj + 1 < self.len && self.heap[jj + 1].0 > gain {
                jj += 1;
                self.heap[i] = self.heap[jj];
                self.pointer[self.heap[i].1] = Some(i);
                i = jj;
            } else {
                break;
            }
        }
        i
    }
}

pub(crate) struct FmBucket {
    gain_max: i64,
    table: Vec<Option<usize>>,
    next: Vec<Option<usize>>,
    count: usize,
    gain_max_ptr: i64,
}

impl FmBucket {
    fn new(nvertices: usize, gain_max: i64) -> Self {
        let size = (1 + 2 * gain_max) as usize;
        FmBucket {
            gain_max,
            table: vec![None; size],
            next: vec![None; nvertices],
            count: 0,
            gain_max_ptr: -gain_max,
        }
    }

    fn idx(&self, gain: i64) -> usize {
        (gain + self.gain_max) as usize
    }

    fn clear(&mut self) {
        self.table.iter_mut().for_each(|s| *s = None);
        self.count = 0;
        self.gain_max_ptr = -self.gain_max;
    }

    fn insert(&mut self, v: usize, gain: i64) {
        let idx = self.idx(gain);
        self.next[v] = self.table[idx];
        self.table[idx] = Some(v);
        self.count += 1;
        if self.gain_max_ptr < gain {
            self.gain_max_ptr = gain;
        }
    }

    fn extract_max(&mut self) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        self.count -= 1;
        let idx = self.idx(self.gain_max_ptr);
        let v = self.table[idx].take().expect("gain_max_ptr bucket empty");
        self.table[idx] = self.next[v];
        if self.table[idx].is_none() {
            if self.count == 0 {
                self.gain_max_ptr = -self.gain_max;
            } else {
                self.decay_gain_max_ptr();
            }
        }
        Some(v)
    }

    fn delete(&mut self, v: usize, gain: i64) {
        let idx = self.idx(gain);
        self.count -= 1;
        let mut cur = self.table[idx];
        let mut prev: Option<usize> = None;
        while let Some(node) = cur {
            if node == v {
                break;
            }
            prev = Some(node);
            cur = self.next[node];
        }
        match prev {
            Some(p) => self.next[p] = self.next[v],
            None => self.table[idx] = self.next[v],
        }
        if self.table[idx].is_none() || gain == self.gain_max_ptr {
            if self.count != 0 {
                self.decay_gain_max_ptr();
            } else {
                self.gain_max_ptr = -self.gain_max;
            }
        }
    }

    fn update(&mut self, v: usize, gain_old: i64, gain_new: i64) {
        if gain_old != gain_new {
            self.delete(v, gain_old);
            self.insert(v, gain_new);
        }
    }

    /// Walk `gain_max_ptr` down until it points at a non-empty bucket.
    fn decay_gain_max_ptr(&mut self) {
        while self.table[self.idx(self.gain_max_ptr)].is_none() {
            self.gain_max_ptr -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_extracts_in_gain_order() {
        let mut q = FmQueue::new(4, 10);
        q.insert(0, 3);
        q.insert(1, 7);
        q.insert(2, 1);
        q.insert(3, 5);
        let mut order = Vec::new();
        while let Some(v) = q.extract_max() {
            order.push(v);
        }
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn bucket_extracts_in_gain_order() {
        // nvertices >= 512 and gain_max <= 512 selects the bucket variant.
        let mut q = FmQueue::new(600, 10);
        q.insert(0, 3);
        q.insert(1, 7);
        q.insert(2, -1);
        q.insert(3, 5);
        let mut order = Vec::new();
        while let Some(v) = q.extract_max() {
            order.push(v);
        }
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn heap_update_and_delete() {
        let mut q = FmQueue::new(4, 10);
        q.insert(0, 3);
        q.insert(1, 7);
        q.update(0, 3, 9);
        assert_eq!(q.extract_max(), Some(0));
        q.insert(2, 4);
        q.delete(2, 4);
        assert_eq!(q.extract_max(), Some(1));
        assert_eq!(q.extract_max(), None);
    }

    #[test]
    fn bucket_update_and_delete() {
        let mut q = FmQueue::new(600, 10);
        q.insert(0, 3);
        q.insert(1, 7);
        q.update(0, 3, 9);
        assert_eq!(q.extract_max(), Some(0));
        q.insert(2, 4);
        q.delete(2, 4);
        assert_eq!(q.extract_max(), Some(1));
        assert_eq!(q.extract_max(), None);
    }
}
