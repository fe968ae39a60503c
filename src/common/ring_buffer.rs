use std::sync::{Mutex, MutexGuard, PoisonError};

struct RingState<T> {
    data: Box<[T]>,
    /// Index of the oldest unread sample.
    read_index: usize,
    /// Number of unread samples.
    len: usize,
}

impl<T: Copy> RingState<T> {
    fn capacity(&self) -> usize {
        self.data.len()
    }

    fn write_index(&self) -> usize {
        (self.read_index + self.len) % self.capacity()
    }

    fn push(&mut self, value: T) {
        let write_index = self.write_index();
        self.data[write_index] = value;
        if self.len == self.capacity() {
            // Full, drop the oldest sample.
            self.read_index = (self.read_index + 1) % self.capacity();
        } else {
            self.len += 1;
        }
    }
}

/// A fixed capacity circular sample store shared by one producer
/// and one consumer.
///
/// * [`insert`](RingBuffer::insert) appends samples, overwriting the
///   oldest unread samples when the capacity is exceeded.
/// * [`read`](RingBuffer::read) copies the oldest samples without consuming them.
/// * [`pop`](RingBuffer::pop) drops the oldest samples without copying them.
///
/// Every operation is a single critical section, so an insert never
/// interleaves with a read or a pop. A read followed by a pop is two
/// critical sections; this is fine as long as both are issued from the
/// consumer thread, since the producer only ever adds samples.
pub struct RingBuffer<T> {
    state: Mutex<RingState<T>>,
}

impl<T: Copy + Default> RingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        if capacity == 0 {
            panic!("Ring buffer capacity must be greater than 0")
        }
        RingBuffer {
            state: Mutex::new(RingState {
                data: vec![T::default(); capacity].into_boxed_slice(),
                read_index: 0,
                len: 0,
            }),
        }
    }
}

impl<T: Copy> RingBuffer<T> {
    fn lock(&self) -> MutexGuard<'_, RingState<T>> {
        // The state is plain data and stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends `samples`. If the number of unread samples would exceed the
    /// capacity, the oldest samples are dropped, so only the most recent
    /// `capacity` samples are kept.
    pub fn insert(&self, samples: &[T]) {
        let mut state = self.lock();
        let capacity = state.capacity();
        if samples.len() >= capacity {
            let newest = &samples[samples.len() - capacity..];
            state.data.copy_from_slice(newest);
            state.read_index = 0;
            state.len = capacity;
            return;
        }

        let write_index = state.write_index();
        let first_len = samples.len().min(capacity - write_index);
        state.data[write_index..write_index + first_len].copy_from_slice(&samples[..first_len]);
        let rest = &samples[first_len..];
        state.data[..rest.len()].copy_from_slice(rest);

        let len = state.len + samples.len();
        if len > capacity {
            let overflow = len - capacity;
            state.read_index = (state.read_index + overflow) % capacity;
            state.len = capacity;
        } else {
            state.len = len;
        }
    }

    /// Appends the values produced by `samples` within a single critical section.
    /// Used for inputs that need converting, like 16 bit PCM.
    pub fn insert_iter<I>(&self, samples: I)
    where
        I: IntoIterator<Item = T>,
    {
        let mut state = self.lock();
        for sample in samples {
            state.push(sample);
        }
    }

    /// Copies the `dst.len()` oldest unread samples into `dst` without
    /// consuming them. Returns false, leaving `dst` untouched, if fewer
    /// samples are available.
    pub fn read(&self, dst: &mut [T]) -> bool {
        let state = self.lock();
        let count = dst.len();
        if state.len < count {
            return false;
        }
        let capacity = state.capacity();
        let first_len = count.min(capacity - state.read_index);
        dst[..first_len].copy_from_slice(&state.data[state.read_index..state.read_index + first_len]);
        dst[first_len..].copy_from_slice(&state.data[..count - first_len]);
        true
    }

    /// Drops the `min(count, len())` oldest unread samples.
    pub fn pop(&self, count: usize) {
        let mut state = self.lock();
        let count = count.min(state.len);
        state.read_index = (state.read_index + count) % state.capacity();
        state.len -= count;
    }

    /// The number of unread samples.
    pub fn len(&self) -> usize {
        self.lock().len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.lock().capacity()
    }

    /// Drops all unread samples.
    pub fn clear(&self) {
        let mut state = self.lock();
        state.read_index = 0;
        state.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::RingBuffer;
    use std::sync::Arc;
    use std::thread;

    fn ramp(start: usize, count: usize) -> Vec<f32> {
        (start..start + count).map(|i| i as f32).collect()
    }

    #[test]
    fn test_insert_and_read() {
        let buffer = RingBuffer::<f32>::new(8);
        buffer.insert(&ramp(0, 5));
        assert_eq!(buffer.len(), 5);

        let mut dst = [0.0; 3];
        assert!(buffer.read(&mut dst));
        assert_eq!(dst, [0.0, 1.0, 2.0]);
        // Reading does not consume
        assert_eq!(buffer.len(), 5);
        assert!(buffer.read(&mut dst));
        assert_eq!(dst, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_read_fails_without_enough_samples() {
        let buffer = RingBuffer::<f32>::new(8);
        buffer.insert(&ramp(0, 3));
        let mut dst = [-1.0; 4];
        assert!(!buffer.read(&mut dst));
        assert_eq!(dst, [-1.0; 4]);
        assert_eq!(buffer.len(), 3);

        let mut exact = [0.0; 3];
        assert!(buffer.read(&mut exact));
        assert_eq!(exact, [0.0, 1.0, 2.0]);
    }

    #[test]
    fn test_pop() {
        let buffer = RingBuffer::<f32>::new(8);
        buffer.insert(&ramp(0, 6));
        buffer.pop(4);
        assert_eq!(buffer.len(), 2);
        let mut dst = [0.0; 2];
        assert!(buffer.read(&mut dst));
        assert_eq!(dst, [4.0, 5.0]);

        // Popping more than available empties the buffer
        buffer.pop(100);
        assert!(buffer.is_empty());
        buffer.pop(1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_wrap_around() {
        let buffer = RingBuffer::<f32>::new(8);
        buffer.insert(&ramp(0, 6));
        buffer.pop(5);
        buffer.insert(&ramp(6, 6));
        assert_eq!(buffer.len(), 7);
        let mut dst = [0.0; 7];
        assert!(buffer.read(&mut dst));
        assert_eq!(dst, [5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0]);
    }

    #[test]
    fn test_overflow_keeps_newest() {
        let buffer = RingBuffer::<f32>::new(8);
        buffer.insert(&ramp(0, 6));
        buffer.insert(&ramp(6, 5));
        assert_eq!(buffer.len(), 8);
        let mut dst = [0.0; 8];
        assert!(buffer.read(&mut dst));
        assert_eq!(dst, [3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
    }

    #[test]
    fn test_insert_more_than_capacity() {
        let buffer = RingBuffer::<f32>::new(8);
        buffer.insert(&ramp(0, 3));
        buffer.insert(&ramp(100, 20));
        assert_eq!(buffer.len(), 8);
        let mut dst = [0.0; 8];
        assert!(buffer.read(&mut dst));
        assert_eq!(dst.to_vec(), ramp(112, 8));
    }

    #[test]
    fn test_insert_iter_matches_insert() {
        let a = RingBuffer::<f32>::new(8);
        let b = RingBuffer::<f32>::new(8);
        for chunk in [3, 7, 2, 9].iter() {
            let samples = ramp(a.len() * 10, *chunk);
            a.insert(&samples);
            b.insert_iter(samples.iter().copied());
        }
        let mut dst_a = [0.0; 8];
        let mut dst_b = [0.0; 8];
        assert!(a.read(&mut dst_a));
        assert!(b.read(&mut dst_b));
        assert_eq!(dst_a, dst_b);
    }

    #[test]
    fn test_clear() {
        let buffer = RingBuffer::<f64>::new(4);
        buffer.insert(&[1.0, 2.0, 3.0]);
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!(buffer.capacity(), 4);
    }

    #[test]
    fn test_producer_consumer() {
        let buffer = Arc::new(RingBuffer::<f32>::new(4096));
        let producer_buffer = Arc::clone(&buffer);
        let total = 64 * 1000;
        let producer = thread::spawn(move || {
            for chunk in 0..1000 {
                producer_buffer.insert(&ramp(chunk * 64, 64));
            }
        });

        // Whatever the consumer sees must be a contiguous ramp.
        let mut dst = [0.0_f32; 32];
        let mut checked = 0;
        while checked < 200 {
            if buffer.read(&mut dst) {
                for pair in dst.windows(2) {
                    assert_eq!(pair[1] - pair[0], 1.0);
                }
                buffer.pop(16);
                checked += 1;
            }
        }
        producer.join().unwrap();
        assert!(buffer.len() <= buffer.capacity());
        assert!(buffer.read(&mut dst));
        assert!(dst[31] < total as f32);
    }
}
