use parking_lot::Mutex;
use std::collections::VecDeque;

/// Shared FIFO of interleaved i16 samples bridging the decode thread
/// (producer) and the audio device callback (consumer).
///
/// Every mutation happens under the single mutex; the logical content is
/// always not-yet-played audio in presentation order. Capacity is fixed:
/// if the consumer stalls, the oldest samples are dropped so memory
/// stays bounded and playback resumes near the live edge.
pub struct SampleBuffer {
    samples: Mutex<VecDeque<i16>>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Append decoded samples at the back, dropping the oldest samples
    /// once the capacity bound is exceeded.
    pub fn append(&self, pcm: &[i16]) {
        if pcm.is_empty() {
            return;
        }
        let mut samples = self.samples.lock();
        samples.extend(pcm.iter().copied());
        let len = samples.len();
        if len > self.capacity {
            samples.drain(..len - self.capacity);
        }
    }

    /// Fill `out` from the front of the buffer in FIFO order.
    ///
    /// Copies `min(out.len(), buffered)` samples and removes exactly
    /// that many; the remainder of `out` is silence. Never blocks
    /// waiting for data, and the lock is held only for the copy.
    pub fn mix_into(&self, out: &mut [i16]) {
        out.fill(0);
        let mut samples = self.samples.lock();
        let n = out.len().min(samples.len());
        for (slot, sample) in out.iter_mut().zip(samples.drain(..n)) {
            *slot = sample;
        }
    }

    /// Number of buffered samples.
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fifo_order_across_appends_and_drains() {
        let buffer = SampleBuffer::new(1024);
        buffer.append(&[1, 2, 3]);
        buffer.append(&[4, 5]);

        let mut out = [0i16; 4];
        buffer.mix_into(&mut out);
        assert_eq!(out, [1, 2, 3, 4]);

        buffer.append(&[6]);
        let mut out = [0i16; 2];
        buffer.mix_into(&mut out);
        assert_eq!(out, [5, 6]);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_underrun_yields_silence_of_exact_length() {
        let buffer = SampleBuffer::new(1024);
        buffer.append(&[7, 8]);

        let mut out = [-1i16; 6];
        buffer.mix_into(&mut out);
        assert_eq!(out, [7, 8, 0, 0, 0, 0]);

        // Fully empty: all silence, nothing read past the end.
        let mut out = [-1i16; 3];
        buffer.mix_into(&mut out);
        assert_eq!(out, [0, 0, 0]);
    }

    #[test]
    fn test_empty_append_is_a_noop() {
        let buffer = SampleBuffer::new(8);
        buffer.append(&[]);
        assert_eq!(buffer.len(), 0);

        buffer.append(&[1]);
        buffer.append(&[]);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_capacity_drops_oldest_samples() {
        let buffer = SampleBuffer::new(4);
        buffer.append(&[1, 2, 3, 4]);
        buffer.append(&[5, 6]);
        assert_eq!(buffer.len(), 4);

        let mut out = [0i16; 4];
        buffer.mix_into(&mut out);
        // Oldest two were dropped; surviving samples keep their order.
        assert_eq!(out, [3, 4, 5, 6]);
    }

    #[test]
    fn test_concurrent_producer_consumer_preserves_order() {
        const TOTAL: i16 = 10_000;

        let buffer = Arc::new(SampleBuffer::new(1 << 20));
        let producer = {
            let buffer = buffer.clone();
            thread::spawn(move || {
                for chunk in (1..=TOTAL).collect::<Vec<i16>>().chunks(37) {
                    buffer.append(chunk);
                }
            })
        };

        // Drain exactly what is buffered each round so no silence
        // padding can sneak into the observed sequence.
        let mut observed = Vec::new();
        while observed.len() < TOTAL as usize {
            let available = buffer.len();
            if available == 0 {
                thread::yield_now();
                continue;
            }
            let mut out = vec![0i16; available];
            buffer.mix_into(&mut out);
            observed.extend(out);
        }
        producer.join().unwrap();

        let expected: Vec<i16> = (1..=TOTAL).collect();
        assert_eq!(observed, expected);
    }
}
