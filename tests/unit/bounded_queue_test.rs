//! Tests for the bounded queue under random operation sequences

use qd_scheduler::core::BoundedQueue;
use rand::Rng;

#[test]
fn test_capacity_invariant_under_random_ops() {
    let mut rng = rand::rng();
    for _ in 0..50 {
        let capacity = rng.random_range(0..8);
        let mut q = BoundedQueue::new(capacity);
        let mut model = std::collections::VecDeque::new();
        let mut next = 0u32;

        for _ in 0..200 {
            if rng.random_bool(0.6) {
                let pushed = q.push(next).is_ok();
                assert_eq!(pushed, model.len() < capacity);
                if pushed {
                    model.push_back(next);
                }
                next += 1;
            } else {
                assert_eq!(q.pop(), model.pop_front());
            }
            assert!(q.len() <= capacity);
            assert_eq!(q.len(), model.len());
        }
    }
}

#[test]
fn test_fifo_order_preserved() {
    let mut q = BoundedQueue::new(100);
    for i in 0..100 {
        q.push(i).unwrap();
    }
    for i in 0..100 {
        assert_eq!(q.pop(), Some(i));
    }
    assert_eq!(q.pop(), None);
}

#[test]
fn test_shrunk_queue_rejects_until_below_new_capacity() {
    let mut rng = rand::rng();
    for _ in 0..20 {
        let mut q = BoundedQueue::new(10);
        let held = rng.random_range(1..=10);
        for i in 0..held {
            q.push(i).unwrap();
        }
        let shrunk = rng.random_range(0..held);
        q.set_capacity(shrunk);

        while q.len() >= shrunk {
            assert!(q.push(99).is_err());
            if q.pop().is_none() {
                break;
            }
        }
        if shrunk > 0 {
            assert!(q.push(99).is_ok());
        }
    }
}
