// Copyright (c) 2026 vivo Mobile Communication Co., Ltd.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//       http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::{alarm::Alarm, time::Ktime};
use alloc::{collections::BTreeMap, sync::Arc};

// Expiry-ordered key of a queued alarm. The sequence number breaks ties in
// insertion order; the tie-break is not observable by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct QueueKey {
    pub expires: Ktime,
    seq: u64,
}

// The per-base event queue. Insertion, head peek and removal are all
// logarithmic; the head is always the minimum expiry.
#[derive(Default)]
pub(crate) struct TimerQueue {
    entries: BTreeMap<QueueKey, Arc<Alarm>>,
    next_seq: u64,
}

impl TimerQueue {
    pub(crate) const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_seq: 0,
        }
    }

    pub(crate) fn add(&mut self, expires: Ktime, alarm: Arc<Alarm>) -> QueueKey {
        let key = QueueKey {
            expires,
            seq: self.next_seq,
        };
        self.next_seq += 1;
        let old = self.entries.insert(key, alarm);
        debug_assert!(old.is_none());
        key
    }

    pub(crate) fn del(&mut self, key: QueueKey) -> Option<Arc<Alarm>> {
        self.entries.remove(&key)
    }

    pub(crate) fn getnext(&self) -> Option<(QueueKey, &Arc<Alarm>)> {
        self.entries.first_key_value().map(|(k, v)| (*k, v))
    }

    pub(crate) fn next_expires(&self) -> Option<Ktime> {
        self.getnext().map(|(key, _)| key.expires)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::AlarmType;
    use alloc::boxed::Box;

    fn dummy_alarm() -> Arc<Alarm> {
        Alarm::new(AlarmType::Realtime, Box::new(|_| {}))
    }

    #[test]
    fn test_head_is_minimum_expiry() {
        let mut q = TimerQueue::new();
        q.add(Ktime::from_ns(30), dummy_alarm());
        q.add(Ktime::from_ns(10), dummy_alarm());
        q.add(Ktime::from_ns(20), dummy_alarm());
        assert_eq!(q.next_expires(), Some(Ktime::from_ns(10)));
        assert_eq!(q.len(), 3);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let mut q = TimerQueue::new();
        let first = dummy_alarm();
        let second = dummy_alarm();
        let k1 = q.add(Ktime::from_ns(5), first.clone());
        let k2 = q.add(Ktime::from_ns(5), second);
        assert!(k1 < k2);
        let (head, alarm) = q.getnext().unwrap();
        assert_eq!(head, k1);
        assert!(Arc::ptr_eq(alarm, &first));
    }

    #[test]
    fn test_del_reveals_new_head() {
        let mut q = TimerQueue::new();
        let k1 = q.add(Ktime::from_ns(10), dummy_alarm());
        q.add(Ktime::from_ns(20), dummy_alarm());
        assert!(q.del(k1).is_some());
        assert_eq!(q.next_expires(), Some(Ktime::from_ns(20)));
        // Deleting a key twice is a no-op.
        assert!(q.del(k1).is_none());
    }

    #[test]
    fn test_empty_queue() {
        let mut q = TimerQueue::new();
        assert!(q.is_empty());
        assert!(q.next_expires().is_none());
        let k = q.add(Ktime::from_ns(1), dummy_alarm());
        assert!(!q.is_empty());
        q.del(k);
        assert!(q.is_empty());
    }
}
