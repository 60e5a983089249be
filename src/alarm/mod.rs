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

// Each alarm type owns a base: an expiry-ordered queue plus one absolute
// mode dispatch timer that is always programmed for the head of the queue.
// The dispatch callback drains expired alarms, re-arms periodic ones at
// their original phase, and runs callbacks with the base lock released so
// that a callback may re-enter the alarm API.

pub(crate) mod queue;

use crate::{
    clock::{Clock, DispatchTimer},
    rtc::{RtcClass, RtcDevice, RtcSlot},
    sched::{SchedOps, TaskRef},
    sync::SpinLock,
    time::Ktime,
};
use alloc::{boxed::Box, sync::Arc};
use self::queue::{QueueKey, TimerQueue};

pub const ALARM_NUMTYPE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmType {
    Realtime = 0,
    Boottime = 1,
}

pub type AlarmHandler = Box<dyn Fn(&Arc<Alarm>) + Send + Sync>;

#[derive(Default)]
struct AlarmState {
    expires: Ktime,
    period: Ktime,
    enabled: bool,
    key: Option<QueueKey>,
}

/// A one-shot or periodic event bound to a base clock, a deadline and a
/// callback. Created detached and disabled; attach with
/// [`AlarmTimer::start`].
pub struct Alarm {
    ty: AlarmType,
    function: AlarmHandler,
    // Mutable queue bookkeeping, only written under the owning base's lock.
    state: SpinLock<AlarmState>,
    // Hand-off slot for the sleeping path: holds the waiting task until the
    // callback consumes it.
    data: SpinLock<Option<TaskRef>>,
}

impl Alarm {
    pub fn new(ty: AlarmType, function: AlarmHandler) -> Arc<Self> {
        Arc::new(Self {
            ty,
            function,
            state: SpinLock::new(AlarmState::default()),
            data: SpinLock::new(None),
        })
    }

    pub fn alarm_type(&self) -> AlarmType {
        self.ty
    }

    pub fn expires(&self) -> Ktime {
        self.state.lock().expires
    }

    pub fn period(&self) -> Ktime {
        self.state.lock().period
    }

    /// True iff the alarm is currently linked into its base's queue.
    pub fn enabled(&self) -> bool {
        self.state.lock().enabled
    }

    pub(crate) fn set_data(&self, task: Option<TaskRef>) {
        *self.data.lock() = task;
    }

    pub(crate) fn take_data(&self) -> Option<TaskRef> {
        self.data.lock().take()
    }

    pub(crate) fn has_data(&self) -> bool {
        self.data.lock().is_some()
    }
}

pub(crate) struct AlarmBase {
    pub(crate) queue: SpinLock<TimerQueue>,
    pub(crate) timer: Arc<dyn DispatchTimer>,
    pub(crate) gettime: Arc<dyn Clock>,
}

impl AlarmBase {
    fn new(gettime: Arc<dyn Clock>, timer: Arc<dyn DispatchTimer>) -> Self {
        Self {
            queue: SpinLock::new(TimerQueue::new()),
            timer,
            gettime,
        }
    }

    // Must hold the base lock. Links the alarm and, when it becomes the new
    // head, reprograms the dispatch timer for it.
    fn enqueue(&self, q: &mut TimerQueue, alarm: &Arc<Alarm>) {
        let mut state = alarm.state.lock();
        debug_assert!(state.key.is_none());
        let key = q.add(state.expires, alarm.clone());
        state.key = Some(key);
        state.enabled = true;
        if q.getnext().map(|(head, _)| head) == Some(key) {
            self.timer.interrupt_at(state.expires);
        }
    }

    // Must hold the base lock. Unlinks the alarm; when it was the head the
    // dispatch timer moves to the new head, or is stopped on an empty queue.
    fn remove(&self, q: &mut TimerQueue, alarm: &Arc<Alarm>) {
        let mut state = alarm.state.lock();
        state.enabled = false;
        let Some(key) = state.key.take() else {
            return;
        };
        let was_head = q.getnext().map(|(head, _)| head) == Some(key);
        q.del(key);
        if was_head {
            match q.next_expires() {
                Some(next) => self.timer.interrupt_at(next),
                None => self.timer.stop(),
            }
        }
    }
}

/// The alarm timer subsystem: one base per [`AlarmType`], the freezer delta
/// consumed at suspend, and the RTC used for suspend wakeups.
pub struct AlarmTimer {
    pub(crate) bases: [AlarmBase; ALARM_NUMTYPE],
    pub(crate) freezer_delta: SpinLock<Ktime>,
    pub(crate) rtc: RtcSlot,
    pub(crate) sched: Arc<dyn SchedOps>,
}

impl AlarmTimer {
    pub fn new(
        realtime: Arc<dyn Clock>,
        realtime_timer: Arc<dyn DispatchTimer>,
        boottime: Arc<dyn Clock>,
        boottime_timer: Arc<dyn DispatchTimer>,
        rtc_class: Arc<RtcClass>,
        sched: Arc<dyn SchedOps>,
    ) -> Arc<Self> {
        Arc::new(Self {
            bases: [
                AlarmBase::new(realtime, realtime_timer),
                AlarmBase::new(boottime, boottime_timer),
            ],
            freezer_delta: SpinLock::new(Ktime::ZERO),
            rtc: RtcSlot::new(rtc_class),
            sched,
        })
    }

    pub(crate) fn base(&self, ty: AlarmType) -> &AlarmBase {
        &self.bases[ty as usize]
    }

    /// The RTC selected for suspend wakeups, if one has been registered.
    pub fn rtcdev(&self) -> Option<Arc<dyn RtcDevice>> {
        self.rtc.get()
    }

    /// Attach an alarm for an absolute `start` time. A zero `period` makes
    /// it one-shot. An already attached alarm is moved.
    pub fn start(&self, alarm: &Arc<Alarm>, start: Ktime, period: Ktime) {
        let base = self.base(alarm.ty);
        let mut q = base.queue.lock();
        if alarm.state.lock().enabled {
            base.remove(&mut q, alarm);
        }
        {
            let mut state = alarm.state.lock();
            state.expires = start;
            state.period = period;
        }
        base.enqueue(&mut q, alarm);
    }

    /// Detach an alarm. Best effort against a concurrent drain: a callback
    /// already past the unlink point still runs once, but is not re-fired.
    pub fn cancel(&self, alarm: &Arc<Alarm>) {
        let base = self.base(alarm.ty);
        let mut q = base.queue.lock();
        base.remove(&mut q, alarm);
    }

    /// Dispatch engine, called by the platform when a base's dispatch timer
    /// fires. Drains every alarm due at the base clock's current time and
    /// reprograms the dispatch timer for the next head, if any.
    pub fn expire(&self, ty: AlarmType) {
        let base = self.base(ty);
        let mut q = base.queue.lock();
        let now = base.gettime.read_time();
        loop {
            let (key, alarm) = {
                let Some((key, alarm)) = q.getnext() else {
                    break;
                };
                (key, alarm.clone())
            };
            let expired = key.expires;
            if expired > now {
                break;
            }

            q.del(key);
            {
                let mut state = alarm.state.lock();
                state.key = None;
                state.enabled = false;
                // Periodic alarms advance from the expiry that just fired,
                // never from `now`, to preserve their phase. A lagging
                // clock makes the drain loop fire each missed period once.
                if !state.period.is_zero() {
                    state.expires = expired.add(state.period);
                    let key = q.add(state.expires, alarm.clone());
                    state.key = Some(key);
                    state.enabled = true;
                }
            }
            // Callbacks may re-enter the alarm API; run them unlocked.
            drop(q);
            (alarm.function)(&alarm);
            q = base.queue.lock();
        }
        match q.next_expires() {
            Some(next) => base.timer.interrupt_at(next),
            None => base.timer.stop(),
        }
    }

    // Record the remaining sleep time of a task about to be frozen; suspend
    // consumes the smallest such delta when programming the RTC.
    pub(crate) fn freezer_set(&self, absexp: Ktime, ty: AlarmType) {
        let delta = absexp.sub(self.base(ty).gettime.read_time());
        let mut min = self.freezer_delta.lock();
        if min.is_zero() || delta < *min {
            *min = delta;
        }
    }
}
