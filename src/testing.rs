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

// Deterministic stand-ins for the platform collaborators, shared by the
// test modules. The clock only moves when a test moves it, and the dispatch
// timer records its programming instead of firing on its own.

use crate::{
    alarm::AlarmTimer,
    clock::{Clock, DispatchTimer},
    rtc::{RtcClass, RtcDevice},
    sched::{Capability, RestartBlock, SchedOps, Task, TaskRef},
    sync::SpinLock,
    time::Ktime,
};
use alloc::{boxed::Box, sync::Arc};
use core::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use libc::clockid_t;

pub(crate) struct TestClock {
    id: clockid_t,
    now: SpinLock<Ktime>,
}

impl TestClock {
    pub(crate) fn new(id: clockid_t) -> Arc<Self> {
        Arc::new(Self {
            id,
            now: SpinLock::new(Ktime::ZERO),
        })
    }

    pub(crate) fn set(&self, now: Ktime) {
        *self.now.lock() = now;
    }
}

impl Clock for TestClock {
    fn clockid(&self) -> clockid_t {
        self.id
    }

    fn read_time(&self) -> Ktime {
        *self.now.lock()
    }

    fn resolution(&self) -> Ktime {
        Ktime::from_ns(1)
    }
}

pub(crate) struct TestTimer {
    armed: SpinLock<Option<Ktime>>,
}

impl TestTimer {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            armed: SpinLock::new(None),
        })
    }

    pub(crate) fn armed(&self) -> Option<Ktime> {
        *self.armed.lock()
    }
}

impl DispatchTimer for TestTimer {
    fn interrupt_at(&self, expires: Ktime) {
        *self.armed.lock() = Some(expires);
    }

    fn stop(&self) {
        *self.armed.lock() = None;
    }
}

pub(crate) struct TestRtc {
    name: &'static str,
    wakealarm: bool,
    now: SpinLock<Ktime>,
    alarm: SpinLock<Option<Ktime>>,
    cancels: AtomicUsize,
}

impl TestRtc {
    pub(crate) fn new(name: &'static str, wakealarm: bool) -> Arc<Self> {
        Arc::new(Self {
            name,
            wakealarm,
            now: SpinLock::new(Ktime::ZERO),
            alarm: SpinLock::new(None),
            cancels: AtomicUsize::new(0),
        })
    }

    pub(crate) fn set_time(&self, now: Ktime) {
        *self.now.lock() = now;
    }

    pub(crate) fn alarm(&self) -> Option<Ktime> {
        *self.alarm.lock()
    }

    pub(crate) fn cancels(&self) -> usize {
        self.cancels.load(Ordering::Relaxed)
    }
}

impl RtcDevice for TestRtc {
    fn name(&self) -> &str {
        self.name
    }

    fn supports_alarm(&self) -> bool {
        true
    }

    fn may_wakeup(&self) -> bool {
        self.wakealarm
    }

    fn read_time(&self) -> Ktime {
        *self.now.lock()
    }

    fn set_alarm(&self, expires: Ktime) {
        *self.alarm.lock() = Some(expires);
    }

    fn cancel_alarm(&self) {
        self.cancels.fetch_add(1, Ordering::Relaxed);
        *self.alarm.lock() = None;
    }
}

pub(crate) struct TestTask {
    woken: AtomicUsize,
}

impl TestTask {
    pub(crate) fn woken_count(&self) -> usize {
        self.woken.load(Ordering::Relaxed)
    }
}

impl Task for TestTask {
    fn wake(&self) {
        self.woken.fetch_add(1, Ordering::Relaxed);
    }
}

type ScheduleHook = Box<dyn FnMut() + Send>;

// A single-task scheduler whose `schedule` runs a test-provided hook, so a
// test decides what "sleeping" observes: the alarm firing, a signal, both
// or nothing.
pub(crate) struct TestSched {
    pub(crate) task: Arc<TestTask>,
    signal: AtomicBool,
    freezing: AtomicBool,
    capable: AtomicBool,
    schedules: AtomicUsize,
    restart: SpinLock<Option<RestartBlock>>,
    on_schedule: SpinLock<Option<ScheduleHook>>,
}

impl TestSched {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            task: Arc::new(TestTask {
                woken: AtomicUsize::new(0),
            }),
            signal: AtomicBool::new(false),
            freezing: AtomicBool::new(false),
            capable: AtomicBool::new(true),
            schedules: AtomicUsize::new(0),
            restart: SpinLock::new(None),
            on_schedule: SpinLock::new(None),
        })
    }

    pub(crate) fn set_signal_pending(&self, pending: bool) {
        self.signal.store(pending, Ordering::Relaxed);
    }

    pub(crate) fn set_freezing(&self, freezing: bool) {
        self.freezing.store(freezing, Ordering::Relaxed);
    }

    pub(crate) fn set_capable(&self, capable: bool) {
        self.capable.store(capable, Ordering::Relaxed);
    }

    pub(crate) fn set_on_schedule(&self, hook: ScheduleHook) {
        *self.on_schedule.lock() = Some(hook);
    }

    pub(crate) fn take_restart(&self) -> Option<RestartBlock> {
        self.restart.lock().take()
    }

    pub(crate) fn schedule_count(&self) -> usize {
        self.schedules.load(Ordering::Relaxed)
    }
}

impl SchedOps for TestSched {
    fn current(&self) -> TaskRef {
        self.task.clone()
    }

    fn prepare_to_wait(&self) {}

    fn schedule(&self) {
        self.schedules.fetch_add(1, Ordering::Relaxed);
        if let Some(hook) = self.on_schedule.lock().as_mut() {
            hook();
        }
    }

    fn set_running(&self) {}

    fn signal_pending(&self) -> bool {
        self.signal.load(Ordering::Relaxed)
    }

    fn freezing(&self) -> bool {
        self.freezing.load(Ordering::Relaxed)
    }

    fn capable(&self, cap: Capability) -> bool {
        match cap {
            Capability::WakeAlarm => self.capable.load(Ordering::Relaxed),
        }
    }

    fn set_restart_block(&self, restart: RestartBlock) {
        *self.restart.lock() = Some(restart);
    }
}

pub(crate) struct TestEnv {
    pub(crate) realtime: Arc<TestClock>,
    pub(crate) boottime: Arc<TestClock>,
    pub(crate) realtime_timer: Arc<TestTimer>,
    pub(crate) boottime_timer: Arc<TestTimer>,
    pub(crate) rtc_class: Arc<RtcClass>,
    pub(crate) sched: Arc<TestSched>,
    pub(crate) timer: Arc<AlarmTimer>,
}

impl TestEnv {
    pub(crate) fn new() -> Self {
        let realtime = TestClock::new(libc::CLOCK_REALTIME);
        let boottime = TestClock::new(libc::CLOCK_BOOTTIME);
        let realtime_timer = TestTimer::new();
        let boottime_timer = TestTimer::new();
        let rtc_class = Arc::new(RtcClass::new());
        let sched = TestSched::new();
        let timer = AlarmTimer::new(
            realtime.clone(),
            realtime_timer.clone(),
            boottime.clone(),
            boottime_timer.clone(),
            rtc_class.clone(),
            sched.clone(),
        );
        Self {
            realtime,
            boottime,
            realtime_timer,
            boottime_timer,
            rtc_class,
            sched,
            timer,
        }
    }

    // Same wiring plus one wakealarm-capable RTC already registered.
    pub(crate) fn with_rtc() -> (Self, Arc<TestRtc>) {
        let env = Self::new();
        let rtc = TestRtc::new("rtc0", true);
        env.rtc_class.register(rtc.clone());
        (env, rtc)
    }
}
