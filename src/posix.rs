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

// The clock table exposed to the posix timer layer. Two alarm clock ids map
// onto the two alarm types; everything else is rejected at this boundary.
// All operations require a wakealarm-capable RTC, and the ones that can arm
// a wakeup additionally require the wake-alarm capability.

use crate::{
    alarm::{Alarm, AlarmTimer, AlarmType},
    clock::{Clock, DispatchTimer},
    config,
    error::{Error, Result},
    rtc::RtcClass,
    sched::{Capability, RestartBlock, SchedOps},
    time::Ktime,
};
use alloc::{boxed::Box, sync::Arc};
use core::sync::atomic::{AtomicU64, Ordering};
use libc::{c_int, c_long, clockid_t, itimerspec, timespec};
use spin::Once;

pub const CLOCK_REALTIME_ALARM: clockid_t = 8;
pub const CLOCK_BOOTTIME_ALARM: clockid_t = 9;
pub const TIMER_ABSTIME: c_int = 1;

fn clock2alarm(which_clock: clockid_t) -> Result<AlarmType> {
    match which_clock {
        CLOCK_REALTIME_ALARM => Ok(AlarmType::Realtime),
        CLOCK_BOOTTIME_ALARM => Ok(AlarmType::Boottime),
        _ => Err(Error::NotSupported),
    }
}

// Callback of the sleeping path: hand the stashed task out of the alarm and
// wake it. Clearing the slot first is what tells the sleeper it fired.
fn nsleep_wakeup(alarm: &Arc<Alarm>) {
    if let Some(task) = alarm.take_data() {
        task.wake();
    }
}

/// Upward delivery of a timer expiry event to the posix timer dispatcher.
/// Returns false when the event could not be delivered.
pub type TimerEventFn = Box<dyn Fn(&PosixTimer) -> bool + Send + Sync>;

/// The alarm-clock slice of a user-visible posix timer: its clock id, the
/// embedded alarm and the overrun accounting.
pub struct PosixTimer {
    it_clock: clockid_t,
    alarm: Once<Arc<Alarm>>,
    overrun: AtomicU64,
    deliver: TimerEventFn,
}

impl PosixTimer {
    pub fn new(it_clock: clockid_t, deliver: TimerEventFn) -> Arc<Self> {
        Arc::new(Self {
            it_clock,
            alarm: Once::new(),
            overrun: AtomicU64::new(0),
            deliver,
        })
    }

    pub fn clockid(&self) -> clockid_t {
        self.it_clock
    }

    /// Expiry events accumulated but not yet delivered.
    pub fn overrun(&self) -> u64 {
        self.overrun.load(Ordering::Relaxed)
    }
}

/// The operation table registered under the alarm clock ids.
pub trait PosixClockOps: Send + Sync {
    fn clock_getres(&self, which_clock: clockid_t) -> Result<timespec>;

    fn clock_get(&self, which_clock: clockid_t) -> Result<timespec>;

    fn timer_create(&self, timer: &Arc<PosixTimer>) -> Result<()>;

    fn timer_set(
        &self,
        timer: &Arc<PosixTimer>,
        flags: c_int,
        new_setting: &mut itimerspec,
        old_setting: Option<&mut itimerspec>,
    ) -> Result<()>;

    fn timer_get(&self, timer: &Arc<PosixTimer>) -> Result<itimerspec>;

    fn timer_del(&self, timer: &Arc<PosixTimer>) -> Result<()>;

    /// `tsreq` has already been copied in; `rmtp` still points at the
    /// caller's memory and is only written on interruption.
    fn nsleep(
        &self,
        which_clock: clockid_t,
        flags: c_int,
        tsreq: &timespec,
        rmtp: *mut timespec,
    ) -> Result<()>;

    fn nsleep_restart(&self, restart: RestartBlock) -> Result<()>;
}

/// Consumer of the clock registration done at init.
pub trait PosixClockRegistry {
    fn register_clock(&self, which_clock: clockid_t, clock: Arc<dyn PosixClockOps>);
}

impl AlarmTimer {
    // Suspend the current task until the alarm fires at `absexp` or a
    // signal arrives. Returns true when it fired.
    fn do_nsleep(&self, alarm: &Arc<Alarm>, absexp: Ktime) -> bool {
        alarm.set_data(Some(self.sched.current()));
        loop {
            self.sched.prepare_to_wait();
            self.start(alarm, absexp, Ktime::ZERO);
            if alarm.has_data() {
                self.sched.schedule();
            }
            self.cancel(alarm);
            if !alarm.has_data() || self.sched.signal_pending() {
                break;
            }
        }
        self.sched.set_running();
        !alarm.has_data()
    }

    // Report the time still left until `exp`. Ok(false) means the deadline
    // already passed and the interrupted sleep should report plain success.
    fn update_rmtp(&self, exp: Ktime, ty: AlarmType, rmtp: *mut timespec) -> Result<bool> {
        let rem = exp.sub(self.base(ty).gettime.read_time());
        if rem.as_ns() <= 0 {
            return Ok(false);
        }
        // The caller checked for null; an integration whose user copy can
        // fault maps that failure to Error::Fault here.
        unsafe {
            *rmtp = rem.to_timespec();
        }
        Ok(true)
    }
}

impl PosixClockOps for AlarmTimer {
    fn clock_getres(&self, which_clock: clockid_t) -> Result<timespec> {
        let ty = clock2alarm(which_clock)?;
        if self.rtcdev().is_none() {
            return Err(Error::NotSupported);
        }
        Ok(self.base(ty).gettime.resolution().to_timespec())
    }

    fn clock_get(&self, which_clock: clockid_t) -> Result<timespec> {
        let ty = clock2alarm(which_clock)?;
        if self.rtcdev().is_none() {
            return Err(Error::NotSupported);
        }
        Ok(self.base(ty).gettime.read_time().to_timespec())
    }

    fn timer_create(&self, timer: &Arc<PosixTimer>) -> Result<()> {
        if self.rtcdev().is_none() {
            return Err(Error::NotSupported);
        }
        if !self.sched.capable(Capability::WakeAlarm) {
            return Err(Error::PermissionDenied);
        }
        let ty = clock2alarm(timer.it_clock)?;
        let weak = Arc::downgrade(timer);
        let alarm = Alarm::new(
            ty,
            Box::new(move |_| {
                let Some(owner) = weak.upgrade() else {
                    return;
                };
                if !(owner.deliver)(&owner) {
                    owner.overrun.fetch_add(1, Ordering::Relaxed);
                }
            }),
        );
        timer.alarm.call_once(|| alarm);
        Ok(())
    }

    fn timer_set(
        &self,
        timer: &Arc<PosixTimer>,
        _flags: c_int,
        new_setting: &mut itimerspec,
        old_setting: Option<&mut itimerspec>,
    ) -> Result<()> {
        if self.rtcdev().is_none() {
            return Err(Error::NotSupported);
        }
        // Hold the interval at the floor; see config.
        if new_setting.it_interval.tv_sec == 0
            && (new_setting.it_interval.tv_nsec as i64) < config::TIMER_MIN_INTERVAL_NS
        {
            new_setting.it_interval.tv_nsec = config::TIMER_MIN_INTERVAL_NS as c_long;
        }
        let value = Ktime::from_timespec(&new_setting.it_value)?;
        let interval = Ktime::from_timespec(&new_setting.it_interval)?;
        if let Some(old) = old_setting {
            *old = self.timer_get(timer)?;
        }
        let Some(alarm) = timer.alarm.get() else {
            return Err(Error::Invalid);
        };
        self.cancel(alarm);
        self.start(alarm, value, interval);
        Ok(())
    }

    fn timer_get(&self, timer: &Arc<PosixTimer>) -> Result<itimerspec> {
        if self.rtcdev().is_none() {
            return Err(Error::NotSupported);
        }
        let Some(alarm) = timer.alarm.get() else {
            return Err(Error::Invalid);
        };
        Ok(itimerspec {
            it_interval: alarm.period().to_timespec(),
            it_value: alarm.expires().to_timespec(),
        })
    }

    fn timer_del(&self, timer: &Arc<PosixTimer>) -> Result<()> {
        if self.rtcdev().is_none() {
            return Err(Error::NotSupported);
        }
        let Some(alarm) = timer.alarm.get() else {
            return Err(Error::Invalid);
        };
        self.cancel(alarm);
        Ok(())
    }

    fn nsleep(
        &self,
        which_clock: clockid_t,
        flags: c_int,
        tsreq: &timespec,
        rmtp: *mut timespec,
    ) -> Result<()> {
        let ty = clock2alarm(which_clock)?;
        if self.rtcdev().is_none() {
            return Err(Error::NotSupported);
        }
        if !self.sched.capable(Capability::WakeAlarm) {
            return Err(Error::PermissionDenied);
        }

        let alarm = Alarm::new(ty, Box::new(nsleep_wakeup));
        let mut exp = Ktime::from_timespec(tsreq)?;
        if flags != TIMER_ABSTIME {
            let now = self.base(ty).gettime.read_time();
            exp = now.add_safe(exp);
        }

        if self.do_nsleep(&alarm, exp) {
            return Ok(());
        }

        // Interrupted by a signal.
        if self.sched.freezing() {
            self.freezer_set(exp, ty);
        }
        if flags == TIMER_ABSTIME {
            // The caller already knows the absolute deadline.
            return Err(Error::RestartNoHand);
        }
        if !rmtp.is_null() && !self.update_rmtp(exp, ty, rmtp)? {
            return Ok(());
        }
        self.sched.set_restart_block(RestartBlock {
            ty,
            expires: exp,
            rmtp,
        });
        Err(Error::RestartBlock)
    }

    fn nsleep_restart(&self, restart: RestartBlock) -> Result<()> {
        let RestartBlock { ty, expires, rmtp } = restart;
        let alarm = Alarm::new(ty, Box::new(nsleep_wakeup));

        if self.do_nsleep(&alarm, expires) {
            return Ok(());
        }

        if self.sched.freezing() {
            self.freezer_set(expires, ty);
        }
        if !rmtp.is_null() && !self.update_rmtp(expires, ty, rmtp)? {
            return Ok(());
        }
        self.sched.set_restart_block(restart);
        Err(Error::RestartBlock)
    }
}

/// Wires both alarm bases, selects the RTC class used for suspend wakeups
/// and registers the clock table under both alarm clock ids.
pub fn alarmtimer_init(
    realtime: Arc<dyn Clock>,
    realtime_timer: Arc<dyn DispatchTimer>,
    boottime: Arc<dyn Clock>,
    boottime_timer: Arc<dyn DispatchTimer>,
    rtc_class: Arc<RtcClass>,
    sched: Arc<dyn SchedOps>,
    registry: &dyn PosixClockRegistry,
) -> Arc<AlarmTimer> {
    let timer = AlarmTimer::new(
        realtime,
        realtime_timer,
        boottime,
        boottime_timer,
        rtc_class,
        sched,
    );
    registry.register_clock(CLOCK_REALTIME_ALARM, timer.clone());
    registry.register_clock(CLOCK_BOOTTIME_ALARM, timer.clone());
    timer
}
