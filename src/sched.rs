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

use crate::{alarm::AlarmType, time::Ktime};
use alloc::sync::Arc;
use libc::timespec;

/// A handle to a suspended task that an alarm callback can wake.
pub trait Task: Send + Sync {
    fn wake(&self);
}

pub type TaskRef = Arc<dyn Task>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    WakeAlarm,
}

// Per-task scratch carrying the arguments needed to resume an interrupted
// nanosleep after signal handling.
#[derive(Debug, Clone, Copy)]
pub struct RestartBlock {
    pub ty: AlarmType,
    pub expires: Ktime,
    pub rmtp: *mut timespec,
}

// The rmtp pointer is only ever dereferenced from the owning task's own
// context, never from the context the block is stored in.
unsafe impl Send for RestartBlock {}

/// Scheduler, freezer and capability services the sleeping path consumes.
pub trait SchedOps: Send + Sync {
    fn current(&self) -> TaskRef;

    /// Mark the current task interruptible before checking the wake
    /// condition, so a wake between the check and the sleep is not lost.
    fn prepare_to_wait(&self);

    /// Yield until woken by an alarm callback, a signal or the freezer.
    fn schedule(&self);

    /// Restore the current task to the running state after the sleep loop.
    fn set_running(&self);

    fn signal_pending(&self) -> bool;

    /// Whether the freezer is about to halt the current task.
    fn freezing(&self) -> bool;

    fn capable(&self, cap: Capability) -> bool;

    fn set_restart_block(&self, restart: RestartBlock);
}
