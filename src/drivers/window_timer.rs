//! Sampling-window one-shot timer.
//!
//! - **`target_os = "espidf"`**: [`EspWindowTimer`] wraps an `esp_timer`
//!   one-shot whose callback runs the snapshot on the global
//!   [`COUNTERS`](crate::counter::COUNTERS).  The callback executes in the
//!   ESP timer task, so the critical section inside the snapshot is safe.
//! - **`not(target_os = "espidf")`**: [`ThreadWindowTimer`] sleeps on a
//!   helper thread per window and uses a generation counter so that a
//!   cancelled or superseded window never fires.
//!
//! A one-shot timer is inert after it fires, which covers "detach the timer
//! before snapshotting": there is nothing left to re-enter.

use crate::app::ports::WindowTimer;
use crate::error::TimerError;

#[cfg(target_os = "espidf")]
pub use esp::EspWindowTimer;
#[cfg(not(target_os = "espidf"))]
pub use sim::ThreadWindowTimer;

// ── ESP-IDF ───────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod esp {
    use esp_idf_svc::sys::*;
    use log::info;

    use super::{TimerError, WindowTimer};
    use crate::counter::COUNTERS;
    use crate::error::InitError;

    unsafe extern "C" fn window_expired_cb(_arg: *mut core::ffi::c_void) {
        COUNTERS.snapshot_and_reset();
    }

    /// Window timer backed by `esp_timer`.
    pub struct EspWindowTimer {
        handle: esp_timer_handle_t,
    }

    impl EspWindowTimer {
        /// Create the (unarmed) timer.  Called once from `main()`.
        pub fn new() -> Result<Self, InitError> {
            let args = esp_timer_create_args_t {
                callback: Some(window_expired_cb),
                arg: core::ptr::null_mut(),
                dispatch_method: esp_timer_dispatch_t_ESP_TIMER_TASK,
                name: b"window\0".as_ptr() as *const _,
                skip_unhandled_events: false,
            };
            let mut handle: esp_timer_handle_t = core::ptr::null_mut();
            // SAFETY: `args` outlives the call; `handle` is written once.
            let ret = unsafe { esp_timer_create(&args, &mut handle) };
            if ret != ESP_OK {
                return Err(InitError::TimerCreateFailed(ret));
            }
            info!("window_timer: esp_timer created");
            Ok(Self { handle })
        }
    }

    impl WindowTimer for EspWindowTimer {
        fn arm(&mut self, duration_ms: u32) -> Result<(), TimerError> {
            // SAFETY: `handle` is a valid timer created in `new()`.
            // Stopping an idle timer returns ESP_ERR_INVALID_STATE, which is fine.
            let ret = unsafe {
                esp_timer_stop(self.handle);
                esp_timer_start_once(self.handle, u64::from(duration_ms) * 1000)
            };
            if ret == ESP_OK {
                Ok(())
            } else {
                Err(TimerError::StartFailed(ret))
            }
        }

        fn cancel(&mut self) {
            // SAFETY: see `arm`.
            unsafe {
                esp_timer_stop(self.handle);
            }
        }

        fn is_armed(&self) -> bool {
            // SAFETY: see `arm`.
            unsafe { esp_timer_is_active(self.handle) }
        }
    }

    impl Drop for EspWindowTimer {
        fn drop(&mut self) {
            // SAFETY: the handle is not used after this point.
            unsafe {
                esp_timer_stop(self.handle);
                esp_timer_delete(self.handle);
            }
        }
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::cell::Cell;
    use std::sync::Arc;
    use std::time::Duration;

    use critical_section::Mutex;
    use log::error;

    use super::{TimerError, WindowTimer};
    use crate::counter::CounterState;

    /// Generation of the current window and whether it is still pending.
    /// Checked and cleared under one critical section, which is what makes
    /// `cancel` deterministic against a sleeping helper thread.
    struct Schedule {
        generation: Cell<u64>,
        armed: Cell<bool>,
    }

    /// Window timer on a helper thread per window.
    pub struct ThreadWindowTimer {
        state: Arc<CounterState>,
        schedule: Arc<Mutex<Schedule>>,
    }

    impl ThreadWindowTimer {
        pub fn new(state: Arc<CounterState>) -> Self {
            Self {
                state,
                schedule: Arc::new(Mutex::new(Schedule {
                    generation: Cell::new(0),
                    armed: Cell::new(false),
                })),
            }
        }

        /// Bump the generation so no sleeping thread can still claim it,
        /// and mark the new generation pending or not.
        fn supersede(&self, armed: bool) -> u64 {
            critical_section::with(|cs| {
                let s = self.schedule.borrow(cs);
                let next = s.generation.get() + 1;
                s.generation.set(next);
                s.armed.set(armed);
                next
            })
        }
    }

    impl WindowTimer for ThreadWindowTimer {
        fn arm(&mut self, duration_ms: u32) -> Result<(), TimerError> {
            let generation = self.supersede(true);

            let state = Arc::clone(&self.state);
            let schedule = Arc::clone(&self.schedule);
            let spawned = std::thread::Builder::new()
                .name("window-timer".into())
                .spawn(move || {
                    std::thread::sleep(Duration::from_millis(u64::from(duration_ms)));
                    let fire = critical_section::with(|cs| {
                        let s = schedule.borrow(cs);
                        let current = s.generation.get() == generation && s.armed.get();
                        if current {
                            s.armed.set(false);
                        }
                        current
                    });
                    if fire {
                        state.snapshot_and_reset();
                    }
                });

            match spawned {
                Ok(_) => Ok(()),
                Err(e) => {
                    error!("window_timer(sim): spawn failed ({})", e);
                    self.supersede(false);
                    Err(TimerError::SpawnFailed)
                }
            }
        }

        fn cancel(&mut self) {
            self.supersede(false);
        }

        fn is_armed(&self) -> bool {
            critical_section::with(|cs| self.schedule.borrow(cs).armed.get())
        }
    }

}
