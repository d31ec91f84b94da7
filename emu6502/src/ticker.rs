use std::thread;
use std::time::Duration;

/// Default CPU clock rate: 1 MHz, the speed of the original part.
pub const DEFAULT_CLOCK_HZ: u32 = 1_000_000;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Best-effort cycle pacing. After each instruction the emulator waits the
/// wall-clock time the hardware would have spent on it, so a program runs at
/// roughly the configured clock rate rather than as fast as the host can go.
pub struct Ticker {
    nanos_per_cycle: u64,
}

impl Ticker {
    pub fn new(clock_hz: u32) -> Ticker {
        Ticker {
            nanos_per_cycle: NANOS_PER_SECOND / u64::from(clock_hz.max(1)),
        }
    }

    /// A ticker that never sleeps. Tests use this to run programs at host
    /// speed.
    pub fn disabled() -> Ticker {
        Ticker { nanos_per_cycle: 0 }
    }

    /// Block for approximately `cycles` CPU cycles of wall-clock time.
    /// Sleeps shorter than the host scheduler's granularity may coalesce;
    /// the contract is best-effort, not cycle-exact.
    pub fn wait(&self, cycles: u8) {
        if self.nanos_per_cycle == 0 {
            return;
        }
        thread::sleep(Duration::from_nanos(
            u64::from(cycles) * self.nanos_per_cycle,
        ));
    }
}
