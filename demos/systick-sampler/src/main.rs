//! SysTick Sampler - interrupt producer, main-loop consumer
//!
//! The SysTick handler pushes a sample into a static queue on every tick.
//! The main loop drains the queue and keeps the last few threshold
//! crossings in a static list. Neither side ever blocks: a full queue
//! drops the sample and the drop shows up in the queue statistics.
//!
//! Build for a Cortex-M4F board:
//! ```text
//! cargo build --release
//! ```

#![no_std]
#![no_main]

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m_rt::{entry, exception};
use panic_halt as _; // Panic handler for embedded
use rtl_containers::{BoundedList, BoundedQueue};

/// Core clock cycles between SysTick interrupts (1 kHz at 8 MHz)
const TICK_RELOAD: u32 = 8_000;

/// Samples at or above this level are recorded as crossings
const THRESHOLD: u16 = 900;

static SAMPLES: BoundedQueue<u16, 32> = BoundedQueue::new();
static CROSSINGS: BoundedList<u16, 8> = BoundedList::new();

#[exception]
fn SysTick() {
    static mut PHASE: u16 = 0;

    *PHASE = (*PHASE + 37) % 1024;
    // Overflow is counted by the queue; nothing else to do in the handler.
    let _ = SAMPLES.add(*PHASE);
}

#[entry]
fn main() -> ! {
    let Some(mut cp) = cortex_m::Peripherals::take() else {
        loop {
            cortex_m::asm::wfi();
        }
    };

    cp.SYST.set_clock_source(SystClkSource::Core);
    cp.SYST.set_reload(TICK_RELOAD);
    cp.SYST.clear_current();
    cp.SYST.enable_counter();
    cp.SYST.enable_interrupt();

    loop {
        while let Some(sample) = SAMPLES.remove() {
            if sample < THRESHOLD {
                continue;
            }
            if CROSSINGS.is_full() {
                // Oldest crossing makes room for the newest
                let _ = CROSSINGS.remove_at(0);
            }
            let _ = CROSSINGS.add(sample);
        }

        if SAMPLES.stats().rejected > 0 {
            // Consumer fell behind; forget the older history.
            CROSSINGS.clear();
            SAMPLES.reset_stats();
        }

        cortex_m::asm::wfi();
    }
}
