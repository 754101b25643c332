//! Host simulation of a flight-control main loop
//!
//! Runs three periodic tasks on the time-triggered scheduler, driven by the
//! POSIX ticker. Stops on Ctrl-C or after `--seconds`, and performs a safe
//! shutdown if the dispatcher reports an overrun.

use std::cell::Cell;
use std::error::Error;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use log::LevelFilter;
use tt_posix::{logger, PosixTicker};
use tt_sch::{Scheduler, SchedulerConfig, TickCounter, TickRate, DEFAULT_MAX_TASKS};

static TICKS: TickCounter = TickCounter::new();

#[derive(Parser, Debug)]
#[command(author, version, about = "Time-triggered scheduler host demo")]
struct Opts {
    /// Tick rate in Hz
    #[arg(long, default_value_t = 1000)]
    rate: u32,

    /// Tick backlog above which overrun is reported
    #[arg(long, default_value_t = tt_sch::DEFAULT_TICK_COUNT_LIMIT)]
    limit: u32,

    /// Run time in seconds, 0 to run until Ctrl-C
    #[arg(long, default_value_t = 5)]
    seconds: u64,

    /// Extra work per attitude update in microseconds, to provoke overrun
    #[arg(long, default_value_t = 0)]
    load_us: u64,

    /// Log debug output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let level = if opts.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    if let Err(err) = logger::init(level) {
        eprintln!("logger error: {err}");
    }

    match run(&opts) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            log::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Run the main loop; returns `false` if it ended in a safe shutdown
fn run(opts: &Opts) -> Result<bool, Box<dyn Error>> {
    let keep_running = Arc::new(AtomicBool::new(true));
    {
        let keep_running = Arc::clone(&keep_running);
        ctrlc::set_handler(move || keep_running.store(false, Ordering::SeqCst))?;
    }

    let rate = TickRate::from_hz(opts.rate)?;
    let config = SchedulerConfig::new(rate).with_tick_count_limit(opts.limit);

    let updates = Cell::new(0u64);
    let frames = Cell::new(0u64);
    let load = Duration::from_micros(opts.load_us);

    let mut attitude = || {
        updates.set(updates.get() + 1);
        if !load.is_zero() {
            thread::sleep(load);
        }
    };
    let mut telemetry = || {
        frames.set(frames.get() + 1);
        log::debug!("telemetry frame {} ({} attitude updates)", frames.get(), updates.get());
    };
    let mut heartbeat = || log::info!("heartbeat: {} attitude updates", updates.get());

    let mut sched: Scheduler<'_, PosixTicker, DEFAULT_MAX_TASKS> =
        Scheduler::new(PosixTicker::new(), &TICKS);
    sched.init(config)?;
    sched.add_task(&mut attitude, 0, 1)?;
    sched.add_task(&mut telemetry, 1, rate.ticks_from_millis(100).max(1))?;
    sched.add_task(&mut heartbeat, 2, rate.ticks_from_millis(1000).max(1))?;

    log::info!("starting scheduler at {} with {} tasks", rate, sched.tasks().occupied());
    sched.start()?;

    let deadline = (opts.seconds > 0).then(|| Instant::now() + Duration::from_secs(opts.seconds));
    let mut healthy = true;

    while keep_running.load(Ordering::SeqCst) {
        if sched.dispatch() {
            safe_shutdown(&mut sched);
            healthy = false;
            break;
        }
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            break;
        }
        thread::yield_now();
    }

    if sched.is_running() {
        sched.stop();
    }
    let stats = sched.stats();
    log::info!(
        "stopped: {} ticks drained, {} task releases, backlog {}",
        stats.ticks,
        stats.releases,
        sched.backlog()
    );
    Ok(healthy)
}

/// Host-side reaction to a reported overrun
fn safe_shutdown(sched: &mut Scheduler<'_, PosixTicker, DEFAULT_MAX_TASKS>) {
    sched.stop();
    log::error!(
        "overrun: tick backlog exceeded {}, tasks overran the tick period; shutting down",
        TICKS.limit()
    );
}
