use std::fmt;
use std::hint::black_box;
use std::io::{self, Write};
use std::time::Duration;

use tracing::{debug, info};

use crate::bit_array::PackedBitArray;
use crate::byte_array::ByteArray;
use crate::config::Config;
use crate::error::BenchError;
use crate::storage::BoolStorage;
use crate::timer::ScopedTimer;
use crate::workload::Workload;

/// Destination for values read in the hot loop.
///
/// Every observation goes through [`black_box`], so the compiler has to keep
/// the read that produced it. Nothing here is checked for correctness.
#[derive(Debug, Default)]
pub struct Sink {
    last: bool,
    ones: u64,
}

impl Sink {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn observe(&mut self, value: bool) {
        let value = black_box(value);
        self.last = value;
        self.ones += value as u64;
    }

    pub fn last(&self) -> bool {
        self.last
    }

    /// How many observed values were `true`.
    pub fn ones(&self) -> u64 {
        self.ones
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    RawBytes,
    PackedBits,
}

impl Case {
    /// Order the harness runs the cases in.
    pub const ALL: [Case; 2] = [Case::RawBytes, Case::PackedBits];

    pub const fn label(self) -> &'static str {
        match self {
            Case::RawBytes => "Case 2: Raw Memory (u8 bytes)",
            Case::PackedBits => "Case 1: PackedBitArray (u64 words)",
        }
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseReport {
    pub case: Case,
    pub elapsed: Duration,
}

/// Read-modify-write every index in order: negate the slot, then read it back
/// into the sink.
#[inline(never)]
pub fn apply_workload<S: BoolStorage + ?Sized>(
    storage: &mut S,
    indices: &[usize],
    sink: &mut Sink,
) {
    for &idx in indices {
        storage.flip(idx);
        sink.observe(storage.get(idx));
    }
}

fn timed<S: BoolStorage, W: Write>(
    mut storage: S,
    workload: &Workload,
    sink: &mut Sink,
    timer: ScopedTimer<W>,
) -> Duration {
    apply_workload(&mut storage, workload.indices(), sink);
    let elapsed = timer.finish();

    // the buffer goes back to the allocator only after the timed region
    drop(storage);
    elapsed
}

/// Allocates the case's container, times one pass of the workload over it
/// and releases the container again. `start_timer` is called once the
/// container is ready, so allocation stays outside the measurement.
fn run_case_timed<W: Write>(
    case: Case,
    workload: &Workload,
    sink: &mut Sink,
    start_timer: impl FnOnce(&'static str) -> ScopedTimer<W>,
) -> Result<CaseReport, BenchError> {
    let item_count = workload.item_count();
    debug!(case = %case, item_count, accesses = workload.len(), "starting case");

    let elapsed = match case {
        Case::RawBytes => {
            let storage = ByteArray::new(item_count)?;
            timed(storage, workload, sink, start_timer(case.label()))
        }
        Case::PackedBits => {
            let storage = PackedBitArray::new(item_count)?;
            timed(storage, workload, sink, start_timer(case.label()))
        }
    };

    debug!(
        case = %case,
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        sink_last = sink.last(),
        sink_ones = sink.ones(),
        "finished case"
    );

    Ok(CaseReport { case, elapsed })
}

/// Runs one case and prints its report line to stdout.
pub fn run_case(
    case: Case,
    workload: &Workload,
    sink: &mut Sink,
) -> Result<CaseReport, BenchError> {
    run_case_timed(case, workload, sink, |label| ScopedTimer::start(label))
}

/// Same as [`run_case`], with the report line going to `out`.
pub fn run_case_with_writer<W: Write>(
    case: Case,
    workload: &Workload,
    sink: &mut Sink,
    out: W,
) -> Result<CaseReport, BenchError> {
    run_case_timed(case, workload, sink, |label| ScopedTimer::start_with_writer(label, out))
}

fn run_all_inner<W: Write>(
    config: &Config,
    mut out: W,
    mut run: impl FnMut(Case, &Workload, &mut Sink, &mut W) -> Result<CaseReport, BenchError>,
) -> Result<Vec<CaseReport>, BenchError> {
    // progress output is best effort, like the timer reports
    let _ = writeln!(out, "Generating {} random indices...", config.access_count);
    let workload = match config.seed {
        Some(seed) => Workload::from_seed(config.access_count, config.item_count, seed)?,
        None => Workload::from_entropy(config.access_count, config.item_count)?,
    };
    let _ = writeln!(out, "Done generating indices.\n");
    let _ = out.flush();
    debug!(accesses = workload.len(), item_count = workload.item_count(), "workload ready");

    let mut sink = Sink::new();
    let mut reports = Vec::with_capacity(Case::ALL.len());
    for case in Case::ALL {
        reports.push(run(case, &workload, &mut sink, &mut out)?);
    }
    let _ = writeln!(out);

    if let Some(ratio) = slowdown(&reports) {
        info!("packed bits took {ratio:.2}x as long as raw bytes");
    }

    Ok(reports)
}

/// Generates the workload once and runs every case against it, printing the
/// progress and report lines to stdout.
pub fn run_all(config: &Config) -> Result<Vec<CaseReport>, BenchError> {
    run_all_inner(config, io::stdout(), |case, workload, sink, _| run_case(case, workload, sink))
}

/// Same as [`run_all`], with every line going to `out`.
pub fn run_all_with_writer<W: Write>(
    config: &Config,
    out: W,
) -> Result<Vec<CaseReport>, BenchError> {
    run_all_inner(config, out, |case, workload, sink, out| {
        run_case_with_writer(case, workload, sink, out)
    })
}

/// Packed-case time over byte-case time, if both ran and the byte case
/// measured anything at all.
pub fn slowdown(reports: &[CaseReport]) -> Option<f64> {
    let find = |case| reports.iter().find(|r| r.case == case).map(|r| r.elapsed);
    let bytes = find(Case::RawBytes)?;
    let bits = find(Case::PackedBits)?;

    if bytes.is_zero() {
        return None;
    }
    Some(bits.as_secs_f64() / bytes.as_secs_f64())
}
