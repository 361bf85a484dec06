mod config;
mod error;
mod normalizer;
mod output;
mod parsers;
mod speech;
mod stats;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use config::Config;
use crossbeam::channel::Sender;
use memmap2::Mmap;
use speech::ViewRecord;
use stats::SessionStats;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Bytes of one input, either mapped from disk or read from stdin.
enum Input {
    Mapped(Mmap),
    Buffered(String),
}

impl Input {
    fn open(path: &str) -> Result<Self> {
        if path == "-" {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            return Ok(Input::Buffered(buf));
        }
        let file = File::open(path)?;
        // an empty file cannot be mapped on every platform
        if file.metadata()?.len() == 0 {
            return Ok(Input::Buffered(String::new()));
        }
        let mmap = unsafe { Mmap::map(&file)? };
        Ok(Input::Mapped(mmap))
    }

    fn as_str(&self) -> Result<&str> {
        match self {
            Input::Mapped(mmap) => Ok(std::str::from_utf8(mmap)?),
            Input::Buffered(s) => Ok(s.as_str()),
        }
    }

    fn len(&self) -> usize {
        match self {
            Input::Mapped(mmap) => mmap.len(),
            Input::Buffered(s) => s.len(),
        }
    }
}

#[derive(Default)]
struct Totals {
    bytes: u64,
    speeches: usize,
    records: usize,
}

/// What the writer thread receives.
enum Message {
    Batch(Vec<ViewRecord>),
    /// The run failed: stop without closing the document.
    Abort,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,speechnorm=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::parse();
    if config.batch_size == 0 {
        return Err(anyhow!("--batch-size must be at least 1"));
    }

    let start_time = Instant::now();

    // channel for sending normalized batches to the writer
    let (tx, rx) = crossbeam::channel::unbounded::<Message>();

    let writer = output::create_writer(&config.output)?;
    let writer_handle = std::thread::spawn(move || drain(writer, rx));

    let mut totals = Totals::default();
    let outcome = process_files(&config, &tx, &mut totals);
    if outcome.is_err() {
        // the writer may already be gone; its own error is reported below
        let _ = tx.send(Message::Abort);
    }

    // close channel so writer thread can finish
    drop(tx);
    let written = writer_handle
        .join()
        .map_err(|_| anyhow!("writer thread panicked"))?
        .map(|_| ());
    let sessions = settle(&config.output, outcome, written)?;

    info!(
        files = config.files.len(),
        speeches = totals.speeches,
        records = totals.records,
        "done"
    );

    if config.stats {
        stats::print_report(&sessions);
    }
    if config.benchmark {
        print_benchmark_results(&totals, start_time.elapsed());
    }

    Ok(())
}

/// Write batches until the channel closes. Returns the finished sink, or
/// `None` when the run was aborted and the document left open.
fn drain<W: Write>(
    mut writer: output::Writer<W>,
    rx: crossbeam::channel::Receiver<Message>,
) -> Result<Option<W>> {
    for message in rx {
        match message {
            Message::Batch(batch) => writer.write_batch(&batch)?,
            Message::Abort => return Ok(None),
        }
    }
    Ok(Some(writer.finish()?))
}

/// A failed writer is reported ahead of the run's own error, which is then
/// usually just the closed channel. Any failure removes the output file.
fn settle<T>(output_arg: &str, outcome: Result<T>, written: Result<()>) -> Result<T> {
    if outcome.is_err() || written.is_err() {
        discard_output(output_arg);
    }
    written.context("writing output")?;
    outcome
}

fn discard_output(output_arg: &str) {
    if let Some(path) = output::target_path(output_arg) {
        match std::fs::remove_file(path) {
            Ok(()) => warn!(path = %path.display(), "removed incomplete output"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not remove incomplete output"),
        }
    }
}

fn process_files(
    config: &Config,
    tx: &Sender<Message>,
    totals: &mut Totals,
) -> Result<Vec<SessionStats>> {
    let mut sessions = Vec::new();
    for path in &config.files {
        sessions.extend(process_file(config, path, tx, totals)?);
    }
    Ok(sessions)
}

/// Normalize a whole session before sending any of it, so a bad speech
/// never leaves part of a session in the output.
fn process_file(
    config: &Config,
    path: &str,
    tx: &Sender<Message>,
    totals: &mut Totals,
) -> Result<Option<SessionStats>> {
    let input = Input::open(path).with_context(|| format!("reading {}", path))?;
    let text = input.as_str().with_context(|| format!("{} is not UTF-8", path))?;
    let speeches = parsers::parse(&config.format, text).with_context(|| format!("parsing {}", path))?;
    debug!(path, speeches = speeches.len(), "parsed session");

    let records = normalizer::normalize(&speeches, config.on_missing)
        .with_context(|| format!("normalizing {}", path))?;

    totals.bytes += input.len() as u64;
    totals.speeches += speeches.len();
    totals.records += records.len();

    let session = config.stats.then(|| {
        let name = stats::session_id(&speeches).unwrap_or_else(|| session_name(path));
        SessionStats::from_records(&name, &records, &speeches)
    });

    let mut records = records.into_iter().peekable();
    while records.peek().is_some() {
        let batch: Vec<ViewRecord> = records.by_ref().take(config.batch_size).collect();
        tx.send(Message::Batch(batch))
            .map_err(|_| anyhow!("writer thread stopped early"))?;
    }
    Ok(session)
}

fn session_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

fn print_benchmark_results(totals: &Totals, duration: Duration) {
    let duration_secs = duration.as_secs_f64();
    let size_mb = totals.bytes as f64 / (1024.0 * 1024.0);

    eprintln!("\n=== BENCHMARK RESULTS ===");
    eprintln!("Input size: {:.2} MB", size_mb);
    eprintln!("Speeches: {}", totals.speeches);
    eprintln!("Records written: {}", totals.records);
    eprintln!("Processing time: {:.3}s", duration_secs);
    eprintln!("Throughput: {:.2} MB/s", size_mb / duration_secs);
    eprintln!("Throughput: {:.0} speeches/s", totals.speeches as f64 / duration_secs);
}
