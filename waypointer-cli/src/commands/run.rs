//! Run command - replay a sensor script through the reactor.
//!
//! Each script line is one input event:
//!
//! ```text
//! # comment
//! dest 35.01 139.0     destination text, exactly as typed
//! pos 35.0 139.0       position fix
//! hdg 350              compass heading
//! heading-lost         compass unavailable
//! position-lost        position fix unavailable
//! clear                destination removed
//! ```
//!
//! Sensor lines go through a [`ManualSensorFeed`] and its forwarders, the
//! rest go straight to the reactor. Every accepted line produces exactly one
//! snapshot, which is printed before the next line is read.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use waypointer::reactor::{
    DerivedState, DerivedStateReactor, ReactorConfig, ReactorError, ReactorHandle,
    ReactorService,
};
use waypointer::sensor::{spawn_heading_forwarder, spawn_position_forwarder, ManualSensorFeed};

use crate::error::CliError;
use crate::runner::CliRunner;
use crate::OutputFormat;

/// Arguments for the run command.
#[derive(Default)]
pub struct RunArgs {
    pub script: Option<PathBuf>,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
    pub dest_lat: Option<String>,
    pub dest_lon: Option<String>,
}

/// One parsed script line.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptCommand {
    Position { latitude: f64, longitude: f64 },
    Heading(f64),
    Destination { latitude: String, longitude: String },
    ClearDestination,
    HeadingLost,
    PositionLost,
}

impl fmt::Display for ScriptCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptCommand::Position {
                latitude,
                longitude,
            } => write!(f, "pos {} {}", latitude, longitude),
            ScriptCommand::Heading(degrees) => write!(f, "hdg {}", degrees),
            ScriptCommand::Destination {
                latitude,
                longitude,
            } => write!(f, "dest {} {}", latitude, longitude),
            ScriptCommand::ClearDestination => write!(f, "clear"),
            ScriptCommand::HeadingLost => write!(f, "heading-lost"),
            ScriptCommand::PositionLost => write!(f, "position-lost"),
        }
    }
}

/// Parse one script line.
///
/// Blank lines and `#` comments yield `Ok(None)`. Range checks are left to
/// the sensor feed so rejected readings behave as they would from hardware.
pub fn parse_line(line: &str) -> Result<Option<ScriptCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let keyword = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    let expect_args = |count: usize| {
        if args.len() == count {
            Ok(())
        } else {
            Err(format!(
                "'{}' takes {} argument(s), got {}",
                keyword,
                count,
                args.len()
            ))
        }
    };

    let command = match keyword {
        "pos" => {
            expect_args(2)?;
            ScriptCommand::Position {
                latitude: parse_number(args[0])?,
                longitude: parse_number(args[1])?,
            }
        }
        "hdg" => {
            expect_args(1)?;
            ScriptCommand::Heading(parse_number(args[0])?)
        }
        "dest" => {
            expect_args(2)?;
            ScriptCommand::Destination {
                latitude: args[0].to_string(),
                longitude: args[1].to_string(),
            }
        }
        "clear" => {
            expect_args(0)?;
            ScriptCommand::ClearDestination
        }
        "heading-lost" => {
            expect_args(0)?;
            ScriptCommand::HeadingLost
        }
        "position-lost" => {
            expect_args(0)?;
            ScriptCommand::PositionLost
        }
        other => return Err(format!("unknown command '{}'", other)),
    };

    Ok(Some(command))
}

fn parse_number(text: &str) -> Result<f64, String> {
    text.parse::<f64>()
        .map_err(|_| format!("'{}' is not a number", text))
}

/// Run the run command.
pub fn run(args: RunArgs) -> Result<(), CliError> {
    let runner = CliRunner::new(args.config.as_deref())?;
    runner.log_startup("run");
    let reactor_config = runner.config().reactor_config();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::Runtime(e.to_string()))?;

    // Set up signal handler for graceful shutdown
    let cancellation = CancellationToken::new();
    let signal = cancellation.clone();
    ctrlc::set_handler(move || {
        signal.cancel();
    })
    .map_err(|e| CliError::Runtime(format!("Failed to set signal handler: {}", e)))?;

    let stdout = std::io::stdout();
    runtime.block_on(replay(
        args,
        reactor_config,
        cancellation,
        &mut stdout.lock(),
    ))
}

/// Replay a script, writing one line per snapshot to `out`.
async fn replay<W: Write>(
    args: RunArgs,
    config: ReactorConfig,
    cancellation: CancellationToken,
    out: &mut W,
) -> Result<(), CliError> {
    let source = args
        .script
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<stdin>".to_string());
    let mut lines = open_script(args.script.as_deref()).await?;

    let feed = ManualSensorFeed::new();
    let reactor = ReactorService::spawn(
        DerivedStateReactor::with_config(config),
        cancellation.child_token(),
    );

    let positions = spawn_position_forwarder(&feed, reactor.clone(), cancellation.child_token());
    let headings = spawn_heading_forwarder(&feed, reactor.clone(), cancellation.child_token());

    let mut session = ReplaySession {
        snapshots: reactor.subscribe(),
        feed: &feed,
        reactor: &reactor,
        cancellation: &cancellation,
        format: args.format,
    };

    let mut result: Result<(), CliError> = Ok(());
    if let (Some(latitude), Some(longitude)) = (args.dest_lat, args.dest_lon) {
        let command = ScriptCommand::Destination {
            latitude,
            longitude,
        };
        result = session.step(&command, &command.to_string(), out).await.map(|_| ());
    }
    if result.is_ok() {
        result = session.drive(&mut lines, &source, out).await;
    }

    cancellation.cancel();
    let forwarded_positions = positions.await.unwrap_or_default();
    let forwarded_headings = headings.await.unwrap_or_default();
    reactor.join().await;

    let (rejected_positions, rejected_headings) = feed.rejected_counts();
    info!(
        forwarded_positions,
        forwarded_headings,
        rejected_positions,
        rejected_headings,
        "Replay finished"
    );

    result
}

/// What a single step did.
enum StepOutcome {
    /// Snapshot published and printed
    Printed,
    /// Sensor reading rejected, nothing published
    Rejected,
    /// Reactor stopped or replay cancelled
    Stopped,
}

/// Pipeline pieces a replay feeds and reads back from.
struct ReplaySession<'a> {
    snapshots: broadcast::Receiver<DerivedState>,
    feed: &'a ManualSensorFeed,
    reactor: &'a ReactorHandle,
    cancellation: &'a CancellationToken,
    format: OutputFormat,
}

impl ReplaySession<'_> {
    /// Read and apply script lines until the script ends or the run stops.
    async fn drive<R, W>(
        &mut self,
        lines: &mut Lines<R>,
        source: &str,
        out: &mut W,
    ) -> Result<(), CliError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut line_number = 0;

        loop {
            let line = tokio::select! {
                biased;

                _ = self.cancellation.cancelled() => {
                    info!("Replay cancelled");
                    return Ok(());
                }

                line = lines.next_line() => line,
            };

            let line = match line {
                Ok(Some(line)) => line,
                Ok(None) => return Ok(()),
                Err(error) => {
                    return Err(CliError::ScriptRead {
                        path: source.to_string(),
                        error,
                    })
                }
            };
            line_number += 1;

            let command = match parse_line(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(message) => {
                    return Err(CliError::Script {
                        line: line_number,
                        message,
                    })
                }
            };

            match self.step(&command, line.trim(), out).await? {
                StepOutcome::Printed => {}
                StepOutcome::Rejected => {
                    warn!(line = line_number, "Sensor reading rejected: {}", line.trim());
                }
                StepOutcome::Stopped => return Ok(()),
            }
        }
    }

    /// Apply one command and print the snapshot it produces.
    async fn step<W: Write>(
        &mut self,
        command: &ScriptCommand,
        label: &str,
        out: &mut W,
    ) -> Result<StepOutcome, CliError> {
        match apply(command, self.feed, self.reactor) {
            Ok(true) => {}
            Ok(false) => return Ok(StepOutcome::Rejected),
            Err(e) => {
                debug!(error = %e, "Reactor stopped, ending replay");
                return Ok(StepOutcome::Stopped);
            }
        }

        match next_snapshot(&mut self.snapshots, self.cancellation).await {
            Some(state) => {
                print_snapshot(out, self.format, label, &state)?;
                Ok(StepOutcome::Printed)
            }
            None => Ok(StepOutcome::Stopped),
        }
    }
}

/// Feed one command into the pipeline.
///
/// Returns `Ok(false)` if a sensor reading was rejected as invalid.
fn apply(
    command: &ScriptCommand,
    feed: &ManualSensorFeed,
    reactor: &ReactorHandle,
) -> Result<bool, ReactorError> {
    match command {
        ScriptCommand::Position {
            latitude,
            longitude,
        } => Ok(feed.publish_position(*latitude, *longitude)),
        ScriptCommand::Heading(degrees) => Ok(feed.publish_heading(*degrees)),
        ScriptCommand::Destination {
            latitude,
            longitude,
        } => reactor
            .destination(latitude.as_str(), longitude.as_str())
            .map(|_| true),
        ScriptCommand::ClearDestination => reactor.clear_destination().map(|_| true),
        ScriptCommand::HeadingLost => reactor.heading_lost().map(|_| true),
        ScriptCommand::PositionLost => reactor.position_lost().map(|_| true),
    }
}

async fn open_script(
    path: Option<&Path>,
) -> Result<Lines<Box<dyn AsyncBufRead + Unpin + Send>>, CliError> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match path {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .map_err(|error| CliError::ScriptRead {
                    path: path.display().to_string(),
                    error,
                })?;
            Box::new(BufReader::new(file))
        }
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    Ok(reader.lines())
}

/// Wait for the next published snapshot.
///
/// Returns `None` on cancellation or if the reactor has gone away.
async fn next_snapshot(
    snapshots: &mut broadcast::Receiver<DerivedState>,
    cancellation: &CancellationToken,
) -> Option<DerivedState> {
    loop {
        tokio::select! {
            biased;

            _ = cancellation.cancelled() => return None,

            received = snapshots.recv() => match received {
                Ok(state) => return Some(state),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Snapshot output lagging");
                }
                Err(RecvError::Closed) => return None,
            },
        }
    }
}

fn print_snapshot<W: Write>(
    out: &mut W,
    format: OutputFormat,
    label: &str,
    state: &DerivedState,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Text => writeln!(out, "{:<24} {}", label, state),
        OutputFormat::Json => {
            let line = json!({ "input": label, "state": state });
            writeln!(out, "{}", serde_json::to_string(&line)?)
        }
    }
    .map_err(CliError::Write)
}
