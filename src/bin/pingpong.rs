//! Ping-pong latency demo.
//!
//! A server and a client run on separate threads and talk over two in-memory pipes. Each
//! round, the client sends a ping and waits for the pong; both sides are written as
//! `try_seq` chains and driven with the synchronous driver.

use std::{
    error::Error,
    thread,
    time::{Duration, Instant},
};

use clap::{Parser, ValueEnum};
use tryseq::{
    driver::{drive_with, DriveOptions, Idle},
    pipe::{pipe, PipeReceiver, PipeSender},
    prelude::*,
    Code,
};

/// Idle strategy between polls that returned `Pending`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum IdleArg {
    Spin,
    Yield,
    Sleep,
}

/// CLI arguments for the ping-pong demo
#[derive(Parser, Debug)]
#[command(name = "pingpong")]
#[command(about = "Measure round-trip latency of promise chains over in-memory pipes")]
struct Args {
    /// Number of ping-pong rounds
    #[arg(long, default_value = "1000")]
    rounds: u32,

    /// Value the client sends
    #[arg(long, default_value = "1")]
    ping: u32,

    /// Value the server answers with
    #[arg(long, default_value = "2")]
    pong: u32,

    #[arg(long, value_enum, default_value = "yield")]
    idle: IdleArg,

    /// Sleep duration when `--idle sleep` is used
    #[arg(long, default_value = "10")]
    sleep_micros: u64,

    /// Give up on a round after this many polls
    #[arg(long)]
    max_polls: Option<usize>,
}

impl Args {
    fn drive_options(&self) -> DriveOptions {
        let idle = match self.idle {
            IdleArg::Spin => Idle::Spin,
            IdleArg::Yield => Idle::Yield,
            IdleArg::Sleep => Idle::Sleep {
                micros: self.sleep_micros,
            },
        };
        DriveOptions {
            max_polls: self.max_polls,
            idle,
        }
    }
}

/// Answer every ping with `pong` until the client hangs up. Returns the number of rounds served.
fn serve(
    requests: PipeReceiver<u32>,
    responses: PipeSender<u32>,
    pong: u32,
    options: DriveOptions,
) -> Result<u32, Status> {
    let mut served = 0;
    loop {
        let round = tryseq::try_seq!(
            requests.recv(),
            |ping: u32| {
                tracing::trace!(ping, "server got ping");
                Poll::Ready(StatusOr::Ok(pong))
            },
            |pong: u32| Poll::Ready(responses.send(pong)),
        );
        match drive_with(round, DriveOptions { max_polls: None, ..options }) {
            Ok(Ok(())) => served += 1,
            Ok(Err(status)) if status.code() == Code::Unavailable => return Ok(served),
            Ok(Err(status)) => return Err(status),
            Err(err) => return Err(Status::deadline_exceeded(err.to_string())),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let options = args.drive_options();
    tracing::info!(?options, rounds = args.rounds, "starting ping-pong");

    let (request_tx, request_rx) = pipe::<u32>();
    let (response_tx, response_rx) = pipe::<u32>();

    let pong = args.pong;
    let server = thread::spawn(move || serve(request_rx, response_tx, pong, options));

    let mut latencies = Vec::with_capacity(args.rounds as usize);
    for _ in 0..args.rounds {
        let start = Instant::now();
        let round = Poll::Ready(request_tx.send(args.ping)).try_then(|()| response_rx.recv());
        let response = drive_with(round, options)??;
        latencies.push(start.elapsed());

        if response != args.pong {
            return Err(format!("expected pong {}, got {response}", args.pong).into());
        }
    }

    drop(request_tx);
    let served = server.join().map_err(|_| "server thread panicked")??;

    report(&latencies);
    println!("Server answered {served} rounds");
    Ok(())
}

fn report(latencies: &[Duration]) {
    if latencies.is_empty() {
        println!("No rounds run");
        return;
    }

    let mut sorted = latencies.to_vec();
    sorted.sort();
    let total: Duration = sorted.iter().sum();
    let micros = |d: Duration| d.as_secs_f64() * 1e6;

    println!("Rounds: {}", sorted.len());
    println!("Min latency: {:.2} µs", micros(sorted[0]));
    println!("Avg latency: {:.2} µs", micros(total) / sorted.len() as f64);
    println!("P50 latency: {:.2} µs", micros(sorted[sorted.len() / 2]));
    println!("Max latency: {:.2} µs", micros(sorted[sorted.len() - 1]));
}
