//! Command-line configuration for the ranked-user-store server.

use structopt::StructOpt;

/// Options for the server process.
#[derive(Clone, StructOpt)]
#[structopt(name = "rankd")]
pub struct Opt {
    /// TCP port to accept HTTP connections on.
    #[structopt(long = "port")]
    pub port: u16,

    /// Number of worker threads handling accepted connections.
    /// Defaults to the number of logical CPUs.
    #[structopt(long = "workers")]
    pub workers: Option<usize>,

    /// Increase log verbosity. Can be repeated: `-v` for info, `-vv` for debug.
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbosity: u8,
}

impl Opt {
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.verbosity {
            0 => log::LevelFilter::Warn,
            1 => log::LevelFilter::Info,
            _ => log::LevelFilter::Debug,
        }
    }
}
