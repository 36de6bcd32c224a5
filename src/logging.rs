use stderrlog::Timestamp;

/// Logging setup arg group.
#[derive(clap::Args, Debug, Default)]
pub struct LogArgs {
    /// Silence log messages.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Show more engine logging (-v warnings, -vv info, -vvv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Enable timestamped logging.
    #[arg(long, global = true)]
    pub ts: bool,
}

impl LogArgs {
    /// Install the stderr logger. With no `-v`, only errors are shown.
    pub fn setup_logging(&self) -> Result<(), log::SetLoggerError> {
        let log_level = match self.verbose {
            0 => stderrlog::LogLevelNum::Error,
            1 => stderrlog::LogLevelNum::Warn,
            2 => stderrlog::LogLevelNum::Info,
            3 => stderrlog::LogLevelNum::Debug,
            _ => stderrlog::LogLevelNum::Trace,
        };

        stderrlog::new()
            .quiet(self.quiet)
            .verbosity(log_level)
            .timestamp(if self.ts {
                Timestamp::Second
            } else {
                Timestamp::Off
            })
            .init()
    }
}
