use std::fmt::{self, Debug, Formatter};
use std::fs::{File, OpenOptions};
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Result, bail};
use blskeygen::{SEED_LEN, derive_master_secret_key, random_seed, vectors::KNOWN_ANSWERS};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum, ValueHint};
use clap_complete::{Shell, generate_to};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use zeroize::Zeroizing;

fn main() -> Result<()> {
    let opts = Opts::parse();
    init_tracing(opts.log_level, opts.log_format);
    match opts.cmd {
        Cmd::Derive(cmd) => cmd.run(),
        Cmd::Seed(cmd) => cmd.run(),
        Cmd::SelfTest(cmd) => cmd.run(),
        Cmd::Complete(cmd) => cmd.run(),
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Opts {
    #[clap(subcommand)]
    cmd: Cmd,

    /// The log level to use when RUST_LOG is unset.
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    /// The format of log lines written to stderr.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

trait Runnable {
    fn run(self) -> Result<()>;
}

#[derive(Debug, Subcommand)]
enum Cmd {
    #[command(display_order(1))]
    Derive(DeriveArgs),
    #[command(display_order(2))]
    Seed(SeedArgs),
    #[command(display_order(3))]
    SelfTest(SelfTestArgs),
    #[command(display_order(4))]
    Complete(CompleteArgs),
}

/// Derive a master secret key from a seed.
#[derive(Debug, Parser)]
struct DeriveArgs {
    /// The seed as hex, with or without a 0x prefix.
    #[arg(required_unless_present = "seed_file", conflicts_with = "seed_file")]
    seed: Option<SeedHex>,

    /// The path to a raw binary seed file or '-' for stdin.
    #[arg(long, value_hint = ValueHint::FilePath)]
    seed_file: Option<PathBuf>,

    /// Print the key as 0x-prefixed big-endian hex instead of decimal.
    #[arg(long)]
    hex: bool,

    /// The path to the output file or '-' for stdout.
    #[arg(long, short, value_hint = ValueHint::FilePath, default_value = "-")]
    output: PathBuf,
}

impl Runnable for DeriveArgs {
    fn run(self) -> Result<()> {
        let seed = match (self.seed, &self.seed_file) {
            (Some(seed), _) => seed.0,
            (None, Some(path)) => read_seed(path)?,
            (None, None) => bail!("no seed given"),
        };
        if seed.len() < SEED_LEN {
            warn!(seed_len = seed.len(), "seed is shorter than {SEED_LEN} bytes");
        }

        debug!(seed_len = seed.len(), "deriving master secret key");
        let sk = derive_master_secret_key(seed.as_slice())?;
        let out = Zeroizing::new(if self.hex {
            format!("0x{}", hex::encode(sk.encode()))
        } else {
            sk.to_biguint().to_string()
        });
        writeln!(open_output(&self.output, false)?, "{}", out.as_str())?;
        Ok(())
    }
}

/// Generate a new random seed.
#[derive(Debug, Parser)]
struct SeedArgs {
    /// The path to the new seed file or '-' for stdout. Existing files are never overwritten.
    #[arg(value_hint = ValueHint::FilePath)]
    output: PathBuf,
}

impl Runnable for SeedArgs {
    fn run(self) -> Result<()> {
        let seed = Zeroizing::new(random_seed(rand::thread_rng()));
        open_output(&self.output, true)?.write_all(seed.as_slice())?;
        info!(output = %self.output.display(), "wrote new seed");
        Ok(())
    }
}

/// Check key derivation against the ERC-2333 test vectors.
#[derive(Debug, Parser)]
struct SelfTestArgs {}

impl Runnable for SelfTestArgs {
    fn run(self) -> Result<()> {
        for (i, v) in KNOWN_ANSWERS.iter().enumerate() {
            let seed = v.seed.parse::<SeedHex>()?;
            let sk = derive_master_secret_key(seed.0.as_slice())?.to_biguint().to_string();
            if sk != v.master_sk {
                bail!("test case {i} failed: got {sk} instead of {}", v.master_sk);
            }
            bunt::println!("Test case {} {$green}passed{/$}", i);
        }
        Ok(())
    }
}

/// Generate shell completion scripts.
#[derive(Debug, Parser)]
#[command(hide(true))]
struct CompleteArgs {
    /// The type of shell completion script to generate: bash, elvish, fish, powershell, or zsh.
    #[arg()]
    shell: Shell,

    /// Output directory for shell completion scripts.
    #[arg(value_hint = ValueHint::DirPath)]
    output: PathBuf,
}

impl Runnable for CompleteArgs {
    fn run(self) -> Result<()> {
        let mut app = Opts::command();
        generate_to(self.shell, &mut app, "blskeygen", &self.output)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    const fn directive(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(level: LogLevel, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directive()));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

/// A seed given on the command line as hex.
#[derive(Clone)]
struct SeedHex(Zeroizing<Vec<u8>>);

impl FromStr for SeedHex {
    type Err = ParseSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        Ok(SeedHex(Zeroizing::new(hex::decode(s)?)))
    }
}

impl Debug for SeedHex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SeedHex(<redacted>)")
    }
}

/// Error due to an invalid hex seed.
#[derive(Error, Debug)]
#[error("invalid hex seed: {0}")]
struct ParseSeedError(#[from] hex::FromHexError);

fn read_seed(path: &Path) -> Result<Zeroizing<Vec<u8>>> {
    let mut seed = Zeroizing::new(Vec::with_capacity(SEED_LEN));
    open_input(path)?.read_to_end(&mut seed)?;
    Ok(seed)
}

fn open_input(path: &Path) -> Result<Box<dyn Read>> {
    if path.as_os_str() == "-" {
        if io::stdin().is_terminal() {
            bail!("stdin is a tty");
        }
        Ok(Box::new(io::stdin().lock()))
    } else {
        Ok(Box::new(File::open(path)?))
    }
}

/// Files are created exclusively and readable only by their owner, since every output is secret.
fn open_output(path: &Path, binary: bool) -> Result<Box<dyn Write>> {
    if path.as_os_str() == "-" {
        if binary && io::stdout().is_terminal() {
            bail!("stdout is a tty");
        }
        return Ok(Box::new(io::stdout().lock()));
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;

        options.mode(0o600);
    }

    match options.open(path) {
        Ok(f) => Ok(Box::new(f)),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            bail!("{} already exists", path.display())
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_validity() {
        Opts::command().debug_assert();
    }

    #[test]
    fn seed_hex_prefixes() {
        let bare = "0099ff".parse::<SeedHex>().expect("should parse");
        let prefixed = "0x0099FF".parse::<SeedHex>().expect("should parse");
        assert_eq!(vec![0x00u8, 0x99, 0xFF], *bare.0);
        assert_eq!(*bare.0, *prefixed.0);
    }

    #[test]
    fn empty_seed_hex() {
        let seed = "0x".parse::<SeedHex>().expect("should parse");
        assert!(seed.0.is_empty());
    }

    #[test]
    fn invalid_seed_hex() {
        assert!("0x123".parse::<SeedHex>().is_err(), "parsed odd-length hex");
        assert!("0xzz".parse::<SeedHex>().is_err(), "parsed non-hex");
    }

    #[test]
    fn redacted_seed_debug() {
        let seed = "0x3141".parse::<SeedHex>().expect("should parse");
        assert_eq!("SeedHex(<redacted>)", format!("{seed:?}"));
    }
}
