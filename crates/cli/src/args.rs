//! Command-line parsing

use anyhow::{anyhow, bail, Context};
use proxyq_domain::{BlockMode, ProxyEndpoint};

/// A parsed `proxyq` invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Push proxies into the queue without blocking.
    Seed { proxies: Vec<ProxyEndpoint> },
    /// Print queue size, bound and this handle's counters.
    Stats,
    /// Take one proxy. `mode = None` uses the configured acquire mode.
    Acquire { mode: Option<BlockMode>, standby: bool },
    /// Return one proxy.
    Release { proxy: ProxyEndpoint, mode: BlockMode },
    /// Pop everything currently queued.
    Drain,
    Help,
}

/// Parse arguments (without the program name).
///
/// # Errors
/// Fails on unknown subcommands, unknown flags, malformed proxies or
/// timeouts.
pub fn parse<I>(args: I) -> anyhow::Result<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(task) = args.next() else {
        return Ok(Command::Help);
    };
    let rest: Vec<String> = args.collect();

    match task.as_str() {
        "seed" => {
            if rest.is_empty() {
                bail!("seed needs at least one host:port[:user:pass]");
            }
            let proxies = rest.iter().map(|s| parse_proxy(s)).collect::<anyhow::Result<_>>()?;
            Ok(Command::Seed { proxies })
        }
        "stats" => no_extra(&rest, Command::Stats),
        "drain" => no_extra(&rest, Command::Drain),
        "acquire" => {
            let flags = Flags::parse(&rest, true)?;
            if !flags.positional.is_empty() {
                bail!("acquire takes no positional arguments");
            }
            Ok(Command::Acquire { mode: flags.mode()?, standby: flags.standby })
        }
        "release" => {
            let flags = Flags::parse(&rest, false)?;
            let [proxy] = flags.positional.as_slice() else {
                bail!("release needs exactly one host:port[:user:pass]");
            };
            let mode = flags.mode()?.unwrap_or(BlockMode::NonBlocking);
            Ok(Command::Release { proxy: parse_proxy(proxy)?, mode })
        }
        "help" | "--help" | "-h" => Ok(Command::Help),
        unknown => Err(anyhow!("Unknown command: {unknown}")),
    }
}

fn no_extra(rest: &[String], command: Command) -> anyhow::Result<Command> {
    match rest.first() {
        Some(extra) => Err(anyhow!("unexpected argument: {extra}")),
        None => Ok(command),
    }
}

fn parse_proxy(raw: &str) -> anyhow::Result<ProxyEndpoint> {
    raw.parse::<ProxyEndpoint>().map_err(|e| anyhow!(e))
}

#[derive(Debug, Default)]
struct Flags {
    block: bool,
    timeout_secs: Option<f64>,
    standby: bool,
    positional: Vec<String>,
}

impl Flags {
    fn parse(args: &[String], allow_standby: bool) -> anyhow::Result<Self> {
        let mut flags = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--block" => flags.block = true,
                "--timeout" => {
                    let value = iter.next().ok_or_else(|| anyhow!("--timeout needs a value"))?;
                    let secs = value
                        .parse::<f64>()
                        .with_context(|| format!("invalid --timeout value '{value}'"))?;
                    flags.timeout_secs = Some(secs);
                }
                "--standby" if allow_standby => flags.standby = true,
                other if other.starts_with("--") => bail!("unknown flag: {other}"),
                other => flags.positional.push(other.to_string()),
            }
        }
        Ok(flags)
    }

    /// `--timeout` implies `--block`; neither flag yields `None`.
    fn mode(&self) -> anyhow::Result<Option<BlockMode>> {
        if !self.block && self.timeout_secs.is_none() {
            return Ok(None);
        }
        BlockMode::from_flags(true, self.timeout_secs).map(Some).map_err(|e| anyhow!(e))
    }
}
