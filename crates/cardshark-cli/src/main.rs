use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use cardshark_core::{
    COMPLETE_SWIPE_LEN, CancelToken, Session, SwipeEvent, SwipeOutcome, SwipeRecord,
    TransportError, UsbTransport,
};

#[derive(Parser, Debug)]
#[command(name = "cardshark")]
#[command(version)]
#[command(
    about = "Stream decoded magnetic-stripe swipes from a USB card reader as JSON.",
    long_about = None,
    after_help = "Examples:\n  cardshark --vendor-id 0x0801 --product-id 0x0002\n  cardshark --vendor-id 2049 --product-id 2 --pretty"
)]
struct Cli {
    /// USB vendor id, decimal or 0x-prefixed hexadecimal
    #[arg(long, value_parser = parse_device_id)]
    vendor_id: u16,

    /// USB product id, decimal or 0x-prefixed hexadecimal
    #[arg(long, value_parser = parse_device_id)]
    product_id: u16,

    /// Complete swipe length in bytes (the device's maximum frame size)
    #[arg(long, default_value_t = COMPLETE_SWIPE_LEN)]
    swipe_length: usize,

    /// Pretty-print JSON records
    #[arg(long)]
    pretty: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err.message);
            if let Some(hint) = err.hint {
                eprintln!("hint: {}", hint);
            }
            ExitCode::from(2)
        }
    }
}

#[derive(Debug)]
struct CliError {
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn new(message: impl Into<String>, hint: Option<String>) -> Self {
        Self {
            message: message.into(),
            hint,
        }
    }
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<anyhow::Error> for CliError {
    fn from(err: anyhow::Error) -> Self {
        CliError::new(err.to_string(), None)
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(cli.debug);

    let cancel = CancelToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("Failed to install interrupt handler")?;

    let transport = UsbTransport::open(cli.vendor_id, cli.product_id).map_err(|err| {
        CliError::new(
            format!(
                "cannot open reader {:04x}:{:04x}: {}",
                cli.vendor_id, cli.product_id, err
            ),
            Some("check the ids with lsusb and the device permissions".to_string()),
        )
    })?;
    log::debug!(
        "reader {:04x}:{:04x} opened, waiting for swipes",
        cli.vendor_id,
        cli.product_id
    );

    let mut session = Session::new(transport, cancel).with_swipe_len(cli.swipe_length);
    let mut events = |event: SwipeEvent| match event {
        SwipeEvent::Discarded { bytes: 0 } => log::trace!("read window elapsed with no data"),
        SwipeEvent::Discarded { bytes } => {
            log::warn!("invalid swipe, discarding {bytes} bytes of data")
        }
    };

    loop {
        let outcome = match session.next_swipe(&mut events).map_err(fatal_transport)? {
            Some(outcome) => outcome,
            // Cancelled between reads; nothing in flight to emit.
            None => break,
        };
        match outcome {
            SwipeOutcome::Decoded(record) => emit_record(&record, cli.pretty)?,
            SwipeOutcome::Rejected(err) => log::warn!("discarding malformed swipe: {err}"),
        }
    }

    log::debug!("interrupted, stopping");
    Ok(())
}

fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn emit_record(record: &SwipeRecord, pretty: bool) -> Result<(), CliError> {
    let json = if pretty {
        serde_json::to_string_pretty(record).context("JSON serialization failed")?
    } else {
        serde_json::to_string(record).context("JSON serialization failed")?
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "{json}").context("Failed to write record")?;
    out.flush().context("Failed to flush stdout")?;
    Ok(())
}

fn fatal_transport(err: TransportError) -> CliError {
    CliError::new(
        format!("transport failure: {err}"),
        Some("the reader may have been unplugged; reconnect and restart".to_string()),
    )
}

fn parse_device_id(value: &str) -> Result<u16, String> {
    let (digits, radix) = match value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
    {
        Some(hex) => (hex, 16),
        None => (value, 10),
    };
    u16::from_str_radix(digits, radix).map_err(|err| format!("invalid device id '{value}': {err}"))
}
