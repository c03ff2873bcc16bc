//! Advertisement decode utility
//! Decodes Pybricks broadcast advertisements given as hex or read from a capture file

use pybricks_adv::codec;
use pybricks_adv::formats::{self, capture};
use std::env;
use std::io;
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    let format_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr)
        .with_span_events(FmtSpan::NONE);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(format_layer)
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} [--json] [--dump] <hex bytes...>", args[0]);
        eprintln!("       {} [--json] --file <capture.txt>", args[0]);
        eprintln!("\nExamples:");
        eprintln!("  {} 08 FF 97 03 01 00 62 84 03", args[0]);
        eprintln!("  {} --json --file scan_capture.txt", args[0]);
        std::process::exit(1);
    }

    let mut json = false;
    let mut dump = false;
    let mut file = None;
    let mut hex_args = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--json" => json = true,
            "--dump" => dump = true,
            "--file" => {
                let path = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--file needs a path"))?;
                file = Some(path.clone());
            }
            other => hex_args.push(other.to_string()),
        }
    }

    let records = match file {
        Some(path) => {
            tracing::info!("Reading capture file: {}", path);
            capture::load_capture(&path)?
        }
        None => {
            if hex_args.is_empty() {
                anyhow::bail!("No advertisement bytes given");
            }
            let data = formats::parse_hex(&hex_args.join(" "))?;
            vec![capture::CaptureRecord { line: 1, data }]
        }
    };

    tracing::info!("Loaded {} advertisement(s)", records.len());

    if json {
        let decoded = capture::decode_capture(&records);
        capture::write_json_lines(io::stdout().lock(), &decoded)?;
        return Ok(());
    }

    for record in &records {
        print_record(record, dump)?;
    }

    Ok(())
}

fn print_record(record: &capture::CaptureRecord, dump: bool) -> anyhow::Result<()> {
    let data = &record.data;

    println!("Advertisement (line {}): {}", record.line, formats::to_hex(data));
    println!("  Length byte:  {}", data.first().copied().unwrap_or(0));

    if dump {
        formats::write_advertisement_dump(&mut io::stdout().lock(), data)?;
    }

    if !codec::has_expected_manufacturer(data) {
        println!("  Not a LEGO advertisement\n");
        return Ok(());
    }

    match codec::channel(data) {
        Some(channel) => println!("  Channel:      {}", channel),
        None => println!("  Channel:      <missing>"),
    }

    match codec::decode(data) {
        Ok(values) if values.is_empty() => println!("  Values:       <none>"),
        Ok(values) => {
            println!("  Values:");
            for (i, value) in values.iter().enumerate() {
                println!("    [{}] {} ({})", i, value, value.type_name());
            }
        }
        Err(e) => println!("  Decode error: {}", e),
    }

    println!();
    Ok(())
}
