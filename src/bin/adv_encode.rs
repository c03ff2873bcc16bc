//! Advertisement encode utility
//! Builds a Pybricks broadcast advertisement to paste into a sender script

use pybricks_adv::codec::{self, Value};
use pybricks_adv::formats;
use std::env;

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} [--channel N] [--single] <value>...", args[0]);
        eprintln!("\nValues:");
        eprintln!("  b:true  i:42  i16:-1  i32:70000  f:1.5  s:text  x:01ff");
        eprintln!("\nExamples:");
        eprintln!("  {} --channel 1 --single i16:900   # pico speed sender", args[0]);
        eprintln!("  {} --channel 2 b:true i:-5 s:go", args[0]);
        std::process::exit(1);
    }

    let mut channel: u8 = 0;
    let mut single = false;
    let mut values = Vec::new();

    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--channel" => {
                let n = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--channel needs a number"))?;
                channel = n.parse()?;
            }
            "--single" => single = true,
            literal => values.push(literal.parse::<Value>()?),
        }
    }

    let adv = if single {
        match values.as_slice() {
            [value] => codec::encode_single(value, channel)?,
            _ => anyhow::bail!("--single takes exactly one value, got {}", values.len()),
        }
    } else {
        codec::encode(&values, channel)?
    };

    println!("{}", formats::to_hex(&adv));

    // Python bytes literal, as used by the MicroPython sender scripts
    let literal: String = adv.iter().map(|b| format!("\\x{:02X}", b)).collect();
    println!("b'{}'", literal);

    Ok(())
}
