//! Console mirror: prints each captured request to stdout when enabled

use colored::Colorize;
use std::fmt::Write;

use crate::{render::pretty_body, store::RequestRecord};

const RULE_WIDTH: usize = 80;

/// Print `record` to stdout
pub fn print_request(record: &RequestRecord) {
    println!("{}", format_request(record));
}

/// Build the framed, colored console summary of a record
pub fn format_request(record: &RequestRecord) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail
    let _ = write_request(&mut out, record);
    out
}

fn write_request(out: &mut String, record: &RequestRecord) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
    writeln!(
        out,
        "{} captured at {}",
        format!("Request #{}", record.id).bold(),
        record.captured_at.format("%Y-%m-%d %H:%M:%S")
    )?;
    writeln!(out, "{}", "-".repeat(RULE_WIDTH))?;

    writeln!(
        out,
        "{} {} {}",
        record.method.green().bold(),
        record.target(),
        record.protocol_version.dimmed()
    )?;
    writeln!(out, "{} {}", "Remote Address:".cyan(), record.remote_address)?;

    if !record.headers.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", "Headers:".cyan())?;
        for (name, values) in record.headers.iter() {
            for value in values {
                writeln!(out, "   {}: {}", name.bold(), value)?;
            }
        }
    }

    writeln!(out)?;
    match pretty_body(record) {
        Some(body) => {
            writeln!(out, "{}", "Body:".cyan())?;
            for line in body.lines() {
                writeln!(out, "   {}", line)?;
            }
        }
        None => writeln!(out, "{} {}", "Body:".cyan(), "(empty)".dimmed())?,
    }

    write!(out, "{}", "=".repeat(RULE_WIDTH))
}
