#![cfg(feature = "cli")]

use ansi_term::Colour;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use xorp_mrt::addr::Prefix;
use xorp_mrt::mrib::DualStackMrib;
use xorp_mrt::{NextHop, VifIndex};

use std::env;
use std::error::Error;
use std::ffi::OsString;
use std::fs::File;
use std::net::IpAddr;
use std::process;
use std::str::FromStr;

const HISTORY_FILE: &str = "/tmp/xorp-mrt-history.txt";

fn get_first_arg() -> Result<OsString, Box<dyn Error>> {
    match env::args_os().nth(1) {
        None => Err(From::from("expected 1 argument, but got none")),
        Some(file_path) => Ok(file_path),
    }
}

fn field(
    record: &csv::StringRecord,
    i: usize,
) -> Result<&str, Box<dyn Error>> {
    record
        .get(i)
        .ok_or_else(|| format!("missing field {} in {:?}", i, record).into())
}

// One route per record:
// `<prefix>,<next hop address>,<vif index>[,<metric preference>,<metric>]`
fn parse_route(
    record: &csv::StringRecord,
) -> Result<(Prefix, NextHop), Box<dyn Error>> {
    if record.len() != 3 && record.len() != 5 {
        return Err(format!(
            "expected 3 or 5 fields, got {} in {:?}",
            record.len(),
            record
        )
        .into());
    }

    let prefix = Prefix::from_str(field(record, 0)?)?;
    let mut next_hop = NextHop::new(
        IpAddr::from_str(field(record, 1)?)?,
        VifIndex::new(field(record, 2)?.parse()?),
    );
    if record.len() == 5 {
        next_hop = next_hop.with_metrics(
            field(record, 3)?.parse()?,
            field(record, 4)?.parse()?,
        );
    }
    Ok((prefix, next_hop))
}

fn load_routes(mrib: &mut DualStackMrib) -> Result<usize, Box<dyn Error>> {
    let file_path = get_first_arg()?;
    let file = File::open(file_path)?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut count = 0;
    for result in rdr.records() {
        let (prefix, next_hop) = parse_route(&result?)?;
        mrib.insert(&prefix, &next_hop)?;
        count += 1;
    }
    Ok(count)
}

fn print_help() {
    println!("<address>         longest prefix match");
    println!("<prefix>/<len>    exact match");
    println!("l                 list all entries");
    println!("p                 print statistics");
    println!("q                 quit");
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut mrib = DualStackMrib::new();

    let start = std::time::Instant::now();
    match load_routes(&mut mrib) {
        Ok(count) => println!(
            "finished loading {} routes in {} msecs...",
            count,
            start.elapsed().as_millis()
        ),
        Err(err) => {
            println!("error loading routes: {}", err);
            process::exit(1);
        }
    }

    let mut rl = DefaultEditor::new()?;
    if rl.load_history(HISTORY_FILE).is_err() {
        println!("No previous history.");
    }
    loop {
        let readline = rl.readline("(xorp-mrt)> ");
        match readline {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                match line {
                    "l" => {
                        for entry in mrib.iter() {
                            println!("{}", entry);
                        }
                    }
                    "p" => {
                        println!("total entries :\t{}", mrib.len());
                        println!("ipv4 :\n{}", mrib.v4().stats());
                        println!("ipv6 :\n{}", mrib.v6().stats());
                    }
                    "q" => break,
                    "h" | "?" => print_help(),
                    _ if line.contains('/') => match Prefix::from_str(line) {
                        Ok(pfx) => match mrib.find_exact(&pfx) {
                            Ok(Some(entry)) => println!("{}", entry),
                            Ok(None) => println!(
                                "{}",
                                Colour::Yellow.paint("no exact match")
                            ),
                            Err(err) => println!("Error: {}", err),
                        },
                        Err(err) => {
                            println!("Error: Can't parse prefix. {}", err)
                        }
                    },
                    _ => match IpAddr::from_str(line) {
                        Ok(addr) => match mrib.find(addr) {
                            Some(entry) => println!("{}", entry),
                            None => println!(
                                "{}",
                                Colour::Yellow.paint("no matching prefix")
                            ),
                        },
                        Err(_) => {
                            println!(
                                "{}",
                                Colour::Red.paint(format!(
                                    "Error: unknown command {:?}",
                                    line
                                ))
                            );
                            print_help();
                        }
                    },
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(_err) => {
                println!("Error: Can't parse the command");
                continue;
            }
        }
    }
    rl.save_history(HISTORY_FILE)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn route_rows_need_three_or_five_fields() -> Result<(), Box<dyn Error>>
    {
        let (prefix, next_hop) =
            parse_route(&record(&["10.0.0.0/8", "192.0.2.1", "3"]))?;
        assert_eq!(prefix, Prefix::from_str("10.0.0.0/8")?);
        assert_eq!(next_hop.vif_index, VifIndex::new(3));
        assert_eq!(next_hop.metric_preference, u32::MAX);

        let (_, next_hop) = parse_route(&record(&[
            "2001:db8::/32",
            "fe80::1",
            "1",
            "110",
            "20",
        ]))?;
        assert_eq!(next_hop.metric_preference, 110);
        assert_eq!(next_hop.metric, 20);

        assert!(parse_route(&record(&["10.0.0.0/8", "192.0.2.1"])).is_err());
        assert!(parse_route(&record(&[
            "10.0.0.0/8",
            "192.0.2.1",
            "3",
            "110"
        ]))
        .is_err());
        assert!(parse_route(&record(&[
            "10.0.0.0/8",
            "192.0.2.1",
            "3",
            "110",
            "20",
            "9"
        ]))
        .is_err());

        Ok(())
    }
}
