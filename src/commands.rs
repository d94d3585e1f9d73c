use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context};
use tracing::warn;

use crate::error::IndexError;
use crate::index::Index;

//-------------------------------------------------------------------------

/// Parses a command-line token as a nonnegative 64-bit integer, mapping
/// any failure into the same `BadInput` diagnostic the rest of the
/// command layer uses.
fn parse_u64(what: &str, s: &str) -> anyhow::Result<u64> {
    s.parse::<u64>()
        .map_err(|_| anyhow!(IndexError::BadInput(format!("{what} must be a nonnegative integer, got {s:?}"))))
}

/// One `key,value` pair parsed from a record line. Blank lines are
/// skipped; anything else must split into exactly two integers.
fn parse_record(line: &str) -> anyhow::Result<(u64, u64)> {
    let mut parts = line.splitn(2, ',');
    let k = parts
        .next()
        .ok_or_else(|| anyhow!(IndexError::BadInput(format!("malformed record: {line:?}"))))?;
    let v = parts
        .next()
        .ok_or_else(|| anyhow!(IndexError::BadInput(format!("malformed record: {line:?}"))))?;
    Ok((parse_u64("record key", k.trim())?, parse_u64("record value", v.trim())?))
}

pub fn cmd_create(path: &str) -> anyhow::Result<()> {
    Index::create(path)?.close();
    Ok(())
}

pub fn cmd_insert(path: &str, key: &str, value: &str) -> anyhow::Result<()> {
    let key = parse_u64("key", key)?;
    let value = parse_u64("value", value)?;
    let mut idx = Index::open(path)?;
    idx.insert(key, value)?;
    idx.close();
    Ok(())
}

pub fn cmd_search(path: &str, key: &str) -> anyhow::Result<()> {
    let key = parse_u64("key", key)?;
    let mut idx = Index::open(path)?;
    match idx.search(key)? {
        Some((k, v)) => println!("{k} {v}"),
        None => bail!(IndexError::NotFound(Path::new(path).to_path_buf())),
    }
    idx.close();
    Ok(())
}

/// Ingests a delimited record file, one `key,value` pair per non-blank
/// line, inserting each in turn. A record that fails to parse aborts the
/// remaining load (earlier inserts stay); a record whose key duplicates
/// one already present is reported and skipped so the rest of the file
/// still gets a chance to load.
pub fn cmd_load(path: &str, records_path: &str) -> anyhow::Result<()> {
    if !Path::new(records_path).exists() {
        bail!(IndexError::NotFound(Path::new(records_path).to_path_buf()));
    }

    let mut idx = Index::open(path)?;
    let file = File::open(records_path).with_context(|| format!("opening {records_path}"))?;

    for line in BufReader::new(file).lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (key, value) = parse_record(line)?;
        match idx.insert(key, value) {
            Ok(()) => {}
            Err(IndexError::DuplicateKey(k)) => {
                warn!(key = k, "skipping duplicate key during load");
                eprintln!("Error: key {k} already exists, skipping.");
            }
            Err(e) => return Err(e.into()),
        }
    }

    idx.close();
    Ok(())
}

pub fn cmd_print(path: &str) -> anyhow::Result<()> {
    let mut idx = Index::open(path)?;
    for pair in idx.iterate_in_order()? {
        let (k, v) = pair?;
        println!("{k} {v}");
    }
    idx.close();
    Ok(())
}

pub fn cmd_extract(path: &str, out_path: &str) -> anyhow::Result<()> {
    if Path::new(out_path).exists() {
        bail!(IndexError::AlreadyExists(Path::new(out_path).to_path_buf()));
    }

    let mut idx = Index::open(path)?;
    let pairs: Vec<(u64, u64)> = idx.iterate_in_order()?.collect::<crate::error::Result<_>>()?;
    idx.close();

    let mut out = File::create(out_path).with_context(|| format!("creating {out_path}"))?;
    for (k, v) in pairs {
        writeln!(out, "{k},{v}")?;
    }

    Ok(())
}

//-------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_plain_records() {
        assert_eq!(parse_record("5,50").unwrap(), (5, 50));
        assert_eq!(parse_record(" 3 , 30 ").unwrap(), (3, 30));
    }

    #[test]
    fn rejects_malformed_records() {
        assert!(parse_record("not-a-number,50").is_err());
        assert!(parse_record("5").is_err());
    }

    #[test]
    fn end_to_end_load_print_extract() {
        let dir = tempdir().unwrap();
        let idx_path = dir.path().join("t.idx");
        let records_path = dir.path().join("in.csv");
        let out_path = dir.path().join("out.csv");

        fs::write(&records_path, "5,50\n3,30\n8,80\n1,10\n4,40\n").unwrap();

        cmd_create(idx_path.to_str().unwrap()).unwrap();
        cmd_load(idx_path.to_str().unwrap(), records_path.to_str().unwrap()).unwrap();
        cmd_extract(idx_path.to_str().unwrap(), out_path.to_str().unwrap()).unwrap();

        let extracted = fs::read_to_string(&out_path).unwrap();
        assert_eq!(extracted, "1,10\n3,30\n4,40\n5,50\n8,80\n");
    }

    #[test]
    fn load_stops_on_malformed_record_but_keeps_earlier_inserts() {
        let dir = tempdir().unwrap();
        let idx_path = dir.path().join("t.idx");
        let records_path = dir.path().join("in.csv");

        fs::write(&records_path, "1,10\n2,20\nbogus\n3,30\n").unwrap();

        cmd_create(idx_path.to_str().unwrap()).unwrap();
        assert!(cmd_load(idx_path.to_str().unwrap(), records_path.to_str().unwrap()).is_err());

        let mut idx = Index::open(&idx_path).unwrap();
        assert_eq!(idx.search(1).unwrap(), Some((1, 10)));
        assert_eq!(idx.search(2).unwrap(), Some((2, 20)));
        assert_eq!(idx.search(3).unwrap(), None);
    }

    #[test]
    fn load_skips_duplicate_but_continues() {
        let dir = tempdir().unwrap();
        let idx_path = dir.path().join("t.idx");
        let records_path = dir.path().join("in.csv");

        fs::write(&records_path, "1,10\n1,999\n2,20\n").unwrap();

        cmd_create(idx_path.to_str().unwrap()).unwrap();
        cmd_load(idx_path.to_str().unwrap(), records_path.to_str().unwrap()).unwrap();

        let mut idx = Index::open(&idx_path).unwrap();
        assert_eq!(idx.search(1).unwrap(), Some((1, 10)));
        assert_eq!(idx.search(2).unwrap(), Some((2, 20)));
    }

    #[test]
    fn extract_refuses_existing_target() {
        let dir = tempdir().unwrap();
        let idx_path = dir.path().join("t.idx");
        let out_path = dir.path().join("out.csv");
        fs::write(&out_path, "stale").unwrap();

        cmd_create(idx_path.to_str().unwrap()).unwrap();
        let err = cmd_extract(idx_path.to_str().unwrap(), out_path.to_str().unwrap()).unwrap_err();
        assert!(err.downcast_ref::<IndexError>().is_some());
    }
}

//-------------------------------------------------------------------------
