use avl_collections::avl_tree::{AvlSet, DEFAULT_CHUNK_SIZE};
use log::{error, info};
use simplelog::{Config, LevelFilter, SimpleLogger};
use std::env;
use std::process;

const LOG_VAR: &str = "AVL_SET_LOG";
const CHUNK_SIZE_VAR: &str = "AVL_SET_CHUNK_SIZE";

fn parse_args(args: &[String]) -> Result<(i64, Vec<i64>), String> {
    let (probe, keys) = match args.split_first() {
        Some(pair) => pair,
        None => return Err("usage: avl-collections <probe> [key ...]".to_string()),
    };
    let probe = probe
        .parse::<i64>()
        .map_err(|err| format!("invalid probe {:?}: {}", probe, err))?;
    let keys = keys
        .iter()
        .map(|key| key.parse::<i64>().map_err(|err| format!("invalid key {:?}: {}", key, err)))
        .collect::<Result<Vec<i64>, String>>()?;
    Ok((probe, keys))
}

fn main() {
    let level = env::var(LOG_VAR)
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(LevelFilter::Info);
    if SimpleLogger::init(level, Config::default()).is_err() {
        eprintln!("logger already initialized");
    }

    let chunk_size = env::var(CHUNK_SIZE_VAR)
        .ok()
        .and_then(|size| size.parse().ok())
        .unwrap_or(DEFAULT_CHUNK_SIZE);

    let args: Vec<String> = env::args().skip(1).collect();
    let (probe, keys) = match parse_args(&args) {
        Ok(parsed) => parsed,
        Err(message) => {
            error!("{}", message);
            process::exit(1);
        },
    };

    let mut set = AvlSet::with_chunk_size(chunk_size);
    set.extend(keys);
    info!("built set of {} keys with height {}", set.len(), set.height());

    println!("ascending:  {:?}", set.iter().collect::<Vec<&i64>>());
    println!("descending: {:?}", set.iter().rev().collect::<Vec<&i64>>());
    match set.lower_bound(&probe).get() {
        Some(key) => println!("lower bound of {}: {}", probe, key),
        None => println!("lower bound of {}: end", probe),
    }
}

#[cfg(test)]
mod tests {
    use super::parse_args;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(&strings(&["4", "1", "5", "-3"])), Ok((4, vec![1, 5, -3])));
        assert_eq!(parse_args(&strings(&["4"])), Ok((4, vec![])));
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(parse_args(&[]).is_err());
        assert!(parse_args(&strings(&["x"])).is_err());
        assert!(parse_args(&strings(&["1", "2", "y"])).is_err());
    }
}
