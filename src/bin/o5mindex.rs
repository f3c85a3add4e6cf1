use std::env;

use o5mindex::defaultlogger::register_messenger_default;
use o5mindex::indexer::{index_file, query_ways};
use o5mindex::message;
use o5mindex::settings::IndexSettings;
use o5mindex::stringutils::StringUtils;
use o5mindex::utils::LogTimes;

fn usage() {
    println!("o5mindex index <input.o5m> [nodes=DIR] [ways=DIR] [settings=FILE]");
    println!("o5mindex query <ways DIR> <minlon,minlat,maxlon,maxlat> [minsize=DEG] [key=TAGKEY] [settings=FILE]");
}

fn parse_window(fstr: &str) -> Option<[f64; 4]> {
    let vv: Vec<&str> = fstr.split(",").collect();
    if vv.len() != 4 {
        return None;
    }
    let mut res = [0.0; 4];
    for (i, v) in vv.iter().enumerate() {
        match v.parse() {
            Ok(x) => {
                res[i] = x;
            }
            Err(_) => {
                return None;
            }
        }
    }
    Some(res)
}

fn load_settings(path: &str) -> IndexSettings {
    if path.is_empty() {
        IndexSettings::default()
    } else {
        IndexSettings::from_file(path).expect("failed to read settings file")
    }
}

fn run_index(args: &[String]) {
    let fname = args[0].clone();
    let mut nodes = format!("{}.nodes", fname);
    let mut ways = format!("{}.ways", fname);
    let mut settings_file = String::new();
    for a in &args[1..] {
        if a.starts_with("nodes=") {
            nodes = a.substr(6, a.len());
        } else if a.starts_with("ways=") {
            ways = a.substr(5, a.len());
        } else if a.starts_with("settings=") {
            settings_file = a.substr(9, a.len());
        } else {
            panic!("unknown argument {}", a);
        }
    }
    let settings = load_settings(&settings_file);

    let mut lt = LogTimes::new();
    let stats = index_file(&fname, &nodes, &ways, &settings).expect("indexing failed");
    lt.add("index");
    message!("{}", stats);
    message!("{}", lt);
}

fn run_query(args: &[String]) {
    let ways = args[0].clone();
    let window = parse_window(&args[1]).expect("expected minlon,minlat,maxlon,maxlat");
    let mut minsize = 0.0;
    let mut key = String::new();
    let mut settings_file = String::new();
    for a in &args[2..] {
        if a.starts_with("minsize=") {
            minsize = a.substr(8, a.len()).parse().expect("bad minsize");
        } else if a.starts_with("key=") {
            key = a.substr(4, a.len());
        } else if a.starts_with("settings=") {
            settings_file = a.substr(9, a.len());
        } else {
            panic!("unknown argument {}", a);
        }
    }
    let settings = load_settings(&settings_file);

    let key_ref = if key.is_empty() { None } else { Some(&key[..]) };
    let ids = query_ways(
        &ways, window[0], window[1], window[2], window[3], minsize, key_ref, &settings,
    )
    .expect("query failed");
    message!("{} ways", ids.len());
    for id in ids {
        println!("{}", id);
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    register_messenger_default().expect("failed to register messenger");

    if args.len() < 3 {
        usage();
        return;
    }
    match args[1].as_str() {
        "index" => run_index(&args[2..]),
        "query" => {
            if args.len() < 4 {
                usage();
                return;
            }
            run_query(&args[2..])
        }
        _ => usage(),
    }
}
