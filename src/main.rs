use std::process;

use clap::{App, Arg};
use log::{error, LevelFilter};

use dns_relay::config::{self, Config};
use dns_relay::{HostsFile, Server};

fn main() {
    let matches = App::new("dns-relay")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Relays DNS queries over UDP, answering from a local name table when it can")
        .arg(
            Arg::with_name("PORT")
                .short("p")
                .long("port")
                .takes_value(true)
                .default_value("53")
                .help("UDP port to listen on"),
        )
        .arg(
            Arg::with_name("BIND")
                .short("b")
                .long("bind")
                .takes_value(true)
                .help("Address to bind (default 0.0.0.0)"),
        )
        .arg(
            Arg::with_name("UPSTREAM")
                .short("u")
                .long("upstream")
                .takes_value(true)
                .required(true)
                .help("Upstream resolver, host[:port]; port defaults to 53"),
        )
        .arg(
            Arg::with_name("TABLE")
                .short("t")
                .long("table")
                .takes_value(true)
                .default_value("dns-table.txt")
                .help("Hosts-style file backing the name table"),
        )
        .arg(
            Arg::with_name("REDIRECT_ONLY")
                .short("r")
                .long("redirect-only")
                .help("Always forward upstream, never consult the table for queries"),
        )
        .arg(
            Arg::with_name("VERBOSE")
                .short("v")
                .multiple(true)
                .help("Increase log verbosity (-v debug, -vv trace)"),
        )
        .get_matches();

    init_logging(matches.occurrences_of("VERBOSE"));

    let port = matches
        .value_of("PORT")
        .unwrap()
        .parse()
        .unwrap_or_else(|_| {
            eprintln!("--port takes a port number");
            process::exit(2);
        });
    let bind_addr = match matches.value_of("BIND") {
        Some(addr) => addr.parse().unwrap_or_else(|_| {
            eprintln!("--bind takes an IP address");
            process::exit(2);
        }),
        None => config::default_bind_addr(),
    };
    let upstream = config::upstream_addr(matches.value_of("UPSTREAM").unwrap())
        .unwrap_or_else(|err| {
            eprintln!("{}", err);
            process::exit(2);
        });

    let config = Config {
        port,
        bind_addr,
        upstream,
        redirect_only: matches.is_present("REDIRECT_ONLY"),
        table_path: matches.value_of("TABLE").unwrap().into(),
    };

    let table = HostsFile::new(&config.table_path);
    let mut server = match Server::bind(&config, table) {
        Ok(server) => server,
        Err(err) => {
            error!("cannot start relay: {}", err);
            process::exit(1);
        }
    };
    if let Err(err) = server.serve_forever() {
        error!("relay terminated: {}", err);
        process::exit(1);
    }
}

fn init_logging(verbosity: u64) {
    let mut builder = env_logger::Builder::new();
    builder.filter(
        None,
        match verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        },
    );
    if let Ok(conf) = std::env::var("RUST_LOG") {
        builder.parse_filters(&conf);
    }
    builder.init();
}
