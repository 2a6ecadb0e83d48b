use clap::{App, Arg};
use std::path::Path;
use std::process::exit;
use tracing_subscriber::EnvFilter;
use vita::build::build_site;
use vita::config::Config;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let matches = App::new("vita")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds the publications section of a static site")
        .arg(
            Arg::with_name("PROJECT")
                .help(
                    "The project directory; a `vita.yaml` is searched for \
                     here and in ancestor directories",
                )
                .default_value("."),
        )
        .arg(
            Arg::with_name("output")
                .short("o")
                .long("output")
                .value_name("DIR")
                .help("The output directory")
                .takes_value(true)
                .required(true),
        )
        .get_matches();

    // both have clap-enforced values, so value_of can't return None
    let project = matches.value_of("PROJECT").unwrap();
    let output = matches.value_of("output").unwrap();

    let config =
        match Config::from_directory(Path::new(project), Path::new(output)) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}", e);
                exit(1);
            }
        };

    if let Err(e) = build_site(config) {
        eprintln!("{}", e);
        exit(1);
    }
}
