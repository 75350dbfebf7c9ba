use clap::Parser;

mod args;
mod conv;

fn main() {
    let parsed_args = args::Args::parse();
    if parsed_args.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::init();
    }

    match conv::run_batch(&parsed_args) {
        Ok(summary) if summary.sources_failed == 0 && summary.records_written > 0 => {}
        Ok(summary) => {
            eprintln!(
                "oeky: {} source(s) produced no usable records",
                summary.sources_failed
            );
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("oeky: {}", e);
            std::process::exit(2);
        }
    }
}
