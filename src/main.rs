fn main() {
    use clap::Parser;
    use env_logger::{Builder, Env};
    use std::error::Error;
    let args = xkcd::cli::Args::parse();

    let default_filter = if args.verbose {
        "debug"
    } else if args.quiet {
        "error"
    } else {
        "warn"
    };
    Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    if let Err(e) = xkcd::cli::run(&args) {
        eprintln!("{}", e);
        if args.verbose {
            let mut source = e.source();
            while let Some(s) = source {
                eprintln!("  cause: {}", s);
                source = s.source();
            }
        }
        std::process::exit(e.exit_code());
    }
}
