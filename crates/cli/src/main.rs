//! `wiremap` binary.

fn main() {
    wiremap_cli::init_tracing();
    std::process::exit(wiremap_cli::run_cli(std::env::args_os()));
}
