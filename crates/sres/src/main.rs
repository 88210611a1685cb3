use clap::Parser;
use sres::utils::{ok, AnyResult};

fn main() -> AnyResult {
    let cli = sres::Cli::parse_from(wild::args());

    // Logs go to stderr, the generated code may be going to stdout
    pretty_env_logger::formatted_builder()
        .format_indent(None)
        .format_timestamp(None)
        .filter_level(cli.log_level())
        .init();

    sres::run(cli)?;
    ok()
}
