use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = slnctl::cli::Cli::parse();
    slnctl::init(cli.verbose);

    slnctl::cli::run(cli)
}
