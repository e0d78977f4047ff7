use clap::Parser;
use streamclust::{cli, commands, utils};

fn main() {
    let args = cli::Args::parse();
    utils::logging::init_logging(args.verbose);

    let result = match args.command {
        cli::Commands::Cluster {
            fasta,
            stem,
            options,
        } => commands::cluster::run(fasta, stem, options, args.quiet),
        cli::Commands::Simulate {
            outstem,
            nseq,
            slen,
            p1,
            p2,
            seed,
        } => commands::simulate::run(outstem, nseq, slen, p1, p2, seed),
        cli::Commands::Check {
            fasta,
            stem,
            readmax,
            max_pairs,
        } => commands::check::run(fasta, stem, readmax, max_pairs, args.quiet),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
