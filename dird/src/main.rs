//TODO: update clap to remove the need for this
#![allow(dangerous_implicit_autorefs)]

use clap::{crate_description, crate_version, App, Arg};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let matches = App::new("mkinitrd")
        .about(crate_description!())
        .version(crate_version!())
        .arg(
            Arg::with_name("initrd_root_dir")
                .help("Directory whose regular files are packed")
                .required(true)
                .value_name("DIR"),
        )
        .arg(
            Arg::with_name("out_file")
                .help("Archive file to create or replace")
                .required(true)
                .value_name("FILE"),
        )
        .get_matches();

    dird::build(
        matches.value_of("initrd_root_dir").unwrap(),
        matches.value_of("out_file").unwrap(),
    )?;
    Ok(())
}
