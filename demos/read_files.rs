//! Read every matching handle from the locations given on the command line.
//!
//! ```text
//! cargo run --example read_files -- tests/data/archive.zip structures/
//! RUST_LOG=biosource=debug cargo run --example read_files -- archive.tar.gz
//! ```

use std::io::BufRead;

use biosource::Resolver;

fn main() -> biosource::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut resolver = Resolver::new();
    resolver
        .register_type("cif", "text/cif")
        .register_type("str", "text/nmrstar");

    for location in std::env::args().skip(1) {
        for handle in resolver.open(&location) {
            let mut handle = handle?;
            let mut first_line = String::new();
            handle.read_line(&mut first_line)?;
            println!("{}: {}", handle.source(), first_line.trim_end());
        }
    }
    Ok(())
}
