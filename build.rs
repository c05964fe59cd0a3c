use std::env;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use bincode::Options;

#[path = "src/metadata/loader.rs"]
mod loader;

#[path = "src/error.rs"]
mod error;

fn compile(xml_path: &str, out_name: &str) {
    let metadata = loader::load(BufReader::new(
        File::open(xml_path).unwrap_or_else(|e| panic!("could not open {xml_path}: {e}")),
    ))
    .unwrap_or_else(|e| panic!("failed to load metadata from {xml_path}: {e}"));

    let mut out = BufWriter::new(
        File::create(Path::new(&env::var("OUT_DIR").unwrap()).join(out_name))
            .expect("could not create database file"),
    );

    bincode::options()
        .with_varint_encoding()
        .serialize_into(&mut out, &metadata)
        .expect("failed to serialize database");
}

fn main() {
    println!("cargo:rerun-if-changed=assets/PhoneNumberMetadata.xml");
    println!("cargo:rerun-if-changed=assets/ShortNumberMetadata.xml");

    compile("assets/PhoneNumberMetadata.xml", "database.bin");
    compile("assets/ShortNumberMetadata.xml", "short.bin");
}
