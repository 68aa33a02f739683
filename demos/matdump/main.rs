//! An application for listing the variables of a MAT-file.

use ants2fsl::MatFile;
use std::env;

fn main() {
    let mut args = env::args().skip(1);
    let filename = args.next().expect("Path to MAT-file is required");
    let mat = MatFile::from_file(filename).expect("Failed to read MAT-file");
    println!("{:?}", mat.level());
    for var in mat.variables() {
        println!(
            "{} ({}x{}{}): {:?}",
            var.name(),
            var.rows(),
            var.cols(),
            if var.is_complex() { ", complex" } else { "" },
            var.data()
        );
    }
}
