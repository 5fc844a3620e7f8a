use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("squares_lut.rs");
    let mut file = File::create(&dest_path).unwrap();

    // Squares of every channel difference in -255..=255, offset by 255
    writeln!(file, "/// Lookup table of squared channel differences").unwrap();
    writeln!(file, "/// Index: difference + 255, Value: difference squared").unwrap();
    writeln!(file, "pub static SQUARES: [u32; 511] = [").unwrap();
    for (i, diff) in (-255i32..=255).enumerate() {
        if i > 0 && i % 8 == 0 {
            writeln!(file).unwrap();
        }
        write!(file, "    {},", diff * diff).unwrap();
    }
    writeln!(file, "\n];").unwrap();

    println!("cargo::rerun-if-changed=build.rs");
}
