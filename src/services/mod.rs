pub mod image_io;
pub mod output_name;
pub mod session;

pub use image_io::{decode_png, encode_indexed_png, encode_png, load_png, save_png};
pub use output_name::timestamped_output_path;
pub use session::GlitchSession;
