pub mod kashif;

pub use kashif::Kashif;
