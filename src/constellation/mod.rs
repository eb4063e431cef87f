pub mod shell;

pub use shell::{j2000, Constellation, ConstellationBuilder};
