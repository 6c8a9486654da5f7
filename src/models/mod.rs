pub mod collections;
pub mod mnemonic;
