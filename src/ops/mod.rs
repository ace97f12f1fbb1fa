pub mod agenda;
pub mod outline_ops;
