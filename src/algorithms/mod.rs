pub mod common;
pub mod motifs;
pub mod stomp;
