//! Frame reassembly for the gateway byte stream

mod assembler;

pub use assembler::{DEFAULT_MAX_MESSAGE_LEN, Feed, FrameAssembler, SENTINEL, TERMINATOR};
