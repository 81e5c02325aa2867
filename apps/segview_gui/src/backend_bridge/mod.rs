//! Background worker that owns the tokio runtime, the control channel, and
//! frame decoding.

pub mod runtime;
