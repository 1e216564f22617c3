//! Decoder and encoder of sFlow version 5 datagrams.
//!
//! See https://sflow.org/sflow_version_5.txt for the datagram layout and
//! https://sflow.org/SFLOW-STRUCTS5.txt for the standard structures.

#[macro_use]
extern crate tracing;

mod address;
mod config;
mod datagram;
mod error;
pub mod records;
mod registry;
mod sample;
mod tlv;

pub use address::Address;
pub use config::DecoderConfig;
pub use datagram::{Datagram, Decoder, VERSION};
pub use error::Error;
pub use registry::{DecodeFn, RecordEntry, RecordVariant, Registry};
pub use sample::{
    CounterSample, ExpandedCounterSample, ExpandedFlowSample, ExpandedSourceId, FlowSample,
    Interface, SAMPLE_FORMAT_COUNTER, SAMPLE_FORMAT_EXPANDED_COUNTER, SAMPLE_FORMAT_EXPANDED_FLOW,
    SAMPLE_FORMAT_FLOW, Sample, SourceId,
};
