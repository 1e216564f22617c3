use std::io::{Cursor, Write};
use std::sync::LazyLock;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde::Serialize;
use xdr::{XDRReader, XDRWriter};

use crate::address::Address;
use crate::config::DecoderConfig;
use crate::records::{CounterRecord, FlowRecord};
use crate::registry::Registry;
use crate::sample::{
    CounterSample, ExpandedCounterSample, ExpandedFlowSample, FlowSample, SAMPLE_FORMAT_COUNTER,
    SAMPLE_FORMAT_EXPANDED_COUNTER, SAMPLE_FORMAT_EXPANDED_FLOW, SAMPLE_FORMAT_FLOW, Sample,
};
use crate::{Error, tlv};

/// The only datagram version this crate understands.
pub const VERSION: u32 = 5;

static DEFAULT_DECODER: LazyLock<Decoder> = LazyLock::new(Decoder::default);

/// One sFlow v5 datagram, as sent by an agent in a single UDP packet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Datagram {
    /// Always [`VERSION`], encoding rejects anything else
    pub version: u32,
    /// IP address of the sampling agent
    pub agent_address: Address,
    /// Distinguishes between datagram streams from separate agent sub entities
    /// within a device
    pub sub_agent_id: u32,
    pub sequence_number: u32,
    /// Current time in milliseconds since the device last booted
    pub uptime: u32,
    pub samples: Vec<Sample>,
}

impl Datagram {
    /// Decodes `data` with the standard registries and the default limits.
    pub fn decode(data: impl AsRef<[u8]>) -> Result<Datagram, Error> {
        DEFAULT_DECODER.decode(data.as_ref())
    }

    /// Writes the datagram header, then every sample in order. The sample
    /// count is taken from `samples`.
    ///
    /// The datagram is assembled in memory and written with a single
    /// `write_all`, so nothing reaches `writer` when any sample fails.
    pub fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        let buf = self.encode_to_buf()?;
        writer.write_all(&buf)?;

        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        self.encode_to_buf().map(BytesMut::freeze)
    }

    fn encode_to_buf(&self) -> Result<BytesMut, Error> {
        if self.version != VERSION {
            return Err(Error::UnsupportedVersion(self.version));
        }

        let mut writer = BytesMut::new().writer();
        writer.write_u32(self.version)?;
        self.agent_address.encode(&mut writer)?;
        writer.write_u32(self.sub_agent_id)?;
        writer.write_u32(self.sequence_number)?;
        writer.write_u32(self.uptime)?;

        writer.write_u32(self.samples.len() as u32)?;
        for sample in &self.samples {
            sample.encode(&mut writer)?;
        }

        Ok(writer.into_inner())
    }
}

/// Decodes datagrams with a fixed set of record registries.
///
/// The registries are only read while decoding, so one `Decoder` can be
/// shared by any number of threads.
#[derive(Debug)]
pub struct Decoder {
    config: DecoderConfig,

    flow: Registry<FlowRecord>,
    counter: Registry<CounterRecord>,
}

impl Default for Decoder {
    fn default() -> Self {
        Decoder::new(DecoderConfig::default())
    }
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Decoder::with_registries(config, Registry::default(), Registry::default())
    }

    /// Builds a decoder that only knows the records in `flow` and `counter`,
    /// everything else is skipped.
    pub fn with_registries(
        config: DecoderConfig,
        flow: Registry<FlowRecord>,
        counter: Registry<CounterRecord>,
    ) -> Self {
        Decoder {
            config,
            flow,
            counter,
        }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    pub fn decode(&self, data: &[u8]) -> Result<Datagram, Error> {
        let mut buf = Cursor::new(data);

        let version = buf.read_u32()?;
        if version != VERSION {
            return Err(Error::UnsupportedVersion(version));
        }

        let agent_address = Address::decode(&mut buf)?;
        let sub_agent_id = buf.read_u32()?;
        let sequence_number = buf.read_u32()?;
        let uptime = buf.read_u32()?;

        let count = buf.read_u32()?;
        if count > self.config.max_samples {
            return Err(Error::TooManySamples(count));
        }
        tlv::check_count(&buf, "samples", count, 8)?;

        let max_records = self.config.max_records;
        let mut samples = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let (format, length) = tlv::read_header(&mut buf)?;
            let mut body = Cursor::new(tlv::take(&mut buf, "sample", length)?);

            let sample: Sample = match format {
                SAMPLE_FORMAT_FLOW => {
                    FlowSample::decode(&mut body, &self.flow, max_records)?.into()
                }
                SAMPLE_FORMAT_COUNTER => {
                    CounterSample::decode(&mut body, &self.counter, max_records)?.into()
                }
                SAMPLE_FORMAT_EXPANDED_FLOW => {
                    ExpandedFlowSample::decode(&mut body, &self.flow, max_records)?.into()
                }
                SAMPLE_FORMAT_EXPANDED_COUNTER => {
                    ExpandedCounterSample::decode(&mut body, &self.counter, max_records)?.into()
                }
                _ => {
                    debug!(message = "skip unknown sample", format, length);
                    continue;
                }
            };
            tlv::finish(&body, "sample")?;

            samples.push(sample);
        }

        if buf.has_remaining() {
            trace!(
                message = "ignore trailing bytes after the last sample",
                remaining = buf.remaining()
            );
        }

        Ok(Datagram {
            version,
            agent_address,
            sub_agent_id,
            sequence_number,
            uptime,
            samples,
        })
    }
}
