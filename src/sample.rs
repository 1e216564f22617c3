use std::io::{Cursor, Write};

use serde::Serialize;
use xdr::{XDRReader, XDRWriter};

use crate::records::{CounterRecord, FlowRecord};
use crate::registry::Registry;
use crate::{Error, tlv};

// Opaque sample_data types according to https://sflow.org/SFLOW-DATAGRAM5.txt
pub const SAMPLE_FORMAT_FLOW: u32 = 1;
pub const SAMPLE_FORMAT_COUNTER: u32 = 2;
pub const SAMPLE_FORMAT_EXPANDED_FLOW: u32 = 3;
pub const SAMPLE_FORMAT_EXPANDED_COUNTER: u32 = 4;

const MAX_SOURCE_INDEX: u32 = 0x00FF_FFFF;

/// Interlaced data source, the type in the top byte and the index in the
/// lower 24 bits of one word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SourceId {
    /// 0 = ifIndex, 1 = smonVlanDataSource, 2 = entPhysicalEntry
    pub source_type: u8,
    pub index: u32,
}

impl SourceId {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<SourceId, Error> {
        let source_type = buf.read_u8()?;
        let index = buf.read_u24()?;

        Ok(SourceId { source_type, index })
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        if self.index > MAX_SOURCE_INDEX {
            return Err(Error::SourceIndexOverflow(self.index));
        }

        writer.write_u8(self.source_type)?;
        writer.write_u24(self.index)?;

        Ok(())
    }
}

/// Explicit data source of the expanded samples.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ExpandedSourceId {
    pub source_type: u32,
    pub index: u32,
}

impl ExpandedSourceId {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<ExpandedSourceId, Error> {
        let source_type = buf.read_u32()?;
        let index = buf.read_u32()?;

        Ok(ExpandedSourceId { source_type, index })
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_u32(self.source_type)?;
        writer.write_u32(self.index)?;

        Ok(())
    }
}

/// Input or output interface of an expanded flow sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Interface {
    /// 0 = ifIndex, 1 = packet discarded, 2 = multiple destination interfaces
    pub format: u32,
    pub value: u32,
}

impl Interface {
    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Interface, Error> {
        let format = buf.read_u32()?;
        let value = buf.read_u32()?;

        Ok(Interface { format, value })
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_u32(self.format)?;
        writer.write_u32(self.value)?;

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FlowSample {
    /// Incremented with each flow sample generated by this source
    pub sequence_number: u32,
    pub source_id: SourceId,
    pub sampling_rate: u32,
    /// Total number of packets that could have been sampled
    pub sample_pool: u32,
    /// Number of times that the sFlow agent detected that a packet marked to
    /// be sampled was dropped due to lack of resources
    pub drops: u32,
    /// Input interface, 0 if unknown
    pub input: u32,
    pub output: u32,
    pub records: Vec<FlowRecord>,
}

impl FlowSample {
    pub(crate) fn decode(
        buf: &mut Cursor<&[u8]>,
        registry: &Registry<FlowRecord>,
        max_records: u32,
    ) -> Result<FlowSample, Error> {
        let sequence_number = buf.read_u32()?;
        let source_id = SourceId::decode(buf)?;
        let sampling_rate = buf.read_u32()?;
        let sample_pool = buf.read_u32()?;
        let drops = buf.read_u32()?;
        let input = buf.read_u32()?;
        let output = buf.read_u32()?;
        let records = decode_records(buf, registry, max_records)?;

        Ok(FlowSample {
            sequence_number,
            source_id,
            sampling_rate,
            sample_pool,
            drops,
            input,
            output,
            records,
        })
    }

    pub fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        tlv::encode(writer, SAMPLE_FORMAT_FLOW, |payload| {
            payload.write_u32(self.sequence_number)?;
            self.source_id.encode(payload)?;
            payload.write_u32(self.sampling_rate)?;
            payload.write_u32(self.sample_pool)?;
            payload.write_u32(self.drops)?;
            payload.write_u32(self.input)?;
            payload.write_u32(self.output)?;

            payload.write_u32(self.records.len() as u32)?;
            for record in &self.records {
                record.encode(payload)?;
            }

            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CounterSample {
    pub sequence_number: u32,
    pub source_id: SourceId,
    pub records: Vec<CounterRecord>,
}

impl CounterSample {
    pub(crate) fn decode(
        buf: &mut Cursor<&[u8]>,
        registry: &Registry<CounterRecord>,
        max_records: u32,
    ) -> Result<CounterSample, Error> {
        let sequence_number = buf.read_u32()?;
        let source_id = SourceId::decode(buf)?;
        let records = decode_records(buf, registry, max_records)?;

        Ok(CounterSample {
            sequence_number,
            source_id,
            records,
        })
    }

    pub fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        tlv::encode(writer, SAMPLE_FORMAT_COUNTER, |payload| {
            payload.write_u32(self.sequence_number)?;
            self.source_id.encode(payload)?;

            payload.write_u32(self.records.len() as u32)?;
            for record in &self.records {
                record.encode(payload)?;
            }

            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpandedFlowSample {
    pub sequence_number: u32,
    pub source_id: ExpandedSourceId,
    pub sampling_rate: u32,
    pub sample_pool: u32,
    pub drops: u32,
    pub input: Interface,
    pub output: Interface,
    pub records: Vec<FlowRecord>,
}

impl ExpandedFlowSample {
    pub(crate) fn decode(
        buf: &mut Cursor<&[u8]>,
        registry: &Registry<FlowRecord>,
        max_records: u32,
    ) -> Result<ExpandedFlowSample, Error> {
        let sequence_number = buf.read_u32()?;
        let source_id = ExpandedSourceId::decode(buf)?;
        let sampling_rate = buf.read_u32()?;
        let sample_pool = buf.read_u32()?;
        let drops = buf.read_u32()?;
        let input = Interface::decode(buf)?;
        let output = Interface::decode(buf)?;
        let records = decode_records(buf, registry, max_records)?;

        Ok(ExpandedFlowSample {
            sequence_number,
            source_id,
            sampling_rate,
            sample_pool,
            drops,
            input,
            output,
            records,
        })
    }

    pub fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        tlv::encode(writer, SAMPLE_FORMAT_EXPANDED_FLOW, |payload| {
            payload.write_u32(self.sequence_number)?;
            self.source_id.encode(payload)?;
            payload.write_u32(self.sampling_rate)?;
            payload.write_u32(self.sample_pool)?;
            payload.write_u32(self.drops)?;
            self.input.encode(payload)?;
            self.output.encode(payload)?;

            payload.write_u32(self.records.len() as u32)?;
            for record in &self.records {
                record.encode(payload)?;
            }

            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExpandedCounterSample {
    pub sequence_number: u32,
    pub source_id: ExpandedSourceId,
    pub records: Vec<CounterRecord>,
}

impl ExpandedCounterSample {
    pub(crate) fn decode(
        buf: &mut Cursor<&[u8]>,
        registry: &Registry<CounterRecord>,
        max_records: u32,
    ) -> Result<ExpandedCounterSample, Error> {
        let sequence_number = buf.read_u32()?;
        let source_id = ExpandedSourceId::decode(buf)?;
        let records = decode_records(buf, registry, max_records)?;

        Ok(ExpandedCounterSample {
            sequence_number,
            source_id,
            records,
        })
    }

    pub fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        tlv::encode(writer, SAMPLE_FORMAT_EXPANDED_COUNTER, |payload| {
            payload.write_u32(self.sequence_number)?;
            self.source_id.encode(payload)?;

            payload.write_u32(self.records.len() as u32)?;
            for record in &self.records {
                record.encode(payload)?;
            }

            Ok(())
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Sample {
    Flow(FlowSample),
    Counter(CounterSample),
    ExpandedFlow(ExpandedFlowSample),
    ExpandedCounter(ExpandedCounterSample),
}

impl Sample {
    /// Data format written in the sample header.
    pub fn format(&self) -> u32 {
        match self {
            Sample::Flow(_) => SAMPLE_FORMAT_FLOW,
            Sample::Counter(_) => SAMPLE_FORMAT_COUNTER,
            Sample::ExpandedFlow(_) => SAMPLE_FORMAT_EXPANDED_FLOW,
            Sample::ExpandedCounter(_) => SAMPLE_FORMAT_EXPANDED_COUNTER,
        }
    }

    pub fn sequence_number(&self) -> u32 {
        match self {
            Sample::Flow(sample) => sample.sequence_number,
            Sample::Counter(sample) => sample.sequence_number,
            Sample::ExpandedFlow(sample) => sample.sequence_number,
            Sample::ExpandedCounter(sample) => sample.sequence_number,
        }
    }

    /// Writes the sample header, format and body length, then the body.
    pub fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        match self {
            Sample::Flow(sample) => sample.encode(writer),
            Sample::Counter(sample) => sample.encode(writer),
            Sample::ExpandedFlow(sample) => sample.encode(writer),
            Sample::ExpandedCounter(sample) => sample.encode(writer),
        }
    }
}

impl From<FlowSample> for Sample {
    fn from(sample: FlowSample) -> Self {
        Sample::Flow(sample)
    }
}

impl From<CounterSample> for Sample {
    fn from(sample: CounterSample) -> Self {
        Sample::Counter(sample)
    }
}

impl From<ExpandedFlowSample> for Sample {
    fn from(sample: ExpandedFlowSample) -> Self {
        Sample::ExpandedFlow(sample)
    }
}

impl From<ExpandedCounterSample> for Sample {
    fn from(sample: ExpandedCounterSample) -> Self {
        Sample::ExpandedCounter(sample)
    }
}

/// Reads the record count and then every record, each from its own length
/// bounded slice. Records `registry` does not know are skipped.
fn decode_records<T>(
    buf: &mut Cursor<&[u8]>,
    registry: &Registry<T>,
    max_records: u32,
) -> Result<Vec<T>, Error> {
    let count = buf.read_u32()?;
    if count > max_records {
        return Err(Error::TooManyRecords(count));
    }
    // a record is at least its format and length
    tlv::check_count(buf, "records", count, 8)?;

    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (format, length) = tlv::read_header(buf)?;
        let data = tlv::take(buf, "record", length)?;

        let Some(entry) = registry.get(format) else {
            debug!(message = "skip unknown record", format, length);
            continue;
        };

        let mut payload = Cursor::new(data);
        let record = (entry.decode)(&mut payload)?;
        tlv::finish(&payload, entry.name)?;

        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::address::Address;
    use crate::records::{
        AsPathSegment, ExtendedGateway, ExtendedSwitch, HostNetIO, IfCounters, RawPacketHeader,
    };

    fn flow_sample() -> FlowSample {
        FlowSample {
            sequence_number: 6,
            source_id: SourceId {
                source_type: 0,
                index: 1043,
            },
            sampling_rate: 2048,
            sample_pool: 12288,
            drops: 0,
            input: 1194,
            output: 1043,
            records: vec![
                RawPacketHeader {
                    protocol: 1,
                    frame_length: 82,
                    stripped: 4,
                    header: vec![0x61; 78],
                }
                .into(),
                ExtendedGateway {
                    next_hop: Address::V4("10.0.0.254".parse().unwrap()),
                    r#as: 64512,
                    src_as: 64513,
                    src_peer_as: 64514,
                    dst_as_path: vec![AsPathSegment {
                        seg_type: 2,
                        seg: vec![64515, 64516],
                    }],
                    communities: vec![],
                    local_pref: 100,
                }
                .into(),
            ],
        }
    }

    fn counters() -> Vec<CounterRecord> {
        vec![
            HostNetIO {
                bytes_in: 3679251836,
                pkts_in: 3142478,
                errs_in: 0,
                drops_in: 0,
                bytes_out: 6072707634,
                pkts_out: 4600601,
                errs_out: 0,
                drops_out: 0,
            }
            .into(),
        ]
    }

    fn decode_flow(data: &[u8]) -> Result<FlowSample, Error> {
        let registry = Registry::default();
        let mut buf = Cursor::new(data);
        let sample = FlowSample::decode(&mut buf, &registry, 1000)?;
        tlv::finish(&buf, "sample")?;
        Ok(sample)
    }

    #[test]
    fn source_id() {
        let mut buf = vec![];
        SourceId {
            source_type: 2,
            index: 0x010203,
        }
        .encode(&mut buf)
        .unwrap();
        assert_eq!(buf, [2, 1, 2, 3]);

        let decoded = SourceId::decode(&mut Cursor::new(buf.as_slice())).unwrap();
        assert_eq!(decoded.source_type, 2);
        assert_eq!(decoded.index, 0x010203);
    }

    #[test]
    fn source_index_overflow() {
        let sample = CounterSample {
            sequence_number: 1,
            source_id: SourceId {
                source_type: 0,
                index: 0x0100_0000,
            },
            records: vec![],
        };

        let mut buf = vec![];
        let err = sample.encode(&mut buf).unwrap_err();
        assert!(matches!(err, Error::SourceIndexOverflow(0x0100_0000)));
        assert!(buf.is_empty());
    }

    #[test]
    fn flow_sample_roundtrip() {
        let sample = flow_sample();
        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();

        let format = u32::from_be_bytes(buf[0..4].try_into().unwrap());
        let length = u32::from_be_bytes(buf[4..8].try_into().unwrap());
        assert_eq!(format, SAMPLE_FORMAT_FLOW);
        assert_eq!(length as usize, buf.len() - 8);
        assert_eq!(&buf[12..16], &[0, 0, 0x04, 0x13]);

        assert_eq!(decode_flow(&buf[8..]).unwrap(), sample);
    }

    #[test]
    fn empty_samples() {
        let sample = Sample::from(ExpandedCounterSample {
            sequence_number: 193,
            source_id: ExpandedSourceId {
                source_type: 2,
                index: 1,
            },
            records: vec![],
        });

        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();
        assert_eq!(
            buf,
            [0, 0, 0, 4, 0, 0, 0, 16, 0, 0, 0, 193, 0, 0, 0, 2, 0, 0, 0, 1, 0, 0, 0, 0]
        );

        let registry = Registry::default();
        let decoded =
            ExpandedCounterSample::decode(&mut Cursor::new(&buf[8..]), &registry, 1000).unwrap();
        assert_eq!(Sample::from(decoded), sample);
    }

    #[test]
    fn expanded_flow_sample_roundtrip() {
        let sample = ExpandedFlowSample {
            sequence_number: 0x20909326,
            source_id: ExpandedSourceId {
                source_type: 0,
                index: 1_000_100,
            },
            sampling_rate: 16383,
            sample_pool: 70839514,
            drops: 0,
            input: Interface {
                format: 0,
                value: 1_000_100,
            },
            output: Interface {
                format: 0,
                value: 1_000_018,
            },
            records: vec![
                ExtendedSwitch {
                    src_vlan: 30,
                    src_priority: 0,
                    dst_vlan: 30,
                    dst_priority: 0,
                }
                .into(),
            ],
        };

        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), 8 + 44 + 24);

        let registry = Registry::default();
        let mut cursor = Cursor::new(&buf[8..]);
        let decoded = ExpandedFlowSample::decode(&mut cursor, &registry, 1000).unwrap();
        tlv::finish(&cursor, "sample").unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn counter_sample_roundtrip() {
        let sample = CounterSample {
            sequence_number: 42,
            source_id: SourceId {
                source_type: 0,
                index: 3,
            },
            records: counters(),
        };

        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();

        let registry = Registry::default();
        let decoded = CounterSample::decode(&mut Cursor::new(&buf[8..]), &registry, 1000).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn skip_unregistered() {
        let sample = flow_sample();
        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();

        let mut registry = Registry::<FlowRecord>::empty();
        registry.register::<ExtendedGateway>();

        let mut cursor = Cursor::new(&buf[8..]);
        let decoded = FlowSample::decode(&mut cursor, &registry, 1000).unwrap();
        tlv::finish(&cursor, "sample").unwrap();

        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0], sample.records[1]);
    }

    #[test]
    fn skip_unknown_record() {
        let mut sample = flow_sample();
        sample.records.truncate(1);

        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();

        // append a record of an unknown format, and fix up the counts
        let unknown = [0, 0, 0x08, 0x34, 0, 0, 0, 8, 1, 2, 3, 4, 5, 6, 7, 8];
        buf.extend_from_slice(&unknown);
        let length = u32::from_be_bytes(buf[4..8].try_into().unwrap()) + unknown.len() as u32;
        buf[4..8].copy_from_slice(&length.to_be_bytes());
        buf[36..40].copy_from_slice(&2u32.to_be_bytes());

        let decoded = decode_flow(&buf[8..]).unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn too_many_records() {
        let mut buf = vec![];
        flow_sample().encode(&mut buf).unwrap();

        let registry = Registry::default();
        let err = FlowSample::decode(&mut Cursor::new(&buf[8..]), &registry, 1).unwrap_err();
        assert!(matches!(err, Error::TooManyRecords(2)));
    }

    #[test]
    fn record_count_exceeds_body() {
        let mut buf = vec![];
        flow_sample().encode(&mut buf).unwrap();
        buf[36..40].copy_from_slice(&500u32.to_be_bytes());

        let err = decode_flow(&buf[8..]).unwrap_err();
        assert!(matches!(
            err,
            Error::CountExceedsRecord {
                what: "records",
                count: 500,
                ..
            }
        ));
    }

    #[test]
    fn record_length_mismatch() {
        let sample = CounterSample {
            sequence_number: 1,
            source_id: SourceId::default(),
            records: vec![
                IfCounters {
                    if_index: 1,
                    if_type: 6,
                    if_speed: 1_000_000_000,
                    if_direction: 1,
                    if_status: 3,
                    if_in_octets: 0,
                    if_in_ucast_pkts: 0,
                    if_in_multicast_pkts: 0,
                    if_in_broadcast_pkts: 0,
                    if_in_discards: 0,
                    if_in_errors: 0,
                    if_in_unknown_protos: 0,
                    if_out_octets: 0,
                    if_out_ucast_pkts: 0,
                    if_out_multicast_pkts: 0,
                    if_out_broadcast_pkts: 0,
                    if_out_discards: 0,
                    if_out_errors: 0,
                    if_promiscuous_mode: 0,
                }
                .into(),
            ],
        };

        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();
        // shrink the record length, its payload stays the same
        buf[24..28].copy_from_slice(&84u32.to_be_bytes());

        let registry = Registry::default();
        let err = CounterSample::decode(&mut Cursor::new(&buf[8..]), &registry, 1000).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRecordLength {
                expected: 88,
                declared: 84,
                ..
            }
        ));
    }

    #[test]
    fn record_not_fully_consumed() {
        let mut sample = flow_sample();
        sample.records.truncate(1);

        let mut buf = vec![];
        sample.encode(&mut buf).unwrap();

        // grow the raw record by 4 bytes the header does not account for
        buf.extend_from_slice(&[0; 4]);
        let sample_length = u32::from_be_bytes(buf[4..8].try_into().unwrap()) + 4;
        buf[4..8].copy_from_slice(&sample_length.to_be_bytes());
        let record_length = u32::from_be_bytes(buf[44..48].try_into().unwrap()) + 4;
        buf[44..48].copy_from_slice(&record_length.to_be_bytes());

        let err = decode_flow(&buf[8..]).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthMismatch {
                what: "RawPacketHeader",
                declared: 100,
                consumed: 96,
            }
        ));
    }

    #[test]
    fn serialize() {
        let sample = Sample::from(CounterSample {
            sequence_number: 7,
            source_id: SourceId {
                source_type: 0,
                index: 3,
            },
            records: counters(),
        });

        let value = serde_json::to_value(&sample).unwrap();
        assert_eq!(value["type"], "counter");
        assert_eq!(value["source_id"]["index"], 3);
        assert_eq!(value["records"][0]["type"], "host_net_io");
    }
}
