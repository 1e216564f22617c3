use std::io::{Cursor, Write};
use std::net::{Ipv4Addr, Ipv6Addr};

use bytes::Buf;
use serde::Serialize;
use xdr::{XDRReader, XDRWriter};

use crate::address::Address;
use crate::registry::RecordVariant;
use crate::{Error, tlv};

// Opaque flow_data types according to https://sflow.org/SFLOW-STRUCTS5.txt
pub const FLOW_TYPE_RAW: u32 = 1;
pub const FLOW_TYPE_ETH: u32 = 2;
pub const FLOW_TYPE_IPV4: u32 = 3;
pub const FLOW_TYPE_IPV6: u32 = 4;
pub const FLOW_TYPE_EXT_SWITCH: u32 = 1001;
pub const FLOW_TYPE_EXT_ROUTER: u32 = 1002;
pub const FLOW_TYPE_EXT_GATEWAY: u32 = 1003;

/// The first bytes of a sampled packet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RawPacketHeader {
    /// Header protocol, 1 = ethernet, 11 = IPv4, 12 = IPv6, etc.
    pub protocol: u32,
    /// Original length of the packet before sampling
    pub frame_length: u32,
    /// Number of octets removed from the packet before extracting the header
    pub stripped: u32,
    pub header: Vec<u8>,
}

impl RawPacketHeader {
    /// Number of captured bytes, as written to the wire.
    #[inline]
    pub fn header_size(&self) -> u32 {
        self.header.len() as u32
    }
}

impl RecordVariant for RawPacketHeader {
    const FORMAT: u32 = FLOW_TYPE_RAW;
    const NAME: &'static str = "RawPacketHeader";

    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        let protocol = buf.read_u32()?;
        let frame_length = buf.read_u32()?;
        let stripped = buf.read_u32()?;
        let header_size = buf.read_u32()?;

        let available = buf.remaining();
        if header_size as usize > available {
            return Err(Error::HeaderSizeExceedsRecord {
                header_size,
                available,
            });
        }
        let header = buf.read_opaque(header_size as usize)?;

        Ok(RawPacketHeader {
            protocol,
            frame_length,
            stripped,
            header,
        })
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        tlv::encode(writer, Self::FORMAT, |payload| {
            payload.write_u32(self.protocol)?;
            payload.write_u32(self.frame_length)?;
            payload.write_u32(self.stripped)?;
            payload.write_u32(self.header_size())?;
            payload.write_opaque(&self.header)?;

            Ok(())
        })
    }
}

fixed_record! {
    /// Ethernet frame data, for when the header is not exported.
    pub struct SampledEthernet(FLOW_TYPE_ETH, "SampledEthernet") {
        /// The length of the MAC packet received on the network
        pub length: u32,
        pub src_mac: [u8; 6],
        pub dst_mac: [u8; 6],
        pub eth_type: u32,
    }
}

fixed_record! {
    pub struct SampledIpv4(FLOW_TYPE_IPV4, "SampledIpv4") {
        /// The length of the IP packet excluding lower layer encapsulations
        pub length: u32,
        /// IP protocol type, for example TCP = 6, UDP = 17
        pub protocol: u32,
        pub src_ip: Ipv4Addr,
        pub dst_ip: Ipv4Addr,
        pub src_port: u32,
        pub dst_port: u32,
        pub tcp_flags: u32,
        pub tos: u32,
    }
}

fixed_record! {
    pub struct SampledIpv6(FLOW_TYPE_IPV6, "SampledIpv6") {
        pub length: u32,
        pub protocol: u32,
        pub src_ip: Ipv6Addr,
        pub dst_ip: Ipv6Addr,
        pub src_port: u32,
        pub dst_port: u32,
        pub tcp_flags: u32,
        pub priority: u32,
    }
}

fixed_record! {
    /// Extended switch data, 802.1Q VLAN and priority.
    pub struct ExtendedSwitch(FLOW_TYPE_EXT_SWITCH, "ExtendedSwitch") {
        pub src_vlan: u32,
        pub src_priority: u32,
        pub dst_vlan: u32,
        pub dst_priority: u32,
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtendedRouter {
    /// IP address of next hop router
    pub next_hop: Address,
    pub src_mask_len: u32,
    pub dst_mask_len: u32,
}

impl RecordVariant for ExtendedRouter {
    const FORMAT: u32 = FLOW_TYPE_EXT_ROUTER;
    const NAME: &'static str = "ExtendedRouter";

    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        let next_hop = Address::decode(buf)?;
        let src_mask_len = buf.read_u32()?;
        let dst_mask_len = buf.read_u32()?;

        Ok(ExtendedRouter {
            next_hop,
            src_mask_len,
            dst_mask_len,
        })
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        tlv::encode(writer, Self::FORMAT, |payload| {
            self.next_hop.encode(payload)?;
            payload.write_u32(self.src_mask_len)?;
            payload.write_u32(self.dst_mask_len)?;

            Ok(())
        })
    }
}

/// One segment of a BGP AS path.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AsPathSegment {
    /// 1 = AS_SET, 2 = AS_SEQUENCE
    pub seg_type: u32,
    pub seg: Vec<u32>,
}

/// Extended gateway data, the BGP routing information of the sampled packet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExtendedGateway {
    pub next_hop: Address,
    /// Autonomous system number of the router
    pub r#as: u32,
    pub src_as: u32,
    pub src_peer_as: u32,
    pub dst_as_path: Vec<AsPathSegment>,
    pub communities: Vec<u32>,
    pub local_pref: u32,
}

impl RecordVariant for ExtendedGateway {
    const FORMAT: u32 = FLOW_TYPE_EXT_GATEWAY;
    const NAME: &'static str = "ExtendedGateway";

    fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, Error> {
        let next_hop = Address::decode(buf)?;
        let r#as = buf.read_u32()?;
        let src_as = buf.read_u32()?;
        let src_peer_as = buf.read_u32()?;

        // every segment has at least its type and length
        let segments = buf.read_u32()?;
        tlv::check_count(buf, "as path segments", segments, 8)?;
        let mut dst_as_path = Vec::with_capacity(segments as usize);
        for _ in 0..segments {
            let seg_type = buf.read_u32()?;
            let length = buf.read_u32()?;
            tlv::check_count(buf, "as path", length, 4)?;

            let mut seg = Vec::with_capacity(length as usize);
            for _ in 0..length {
                seg.push(buf.read_u32()?);
            }

            dst_as_path.push(AsPathSegment { seg_type, seg });
        }

        let length = buf.read_u32()?;
        tlv::check_count(buf, "communities", length, 4)?;
        let mut communities = Vec::with_capacity(length as usize);
        for _ in 0..length {
            communities.push(buf.read_u32()?);
        }

        let local_pref = buf.read_u32()?;

        Ok(ExtendedGateway {
            next_hop,
            r#as,
            src_as,
            src_peer_as,
            dst_as_path,
            communities,
            local_pref,
        })
    }

    fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        tlv::encode(writer, Self::FORMAT, |payload| {
            self.next_hop.encode(payload)?;
            payload.write_u32(self.r#as)?;
            payload.write_u32(self.src_as)?;
            payload.write_u32(self.src_peer_as)?;

            payload.write_u32(self.dst_as_path.len() as u32)?;
            for segment in &self.dst_as_path {
                payload.write_u32(segment.seg_type)?;
                payload.write_u32(segment.seg.len() as u32)?;
                for value in &segment.seg {
                    payload.write_u32(*value)?;
                }
            }

            payload.write_u32(self.communities.len() as u32)?;
            for community in &self.communities {
                payload.write_u32(*community)?;
            }

            payload.write_u32(self.local_pref)?;

            Ok(())
        })
    }
}

record_family! {
    /// Records carried by flow samples.
    pub enum FlowRecord {
        #[serde(rename = "raw")]
        Raw(RawPacketHeader),
        #[serde(rename = "sampled_ethernet")]
        SampledEthernet(SampledEthernet),
        #[serde(rename = "sampled_ipv4")]
        SampledIpv4(SampledIpv4),
        #[serde(rename = "sampled_ipv6")]
        SampledIpv6(SampledIpv6),
        #[serde(rename = "extended_switch")]
        ExtendedSwitch(ExtendedSwitch),
        #[serde(rename = "extended_router")]
        ExtendedRouter(ExtendedRouter),
        #[serde(rename = "extended_gateway")]
        ExtendedGateway(ExtendedGateway),
    }
}
