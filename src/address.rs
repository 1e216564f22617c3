use std::fmt::{Display, Formatter};
use std::io::{Read, Write};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use serde::Serialize;
use xdr::{Field, XDRReader, XDRWriter};

use crate::Error;

const ADDRESS_TYPE_UNKNOWN: u32 = 0;
const ADDRESS_TYPE_IP_V4: u32 = 1;
const ADDRESS_TYPE_IP_V6: u32 = 2;

/// `address` union of sFlow, used for the agent and next hop addresses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Address {
    #[default]
    Unknown,
    V4(Ipv4Addr),
    V6(Ipv6Addr),
}

impl Address {
    pub fn address_type(&self) -> u32 {
        match self {
            Address::Unknown => ADDRESS_TYPE_UNKNOWN,
            Address::V4(_) => ADDRESS_TYPE_IP_V4,
            Address::V6(_) => ADDRESS_TYPE_IP_V6,
        }
    }

    pub fn ip(&self) -> Option<IpAddr> {
        match self {
            Address::Unknown => None,
            Address::V4(addr) => Some(IpAddr::V4(*addr)),
            Address::V6(addr) => Some(IpAddr::V6(*addr)),
        }
    }

    pub(crate) fn decode<R: Read + ?Sized>(reader: &mut R) -> Result<Address, Error> {
        let address = match reader.read_u32()? {
            ADDRESS_TYPE_UNKNOWN => Address::Unknown,
            ADDRESS_TYPE_IP_V4 => Address::V4(Ipv4Addr::read_from(reader)?),
            ADDRESS_TYPE_IP_V6 => Address::V6(Ipv6Addr::read_from(reader)?),
            typ => return Err(Error::UnknownAddressType(typ)),
        };

        Ok(address)
    }

    pub(crate) fn encode<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), Error> {
        writer.write_u32(self.address_type())?;

        match self {
            Address::Unknown => {}
            Address::V4(addr) => addr.write_to(writer)?,
            Address::V6(addr) => addr.write_to(writer)?,
        }

        Ok(())
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(addr) => Address::V4(addr),
            IpAddr::V6(addr) => Address::V6(addr),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::V4(addr)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address::V6(addr)
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Address::Unknown => f.write_str("unknown"),
            Address::V4(addr) => addr.fmt(f),
            Address::V6(addr) => addr.fmt(f),
        }
    }
}
