//! Shared helpers

mod cidr;

pub use cidr::IpNetwork;
