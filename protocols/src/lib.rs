//! Wire formats spoken while identifying devices on a LAN.

pub mod ipp;
pub mod mdns;
pub mod upnp;
